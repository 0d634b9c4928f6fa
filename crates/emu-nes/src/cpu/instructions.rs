//! 6502 instruction execution: addressing-mode resolution, RMW dummy
//! write-back, and the per-operation handlers the opcode table dispatches
//! into.

use super::opcodes::{self, AddressingMode as Mode, Op};
use super::{Cpu6502, CpuMemory, StatusFlags};
use emu_core::Result;

impl<M: CpuMemory> Cpu6502<M> {
    /// Execute the instruction bound to `opcode`. Returns the opcode's base
    /// cycle count; page-crossing and branch penalties are folded into
    /// `self.extra_cycles` by the handlers below and consumed by `step`.
    pub(super) fn execute(&mut self, opcode: u8) -> Result<u8> {
        let info = opcodes::info(opcode);
        self.dispatch(info.op, info.mode, info.page_cross_cycle);
        Ok(info.cycles)
    }

    /// Resolve an addressing mode to its effective address, returning
    /// whether an indexed mode's effective address crossed a page boundary.
    fn addr_mode(&mut self, mode: Mode) -> (u16, bool) {
        match mode {
            Mode::Immediate => (self.addr_immediate(), false),
            Mode::ZeroPage => (self.addr_zero_page(), false),
            Mode::ZeroPageX => (self.addr_zero_page_x(), false),
            Mode::ZeroPageY => (self.addr_zero_page_y(), false),
            Mode::Absolute => (self.addr_absolute(), false),
            Mode::AbsoluteX => self.addr_absolute_x(),
            Mode::AbsoluteY => self.addr_absolute_y(),
            Mode::Indirect => (self.addr_indirect(), false),
            Mode::IndexedIndirect => (self.addr_indexed_indirect(), false),
            Mode::IndirectIndexed => self.addr_indirect_indexed(),
            Mode::Implied | Mode::Accumulator | Mode::Relative => {
                unreachable!("operation does not resolve an address for {mode:?}")
            }
        }
    }

    /// Read an operand byte through `mode`, charging the read-only
    /// page-cross penalty (and its dummy read) when `penalize` is set and
    /// the effective address crossed a page.
    fn read_operand(&mut self, mode: Mode, penalize: bool) -> u8 {
        let (addr, crossed) = self.addr_mode(mode);
        if penalize && crossed {
            self.extra_cycles += 1;
            let _ = self.memory.read(addr);
        }
        self.memory.read(addr)
    }

    /// Read-modify-write through `mode` (or the accumulator). Memory
    /// variants perform the documented dummy write-back of the
    /// pre-modified value before the real write. Indexed-absolute and
    /// `(Indirect),Y` forms also perform the unconditional extra read at
    /// the effective address real hardware always issues there, regardless
    /// of whether the index actually crossed a page.
    fn rmw(&mut self, mode: Mode, op: impl Fn(&mut Self, u8) -> u8) {
        if mode == Mode::Accumulator {
            let old = self.a;
            let new = op(self, old);
            self.a = new;
        } else {
            let (addr, _) = self.addr_mode(mode);
            if matches!(mode, Mode::AbsoluteX | Mode::AbsoluteY | Mode::IndirectIndexed) {
                let _ = self.memory.read(addr);
            }
            let old = self.memory.read(addr);
            self.memory.write(addr, old);
            let new = op(self, old);
            self.memory.write(addr, new);
        }
    }

    fn dispatch(&mut self, op: Op, mode: Mode, penalize: bool) {
        match op {
            Op::Brk => self.op_brk(),
            Op::Rti => self.op_rti(),
            Op::Rts => self.op_rts(),
            Op::Jsr => self.op_jsr(),
            Op::Jmp => {
                let addr = match mode {
                    Mode::Absolute => self.addr_absolute(),
                    Mode::Indirect => self.addr_indirect(),
                    _ => unreachable!(),
                };
                self.pc = addr;
            }

            Op::Bcc => {
                let taken = !self.get_flag(StatusFlags::CARRY);
                self.branch(taken);
            }
            Op::Bcs => {
                let taken = self.get_flag(StatusFlags::CARRY);
                self.branch(taken);
            }
            Op::Beq => {
                let taken = self.get_flag(StatusFlags::ZERO);
                self.branch(taken);
            }
            Op::Bne => {
                let taken = !self.get_flag(StatusFlags::ZERO);
                self.branch(taken);
            }
            Op::Bmi => {
                let taken = self.get_flag(StatusFlags::NEGATIVE);
                self.branch(taken);
            }
            Op::Bpl => {
                let taken = !self.get_flag(StatusFlags::NEGATIVE);
                self.branch(taken);
            }
            Op::Bvc => {
                let taken = !self.get_flag(StatusFlags::OVERFLOW);
                self.branch(taken);
            }
            Op::Bvs => {
                let taken = self.get_flag(StatusFlags::OVERFLOW);
                self.branch(taken);
            }

            Op::Clc => self.set_flag(StatusFlags::CARRY, false),
            Op::Cld => self.set_flag(StatusFlags::DECIMAL, false),
            Op::Cli => self.set_flag(StatusFlags::INTERRUPT, false),
            Op::Clv => self.set_flag(StatusFlags::OVERFLOW, false),
            Op::Sec => self.set_flag(StatusFlags::CARRY, true),
            Op::Sed => self.set_flag(StatusFlags::DECIMAL, true),
            Op::Sei => self.set_flag(StatusFlags::INTERRUPT, true),

            Op::Pha => {
                let a = self.a;
                self.push(a);
            }
            Op::Php => {
                let pushed = (self.status | StatusFlags::BREAK | StatusFlags::UNUSED).bits();
                self.push(pushed);
            }
            Op::Pla => {
                self.a = self.pop();
                let a = self.a;
                self.update_zn(a);
            }
            Op::Plp => {
                let popped = self.pop();
                self.status = StatusFlags::from_bits_truncate(popped) | StatusFlags::UNUSED;
            }

            Op::Tax => {
                self.x = self.a;
                let x = self.x;
                self.update_zn(x);
            }
            Op::Tay => {
                self.y = self.a;
                let y = self.y;
                self.update_zn(y);
            }
            Op::Tsx => {
                self.x = self.sp;
                let x = self.x;
                self.update_zn(x);
            }
            Op::Txa => {
                self.a = self.x;
                let a = self.a;
                self.update_zn(a);
            }
            Op::Txs => self.sp = self.x,
            Op::Tya => {
                self.a = self.y;
                let a = self.a;
                self.update_zn(a);
            }

            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                let x = self.x;
                self.update_zn(x);
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                let y = self.y;
                self.update_zn(y);
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                let x = self.x;
                self.update_zn(x);
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                let y = self.y;
                self.update_zn(y);
            }

            Op::Kil => {}
            Op::AddrNop => {
                let _ = self.addr_mode(mode);
            }
            Op::Nop | Op::Dop | Op::Top => match mode {
                Mode::Implied | Mode::Accumulator => {}
                _ => {
                    let (addr, crossed) = self.addr_mode(mode);
                    if penalize && crossed {
                        self.extra_cycles += 1;
                    }
                    let _ = self.memory.read(addr);
                }
            },

            Op::Lda => {
                let v = self.read_operand(mode, penalize);
                self.a = v;
                self.update_zn(v);
            }
            Op::Ldx => {
                let v = self.read_operand(mode, penalize);
                self.x = v;
                self.update_zn(v);
            }
            Op::Ldy => {
                let v = self.read_operand(mode, penalize);
                self.y = v;
                self.update_zn(v);
            }
            Op::Lax => {
                let v = self.read_operand(mode, penalize);
                self.a = v;
                self.x = v;
                self.update_zn(v);
            }

            Op::Sta => {
                let (addr, _) = self.addr_mode(mode);
                let a = self.a;
                self.memory.write(addr, a);
            }
            Op::Stx => {
                let (addr, _) = self.addr_mode(mode);
                let x = self.x;
                self.memory.write(addr, x);
            }
            Op::Sty => {
                let (addr, _) = self.addr_mode(mode);
                let y = self.y;
                self.memory.write(addr, y);
            }
            Op::Sax => {
                let (addr, _) = self.addr_mode(mode);
                let v = self.a & self.x;
                self.memory.write(addr, v);
            }

            Op::And => {
                let v = self.read_operand(mode, penalize);
                self.a &= v;
                let a = self.a;
                self.update_zn(a);
            }
            Op::Ora => {
                let v = self.read_operand(mode, penalize);
                self.a |= v;
                let a = self.a;
                self.update_zn(a);
            }
            Op::Eor => {
                let v = self.read_operand(mode, penalize);
                self.a ^= v;
                let a = self.a;
                self.update_zn(a);
            }
            Op::Adc => {
                let v = self.read_operand(mode, penalize);
                self.adc(v);
            }
            Op::Sbc => {
                let v = self.read_operand(mode, penalize);
                self.adc(!v);
            }
            Op::Cmp => {
                let v = self.read_operand(mode, penalize);
                let a = self.a;
                self.compare(a, v);
            }
            Op::Cpx => {
                let v = self.read_operand(mode, penalize);
                let x = self.x;
                self.compare(x, v);
            }
            Op::Cpy => {
                let v = self.read_operand(mode, penalize);
                let y = self.y;
                self.compare(y, v);
            }
            Op::Bit => {
                let v = self.read_operand(mode, false);
                let result = self.a & v;
                self.set_flag(StatusFlags::ZERO, result == 0);
                self.set_flag(StatusFlags::NEGATIVE, v & 0x80 != 0);
                self.set_flag(StatusFlags::OVERFLOW, v & 0x40 != 0);
            }

            Op::Asl => self.rmw(mode, Self::asl_op),
            Op::Lsr => self.rmw(mode, Self::lsr_op),
            Op::Rol => self.rmw(mode, Self::rol_op),
            Op::Ror => self.rmw(mode, Self::ror_op),
            Op::Inc => self.rmw(mode, Self::inc_op),
            Op::Dec => self.rmw(mode, Self::dec_op),

            Op::Slo => self.rmw(mode, |c, v| {
                let r = c.asl_op(v);
                c.a |= r;
                let a = c.a;
                c.update_zn(a);
                r
            }),
            Op::Rla => self.rmw(mode, |c, v| {
                let r = c.rol_op(v);
                c.a &= r;
                let a = c.a;
                c.update_zn(a);
                r
            }),
            Op::Sre => self.rmw(mode, |c, v| {
                let r = c.lsr_op(v);
                c.a ^= r;
                let a = c.a;
                c.update_zn(a);
                r
            }),
            Op::Rra => self.rmw(mode, |c, v| {
                let r = c.ror_op(v);
                c.adc(r);
                r
            }),
            Op::Dcp => self.rmw(mode, |c, v| {
                let r = c.dec_op(v);
                let a = c.a;
                c.compare(a, r);
                r
            }),
            Op::Isb => self.rmw(mode, |c, v| {
                let r = c.inc_op(v);
                c.adc(!r);
                r
            }),

            Op::Aac => {
                let v = self.read_operand(mode, false);
                self.a &= v;
                let a = self.a;
                self.update_zn(a);
                self.set_flag(StatusFlags::CARRY, a & 0x80 != 0);
            }
            Op::Asr => {
                let v = self.read_operand(mode, false);
                self.a &= v;
                let a = self.a;
                let r = self.lsr_op(a);
                self.a = r;
            }
            Op::Arr => {
                let v = self.read_operand(mode, false);
                self.a &= v;
                let a = self.a;
                let r = self.ror_op(a);
                self.a = r;
                let bit6 = (r >> 6) & 1;
                let bit5 = (r >> 5) & 1;
                self.set_flag(StatusFlags::CARRY, bit6 == 1);
                self.set_flag(StatusFlags::OVERFLOW, (bit6 ^ bit5) == 1);
            }
            Op::Atx => {
                let v = self.read_operand(mode, false);
                let r = self.a & v;
                self.a = r;
                self.x = r;
                self.update_zn(r);
            }
        }
    }

    fn branch(&mut self, taken: bool) {
        let offset = self.fetch_byte() as i8;
        if taken {
            self.extra_cycles += 1;
            let old_pc = self.pc;
            let new_pc = (old_pc as i32 + offset as i32) as u16;
            if (old_pc & 0xFF00) != (new_pc & 0xFF00) {
                self.extra_cycles += 1;
            }
            self.pc = new_pc;
        }
    }

    fn adc(&mut self, value: u8) {
        let a = self.a;
        let carry_in = self.get_flag(StatusFlags::CARRY) as u16;
        let sum = a as u16 + value as u16 + carry_in;
        let result = sum as u8;
        self.set_flag(StatusFlags::CARRY, sum > 0xFF);
        self.set_flag(
            StatusFlags::OVERFLOW,
            (!(a ^ value) & (a ^ result) & 0x80) != 0,
        );
        self.a = result;
        self.update_zn(result);
    }

    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.set_flag(StatusFlags::CARRY, reg >= value);
        self.update_zn(result);
    }

    fn asl_op(&mut self, v: u8) -> u8 {
        self.set_flag(StatusFlags::CARRY, v & 0x80 != 0);
        let r = v << 1;
        self.update_zn(r);
        r
    }

    fn lsr_op(&mut self, v: u8) -> u8 {
        self.set_flag(StatusFlags::CARRY, v & 0x01 != 0);
        let r = v >> 1;
        self.update_zn(r);
        r
    }

    fn rol_op(&mut self, v: u8) -> u8 {
        let carry_in = self.get_flag(StatusFlags::CARRY) as u8;
        self.set_flag(StatusFlags::CARRY, v & 0x80 != 0);
        let r = (v << 1) | carry_in;
        self.update_zn(r);
        r
    }

    fn ror_op(&mut self, v: u8) -> u8 {
        let carry_in = self.get_flag(StatusFlags::CARRY) as u8;
        self.set_flag(StatusFlags::CARRY, v & 0x01 != 0);
        let r = (v >> 1) | (carry_in << 7);
        self.update_zn(r);
        r
    }

    fn inc_op(&mut self, v: u8) -> u8 {
        let r = v.wrapping_add(1);
        self.update_zn(r);
        r
    }

    fn dec_op(&mut self, v: u8) -> u8 {
        let r = v.wrapping_sub(1);
        self.update_zn(r);
        r
    }

    fn op_brk(&mut self) {
        self.pc = self.pc.wrapping_add(1);
        let pc = self.pc;
        self.push_word(pc);
        let pushed = (self.status | StatusFlags::BREAK | StatusFlags::UNUSED).bits();
        self.push(pushed);
        self.set_flag(StatusFlags::INTERRUPT, true);
        self.pc = self.memory.read_word(0xFFFE);
    }

    fn op_jsr(&mut self) {
        let target = self.addr_absolute();
        let ret = self.pc.wrapping_sub(1);
        self.push_word(ret);
        self.pc = target;
    }

    fn op_rts(&mut self) {
        let addr = self.pop_word();
        self.pc = addr.wrapping_add(1);
    }

    fn op_rti(&mut self) {
        let status = self.pop();
        self.status = StatusFlags::from_bits_truncate(status) | StatusFlags::UNUSED;
        self.pc = self.pop_word();
    }
}
