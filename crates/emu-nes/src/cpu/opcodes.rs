//! 6502 opcode table: one entry per byte, binding an operation, an
//! addressing mode, a base cycle count, and whether a page-crossing read
//! charges a penalty cycle. Dispatch is a flat match over the opcode byte
//! (tagged-variant dispatch), not a function-pointer table or a class
//! hierarchy per instruction.

/// Addressing modes for 6502. The "read-only indexed" modes from the spec
/// (`AbsoluteX`/`AbsoluteY`/`IndirectIndexed` with a page-cross penalty)
/// reuse these variants; the penalty is carried separately on
/// [`OpcodeInfo::page_cross_cycle`] rather than as distinct enum members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect, // (Indirect,X)
    IndirectIndexed, // (Indirect),Y
}

/// Every operation this core's dispatch table can bind an opcode to,
/// including the undocumented instructions the target platform's software
/// relies on. `Kil` and `AddrNop` are silent no-ops (documented
/// shortcoming); `Dop`/`Top` read and discard an operand of the
/// appropriate width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny,
    Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror,
    Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    // Undocumented.
    Aac, Arr, Asr, Atx, Dcp, Isb, Lax, Rla, Rra, Sax, Slo, Sre,
    Dop, Top, Kil, AddrNop,
}

/// A single opcode table entry.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub op: Op,
    pub mode: AddressingMode,
    pub cycles: u8,
    /// Charge one extra cycle (and perform a dummy read) when a read-only
    /// indexed addressing mode's effective address crosses a page.
    pub page_cross_cycle: bool,
}

macro_rules! e {
    ($mnemonic:expr, $op:ident, $mode:ident, $cycles:expr) => {
        OpcodeInfo { mnemonic: $mnemonic, op: Op::$op, mode: AddressingMode::$mode, cycles: $cycles, page_cross_cycle: false }
    };
    ($mnemonic:expr, $op:ident, $mode:ident, $cycles:expr, pg) => {
        OpcodeInfo { mnemonic: $mnemonic, op: Op::$op, mode: AddressingMode::$mode, cycles: $cycles, page_cross_cycle: true }
    };
}

/// Look up the table entry for an opcode byte. Every one of the 256
/// possible bytes resolves to an entry — undocumented opcodes and the
/// `KIL` family included — so `EmulatorError::UnsupportedOpcode` is never
/// constructed by this core.
pub fn info(opcode: u8) -> OpcodeInfo {
    match opcode {
        0x00 => e!("BRK", Brk, Implied, 7),
        0x01 => e!("ORA", Ora, IndexedIndirect, 6),
        0x02 => e!("KIL", Kil, Implied, 2),
        0x03 => e!("SLO", Slo, IndexedIndirect, 8),
        0x04 => e!("DOP", Dop, ZeroPage, 3),
        0x05 => e!("ORA", Ora, ZeroPage, 3),
        0x06 => e!("ASL", Asl, ZeroPage, 5),
        0x07 => e!("SLO", Slo, ZeroPage, 5),
        0x08 => e!("PHP", Php, Implied, 3),
        0x09 => e!("ORA", Ora, Immediate, 2),
        0x0A => e!("ASL", Asl, Accumulator, 2),
        0x0B => e!("AAC", Aac, Immediate, 2),
        0x0C => e!("TOP", Top, Absolute, 4),
        0x0D => e!("ORA", Ora, Absolute, 4),
        0x0E => e!("ASL", Asl, Absolute, 6),
        0x0F => e!("SLO", Slo, Absolute, 6),

        0x10 => e!("BPL", Bpl, Relative, 2),
        0x11 => e!("ORA", Ora, IndirectIndexed, 5, pg),
        0x12 => e!("KIL", Kil, Implied, 2),
        0x13 => e!("SLO", Slo, IndirectIndexed, 8),
        0x14 => e!("DOP", Dop, ZeroPageX, 4),
        0x15 => e!("ORA", Ora, ZeroPageX, 4),
        0x16 => e!("ASL", Asl, ZeroPageX, 6),
        0x17 => e!("SLO", Slo, ZeroPageX, 6),
        0x18 => e!("CLC", Clc, Implied, 2),
        0x19 => e!("ORA", Ora, AbsoluteY, 4, pg),
        0x1A => e!("NOP", Nop, Implied, 2),
        0x1B => e!("SLO", Slo, AbsoluteY, 7),
        0x1C => e!("TOP", Top, AbsoluteX, 4, pg),
        0x1D => e!("ORA", Ora, AbsoluteX, 4, pg),
        0x1E => e!("ASL", Asl, AbsoluteX, 7),
        0x1F => e!("SLO", Slo, AbsoluteX, 7),

        0x20 => e!("JSR", Jsr, Absolute, 6),
        0x21 => e!("AND", And, IndexedIndirect, 6),
        0x22 => e!("KIL", Kil, Implied, 2),
        0x23 => e!("RLA", Rla, IndexedIndirect, 8),
        0x24 => e!("BIT", Bit, ZeroPage, 3),
        0x25 => e!("AND", And, ZeroPage, 3),
        0x26 => e!("ROL", Rol, ZeroPage, 5),
        0x27 => e!("RLA", Rla, ZeroPage, 5),
        0x28 => e!("PLP", Plp, Implied, 4),
        0x29 => e!("AND", And, Immediate, 2),
        0x2A => e!("ROL", Rol, Accumulator, 2),
        0x2B => e!("AAC", Aac, Immediate, 2),
        0x2C => e!("BIT", Bit, Absolute, 4),
        0x2D => e!("AND", And, Absolute, 4),
        0x2E => e!("ROL", Rol, Absolute, 6),
        0x2F => e!("RLA", Rla, Absolute, 6),

        0x30 => e!("BMI", Bmi, Relative, 2),
        0x31 => e!("AND", And, IndirectIndexed, 5, pg),
        0x32 => e!("KIL", Kil, Implied, 2),
        0x33 => e!("RLA", Rla, IndirectIndexed, 8),
        0x34 => e!("DOP", Dop, ZeroPageX, 4),
        0x35 => e!("AND", And, ZeroPageX, 4),
        0x36 => e!("ROL", Rol, ZeroPageX, 6),
        0x37 => e!("RLA", Rla, ZeroPageX, 6),
        0x38 => e!("SEC", Sec, Implied, 2),
        0x39 => e!("AND", And, AbsoluteY, 4, pg),
        0x3A => e!("NOP", Nop, Implied, 2),
        0x3B => e!("RLA", Rla, AbsoluteY, 7),
        0x3C => e!("TOP", Top, AbsoluteX, 4, pg),
        0x3D => e!("AND", And, AbsoluteX, 4, pg),
        0x3E => e!("ROL", Rol, AbsoluteX, 7),
        0x3F => e!("RLA", Rla, AbsoluteX, 7),

        0x40 => e!("RTI", Rti, Implied, 6),
        0x41 => e!("EOR", Eor, IndexedIndirect, 6),
        0x42 => e!("KIL", Kil, Implied, 2),
        0x43 => e!("SRE", Sre, IndexedIndirect, 8),
        0x44 => e!("DOP", Dop, ZeroPage, 3),
        0x45 => e!("EOR", Eor, ZeroPage, 3),
        0x46 => e!("LSR", Lsr, ZeroPage, 5),
        0x47 => e!("SRE", Sre, ZeroPage, 5),
        0x48 => e!("PHA", Pha, Implied, 3),
        0x49 => e!("EOR", Eor, Immediate, 2),
        0x4A => e!("LSR", Lsr, Accumulator, 2),
        0x4B => e!("ASR", Asr, Immediate, 2),
        0x4C => e!("JMP", Jmp, Absolute, 3),
        0x4D => e!("EOR", Eor, Absolute, 4),
        0x4E => e!("LSR", Lsr, Absolute, 6),
        0x4F => e!("SRE", Sre, Absolute, 6),

        0x50 => e!("BVC", Bvc, Relative, 2),
        0x51 => e!("EOR", Eor, IndirectIndexed, 5, pg),
        0x52 => e!("KIL", Kil, Implied, 2),
        0x53 => e!("SRE", Sre, IndirectIndexed, 8),
        0x54 => e!("DOP", Dop, ZeroPageX, 4),
        0x55 => e!("EOR", Eor, ZeroPageX, 4),
        0x56 => e!("LSR", Lsr, ZeroPageX, 6),
        0x57 => e!("SRE", Sre, ZeroPageX, 6),
        0x58 => e!("CLI", Cli, Implied, 2),
        0x59 => e!("EOR", Eor, AbsoluteY, 4, pg),
        0x5A => e!("NOP", Nop, Implied, 2),
        0x5B => e!("SRE", Sre, AbsoluteY, 7),
        0x5C => e!("TOP", Top, AbsoluteX, 4, pg),
        0x5D => e!("EOR", Eor, AbsoluteX, 4, pg),
        0x5E => e!("LSR", Lsr, AbsoluteX, 7),
        0x5F => e!("SRE", Sre, AbsoluteX, 7),

        0x60 => e!("RTS", Rts, Implied, 6),
        0x61 => e!("ADC", Adc, IndexedIndirect, 6),
        0x62 => e!("KIL", Kil, Implied, 2),
        0x63 => e!("RRA", Rra, IndexedIndirect, 8),
        0x64 => e!("DOP", Dop, ZeroPage, 3),
        0x65 => e!("ADC", Adc, ZeroPage, 3),
        0x66 => e!("ROR", Ror, ZeroPage, 5),
        0x67 => e!("RRA", Rra, ZeroPage, 5),
        0x68 => e!("PLA", Pla, Implied, 4),
        0x69 => e!("ADC", Adc, Immediate, 2),
        0x6A => e!("ROR", Ror, Accumulator, 2),
        0x6B => e!("ARR", Arr, Immediate, 2),
        0x6C => e!("JMP", Jmp, Indirect, 5),
        0x6D => e!("ADC", Adc, Absolute, 4),
        0x6E => e!("ROR", Ror, Absolute, 6),
        0x6F => e!("RRA", Rra, Absolute, 6),

        0x70 => e!("BVS", Bvs, Relative, 2),
        0x71 => e!("ADC", Adc, IndirectIndexed, 5, pg),
        0x72 => e!("KIL", Kil, Implied, 2),
        0x73 => e!("RRA", Rra, IndirectIndexed, 8),
        0x74 => e!("DOP", Dop, ZeroPageX, 4),
        0x75 => e!("ADC", Adc, ZeroPageX, 4),
        0x76 => e!("ROR", Ror, ZeroPageX, 6),
        0x77 => e!("RRA", Rra, ZeroPageX, 6),
        0x78 => e!("SEI", Sei, Implied, 2),
        0x79 => e!("ADC", Adc, AbsoluteY, 4, pg),
        0x7A => e!("NOP", Nop, Implied, 2),
        0x7B => e!("RRA", Rra, AbsoluteY, 7),
        0x7C => e!("TOP", Top, AbsoluteX, 4, pg),
        0x7D => e!("ADC", Adc, AbsoluteX, 4, pg),
        0x7E => e!("ROR", Ror, AbsoluteX, 7),
        0x7F => e!("RRA", Rra, AbsoluteX, 7),

        0x80 => e!("DOP", Dop, Immediate, 2),
        0x81 => e!("STA", Sta, IndexedIndirect, 6),
        0x82 => e!("DOP", Dop, Immediate, 2),
        0x83 => e!("SAX", Sax, IndexedIndirect, 6),
        0x84 => e!("STY", Sty, ZeroPage, 3),
        0x85 => e!("STA", Sta, ZeroPage, 3),
        0x86 => e!("STX", Stx, ZeroPage, 3),
        0x87 => e!("SAX", Sax, ZeroPage, 3),
        0x88 => e!("DEY", Dey, Implied, 2),
        0x89 => e!("DOP", Dop, Immediate, 2),
        0x8A => e!("TXA", Txa, Implied, 2),
        0x8B => e!("AddrNop", AddrNop, Immediate, 2),
        0x8C => e!("STY", Sty, Absolute, 4),
        0x8D => e!("STA", Sta, Absolute, 4),
        0x8E => e!("STX", Stx, Absolute, 4),
        0x8F => e!("SAX", Sax, Absolute, 4),

        0x90 => e!("BCC", Bcc, Relative, 2),
        0x91 => e!("STA", Sta, IndirectIndexed, 6),
        0x92 => e!("KIL", Kil, Implied, 2),
        0x93 => e!("AddrNop", AddrNop, IndirectIndexed, 6),
        0x94 => e!("STY", Sty, ZeroPageX, 4),
        0x95 => e!("STA", Sta, ZeroPageX, 4),
        0x96 => e!("STX", Stx, ZeroPageY, 4),
        0x97 => e!("SAX", Sax, ZeroPageY, 4),
        0x98 => e!("TYA", Tya, Implied, 2),
        0x99 => e!("STA", Sta, AbsoluteY, 5),
        0x9A => e!("TXS", Txs, Implied, 2),
        0x9B => e!("AddrNop", AddrNop, AbsoluteY, 5),
        // SYA/SXA (0x9C/0x9E): documented as address-mode-only no-ops.
        0x9C => e!("SYA", AddrNop, AbsoluteX, 5),
        0x9D => e!("STA", Sta, AbsoluteX, 5),
        0x9E => e!("SXA", AddrNop, AbsoluteY, 5),
        0x9F => e!("AddrNop", AddrNop, AbsoluteY, 5),

        0xA0 => e!("LDY", Ldy, Immediate, 2),
        0xA1 => e!("LDA", Lda, IndexedIndirect, 6),
        0xA2 => e!("LDX", Ldx, Immediate, 2),
        0xA3 => e!("LAX", Lax, IndexedIndirect, 6),
        0xA4 => e!("LDY", Ldy, ZeroPage, 3),
        0xA5 => e!("LDA", Lda, ZeroPage, 3),
        0xA6 => e!("LDX", Ldx, ZeroPage, 3),
        0xA7 => e!("LAX", Lax, ZeroPage, 3),
        0xA8 => e!("TAY", Tay, Implied, 2),
        0xA9 => e!("LDA", Lda, Immediate, 2),
        0xAA => e!("TAX", Tax, Implied, 2),
        0xAB => e!("ATX", Atx, Immediate, 2),
        0xAC => e!("LDY", Ldy, Absolute, 4),
        0xAD => e!("LDA", Lda, Absolute, 4),
        0xAE => e!("LDX", Ldx, Absolute, 4),
        0xAF => e!("LAX", Lax, Absolute, 4),

        0xB0 => e!("BCS", Bcs, Relative, 2),
        0xB1 => e!("LDA", Lda, IndirectIndexed, 5, pg),
        0xB2 => e!("KIL", Kil, Implied, 2),
        0xB3 => e!("LAX", Lax, IndirectIndexed, 5, pg),
        0xB4 => e!("LDY", Ldy, ZeroPageX, 4),
        0xB5 => e!("LDA", Lda, ZeroPageX, 4),
        0xB6 => e!("LDX", Ldx, ZeroPageY, 4),
        0xB7 => e!("LAX", Lax, ZeroPageY, 4),
        0xB8 => e!("CLV", Clv, Implied, 2),
        0xB9 => e!("LDA", Lda, AbsoluteY, 4, pg),
        0xBA => e!("TSX", Tsx, Implied, 2),
        0xBB => e!("AddrNop", AddrNop, AbsoluteY, 4, pg),
        0xBC => e!("LDY", Ldy, AbsoluteX, 4, pg),
        0xBD => e!("LDA", Lda, AbsoluteX, 4, pg),
        0xBE => e!("LDX", Ldx, AbsoluteY, 4, pg),
        0xBF => e!("LAX", Lax, AbsoluteY, 4, pg),

        0xC0 => e!("CPY", Cpy, Immediate, 2),
        0xC1 => e!("CMP", Cmp, IndexedIndirect, 6),
        0xC2 => e!("DOP", Dop, Immediate, 2),
        0xC3 => e!("DCP", Dcp, IndexedIndirect, 8),
        0xC4 => e!("CPY", Cpy, ZeroPage, 3),
        0xC5 => e!("CMP", Cmp, ZeroPage, 3),
        0xC6 => e!("DEC", Dec, ZeroPage, 5),
        0xC7 => e!("DCP", Dcp, ZeroPage, 5),
        0xC8 => e!("INY", Iny, Implied, 2),
        0xC9 => e!("CMP", Cmp, Immediate, 2),
        0xCA => e!("DEX", Dex, Implied, 2),
        0xCB => e!("AddrNop", AddrNop, Immediate, 2),
        0xCC => e!("CPY", Cpy, Absolute, 4),
        0xCD => e!("CMP", Cmp, Absolute, 4),
        0xCE => e!("DEC", Dec, Absolute, 6),
        0xCF => e!("DCP", Dcp, Absolute, 6),

        0xD0 => e!("BNE", Bne, Relative, 2),
        0xD1 => e!("CMP", Cmp, IndirectIndexed, 5, pg),
        0xD2 => e!("KIL", Kil, Implied, 2),
        0xD3 => e!("DCP", Dcp, IndirectIndexed, 8),
        0xD4 => e!("DOP", Dop, ZeroPageX, 4),
        0xD5 => e!("CMP", Cmp, ZeroPageX, 4),
        0xD6 => e!("DEC", Dec, ZeroPageX, 6),
        0xD7 => e!("DCP", Dcp, ZeroPageX, 6),
        0xD8 => e!("CLD", Cld, Implied, 2),
        0xD9 => e!("CMP", Cmp, AbsoluteY, 4, pg),
        0xDA => e!("NOP", Nop, Implied, 2),
        0xDB => e!("DCP", Dcp, AbsoluteY, 7),
        0xDC => e!("TOP", Top, AbsoluteX, 4, pg),
        0xDD => e!("CMP", Cmp, AbsoluteX, 4, pg),
        0xDE => e!("DEC", Dec, AbsoluteX, 7),
        0xDF => e!("DCP", Dcp, AbsoluteX, 7),

        0xE0 => e!("CPX", Cpx, Immediate, 2),
        0xE1 => e!("SBC", Sbc, IndexedIndirect, 6),
        0xE2 => e!("DOP", Dop, Immediate, 2),
        0xE3 => e!("ISB", Isb, IndexedIndirect, 8),
        0xE4 => e!("CPX", Cpx, ZeroPage, 3),
        0xE5 => e!("SBC", Sbc, ZeroPage, 3),
        0xE6 => e!("INC", Inc, ZeroPage, 5),
        0xE7 => e!("ISB", Isb, ZeroPage, 5),
        0xE8 => e!("INX", Inx, Implied, 2),
        0xE9 => e!("SBC", Sbc, Immediate, 2),
        0xEA => e!("NOP", Nop, Implied, 2),
        0xEB => e!("SBC", Sbc, Immediate, 2),
        0xEC => e!("CPX", Cpx, Absolute, 4),
        0xED => e!("SBC", Sbc, Absolute, 4),
        0xEE => e!("INC", Inc, Absolute, 6),
        0xEF => e!("ISB", Isb, Absolute, 6),

        0xF0 => e!("BEQ", Beq, Relative, 2),
        0xF1 => e!("SBC", Sbc, IndirectIndexed, 5, pg),
        0xF2 => e!("KIL", Kil, Implied, 2),
        0xF3 => e!("ISB", Isb, IndirectIndexed, 8),
        0xF4 => e!("DOP", Dop, ZeroPageX, 4),
        0xF5 => e!("SBC", Sbc, ZeroPageX, 4),
        0xF6 => e!("INC", Inc, ZeroPageX, 6),
        0xF7 => e!("ISB", Isb, ZeroPageX, 6),
        0xF8 => e!("SED", Sed, Implied, 2),
        0xF9 => e!("SBC", Sbc, AbsoluteY, 4, pg),
        0xFA => e!("NOP", Nop, Implied, 2),
        0xFB => e!("ISB", Isb, AbsoluteY, 7),
        0xFC => e!("TOP", Top, AbsoluteX, 4, pg),
        0xFD => e!("SBC", Sbc, AbsoluteX, 4, pg),
        0xFE => e!("INC", Inc, AbsoluteX, 7),
        0xFF => e!("ISB", Isb, AbsoluteX, 7),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_opcode_byte_resolves() {
        for opcode in 0u16..=255 {
            let _ = info(opcode as u8);
        }
    }

    #[test]
    fn lda_immediate_is_two_cycles() {
        let i = info(0xA9);
        assert_eq!(i.mnemonic, "LDA");
        assert_eq!(i.cycles, 2);
        assert_eq!(i.mode, AddressingMode::Immediate);
    }

    #[test]
    fn brk_is_seven_cycles_implied() {
        let i = info(0x00);
        assert_eq!(i.op, Op::Brk);
        assert_eq!(i.cycles, 7);
    }
}
