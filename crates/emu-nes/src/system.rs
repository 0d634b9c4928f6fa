//! Top-level NES system.
//!
//! Ties the CPU, unified memory fabric and cartridge together behind one
//! composition-friendly driver. A host owns the event pump and frame
//! pacing; this type only knows how to advance state one instruction (or
//! one frame) at a time.

use crate::cartridge::Cartridge;
use crate::cpu::Cpu6502;
use crate::display::Display;
use crate::memory::MemoryFabric;
use emu_core::{Cpu, Emulator, Result};
use std::path::Path;
use tracing::debug;

/// NES emulator system: CPU driving a unified memory fabric.
pub struct NesSystem {
    cpu: Cpu6502<MemoryFabric>,
    frame: u64,
    paused: bool,
}

impl NesSystem {
    /// Load a cartridge from a file path and bring the system up through
    /// reset.
    pub fn new(rom_path: &Path) -> Result<Self> {
        let cartridge = Cartridge::load(rom_path)?;
        Self::from_cartridge(&cartridge)
    }

    /// Convenience alias for [`NesSystem::new`] taking anything
    /// `AsRef<Path>`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(path.as_ref())
    }

    /// Build a system from an already-parsed cartridge.
    pub fn from_cartridge(cartridge: &Cartridge) -> Result<Self> {
        debug!(
            mapper = cartridge.header.mapper,
            prg_kb = cartridge.prg_rom.len() / 1024,
            chr_kb = cartridge.chr_rom.len() / 1024,
            "loading cartridge"
        );

        let memory = MemoryFabric::new(cartridge)?;
        let mut cpu = Cpu6502::new(memory);
        cpu.reset();

        debug!(pc = format!("{:04X}", cpu.pc()), "CPU reset");

        Ok(Self {
            cpu,
            frame: 0,
            paused: false,
        })
    }

    /// Swap in a caller-supplied pixel sink, replacing the default
    /// in-memory `FrameBuffer`.
    pub fn set_display(&mut self, display: Box<dyn Display>) {
        self.cpu.memory_mut().set_display(display);
    }

    /// Advance the system by exactly one instruction, servicing a pending
    /// NMI first if the PPU has raised one. Matches the composition-layer
    /// pseudocode: `if ppu.nmi then service_nmi(); cpu.step()`.
    pub fn run_step(&mut self) -> Result<u32> {
        self.cpu.step()
    }

    /// Run until at least `cycles` CPU cycles have elapsed, returning the
    /// number actually executed (may overshoot by less than one
    /// instruction's worth).
    pub fn run_cycles(&mut self, cycles: u64) -> Result<u64> {
        let target = self.cpu.cycles + cycles;
        while self.cpu.cycles < target {
            self.run_step()?;
        }
        Ok(self.cpu.cycles - (target - cycles))
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn cpu(&self) -> &Cpu6502<MemoryFabric> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu6502<MemoryFabric> {
        &mut self.cpu
    }

    pub fn ppu(&self) -> &crate::ppu::Ppu {
        self.cpu.memory().ppu()
    }

    /// Read a byte from CPU address space without disturbing emulation
    /// state beyond the PPU dot-ticking every access performs.
    pub fn read_memory(&mut self, addr: u16) -> u8 {
        use crate::cpu::CpuMemory;
        self.cpu.memory_mut().read(addr)
    }
}

impl Emulator for NesSystem {
    fn reset(&mut self) {
        self.cpu.reset();
        self.frame = 0;
    }

    /// Run approximately one NTSC frame (29780 CPU cycles), returning the
    /// number of cycles actually executed.
    fn run_frame(&mut self) -> Result<u32> {
        const CYCLES_PER_FRAME: u64 = 29780;
        let executed = self.run_cycles(CYCLES_PER_FRAME)?;
        self.frame += 1;
        Ok(executed as u32)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::{AuxFlags, INesHeader, Mirroring, TvStandard};

    fn cart_with_prg(mut prg_rom: Vec<u8>) -> Cartridge {
        prg_rom.resize(0x4000, 0xEA);
        Cartridge {
            header: INesHeader {
                prg_rom_banks: 1,
                chr_rom_banks: 1,
                mapper: 0,
                mirroring: Mirroring::Horizontal,
                has_battery: false,
                has_trainer: false,
                prg_ram_banks: 0,
                tv_standard: TvStandard::Ntsc,
                aux: AuxFlags::default(),
            },
            prg_rom,
            chr_rom: vec![0; 0x2000],
            trainer: None,
            hint_screen: None,
        }
    }

    #[test]
    fn system_resets_pc_from_vector() {
        let mut prg_rom = vec![0xEA; 0x4000];
        prg_rom[0x3FFC] = 0x00;
        prg_rom[0x3FFD] = 0x80;

        let system = NesSystem::from_cartridge(&cart_with_prg(prg_rom)).unwrap();
        assert_eq!(system.cpu().pc(), 0x8000);
    }

    #[test]
    fn run_step_executes_one_instruction_at_a_time() {
        let mut prg_rom = vec![0xEA; 0x4000];
        prg_rom[0] = 0xA9; // LDA #$42
        prg_rom[1] = 0x42;
        prg_rom[2] = 0x85; // STA $00
        prg_rom[3] = 0x00;
        prg_rom[0x3FFC] = 0x00;
        prg_rom[0x3FFD] = 0x80;

        let mut system = NesSystem::from_cartridge(&cart_with_prg(prg_rom)).unwrap();

        system.run_step().unwrap();
        assert_eq!(system.cpu().a(), 0x42);

        system.run_step().unwrap();
        assert_eq!(system.read_memory(0x00), 0x42);
    }
}
