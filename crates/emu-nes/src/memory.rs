//! Unified CPU/PPU memory fabric.
//!
//! Addresses are decoded by match arms into one of a handful of backing
//! buffers rather than modeled as a 64Ki array of byte-cell references.
//! Mirrors collapse at decode time via bitmasking, which is cheaper than
//! alias setup and still satisfies "every alias observes every write",
//! since the mask always routes back to the same backing cell.

use crate::cartridge::Cartridge;
use crate::cpu::CpuMemory;
use crate::mapper::{self, Mapper};
use crate::ppu::Ppu;
use emu_core::Result;
use tracing::trace;

/// Nametable mirroring mode used by the PPU's address decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NametableMirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

impl Default for NametableMirroring {
    fn default() -> Self {
        NametableMirroring::Horizontal
    }
}

/// Scratch CPU-side map a mapper installs program banks into.
pub struct CpuMap {
    pub prg_rom: Vec<u8>,
}

impl CpuMap {
    pub fn new() -> Self {
        Self {
            prg_rom: vec![0; 0x8000],
        }
    }
}

/// Scratch PPU-side map a mapper installs character banks into.
pub struct PpuMap {
    pub chr: Vec<u8>,
    pub mirroring: NametableMirroring,
}

impl PpuMap {
    pub fn new() -> Self {
        Self {
            chr: vec![0; 0x2000],
            mirroring: NametableMirroring::default(),
        }
    }
}

/// The memory fabric the CPU drives directly. Owns the PPU outright — there
/// is no CPU/PPU cross-reference to manage, since the PPU is only ever
/// reached through this fabric's narrow interface.
pub struct MemoryFabric {
    ram: Vec<u8>,
    expansion: Vec<u8>,
    sram: Vec<u8>,
    prg_rom: Vec<u8>,
    prg_shadow: Vec<u8>,
    mapper: Box<dyn Mapper>,
    ppu: Ppu,
    pending_dma_cycles: u32,
}

impl MemoryFabric {
    pub fn new(cart: &Cartridge) -> Result<Self> {
        let mut cpu_map = CpuMap::new();
        let mut ppu_map = PpuMap::new();
        let mut mapper = mapper::for_mapper_id(cart.header.mapper)?;
        mapper.install(cart, &mut cpu_map, &mut ppu_map)?;

        Ok(Self {
            ram: vec![0; 0x0800],
            expansion: vec![0; 0x2000],
            sram: vec![0; 0x2000],
            prg_rom: cpu_map.prg_rom,
            prg_shadow: vec![0; 0x8000],
            mapper,
            ppu: Ppu::new(ppu_map.chr, ppu_map.mirroring),
            pending_dma_cycles: 0,
        })
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    /// Swap in a caller-supplied pixel sink, replacing the default
    /// in-memory `FrameBuffer`.
    pub fn set_display(&mut self, display: Box<dyn crate::display::Display>) {
        self.ppu.set_display(display);
    }

    /// Read a byte from the CPU's address space. Ticks the PPU by exactly 3
    /// dots before computing the returned byte, per the ordering guarantee
    /// that every access must tick before its data-visible effect.
    pub fn read_cpu(&mut self, addr: u16) -> u8 {
        self.ppu.tick(3);
        self.decode_read(addr)
    }

    /// Write a byte into the CPU's address space. Ticks the PPU by exactly
    /// 3 dots first, then applies the store (and, for `$4014`, triggers OAM
    /// DMA on top of the normal byte store).
    pub fn write_cpu(&mut self, addr: u16, byte: u8) {
        self.ppu.tick(3);
        self.decode_write(addr, byte);
        if addr == 0x4014 {
            let dots = self.oam_dma(byte);
            self.pending_dma_cycles += dots;
        }
    }

    /// Any OAM DMA cycles triggered by a write since the last call, reset to
    /// zero on read. The driving `Cpu::step` folds this into its returned
    /// cycle count.
    pub fn take_pending_dma_cycles(&mut self) -> u32 {
        std::mem::take(&mut self.pending_dma_cycles)
    }

    /// Copy 256 bytes from `page*0x100 + i` into `OAM[(OAMADDR+i) mod 256]`.
    /// Ticks the PPU 2 dots per byte plus 1 trailing dot (513 total) and
    /// returns the number of CPU cycles the transfer stalls for.
    pub fn oam_dma(&mut self, page: u8) -> u32 {
        trace!(page, "OAM DMA");
        let base = (page as u16) << 8;
        let oam_addr = self.ppu.oam_addr;
        for i in 0u16..256 {
            let byte = self.decode_read(base + i);
            let dest = oam_addr.wrapping_add(i as u8);
            self.ppu.oam[dest as usize] = byte;
            self.ppu.tick(2);
        }
        self.ppu.tick(1);
        513
    }

    fn decode_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            0x2000..=0x3FFF => self.ppu.read_register((addr & 0x0007) as u8),
            0x4000..=0x5FFF => self.expansion[(addr - 0x4000) as usize],
            0x6000..=0x7FFF => self.sram[(addr - 0x6000) as usize],
            0x8000..=0xFFFF => self.prg_rom[(addr - 0x8000) as usize],
        }
    }

    fn decode_write(&mut self, addr: u16, byte: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = byte,
            0x2000..=0x3FFF => self.ppu.write_register((addr & 0x0007) as u8, byte),
            0x4000..=0x5FFF => self.expansion[(addr - 0x4000) as usize] = byte,
            0x6000..=0x7FFF => self.sram[(addr - 0x6000) as usize] = byte,
            0x8000..=0xFFFF => {
                self.prg_shadow[(addr - 0x8000) as usize] = byte;
                self.mapper.notify_write(addr, byte);
            }
        }
    }
}

impl CpuMemory for MemoryFabric {
    fn read(&mut self, addr: u16) -> u8 {
        self.read_cpu(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write_cpu(addr, value)
    }

    fn take_pending_dma_cycles(&mut self) -> u32 {
        MemoryFabric::take_pending_dma_cycles(self)
    }

    fn nmi_line(&self) -> bool {
        self.ppu.nmi_line()
    }

    fn clear_nmi(&mut self) {
        self.ppu.clear_nmi();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::{AuxFlags, INesHeader, Mirroring, TvStandard};

    fn test_cart() -> Cartridge {
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
            prg_rom: vec![0xEA; 0x4000],
            chr_rom: vec![0; 0x2000],
            trainer: None,
            hint_screen: None,
        }
    }

    #[test]
    fn ram_basic_read_write() {
        let mut fabric = MemoryFabric::new(&test_cart()).unwrap();
        fabric.write_cpu(0x0010, 0x42);
        assert_eq!(fabric.read_cpu(0x0010), 0x42);
    }

    #[test]
    fn ram_mirrors_every_access() {
        let mut fabric = MemoryFabric::new(&test_cart()).unwrap();
        fabric.write_cpu(0x0010, 0x99);
        assert_eq!(fabric.read_cpu(0x0810), 0x99);
        assert_eq!(fabric.read_cpu(0x1010), 0x99);
        assert_eq!(fabric.read_cpu(0x1810), 0x99);
    }

    #[test]
    fn every_access_ticks_ppu_three_dots() {
        let mut fabric = MemoryFabric::new(&test_cart()).unwrap();
        let before = fabric.ppu().absolute_dot();
        fabric.read_cpu(0x0000);
        assert_eq!(fabric.ppu().absolute_dot() - before, 3);
        let before = fabric.ppu().absolute_dot();
        fabric.write_cpu(0x0000, 1);
        assert_eq!(fabric.ppu().absolute_dot() - before, 3);
    }

    #[test]
    fn single_bank_prg_mirrored_into_both_halves() {
        let mut fabric = MemoryFabric::new(&test_cart()).unwrap();
        assert_eq!(fabric.read_cpu(0x8000), 0xEA);
        assert_eq!(fabric.read_cpu(0xC000), 0xEA);
    }

    #[test]
    fn prg_rom_writes_redirect_to_shadow_without_mutating_rom() {
        let mut fabric = MemoryFabric::new(&test_cart()).unwrap();
        fabric.write_cpu(0x8000, 0xFF);
        assert_eq!(fabric.read_cpu(0x8000), 0xEA);
    }

    #[test]
    fn oam_dma_copies_256_bytes_and_reports_513_cycles() {
        let mut fabric = MemoryFabric::new(&test_cart()).unwrap();
        for i in 0u16..256 {
            fabric.write_cpu(0x0200 + i, i as u8);
        }
        let cycles = fabric.oam_dma(0x02);
        assert_eq!(cycles, 513);
        for i in 0u16..256 {
            assert_eq!(fabric.ppu().oam[i as usize], i as u8);
        }
    }
}
