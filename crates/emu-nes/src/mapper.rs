//! Cartridge bank-switch logic.
//!
//! Only the fixed/no-bankswitch mapper (iNES mapper 0, NROM) is supported.
//! Any other mapper id is rejected at install time with
//! [`EmulatorError::UnsupportedMapper`] so a bad cartridge never reaches
//! CPU/PPU construction.

use crate::cartridge::{Cartridge, Mirroring};
use crate::memory::{CpuMap, PpuMap};
use emu_core::{EmulatorError, Result};

const PRG_BANK_LEN: usize = 0x4000;
const CHR_BANK_LEN: usize = 0x2000;

/// Installs a cartridge's banks into the CPU and PPU memory maps, and
/// receives writes to `$8000-$FFFF` afterward.
pub trait Mapper {
    fn install(&mut self, cart: &Cartridge, cpu_map: &mut CpuMap, ppu_map: &mut PpuMap) -> Result<()>;

    /// Invoked by the Memory Fabric on every write to `$8000-$FFFF`.
    fn notify_write(&mut self, addr: u16, byte: u8);
}

/// Mapper 0 (NROM): one or two fixed 16KB PRG banks, one fixed 8KB CHR bank,
/// no runtime bank switching.
#[derive(Debug, Default)]
pub struct NromMapper;

impl Mapper for NromMapper {
    fn install(&mut self, cart: &Cartridge, cpu_map: &mut CpuMap, ppu_map: &mut PpuMap) -> Result<()> {
        if cart.header.mapper != 0 {
            return Err(EmulatorError::UnsupportedMapper(cart.header.mapper));
        }

        match cart.header.prg_rom_banks {
            1 => {
                cpu_map.prg_rom[0..PRG_BANK_LEN].copy_from_slice(&cart.prg_rom);
                cpu_map.prg_rom[PRG_BANK_LEN..2 * PRG_BANK_LEN].copy_from_slice(&cart.prg_rom);
            }
            2 => {
                cpu_map.prg_rom[0..2 * PRG_BANK_LEN].copy_from_slice(&cart.prg_rom);
            }
            n => {
                return Err(EmulatorError::MalformedCartridge(format!(
                    "NROM supports 1 or 2 PRG banks, found {n}"
                )))
            }
        }

        ppu_map.chr[0..CHR_BANK_LEN].copy_from_slice(&cart.chr_rom[0..CHR_BANK_LEN]);

        ppu_map.mirroring = match cart.header.mirroring {
            Mirroring::Horizontal => crate::memory::NametableMirroring::Horizontal,
            Mirroring::Vertical => crate::memory::NametableMirroring::Vertical,
            Mirroring::FourScreen => crate::memory::NametableMirroring::FourScreen,
        };

        Ok(())
    }

    fn notify_write(&mut self, _addr: u16, _byte: u8) {
        // Static mapping: nothing to do.
    }
}

/// Construct the mapper implementation for a given mapper id, or reject it.
pub fn for_mapper_id(id: u8) -> Result<Box<dyn Mapper>> {
    match id {
        0 => Ok(Box::new(NromMapper)),
        other => Err(EmulatorError::UnsupportedMapper(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::{AuxFlags, INesHeader, TvStandard};

    fn cart_with_banks(prg_banks: u8) -> Cartridge {
        Cartridge {
            header: INesHeader {
                prg_rom_banks: prg_banks,
                chr_rom_banks: 1,
                mapper: 0,
                mirroring: Mirroring::Horizontal,
                has_battery: false,
                has_trainer: false,
                prg_ram_banks: 0,
                tv_standard: TvStandard::Ntsc,
                aux: AuxFlags::default(),
            },
            prg_rom: vec![0xAB; prg_banks as usize * PRG_BANK_LEN],
            chr_rom: vec![0xCD; CHR_BANK_LEN],
            trainer: None,
            hint_screen: None,
        }
    }

    #[test]
    fn single_bank_mirrors_into_both_halves() {
        let cart = cart_with_banks(1);
        let mut cpu_map = CpuMap::new();
        let mut ppu_map = PpuMap::new();
        let mut mapper = NromMapper;
        mapper.install(&cart, &mut cpu_map, &mut ppu_map).unwrap();
        assert_eq!(cpu_map.prg_rom[0], 0xAB);
        assert_eq!(cpu_map.prg_rom[PRG_BANK_LEN], 0xAB);
    }

    #[test]
    fn two_banks_map_consecutively() {
        let cart = cart_with_banks(2);
        let mut cpu_map = CpuMap::new();
        let mut ppu_map = PpuMap::new();
        let mut mapper = NromMapper;
        mapper.install(&cart, &mut cpu_map, &mut ppu_map).unwrap();
        assert_eq!(cpu_map.prg_rom.len(), 2 * PRG_BANK_LEN);
    }

    #[test]
    fn unsupported_mapper_rejected_at_install() {
        let mut cart = cart_with_banks(1);
        cart.header.mapper = 4;
        let mut cpu_map = CpuMap::new();
        let mut ppu_map = PpuMap::new();
        let mut mapper = NromMapper;
        assert!(mapper.install(&cart, &mut cpu_map, &mut ppu_map).is_err());
    }

    #[test]
    fn for_mapper_id_rejects_unknown() {
        assert!(for_mapper_id(1).is_err());
        assert!(for_mapper_id(0).is_ok());
    }
}
