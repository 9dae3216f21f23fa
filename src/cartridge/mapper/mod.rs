//! Cartridge mappers: projection of PRG/CHR ROM into the address spaces.
//!
//! Each mapper id has one [`mapper::Mapper`] implementation, looked up through a registry
//! table. Mapper0 (NROM) is the only board registered.

use crate::error::{EmuError, Result};

pub mod mapper;

pub mod mapper0;

use mapper::Mapper;
use mapper0::Mapper0;

type MapperCtor = fn() -> Box<dyn Mapper>;

fn nrom() -> Box<dyn Mapper> {
    Box::new(Mapper0::new())
}

/// Registered banking strategies, keyed by iNES mapper number.
const REGISTRY: &[(u8, MapperCtor)] = &[(0, nrom)];

/// Build the mapper registered for `id`.
pub fn mapper_for(id: u8) -> Result<Box<dyn Mapper>> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == id)
        .map(|(_, ctor)| ctor())
        .ok_or(EmuError::MapperUnsupported(id))
}

/// Mapper ids with a registered strategy.
pub fn supported_mappers() -> impl Iterator<Item = u8> {
    REGISTRY.iter().map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_nrom() {
        assert_eq!(mapper_for(0).unwrap().id(), 0);
        assert_eq!(supported_mappers().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn registry_rejects_unknown_ids() {
        for id in [1, 2, 4, 0xFF] {
            assert!(matches!(mapper_for(id), Err(EmuError::MapperUnsupported(got)) if got == id));
        }
    }
}
