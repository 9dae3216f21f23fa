//! Mapper trait: how a cartridge's ROM lands in the console's address spaces.

use crate::{
    bus::AddressSpaces,
    cartridge::cartridge::{Cartridge, InesHeader},
    error::Result,
};

/// Trait for cartridge mappers. One implementation per mapper id, registered in
/// [`crate::cartridge::mapper::mapper_for`].
pub trait Mapper {
    /// iNES mapper number this strategy implements.
    fn id(&self) -> u8;

    /// Reject bank layouts this board cannot carry. Called once at load time.
    fn validate(&self, _header: &InesHeader) -> Result<()> {
        Ok(())
    }

    /// Copy PRG ROM into CPU space and CHR ROM into PPU space.
    fn project(&self, cart: &Cartridge, spaces: AddressSpaces<'_>);
}
