mod dump;
mod error;
mod memory;

pub use crate::dump::Dump;
pub use crate::error::{MemoryError, Result};
pub use crate::memory::{Init, Memory};

/// An absolute address on the 16-bit Z80 address bus
pub type Address = u16;
pub type Byte = u8;

/// Width of one dump row in bytes
pub const PARAGRAPH: usize = 16;

/// The byte-level contract a CPU core needs from one mapped region of memory
pub trait Addressable {
    fn read(&self, address: Address) -> Result<Byte>;

    fn write(&mut self, address: Address, value: Byte) -> Result<()>;

    fn address_begin(&self) -> Address;

    fn address_end(&self) -> Address;

    /// Number of bytes the region holds
    fn size(&self) -> usize {
        self.address_end() as usize - self.address_begin() as usize + 1
    }

    /// Return true if `address` lies inside the inclusive window of this region
    fn contains(&self, address: Address) -> bool {
        (self.address_begin()..=self.address_end()).contains(&address)
    }
}
