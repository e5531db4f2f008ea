//! Storage abstraction: a strictly sequential byte medium.
//!
//! The persistence pipelines talk to the medium through this trait only.
//! The cursor is implicit and forward-only: no random access, no rewind
//! except via `erase`. That matches both streaming files and raw flash or
//! EEPROM, which only support ordered programming inside an erased region.
//!
//! `erase` is an *optional capability*: a backend that does not advertise it
//! via `can_erase` means "erase unsupported", never "erase is a no-op". The
//! save pipeline erases only when the capability is present, and treats a
//! failing erase as an I/O error.

pub mod file;
pub mod flash;
pub mod mem;

pub use file::FileStorage;
pub use flash::{FlashHooks, FlashStorage};
pub use mem::MemStorage;

use crate::errors::{PersistError, Result};

/// Sequential storage medium consumed by the save/load pipelines.
///
/// Contract for both transfer methods: the call succeeds atomically for the
/// whole span or fails without advancing the cursor; a partial transfer is a
/// backend bug, not an expressible outcome.
pub trait Storage {
    /// Append `data.len()` bytes at the implicit cursor.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Fill `buf` from the implicit cursor.
    fn read_all(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Whether this backend supports `erase`.
    fn can_erase(&self) -> bool {
        false
    }

    /// Reset the medium to a known blank state and the cursor to zero.
    /// Backends that return `true` from `can_erase` must override this.
    fn erase(&mut self) -> Result<()> {
        Err(PersistError::unsupported(
            "erase is not supported by this storage",
        ))
    }
}
