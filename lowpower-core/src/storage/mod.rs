//! Wear-Leveled Persistent State
//!
//! ## Overview
//!
//! The node keeps exactly one durable record: the last accepted values plus
//! two counters. It is rewritten up to every wake cycle, far more often than a
//! single EEPROM cell survives, so the record walks through a table of slots.
//!
//! ```text
//! EEPROM (1024 bytes)
//! ┌────┬──────────────┬──────────────┬─────┬──────────────┬────┐
//! │ R  │   slot 1     │   slot 2     │ ... │   slot 85    │ .. │
//! └────┴──────────────┴──────────────┴─────┴──────────────┴────┘
//!   0   1          12  13         24         1009     1020
//!   ↑
//!   └── rotation counter: which slot is current (1..=254, 0/255 = blank)
//! ```
//!
//! ## Layers
//!
//! - [`ByteStore`]: the platform primitive (EEPROM, flash emulation, RAM)
//! - [`SlotTable`]: maps the rotation counter to a bounds-checked [`Slot`]
//! - [`PersistentRecord`]: the typed record and its 12-byte layout
//! - [`RecordStore`]: load/save with rotation once a slot is worn
//!
//! ## Power Loss
//!
//! Every write lands one byte at a time. A reset between two bytes of a
//! record can leave it torn; that window is accepted. A reset between two
//! cycles loses nothing.

mod memory;
mod record;
mod slots;
mod store;

pub use memory::MemoryStore;
pub use record::PersistentRecord;
pub use slots::{Slot, SlotTable};
pub use store::RecordStore;

use crate::errors::{StorageError, StorageResult};

/// Non-volatile byte storage primitive
///
/// Implemented per platform. Every call is all-or-nothing with respect to
/// reads; torn writes on power loss are out of scope.
pub trait ByteStore {
    /// Size of the store in bytes
    fn capacity(&self) -> u16;

    /// Fill `buf` from `address` onwards
    fn read(&mut self, address: u16, buf: &mut [u8]) -> StorageResult<()>;

    /// Write `bytes` at `address`, skipping bytes that already hold the
    /// target value
    fn write_if_changed(&mut self, address: u16, bytes: &[u8]) -> StorageResult<()>;

    /// Write one byte unconditionally
    fn write_byte(&mut self, address: u16, byte: u8) -> StorageResult<()>;

    /// Read one byte
    fn read_byte(&mut self, address: u16) -> StorageResult<u8> {
        let mut buf = [0u8; 1];
        self.read(address, &mut buf)?;
        Ok(buf[0])
    }
}

impl<T: ByteStore + ?Sized> ByteStore for &mut T {
    fn capacity(&self) -> u16 {
        (**self).capacity()
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> StorageResult<()> {
        (**self).read(address, buf)
    }

    fn write_if_changed(&mut self, address: u16, bytes: &[u8]) -> StorageResult<()> {
        (**self).write_if_changed(address, bytes)
    }

    fn write_byte(&mut self, address: u16, byte: u8) -> StorageResult<()> {
        (**self).write_byte(address, byte)
    }

    fn read_byte(&mut self, address: u16) -> StorageResult<u8> {
        (**self).read_byte(address)
    }
}

/// Reject accesses that leave `[0, capacity)`
pub fn check_bounds(capacity: u16, address: u16, len: usize) -> StorageResult<()> {
    let end = address as usize + len;
    if end > capacity as usize {
        Err(StorageError::OutOfBounds {
            address,
            len: len.min(u16::MAX as usize) as u16,
            capacity,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_accept_exact_fit() {
        assert!(check_bounds(1024, 1012, 12).is_ok());
        assert!(check_bounds(1024, 1013, 12).is_err());
        assert!(check_bounds(1024, 1023, 1).is_ok());
        assert!(check_bounds(1024, 1024, 1).is_err());
    }
}
