//! RAM-backed byte store
//!
//! Stands in for the EEPROM on the host: simulation, tests, and targets that
//! keep state in battery-backed RAM. Starts in the erased state (0xFF) like a
//! factory-fresh part and counts writes per cell, so wear can be asserted
//! directly.

use crate::errors::StorageResult;

use super::{check_bounds, ByteStore};

/// Fixed-size in-memory store with per-cell write accounting
///
/// `N` is the capacity in bytes and must not exceed `u16::MAX`.
///
/// ```rust
/// use lowpower_core::storage::{ByteStore, MemoryStore};
///
/// let mut store = MemoryStore::<1024>::new();
/// store.write_if_changed(10, &[1, 2, 3]).unwrap();
/// store.write_if_changed(10, &[1, 2, 4]).unwrap();
///
/// assert_eq!(store.cell_writes(10), 1); // unchanged byte skipped
/// assert_eq!(store.cell_writes(12), 2);
/// ```
#[derive(Clone)]
pub struct MemoryStore<const N: usize> {
    cells: [u8; N],
    writes: [u32; N],
}

impl<const N: usize> MemoryStore<N> {
    /// Erased store (every byte 0xFF)
    pub const fn new() -> Self {
        Self::filled(0xFF)
    }

    /// Store with every byte set to `value`
    pub const fn filled(value: u8) -> Self {
        Self {
            cells: [value; N],
            writes: [0; N],
        }
    }

    /// Store preloaded with an image; the rest stays erased
    pub fn from_image(image: &[u8]) -> Self {
        let mut store = Self::new();
        let len = image.len().min(N);
        store.cells[..len].copy_from_slice(&image[..len]);
        store
    }

    /// Raw contents
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.cells
    }

    /// Number of writes that changed or rewrote the cell at `address`
    pub fn cell_writes(&self, address: u16) -> u32 {
        self.writes.get(address as usize).copied().unwrap_or(0)
    }

    /// Highest write count of any single cell
    pub fn max_cell_writes(&self) -> u32 {
        self.writes.iter().copied().max().unwrap_or(0)
    }

    /// Sum of writes over all cells
    pub fn total_writes(&self) -> u64 {
        self.writes.iter().map(|&w| w as u64).sum()
    }

    fn put(&mut self, index: usize, byte: u8) {
        self.cells[index] = byte;
        self.writes[index] = self.writes[index].saturating_add(1);
    }
}

impl<const N: usize> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for MemoryStore<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("capacity", &N)
            .field("rotation", &self.cells.first())
            .field("max_cell_writes", &self.max_cell_writes())
            .finish()
    }
}

impl<const N: usize> ByteStore for MemoryStore<N> {
    fn capacity(&self) -> u16 {
        N.min(u16::MAX as usize) as u16
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> StorageResult<()> {
        check_bounds(self.capacity(), address, buf.len())?;
        let start = address as usize;
        buf.copy_from_slice(&self.cells[start..start + buf.len()]);
        Ok(())
    }

    fn write_if_changed(&mut self, address: u16, bytes: &[u8]) -> StorageResult<()> {
        check_bounds(self.capacity(), address, bytes.len())?;
        let start = address as usize;
        for (offset, &byte) in bytes.iter().enumerate() {
            if self.cells[start + offset] != byte {
                self.put(start + offset, byte);
            }
        }
        Ok(())
    }

    fn write_byte(&mut self, address: u16, byte: u8) -> StorageResult<()> {
        check_bounds(self.capacity(), address, 1)?;
        self.put(address as usize, byte);
        Ok(())
    }
}
