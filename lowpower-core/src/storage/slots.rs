//! Slot addressing for wear leveling
//!
//! The rotation byte at [`ROTATION_ADDRESS`] selects the current slot. Slot
//! `v` (1-based) starts at `size * v - (size - 1)`, so slot 1 sits right after
//! the rotation byte. Computation is bounds-checked: a slot that would run
//! past the end of the store clamps to slot 1 instead of touching foreign
//! memory.

use crate::constants::storage::{MAX_ROTATION, ROTATION_ADDRESS, UNFORMATTED_MARKERS};
use crate::errors::StorageResult;

use super::{ByteStore, PersistentRecord};

/// One resolved slot in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Rotation value that selected this slot
    pub rotation: u8,
    /// First byte of the record
    pub address: u16,
    /// Computation overflowed and fell back to the first slot
    pub clamped: bool,
}

/// Fixed-size table of record slots following the rotation byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTable {
    capacity: u16,
}

impl SlotTable {
    const RECORD_SIZE: u32 = PersistentRecord::SIZE as u32;

    /// Table over a store of `capacity` bytes
    pub const fn new(capacity: u16) -> Self {
        Self { capacity }
    }

    /// Store size this table was built for
    pub const fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Number of slots that fit completely after the rotation byte
    pub const fn slot_count(&self) -> u16 {
        if self.capacity == 0 {
            return 0;
        }
        ((self.capacity as u32 - 1) / Self::RECORD_SIZE) as u16
    }

    /// Slot 1, the fallback for every overflow
    pub const fn first(&self) -> Slot {
        Slot {
            rotation: 1,
            address: ROTATION_ADDRESS + 1,
            clamped: false,
        }
    }

    /// Resolve the slot for a rotation value
    ///
    /// Rotation 0 is treated as 1. Slots that would extend past the store
    /// clamp to [`SlotTable::first`] with `clamped` set.
    pub fn slot(&self, rotation: u8) -> Slot {
        let rotation = rotation.max(1);
        let address = Self::RECORD_SIZE * rotation as u32 - (Self::RECORD_SIZE - 1);

        if address + Self::RECORD_SIZE > self.capacity as u32 {
            return Slot {
                clamped: true,
                ..self.first()
            };
        }

        Slot {
            rotation,
            address: address as u16,
            clamped: false,
        }
    }

    /// Slot selected by the store's rotation byte
    ///
    /// Returns `(slot, is_fresh)`. A blank rotation byte (0 or 255) is
    /// formatted: slot 1 is zeroed first, then the rotation byte is set to 1
    /// with a single write. Factory bytes in slot 1 are never read back as a
    /// record, even when the formatting cycle saves nothing.
    pub fn current_slot<S: ByteStore>(&self, store: &mut S) -> StorageResult<(Slot, bool)> {
        let rotation = store.read_byte(ROTATION_ADDRESS)?;

        if UNFORMATTED_MARKERS.contains(&rotation) {
            let first = self.first();
            // Zero before marking formatted: a reset in between just reformats
            store.write_if_changed(first.address, &PersistentRecord::EMPTY.to_bytes())?;
            store.write_byte(ROTATION_ADDRESS, 1)?;
            node_info!("Blank store detected, formatted rotation counter");
            return Ok((self.first(), true));
        }

        let slot = self.slot(rotation);
        if slot.clamped {
            node_warn!("Rotation {} overflows the store, using first slot", rotation);
        }
        Ok((slot, false))
    }

    /// Move to the next slot after the current one wore out
    ///
    /// Increments the rotation byte (never past 254) and zeroes the new
    /// slot so stale bytes from an earlier pass are not read back as data.
    /// A clamped slot is left alone: it is slot 1, which holds live history.
    pub fn advance_slot<S: ByteStore>(&self, store: &mut S) -> StorageResult<Slot> {
        let current = store.read_byte(ROTATION_ADDRESS)?;
        let current = if UNFORMATTED_MARKERS.contains(&current) { 1 } else { current };
        let next = current.saturating_add(1).min(MAX_ROTATION);

        store.write_if_changed(ROTATION_ADDRESS, &[next])?;

        let slot = self.slot(next);
        if slot.clamped {
            node_warn!("Slot table exhausted at rotation {}", next);
        } else {
            store.write_if_changed(slot.address, &PersistentRecord::EMPTY.to_bytes())?;
            node_info!("Rotated to slot {} at address {}", next, slot.address);
        }
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn slot_addresses_follow_formula() {
        let table = SlotTable::new(1024);
        assert_eq!(table.slot(1).address, 1);
        assert_eq!(table.slot(2).address, 13);
        assert_eq!(table.slot(3).address, 25);
        assert_eq!(table.slot(85).address, 1009);
    }

    #[test]
    fn slot_count_for_atmega_eeprom() {
        assert_eq!(SlotTable::new(1024).slot_count(), 85);
        assert_eq!(SlotTable::new(13).slot_count(), 1);
        assert_eq!(SlotTable::new(0).slot_count(), 0);
    }

    #[test]
    fn overflowing_slot_clamps_to_first() {
        let table = SlotTable::new(1024);
        let slot = table.slot(86);
        assert!(slot.clamped);
        assert_eq!(slot.address, 1);

        let slot = table.slot(254);
        assert!(slot.clamped);
        assert_eq!(slot.address, table.first().address);
    }

    #[test]
    fn last_slot_fits_exactly() {
        // 1 + 2 * 12 = 25 bytes: two slots, the second ends on the last byte
        let table = SlotTable::new(25);
        assert_eq!(table.slot_count(), 2);
        assert!(!table.slot(2).clamped);
        assert!(table.slot(3).clamped);
    }

    #[test]
    fn blank_store_formats_once() {
        let mut store = MemoryStore::<64>::new();
        let table = SlotTable::new(store.capacity());

        let (slot, fresh) = table.current_slot(&mut store).unwrap();
        assert!(fresh);
        assert_eq!(slot, table.first());
        assert_eq!(store.as_bytes()[0], 1);
        assert_eq!(store.cell_writes(0), 1);

        let (_, fresh) = table.current_slot(&mut store).unwrap();
        assert!(!fresh);
        assert_eq!(store.cell_writes(0), 1);
    }

    #[test]
    fn formatting_zeroes_first_slot() {
        for blank in [0x00, 0xFF] {
            let mut store = MemoryStore::<64>::filled(blank);
            let table = SlotTable::new(store.capacity());
            table.current_slot(&mut store).unwrap();

            let mut raw = [0u8; PersistentRecord::SIZE];
            store.read(1, &mut raw).unwrap();
            assert_eq!(PersistentRecord::from_bytes(&raw), PersistentRecord::EMPTY);
        }
    }

    #[test]
    fn zero_rotation_is_blank_too() {
        let mut store = MemoryStore::<64>::filled(0x00);
        let table = SlotTable::new(store.capacity());

        let (_, fresh) = table.current_slot(&mut store).unwrap();
        assert!(fresh);
        assert_eq!(store.as_bytes()[0], 1);
    }

    #[test]
    fn advance_zeroes_next_slot() {
        let mut store = MemoryStore::<64>::new();
        let table = SlotTable::new(store.capacity());
        table.current_slot(&mut store).unwrap();

        let slot = table.advance_slot(&mut store).unwrap();
        assert_eq!(slot.rotation, 2);
        assert_eq!(slot.address, 13);
        assert_eq!(store.as_bytes()[0], 2);

        let mut raw = [0u8; PersistentRecord::SIZE];
        store.read(slot.address, &mut raw).unwrap();
        assert_eq!(PersistentRecord::from_bytes(&raw), PersistentRecord::EMPTY);
    }

    #[test]
    fn advance_past_table_leaves_first_slot_intact() {
        // Room for exactly two slots
        let mut store = MemoryStore::<25>::new();
        let table = SlotTable::new(store.capacity());
        store.write_byte(ROTATION_ADDRESS, 2).unwrap();
        let live = PersistentRecord { write_counter: 7, ..PersistentRecord::EMPTY };
        store.write_if_changed(1, &live.to_bytes()).unwrap();

        let slot = table.advance_slot(&mut store).unwrap();
        assert!(slot.clamped);

        let mut raw = [0u8; PersistentRecord::SIZE];
        store.read(1, &mut raw).unwrap();
        assert_eq!(PersistentRecord::from_bytes(&raw), live);
    }

    #[test]
    fn rotation_never_reaches_blank_marker() {
        let mut store = MemoryStore::<64>::new();
        let table = SlotTable::new(store.capacity());
        store.write_byte(ROTATION_ADDRESS, MAX_ROTATION).unwrap();

        table.advance_slot(&mut store).unwrap();
        assert_eq!(store.as_bytes()[0], MAX_ROTATION);

        let (_, fresh) = table.current_slot(&mut store).unwrap();
        assert!(!fresh);
    }
}
