//! EEPROM Geometry and Wear Limits
//!
//! Values for the ATmega328P's 1 KiB EEPROM. Other targets override the
//! capacity through [`crate::config::StorageConfig`].

/// Total EEPROM size (bytes).
///
/// Source: ATmega328P datasheet, 1024 bytes of EEPROM
pub const EEPROM_CAPACITY_BYTES: u16 = 1024;

/// Address of the slot rotation counter (single byte).
pub const ROTATION_ADDRESS: u16 = 0;

/// Serialized size of one persistent record (bytes).
///
/// `u16` write counter + two `f32` values + `u16` drop counter.
pub const RECORD_SIZE_BYTES: u16 = 12;

/// Rotation byte values that mark an unformatted store.
///
/// A factory-fresh EEPROM reads 0xFF; a chip-erase with EESAVE may leave 0x00.
pub const UNFORMATTED_MARKERS: [u8; 2] = [0x00, 0xFF];

/// Highest rotation value ever written.
///
/// 255 would read back as "unformatted" on the next wake.
pub const MAX_ROTATION: u8 = 254;

/// Writes to one slot before rotating to the next (cycles).
///
/// The datasheet rates each cell for 100k erase/write cycles; 30k leaves a
/// wide margin. At ~10 writes per hour (~86k per year) this consumes about
/// three slots a year, so 85 slots last well past the battery's service life.
pub const MAX_WRITES_PER_SLOT: u16 = 30_000;
