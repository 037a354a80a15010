//! The persisted record and its byte layout

use crate::constants::storage::RECORD_SIZE_BYTES;

/// State that survives power cycles
///
/// Layout (little-endian, 12 bytes):
///
/// ```text
/// 0      2                6                10      12
/// ├──────┼────────────────┼────────────────┼───────┤
/// │write │ last primary   │ last secondary │ drops │
/// │ u16  │ f32 (NaN=none) │ f32 (NaN=none) │  u16  │
/// ```
///
/// "No value" is stored as NaN. An erased cell (0xFF) also decodes as NaN, so
/// a never-written slot yields `None` rather than garbage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistentRecord {
    /// Writes to this slot since it was zeroed
    pub write_counter: u16,
    /// Last accepted primary value (temperature)
    pub last_temperature: Option<f32>,
    /// Last accepted secondary value (humidity or second probe)
    pub last_humidity: Option<f32>,
    /// Lifetime count of suspected drops, diagnostic only
    pub drop_event_counter: u16,
}

impl PersistentRecord {
    /// Serialized size in bytes
    pub const SIZE: usize = RECORD_SIZE_BYTES as usize;

    /// Zeroed record written into freshly rotated slots
    pub const EMPTY: Self = Self {
        write_counter: 0,
        last_temperature: None,
        last_humidity: None,
        drop_event_counter: 0,
    };

    /// Encode into the on-storage layout
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..2].copy_from_slice(&self.write_counter.to_le_bytes());
        out[2..6].copy_from_slice(&encode_value(self.last_temperature));
        out[6..10].copy_from_slice(&encode_value(self.last_humidity));
        out[10..12].copy_from_slice(&self.drop_event_counter.to_le_bytes());
        out
    }

    /// Decode from the on-storage layout
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        Self {
            write_counter: u16::from_le_bytes([bytes[0], bytes[1]]),
            last_temperature: decode_value([bytes[2], bytes[3], bytes[4], bytes[5]]),
            last_humidity: decode_value([bytes[6], bytes[7], bytes[8], bytes[9]]),
            drop_event_counter: u16::from_le_bytes([bytes[10], bytes[11]]),
        }
    }

    /// Both stored values are present
    pub fn has_values(&self) -> bool {
        self.last_temperature.is_some() && self.last_humidity.is_some()
    }
}

impl Default for PersistentRecord {
    fn default() -> Self {
        Self::EMPTY
    }
}

fn encode_value(value: Option<f32>) -> [u8; 4] {
    value.unwrap_or(f32::NAN).to_le_bytes()
}

fn decode_value(bytes: [u8; 4]) -> Option<f32> {
    let value = f32::from_le_bytes(bytes);
    if value.is_nan() { None } else { Some(value) }
}
