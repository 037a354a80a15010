//! Constants for the Low-Power Node Core
//!
//! Every numeric design constant lives here with its unit and rationale.
//! Deployment-specific values (offsets, error codes) are grouped per site in
//! [`codes`]; everything else applies to all deployments.
//!
//! ## Organization
//!
//! - **Storage**: EEPROM geometry, record layout and the wear ceiling
//! - **Codes**: radio code offsets, error codes and the error floor
//! - **Timing**: sleep durations and power-down quanta
//! - **Sensors**: physical ranges and drop-detection thresholds
//!
//! ## Usage Guidelines
//!
//! 1. Use these constants instead of magic numbers
//! 2. Include units in names
//! 3. Deployment presets in [`crate::config`] are the only place that picks
//!    between site-specific values

/// EEPROM geometry and wear-leveling limits.
pub mod storage;

/// Radio code offsets and error codes per deployment.
pub mod codes;

/// Sleep durations and quantization.
pub mod timing;

/// Sensor ranges and drop-detection parameters.
pub mod sensors;

pub use codes::{CODE_BITS, ERROR_CODE_FLOOR, MAX_CODE, SUPPLY_MAX_MV};
pub use sensors::{DROP_THRESHOLD_UNITS, ESCALATION_LIMIT};
pub use storage::{
    EEPROM_CAPACITY_BYTES, MAX_ROTATION, MAX_WRITES_PER_SLOT, RECORD_SIZE_BYTES, ROTATION_ADDRESS,
    UNFORMATTED_MARKERS,
};
pub use timing::{NORMAL_SLEEP_SECS, SHORT_SLEEP_SECS, SLEEP_QUANTUM_SECS};
