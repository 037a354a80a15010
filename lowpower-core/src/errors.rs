//! Error Types for Storage Access and Configuration
//!
//! ## Design Philosophy
//!
//! The node runs unattended on a battery budget, so errors are built for
//! embedded use first:
//!
//! 1. **Small Size**: every variant is a handful of integers or a
//!    `&'static str`. Errors are `Copy` and cheap to return.
//!
//! 2. **No Heap Allocation**: no `String`, no boxed sources. Memory use stays
//!    deterministic.
//!
//! 3. **Self-Healing First**: nothing here is fatal to the device. A sensor
//!    failure is not an error at all (it is a validation outcome, see
//!    [`crate::events::Outcome`]), and storage errors only ever degrade the
//!    cycle to its zeroed defaults.
//!
//! ## Error Categories
//!
//! ### Storage
//! - `OutOfBounds`: an access would leave the byte store. Slot computation is
//!   clamped before it reaches the store, so this only surfaces from a
//!   misconfigured capacity.
//! - `Device`: the platform store reported a failure.
//!
//! ### Configuration
//! - `CodeCollision`: an encodable value could reach the error-code range.
//! - `CodeOverflow`: an encoded value would not fit the 24-bit radio word.
//! - `Invalid`: any other inconsistent constant.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use lowpower_core::{NodeConfig, ConfigError};
//!
//! match NodeConfig::pond().validate() {
//!     Ok(()) => {}
//!     Err(ConfigError::CodeCollision { .. }) => {
//!         // Offsets too close to the error floor, fix the deployment table
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for byte store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Non-volatile storage errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Access outside the store's address range
    #[error("Access at {address} (+{len}) exceeds capacity {capacity}")]
    OutOfBounds {
        /// First byte of the attempted access
        address: u16,
        /// Number of bytes in the access
        len: u16,
        /// Capacity of the store in bytes
        capacity: u16,
    },

    /// Underlying device reported a failure
    #[error("Storage device error: {reason}")]
    Device {
        /// Short description from the platform layer
        reason: &'static str,
    },
}

/// Configuration errors, detected once at startup
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A channel's largest encoded value reaches the error floor
    #[error("Channel {channel} can encode {max_code}, error floor is {error_floor}")]
    CodeCollision {
        /// Channel name
        channel: &'static str,
        /// Largest code the channel can produce
        max_code: i64,
        /// First code reserved for errors
        error_floor: u32,
    },

    /// A code does not fit the 24-bit radio word (or is negative)
    #[error("Channel {channel} produces code {code} outside the 24-bit range")]
    CodeOverflow {
        /// Channel name
        channel: &'static str,
        /// Offending code
        code: i64,
    },

    /// Two channels produce overlapping code ranges
    #[error("Code ranges of {first} and {second} overlap")]
    OverlappingChannels {
        /// First channel name
        first: &'static str,
        /// Second channel name
        second: &'static str,
    },

    /// Any other inconsistent constant
    #[error("Invalid configuration: {reason}")]
    Invalid {
        /// What is wrong
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::OutOfBounds { address, len, capacity } =>
                defmt::write!(fmt, "Access {}+{} exceeds {}", address, len, capacity),
            Self::Device { reason } =>
                defmt::write!(fmt, "Storage device: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::CodeCollision { channel, max_code, error_floor } =>
                defmt::write!(fmt, "{} reaches {} >= floor {}", channel, max_code, error_floor),
            Self::CodeOverflow { channel, code } =>
                defmt::write!(fmt, "{} code {} not 24-bit", channel, code),
            Self::OverlappingChannels { first, second } =>
                defmt::write!(fmt, "{} overlaps {}", first, second),
            Self::Invalid { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}
