//! Radio Code Offsets and Error Codes
//!
//! The gateway receives a single 24-bit integer per transmission. The value
//! is split into decimal "bands": each deployment and quantity owns one band,
//! and the scaled measurement is added to the band's offset. A 24°C reading
//! on the bath sensor becomes `240 + 130_400 = 130_640`.
//!
//! Temperature offsets carry an extra `+400` (DHT22) or `+550` (DS18B20) so
//! the sensor's lowest temperature still encodes to the band's base.
//!
//! Error codes use the pattern `9999XY`: X is the board (0-9), Y the sensor on
//! that board (0-9). Everything from [`ERROR_CODE_FLOOR`] upwards is an error
//! code and is sent without scaling or offset.

/// First code reserved for error indicators.
pub const ERROR_CODE_FLOOR: u32 = 999_900;

/// Width of a radio code (bits).
///
/// Source: RCSwitch protocol 1, 24-bit frames
pub const CODE_BITS: u32 = 24;

/// Largest representable radio code.
pub const MAX_CODE: u32 = (1 << CODE_BITS) - 1;

/// Upper bound used when checking the voltage band (millivolts).
///
/// Three AA cells fresh from the pack stay below 5 V.
pub const SUPPLY_MAX_MV: u32 = 5_000;

/// Codes for the bathroom node (DHT22).
pub mod bath {
    /// Humidity band
    pub const HUMIDITY: u32 = 110_000;
    /// Temperature band
    pub const TEMPERATURE: u32 = 130_400;
    /// Supply voltage band
    pub const VOLTAGE: u32 = 150_000;
    /// Board 0, sensor 1
    pub const ERROR: u32 = 999_901;
}

/// Codes for the balcony node (DHT22).
pub mod balcony {
    /// Humidity band
    pub const HUMIDITY: u32 = 210_000;
    /// Temperature band
    pub const TEMPERATURE: u32 = 230_400;
    /// Supply voltage band
    pub const VOLTAGE: u32 = 250_000;
    /// Board 1, sensor 1
    pub const ERROR: u32 = 999_911;
}

/// Codes for the master bedroom node (DHT22).
pub mod master_bedroom {
    /// Humidity band
    pub const HUMIDITY: u32 = 310_000;
    /// Temperature band
    pub const TEMPERATURE: u32 = 330_400;
    /// Supply voltage band
    pub const VOLTAGE: u32 = 350_000;
    /// Board 2, sensor 1
    pub const ERROR: u32 = 999_921;
}

/// Codes for the pond node (two DS18B20 probes).
pub mod pond {
    /// Second probe band
    pub const TEMPERATURE_2: u32 = 410_550;
    /// First probe band
    pub const TEMPERATURE: u32 = 430_550;
    /// Supply voltage band
    pub const VOLTAGE: u32 = 450_000;
    /// Board 3, sensor 1
    pub const ERROR: u32 = 999_931;
    /// Board 3, sensor 2
    pub const ERROR_2: u32 = 999_932;
}
