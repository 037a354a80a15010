//! Collaborator traits
//!
//! The core never touches hardware. Each platform supplies these four
//! primitives plus a [`crate::storage::ByteStore`]; keep implementations
//! thin, the decisions live in the core.

use crate::codec::TxCode;

/// One raw sample from the sensor collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Main channel (temperature)
    pub primary: f32,
    /// Second channel (humidity or second probe); NaN when absent
    pub secondary: f32,
    /// The driver completed the transfer
    pub ok: bool,
}

impl Reading {
    /// Successful two-channel reading
    pub const fn new(primary: f32, secondary: f32) -> Self {
        Self { primary, secondary, ok: true }
    }

    /// Successful reading from a single-channel sensor
    pub const fn single(primary: f32) -> Self {
        Self { primary, secondary: f32::NAN, ok: true }
    }

    /// The driver gave up (timeouts, checksum errors, no device)
    pub const fn failed() -> Self {
        Self { primary: f32::NAN, secondary: f32::NAN, ok: false }
    }
}

/// Sensor read procedure, including any bus-level retries
pub trait Sensor {
    /// Take one reading; report `ok = false` or NaN on irrecoverable failure
    fn read_sensor(&mut self) -> Reading;
}

/// Supply voltage measurement against the internal reference
pub trait SupplyMonitor {
    /// Single-shot supply voltage in millivolts
    fn read_supply_voltage_mv(&mut self) -> u32;
}

/// One-way radio
pub trait Transmitter {
    /// Power up the transmitter before the first code of a cycle
    fn enable(&mut self) {}

    /// Power down after the last code
    fn disable(&mut self) {}

    /// Send one code; may repeat internally, reports nothing back
    fn transmit(&mut self, code: TxCode);
}

/// Low-power sleep
pub trait Sleeper {
    /// Block for `count` fixed-length power-down quanta
    fn sleep_quanta(&mut self, count: u32);
}

/// Everything a wake cycle needs from the board, apart from storage
pub trait Hardware: Sensor + SupplyMonitor + Transmitter + Sleeper {}

impl<T: Sensor + SupplyMonitor + Transmitter + Sleeper> Hardware for T {}
