//! Core logic for a battery-powered radio sensor node
//!
//! The node wakes, measures, decides whether to trust the measurement, sends
//! it as a 24-bit code over a one-way radio, and sleeps. This crate holds
//! everything that is not hardware:
//!
//! - a wear-leveled record store that survives power cycles
//! - the validation state machine that filters glitches and sensor failures
//! - the code encoder and the cycle orchestration around them
//!
//! Key constraints:
//! - Runs on an ATmega-class MCU (2KB RAM, 1KB EEPROM)
//! - No heap allocation
//! - No clock: time is counted in sleep quanta
//!
//! ```no_run
//! use lowpower_core::{NodeConfig, SensorNode};
//! use lowpower_core::storage::MemoryStore;
//! # use lowpower_core::codec::TxCode;
//! # use lowpower_core::traits::*;
//! # struct Board;
//! # impl Sensor for Board { fn read_sensor(&mut self) -> Reading { Reading::new(21.0, 40.0) } }
//! # impl SupplyMonitor for Board { fn read_supply_voltage_mv(&mut self) -> u32 { 3000 } }
//! # impl Transmitter for Board { fn transmit(&mut self, _: TxCode) {} }
//! # impl Sleeper for Board { fn sleep_quanta(&mut self, _: u32) {} }
//!
//! let mut node = SensorNode::new(NodeConfig::bath(), Board, MemoryStore::<1024>::new())?;
//! node.run();
//! # Ok::<(), lowpower_core::ConfigError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod codec;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod errors;
pub mod events;
pub mod storage;
pub mod traits;
pub mod validators;

// Public API
pub use codec::{Encoder, TxCode};
pub use config::{Deployment, NodeConfig};
pub use cycle::{CycleReport, SensorNode};
pub use errors::{ConfigError, ConfigResult, StorageError, StorageResult};
pub use events::{CycleDecision, Outcome, SleepDuration};
pub use storage::{ByteStore, PersistentRecord, RecordStore};
pub use traits::{Hardware, Reading};
pub use validators::{MeasurementValidator, ValidatorState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
