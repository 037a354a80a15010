//! Shared fixtures for integration tests
//!
//! - [`ScriptedBoard`]: replays queued readings and records every code and
//!   sleep the node asks for
//! - store helpers that build EEPROM images with a record already in place

#![allow(dead_code)]

use std::collections::VecDeque;

use lowpower_core::storage::{MemoryStore, PersistentRecord};
use lowpower_core::traits::{Reading, Sensor, Sleeper, SupplyMonitor, Transmitter};
use lowpower_core::{CycleReport, NodeConfig, SensorNode, TxCode};

/// EEPROM size of the reference part
pub const EEPROM: usize = 1024;

/// Supply voltage every scripted board reports
pub const SUPPLY_MV: u32 = 3_000;

/// Node type used across the integration suites
pub type TestNode = SensorNode<ScriptedBoard, MemoryStore<EEPROM>>;

/// Board that replays readings and records its radio traffic
#[derive(Debug, Default)]
pub struct ScriptedBoard {
    readings: VecDeque<Reading>,
    /// Every code handed to the radio, across all cycles
    pub sent: Vec<u32>,
    /// Every sleep request, in quanta
    pub sleeps: Vec<u32>,
    /// Radio power state
    pub radio_on: bool,
    /// A code went out while the radio was powered down
    pub sent_while_off: bool,
}

impl ScriptedBoard {
    pub fn with_readings(readings: impl IntoIterator<Item = Reading>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn queue(&mut self, reading: Reading) {
        self.readings.push_back(reading);
    }
}

impl Sensor for ScriptedBoard {
    fn read_sensor(&mut self) -> Reading {
        self.readings.pop_front().unwrap_or_else(Reading::failed)
    }
}

impl SupplyMonitor for ScriptedBoard {
    fn read_supply_voltage_mv(&mut self) -> u32 {
        SUPPLY_MV
    }
}

impl Transmitter for ScriptedBoard {
    fn enable(&mut self) {
        self.radio_on = true;
    }

    fn disable(&mut self) {
        self.radio_on = false;
    }

    fn transmit(&mut self, code: TxCode) {
        self.sent_while_off |= !self.radio_on;
        self.sent.push(code.value());
    }
}

impl Sleeper for ScriptedBoard {
    fn sleep_quanta(&mut self, count: u32) {
        self.sleeps.push(count);
    }
}

/// Store image with the rotation byte at 1 and `record` in slot 1
pub fn seeded_store(record: &PersistentRecord) -> MemoryStore<EEPROM> {
    let mut image = [0u8; 1 + PersistentRecord::SIZE];
    image[0] = 1;
    image[1..].copy_from_slice(&record.to_bytes());
    MemoryStore::from_image(&image)
}

/// Record holding a two-channel baseline
pub fn baseline(temperature: f32, humidity: f32) -> PersistentRecord {
    PersistentRecord {
        write_counter: 100,
        last_temperature: Some(temperature),
        last_humidity: Some(humidity),
        drop_event_counter: 0,
    }
}

/// Node on a scripted board
pub fn node(config: NodeConfig, store: MemoryStore<EEPROM>) -> TestNode {
    SensorNode::new(config, ScriptedBoard::default(), store).expect("valid config")
}

/// Queue one reading and run one cycle
pub fn cycle(node: &mut TestNode, reading: Reading) -> CycleReport {
    node.hardware_mut().queue(reading);
    node.run_cycle()
}

/// Codes of one report as plain integers
pub fn codes(report: &CycleReport) -> Vec<u32> {
    report.codes.iter().map(TxCode::value).collect()
}

/// Bath preset with the secondary channel removed
pub fn single_channel_bath() -> NodeConfig {
    let mut config = NodeConfig::bath();
    config.secondary = None;
    config
}
