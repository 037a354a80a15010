//! Wake cycle orchestration
//!
//! One call to [`SensorNode::run_cycle`] is one wake of the device:
//!
//! ```text
//! enable radio
//!   → send supply voltage
//!   → load record (re-derive slot)
//!   → read sensor
//!   → validate
//!   → persist update
//!   → send decision's codes
//! disable radio
//!   → sleep N quanta
//! ```
//!
//! The node keeps no data of its own between cycles. The validator's
//! escalation counter is the one piece of volatile state, and it is owned
//! explicitly here rather than hidden in a static.

use heapless::Vec;

use crate::codec::{self, Encoder, TxCode};
use crate::config::NodeConfig;
use crate::errors::{ConfigResult, StorageError};
use crate::events::{CycleDecision, MAX_TRANSMISSIONS};
use crate::storage::{ByteStore, PersistentRecord, RecordStore};
use crate::traits::Hardware;
use crate::validators::{MeasurementValidator, ValidatorState};

/// Codes sent in one cycle: voltage plus the decision's entries
pub const MAX_CYCLE_CODES: usize = MAX_TRANSMISSIONS + 1;

/// Summary of one completed cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Validator decision
    pub decision: CycleDecision,
    /// Codes handed to the radio, in order
    pub codes: Vec<TxCode, MAX_CYCLE_CODES>,
    /// Record as it stands after the cycle
    pub record: PersistentRecord,
    /// Quanta slept
    pub quanta: u32,
    /// Save failed; the cycle otherwise completed
    pub storage_error: Option<StorageError>,
}

/// The sensor node: hardware, storage and decision logic
pub struct SensorNode<H: Hardware, S: ByteStore> {
    config: NodeConfig,
    hardware: H,
    records: RecordStore<S>,
    validator: MeasurementValidator,
    encoder: Encoder,
}

impl<H: Hardware, S: ByteStore> SensorNode<H, S> {
    /// Assemble a node after checking the configuration
    pub fn new(config: NodeConfig, hardware: H, store: S) -> ConfigResult<Self> {
        Self::with_state(config, hardware, store, ValidatorState::new())
    }

    /// Assemble a node resuming from a known validator state
    pub fn with_state(
        config: NodeConfig,
        hardware: H,
        store: S,
        state: ValidatorState,
    ) -> ConfigResult<Self> {
        config.validate()?;
        node_info!("Node starting, deployment {}", config.deployment.name());

        Ok(Self {
            records: RecordStore::new(store, &config.storage),
            validator: MeasurementValidator::with_state(&config, state),
            encoder: Encoder::new(config.error_floor),
            config,
            hardware,
        })
    }

    /// Run one wake cycle to completion, including the sleep
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut codes = Vec::new();

        self.hardware.enable();

        let millivolts = self.hardware.read_supply_voltage_mv();
        let voltage = self.encoder.encode_voltage(millivolts, &self.config.voltage);
        self.send(voltage, &mut codes);

        let record = self.records.load();
        let reading = self.hardware.read_sensor();
        let decision = self.validator.validate(&reading, &record);
        node_info!(
            "Cycle outcome {} (primary {}, escalation {})",
            decision.outcome.name(),
            reading.primary,
            self.validator.state().escalation()
        );

        let (record, storage_error) = self.persist(&decision, record);

        for transmission in &decision.transmissions {
            let code = self.encoder.encode_transmission(transmission, &self.config);
            self.send(code, &mut codes);
        }

        self.hardware.disable();

        let quanta = self.config.sleep.quanta(decision.sleep);
        node_debug!("Sleeping {} quanta", quanta);
        self.hardware.sleep_quanta(quanta);

        CycleReport {
            decision,
            codes,
            record,
            quanta,
            storage_error,
        }
    }

    /// Run cycles forever
    pub fn run(&mut self) -> ! {
        loop {
            self.run_cycle();
        }
    }

    fn send(&mut self, code: TxCode, sent: &mut Vec<TxCode, MAX_CYCLE_CODES>) {
        codec::transmit(&mut self.hardware, code);
        // Capacity covers voltage plus every decision entry
        let _ = sent.push(code);
    }

    fn persist(
        &mut self,
        decision: &CycleDecision,
        record: PersistentRecord,
    ) -> (PersistentRecord, Option<StorageError>) {
        let Some((next, drop_event)) = decision.update.apply(&record) else {
            return (record, None);
        };

        match self.records.save(&next, drop_event) {
            Ok(written) => (written, None),
            Err(e) => {
                node_warn!("Record save failed, continuing without it");
                (record, Some(e))
            }
        }
    }

    /// Active configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Board collaborators
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Board collaborators, mutable (scripting in simulation)
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    /// Persistent record store
    pub fn records(&self) -> &RecordStore<S> {
        &self.records
    }

    /// Validator's volatile state
    pub fn validator_state(&self) -> ValidatorState {
        self.validator.state()
    }

    /// Simulate a reset: volatile state is lost, storage survives
    pub fn reset(&mut self) {
        node_info!("Reset, dropping volatile state");
        self.validator = MeasurementValidator::new(&self.config);
    }

    /// Split into hardware and byte store
    pub fn into_parts(self) -> (H, S) {
        (self.hardware, self.records.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::codes;
    use crate::events::{Outcome, SleepDuration};
    use crate::storage::MemoryStore;
    use crate::traits::{Reading, Sensor, Sleeper, SupplyMonitor, Transmitter};

    #[derive(Default)]
    struct Board {
        reading: Option<Reading>,
        enabled: bool,
        sent_while_disabled: bool,
        slept: u32,
    }

    impl Sensor for Board {
        fn read_sensor(&mut self) -> Reading {
            self.reading.unwrap_or(Reading::failed())
        }
    }

    impl SupplyMonitor for Board {
        fn read_supply_voltage_mv(&mut self) -> u32 {
            3_000
        }
    }

    impl Transmitter for Board {
        fn enable(&mut self) {
            self.enabled = true;
        }

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn transmit(&mut self, _code: TxCode) {
            self.sent_while_disabled |= !self.enabled;
        }
    }

    impl Sleeper for Board {
        fn sleep_quanta(&mut self, count: u32) {
            self.slept += count;
        }
    }

    fn node(reading: Reading) -> SensorNode<Board, MemoryStore<1024>> {
        let board = Board { reading: Some(reading), ..Board::default() };
        SensorNode::new(NodeConfig::bath(), board, MemoryStore::new()).unwrap()
    }

    #[test]
    fn first_cycle_sends_voltage_then_values() {
        let mut node = node(Reading::new(21.3, 45.0));
        let report = node.run_cycle();

        let codes: Vec<u32, MAX_CYCLE_CODES> = report.codes.iter().map(TxCode::value).collect();
        assert_eq!(codes.as_slice(), &[153_000, 110_450, 130_613]);
        assert_eq!(report.decision.outcome, Outcome::Accepted);
        assert_eq!(report.quanta, 75);
        assert_eq!(report.record.last_temperature, Some(21.3));
        assert_eq!(report.record.write_counter, 1);
        assert!(!node.hardware().sent_while_disabled);
        assert!(!node.hardware().enabled);
    }

    #[test]
    fn failed_read_still_reports_voltage() {
        let mut node = node(Reading::failed());
        let report = node.run_cycle();

        assert_eq!(report.codes.len(), 1);
        assert_eq!(report.decision.sleep, SleepDuration::Short);
        assert_eq!(report.quanta, 7);
        assert_eq!(node.hardware().slept, 7);

        let report = node.run_cycle();
        assert_eq!(report.codes.last().map(TxCode::value), Some(codes::bath::ERROR));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = NodeConfig::bath();
        config.primary.offset = 999_500;
        assert!(SensorNode::new(config, Board::default(), MemoryStore::<1024>::new()).is_err());
    }

    #[test]
    fn reset_clears_escalation() {
        let mut node = node(Reading::failed());
        node.run_cycle();
        assert_eq!(node.validator_state().escalation(), 1);
        node.reset();
        assert_eq!(node.validator_state().escalation(), 0);
    }
}
