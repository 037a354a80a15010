//! Measurement validation state machine
//!
//! Decides, once per wake, whether a reading is trusted, whether it is a real
//! change, what gets persisted and how long to sleep. The only state carried
//! between cycles in RAM is the escalation counter in [`ValidatorState`];
//! everything else comes from the persisted record.

use crate::config::{ChannelConfig, DropPolicy, NodeConfig};
use crate::constants::sensors::ESCALATION_LIMIT;
use crate::events::{
    ChannelId, CycleDecision, Outcome, RecordUpdate, SleepDuration, Transmission,
};
use crate::storage::PersistentRecord;
use crate::traits::Reading;

use super::utils;

/// Volatile state carried from one cycle to the next
///
/// Lost on reset, which is intended: a cold boot starts with no pending
/// suspicion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorState {
    escalation: u8,
}

impl ValidatorState {
    /// Cold-boot state
    pub const fn new() -> Self {
        Self { escalation: 0 }
    }

    /// Consecutive anomalous cycles seen so far
    pub const fn escalation(&self) -> u8 {
        self.escalation
    }

    fn escalate(&mut self) {
        self.escalation = self.escalation.saturating_add(1);
    }

    fn reset(&mut self) {
        self.escalation = 0;
    }
}

/// Validates readings against the persisted baseline
///
/// ```rust
/// use lowpower_core::config::NodeConfig;
/// use lowpower_core::events::Outcome;
/// use lowpower_core::storage::PersistentRecord;
/// use lowpower_core::traits::Reading;
/// use lowpower_core::validators::MeasurementValidator;
///
/// let mut validator = MeasurementValidator::new(&NodeConfig::bath());
///
/// // Nothing stored yet: accepted unconditionally
/// let decision = validator.validate(&Reading::new(21.3, 45.0), &PersistentRecord::EMPTY);
/// assert_eq!(decision.outcome, Outcome::Accepted);
///
/// // First failure of an episode stays quiet
/// let decision = validator.validate(&Reading::failed(), &PersistentRecord::EMPTY);
/// assert_eq!(decision.outcome, Outcome::FailureSuppressed);
/// assert!(!decision.transmits());
/// ```
#[derive(Debug, Clone)]
pub struct MeasurementValidator {
    primary: ChannelConfig,
    secondary: Option<ChannelConfig>,
    policy: DropPolicy,
    state: ValidatorState,
}

impl MeasurementValidator {
    /// Validator in cold-boot state
    pub fn new(config: &NodeConfig) -> Self {
        Self::with_state(config, ValidatorState::new())
    }

    /// Validator resuming from a known state
    pub fn with_state(config: &NodeConfig, state: ValidatorState) -> Self {
        Self {
            primary: config.primary,
            secondary: config.secondary,
            policy: config.drop,
            state,
        }
    }

    /// Current volatile state
    pub fn state(&self) -> ValidatorState {
        self.state
    }

    /// Decide what to do with one reading
    pub fn validate(&mut self, reading: &Reading, record: &PersistentRecord) -> CycleDecision {
        if let Some(channel) = self.failing_channel(reading) {
            return self.on_failure(channel);
        }

        let baseline_missing = record.last_temperature.is_none()
            || (self.secondary.is_some() && record.last_humidity.is_none());
        if baseline_missing {
            node_info!("No stored baseline, accepting {}", reading.primary);
            return self.accept(reading, record, Outcome::Accepted);
        }

        if !self.is_drop(reading, record) {
            return self.accept(reading, record, Outcome::Accepted);
        }

        if self.state.escalation < ESCALATION_LIMIT {
            self.state.escalate();
            node_warn!("Suspected drop to {}, re-measuring", reading.primary);
            // Keep the old baseline, only count the event
            return CycleDecision::silent(
                Outcome::SuspectedDropFirstObservation,
                RecordUpdate::Store {
                    primary: record.last_temperature,
                    secondary: record.last_humidity,
                    drop_event: true,
                },
                SleepDuration::Short,
            );
        }

        node_info!("Drop to {} confirmed, new baseline", reading.primary);
        self.accept(reading, record, Outcome::SuspectedDropConfirmed)
    }

    fn failing_channel(&self, reading: &Reading) -> Option<ChannelId> {
        if !reading.ok || !self.primary.accepts(reading.primary) {
            return Some(ChannelId::Primary);
        }
        match &self.secondary {
            Some(channel) if !channel.accepts(reading.secondary) => {
                Some(ChannelId::Secondary)
            }
            _ => None,
        }
    }

    fn on_failure(&mut self, channel: ChannelId) -> CycleDecision {
        if self.state.escalation > 0 {
            self.state.reset();
            node_warn!("Sensor failure persisted, reporting");
            CycleDecision::silent(Outcome::SensorFailure, RecordUpdate::Skip, SleepDuration::Short)
                .with(Transmission::Fault { channel })
        } else {
            self.state.escalate();
            node_debug!("Sensor failure, waiting for a second one");
            CycleDecision::silent(
                Outcome::FailureSuppressed,
                RecordUpdate::Skip,
                SleepDuration::Short,
            )
        }
    }

    fn is_drop(&self, reading: &Reading, record: &PersistentRecord) -> bool {
        let primary = record
            .last_temperature
            .map(|persisted| (persisted, reading.primary));
        let secondary = self
            .secondary
            .and(record.last_humidity)
            .map(|persisted| (persisted, reading.secondary));

        utils::is_drop(&self.policy, primary.into_iter().chain(secondary))
    }

    fn accept(
        &mut self,
        reading: &Reading,
        record: &PersistentRecord,
        outcome: Outcome,
    ) -> CycleDecision {
        self.state.reset();

        let secondary = match self.secondary {
            Some(_) => Some(reading.secondary),
            None => record.last_humidity,
        };
        let update = RecordUpdate::Store {
            primary: Some(reading.primary),
            secondary,
            drop_event: outcome == Outcome::SuspectedDropConfirmed,
        };

        let mut decision = CycleDecision::silent(outcome, update, SleepDuration::Normal);
        if self.secondary.is_some() {
            decision = decision.with(Transmission::Reading {
                channel: ChannelId::Secondary,
                value: reading.secondary,
            });
        }
        decision.with(Transmission::Reading {
            channel: ChannelId::Primary,
            value: reading.primary,
        })
    }
}
