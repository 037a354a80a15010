//! Per-cycle decision types
//!
//! ## Overview
//!
//! Each wake cycle produces exactly one [`CycleDecision`]. It is the only
//! thing the validator hands to the rest of the node:
//!
//! ```text
//! Reading + PersistentRecord + ValidatorState
//!                  │
//!                  ▼
//!            CycleDecision
//!   ┌──────────────┼───────────────┐
//!   ▼              ▼               ▼
//! update      transmissions      sleep
//! (storage)     (radio)        (quanta)
//! ```
//!
//! Decisions are plain data, stack-allocated and dropped at the end of the
//! cycle. Nothing in here survives a sleep.
//!
//! ## Outcomes
//!
//! | Outcome | Radio | Record | Sleep |
//! |---|---|---|---|
//! | `Accepted` | all channels | new values | Normal |
//! | `FailureSuppressed` | nothing | untouched | Short |
//! | `SensorFailure` | one error code | untouched | Short |
//! | `SuspectedDropFirstObservation` | nothing | old values, drop counted | Short |
//! | `SuspectedDropConfirmed` | all channels | new values, drop counted | Normal |

use heapless::Vec;

use crate::storage::PersistentRecord;

/// Maximum transmissions carried by one decision
pub const MAX_TRANSMISSIONS: usize = 2;

/// Which configured channel a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChannelId {
    /// Temperature (or first probe)
    Primary = 0,
    /// Humidity (or second probe)
    Secondary = 1,
}

/// One entry for the radio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transmission {
    /// A measured value, encoded with the channel's offset
    Reading {
        /// Source channel
        channel: ChannelId,
        /// Physical value
        value: f32,
    },
    /// The channel's error code
    Fault {
        /// Failing channel
        channel: ChannelId,
    },
}

impl Transmission {
    /// Channel this entry belongs to
    pub const fn channel(&self) -> ChannelId {
        match self {
            Transmission::Reading { channel, .. } | Transmission::Fault { channel } => *channel,
        }
    }
}

/// Classification of one wake cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Outcome {
    /// Reading trusted and sent
    Accepted = 0,
    /// First failed cycle of an episode, kept quiet
    FailureSuppressed = 1,
    /// Second consecutive failure, error code sent
    SensorFailure = 2,
    /// Large change seen once, re-measure before trusting it
    SuspectedDropFirstObservation = 3,
    /// Large change seen twice in a row, new baseline accepted
    SuspectedDropConfirmed = 4,
}

impl Outcome {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::FailureSuppressed => "failure-suppressed",
            Outcome::SensorFailure => "sensor-failure",
            Outcome::SuspectedDropFirstObservation => "drop-suspected",
            Outcome::SuspectedDropConfirmed => "drop-confirmed",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Outcome {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}

/// How long to sleep after the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepDuration {
    /// Regular measurement interval
    Normal,
    /// Quick re-check after a failure or suspicious reading
    Short,
}

/// What to persist at the end of the cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordUpdate {
    /// Leave storage alone
    Skip,
    /// Write these values back
    Store {
        /// New primary value
        primary: Option<f32>,
        /// New secondary value
        secondary: Option<f32>,
        /// Count a suspected drop
        drop_event: bool,
    },
}

impl RecordUpdate {
    /// Record to save and its drop flag, or `None` for [`RecordUpdate::Skip`]
    pub fn apply(&self, record: &PersistentRecord) -> Option<(PersistentRecord, bool)> {
        match *self {
            RecordUpdate::Skip => None,
            RecordUpdate::Store { primary, secondary, drop_event } => Some((
                PersistentRecord {
                    last_temperature: primary,
                    last_humidity: secondary,
                    ..*record
                },
                drop_event,
            )),
        }
    }
}

/// Everything decided during one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleDecision {
    /// Classification
    pub outcome: Outcome,
    /// Entries for the radio, in transmission order
    pub transmissions: Vec<Transmission, MAX_TRANSMISSIONS>,
    /// Storage write
    pub update: RecordUpdate,
    /// Next sleep
    pub sleep: SleepDuration,
}

impl CycleDecision {
    /// Decision that sends nothing
    pub fn silent(outcome: Outcome, update: RecordUpdate, sleep: SleepDuration) -> Self {
        Self {
            outcome,
            transmissions: Vec::new(),
            update,
            sleep,
        }
    }

    /// Append a transmission; extra entries beyond capacity are dropped
    pub fn with(mut self, transmission: Transmission) -> Self {
        if self.transmissions.push(transmission).is_err() {
            node_warn!("Decision full, dropping transmission");
        }
        self
    }

    /// Whether anything goes out over the radio
    pub fn transmits(&self) -> bool {
        !self.transmissions.is_empty()
    }
}
