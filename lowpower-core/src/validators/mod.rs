//! Measurement Validation
//!
//! ## Overview
//!
//! A battery node cannot ask the sensor twice in quick succession and cannot
//! take back a code once it is on air. So each wake cycle makes a single,
//! conservative decision:
//!
//! - Is the reading usable at all? (transfer ok, finite, inside the sensor's
//!   physical range)
//! - Is it a believable continuation of the stored baseline, or a sudden
//!   jump that might be a glitch?
//! - What should be persisted, sent, and how long until the next look?
//!
//! ## State Machine
//!
//! ```text
//!                 reading unusable
//!   ┌──────────────────────────────────────────────┐
//!   │  escalation == 0 → FailureSuppressed (quiet) │
//!   │  escalation  > 0 → SensorFailure (error code)│
//!   └──────────────────────────────────────────────┘
//!                 reading usable
//!   no baseline ──────────────────────────► Accepted
//!   baseline, small delta ────────────────► Accepted
//!   baseline, large delta, escalation == 0 ► SuspectedDropFirstObservation
//!   baseline, large delta, escalation  > 0 ► SuspectedDropConfirmed
//! ```
//!
//! The escalation counter is shared: a failed cycle followed by a large
//! jump confirms the jump straight away. Both mean "the last cycle was
//! already suspicious".
//!
//! ## Why Two Observations?
//!
//! The DHT22 occasionally returns a reading tens of degrees off. Trusting it
//! would overwrite the baseline and put a bogus value on air. Waiting one
//! short sleep (about a minute) for a second look costs little; a real cold
//! front is still there a minute later.
//!
//! A failing sensor is reported once per episode rather than every cycle, so
//! a dead probe does not drain the battery through the radio.

mod measurement;
mod utils;

pub use measurement::{MeasurementValidator, ValidatorState};
pub use utils::{exceeds, is_drop, truncated_delta};
