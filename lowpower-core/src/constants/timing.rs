//! Sleep Timing Constants
//!
//! The node has no real-time clock. Time only exists as a count of watchdog
//! power-down quanta.

/// Length of one watchdog power-down interval (seconds).
///
/// Source: ATmega328P watchdog, longest prescaler setting (~8 s)
pub const SLEEP_QUANTUM_SECS: u32 = 8;

/// Sleep after an accepted reading (seconds).
///
/// Roughly 10 minutes; the watchdog oscillator drifts with chip temperature,
/// so the real interval is 10-13 minutes.
pub const NORMAL_SLEEP_SECS: u32 = 600;

/// Sleep after a failed or suspicious reading (seconds).
///
/// Short enough that a re-measurement follows within about a minute.
pub const SHORT_SLEEP_SECS: u32 = 60;
