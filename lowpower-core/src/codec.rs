//! Radio code encoding
//!
//! Every transmission is one 24-bit integer. A measurement becomes
//! `trunc(value * 10) + offset`: one decimal place survives, and the offset
//! tells the gateway which node and quantity the code belongs to. Voltage is
//! sent as raw millivolts plus its offset.
//!
//! Codes at or above the error floor are error indicators. They bypass
//! scaling and offsets entirely, so an error and a measurement can share the
//! one radio word. [`crate::config::NodeConfig::validate`] guarantees no
//! legitimate measurement reaches the floor.
//!
//! ```rust
//! use lowpower_core::codec::Encoder;
//! use lowpower_core::config::NodeConfig;
//!
//! let config = NodeConfig::bath();
//! let encoder = Encoder::new(config.error_floor);
//!
//! assert_eq!(encoder.encode(24.0, &config.primary).value(), 130_640);
//! assert_eq!(encoder.encode(f32::NAN, &config.primary).value(), 999_901);
//! ```

use crate::config::{ChannelConfig, NodeConfig, VoltageConfig};
use crate::constants::codes::MAX_CODE;
use crate::events::{ChannelId, Transmission};
use crate::traits::Transmitter;

/// A 24-bit radio code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxCode(u32);

impl TxCode {
    /// Wrap a raw value, rejecting anything wider than 24 bits
    pub const fn new(raw: u32) -> Option<Self> {
        if raw <= MAX_CODE { Some(Self(raw)) } else { None }
    }

    /// Raw integer
    pub const fn value(&self) -> u32 {
        self.0
    }

    fn saturating(raw: i64) -> Self {
        Self(raw.clamp(0, MAX_CODE as i64) as u32)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TxCode {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.0)
    }
}

/// Physical value in tenths, truncated toward zero
///
/// Saturates for values beyond `i32`; NaN maps to 0.
pub fn scale_tenths(value: f32) -> i32 {
    (value * 10.0) as i32
}

/// Maps values and channels to radio codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    error_floor: u32,
}

impl Encoder {
    /// Encoder with the given error-range floor
    pub const fn new(error_floor: u32) -> Self {
        Self { error_floor }
    }

    /// First code treated as an error indicator
    pub const fn error_floor(&self) -> u32 {
        self.error_floor
    }

    /// Whether a raw value falls in the error range
    pub fn is_error_code(&self, raw: i64) -> bool {
        raw >= self.error_floor as i64
    }

    /// Raw integer plus offset; error-range values pass through unchanged
    pub fn encode_raw(&self, raw: i64, offset: u32) -> TxCode {
        if self.is_error_code(raw) {
            TxCode::saturating(raw)
        } else {
            TxCode::saturating(raw + offset as i64)
        }
    }

    /// Measurement in tenths plus the channel offset
    ///
    /// A value that cannot be encoded (not finite, or landing outside the
    /// channel's band) becomes the channel's error code.
    pub fn encode(&self, value: f32, channel: &ChannelConfig) -> TxCode {
        if !value.is_finite() {
            return self.encode_raw(channel.error_code as i64, channel.offset);
        }

        let code = scale_tenths(value) as i64 + channel.offset as i64;
        if code < 0 || self.is_error_code(code) {
            node_warn!("{} value {} cannot be encoded", channel.name, value);
            return self.encode_raw(channel.error_code as i64, channel.offset);
        }
        TxCode::saturating(code)
    }

    /// Supply voltage in millivolts plus the voltage offset
    ///
    /// Clamped to the configured band so a wild ADC reading cannot reach the
    /// error range.
    pub fn encode_voltage(&self, millivolts: u32, voltage: &VoltageConfig) -> TxCode {
        self.encode_raw(millivolts.min(voltage.max_mv) as i64, voltage.offset)
    }

    /// Code for one entry of a cycle decision
    pub fn encode_transmission(&self, transmission: &Transmission, config: &NodeConfig) -> TxCode {
        let channel = channel_config(config, transmission.channel());
        match *transmission {
            Transmission::Reading { value, .. } => self.encode(value, channel),
            Transmission::Fault { .. } => {
                self.encode_raw(channel.error_code as i64, channel.offset)
            }
        }
    }
}

fn channel_config(config: &NodeConfig, id: ChannelId) -> &ChannelConfig {
    match id {
        ChannelId::Primary => &config.primary,
        // A decision only names the secondary channel when one is configured
        ChannelId::Secondary => config.secondary.as_ref().unwrap_or(&config.primary),
    }
}

/// Hand one code to the radio
///
/// Fire-and-forget: repetition for reliability is the radio's job.
pub fn transmit<T: Transmitter + ?Sized>(radio: &mut T, code: TxCode) {
    node_debug!("TX {}", code.value());
    radio.transmit(code);
}
