//! Node configuration
//!
//! Everything that differs between deployments is captured in one
//! [`NodeConfig`], chosen once at startup and validated before the first
//! cycle. There is no runtime reconfiguration.
//!
//! ## Deployments
//!
//! | Preset | Sensor | Primary | Secondary | Drop rule |
//! |---|---|---|---|---|
//! | `Bath` | DHT22 | temperature | humidity | both channels |
//! | `Balcony` | DHT22 | temperature | humidity | both channels |
//! | `MasterBedroom` | DHT22 | temperature | humidity | both channels |
//! | `Pond` | 2x DS18B20 | probe 1 | probe 2 | disabled |
//!
//! ```rust
//! use lowpower_core::config::{Deployment, NodeConfig};
//!
//! let config = NodeConfig::for_deployment(Deployment::Bath);
//! config.validate()?;
//! assert_eq!(config.primary.offset, 130_400);
//! # Ok::<(), lowpower_core::ConfigError>(())
//! ```

use crate::codec::scale_tenths;
use crate::constants::{codes, sensors, storage, timing};
use crate::errors::{ConfigError, ConfigResult};
use crate::events::SleepDuration;

/// One transmittable measurement channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelConfig {
    /// Short name for logs
    pub name: &'static str,
    /// Code band base added to the scaled value
    pub offset: u32,
    /// Code sent when this channel fails
    pub error_code: u32,
    /// Lowest physically valid value
    pub min: f32,
    /// Highest physically valid value
    pub max: f32,
}

impl ChannelConfig {
    /// Whether `value` is a usable reading for this channel
    pub fn accepts(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Lowest and highest code a valid reading can produce
    pub fn code_range(&self) -> (i64, i64) {
        let offset = self.offset as i64;
        (
            offset + scale_tenths(self.min) as i64,
            offset + scale_tenths(self.max) as i64,
        )
    }
}

/// Supply voltage channel (raw millivolts, no scaling)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VoltageConfig {
    /// Code band base
    pub offset: u32,
    /// Highest expected reading
    pub max_mv: u32,
}

impl VoltageConfig {
    /// Lowest and highest code a reading can produce
    pub fn code_range(&self) -> (i64, i64) {
        (self.offset as i64, self.offset as i64 + self.max_mv as i64)
    }
}

/// How per-channel deltas combine into a drop decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DropRule {
    /// Every monitored channel must exceed the threshold
    All,
    /// One channel exceeding the threshold is enough
    Any,
    /// Never suspect a drop
    Disabled,
}

/// Which sign of change counts toward a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DropDirection {
    /// Only decreases (persisted minus new above the threshold)
    Falling,
    /// Changes in both directions
    Either,
}

/// Drop-detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DropPolicy {
    /// Whole-unit delta that must be exceeded
    pub threshold: i32,
    /// Channel combination
    pub rule: DropRule,
    /// Counted direction
    pub direction: DropDirection,
}

impl Default for DropPolicy {
    fn default() -> Self {
        Self {
            threshold: sensors::DROP_THRESHOLD_UNITS,
            rule: DropRule::All,
            direction: DropDirection::Falling,
        }
    }
}

/// Sleep durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SleepConfig {
    /// Sleep after an accepted reading
    pub normal_secs: u32,
    /// Sleep after a failed or suspicious reading
    pub short_secs: u32,
    /// Length of one power-down quantum
    pub quantum_secs: u32,
}

impl SleepConfig {
    /// Requested seconds for a duration
    pub fn seconds(&self, duration: SleepDuration) -> u32 {
        match duration {
            SleepDuration::Normal => self.normal_secs,
            SleepDuration::Short => self.short_secs,
        }
    }

    /// Whole quanta approximating a duration, rounded down
    pub fn quanta(&self, duration: SleepDuration) -> u32 {
        self.seconds(duration)
            .checked_div(self.quantum_secs)
            .unwrap_or(0)
    }
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            normal_secs: timing::NORMAL_SLEEP_SECS,
            short_secs: timing::SHORT_SLEEP_SECS,
            quantum_secs: timing::SLEEP_QUANTUM_SECS,
        }
    }
}

/// Storage region and wear ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StorageConfig {
    /// Bytes of the store available to the slot table
    pub capacity: u16,
    /// Writes per slot before rotating
    pub write_ceiling: u16,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            capacity: storage::EEPROM_CAPACITY_BYTES,
            write_ceiling: storage::MAX_WRITES_PER_SLOT,
        }
    }
}

/// Where the node is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Deployment {
    /// Bathroom, DHT22
    Bath,
    /// Balcony, DHT22
    Balcony,
    /// Master bedroom, DHT22
    MasterBedroom,
    /// Garden pond, two DS18B20 probes
    Pond,
}

impl Deployment {
    /// Every preset
    pub const ALL: [Deployment; 4] = [
        Deployment::Bath,
        Deployment::Balcony,
        Deployment::MasterBedroom,
        Deployment::Pond,
    ];

    /// Lowercase name
    pub const fn name(&self) -> &'static str {
        match self {
            Deployment::Bath => "bath",
            Deployment::Balcony => "balcony",
            Deployment::MasterBedroom => "master-bedroom",
            Deployment::Pond => "pond",
        }
    }

    /// Look up a preset by [`Deployment::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeConfig {
    /// Installation site
    pub deployment: Deployment,
    /// Main channel, always present
    pub primary: ChannelConfig,
    /// Second channel from the same sensor, if any
    pub secondary: Option<ChannelConfig>,
    /// Supply voltage channel
    pub voltage: VoltageConfig,
    /// First code reserved for errors
    pub error_floor: u32,
    /// Drop detection
    pub drop: DropPolicy,
    /// Sleep durations
    pub sleep: SleepConfig,
    /// Storage region
    pub storage: StorageConfig,
}

impl NodeConfig {
    /// Preset for a deployment
    pub fn for_deployment(deployment: Deployment) -> Self {
        match deployment {
            Deployment::Bath => Self::dht22(
                deployment,
                codes::bath::TEMPERATURE,
                codes::bath::HUMIDITY,
                codes::bath::VOLTAGE,
                codes::bath::ERROR,
            ),
            Deployment::Balcony => Self::dht22(
                deployment,
                codes::balcony::TEMPERATURE,
                codes::balcony::HUMIDITY,
                codes::balcony::VOLTAGE,
                codes::balcony::ERROR,
            ),
            Deployment::MasterBedroom => Self::dht22(
                deployment,
                codes::master_bedroom::TEMPERATURE,
                codes::master_bedroom::HUMIDITY,
                codes::master_bedroom::VOLTAGE,
                codes::master_bedroom::ERROR,
            ),
            Deployment::Pond => Self::pond(),
        }
    }

    /// Bathroom preset
    pub fn bath() -> Self {
        Self::for_deployment(Deployment::Bath)
    }

    /// Two DS18B20 probes in the pond
    ///
    /// The probes sit in water with large thermal mass, so drop detection is
    /// off; each probe reports its own error code.
    pub fn pond() -> Self {
        let probe = |name, offset, error_code| ChannelConfig {
            name,
            offset,
            error_code,
            min: sensors::DS18B20_TEMP_MIN_C,
            max: sensors::DS18B20_TEMP_MAX_C,
        };

        Self {
            deployment: Deployment::Pond,
            primary: probe("temperature", codes::pond::TEMPERATURE, codes::pond::ERROR),
            secondary: Some(probe(
                "temperature2",
                codes::pond::TEMPERATURE_2,
                codes::pond::ERROR_2,
            )),
            voltage: VoltageConfig {
                offset: codes::pond::VOLTAGE,
                max_mv: codes::SUPPLY_MAX_MV,
            },
            error_floor: codes::ERROR_CODE_FLOOR,
            drop: DropPolicy {
                rule: DropRule::Disabled,
                ..DropPolicy::default()
            },
            sleep: SleepConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    fn dht22(
        deployment: Deployment,
        temperature: u32,
        humidity: u32,
        voltage: u32,
        error_code: u32,
    ) -> Self {
        Self {
            deployment,
            primary: ChannelConfig {
                name: "temperature",
                offset: temperature,
                error_code,
                min: sensors::DHT22_TEMP_MIN_C,
                max: sensors::DHT22_TEMP_MAX_C,
            },
            secondary: Some(ChannelConfig {
                name: "humidity",
                offset: humidity,
                error_code,
                min: sensors::DHT22_HUMIDITY_MIN_PCT,
                max: sensors::DHT22_HUMIDITY_MAX_PCT,
            }),
            voltage: VoltageConfig {
                offset: voltage,
                max_mv: codes::SUPPLY_MAX_MV,
            },
            error_floor: codes::ERROR_CODE_FLOOR,
            drop: DropPolicy::default(),
            sleep: SleepConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// Check that the constants are mutually consistent
    ///
    /// Run once before the first cycle. Guarantees that no legitimate
    /// reading can encode into the error range, that every code fits the
    /// radio word, and that the gateway can tell channels apart.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.error_floor > codes::MAX_CODE {
            return Err(ConfigError::Invalid {
                reason: "error floor exceeds 24-bit code range",
            });
        }

        let mut ranges: [(&'static str, (i64, i64)); 3] = [("", (0, 0)); 3];
        let mut count = 0;

        for channel in self.channels() {
            if !(channel.min < channel.max) {
                return Err(ConfigError::Invalid {
                    reason: "channel range is empty",
                });
            }
            if channel.error_code < self.error_floor || channel.error_code > codes::MAX_CODE {
                return Err(ConfigError::Invalid {
                    reason: "error code outside the error range",
                });
            }
            ranges[count] = (channel.name, channel.code_range());
            count += 1;
        }
        ranges[count] = ("voltage", self.voltage.code_range());
        count += 1;

        for &(name, (lo, hi)) in &ranges[..count] {
            if lo < 0 || hi > codes::MAX_CODE as i64 {
                return Err(ConfigError::CodeOverflow {
                    channel: name,
                    code: if lo < 0 { lo } else { hi },
                });
            }
            if hi >= self.error_floor as i64 {
                return Err(ConfigError::CodeCollision {
                    channel: name,
                    max_code: hi,
                    error_floor: self.error_floor,
                });
            }
        }

        for (i, &(first, (lo_a, hi_a))) in ranges[..count].iter().enumerate() {
            for &(second, (lo_b, hi_b)) in &ranges[i + 1..count] {
                if lo_a <= hi_b && lo_b <= hi_a {
                    return Err(ConfigError::OverlappingChannels { first, second });
                }
            }
        }

        if self.drop.threshold < 0 {
            return Err(ConfigError::Invalid {
                reason: "drop threshold must not be negative",
            });
        }
        if self.sleep.quantum_secs == 0 || self.sleep.short_secs > self.sleep.normal_secs {
            return Err(ConfigError::Invalid {
                reason: "sleep durations inconsistent",
            });
        }
        if self.storage.write_ceiling == 0 {
            return Err(ConfigError::Invalid {
                reason: "write ceiling must be positive",
            });
        }
        if crate::storage::SlotTable::new(self.storage.capacity).slot_count() == 0 {
            return Err(ConfigError::Invalid {
                reason: "storage too small for one record",
            });
        }

        Ok(())
    }

    /// Primary channel followed by the secondary one, if configured
    pub fn channels(&self) -> impl Iterator<Item = &ChannelConfig> {
        core::iter::once(&self.primary).chain(self.secondary.as_ref())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::bath()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_validates() {
        for deployment in Deployment::ALL {
            let config = NodeConfig::for_deployment(deployment);
            assert_eq!(config.validate(), Ok(()), "{:?}", deployment);
            assert_eq!(config.deployment, deployment);
        }
    }

    #[test]
    fn dht22_temperature_band_starts_at_offset_base() {
        let config = NodeConfig::bath();
        // -40.0°C encodes to the round band base
        assert_eq!(config.primary.code_range(), (130_000, 131_200));
        assert_eq!(config.secondary.unwrap().code_range(), (110_000, 111_000));
    }

    #[test]
    fn channel_accepts_only_finite_in_range_values() {
        let config = NodeConfig::bath();
        let humidity = config.secondary.unwrap();

        assert!(config.primary.accepts(-40.0));
        assert!(config.primary.accepts(80.0));
        assert!(!config.primary.accepts(80.1));
        assert!(!config.primary.accepts(f32::NAN));
        assert!(!humidity.accepts(-0.5));
        assert!(!humidity.accepts(f32::INFINITY));
    }

    #[test]
    fn pond_disables_drop_detection() {
        let config = NodeConfig::pond();
        assert_eq!(config.drop.rule, DropRule::Disabled);
        assert_eq!(config.primary.error_code, 999_931);
        assert_eq!(config.secondary.unwrap().error_code, 999_932);
        assert!(!config.primary.accepts(sensors::DS18B20_DISCONNECTED_C));
    }

    #[test]
    fn offset_near_floor_collides() {
        let mut config = NodeConfig::bath();
        // 80.0°C encodes to 999_200 + 800 = 1_000_000
        config.primary.offset = 999_200;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CodeCollision { channel: "temperature", max_code: 1_000_000, .. })
        ));
    }

    #[test]
    fn band_may_end_just_below_floor() {
        let mut config = NodeConfig::bath();
        config.primary.offset = 999_099;
        assert_eq!(config.primary.code_range().1, 999_899);
        assert_eq!(config.validate(), Ok(()));

        config.primary.offset = 999_100;
        assert_eq!(config.primary.code_range().1, 999_900);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CodeCollision { max_code: 999_900, error_floor: 999_900, .. })
        ));
    }

    #[test]
    fn negative_band_rejected() {
        let mut config = NodeConfig::bath();
        config.primary.offset = 100;
        assert!(matches!(config.validate(), Err(ConfigError::CodeOverflow { .. })));
    }

    #[test]
    fn overlapping_bands_rejected() {
        let mut config = NodeConfig::bath();
        config.voltage.offset = config.primary.offset;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OverlappingChannels { first: "temperature", second: "voltage" })
        ));
    }

    #[test]
    fn error_code_below_floor_rejected() {
        let mut config = NodeConfig::bath();
        config.primary.error_code = 500_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn sleep_rounds_down_to_whole_quanta() {
        let sleep = SleepConfig::default();
        assert_eq!(sleep.quanta(SleepDuration::Normal), 75);
        assert_eq!(sleep.quanta(SleepDuration::Short), 7);

        let zero = SleepConfig { quantum_secs: 0, ..sleep };
        assert_eq!(zero.quanta(SleepDuration::Normal), 0);
    }

    #[test]
    fn deployment_names_round_trip() {
        for deployment in Deployment::ALL {
            assert_eq!(Deployment::from_name(deployment.name()), Some(deployment));
        }
        assert_eq!(Deployment::from_name("attic"), None);
    }
}
