//! Sensor Ranges and Drop Detection
//!
//! Operational limits from the sensor datasheets. Readings outside these
//! ranges are classified as sensor failures, not as measurements.

// ===== DHT22 (temperature + relative humidity) =====

/// DHT22 minimum temperature (°C).
///
/// Source: AM2302/DHT22 datasheet
pub const DHT22_TEMP_MIN_C: f32 = -40.0;

/// DHT22 maximum temperature (°C).
pub const DHT22_TEMP_MAX_C: f32 = 80.0;

/// DHT22 humidity range (%RH).
pub const DHT22_HUMIDITY_MIN_PCT: f32 = 0.0;
/// Upper humidity bound (%RH).
pub const DHT22_HUMIDITY_MAX_PCT: f32 = 100.0;

// ===== DS18B20 (one-wire temperature probe) =====

/// DS18B20 minimum temperature (°C).
///
/// Source: Maxim DS18B20 datasheet
pub const DS18B20_TEMP_MIN_C: f32 = -55.0;

/// DS18B20 maximum temperature (°C).
pub const DS18B20_TEMP_MAX_C: f32 = 125.0;

/// Value the Dallas driver reports for a disconnected probe (°C).
///
/// Falls below [`DS18B20_TEMP_MIN_C`] and is therefore caught by the range
/// check.
pub const DS18B20_DISCONNECTED_C: f32 = -127.0;

// ===== DROP DETECTION =====

/// Integer-unit change between persisted and new value that counts as a
/// suspected drop.
///
/// Both values are truncated to whole units before subtracting. Real indoor
/// temperatures and humidity never move 10 units between two 10-minute
/// wakes; the DHT22 occasionally does.
pub const DROP_THRESHOLD_UNITS: i32 = 10;

/// Consecutive anomalous cycles required before acting.
///
/// The first anomaly only arms the escalation counter.
pub const ESCALATION_LIMIT: u8 = 1;
