//! Host simulator for the low-power sensor node.
//!
//! Runs a scripted sequence of readings through [`SensorNode`] on a simulated
//! board backed by an in-memory EEPROM. Every transmitted code is logged, so
//! the gateway's view of a deployment can be reproduced without hardware.
//!
//! # Reading syntax
//!
//! | Argument    | Meaning                                  |
//! |-------------|------------------------------------------|
//! | `21.3/45`   | primary 21.3, secondary 45               |
//! | `21.3`      | primary only (secondary absent)          |
//! | `fail`      | the driver gave up                       |
//! | `reset`     | power cycle: volatile state is lost      |
//!
//! ```text
//! RUST_LOG=debug lowpower-sim --deployment bath 21.3/45 5/20 5/20 fail fail
//! ```

use std::collections::VecDeque;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info, warn};

use lowpower_core::config::Deployment;
use lowpower_core::storage::MemoryStore;
use lowpower_core::traits::{Reading, Sensor, Sleeper, SupplyMonitor, Transmitter};
use lowpower_core::{NodeConfig, SensorNode, TxCode};

/// EEPROM size of the simulated part
const EEPROM_BYTES: usize = 1024;

#[derive(Parser)]
#[command(name = "lowpower-sim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run scripted readings through a simulated low-power sensor node")]
#[command(long_about = None)]
struct Cli {
    /// Deployment preset
    #[arg(short, long, value_enum, default_value = "bath")]
    deployment: DeploymentArg,

    /// Supply voltage reported every cycle (millivolts)
    #[arg(short, long, default_value = "3000")]
    supply_mv: u32,

    /// Override the per-slot write ceiling (small values show rotation)
    #[arg(long)]
    write_ceiling: Option<u16>,

    /// Readings, one per cycle: `T/H`, `T`, `fail` or `reset`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_parser = parse_step)]
    steps: Vec<Step>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DeploymentArg {
    Bath,
    Balcony,
    MasterBedroom,
    Pond,
}

impl From<DeploymentArg> for Deployment {
    fn from(arg: DeploymentArg) -> Self {
        match arg {
            DeploymentArg::Bath => Deployment::Bath,
            DeploymentArg::Balcony => Deployment::Balcony,
            DeploymentArg::MasterBedroom => Deployment::MasterBedroom,
            DeploymentArg::Pond => Deployment::Pond,
        }
    }
}

/// One scripted step
#[derive(Debug, Clone, Copy)]
enum Step {
    Cycle(Reading),
    Reset,
}

fn parse_step(arg: &str) -> Result<Step, String> {
    let arg = arg.trim();
    match arg {
        "fail" => return Ok(Step::Cycle(Reading::failed())),
        "reset" => return Ok(Step::Reset),
        _ => {}
    }

    let parse = |text: &str| {
        text.parse::<f32>()
            .map_err(|e| format!("invalid value '{text}': {e}"))
    };
    let reading = match arg.split_once('/') {
        Some((primary, secondary)) => Reading::new(parse(primary)?, parse(secondary)?),
        None => Reading::single(parse(arg)?),
    };
    Ok(Step::Cycle(reading))
}

// ---------------------------------------------------------------------------
// Simulated board
// ---------------------------------------------------------------------------

/// Board that replays queued readings and logs radio traffic
struct SimBoard {
    readings: VecDeque<Reading>,
    supply_mv: u32,
    quantum_secs: u32,
    radio_on: bool,
    elapsed_secs: u64,
    sent: u64,
}

impl SimBoard {
    fn new(supply_mv: u32, quantum_secs: u32) -> Self {
        Self {
            readings: VecDeque::new(),
            supply_mv,
            quantum_secs,
            radio_on: false,
            elapsed_secs: 0,
            sent: 0,
        }
    }
}

impl Sensor for SimBoard {
    fn read_sensor(&mut self) -> Reading {
        self.readings.pop_front().unwrap_or_else(Reading::failed)
    }
}

impl SupplyMonitor for SimBoard {
    fn read_supply_voltage_mv(&mut self) -> u32 {
        self.supply_mv
    }
}

impl Transmitter for SimBoard {
    fn enable(&mut self) {
        self.radio_on = true;
    }

    fn disable(&mut self) {
        self.radio_on = false;
    }

    fn transmit(&mut self, code: TxCode) {
        if !self.radio_on {
            warn!("Transmit with radio powered down");
        }
        self.sent += 1;
        info!("[t+{:>6}s] TX {}", self.elapsed_secs, code.value());
    }
}

impl Sleeper for SimBoard {
    fn sleep_quanta(&mut self, count: u32) {
        self.elapsed_secs += u64::from(count) * u64::from(self.quantum_secs);
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = NodeConfig::for_deployment(cli.deployment.into());
    if let Some(ceiling) = cli.write_ceiling {
        config.storage.write_ceiling = ceiling;
    }
    info!(
        "Simulating {} node, {} steps, supply {} mV",
        config.deployment.name(),
        cli.steps.len(),
        cli.supply_mv
    );

    let board = SimBoard::new(cli.supply_mv, config.sleep.quantum_secs);
    let mut node = match SensorNode::new(config, board, MemoryStore::<EEPROM_BYTES>::new()) {
        Ok(node) => node,
        Err(e) => {
            error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    for (index, step) in cli.steps.iter().enumerate() {
        let reading = match *step {
            Step::Reset => {
                node.reset();
                continue;
            }
            Step::Cycle(reading) => reading,
        };

        node.hardware_mut().readings.push_back(reading);
        let report = node.run_cycle();

        info!(
            "Cycle {}: {} -> sleep {} quanta, record writes={} drops={}",
            index + 1,
            report.decision.outcome.name(),
            report.quanta,
            report.record.write_counter,
            report.record.drop_event_counter
        );
        if let Some(e) = report.storage_error {
            warn!("Cycle {}: record not saved: {e}", index + 1);
        }
    }

    let records = node.records();
    let slot = records.current_slot();
    let store = records.store();
    info!(
        "Done: {} codes sent over {} s, slot {:?}, hottest cell {} writes, {} writes total",
        node.hardware().sent,
        node.hardware().elapsed_secs,
        slot.map(|s| s.rotation),
        store.max_cell_writes(),
        store.total_writes()
    );

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_channel_reading() {
        let Step::Cycle(reading) = parse_step("21.3/45").unwrap() else {
            panic!("expected a cycle");
        };
        assert_eq!(reading, Reading::new(21.3, 45.0));
    }

    #[test]
    fn parses_negative_single_reading() {
        let Step::Cycle(reading) = parse_step("-5.5").unwrap() else {
            panic!("expected a cycle");
        };
        assert_eq!(reading.primary, -5.5);
        assert!(reading.secondary.is_nan());
    }

    #[test]
    fn parses_keywords() {
        assert!(matches!(parse_step("fail"), Ok(Step::Cycle(r)) if !r.ok));
        assert!(matches!(parse_step("reset"), Ok(Step::Reset)));
        assert!(parse_step("warm").is_err());
    }

    #[test]
    fn cli_accepts_hyphenated_readings() {
        let cli = Cli::try_parse_from(["lowpower-sim", "-d", "pond", "12/-3.5", "fail"]).unwrap();
        assert_eq!(cli.steps.len(), 2);
        assert!(matches!(cli.deployment, DeploymentArg::Pond));
    }
}
