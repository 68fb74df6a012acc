//! Command-line definitions.

use clap::{Parser, Subcommand, ValueEnum};
use ft232h_dio_core::Bus;

#[derive(Parser, Debug)]
#[command(name = "ft232h-dio")]
#[command(about = "Drive FT232H GPIO pins (ADBUS = bus A/D, ACBUS = bus B/C)", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Device index in the FTDI device list
    #[arg(short, long, global = true, default_value_t = 0)]
    pub index: u32,

    /// Driver backend
    #[arg(short, long, global = true, value_enum, default_value_t = Backend::default())]
    pub backend: Backend,

    /// Number of virtual devices for the simulated backend
    #[arg(long, global = true, default_value_t = 1)]
    pub sim_devices: u32,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List attached FTDI devices
    List,
    #[command(flatten)]
    Device(DeviceCommand),
}

/// Commands that run against an initialised device.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum DeviceCommand {
    /// Drive one pin high or low
    Set {
        /// Bus: A (D pins) or B (C pins)
        bus: Bus,
        /// Pin number, 0-7
        #[arg(allow_negative_numbers = true)]
        pin: i32,
        /// high/low, 1/0 or on/off
        #[arg(value_parser = parse_level, action = clap::ArgAction::Set)]
        level: bool,
    },
    /// Drive all eight pins of a bus at once
    Write {
        /// Bus: A (D pins) or B (C pins)
        bus: Bus,
        /// Byte value, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_byte)]
        value: u8,
    },
    /// Drive a pin to its active level, hold it, then release it
    Pulse {
        /// Bus: A (D pins) or B (C pins)
        bus: Bus,
        /// Pin number, 0-7
        #[arg(allow_negative_numbers = true)]
        pin: i32,
        /// Pulse width in milliseconds
        #[arg(short, long, default_value_t = 100)]
        width_ms: u64,
        /// Active-low pulse (pin idles high)
        #[arg(long)]
        low: bool,
    },
    /// Open the device, then reset its USB port
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// FTDI D2XX driver
    Ftd2xx,
    /// In-memory simulation, no hardware required
    Sim,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "ftd2xx") {
            Backend::Ftd2xx
        } else {
            Backend::Sim
        }
    }
}

fn parse_level(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "high" | "h" | "1" | "on" | "true" => Ok(true),
        "low" | "l" | "0" | "off" | "false" => Ok(false),
        _ => Err(format!("invalid level '{s}', expected high/low")),
    }
}

fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte '{s}': {e}"))
}
