//! FT232H digital I/O host.
//!
//! Single-threaded command-line tool: each invocation opens the device,
//! configures both GPIO buses as outputs, applies one command and closes the
//! device again.

mod cli;
#[cfg(feature = "ftd2xx")]
mod ftd2xx;
mod sim;

use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ft232h_dio_core::{Bus, DeviceProvider, DioController};

use cli::{Backend, Cli, Commands, DeviceCommand};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.backend {
        Backend::Sim => {
            log::info!("Using simulated backend ({} device(s))", cli.sim_devices);
            let sim = sim::SimProvider::new(cli.sim_devices);
            run(sim.clone(), &cli)?;
            log::debug!(
                "sim: {} command(s) written to device {}, final mode {:?}, open {}",
                sim.writes(cli.index).len(),
                cli.index,
                sim.mode(cli.index),
                sim.is_open(cli.index)
            );
            Ok(())
        }
        Backend::Ftd2xx => run_ftd2xx(&cli),
    }
}

#[cfg(feature = "ftd2xx")]
fn run_ftd2xx(cli: &Cli) -> anyhow::Result<()> {
    run(ftd2xx::Ftd2xxProvider, cli)
}

#[cfg(not(feature = "ftd2xx"))]
fn run_ftd2xx(_cli: &Cli) -> anyhow::Result<()> {
    anyhow::bail!("built without D2XX support; rebuild with `--features ftd2xx` or use `--backend sim`")
}

fn run<P>(mut provider: P, cli: &Cli) -> anyhow::Result<()>
where
    P: DeviceProvider,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    match cli.command {
        Commands::List => list_devices(&mut provider, cli.quiet),
        Commands::Device(command) => drive(provider, cli.index, command),
    }
}

/// Open the device, apply `command` and close the device again.
fn drive<P>(provider: P, index: u32, command: DeviceCommand) -> anyhow::Result<()>
where
    P: DeviceProvider,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    let mut dio = DioController::new(provider);
    dio.init(index)
        .with_context(|| format!("failed to initialise FT232H at index {index}"))?;

    let result = apply(&mut dio, command);

    // Close even when the command failed; report the command error first.
    let closed = dio.close().context("failed to close device");
    result?;
    closed
}

fn apply<P>(dio: &mut DioController<P>, command: DeviceCommand) -> anyhow::Result<()>
where
    P: DeviceProvider,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    match command {
        DeviceCommand::Set { bus, pin, level } => {
            dio.set_pin(bus, pin, level)
                .with_context(|| format!("failed to set {bus} pin {pin}"))?;
            report(dio, bus);
        }
        DeviceCommand::Write { bus, value } => {
            dio.write_bus(bus, value)
                .with_context(|| format!("failed to write {bus}"))?;
            report(dio, bus);
        }
        DeviceCommand::Pulse {
            bus,
            pin,
            width_ms,
            low,
        } => {
            let active = !low;
            dio.set_pin(bus, pin, !active)
                .with_context(|| format!("failed to idle {bus} pin {pin}"))?;
            dio.set_pin(bus, pin, active)
                .with_context(|| format!("failed to assert {bus} pin {pin}"))?;
            thread::sleep(Duration::from_millis(width_ms));
            dio.set_pin(bus, pin, !active)
                .with_context(|| format!("failed to release {bus} pin {pin}"))?;
            log::info!("Pulsed {bus} pin {pin} for {width_ms} ms");
        }
        DeviceCommand::Reset => {
            dio.reset_port().context("failed to reset port")?;
            log::info!("Port reset");
        }
    }
    Ok(())
}

fn report<P: DeviceProvider>(dio: &DioController<P>, bus: Bus) {
    log::info!("{bus} = {:#04x} ({:08b})", dio.bus_state(bus), dio.bus_state(bus));
}

fn list_devices<P>(provider: &mut P, quiet: bool) -> anyhow::Result<()>
where
    P: DeviceProvider,
    P::Error: std::error::Error + Send + Sync + 'static,
{
    let devices = provider.device_list().context("failed to enumerate devices")?;
    if devices.is_empty() && !quiet {
        eprintln!("No FTDI devices found");
    }
    for (index, dev) in devices.iter().enumerate() {
        println!(
            "{index}: {:?} serial='{}' description='{}'{}",
            dev.device_type,
            dev.serial_number,
            dev.description,
            if dev.port_open { " (in use)" } else { "" }
        );
    }
    Ok(())
}
