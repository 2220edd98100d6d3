//! OpenBMC Redfish Provider
//!
//! Command-line front end over a recorded bus snapshot. Each invocation is
//! one request: it opens a provider session, runs a single command and
//! prints the result as JSON.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use obmc_redfish_provider::{
    EntityCollection, LedOp, LedType, PowerAction, ProviderConfig, RedfishProvider, Result,
    SensorName, SnapshotBus,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// OpenBMC Redfish Provider - bus inventory, sensors and control as Redfish records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bus snapshot to serve requests from (YAML or JSON)
    #[arg(long, env = "OBMC_SNAPSHOT")]
    snapshot: PathBuf,

    /// Provider configuration overriding the default object layout
    #[arg(long, env = "OBMC_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Processor records
    Cpus,
    /// Memory module records
    Dimms,
    /// PCIe device records
    Pcie,
    /// Chassis identity
    Chassis,
    /// BIOS version
    Bios,
    /// Computer system summary
    System,
    /// Inventory item counts per class
    Inventory,
    /// Read a sensor by logical name (e.g. AMBIENT)
    Sensor { name: String },
    /// Run a power action (On, ForceOff, GracefulShutDown, ForceRestart, GracefulRestart, state)
    Power { action: String },
    /// Run an LED command (identify|power|heartbeat, On|Off|BlinkFast|BlinkSlow|state)
    Led { led: String, op: String },
    /// Coarse system power state
    State,
    /// System UUID
    SystemId,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args);

    info!("Starting OpenBMC Redfish Provider");
    info!("  Version: {}", obmc_redfish_provider::VERSION);
    info!("  Snapshot: {}", args.snapshot.display());

    let config = match &args.config {
        Some(path) => ProviderConfig::from_file(path)?,
        None => ProviderConfig::default(),
    };

    let bus = Arc::new(SnapshotBus::from_file(&args.snapshot)?);
    let provider = RedfishProvider::new(bus, config);

    let output = run(&provider, &args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(provider: &RedfishProvider, command: &Command) -> Result<serde_json::Value> {
    let session = provider.session();

    let output = match command {
        Command::Cpus => records(session.cpu_info().await?)?,
        Command::Dimms => records(session.dimm_info().await?)?,
        Command::Pcie => records(session.pcie_info().await?)?,
        Command::Chassis => serde_json::to_value(session.chassis_info().await?)?,
        Command::Bios => serde_json::to_value(session.bios_version().await?)?,
        Command::System => serde_json::to_value(session.system_info().await?)?,
        Command::Inventory => serde_json::to_value(session.inventory_items().await?)?,
        Command::Sensor { name } => {
            let name: SensorName = name.parse()?;
            serde_json::to_value(provider.sensor(name).await?)?
        }
        Command::Power { action } => {
            let action: PowerAction = action.parse()?;
            serde_json::to_value(provider.power_control(action).await?)?
        }
        Command::Led { led, op } => {
            let led: LedType = led.parse()?;
            let op: LedOp = op.parse()?;
            serde_json::to_value(provider.led_operation(op, led).await?)?
        }
        Command::State => serde_json::to_value(provider.system_state().await?)?,
        Command::SystemId => serde_json::to_value(provider.system_id().await?)?,
    };

    Ok(output)
}

/// Mapped records of a collection; failed instances are logged and left out
fn records<T: Serialize>(collection: EntityCollection<T>) -> Result<serde_json::Value> {
    for failure in collection.failures() {
        warn!("Omitting {}: {}", failure.instance, failure.error);
    }
    Ok(serde_json::to_value(collection.records())?)
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout stays valid JSON
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
