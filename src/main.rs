//! tariff-mcp CLI entry point.

use anyhow::Result;
use clap::Parser;
use tariff_mcp::cli::{commands, Cli, Commands};
use tariff_mcp::config::Settings;
use tariff_mcp::tariff::TariffArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging. Always stderr: stdout belongs to the stdio transport.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tariff_mcp={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Stdio => {
            commands::run_stdio(settings).await?;
        }

        Commands::Find { query } => {
            commands::run_find(&query, settings).await?;
        }

        Commands::Calculate {
            hts8,
            value,
            quantity,
            origin,
            arrival,
            mode,
            entry_date,
            loading_date,
        } => {
            let args = TariffArgs {
                hts8,
                item_value: value,
                item_quantity: quantity,
                origin_country: origin,
                country_of_arrival: arrival,
                mode_of_transport: mode,
                entry_date,
                loading_date,
            };
            commands::run_calculate(args, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
