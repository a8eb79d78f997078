//! CLI module for tariff-mcp.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tariff MCP - HTS lookup and tariff calculation tools
///
/// Serves the `find_hts8` and `calculate_tariff` tools to an MCP client, or
/// runs either tool once from the command line.
#[derive(Parser, Debug)]
#[command(name = "tariff-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the MCP server over HTTP (SSE transport)
    Serve {
        /// Host to bind to [env: HOST]
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to [env: PORT]
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start the MCP server over stdio
    Stdio,

    /// Look up HTS-8 codes for a product description
    Find {
        /// Natural language description of the product
        query: String,
    },

    /// Calculate duties and taxes for a shipment
    Calculate {
        /// 8-digit HTS code
        #[arg(long)]
        hts8: String,

        /// Customs value in destination currency
        #[arg(long)]
        value: f64,

        /// Quantity (at least 1)
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,

        /// Origin country (ISO 3166-1 alpha-2)
        #[arg(long)]
        origin: String,

        /// Country of arrival (ISO 3166-1 alpha-2)
        #[arg(long)]
        arrival: String,

        /// Mode of transport (air, sea, land)
        #[arg(long)]
        mode: String,

        /// Entry date (YYYY-MM-DD)
        #[arg(long)]
        entry_date: String,

        /// Loading date (YYYY-MM-DD)
        #[arg(long)]
        loading_date: String,
    },

    /// Check required environment and configuration
    Doctor,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calculate() {
        let cli = Cli::try_parse_from([
            "tariff-mcp", "calculate",
            "--hts8", "64039990",
            "--value", "100",
            "--quantity", "1",
            "--origin", "CN",
            "--arrival", "US",
            "--mode", "sea",
            "--entry-date", "2024-01-01",
            "--loading-date", "2023-12-01",
        ])
        .unwrap();

        match cli.command {
            Commands::Calculate { hts8, value, quantity, mode, .. } => {
                assert_eq!(hts8, "64039990");
                assert_eq!(value, 100.0);
                assert_eq!(quantity, 1);
                assert_eq!(mode, "sea");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["tariff-mcp", "-v", "serve", "--host", "127.0.0.1", "-p", "5000"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(5000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_without_flags_defers_to_env() {
        let cli = Cli::try_parse_from(["tariff-mcp", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { host: None, port: None }));
    }
}
