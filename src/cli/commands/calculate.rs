//! Calculate command implementation.

use crate::app::App;
use crate::cli::Output;
use crate::config::{Environment, Settings};
use crate::tariff::{TariffArgs, TariffRequest};
use anyhow::Result;

/// Run a single `calculate_tariff` call and print the JSON record.
pub async fn run_calculate(args: TariffArgs, settings: Settings) -> Result<()> {
    let env = Environment::from_env()?;

    // Reject bad input before opening any downstream connection.
    let request = TariffRequest::validate(args)?;
    let app = App::from_config(&settings, &env).await?;

    let spinner = Output::spinner("Calling tariff API...");
    let result = app.tariff().calculate(&request).await;
    spinner.finish_and_clear();

    match result {
        Ok(calculation) => {
            println!("{}", serde_json::to_string_pretty(&calculation)?);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Tariff calculation failed: {}", e));
            Err(e.into())
        }
    }
}
