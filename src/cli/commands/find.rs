//! Find command implementation.

use crate::app::App;
use crate::cli::Output;
use crate::config::{Environment, Settings};
use anyhow::Result;

/// Run a single `find_hts8` lookup.
pub async fn run_find(query: &str, settings: Settings) -> Result<()> {
    let env = Environment::from_env()?;
    let app = App::from_config(&settings, &env).await?;

    let spinner = Output::spinner("Searching HTS codes...");
    let result = app.lookup().search(query).await;
    spinner.finish_and_clear();

    match result {
        Ok(content) if content.trim().is_empty() => {
            Output::warning("No HTS candidates found for that description.");
        }
        Ok(content) => {
            let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
            Output::success(&format!("Found {} candidates", lines.len()));
            for (i, line) in lines.iter().enumerate() {
                Output::candidate(i + 1, line);
            }
        }
        Err(e) => {
            Output::error(&format!("Lookup failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
