//! CLI command implementations.

mod calculate;
mod config;
mod doctor;
mod find;
mod serve;
mod stdio;

pub use calculate::run_calculate;
pub use config::run_config;
pub use doctor::run_doctor;
pub use find::run_find;
pub use serve::run_serve;
pub use stdio::run_stdio;
