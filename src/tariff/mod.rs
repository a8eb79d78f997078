//! Tariff duty calculation via the external tariff API.

mod client;
mod request;

pub use client::{TariffCalculation, TariffClient, DEFAULT_TIMEOUT};
pub use request::{TariffArgs, TariffRequest, TransportMode};
