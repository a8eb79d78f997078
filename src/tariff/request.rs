//! Tariff calculation request: arguments, validation and the normalized payload.

use crate::error::{Result, TariffError};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Mode of transport accepted by the tariff API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Air,
    Sea,
    Land,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Air => "air",
            TransportMode::Sea => "sea",
            TransportMode::Land => "land",
        }
    }
}

impl FromStr for TransportMode {
    type Err = TariffError;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "air" => Ok(TransportMode::Air),
            "sea" => Ok(TransportMode::Sea),
            "land" => Ok(TransportMode::Land),
            _ => Err(TariffError::InvalidInput(
                "modeOfTransport must be one of: air, sea, land".to_string(),
            )),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `calculate_tariff` arguments as received from the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffArgs {
    pub hts8: String,
    pub item_value: f64,
    #[serde(deserialize_with = "integral")]
    pub item_quantity: i64,
    pub origin_country: String,
    pub country_of_arrival: String,
    pub mode_of_transport: String,
    pub entry_date: String,
    pub loading_date: String,
}

/// Accepts JSON integers and floats with no fractional part.
fn integral<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(serde::de::Error::custom(format!(
            "expected an integer, got {}",
            number
        ))),
    }
}

/// Validated, normalized payload forwarded to the tariff API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffRequest {
    pub hts8: String,
    pub item_value: f64,
    pub item_quantity: i64,
    pub origin_country: String,
    pub country_of_arrival: String,
    pub mode_of_transport: TransportMode,
    pub entry_date: String,
    pub loading_date: String,
}

impl TariffRequest {
    /// Validate tool arguments.
    ///
    /// Only the quantity and transport mode are enforced. Code, country and
    /// date formats belong to the downstream API and are forwarded verbatim.
    pub fn validate(args: TariffArgs) -> Result<Self> {
        if args.item_quantity < 1 {
            return Err(TariffError::InvalidInput("itemQuantity must be >= 1".to_string()));
        }
        let mode_of_transport = args.mode_of_transport.parse::<TransportMode>()?;

        let request = Self {
            hts8: args.hts8,
            item_value: args.item_value,
            item_quantity: args.item_quantity,
            origin_country: args.origin_country,
            country_of_arrival: args.country_of_arrival,
            mode_of_transport,
            entry_date: args.entry_date,
            loading_date: args.loading_date,
        };

        for note in request.format_advisories() {
            warn!("[calculate_tariff] {}", note);
        }

        Ok(request)
    }

    /// Caller-contract deviations that are logged but not rejected.
    pub fn format_advisories(&self) -> Vec<String> {
        let mut notes = Vec::new();

        if self.hts8.len() != 8 || !self.hts8.chars().all(|c| c.is_ascii_digit()) {
            notes.push(format!("hts8 '{}' is not an 8-digit code", self.hts8));
        }
        for (field, value) in [
            ("originCountry", &self.origin_country),
            ("countryOfArrival", &self.country_of_arrival),
        ] {
            if value.len() != 2 || !value.chars().all(|c| c.is_ascii_uppercase()) {
                notes.push(format!("{} '{}' is not an ISO 3166-1 alpha-2 code", field, value));
            }
        }
        for (field, value) in [("entryDate", &self.entry_date), ("loadingDate", &self.loading_date)] {
            if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                notes.push(format!("{} '{}' is not a YYYY-MM-DD date", field, value));
            }
        }

        notes
    }
}
