//! Turns an address pollution response into [`PollutionLevels`].
//!
//! NO2 arrives as a numeric string. PM2.5 and PM10 only appear inside the
//! `healthCosts` display sentence, so they are pulled out with fixed
//! patterns. A wording change upstream fails here with
//! [`ExtractError::PatternNotFound`] instead of producing a zero reading.

use crate::domain::model::{AddressResponse, Pollutant, PollutionLevels};
use regex::Regex;
use std::num::ParseFloatError;
use std::sync::LazyLock;
use thiserror::Error;

static PM2_5_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"annual average of the pollutant PM2\.5 is (\d+\.\d+)mcg/m3")
        .expect("PM2.5 pattern is a valid regex")
});

static PM10_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"reading for PM10 at this address is (\d+\.\d+)mcg/m3")
        .expect("PM10 pattern is a valid regex")
});

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to parse {pollutant} reading `{raw}`: {source}")]
    Parse {
        pollutant: Pollutant,
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("couldn't find the {pollutant} reading in `{text}`")]
    PatternNotFound { pollutant: Pollutant, text: String },

    #[error("{pollutant} reading `{raw}` is not a finite non-negative number")]
    InvalidReading { pollutant: Pollutant, raw: String },
}

impl ExtractError {
    /// The reading that failed.
    pub fn pollutant(&self) -> Pollutant {
        match self {
            ExtractError::Parse { pollutant, .. }
            | ExtractError::PatternNotFound { pollutant, .. }
            | ExtractError::InvalidReading { pollutant, .. } => *pollutant,
        }
    }
}

/// Extracts all three readings. The first failing reading aborts the whole
/// extraction.
pub fn parse_pollutants(resp: &AddressResponse) -> Result<PollutionLevels, ExtractError> {
    let no2 = parse_no2(resp)?;
    let pm2_5 = parse_pm2_5(resp)?;
    let pm10 = parse_pm10(resp)?;

    Ok(PollutionLevels::new(
        resp.data.formatted_address.clone(),
        resp.data.air_pollution.rating.level_desc.clone(),
        no2,
        pm2_5,
        pm10,
    ))
}

pub fn parse_no2(resp: &AddressResponse) -> Result<f64, ExtractError> {
    parse_reading(Pollutant::No2, &resp.data.air_pollution.concentration)
}

pub fn parse_pm2_5(resp: &AddressResponse) -> Result<f64, ExtractError> {
    find_reading(
        Pollutant::Pm2_5,
        &PM2_5_PATTERN,
        &resp.data.air_pollution.rating.health_costs,
    )
}

pub fn parse_pm10(resp: &AddressResponse) -> Result<f64, ExtractError> {
    find_reading(
        Pollutant::Pm10,
        &PM10_PATTERN,
        &resp.data.air_pollution.rating.health_costs,
    )
}

fn find_reading(pollutant: Pollutant, pattern: &Regex, text: &str) -> Result<f64, ExtractError> {
    let captured = pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| ExtractError::PatternNotFound {
            pollutant,
            text: text.to_string(),
        })?;

    parse_reading(pollutant, captured.as_str())
}

/// `f64::from_str` also accepts `NaN`, `inf` and signed values, none of
/// which is a concentration.
fn parse_reading(pollutant: Pollutant, raw: &str) -> Result<f64, ExtractError> {
    let value = raw.parse::<f64>().map_err(|source| ExtractError::Parse {
        pollutant,
        raw: raw.to_string(),
        source,
    })?;

    if !value.is_finite() || value.is_sign_negative() {
        return Err(ExtractError::InvalidReading {
            pollutant,
            raw: raw.to_string(),
        });
    }
    Ok(value)
}
