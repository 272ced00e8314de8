use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One of the three pollutants reported per address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    No2,
    Pm2_5,
    Pm10,
}

impl Pollutant {
    pub const ALL: [Pollutant; 3] = [Pollutant::No2, Pollutant::Pm2_5, Pollutant::Pm10];

    /// WHO annual guideline in µg/m³.
    pub fn who_limit(self) -> f64 {
        match self {
            Pollutant::No2 => 10.0,
            Pollutant::Pm2_5 => 5.0,
            Pollutant::Pm10 => 15.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pollutant::No2 => "NO2",
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Address, pollution description and the three pollutant readings for one
/// address. Readings are in µg/m³.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutionLevels {
    formatted_address: String,
    pollution_description: String,
    no2: f64,
    pm2_5: f64,
    pm10: f64,
}

impl PollutionLevels {
    pub fn new(
        formatted_address: impl Into<String>,
        pollution_description: impl Into<String>,
        no2: f64,
        pm2_5: f64,
        pm10: f64,
    ) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            pollution_description: pollution_description.into(),
            no2,
            pm2_5,
            pm10,
        }
    }

    /// e.g. "48 Lindley Street, York"
    pub fn formatted_address(&self) -> &str {
        &self.formatted_address
    }

    /// e.g. "Significant", "Very high"
    pub fn pollution_description(&self) -> &str {
        &self.pollution_description
    }

    pub fn no2(&self) -> f64 {
        self.no2
    }

    pub fn pm2_5(&self) -> f64 {
        self.pm2_5
    }

    pub fn pm10(&self) -> f64 {
        self.pm10
    }

    pub fn reading(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::No2 => self.no2,
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
        }
    }

    /// How many times the reading is over the WHO limit, e.g. 2.5, or 0.9
    /// when within the limit.
    pub fn limit_multiplier(&self, pollutant: Pollutant) -> f64 {
        self.reading(pollutant) / pollutant.who_limit()
    }

    /// Number of pollutants (0 to 3) strictly above their WHO limit.
    pub fn exceeds_count(&self) -> usize {
        Pollutant::ALL
            .iter()
            .filter(|p| self.limit_multiplier(**p) > 1.0)
            .count()
    }

    /// The word to put in front of "safe level": "within", or a multiplier
    /// such as "2.3x". A multiplier of exactly 1.0 renders as "1.0x".
    pub fn safe_level_description(&self, pollutant: Pollutant) -> String {
        let x = self.limit_multiplier(pollutant);
        if x < 1.0 {
            return "within".to_string();
        }
        format!("{:.1}x", x)
    }

    pub fn headline(&self) -> String {
        format!(
            "⚠️ {} AIR POLLUTION ⚠️",
            self.pollution_description.to_uppercase()
        )
    }
}

impl fmt::Display for PollutionLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        writeln!(f, "{}", self.formatted_address)?;
        writeln!(f)?;
        writeln!(
            f,
            "At your home, {} out of 3 pollutants",
            self.exceeds_count()
        )?;
        writeln!(f, "exceed World Health Organisation safe levels.")?;

        for pollutant in [Pollutant::Pm2_5, Pollutant::Pm10, Pollutant::No2] {
            writeln!(f)?;
            writeln!(f, "{}", pollutant)?;
            writeln!(f, "{:.1}", self.reading(pollutant))?;
            writeln!(f, "{} safe level", self.safe_level_description(pollutant))?;
        }
        Ok(())
    }
}

/// Response of `GET /addresses?postcode=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressesResponse {
    pub data: Vec<Address>,
}

/// A search result from the addresses lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub formatted_address: String,
    #[serde(default)]
    pub line_1: String,
    #[serde(default)]
    pub line_2: String,
}

/// Response of `GET /addresses/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressResponse {
    pub data: AddressData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub postcode: Option<PostcodeInfo>,
    #[serde(rename = "airPollution")]
    pub air_pollution: AirPollution,
    #[serde(default)]
    pub solutions: Vec<Solution>,
    pub formatted_address: String,
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostcodeInfo {
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub constituency: String,
    #[serde(default)]
    pub mp: Option<MemberOfParliament>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberOfParliament {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirPollution {
    /// NO2 concentration as a decimal string, e.g. "21.43".
    pub concentration: String,
    pub rating: Rating,
    #[serde(default)]
    pub percentile: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Display prose which embeds the PM2.5 and PM10 readings.
    #[serde(rename = "healthCosts")]
    pub health_costs: String,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(rename = "whoLimit", default)]
    pub who_limit: Option<String>,
    #[serde(rename = "levelDesc")]
    pub level_desc: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Output of the transform phase: records that extracted cleanly, plus the
/// number of addresses dropped because their response could not be read.
#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub levels: Vec<PollutionLevels>,
    pub skipped: usize,
}

/// One row of the `summary.csv` report.
#[derive(Debug, Clone, Serialize)]
pub struct LeafletSummary {
    pub index: usize,
    pub address: String,
    pub description: String,
    pub no2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub exceeding: usize,
    pub file: String,
    pub rendered_at: String,
}
