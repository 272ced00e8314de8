pub mod cli;
pub mod toml_config;

use crate::adapters::http::DEFAULT_API_BASE_URL;
use crate::adapters::leaflet::{DEFAULT_BACKGROUND, DEFAULT_FONT_FAMILY};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_contact_email, validate_file_extensions, validate_non_empty_list, validate_path,
    validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PROJECT_URL: &str = "https://github.com/fawkesley/pollution-printouts";
pub const MAX_REQUEST_INTERVAL_MS: u64 = 60_000;

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "pollution-printouts"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Render air pollution leaflets for every address in a set of postcodes")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, env = "USER_AGENT_EMAIL", default_value = ""))]
    pub contact_email: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_PROJECT_URL))]
    pub project_url: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_API_BASE_URL))]
    pub api_base_url: String,

    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ','))]
    pub postcodes: Vec<String>,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_BACKGROUND))]
    pub background: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_FONT_FAMILY))]
    pub font_family: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "2000"))]
    pub request_interval_ms: u64,

    #[cfg_attr(feature = "cli", arg(long, help = "Stop after this many addresses"))]
    pub max_addresses: Option<usize>,

    #[cfg_attr(feature = "cli", arg(long, help = "Read settings from a TOML file instead"))]
    pub config: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit JSON log lines"))]
    pub json_logs: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn contact_email(&self) -> &str {
        &self.contact_email
    }

    fn project_url(&self) -> &str {
        &self.project_url
    }

    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn postcodes(&self) -> &[String] {
        &self.postcodes
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn background_path(&self) -> &str {
        &self.background
    }

    fn font_family(&self) -> &str {
        &self.font_family
    }

    fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    fn max_addresses(&self) -> Option<usize> {
        self.max_addresses
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}

/// Checks shared by every [`ConfigProvider`].
pub fn validate_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_contact_email("contact_email", config.contact_email())?;
    validate_url("api_base_url", config.api_base_url())?;
    if !config.project_url().is_empty() {
        validate_url("project_url", config.project_url())?;
    }
    validate_non_empty_list("postcodes", config.postcodes())?;
    validate_path("output_path", config.output_path())?;
    validate_path("background", config.background_path())?;
    validate_file_extensions("background", &[config.background_path().to_string()], &["png"])?;
    validate_range(
        "request_interval_ms",
        config.request_interval().as_millis() as u64,
        0,
        MAX_REQUEST_INTERVAL_MS,
    )?;
    if let Some(max) = config.max_addresses() {
        validate_positive_number("max_addresses", max, 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_config() -> CliConfig {
        CliConfig {
            contact_email: "me@example.com".to_string(),
            project_url: DEFAULT_PROJECT_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            postcodes: vec!["L15 0EB".to_string()],
            output_path: "./output".to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            request_interval_ms: 2000,
            max_addresses: None,
            config: None,
            json_logs: false,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_cli_config() {
        assert!(cli_config().validate().is_ok());
    }

    #[test]
    fn test_missing_contact_email() {
        let config = CliConfig {
            contact_email: String::new(),
            ..cli_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_postcodes() {
        let config = CliConfig {
            postcodes: vec![],
            ..cli_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_background_must_be_png() {
        let config = CliConfig {
            background: "leaflet.jpg".to_string(),
            ..cli_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_addresses() {
        let config = CliConfig {
            max_addresses: Some(0),
            ..cli_config()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parse_cli_args() {
        let config = CliConfig::try_parse_from([
            "pollution-printouts",
            "--contact-email",
            "me@example.com",
            "--postcodes",
            "L15 0EB,L15 2HD",
            "--max-addresses",
            "3",
        ])
        .unwrap();

        assert_eq!(config.postcodes, vec!["L15 0EB", "L15 2HD"]);
        assert_eq!(config.max_addresses, Some(3));
        assert_eq!(config.request_interval(), Duration::from_secs(2));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
