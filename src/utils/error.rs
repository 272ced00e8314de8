use crate::domain::extract::ExtractError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintoutError {
    #[error("Pollutant extraction failed: {0}")]
    ExtractError(#[from] ExtractError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    ApiStatusError { url: String, status: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Rendering error: {message}")]
    RenderError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl PrintoutError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PrintoutError::MissingConfigError { .. }
                | PrintoutError::InvalidConfigValueError { .. }
                | PrintoutError::ConfigValidationError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PrintoutError::ApiError(_) | PrintoutError::ApiStatusError { .. } => {
                "Could not reach the address pollution API".to_string()
            }
            PrintoutError::SerializationError(_) => {
                "The address pollution API returned an unexpected response".to_string()
            }
            PrintoutError::ExtractError(e) => {
                format!("The API response could not be understood: {}", e)
            }
            PrintoutError::MissingConfigError { field } => {
                format!("Missing required setting `{}`", field)
            }
            PrintoutError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting `{}` is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PrintoutError::ApiError(_) | PrintoutError::ApiStatusError { .. } => {
                "Check your network connection and the API base URL, then run again"
            }
            PrintoutError::ExtractError(_) | PrintoutError::SerializationError(_) => {
                "The API format may have changed; check the response against the extraction code"
            }
            PrintoutError::IoError(_) | PrintoutError::CsvError(_) => {
                "Check that the output directory is writable"
            }
            PrintoutError::ImageError(_) | PrintoutError::RenderError { .. } => {
                "Check the leaflet background image and font family"
            }
            _ if self.is_config_error() => {
                "Check the command line flags or the TOML configuration file"
            }
            _ => "Run again with --verbose for more details",
        }
    }
}

pub type Result<T> = std::result::Result<T, PrintoutError>;
