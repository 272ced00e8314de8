use crate::adapters::http::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_INTERVAL};
use crate::adapters::leaflet::{DEFAULT_BACKGROUND, DEFAULT_FONT_FAMILY};
use crate::config::{validate_settings, DEFAULT_PROJECT_URL};
use crate::core::ConfigProvider;
use crate::utils::error::{PrintoutError, Result};
use crate::utils::validation::{validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub client: ClientConfig,
    pub lookup: LookupConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub leaflet: LeafletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub contact_email: Option<String>,
    pub project_url: Option<String>,
    pub base_url: Option<String>,
    pub request_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub postcodes: Vec<String>,
    pub max_addresses: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafletConfig {
    pub background: String,
    pub font_family: String,
}

impl Default for LeafletConfig {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl TomlConfig {
    /// Loads a configuration file, substituting `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PrintoutError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PrintoutError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value, e.g. `${USER_AGENT_EMAIL}`.
    /// Unset variables are left as written so validation can report them.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_required_field("client.contact_email", &self.client.contact_email)?;
        validate_settings(self)
    }
}

impl ConfigProvider for TomlConfig {
    fn contact_email(&self) -> &str {
        self.client.contact_email.as_deref().unwrap_or_default()
    }

    fn project_url(&self) -> &str {
        self.client
            .project_url
            .as_deref()
            .unwrap_or(DEFAULT_PROJECT_URL)
    }

    fn api_base_url(&self) -> &str {
        self.client.base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    fn postcodes(&self) -> &[String] {
        &self.lookup.postcodes
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn background_path(&self) -> &str {
        &self.leaflet.background
    }

    fn font_family(&self) -> &str {
        &self.leaflet.font_family
    }

    fn request_interval(&self) -> Duration {
        self.client
            .request_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_INTERVAL)
    }

    fn max_addresses(&self) -> Option<usize> {
        self.lookup.max_addresses
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
