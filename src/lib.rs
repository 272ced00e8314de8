pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::ApiClient;
pub use adapters::leaflet::LeafletRenderer;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use self::core::{
    etl::{PrintoutEngine, RunReport},
    pipeline::PrintoutPipeline,
};
pub use domain::extract::{parse_pollutants, ExtractError};
pub use domain::model::{Pollutant, PollutionLevels};
pub use utils::error::{PrintoutError, Result};
