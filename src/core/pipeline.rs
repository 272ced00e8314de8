use crate::adapters::http::ApiClient;
use crate::adapters::leaflet::{leaflet_file_name, LeafletRenderer};
use crate::core::{ConfigProvider, Pipeline, Storage, TransformResult};
use crate::domain::extract::parse_pollutants;
use crate::domain::model::{AddressResponse, LeafletSummary};
use crate::utils::error::{PrintoutError, Result};

pub const SUMMARY_FILE: &str = "summary.csv";
const SUMMARY_HEADER: [&str; 9] = [
    "index",
    "address",
    "description",
    "no2",
    "pm2_5",
    "pm10",
    "exceeding",
    "file",
    "rendered_at",
];

/// Looks up every address in the configured postcodes, extracts the
/// pollution readings and renders one leaflet per address.
pub struct PrintoutPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: ApiClient,
}

impl<S: Storage, C: ConfigProvider> PrintoutPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = ApiClient::new(
            config.contact_email(),
            config.project_url(),
            config.api_base_url(),
            config.request_interval(),
        )?;

        Ok(Self {
            storage,
            config,
            client,
        })
    }

    /// The header row is written even when no leaflet was rendered.
    fn summary_csv(rows: &[LeafletSummary]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(SUMMARY_HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| PrintoutError::IoError(e.into_error()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PrintoutPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<AddressResponse>> {
        let mut addresses = Vec::new();

        for postcode in self.config.postcodes() {
            let postcode = postcode.trim();
            if postcode.is_empty() {
                continue;
            }
            tracing::info!("Looking up addresses in {}", postcode);
            addresses.extend(self.client.addresses(postcode).await?);
        }

        if let Some(max) = self.config.max_addresses() {
            if addresses.len() > max {
                tracing::info!("Limiting run to the first {} of {} addresses", max, addresses.len());
                addresses.truncate(max);
            }
        }

        let mut responses = Vec::with_capacity(addresses.len());
        for address in addresses {
            match self.client.address_pollution(address.id).await {
                Ok(response) => responses.push(response),
                Err(e) => {
                    tracing::warn!(
                        address = %address.formatted_address,
                        id = %address.id,
                        "Skipping address: {}",
                        e
                    );
                }
            }
        }

        Ok(responses)
    }

    async fn transform(&self, data: Vec<AddressResponse>) -> Result<TransformResult> {
        let mut result = TransformResult::default();

        for response in data {
            match parse_pollutants(&response) {
                Ok(levels) => result.levels.push(levels),
                Err(e) => {
                    tracing::warn!(
                        address = %response.data.formatted_address,
                        pollutant = %e.pollutant(),
                        "Skipping address: {}",
                        e
                    );
                    result.skipped += 1;
                }
            }
        }

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let renderer =
            LeafletRenderer::load(self.config.background_path(), self.config.font_family())?;
        let mut rows = Vec::with_capacity(result.levels.len());

        for (index, levels) in result.levels.iter().enumerate() {
            let file_name = leaflet_file_name(index, levels.formatted_address());
            tracing::info!("Writing {}", file_name);

            let png = renderer.render_png(levels)?;
            self.storage.write_file(&file_name, &png).await?;

            println!("{}", levels);

            rows.push(LeafletSummary {
                index,
                address: levels.formatted_address().to_string(),
                description: levels.pollution_description().to_string(),
                no2: levels.no2(),
                pm2_5: levels.pm2_5(),
                pm10: levels.pm10(),
                exceeding: levels.exceeds_count(),
                file: file_name,
                rendered_at: chrono::Utc::now().to_rfc3339(),
            });
        }

        let summary = Self::summary_csv(&rows)?;
        self.storage.write_file(SUMMARY_FILE, &summary).await?;
        tracing::debug!("Summary written for {} leaflets", rows.len());

        Ok(self.config.output_path().to_string())
    }
}
