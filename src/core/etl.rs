use crate::core::Pipeline;
use crate::utils::error::Result;

/// Counts from a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output_path: String,
    pub fetched: usize,
    pub rendered: usize,
    pub skipped: usize,
}

pub struct PrintoutEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PrintoutEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting leaflet run");

        tracing::info!("Fetching address pollution data...");
        let responses = self.pipeline.extract().await?;
        let fetched = responses.len();
        tracing::info!("Fetched {} address responses", fetched);

        tracing::info!("Extracting pollutant readings...");
        let transformed = self.pipeline.transform(responses).await?;
        let rendered = transformed.levels.len();
        let skipped = transformed.skipped;
        if skipped > 0 {
            tracing::warn!("{} addresses skipped, see warnings above", skipped);
        }

        tracing::info!("Rendering {} leaflets...", rendered);
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunReport {
            output_path,
            fetched,
            rendered,
            skipped,
        })
    }
}
