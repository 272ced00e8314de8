use clap::Parser;
use pollution_printouts::core::ConfigProvider;
use pollution_printouts::utils::{logger, validation::Validate};
use pollution_printouts::{
    CliConfig, LocalStorage, PrintoutEngine, PrintoutError, PrintoutPipeline, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pollution-printouts");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config).await,
                Err(e) => Err(e),
            }
        }
        None => run(cli).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ Run failed: {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(if e.is_config_error() { 1 } else { 2 });
    }
}

async fn run<C>(config: C) -> Result<(), PrintoutError>
where
    C: ConfigProvider + Validate + 'static,
{
    config.validate()?;

    let storage = LocalStorage::new(config.output_path());
    let pipeline = PrintoutPipeline::new(storage, config)?;
    let engine = PrintoutEngine::new(pipeline);

    let report = engine.run().await?;

    tracing::info!("✅ Leaflet run completed successfully!");
    println!(
        "✅ Rendered {} of {} leaflets ({} skipped)",
        report.rendered, report.fetched, report.skipped
    );
    println!("📁 Output saved to: {}", report.output_path);
    Ok(())
}
