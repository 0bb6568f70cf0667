use anyhow::{Context, Result};
use langsense::{
    default_adapters, ConfigSource, DetectionPreferences, DetectionSettings, HttpConfigSource,
    JsonFileSource, LanguageDetectionService, StaticSource,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("langsense=info".parse()?),
        )
        .init();

    let text: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        anyhow::bail!("usage: langsense <text to identify>");
    }

    // Catalogue source: URL, then file, then the baked-in defaults
    let source: Box<dyn ConfigSource> = if let Ok(url) = std::env::var("LANGSENSE_CATALOGUE_URL") {
        Box::new(HttpConfigSource::new(url).context("building catalogue HTTP source")?)
    } else if let Ok(path) = std::env::var("LANGSENSE_CATALOGUE_PATH") {
        Box::new(JsonFileSource::new(path))
    } else {
        Box::new(StaticSource::empty())
    };

    let settings = DetectionSettings::from_env();
    let service = LanguageDetectionService::new(settings, default_adapters())
        .context("constructing detection service")?;

    let served = service
        .initialize(source.as_ref())
        .await
        .context("loading language catalogue")?;
    info!("catalogue ready with {} languages", served);

    let preferences = std::env::var("LANGSENSE_PREFERRED_LANGUAGE")
        .ok()
        .map(DetectionPreferences::language);

    let result = service.detect(&text, preferences.as_ref()).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    info!(
        "detected {} via {} in {:.2}ms",
        result.language_code,
        result.method_tag(),
        result.processing_time_ms
    );
    Ok(())
}
