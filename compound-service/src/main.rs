use compound_service::config::CompoundConfig;
use compound_service::services::metrics::init_metrics;
use compound_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CompoundConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("compound-service", "info", config.otlp_endpoint.as_deref());
    init_metrics();

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    Ok(())
}
