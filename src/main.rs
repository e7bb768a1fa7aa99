use anyhow::Context;
use hearth_db::DatabaseBinding;
use hearth_kernel::settings::Settings;
use hearth_kernel::ModuleRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Hearth settings")?;
    hearth_telemetry::init(&settings.telemetry);

    tracing::info!(env = ?settings.environment, "hearth-app bootstrap starting");

    let db = hearth_app::connect(&settings, DatabaseBinding::global());

    let mut registry = ModuleRegistry::new();
    hearth_app::register_all(&mut registry);

    hearth_app::start(&registry, &settings, db).await?;
    tracing::info!(
        modules = registry.module_count(),
        db_ready = db.is_ready(),
        "hearth-app bootstrap complete"
    );

    tokio::signal::ctrl_c()
        .await
        .with_context(|| "failed to listen for shutdown signal")?;

    tracing::info!("shutdown signal received");
    registry.stop_modules().await
}
