use anyhow::Context;
use shelf_app::App;
use shelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Shelf settings")?;
    shelf_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        database = ?settings.database.backend,
        storage = ?settings.storage.backend,
        "shelf-app bootstrap starting"
    );

    App::from_settings(settings).await?.serve().await
}
