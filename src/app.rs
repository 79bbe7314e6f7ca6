use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::RelayConfig;
use crate::interfaces::http::start_server;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = RelayConfig::load().map_err(|err| {
        tracing::error!(error = %err, "Failed to load relay config");
        err
    })?;

    actix_web::rt::System::new().block_on(async move {
        let relay = start_server(&config)?;
        relay.server.await?;
        tracing::info!("Relay endpoint stopped");
        Ok::<(), AppError>(())
    })
}
