//! Backend entry-point: loads settings, seeds demo data and serves the API.

mod server;

use std::sync::Arc;

use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use company_registry::demo_data::seed_demo_data;
use company_registry::domain::CompanyService;
use company_registry::outbound::memory::InMemoryEntityStore;
use company_registry::settings::ServerSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| {
        error!(error = %e, "failed to load server settings");
        std::io::Error::other(format!("failed to load server settings: {e}"))
    })?;

    let store = Arc::new(InMemoryEntityStore::new());
    let seeding = CompanyService::new(Arc::clone(&store));
    seed_demo_data(&settings, &seeding).await.map_err(|e| {
        error!(error = %e, "demo data seeding failed");
        std::io::Error::other(format!("demo data seeding failed: {e}"))
    })?;

    let server = create_server(ServerConfig::new(settings.bind_addr(), store))?;
    server.await
}
