use anyhow::Result;
use backend::axum_http::http_serve;
use backend::config::config_loader;
use std::sync::Arc;
use tracing::{error, info};
use vhr_core::infra::user_access_store::UserAccessStore;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Backend exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    vhr_core::observability::init_observability("backend")?;

    let dotenvy_env = config_loader::load()?;
    info!(trial_mode = %dotenvy_env.trial.mode, "ENV has been loaded");

    let store = UserAccessStore::resolve(dotenvy_env.trial.mode, dotenvy_env.database.as_ref())?;
    info!("User access store is ready");

    http_serve::start(Arc::new(dotenvy_env), Arc::new(store)).await?;

    Ok(())
}
