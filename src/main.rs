use dotenv::dotenv;
use std::sync::Arc;
use videohub::client::ApiClient;
use videohub::config::Config;
use videohub::pages::Context;
use videohub::storage::SqliteSessionStore;

mod app;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::info!("backend at {}, session store at {}", config.api_url, config.session_db);

    let sessions = SqliteSessionStore::new(&config.session_db)?;
    let backend = ApiClient::new(&config)?;
    let ctx = Context::new(Arc::new(backend), Arc::new(sessions));

    app::run(ctx, config.start_route)?;
    Ok(())
}
