pub mod api;
pub mod auth;
pub mod config;
pub mod db {
    #[cfg(test)]
    pub mod memory;
    pub mod models;
    pub mod pg;
}
pub mod schema;
pub mod services {
    pub mod dashboard;
    pub mod emission_factors;
    pub mod fake_data;
}
pub mod store;
pub mod utils;

use crate::api::AppState;
use crate::config::Config;
use crate::db::pg;
use crate::services::fake_data;
use crate::store::Stores;
use log::{error, info};

pub fn run() -> Result<(), String> {
    // 1) Load config
    let cfg = Config::from_env().map_err(|e| e.to_string())?;
    info!(
        "Config loaded (bind_addr={}, db_pool_size={}, bcrypt_cost={}, cors_origins={}, seed_demo_data={})",
        cfg.bind_addr,
        cfg.db_pool_size,
        cfg.bcrypt_cost,
        cfg.cors_allowed_origins.len(),
        cfg.seed_demo_data
    );

    // 2) Connect DB
    let pool = pg::connect(&cfg.database_url, cfg.db_pool_size)?;
    info!("Connected to database");

    // 3) Apply pending database migrations
    pg::apply_database_migrations(&pool)?;
    let stores = Stores::postgres(pool);

    // 4) Optional demo records
    if cfg.seed_demo_data {
        fake_data::run(&stores)?;
    }

    // 5) Serve until shutdown
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Starting async runtime failed: {}", e))?;
    let state = AppState::new(stores, &cfg);
    runtime.block_on(api::serve(&cfg, state))
}

fn main() {
    let loaded_env = match config::load_env_from_args(std::env::args_os().skip(1)) {
        Ok(info) => info,
        Err(err) => {
            eprintln!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    // Init logging after environment so RUST_LOG from .env is respected.
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    if let Some(info) = loaded_env.as_ref() {
        let origin = if info.explicit { "CLI-specified" } else { "default" };
        info!("Environment loaded from {} .env file: {}", origin, info.path.display());
    }

    info!(
        "carbon-tracker {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
