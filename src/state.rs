// src/state.rs
use crate::config::Config;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_cookies::Key;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<Config>,
    // Chave (derivada de SESSION_SECRET) para assinar os cookies de preferências
    pub chave_cookies: Key,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        let chave_cookies = Key::from(config.session_secret.as_bytes());
        Self {
            db_pool,
            config: Arc::new(config),
            chave_cookies,
        }
    }
}
