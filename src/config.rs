use std::{env, time::Duration};

use crate::services::mock_service::DEFAULT_MAX_QUANTITY;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub db: DbSettings,
    pub mocks: MockSettings,
}

#[derive(Debug, Clone)]
pub struct DbSettings {
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct MockSettings {
    /// Mounts the unauthenticated mock routes.
    pub routes_enabled: bool,
    pub seed: Option<u64>,
    pub max_quantity: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed("APP_PORT").unwrap_or(3000);

        let db = DbSettings {
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(10),
            connect_timeout: Duration::from_secs(parsed("DB_CONNECT_TIMEOUT_SECS").unwrap_or(5)),
            acquire_timeout: Duration::from_secs(parsed("DB_ACQUIRE_TIMEOUT_SECS").unwrap_or(5)),
        };

        let mocks = MockSettings {
            routes_enabled: parsed("MOCK_ROUTES_ENABLED").unwrap_or(false),
            seed: parsed("MOCK_SEED"),
            max_quantity: parsed("MOCK_MAX_QUANTITY").unwrap_or(DEFAULT_MAX_QUANTITY),
        };

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            db,
            mocks,
        })
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
