use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    /// Shared secret compared against the X-Admin-Token request header.
    pub admin_token: String,
    pub cors_allowed_origins: Option<String>,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")?,
            admin_token: env::var("ADMIN_SECRET_TOKEN")?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_HOURS.to_string())
                .parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 3000,
            database_url: "postgres://localhost:5432/redeem".to_string(),
            admin_token: "test-secret".to_string(),
            cors_allowed_origins: None,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }

    #[test]
    fn test_default_ttl_is_24h() {
        let config = base_config();
        assert_eq!(config.token_ttl_hours, 24);
    }
}
