use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    #[allow(dead_code)]
    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Redis
    pub redis_url: String,
    pub redis_cache_ttl_seconds: u64,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Contractor auth (JWT verified against the identity provider's JWKS)
    pub auth_jwks_url: String,
    pub auth_issuer: String,
    pub auth_audience: String,
    pub jwks_cache_ttl_seconds: u64,

    // Customer portal magic links
    pub portal_base_url: String,
    pub portal_token_secret: String,
    pub portal_token_ttl_hours: u64,

    // Quote event bus
    pub event_bus_capacity: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Database
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        // Redis
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://redis:6379/0".to_string());
        let redis_cache_ttl_seconds = env::var("REDIS_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600); // 1 hour default

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Contractor auth
        let auth_jwks_url = env::var("AUTH_JWKS_URL").context("AUTH_JWKS_URL must be set")?;
        let auth_issuer = env::var("AUTH_ISSUER").context("AUTH_ISSUER must be set")?;
        let auth_audience =
            env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "authenticated".to_string());
        let jwks_cache_ttl_seconds = env::var("JWKS_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1800); // 30 minutes default

        // Customer portal
        let portal_base_url = env::var("PORTAL_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/portal".to_string());
        let portal_token_secret =
            env::var("PORTAL_TOKEN_SECRET").context("PORTAL_TOKEN_SECRET must be set")?;
        let portal_token_ttl_hours = env::var("PORTAL_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(720); // 30 days default

        // Event bus
        let event_bus_capacity = env::var("EVENT_BUS_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256);

        Ok(Settings {
            env,
            server_addr,
            database_url,
            database_max_connections,
            redis_url,
            redis_cache_ttl_seconds,
            cors_allow_origins,
            auth_jwks_url,
            auth_issuer,
            auth_audience,
            jwks_cache_ttl_seconds,
            portal_base_url,
            portal_token_secret,
            portal_token_ttl_hours,
            event_bus_capacity,
        })
    }
}
