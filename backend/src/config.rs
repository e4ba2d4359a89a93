use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use dotenvy::dotenv;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expires_days")]
    pub expires_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Put the token verifier in front of every create, delete and update route.
    #[serde(default)]
    pub protect_mutations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
            protect_mutations: false,
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_database_url() -> String {
    "sqlite://jlearn.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_expires_days() -> i64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    10
}

impl AppConfig {
    /// Loads `.env`, then layers `Config.toml`, `APP_`-prefixed variables
    /// (e.g. `APP_JWT__SECRET`) and the bare `PORT` / `JWT_SECRET` names.
    pub fn from_env() -> Result<Self, figment::Error> {
        dotenv().ok();
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("Config.toml")) // For non-sensitive defaults
            .merge(Env::prefixed("APP_").split("__")) // e.g., APP_DATABASE__URL
            .merge(Env::raw().filter_map(|key| match key.as_str().to_ascii_lowercase().as_str() {
                "port" => Some("web.port".into()),
                "jwt_secret" => Some("jwt.secret".into()),
                _ => None,
            }))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let config: AppConfig = figment.extract()?;

        if config.jwt.secret.trim().is_empty() {
            return Err(figment::Error::from(
                "jwt.secret must not be empty (set APP_JWT__SECRET or JWT_SECRET)".to_string(),
            ));
        }

        tracing::info!(
            port = config.web.port,
            database = %config.database.url,
            protect_mutations = config.auth.protect_mutations,
            "Configuration loaded successfully"
        );

        Ok(config)
    }
}
