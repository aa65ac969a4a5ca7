use config::{Config as ConfigLoader, ConfigError, File};
use parley_sync::SupabaseConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variables that override a nested config key
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_REQUEST_TIMEOUT_SECS", "server.request_timeout_secs"),
    ("PROVIDER_BASE_URL", "provider.base_url"),
    ("PROVIDER_REFERER", "provider.referer"),
    ("STORAGE_SETTINGS_PATH", "storage.settings_path"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub provider: ProviderSection,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub supabase_access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for local routes; completion and model-list routes are not bounded
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

/// Where completion and catalog requests go
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSection {
    pub base_url: String,
    /// Sent as `HTTP-Referer`
    pub referer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub settings_path: PathBuf,
    #[serde(default = "default_notice_capacity")]
    pub notice_capacity: usize,
}

fn default_notice_capacity() -> usize {
    64
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables listed in `ENV_OVERRIDES`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, non_empty_env(var))?;
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Sync is optional; all three come from ENV
        cfg.supabase_url = non_empty_env("SUPABASE_URL");
        cfg.supabase_anon_key = non_empty_env("SUPABASE_ANON_KEY");
        cfg.supabase_access_token = non_empty_env("SUPABASE_ACCESS_TOKEN");

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    /// Supabase connection, present only when URL and anon key are both set
    pub fn supabase(&self) -> Option<SupabaseConfig> {
        let url = self.supabase_url.as_deref()?;
        let anon_key = self.supabase_anon_key.as_deref()?;

        let mut config = SupabaseConfig::new(url, anon_key);
        if let Some(token) = &self.supabase_access_token {
            config = config.with_access_token(token.clone());
        }
        Some(config)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
