//! Configuration management for the inference node
//!
//! Loads from optional config files + environment variables via .env

mod types;

pub use types::*;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

/// Environment names used by existing deployments, mapped onto config keys
const LEGACY_ENV_KEYS: [(&str, &str); 4] = [
    ("UPSHOT_APIKEY", "credentials.upshot_api_key"),
    ("RPC", "credentials.rpc"),
    ("COINGECKO_APIKEY", "credentials.coingecko_api_key"),
    ("CRYPTOCOMPARE_APIKEY", "credentials.cryptocompare_api_key"),
];

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub credentials: Credentials,
    pub log: LogConfig,
}

impl AppConfig {
    /// Built-in defaults, before any file or environment source
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = Config::builder()
            // Server defaults
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", 8000)?
            // Upstream defaults
            .set_default("upstream.binance_url", "https://api.binance.com")?
            .set_default("upstream.coingecko_url", "https://api.coingecko.com")?
            .set_default(
                "upstream.cryptocompare_url",
                "https://min-api.cryptocompare.com",
            )?
            .set_default("upstream.upshot_url", "https://api.upshot.xyz")?
            .set_default("upstream.geckoterminal_url", "https://api.geckoterminal.com")?
            .set_default("upstream.timeout_ms", 0)?
            // Credentials default to blank (absent)
            .set_default("credentials.upshot_api_key", "")?
            .set_default("credentials.rpc", "")?
            .set_default("credentials.coingecko_api_key", "")?
            .set_default("credentials.cryptocompare_api_key", "")?
            // Logging defaults
            .set_default("log.json", false)?;

        Ok(builder)
    }

    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let builder = Self::defaults()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (INFERENCE__*)
            .add_source(Environment::with_prefix("INFERENCE").separator("__"));

        let builder = Self::with_legacy_env(builder, |var| std::env::var(var).ok())?;

        Self::from_builder(builder)
    }

    /// Apply legacy variables on top of `builder`. Blank values are skipped so
    /// an empty `RPC=` line cannot mask a prefixed setting.
    pub fn with_legacy_env<F>(
        mut builder: ConfigBuilder<DefaultState>,
        lookup: F,
    ) -> Result<ConfigBuilder<DefaultState>>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in LEGACY_ENV_KEYS {
            let value = lookup(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(key, value)?;
        }
        Ok(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate a digest of the config (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "listen={}:{} upshot_key={} rpc={} coingecko_key={} cryptocompare_key={} timeout_ms={}",
            self.server.bind,
            self.server.port,
            Credentials::presence(&self.credentials.upshot_api_key),
            Credentials::presence(&self.credentials.rpc),
            Credentials::presence(&self.credentials.coingecko_api_key),
            Credentials::presence(&self.credentials.cryptocompare_api_key),
            self.upstream.timeout_ms,
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let cfg = AppConfig::from_builder(AppConfig::defaults().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.upstream.binance_url, "https://api.binance.com");
        assert!(cfg.upstream.timeout().is_none());
        assert!(!cfg.credentials.has_upshot_api_key());
        assert!(!cfg.credentials.has_rpc());
        assert!(!cfg.log.json);
    }

    #[test]
    fn test_overrides_apply() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("server.port", 9100)
            .unwrap()
            .set_override("upstream.timeout_ms", 2500)
            .unwrap()
            .set_override_option("credentials.rpc", Some("http://node:26657"))
            .unwrap()
            .set_override_option("credentials.upshot_api_key", None::<String>)
            .unwrap();

        let cfg = AppConfig::from_builder(builder).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(
            cfg.upstream.timeout(),
            Some(std::time::Duration::from_millis(2500))
        );
        assert!(cfg.credentials.has_rpc());
        assert!(!cfg.credentials.has_upshot_api_key());
        assert_eq!(cfg.server.socket_addr().unwrap().port(), 9100);
    }

    #[test]
    fn test_blank_legacy_var_keeps_prefixed_value() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("credentials.rpc", "http://node:26657")
            .unwrap()
            .set_override("credentials.upshot_api_key", "from-prefixed")
            .unwrap();
        let builder = AppConfig::with_legacy_env(builder, |var| match var {
            "RPC" => Some("  ".to_string()),
            "UPSHOT_APIKEY" => Some("from-legacy".to_string()),
            _ => None,
        })
        .unwrap();

        let cfg = AppConfig::from_builder(builder).unwrap();
        assert_eq!(cfg.credentials.rpc, "http://node:26657");
        assert_eq!(cfg.credentials.upshot_api_key, "from-legacy");
        assert!(cfg.credentials.coingecko_api_key.is_empty());
    }

    #[test]
    fn test_ipv6_bind() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("server.bind", "::")
            .unwrap();
        let cfg = AppConfig::from_builder(builder).unwrap();

        let addr = cfg.server.socket_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_bad_bind_is_error() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("server.bind", "not-an-ip")
            .unwrap();
        let cfg = AppConfig::from_builder(builder).unwrap();
        assert!(cfg.server.socket_addr().is_err());
    }

    #[test]
    fn test_digest_hides_secrets() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("credentials.coingecko_api_key", "CG-secret-value")
            .unwrap();
        let cfg = AppConfig::from_builder(builder).unwrap();

        let digest = cfg.to_string();
        assert!(digest.contains("coingecko_key=set"));
        assert!(digest.contains("upshot_key=missing"));
        assert!(!digest.contains("CG-secret-value"));
        assert!(!format!("{:?}", cfg).contains("CG-secret-value"));
    }
}
