use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Config file picked up from the working directory when no path is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the REST backend (e.g. http://localhost:8000/api)
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Enable rate limiting
    #[arg(long, env = "RATE_LIMIT_ENABLED")]
    pub rate_limit_enabled: Option<bool>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub site: SiteConfig,
    pub session: SessionConfig,
    pub resilience: ResilienceConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Root of the REST API; resource paths are joined onto it.
    pub api_base_url: String,
    /// Origin that relative media paths (`/media/...`) are resolved against.
    pub media_base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Public origin used for sitemap entries.
    pub base_url: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_minutes: u64,
    pub purge_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub rate_limit_enabled: bool,
    pub timeout_disabled: bool,
    pub timeout_secs: u64,
    pub requests_per_second: f32,
    pub burst_size: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `pretty` or `json`.
    pub format: String,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layered load, lowest to highest precedence:
    /// defaults, config file, `MW_` environment, CLI flags (and their env aliases).
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("backend.api_base_url", "http://localhost:8000/api/")?
            .set_default("backend.media_base_url", "http://localhost:8000")?
            .set_default("backend.request_timeout_secs", 15)?
            .set_default("site.base_url", "https://bhattaraimetalworks.com")?
            .set_default("site.name", "Bhattarai Metal Works")?
            .set_default("site.phone", "+977-9800000000")?
            .set_default("site.email", "info@bhattaraimetalworks.com")?
            .set_default("session.cookie_name", "mw_session")?
            .set_default("session.ttl_minutes", 12 * 60)?
            .set_default("session.purge_interval_secs", 300)?
            .set_default("resilience.rate_limit_enabled", true)?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.timeout_secs", 30)?
            .set_default("resilience.requests_per_second", 20.0)?
            .set_default("resilience.burst_size", 40.0)?
            .set_default("log.format", "pretty")?
            .set_default("log.level", "info")?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::new(path, FileFormat::Yaml).required(true));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::new(CWD_CONFIG_FILE, FileFormat::Yaml));
        }

        // E.g. MW_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("MW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // clap already folded PORT / API_BASE_URL / ... into `cli`, so these
        // overrides cover both the flags and their env aliases.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.api_base_url {
            builder = builder.set_override("backend.api_base_url", url)?;
        }
        if let Some(rl) = cli.rate_limit_enabled {
            builder = builder.set_override("resilience.rate_limit_enabled", rl)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let config = AppConfig::load_from_args([
            "metalworks-web",
            "--port",
            "4100",
            "--api-base-url",
            "http://backend.internal/api/",
        ])
        .unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.backend.api_base_url, "http://backend.internal/api/");
        assert_eq!(config.session.cookie_name, "mw_session");
    }

    #[test]
    fn durations_derive_from_fields() {
        let config = AppConfig::load_from_args(["metalworks-web"]).unwrap();
        assert_eq!(config.session.ttl(), Duration::from_secs(12 * 60 * 60));
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(15));
    }
}
