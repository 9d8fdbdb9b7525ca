use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

fn default_http_timeout() -> u64 {
  30
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  pub renderer: RendererConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

/// Which backend turns invoices into PDFs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
  Wkhtmltopdf,
  Http,
}

/// Renderer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
  pub backend: RendererBackend,
  pub wkhtmltopdf_path: Option<String>,
  #[serde(default)]
  pub http: Option<HttpRendererConfig>,
}

/// Remote render service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpRendererConfig {
  pub url: String,
  #[serde(default = "default_http_timeout")]
  pub timeout_seconds: u64,
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with INVOICER_ prefix
  ///
  /// # Environment Variables
  ///
  /// Environment variables use the INVOICER_ prefix and are separated by double underscores:
  /// - `INVOICER_SERVER__PORT=8080`
  /// - `INVOICER_RENDERER__BACKEND=http`
  /// - `INVOICER_RENDERER__HTTP__URL=http://renderer:4000/invoice`
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("INVOICER")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }
}
