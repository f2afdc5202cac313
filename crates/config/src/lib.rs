pub mod schema;
pub mod watcher;

pub use schema::{ApiConfig, CarbonConfig, RefreshConfig, RenderConfig};
pub use watcher::ConfigWatcher;

use carbon_core::{ReportError, Result};
use std::path::{Path, PathBuf};

/// Environment variable that replaces `api.auth_token` when set.
pub const TOKEN_ENV: &str = "CARBON_AUTH_TOKEN";

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "CARBON_CONFIG";

/// Load configuration from a TOML file.  Returns `CarbonConfig::default()` if
/// the file doesn't exist so a first run still reports something.
///
/// The auth token from [`TOKEN_ENV`] wins over the file's value.
pub fn load(path: impl AsRef<Path>) -> Result<CarbonConfig> {
    let path = path.as_ref();
    let config = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("cannot read '{}': {e}", path.display()))
        })?;
        parse(&raw)?
    } else {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        CarbonConfig::default()
    };

    Ok(with_token_override(config, std::env::var(TOKEN_ENV).ok()))
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<CarbonConfig> {
    let config: CarbonConfig =
        toml::from_str(raw).map_err(|e| ReportError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &CarbonConfig) -> Result<()> {
    if config.api.zone_code.trim().is_empty() {
        return Err(ReportError::Config("api.zone_code must not be empty".into()));
    }
    if config.api.endpoint_base.trim().is_empty() {
        return Err(ReportError::Config("api.endpoint_base must not be empty".into()));
    }
    if config.refresh.interval_secs == 0 {
        return Err(ReportError::Config("refresh.interval_secs must be at least 1".into()));
    }
    Ok(())
}

/// Replace the configured token with `token` unless it is absent or blank.
pub fn with_token_override(mut config: CarbonConfig, token: Option<String>) -> CarbonConfig {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        config.api.auth_token = token;
    }
    config
}

/// Pick the config file: explicit path, then `$CARBON_CONFIG`, then [`default_path`].
pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(default_path)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("carbon").join("carbon.toml")
}
