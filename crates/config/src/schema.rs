use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `carbon.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonConfig {
    /// Where and how the history is fetched.
    pub api: ApiConfig,
    /// Which targets receive the rendered summary.
    pub render: RenderConfig,
    /// Watch-mode settings.
    pub refresh: RefreshConfig,
}

/// Electricity Maps API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Grid zone queried, e.g. `"FR"` or `"DE"`.
    pub zone_code: String,
    /// Value of the `auth-token` header.  Empty = header not sent.
    pub auth_token: String,
    /// API root; the history path is appended to it.
    pub endpoint_base: String,
    /// Connect/read timeout in seconds.  `0` leaves the transport default.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            zone_code:     "FR".to_string(),
            auth_token:    String::new(),
            endpoint_base: "https://api.electricitymap.org/v3".to_string(),
            timeout_secs:  0,
        }
    }
}

/// Render-target settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Class shared by every DOM container that receives the summary.
    pub class_name: String,
    /// Print the plain-text summary to stdout.
    pub terminal: bool,
    /// HTML fragment files overwritten on every render.
    pub files: Vec<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            class_name: "button-div".to_string(),
            terminal:   true,
            files:      Vec::new(),
        }
    }
}

/// Watch-mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between two fetches when running with `--watch`.
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 600 }
    }
}
