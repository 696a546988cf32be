//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LISTING_MAKER_PORT` | `3000` |
//! | `LISTING_MAKER_MAX_UPLOAD_BYTES` | `10485760` |
//! | `LISTING_MAKER_DEFAULT_CHANNEL` | `Amazon` |
//! | `LISTING_MAKER_PREVIEW_ROWS` | `10` |

use std::env::VarError;

use crate::error::ConfigError;
use crate::models::Channel;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_CHANNEL: &str = "Amazon";
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Settings shared by the CLI and the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
    /// Channel used to name downloads when none is selected.
    pub default_channel: &'static Channel,
    /// Expanded rows returned for display.
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_channel: &crate::models::channel::CHANNELS[0],
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Load `.env` (if present), then read the process environment.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Build the configuration from an env-var lookup, so tests can pass a map
/// instead of mutating the process environment.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };
    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let port = or_default("LISTING_MAKER_PORT", &DEFAULT_PORT.to_string())
        .trim()
        .parse::<u16>()
        .map_err(|e| invalid("LISTING_MAKER_PORT", e.to_string()))?;

    let max_upload_bytes = or_default(
        "LISTING_MAKER_MAX_UPLOAD_BYTES",
        &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
    )
    .trim()
    .parse::<usize>()
    .map_err(|e| invalid("LISTING_MAKER_MAX_UPLOAD_BYTES", e.to_string()))?;

    let default_channel = Channel::parse(&or_default("LISTING_MAKER_DEFAULT_CHANNEL", DEFAULT_CHANNEL))
        .map_err(|e| invalid("LISTING_MAKER_DEFAULT_CHANNEL", e.to_string()))?;

    let preview_rows = or_default(
        "LISTING_MAKER_PREVIEW_ROWS",
        &DEFAULT_PREVIEW_ROWS.to_string(),
    )
    .trim()
    .parse::<usize>()
    .map_err(|e| invalid("LISTING_MAKER_PREVIEW_ROWS", e.to_string()))?;

    Ok(AppConfig {
        port,
        max_upload_bytes,
        default_channel,
        preview_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_defaults() {
        let config = build_app_config(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_channel.name, DEFAULT_CHANNEL);
    }

    #[test]
    fn test_overrides() {
        let config = build_app_config(lookup(&[
            ("LISTING_MAKER_PORT", "8080"),
            ("LISTING_MAKER_MAX_UPLOAD_BYTES", "1024"),
            ("LISTING_MAKER_DEFAULT_CHANNEL", "meesho"),
            ("LISTING_MAKER_PREVIEW_ROWS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.default_channel.name, "Meesho");
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn test_invalid_port() {
        let err = build_app_config(lookup(&[("LISTING_MAKER_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "LISTING_MAKER_PORT"));
    }

    #[test]
    fn test_unknown_default_channel() {
        let err = build_app_config(lookup(&[("LISTING_MAKER_DEFAULT_CHANNEL", "Etsy")])).unwrap_err();
        assert!(err.to_string().contains("Etsy"));
    }
}
