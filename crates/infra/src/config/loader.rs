//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variables are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every loaded configuration is validated, including the timezone name.
//!
//! ## Environment Variables
//! - `CHAIRSIDE_TENANT_ID`: Salon tenant id (required)
//! - `CHAIRSIDE_TIMEZONE`: IANA timezone of the salon (required)
//! - `CHAIRSIDE_SLOT_GRANULARITY`: Slot grid step in minutes
//! - `CHAIRSIDE_CONFLICT_SCOPE`: `salon` or `per_staff`
//! - `CHAIRSIDE_ENFORCE_BUSINESS_HOURS`: Reject edits outside hours (true/false)
//! - `CHAIRSIDE_LOG_LEVEL`: Default `EnvFilter` directive
//! - `CHAIRSIDE_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./chairside.json` or `./chairside.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use chairside_domain::{ChairsideError, Config, ConflictScope, Result};
use chrono_tz::Tz;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ChairsideError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value is out of range or the timezone is unknown
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `CHAIRSIDE_TENANT_ID` and `CHAIRSIDE_TIMEZONE` must be present; the rest
/// fall back to their defaults.
///
/// # Errors
/// Returns `ChairsideError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    config.salon.tenant_id = env_var("CHAIRSIDE_TENANT_ID")?;
    config.salon.timezone = env_var("CHAIRSIDE_TIMEZONE")?;

    if let Ok(value) = std::env::var("CHAIRSIDE_SLOT_GRANULARITY") {
        config.scheduling.slot_granularity_minutes = value
            .parse::<u16>()
            .map_err(|e| ChairsideError::Config(format!("Invalid slot granularity: {e}")))?;
    }
    if let Ok(value) = std::env::var("CHAIRSIDE_CONFLICT_SCOPE") {
        config.scheduling.conflict_scope = value.parse::<ConflictScope>()?;
    }
    config.scheduling.enforce_business_hours = env_bool(
        "CHAIRSIDE_ENFORCE_BUSINESS_HOURS",
        config.scheduling.enforce_business_hours,
    );
    if let Ok(level) = std::env::var("CHAIRSIDE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("CHAIRSIDE_LOG_JSON", config.logging.json);

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `ChairsideError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value is out of range or the timezone is unknown
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ChairsideError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ChairsideError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ChairsideError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`). Missing
/// sections and fields take their defaults.
///
/// # Errors
/// Returns `ChairsideError::Config` if format is invalid or parsing fails.
pub(crate) fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    parse_document(contents, path)
}

/// Deserialize a JSON or TOML document chosen by `path`'s extension.
pub(crate) fn parse_document<T: serde::de::DeserializeOwned>(
    contents: &str,
    path: &Path,
) -> Result<T> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ChairsideError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ChairsideError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ChairsideError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Bounds plus a timezone that `chrono-tz` knows.
fn validate(config: &Config) -> Result<()> {
    config.validate()?;
    config.salon.timezone.parse::<Tz>().map_err(|_| {
        ChairsideError::Config(format!("Unknown timezone: {}", config.salon.timezone))
    })?;
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./chairside.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_paths(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_paths(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_paths(base: &Path) -> Vec<PathBuf> {
    vec![
        base.join("config.json"),
        base.join("config.toml"),
        base.join("chairside.json"),
        base.join("chairside.toml"),
        base.join("../config.json"),
        base.join("../config.toml"),
        base.join("../../config.json"),
        base.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `ChairsideError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ChairsideError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 7] = [
        "CHAIRSIDE_TENANT_ID",
        "CHAIRSIDE_TIMEZONE",
        "CHAIRSIDE_SLOT_GRANULARITY",
        "CHAIRSIDE_CONFLICT_SCOPE",
        "CHAIRSIDE_ENFORCE_BUSINESS_HOURS",
        "CHAIRSIDE_LOG_LEVEL",
        "CHAIRSIDE_LOG_JSON",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_CHAIRSIDE_BOOL_YES", "yes");
        std::env::set_var("TEST_CHAIRSIDE_BOOL_UPPER", "TRUE");
        std::env::set_var("TEST_CHAIRSIDE_BOOL_OFF", "off");

        assert!(env_bool("TEST_CHAIRSIDE_BOOL_YES", false));
        assert!(env_bool("TEST_CHAIRSIDE_BOOL_UPPER", false));
        assert!(!env_bool("TEST_CHAIRSIDE_BOOL_OFF", true));

        std::env::remove_var("TEST_CHAIRSIDE_BOOL_MISSING");
        assert!(env_bool("TEST_CHAIRSIDE_BOOL_MISSING", true));
        assert!(!env_bool("TEST_CHAIRSIDE_BOOL_MISSING", false));

        std::env::remove_var("TEST_CHAIRSIDE_BOOL_YES");
        std::env::remove_var("TEST_CHAIRSIDE_BOOL_UPPER");
        std::env::remove_var("TEST_CHAIRSIDE_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("CHAIRSIDE_TENANT_ID", "salon-42");
        std::env::set_var("CHAIRSIDE_TIMEZONE", "Europe/Dublin");
        std::env::set_var("CHAIRSIDE_SLOT_GRANULARITY", "30");
        std::env::set_var("CHAIRSIDE_CONFLICT_SCOPE", "per-staff");
        std::env::set_var("CHAIRSIDE_ENFORCE_BUSINESS_HOURS", "true");
        std::env::set_var("CHAIRSIDE_LOG_LEVEL", "chairside_core=debug");
        std::env::set_var("CHAIRSIDE_LOG_JSON", "1");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.salon.tenant_id, "salon-42");
        assert_eq!(config.salon.timezone, "Europe/Dublin");
        assert_eq!(config.scheduling.slot_granularity_minutes, 30);
        assert_eq!(config.scheduling.conflict_scope, ConflictScope::PerStaff);
        assert!(config.scheduling.enforce_business_hours);
        assert_eq!(config.logging.level, "chairside_core=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CHAIRSIDE_TENANT_ID", "salon-42");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ChairsideError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CHAIRSIDE_TENANT_ID", "salon-42");
        std::env::set_var("CHAIRSIDE_TIMEZONE", "UTC");

        std::env::set_var("CHAIRSIDE_SLOT_GRANULARITY", "quarter");
        assert!(matches!(load_from_env(), Err(ChairsideError::Config(_))));

        std::env::set_var("CHAIRSIDE_SLOT_GRANULARITY", "0");
        assert!(matches!(load_from_env(), Err(ChairsideError::Config(_))));

        std::env::remove_var("CHAIRSIDE_SLOT_GRANULARITY");
        std::env::set_var("CHAIRSIDE_CONFLICT_SCOPE", "chair");
        assert!(matches!(load_from_env(), Err(ChairsideError::Config(_))));

        std::env::remove_var("CHAIRSIDE_CONFLICT_SCOPE");
        std::env::set_var("CHAIRSIDE_TIMEZONE", "Europe/Atlantis");
        assert!(matches!(load_from_env(), Err(ChairsideError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[salon]
tenant_id = "salon-7"
timezone = "America/New_York"

[scheduling]
slot_granularity_minutes = 30
outer_open = "08:00"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        std::fs::remove_file(path).ok();

        let config = result.expect("config from TOML");
        assert_eq!(config.salon.tenant_id, "salon-7");
        assert_eq!(config.scheduling.slot_granularity_minutes, 30);
        assert_eq!(config.scheduling.outer_open.to_string(), "08:00");
        assert_eq!(config.scheduling.outer_close.to_string(), "22:00");
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(ChairsideError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_json() {
        let json_content = r#"{ "salon": { "timezone": "Asia/Tokyo" }, "logging": { "json": true } }"#;
        let config = parse_config(json_content, &PathBuf::from("test.json")).unwrap();
        assert_eq!(config.salon.timezone, "Asia/Tokyo");
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config_invalid_time() {
        let json_content = r#"{ "scheduling": { "outer_open": "7am" } }"#;
        assert!(parse_config(json_content, &PathBuf::from("test.json")).is_err());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
