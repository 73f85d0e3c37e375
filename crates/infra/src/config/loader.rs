//! Configuration loader
//!
//! Loads the API client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If that fails, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `DEVPAGE_API_URL`: Server root; `/api/v1` is appended
//! - `DEVPAGE_ENV`: `development` / `test` allow a missing `DEVPAGE_API_URL`
//!   (defaults to `http://localhost:3000`)
//! - `DEVPAGE_API_TIMEOUT_SECS`: Request timeout in seconds
//! - `DEVPAGE_CREDENTIAL_SERVICE`: Keychain service name
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./devpage.json` or `./devpage.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use devpage_domain::constants::DEFAULT_DEV_API_URL;
use devpage_domain::{ApiConfig, DevPageError, Result};

pub const API_URL_VAR: &str = "DEVPAGE_API_URL";
pub const ENV_VAR: &str = "DEVPAGE_ENV";
pub const TIMEOUT_VAR: &str = "DEVPAGE_API_TIMEOUT_SECS";
pub const CREDENTIAL_SERVICE_VAR: &str = "DEVPAGE_CREDENTIAL_SERVICE";

const CONFIG_FILE_NAMES: [&str; 4] = ["devpage.json", "devpage.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If that fails, falls
/// back to loading from a config file.
///
/// # Errors
/// Returns `DevPageError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The base URL is not a valid URL
pub fn load() -> Result<ApiConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!(base_url = %config.base_url, "Configuration loaded from environment variables");
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
/// # Errors
/// Returns `DevPageError::Config` if `DEVPAGE_API_URL` is missing outside
/// development and test, or a variable has an invalid value.
pub fn load_from_env() -> Result<ApiConfig> {
    let base_url = match std::env::var(API_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => url,
        _ if is_local_environment() => DEFAULT_DEV_API_URL.to_string(),
        _ => {
            return Err(DevPageError::Config(format!(
                "Missing required environment variable: {}",
                API_URL_VAR
            )))
        }
    };

    let mut config = ApiConfig::new(base_url);

    if let Ok(timeout) = std::env::var(TIMEOUT_VAR) {
        config.timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| DevPageError::Config(format!("Invalid request timeout: {}", e)))?;
    }

    if let Ok(service) = std::env::var(CREDENTIAL_SERVICE_VAR) {
        config.credential_service = service;
    }

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DevPageError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The base URL is not a valid URL
pub fn load_from_file(path: Option<PathBuf>) -> Result<ApiConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DevPageError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DevPageError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DevPageError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ApiConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DevPageError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DevPageError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(DevPageError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Check that the base URL is an absolute http(s) URL.
pub fn validate(config: &ApiConfig) -> Result<()> {
    let url = url::Url::parse(&config.base_url).map_err(|e| {
        DevPageError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DevPageError::Config(format!("Unsupported URL scheme: {}", other))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    ["", "..", "../.."]
        .iter()
        .flat_map(|up| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(up).join(name)))
        .collect()
}

fn is_local_environment() -> bool {
    std::env::var(ENV_VAR)
        .map(|env| matches!(env.to_ascii_lowercase().as_str(), "development" | "test"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [API_URL_VAR, ENV_VAR, TIMEOUT_VAR, CREDENTIAL_SERVICE_VAR] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(API_URL_VAR, "https://api.devpage.io");
        std::env::set_var(TIMEOUT_VAR, "10");
        std::env::set_var(CREDENTIAL_SERVICE_VAR, "devpage-staging");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.api_root(), "https://api.devpage.io/api/v1");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.credential_service, "devpage-staging");

        clear_env();
    }

    #[test]
    fn test_missing_url_defaults_in_development() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_VAR, "development");
        let config = load_from_env().unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");

        std::env::set_var(ENV_VAR, "test");
        assert!(load_from_env().is_ok());

        clear_env();
    }

    #[test]
    fn test_missing_url_is_error_in_production() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_VAR, "production");
        let err = load_from_env().unwrap_err();
        assert!(matches!(err, DevPageError::Config(_)), "Should be a Config error");

        std::env::remove_var(ENV_VAR);
        assert!(load_from_env().is_err(), "Unset environment is not local");

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(API_URL_VAR, "https://api.devpage.io");
        std::env::set_var(TIMEOUT_VAR, "soon");
        assert!(matches!(load_from_env(), Err(DevPageError::Config(_))));

        std::env::remove_var(TIMEOUT_VAR);
        std::env::set_var(API_URL_VAR, "ftp://files.devpage.io");
        assert!(matches!(load_from_env(), Err(DevPageError::Config(_))));

        std::env::set_var(API_URL_VAR, "not a url");
        assert!(matches!(load_from_env(), Err(DevPageError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "base_url": "https://api.devpage.io",
            "timeout_secs": 12
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("Should load config from JSON file");
        assert_eq!(config.base_url, "https://api.devpage.io");
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.api_prefix, "/api/v1");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
base_url = "http://127.0.0.1:8080"
user_agent = "devpage-cli/0.1"
credential_service = "devpage-dev"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("Should load config from TOML file");
        assert_eq!(config.user_agent.as_deref(), Some("devpage-cli/0.1"));
        assert_eq!(config.credential_service, "devpage-dev");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/devpage.json")));

        assert!(matches!(result, Err(DevPageError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let invalid_json = r#"{ "base_url": "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_json.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        assert!(load_from_file(Some(path.clone())).is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("base_url: x", &PathBuf::from("devpage.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_candidates_cover_parent_directories() {
        let candidates = candidates_in(Path::new("/srv/app"));

        assert_eq!(candidates.len(), 12);
        assert_eq!(candidates[0], PathBuf::from("/srv/app/devpage.json"));
        assert!(candidates.contains(&PathBuf::from("/srv/app/../../config.toml")));
    }
}
