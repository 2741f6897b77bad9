//! Configuration loader
//!
//! Loads keyward configuration from files and environment variables.
//!
//! ## Loading Strategy
//! 1. `KEYWARD_CONFIG` names a file explicitly; otherwise standard paths are
//!    probed
//! 2. With no file found, built-in defaults are used
//! 3. Environment variables override individual values
//! 4. The merged configuration is validated
//!
//! ## Environment Variables
//! - `KEYWARD_CONFIG`: Path to a config file
//! - `KEYWARD_SECRET_NAME`: Key record name inside each cluster namespace
//! - `KEYWARD_KEY_FIELD`: Data field holding the key bytes
//! - `KEYWARD_STORE_TIMEOUT_MS`: Per-call store timeout, `0` for unbounded
//! - `KEYWARD_IV_ANNOTATION`: Metadata key pinning the IV
//! - `KEYWARD_STORE_BACKEND`: `memory` or `file`
//! - `KEYWARD_STORE_ROOT`: Root directory for the file backend
//! - `KEYWARD_LOG_FILTER`: Tracing filter directive
//! - `KEYWARD_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./keyward.toml` or `./keyward.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `../keyward.toml` or `../keyward.json` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use keyward_domain::{KeywardConfig, KeywardError, Result, StoreBackend};

pub const CONFIG_PATH_ENV: &str = "KEYWARD_CONFIG";

/// Load configuration from file (if any) with environment overrides
///
/// # Errors
/// Returns `KeywardError::Config` if:
/// - `KEYWARD_CONFIG` names a missing or unreadable file
/// - A file or an environment value is malformed
/// - The merged configuration fails validation
pub fn load() -> Result<KeywardConfig> {
    let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);

    let mut config = match explicit.or_else(probe_config_paths) {
        Some(path) => read_file(&path)?,
        None => {
            tracing::debug!("No config file found, using defaults");
            KeywardConfig::default()
        }
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from defaults and environment variables only
///
/// # Errors
/// Returns `KeywardError::Config` if a variable has an invalid value or the
/// result fails validation.
pub fn load_from_env() -> Result<KeywardConfig> {
    let mut config = KeywardConfig::default();
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports JSON and TOML
/// (detected by extension); missing sections fall back to defaults.
///
/// # Errors
/// Returns `KeywardError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<KeywardConfig> {
    let config_path = match path {
        Some(p) => p,
        None => probe_config_paths().ok_or_else(|| {
            KeywardError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    let config = read_file(&config_path)?;
    validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<KeywardConfig> {
    if !path.exists() {
        return Err(KeywardError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| KeywardError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<KeywardConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| KeywardError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| KeywardError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(KeywardError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["keyward.toml", "keyward.json", "config.toml", "config.json"];

    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Overlay `KEYWARD_*` values from `lookup` onto `config`
fn apply_overrides<F>(config: &mut KeywardConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup("KEYWARD_SECRET_NAME") {
        config.provisioning.secret_name = name;
    }
    if let Some(field) = lookup("KEYWARD_KEY_FIELD") {
        config.provisioning.key_field = field;
    }
    if let Some(raw) = lookup("KEYWARD_STORE_TIMEOUT_MS") {
        config.provisioning.store_timeout_ms = raw.trim().parse::<u64>().map_err(|e| {
            KeywardError::Config(format!("Invalid KEYWARD_STORE_TIMEOUT_MS `{raw}`: {e}"))
        })?;
    }
    if let Some(annotation) = lookup("KEYWARD_IV_ANNOTATION") {
        config.iv.annotation = annotation;
    }
    if let Some(raw) = lookup("KEYWARD_STORE_BACKEND") {
        config.store.backend = raw.parse::<StoreBackend>().map_err(KeywardError::Config)?;
    }
    if let Some(root) = lookup("KEYWARD_STORE_ROOT") {
        config.store.root = Some(PathBuf::from(root));
    }
    if let Some(filter) = lookup("KEYWARD_LOG_FILTER") {
        config.logging.filter = filter;
    }
    config.logging.json = parse_bool(lookup("KEYWARD_LOG_JSON"), config.logging.json);
    Ok(())
}

/// Check cross-field constraints the serde defaults cannot express
///
/// # Errors
/// Returns `KeywardError::Config` naming the first offending field.
pub fn validate(config: &KeywardConfig) -> Result<()> {
    let required = [
        ("provisioning.secret_name", &config.provisioning.secret_name),
        ("provisioning.key_field", &config.provisioning.key_field),
        ("iv.annotation", &config.iv.annotation),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(KeywardError::Config(format!("{field} must not be empty")));
        }
    }

    if config.store.backend == StoreBackend::File && config.store.root.is_none() {
        return Err(KeywardError::Config("store.root is required for the file backend".into()));
    }
    Ok(())
}

/// Parse a boolean flag
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
