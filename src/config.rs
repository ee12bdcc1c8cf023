//! Configuration management for the application.
//!
//! Settings are read once at startup from defaults, config files and
//! environment variables. Nothing is ever written back.

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
#[cfg(test)]
use config::Map;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::debounce::DEFAULT_DEBOUNCE_MS;
use crate::temperature::Unit;

/// Application configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Quiet period in milliseconds before the values are recomputed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Unit initially selected in the unit selector
    #[serde(default = "default_unit_name")]
    pub default_unit: String,

    /// Decimal places shown for each converted value
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    /// Where log output is written
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_unit: default_unit_name(),
            decimals: default_decimals(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// The initially selected unit.
    /// Falls back to Celsius for names that were not validated on load.
    pub fn initial_unit(&self) -> Unit {
        Unit::from_name(&self.default_unit).unwrap_or(Unit::Celsius)
    }

    /// The log file path, defaulting to the user cache directory
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            project_dirs().map_or_else(
                || PathBuf::from(LOG_FILE_NAME),
                |dirs| dirs.cache_dir().join(LOG_FILE_NAME),
            )
        })
    }

    /// Rejects settings that would make the UI unusable
    fn validate(self) -> Result<Self, ConfigError> {
        Unit::from_name(&self.default_unit)
            .map_err(|e| ConfigError::Message(format!("default_unit: {e}")))?;
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::Message(format!(
                "decimals must be at most {MAX_DECIMALS}, got {}",
                self.decimals
            )));
        }
        Ok(self)
    }
}

/// Upper bound for the `decimals` setting
const MAX_DECIMALS: usize = 10;

/// Default log file name
const LOG_FILE_NAME: &str = "thermoconv.log";

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "THERMOCONV";

/// Config file looked up in the current directory
const LOCAL_CONFIG_FILE: &str = "thermoconv.toml";

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_unit_name() -> String {
    Unit::Celsius.display_name().to_string()
}

fn default_decimals() -> usize {
    2
}

// Global configuration instance
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the application configuration
///
/// This function returns a reference to the global configuration instance.
/// If the configuration hasn't been loaded yet, it will attempt to load it.
pub fn get_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration, using defaults: {e}");
            AppConfig::default()
        }
    })
}

/// Builder pre-populated with the default values
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("debounce_ms", default_debounce_ms())?
        .set_default("default_unit", default_unit_name())?
        .set_default("decimals", default_decimals() as u64)
}

/// Load the configuration from various sources
///
/// This function loads configuration from the following sources, in order:
/// 1. Default values
/// 2. Configuration file in the system config directory
/// 3. `thermoconv.toml` in the current directory
/// 4. Environment variables (prefixed with "THERMOCONV_")
fn load_config() -> Result<AppConfig, ConfigError> {
    let mut files = Vec::new();
    if let Some(config_path) = get_system_config_path() {
        files.push(config_path);
    }
    files.push(PathBuf::from(LOCAL_CONFIG_FILE));

    load_layered(&files, env_source(ENV_PREFIX))
}

/// Environment source for `<PREFIX>_<KEY>` variables, `__` separating nested keys
fn env_source(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Stacks optional config files and then the environment over the defaults.
/// Later sources override earlier ones; missing files are skipped.
fn load_layered(files: &[PathBuf], env: Environment) -> Result<AppConfig, ConfigError> {
    let mut builder = builder_with_defaults()?;
    for path in files {
        builder = builder.add_source(File::from(path.as_path()).required(false));
    }

    builder
        .add_source(env)
        .build()?
        .try_deserialize::<AppConfig>()?
        .validate()
}

/// Load the configuration from defaults and a single file
#[cfg(test)]
pub fn load_config_from(path: &std::path::Path) -> Result<AppConfig, ConfigError> {
    builder_with_defaults()?
        .add_source(File::from(path))
        .build()?
        .try_deserialize::<AppConfig>()?
        .validate()
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "thermoconv", "thermoconv")
}

/// Get the path to the system configuration file
fn get_system_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.decimals, 2);
        assert_eq!(config.initial_unit(), Unit::Celsius);
        assert!(config.log_path().ends_with("thermoconv.log"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.default_unit, "Celsius");
        assert_eq!(config.decimals, 2);
    }

    #[test]
    fn test_file_overrides() {
        let file = write_config(
            "debounce_ms = 250\ndefault_unit = \"fahr\"\ndecimals = 3\nlog_file = \"/tmp/t.log\"\n",
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.initial_unit(), Unit::Fahrenheit);
        assert_eq!(config.decimals, 3);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/t.log"));
    }

    #[test]
    fn test_sources_are_layered_in_order() {
        let system = write_config("debounce_ms = 500\ndecimals = 4\n");
        let local = write_config("debounce_ms = 750\ndefault_unit = \"fahr\"\n");
        let missing = PathBuf::from("/nonexistent/thermoconv.toml");

        let mut vars = Map::new();
        vars.insert("THERMOCONV_LAYERED_DEBOUNCE_MS".to_string(), "250".to_string());
        vars.insert("THERMOCONV_LAYERED_DEFAULT_UNIT".to_string(), "kel".to_string());
        vars.insert("UNRELATED_DECIMALS".to_string(), "9".to_string());
        let env = env_source("THERMOCONV_LAYERED").source(Some(vars));

        let files = [
            system.path().to_path_buf(),
            missing,
            local.path().to_path_buf(),
        ];
        let config = load_layered(&files, env).unwrap();

        // Environment beats both files, the local file beats the system one
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.initial_unit(), Unit::Kelvin);
        assert_eq!(config.decimals, 4);
    }

    #[test]
    fn test_local_file_overrides_system_file() {
        let system = write_config("default_unit = \"newton\"\ndecimals = 1\n");
        let local = write_config("default_unit = \"R\"\n");
        let env = env_source("THERMOCONV_LOCAL").source(Some(Map::new()));

        let files = [system.path().to_path_buf(), local.path().to_path_buf()];
        let config = load_layered(&files, env).unwrap();
        assert_eq!(config.initial_unit(), Unit::Rankine);
        assert_eq!(config.decimals, 1);
        assert_eq!(config.debounce_ms, 1000);
    }

    #[test]
    fn test_env_value_is_validated() {
        let mut vars = Map::new();
        vars.insert("THERMOCONV_INVALID_DEFAULT_UNIT".to_string(), "furlong".to_string());
        let env = env_source("THERMOCONV_INVALID").source(Some(vars));
        assert!(load_layered(&[], env).is_err());
    }

    #[test]
    fn test_invalid_unit_rejected() {
        let file = write_config("default_unit = \"furlong\"\n");
        assert!(load_config_from(file.path()).is_err());
    }

    #[test]
    fn test_excessive_decimals_rejected() {
        let file = write_config("decimals = 40\n");
        assert!(load_config_from(file.path()).is_err());
    }
}
