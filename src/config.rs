//! Configuration for the practice client
//!
//! Configuration is loaded in order of precedence:
//! 1. Command-line flags (highest priority)
//! 2. Environment variables (GRIND_*)
//! 3. Config file (~/.config/grind/config.toml)
//! 4. Built-in defaults (lowest priority)

use crate::session::Language;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the judge backend
    pub judge_url: String,

    /// Directory holding the persistence database
    pub data_dir: PathBuf,

    /// Debounce window for code autosave
    pub autosave_delay: Duration,

    /// Language selected when a problem is opened
    pub default_language: Language,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter: "error", "warn", "info", "debug", "trace"
    pub level: String,
    /// Whether to also write JSON log files
    pub file_enabled: bool,
    /// Directory for log files
    pub file_dir: PathBuf,
    /// Log file name prefix
    pub file_prefix: String,
    /// Rotation policy for log files
    pub file_rotation: LogRotation,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            judge_url: "http://127.0.0.1:8000".to_string(),
            data_dir: default_data_dir(),
            autosave_delay: Duration::from_millis(1000),
            default_language: Language::Python,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_prefix: "grind".to_string(),
            file_rotation: LogRotation::Daily,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("grind"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    judge_url: Option<String>,
    data_dir: Option<String>,
    autosave_delay_ms: Option<u64>,
    default_language: Option<String>,
    #[serde(default)]
    logging: FileLogging,
}

#[derive(Debug, Deserialize, Default)]
struct FileLogging {
    level: Option<String>,
    file_enabled: Option<bool>,
    file_dir: Option<String>,
    file_prefix: Option<String>,
    file_rotation: Option<LogRotation>,
}

impl Config {
    /// Path of the user config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("grind").join("config.toml"))
    }

    /// Write a commented default config on first run so the options are
    /// discoverable. Existing files are never touched.
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        if std::fs::write(&path, Config::default().to_toml()).is_ok() {
            eprintln!("Created config template: {}", path.display());
        }
    }

    /// Load configuration: defaults, then config file, then environment
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
                        Ok(file) => config.apply_file(file),
                        Err(e) => eprintln!("Warning: ignoring malformed config file: {e}"),
                    },
                    Err(e) => eprintln!("Warning: could not read config file: {e}"),
                }
            }
        }

        config.apply_env();
        config
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(url) = file.judge_url {
            self.judge_url = url;
        }
        if let Some(dir) = file.data_dir {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(ms) = file.autosave_delay_ms {
            self.autosave_delay = Duration::from_millis(ms);
        }
        if let Some(token) = file.default_language {
            match Language::parse(&token) {
                Ok(language) => self.default_language = language,
                Err(_) => eprintln!("Warning: unknown default_language '{token}', keeping python"),
            }
        }
        if let Some(level) = file.logging.level {
            self.logging.level = level;
        }
        if let Some(enabled) = file.logging.file_enabled {
            self.logging.file_enabled = enabled;
        }
        if let Some(dir) = file.logging.file_dir {
            self.logging.file_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = file.logging.file_prefix {
            self.logging.file_prefix = prefix;
        }
        if let Some(rotation) = file.logging.file_rotation {
            self.logging.file_rotation = rotation;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("GRIND_JUDGE_URL") {
            self.judge_url = url;
        }
        if let Ok(dir) = std::env::var("GRIND_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(ms) = std::env::var("GRIND_AUTOSAVE_MS") {
            match ms.parse() {
                Ok(ms) => self.autosave_delay = Duration::from_millis(ms),
                Err(_) => eprintln!("Warning: GRIND_AUTOSAVE_MS is not a number, ignoring"),
            }
        }
        if let Ok(token) = std::env::var("GRIND_LANG") {
            if let Ok(language) = Language::parse(&token) {
                self.default_language = language;
            }
        }
        if let Ok(level) = std::env::var("GRIND_LOG") {
            self.logging.level = level;
        }
    }

    /// Render the config as a commented TOML template. Single source of
    /// truth for `config --reset` and first-run file creation.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# grind configuration
# Values here are overridden by GRIND_* environment variables and CLI flags.

# Base URL of the judge backend
judge_url = "{judge_url}"

# Directory holding the persistence database (buffers, notes, progress)
data_dir = "{data_dir}"

# Debounce window for code autosave, in milliseconds
autosave_delay_ms = {autosave_ms}

# Language selected when a problem is opened: "python", "java", "javascript"
default_language = "{language}"

[logging]
# Log level: "error", "warn", "info", "debug", "trace"
level = "{level}"

# Write JSON log files in addition to the in-app log line
file_enabled = {file_enabled}
file_dir = "{file_dir}"
file_prefix = "{file_prefix}"
# Rotation: "hourly", "daily", "never"
file_rotation = "{rotation}"
"#,
            judge_url = self.judge_url,
            data_dir = self.data_dir.display(),
            autosave_ms = self.autosave_delay.as_millis(),
            language = self.default_language,
            level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display(),
            file_prefix = self.logging.file_prefix,
            rotation = match self.logging.file_rotation {
                LogRotation::Hourly => "hourly",
                LogRotation::Daily => "daily",
                LogRotation::Never => "never",
            },
        )
    }

    /// Path of the SQLite database inside the data directory
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("grind.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.judge_url, "http://127.0.0.1:8000");
        assert_eq!(config.autosave_delay, Duration::from_millis(1000));
        assert_eq!(config.default_language, Language::Python);
        assert!(!config.logging.file_enabled);
    }

    #[test]
    fn file_values_override_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            judge_url = "http://judge.internal:9000"
            autosave_delay_ms = 250
            default_language = "java"

            [logging]
            level = "debug"
            file_rotation = "never"
            "#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file);

        assert_eq!(config.judge_url, "http://judge.internal:9000");
        assert_eq!(config.autosave_delay, Duration::from_millis(250));
        assert_eq!(config.default_language, Language::Java);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file_rotation, LogRotation::Never);
    }

    #[test]
    fn unknown_language_in_file_is_ignored() {
        let file: FileConfig = toml::from_str(r#"default_language = "cobol""#).unwrap();
        let mut config = Config::default();
        config.apply_file(file);
        assert_eq!(config.default_language, Language::Python);
    }

    #[test]
    fn template_roundtrips_through_the_file_parser() {
        let config = Config::default();
        let file: FileConfig = toml::from_str(&config.to_toml()).unwrap();

        let mut reparsed = Config::default();
        reparsed.apply_file(file);
        assert_eq!(reparsed.judge_url, config.judge_url);
        assert_eq!(reparsed.autosave_delay, config.autosave_delay);
        assert_eq!(reparsed.logging.file_rotation, config.logging.file_rotation);
    }
}
