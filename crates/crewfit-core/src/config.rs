//! Config - `crewfit.toml` の読み込みと検証
//!
//! ```toml
//! [oracle]
//! model = "gemini-2.5-flash"
//! api_key_env = "GEMINI_API_KEY"
//! timeout_ms = 60000
//!
//! [matching]
//! top_n = 3
//!
//! [bootstrap]
//! seed_path = "demos/seed.json"
//!
//! [training]
//! React = "https://react.dev/learn"
//!
//! [logging]
//! verbose = false
//! ```
//!
//! どのセクションも省略可能で、省略時は既定値になります。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrewfitConfig {
    pub oracle: OracleConfig,
    pub matching: MatchingConfig,
    pub bootstrap: BootstrapConfig,
    /// Skill name -> training resource URL.
    pub training: HashMap<String, String>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    pub top_n: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub verbose: bool,
}

impl CrewfitConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oracle.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "oracle.timeout_ms must be greater than zero".into(),
            ));
        }
        if self.matching.top_n == 0 {
            return Err(ConfigError::Invalid(
                "matching.top_n must be greater than zero".into(),
            ));
        }
        if self.oracle.model.trim().is_empty() {
            return Err(ConfigError::Invalid("oracle.model must not be empty".into()));
        }
        Ok(())
    }
}

/// Read, parse and validate a config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<CrewfitConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = CrewfitConfig::from_toml_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config, CrewfitConfig::default());
        assert_eq!(config.oracle.model, "gemini-2.5-flash");
        assert_eq!(config.oracle.timeout(), Duration::from_secs(60));
        assert_eq!(config.matching.top_n, 3);
    }

    #[test]
    fn full_file_parses() {
        let file = write_config(
            r#"
            [oracle]
            model = "gemini-2.5-pro"
            api_key_env = "CREWFIT_KEY"
            timeout_ms = 1500

            [matching]
            top_n = 5

            [bootstrap]
            seed_path = "demos/seed.json"

            [training]
            React = "https://react.dev/learn"

            [logging]
            verbose = true
            "#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.oracle.model, "gemini-2.5-pro");
        assert_eq!(config.oracle.api_key_env, "CREWFIT_KEY");
        assert_eq!(config.oracle.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.oracle.timeout(), Duration::from_millis(1500));
        assert_eq!(config.matching.top_n, 5);
        assert_eq!(config.bootstrap.seed_path, Some(PathBuf::from("demos/seed.json")));
        assert_eq!(
            config.training.get("React").map(String::as_str),
            Some("https://react.dev/learn")
        );
        assert!(config.logging.verbose);
    }

    #[rstest]
    #[case("[oracle]\ntimeout_ms = 0", "timeout_ms")]
    #[case("[matching]\ntop_n = 0", "top_n")]
    #[case("[oracle]\nmodel = \"  \"", "model")]
    fn invalid_values_are_rejected(#[case] contents: &str, #[case] field: &str) {
        let file = write_config(contents);
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(&err, ConfigError::Invalid(msg) if msg.contains(field)));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let file = write_config("[oracle]\nmodle = \"typo\"");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_config("/definitely/not/here.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
