use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tuning knobs for the engine's reporting and shutdown loops.
///
/// All values are optional in the file; anything missing falls back to the
/// defaults the engine was designed around.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopnConfig {
    /// Milliseconds between progress merge sweeps.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Milliseconds between polls while draining the queue and waiting for
    /// workers to finish.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Milliseconds a worker blocks on the queue before re-checking its
    /// running flag.
    #[serde(default = "default_recv_timeout_ms")]
    pub recv_timeout_ms: u64,
}

fn default_update_interval_ms() -> u64 {
    1000
}

fn default_backoff_ms() -> u64 {
    100
}

fn default_recv_timeout_ms() -> u64 {
    100
}

impl Default for TopnConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            backoff_ms: default_backoff_ms(),
            recv_timeout_ms: default_recv_timeout_ms(),
        }
    }
}

impl TopnConfig {
    /// Load config from custom path or default XDG location.
    ///
    /// A missing file is not an error; it yields the defaults.
    pub fn load(custom_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let path = if let Some(p) = custom_path {
            p.clone()
        } else {
            match Self::default_config_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            }
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;

        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))
    }

    /// Get default config path: ~/.config/topn/config.toml
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir.join("topn").join("config.toml"))
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    NoConfigDir,
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io(path, e) => {
                write!(f, "Failed to read config at {}: {}", path.display(), e)
            }
            ConfigError::Parse(path, e) => {
                write!(f, "Failed to parse config at {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_missing() {
        let path = PathBuf::from("/nonexistent/topn-config.toml");
        let config = TopnConfig::load(Some(&path)).unwrap();
        assert_eq!(config.update_interval_ms, 1000);
        assert_eq!(config.backoff_ms, 100);
        assert_eq!(config.recv_timeout_ms, 100);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "update_interval_ms = 250").unwrap();

        let path = file.path().to_path_buf();
        let config = TopnConfig::load(Some(&path)).unwrap();
        assert_eq!(config.update_interval_ms, 250);
        assert_eq!(config.backoff_ms, 100);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "update_interval_ms = \"fast\"").unwrap();

        let path = file.path().to_path_buf();
        assert!(matches!(
            TopnConfig::load(Some(&path)),
            Err(ConfigError::Parse(_, _))
        ));
    }
}
