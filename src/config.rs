//! Locating the PvPoke source tree: the `PVPOKE_SRC_ROOT` environment
//! variable wins, then the `source_root` key of an optional `cupsmith.yaml`
//! in the working directory.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const SOURCE_ROOT_ENV: &str = "PVPOKE_SRC_ROOT";
pub const CONFIG_FILE: &str = "cupsmith.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source_root: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    Unresolved,
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_yaml::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(
                f,
                "{SOURCE_ROOT_ENV} is not set and {CONFIG_FILE} names no source_root"
            ),
            Self::Read { path, source } => {
                write!(f, "failed to read '{}': {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads `cupsmith.yaml`. A missing file is simply an empty configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the source tree root: environment first, config file second.
pub fn resolve_source_root() -> Result<PathBuf, ConfigError> {
    if let Ok(value) = env::var(SOURCE_ROOT_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    let config = load_config(CONFIG_FILE)?;
    config.source_root.ok_or(ConfigError::Unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_path(name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("cupsmith-{name}-{stamp}.yaml"))
    }

    #[test]
    fn missing_config_file_is_empty_configuration() {
        let config = load_config(unique_temp_path("absent")).expect("missing file is fine");
        assert!(config.source_root.is_none());
    }

    #[test]
    fn config_file_names_the_source_root() {
        let path = unique_temp_path("config");
        fs::write(&path, "source_root: /srv/pvpoke/src\n").expect("fixture should be written");

        let config = load_config(&path).expect("config should parse");
        assert_eq!(config.source_root, Some(PathBuf::from("/srv/pvpoke/src")));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_config_file_is_reported_with_its_path() {
        let path = unique_temp_path("broken");
        fs::write(&path, "source_root: [unclosed\n").expect("fixture should be written");

        let err = load_config(&path).expect_err("config should be rejected");
        assert!(err.to_string().contains("failed to parse"));

        let _ = fs::remove_file(path);
    }
}
