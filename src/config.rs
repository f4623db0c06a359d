use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::Level;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::level::parse_level;

pub const CONFIG_ENV: &str = "PRETTYLOG_CONFIG";
pub const LEVEL_ENV: &str = "PRETTYLOG_LEVEL";
pub const DIR_ENV: &str = "PRETTYLOG_DIR";

const DEFAULT_DIR: &str = "logs";
const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
const DEFAULT_BACKUP_COUNT: usize = 1;

/// Fully resolved sink parameters for one logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub dir: PathBuf,
    pub file_name: String,
    pub max_bytes: u64,
    pub backup_count: usize,
    pub level: Level,
    pub pretty: bool,
    pub join_root: bool,
}

impl LoggerConfig {
    pub fn defaults(name: &str) -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            file_name: format!("{}.log", name),
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
            level: Level::Info,
            pretty: false,
            join_root: false,
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Defaults, then the YAML file, then the environment, then `overrides`.
    pub fn resolve(name: &str, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::defaults(name);

        match &overrides.config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::FileNotFound { path: path.clone() });
                }
                config.apply(&ConfigOverrides::from_yaml_file(path)?)?;
            }
            None => {
                if let Some(path) = env::var_os(CONFIG_ENV).map(PathBuf::from) {
                    if path.is_file() {
                        config.apply(&ConfigOverrides::from_yaml_file(&path)?)?;
                    }
                }
            }
        }

        config.apply(&ConfigOverrides::from_env())?;
        config.apply(overrides)?;
        Ok(config)
    }

    fn apply(&mut self, layer: &ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(dir) = &layer.dir {
            self.dir = dir.clone();
        }
        if let Some(file_name) = &layer.file_name {
            self.file_name = file_name.clone();
        }
        if let Some(max_bytes) = layer.max_bytes {
            self.max_bytes = max_bytes;
        }
        if let Some(backup_count) = layer.backup_count {
            self.backup_count = backup_count;
        }
        if let Some(level) = &layer.level {
            self.level = parse_level(level)?;
        }
        if let Some(pretty) = layer.pretty {
            self.pretty = pretty;
        }
        if let Some(join_root) = layer.join_root {
            self.join_root = join_root;
        }
        Ok(())
    }
}

/// Partial configuration. Used for the `logger:` section of a YAML file, for
/// environment values and for the overrides given to [`crate::Logger`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub dir: Option<PathBuf>,
    pub file_name: Option<String>,
    pub max_bytes: Option<u64>,
    pub backup_count: Option<usize>,
    pub level: Option<String>,
    pub pretty: Option<bool>,
    pub join_root: Option<bool>,
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    logger: ConfigOverrides,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn backup_count(mut self, backup_count: usize) -> Self {
        self.backup_count = Some(backup_count);
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    pub fn join_root(mut self, join_root: bool) -> Self {
        self.join_root = Some(join_root);
        self
    }

    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(file.logger)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text, path)
    }

    fn from_env() -> Self {
        Self {
            dir: env::var_os(DIR_ENV).map(PathBuf::from),
            level: env::var(LEVEL_ENV).ok(),
            ..Self::default()
        }
    }
}
