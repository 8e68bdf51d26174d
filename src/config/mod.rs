//! Configuration management for `pag_off`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. `PAG_OFF_CONFIG` (when set, the only file read)
//! 2. Working directory config (./pag-off.yaml)
//! 3. User config (~/.config/pag-off.yaml)
//! 4. System config (/etc/pag-off.yaml)

use pag_off_lib::Person;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up in each location.
const CONFIG_FILENAME: &str = "pag-off.yaml";
/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PAG_OFF_CONFIG";

/// Configuration errors. All of them map to exit code 3.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration (files read: {}):\n  {}", format_files(.files), .problems.join("\n  "))]
    Invalid {
        problems: Vec<String>,
        files: Vec<PathBuf>,
    },
}

fn format_files(files: &[PathBuf]) -> String {
    if files.is_empty() {
        return "none".to_string();
    }
    files
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `main` section of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainSection {
    /// Directory holding the cloned ticket repositories.
    #[serde(default)]
    pub repos_dir: Option<String>,
}

/// `user` section of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default_email: Option<String>,
}

/// One config file as written on disk. Every key is optional so that
/// layers can be merged before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
    #[serde(default)]
    pub main: MainSection,
    #[serde(default)]
    pub user: UserSection,
}

impl ConfigLayer {
    /// Overlay `other` on top of `self`; keys set in `other` win.
    pub fn merge(&mut self, other: Self) {
        if other.main.repos_dir.is_some() {
            self.main.repos_dir = other.main.repos_dir;
        }
        if other.user.name.is_some() {
            self.user.name = other.user.name;
        }
        if other.user.default_email.is_some() {
            self.user.default_email = other.user.default_email;
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub repos_dir: PathBuf,
    /// The local identity recorded on comments and assignments.
    pub user: Person,
}

impl Config {
    /// Directory holding the ticket files of `project`.
    ///
    /// `project` may carry a namespace (`ns/project`) or fork prefix
    /// (`fork/user/project`).
    #[must_use]
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.repos_dir
            .join("tickets")
            .join(project.trim_matches('/'))
    }

    /// Load from the default locations.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a file cannot be read or parsed, or if
    /// required keys are missing once all layers are merged.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_paths())
    }

    /// Load from `paths`, skipping those that do not exist.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut merged = ConfigLayer::default();
        let mut files = Vec::new();
        for path in paths {
            if !path.is_file() {
                continue;
            }
            tracing::debug!(path = %path.display(), "Reading config file");
            merged.merge(read_layer(path)?);
            files.push(path.clone());
        }
        Self::validate(merged, files)
    }

    fn validate(layer: ConfigLayer, files: Vec<PathBuf>) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let repos_dir = non_empty(layer.main.repos_dir);
        if repos_dir.is_none() {
            problems.push("No `repos_dir` option found in the section `main`".to_string());
        }
        let name = non_empty(layer.user.name);
        if name.is_none() {
            problems.push("No `name` option found in the section `user`".to_string());
        }
        let email = non_empty(layer.user.default_email);
        if email.is_none() {
            problems.push("No `default_email` option found in the section `user`".to_string());
        }

        match (repos_dir, name, email) {
            (Some(repos_dir), Some(name), Some(email)) => Ok(Self {
                repos_dir: expand_home(&repos_dir),
                user: Person::new(name, email),
            }),
            _ => Err(ConfigError::Invalid { problems, files }),
        }
    }
}

fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Config files to read, lowest precedence first.
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    if let Ok(explicit) = env::var(CONFIG_ENV) {
        if !explicit.trim().is_empty() {
            return vec![PathBuf::from(explicit)];
        }
    }

    let mut paths = vec![PathBuf::from("/etc").join(CONFIG_FILENAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_FILENAME));
    }
    if let Ok(cwd) = env::current_dir() {
        paths.push(cwd.join(CONFIG_FILENAME));
    }
    paths
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
