//! Configuration system for the `Taskdeck` shell.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskdeck/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;

use taskdeck_model::SortKey;

use crate::tasks::ValidationLimits;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The `[validation]` bounds cannot be satisfied together.
    #[error(
        "invalid validation limits: title_min={title_min} title_max={title_max} \
         description_max={description_max}"
    )]
    InvalidLimits {
        /// Resolved minimum title length.
        title_min: usize,
        /// Resolved maximum title length.
        title_max: usize,
        /// Resolved maximum description length.
        description_max: usize,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    session: SessionFileConfig,
    validation: ValidationFileConfig,
}

/// `[session]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    owner: Option<String>,
    default_sort: Option<String>,
}

/// `[validation]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ValidationFileConfig {
    title_min: Option<usize>,
    title_max: Option<usize>,
    description_max: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved shell configuration.
#[derive(Debug, Clone)]
pub struct TaskdeckConfig {
    /// Identity to sign in as at startup. `None` starts signed out.
    pub owner: Option<String>,
    /// Initial sort key for task listings.
    pub default_sort: SortKey,
    /// Length bounds for titles and descriptions.
    pub limits: ValidationLimits,
}

impl Default for TaskdeckConfig {
    fn default() -> Self {
        Self {
            owner: None,
            default_sort: SortKey::DueDate,
            limits: ValidationLimits::default(),
        }
    }
}

impl TaskdeckConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path
    /// (`~/.config/taskdeck/config.toml`) is tried and silently ignored if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or if its validation limits are inconsistent.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve a `TaskdeckConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            owner: cli.owner.clone().or_else(|| file.session.owner.clone()),
            default_sort: cli
                .sort
                .as_deref()
                .or(file.session.default_sort.as_deref())
                .map_or(defaults.default_sort, SortKey::from),
            limits: ValidationLimits {
                title_min: file
                    .validation
                    .title_min
                    .unwrap_or(defaults.limits.title_min),
                title_max: file
                    .validation
                    .title_max
                    .unwrap_or(defaults.limits.title_max),
                description_max: file
                    .validation
                    .description_max
                    .unwrap_or(defaults.limits.description_max),
            },
        };
        check_limits(&config.limits)?;
        Ok(config)
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Session-scoped personal task tracker")]
pub struct CliArgs {
    /// Sign in as this user at startup.
    #[arg(long, env = "TASKDECK_OWNER")]
    pub owner: Option<String>,

    /// Initial sort key (date, priority, status).
    #[arg(long)]
    pub sort: Option<String>,

    /// Path to config file (default: `~/.config/taskdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskdeck.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Every title needs at least one character, the title range must be
/// non-empty, and descriptions must allow at least one character.
fn check_limits(limits: &ValidationLimits) -> Result<(), ConfigError> {
    let ValidationLimits {
        title_min,
        title_max,
        description_max,
    } = *limits;
    if title_min == 0 || title_min > title_max || description_max == 0 {
        return Err(ConfigError::InvalidLimits {
            title_min,
            title_max,
            description_max,
        });
    }
    Ok(())
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskdeck").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
