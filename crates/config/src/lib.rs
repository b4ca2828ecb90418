//! Configuration loading and validation.
//!
//! Config files: `config.toml`, `config.yaml`, `config.yml` or `config.json`,
//! searched in the working directory passed on the command line.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod duration;
pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    duration::parse_duration,
    error::{Error, Result},
    loader::{CONFIG_FILENAMES, find_config_file, load_config, load_from_dir},
    schema::{BotConfig, TelegramConfig, YoutubeConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_value},
};
