//! Parsing and validation of `bddlay.toml`.
//!
//! Every section is optional; an empty file yields the same settings as no
//! file at all. See [`BddlayConfig`] for the layout.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_config, load_config_file, load_config_from_str, validate_config, CONFIG_FILE_NAME,
};
pub use types::*;
