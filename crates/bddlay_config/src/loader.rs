//! Configuration loading and validation.

use crate::error::ConfigError;
use crate::types::BddlayConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "bddlay.toml";

/// Loads `<dir>/bddlay.toml`.
pub fn load_config(dir: &Path) -> Result<BddlayConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<BddlayConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from TOML text.
pub fn load_config_from_str(content: &str) -> Result<BddlayConfig, ConfigError> {
    let config: BddlayConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a non-negative number, got {value}")))
    }
}

/// Checks value ranges that serde cannot express.
pub fn validate_config(config: &BddlayConfig) -> Result<(), ConfigError> {
    let anneal = &config.anneal;
    positive("anneal.initial_temperature", anneal.initial_temperature)?;
    non_negative("anneal.min_temperature", anneal.min_temperature)?;
    if anneal.initial_temperature < anneal.min_temperature {
        return Err(invalid(format!(
            "anneal.initial_temperature ({}) is below anneal.min_temperature ({})",
            anneal.initial_temperature, anneal.min_temperature
        )));
    }
    if !(anneal.cooling_rate > 0.0 && anneal.cooling_rate < 1.0) {
        return Err(invalid(format!(
            "anneal.cooling_rate must be in (0, 1), got {}",
            anneal.cooling_rate
        )));
    }
    if anneal.max_iterations == 0 {
        return Err(invalid("anneal.max_iterations must be at least 1"));
    }

    positive("free2d.width", config.free2d.width)?;
    positive("free2d.height", config.free2d.height)?;

    non_negative("single_row.w_wire", config.single_row.w_wire)?;
    non_negative("single_row.w_area", config.single_row.w_area)?;

    let sc = &config.standard_cell;
    positive("standard_cell.width", sc.width)?;
    positive("standard_cell.height", sc.height)?;
    positive("standard_cell.site_width", sc.site_width)?;
    positive("standard_cell.row_height", sc.row_height)?;
    if sc.row_height > sc.height {
        return Err(invalid(format!(
            "standard_cell.row_height ({}) leaves no room for a row in height {}",
            sc.row_height, sc.height
        )));
    }
    if sc.site_width > sc.width {
        return Err(invalid(format!(
            "standard_cell.site_width ({}) leaves no room for a site in width {}",
            sc.site_width, sc.width
        )));
    }
    Ok(())
}
