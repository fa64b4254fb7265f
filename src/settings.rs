//! # Settings Module
//!
//! ## Purpose
//! Numerical and diagnostic knobs of the reaction parser. The defaults reproduce the
//! classic behaviour (tolerance 1e-9, electrons accounted by charge balance only),
//! so most callers never touch this module.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "tolerance": 1e-9,
//!   "max_paren_depth": 32,
//!   "check_electron_balance": false,
//!   "log_level": "info"
//! }
//! ```
//!
//! ## Usage
//! ```rust
//! use ReactBalance::settings::ParserSettings;
//!
//! let settings = ParserSettings::from_file("parser_settings.json");
//! assert!(settings.tolerance > 0.0);
//! ```

use crate::Reactions::element_accumulator::MAX_PAREN_DEPTH;
use crate::Reactions::errors::ReactionError;
use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// default name of the settings file looked up by the command line tool
pub const SETTINGS_FILE: &str = "parser_settings.json";

/// Parser configuration.
///
/// # Fields
/// * `tolerance` - absolute tolerance shared by the charge and mass balance checks
/// * `max_paren_depth` - deepest allowed nesting of parentheses inside one formula
/// * `check_electron_balance` - if true the electron pseudo-element `e` takes part in the mass balance
/// * `log_level` - level name for the terminal logger of the binary ("off", "error", "warn", "info", "debug", "trace")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    pub tolerance: f64,
    pub max_paren_depth: usize,
    pub check_electron_balance: bool,
    pub log_level: String,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_paren_depth: 32,
            check_electron_balance: false,
            log_level: "info".to_string(),
        }
    }
}

impl ParserSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a JSON file.
    ///
    /// Missing fields take their default values. A missing file is not an error.
    pub fn load(file_name: &str) -> Result<Self, ReactionError> {
        if !Path::new(file_name).exists() {
            info!("settings file '{}' not found, using defaults", file_name);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(file_name)?;
        let settings: ParserSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        info!("parser settings loaded from '{}'", file_name);
        Ok(settings)
    }

    /// Same as `load` but falls back to defaults on any error
    pub fn from_file(file_name: &str) -> Self {
        match Self::load(file_name) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("failed to read settings from '{}': {}", file_name, e);
                Self::default()
            }
        }
    }

    /// Writes the settings as pretty JSON.
    pub fn save(&self, file_name: &str) -> Result<(), ReactionError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(file_name, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ReactionError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ReactionError::InvalidSettings(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if self.max_paren_depth == 0 || self.max_paren_depth > MAX_PAREN_DEPTH {
            return Err(ReactionError::InvalidSettings(format!(
                "max_paren_depth must be between 1 and {}, got {}",
                MAX_PAREN_DEPTH, self.max_paren_depth
            )));
        }
        Ok(())
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }
}
