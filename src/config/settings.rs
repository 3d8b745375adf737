//! User settings
//!
//! Display preferences and defaults applied when creating records.

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::BudgetError;
use crate::models::{Email, DEFAULT_CATEGORY_COLOR, DEFAULT_PERIOD_DAYS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime format used when printing dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Length of a new budget period when no end date is given
    #[serde(default = "default_period_days")]
    pub default_period_days: i64,

    #[serde(default = "default_category_color")]
    pub default_category_color: String,

    /// How many transactions the dashboard shows
    #[serde(default = "default_recent_limit")]
    pub recent_transactions_limit: usize,

    /// Acting user when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<Email>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_period_days() -> i64 {
    DEFAULT_PERIOD_DAYS
}

fn default_category_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

fn default_recent_limit() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_period_days: default_period_days(),
            default_category_color: default_category_color(),
            recent_transactions_limit: default_recent_limit(),
            default_user: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| BudgetError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Period length as used by the budget service; non-positive values fall back to the default
    pub fn period_days(&self) -> i64 {
        if self.default_period_days > 0 {
            self.default_period_days
        } else {
            DEFAULT_PERIOD_DAYS
        }
    }
}
