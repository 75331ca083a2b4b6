use std::path::PathBuf;

use dhub_domain::{DonationCategory, Region};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Environment variable that overrides the application base directory.
pub const HOME_ENV_VAR: &str = "DONATION_HUB_HOME";

/// Stores user-configurable preferences for the donation hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_currency_label")]
    pub currency_label: String,
    #[serde(default = "Config::default_insight_timeout_ms")]
    pub insight_timeout_ms: u64,
    #[serde(default)]
    pub default_category: DonationCategory,
    #[serde(default)]
    pub default_region: Region,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_true")]
    pub bilingual_labels: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for donation data. Defaults to `<base>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_label: Self::default_currency_label(),
            insight_timeout_ms: Self::default_insight_timeout_ms(),
            default_category: DonationCategory::default(),
            default_region: Region::default(),
            ui_color_enabled: true,
            bilingual_labels: true,
            data_dir: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 7] = [
        "currency_label",
        "insight_timeout_ms",
        "default_category",
        "default_region",
        "ui_color_enabled",
        "bilingual_labels",
        "data_dir",
    ];

    pub fn default_currency_label() -> String {
        "Rs".into()
    }

    pub fn default_insight_timeout_ms() -> u64 {
        5_000
    }

    fn default_true() -> bool {
        true
    }

    /// Base directory for config and data: `$DONATION_HUB_HOME`, else `<documents|home>/DonationHub`.
    pub fn resolve_base_dir() -> PathBuf {
        if let Some(path) = std::env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
            return PathBuf::from(path);
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("DonationHub")
    }

    pub fn resolve_data_dir(&self, base: &std::path::Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    /// Updates a single setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let value = value.trim();
        match key {
            "currency_label" => {
                if value.is_empty() {
                    return Err(invalid("must not be empty".into()));
                }
                self.currency_label = value.to_string();
            }
            "insight_timeout_ms" => {
                let parsed = value
                    .parse::<u64>()
                    .map_err(|err| invalid(err.to_string()))?;
                if parsed == 0 {
                    return Err(invalid("must be greater than zero".into()));
                }
                self.insight_timeout_ms = parsed;
            }
            "default_category" => {
                self.default_category = value.parse().map_err(|err| invalid(format!("{err}")))?;
            }
            "default_region" => {
                self.default_region = value.parse().map_err(|err| invalid(format!("{err}")))?;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled =
                    parse_flag(value).ok_or_else(|| invalid("expected on/off".into()))?;
            }
            "bilingual_labels" => {
                self.bilingual_labels =
                    parse_flag(value).ok_or_else(|| invalid("expected on/off".into()))?;
            }
            "data_dir" => {
                self.data_dir = if value.is_empty() || value.eq_ignore_ascii_case("default") {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => return Err(invalid("unknown setting".into())),
        }
        Ok(())
    }

    /// Key/value pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency_label", self.currency_label.clone()),
            ("insight_timeout_ms", self.insight_timeout_ms.to_string()),
            ("default_category", self.default_category.to_string()),
            ("default_region", self.default_region.to_string()),
            ("ui_color_enabled", on_off(self.ui_color_enabled)),
            ("bilingual_labels", on_off(self.bilingual_labels)),
            (
                "data_dir",
                self.data_dir
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "default".into()),
            ),
        ]
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn on_off(flag: bool) -> String {
    let label = if flag { "on" } else { "off" };
    label.to_string()
}
