//! Runtime configuration.

use serde::{Deserialize, Serialize};
use tm_core::icons::DEFAULT_ICON_BASE;

/// Interval choices offered by the settings page, in minutes (0 = off).
pub const INTERVAL_PRESETS: &[(&str, u32)] = &[
    ("Off", 0),
    ("Every minute", 1),
    ("Every 5 minutes", 5),
    ("Every 15 minutes", 15),
    ("Every 30 minutes", 30),
    ("Every hour", 60),
];

/// What to do with a URL's overrides when a tab showing it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Clear the overrides unless another open tab shows the same URL.
    #[default]
    ClearWhenLastTab,
    /// Keep overrides across tab closes.
    Retain,
}

/// Context-menu item identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuIds {
    pub configure_page: String,
    pub configure_action: String,
    pub general_settings: String,
}

impl Default for MenuIds {
    fn default() -> Self {
        Self {
            configure_page: "tabmagic-name-tab".to_string(),
            configure_action: "tabmagic-name-tab-toolbar".to_string(),
            general_settings: "tabmagic-general-settings".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Prefix joined with icon file names to build asset URLs.
    pub icon_base_url: String,
    pub removal_policy: RemovalPolicy,
    /// Name of the periodic sweep alarm.
    pub alarm_name: String,
    pub menu: MenuIds,
    /// Message type that requests a sweep of all tabs.
    pub refresh_message: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            icon_base_url: DEFAULT_ICON_BASE.to_string(),
            removal_policy: RemovalPolicy::default(),
            alarm_name: "tabmagic-rule-check".to_string(),
            menu: MenuIds::default(),
            refresh_message: "tabmagic:refresh-tabs".to_string(),
        }
    }
}
