//! Persistence schema.
//!
//! | Key | Value |
//! |---|---|
//! | `tabName:<encoded url>` | override title (string) |
//! | `tabIcon:<encoded url>` | override icon URL (string, may be empty) |
//! | `tabmagic:rules` | raw rule text |
//! | `tabmagic:interval-minutes` | sweep period in minutes, 0 = off |
//!
//! URLs are percent-encoded as URI components so keys never contain `:`
//! beyond the prefix.

use tm_core::encode_uri_component;

pub const APP_PREFIX: &str = "tabmagic";
pub const TAB_NAME_PREFIX: &str = "tabName:";
pub const TAB_ICON_PREFIX: &str = "tabIcon:";
pub const RULES_KEY: &str = "tabmagic:rules";
pub const INTERVAL_KEY: &str = "tabmagic:interval-minutes";

pub fn tab_name_key(url: &str) -> String {
    format!("{}{}", TAB_NAME_PREFIX, encode_uri_component(url))
}

pub fn tab_icon_key(url: &str) -> String {
    format!("{}{}", TAB_ICON_PREFIX, encode_uri_component(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_keys_encode_url() {
        assert_eq!(
            tab_name_key("https://a.com/x?y=1"),
            "tabName:https%3A%2F%2Fa.com%2Fx%3Fy%3D1"
        );
        assert_eq!(tab_icon_key("https://a.com/"), "tabIcon:https%3A%2F%2Fa.com%2F");
    }

    #[test]
    fn settings_keys_share_prefix() {
        assert!(RULES_KEY.starts_with(APP_PREFIX));
        assert!(INTERVAL_KEY.starts_with(APP_PREFIX));
    }
}
