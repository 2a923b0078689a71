//! Rule preview for the settings page: what a rule set would do to each
//! open tab, ignoring stored overrides.

use std::fmt;

use tm_core::{find_match, RuleSet, TabInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    pub url: String,
    pub title: Option<String>,
    /// Rendered icon name (not resolved to a URL).
    pub icon: Option<String>,
    pub rule_index: Option<usize>,
}

impl PreviewEntry {
    pub fn has_changes(&self) -> bool {
        self.title.is_some() || self.icon.is_some()
    }
}

impl fmt::Display for PreviewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.title, &self.icon) {
            (Some(title), Some(icon)) => write!(f, "Title: {} • Icon: {}", title, icon),
            (Some(title), None) => write!(f, "Title: {}", title),
            (None, Some(icon)) => write!(f, "Icon: {}", icon),
            (None, None) => write!(f, "No changes"),
        }
    }
}

pub fn preview_url(rules: &RuleSet, url: &str) -> PreviewEntry {
    let mut entry = PreviewEntry {
        url: url.to_string(),
        title: None,
        icon: None,
        rule_index: None,
    };

    if let Some(m) = find_match(rules, url) {
        entry.rule_index = Some(m.rule_index);
        entry.title = Some(m.render_name()).filter(|t| !t.is_empty());
        entry.icon = Some(m.render_icon()).filter(|i| !i.is_empty());
    }

    entry
}

pub fn preview_tabs(rules: &RuleSet, tabs: &[TabInfo]) -> Vec<PreviewEntry> {
    tabs.iter()
        .map(|tab| preview_url(rules, tab.url.as_deref().unwrap_or("")))
        .collect()
}
