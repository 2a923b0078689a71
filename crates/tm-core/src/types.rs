//! Core type definitions for TabMagic
//!
//! These types are shared by the rule parser, the matcher and the
//! reconciliation runtime.

use crate::pattern::Pattern;
use crate::template::render_template;

/// Browser tab identifier.
pub type TabId = i32;

// =============================================================================
// Rules
// =============================================================================

/// Why a rule could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("pattern is empty")]
    EmptyPattern,
    #[error("both name and icon templates are empty")]
    NoTemplates,
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// A user-authored (pattern, name template, icon template) triple.
///
/// A `Rule` can only be built through [`Rule::new`], so every instance holds
/// a compiled pattern and at least one non-empty template.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Pattern,
    name_template: String,
    icon_template: String,
}

impl Rule {
    /// Build a rule from raw fields. Fields are trimmed.
    pub fn new(pattern: &str, name_template: &str, icon_template: &str) -> Result<Self, RuleError> {
        let pattern = pattern.trim();
        let name_template = name_template.trim();
        let icon_template = icon_template.trim();

        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        if name_template.is_empty() && icon_template.is_empty() {
            return Err(RuleError::NoTemplates);
        }

        let pattern = Pattern::new(pattern).map_err(|e| RuleError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            pattern,
            name_template: name_template.to_string(),
            icon_template: icon_template.to_string(),
        })
    }

    /// Pattern source as written by the user.
    pub fn pattern_source(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn name_template(&self) -> &str {
        &self.name_template
    }

    pub fn icon_template(&self) -> &str {
        &self.icon_template
    }

    pub fn has_name(&self) -> bool {
        !self.name_template.is_empty()
    }

    pub fn has_icon(&self) -> bool {
        !self.icon_template.is_empty()
    }
}

/// Ordered rule sequence. Earlier rules win.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

// =============================================================================
// Match Result
// =============================================================================

/// First successful rule match for a URL.
///
/// `captures[0]` is the whole match, `captures[N]` is group N. Groups that
/// did not participate in the match are `None`.
#[derive(Debug, Clone)]
pub struct RuleMatch<'a> {
    pub rule: &'a Rule,
    /// Position of `rule` in its rule set.
    pub rule_index: usize,
    pub captures: Vec<Option<String>>,
}

impl RuleMatch<'_> {
    /// Rendered name template, empty when the rule has none.
    pub fn render_name(&self) -> String {
        render_template(self.rule.name_template(), &self.captures)
    }

    /// Rendered icon template (an icon name, not a URL).
    pub fn render_icon(&self) -> String {
        render_template(self.rule.icon_template(), &self.captures)
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// Explicit per-URL title/icon stored by the user.
///
/// `None` falls through to rule evaluation. `Some("")` is an explicit clear:
/// for the name it suppresses the rule title, for the icon it removes icons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverrideRecord {
    pub name: Option<String>,
    pub icon_url: Option<String>,
}

impl OverrideRecord {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon_url.is_none()
    }
}

// =============================================================================
// Tabs
// =============================================================================

/// Loading status reported with a tab update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TabStatus {
    Loading,
    Complete,
}

/// Snapshot of a browser tab as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct TabInfo {
    pub id: TabId,
    pub url: Option<String>,
    pub pending_url: Option<String>,
    pub title: Option<String>,
}

impl TabInfo {
    pub fn new(id: TabId, url: &str, title: &str) -> Self {
        Self {
            id,
            url: Some(url.to_string()),
            pending_url: None,
            title: Some(title.to_string()),
        }
    }
}

/// Fields that changed in a tab update event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TabChange {
    pub url: Option<String>,
    pub title: Option<String>,
    pub status: Option<TabStatus>,
}

impl TabChange {
    /// Only title changes and load completion trigger reconciliation.
    pub fn triggers_refresh(&self) -> bool {
        let titled = self.title.as_deref().is_some_and(|t| !t.is_empty());
        titled || self.status == Some(TabStatus::Complete)
    }
}

// =============================================================================
// Applied Flags
// =============================================================================

bitflags::bitflags! {
    /// Which parts of a tab's appearance a reconciliation pass touched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AppliedFlags: u8 {
        const TITLE = 1 << 0;
        const ICON = 1 << 1;
    }
}
