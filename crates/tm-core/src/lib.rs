//! TabMagic Core Library
//!
//! This crate provides the leaf pieces of the TabMagic tab appearance engine:
//! the rule and override types, URL helpers, the template renderer and the
//! rule matcher. It performs no I/O; persistence and browser access live in
//! `tm-runtime` behind injected traits.
//!
//! # Modules
//!
//! - `types`: Shared type definitions (rules, overrides, tabs)
//! - `url`: Restricted-scheme checks and percent encoding/decoding
//! - `template`: `$N` placeholder expansion
//! - `pattern`: Browser-dialect rule patterns
//! - `matcher`: First-match rule evaluation against a tab URL
//! - `icons`: Static icon catalog and name resolution

pub mod icons;
pub mod matcher;
pub mod pattern;
pub mod template;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use icons::{IconCatalog, IconEntry, AVAILABLE_ICONS};
pub use matcher::{find_match, Matcher};
pub use pattern::Pattern;
pub use template::render_template;
pub use types::{
    AppliedFlags, OverrideRecord, Rule, RuleError, RuleMatch, RuleSet, TabChange, TabId, TabInfo,
    TabStatus,
};
pub use url::{decode_uri_component, encode_uri_component, is_restricted_url};
