//! TabMagic Rule Parser
//!
//! This crate turns the user's raw rule text into an ordered `RuleSet`.

pub mod parser;

pub use parser::{parse_rules, parse_rules_with_report, ParseReport, RejectedLine};
