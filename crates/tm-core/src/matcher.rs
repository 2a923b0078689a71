//! Rule Matching Engine
//!
//! Evaluates a rule set against a tab URL. The first rule (in rule set
//! order) that matches any candidate form of the URL wins; there is no
//! best-match scoring.

use crate::types::{RuleMatch, RuleSet};
use crate::url::match_candidates;

// =============================================================================
// Matcher
// =============================================================================

/// First-match evaluator over a borrowed rule set.
pub struct Matcher<'a> {
    rules: &'a RuleSet,
}

impl<'a> Matcher<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Match `url` and return the winning rule with its captures.
    ///
    /// Each rule is tried against the percent-decoded URL first (when it
    /// differs from the raw URL) and then the raw URL. Compiled patterns
    /// carry no position state between calls, so matching is re-entrant.
    pub fn match_url(&self, url: &str) -> Option<RuleMatch<'a>> {
        if self.rules.is_empty() {
            return None;
        }

        let candidates = match_candidates(url);

        for (rule_index, rule) in self.rules.iter().enumerate() {
            for candidate in &candidates {
                if let Some(caps) = rule.pattern().captures(candidate) {
                    let captures = caps
                        .iter()
                        .map(|group| group.map(|m| m.as_str().to_string()))
                        .collect();
                    log::trace!("rule #{} '{}' matched '{}'", rule_index, rule.pattern_source(), candidate);
                    return Some(RuleMatch {
                        rule,
                        rule_index,
                        captures,
                    });
                }
            }
        }

        None
    }
}

/// Convenience wrapper around [`Matcher::match_url`].
pub fn find_match<'a>(rules: &'a RuleSet, url: &str) -> Option<RuleMatch<'a>> {
    Matcher::new(rules).match_url(url)
}
