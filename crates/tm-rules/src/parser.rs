//! Rule text parser.
//!
//! One rule per line, fields separated by `;`:
//!
//! ```text
//! # pattern ; name template ; icon name template
//! ^https://issues\.example\.com/([A-Z]+-\d+)$ ; Issue $1 ; Sage_1
//! ^https://mail\.example\.com/ ; ; ErrorEmails
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Trailing fields may
//! be omitted and fields past the third are ignored. Parsing never fails:
//! a bad line is dropped with a warning.

use tm_core::{Rule, RuleError, RuleSet};

pub const FIELD_DELIMITER: char = ';';
pub const COMMENT_PREFIX: char = '#';

/// A line that did not produce a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the input text.
    pub line_number: usize,
    pub text: String,
    pub reason: RuleError,
}

/// Rules plus per-line diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub rules: RuleSet,
    pub rejected: Vec<RejectedLine>,
    pub comment_lines: usize,
    pub blank_lines: usize,
}

/// Parse rule text, dropping invalid lines.
pub fn parse_rules(text: &str) -> RuleSet {
    parse_rules_with_report(text).rules
}

/// Parse rule text and report which lines were dropped and why.
pub fn parse_rules_with_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            report.blank_lines += 1;
            continue;
        }
        if line.starts_with(COMMENT_PREFIX) {
            report.comment_lines += 1;
            continue;
        }

        let (pattern, name, icon) = split_fields(line);
        match Rule::new(pattern, name, icon) {
            Ok(rule) => report.rules.push(rule),
            Err(reason) => {
                log::warn!("dropping rule on line {}: {} ({})", idx + 1, reason, line);
                report.rejected.push(RejectedLine {
                    line_number: idx + 1,
                    text: line.to_string(),
                    reason,
                });
            }
        }
    }

    report
}

fn split_fields(line: &str) -> (&str, &str, &str) {
    let mut fields = line.split(FIELD_DELIMITER);
    let pattern = fields.next().unwrap_or("");
    let name = fields.next().unwrap_or("");
    let icon = fields.next().unwrap_or("");
    (pattern, name, icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_fields() {
        let rules = parse_rules(r"^https://issues\.example\.com/(\w+)$;Issue $1;Sage_1");
        assert_eq!(rules.len(), 1);
        let rule = rules.get(0).unwrap();
        assert_eq!(rule.pattern_source(), r"^https://issues\.example\.com/(\w+)$");
        assert_eq!(rule.name_template(), "Issue $1");
        assert_eq!(rule.icon_template(), "Sage_1");
    }

    #[test]
    fn trailing_fields_are_optional() {
        let rules = parse_rules("example;Example");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get(0).unwrap().icon_template(), "");
        assert!(!rules.get(0).unwrap().has_icon());
    }

    #[test]
    fn icon_only_rule() {
        let rules = parse_rules("mail\\.example ; ; ErrorEmails");
        assert_eq!(rules.len(), 1);
        assert!(!rules.get(0).unwrap().has_name());
        assert!(rules.get(0).unwrap().has_icon());
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# header\n\n   \n  # indented comment\nexample;Example\n";
        let report = parse_rules_with_report(text);
        assert_eq!(report.rules.len(), 1);
        assert_eq!(report.comment_lines, 2);
        assert_eq!(report.blank_lines, 2);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn drops_invalid_lines_and_keeps_order() {
        let text = "first;One\n;NoPattern\n(bad;Broken\nonly-pattern\nonly-pattern;  ;  \nsecond;Two;Sage_2";
        let report = parse_rules_with_report(text);

        let names: Vec<&str> = report.rules.iter().map(|r| r.name_template()).collect();
        assert_eq!(names, vec!["One", "Two"]);

        let reasons: Vec<(usize, &RuleError)> =
            report.rejected.iter().map(|r| (r.line_number, &r.reason)).collect();
        assert_eq!(reasons.len(), 4);
        assert_eq!(reasons[0], (2, &RuleError::EmptyPattern));
        assert!(matches!(reasons[1], (3, RuleError::InvalidPattern(_))));
        assert_eq!(reasons[2], (4, &RuleError::NoTemplates));
        assert_eq!(reasons[3], (5, &RuleError::NoTemplates));
    }

    #[test]
    fn keeps_lookaround_and_backreference_rules() {
        let text = concat!(
            r"^https://(?!www\.)([^.]+)\.example\.com/;Sub $1;", "\n",
            r"^https://x\.example/(\w+)/\1$;Twice $1;", "\n",
            r"(?<=/docs/)(\w+);Doc $1;",
        );
        let report = parse_rules_with_report(text);
        assert!(report.rejected.is_empty(), "{:?}", report.rejected);
        assert_eq!(report.rules.len(), 3);
        assert_eq!(report.rules.get(0).unwrap().pattern_source(), r"^https://(?!www\.)([^.]+)\.example\.com/");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let rules = parse_rules("example;Name;Sage_1;ignored;also ignored");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get(0).unwrap().icon_template(), "Sage_1");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let rules = parse_rules("a;A\r\nb;B\r\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get(1).unwrap().name_template(), "B");
    }

    #[test]
    fn parsing_is_total() {
        let inputs = [
            "",
            ";;;;",
            "\n\n\n",
            "[[[;x",
            "*;x",
            "(?P<;x;y",
            "\u{0}\u{1};\u{2}",
            "🦀;crab;🦀",
            "#;#;#",
            r"a\;b",
        ];
        for input in inputs {
            let report = parse_rules_with_report(input);
            for rule in report.rules.iter() {
                assert!(!rule.pattern_source().is_empty());
                assert!(rule.has_name() || rule.has_icon());
            }
        }
    }

    #[test]
    fn reparsing_reflects_edits() {
        let before = parse_rules("example;Old");
        let after = parse_rules("example;New");
        assert_eq!(before.get(0).unwrap().name_template(), "Old");
        assert_eq!(after.get(0).unwrap().name_template(), "New");
    }
}
