//! Trigger scanning (line pre-classification).
//!
//! Every catalog pattern starts with the literal keyword of its statement, so
//! a line's first word already decides which class of rules can match it.
//! `TriggerInfo::scan` computes that class; the matcher then tries only the
//! rules indexed under it.
//!
//! ## Design notes
//!
//! - This is an exact scan, not a heuristic: a wrong class here means a line
//!   silently stops matching. Keep the keyword tables in sync with
//!   `src/rules/*.rs`.
//! - `else` is a prefix test (`elseif` without a trailing space, `else-x`
//!   and so on all land in `BRANCH`), matching the segmenter's literal-prefix
//!   view of branch boundaries.

use super::compiled_rules::RuleClass;

/// Leading keywords of the `ACTION` class.
const ACTION_KEYWORDS: &[&str] =
    &["add", "apply", "drop", "pass", "prepend", "suppress-route", "unsuppress-route", "remove"];

/// Classification of one trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerInfo<'l> {
    /// First whitespace-delimited word, empty for a blank line.
    pub keyword: &'l str,
    /// The single class whose rules can match the line.
    pub class: RuleClass,
}

impl<'l> TriggerInfo<'l> {
    pub fn scan(line: &'l str) -> Self {
        let keyword = line.split_whitespace().next().unwrap_or("");

        let class = if keyword == "route-policy" {
            RuleClass::NAME
        } else if keyword == "if" || keyword == "elseif" || line.starts_with("else") {
            RuleClass::BRANCH
        } else if keyword == "set" {
            RuleClass::SET
        } else if ACTION_KEYWORDS.contains(&keyword) {
            RuleClass::ACTION
        } else {
            RuleClass::CONDITION
        };

        TriggerInfo { keyword, class }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_pick_one_class() {
        let cases = [
            ("route-policy PASS-ALL", RuleClass::NAME),
            ("if med eq 10 then", RuleClass::BRANCH),
            ("elseif tag eq 5 then", RuleClass::BRANCH),
            ("else", RuleClass::BRANCH),
            ("set weight 100", RuleClass::SET),
            ("suppress-route", RuleClass::ACTION),
            ("apply CHILD", RuleClass::ACTION),
            ("destination in (10.0.0.0/8)", RuleClass::CONDITION),
            ("", RuleClass::CONDITION),
        ];

        for (line, class) in cases {
            assert_eq!(TriggerInfo::scan(line).class, class, "line {line:?}");
        }
    }

    #[test]
    fn keyword_must_be_a_whole_word() {
        assert_eq!(TriggerInfo::scan("setting x").class, RuleClass::CONDITION);
        assert_eq!(TriggerInfo::scan("iffy").class, RuleClass::CONDITION);
    }
}
