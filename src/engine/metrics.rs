//! Per-policy scan metrics.
//!
//! Collected while a policy is segmented and resolved and surfaced through
//! `parse_verbose_with` and the CLI's `--verbose` report. Cheap enough that
//! the resolver always records them; callers that do not care drop them.
//!
//! ## Design notes
//!
//! - `rule_hits` is kept in first-hit order rather than sorted, so a report
//!   reads in the same order as the policy.
//! - Unrecognized lines are stored verbatim (trimmed), one entry per
//!   occurrence.

use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanMetrics {
    /// Body lines handed to the segmenter.
    pub lines: usize,
    /// Time spent splitting the body into scopes.
    pub segment: Duration,
    /// Time spent matching statements and conditions.
    pub resolve: Duration,
    /// Number of matches per rule name.
    pub rule_hits: Vec<(&'static str, usize)>,
    /// Statements and condition clauses no rule recognized.
    pub unrecognized: Vec<String>,
    /// Branch lines with at least one unrecognized condition clause.
    pub incomplete_branches: Vec<String>,
}

impl ScanMetrics {
    pub(crate) fn hit(&mut self, rule: &'static str) {
        match self.rule_hits.iter_mut().find(|(name, _)| *name == rule) {
            Some((_, count)) => *count += 1,
            None => self.rule_hits.push((rule, 1)),
        }
    }

    pub(crate) fn miss(&mut self, text: &str) {
        self.unrecognized.push(text.to_string());
    }

    pub(crate) fn incomplete(&mut self, branch: &str) {
        if !self.incomplete_branches.iter().any(|b| b == branch) {
            self.incomplete_branches.push(branch.to_string());
        }
    }

    /// Total number of recognized statements and clauses.
    pub fn recognized(&self) -> usize {
        self.rule_hits.iter().map(|(_, n)| n).sum()
    }

    pub fn total(&self) -> Duration {
        self.segment + self.resolve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_are_counted_in_first_hit_order() {
        let mut m = ScanMetrics::default();
        m.hit("set.weight");
        m.hit("drop");
        m.hit("set.weight");
        m.miss("frobnicate");

        assert_eq!(m.rule_hits, [("set.weight", 2), ("drop", 1)]);
        assert_eq!(m.recognized(), 3);
        assert_eq!(m.unrecognized, ["frobnicate"]);
    }

    #[test]
    fn incomplete_branches_are_listed_once() {
        let mut m = ScanMetrics::default();
        m.incomplete("if not med eq 1 and not tag eq 2 then");
        m.incomplete("if not med eq 1 and not tag eq 2 then");
        assert_eq!(m.incomplete_branches, ["if not med eq 1 and not tag eq 2 then"]);
    }
}
