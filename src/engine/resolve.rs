//! Scope resolution.
//!
//! Segmentation produces a `Scope` tree of raw lines. Resolution turns that
//! tree into the policy document:
//!
//! ```text
//! Scope.global            ──▶ "global": { actions }
//! first If branch         ──▶ "if":   { "conditions": [..], actions }
//! every later branch      ──▶ "elif": [ { "conditions": [..], actions }, .. ]
//! Scope.else_scope        ──▶ "else": { "global", "if", "elif", "else" }
//! ```
//!
//! Statements are matched against the `STATEMENT` classes and their fragments
//! merged into one map per block (see `merge.rs`). A branch condition is cut
//! into clauses at top-level `and` / `or`; each clause keeps its connective
//! (it lands in `combine_condition`) and is matched against the `CONDITION`
//! rules. Parenthesised sets are never split; a parenthesised group that
//! opens a clause is flattened into its own clauses, the group's connective
//! moving to its last clause.
//!
//! Unrecognized statements and clauses contribute nothing; they are only
//! counted in `ScanMetrics`. A branch that lost a clause (`not ...`, an
//! unknown attribute) is also listed in `ScanMetrics::incomplete_branches`,
//! since its `conditions` no longer describe when it applies.
//!
//! Empty blocks are left out, so a policy whose statements yield no fields
//! resolves to `{ "name": .. }` alone.

use super::compiled_rules::RuleClass;
use super::matcher::LineMatcher;
use super::merge::merge_into;
use super::metrics::ScanMetrics;
use super::segment::{Branch, BranchKind, Scope};
use serde_json::{Map, Value};
use std::time::Instant;

/// Turns segmented bodies into policy documents.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    matcher: LineMatcher<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(matcher: LineMatcher<'a>) -> Self {
        Resolver { matcher }
    }

    /// Document for policy `name` with body `scope`.
    pub fn document(&self, name: &str, scope: &Scope) -> Map<String, Value> {
        self.document_with_metrics(name, scope, &mut ScanMetrics::default())
    }

    /// Like [`document`](Self::document), recording hits and misses in
    /// `metrics`.
    pub fn document_with_metrics(&self, name: &str, scope: &Scope, metrics: &mut ScanMetrics) -> Map<String, Value> {
        let start = Instant::now();

        // Resolve every scope of the else chain on its own, then nest them
        // from the innermost outwards.
        let chain: Vec<&Scope> = std::iter::successors(Some(scope), |s| s.else_scope.as_deref()).collect();
        let mut maps: Vec<Map<String, Value>> = chain.iter().map(|s| self.scope(s, metrics)).collect();

        let mut inner: Option<Map<String, Value>> = None;
        while let Some(mut map) = maps.pop() {
            if let Some(else_map) = inner.take().filter(|m| !m.is_empty()) {
                map.insert("else".to_string(), Value::Object(else_map));
            }
            inner = Some(map);
        }

        let mut document = Map::new();
        document.insert("name".to_string(), Value::String(name.to_string()));
        document.extend(inner.unwrap_or_default());

        metrics.resolve += start.elapsed();
        document
    }

    /// `global`, `if` and `elif` of one scope; `else` is attached by the
    /// caller.
    fn scope(&self, scope: &Scope, metrics: &mut ScanMetrics) -> Map<String, Value> {
        let mut out = Map::new();

        let global = self.statements(&scope.global, metrics);
        if !global.is_empty() {
            out.insert("global".to_string(), Value::Object(global));
        }

        let mut elif = Vec::new();
        for branch in &scope.branches {
            let block = self.block(branch, metrics);
            if branch.kind == BranchKind::If && !out.contains_key("if") {
                out.insert("if".to_string(), Value::Object(block));
            } else {
                elif.push(Value::Object(block));
            }
        }
        if !elif.is_empty() {
            out.insert("elif".to_string(), Value::Array(elif));
        }

        out
    }

    fn block(&self, branch: &Branch, metrics: &mut ScanMetrics) -> Map<String, Value> {
        let mut conditions = Vec::new();
        for clause in split_clauses(&branch.condition) {
            match self.matcher.first_match(&clause, RuleClass::CONDITION) {
                Some(m) => {
                    metrics.hit(m.rule_name());
                    conditions.extend(m.fragment().remove("conditions"));
                }
                None => {
                    tracing::warn!(clause = %clause, branch = %branch.line, "condition not recognized, branch conditions are incomplete");
                    metrics.miss(&clause);
                    metrics.incomplete(&branch.line);
                }
            }
        }

        let mut out = Map::new();
        if !conditions.is_empty() {
            out.insert("conditions".to_string(), Value::Array(conditions));
        }
        merge_into(&mut out, self.statements(&branch.statements, metrics));
        out
    }

    fn statements(&self, lines: &[String], metrics: &mut ScanMetrics) -> Map<String, Value> {
        let mut acc = Map::new();
        for line in lines {
            match self.matcher.first_match(line, RuleClass::STATEMENT) {
                Some(m) => {
                    metrics.hit(m.rule_name());
                    merge_into(&mut acc, m.fragment());
                }
                None => metrics.miss(line),
            }
        }
        acc
    }
}

/// Split condition text at top-level `and` / `or`. The connective stays at
/// the end of the clause it closes. A clause that is a parenthesised group
/// is split again.
pub(crate) fn split_clauses(condition: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    for clause in split_top_level(condition) {
        let connective = ["and", "or"].into_iter().find(|c| clause.strip_suffix(c).is_some_and(|b| b.ends_with(' ')));
        let body = connective.map_or(clause.as_str(), |c| clause[..clause.len() - c.len()].trim_end());
        let group = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')).filter(|b| balanced(b)).map(str::to_string);

        match group {
            Some(inner) => {
                let mut inner = split_clauses(&inner);
                if let (Some(last), Some(c)) = (inner.last_mut(), connective) {
                    last.push(' ');
                    last.push_str(c);
                }
                clauses.extend(inner);
            }
            None => clauses.push(clause),
        }
    }
    clauses
}

fn balanced(text: &str) -> bool {
    let mut depth: usize = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn split_top_level(condition: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut depth: usize = 0;

    for word in condition.split_whitespace() {
        current.push(word);
        for c in word.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if depth == 0 && (word == "and" || word == "or") {
            clauses.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        clauses.push(current.join(" "));
    }
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::default_matcher;
    use crate::engine::Segmenter;
    use serde_json::json;

    fn resolve(name: &str, body: &[&str]) -> Value {
        let scope = Segmenter::new(default_matcher(), false).segment(body).unwrap();
        Value::Object(Resolver::new(default_matcher()).document(name, &scope))
    }

    #[test]
    fn clauses_split_at_top_level_connectives() {
        assert_eq!(split_clauses("med eq 10 and tag eq 5"), ["med eq 10 and", "tag eq 5"]);
        assert_eq!(
            split_clauses("destination in (10.0.0.0/8 and more, 1.1.1.0/24) or as-path in X"),
            ["destination in (10.0.0.0/8 and more, 1.1.1.0/24) or", "as-path in X"]
        );
        assert_eq!(split_clauses("community is-empty and"), ["community is-empty and"]);
        assert!(split_clauses("").is_empty());
    }

    #[test]
    fn leading_groups_are_flattened() {
        assert_eq!(
            split_clauses("(med eq 1 or tag eq 2) and destination in PFX"),
            ["med eq 1 or", "tag eq 2 and", "destination in PFX"]
        );
        assert_eq!(split_clauses("((med eq 1))"), ["med eq 1"]);
        // Two groups side by side are not one group.
        assert_eq!(split_clauses("(med eq 1) or (tag eq 2)"), ["med eq 1 or", "tag eq 2"]);
    }

    #[test]
    fn grouped_conditions_reach_the_document() {
        let doc = resolve("P", &["if (med eq 1 or tag eq 2) and destination in PFX then", "drop"]);
        assert_eq!(
            doc["if"]["conditions"],
            json!([
                {"med": {"match": "eq", "input_number": "1", "combine_condition": "or"}},
                {"tag": {"match": "eq", "input_number": "2", "combine_condition": "and"}},
                {"destination": {"match": "in", "destination_name": "PFX"}}
            ])
        );
    }

    #[test]
    fn nested_if_opens_a_sibling_branch() {
        let doc = resolve("P", &["if med eq 1 then", "if tag eq 2 then", "drop", "pass"]);
        assert_eq!(doc["if"], json!({"conditions": [{"med": {"match": "eq", "input_number": "1"}}]}));
        assert_eq!(
            doc["elif"],
            json!([{"conditions": [{"tag": {"match": "eq", "input_number": "2"}}], "drop": true, "pass": true}])
        );
    }

    #[test]
    fn negated_condition_marks_the_branch_incomplete() {
        let scope = Segmenter::new(default_matcher(), false).segment(&["if not med eq 1 then", "drop"]).unwrap();
        let mut metrics = ScanMetrics::default();
        let doc = Resolver::new(default_matcher()).document_with_metrics("P", &scope, &mut metrics);

        assert_eq!(Value::Object(doc), json!({"name": "P", "if": {"drop": true}}));
        assert_eq!(metrics.unrecognized, ["not med eq 1"]);
        assert_eq!(metrics.incomplete_branches, ["if not med eq 1 then"]);
    }

    #[test]
    fn if_else_document() {
        let doc = resolve("EDGE", &["if destination in (1.2.3.0/24) then", "set weight 100", "else", "drop"]);
        assert_eq!(
            doc,
            json!({
                "name": "EDGE",
                "if": {
                    "conditions": [{"destination": {"match": "in", "destination_name": "(1.2.3.0/24)"}}],
                    "set": {"weight": "100"}
                },
                "else": {"global": {"drop": true}}
            })
        );
    }

    #[test]
    fn later_branches_become_elif_in_order() {
        let doc = resolve(
            "P",
            &["if med eq 1 then", "pass", "elseif med eq 2 then", "drop", "elseif tag eq 3 then", "set tag 4"],
        );
        assert_eq!(doc["if"]["conditions"], json!([{"med": {"match": "eq", "input_number": "1"}}]));
        assert_eq!(
            doc["elif"],
            json!([
                {"conditions": [{"med": {"match": "eq", "input_number": "2"}}], "drop": true},
                {"conditions": [{"tag": {"match": "eq", "input_number": "3"}}], "set": {"tag": "4"}}
            ])
        );
    }

    #[test]
    fn combined_clauses_keep_their_connective() {
        let doc = resolve("P", &["if med eq 10 and path-type is ebgp then", "pass"]);
        assert_eq!(
            doc["if"]["conditions"],
            json!([
                {"med": {"match": "eq", "input_number": "10", "combine_condition": "and"}},
                {"path_type": {"input_choice": "ebgp"}}
            ])
        );
    }

    #[test]
    fn nested_else_resolves_recursively() {
        let doc = resolve(
            "P",
            &["if med eq 1 then", "pass", "else", "set weight 5", "if tag eq 2 then", "drop", "else", "pass"],
        );
        assert_eq!(doc["else"]["global"], json!({"set": {"weight": "5"}}));
        assert_eq!(doc["else"]["if"]["drop"], json!(true));
        assert_eq!(doc["else"]["else"], json!({"global": {"pass": true}}));
    }

    #[test]
    fn unrecognized_statements_are_inert_but_counted() {
        let scope = Segmenter::new(default_matcher(), false).segment(&["frobnicate", "pass"]).unwrap();
        let mut metrics = ScanMetrics::default();
        let doc = Resolver::new(default_matcher()).document_with_metrics("P", &scope, &mut metrics);

        assert_eq!(Value::Object(doc), json!({"name": "P", "global": {"pass": true}}));
        assert_eq!(metrics.unrecognized, ["frobnicate"]);
        assert_eq!(metrics.rule_hits, [("pass", 1)]);
    }

    #[test]
    fn policy_without_fields_is_name_only() {
        assert_eq!(resolve("EMPTY", &["mystery one", "mystery two"]), json!({"name": "EMPTY"}));
        assert_eq!(resolve("EMPTY", &[]), json!({"name": "EMPTY"}));
    }

    #[test]
    fn apply_lines_append() {
        let doc = resolve("P", &["apply A", "apply B(10)"]);
        assert_eq!(
            doc["global"]["apply"],
            json!([{"route_policy": "A"}, {"route_policy": "B", "route_policy_input": "(10)"}])
        );
    }
}
