use crate::engine::{self, CompiledRules, LineMatcher, RuleClass, ScanContext, ScanMetrics, Scope, Segmenter};
use crate::error::Result;
use crate::facts::{Connection, FactsAssembler, RunningConfig};
use crate::{FieldValue, Rule};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(crate::rules::get);
static DEFAULT_COMPILED: Lazy<CompiledRules<'static>> = Lazy::new(|| CompiledRules::new(&DEFAULT_RULES));

/// Matcher over the built-in rule catalog.
pub(crate) fn default_matcher() -> LineMatcher<'static> {
    LineMatcher::new(&DEFAULT_COMPILED)
}

/// Options that affect segmentation and gathering.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Reject an `elseif` or `else` that has no branch before it in its
    /// scope instead of absorbing it with a warning.
    pub strict_branches: bool,
}

/// The rule that recognized one line and what it extracted.
#[derive(Debug, Clone, Serialize)]
pub struct LineMatch {
    /// Dotted rule name, e.g. `"set.weight"`.
    pub rule: String,
    /// Extracted fields in template order. Absent optional groups are left
    /// out; flags appear as `true` / `false`.
    pub fields: Map<String, Value>,
    /// The fragment this line contributes to its block.
    pub fragment: Map<String, Value>,
}

impl From<engine::Match<'_>> for LineMatch {
    fn from(m: engine::Match<'_>) -> Self {
        let fields = m
            .fields
            .iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    FieldValue::Text(s) => Value::String(s.clone()),
                    FieldValue::Flag(b) => Value::Bool(*b),
                    FieldValue::Absent => return None,
                };
                Some((key.to_string(), value))
            })
            .collect();
        LineMatch { rule: m.rule_name().to_string(), fields, fragment: m.fragment() }
    }
}

/// One policy on its way through the pipeline.
#[derive(Debug, Clone)]
pub struct PolicyTrace {
    pub name: String,
    /// Segmented body.
    pub scope: Scope,
    /// Resolved document, before schema validation.
    pub document: Map<String, Value>,
    pub metrics: ScanMetrics,
}

/// Additional details returned by [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseDetails {
    /// Per-policy traces, in listing order.
    pub policies: Vec<PolicyTrace>,
    /// Validated, pruned facts; one entry per policy.
    pub facts: Vec<Value>,
    /// Total elapsed time.
    pub total: Duration,
}

/// Match one line against the whole catalog.
///
/// # Example
/// ```
/// use rpl_facts::match_line;
///
/// let m = match_line("set weight 100").unwrap();
/// assert_eq!(m.rule, "set.weight");
/// assert_eq!(m.fragment["set"]["weight"], "100");
/// ```
pub fn match_line(line: &str) -> Option<LineMatch> {
    default_matcher().first_match(line, RuleClass::all()).map(LineMatch::from)
}

/// Like [`match_line`], and keeps captures of shared rules (the policy name)
/// in `ctx` for the lines that follow.
pub fn scan_line(line: &str, ctx: &mut ScanContext) -> Option<LineMatch> {
    default_matcher().scan_line(line, RuleClass::all(), ctx).map(LineMatch::from)
}

/// Policy names in a `route-policy` listing, in order.
pub fn policy_names(listing: &str) -> Vec<String> {
    FactsAssembler::new(&Options::default()).policy_names(listing)
}

/// Segment one policy body with default options.
pub fn segment(body: &str) -> Result<Scope> {
    segment_with(body, &Options::default())
}

pub fn segment_with(body: &str, options: &Options) -> Result<Scope> {
    let lines: Vec<&str> = body.lines().collect();
    Segmenter::new(default_matcher(), options.strict_branches).segment(&lines)
}

/// Resolve one policy, header optional, into its unvalidated document.
///
/// # Example
/// ```
/// use rpl_facts::parse_policy;
///
/// let doc = parse_policy("EDGE", "route-policy EDGE\n  drop\nend-policy").unwrap();
/// assert_eq!(doc["global"]["drop"], true);
/// ```
pub fn parse_policy(name: &str, text: &str) -> Result<Map<String, Value>> {
    FactsAssembler::new(&Options::default()).policy(name, text)
}

/// Validated facts for every policy in aggregate running-config text.
pub fn parse_running_config(text: &str, options: &Options) -> Result<Vec<Value>> {
    gather(&mut RunningConfig::new(text), options)
}

/// Validated facts for every policy reachable through `conn`.
pub fn gather<C: Connection + ?Sized>(conn: &mut C, options: &Options) -> Result<Vec<Value>> {
    FactsAssembler::new(options).gather(conn, None)
}

/// Like [`parse_running_config`], keeping the segmented tree and metrics of
/// every policy.
pub fn parse_verbose_with(text: &str, options: &Options) -> Result<ParseDetails> {
    let start = Instant::now();
    let assembler = FactsAssembler::new(options);

    let policies = assembler.collect(&mut RunningConfig::new(text), None)?;
    let facts = assembler.finish(policies.iter().map(|p| p.document.clone()).collect())?;

    Ok(ParseDetails { policies, facts, total: start.elapsed() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    const CONFIG: &str = "\
route-policy EDGE-IN
  if destination in (1.2.3.0/24) then
    set weight 100
  else
    drop
  endif
end-policy
!
route-policy TRANSIT
  apply EDGE-IN
  set tag 20
end-policy
";

    #[test]
    fn match_line_reports_rule_fields_and_fragment() {
        let m = match_line("apply CHILD(10)").unwrap();
        assert_eq!(m.rule, "apply");
        assert_eq!(Value::Object(m.fields), json!({"route_policy": "CHILD", "route_policy_input": "(10)"}));
        assert_eq!(
            Value::Object(m.fragment),
            json!({"apply": [{"route_policy": "CHILD", "route_policy_input": "(10)"}]})
        );
        assert!(match_line("frobnicate").is_none());
    }

    #[test]
    fn scan_line_keeps_the_policy_name() {
        let mut ctx = ScanContext::new();
        scan_line("route-policy A", &mut ctx).unwrap();
        scan_line("pass", &mut ctx).unwrap();
        assert_eq!(ctx.name(), Some("A"));
    }

    #[test]
    fn running_config_becomes_facts() {
        let facts = parse_running_config(CONFIG, &Options::default()).unwrap();
        assert_eq!(
            Value::Array(facts),
            json!([
                {
                    "name": "EDGE-IN",
                    "if": {
                        "conditions": [{"destination": {"match": "in", "destination_name": "(1.2.3.0/24)"}}],
                        "set": {"weight": 100}
                    },
                    "else": {"global": {"drop": true}}
                },
                {
                    "name": "TRANSIT",
                    "global": {"apply": [{"route_policy": "EDGE-IN"}], "set": {"tag": 20}}
                }
            ])
        );
    }

    #[test]
    fn empty_config_has_no_policies() {
        assert!(parse_running_config("", &Options::default()).unwrap().is_empty());
        assert!(parse_running_config("hostname r1\n", &Options::default()).unwrap().is_empty());
    }

    #[test]
    fn segment_with_honours_strict_branches() {
        assert!(segment("else\npass").is_ok());
        let strict = Options { strict_branches: true };
        assert!(matches!(segment_with("else\npass", &strict), Err(Error::BranchOrder { line: 1, .. })));
    }

    #[test]
    fn verbose_run_keeps_traces() {
        let details = parse_verbose_with(CONFIG, &Options::default()).unwrap();
        assert_eq!(details.policies.len(), 2);
        assert_eq!(details.facts.len(), 2);

        let edge = &details.policies[0];
        assert_eq!(edge.name, "EDGE-IN");
        assert_eq!(edge.scope.else_depth(), 1);
        assert_eq!(edge.metrics.lines, 4);
        assert!(edge.metrics.unrecognized.is_empty());
        assert!(details.total >= edge.metrics.total());
    }

    #[test]
    fn policy_names_in_listing_order() {
        assert_eq!(policy_names("route-policy Z\nroute-policy A(x)\nfoo"), ["Z", "A"]);
        assert_eq!(policy_names("route-policy Z\n   route-policy Z in\nroute-policy Z out"), ["Z"]);
    }
}
