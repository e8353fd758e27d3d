//! Facts assembly.
//!
//! ```text
//! "show running-config | include route-policy"   (or caller-supplied data)
//!         │  name rule, listing order, duplicates kept
//!         v
//! for each name: "show running-config route-policy NAME"
//!         │  body extraction ─▶ Segmenter ─▶ Resolver
//!         v
//! documents ─▶ purge store["route_maps"] ─▶ schema check ─▶ remove_empties
//!         v
//! store["route_maps"] = [ {name, global, if, elif, else}, .. ]
//! ```
//!
//! Every policy is fetched before the store is touched, so a fetch failure
//! leaves the previous facts in place. A validation failure happens after the
//! purge and leaves the entry absent.

use crate::api::{Options, PolicyTrace, default_matcher};
use crate::argspec::CONFIG;
use crate::engine::{LineMatcher, Resolver, RuleClass, ScanContext, ScanMetrics, Segmenter};
use crate::error::{Error, FetchError, Result};
use crate::normalize::remove_empties;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Instant;
use thiserror::Error;

/// Facts-store key the assembler owns.
pub const RESOURCE: &str = "route_maps";

const NAMES_COMMAND: &str = "show running-config | include route-policy";
const POLICY_COMMAND: &str = "show running-config route-policy";

fn policy_command(name: &str) -> String {
    format!("{POLICY_COMMAND} {name}")
}

/// Request/response access to a device's configuration text.
pub trait Connection {
    fn get(&mut self, command: &str) -> std::result::Result<String, FetchError>;
}

/// A policy listed by name has no body in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route-policy named '{0}' in the running configuration")]
pub struct MissingPolicy(pub String);

/// An in-memory [`Connection`] over aggregate running-config text.
///
/// Answers the name listing with every line mentioning `route-policy`, and a
/// per-policy request with that policy's block through `end-policy`.
#[derive(Debug, Clone)]
pub struct RunningConfig {
    text: String,
}

impl RunningConfig {
    pub fn new(text: impl Into<String>) -> Self {
        RunningConfig { text: text.into() }
    }

    fn listing(&self) -> String {
        self.text.lines().filter(|line| line.contains("route-policy")).collect::<Vec<_>>().join("\n")
    }

    fn policy(&self, name: &str) -> Option<String> {
        let matcher = default_matcher();
        let mut ctx = ScanContext::new();
        let mut inside = false;
        let mut block = Vec::new();

        for line in self.text.lines() {
            let trimmed = line.trim();
            if let Some(header) = header(&matcher, line, &mut ctx) {
                inside = header == name;
            }
            if inside {
                block.push(line);
                if trimmed == "end-policy" {
                    inside = false;
                }
            }
        }

        (!block.is_empty()).then(|| block.join("\n"))
    }
}

impl Connection for RunningConfig {
    fn get(&mut self, command: &str) -> std::result::Result<String, FetchError> {
        if command == NAMES_COMMAND {
            return Ok(self.listing());
        }
        match command.strip_prefix(POLICY_COMMAND).map(str::trim) {
            Some(name) if !name.is_empty() => match self.policy(name) {
                Some(body) => Ok(body),
                None => Err(MissingPolicy(name.to_string()).into()),
            },
            _ => Err(format!("unsupported command '{command}'").into()),
        }
    }
}

/// Resource-keyed facts, e.g. `{"route_maps": [..]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FactsStore {
    resources: Map<String, Value>,
}

impl FactsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource: &str) -> Option<&Value> {
        self.resources.get(resource)
    }

    pub fn insert(&mut self, resource: &str, value: Value) -> Option<Value> {
        self.resources.insert(resource.to_string(), value)
    }

    pub fn remove(&mut self, resource: &str) -> Option<Value> {
        self.resources.remove(resource)
    }

    /// The installed `route_maps` list.
    pub fn route_maps(&self) -> Option<&[Value]> {
        self.get(RESOURCE).and_then(Value::as_array).map(Vec::as_slice)
    }
}

/// Builds `route_maps` facts from a [`Connection`].
#[derive(Debug, Clone, Copy)]
pub struct FactsAssembler {
    matcher: LineMatcher<'static>,
    segmenter: Segmenter<'static>,
    resolver: Resolver<'static>,
}

impl FactsAssembler {
    pub fn new(options: &Options) -> Self {
        let matcher = default_matcher();
        FactsAssembler {
            matcher,
            segmenter: Segmenter::new(matcher, options.strict_branches),
            resolver: Resolver::new(matcher),
        }
    }

    /// Policy names from a name listing, in order, duplicates kept. Indented
    /// attachment lines (`route-policy X in` under a neighbor) are skipped.
    pub fn policy_names(&self, listing: &str) -> Vec<String> {
        let mut ctx = ScanContext::new();
        listing.lines().filter_map(|line| header(&self.matcher, line, &mut ctx)).collect()
    }

    /// Body lines of policy `name` in `text`.
    ///
    /// With a `route-policy` header present, the body is what follows the
    /// header naming `name`, up to `end-policy`. Without any header the whole
    /// text is the body. Blank lines, `!` separators and `endif` are dropped.
    pub fn body_lines<'t>(&self, name: &str, text: &'t str) -> Vec<&'t str> {
        let mut ctx = ScanContext::new();
        let has_header = text.lines().any(|line| header(&self.matcher, line, &mut ctx).is_some());
        let mut inside = !has_header;
        let mut body = Vec::new();

        for raw in text.lines() {
            if let Some(header) = header(&self.matcher, raw, &mut ctx) {
                inside = header == name;
                continue;
            }
            let line = raw.trim();
            if line.is_empty() || line.starts_with('!') || line == "endif" {
                continue;
            }
            if line == "end-policy" {
                inside = false;
                continue;
            }
            if inside {
                body.push(line);
            }
        }
        body
    }

    /// Segment and resolve one policy, keeping the intermediate tree and
    /// metrics.
    pub fn trace(&self, name: &str, text: &str) -> Result<PolicyTrace> {
        let mut metrics = ScanMetrics::default();
        let body = self.body_lines(name, text);
        metrics.lines = body.len();

        let start = Instant::now();
        let scope = self.segmenter.segment(&body)?;
        metrics.segment = start.elapsed();

        let document = self.resolver.document_with_metrics(name, &scope, &mut metrics);
        tracing::debug!(policy = name, lines = metrics.lines, unrecognized = metrics.unrecognized.len(), "resolved");
        Ok(PolicyTrace { name: name.to_string(), scope, document, metrics })
    }

    /// Unvalidated document for one policy.
    pub fn policy(&self, name: &str, text: &str) -> Result<Map<String, Value>> {
        Ok(self.trace(name, text)?.document)
    }

    /// Fetch and resolve every listed policy. `data` replaces the name
    /// listing fetch when given.
    pub fn collect<C: Connection + ?Sized>(&self, conn: &mut C, data: Option<&str>) -> Result<Vec<PolicyTrace>> {
        let listing = match data {
            Some(data) => data.to_string(),
            None => fetch(conn, NAMES_COMMAND)?,
        };
        let names = self.policy_names(&listing);
        tracing::debug!(count = names.len(), "policy names");

        names
            .iter()
            .map(|name| -> Result<PolicyTrace> {
                let text = fetch(conn, &policy_command(name))?;
                let trace = self.trace(name, &text)?;
                tracing::info!(policy = %name, "gathered");
                Ok(trace)
            })
            .collect()
    }

    /// Validate documents against the schema and strip empty values.
    pub fn finish(&self, documents: Vec<Map<String, Value>>) -> Result<Vec<Value>> {
        let mut config = Value::Array(documents.into_iter().map(Value::Object).collect());
        CONFIG.validate(&mut config, "config")?;
        match remove_empties(config) {
            Value::Array(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    /// Validated facts for every listed policy.
    pub fn gather<C: Connection + ?Sized>(&self, conn: &mut C, data: Option<&str>) -> Result<Vec<Value>> {
        let traces = self.collect(conn, data)?;
        self.finish(traces.into_iter().map(|t| t.document).collect())
    }

    /// Replace `store["route_maps"]` with freshly gathered facts.
    pub fn populate<C: Connection + ?Sized>(&self, conn: &mut C, store: &mut FactsStore, data: Option<&str>) -> Result<()> {
        let traces = self.collect(conn, data)?;
        store.remove(RESOURCE);
        let config = self.finish(traces.into_iter().map(|t| t.document).collect())?;
        store.insert(RESOURCE, Value::Array(config));
        Ok(())
    }
}

/// Name of the policy a `route-policy NAME` header opens. Headers start in
/// column zero; indented `route-policy` lines are attachments.
fn header(matcher: &LineMatcher<'_>, line: &str, ctx: &mut ScanContext) -> Option<String> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    matcher.scan_line(line, RuleClass::NAME, ctx)?;
    ctx.name().map(str::to_string)
}

fn fetch<C: Connection + ?Sized>(conn: &mut C, command: &str) -> Result<String> {
    conn.get(command).map_err(|source| Error::Fetch { command: command.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use serde_json::json;
    use std::collections::HashMap;

    /// Answers from a fixed table and records every command.
    #[derive(Default)]
    struct Scripted {
        responses: HashMap<String, String>,
        log: Vec<String>,
    }

    impl Scripted {
        fn with(mut self, command: &str, response: &str) -> Self {
            self.responses.insert(command.to_string(), response.to_string());
            self
        }
    }

    impl Connection for Scripted {
        fn get(&mut self, command: &str) -> std::result::Result<String, FetchError> {
            self.log.push(command.to_string());
            self.responses.get(command).cloned().ok_or_else(|| format!("no response for '{command}'").into())
        }
    }

    const RUNNING: &str = "\
route-policy B-OUT
  set weight 100
end-policy
!
route-policy A-IN
  if destination in (10.0.0.0/8) then
    set local-preference 200
    set tag 7
  elseif med eq 50 then
    drop
  else
    pass
  endif
end-policy
!
";

    fn assembler() -> FactsAssembler {
        FactsAssembler::new(&Options::default())
    }

    #[test]
    fn names_skip_unrelated_lines() {
        let names = assembler().policy_names("route-policy A\nroute-policy B\nunrelated line");
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn neighbor_attachments_are_not_policies() {
        let config = "\
route-policy PASS
  pass
end-policy
!
router bgp 65000
 neighbor 192.0.2.1
  remote-as 65001
  address-family ipv4 unicast
   route-policy PASS in
   route-policy PASS out
  !
 !
!
";
        let names = assembler().policy_names(&RunningConfig::new(config).listing());
        assert_eq!(names, ["PASS"]);

        let facts = assembler().gather(&mut RunningConfig::new(config), None).unwrap();
        assert_eq!(facts, [json!({"name": "PASS", "global": {"pass": true}})]);
    }

    #[test]
    fn header_takes_only_a_parameter_list_after_the_name() {
        let names = assembler().policy_names("route-policy A($x)
route-policy B in
route-policy C");
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn duplicate_names_are_kept() {
        let names = assembler().policy_names("route-policy A\nroute-policy A");
        assert_eq!(names, ["A", "A"]);
    }

    #[test]
    fn body_extraction_uses_the_named_header() {
        let body = assembler().body_lines("A-IN", RUNNING);
        assert_eq!(
            body,
            [
                "if destination in (10.0.0.0/8) then",
                "set local-preference 200",
                "set tag 7",
                "elseif med eq 50 then",
                "drop",
                "else",
                "pass",
            ]
        );
    }

    #[test]
    fn headerless_text_is_the_whole_body() {
        let body = assembler().body_lines("X", "\n  pass\n!\n  drop\n");
        assert_eq!(body, ["pass", "drop"]);
    }

    #[test]
    fn gather_follows_listing_order() {
        let mut conn = RunningConfig::new(RUNNING);
        let facts = assembler().gather(&mut conn, None).unwrap();

        assert_eq!(
            Value::Array(facts),
            json!([
                {"name": "B-OUT", "global": {"set": {"weight": 100}}},
                {
                    "name": "A-IN",
                    "if": {
                        "conditions": [{"destination": {"match": "in", "destination_name": "(10.0.0.0/8)"}}],
                        "set": {"tag": 7}
                    },
                    "elif": [{"conditions": [{"med": {"match": "eq", "input_number": 50}}], "drop": true}],
                    "else": {"global": {"pass": true}}
                }
            ])
        );
    }

    #[test]
    fn supplied_data_skips_the_listing_fetch() {
        let mut conn = Scripted::default().with("show running-config route-policy P", "route-policy P\n pass\nend-policy");
        let facts = assembler().gather(&mut conn, Some("route-policy P")).unwrap();

        assert_eq!(conn.log, ["show running-config route-policy P"]);
        assert_eq!(facts, [json!({"name": "P", "global": {"pass": true}})]);
    }

    #[test]
    fn policy_without_fields_is_name_only() {
        let mut conn = RunningConfig::new("route-policy EMPTY\n  # nothing here\nend-policy");
        let facts = assembler().gather(&mut conn, None).unwrap();
        assert_eq!(facts, [json!({"name": "EMPTY"})]);
    }

    #[test]
    fn missing_body_is_a_fetch_error() {
        let mut conn = RunningConfig::new("route-policy A\n pass\nend-policy");
        let mut store = FactsStore::new();
        store.insert(RESOURCE, json!(["stale"]));

        let err = assembler().populate(&mut conn, &mut store, Some("route-policy A\nroute-policy GHOST")).unwrap_err();

        match &err {
            Error::Fetch { command, source } => {
                assert_eq!(command, "show running-config route-policy GHOST");
                assert_eq!(source.to_string(), MissingPolicy("GHOST".into()).to_string());
            }
            other => panic!("unexpected error {other:?}"),
        }
        // Nothing was purged.
        assert_eq!(store.get(RESOURCE), Some(&json!(["stale"])));
    }

    #[test]
    fn populate_replaces_previous_facts() {
        let mut conn = RunningConfig::new(RUNNING);
        let mut store = FactsStore::new();
        store.insert(RESOURCE, json!([{"name": "OLD"}]));
        store.insert("interfaces", json!([]));

        assembler().populate(&mut conn, &mut store, None).unwrap();

        let names: Vec<&str> = store.route_maps().unwrap().iter().filter_map(|p| p["name"].as_str()).collect();
        assert_eq!(names, ["B-OUT", "A-IN"]);
        assert_eq!(store.get("interfaces"), Some(&json!([])));
    }

    #[test]
    fn validation_failure_leaves_the_entry_purged() {
        let mut conn = RunningConfig::new("route-policy BIG\n if med eq 99999999999999999999 then\n  pass\n endif\nend-policy");
        let mut store = FactsStore::new();
        store.insert(RESOURCE, json!([{"name": "OLD"}]));

        let err = assembler().populate(&mut conn, &mut store, None).unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidType { ref path, .. })
                if path == "config[0].if.conditions[0].med.input_number"
        ));
        assert_eq!(store.get(RESOURCE), None);
    }

    #[test]
    fn strict_mode_surfaces_branch_order() {
        let mut conn = RunningConfig::new("route-policy S\n pass\n elseif med eq 1 then\n  drop\nend-policy");
        let strict = FactsAssembler::new(&Options { strict_branches: true });
        assert!(matches!(strict.gather(&mut conn, None), Err(Error::BranchOrder { line: 2, .. })));

        let mut conn = RunningConfig::new("route-policy S\n pass\n elseif med eq 1 then\n  drop\nend-policy");
        assert!(assembler().gather(&mut conn, None).is_ok());
    }

    #[test]
    fn gathering_is_deterministic() {
        let first = assembler().gather(&mut RunningConfig::new(RUNNING), None).unwrap();
        let second = assembler().gather(&mut RunningConfig::new(RUNNING), None).unwrap();
        assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    }

    #[test]
    fn store_serializes_as_a_plain_map() {
        let mut store = FactsStore::new();
        store.insert(RESOURCE, json!([{"name": "P"}]));
        assert_eq!(serde_json::to_value(&store).unwrap(), json!({"route_maps": [{"name": "P"}]}));
    }
}
