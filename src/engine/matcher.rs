//! First-match line dispatch.
//!
//! `LineMatcher` applies the compiled catalog to one trimmed line:
//!
//! ```text
//! line ──▶ TriggerInfo::scan ──▶ class ∩ allowed
//!                                  │
//!                                  ▼
//!              candidates(class) in catalog order
//!                                  │  first regex that matches
//!                                  ▼
//!                     Match { rule, fields } ──▶ fragment()
//! ```
//!
//! There is no backtracking across rules and no scoring: the first rule
//! whose pattern matches the whole line owns it. A line no rule matches is
//! *unrecognized*, which is not an error; callers keep the raw text and move
//! on.
//!
//! Shared rules (the `route-policy NAME` header) also write their captures
//! into a `ScanContext`. The context is an explicit value threaded through
//! `scan_line`, never global state.

use super::compiled_rules::{CompiledRules, RuleClass};
use super::trigger::TriggerInfo;
use crate::{Rule, Shape, Slot};
use regex::Captures;
use serde_json::{Map, Value};

/// A value extracted from one capture slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Captured text. Numbers stay text until schema validation.
    Text(String),
    /// Presence of an optional literal token.
    Flag(bool),
    /// An optional group that did not take part in the match.
    Absent,
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Text(s) => Some(Value::String(s.clone())),
            FieldValue::Flag(b) => Some(Value::Bool(*b)),
            FieldValue::Absent => None,
        }
    }
}

impl Slot {
    fn read(self, caps: &Captures<'_>) -> FieldValue {
        match self {
            Slot::Text(group) => {
                caps.name(group).map(|m| FieldValue::Text(m.as_str().to_string())).unwrap_or(FieldValue::Absent)
            }
            Slot::Flag(group) => FieldValue::Flag(caps.name(group).is_some()),
            Slot::On => FieldValue::Flag(true),
        }
    }
}

/// The winning rule for a line and the fields it extracted.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub(crate) rule: &'a Rule,
    /// Extracted fields in template order. `Shape::Value` rules have one
    /// entry keyed by the last segment of the rule name.
    pub fields: Vec<(&'static str, FieldValue)>,
}

impl<'a> Match<'a> {
    fn extract(rule: &'a Rule, caps: &Captures<'_>) -> Self {
        let fields = match &rule.shape {
            Shape::Value(slot) => vec![(rule.leaf(), slot.read(caps))],
            Shape::Map(fields) | Shape::Item(fields) => fields.iter().map(|f| (f.key, f.slot.read(caps))).collect(),
        };
        Match { rule, fields }
    }

    /// Dotted name of the rule that matched.
    pub fn rule_name(&self) -> &'static str {
        self.rule.name
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(FieldValue::as_text)
    }

    /// The match as a tree rooted at the first segment of the rule name.
    ///
    /// Absent fields are left out rather than written as `null`, so merging a
    /// fragment never erases a value an earlier line set. A `Shape::Value`
    /// rule whose only slot is absent yields an empty fragment.
    pub fn fragment(&self) -> Map<String, Value> {
        let leaf = match &self.rule.shape {
            Shape::Value(_) => match self.fields.first().and_then(|(_, v)| v.to_json()) {
                Some(value) => value,
                None => return Map::new(),
            },
            Shape::Map(_) => Value::Object(self.object()),
            Shape::Item(_) => Value::Array(vec![Value::Object(self.object())]),
        };

        let mut segments = self.rule.path().rev();
        let mut fragment = Map::new();
        let Some(leaf_key) = segments.next() else {
            return fragment;
        };
        fragment.insert(leaf_key.to_string(), leaf);

        for segment in segments {
            let inner = std::mem::take(&mut fragment);
            fragment.insert(segment.to_string(), Value::Object(inner));
        }
        fragment
    }

    fn object(&self) -> Map<String, Value> {
        self.fields.iter().filter_map(|(k, v)| v.to_json().map(|v| (k.to_string(), v))).collect()
    }
}

/// Captures of shared rules, carried across the lines of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanContext {
    shared: Vec<(&'static str, String)>,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.shared.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    /// Policy name established by the last `route-policy NAME` header.
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    fn absorb(&mut self, m: &Match<'_>) {
        if !m.rule.shared {
            return;
        }
        for (key, value) in &m.fields {
            let FieldValue::Text(text) = value else { continue };
            match self.shared.iter_mut().find(|(k, _)| k == key) {
                Some((_, slot)) => *slot = text.clone(),
                None => self.shared.push((*key, text.clone())),
            }
        }
    }
}

/// Applies a compiled catalog to single lines.
#[derive(Debug, Clone, Copy)]
pub struct LineMatcher<'a> {
    compiled: &'a CompiledRules<'a>,
}

impl<'a> LineMatcher<'a> {
    pub fn new(compiled: &'a CompiledRules<'a>) -> Self {
        LineMatcher { compiled }
    }

    /// First rule of a class in `allowed` whose pattern matches `line`.
    pub fn first_match(&self, line: &str, allowed: RuleClass) -> Option<Match<'a>> {
        let line = line.trim();
        let trigger = TriggerInfo::scan(line);
        let class = trigger.class & allowed;
        if class.is_empty() {
            return None;
        }

        for rule in self.compiled.candidates(class) {
            if let Some(caps) = rule.pattern.captures(line) {
                tracing::debug!(rule = rule.name, line, "matched");
                return Some(Match::extract(rule, &caps));
            }
        }

        tracing::trace!(keyword = trigger.keyword, line, "unrecognized");
        None
    }

    /// Like [`first_match`](Self::first_match), and records shared captures
    /// in `ctx`.
    pub fn scan_line(&self, line: &str, allowed: RuleClass, ctx: &mut ScanContext) -> Option<Match<'a>> {
        let m = self.first_match(line, allowed)?;
        ctx.absorb(&m);
        Some(m)
    }
}
