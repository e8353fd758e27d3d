extern crate self as rpl_facts;

use regex::Regex;

#[macro_use]
mod macros;
mod api;
mod argspec;
mod engine;
mod error;
mod facts;
mod normalize;
mod rules;
mod schema;

pub use api::{
    LineMatch, Options, ParseDetails, PolicyTrace, gather, match_line, parse_policy, parse_running_config,
    parse_verbose_with, policy_names, scan_line, segment, segment_with,
};
pub use engine::{Branch, BranchKind, FieldValue, ScanContext, ScanMetrics, Scope};
pub use error::{Error, FetchError, Result, ValidationError};
pub use facts::{Connection, FactsAssembler, FactsStore, MissingPolicy, RESOURCE, RunningConfig};
pub use normalize::remove_empties;

use crate::engine::RuleClass;

// --- Internal types ---------------------------------------------------------

/// Where a single extracted value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Text of a named capture group; absent when an optional group did not
    /// take part in the match.
    Text(&'static str),
    /// Whether an optional literal token (a named group) was present.
    Flag(&'static str),
    /// Constant `true` on every match.
    On,
}

/// One keyed entry of a mapping-shaped result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
    pub key: &'static str,
    pub slot: Slot,
}

impl Field {
    /// Key and capture group share the same name.
    pub fn text(key: &'static str) -> Self {
        Field { key, slot: Slot::Text(key) }
    }

    pub fn flag(key: &'static str) -> Self {
        Field { key, slot: Slot::Flag(key) }
    }

    pub fn on(key: &'static str) -> Self {
        Field { key, slot: Slot::On }
    }
}

/// How a rule's captures land under its dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shape {
    /// A scalar stored directly at the path (`set.weight`, `drop`).
    Value(Slot),
    /// A mapping stored at the path (`conditions.med`, `set.spf_priority`).
    Map(Vec<Field>),
    /// A mapping appended to the list at the path (`apply`).
    Item(Vec<Field>),
}

/// A line rule: a dotted result path, a coarse class used for indexing, one
/// anchored pattern and the shape its captures produce.
///
/// The `regex` is stored as a static reference created through the `regex!`
/// helper in `src/macros.rs`, so the catalog compiles each pattern once.
#[derive(Debug)]
pub(crate) struct Rule {
    pub name: &'static str,
    pub class: RuleClass,
    pub pattern: &'static Regex,
    pub shape: Shape,
    /// Captures of a shared rule stay in the scan context for the rest of
    /// the scan.
    pub shared: bool,
}

impl Rule {
    /// Path segments of the rule name (`"set.weight"` -> `["set", "weight"]`).
    pub fn path(&self) -> impl DoubleEndedIterator<Item = &'static str> {
        self.name.split('.')
    }

    /// Last path segment, used as the field key of `Shape::Value` rules.
    pub fn leaf(&self) -> &'static str {
        self.name.rsplit('.').next().unwrap_or(self.name)
    }
}
