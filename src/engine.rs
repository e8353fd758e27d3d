//! Line matching and block segmentation engine.
//!
//! This module is the entry point for turning route-policy text into a result
//! tree. It is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! rules (all)  ──┐
//!               │  CompiledRules::new           (compiled_rules.rs)
//!               └───────────────┬──────────────
//!                               │
//! line ── TriggerInfo::scan ────┼─ pick the class the line can belong to
//!         (trigger.rs)          │
//!                               v
//!                     LineMatcher::first_match (matcher.rs)
//!                       - try the class's rules in catalog order
//!                       - first structural match wins
//!                       - extract fields, update ScanContext
//!                               │
//! body ── Segmenter::segment ───┤  (segment.rs)
//!                               │  if / elseif / else buckets, nested else
//!                               v
//!                     Resolver::scope (resolve.rs)
//!                       - statements -> fragments
//!                       - merge_into accumulator (merge.rs)
//!                               │
//!                               v
//!                      policy document (serde_json::Map)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: derives `CompiledRules` from `Rule`s and indexes them
//!   by `RuleClass`, keeping catalog order inside each class.
//! - `trigger.rs`: maps a line's leading keyword to the single class whose
//!   rules can possibly match it.
//! - `matcher.rs`: first-match dispatch, field extraction and the explicit
//!   shared scan context.
//! - `segment.rs`: the `Scope` / `Branch` tree of one policy body.
//! - `merge.rs`: folds match fragments into one accumulator.
//! - `resolve.rs`: turns a `Scope` into the structured policy document.
//! - `metrics.rs`: optional per-policy trace data (rule hits, unrecognized
//!   lines, timings).
//!
//! ## Adding new statements
//!
//! New rules go under `src/rules/**` in the file of their class. A rule whose
//! leading keyword is new to its class must also be taught to
//! `TriggerInfo::scan`, otherwise the line is indexed into the wrong class.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=rpl_facts=trace` to see every matched and unrecognized
//! line.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/merge.rs"]
mod merge;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/segment.rs"]
mod segment;
#[path = "engine/trigger.rs"]
mod trigger;

pub use compiled_rules::{CompiledRules, RuleClass};
pub use matcher::{FieldValue, LineMatcher, Match, ScanContext};
pub(crate) use merge::merge_into;
pub use metrics::ScanMetrics;
pub use resolve::Resolver;
pub use segment::{Branch, BranchKind, Scope, Segmenter};
pub use trigger::TriggerInfo;
