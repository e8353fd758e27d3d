//! Rule compilation and indexing.
//!
//! This module holds the *static* side of the engine: the structures derived
//! from the full rule catalog that make matching a line cheap and predictable.
//!
//! Matching is split into two phases:
//!
//! 1. **Compile/index rules** (this module): build `CompiledRules` once and
//!    index every rule by its `RuleClass`.
//! 2. **Match** (see `matcher.rs`): classify the line (`trigger.rs`), then try
//!    only the rules of that class.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into `CompiledRules::rules`.
//! - Every list in `RuleIndex::by_class` is in ascending `RuleId` order, so
//!   trying a class list front to back is the same as trying the whole
//!   catalog front to back for a line of that class.
//! - A rule carries exactly one class bit.

use crate::Rule;

// --- Rule compilation and indexing -------------------------------------------

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

bitflags::bitflags! {
    /// Coarse statement classes. A line belongs to exactly one of them,
    /// decided by its leading keyword.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RuleClass: u8 {
        /// `route-policy NAME` headers.
        const NAME      = 1 << 0;
        /// `if`, `elseif` and `else` lines.
        const BRANCH    = 1 << 1;
        /// Condition clauses of an `if`/`elseif` line.
        const CONDITION = 1 << 2;
        /// Plain actions: `add`, `apply`, `drop`, `pass`, `prepend`, ...
        const ACTION    = 1 << 3;
        /// `set <attribute> ...` actions.
        const SET       = 1 << 4;

        /// Anything that may appear as a statement inside a body.
        const STATEMENT = Self::ACTION.bits() | Self::SET.bits();
    }
}

pub const CLASS_COUNT: usize = 5;

impl RuleClass {
    /// Slot of a single-bit class in `RuleIndex::by_class`.
    pub fn slot(self) -> Option<usize> {
        if self.bits().count_ones() == 1 { Some(self.bits().trailing_zeros() as usize) } else { None }
    }
}

#[derive(Default, Debug)]
pub struct RuleIndex {
    pub by_class: [Vec<RuleId>; CLASS_COUNT],
}

/// Pre-compiled rule set with its class index.
#[derive(Debug)]
pub struct CompiledRules<'a> {
    pub(crate) rules: Vec<&'a Rule>,
    pub index: RuleIndex,
}

impl<'a> CompiledRules<'a> {
    /// Create a compiled rule set from the catalog slice.
    ///
    /// This is intentionally lightweight: patterns are already compiled by
    /// the `regex!` statics, so this only builds the class index.
    pub(crate) fn new(rules: &'a [Rule]) -> Self {
        let rule_refs: Vec<&Rule> = rules.iter().collect();
        let mut index = RuleIndex::default();

        for (id, rule) in rule_refs.iter().enumerate() {
            match rule.class.slot() {
                Some(slot) => index.by_class[slot].push(id),
                None => tracing::warn!(rule = rule.name, class = ?rule.class, "rule must carry exactly one class"),
            }
        }

        CompiledRules { rules: rule_refs, index }
    }

    /// Rules that can match a line of `class`, in catalog order.
    pub(crate) fn candidates(&self, class: RuleClass) -> impl Iterator<Item = &'a Rule> + '_ {
        let ids: &[RuleId] = match class.slot() {
            Some(slot) => &self.index.by_class[slot],
            None => &[],
        };
        ids.iter().map(|&id| self.rules[id])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
