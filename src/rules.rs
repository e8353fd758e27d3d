//! The rule catalog.
//!
//! One file per statement class. `get` returns every rule in catalog order:
//! the policy header first, then branch starts, conditions, plain actions and
//! `set` actions. Inside a class the order is the order rules are tried in,
//! so a more specific pattern must come before a more general one sharing
//! its keyword.

pub(crate) mod actions;
pub(crate) mod branch;
pub(crate) mod conditions;
pub(crate) mod name;
pub(crate) mod set;


use crate::Rule;

pub fn get() -> Vec<Rule> {
    let mut rules = name::get();
    rules.extend(branch::get());
    rules.extend(conditions::get());
    rules.extend(actions::get());
    rules.extend(set::get());
    rules
}
