//! Branch starts.
//!
//! Only the segmenter looks at these. The condition group excludes a
//! trailing `then`; `else` is a bare prefix test so that anything starting
//! with it and not already taken by `elseif` closes the scope.

use crate::engine::RuleClass;
use crate::{Field, Rule, Shape};

fn rule_if() -> Rule {
    rule! {
        name: "branch.if",
        class: RuleClass::BRANCH,
        pattern: r"^if\s+(?P<condition>.*?)(?:\s+then)?$",
        shape: Shape::Map(vec![Field::text("condition")]),
    }
}

fn rule_elseif() -> Rule {
    rule! {
        name: "branch.elseif",
        class: RuleClass::BRANCH,
        pattern: r"^elseif\s+(?P<condition>.*?)(?:\s+then)?$",
        shape: Shape::Map(vec![Field::text("condition")]),
    }
}

fn rule_else() -> Rule {
    rule! {
        name: "branch.else",
        class: RuleClass::BRANCH,
        pattern: r"^else",
        shape: Shape::Map(vec![Field::on("else")]),
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_if(), rule_elseif(), rule_else()]
}
