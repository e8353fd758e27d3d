use crate::engine::RuleClass;
use crate::{Rule, Shape, Slot};

/// `route-policy NAME`, optionally followed by a parameter list. Anything
/// else after the name (`in`, `out`) is an attachment, not a header.
///
/// Shared: the name stays in the scan context for the lines that follow.
fn rule_policy_name() -> Rule {
    rule! {
        name: "name",
        class: RuleClass::NAME,
        pattern: r"^route-policy\s+(?P<name>[^\s(]+)(?:\(.*\))?$",
        shared: true,
        shape: Shape::Value(Slot::Text("name")),
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_policy_name()]
}
