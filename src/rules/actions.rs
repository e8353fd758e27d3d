//! Plain actions: everything that is neither a condition nor a `set`.

use crate::engine::RuleClass;
use crate::{Field, Rule, Shape, Slot};

fn rule_add_eigrp_metric() -> Rule {
    rule! {
        name: "add.eigrp_metric",
        class: RuleClass::ACTION,
        pattern: r"^add\seigrp-metric(?:\s(?P<bandwidth>\d+))?(?:\s(?P<delay>\d+))?(?:\s(?P<reliability>\d+))?(?:\s(?P<effective_bandwith>\d+))?(?:\s(?P<max_transmission>\d+))?$",
        shape: Shape::Map(vec![
            Field::text("bandwidth"),
            Field::text("delay"),
            Field::text("reliability"),
            Field::text("effective_bandwith"),
            Field::text("max_transmission"),
        ]),
    }
}

fn rule_add_rip_metric() -> Rule {
    rule! {
        name: "add.rip_metric",
        class: RuleClass::ACTION,
        pattern: r"^add\srip-metric(?:\s(?P<rip_metric>\d+))?$",
        shape: Shape::Value(Slot::Text("rip_metric")),
    }
}

/// `apply NAME` or `apply NAME(args)`; every line adds one list entry.
fn rule_apply() -> Rule {
    rule! {
        name: "apply",
        class: RuleClass::ACTION,
        pattern: r"^apply\s(?P<route_policy>[^\s(]+)\s*(?P<route_policy_input>.+)?$",
        shape: Shape::Item(vec![Field::text("route_policy"), Field::text("route_policy_input")]),
    }
}

fn rule_drop() -> Rule {
    rule! {
        name: "drop",
        class: RuleClass::ACTION,
        pattern: r"^drop$",
        shape: Shape::Value(Slot::On),
    }
}

fn rule_pass() -> Rule {
    rule! {
        name: "pass",
        class: RuleClass::ACTION,
        pattern: r"^pass$",
        shape: Shape::Value(Slot::On),
    }
}

/// `prepend as-path {ASN | most-recent | own-as} [COUNT]`. The trailing number
/// is always the repeat count.
fn rule_prepend() -> Rule {
    rule! {
        name: "prepend",
        class: RuleClass::ACTION,
        pattern: r"^prepend\sas-path\s(?:(?P<most_recent>most-recent)|(?P<own_as>own-as)|(?P<as_path>\d+))(?:\s(?P<number_of_times>\d+))?$",
        shape: Shape::Map(vec![
            Field::text("as_path"),
            Field::flag("most_recent"),
            Field::flag("own_as"),
            Field::text("number_of_times"),
        ]),
    }
}

fn rule_suppress_route() -> Rule {
    rule! {
        name: "suppress_route",
        class: RuleClass::ACTION,
        pattern: r"^suppress-route$",
        shape: Shape::Value(Slot::On),
    }
}

fn rule_unsuppress_route() -> Rule {
    rule! {
        name: "unsuppress_route",
        class: RuleClass::ACTION,
        pattern: r"^unsuppress-route$",
        shape: Shape::Value(Slot::On),
    }
}

/// `remove as-path private-as [entire-aspath]`.
fn rule_remove() -> Rule {
    rule! {
        name: "remove",
        class: RuleClass::ACTION,
        pattern: r"^remove\sas-path\sprivate-as(?:\s(?P<entire_aspath>entire-aspath))?$",
        shape: Shape::Map(vec![Field::on("set"), Field::flag("entire_aspath")]),
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_add_eigrp_metric(),
        rule_add_rip_metric(),
        rule_apply(),
        rule_drop(),
        rule_pass(),
        rule_prepend(),
        rule_suppress_route(),
        rule_unsuppress_route(),
        rule_remove(),
    ]
}
