//! Condition clauses of `if` / `elseif` lines.
//!
//! The resolver hands each clause over on its own, with the connective that
//! closes it (`and` / `or`) still attached; it lands in `combine_condition`.
//! Optional set operands are lazy (`??`) so that a trailing connective is
//! never taken for the operand: `community is-empty and` keeps `and` as the
//! connective.

use crate::engine::RuleClass;
use crate::{Field, Rule, Shape};

// --- Shapes -------------------------------------------------------------------

/// `<keyword> [eq|ge|is|le] [N]`.
fn comparison() -> Shape {
    Shape::Map(vec![Field::text("match"), Field::text("input_number"), Field::text("combine_condition")])
}

/// `<keyword> in <set>`.
fn membership() -> Shape {
    Shape::Map(vec![Field::text("input_name"), Field::text("combine_condition")])
}

/// `<keyword> [is-empty|matches-any|matches-every|matches-within] [set]`.
fn community_match() -> Shape {
    Shape::Map(vec![Field::text("match"), Field::text("community_name"), Field::text("combine_condition")])
}

/// `<keyword> is <choice>`.
fn choice() -> Shape {
    Shape::Map(vec![Field::text("input_choice"), Field::text("combine_condition")])
}

/// Bare predicates such as `route-aggregated`.
fn predicate() -> Shape {
    Shape::Map(vec![Field::on("set"), Field::text("combine_condition")])
}

// --- Rules --------------------------------------------------------------------

fn rule_aigp_metric() -> Rule {
    rule! {
        name: "conditions.aigp_metric",
        class: RuleClass::CONDITION,
        pattern: r"^aigr?p-metric(?:\s(?P<match>eq|ge|is|le))?(?:\s(?P<input_number>\d+))?(?:\s(?P<combine_condition>and|or))?$",
        shape: comparison(),
    }
}

fn rule_as_path() -> Rule {
    rule! {
        name: "conditions.as_path",
        class: RuleClass::CONDITION,
        pattern: r"^as-path\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_community() -> Rule {
    rule! {
        name: "conditions.community",
        class: RuleClass::CONDITION,
        pattern: r"^community(?:\s(?P<match>is-empty|matches-any|matches-every|matches-within))?(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: Shape::Map(vec![Field::text("match"), Field::text("input_name"), Field::text("combine_condition")]),
    }
}

fn rule_community_length() -> Rule {
    rule! {
        name: "conditions.community_length",
        class: RuleClass::CONDITION,
        pattern: r"^community-length(?:\s(?P<match>eq|ge|is|le))?(?:\s(?P<input_number>\d+))?(?:\s(?P<combine_condition>and|or))?$",
        shape: comparison(),
    }
}

fn rule_destination() -> Rule {
    rule! {
        name: "conditions.destination",
        class: RuleClass::CONDITION,
        pattern: r"^destination(?:\s(?P<match>in|is-backup-path|is-best-external|is-best-path|is-multi-path|longer-than|or-longer))?(?:\s(?P<destination_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: Shape::Map(vec![Field::text("match"), Field::text("destination_name"), Field::text("combine_condition")]),
    }
}

fn rule_destination_prefix() -> Rule {
    rule! {
        name: "conditions.destination_prefix",
        class: RuleClass::CONDITION,
        pattern: r"^destination-prefix\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_esi() -> Rule {
    rule! {
        name: "conditions.esi",
        class: RuleClass::CONDITION,
        pattern: r"^esi\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_etag() -> Rule {
    rule! {
        name: "conditions.etag",
        class: RuleClass::CONDITION,
        pattern: r"^etag\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_evpn_gateway() -> Rule {
    rule! {
        name: "conditions.evpn_gateway",
        class: RuleClass::CONDITION,
        pattern: r"^evpn-gateway\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_evpn_originator() -> Rule {
    rule! {
        name: "conditions.evpn_originator",
        class: RuleClass::CONDITION,
        pattern: r"^evpn-originator\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_evpn_route_type() -> Rule {
    rule! {
        name: "conditions.evpn_route_type",
        class: RuleClass::CONDITION,
        pattern: r"^evpn-route-type\sis(?:\s(?P<input_number>\d+))?(?:\s(?P<combine_condition>and|or))?$",
        shape: Shape::Map(vec![Field::text("input_number"), Field::text("combine_condition")]),
    }
}

fn rule_extcommunity_color() -> Rule {
    rule! {
        name: "conditions.extcommunity_color",
        class: RuleClass::CONDITION,
        pattern: r"^extcommunity\scolor(?:\s(?P<match>is-empty|matches-any|matches-every|matches-within))?(?:\s(?P<community_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: community_match(),
    }
}

fn rule_extcommunity_rt() -> Rule {
    rule! {
        name: "conditions.extcommunity_rt",
        class: RuleClass::CONDITION,
        pattern: r"^extcommunity\srt(?:\s(?P<match>is-empty|matches-any|matches-every|matches-within))?(?:\s(?P<community_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: community_match(),
    }
}

fn rule_extcommunity_seg_nh() -> Rule {
    rule! {
        name: "conditions.extcommunity_seg_nh",
        class: RuleClass::CONDITION,
        pattern: r"^extcommunity\sseg-nh(?:\s(?P<match>is-empty|matches-any|matches-every|matches-within))?(?:\s(?P<community_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: community_match(),
    }
}

fn rule_extcommunity_soo() -> Rule {
    rule! {
        name: "conditions.extcommunity_soo",
        class: RuleClass::CONDITION,
        pattern: r"^extcommunity\ssoo(?:\s(?P<match>is-empty|matches-any|matches-every|matches-within))?(?:\s(?P<community_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: community_match(),
    }
}

fn rule_i_pmsi_present() -> Rule {
    rule! {
        name: "conditions.i_pmsi_present",
        class: RuleClass::CONDITION,
        pattern: r"^i-pmsi-present(?:\s(?P<combine_condition>and|or))?$",
        shape: predicate(),
    }
}

fn rule_large_community() -> Rule {
    rule! {
        name: "conditions.large_community",
        class: RuleClass::CONDITION,
        pattern: r"^large-community(?:\s(?P<match>is-empty|matches-any|matches-every|matches-within))?(?:\s(?P<community_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: community_match(),
    }
}

fn rule_local_preference() -> Rule {
    rule! {
        name: "conditions.local_preference",
        class: RuleClass::CONDITION,
        pattern: r"^local-preference(?:\s(?P<match>eq|ge|is|le))?(?:\s(?P<input_number>\d+))?(?:\s(?P<combine_condition>and|or))?$",
        shape: comparison(),
    }
}

fn rule_mac() -> Rule {
    rule! {
        name: "conditions.mac",
        class: RuleClass::CONDITION,
        pattern: r"^mac\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_med() -> Rule {
    rule! {
        name: "conditions.med",
        class: RuleClass::CONDITION,
        pattern: r"^med\s(?P<match>eq|ge|is|le)\s(?P<input_number>\d+)(?:\s(?P<combine_condition>and|or))?$",
        shape: comparison(),
    }
}

fn rule_next_hop() -> Rule {
    rule! {
        name: "conditions.next_hop",
        class: RuleClass::CONDITION,
        pattern: r"^next-hop\sin\s(?P<input_name>\([^)]*\)|\S+)(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_orf_prefix() -> Rule {
    rule! {
        name: "conditions.orf_prefix",
        class: RuleClass::CONDITION,
        pattern: r"^orf\sprefix\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_origin() -> Rule {
    rule! {
        name: "conditions.origin",
        class: RuleClass::CONDITION,
        pattern: r"^origin\sis(?:\s(?P<input_choice>ebgp|ibgp|incomplete))?(?:\s(?P<combine_condition>and|or))?$",
        shape: choice(),
    }
}

fn rule_path_type() -> Rule {
    rule! {
        name: "conditions.path_type",
        class: RuleClass::CONDITION,
        pattern: r"^path-type\sis(?:\s(?P<input_choice>ebgp|ibgp))?(?:\s(?P<combine_condition>and|or))?$",
        shape: choice(),
    }
}

fn rule_protocol() -> Rule {
    rule! {
        name: "conditions.protocol",
        class: RuleClass::CONDITION,
        pattern: r"^protocol\sis(?:\s(?P<input_choice>bgp|connected|eigrp|isis|ospf|ospfv3|rip|static))?(?:\s(?P<combine_condition>and|or))?$",
        shape: choice(),
    }
}

fn rule_rd() -> Rule {
    rule! {
        name: "conditions.rd",
        class: RuleClass::CONDITION,
        pattern: r"^rd\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_rib_has_route() -> Rule {
    rule! {
        name: "conditions.rib_has_route",
        class: RuleClass::CONDITION,
        pattern: r"^rib-has-route\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_rib_metric() -> Rule {
    rule! {
        name: "conditions.rib_metric",
        class: RuleClass::CONDITION,
        pattern: r"^rib-metric\s(?P<match>eq|ge|is|le)\s(?P<input_number>\d+)(?:\s(?P<combine_condition>and|or))?$",
        shape: comparison(),
    }
}

fn rule_route_aggregated() -> Rule {
    rule! {
        name: "conditions.route_aggregated",
        class: RuleClass::CONDITION,
        pattern: r"^route-aggregated(?:\s(?P<combine_condition>and|or))?$",
        shape: predicate(),
    }
}

fn rule_route_has_label() -> Rule {
    rule! {
        name: "conditions.route_has_label",
        class: RuleClass::CONDITION,
        pattern: r"^route-has-label(?:\s(?P<combine_condition>and|or))?$",
        shape: predicate(),
    }
}

fn rule_route_has_vrf_ri() -> Rule {
    rule! {
        name: "conditions.route_has_vrf_ri",
        class: RuleClass::CONDITION,
        pattern: r"^route-has-vrf-ri(?:\s(?P<combine_condition>and|or))?$",
        shape: predicate(),
    }
}

fn rule_route_type() -> Rule {
    rule! {
        name: "conditions.route_type",
        class: RuleClass::CONDITION,
        pattern: r"^route-type\sis(?:\s(?P<input_choice>interarea|internal|level-1-2|level-1|level-2|local|ospf-external-type-1|ospf-external-type-2|ospf-inter-area|ospf-intra-area|ospf-nssa-type-1|ospf-nssa-type-2|type-1|type-2))?(?:\s(?P<combine_condition>and|or))?$",
        shape: choice(),
    }
}

fn rule_source() -> Rule {
    rule! {
        name: "conditions.source",
        class: RuleClass::CONDITION,
        pattern: r"^source\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_source_prefix() -> Rule {
    rule! {
        name: "conditions.source_prefix",
        class: RuleClass::CONDITION,
        pattern: r"^source-prefix\sin(?:\s(?P<input_name>\([^)]*\)|\S+))??(?:\s(?P<combine_condition>and|or))?$",
        shape: membership(),
    }
}

fn rule_tag() -> Rule {
    rule! {
        name: "conditions.tag",
        class: RuleClass::CONDITION,
        pattern: r"^tag\s(?P<match>eq|ge|is|le)\s(?P<input_number>\d+)(?:\s(?P<combine_condition>and|or))?$",
        shape: comparison(),
    }
}

fn rule_validation_state() -> Rule {
    rule! {
        name: "conditions.validation_state",
        class: RuleClass::CONDITION,
        pattern: r"^validation-state\sis(?:\s(?P<input_choice>invalid|not-found|valid))?(?:\s(?P<combine_condition>and|or))?$",
        shape: choice(),
    }
}

fn rule_vpn_distinguisher() -> Rule {
    rule! {
        name: "conditions.vpn_distinguisher",
        class: RuleClass::CONDITION,
        pattern: r"^vpn-distinguisher\sis\s(?P<input_number>\d+)(?:\s(?P<combine_condition>and|or))?$",
        shape: Shape::Map(vec![Field::text("input_number"), Field::text("combine_condition")]),
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_aigp_metric(),
        rule_as_path(),
        rule_community(),
        rule_community_length(),
        rule_destination(),
        rule_destination_prefix(),
        rule_esi(),
        rule_etag(),
        rule_evpn_gateway(),
        rule_evpn_originator(),
        rule_evpn_route_type(),
        rule_extcommunity_color(),
        rule_extcommunity_rt(),
        rule_extcommunity_seg_nh(),
        rule_extcommunity_soo(),
        rule_i_pmsi_present(),
        rule_large_community(),
        rule_local_preference(),
        rule_mac(),
        rule_med(),
        rule_next_hop(),
        rule_orf_prefix(),
        rule_origin(),
        rule_path_type(),
        rule_protocol(),
        rule_rd(),
        rule_rib_has_route(),
        rule_rib_metric(),
        rule_route_aggregated(),
        rule_route_has_label(),
        rule_route_has_vrf_ri(),
        rule_route_type(),
        rule_source(),
        rule_source_prefix(),
        rule_tag(),
        rule_validation_state(),
        rule_vpn_distinguisher(),
    ]
}
