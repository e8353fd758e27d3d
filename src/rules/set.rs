//! `set <attribute> ...` actions.
//!
//! Keyword-only options are flags: every flag of a rule is written on every
//! match, `true` for the ones present. Numbers stay text here and are
//! coerced by the schema.

use crate::engine::RuleClass;
use crate::{Field, Rule, Shape, Slot};

fn flags(keys: &[&'static str]) -> Shape {
    Shape::Map(keys.iter().map(|&key| Field::flag(key)).collect())
}

fn texts(keys: &[&'static str]) -> Shape {
    Shape::Map(keys.iter().map(|&key| Field::text(key)).collect())
}

fn rule_administrative_distance() -> Rule {
    rule! {
        name: "set.administrative_distance",
        class: RuleClass::SET,
        pattern: r"^set\sadministrative-distance(?:\s(?P<administrative_distance>\d+))?$",
        shape: Shape::Value(Slot::Text("administrative_distance")),
    }
}

/// `set aigp-metric [+|-] [N] [igp-cost]`.
fn rule_aigp_metric() -> Rule {
    rule! {
        name: "set.aigp_metric",
        class: RuleClass::SET,
        pattern: r"^set\saigp-metric(?:\s(?P<icrement>\+))?(?:\s(?P<decrement>-))?(?:\s(?P<metric_number>\d+))?(?:\s(?P<igp_cost>igp-cost))?$",
        shape: Shape::Map(vec![
            Field::flag("icrement"),
            Field::flag("decrement"),
            Field::text("metric_number"),
            Field::flag("igp_cost"),
        ]),
    }
}

fn rule_attribute_set() -> Rule {
    rule! {
        name: "set.attribute_set",
        class: RuleClass::SET,
        pattern: r"^set\sattribute-set(?:\s(?P<attribute_set>\S+))?$",
        shape: Shape::Value(Slot::Text("attribute_set")),
    }
}

fn rule_c_multicast_routing() -> Rule {
    rule! {
        name: "set.c_multicast_routing",
        class: RuleClass::SET,
        pattern: r"^set\sc-multicast-routing(?:\s(?P<bgp>bgp))?(?:\s(?P<pim>pim))?$",
        shape: flags(&["bgp", "pim"]),
    }
}

fn rule_community() -> Rule {
    rule! {
        name: "set.community",
        class: RuleClass::SET,
        pattern: r"^set\scommunity(?:\s(?P<community_name>\([^)]*\)|[^\s(]+))??(?:\s(?P<additive>additive))?$",
        shape: Shape::Map(vec![Field::text("community_name"), Field::flag("additive")]),
    }
}

fn rule_core_tree() -> Rule {
    rule! {
        name: "set.core_tree",
        class: RuleClass::SET,
        pattern: r"^set\score-tree(?:\s(?P<ingress_replication>ingress-replication))?(?:\s(?P<ingress_replication_default>ingress-replication-default))?(?:\s(?P<ingress_replication_partitioned>ingress-replication-partitioned))?(?:\s(?P<mldp>mldp))?(?:\s(?P<mldp_default>mldp-default))?(?:\s(?P<mldp_inband>mldp-inband))?(?:\s(?P<mldp_partitioned_mp2mp>mldp-partitioned-mp2mp))?(?:\s(?P<mldp_partitioned_p2mp>mldp-partitioned-p2mp))?(?:\s(?P<p2mp_te>p2mp-te))?(?:\s(?P<p2mp_te_default>p2mp-te-default))?(?:\s(?P<p2mp_te_partitioned>p2mp-te-partitioned))?(?:\s(?P<pim_default>pim-default))?(?:\s(?P<sr_p2mp>sr-p2mp))?$",
        shape: flags(&[
            "ingress_replication",
            "ingress_replication_default",
            "ingress_replication_partitioned",
            "mldp",
            "mldp_default",
            "mldp_inband",
            "mldp_partitioned_mp2mp",
            "mldp_partitioned_p2mp",
            "p2mp_te",
            "p2mp_te_default",
            "p2mp_te_partitioned",
            "pim_default",
            "sr_p2mp",
        ]),
    }
}

/// `set dampening HALFLIFE SUPPRESS REUSE MAX-SUPPRESS`.
fn rule_dampening() -> Rule {
    rule! {
        name: "set.dampening",
        class: RuleClass::SET,
        pattern: r"^set\sdampening(?:\s(?P<halflife>\d+))?(?:\s(?P<suppress>\d+))?(?:\s(?P<reuse>\d+))?(?:\s(?P<max_suppress>\d+))?$",
        shape: texts(&["halflife", "max_suppress", "reuse", "suppress"]),
    }
}

fn rule_downstream_core_tree() -> Rule {
    rule! {
        name: "set.downstream_core_tree",
        class: RuleClass::SET,
        pattern: r"^set\sdownstream-core-tree(?:\s(?P<ingress_replication>ingress-replication))?(?:\s(?P<mldp>mldp))?(?:\s(?P<p2mp_te>p2mp-te))?(?:\s(?P<sr_p2mp>sr-p2mp))?$",
        shape: flags(&["ingress_replication", "mldp", "p2mp_te", "sr_p2mp"]),
    }
}

fn rule_eigrp_metric() -> Rule {
    rule! {
        name: "set.eigrp_metric",
        class: RuleClass::SET,
        pattern: r"^set\seigrp-metric(?:\s(?P<bandwidth>\d+))?(?:\s(?P<delay>\d+))?(?:\s(?P<reliability>\d+))?(?:\s(?P<effective_bandwith>\d+))?(?:\s(?P<max_transmission>\d+))?$",
        shape: texts(&["bandwidth", "delay", "reliability", "effective_bandwith", "max_transmission"]),
    }
}

fn rule_fallback_vrf_lookup() -> Rule {
    rule! {
        name: "set.fallback_vrf_lookup",
        class: RuleClass::SET,
        pattern: r"^set\sfallback-vrf-lookup$",
        shape: Shape::Value(Slot::On),
    }
}

fn rule_flow_tag() -> Rule {
    rule! {
        name: "set.flow_tag",
        class: RuleClass::SET,
        pattern: r"^set\sflow-tag\s(?P<flow_tag>\d+)$",
        shape: Shape::Value(Slot::Text("flow_tag")),
    }
}

fn rule_forward_class() -> Rule {
    rule! {
        name: "set.forward_class",
        class: RuleClass::SET,
        pattern: r"^set\sforward-class\s(?P<forward_class>\d+)$",
        shape: Shape::Value(Slot::Text("forward_class")),
    }
}

fn rule_ip_precedence() -> Rule {
    rule! {
        name: "set.ip_precedence",
        class: RuleClass::SET,
        pattern: r"^set\sip-precedence\s(?P<ip_precedence>\d+)$",
        shape: Shape::Value(Slot::Text("ip_precedence")),
    }
}

fn rule_isis_metric() -> Rule {
    rule! {
        name: "set.isis_metric",
        class: RuleClass::SET,
        pattern: r"^set\sisis-metric\s(?P<isis_metric>\d+)$",
        shape: Shape::Value(Slot::Text("isis_metric")),
    }
}

fn rule_label() -> Rule {
    rule! {
        name: "set.label",
        class: RuleClass::SET,
        pattern: r"^set\slabel\s(?P<label>\d+)$",
        shape: Shape::Value(Slot::Text("label")),
    }
}

fn rule_label_index() -> Rule {
    rule! {
        name: "set.label_index",
        class: RuleClass::SET,
        pattern: r"^set\slabel-index\s(?P<label_index>\d+)$",
        shape: Shape::Value(Slot::Text("label_index")),
    }
}

fn rule_label_mode() -> Rule {
    rule! {
        name: "set.label_mode",
        class: RuleClass::SET,
        pattern: r"^set\slabel-mode(?:\s(?P<per_ce>per-ce))?(?:\s(?P<per_prefix>per-prefix))?(?:\s(?P<per_vrf>per-vrf))?$",
        shape: flags(&["per_ce", "per_prefix", "per_vrf"]),
    }
}

fn rule_large_community() -> Rule {
    rule! {
        name: "set.large_community",
        class: RuleClass::SET,
        pattern: r"^set\slarge-community\s(?P<large_community>.+)$",
        shape: Shape::Value(Slot::Text("large_community")),
    }
}

fn rule_level() -> Rule {
    rule! {
        name: "set.level",
        class: RuleClass::SET,
        pattern: r"^set\slevel(?:\s(?P<level_1>level-1))?(?:\s(?P<level_1_2>level-1-2))?(?:\s(?P<level_2>level-2))?$",
        shape: flags(&["level_1", "level_1_2", "level_2"]),
    }
}

fn rule_load_balance() -> Rule {
    rule! {
        name: "set.load_balance",
        class: RuleClass::SET,
        pattern: r"^set\sload-balance\secmp-consistent$",
        shape: Shape::Value(Slot::On),
    }
}

fn rule_lsm_root() -> Rule {
    rule! {
        name: "set.lsm_root",
        class: RuleClass::SET,
        pattern: r"^set\slsm-root\s(?P<lsm_root>\S+)$",
        shape: Shape::Value(Slot::Text("lsm_root")),
    }
}

fn rule_metric_type() -> Rule {
    rule! {
        name: "set.metric_type",
        class: RuleClass::SET,
        pattern: r"^set\smetric-type(?:\s(?P<external>external))?(?:\s(?P<internal>internal))?(?:\s(?P<rib_metric_as_external>rib-metric-as-external))?(?:\s(?P<rib_metric_as_internal>rib-metric-as-internal))?(?:\s(?P<type_1>type-1))?(?:\s(?P<type_2>type-2))?$",
        shape: flags(&["external", "internal", "rib_metric_as_external", "rib_metric_as_internal", "type_1", "type_2"]),
    }
}

fn rule_mpls() -> Rule {
    rule! {
        name: "set.mpls",
        class: RuleClass::SET,
        pattern: r"^set\smpls\straffic-eng\sattributeset\s(?P<mpls>\S+)$",
        shape: Shape::Value(Slot::Text("mpls")),
    }
}

fn rule_next_hop() -> Rule {
    rule! {
        name: "set.next_hop",
        class: RuleClass::SET,
        pattern: r"^set\snext-hop\s(?P<address>\S+)$",
        shape: texts(&["address"]),
    }
}

/// `set origin egp|igp|incomplete`; `incomplete` lands in `rincomplete`.
fn rule_origin() -> Rule {
    rule! {
        name: "set.origin",
        class: RuleClass::SET,
        pattern: r"^set\sorigin(?:\s(?P<egp>egp))?(?:\s(?P<igp>igp))?(?:\s(?P<rincomplete>incomplete))?$",
        shape: flags(&["egp", "igp", "rincomplete"]),
    }
}

fn rule_ospf_metric() -> Rule {
    rule! {
        name: "set.ospf_metric",
        class: RuleClass::SET,
        pattern: r"^set\sospf-metric\s(?P<ospf_metric>\d+)$",
        shape: Shape::Value(Slot::Text("ospf_metric")),
    }
}

fn rule_path_color() -> Rule {
    rule! {
        name: "set.path_color",
        class: RuleClass::SET,
        pattern: r"^set\spath-color\sexternal-reach$",
        shape: Shape::Value(Slot::On),
    }
}

fn rule_qos_group() -> Rule {
    rule! {
        name: "set.qos_group",
        class: RuleClass::SET,
        pattern: r"^set\sqos-group\s(?P<qos_group>\d+)$",
        shape: Shape::Value(Slot::Text("qos_group")),
    }
}

fn rule_rib_metric() -> Rule {
    rule! {
        name: "set.rib_metric",
        class: RuleClass::SET,
        pattern: r"^set\srib-metric\s(?P<rib_metric>\d+)$",
        shape: Shape::Value(Slot::Text("rib_metric")),
    }
}

fn rule_rip_metric() -> Rule {
    rule! {
        name: "set.rip_metric",
        class: RuleClass::SET,
        pattern: r"^set\srip-metric\s(?P<rip_metric>\d+)$",
        shape: Shape::Value(Slot::Text("rip_metric")),
    }
}

fn rule_rip_tag() -> Rule {
    rule! {
        name: "set.rip_tag",
        class: RuleClass::SET,
        pattern: r"^set\srip-tag\s(?P<rip_tag>\d+)$",
        shape: Shape::Value(Slot::Text("rip_tag")),
    }
}

fn rule_rt_set() -> Rule {
    rule! {
        name: "set.rt_set",
        class: RuleClass::SET,
        pattern: r"^set\srt-set\s(?P<rt_set>\d+)$",
        shape: Shape::Value(Slot::Text("rt_set")),
    }
}

/// `set s-pmsi star-g`; `start-g` is accepted too.
fn rule_s_pmsi() -> Rule {
    rule! {
        name: "set.s_pmsi",
        class: RuleClass::SET,
        pattern: r"^set\ss-pmsi\sstart?-g$",
        shape: Shape::Value(Slot::On),
    }
}

fn rule_spf_priority() -> Rule {
    rule! {
        name: "set.spf_priority",
        class: RuleClass::SET,
        pattern: r"^set\sspf-priority(?:\s(?P<critical>critical))?(?:\s(?P<high>high))?(?:\s(?P<medium>medium))?$",
        shape: flags(&["critical", "high", "medium"]),
    }
}

fn rule_static_p2mp_te() -> Rule {
    rule! {
        name: "set.static_p2mp_te",
        class: RuleClass::SET,
        pattern: r"^set\sstatic-p2mp-te\s(?P<static_p2mp_te>\S+)$",
        shape: Shape::Value(Slot::Text("static_p2mp_te")),
    }
}

fn rule_tag() -> Rule {
    rule! {
        name: "set.tag",
        class: RuleClass::SET,
        pattern: r"^set\stag\s(?P<tag>\d+)$",
        shape: Shape::Value(Slot::Text("tag")),
    }
}

fn rule_traffic_index() -> Rule {
    rule! {
        name: "set.traffic_index",
        class: RuleClass::SET,
        pattern: r"^set\straffic-index(?:\s(?P<index_number>\d+))?(?:\s(?P<ignore>ignore))?$",
        shape: Shape::Map(vec![Field::text("index_number"), Field::flag("ignore")]),
    }
}

fn rule_upstream_core_tree() -> Rule {
    rule! {
        name: "set.upstream_core_tree",
        class: RuleClass::SET,
        pattern: r"^set\supstream-core-tree(?:\s(?P<ingress_replication>ingress-replication))?(?:\s(?P<mldp>mldp))?(?:\s(?P<p2mp_te>p2mp-te))?(?:\s(?P<sr_p2mp>sr-p2mp))?$",
        shape: flags(&["ingress_replication", "mldp", "p2mp_te", "sr_p2mp"]),
    }
}

fn rule_vpn_distinguisher() -> Rule {
    rule! {
        name: "set.vpn_distinguisher",
        class: RuleClass::SET,
        pattern: r"^set\svpn-distinguisher\s(?P<vpn_distinguisher>\d+)$",
        shape: Shape::Value(Slot::Text("vpn_distinguisher")),
    }
}

fn rule_weight() -> Rule {
    rule! {
        name: "set.weight",
        class: RuleClass::SET,
        pattern: r"^set\sweight\s(?P<weight>\d+)$",
        shape: Shape::Value(Slot::Text("weight")),
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_administrative_distance(),
        rule_aigp_metric(),
        rule_attribute_set(),
        rule_c_multicast_routing(),
        rule_community(),
        rule_core_tree(),
        rule_dampening(),
        rule_downstream_core_tree(),
        rule_eigrp_metric(),
        rule_fallback_vrf_lookup(),
        rule_flow_tag(),
        rule_forward_class(),
        rule_ip_precedence(),
        rule_isis_metric(),
        rule_label(),
        rule_label_index(),
        rule_label_mode(),
        rule_large_community(),
        rule_level(),
        rule_load_balance(),
        rule_lsm_root(),
        rule_metric_type(),
        rule_mpls(),
        rule_next_hop(),
        rule_origin(),
        rule_ospf_metric(),
        rule_path_color(),
        rule_qos_group(),
        rule_rib_metric(),
        rule_rip_metric(),
        rule_rip_tag(),
        rule_rt_set(),
        rule_s_pmsi(),
        rule_spf_priority(),
        rule_static_p2mp_te(),
        rule_tag(),
        rule_traffic_index(),
        rule_upstream_core_tree(),
        rule_vpn_distinguisher(),
        rule_weight(),
    ]
}
