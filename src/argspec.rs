//! The declared shape of `route_maps` facts.
//!
//! Field names follow the published resource model, spelling included
//! (`effective_bandwith`, `icrement`, `rincomplete`).

use crate::schema::Schema::{self, Bool, Int, Str};
use once_cell::sync::Lazy;

const COMPARE: &[&str] = &["eq", "ge", "is", "le"];
const COMMUNITY_MATCH: &[&str] = &["is-empty", "matches-any", "matches-every", "matches-within"];
const COMBINE: &[&str] = &["and", "or"];

/// A nested `else`: `global`, `if`, `elif` and a further `else`.
pub(crate) static SCOPE: Lazy<Schema> = Lazy::new(|| Schema::dict(scope_fields()));

/// The `config` list: one entry per policy.
pub(crate) static CONFIG: Lazy<Schema> = Lazy::new(|| {
    let mut fields = vec![("name", Str)];
    fields.extend(scope_fields());
    Schema::list_of(Schema::dict(fields))
});

fn scope_fields() -> Vec<(&'static str, Schema)> {
    vec![
        ("global", Schema::dict(actions())),
        ("if", block()),
        ("elif", Schema::list_of(block())),
        ("else", Schema::Scope),
    ]
}

/// An `if` / `elseif` block: its condition clauses and its actions.
fn block() -> Schema {
    let mut fields = vec![("conditions", Schema::list_of(conditions()))];
    fields.extend(actions());
    Schema::dict(fields)
}

fn combined(mut fields: Vec<(&'static str, Schema)>) -> Schema {
    fields.push(("combine_condition", Schema::Choice(COMBINE)));
    Schema::dict(fields)
}

fn compare() -> Schema {
    combined(vec![("match", Schema::Choice(COMPARE)), ("input_number", Int)])
}

fn input_name() -> Schema {
    combined(vec![("input_name", Str)])
}

fn community_match() -> Schema {
    combined(vec![("match", Schema::Choice(COMMUNITY_MATCH)), ("community_name", Str)])
}

fn predicate() -> Schema {
    combined(vec![("set", Bool)])
}

fn choice(choices: &'static [&'static str]) -> Schema {
    combined(vec![("input_choice", Schema::Choice(choices))])
}

fn conditions() -> Schema {
    Schema::dict(vec![
        ("aigp_metric", compare()),
        ("as_path", input_name()),
        ("community", combined(vec![("match", Schema::Choice(COMMUNITY_MATCH)), ("input_name", Str)])),
        ("community_length", compare()),
        (
            "destination",
            combined(vec![
                (
                    "match",
                    Schema::Choice(&[
                        "in",
                        "is-backup-path",
                        "is-best-external",
                        "is-best-path",
                        "is-multi-path",
                        "longer-than",
                        "or-longer",
                    ]),
                ),
                ("destination_name", Str),
            ]),
        ),
        ("destination_prefix", input_name()),
        ("esi", input_name()),
        ("etag", input_name()),
        ("evpn_gateway", input_name()),
        ("evpn_originator", input_name()),
        ("evpn_route_type", combined(vec![("input_number", Int)])),
        ("extcommunity_color", community_match()),
        ("extcommunity_rt", community_match()),
        ("extcommunity_seg_nh", community_match()),
        ("extcommunity_soo", community_match()),
        ("i_pmsi_present", predicate()),
        ("large_community", community_match()),
        ("local_preference", compare()),
        ("mac", input_name()),
        ("med", compare()),
        ("next_hop", input_name()),
        ("orf_prefix", input_name()),
        ("origin", choice(&["ebgp", "ibgp", "incomplete"])),
        ("path_type", choice(&["ebgp", "ibgp"])),
        ("protocol", choice(&["bgp", "connected", "eigrp", "isis", "ospf", "ospfv3", "rip", "static"])),
        ("rd", input_name()),
        ("rib_has_route", input_name()),
        ("rib_metric", compare()),
        ("route_aggregated", predicate()),
        ("route_has_label", predicate()),
        ("route_has_vrf_ri", predicate()),
        (
            "route_type",
            choice(&[
                "interarea",
                "internal",
                "level-1",
                "level-1-2",
                "level-2",
                "local",
                "ospf-external-type-1",
                "ospf-external-type-2",
                "ospf-inter-area",
                "ospf-intra-area",
                "ospf-nssa-type-1",
                "ospf-nssa-type-2",
                "type-1",
                "type-2",
            ]),
        ),
        ("source", input_name()),
        ("source_prefix", input_name()),
        ("tag", combined(vec![("match", Schema::Choice(&["eq", "ge", "in", "is", "le"])), ("input_number", Int)])),
        ("validation_state", choice(&["invalid", "not-found", "valid"])),
        ("vpn_distinguisher", combined(vec![("input_number", Int)])),
    ])
}

fn eigrp_metric() -> Schema {
    Schema::dict(vec![
        ("bandwidth", Int),
        ("delay", Int),
        ("reliability", Int),
        ("effective_bandwith", Int),
        ("max_transmission", Int),
    ])
}

fn flags(keys: &[&'static str]) -> Schema {
    Schema::dict(keys.iter().map(|&k| (k, Bool)).collect())
}

fn actions() -> Vec<(&'static str, Schema)> {
    vec![
        ("add", Schema::dict(vec![("eigrp_metric", eigrp_metric()), ("rip_metric", Int)])),
        ("apply", Schema::list_of(Schema::dict(vec![("route_policy", Str), ("route_policy_input", Str)]))),
        ("drop", Bool),
        ("pass", Bool),
        (
            "prepend",
            Schema::dict(vec![("number_of_times", Int), ("as_path", Int), ("most_recent", Bool), ("own_as", Bool)]),
        ),
        ("suppress_route", Bool),
        ("unsuppress_route", Bool),
        ("remove", flags(&["set", "entire_aspath"])),
        ("set", set()),
    ]
}

fn set() -> Schema {
    let tree = || flags(&["ingress_replication", "mldp", "p2mp_te", "sr_p2mp"]);

    Schema::dict(vec![
        ("administrative_distance", Int),
        (
            "aigp_metric",
            Schema::dict(vec![("icrement", Bool), ("decrement", Bool), ("metric_number", Int), ("igp_cost", Bool)]),
        ),
        ("attribute_set", Str),
        ("c_multicast_routing", flags(&["bgp", "pim"])),
        ("community", Schema::dict(vec![("community_name", Str), ("additive", Bool)])),
        (
            "core_tree",
            flags(&[
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
        ),
        (
            "dampening",
            Schema::dict(vec![("halflife", Int), ("max_suppress", Int), ("reuse", Int), ("suppress", Int)]),
        ),
        ("downstream_core_tree", tree()),
        ("eigrp_metric", eigrp_metric()),
        ("fallback_vrf_lookup", Bool),
        ("flow_tag", Int),
        ("forward_class", Int),
        ("ip_precedence", Int),
        ("isis_metric", Int),
        ("label", Int),
        ("label_index", Int),
        ("label_mode", flags(&["per_ce", "per_prefix", "per_vrf"])),
        ("large_community", Str),
        ("level", flags(&["level_1", "level_1_2", "level_2"])),
        ("load_balance", Bool),
        ("lsm_root", Str),
        (
            "metric_type",
            flags(&["external", "internal", "rib_metric_as_external", "rib_metric_as_internal", "type_1", "type_2"]),
        ),
        ("mpls", Str),
        ("next_hop", Schema::dict(vec![("address", Str)])),
        ("origin", flags(&["egp", "igp", "rincomplete"])),
        ("ospf_metric", Int),
        ("path_color", Bool),
        ("qos_group", Int),
        ("rib_metric", Int),
        ("rip_metric", Int),
        ("rip_tag", Int),
        ("rt_set", Int),
        ("s_pmsi", Bool),
        ("spf_priority", flags(&["critical", "high", "medium"])),
        ("static_p2mp_te", Str),
        ("tag", Int),
        ("traffic_index", Schema::dict(vec![("index_number", Int), ("ignore", Bool)])),
        ("upstream_core_tree", tree()),
        ("vpn_distinguisher", Int),
        ("weight", Int),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use serde_json::json;

    #[test]
    fn full_document_validates_and_coerces() {
        let mut config = json!([{
            "name": "EDGE",
            "global": {"apply": [{"route_policy": "CHILD"}], "set": {"weight": "100"}},
            "if": {
                "conditions": [{"med": {"match": "eq", "input_number": "10", "combine_condition": "and"}}],
                "prepend": {"as_path": "65000", "number_of_times": "3", "most_recent": false, "own_as": false}
            },
            "elif": [{"conditions": [{"origin": {"input_choice": "ibgp"}}], "drop": true}],
            "else": {"global": {"pass": true}, "else": {"global": {"set": {"tag": "5"}}}}
        }]);

        CONFIG.validate(&mut config, "config").unwrap();

        assert_eq!(config[0]["global"]["set"]["weight"], json!(100));
        assert_eq!(config[0]["if"]["conditions"][0]["med"]["input_number"], json!(10));
        assert_eq!(config[0]["if"]["prepend"]["number_of_times"], json!(3));
        assert_eq!(config[0]["else"]["else"]["global"]["set"]["tag"], json!(5));
    }

    #[test]
    fn error_path_points_into_conditions() {
        let mut config = json!([{
            "name": "P",
            "if": {"conditions": [{"tag": {"match": "eq", "input_number": "1"}}, {"med": {"match": "ne"}}]}
        }]);
        let err = CONFIG.validate(&mut config, "config").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidChoice {
                path: "config[0].if.conditions[1].med.match".into(),
                value: "ne".into(),
                choices: COMPARE,
            }
        );
    }

    #[test]
    fn conditions_are_not_allowed_in_global() {
        let mut config = json!([{"name": "P", "global": {"conditions": []}}]);
        let err = CONFIG.validate(&mut config, "config").unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedField { path: "config[0].global.conditions".into() });
    }
}
