// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for stack rendering
//!
//! These tests pin the deployment scenario end to end: operator inputs go
//! in, five named resource descriptors come out, and the firewall surface
//! is exactly TCP/22 from the one configured range plus unrestricted
//! egress.

mod fixtures;

use pretty_assertions::assert_eq;
use test_case::test_case;

use crate::fixtures::{demo_config, demo_config_with_ssh_source, demo_config_with_subnet};
use llm_stack::domain::{NetworkTag, REDACTED};
use llm_stack::resources::{Direction, FirewallRule, ResourceKind};
use llm_stack::Stack;

#[test]
fn test_deployment_scenario() {
    let stack = Stack::render(&demo_config()).unwrap();

    let network = stack.network().unwrap();
    assert_eq!(network.name.as_str(), "llm-vpc-network");
    assert!(!network.auto_create_subnetworks);

    let subnet = stack.subnet().unwrap();
    assert_eq!(subnet.name.as_str(), "llm-vpc-network-subnet");
    assert_eq!(subnet.ip_cidr_range.as_notation(), "10.10.0.0/20");
    assert_eq!(subnet.region.as_str(), "asia-southeast1");

    let instance = stack.instance().unwrap();
    assert_eq!(instance.name.as_str(), "tinylama-vm");
    assert_eq!(instance.zone.as_str(), "asia-southeast1-a");

    let ssh_rule = stack.ssh_rule().unwrap();
    assert_eq!(ssh_rule.direction, Direction::Ingress);
    assert!(ssh_rule.admits_tcp_port(22));
    assert_eq!(ssh_rule.source_ranges.len(), 1);
    assert_eq!(ssh_rule.source_ranges[0].as_notation(), "203.0.113.5/32");
}

#[test_case("203.0.113.5/32"; "single host")]
#[test_case("198.51.100.0/24"; "office range")]
#[test_case("10.8.0.0/16"; "vpn range")]
fn test_ssh_source_equals_configured_range(source: &str) {
    let stack = Stack::render(&demo_config_with_ssh_source(source)).unwrap();
    let rule = stack.ssh_rule().unwrap();

    assert_eq!(rule.source_ranges.len(), 1);
    assert_eq!(rule.source_ranges[0].as_notation(), source);
    assert!(!rule.source_ranges[0].is_unrestricted());
}

#[test_case("10.10.0.0/20"; "default subnet")]
#[test_case("192.168.0.0/24"; "alternate subnet")]
fn test_egress_is_unrestricted_regardless_of_inputs(subnet: &str) {
    let stack = Stack::render(&demo_config_with_subnet(subnet)).unwrap();
    let rule = stack.egress_rule().unwrap();

    assert_eq!(rule.direction, Direction::Egress);
    assert_eq!(rule.allowed.len(), 1);
    assert_eq!(rule.allowed[0].protocol, "all");
    assert_eq!(rule.destination_ranges.len(), 1);
    assert!(rule.destination_ranges[0].is_unrestricted());
}

#[test]
fn test_instance_tags_cover_ssh_rule_targets() {
    let stack = Stack::render(&demo_config()).unwrap();
    let instance = stack.instance().unwrap();
    let ssh_rule = stack.ssh_rule().unwrap();

    assert!(instance.has_tag(&NetworkTag::new("llm-instance").unwrap()));
    assert!(instance.has_tag(&NetworkTag::new("ssh").unwrap()));

    for tag in &ssh_rule.target_tags {
        assert!(
            instance.has_tag(tag),
            "rule targets {} which the instance does not carry",
            tag
        );
    }
}

#[test]
fn test_subnet_cidr_change_touches_only_the_subnet() {
    let base = Stack::render(&demo_config()).unwrap();
    let changed = Stack::render(&demo_config_with_subnet("192.168.0.0/24")).unwrap();

    assert_eq!(
        changed.subnet().unwrap().ip_cidr_range.as_notation(),
        "192.168.0.0/24"
    );

    assert_eq!(base.network().unwrap(), changed.network().unwrap());
    assert_eq!(
        base.instance().unwrap().name,
        changed.instance().unwrap().name
    );
    assert_eq!(base.subnet().unwrap().name, changed.subnet().unwrap().name);
    assert_eq!(base.ssh_rule().unwrap(), changed.ssh_rule().unwrap());
    assert_eq!(base.egress_rule().unwrap(), changed.egress_rule().unwrap());
}

#[test]
fn test_creation_order_is_network_first_instance_last() {
    let stack = Stack::render(&demo_config()).unwrap();
    let kinds: Vec<ResourceKind> = stack
        .creation_order()
        .unwrap()
        .iter()
        .map(|r| r.kind())
        .collect();

    assert_eq!(kinds.first(), Some(&ResourceKind::Network));
    assert_eq!(kinds.last(), Some(&ResourceKind::Instance));
    assert_eq!(kinds.len(), 5);
}

#[test]
fn test_instance_boot_payload_is_embedded() {
    let stack = Stack::render(&demo_config()).unwrap();
    let instance = stack.instance().unwrap();

    assert!(!instance.metadata_startup_script.is_empty());
    assert!(instance
        .metadata_startup_script
        .contains("TinyLlama/TinyLlama-1.1B-Chat-v1.0"));
}

#[test]
fn test_ssh_port_constant_matches_rule() {
    let stack = Stack::render(&demo_config()).unwrap();
    let rule = stack.ssh_rule().unwrap();

    assert_eq!(FirewallRule::SSH_PORT, 22);
    assert_eq!(rule.allowed.len(), 1);
    assert_eq!(rule.allowed[0].ports, vec![22]);
}

#[test]
fn test_rendered_config_round_trip_redacts_ssh_source() {
    let stack = Stack::render(&demo_config()).unwrap();
    let json = serde_json::to_string(stack.config()).unwrap();

    assert!(!json.contains("203.0.113.5"));
    assert!(json.contains(REDACTED));
}
