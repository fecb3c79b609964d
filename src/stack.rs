// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Rendering and Cross-Resource Invariants
//!
//! [`Stack::render`] deterministically derives the five resource descriptors
//! from operator configuration; [`Stack::validate`] checks the invariants
//! that span resources (reference integrity, firewall narrowing, tag
//! targeting); [`Stack::creation_order`] computes the dependency order the
//! engine creates resources in, and [`Stack::destroy_order`] its exact
//! reverse.
//!
//! All validation functions are pure: no I/O, deterministic, typed errors.

use std::collections::{HashMap, VecDeque};

use crate::config::StackConfig;
use crate::domain::{NetworkTag, ResourceName};
use crate::errors::{StackError, StackResult};
use crate::resources::{
    Direction, FirewallRule, Instance, Network, Resource, Subnet,
};
use crate::startup::StartupScript;

/// The rendered stack: operator configuration plus the five resource
/// descriptors derived from it
///
/// Deliberately not serializable as a whole: the SSH rule carries the
/// operator's sensitive source range, so reporting goes through
/// [`Stack::manifest`] which redacts it. A `Stack` value only comes out of
/// [`Stack::render`].
#[derive(Debug, Clone)]
pub struct Stack {
    config: StackConfig,
    resources: Vec<Resource>,
}

impl Stack {
    /// Fixed name of the inference instance
    pub const INSTANCE_NAME: &'static str = "tinylama-vm";

    /// Tags the instance always carries
    pub const INSTANCE_TAGS: [&'static str; 2] = ["llm-instance", "ssh"];

    /// Render the stack from operator configuration
    ///
    /// Naming scheme: the subnet and both firewall rules derive their names
    /// from the network; the instance name is fixed. Rendering validates the
    /// configuration first and the cross-resource invariants last, so an
    /// invalid input never produces a `Stack` value.
    pub fn render(config: &StackConfig) -> StackResult<Self> {
        config.validate()?;

        let network_name = config.network_name.clone();
        let subnet_name = derived_name(&network_name, "subnet")?;

        let network = Network::isolated(network_name.clone());

        let subnet = Subnet::new(
            subnet_name.clone(),
            config.subnet_cidr,
            config.region.clone(),
            network_name.clone(),
        );

        let ssh_rule = FirewallRule::ssh_ingress(
            derived_name(&network_name, "allow-ssh")?,
            network_name.clone(),
            *config.ssh_source_ip.reveal(),
            vec![tag("ssh")?],
        )
        .map_err(|e| StackError::Validation(e.to_string()))?;

        let egress_rule =
            FirewallRule::egress_all(derived_name(&network_name, "allow-egress")?, network_name);

        let instance_name = ResourceName::new(Self::INSTANCE_NAME)
            .map_err(|e| StackError::Validation(e.to_string()))?;
        let mut builder = Instance::builder(instance_name, config.zone.clone(), subnet_name)
            .startup_script(StartupScript::default().render());
        for name in Self::INSTANCE_TAGS {
            builder = builder.tag(tag(name)?);
        }
        let instance = builder.build();

        let stack = Self {
            config: config.clone(),
            resources: vec![
                Resource::Network(network),
                Resource::Subnet(subnet),
                Resource::FirewallRule(ssh_rule),
                Resource::FirewallRule(egress_rule),
                Resource::Instance(instance),
            ],
        };

        stack.validate()?;
        Ok(stack)
    }

    /// The configuration the stack was rendered from
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// All rendered resource descriptors, in declaration order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// The network descriptor
    pub fn network(&self) -> StackResult<&Network> {
        self.resources
            .iter()
            .find_map(|r| match r {
                Resource::Network(n) => Some(n),
                _ => None,
            })
            .ok_or_else(|| StackError::Validation("stack declares no network".to_string()))
    }

    /// The subnet descriptor
    pub fn subnet(&self) -> StackResult<&Subnet> {
        self.resources
            .iter()
            .find_map(|r| match r {
                Resource::Subnet(s) => Some(s),
                _ => None,
            })
            .ok_or_else(|| StackError::Validation("stack declares no subnet".to_string()))
    }

    /// The SSH ingress rule
    pub fn ssh_rule(&self) -> StackResult<&FirewallRule> {
        self.firewall_rule(Direction::Ingress)
    }

    /// The allow-all egress rule
    pub fn egress_rule(&self) -> StackResult<&FirewallRule> {
        self.firewall_rule(Direction::Egress)
    }

    fn firewall_rule(&self, direction: Direction) -> StackResult<&FirewallRule> {
        self.resources
            .iter()
            .find_map(|r| match r {
                Resource::FirewallRule(f) if f.direction == direction => Some(f),
                _ => None,
            })
            .ok_or_else(|| {
                StackError::Validation(format!("stack declares no {:?} firewall rule", direction))
            })
    }

    /// The instance descriptor
    pub fn instance(&self) -> StackResult<&Instance> {
        self.resources
            .iter()
            .find_map(|r| match r {
                Resource::Instance(i) => Some(i),
                _ => None,
            })
            .ok_or_else(|| StackError::Validation("stack declares no instance".to_string()))
    }

    /// Validate the cross-resource invariants
    ///
    /// # Invariants
    /// - the network declares manual subnet allocation
    /// - subnet and firewall rules reference the declared network by name
    /// - the SSH rule's source is exactly the operator-supplied range
    /// - the SSH rule's target tags are a subset of the instance tags
    /// - the instance attaches to the declared subnet and carries the fixed
    ///   tag set
    /// - the egress rule permits all protocols to the unrestricted range
    pub fn validate(&self) -> StackResult<()> {
        let network = self.network()?;
        let subnet = self.subnet()?;
        let ssh_rule = self.ssh_rule()?;
        let egress_rule = self.egress_rule()?;
        let instance = self.instance()?;

        validate_network_isolation(network)?;
        validate_subnet_binding(subnet, network, &self.config)?;
        validate_ssh_rule(ssh_rule, network, instance, &self.config)?;
        validate_egress_rule(egress_rule, network)?;
        validate_instance_attachment(instance, subnet, &self.config)?;

        Ok(())
    }

    /// Resources in the order the engine must create them
    ///
    /// Topological order over the `depends_on` edges; ties resolve to
    /// declaration order so the result is deterministic.
    pub fn creation_order(&self) -> StackResult<Vec<&Resource>> {
        order_by_dependencies(&self.resources)
    }

    /// Resources in teardown order: the exact reverse of creation
    pub fn destroy_order(&self) -> StackResult<Vec<&Resource>> {
        let mut order = self.creation_order()?;
        order.reverse();
        Ok(order)
    }

    /// Redaction-safe manifest of the stack in creation order
    ///
    /// This is the reporting surface: identities and dependency edges only,
    /// never the sensitive source range.
    pub fn manifest(&self) -> StackResult<Vec<ManifestEntry>> {
        Ok(self
            .creation_order()?
            .into_iter()
            .map(|resource| ManifestEntry {
                kind: resource.kind(),
                name: resource.name().clone(),
                depends_on: resource.depends_on(),
            })
            .collect())
    }
}

/// One row of the redaction-safe stack manifest
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ManifestEntry {
    /// Resource kind
    pub kind: crate::resources::ResourceKind,

    /// Resource identity
    pub name: ResourceName,

    /// Resources this one is created after
    pub depends_on: Vec<ResourceName>,
}

fn derived_name(network: &ResourceName, suffix: &str) -> StackResult<ResourceName> {
    network
        .with_suffix(suffix)
        .map_err(|e| StackError::Validation(e.to_string()))
}

fn tag(name: &str) -> StackResult<NetworkTag> {
    NetworkTag::new(name).map_err(|e| StackError::Validation(e.to_string()))
}

/// Validate the network declares manual subnet allocation
fn validate_network_isolation(network: &Network) -> StackResult<()> {
    if network.auto_create_subnetworks {
        return Err(StackError::Validation(format!(
            "network {} must not auto-create subnetworks",
            network.name
        )));
    }
    Ok(())
}

/// Validate the subnet binds to the declared network, region, and range
fn validate_subnet_binding(
    subnet: &Subnet,
    network: &Network,
    config: &StackConfig,
) -> StackResult<()> {
    if subnet.network != network.name {
        return Err(StackError::Validation(format!(
            "subnet {} references network {}, expected {}",
            subnet.name, subnet.network, network.name
        )));
    }

    if subnet.region != config.region {
        return Err(StackError::Validation(format!(
            "subnet {} is in region {}, expected {}",
            subnet.name, subnet.region, config.region
        )));
    }

    if subnet.ip_cidr_range != config.subnet_cidr {
        return Err(StackError::Validation(format!(
            "subnet {} range {} does not match configured range",
            subnet.name, subnet.ip_cidr_range
        )));
    }

    Ok(())
}

/// Validate the SSH ingress rule's narrowing and targeting invariants
fn validate_ssh_rule(
    rule: &FirewallRule,
    network: &Network,
    instance: &Instance,
    config: &StackConfig,
) -> StackResult<()> {
    if rule.network != network.name {
        return Err(StackError::Validation(format!(
            "firewall rule {} references network {}, expected {}",
            rule.name, rule.network, network.name
        )));
    }

    if !rule.admits_tcp_port(FirewallRule::SSH_PORT) {
        return Err(StackError::Validation(format!(
            "rule {} does not admit TCP/{}",
            rule.name,
            FirewallRule::SSH_PORT
        )));
    }

    // Exactly the one operator-supplied range, never widened.
    if rule.source_ranges != vec![*config.ssh_source_ip.reveal()] {
        return Err(StackError::Validation(format!(
            "rule {} source ranges do not equal the configured SSH source",
            rule.name
        )));
    }

    for tag in &rule.target_tags {
        if !instance.has_tag(tag) {
            return Err(StackError::Validation(format!(
                "rule {} targets tag {} which instance {} does not carry",
                rule.name, tag, instance.name
            )));
        }
    }

    Ok(())
}

/// Validate the egress rule permits everything
fn validate_egress_rule(rule: &FirewallRule, network: &Network) -> StackResult<()> {
    if rule.network != network.name {
        return Err(StackError::Validation(format!(
            "firewall rule {} references network {}, expected {}",
            rule.name, rule.network, network.name
        )));
    }

    let unrestricted = rule
        .destination_ranges
        .iter()
        .any(|range| range.is_unrestricted());
    if !unrestricted {
        return Err(StackError::Validation(format!(
            "egress rule {} must permit the unrestricted range",
            rule.name
        )));
    }

    Ok(())
}

/// Validate the instance attaches to the subnet and carries the fixed tags
fn validate_instance_attachment(
    instance: &Instance,
    subnet: &Subnet,
    config: &StackConfig,
) -> StackResult<()> {
    if instance.network_interface.subnetwork != subnet.name {
        return Err(StackError::Validation(format!(
            "instance {} attaches to {}, expected {}",
            instance.name, instance.network_interface.subnetwork, subnet.name
        )));
    }

    if instance.zone != config.zone {
        return Err(StackError::Validation(format!(
            "instance {} is in zone {}, expected {}",
            instance.name, instance.zone, config.zone
        )));
    }

    for tag in Stack::INSTANCE_TAGS {
        let tag = NetworkTag::new(tag).map_err(|e| StackError::Validation(e.to_string()))?;
        if !instance.has_tag(&tag) {
            return Err(StackError::Validation(format!(
                "instance {} is missing required tag {}",
                instance.name, tag
            )));
        }
    }

    if instance.metadata_startup_script.is_empty() {
        return Err(StackError::Validation(format!(
            "instance {} has no startup script",
            instance.name
        )));
    }

    Ok(())
}

/// Topological order over dependency edges (Kahn's algorithm)
///
/// Ties resolve to declaration order. A reference to an undeclared resource
/// or a cycle is an error.
pub(crate) fn order_by_dependencies(resources: &[Resource]) -> StackResult<Vec<&Resource>> {
    let index_by_name: HashMap<&ResourceName, usize> = resources
        .iter()
        .enumerate()
        .map(|(i, r)| (r.name(), i))
        .collect();

    let mut in_degree = vec![0usize; resources.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); resources.len()];

    for (i, resource) in resources.iter().enumerate() {
        for dep in resource.depends_on() {
            let dep_index = *index_by_name.get(&dep).ok_or_else(|| {
                StackError::Validation(format!(
                    "{} references undeclared resource {}",
                    resource.name(),
                    dep
                ))
            })?;
            in_degree[i] += 1;
            dependents[dep_index].push(i);
        }
    }

    let mut ready: VecDeque<usize> = (0..resources.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(resources.len());

    while let Some(i) = ready.pop_front() {
        order.push(&resources[i]);
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push_back(dependent);
            }
        }
    }

    if order.len() != resources.len() {
        let stuck = resources
            .iter()
            .enumerate()
            .find(|(i, _)| in_degree[*i] > 0)
            .map(|(_, r)| r.name().to_string())
            .unwrap_or_default();
        return Err(StackError::DependencyCycle(stuck));
    }

    Ok(order)
}
