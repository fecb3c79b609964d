// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for llm-stack
//!
//! Deterministic test data shared by the integration suites. Fixtures are
//! the only place that constructs operator configurations, so every suite
//! exercises the same inputs as the deployment scenario.

use llm_stack::domain::CidrBlock;
use llm_stack::StackConfig;

/// Project identifier used by the deployment scenario
pub const DEMO_PROJECT: &str = "demo";

/// Operator SSH source range used by the deployment scenario
pub const DEMO_SSH_SOURCE: &str = "203.0.113.5/32";

/// Parse a CIDR constant
pub fn cidr(notation: &str) -> CidrBlock {
    CidrBlock::new(notation).expect("invalid CIDR in test fixture")
}

/// The scenario configuration: required inputs set, everything else default
pub fn demo_config() -> StackConfig {
    StackConfig::builder(DEMO_PROJECT, cidr(DEMO_SSH_SOURCE))
        .build()
        .expect("demo configuration is valid")
}

/// Scenario configuration with a different subnet range
pub fn demo_config_with_subnet(notation: &str) -> StackConfig {
    StackConfig::builder(DEMO_PROJECT, cidr(DEMO_SSH_SOURCE))
        .subnet_cidr(cidr(notation))
        .build()
        .expect("demo configuration is valid")
}

/// Scenario configuration with a different SSH source range
pub fn demo_config_with_ssh_source(notation: &str) -> StackConfig {
    StackConfig::builder(DEMO_PROJECT, cidr(notation))
        .build()
        .expect("demo configuration is valid")
}
