// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Planner
//!
//! Renders and validates the stack from operator configuration, prints the
//! redaction-safe manifest in creation order, then dry-runs the apply
//! against the in-memory engine and prints the outputs it would surface.
//!
//! Run with: cargo run --bin stack-plan -- config.json
//!
//! Without a config file argument, the required inputs are read from the
//! PROJECT_ID and SSH_SOURCE_IP environment variables.

use anyhow::{Context, Result};
use tracing::info;

use llm_stack::domain::CidrBlock;
use llm_stack::engine::{apply, MemoryProvisioner};
use llm_stack::outputs::StackOutputs;
use llm_stack::{Stack, StackConfig};

/// Load configuration from the file argument or environment variables
fn load_config() -> Result<StackConfig> {
    if let Some(path) = std::env::args().nth(1) {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: StackConfig =
            serde_json::from_str(&raw).context("Failed to parse config file")?;
        config.validate().context("Invalid configuration")?;
        return Ok(config);
    }

    let project_id = std::env::var("PROJECT_ID").context("PROJECT_ID not set")?;
    let ssh_source = std::env::var("SSH_SOURCE_IP").context("SSH_SOURCE_IP not set")?;
    let ssh_source = CidrBlock::new(&ssh_source).context("SSH_SOURCE_IP is not a valid CIDR")?;

    StackConfig::builder(project_id, ssh_source)
        .build()
        .context("Invalid configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = load_config()?;
    info!(project_id = %config.project_id, "Rendering stack");

    let stack = Stack::render(&config).context("Failed to render stack")?;

    let manifest = stack.manifest().context("Failed to order resources")?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);

    info!("Dry-running apply against the in-memory engine");
    let engine = MemoryProvisioner::new();
    let report = apply(&engine, &stack).await.context("Dry-run apply failed")?;

    if let Some(error) = &report.error {
        anyhow::bail!("Dry-run did not converge: {}", error);
    }

    if let Some(outputs) = StackOutputs::project(&report) {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    }

    info!(run_id = %report.run_id, "Plan complete");
    Ok(())
}
