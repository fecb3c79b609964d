// Copyright (c) 2025 - Cowboy AI, Inc.
//! Apply and Destroy Orchestration
//!
//! [`apply`] walks the stack's creation order and drives each resource
//! through the provisioning lifecycle FSM against a [`Provisioner`]. A
//! create failure is a hard stop: resources already created in the run are
//! rolled back in reverse order, and the report carries the error. [`destroy`]
//! tears a previously applied run down in reverse creation order.
//!
//! Each run keeps an append-only event log; events share the run's
//! correlation id so a whole run can be traced as one unit. No concurrency
//! is authored here — creation is sequential in dependency order, and any
//! parallelism belongs to the engine behind the trait.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{AppliedResource, Provisioner};
use crate::errors::{StackError, StackResult};
use crate::resources::ResourceKind;
use crate::stack::Stack;
use crate::state_machine::resource_lifecycle::{LifecycleCommand, ResourceState};
use crate::state_machine::StateMachine;

/// What happened to a resource (or the run) at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ApplyEventKind {
    /// Create call handed to the engine
    ResourceCreating { kind: ResourceKind, name: String },

    /// Engine reported the resource converged
    ResourceReady { kind: ResourceKind, name: String },

    /// Engine reported the create failed
    ResourceFailed {
        kind: ResourceKind,
        name: String,
        reason: String,
    },

    /// Delete call handed to the engine
    ResourceDestroying { kind: ResourceKind, name: String },

    /// Engine reported the delete completed
    ResourceDestroyed { kind: ResourceKind, name: String },

    /// Rollback of already-created resources started
    RollbackStarted { failed_resource: String },

    /// Run finished with every resource ready
    RunCompleted,

    /// Run stopped on a failure
    RunFailed { reason: String },
}

/// One entry in a run's append-only event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyEvent {
    /// Event identity
    pub event_id: Uuid,

    /// Correlation id shared by every event in the run
    pub correlation_id: Uuid,

    /// When the event was recorded
    pub timestamp: DateTime<Utc>,

    /// What happened
    #[serde(flatten)]
    pub kind: ApplyEventKind,
}

/// Outcome of an apply run
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    /// Run identity; doubles as the correlation id of the event log
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Resources standing when the run ended (empty after a rollback)
    pub applied: Vec<AppliedResource>,

    /// Append-only run log
    pub events: Vec<ApplyEvent>,

    /// The failure that stopped the run, if any
    pub error: Option<String>,
}

impl ApplyReport {
    /// Check whether the run converged every resource
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// The applied instance record, if the run created one
    pub fn instance(&self) -> Option<&AppliedResource> {
        self.applied
            .iter()
            .find(|r| r.kind == ResourceKind::Instance)
    }
}

/// Outcome of a destroy run
#[derive(Debug, Clone, Serialize)]
pub struct DestroyReport {
    /// Run identity
    pub run_id: Uuid,

    /// Resources torn down, in teardown order
    pub destroyed: Vec<AppliedResource>,

    /// Run log
    pub events: Vec<ApplyEvent>,

    /// The failure that stopped the run, if any
    pub error: Option<String>,
}

impl DestroyReport {
    /// Check whether every resource was torn down
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

struct RunLog {
    correlation_id: Uuid,
    events: Vec<ApplyEvent>,
}

impl RunLog {
    fn new(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            events: Vec::new(),
        }
    }

    fn record(&mut self, kind: ApplyEventKind) {
        self.events.push(ApplyEvent {
            event_id: Uuid::now_v7(),
            correlation_id: self.correlation_id,
            timestamp: Utc::now(),
            kind,
        });
    }
}

fn step(state: ResourceState, command: &LifecycleCommand) -> StackResult<ResourceState> {
    let (next, ()) = state
        .transition(command)
        .map_err(|e| StackError::Generic(e.to_string()))?;
    Ok(next)
}

/// Apply the stack against a provisioning engine
///
/// Creates resources sequentially in dependency order. On a create failure
/// the run stops, already-created resources are deleted in reverse order,
/// and the returned report carries the error; the caller checks
/// [`ApplyReport::succeeded`].
pub async fn apply<P: Provisioner>(provisioner: &P, stack: &Stack) -> StackResult<ApplyReport> {
    let run_id = Uuid::now_v7();
    let started_at = Utc::now();
    let mut log = RunLog::new(run_id);
    let mut applied: Vec<AppliedResource> = Vec::new();

    info!(%run_id, "Starting apply run");

    let order = stack.creation_order()?;
    let mut run_error: Option<String> = None;

    for resource in order {
        let kind = resource.kind();
        let name = resource.name().clone();

        let mut state = step(ResourceState::Pending, &LifecycleCommand::BeginCreate)?;
        debug!(%kind, %name, "Creating resource");
        log.record(ApplyEventKind::ResourceCreating {
            kind,
            name: name.to_string(),
        });

        match provisioner.create(resource).await {
            Ok(record) => {
                state = step(state, &LifecycleCommand::MarkReady)?;
                info!(%kind, %name, "Resource ready");
                log.record(ApplyEventKind::ResourceReady {
                    kind,
                    name: name.to_string(),
                });
                applied.push(AppliedResource { state, ..record });
            }
            Err(err) => {
                step(state, &LifecycleCommand::FailCreate)?;
                error!(%kind, %name, %err, "Resource create failed");
                log.record(ApplyEventKind::ResourceFailed {
                    kind,
                    name: name.to_string(),
                    reason: err.to_string(),
                });

                rollback(provisioner, &mut applied, &mut log, &name.to_string()).await;
                run_error = Some(err.to_string());
                break;
            }
        }
    }

    match &run_error {
        None => log.record(ApplyEventKind::RunCompleted),
        Some(reason) => log.record(ApplyEventKind::RunFailed {
            reason: reason.clone(),
        }),
    }

    Ok(ApplyReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        applied,
        events: log.events,
        error: run_error,
    })
}

/// Delete already-created resources in reverse order after a failed create
///
/// Best effort: a delete failure is recorded and teardown continues, the
/// engine's default behavior when unwinding a partially created run.
async fn rollback<P: Provisioner>(
    provisioner: &P,
    applied: &mut Vec<AppliedResource>,
    log: &mut RunLog,
    failed_resource: &str,
) {
    info!(failed_resource, "Rolling back partially applied run");
    log.record(ApplyEventKind::RollbackStarted {
        failed_resource: failed_resource.to_string(),
    });

    while let Some(record) = applied.pop() {
        log.record(ApplyEventKind::ResourceDestroying {
            kind: record.kind,
            name: record.name.to_string(),
        });

        match provisioner.delete(&record).await {
            Ok(()) => {
                debug!(name = %record.name, "Rolled back resource");
                log.record(ApplyEventKind::ResourceDestroyed {
                    kind: record.kind,
                    name: record.name.to_string(),
                });
            }
            Err(err) => {
                error!(name = %record.name, %err, "Rollback delete failed");
                log.record(ApplyEventKind::ResourceFailed {
                    kind: record.kind,
                    name: record.name.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Tear down an applied run in reverse creation order
pub async fn destroy<P: Provisioner>(
    provisioner: &P,
    report: &ApplyReport,
) -> StackResult<DestroyReport> {
    let run_id = Uuid::now_v7();
    let mut log = RunLog::new(run_id);
    let mut destroyed = Vec::new();
    let mut run_error: Option<String> = None;

    info!(%run_id, "Starting destroy run");

    for record in report.applied.iter().rev() {
        let mut state = step(record.state, &LifecycleCommand::BeginDestroy)?;
        log.record(ApplyEventKind::ResourceDestroying {
            kind: record.kind,
            name: record.name.to_string(),
        });

        match provisioner.delete(record).await {
            Ok(()) => {
                state = step(state, &LifecycleCommand::MarkDestroyed)?;
                info!(name = %record.name, "Resource destroyed");
                log.record(ApplyEventKind::ResourceDestroyed {
                    kind: record.kind,
                    name: record.name.to_string(),
                });
                destroyed.push(AppliedResource {
                    state,
                    ..record.clone()
                });
            }
            Err(err) => {
                error!(name = %record.name, %err, "Destroy failed");
                log.record(ApplyEventKind::ResourceFailed {
                    kind: record.kind,
                    name: record.name.to_string(),
                    reason: err.to_string(),
                });
                run_error = Some(err.to_string());
                break;
            }
        }
    }

    match &run_error {
        None => log.record(ApplyEventKind::RunCompleted),
        Some(reason) => log.record(ApplyEventKind::RunFailed {
            reason: reason.clone(),
        }),
    }

    Ok(DestroyReport {
        run_id,
        destroyed,
        events: log.events,
        error: run_error,
    })
}
