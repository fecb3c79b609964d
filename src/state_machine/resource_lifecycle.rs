// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Lifecycle State Machine
//!
//! Formal FSM for a resource's journey through a provisioning run.
//!
//! # States
//!
//! - Pending: declared, not yet handed to the engine
//! - Creating: create call in flight
//! - Ready: engine reports the resource converged
//! - Failed: create call failed (terminal for the run; triggers rollback)
//! - Destroying: delete call in flight
//! - Destroyed: torn down (terminal)
//!
//! # Inputs
//!
//! - BeginCreate: Pending → Creating
//! - MarkReady: Creating → Ready
//! - FailCreate: Creating → Failed
//! - BeginDestroy: Ready → Destroying (rollback or teardown)
//! - MarkDestroyed: Destroying → Destroyed
//! - Refresh: stay in current state (idempotent)

use serde::{Deserialize, Serialize};

use super::{StateMachine, TransitionError, TransitionResult};

/// Lifecycle state of a resource within a provisioning run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    Pending,
    Creating,
    Ready,
    Failed,
    Destroying,
    Destroyed,
}

impl ResourceState {
    /// Check whether the state is terminal for the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResourceState::Failed | ResourceState::Destroyed)
    }
}

/// Lifecycle command (FSM input)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCommand {
    /// Hand the resource to the engine
    BeginCreate,

    /// Engine reported the resource converged
    MarkReady,

    /// Engine reported the create failed
    FailCreate,

    /// Start teardown of a ready resource
    BeginDestroy,

    /// Engine reported the delete completed
    MarkDestroyed,

    /// Stay in current state (idempotent)
    Refresh,
}

impl StateMachine for ResourceState {
    type Input = LifecycleCommand;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use LifecycleCommand::*;
        use ResourceState::*;

        match (self, input) {
            (Pending, BeginCreate) => Ok((Creating, ())),

            (Creating, MarkReady) => Ok((Ready, ())),
            (Creating, FailCreate) => Ok((Failed, ())),

            (Ready, BeginDestroy) => Ok((Destroying, ())),

            (Destroying, MarkDestroyed) => Ok((Destroyed, ())),

            (state, Refresh) => Ok((*state, ())),

            (Ready, BeginCreate) => Err(TransitionError::BusinessRuleViolation(
                "Resource is already created".to_string(),
            )),
            (Destroyed, _) => Err(TransitionError::InvalidTransition {
                from: "Destroyed".to_string(),
                to: "any state".to_string(),
            }),
            (from, input) => Err(TransitionError::InvalidTransition {
                from: format!("{:?}", from),
                to: format!("via {:?}", input),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        use LifecycleCommand::*;
        use ResourceState::*;

        match self {
            Pending => vec![BeginCreate, Refresh],
            Creating => vec![MarkReady, FailCreate, Refresh],
            Ready => vec![BeginDestroy, Refresh],
            Failed => vec![Refresh],
            Destroying => vec![MarkDestroyed, Refresh],
            Destroyed => vec![Refresh],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_path() {
        let (state, _) = ResourceState::Pending
            .transition(&LifecycleCommand::BeginCreate)
            .unwrap();
        assert_eq!(state, ResourceState::Creating);

        let (state, _) = state.transition(&LifecycleCommand::MarkReady).unwrap();
        assert_eq!(state, ResourceState::Ready);
    }

    #[test]
    fn test_failed_create() {
        let (state, _) = ResourceState::Creating
            .transition(&LifecycleCommand::FailCreate)
            .unwrap();
        assert_eq!(state, ResourceState::Failed);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_destroy_path() {
        let (state, _) = ResourceState::Ready
            .transition(&LifecycleCommand::BeginDestroy)
            .unwrap();
        assert_eq!(state, ResourceState::Destroying);

        let (state, _) = state.transition(&LifecycleCommand::MarkDestroyed).unwrap();
        assert_eq!(state, ResourceState::Destroyed);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_destroyed_is_terminal() {
        let result = ResourceState::Destroyed.transition(&LifecycleCommand::BeginCreate);
        assert!(result.is_err());
    }

    #[test]
    fn test_cannot_create_twice() {
        let result = ResourceState::Ready.transition(&LifecycleCommand::BeginCreate);
        assert!(matches!(
            result.unwrap_err(),
            TransitionError::BusinessRuleViolation(_)
        ));
    }

    #[test]
    fn test_cannot_destroy_pending() {
        let result = ResourceState::Pending.transition(&LifecycleCommand::BeginDestroy);
        assert!(matches!(
            result.unwrap_err(),
            TransitionError::InvalidTransition { .. }
        ));
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let states = [
            ResourceState::Pending,
            ResourceState::Creating,
            ResourceState::Ready,
            ResourceState::Failed,
            ResourceState::Destroying,
        ];

        for state in states {
            let (next, _) = state.transition(&LifecycleCommand::Refresh).unwrap();
            assert_eq!(next, state);
        }
    }

    #[test]
    fn test_valid_inputs() {
        let inputs = ResourceState::Creating.valid_inputs();
        assert_eq!(inputs.len(), 3);

        let inputs = ResourceState::Failed.valid_inputs();
        assert_eq!(inputs, vec![LifecycleCommand::Refresh]);
    }
}
