//! Worker lifecycle phases and guarded transitions

use std::fmt;

use serde::Serialize;

use crate::domain::DomainError;

/// Phase of one worker version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerPhase {
    /// Registered, install not yet attempted
    Parsed,
    Installing,
    /// Install succeeded; waiting to take control
    Installed,
    Activating,
    /// In control and serving fetches
    Activated,
    /// Discarded after a failed install or replaced by a newer version
    Redundant,
}

/// Inputs that move a worker between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    InstallStarted,
    InstallSucceeded,
    InstallFailed,
    ActivateStarted,
    ActivateSucceeded,
    ActivateFailed,
    Replaced,
}

impl WorkerPhase {
    /// Apply `event`, returning the next phase or a lifecycle error when the
    /// event is not legal in the current phase.
    pub fn transition(self, event: LifecycleEvent) -> Result<WorkerPhase, DomainError> {
        use LifecycleEvent::*;
        use WorkerPhase::*;

        let next = match (self, event) {
            (Parsed, InstallStarted) => Installing,
            (Installing, InstallSucceeded) => Installed,
            (Installing, InstallFailed) => Redundant,
            (Installed, ActivateStarted) => Activating,
            (Activating, ActivateSucceeded) => Activated,
            (Activating, ActivateFailed) => Installed,
            (Installed | Activated, Replaced) => Redundant,
            (phase, event) => {
                return Err(DomainError::lifecycle(format!(
                    "{:?} is not allowed while {}",
                    event, phase
                )));
            }
        };

        Ok(next)
    }

    /// Whether fetches are intercepted in this phase
    pub fn is_serving(self) -> bool {
        self == WorkerPhase::Activated
    }

    pub fn is_terminal(self) -> bool {
        self == WorkerPhase::Redundant
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        };
        f.write_str(name)
    }
}
