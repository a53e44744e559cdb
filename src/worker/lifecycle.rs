//! Worker Lifecycle
//!
//! States a worker moves through between being loaded and controlling fetches.

use std::fmt;

use serde::Serialize;

/// Lifecycle state of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Loaded, no lifecycle event dispatched yet
    Parsed,
    Installing,
    /// Pre-cache populated, waiting for activation
    Installed,
    Activating,
    /// Controls fetches
    Activated,
    /// Install failed; fetches pass through to the network
    Redundant,
}

impl WorkerState {
    /// Install may start unless another lifecycle step is in flight.
    pub fn can_install(self) -> bool {
        !self.is_transitioning()
    }

    /// Activation needs a completed install. Re-activating is allowed.
    pub fn can_activate(self) -> bool {
        matches!(self, WorkerState::Installed | WorkerState::Activated)
    }

    /// Only an activated worker answers fetches.
    pub fn controls_fetch(self) -> bool {
        self == WorkerState::Activated
    }

    pub fn is_transitioning(self) -> bool {
        matches!(self, WorkerState::Installing | WorkerState::Activating)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
