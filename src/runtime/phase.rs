//! Filter lifecycle state machine.

use serde::Serialize;

/// Lifecycle of the applied filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPhase {
    /// Nothing in flight; the view reflects the applied filter.
    #[default]
    Idle,
    /// Draft was just copied into the applied filter.
    Committing,
    /// A remote query for the applied filter is in flight.
    Loading,
    /// The last query failed.
    Error,
}

/// Inputs driving [`FilterPhase`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseInput {
    /// Search action, Enter key, or removal of one applied field.
    Commit,
    /// The applied filter resolved without a fetch.
    ResolvedLocally,
    /// A remote query was issued.
    QueryIssued,
    /// The remote query resolved.
    QuerySucceeded,
    /// The remote query failed.
    QueryFailed,
    /// "Clear all" bypassed the executor.
    Cleared,
}

impl FilterPhase {
    /// Next phase, or `None` when `input` is not valid in this phase.
    pub fn next(self, input: PhaseInput) -> Option<FilterPhase> {
        use FilterPhase::*;
        use PhaseInput::*;

        match (self, input) {
            // A commit while loading supersedes the in-flight query.
            (_, Commit) => Some(Committing),
            (_, Cleared) => Some(Idle),
            (Committing, ResolvedLocally) => Some(Idle),
            (Committing, QueryIssued) => Some(Loading),
            (Loading, QuerySucceeded) => Some(Idle),
            (Loading, QueryFailed) => Some(Error),
            _ => None,
        }
    }

    /// True while a commit has not yet settled.
    pub fn is_busy(self) -> bool {
        matches!(self, FilterPhase::Committing | FilterPhase::Loading)
    }
}
