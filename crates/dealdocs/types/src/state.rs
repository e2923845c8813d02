//! Derived per-document workflow state
//!
//! Nothing in this module is ever stored. Every value is recomputed from
//! (requirements, assignments, history) on demand, so two reads of the
//! same snapshot cannot disagree.

use crate::{ActionType, Assignee};
use serde::{Deserialize, Serialize};

// ── Workflow Step ────────────────────────────────────────────────────

/// One slot in a document's derived step sequence
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// The action this step requires
    pub action: ActionType,
    /// Who is expected to perform it
    pub assignee: Assignee,
    /// Whether the history already satisfies this step
    pub satisfied: bool,
}

impl WorkflowStep {
    /// An unsatisfied step awaiting its action
    pub fn pending(action: ActionType, assignee: Assignee) -> Self {
        Self {
            action,
            assignee,
            satisfied: false,
        }
    }
}

// ── Document State ───────────────────────────────────────────────────

/// A document's derived workflow position: the single next required
/// action, who must take it, and whether the document is done
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentState {
    /// The next required action; [`ActionType::Complete`] when done
    pub next_action: ActionType,
    /// Who must take it; [`Assignee::system`] when done
    pub next_assignee: Assignee,
    /// Whether every required step is satisfied
    pub is_complete: bool,
}

impl DocumentState {
    /// The terminal state of a finished document
    pub fn complete() -> Self {
        Self {
            next_action: ActionType::Complete,
            next_assignee: Assignee::system(),
            is_complete: true,
        }
    }

    /// A pending state waiting at the given step
    pub fn pending(next_action: ActionType, next_assignee: Assignee) -> Self {
        Self {
            next_action,
            next_assignee,
            is_complete: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_complete_state_points_at_system() {
        let state = DocumentState::complete();
        assert!(state.is_complete);
        assert_eq!(state.next_action, ActionType::Complete);
        assert_eq!(state.next_assignee.role, Role::System);
    }

    #[test]
    fn test_pending_state_is_incomplete() {
        let state = DocumentState::pending(ActionType::Approve, Assignee::role_only(Role::Broker));
        assert!(!state.is_complete);
        assert_eq!(state.next_action, ActionType::Approve);
        assert_eq!(state.next_assignee.role, Role::Broker);
    }
}
