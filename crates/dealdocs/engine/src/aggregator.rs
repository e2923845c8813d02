//! Group aggregation: completion progress across a document group
//!
//! Groups are named by their member documents; nothing declares them.
//! Aggregation is pure and idempotent over a snapshot, so re-running it
//! is always safe and always yields the same value.

use crate::ActionStateMachine;
use dealdocs_types::{Document, DocumentGroup, GroupId, GroupStatus, GroupStep};

/// Aggregates group progress from a document snapshot. Stateless.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupAggregator {
    state_machine: ActionStateMachine,
}

impl GroupAggregator {
    pub fn new() -> Self {
        Self {
            state_machine: ActionStateMachine::new(),
        }
    }

    /// Aggregate progress for `group` over the given snapshot.
    ///
    /// Tombstoned documents and members of other groups contribute
    /// nothing. A group with no live members aggregates to the empty
    /// value rather than an error.
    pub fn aggregate(&self, documents: &[Document], group: &GroupId) -> DocumentGroup {
        let members: Vec<&Document> = documents
            .iter()
            .filter(|d| &d.group == group && !d.is_removed())
            .collect();

        if members.is_empty() {
            return DocumentGroup::empty(group.clone());
        }

        let mut steps: Vec<GroupStep> = Vec::new();
        let mut current_step_index: Option<usize> = None;
        let mut complete_count = 0;
        let mut any_history = false;

        for document in &members {
            let document_steps = self.state_machine.steps(document);
            let document_complete = document_steps.iter().all(|s| s.satisfied);

            if document_complete {
                complete_count += 1;
            }
            if !document.history.is_empty() {
                any_history = true;
            }
            if !document_complete && current_step_index.is_none() {
                current_step_index = Some(steps.len());
            }

            for step in document_steps {
                steps.push(GroupStep {
                    document_id: document.id.clone(),
                    document_name: document.name.clone(),
                    action: step.action,
                    assignee: step.assignee,
                    satisfied: step.satisfied,
                });
            }
        }

        let document_count = members.len();
        let percent_complete =
            ((complete_count as f64 / document_count as f64) * 100.0).round() as u8;

        let status = if complete_count == document_count {
            GroupStatus::Complete
        } else if complete_count == 0 && !any_history {
            GroupStatus::NotStarted
        } else {
            GroupStatus::InProgress
        };

        DocumentGroup {
            group: group.clone(),
            document_count,
            complete_count,
            percent_complete,
            status,
            current_step_index: current_step_index.unwrap_or(steps.len()),
            steps,
        }
    }
}
