//! Per-viewer queues: what waits on you, and what you wait on
//!
//! The builder walks a document snapshot once, derives each document's
//! position, and partitions outstanding work by whether its assignee is
//! the viewer. Input order is preserved; callers decide iteration order
//! and no urgency re-sorting happens here.

use crate::ActionStateMachine;
use dealdocs_types::{BlockedAction, Document, EmailAddress, PendingAction, PendingActionView};

/// Builds per-viewer pending action views. Stateless.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueueBuilder {
    state_machine: ActionStateMachine,
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self {
            state_machine: ActionStateMachine::new(),
        }
    }

    /// Partition outstanding work across `documents` for one viewer.
    ///
    /// Complete and tombstoned documents contribute nothing. A pending
    /// step whose assignee is only a role, with no bound identity, is
    /// blocked for every viewer; nobody can claim it by email.
    pub fn build<'a>(
        &self,
        documents: impl IntoIterator<Item = &'a Document>,
        viewer: &EmailAddress,
    ) -> PendingActionView {
        let mut view = PendingActionView::empty(viewer.clone());

        for document in documents {
            if document.is_removed() {
                continue;
            }

            let state = self.state_machine.derive(document);
            if state.is_complete {
                continue;
            }

            if state.next_assignee.is_email(viewer) {
                view.assigned_to_viewer.push(PendingAction {
                    document_id: document.id.clone(),
                    document_name: document.name.clone(),
                    group: document.group.clone(),
                    action: state.next_action,
                });
            } else {
                view.blocked_on_others.push(BlockedAction {
                    document_id: document.id.clone(),
                    document_name: document.name.clone(),
                    group: document.group.clone(),
                    action: state.next_action,
                    waiting_on: state.next_assignee.label(),
                });
            }
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealdocs_types::{
        ActionHistoryEntry, ActionType, GroupId, Role, RoleAssignment, WorkflowRequirements,
    };

    fn builder() -> QueueBuilder {
        QueueBuilder::new()
    }

    fn buyer() -> EmailAddress {
        EmailAddress::new("buyer@example.com")
    }

    fn esign_document(name: &str, signer_email: &str, signer_name: &str) -> Document {
        Document::new(name, GroupId::new("mortgage"))
            .with_requirements(WorkflowRequirements::new().with_buyer_signature().electronic())
            .with_assignment(RoleAssignment::new(Role::Buyer, 1, signer_email, signer_name))
    }

    #[test]
    fn test_viewer_sees_their_own_pending_action() {
        let documents = vec![esign_document("Purchase Agreement", "buyer@example.com", "Avery")];

        let view = builder().build(&documents, &buyer());
        assert!(view.has_work());
        assert_eq!(view.assigned_to_viewer.len(), 1);
        assert_eq!(view.assigned_to_viewer[0].action, ActionType::ESign);
        assert_eq!(view.assigned_to_viewer[0].document_name, "Purchase Agreement");
        assert!(view.blocked_on_others.is_empty());
    }

    #[test]
    fn test_viewer_match_is_case_insensitive() {
        let documents = vec![esign_document("Purchase Agreement", "BUYER@Example.COM", "Avery")];

        let view = builder().build(&documents, &buyer());
        assert_eq!(view.assigned_to_viewer.len(), 1);
    }

    #[test]
    fn test_someone_elses_step_is_blocked_with_label() {
        let documents = vec![esign_document("Deed", "other@example.com", "Odette Other")];

        let view = builder().build(&documents, &buyer());
        assert!(!view.has_work());
        assert_eq!(view.blocked_on_others.len(), 1);
        assert_eq!(view.blocked_on_others[0].waiting_on, "Odette Other");
        assert_eq!(view.blocked_on_others[0].action, ActionType::ESign);
    }

    #[test]
    fn test_complete_documents_appear_nowhere() {
        let mut document = esign_document("Purchase Agreement", "buyer@example.com", "Avery");
        document.record(ActionHistoryEntry::new(
            ActionType::ESign,
            Role::Buyer,
            "buyer@example.com",
        ));

        let view = builder().build(&[document], &buyer());
        assert_eq!(view.total_outstanding(), 0);
    }

    #[test]
    fn test_tombstoned_documents_appear_nowhere() {
        let mut document = esign_document("Old Draft", "buyer@example.com", "Avery");
        document.remove();

        let view = builder().build(&[document], &buyer());
        assert_eq!(view.total_outstanding(), 0);
    }

    #[test]
    fn test_role_only_step_is_blocked_for_everyone() {
        // Upload required but no broker assigned: the synthetic step has
        // no identity to route to
        let document = Document::new("Offer Letter", GroupId::new("mortgage"))
            .with_requirements(WorkflowRequirements::new().with_upload().with_buyer_signature())
            .with_assignment(RoleAssignment::new(Role::Buyer, 1, "buyer@example.com", "Avery"));

        let view = builder().build(&[document], &buyer());
        assert!(view.assigned_to_viewer.is_empty());
        assert_eq!(view.blocked_on_others.len(), 1);
        assert_eq!(view.blocked_on_others[0].action, ActionType::Upload);
        assert_eq!(view.blocked_on_others[0].waiting_on, "Broker");
    }

    #[test]
    fn test_input_order_is_preserved() {
        let documents = vec![
            esign_document("First", "buyer@example.com", "Avery"),
            esign_document("Second", "buyer@example.com", "Avery"),
        ];

        let view = builder().build(&documents, &buyer());
        let names: Vec<&str> = view
            .assigned_to_viewer
            .iter()
            .map(|p| p.document_name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_empty_snapshot_builds_empty_view() {
        let view = builder().build(&[], &buyer());
        assert!(!view.has_work());
        assert_eq!(view.total_outstanding(), 0);
    }
}
