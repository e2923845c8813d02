//! The workflow store: the single stateful component
//!
//! The store owns the current document set, applies commands, and
//! answers queries by recomputing derived state from the snapshot it
//! holds. Commands validate first and mutate second, so a rejected
//! command leaves no trace at all.
//!
//! There is no ambient global here. Callers construct a store and pass
//! it where it is needed; embedding it in a concurrent service means
//! wrapping it in the caller's lock. Once commands are serialized, a
//! racing submission for an already-taken step deterministically loses
//! with [`WorkflowError::ActionConflict`], which carries the
//! authoritative state so the loser can re-render without a reload.

use crate::{
    ActionStateMachine, EventBus, EventBusStats, GroupAggregator, QueueBuilder, StoreEvent,
};
use dealdocs_types::{
    ActionHistoryEntry, ActionType, ConfigError, Document, DocumentGroup, DocumentId,
    DocumentState, EmailAddress, GroupId, PendingActionView, Role, RoleAssignment, WorkflowError,
    WorkflowRequirements, WorkflowResult, WorkflowStep,
};
use tokio::sync::broadcast;

/// Stateful shell around the pure derivation components
#[derive(Debug)]
pub struct WorkflowStore {
    /// Documents in insertion order; iteration order is meaningful for
    /// queues and group listings
    documents: Vec<Document>,
    state_machine: ActionStateMachine,
    aggregator: GroupAggregator,
    queue_builder: QueueBuilder,
    events: EventBus,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            state_machine: ActionStateMachine::new(),
            aggregator: GroupAggregator::new(),
            queue_builder: QueueBuilder::new(),
            events: EventBus::new(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add a document to the store.
    ///
    /// The configuration is validated and signing orders are normalized
    /// to a contiguous 1..=n sequence before the document is accepted.
    pub fn add_document(&mut self, mut document: Document) -> WorkflowResult<DocumentId> {
        if self.documents.iter().any(|d| d.id == document.id) {
            return Err(WorkflowError::DuplicateDocument(document.id));
        }
        document.validate_config()?;
        document.normalize_assignments();

        let document_id = document.id.clone();
        self.documents.push(document);

        self.events.publish(StoreEvent::DocumentAdded {
            document_id: document_id.clone(),
        });
        tracing::info!(
            document_id = %document_id,
            "Document added"
        );
        Ok(document_id)
    }

    /// Record a completed action against a document's pending step.
    ///
    /// Step actions must match the derived `next_action` and the
    /// performer must be its assignee. Review and dispute are accepted
    /// from anyone while the document is live. A complete document
    /// accepts nothing further, and [`ActionType::Complete`] itself is
    /// derived, never recorded.
    ///
    /// Returns the state derived after the append.
    pub fn record_action(
        &mut self,
        document_id: &DocumentId,
        action: ActionType,
        performed_by: &EmailAddress,
    ) -> WorkflowResult<DocumentState> {
        let index = self.live_index(document_id)?;

        // Validate against the authoritative derived state
        let state = self.state_machine.derive(&self.documents[index]);
        let role = authorize(&self.documents[index], &state, action, performed_by)?;

        self.documents[index].record(ActionHistoryEntry::new(
            action,
            role,
            performed_by.as_str(),
        ));

        let next = self.state_machine.derive(&self.documents[index]);
        self.events.publish(StoreEvent::ActionRecorded {
            document_id: document_id.clone(),
            action,
            performed_by: performed_by.clone(),
        });
        tracing::info!(
            document_id = %document_id,
            action = %action,
            performed_by = %performed_by,
            complete = next.is_complete,
            "Action recorded"
        );
        Ok(next)
    }

    /// Replace a document's requirement flags.
    ///
    /// History is untouched; derived state may change retroactively,
    /// which is intended. The signature channels are reconciled against
    /// the previous flags: a newly set channel clears the other, while
    /// setting both in one edit is rejected as ambiguous.
    ///
    /// Returns the state derived under the new flags.
    pub fn edit_requirements(
        &mut self,
        document_id: &DocumentId,
        mut requirements: WorkflowRequirements,
    ) -> WorkflowResult<DocumentState> {
        let index = self.live_index(document_id)?;

        reconcile_channels(&mut requirements, &self.documents[index].requirements)?;
        Document::validate_parts(&requirements, &self.documents[index].assignments)?;

        self.documents[index].set_requirements(requirements);

        let state = self.state_machine.derive(&self.documents[index]);
        self.events.publish(StoreEvent::ConfigChanged {
            document_id: document_id.clone(),
        });
        tracing::info!(
            document_id = %document_id,
            complete = state.is_complete,
            "Requirements updated"
        );
        Ok(state)
    }

    /// Replace a document's role assignments.
    ///
    /// Signing orders must be positive and unique; gaps are normalized
    /// away. History is untouched.
    ///
    /// Returns the state derived under the new assignments.
    pub fn edit_assignments(
        &mut self,
        document_id: &DocumentId,
        assignments: Vec<RoleAssignment>,
    ) -> WorkflowResult<DocumentState> {
        let index = self.live_index(document_id)?;

        Document::validate_parts(&self.documents[index].requirements, &assignments)?;

        self.documents[index].set_assignments(assignments);

        let state = self.state_machine.derive(&self.documents[index]);
        self.events.publish(StoreEvent::ConfigChanged {
            document_id: document_id.clone(),
        });
        tracing::info!(
            document_id = %document_id,
            "Assignments updated"
        );
        Ok(state)
    }

    /// Tombstone a document.
    ///
    /// The document keeps its history for audit but stops contributing
    /// to groups, queues, and completion checks.
    pub fn remove_document(&mut self, document_id: &DocumentId) -> WorkflowResult<()> {
        let index = self.live_index(document_id)?;

        self.documents[index].remove();

        self.events.publish(StoreEvent::DocumentRemoved {
            document_id: document_id.clone(),
        });
        tracing::info!(
            document_id = %document_id,
            "Document removed"
        );
        Ok(())
    }

    /// Clear a document's tombstone. Restoring a live document is a
    /// no-op.
    pub fn restore_document(&mut self, document_id: &DocumentId) -> WorkflowResult<()> {
        let index = self.index_of(document_id)?;
        if !self.documents[index].is_removed() {
            return Ok(());
        }

        self.documents[index].restore();

        self.events.publish(StoreEvent::DocumentRestored {
            document_id: document_id.clone(),
        });
        tracing::info!(
            document_id = %document_id,
            "Document restored"
        );
        Ok(())
    }

    // ── Document Queries ─────────────────────────────────────────────

    /// Get a document, tombstoned ones included
    pub fn document(&self, document_id: &DocumentId) -> WorkflowResult<&Document> {
        let index = self.index_of(document_id)?;
        Ok(&self.documents[index])
    }

    /// All documents in insertion order, tombstoned ones included
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Documents that are not tombstoned, in insertion order
    pub fn active_documents(&self) -> Vec<&Document> {
        self.documents.iter().filter(|d| !d.is_removed()).collect()
    }

    /// Total number of documents, tombstoned ones included
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    // ── Derived State Queries ────────────────────────────────────────

    /// A document's derived workflow position
    pub fn document_state(&self, document_id: &DocumentId) -> WorkflowResult<DocumentState> {
        let document = self.document(document_id)?;
        Ok(self.state_machine.derive(document))
    }

    /// A document's full derived step sequence
    pub fn document_steps(&self, document_id: &DocumentId) -> WorkflowResult<Vec<WorkflowStep>> {
        let document = self.document(document_id)?;
        Ok(self.state_machine.steps(document))
    }

    /// Aggregate progress for one group. An empty group aggregates to
    /// the empty value, not an error.
    pub fn group_state(&self, group: &GroupId) -> DocumentGroup {
        self.aggregator.aggregate(&self.documents, group)
    }

    /// Groups named by live documents, in first-seen order
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut seen: Vec<GroupId> = Vec::new();
        for document in &self.documents {
            if !document.is_removed() && !seen.contains(&document.group) {
                seen.push(document.group.clone());
            }
        }
        seen
    }

    /// Whether every live member of the group is complete. False for a
    /// group with no live members.
    pub fn group_complete(&self, group: &GroupId) -> bool {
        self.group_state(group).is_complete()
    }

    /// Whether every live document in the store is complete. False for
    /// an empty store; no documents does not mean a finished deal.
    pub fn all_complete(&self) -> bool {
        let mut any = false;
        for document in &self.documents {
            if document.is_removed() {
                continue;
            }
            any = true;
            if !self.state_machine.derive(document).is_complete {
                return false;
            }
        }
        any
    }

    /// Outstanding work from one viewer's perspective, ordered by group
    /// in first-seen order and by insertion order within a group
    pub fn pending_actions(&self, viewer: &EmailAddress) -> PendingActionView {
        let mut ordered: Vec<&Document> = Vec::new();
        for group in self.group_ids() {
            ordered.extend(
                self.documents
                    .iter()
                    .filter(|d| d.group == group && !d.is_removed()),
            );
        }
        self.queue_builder.build(ordered, viewer)
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Subscribe to store events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Number of active event subscribers
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    /// Total events published by this store
    pub fn events_published(&self) -> u64 {
        self.events.events_published()
    }

    /// Event bus statistics
    pub fn event_stats(&self) -> EventBusStats {
        self.events.stats()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn index_of(&self, document_id: &DocumentId) -> WorkflowResult<usize> {
        self.documents
            .iter()
            .position(|d| &d.id == document_id)
            .ok_or_else(|| WorkflowError::UnknownDocument(document_id.clone()))
    }

    /// Index of a document that exists and is not tombstoned
    fn live_index(&self, document_id: &DocumentId) -> WorkflowResult<usize> {
        let index = self.index_of(document_id)?;
        if self.documents[index].is_removed() {
            return Err(WorkflowError::DocumentRemoved(document_id.clone()));
        }
        Ok(index)
    }
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── Command Validation ───────────────────────────────────────────────

/// Validate a requested action against the derived state and resolve
/// the role it is recorded under.
fn authorize(
    document: &Document,
    state: &DocumentState,
    action: ActionType,
    performed_by: &EmailAddress,
) -> WorkflowResult<Role> {
    let conflict = || WorkflowError::ActionConflict {
        document_id: document.id.clone(),
        requested: action,
        performed_by: performed_by.clone(),
        state: state.clone(),
    };

    // A complete document accepts nothing further
    if state.is_complete {
        return Err(conflict());
    }

    match action {
        // Annotations carry no pending slot; anyone may record them on
        // a live document
        ActionType::Review | ActionType::Dispute => Ok(performer_role(document, performed_by)),

        // Complete is derived, never recorded
        ActionType::Complete => Err(conflict()),

        ActionType::Prepare
        | ActionType::Upload
        | ActionType::UploadSigned
        | ActionType::ESign
        | ActionType::Approve => {
            if action != state.next_action {
                return Err(conflict());
            }
            match &state.next_assignee.email {
                // Identity-bound step: only its assignee may act, so
                // the assignee's role is the performer's role
                Some(email) if email == performed_by => Ok(state.next_assignee.role),
                Some(_) => Err(conflict()),
                // Role-only synthetic step: any performer is accepted
                None => Ok(performer_role(document, performed_by)),
            }
        }
    }
}

/// The role a performer acts under, from their assignment if they have
/// one
fn performer_role(document: &Document, performed_by: &EmailAddress) -> Role {
    document
        .assignments
        .iter()
        .find(|a| a.email == *performed_by)
        .map(|a| a.role)
        .unwrap_or(Role::None)
}

/// Reconcile the signature channels of an incoming requirements edit
/// against the stored flags. Both set means the edit kept a stale flag
/// from a form: the newly toggled channel wins. Both newly set has no
/// toggle direction to prefer and is rejected.
fn reconcile_channels(
    next: &mut WorkflowRequirements,
    previous: &WorkflowRequirements,
) -> Result<(), ConfigError> {
    if !(next.electronic_signature && next.upload) {
        return Ok(());
    }

    let electronic_toggled = !previous.electronic_signature;
    let upload_toggled = !previous.upload;
    match (electronic_toggled, upload_toggled) {
        (true, false) => {
            next.upload = false;
            Ok(())
        }
        (false, true) => {
            next.electronic_signature = false;
            Ok(())
        }
        _ => Err(ConfigError::AmbiguousSignatureChannel),
    }
}
