//! The action state machine: deriving a document's workflow position
//!
//! Derivation is a pure fold. First the required step sequence is
//! planned from static configuration alone, then the append-only
//! history is replayed over the plan. No clock, no randomness, no I/O:
//! the same inputs always produce the same answer, and any
//! configuration that was ever accepted keeps producing one.

use dealdocs_types::{
    ActionHistoryEntry, ActionType, Assignee, Document, DocumentState, Role, RoleAssignment,
    WorkflowRequirements, WorkflowStep,
};

/// Derives per-document workflow state. Stateless and freely shareable.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionStateMachine;

impl ActionStateMachine {
    pub fn new() -> Self {
        Self
    }

    /// A document's full derived step sequence, satisfied flags included
    pub fn steps(&self, document: &Document) -> Vec<WorkflowStep> {
        self.steps_for(&document.requirements, &document.assignments, &document.history)
    }

    /// A document's derived workflow position
    pub fn derive(&self, document: &Document) -> DocumentState {
        self.derive_for(&document.requirements, &document.assignments, &document.history)
    }

    /// [`Self::steps`] over raw parts, for replaying arbitrary histories
    pub fn steps_for(
        &self,
        requirements: &WorkflowRequirements,
        assignments: &[RoleAssignment],
        history: &[ActionHistoryEntry],
    ) -> Vec<WorkflowStep> {
        let mut steps = plan(requirements, assignments);
        replay(&mut steps, history);
        steps
    }

    /// [`Self::derive`] over raw parts, for replaying arbitrary histories
    pub fn derive_for(
        &self,
        requirements: &WorkflowRequirements,
        assignments: &[RoleAssignment],
        history: &[ActionHistoryEntry],
    ) -> DocumentState {
        let steps = self.steps_for(requirements, assignments, history);
        match steps.into_iter().find(|step| !step.satisfied) {
            Some(step) => DocumentState::pending(step.action, step.assignee),
            None => DocumentState::complete(),
        }
    }
}

// ── Planning ─────────────────────────────────────────────────────────

/// Requirement flags already claimed by an assignment slot
#[derive(Default)]
struct ClaimedFlags {
    buyer_lawyer_approval: bool,
    buyer_signature: bool,
    broker_approval: bool,
    broker_signature: bool,
}

/// Plan the required step sequence from static configuration alone.
///
/// Synthetic prepare and upload steps lead the plan; they exist because
/// a flag demands them, not because any assignment does. They bind the
/// earliest broker's identity when a broker is assigned, and fall back
/// to the bare role otherwise. Assignment-mapped steps follow in
/// signing order, each assignment claiming the first unclaimed flag its
/// role can serve, approvals before signatures.
///
/// Electronically signed documents derive no upload step at all: the
/// signing provider already holds the file, so the upload is implied
/// and nothing is ever synthesized into history for it.
fn plan(requirements: &WorkflowRequirements, assignments: &[RoleAssignment]) -> Vec<WorkflowStep> {
    let mut steps = Vec::new();

    let broker = assignments
        .iter()
        .filter(|a| a.role == Role::Broker)
        .min_by_key(|a| a.signing_order)
        .map(Assignee::from_assignment)
        .unwrap_or_else(|| Assignee::role_only(Role::Broker));

    if requirements.prepare {
        steps.push(WorkflowStep::pending(ActionType::Prepare, broker.clone()));
    }
    if requirements.upload && !requirements.electronic_signature {
        steps.push(WorkflowStep::pending(ActionType::Upload, broker.clone()));
    }

    let mut ordered: Vec<&RoleAssignment> = assignments.iter().collect();
    ordered.sort_by_key(|a| a.signing_order);

    let mut claimed = ClaimedFlags::default();
    for assignment in ordered {
        if let Some(action) = claim_action(assignment.role, requirements, &mut claimed) {
            steps.push(WorkflowStep::pending(
                action,
                Assignee::from_assignment(assignment),
            ));
        }
    }

    steps
}

/// Map one assignment to its required action by claiming the first
/// unclaimed flag its role can serve. Exhaustive over [`Role`]: adding
/// a role does not compile until this table says what it must do.
fn claim_action(
    role: Role,
    requirements: &WorkflowRequirements,
    claimed: &mut ClaimedFlags,
) -> Option<ActionType> {
    match role {
        Role::BuyerLawyer => {
            if requirements.buyer_lawyer_approval && !claimed.buyer_lawyer_approval {
                claimed.buyer_lawyer_approval = true;
                return Some(ActionType::Approve);
            }
            None
        }
        Role::Broker => {
            if requirements.broker_approval && !claimed.broker_approval {
                claimed.broker_approval = true;
                return Some(ActionType::Approve);
            }
            if requirements.broker_signature && !claimed.broker_signature {
                claimed.broker_signature = true;
                return Some(signature_action(requirements));
            }
            None
        }
        Role::Buyer => {
            if requirements.buyer_signature && !claimed.buyer_signature {
                claimed.buyer_signature = true;
                return Some(signature_action(requirements));
            }
            None
        }
        Role::Admin | Role::System | Role::None => None,
    }
}

/// Which concrete action a signature flag demands
fn signature_action(requirements: &WorkflowRequirements) -> ActionType {
    if requirements.electronic_signature {
        ActionType::ESign
    } else {
        ActionType::UploadSigned
    }
}

// ── Replay ───────────────────────────────────────────────────────────

/// Replay history over the planned steps, in append order.
///
/// A step entry satisfies the first unsatisfied step it matches,
/// wherever that step sits; entries matching nothing are ignored, so
/// replay is total over any history. Reviews are inert. A dispute
/// un-satisfies the most recently satisfied step, unless the plan is
/// already fully satisfied: completion is monotonic under appends.
fn replay(steps: &mut [WorkflowStep], history: &[ActionHistoryEntry]) {
    // Satisfaction order, for dispute targeting
    let mut satisfied_order: Vec<usize> = Vec::new();

    for entry in history {
        match entry.action {
            ActionType::Prepare
            | ActionType::Upload
            | ActionType::UploadSigned
            | ActionType::ESign
            | ActionType::Approve => {
                if let Some(index) = steps
                    .iter()
                    .position(|step| !step.satisfied && step_matches(step, entry))
                {
                    steps[index].satisfied = true;
                    satisfied_order.push(index);
                }
            }
            ActionType::Dispute => {
                if steps.iter().any(|step| !step.satisfied) {
                    if let Some(index) = satisfied_order.pop() {
                        steps[index].satisfied = false;
                    }
                }
            }
            ActionType::Review | ActionType::Complete => {}
        }
    }
}

/// Whether a history entry satisfies a planned step. Identity-bound
/// steps require the performer's email, compared case-insensitively;
/// role-only synthetic steps match on the action alone.
fn step_matches(step: &WorkflowStep, entry: &ActionHistoryEntry) -> bool {
    if step.action != entry.action {
        return false;
    }
    match &step.assignee.email {
        Some(email) => *email == entry.performed_by_email,
        None => true,
    }
}
