//! Aggregate progress of a document group
//!
//! Groups are named by documents, not declared anywhere. Aggregates are
//! derived read models computed from a document snapshot; none of this
//! is persisted.

use crate::{ActionType, Assignee, DocumentId, GroupId};
use serde::{Deserialize, Serialize};

// ── Group Status ─────────────────────────────────────────────────────

/// Coarse progress bucket of a document group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupStatus {
    /// Nothing recorded yet and no member complete
    #[default]
    NotStarted,
    /// Work has begun and at least one member is still incomplete
    InProgress,
    /// Every member document is complete
    Complete,
}

impl GroupStatus {
    /// Human-readable label for messaging
    pub fn label(&self) -> &'static str {
        match self {
            GroupStatus::NotStarted => "Not Started",
            GroupStatus::InProgress => "In Progress",
            GroupStatus::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ── Group Step ───────────────────────────────────────────────────────

/// One step in a group's flattened visualization sequence
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStep {
    /// The member document this step belongs to
    pub document_id: DocumentId,
    /// That document's name, for display
    pub document_name: String,
    /// The action the step requires
    pub action: ActionType,
    /// Who is expected to perform it
    pub assignee: Assignee,
    /// Whether the step is already satisfied
    pub satisfied: bool,
}

// ── Document Group ───────────────────────────────────────────────────

/// Aggregate progress of one document group
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentGroup {
    /// The group being aggregated
    pub group: GroupId,
    /// Live member documents
    pub document_count: usize,
    /// Members whose workflow is complete
    pub complete_count: usize,
    /// Completion percentage, 0..=100, rounded to the nearest integer
    pub percent_complete: u8,
    /// Coarse progress bucket
    pub status: GroupStatus,
    /// Flattened member steps, for progress visualization only
    pub steps: Vec<GroupStep>,
    /// Index into `steps` of the first step whose document is still
    /// incomplete; equals `steps.len()` when the group is done
    pub current_step_index: usize,
}

impl DocumentGroup {
    /// The aggregate of a group with no live members. An empty group is
    /// a value, not an error.
    pub fn empty(group: GroupId) -> Self {
        Self {
            group,
            document_count: 0,
            complete_count: 0,
            percent_complete: 0,
            status: GroupStatus::NotStarted,
            steps: Vec::new(),
            current_step_index: 0,
        }
    }

    /// Whether every member document is complete
    pub fn is_complete(&self) -> bool {
        self.status == GroupStatus::Complete
    }
}
