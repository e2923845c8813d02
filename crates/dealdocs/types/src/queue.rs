//! Per-viewer pending action queues
//!
//! A queue is computed for one viewer from a document snapshot. It
//! partitions outstanding work into what waits on the viewer and what
//! the viewer is waiting for. Like every read model here, it is derived
//! on demand and never stored.

use crate::{ActionType, DocumentId, EmailAddress, GroupId};
use serde::{Deserialize, Serialize};

/// An outstanding action assigned to the viewer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    /// The document waiting on the viewer
    pub document_id: DocumentId,
    /// That document's name, for display
    pub document_name: String,
    /// The group the document belongs to
    pub group: GroupId,
    /// What the viewer must do
    pub action: ActionType,
}

/// An outstanding action on an incomplete document that waits on
/// somebody other than the viewer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedAction {
    /// The blocked document
    pub document_id: DocumentId,
    /// That document's name, for display
    pub document_name: String,
    /// The group the document belongs to
    pub group: GroupId,
    /// The action somebody else must take first
    pub action: ActionType,
    /// Who the viewer is waiting on, as a display label
    pub waiting_on: String,
}

/// Everything one viewer sees about outstanding work
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingActionView {
    /// The viewer this queue was computed for
    pub viewer: EmailAddress,
    /// Actions waiting on the viewer
    pub assigned_to_viewer: Vec<PendingAction>,
    /// Actions on incomplete documents waiting on others
    pub blocked_on_others: Vec<BlockedAction>,
}

impl PendingActionView {
    /// An empty queue for the given viewer
    pub fn empty(viewer: EmailAddress) -> Self {
        Self {
            viewer,
            assigned_to_viewer: Vec::new(),
            blocked_on_others: Vec::new(),
        }
    }

    /// Whether anything at all waits on the viewer
    pub fn has_work(&self) -> bool {
        !self.assigned_to_viewer.is_empty()
    }

    /// Total outstanding actions visible to the viewer
    pub fn total_outstanding(&self) -> usize {
        self.assigned_to_viewer.len() + self.blocked_on_others.len()
    }
}
