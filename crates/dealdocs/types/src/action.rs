//! Action types and the append-only action history
//!
//! Everything a document has been through lives in its history. Entries
//! are appended, never edited and never deleted, and the append order is
//! authoritative when deriving state; timestamps are informational.

use crate::{EmailAddress, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Action Type ──────────────────────────────────────────────────────

/// Everything that can happen to a deal document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Assemble the document before it enters circulation
    Prepare,
    /// Upload the unsigned document
    Upload,
    /// Upload a physically signed copy
    UploadSigned,
    /// Sign electronically in-app
    ESign,
    /// Approve the document
    Approve,
    /// Informational review note; never advances the workflow
    Review,
    /// Contest the most recently completed step, re-opening it
    Dispute,
    /// Derived terminal marker; never recorded by a person
    Complete,
}

impl ActionType {
    /// Whether this action occupies a slot in the derived step sequence
    pub fn is_step(&self) -> bool {
        matches!(
            self,
            ActionType::Prepare
                | ActionType::Upload
                | ActionType::UploadSigned
                | ActionType::ESign
                | ActionType::Approve
        )
    }

    /// Whether this action is recorded out-of-band, with no pending slot
    pub fn is_annotation(&self) -> bool {
        matches!(self, ActionType::Review | ActionType::Dispute)
    }

    /// Human-readable label for messaging
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Prepare => "Prepare",
            ActionType::Upload => "Upload",
            ActionType::UploadSigned => "Upload signed",
            ActionType::ESign => "e-Sign",
            ActionType::Approve => "Approve",
            ActionType::Review => "Review",
            ActionType::Dispute => "Dispute",
            ActionType::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ── Action History ───────────────────────────────────────────────────

/// One entry in a document's append-only action history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHistoryEntry {
    /// What happened
    pub action: ActionType,
    /// The role the performer acted as
    pub performed_by_role: Role,
    /// Who performed it
    pub performed_by_email: EmailAddress,
    /// When it was recorded; append order, not this, decides state
    pub recorded_at: DateTime<Utc>,
}

impl ActionHistoryEntry {
    /// An entry recorded now
    pub fn new(action: ActionType, role: Role, email: impl Into<String>) -> Self {
        Self {
            action,
            performed_by_role: role,
            performed_by_email: EmailAddress::new(email),
            recorded_at: Utc::now(),
        }
    }

    /// Override the timestamp, for replaying imported histories
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_actions_are_exactly_the_plannable_ones() {
        assert!(ActionType::Prepare.is_step());
        assert!(ActionType::Upload.is_step());
        assert!(ActionType::UploadSigned.is_step());
        assert!(ActionType::ESign.is_step());
        assert!(ActionType::Approve.is_step());

        assert!(!ActionType::Review.is_step());
        assert!(!ActionType::Dispute.is_step());
        assert!(!ActionType::Complete.is_step());
    }

    #[test]
    fn test_annotations_are_review_and_dispute() {
        assert!(ActionType::Review.is_annotation());
        assert!(ActionType::Dispute.is_annotation());
        assert!(!ActionType::Approve.is_annotation());
        assert!(!ActionType::Complete.is_annotation());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ActionType::ESign.label(), "e-Sign");
        assert_eq!(ActionType::UploadSigned.to_string(), "Upload signed");
    }

    #[test]
    fn test_entry_records_performer() {
        let entry = ActionHistoryEntry::new(ActionType::Approve, Role::Broker, "broker@example.com");
        assert_eq!(entry.action, ActionType::Approve);
        assert_eq!(entry.performed_by_role, Role::Broker);
        assert_eq!(
            entry.performed_by_email,
            EmailAddress::new("BROKER@example.com")
        );
    }

    #[test]
    fn test_with_timestamp_overrides() {
        let at = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry =
            ActionHistoryEntry::new(ActionType::Review, Role::Admin, "admin@example.com")
                .with_timestamp(at);
        assert_eq!(entry.recorded_at, at);
    }
}
