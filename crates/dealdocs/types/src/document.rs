//! Deal documents: static workflow configuration plus history
//!
//! A document changes in exactly two ways: an entry is appended to its
//! history, or its static configuration is replaced. Derived state is
//! never stored on the document; the engine recomputes it on every read.
//! Removal is a tombstone, never an erasure, so the audit history of a
//! removed document survives.

use crate::{
    ActionHistoryEntry, ConfigError, DocumentId, GroupId, Role, RoleAssignment,
    WorkflowRequirements,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A deal document and everything that has happened to it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,
    /// Human-readable name, e.g. "Purchase Agreement"
    pub name: String,
    /// The group this document is tracked under
    pub group: GroupId,
    /// Static requirement flags
    pub requirements: WorkflowRequirements,
    /// Who must act, positioned by signing order
    pub assignments: Vec<RoleAssignment>,
    /// Append-only action history
    pub history: Vec<ActionHistoryEntry>,
    /// When the document was created
    pub created_at: DateTime<Utc>,
    /// When configuration or history last changed
    pub updated_at: DateTime<Utc>,
    /// Tombstone; a removed document keeps its history but stops
    /// contributing to groups and queues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new(name: impl Into<String>, group: GroupId) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::generate(),
            name: name.into(),
            group,
            requirements: WorkflowRequirements::default(),
            assignments: Vec::new(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
            removed_at: None,
        }
    }

    pub fn with_id(mut self, id: DocumentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_requirements(mut self, requirements: WorkflowRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_assignment(mut self, assignment: RoleAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn with_assignments(mut self, assignments: Vec<RoleAssignment>) -> Self {
        self.assignments = assignments;
        self
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Append a history entry
    pub fn record(&mut self, entry: ActionHistoryEntry) {
        self.history.push(entry);
        self.updated_at = Utc::now();
    }

    /// Replace the requirement flags. History is untouched; derived
    /// state may change retroactively, which is intended.
    pub fn set_requirements(&mut self, requirements: WorkflowRequirements) {
        self.requirements = requirements;
        self.updated_at = Utc::now();
    }

    /// Replace the role assignments and normalize their signing orders
    pub fn set_assignments(&mut self, assignments: Vec<RoleAssignment>) {
        self.assignments = assignments;
        self.normalize_assignments();
        self.updated_at = Utc::now();
    }

    /// Renumber signing orders into a contiguous 1..=n sequence,
    /// preserving relative order
    pub fn normalize_assignments(&mut self) {
        self.assignments.sort_by_key(|a| a.signing_order);
        for (position, assignment) in self.assignments.iter_mut().enumerate() {
            assignment.signing_order = position as u32 + 1;
        }
    }

    /// Tombstone the document
    pub fn remove(&mut self) {
        self.removed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Clear the tombstone
    pub fn restore(&mut self) {
        self.removed_at = None;
        self.updated_at = Utc::now();
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Whether the document has been tombstoned
    pub fn is_removed(&self) -> bool {
        self.removed_at.is_some()
    }

    /// Assignments sorted by signing order
    pub fn assignments_in_order(&self) -> Vec<&RoleAssignment> {
        let mut ordered: Vec<&RoleAssignment> = self.assignments.iter().collect();
        ordered.sort_by_key(|a| a.signing_order);
        ordered
    }

    /// The earliest assignment carrying the given role, by signing order
    pub fn assignment_for_role(&self, role: Role) -> Option<&RoleAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.role == role)
            .min_by_key(|a| a.signing_order)
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Validate the document's static configuration
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        Self::validate_parts(&self.requirements, &self.assignments)
    }

    /// Validate a (requirements, assignments) pair before accepting it.
    ///
    /// Signing orders must be positive and unique. Every requirement
    /// flag that maps through a role needs an assignment slot of that
    /// role to claim; the two broker flags each claim their own slot.
    pub fn validate_parts(
        requirements: &WorkflowRequirements,
        assignments: &[RoleAssignment],
    ) -> Result<(), ConfigError> {
        if !requirements.channels_consistent() {
            return Err(ConfigError::AmbiguousSignatureChannel);
        }

        let mut seen = HashSet::new();
        for assignment in assignments {
            if assignment.signing_order == 0 {
                return Err(ConfigError::InvalidSigningOrder { order: 0 });
            }
            if !seen.insert(assignment.signing_order) {
                return Err(ConfigError::DuplicateSigningOrder {
                    order: assignment.signing_order,
                });
            }
        }

        let count = |role: Role| assignments.iter().filter(|a| a.role == role).count();

        if requirements.buyer_lawyer_approval && count(Role::BuyerLawyer) == 0 {
            return Err(ConfigError::MissingAssignment {
                role: Role::BuyerLawyer,
            });
        }
        if requirements.buyer_signature && count(Role::Buyer) == 0 {
            return Err(ConfigError::MissingAssignment { role: Role::Buyer });
        }

        let broker_slots =
            usize::from(requirements.broker_approval) + usize::from(requirements.broker_signature);
        if count(Role::Broker) < broker_slots {
            return Err(ConfigError::MissingAssignment { role: Role::Broker });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActionType;

    fn make_document() -> Document {
        Document::new("Purchase Agreement", GroupId::new("mortgage"))
            .with_requirements(
                WorkflowRequirements::new()
                    .with_buyer_lawyer_approval()
                    .with_buyer_signature()
                    .electronic(),
            )
            .with_assignment(RoleAssignment::new(
                Role::BuyerLawyer,
                1,
                "lawyer@example.com",
                "Lana Lawyer",
            ))
            .with_assignment(RoleAssignment::new(
                Role::Buyer,
                2,
                "buyer@example.com",
                "Avery Buyer",
            ))
    }

    #[test]
    fn test_new_document_is_empty_and_live() {
        let document = Document::new("Deed", GroupId::new("closing"));
        assert!(document.history.is_empty());
        assert!(document.assignments.is_empty());
        assert!(!document.is_removed());
        assert_eq!(document.group, GroupId::new("closing"));
    }

    #[test]
    fn test_record_appends_and_touches() {
        let mut document = make_document();
        let before = document.updated_at;
        document.record(ActionHistoryEntry::new(
            ActionType::Approve,
            Role::BuyerLawyer,
            "lawyer@example.com",
        ));
        assert_eq!(document.history.len(), 1);
        assert!(document.updated_at >= before);
    }

    #[test]
    fn test_assignments_in_order_sorts_by_signing_order() {
        let document = Document::new("Deed", GroupId::new("closing"))
            .with_assignment(RoleAssignment::new(Role::Buyer, 3, "b@x.com", "B"))
            .with_assignment(RoleAssignment::new(Role::Broker, 1, "k@x.com", "K"))
            .with_assignment(RoleAssignment::new(Role::BuyerLawyer, 2, "l@x.com", "L"));

        let ordered = document.assignments_in_order();
        let orders: Vec<u32> = ordered.iter().map(|a| a.signing_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(ordered[0].role, Role::Broker);
    }

    #[test]
    fn test_assignment_for_role_picks_earliest() {
        let document = Document::new("Deed", GroupId::new("closing"))
            .with_assignment(RoleAssignment::new(Role::Broker, 5, "late@x.com", "Late"))
            .with_assignment(RoleAssignment::new(Role::Broker, 2, "early@x.com", "Early"));

        let found = document.assignment_for_role(Role::Broker).unwrap();
        assert_eq!(found.signing_order, 2);
        assert!(document.assignment_for_role(Role::Admin).is_none());
    }

    #[test]
    fn test_validate_accepts_covered_flags() {
        assert!(make_document().validate_config().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_signing_order() {
        let document = Document::new("Deed", GroupId::new("closing"))
            .with_assignment(RoleAssignment::new(Role::Buyer, 1, "b@x.com", "B"))
            .with_assignment(RoleAssignment::new(Role::Broker, 1, "k@x.com", "K"));

        assert!(matches!(
            document.validate_config(),
            Err(ConfigError::DuplicateSigningOrder { order: 1 })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_signing_order() {
        let document = Document::new("Deed", GroupId::new("closing"))
            .with_assignment(RoleAssignment::new(Role::Buyer, 0, "b@x.com", "B"));

        assert!(matches!(
            document.validate_config(),
            Err(ConfigError::InvalidSigningOrder { order: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_flag_without_assignment() {
        let document = Document::new("Deed", GroupId::new("closing"))
            .with_requirements(WorkflowRequirements::new().with_buyer_signature().electronic());

        assert!(matches!(
            document.validate_config(),
            Err(ConfigError::MissingAssignment { role: Role::Buyer })
        ));
    }

    #[test]
    fn test_validate_broker_flags_each_need_a_slot() {
        let one_broker = Document::new("Deed", GroupId::new("closing"))
            .with_requirements(
                WorkflowRequirements::new()
                    .with_broker_approval()
                    .with_broker_signature()
                    .electronic(),
            )
            .with_assignment(RoleAssignment::new(Role::Broker, 1, "k@x.com", "K"));

        assert!(matches!(
            one_broker.validate_config(),
            Err(ConfigError::MissingAssignment { role: Role::Broker })
        ));

        let two_brokers = one_broker
            .with_assignment(RoleAssignment::new(Role::Broker, 2, "k2@x.com", "K2"));
        assert!(two_brokers.validate_config().is_ok());
    }

    #[test]
    fn test_validate_rejects_both_signature_channels() {
        let mut requirements = WorkflowRequirements::new();
        requirements.upload = true;
        requirements.electronic_signature = true;

        assert!(matches!(
            Document::validate_parts(&requirements, &[]),
            Err(ConfigError::AmbiguousSignatureChannel)
        ));
    }

    #[test]
    fn test_normalize_renumbers_gaps() {
        let mut document = Document::new("Deed", GroupId::new("closing"))
            .with_assignment(RoleAssignment::new(Role::Buyer, 7, "b@x.com", "B"))
            .with_assignment(RoleAssignment::new(Role::Broker, 2, "k@x.com", "K"));

        document.normalize_assignments();

        let orders: Vec<u32> = document.assignments.iter().map(|a| a.signing_order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(document.assignments[0].role, Role::Broker);
        assert_eq!(document.assignments[1].role, Role::Buyer);
    }

    #[test]
    fn test_remove_and_restore_tombstone() {
        let mut document = make_document();
        document.record(ActionHistoryEntry::new(
            ActionType::Review,
            Role::Admin,
            "admin@example.com",
        ));
        assert!(!document.is_removed());

        document.remove();
        assert!(document.is_removed());
        assert_eq!(document.history.len(), 1);

        document.restore();
        assert!(!document.is_removed());
        assert_eq!(document.history.len(), 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut document = make_document();
        document.record(ActionHistoryEntry::new(
            ActionType::Approve,
            Role::BuyerLawyer,
            "lawyer@example.com",
        ));

        let json = serde_json::to_string(&document).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, document.id);
        assert_eq!(back.assignments.len(), 2);
        assert_eq!(back.history.len(), 1);
        assert_eq!(back.requirements, document.requirements);
        // Tombstone is omitted from JSON while unset
        assert!(!json.contains("removed_at"));
    }
}
