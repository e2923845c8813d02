//! Roles, role assignments, and derived assignees
//!
//! A role assignment is one slot in a document's signing order: who must
//! act, acting as what, and when their turn comes. The set of roles is
//! closed so every role-to-action mapping in the engine is an exhaustive
//! match; adding a role is a compile-checked change, not a runtime
//! surprise.

use crate::EmailAddress;
use serde::{Deserialize, Serialize};

// ── Role ─────────────────────────────────────────────────────────────

/// A party that can act on a deal document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The purchasing party
    Buyer,
    /// Counsel acting for the buyer
    BuyerLawyer,
    /// The broker running the deal
    Broker,
    /// Marketplace administrator
    Admin,
    /// The engine itself; assignee of synthesized and terminal steps
    System,
    /// No recognized role
    None,
}

impl Role {
    /// Human-readable label for messaging
    pub fn label(&self) -> &'static str {
        match self {
            Role::Buyer => "Buyer",
            Role::BuyerLawyer => "Buyer's Lawyer",
            Role::Broker => "Broker",
            Role::Admin => "Admin",
            Role::System => "System",
            Role::None => "Unassigned",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ── Role Assignment ──────────────────────────────────────────────────

/// One slot in a document's signing order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Opaque user identifier from the identity provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    /// The identity token the engine compares, case-insensitively
    pub email: EmailAddress,
    /// Display name for "waiting on X" messaging
    pub display_name: String,
    /// The role this slot acts as
    pub role: Role,
    /// 1-based position in the document's signing order
    pub signing_order: u32,
    /// Opaque handle into the e-signature provider; never interpreted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_reference: Option<String>,
}

impl RoleAssignment {
    pub fn new(
        role: Role,
        signing_order: u32,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: String::new(),
            email: EmailAddress::new(email),
            display_name: display_name.into(),
            role,
            signing_order,
            signing_reference: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_signing_reference(mut self, reference: impl Into<String>) -> Self {
        self.signing_reference = Some(reference.into());
        self
    }
}

// ── Assignee ─────────────────────────────────────────────────────────

/// The party a derived workflow step points at.
///
/// Steps mapped from a role assignment carry that assignment's identity.
/// Synthesized steps fall back to a bare role when no assignment of that
/// role exists, and completed documents point at [`Role::System`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// The role expected to act
    pub role: Role,
    /// Identity of the expected actor, when one is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,
    /// Display name of the expected actor, when one is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Assignee {
    /// The terminal assignee of a completed document
    pub fn system() -> Self {
        Self {
            role: Role::System,
            email: None,
            display_name: None,
        }
    }

    /// An assignee known only by role, with no bound identity
    pub fn role_only(role: Role) -> Self {
        Self {
            role,
            email: None,
            display_name: None,
        }
    }

    /// The assignee for a concrete role assignment
    pub fn from_assignment(assignment: &RoleAssignment) -> Self {
        Self {
            role: assignment.role,
            email: Some(assignment.email.clone()),
            display_name: Some(assignment.display_name.clone()),
        }
    }

    /// Whether this assignee is the given identity (case-insensitive)
    pub fn is_email(&self, email: &EmailAddress) -> bool {
        self.email.as_ref() == Some(email)
    }

    /// Label for "waiting on X" messaging: display name, else email,
    /// else the bare role
    pub fn label(&self) -> String {
        if let Some(name) = &self.display_name {
            if !name.is_empty() {
                return name.clone();
            }
        }
        if let Some(email) = &self.email {
            return email.as_str().to_string();
        }
        self.role.label().to_string()
    }
}
