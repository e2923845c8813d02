//! Identifiers and identity tokens
//!
//! Documents and groups are addressed by opaque string newtypes. Emails
//! are the identity token of the workflow: equality is case-insensitive
//! because upstream identity providers deliver inconsistent casing, but
//! the original spelling is preserved for display.

use serde::{Deserialize, Serialize};

// ── Document Identifier ──────────────────────────────────────────────

/// Unique identifier for a deal document
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Group Identifier ─────────────────────────────────────────────────

/// Name of a document group, e.g. "mortgage" or "closing"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Email Address ────────────────────────────────────────────────────

/// An email address used as an opaque identity token.
///
/// The workflow never authenticates anyone; comparing emails is the only
/// identity operation it performs. Equality and hashing are ASCII
/// case-insensitive, the stored spelling is whatever arrived first.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for EmailAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for EmailAddress {}

impl std::hash::Hash for EmailAddress {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Must agree with the case-insensitive Eq
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_document_id_generate_unique() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_document_id_short() {
        let id = DocumentId::new("abcdefghijklmnop");
        assert_eq!(id.short(), "abcdefgh");

        let tiny = DocumentId::new("abc");
        assert_eq!(tiny.short(), "abc");
    }

    #[test]
    fn test_group_id_display() {
        let group = GroupId::new("mortgage");
        assert_eq!(group.to_string(), "mortgage");
    }

    #[test]
    fn test_email_equality_ignores_case() {
        let a = EmailAddress::new("Buyer@Example.com");
        let b = EmailAddress::new("buyer@example.COM");
        assert_eq!(a, b);

        let c = EmailAddress::new("other@example.com");
        assert_ne!(a, c);
    }

    #[test]
    fn test_email_hash_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(EmailAddress::new("Buyer@Example.com"));
        assert!(set.contains(&EmailAddress::new("buyer@example.com")));
        assert!(!set.contains(&EmailAddress::new("broker@example.com")));
    }

    #[test]
    fn test_email_display_preserves_original_spelling() {
        let email = EmailAddress::new("Buyer@Example.com");
        assert_eq!(email.to_string(), "Buyer@Example.com");
        assert_eq!(email.as_str(), "Buyer@Example.com");
    }

    #[test]
    fn test_email_serde_transparent() {
        let email = EmailAddress::new("buyer@example.com");
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"buyer@example.com\"");

        let back: EmailAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, email);
    }
}
