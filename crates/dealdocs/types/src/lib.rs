//! # Deal Document Domain Types
//!
//! Core types for the deal document workflow: documents as **workflow
//! subjects** carrying static requirements, ordered role assignments,
//! and an append-only history of everything done to them.
//!
//! ## Core Principles
//!
//! 1. **History is append-only**: entries are added, never edited or
//!    deleted; removal of a document is a tombstone, not an erasure
//! 2. **Derived state is never stored**: next action, completion, group
//!    progress, and queues are recomputed from history on every read
//! 3. **Flags are the source of truth**: requirement flags decide what a
//!    workflow demands; assignments only supply identity and ordering
//! 4. **Identity is an opaque token**: actors are compared by email,
//!    case-insensitively, and never authenticated here
//!
//! ## Module Organization
//!
//! - [`ids`]: document and group identifiers, email identity tokens
//! - [`role`]: roles, role assignments, derived assignees
//! - [`requirements`]: per-document workflow requirement flags
//! - [`action`]: action types and the append-only history
//! - [`document`]: the document record and its configuration rules
//! - [`state`]: derived per-document workflow state
//! - [`group`]: aggregate progress of a document group
//! - [`queue`]: per-viewer pending action queues
//! - [`errors`]: error types for the workflow layer

#![deny(unsafe_code)]

pub mod action;
pub mod document;
pub mod errors;
pub mod group;
pub mod ids;
pub mod queue;
pub mod requirements;
pub mod role;
pub mod state;

// Re-export commonly used types
pub use action::{ActionHistoryEntry, ActionType};
pub use document::Document;
pub use errors::{ConfigError, WorkflowError, WorkflowResult};
pub use group::{DocumentGroup, GroupStatus, GroupStep};
pub use ids::{DocumentId, EmailAddress, GroupId};
pub use queue::{BlockedAction, PendingAction, PendingActionView};
pub use requirements::WorkflowRequirements;
pub use role::{Assignee, Role, RoleAssignment};
pub use state::{DocumentState, WorkflowStep};
