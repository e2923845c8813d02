//! # Deal Document Workflow Engine
//!
//! Derives workflow state for deal documents from their append-only
//! action histories and hosts the one stateful component that accepts
//! commands against it.
//!
//! ## Key Principle
//!
//! **Derivation is pure; the store is the only stateful component.**
//! Next actions, completion, queues, and group progress are all
//! recomputed from (requirements, assignments, history) on every read.
//! Nothing derived is ever written back, so there is no cached status
//! to drift out of sync and no migration when derivation rules change.
//!
//! ## Architecture
//!
//! - [`ActionStateMachine`]: plans a document's step sequence and
//!   replays its history over the plan
//! - [`GroupAggregator`]: rolls member documents up into group progress
//! - [`QueueBuilder`]: splits outstanding work into one viewer's queue
//! - [`WorkflowStore`]: validates and applies commands, answers queries
//! - [`EventBus`]: broadcasts store events to subscribers
//!
//! ## Example
//!
//! ```rust
//! use dealdocs_engine::WorkflowStore;
//! use dealdocs_types::{
//!     ActionType, Document, EmailAddress, GroupId, Role, RoleAssignment,
//!     WorkflowRequirements,
//! };
//!
//! # fn main() -> dealdocs_types::WorkflowResult<()> {
//! let mut store = WorkflowStore::new();
//!
//! let document = Document::new("Purchase Agreement", GroupId::new("mortgage-123"))
//!     .with_requirements(WorkflowRequirements::new().with_buyer_signature().electronic())
//!     .with_assignment(RoleAssignment::new(
//!         Role::Buyer,
//!         1,
//!         "buyer@example.com",
//!         "Avery Buyer",
//!     ));
//! let id = store.add_document(document)?;
//!
//! let state = store.document_state(&id)?;
//! assert_eq!(state.next_action, ActionType::ESign);
//!
//! let signer = EmailAddress::new("buyer@example.com");
//! let state = store.record_action(&id, ActionType::ESign, &signer)?;
//! assert!(state.is_complete);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod aggregator;
pub mod events;
pub mod queue;
pub mod state_machine;
pub mod store;

pub use aggregator::GroupAggregator;
pub use events::{EventBus, EventBusStats, StoreEvent};
pub use queue::QueueBuilder;
pub use state_machine::ActionStateMachine;
pub use store::WorkflowStore;
