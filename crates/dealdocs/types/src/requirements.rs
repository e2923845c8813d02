//! Workflow requirement flags
//!
//! The flags are the source of truth for what a document's workflow
//! demands. Role assignments supply identity and ordering for the flags
//! that are set; an assignment whose role has no applicable flag is
//! skipped when steps are derived.

use serde::{Deserialize, Serialize};

/// Per-document workflow requirements, each independently settable.
///
/// `upload` and `electronic_signature` are mutually exclusive signature
/// channels in stored state: a document is either signed on paper and
/// uploaded, or signed electronically in-app. Electronic signing implies
/// the provider already holds the file, so no upload step is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRequirements {
    /// The buyer's lawyer must approve
    pub buyer_lawyer_approval: bool,
    /// The buyer must sign
    pub buyer_signature: bool,
    /// The broker must approve
    pub broker_approval: bool,
    /// The broker must sign
    pub broker_signature: bool,
    /// The document must be prepared before anything else
    pub prepare: bool,
    /// The unsigned document must be uploaded before signing
    pub upload: bool,
    /// Signatures are collected electronically in-app
    pub electronic_signature: bool,
}

impl WorkflowRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buyer_lawyer_approval(mut self) -> Self {
        self.buyer_lawyer_approval = true;
        self
    }

    pub fn with_buyer_signature(mut self) -> Self {
        self.buyer_signature = true;
        self
    }

    pub fn with_broker_approval(mut self) -> Self {
        self.broker_approval = true;
        self
    }

    pub fn with_broker_signature(mut self) -> Self {
        self.broker_signature = true;
        self
    }

    pub fn with_prepare(mut self) -> Self {
        self.prepare = true;
        self
    }

    /// Require a physical upload; clears the electronic channel
    pub fn with_upload(mut self) -> Self {
        self.set_upload(true);
        self
    }

    /// Collect signatures electronically; clears the upload channel
    pub fn electronic(mut self) -> Self {
        self.set_electronic_signature(true);
        self
    }

    /// Set the upload flag; setting it clears `electronic_signature`
    pub fn set_upload(&mut self, value: bool) {
        self.upload = value;
        if value {
            self.electronic_signature = false;
        }
    }

    /// Set electronic signing; setting it clears `upload`
    pub fn set_electronic_signature(&mut self, value: bool) {
        self.electronic_signature = value;
        if value {
            self.upload = false;
        }
    }

    /// Whether any signature is required at all
    pub fn has_signature_step(&self) -> bool {
        self.buyer_signature || self.broker_signature
    }

    /// Whether no flag is set; such a document is trivially complete
    pub fn is_trivial(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the signature channels are mutually exclusive as stored
    pub fn channels_consistent(&self) -> bool {
        !(self.upload && self.electronic_signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_trivial() {
        let requirements = WorkflowRequirements::new();
        assert!(requirements.is_trivial());
        assert!(!requirements.has_signature_step());
        assert!(requirements.channels_consistent());
    }

    #[test]
    fn test_builders_set_flags() {
        let requirements = WorkflowRequirements::new()
            .with_buyer_lawyer_approval()
            .with_buyer_signature()
            .with_prepare();
        assert!(requirements.buyer_lawyer_approval);
        assert!(requirements.buyer_signature);
        assert!(requirements.prepare);
        assert!(!requirements.broker_approval);
        assert!(requirements.has_signature_step());
        assert!(!requirements.is_trivial());
    }

    #[test]
    fn test_electronic_clears_upload() {
        let requirements = WorkflowRequirements::new().with_upload().electronic();
        assert!(requirements.electronic_signature);
        assert!(!requirements.upload);
        assert!(requirements.channels_consistent());
    }

    #[test]
    fn test_upload_clears_electronic() {
        let mut requirements = WorkflowRequirements::new().electronic();
        requirements.set_upload(true);
        assert!(requirements.upload);
        assert!(!requirements.electronic_signature);
    }

    #[test]
    fn test_clearing_one_channel_leaves_the_other() {
        let mut requirements = WorkflowRequirements::new().with_upload();
        requirements.set_electronic_signature(false);
        assert!(requirements.upload);
        assert!(!requirements.electronic_signature);
    }
}
