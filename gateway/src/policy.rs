//! Presentation-Context Negotiator (C3) and its policy (C2's companion).
//!
//! Implements the selection rule of the negotiation table: for each
//! proposed context, accept the highest-preference proposed transfer
//! syntax that also appears in the policy-allowed list for its abstract
//! syntax; refuse with the appropriate per-PS3.8 reason otherwise.

use std::collections::HashSet;
use std::sync::Arc;

use dicom_dictionary_std::uids;
use dicom_ul::pdu::{
    PresentationContextProposed, PresentationContextResult, PresentationContextResultReason,
};
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// no abstract syntax in the policy's known set and promiscuous mode
    /// is disabled
    #[snafu(display("abstract syntax `{}` is not recognized", abstract_syntax))]
    UnknownAbstractSyntax { abstract_syntax: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A request to filter out an entire transfer-syntax family
/// (e.g. JPEG-2000) from the storage transfer-syntax list, evaluated
/// per negotiating peer.
pub type TransferSyntaxFamilyFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Whether an unknown abstract syntax should be accepted promiscuously,
/// evaluated with the remote IP, remote AET and called AET.
pub type PromiscuousFilter = Arc<dyn Fn(&str, &str, &str) -> bool + Send + Sync>;

/// The negotiation policy consulted by [`negotiate`].
#[derive(Clone)]
pub struct Policy {
    /// Abstract syntaxes always accepted when proposed.
    pub known_abstract_syntaxes: HashSet<String>,
    /// Transfer syntaxes acceptable for storage SOP classes, in
    /// preference order (first element wins).
    pub storage_transfer_syntaxes: Vec<String>,
    /// The full list of storage SOP classes, each accepted with
    /// `storage_transfer_syntaxes`.
    pub storage_sop_classes: HashSet<String>,
    /// If set, StorageCommitmentPushModelSOPClass is accepted with
    /// SCU+SCP role.
    pub storage_commitment_dual_role: bool,
    /// Consulted for abstract syntaxes outside every other set.
    pub promiscuous_filter: Option<PromiscuousFilter>,
    /// Consulted to drop entire transfer-syntax families per negotiating
    /// peer.
    pub transfer_syntax_family_filter: Option<TransferSyntaxFamilyFilter>,
}

impl Default for Policy {
    fn default() -> Self {
        let mut known_abstract_syntaxes = HashSet::new();
        known_abstract_syntaxes.insert(uids::VERIFICATION.to_string());

        Policy {
            known_abstract_syntaxes,
            storage_transfer_syntaxes: vec![
                "1.2.840.10008.1.2.1".to_string(), // Explicit VR Little Endian
                "1.2.840.10008.1.2".to_string(),   // Implicit VR Little Endian
            ],
            storage_sop_classes: HashSet::new(),
            storage_commitment_dual_role: false,
            promiscuous_filter: None,
            transfer_syntax_family_filter: None,
        }
    }
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a find handler factory's abstract syntax as known
    /// (Patient/Study Root Query/Retrieve Find SOP classes).
    pub fn allow_find(&mut self) -> &mut Self {
        self.known_abstract_syntaxes
            .insert(uids::PATIENT_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_FIND.to_string());
        self.known_abstract_syntaxes
            .insert(uids::STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_FIND.to_string());
        self
    }

    /// Register a move handler factory's abstract syntax as known
    /// (Patient/Study Root Query/Retrieve Move SOP classes).
    pub fn allow_move(&mut self) -> &mut Self {
        self.known_abstract_syntaxes
            .insert(uids::PATIENT_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_MOVE.to_string());
        self.known_abstract_syntaxes
            .insert(uids::STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_MOVE.to_string());
        self
    }

    /// Register the modality worklist abstract syntax as known.
    pub fn allow_worklist(&mut self) -> &mut Self {
        self.known_abstract_syntaxes
            .insert(uids::MODALITY_WORKLIST_INFORMATION_MODEL_FIND.to_string());
        self
    }

    /// Register a storage SOP class, accepted with
    /// `storage_transfer_syntaxes`.
    pub fn allow_storage(&mut self, sop_class_uid: impl Into<String>) -> &mut Self {
        self.storage_sop_classes.insert(sop_class_uid.into());
        self
    }

    fn allowed_transfer_syntaxes_for(&self, abstract_syntax: &str, peer: PeerContext) -> Option<Vec<String>> {
        if abstract_syntax == uids::VERIFICATION {
            // C-ECHO never carries a dataset; any of the generic syntaxes suffice.
            return Some(vec![
                "1.2.840.10008.1.2.1".to_string(),
                "1.2.840.10008.1.2".to_string(),
            ]);
        }
        if abstract_syntax == uids::STORAGE_COMMITMENT_PUSH_MODEL && self.storage_commitment_dual_role {
            return Some(vec![
                "1.2.840.10008.1.2.1".to_string(),
                "1.2.840.10008.1.2".to_string(),
            ]);
        }
        if self.known_abstract_syntaxes.contains(abstract_syntax) {
            return Some(vec![
                "1.2.840.10008.1.2.1".to_string(),
                "1.2.840.10008.1.2".to_string(),
            ]);
        }
        if self.storage_sop_classes.contains(abstract_syntax) {
            return Some(self.filtered_storage_transfer_syntaxes(peer));
        }
        if let Some(filter) = &self.promiscuous_filter {
            if filter(peer.remote_ip, peer.remote_aet, peer.called_aet) {
                return Some(self.filtered_storage_transfer_syntaxes(peer));
            }
        }
        None
    }

    fn filtered_storage_transfer_syntaxes(&self, peer: PeerContext) -> Vec<String> {
        match &self.transfer_syntax_family_filter {
            Some(filter) => self
                .storage_transfer_syntaxes
                .iter()
                .filter(|ts| filter(ts))
                .cloned()
                .collect(),
            None => {
                let _ = peer;
                self.storage_transfer_syntaxes.clone()
            }
        }
    }
}

/// The identifying context of the peer proposing an association, passed
/// to the promiscuous and transfer-syntax-family filters.
#[derive(Debug, Clone, Copy)]
pub struct PeerContext<'a> {
    pub remote_ip: &'a str,
    pub remote_aet: &'a str,
    pub called_aet: &'a str,
}

/// Negotiate every proposed presentation context against `policy`,
/// producing the corresponding accept/refuse results in proposal order.
///
/// Already-accepted contexts are never downgraded by a later rule: each
/// context is decided independently of the others.
pub fn negotiate(
    proposed: &[PresentationContextProposed],
    policy: &Policy,
    peer: PeerContext,
) -> Vec<PresentationContextResult> {
    proposed
        .iter()
        .map(|pc| negotiate_one(pc, policy, peer))
        .collect()
}

fn negotiate_one(
    pc: &PresentationContextProposed,
    policy: &Policy,
    peer: PeerContext,
) -> PresentationContextResult {
    let Some(allowed) = policy.allowed_transfer_syntaxes_for(&pc.abstract_syntax, peer) else {
        return PresentationContextResult {
            id: pc.id,
            reason: PresentationContextResultReason::AbstractSyntaxNotSupported,
            transfer_syntax: String::new(),
        };
    };

    // highest-preference transfer syntax in `allowed` that is also proposed
    let chosen = allowed
        .iter()
        .find(|ts| pc.transfer_syntaxes.iter().any(|proposed_ts| proposed_ts == *ts));

    match chosen {
        Some(ts) => PresentationContextResult {
            id: pc.id,
            reason: PresentationContextResultReason::Acceptance,
            transfer_syntax: ts.clone(),
        },
        None => PresentationContextResult {
            id: pc.id,
            reason: PresentationContextResultReason::TransferSyntaxesNotSupported,
            transfer_syntax: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer<'a>() -> PeerContext<'a> {
        PeerContext {
            remote_ip: "127.0.0.1",
            remote_aet: "CLIENT",
            called_aet: "SERVER",
        }
    }

    #[test]
    fn accepts_echo_with_preferred_syntax() {
        let policy = Policy::new();
        let proposed = vec![PresentationContextProposed {
            id: 1,
            abstract_syntax: uids::VERIFICATION.to_string(),
            transfer_syntaxes: vec![
                "1.2.840.10008.1.2".to_string(),
                "1.2.840.10008.1.2.1".to_string(),
            ],
        }];
        let results = negotiate(&proposed, &policy, peer());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].reason, PresentationContextResultReason::Acceptance);
        assert_eq!(results[0].transfer_syntax, "1.2.840.10008.1.2.1");
    }

    #[test]
    fn refuses_unknown_abstract_syntax_without_promiscuous_mode() {
        let policy = Policy::new();
        let proposed = vec![PresentationContextProposed {
            id: 1,
            abstract_syntax: "1.2.3.4.5".to_string(),
            transfer_syntaxes: vec!["1.2.840.10008.1.2".to_string()],
        }];
        let results = negotiate(&proposed, &policy, peer());
        assert_eq!(
            results[0].reason,
            PresentationContextResultReason::AbstractSyntaxNotSupported
        );
    }

    #[test]
    fn refuses_on_transfer_syntax_mismatch() {
        let mut policy = Policy::new();
        policy.allow_storage(dicom_dictionary_std::uids::CT_IMAGE_STORAGE);
        policy.storage_transfer_syntaxes = vec!["1.2.840.10008.1.2.1".to_string()];
        let proposed = vec![PresentationContextProposed {
            id: 1,
            abstract_syntax: dicom_dictionary_std::uids::CT_IMAGE_STORAGE.to_string(),
            transfer_syntaxes: vec!["1.2.840.10008.1.2.4.50".to_string()],
        }];
        let results = negotiate(&proposed, &policy, peer());
        assert_eq!(
            results[0].reason,
            PresentationContextResultReason::TransferSyntaxesNotSupported
        );
    }

    #[test]
    fn promiscuous_filter_accepts_unknown_abstract_syntax() {
        let mut policy = Policy::new();
        policy.promiscuous_filter = Some(Arc::new(|_ip, _aet, _called| true));
        let proposed = vec![PresentationContextProposed {
            id: 1,
            abstract_syntax: "1.2.3.4.5".to_string(),
            transfer_syntaxes: vec!["1.2.840.10008.1.2".to_string()],
        }];
        let results = negotiate(&proposed, &policy, peer());
        assert_eq!(results[0].reason, PresentationContextResultReason::Acceptance);
    }
}
