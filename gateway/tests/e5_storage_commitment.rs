//! Storage commitment: a transaction UID that doesn't look like a UI root
//! is rejected locally before any association is attempted; a well-formed
//! request against a cooperating peer round-trips through the dispatcher's
//! tracker.

mod support;

use std::sync::Arc;

use dicom_gateway::client::ScuClient;
use dicom_gateway::commitment::{MemoryCommitmentTracker, StorageCommitmentTracker};
use dicom_gateway::handlers::{self, ActionProvider, HandlerTable};
use dicom_gateway::Policy;
use dicom_object::InMemDicomObject;

struct AcceptingAction;

impl ActionProvider for AcceptingAction {
    fn on_n_action(
        &self,
        _calling_ae_title: &str,
        _sop_class_uid: &str,
        _sop_instance_uid: &str,
        _action_type_id: u16,
        _dataset: &InMemDicomObject,
    ) -> handlers::Result<u16> {
        Ok(handlers::status::SUCCESS)
    }
}

#[test]
fn request_storage_commitment_rejects_a_non_oid_transaction_uid_without_a_server() {
    let mut client = ScuClient::new(
        support::CLIENT_AE_TITLE,
        support::server_remote(1), // never dialed; validation happens first
    );
    let result = client.request_storage_commitment(
        "1.2.3",
        &[("1.2.840.10008.5.1.4.1.1.2".to_string(), "1.2.3.4".to_string())],
    );
    assert!(matches!(
        result,
        Err(dicom_gateway::error::Error::ParameterOutOfRange { .. })
    ));
}

#[test]
fn request_storage_commitment_succeeds_and_is_recorded_by_the_tracker() {
    let mut policy = Policy::new();
    policy.storage_commitment_dual_role = true;

    let tracker = Arc::new(MemoryCommitmentTracker::new());

    let handlers = HandlerTable::new()
        .with_ae_title(support::SERVER_AE_TITLE)
        .with_action(Arc::new(AcceptingAction))
        .with_commitment_tracker(tracker.clone());

    let (supervisor, port) = support::start_server(policy, handlers);

    let mut client = ScuClient::new(support::CLIENT_AE_TITLE, support::server_remote(port));
    let status = client
        .request_storage_commitment(
            "2.25.999",
            &[("1.2.840.10008.5.1.4.1.1.2".to_string(), "1.2.3.4".to_string())],
        )
        .expect("request against a cooperating peer should succeed");
    assert_eq!(status, 0);

    let record = tracker
        .lookup("2.25.999")
        .expect("the N-ACTION dispatch should have recorded the transaction");
    assert_eq!(
        record.pairs,
        vec![("1.2.840.10008.5.1.4.1.1.2".to_string(), "1.2.3.4".to_string())]
    );

    supervisor.stop();
}
