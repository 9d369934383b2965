//! A C-STORE whose dataset declares a transfer syntax the client isn't
//! currently negotiated for forces the association closed and reopened
//! under the new preferred transfer syntax, transparently to the caller.

mod support;

use std::sync::{Arc, Mutex};

use dicom_core::{dicom_value, DataElement, VR};
use dicom_dictionary_std::{tags, uids};
use dicom_gateway::client::ScuClient;
use dicom_gateway::handlers::{self, HandlerTable, StoreProvider};
use dicom_gateway::Policy;
use dicom_object::InMemDicomObject;

const JPEG_BASELINE_PROCESS_1: &str = "1.2.840.10008.1.2.4.50";
const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

struct RecordingStore {
    received: Mutex<Vec<String>>,
}

impl StoreProvider for RecordingStore {
    fn on_store(
        &self,
        _calling_ae_title: &str,
        _sop_class_uid: &str,
        sop_instance_uid: &str,
        _transfer_syntax_uid: &str,
        _dataset: &InMemDicomObject,
    ) -> handlers::Result<u16> {
        self.received
            .lock()
            .expect("lock poisoned")
            .push(sop_instance_uid.to_string());
        Ok(handlers::status::SUCCESS)
    }
}

fn dataset_for(sop_instance_uid: &str, transfer_syntax: &str) -> InMemDicomObject {
    let mut dataset = InMemDicomObject::new_empty();
    dataset.put(DataElement::new(
        tags::SOP_CLASS_UID,
        VR::UI,
        dicom_value!(uids::CT_IMAGE_STORAGE.to_string()),
    ));
    dataset.put(DataElement::new(
        tags::SOP_INSTANCE_UID,
        VR::UI,
        dicom_value!(sop_instance_uid.to_string()),
    ));
    dataset.put(DataElement::new(
        tags::TRANSFER_SYNTAX_UID,
        VR::UI,
        dicom_value!(transfer_syntax.to_string()),
    ));
    dataset
}

#[test]
fn store_renegotiates_when_the_dataset_transfer_syntax_changes() {
    let mut policy = Policy::new();
    policy.allow_storage(uids::CT_IMAGE_STORAGE);
    policy
        .storage_transfer_syntaxes
        .push(JPEG_BASELINE_PROCESS_1.to_string());

    let store = Arc::new(RecordingStore {
        received: Mutex::new(Vec::new()),
    });

    let handlers = HandlerTable::new()
        .with_ae_title(support::SERVER_AE_TITLE)
        .with_store(store.clone());

    let (supervisor, port) = support::start_server(policy, handlers);

    let mut client = ScuClient::new(support::CLIENT_AE_TITLE, support::server_remote(port));

    // Starts out negotiating the implicit VR little endian default; this
    // instance declares JPEG Baseline Process 1, which is not codec-free,
    // forcing the client to close and reopen under that transfer syntax.
    let jpeg_instance = dataset_for("1.2.3.1", JPEG_BASELINE_PROCESS_1);
    let status = client
        .store(&jpeg_instance, None)
        .expect("store of the JPEG-declared instance should succeed");
    assert_eq!(status, 0);

    // A second instance declaring explicit VR little endian is itself
    // codec-free but differs from the now-preferred JPEG syntax, so the
    // client renegotiates again.
    let explicit_instance = dataset_for("1.2.3.2", EXPLICIT_VR_LITTLE_ENDIAN);
    let status = client
        .store(&explicit_instance, None)
        .expect("store of the explicit VR instance should succeed");
    assert_eq!(status, 0);

    assert_eq!(
        *store.received.lock().expect("lock poisoned"),
        vec!["1.2.3.1".to_string(), "1.2.3.2".to_string()]
    );

    supervisor.stop();
}
