//! A remote modality's manufacturer quirk reshapes the C-FIND identifier
//! before it ever reaches the wire: `GenericNoUniversalWildcard` blanks a
//! literal `"*"` wildcard, and `GE` fills in a missing level identifier
//! with one instead of leaving it empty.

mod support;

use std::sync::{Arc, Mutex};

use dicom_core::{dicom_value, DataElement, VR};
use dicom_dictionary_std::tags;
use dicom_gateway::client::{ResourceLevel, ScuClient};
use dicom_gateway::find_answers::FindAnswers;
use dicom_gateway::handlers::{self, FindProvider, HandlerTable};
use dicom_gateway::model::{ManufacturerQuirk, RemoteModality};
use dicom_gateway::Policy;
use dicom_object::InMemDicomObject;

struct CapturingFind {
    captured: Mutex<Option<InMemDicomObject>>,
}

impl FindProvider for CapturingFind {
    fn on_find(
        &self,
        _calling_ae_title: &str,
        _sop_class_uid: &str,
        query: &InMemDicomObject,
    ) -> handlers::Result<FindAnswers> {
        *self.captured.lock().expect("lock poisoned") = Some(query.clone());
        let mut answers = FindAnswers::new(false);
        answers.set_complete(true);
        Ok(answers)
    }
}

fn start_capturing_server() -> (dicom_gateway::ServerSupervisor, u16, Arc<CapturingFind>) {
    let mut policy = Policy::new();
    policy.allow_find();

    let find = Arc::new(CapturingFind {
        captured: Mutex::new(None),
    });

    let handlers = HandlerTable::new()
        .with_ae_title(support::SERVER_AE_TITLE)
        .with_find(find.clone());

    let (supervisor, port) = support::start_server(policy, handlers);
    (supervisor, port, find)
}

#[test]
fn generic_no_universal_wildcard_blanks_a_literal_wildcard() {
    let (supervisor, port, find) = start_capturing_server();

    let remote = RemoteModality::new(support::SERVER_AE_TITLE, "127.0.0.1", port)
        .unwrap()
        .with_manufacturer(ManufacturerQuirk::GenericNoUniversalWildcard);
    let mut client = ScuClient::new(support::CLIENT_AE_TITLE, remote);

    let mut query = InMemDicomObject::new_empty();
    query.put(DataElement::new(
        tags::PATIENT_NAME,
        VR::PN,
        dicom_value!("*".to_string()),
    ));
    client
        .find(ResourceLevel::Patient, query)
        .expect("find should succeed");

    let captured = find.captured.lock().expect("lock poisoned");
    let captured = captured.as_ref().expect("on_find should have been called");
    assert_eq!(
        captured.get(tags::PATIENT_NAME).unwrap().to_str().unwrap(),
        ""
    );

    supervisor.stop();
}

#[test]
fn ge_fills_a_missing_level_identifier_with_a_wildcard() {
    let (supervisor, port, find) = start_capturing_server();

    let remote = RemoteModality::new(support::SERVER_AE_TITLE, "127.0.0.1", port)
        .unwrap()
        .with_manufacturer(ManufacturerQuirk::GE);
    let mut client = ScuClient::new(support::CLIENT_AE_TITLE, remote);

    // No StudyInstanceUID supplied at study level.
    let query = InMemDicomObject::new_empty();
    client
        .find(ResourceLevel::Study, query)
        .expect("find should succeed");

    let captured = find.captured.lock().expect("lock poisoned");
    let captured = captured.as_ref().expect("on_find should have been called");
    assert_eq!(
        captured
            .get(tags::STUDY_INSTANCE_UID)
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );

    supervisor.stop();
}
