//! A patient-level C-FIND with two matches streams both as pending
//! answers, in order, before the final success status.

mod support;

use std::sync::Arc;

use dicom_core::{dicom_value, DataElement, VR};
use dicom_dictionary_std::tags;
use dicom_gateway::client::{ResourceLevel, ScuClient};
use dicom_gateway::find_answers::FindAnswers;
use dicom_gateway::handlers::{self, FindProvider, HandlerTable};
use dicom_gateway::Policy;
use dicom_object::InMemDicomObject;

struct TwoPatientsFind;

impl FindProvider for TwoPatientsFind {
    fn on_find(
        &self,
        _calling_ae_title: &str,
        _sop_class_uid: &str,
        _query: &InMemDicomObject,
    ) -> handlers::Result<FindAnswers> {
        let mut answers = FindAnswers::new(false);
        for patient_id in ["P1", "P2"] {
            let mut dataset = InMemDicomObject::new_empty();
            dataset.put(DataElement::new(
                tags::PATIENT_ID,
                VR::LO,
                dicom_value!(patient_id.to_string()),
            ));
            answers.add_from_parsed(dataset, Some("PATIENT"));
        }
        answers.set_complete(true);
        Ok(answers)
    }
}

#[test]
fn find_streams_two_answers_then_a_final_success() {
    let mut policy = Policy::new();
    policy.allow_find();

    let handlers = HandlerTable::new()
        .with_ae_title(support::SERVER_AE_TITLE)
        .with_find(Arc::new(TwoPatientsFind));

    let (supervisor, port) = support::start_server(policy, handlers);

    let mut client = ScuClient::new(support::CLIENT_AE_TITLE, support::server_remote(port));
    let mut query = InMemDicomObject::new_empty();
    query.put(DataElement::new(
        tags::PATIENT_ID,
        VR::LO,
        dicom_value!(String::new()),
    ));

    let answers = client
        .find(ResourceLevel::Patient, query)
        .expect("find should succeed");
    assert!(answers.is_complete());
    assert_eq!(answers.size(), 2);
    assert_eq!(
        answers
            .get(0)
            .unwrap()
            .get(tags::PATIENT_ID)
            .unwrap()
            .to_str()
            .unwrap(),
        "P1"
    );
    assert_eq!(
        answers
            .get(1)
            .unwrap()
            .get(tags::PATIENT_ID)
            .unwrap()
            .to_str()
            .unwrap(),
        "P2"
    );

    supervisor.stop();
}
