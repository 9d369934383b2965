//! A modality worklist query strips `SOPInstanceUID`/
//! `MediaStorageSOPInstanceUID` from its single answer, since worklist
//! items identify a scheduled procedure step, not an existing instance.

mod support;

use std::sync::Arc;

use dicom_core::{dicom_value, DataElement, VR};
use dicom_dictionary_std::{tags, uids};
use dicom_gateway::client::ScuClient;
use dicom_gateway::find_answers::FindAnswers;
use dicom_gateway::handlers::{self, FindProvider, HandlerTable};
use dicom_gateway::Policy;
use dicom_object::InMemDicomObject;

struct OneWorklistItem;

impl FindProvider for OneWorklistItem {
    fn on_find(
        &self,
        _calling_ae_title: &str,
        sop_class_uid: &str,
        _query: &InMemDicomObject,
    ) -> handlers::Result<FindAnswers> {
        let worklist = sop_class_uid == uids::MODALITY_WORKLIST_INFORMATION_MODEL_FIND;
        let mut answers = FindAnswers::new(worklist);
        let mut dataset = InMemDicomObject::new_empty();
        dataset.put(DataElement::new(
            tags::SOP_INSTANCE_UID,
            VR::UI,
            dicom_value!("1.2.3".to_string()),
        ));
        dataset.put(DataElement::new(
            tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
            VR::UI,
            dicom_value!("1.2.3".to_string()),
        ));
        answers.add_from_parsed(dataset, None);
        answers.set_complete(true);
        Ok(answers)
    }
}

#[test]
fn worklist_find_strips_instance_uids_from_its_answer() {
    let mut policy = Policy::new();
    policy.allow_worklist();

    let handlers = HandlerTable::new()
        .with_ae_title(support::SERVER_AE_TITLE)
        .with_find(Arc::new(OneWorklistItem));

    let (supervisor, port) = support::start_server(policy, handlers);

    let mut client = ScuClient::new(support::CLIENT_AE_TITLE, support::server_remote(port));
    let query = InMemDicomObject::new_empty();

    let answers = client
        .find_worklist(query)
        .expect("worklist find should succeed");
    assert_eq!(answers.size(), 1);
    let answer = answers.get(0).unwrap();
    assert!(answer.get(tags::SOP_INSTANCE_UID).is_none());
    assert!(answer.get(tags::MEDIA_STORAGE_SOP_INSTANCE_UID).is_none());

    supervisor.stop();
}
