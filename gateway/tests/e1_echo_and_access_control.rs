//! Association-level access control: a C-ECHO succeeds against the
//! configured AE title, and is rejected outright when the called AE
//! title does not match.

mod support;

use std::sync::Arc;

use dicom_gateway::client::{Error as ClientError, ScuClient};
use dicom_gateway::handlers::{self, EchoProvider, HandlerTable, StoreProvider};
use dicom_gateway::model::RemoteModality;
use dicom_gateway::Policy;
use dicom_object::InMemDicomObject;
use dicom_ul::association::Error as AssociationError;
use dicom_ul::pdu::{AssociationRJServiceUserReason, AssociationRJSource};

struct AlwaysSucceedEcho;

impl EchoProvider for AlwaysSucceedEcho {
    fn on_echo(&self, _calling_ae_title: &str) -> u16 {
        handlers::status::SUCCESS
    }
}

struct NoopStore;

impl StoreProvider for NoopStore {
    fn on_store(
        &self,
        _calling_ae_title: &str,
        _sop_class_uid: &str,
        _sop_instance_uid: &str,
        _transfer_syntax_uid: &str,
        _dataset: &InMemDicomObject,
    ) -> handlers::Result<u16> {
        Ok(handlers::status::SUCCESS)
    }
}

#[test]
fn echo_succeeds_then_wrong_called_aet_is_rejected() {
    let mut policy = Policy::new();
    policy.allow_storage(dicom_dictionary_std::uids::CT_IMAGE_STORAGE);

    let handlers = HandlerTable::new()
        .with_ae_title(support::SERVER_AE_TITLE)
        .with_echo(Arc::new(AlwaysSucceedEcho))
        .with_store(Arc::new(NoopStore));

    let (supervisor, port) = support::start_server(policy, handlers);

    let mut client = ScuClient::new(support::CLIENT_AE_TITLE, support::server_remote(port));
    assert!(client.echo().expect("echo against the correct called AET should succeed"));
    client.close();

    let wrong_called_aet = RemoteModality::new("WRONG", "127.0.0.1", port).unwrap();
    let mut client = ScuClient::new(support::CLIENT_AE_TITLE, wrong_called_aet);
    match client.echo() {
        Err(ClientError::Establish {
            source: AssociationError::Rejected { association_rj },
            ..
        }) => {
            assert_eq!(
                association_rj.source,
                AssociationRJSource::ServiceUser(AssociationRJServiceUserReason::CalledAETitleNotRecognized)
            );
        }
        other => panic!("expected a called-AET-title rejection, got {:?}", other),
    }

    supervisor.stop();
}
