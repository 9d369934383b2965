//! DIMSE Service Handlers (C5).
//!
//! Grounded on the four request-handler-factory interfaces of
//! `Core/DicomNetworking/DicomServer.h`
//! (`IFindRequestHandlerFactory`, `IMoveRequestHandlerFactory`,
//! `IStoreRequestHandlerFactory`, `IWorklistRequestHandlerFactory`): one
//! provider trait per DIMSE service, a table of `Arc<dyn Provider>`
//! entries consulted by [`crate::dispatcher::run`], and a response built
//! from `dicom_ul::pdu::generated`'s command structs through their
//! `Command`/`DatasetRequiredCommand`/`DatasetConditionalCommand`/
//! `DatasetForbiddenCommand` trait methods.
//!
//! C-MOVE is the one service whose handler also acts as an SCU: fulfilling
//! it means opening a fresh association to the move destination and
//! issuing one C-STORE per matched instance, mirroring
//! `Core/DicomNetworking/DicomStoreUserConnection`'s role in Orthanc's own
//! move SCP.

use std::io::Cursor;
use std::sync::Arc;

use dicom_dictionary_std::uids;
use dicom_encoding::text::SpecificCharacterSet;
use dicom_encoding::TransferSyntax;
use dicom_object::InMemDicomObject;
use dicom_ul::pdu::commands::{DatasetConditionalCommand, DatasetForbiddenCommand};
use dicom_ul::pdu::generated::{
    CEchoRsp, CFindRsp, CMoveRsp, CStoreRsp, NActionRsp, NEventReportRsp,
};
use dicom_ul::pdu::Pdu;
use snafu::{OptionExt, ResultExt, Snafu};

use crate::client::ScuClient;
use crate::commitment::{
    StorageCommitmentOutcome, StorageCommitmentTracker, StorageCommitmentTransaction,
};
use crate::dispatcher::IncomingMessage;
use crate::find_answers::FindAnswers;
use crate::model::RemoteModalities;
use crate::wire;

/// DIMSE status codes used by the default handlers (PS3.7 Annex C).
pub mod status {
    pub const SUCCESS: u16 = 0x0000;
    pub const CANCEL: u16 = 0xFE00;
    pub const PENDING: u16 = 0xFF00;
    pub const UNABLE_TO_PROCESS: u16 = 0x0110;
    pub const REFUSED_NOT_AUTHORIZED: u16 = 0x0124;
    pub const NO_SUCH_OBJECT_INSTANCE: u16 = 0x0112;
    /// Move destination unknown (PS3.7 Annex C.4.2.1.5).
    pub const MOVE_DESTINATION_UNKNOWN: u16 = 0xA801;
    /// Sub-operations complete, one or more failures (PS3.7 Annex C.4.2.1.5).
    pub const SUBOPERATIONS_COMPLETE_WITH_FAILURES: u16 = 0xB000;
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("no handler registered for command field {:#06x}", command_field))]
    Unhandled { command_field: u16 },

    #[snafu(display("failed to decode request dataset: {}", source))]
    DecodeDataset { source: dicom_object::ReadError },

    #[snafu(display("request carried no dataset where one was required"))]
    MissingDataset,

    #[snafu(display("failed to encode response PDU: {}", source))]
    EncodePdu { source: Box<dicom_object::WriteError> },

    #[snafu(display("request command set is missing field {}", field))]
    MissingField { field: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The outcome of dispatching one incoming command: the PDUs to send back,
/// in order, plus whether the association should be torn down afterwards
/// (set for a received C-CANCEL-adjacent abort condition; ordinary
/// C-ECHO/C-FIND/C-STORE/C-MOVE/N-ACTION/N-EVENT-REPORT exchanges leave it
/// `false`).
pub struct DispatchResponse {
    pub pdus: Vec<Pdu>,
    pub release: bool,
}

impl DispatchResponse {
    fn single(pdu: Pdu) -> Self {
        DispatchResponse {
            pdus: vec![pdu],
            release: false,
        }
    }
}

/// A verification (C-ECHO) request handler. The default table installs one
/// that always answers Success; tests and alternative deployments can
/// substitute their own to simulate failures.
pub trait EchoProvider: Send + Sync {
    fn on_echo(&self, calling_ae_title: &str) -> u16;
}

/// A query (C-FIND) request handler, producing a [`FindAnswers`] container
/// for the dispatcher to stream back one response PDU per answer.
pub trait FindProvider: Send + Sync {
    fn on_find(
        &self,
        calling_ae_title: &str,
        sop_class_uid: &str,
        query: &InMemDicomObject,
    ) -> Result<FindAnswers>;
}

/// A retrieve (C-MOVE) request handler. Returns the full datasets (ready to
/// store, complete with file meta) of the instances matched by `query`;
/// `dispatch_move` opens its own association to the destination and
/// performs the C-STORE sub-operations.
pub trait MoveProvider: Send + Sync {
    fn on_move(
        &self,
        calling_ae_title: &str,
        move_destination: &str,
        sop_class_uid: &str,
        query: &InMemDicomObject,
    ) -> Result<FindAnswers>;
}

/// A storage (C-STORE) request handler. `transfer_syntax_uid` is the
/// transfer syntax actually negotiated for the presentation context the
/// instance arrived on, since `dataset` itself (a plain in-memory object,
/// not a loaded file) carries no meta group to recover it from.
pub trait StoreProvider: Send + Sync {
    fn on_store(
        &self,
        calling_ae_title: &str,
        sop_class_uid: &str,
        sop_instance_uid: &str,
        transfer_syntax_uid: &str,
        dataset: &InMemDicomObject,
    ) -> Result<u16>;
}

/// A storage commitment N-ACTION request handler.
pub trait ActionProvider: Send + Sync {
    fn on_n_action(
        &self,
        calling_ae_title: &str,
        sop_class_uid: &str,
        sop_instance_uid: &str,
        action_type_id: u16,
        dataset: &InMemDicomObject,
    ) -> Result<u16>;
}

/// A storage commitment N-EVENT-REPORT request handler (used by a
/// dual-role gateway acting as the SCU side of storage commitment, to
/// accept the remote peer's delayed report).
pub trait EventReportProvider: Send + Sync {
    fn on_n_event_report(
        &self,
        calling_ae_title: &str,
        sop_instance_uid: &str,
        event_type_id: u16,
        dataset: &InMemDicomObject,
        outcome: StorageCommitmentOutcome,
    ) -> Result<u16>;
}

/// The set of service providers consulted by the dispatch loop, one slot
/// per DIMSE service this gateway answers. A slot left `None` causes
/// requests for that service to be refused with
/// [`Error::Unhandled`].
#[derive(Clone, Default)]
pub struct HandlerTable {
    pub echo: Option<Arc<dyn EchoProvider>>,
    pub find: Option<Arc<dyn FindProvider>>,
    pub r#move: Option<Arc<dyn MoveProvider>>,
    pub store: Option<Arc<dyn StoreProvider>>,
    pub action: Option<Arc<dyn ActionProvider>>,
    pub event_report: Option<Arc<dyn EventReportProvider>>,
    /// This gateway's own AE title, used as the move originator when
    /// fanning out C-MOVE sub-operations.
    pub ae_title: String,
    /// The directory consulted to resolve a C-MOVE `MoveDestination` AET
    /// into host/port. Without one, every C-MOVE fails with
    /// [`status::MOVE_DESTINATION_UNKNOWN`].
    pub remote_modalities: Option<Arc<dyn RemoteModalities>>,
    /// Storage commitment bookkeeping, consulted by the N-ACTION and
    /// N-EVENT-REPORT handlers.
    pub commitment_tracker: Option<Arc<dyn StorageCommitmentTracker>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_echo(mut self, provider: Arc<dyn EchoProvider>) -> Self {
        self.echo = Some(provider);
        self
    }

    pub fn with_find(mut self, provider: Arc<dyn FindProvider>) -> Self {
        self.find = Some(provider);
        self
    }

    pub fn with_move(mut self, provider: Arc<dyn MoveProvider>) -> Self {
        self.r#move = Some(provider);
        self
    }

    pub fn with_store(mut self, provider: Arc<dyn StoreProvider>) -> Self {
        self.store = Some(provider);
        self
    }

    pub fn with_action(mut self, provider: Arc<dyn ActionProvider>) -> Self {
        self.action = Some(provider);
        self
    }

    pub fn with_event_report(mut self, provider: Arc<dyn EventReportProvider>) -> Self {
        self.event_report = Some(provider);
        self
    }

    pub fn with_ae_title(mut self, ae_title: impl Into<String>) -> Self {
        self.ae_title = ae_title.into();
        self
    }

    pub fn with_remote_modalities(mut self, directory: Arc<dyn RemoteModalities>) -> Self {
        self.remote_modalities = Some(directory);
        self
    }

    pub fn with_commitment_tracker(mut self, tracker: Arc<dyn StorageCommitmentTracker>) -> Self {
        self.commitment_tracker = Some(tracker);
        self
    }

    pub fn dispatch(
        &self,
        command_field: u16,
        message: &IncomingMessage,
        calling_ae_title: &str,
        ts: &TransferSyntax,
    ) -> Result<DispatchResponse> {
        use dicom_ul::pdu::commands::CommandField as F;

        match command_field {
            f if f == F::C_ECHO_RQ as u16 => self.dispatch_echo(message, calling_ae_title),
            f if f == F::C_FIND_RQ as u16 => self.dispatch_find(message, calling_ae_title, ts),
            f if f == F::C_MOVE_RQ as u16 => self.dispatch_move(message, calling_ae_title, ts),
            f if f == F::C_STORE_RQ as u16 => self.dispatch_store(message, calling_ae_title, ts),
            f if f == F::N_ACTION_RQ as u16 => self.dispatch_n_action(message, calling_ae_title, ts),
            f if f == F::N_EVENT_REPORT_RQ as u16 => {
                self.dispatch_n_event_report(message, calling_ae_title, ts)
            }
            other => UnhandledSnafu {
                command_field: other,
            }
            .fail(),
        }
    }

    fn dispatch_echo(&self, message: &IncomingMessage, calling_ae_title: &str) -> Result<DispatchResponse> {
        let message_id = wire::get_u16(&message.command, dicom_dictionary_std::tags::MESSAGE_ID)
            .context(MissingFieldSnafu { field: "MessageID" })?;
        let sop_class_uid = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::AFFECTED_SOP_CLASS_UID,
        );

        let status = self
            .echo
            .as_ref()
            .map(|p| p.on_echo(calling_ae_title))
            .unwrap_or(status::UNABLE_TO_PROCESS);

        let rsp = CEchoRsp::builder()
            .message_id_being_responded_to(message_id)
            .status(status)
            .maybe_affected_sop_class_uid(sop_class_uid.as_deref())
            .build();
        let pdu = DatasetForbiddenCommand::pdu(&rsp, message.presentation_context_id)
            .map_err(|source| Error::EncodePdu { source })?;
        Ok(DispatchResponse::single(pdu))
    }

    fn dispatch_find(
        &self,
        message: &IncomingMessage,
        calling_ae_title: &str,
        ts: &TransferSyntax,
    ) -> Result<DispatchResponse> {
        let message_id = wire::get_u16(&message.command, dicom_dictionary_std::tags::MESSAGE_ID)
            .context(MissingFieldSnafu { field: "MessageID" })?;
        let sop_class_uid = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::AFFECTED_SOP_CLASS_UID,
        )
        .context(MissingFieldSnafu {
            field: "AffectedSOPClassUID",
        })?;
        let query = decode_request_dataset(message, ts)?;

        let Some(provider) = self.find.as_ref() else {
            return Ok(DispatchResponse::single(final_find_rsp(
                message_id,
                &sop_class_uid,
                status::REFUSED_NOT_AUTHORIZED,
                message.presentation_context_id,
            )?));
        };
        let answers = provider.on_find(calling_ae_title, &sop_class_uid, &query)?;

        let mut pdus = Vec::with_capacity(answers.size() + 1);
        for index in 0..answers.size() {
            let dataset = answers
                .extract_dataset_for_emission(index)
                .expect("index within bounds");
            let rsp = CFindRsp::builder()
                .message_id_being_responded_to(message_id)
                .affected_sop_class_uid(sop_class_uid.as_str())
                .status(status::PENDING)
                .build();
            pdus.push(
                DatasetConditionalCommand::pdu_with_dataset(
                    &rsp,
                    message.presentation_context_id,
                    dataset,
                    ts,
                )
                .map_err(|source| Error::EncodePdu { source })?,
            );
        }
        pdus.push(final_find_rsp(
            message_id,
            &sop_class_uid,
            status::SUCCESS,
            message.presentation_context_id,
        )?);
        Ok(DispatchResponse {
            pdus,
            release: false,
        })
    }

    /// Resolve the move destination, run one `on_move` query to find the
    /// matching instances, then open a fresh SCU association to the
    /// destination and tunnel one C-STORE sub-operation per instance,
    /// streaming a Pending C-MOVE-RSP after each before the final status.
    fn dispatch_move(
        &self,
        message: &IncomingMessage,
        calling_ae_title: &str,
        ts: &TransferSyntax,
    ) -> Result<DispatchResponse> {
        let message_id = wire::get_u16(&message.command, dicom_dictionary_std::tags::MESSAGE_ID)
            .context(MissingFieldSnafu { field: "MessageID" })?;
        let sop_class_uid = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::AFFECTED_SOP_CLASS_UID,
        )
        .context(MissingFieldSnafu {
            field: "AffectedSOPClassUID",
        })?;
        let move_destination = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::MOVE_DESTINATION,
        )
        .context(MissingFieldSnafu {
            field: "MoveDestination",
        })?;
        let query = decode_request_dataset(message, ts)?;

        let Some(provider) = self.r#move.as_ref() else {
            return Ok(DispatchResponse::single(final_move_rsp(
                message_id,
                status::REFUSED_NOT_AUTHORIZED,
                0,
                0,
                0,
                message.presentation_context_id,
            )?));
        };
        let answers = provider.on_move(calling_ae_title, &move_destination, &sop_class_uid, &query)?;

        let Some(directory) = self.remote_modalities.as_ref() else {
            return Ok(DispatchResponse::single(final_move_rsp(
                message_id,
                status::MOVE_DESTINATION_UNKNOWN,
                0,
                0,
                0,
                message.presentation_context_id,
            )?));
        };
        let Some(destination) = directory.lookup_aet(&move_destination) else {
            return Ok(DispatchResponse::single(final_move_rsp(
                message_id,
                status::MOVE_DESTINATION_UNKNOWN,
                0,
                0,
                0,
                message.presentation_context_id,
            )?));
        };

        let total = answers.size() as u16;
        let mut completed = 0u16;
        let mut failed = 0u16;
        let mut pdus = Vec::with_capacity(answers.size() + 1);
        let mut scu = ScuClient::new(self.ae_title.clone(), destination);
        for index in 0..answers.size() {
            let instance = answers.get(index).expect("index within bounds");
            match scu.store(instance, Some((self.ae_title.as_str(), message_id))) {
                Ok(store_status) if store_status == status::SUCCESS => {
                    completed += 1;
                }
                Ok(_) | Err(_) => {
                    failed += 1;
                }
            }

            let remaining = total - completed - failed;
            if remaining == 0 {
                break;
            }
            let rsp = CMoveRsp::builder()
                .message_id_being_responded_to(message_id)
                .status(status::PENDING)
                .number_of_remaining_suboperations(remaining)
                .number_of_completed_suboperations(completed)
                .number_of_failed_suboperations(failed)
                .number_of_warning_suboperations(0u16)
                .build();
            pdus.push(
                DatasetConditionalCommand::pdu(&rsp, message.presentation_context_id)
                    .map_err(|source| Error::EncodePdu { source })?,
            );
        }
        scu.close();

        let final_status = if failed == 0 {
            status::SUCCESS
        } else {
            status::SUBOPERATIONS_COMPLETE_WITH_FAILURES
        };
        pdus.push(final_move_rsp(
            message_id,
            final_status,
            completed,
            failed,
            0,
            message.presentation_context_id,
        )?);
        Ok(DispatchResponse {
            pdus,
            release: false,
        })
    }

    fn dispatch_store(
        &self,
        message: &IncomingMessage,
        calling_ae_title: &str,
        ts: &TransferSyntax,
    ) -> Result<DispatchResponse> {
        let message_id = wire::get_u16(&message.command, dicom_dictionary_std::tags::MESSAGE_ID)
            .context(MissingFieldSnafu { field: "MessageID" })?;
        let sop_class_uid = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::AFFECTED_SOP_CLASS_UID,
        )
        .context(MissingFieldSnafu {
            field: "AffectedSOPClassUID",
        })?;
        let sop_instance_uid = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::AFFECTED_SOP_INSTANCE_UID,
        )
        .context(MissingFieldSnafu {
            field: "AffectedSOPInstanceUID",
        })?;
        let dataset = decode_request_dataset(message, ts)?;

        let status = match self.store.as_ref() {
            Some(provider) => provider.on_store(
                calling_ae_title,
                &sop_class_uid,
                &sop_instance_uid,
                ts.uid(),
                &dataset,
            )?,
            None => status::REFUSED_NOT_AUTHORIZED,
        };

        let rsp = CStoreRsp::builder()
            .message_id_being_responded_to(message_id)
            .affected_sop_class_uid(sop_class_uid.as_str())
            .affected_sop_instance_uid(sop_instance_uid.as_str())
            .status(status)
            .build();
        let pdu = DatasetForbiddenCommand::pdu(&rsp, message.presentation_context_id)
            .map_err(|source| Error::EncodePdu { source })?;
        Ok(DispatchResponse::single(pdu))
    }

    /// Validates that this is a storage commitment request (ActionTypeID 1
    /// against the fixed Storage Commitment Push Model SOP class/instance)
    /// before extracting `TransactionUID`/`ReferencedSOPSequence` and
    /// recording the transaction.
    fn dispatch_n_action(
        &self,
        message: &IncomingMessage,
        calling_ae_title: &str,
        ts: &TransferSyntax,
    ) -> Result<DispatchResponse> {
        let message_id = wire::get_u16(&message.command, dicom_dictionary_std::tags::MESSAGE_ID)
            .context(MissingFieldSnafu { field: "MessageID" })?;
        let sop_class_uid = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::REQUESTED_SOP_CLASS_UID,
        )
        .context(MissingFieldSnafu {
            field: "RequestedSOPClassUID",
        })?;
        let sop_instance_uid = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::REQUESTED_SOP_INSTANCE_UID,
        )
        .context(MissingFieldSnafu {
            field: "RequestedSOPInstanceUID",
        })?;
        let action_type_id = wire::get_u16(
            &message.command,
            dicom_dictionary_std::tags::ACTION_TYPE_ID,
        )
        .context(MissingFieldSnafu {
            field: "ActionTypeID",
        })?;
        let dataset = decode_request_dataset(message, ts)?;

        let is_storage_commitment_request = action_type_id == 1
            && sop_class_uid == uids::STORAGE_COMMITMENT_PUSH_MODEL
            && sop_instance_uid == uids::STORAGE_COMMITMENT_PUSH_MODEL_INSTANCE;

        if is_storage_commitment_request {
            if let (Some(tracker), Some(transaction_uid)) = (
                self.commitment_tracker.as_ref(),
                get_str_element(&dataset, dicom_dictionary_std::tags::TRANSACTION_UID),
            ) {
                let pairs = referenced_sop_pairs(
                    &dataset,
                    dicom_dictionary_std::tags::REFERENCED_SOP_SEQUENCE,
                );
                tracker.record_request(StorageCommitmentTransaction {
                    transaction_uid,
                    pairs,
                });
            }
        }

        let status = match self.action.as_ref() {
            Some(provider) => provider.on_n_action(
                calling_ae_title,
                &sop_class_uid,
                &sop_instance_uid,
                action_type_id,
                &dataset,
            )?,
            None => status::REFUSED_NOT_AUTHORIZED,
        };

        let rsp = NActionRsp::builder()
            .message_id_being_responded_to(message_id)
            .affected_sop_class_uid(sop_class_uid.as_str())
            .affected_sop_instance_uid(sop_instance_uid.as_str())
            .action_type_id(action_type_id)
            .status(status)
            .build();
        let pdu = DatasetForbiddenCommand::pdu(&rsp, message.presentation_context_id)
            .map_err(|source| Error::EncodePdu { source })?;
        Ok(DispatchResponse::single(pdu))
    }

    /// Parses `EventTypeID`/`ReferencedSOPSequence`/`FailedSOPSequence` off
    /// the wire dataset to build the real [`StorageCommitmentOutcome`] per
    /// referenced instance, rather than assuming success.
    fn dispatch_n_event_report(
        &self,
        message: &IncomingMessage,
        calling_ae_title: &str,
        ts: &TransferSyntax,
    ) -> Result<DispatchResponse> {
        let message_id = wire::get_u16(&message.command, dicom_dictionary_std::tags::MESSAGE_ID)
            .context(MissingFieldSnafu { field: "MessageID" })?;
        let sop_instance_uid = wire::get_str(
            &message.command,
            dicom_dictionary_std::tags::AFFECTED_SOP_INSTANCE_UID,
        )
        .context(MissingFieldSnafu {
            field: "AffectedSOPInstanceUID",
        })?;
        let event_type_id = wire::get_u16(
            &message.command,
            dicom_dictionary_std::tags::EVENT_TYPE_ID,
        )
        .context(MissingFieldSnafu {
            field: "EventTypeID",
        })?;
        let dataset = decode_request_dataset(message, ts)?;

        let transaction_uid =
            get_str_element(&dataset, dicom_dictionary_std::tags::TRANSACTION_UID);
        let successes = referenced_sop_pairs(&dataset, dicom_dictionary_std::tags::REFERENCED_SOP_SEQUENCE);
        let failures = failed_sop_triples(&dataset, dicom_dictionary_std::tags::FAILED_SOP_SEQUENCE);

        if let (Some(tracker), Some(transaction_uid)) =
            (self.commitment_tracker.as_ref(), transaction_uid.as_deref())
        {
            let mut outcomes: Vec<(String, String, StorageCommitmentOutcome)> = successes
                .iter()
                .map(|(class_uid, instance_uid)| {
                    (
                        class_uid.clone(),
                        instance_uid.clone(),
                        StorageCommitmentOutcome::Success,
                    )
                })
                .collect();
            outcomes.extend(failures.iter().map(|(class_uid, instance_uid, reason)| {
                (
                    class_uid.clone(),
                    instance_uid.clone(),
                    outcome_for_failure_reason(*reason),
                )
            }));
            tracker.record_report(transaction_uid, outcomes);
        }

        let outcome = if let Some((_, _, reason)) = failures.first() {
            outcome_for_failure_reason(*reason)
        } else if event_type_id == 1 {
            StorageCommitmentOutcome::Success
        } else {
            StorageCommitmentOutcome::ProcessingFailure
        };

        let status = match self.event_report.as_ref() {
            Some(provider) => provider.on_n_event_report(
                calling_ae_title,
                &sop_instance_uid,
                event_type_id,
                &dataset,
                outcome,
            )?,
            None => status::REFUSED_NOT_AUTHORIZED,
        };

        let rsp = NEventReportRsp::builder()
            .message_id_being_responded_to(message_id)
            .event_type_id(event_type_id)
            .status(status)
            .build();
        let pdu = DatasetForbiddenCommand::pdu(&rsp, message.presentation_context_id)
            .map_err(|source| Error::EncodePdu { source })?;
        Ok(DispatchResponse::single(pdu))
    }
}

/// Map a storage commitment `FailureReason` code (PS3.3
/// C.4.2.1.5) onto the matching outcome variant.
fn outcome_for_failure_reason(reason: u16) -> StorageCommitmentOutcome {
    match reason {
        0x0112 => StorageCommitmentOutcome::NoSuchObjectInstance,
        0x0213 => StorageCommitmentOutcome::ResourceLimitation,
        0x0122 => StorageCommitmentOutcome::ReferencedSopClassNotSupported,
        0x0119 => StorageCommitmentOutcome::ClassInstanceConflict,
        0x0111 => StorageCommitmentOutcome::DuplicateTransactionUid,
        _ => StorageCommitmentOutcome::ProcessingFailure,
    }
}

fn get_str_element(dataset: &InMemDicomObject, tag: dicom_core::Tag) -> Option<String> {
    dataset
        .get(tag)
        .and_then(|element| element.to_str().ok())
        .map(|value| value.trim_end_matches(['\0', ' ']).to_string())
}

/// Pull `(ReferencedSOPClassUID, ReferencedSOPInstanceUID)` pairs out of a
/// sequence element.
fn referenced_sop_pairs(dataset: &InMemDicomObject, sequence_tag: dicom_core::Tag) -> Vec<(String, String)> {
    let Some(element) = dataset.get(sequence_tag) else {
        return Vec::new();
    };
    let Some(items) = element.value().items() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let class_uid = get_str_element(item, dicom_dictionary_std::tags::REFERENCED_SOP_CLASS_UID)?;
            let instance_uid =
                get_str_element(item, dicom_dictionary_std::tags::REFERENCED_SOP_INSTANCE_UID)?;
            Some((class_uid, instance_uid))
        })
        .collect()
}

/// Pull `(ReferencedSOPClassUID, ReferencedSOPInstanceUID, FailureReason)`
/// triples out of a `FailedSOPSequence` element.
fn failed_sop_triples(
    dataset: &InMemDicomObject,
    sequence_tag: dicom_core::Tag,
) -> Vec<(String, String, u16)> {
    let Some(element) = dataset.get(sequence_tag) else {
        return Vec::new();
    };
    let Some(items) = element.value().items() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let class_uid = get_str_element(item, dicom_dictionary_std::tags::REFERENCED_SOP_CLASS_UID)?;
            let instance_uid =
                get_str_element(item, dicom_dictionary_std::tags::REFERENCED_SOP_INSTANCE_UID)?;
            let reason = item
                .get(dicom_dictionary_std::tags::FAILURE_REASON)
                .and_then(|e| e.value().to_int::<u16>().ok())
                .unwrap_or(0);
            Some((class_uid, instance_uid, reason))
        })
        .collect()
}

fn final_find_rsp(
    message_id: u16,
    sop_class_uid: &str,
    status: u16,
    presentation_context_id: u8,
) -> Result<Pdu> {
    let rsp = CFindRsp::builder()
        .message_id_being_responded_to(message_id)
        .affected_sop_class_uid(sop_class_uid)
        .status(status)
        .build();
    DatasetConditionalCommand::pdu(&rsp, presentation_context_id)
        .map_err(|source| Error::EncodePdu { source })
}

fn final_move_rsp(
    message_id: u16,
    status: u16,
    completed: u16,
    failed: u16,
    warning: u16,
    presentation_context_id: u8,
) -> Result<Pdu> {
    let rsp = CMoveRsp::builder()
        .message_id_being_responded_to(message_id)
        .status(status)
        .number_of_remaining_suboperations(0u16)
        .number_of_completed_suboperations(completed)
        .number_of_failed_suboperations(failed)
        .number_of_warning_suboperations(warning)
        .build();
    DatasetConditionalCommand::pdu(&rsp, presentation_context_id)
        .map_err(|source| Error::EncodePdu { source })
}

fn decode_request_dataset(
    message: &IncomingMessage,
    ts: &TransferSyntax,
) -> Result<InMemDicomObject> {
    let bytes = message.dataset.as_deref().context(MissingDatasetSnafu)?;
    InMemDicomObject::read_dataset_with_ts_cs(Cursor::new(bytes), ts, SpecificCharacterSet::ISO_IR_6)
        .context(DecodeDatasetSnafu)
}

/// A provider that accepts every echo without consulting any external
/// state, suitable for a minimal conformant SCP.
pub struct AlwaysSucceedEcho;

impl EchoProvider for AlwaysSucceedEcho {
    fn on_echo(&self, _calling_ae_title: &str) -> u16 {
        status::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::IncomingMessage;
    use dicom_core::{dicom_value, DataElement, VR};
    use dicom_dictionary_std::tags;
    use dicom_transfer_syntax_registry::entries;

    fn echo_request(message_id: u16) -> IncomingMessage {
        let mut obj = wire::CommandSet::new_empty();
        obj.put(DataElement::new(
            tags::MESSAGE_ID,
            VR::US,
            dicom_value!(message_id),
        ));
        obj.put(DataElement::new(
            tags::AFFECTED_SOP_CLASS_UID,
            VR::UI,
            dicom_value!("1.2.840.10008.1.1".to_string()),
        ));
        IncomingMessage {
            command: obj,
            presentation_context_id: 1,
            dataset: None,
        }
    }

    #[test]
    fn echo_with_no_provider_is_refused() {
        let table = HandlerTable::new();
        let response = table.dispatch_echo(&echo_request(7), "REMOTE").unwrap();
        assert_eq!(response.pdus.len(), 1);
    }

    #[test]
    fn echo_with_provider_succeeds() {
        let table = HandlerTable::new().with_echo(Arc::new(AlwaysSucceedEcho));
        let response = table.dispatch_echo(&echo_request(7), "REMOTE").unwrap();
        assert_eq!(response.pdus.len(), 1);
        assert!(!response.release);
    }

    #[test]
    fn unhandled_command_field_is_reported() {
        let table = HandlerTable::new();
        let message = echo_request(1);
        let ts = entries::IMPLICIT_VR_LITTLE_ENDIAN.erased();
        let err = table.dispatch(0x8030, &message, "REMOTE", &ts).unwrap_err();
        assert!(matches!(err, Error::Unhandled { .. }));
    }

    #[test]
    fn move_with_no_remote_modalities_directory_is_destination_unknown() {
        let table = HandlerTable::new().with_move(Arc::new(RefuseMove));
        let mut obj = wire::CommandSet::new_empty();
        obj.put(DataElement::new(
            tags::MESSAGE_ID,
            VR::US,
            dicom_value!(1u16),
        ));
        obj.put(DataElement::new(
            tags::AFFECTED_SOP_CLASS_UID,
            VR::UI,
            dicom_value!(uids::STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_MOVE.to_string()),
        ));
        obj.put(DataElement::new(
            tags::MOVE_DESTINATION,
            VR::AE,
            dicom_value!("NOWHERE".to_string()),
        ));
        let message = IncomingMessage {
            command: obj,
            presentation_context_id: 1,
            dataset: Some({
                let empty = InMemDicomObject::new_empty();
                let mut bytes = Vec::new();
                empty
                    .write_dataset_with_ts(&mut bytes, &entries::IMPLICIT_VR_LITTLE_ENDIAN.erased())
                    .unwrap();
                bytes
            }),
        };
        let ts = entries::IMPLICIT_VR_LITTLE_ENDIAN.erased();
        let response = table.dispatch_move(&message, "REMOTE", &ts).unwrap();
        assert_eq!(response.pdus.len(), 1);
    }

    struct RefuseMove;
    impl MoveProvider for RefuseMove {
        fn on_move(
            &self,
            _calling_ae_title: &str,
            _move_destination: &str,
            _sop_class_uid: &str,
            _query: &InMemDicomObject,
        ) -> Result<FindAnswers> {
            Ok(FindAnswers::new(false))
        }
    }
}
