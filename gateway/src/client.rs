//! Stateful Service Class User (C6).
//!
//! Grounded on `Core/DicomNetworking/DicomUserConnection.{h,cpp}`: a single
//! remote modality bound at construction time, an `Open`/`Close` lifecycle
//! around one [`dicom_ul::association::client::ClientAssociation`], a
//! dynamic set of storage SOP classes grown by `add_storage_sop_class`
//! between calls to `Open`, and the `Echo`/`Store`/`Find`/`Move` verbs built
//! from [`dicom_ul::pdu::generated`]'s request structs.
//!
//! Unlike the original's global `SetDefaultTimeout`, the process-wide
//! default is expressed here as an atomic cell (see [`set_default_timeout`])
//! read once at construction rather than on every operation.

use std::collections::BTreeSet;
use std::net::TcpStream;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use dicom_core::value::Value as DicomValue;
use dicom_core::{dicom_value, DataElement, Length, Tag, VR};
use dicom_dictionary_std::{tags, uids};
use dicom_encoding::transfer_syntax::TransferSyntaxIndex;
use dicom_object::InMemDicomObject;
use dicom_transfer_syntax_registry::TransferSyntaxRegistry;
use dicom_ul::association::client::{ClientAssociation, ClientAssociationOptions};
use dicom_ul::association::{Association, SyncAssociation};
use dicom_ul::pdu::commands::{
    DatasetConditionalCommand, DatasetForbiddenCommand, DatasetRequiredCommand,
};
use dicom_ul::pdu::generated::{CEchoRq, CFindRq, CMoveRq, CStoreRq, NActionRq, NEventReportRq};
use dicom_ul::pdu::Pdu;
use snafu::{ensure, OptionExt, ResultExt, Snafu};

use crate::find_answers::FindAnswers;
use crate::model::{ManufacturerQuirk, RemoteModality};
use crate::wire;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("connection is not open"))]
    NotOpen,

    #[snafu(display("failed to establish association with {}: {}", aet, source))]
    Establish {
        aet: String,
        source: dicom_ul::association::Error,
    },

    #[snafu(display("no presentation context accepted for abstract syntax {}", abstract_syntax_uid))]
    NoPresentationContext { abstract_syntax_uid: String },

    #[snafu(display("failed to send request: {}", source))]
    Send { source: dicom_ul::association::Error },

    #[snafu(display("failed to receive response: {}", source))]
    Receive { source: dicom_ul::association::Error },

    #[snafu(display("failed to encode request PDU: {}", source))]
    EncodePdu { source: Box<dicom_object::WriteError> },

    #[snafu(display("peer sent an unexpected PDU: {:?}", pdu))]
    UnexpectedPdu { pdu: Pdu },

    #[snafu(display("response carried no Command Field element"))]
    MissingCommandField,

    #[snafu(display("response command set is missing field {}", field))]
    MissingField { field: &'static str },

    #[snafu(display("transfer syntax `{}` is not registered", uid))]
    UnknownTransferSyntax { uid: String },

    #[snafu(display("failed to decode response dataset: {}", source))]
    DecodeDataset { source: dicom_object::ReadError },

    #[snafu(display("failed to parse find-answer dataset: {}", source))]
    FindAnswers { source: crate::find_answers::Error },

    #[snafu(display("dataset carries no value for required tag {:?}", tag))]
    MissingDatasetTag { tag: Tag },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A resource-level query/retrieve hierarchy position, mirroring
/// `ResourceType` in the original (Patient/Study/Series/Instance).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ResourceLevel {
    Patient,
    Study,
    Series,
    Instance,
}

impl ResourceLevel {
    fn as_str(self) -> &'static str {
        match self {
            ResourceLevel::Patient => "PATIENT",
            ResourceLevel::Study => "STUDY",
            ResourceLevel::Series => "SERIES",
            ResourceLevel::Instance => "IMAGE",
        }
    }

    /// The tag that uniquely identifies a resource at this level, and the
    /// value representation it must be injected with when absent from a
    /// query.
    fn identifier_tag(self) -> (Tag, VR) {
        match self {
            ResourceLevel::Patient => (tags::PATIENT_ID, VR::LO),
            ResourceLevel::Study => (tags::STUDY_INSTANCE_UID, VR::UI),
            ResourceLevel::Series => (tags::SERIES_INSTANCE_UID, VR::UI),
            ResourceLevel::Instance => (tags::SOP_INSTANCE_UID, VR::UI),
        }
    }

    /// Every tag allowed in a query at this level: its own identifying and
    /// descriptive tags, plus those of every enclosing level.
    fn allowed_tags(self) -> Vec<Tag> {
        let mut allowed = vec![tags::PATIENT_ID, tags::PATIENT_NAME];
        if matches!(
            self,
            ResourceLevel::Study | ResourceLevel::Series | ResourceLevel::Instance
        ) {
            allowed.extend([
                tags::STUDY_INSTANCE_UID,
                tags::STUDY_DATE,
                tags::STUDY_TIME,
                tags::ACCESSION_NUMBER,
                tags::STUDY_ID,
                tags::MODALITY,
                tags::NUMBER_OF_STUDY_RELATED_SERIES,
                tags::NUMBER_OF_STUDY_RELATED_INSTANCES,
            ]);
        }
        if matches!(self, ResourceLevel::Series | ResourceLevel::Instance) {
            allowed.extend([
                tags::SERIES_INSTANCE_UID,
                tags::SERIES_NUMBER,
                tags::SERIES_DESCRIPTION,
            ]);
        }
        if matches!(self, ResourceLevel::Instance) {
            allowed.extend([tags::SOP_INSTANCE_UID, tags::INSTANCE_NUMBER]);
        }
        allowed
    }
}

/// Process-wide default SCU timeout in seconds, read once when a
/// [`ScuClient`] is constructed. 0 disables the timeout. Defaults to 10
/// seconds, matching `DicomScuTimeout`.
static DEFAULT_TIMEOUT_SECONDS: AtomicU32 = AtomicU32::new(10);

/// Override the process-wide default SCU timeout used by clients
/// constructed from this point on. Does not affect clients already
/// constructed.
pub fn set_default_timeout(seconds: u32) {
    DEFAULT_TIMEOUT_SECONDS.store(seconds, Ordering::Relaxed);
}

/// Abstract syntaxes proposed on every association regardless of the
/// registered storage SOP classes: verification, the two Query/Retrieve
/// information models' Find and Move, the modality worklist, and storage
/// commitment. These count against the 64-SOP-class association budget.
const RESERVED_ABSTRACT_SYNTAXES: &[&str] = &[
    uids::VERIFICATION,
    uids::PATIENT_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_FIND,
    uids::STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_FIND,
    uids::PATIENT_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_MOVE,
    uids::STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_MOVE,
    uids::MODALITY_WORKLIST_INFORMATION_MODEL_FIND,
    uids::STORAGE_COMMITMENT_PUSH_MODEL,
];

/// A short list of commonly exchanged storage SOP classes, proposed by
/// default alongside whatever classes are explicitly registered. Evicted
/// first (highest-sorted) if the 64-SOP-class budget is exceeded.
const DEFAULT_STORAGE_SOP_CLASSES: &[&str] = &[
    uids::COMPUTED_RADIOGRAPHY_IMAGE_STORAGE,
    uids::CT_IMAGE_STORAGE,
    uids::ENHANCED_CT_IMAGE_STORAGE,
    uids::MR_IMAGE_STORAGE,
    uids::ENHANCED_MR_IMAGE_STORAGE,
    uids::ULTRASOUND_IMAGE_STORAGE,
    uids::SECONDARY_CAPTURE_IMAGE_STORAGE,
    uids::NUCLEAR_MEDICINE_IMAGE_STORAGE,
    uids::POSITRON_EMISSION_TOMOGRAPHY_IMAGE_STORAGE,
    uids::X_RAY_ANGIOGRAPHIC_IMAGE_STORAGE,
    uids::DIGITAL_X_RAY_IMAGE_STORAGE_FOR_PRESENTATION,
    uids::RT_IMAGE_STORAGE,
    uids::RT_DOSE_STORAGE,
    uids::RT_STRUCTURE_SET_STORAGE,
    uids::RT_PLAN_STORAGE,
    uids::VL_ENDOSCOPIC_IMAGE_STORAGE,
    uids::VL_PHOTOGRAPHIC_IMAGE_STORAGE,
    uids::BASIC_TEXT_SR_STORAGE,
    uids::ENHANCED_SR_STORAGE,
    uids::COMPREHENSIVE_SR_STORAGE,
    uids::KEY_OBJECT_SELECTION_DOCUMENT_STORAGE,
    uids::ENCAPSULATED_PDF_STORAGE,
];

/// The maximum number of distinct SOP classes (reserved + explicit +
/// default) a single association may propose, since each costs two
/// presentation contexts and the peer supports at most 128 (PS3.8).
const MAX_STORAGE_SOP_CLASSES: usize = 64;

/// The two generic transfer syntaxes always proposed alongside whatever is
/// preferred.
const EXPLICIT_VR_LITTLE_ENDIAN_UID: &str = "1.2.840.10008.1.2.1";
const IMPLICIT_VR_LITTLE_ENDIAN_UID: &str = "1.2.840.10008.1.2";

/// The outcome of a C-MOVE request, summarizing the sub-operation counters
/// carried on the final C-MOVE-RSP.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MoveOutcome {
    pub status: u16,
    pub completed: u16,
    pub failed: u16,
    pub warning: u16,
}

/// A stateful association to a single remote modality, reopened as needed
/// across calls. Not `Sync`: callers needing concurrent SCU traffic to
/// several peers should hold one `ScuClient` per worker thread.
pub struct ScuClient {
    calling_ae_title: String,
    remote: RemoteModality,
    preferred_transfer_syntax: Option<String>,
    explicit_sop_classes: BTreeSet<String>,
    default_sop_classes: BTreeSet<String>,
    timeout: Option<Duration>,
    association: Option<ClientAssociation<TcpStream>>,
    next_message_id: u16,
}

impl ScuClient {
    /// Bind a client to a single remote modality, read with the
    /// process-wide default timeout in effect at this moment.
    pub fn new(calling_ae_title: impl Into<String>, remote: RemoteModality) -> Self {
        let default_timeout = DEFAULT_TIMEOUT_SECONDS.load(Ordering::Relaxed);
        ScuClient {
            calling_ae_title: calling_ae_title.into(),
            remote,
            preferred_transfer_syntax: None,
            explicit_sop_classes: BTreeSet::new(),
            default_sop_classes: DEFAULT_STORAGE_SOP_CLASSES
                .iter()
                .map(|uid| uid.to_string())
                .collect(),
            timeout: timeout_from_seconds(default_timeout),
            association: None,
            next_message_id: 1,
        }
    }

    /// Prefer this transfer syntax, proposed first for every abstract
    /// syntax when the association is next opened.
    pub fn set_preferred_transfer_syntax(&mut self, transfer_syntax_uid: impl Into<String>) {
        self.preferred_transfer_syntax = Some(transfer_syntax_uid.into());
    }

    pub fn reset_preferred_transfer_syntax(&mut self) {
        self.preferred_transfer_syntax = None;
    }

    /// Register a storage SOP class explicitly, evicting default classes
    /// if needed to keep the association within the 64-SOP-class budget.
    /// Has no effect on an already-open association; takes effect on the
    /// next `open`.
    pub fn add_storage_sop_class(&mut self, sop_class_uid: impl Into<String>) {
        let sop_class_uid = sop_class_uid.into();
        if RESERVED_ABSTRACT_SYNTAXES.contains(&sop_class_uid.as_str()) {
            return;
        }
        if self.explicit_sop_classes.contains(&sop_class_uid) {
            return;
        }
        self.default_sop_classes.remove(&sop_class_uid);
        self.explicit_sop_classes.insert(sop_class_uid);
        self.enforce_sop_class_budget();
    }

    /// Keep `reserved + explicit + default <= MAX_STORAGE_SOP_CLASSES`: if
    /// the explicit set alone (plus reserved) overflows the budget, every
    /// default class is dropped; otherwise default classes are evicted one
    /// at a time, highest-sorted UID first, until the budget holds.
    fn enforce_sop_class_budget(&mut self) {
        let reserved = RESERVED_ABSTRACT_SYNTAXES.len();
        if reserved + self.explicit_sop_classes.len() > MAX_STORAGE_SOP_CLASSES {
            self.default_sop_classes.clear();
            return;
        }
        while reserved + self.explicit_sop_classes.len() + self.default_sop_classes.len()
            > MAX_STORAGE_SOP_CLASSES
        {
            let Some(highest) = self.default_sop_classes.iter().next_back().cloned() else {
                break;
            };
            self.default_sop_classes.remove(&highest);
        }
    }

    /// Override the per-operation read/write timeout. 0 disables it.
    pub fn set_timeout(&mut self, seconds: u32) {
        self.timeout = timeout_from_seconds(seconds);
    }

    pub fn disable_timeout(&mut self) {
        self.timeout = None;
    }

    pub fn is_open(&self) -> bool {
        self.association.is_some()
    }

    pub fn close(&mut self) {
        if let Some(mut association) = self.association.take() {
            let _ = association.release();
        }
    }

    /// Propose a presentation context per reserved, explicit and default
    /// SOP class, and establish the association. A no-op if already open.
    pub fn open(&mut self) -> Result<()> {
        if self.association.is_some() {
            return Ok(());
        }

        let mut options = ClientAssociationOptions::new()
            .calling_ae_title(self.calling_ae_title.clone())
            .called_ae_title(self.remote.aet.clone());
        for abstract_syntax in RESERVED_ABSTRACT_SYNTAXES {
            options = options.with_abstract_syntax(*abstract_syntax);
        }
        for sop_class_uid in self.explicit_sop_classes.iter().chain(&self.default_sop_classes) {
            options = options.with_abstract_syntax(sop_class_uid.clone());
        }
        if let Some(preferred) = &self.preferred_transfer_syntax {
            options = options.with_transfer_syntax(preferred.clone());
        }
        options = options
            .with_transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN_UID)
            .with_transfer_syntax(IMPLICIT_VR_LITTLE_ENDIAN_UID);
        if let Some(timeout) = self.timeout {
            options = options.read_timeout(timeout).write_timeout(timeout);
        }

        let address = format!("{}:{}", self.remote.host, self.remote.port);
        let association = options.establish(address).context(EstablishSnafu {
            aet: self.remote.aet.clone(),
        })?;
        self.association = Some(association);
        Ok(())
    }

    fn association_mut(&mut self) -> Result<&mut ClientAssociation<TcpStream>> {
        self.association.as_mut().context(NotOpenSnafu)
    }

    fn next_message_id(&mut self) -> u16 {
        let id = self.next_message_id;
        self.next_message_id = self.next_message_id.wrapping_add(1).max(1);
        id
    }

    fn presentation_context_for(&mut self, abstract_syntax_uid: &str) -> Result<(u8, String)> {
        let association = self.association_mut()?;
        let (id, ts) = association
            .find_presentation_context(abstract_syntax_uid)
            .context(NoPresentationContextSnafu {
                abstract_syntax_uid: abstract_syntax_uid.to_string(),
            })?;
        Ok((id, ts.to_string()))
    }

    fn transfer_syntax_of(uid: &str) -> Result<&'static dicom_encoding::TransferSyntax> {
        TransferSyntaxRegistry
            .get(uid)
            .context(UnknownTransferSyntaxSnafu { uid: uid.to_string() })
    }

    /// Whether switching the association's preferred transfer syntax to
    /// `instance_ts_uid` is required before an instance encoded with it can
    /// be stored: a generic-to-specific or specific-to-generic change, or a
    /// change between two different specific syntaxes. Two different
    /// generic syntaxes (both always proposed) need no renegotiation.
    fn transfer_syntax_requires_renegotiation(&self, instance_ts_uid: &str) -> Result<bool> {
        let current = self
            .preferred_transfer_syntax
            .as_deref()
            .unwrap_or(IMPLICIT_VR_LITTLE_ENDIAN_UID);
        if current == instance_ts_uid {
            return Ok(false);
        }
        let current_generic = Self::transfer_syntax_of(current)?.is_codec_free();
        let instance_generic = Self::transfer_syntax_of(instance_ts_uid)?.is_codec_free();
        Ok(current_generic != instance_generic || !instance_generic)
    }

    fn send_and_await_single_response(&mut self, pdu: Pdu) -> Result<wire::CommandSet> {
        {
            let association = self.association_mut()?;
            SyncAssociation::send(association, &pdu).context(SendSnafu)?;
        }
        loop {
            let association = self.association_mut()?;
            let pdu = SyncAssociation::receive(association).context(ReceiveSnafu)?;
            match pdu {
                Pdu::PData { data } => {
                    let mut command_bytes = Vec::new();
                    for fragment in data {
                        if fragment.value_type == dicom_ul::pdu::PDataValueType::Command {
                            command_bytes.extend_from_slice(&fragment.data);
                        }
                    }
                    if !command_bytes.is_empty() {
                        let command = wire::read_command_set(&command_bytes)
                            .map_err(|source| Error::DecodeDataset { source })?;
                        wire::command_field(&command).context(MissingCommandFieldSnafu)?;
                        return Ok(command);
                    }
                }
                other => return UnexpectedPduSnafu { pdu: other }.fail(),
            }
        }
    }

    /// Send a C-ECHO-RQ; `true` if the reply status is Success.
    pub fn echo(&mut self) -> Result<bool> {
        let (pc_id, _ts) = self.presentation_context_for(uids::VERIFICATION)?;
        let message_id = self.next_message_id();
        let rq = CEchoRq::builder()
            .message_id(message_id)
            .affected_sop_class_uid(uids::VERIFICATION)
            .build();
        let pdu = DatasetForbiddenCommand::pdu(&rq, pc_id).map_err(|source| Error::EncodePdu { source })?;
        let rsp = self.send_and_await_single_response(pdu)?;
        let status = wire::get_u16(&rsp, tags::STATUS).context(MissingFieldSnafu { field: "Status" })?;
        Ok(status == 0x0000)
    }

    /// Send a C-STORE-RQ for `dataset`. The SOP class and SOP instance are
    /// derived from `dataset` itself (`SOPClassUID`/`SOPInstanceUID`), the
    /// class is registered dynamically if not already known, and the
    /// association is renegotiated first if `dataset` carries its own
    /// `TransferSyntaxUID` element (as a loaded file's meta group would)
    /// and that transfer syntax is incompatible with the one currently
    /// preferred. `move_originator` is set when this store is a
    /// sub-operation of a C-MOVE being tunneled through this client.
    pub fn store(
        &mut self,
        dataset: &InMemDicomObject,
        move_originator: Option<(&str, u16)>,
    ) -> Result<u16> {
        let sop_class_uid = dataset_uid(dataset, tags::SOP_CLASS_UID)?;
        let sop_instance_uid = dataset_uid(dataset, tags::SOP_INSTANCE_UID)?;

        self.add_storage_sop_class(sop_class_uid.clone());

        if let Ok(instance_ts) = dataset_uid(dataset, tags::TRANSFER_SYNTAX_UID) {
            if self.transfer_syntax_requires_renegotiation(&instance_ts)? {
                self.close();
                self.set_preferred_transfer_syntax(instance_ts);
            }
        }
        self.open()?;

        let (pc_id, ts_uid) = self.presentation_context_for(&sop_class_uid)?;
        let ts = Self::transfer_syntax_of(&ts_uid)?;
        let message_id = self.next_message_id();

        let mut builder = CStoreRq::builder()
            .message_id(message_id)
            .affected_sop_class_uid(sop_class_uid.as_str())
            .affected_sop_instance_uid(sop_instance_uid.as_str());
        if let Some((aet, move_message_id)) = move_originator {
            builder = builder
                .move_originator_application_entity_title(aet)
                .move_originator_message_id(move_message_id);
        }
        let rq = builder.build();
        let pdu = DatasetRequiredCommand::pdu_with_dataset(&rq, pc_id, dataset.clone(), ts)
            .map_err(|source| Error::EncodePdu { source })?;
        let rsp = self.send_and_await_single_response(pdu)?;
        wire::get_u16(&rsp, tags::STATUS).context(MissingFieldSnafu { field: "Status" })
    }

    fn find_with_abstract_syntax(
        &mut self,
        abstract_syntax_uid: &str,
        query: &InMemDicomObject,
        worklist: bool,
    ) -> Result<FindAnswers> {
        let (pc_id, ts_uid) = self.presentation_context_for(abstract_syntax_uid)?;
        let ts = Self::transfer_syntax_of(&ts_uid)?;
        let message_id = self.next_message_id();
        let rq = CFindRq::builder()
            .message_id(message_id)
            .affected_sop_class_uid(abstract_syntax_uid)
            .build();
        let pdu = DatasetRequiredCommand::pdu_with_dataset(&rq, pc_id, query.clone(), ts)
            .map_err(|source| Error::EncodePdu { source })?;

        {
            let association = self.association_mut()?;
            SyncAssociation::send(association, &pdu).context(SendSnafu)?;
        }

        let mut answers = FindAnswers::new(worklist);
        loop {
            let association = self.association_mut()?;
            let pdu = SyncAssociation::receive(association).context(ReceiveSnafu)?;
            let Pdu::PData { data } = pdu else {
                return UnexpectedPduSnafu { pdu }.fail();
            };
            let mut command_bytes = Vec::new();
            let mut dataset_bytes = Vec::new();
            for fragment in data {
                match fragment.value_type {
                    dicom_ul::pdu::PDataValueType::Command => {
                        command_bytes.extend_from_slice(&fragment.data)
                    }
                    dicom_ul::pdu::PDataValueType::Data => {
                        dataset_bytes.extend_from_slice(&fragment.data)
                    }
                }
            }
            if command_bytes.is_empty() {
                continue;
            }
            let command = wire::read_command_set(&command_bytes)
                .map_err(|source| Error::DecodeDataset { source })?;
            let status =
                wire::get_u16(&command, tags::STATUS).context(MissingFieldSnafu { field: "Status" })?;
            if !dataset_bytes.is_empty() {
                answers
                    .add_from_bytes(&dataset_bytes, ts, None)
                    .context(FindAnswersSnafu)?;
            }
            // 0xFF00 Pending, 0xFF01 Pending with optional keys not supported
            if status != 0xFF00 && status != 0xFF01 {
                answers.set_complete(status == 0x0000);
                return Ok(answers);
            }
        }
    }

    /// Send a C-FIND-RQ at `level` with the given query identifier, after
    /// normalizing it to the tags allowed at that level and applying the
    /// remote modality's manufacturer quirk.
    pub fn find(&mut self, level: ResourceLevel, query: InMemDicomObject) -> Result<FindAnswers> {
        let query = self.normalize_query(level, &query);
        self.find_with_abstract_syntax(
            uids::STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_FIND,
            &query,
            false,
        )
    }

    /// Send a C-FIND-RQ against the modality worklist abstract syntax,
    /// applying the remote modality's manufacturer quirk to the supplied
    /// identifier but no level-based normalization (the worklist has no
    /// Q/R hierarchy level).
    pub fn find_worklist(&mut self, mut query: InMemDicomObject) -> Result<FindAnswers> {
        apply_manufacturer_quirk(self.remote.manufacturer, &mut query);
        self.find_with_abstract_syntax(
            uids::MODALITY_WORKLIST_INFORMATION_MODEL_FIND,
            &query,
            true,
        )
    }

    /// Normalize `query` to the tags allowed at `level` (its own tags plus
    /// every enclosing level's, `QueryRetrieveLevel` and
    /// `SpecificCharacterSet`), inject the level's identifying tag if
    /// absent (empty, or `"*"` for manufacturer `GE`), and apply the
    /// remote modality's manufacturer quirk.
    fn normalize_query(&self, level: ResourceLevel, query: &InMemDicomObject) -> InMemDicomObject {
        let mut normalized = InMemDicomObject::new_empty();
        if let Some(element) = query.get(tags::SPECIFIC_CHARACTER_SET) {
            normalized.put(element.clone());
        }
        for tag in level.allowed_tags() {
            if let Some(element) = query.get(tag) {
                normalized.put(element.clone());
            }
        }

        let (identifier_tag, identifier_vr) = level.identifier_tag();
        if normalized.get(identifier_tag).is_none() {
            let missing_value = match self.remote.manufacturer {
                ManufacturerQuirk::GE => "*",
                _ => "",
            };
            normalized.put_str(identifier_tag, identifier_vr, missing_value);
        }
        normalized.put_str(tags::QUERY_RETRIEVE_LEVEL, VR::CS, level.as_str());

        apply_manufacturer_quirk(self.remote.manufacturer, &mut normalized);
        normalized
    }

    /// Send a C-MOVE-RQ at `level` to `target_aet`, tunneling the resulting
    /// C-STORE sub-operations to that destination. Reads pending (`0xFF00`)
    /// responses until the final status arrives, matching the server-side
    /// pending-response loop used by `find_with_abstract_syntax`.
    pub fn move_to(
        &mut self,
        target_aet: &str,
        level: ResourceLevel,
        identifiers: InMemDicomObject,
    ) -> Result<MoveOutcome> {
        let query = self.normalize_query(level, &identifiers);
        let (pc_id, ts_uid) =
            self.presentation_context_for(uids::STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_MOVE)?;
        let ts = Self::transfer_syntax_of(&ts_uid)?;
        let message_id = self.next_message_id();
        let rq = CMoveRq::builder()
            .message_id(message_id)
            .affected_sop_class_uid(uids::STUDY_ROOT_QUERY_RETRIEVE_INFORMATION_MODEL_MOVE)
            .move_destination(target_aet)
            .build();
        let pdu = DatasetRequiredCommand::pdu_with_dataset(&rq, pc_id, query, ts)
            .map_err(|source| Error::EncodePdu { source })?;

        {
            let association = self.association_mut()?;
            SyncAssociation::send(association, &pdu).context(SendSnafu)?;
        }

        loop {
            let association = self.association_mut()?;
            let pdu = SyncAssociation::receive(association).context(ReceiveSnafu)?;
            let Pdu::PData { data } = pdu else {
                return UnexpectedPduSnafu { pdu }.fail();
            };
            let mut command_bytes = Vec::new();
            for fragment in data {
                if fragment.value_type == dicom_ul::pdu::PDataValueType::Command {
                    command_bytes.extend_from_slice(&fragment.data);
                }
            }
            if command_bytes.is_empty() {
                continue;
            }
            let command = wire::read_command_set(&command_bytes)
                .map_err(|source| Error::DecodeDataset { source })?;
            let status =
                wire::get_u16(&command, tags::STATUS).context(MissingFieldSnafu { field: "Status" })?;
            if status == 0xFF00 {
                continue;
            }
            return Ok(MoveOutcome {
                status,
                completed: wire::get_u16(&command, tags::NUMBER_OF_COMPLETED_SUBOPERATIONS).unwrap_or(0),
                failed: wire::get_u16(&command, tags::NUMBER_OF_FAILED_SUBOPERATIONS).unwrap_or(0),
                warning: wire::get_u16(&command, tags::NUMBER_OF_WARNING_SUBOPERATIONS).unwrap_or(0),
            });
        }
    }

    pub fn move_patient(&mut self, target_aet: &str, patient_id: &str) -> Result<MoveOutcome> {
        let mut query = InMemDicomObject::new_empty();
        query.put_str(tags::PATIENT_ID, dicom_core::VR::LO, patient_id);
        self.move_to(target_aet, ResourceLevel::Patient, query)
    }

    pub fn move_study(&mut self, target_aet: &str, study_instance_uid: &str) -> Result<MoveOutcome> {
        let mut query = InMemDicomObject::new_empty();
        query.put_str(tags::STUDY_INSTANCE_UID, dicom_core::VR::UI, study_instance_uid);
        self.move_to(target_aet, ResourceLevel::Study, query)
    }

    pub fn move_series(
        &mut self,
        target_aet: &str,
        study_instance_uid: &str,
        series_instance_uid: &str,
    ) -> Result<MoveOutcome> {
        let mut query = InMemDicomObject::new_empty();
        query.put_str(tags::STUDY_INSTANCE_UID, dicom_core::VR::UI, study_instance_uid);
        query.put_str(tags::SERIES_INSTANCE_UID, dicom_core::VR::UI, series_instance_uid);
        self.move_to(target_aet, ResourceLevel::Series, query)
    }

    pub fn move_instance(
        &mut self,
        target_aet: &str,
        study_instance_uid: &str,
        series_instance_uid: &str,
        sop_instance_uid: &str,
    ) -> Result<MoveOutcome> {
        let mut query = InMemDicomObject::new_empty();
        query.put_str(tags::STUDY_INSTANCE_UID, dicom_core::VR::UI, study_instance_uid);
        query.put_str(tags::SERIES_INSTANCE_UID, dicom_core::VR::UI, series_instance_uid);
        query.put_str(tags::SOP_INSTANCE_UID, dicom_core::VR::UI, sop_instance_uid);
        self.move_to(target_aet, ResourceLevel::Instance, query)
    }

    /// Send an N-ACTION-RQ (ActionTypeID 1) requesting storage commitment
    /// for `pairs`, validating the response's `MessageIDBeingRespondedTo`
    /// and status. `transaction_uid` must start with `"2.25."`.
    pub fn request_storage_commitment(
        &mut self,
        transaction_uid: &str,
        pairs: &[(String, String)],
    ) -> crate::error::Result<u16> {
        ensure!(
            transaction_uid.starts_with("2.25."),
            crate::error::ParameterOutOfRangeSnafu {
                what: format!(
                    "storage commitment transaction UID `{}` does not start with 2.25.",
                    transaction_uid
                ),
            }
        );
        self.open()?;
        let (pc_id, ts_uid) = self.presentation_context_for(uids::STORAGE_COMMITMENT_PUSH_MODEL)?;
        let ts = Self::transfer_syntax_of(&ts_uid)?;
        let message_id = self.next_message_id();
        let dataset = storage_commitment_request_dataset(transaction_uid, pairs);
        let rq = NActionRq::builder()
            .message_id(message_id)
            .requested_sop_class_uid(uids::STORAGE_COMMITMENT_PUSH_MODEL)
            .requested_sop_instance_uid(uids::STORAGE_COMMITMENT_PUSH_MODEL_INSTANCE)
            .action_type_id(1u16)
            .build();
        let pdu = DatasetRequiredCommand::pdu_with_dataset(&rq, pc_id, dataset, ts)
            .map_err(|source| Error::EncodePdu { source })?;
        let rsp = self.send_and_await_single_response(pdu)?;
        let status = wire::get_u16(&rsp, tags::STATUS).context(MissingFieldSnafu { field: "Status" })?;
        Ok(status)
    }

    /// Send an N-EVENT-REPORT-RQ reporting storage commitment outcomes for
    /// a previously requested transaction: EventTypeID 1 (success) when
    /// `failures` is empty, otherwise 2 with a `FailedSOPSequence`.
    pub fn report_storage_commitment(
        &mut self,
        transaction_uid: &str,
        successes: &[(String, String)],
        failures: &[(String, String, u16)],
    ) -> crate::error::Result<u16> {
        self.open()?;
        let (pc_id, ts_uid) = self.presentation_context_for(uids::STORAGE_COMMITMENT_PUSH_MODEL)?;
        let ts = Self::transfer_syntax_of(&ts_uid)?;
        let message_id = self.next_message_id();
        let event_type_id: u16 = if failures.is_empty() { 1 } else { 2 };
        let dataset = storage_commitment_report_dataset(transaction_uid, successes, failures);
        let rq = NEventReportRq::builder()
            .message_id(message_id)
            .affected_sop_class_uid(uids::STORAGE_COMMITMENT_PUSH_MODEL)
            .affected_sop_instance_uid(uids::STORAGE_COMMITMENT_PUSH_MODEL_INSTANCE)
            .event_type_id(event_type_id)
            .build();
        let pdu = DatasetRequiredCommand::pdu_with_dataset(&rq, pc_id, dataset, ts)
            .map_err(|source| Error::EncodePdu { source })?;
        let rsp = self.send_and_await_single_response(pdu)?;
        let status = wire::get_u16(&rsp, tags::STATUS).context(MissingFieldSnafu { field: "Status" })?;
        Ok(status)
    }
}

impl Drop for ScuClient {
    fn drop(&mut self) {
        self.close();
    }
}

fn timeout_from_seconds(seconds: u32) -> Option<Duration> {
    if seconds == 0 {
        None
    } else {
        Some(Duration::from_secs(seconds as u64))
    }
}

/// Read `tag` out of `dataset` as an owned string, trimming the trailing
/// padding DICOM string values are conventionally given.
fn dataset_uid(dataset: &InMemDicomObject, tag: Tag) -> Result<String> {
    dataset
        .get(tag)
        .and_then(|element| element.to_str().ok())
        .map(|value| value.trim_end_matches(['\0', ' ']).to_string())
        .context(MissingDatasetTagSnafu { tag })
}

/// Apply a manufacturer's outgoing-C-FIND-identifier quirk to every
/// element of `query` in place.
fn apply_manufacturer_quirk(manufacturer: ManufacturerQuirk, query: &mut InMemDicomObject) {
    if !matches!(
        manufacturer,
        ManufacturerQuirk::GenericNoUniversalWildcard | ManufacturerQuirk::GenericNoWildcardInDates
    ) {
        return;
    }
    let rewrites: Vec<(Tag, VR)> = query
        .iter()
        .filter_map(|element| {
            let header = element.header();
            if manufacturer == ManufacturerQuirk::GenericNoWildcardInDates && header.vr != VR::DA {
                return None;
            }
            let value = element.to_str().ok()?;
            if value.as_ref() == "*" {
                Some((header.tag, header.vr))
            } else {
                None
            }
        })
        .collect();
    for (tag, vr) in rewrites {
        query.put_str(tag, vr, "");
    }
}

/// Build the N-ACTION-RQ dataset for a storage commitment request:
/// TransactionUID plus a ReferencedSOPSequence item per SOP class/instance
/// pair.
fn storage_commitment_request_dataset(
    transaction_uid: &str,
    pairs: &[(String, String)],
) -> InMemDicomObject {
    let items: Vec<InMemDicomObject> = pairs
        .iter()
        .map(|(sop_class_uid, sop_instance_uid)| {
            InMemDicomObject::from_element_iter([
                DataElement::new(
                    tags::REFERENCED_SOP_CLASS_UID,
                    VR::UI,
                    dicom_value!(sop_class_uid.as_str()),
                ),
                DataElement::new(
                    tags::REFERENCED_SOP_INSTANCE_UID,
                    VR::UI,
                    dicom_value!(sop_instance_uid.as_str()),
                ),
            ])
        })
        .collect();
    InMemDicomObject::from_element_iter([
        DataElement::new(tags::TRANSACTION_UID, VR::UI, dicom_value!(transaction_uid)),
        DataElement::new(
            tags::REFERENCED_SOP_SEQUENCE,
            VR::SQ,
            sequence_value(items),
        ),
    ])
}

/// Wrap a set of items as an undefined-length DICOM sequence value, the
/// shape `DataElement::new` expects for an SQ-VR element.
fn sequence_value(items: Vec<InMemDicomObject>) -> DicomValue<InMemDicomObject> {
    DicomValue::new_sequence(items, Length::UNDEFINED)
}

/// Build the N-EVENT-REPORT-RQ dataset reporting storage commitment
/// outcomes: TransactionUID, a ReferencedSOPSequence item per success, and
/// a FailedSOPSequence item (with FailureReason) per failure.
fn storage_commitment_report_dataset(
    transaction_uid: &str,
    successes: &[(String, String)],
    failures: &[(String, String, u16)],
) -> InMemDicomObject {
    let mut elements = vec![DataElement::new(
        tags::TRANSACTION_UID,
        VR::UI,
        dicom_value!(transaction_uid),
    )];
    if !successes.is_empty() {
        let items: Vec<InMemDicomObject> = successes
            .iter()
            .map(|(sop_class_uid, sop_instance_uid)| {
                InMemDicomObject::from_element_iter([
                    DataElement::new(
                        tags::REFERENCED_SOP_CLASS_UID,
                        VR::UI,
                        dicom_value!(sop_class_uid.as_str()),
                    ),
                    DataElement::new(
                        tags::REFERENCED_SOP_INSTANCE_UID,
                        VR::UI,
                        dicom_value!(sop_instance_uid.as_str()),
                    ),
                ])
            })
            .collect();
        elements.push(DataElement::new(
            tags::REFERENCED_SOP_SEQUENCE,
            VR::SQ,
            sequence_value(items),
        ));
    }
    if !failures.is_empty() {
        let items: Vec<InMemDicomObject> = failures
            .iter()
            .map(|(sop_class_uid, sop_instance_uid, reason)| {
                InMemDicomObject::from_element_iter([
                    DataElement::new(
                        tags::REFERENCED_SOP_CLASS_UID,
                        VR::UI,
                        dicom_value!(sop_class_uid.as_str()),
                    ),
                    DataElement::new(
                        tags::REFERENCED_SOP_INSTANCE_UID,
                        VR::UI,
                        dicom_value!(sop_instance_uid.as_str()),
                    ),
                    DataElement::new(tags::FAILURE_REASON, VR::US, dicom_value!(*reason)),
                ])
            })
            .collect();
        elements.push(DataElement::new(
            tags::FAILED_SOP_SEQUENCE,
            VR::SQ,
            sequence_value(items),
        ));
    }
    InMemDicomObject::from_element_iter(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_starts_at_ten_seconds() {
        let client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        assert_eq!(client.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn set_default_timeout_changes_future_clients_only() {
        let before = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        set_default_timeout(20);
        let after = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        set_default_timeout(10);
        assert_eq!(before.timeout, Some(Duration::from_secs(10)));
        assert_eq!(after.timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn operations_fail_before_open() {
        let mut client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        assert!(matches!(client.echo(), Err(Error::NotOpen)));
    }

    #[test]
    fn resource_level_names_match_query_retrieve_level_values() {
        assert_eq!(ResourceLevel::Patient.as_str(), "PATIENT");
        assert_eq!(ResourceLevel::Study.as_str(), "STUDY");
        assert_eq!(ResourceLevel::Series.as_str(), "SERIES");
        assert_eq!(ResourceLevel::Instance.as_str(), "IMAGE");
    }

    #[test]
    fn default_sop_classes_are_seeded_below_the_budget() {
        let client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        assert!(client.default_sop_classes.len() <= DEFAULT_STORAGE_SOP_CLASSES.len());
        assert_eq!(
            RESERVED_ABSTRACT_SYNTAXES.len() + client.explicit_sop_classes.len() + client.default_sop_classes.len(),
            RESERVED_ABSTRACT_SYNTAXES.len() + DEFAULT_STORAGE_SOP_CLASSES.len()
        );
    }

    #[test]
    fn explicit_registration_evicts_defaults_when_budget_is_exceeded() {
        let mut client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        let reserved = RESERVED_ABSTRACT_SYNTAXES.len();
        let room = MAX_STORAGE_SOP_CLASSES - reserved - client.default_sop_classes.len();
        for i in 0..room + 5 {
            client.add_storage_sop_class(format!("1.2.3.4.{i}"));
        }
        assert!(
            reserved + client.explicit_sop_classes.len() + client.default_sop_classes.len()
                <= MAX_STORAGE_SOP_CLASSES
        );
    }

    #[test]
    fn reserved_abstract_syntax_is_never_registered_explicitly() {
        let mut client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        client.add_storage_sop_class(uids::VERIFICATION);
        assert!(!client.explicit_sop_classes.contains(uids::VERIFICATION));
    }

    #[test]
    fn normalize_query_keeps_only_allowed_tags_and_fills_identifier() {
        let client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        let mut query = InMemDicomObject::new_empty();
        query.put_str(tags::PATIENT_NAME, VR::PN, "Doe^John");
        query.put_str(tags::SERIES_DESCRIPTION, VR::LO, "chest");
        let normalized = client.normalize_query(ResourceLevel::Study, &query);
        assert!(normalized.get(tags::PATIENT_NAME).is_some());
        assert!(normalized.get(tags::SERIES_DESCRIPTION).is_none());
        assert_eq!(
            normalized.get(tags::STUDY_INSTANCE_UID).unwrap().to_str().unwrap(),
            ""
        );
        assert_eq!(
            normalized.get(tags::QUERY_RETRIEVE_LEVEL).unwrap().to_str().unwrap(),
            "STUDY"
        );
    }

    #[test]
    fn normalize_query_fills_missing_identifier_with_wildcard_for_ge() {
        let client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112)
                .unwrap()
                .with_manufacturer(ManufacturerQuirk::GE),
        );
        let query = InMemDicomObject::new_empty();
        let normalized = client.normalize_query(ResourceLevel::Study, &query);
        assert_eq!(
            normalized.get(tags::STUDY_INSTANCE_UID).unwrap().to_str().unwrap(),
            "*"
        );
    }

    #[test]
    fn generic_no_universal_wildcard_rewrites_star_to_empty() {
        let mut query = InMemDicomObject::new_empty();
        query.put_str(tags::PATIENT_NAME, VR::PN, "*");
        apply_manufacturer_quirk(ManufacturerQuirk::GenericNoUniversalWildcard, &mut query);
        assert_eq!(query.get(tags::PATIENT_NAME).unwrap().to_str().unwrap(), "");
    }

    #[test]
    fn generic_no_wildcard_in_dates_only_touches_date_tags() {
        let mut query = InMemDicomObject::new_empty();
        query.put_str(tags::STUDY_DATE, VR::DA, "*");
        query.put_str(tags::PATIENT_NAME, VR::PN, "*");
        apply_manufacturer_quirk(ManufacturerQuirk::GenericNoWildcardInDates, &mut query);
        assert_eq!(query.get(tags::STUDY_DATE).unwrap().to_str().unwrap(), "");
        assert_eq!(query.get(tags::PATIENT_NAME).unwrap().to_str().unwrap(), "*");
    }

    #[test]
    fn transfer_syntax_renegotiation_law() {
        let client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        // implicit (generic) -> JPEG baseline (specific): renegotiation required
        assert!(client
            .transfer_syntax_requires_renegotiation("1.2.840.10008.1.2.4.50")
            .unwrap());
    }

    #[test]
    fn request_storage_commitment_rejects_non_225_transaction_uid() {
        let mut client = ScuClient::new(
            "THIS-SCU",
            RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap(),
        );
        let result = client.request_storage_commitment("1.2.3", &[]);
        assert!(matches!(
            result,
            Err(crate::error::Error::ParameterOutOfRange { .. })
        ));
    }
}
