//! Per-Association DIMSE Dispatcher (C4).
//!
//! Grounded on Orthanc's `CommandDispatcher`
//! (`OrthancServer/Sources/Database/.../CommandDispatcher` analogue in the
//! DICOM networking layer: `Core/DicomNetworking/DicomServer.cpp`'s
//! accept-then-dispatch loop): read a command set off the association, pull
//! the command field out of it, reassemble the accompanying dataset (if
//! any) from further P-Data fragments, hand both to the matching
//! [`crate::handlers`] entry point, and send back whatever PDU that handler
//! produces. The loop ends on A-RELEASE-RQ, A-ABORT or an idle timeout.

use std::time::{Duration, Instant};

use dicom_encoding::transfer_syntax::TransferSyntaxIndex;
use dicom_transfer_syntax_registry::{entries, TransferSyntaxRegistry};
use dicom_ul::pdu::{PDataValue, PDataValueType, Pdu};
use dicom_ul::association::{Association, SyncAssociation, CloseSocket};
use snafu::{ensure, OptionExt, ResultExt, Snafu};

use crate::handlers::HandlerTable;
use crate::wire::{self, CommandSet};

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("failed to receive a PDU: {}", source))]
    Receive { source: dicom_ul::association::Error },

    #[snafu(display("failed to send a PDU: {}", source))]
    Send { source: dicom_ul::association::Error },

    #[snafu(display("idle timeout elapsed waiting for the next command"))]
    IdleTimeout,

    #[snafu(display("received a PDU that is not valid mid-association: {:?}", pdu))]
    UnexpectedPdu { pdu: Pdu },

    #[snafu(display("failed to parse command set: {}", source))]
    ParseCommand { source: dicom_object::ReadError },

    #[snafu(display("command set carries no Command Field element"))]
    MissingCommandField,

    #[snafu(display("no presentation context negotiated with id {}", id))]
    UnknownPresentationContext { id: u8 },

    #[snafu(display("handler failed: {}", source))]
    Handler { source: crate::handlers::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// How long to wait for the next command before treating the association
/// as abandoned by its peer.
#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    pub idle_timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        DispatchOptions {
            idle_timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// One fully reassembled command-plus-dataset unit read off the wire: the
/// decoded command set, the id of the presentation context it arrived on,
/// and the raw bytes of the accompanying dataset, if the command carried
/// one.
pub struct IncomingMessage {
    pub command: CommandSet,
    pub presentation_context_id: u8,
    pub dataset: Option<Vec<u8>>,
}

/// Run the dispatch loop over an already-established association,
/// consulting `handlers` for each incoming command, until the peer
/// releases or aborts the association or the idle timeout elapses.
///
/// `assoc` is expected to have been established with a short (~1s) socket
/// read timeout (see `SocketOptions::read_timeout`); each timed-out read
/// is treated as one tick of an elapsed-idle counter rather than an error,
/// matching `CommandDispatcher::Step()`'s reset-on-success accumulator.
pub fn run<S, A>(assoc: &mut A, handlers: &HandlerTable, options: DispatchOptions) -> Result<()>
where
    S: std::io::Read + std::io::Write + CloseSocket,
    A: Association + SyncAssociation<S>,
{
    let mut last_activity = Instant::now();
    loop {
        let message = match receive_message(assoc, options.idle_timeout, &mut last_activity)? {
            Some(message) => message,
            None => return Ok(()),
        };

        let ts = presentation_context_transfer_syntax(assoc, message.presentation_context_id)?;
        let command_field =
            wire::command_field(&message.command).context(MissingCommandFieldSnafu)?;
        let calling_ae_title = assoc.peer_ae_title();

        let response = handlers
            .dispatch(command_field, &message, calling_ae_title, ts)
            .context(HandlerSnafu)?;

        for pdu in response.pdus {
            SyncAssociation::send(assoc, &pdu).context(SendSnafu)?;
        }
        if response.release {
            return Ok(());
        }
    }
}

fn presentation_context_transfer_syntax<S, A>(
    assoc: &A,
    id: u8,
) -> Result<&'static dicom_encoding::TransferSyntax>
where
    S: std::io::Read + std::io::Write + CloseSocket,
    A: Association + SyncAssociation<S>,
{
    let pc = assoc
        .presentation_contexts()
        .iter()
        .find(|pc| pc.id == id)
        .context(UnknownPresentationContextSnafu { id })?;
    Ok(TransferSyntaxRegistry
        .get(&pc.transfer_syntax)
        .or_else(|| TransferSyntaxRegistry.get(entries::IMPLICIT_VR_LITTLE_ENDIAN.uid()))
        .expect("implicit VR little endian is always registered"))
}

/// Receive the next PDU, treating a timed-out socket read as one tick of
/// the elapsed-idle counter rather than a hard error. `last_activity` is
/// reset on every PDU actually received.
fn receive_pdu<S, A>(
    assoc: &mut A,
    idle_timeout: Option<Duration>,
    last_activity: &mut Instant,
) -> Result<Pdu>
where
    S: std::io::Read + std::io::Write + CloseSocket,
    A: Association + SyncAssociation<S>,
{
    loop {
        match SyncAssociation::receive(assoc) {
            Ok(pdu) => {
                *last_activity = Instant::now();
                return Ok(pdu);
            }
            Err(source) if is_read_timeout(&source) => {
                if let Some(idle_timeout) = idle_timeout {
                    ensure!(last_activity.elapsed() < idle_timeout, IdleTimeoutSnafu);
                }
            }
            Err(source) => return Err(Error::Receive { source }),
        }
    }
}

/// Whether an association-level error is a socket read timing out (as
/// opposed to a connection failure or a malformed PDU), matching the
/// short-blocking-read idiom `SocketOptions::read_timeout` enables.
fn is_read_timeout(error: &dicom_ul::association::Error) -> bool {
    use dicom_ul::association::Error as AssocError;
    use dicom_ul::pdu::reader::Error as ReaderError;

    matches!(
        error,
        AssocError::Receive {
            source: ReaderError::ReadPdu { source }
        } if matches!(
            source.kind(),
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
        )
    )
}

/// Read the next command (and, if the command indicates one follows, its
/// dataset) from the association. Returns `None` once the peer has
/// released the association.
fn receive_message<S, A>(
    assoc: &mut A,
    idle_timeout: Option<Duration>,
    last_activity: &mut Instant,
) -> Result<Option<IncomingMessage>>
where
    S: std::io::Read + std::io::Write + CloseSocket,
    A: Association + SyncAssociation<S>,
{
    let mut command_bytes = Vec::new();
    let mut presentation_context_id = None;

    loop {
        let pdu = receive_pdu(assoc, idle_timeout, last_activity)?;
        match pdu {
            Pdu::PData { data } => {
                for fragment in data {
                    let PDataValue {
                        presentation_context_id: pc_id,
                        value_type,
                        is_last,
                        data,
                    } = fragment;
                    presentation_context_id.get_or_insert(pc_id);
                    if value_type != PDataValueType::Command {
                        // a command always arrives before its dataset; a stray
                        // data fragment here belongs to no command and is dropped
                        continue;
                    }
                    command_bytes.extend_from_slice(&data);
                    if !is_last {
                        continue;
                    }
                    let command =
                        wire::read_command_set(&command_bytes).context(ParseCommandSnafu)?;
                    let presentation_context_id = presentation_context_id.expect("set above");
                    if !wire::has_dataset(&command) {
                        return Ok(Some(IncomingMessage {
                            command,
                            presentation_context_id,
                            dataset: None,
                        }));
                    }
                    return read_dataset_tail(
                        assoc,
                        command,
                        presentation_context_id,
                        idle_timeout,
                        last_activity,
                    );
                }
            }
            Pdu::ReleaseRQ => {
                SyncAssociation::send(assoc, &Pdu::ReleaseRP).context(SendSnafu)?;
                return Ok(None);
            }
            Pdu::AbortRQ { .. } => return Ok(None),
            other => return UnexpectedPduSnafu { pdu: other }.fail(),
        }
    }
}

/// Continue reading P-Data fragments until the dataset that follows
/// `command` is fully reassembled.
fn read_dataset_tail<S, A>(
    assoc: &mut A,
    command: CommandSet,
    presentation_context_id: u8,
    idle_timeout: Option<Duration>,
    last_activity: &mut Instant,
) -> Result<Option<IncomingMessage>>
where
    S: std::io::Read + std::io::Write + CloseSocket,
    A: Association + SyncAssociation<S>,
{
    let mut dataset_bytes = Vec::new();
    loop {
        let pdu = receive_pdu(assoc, idle_timeout, last_activity)?;
        match pdu {
            Pdu::PData { data } => {
                for fragment in data {
                    if fragment.value_type == PDataValueType::Data {
                        dataset_bytes.extend_from_slice(&fragment.data);
                        if fragment.is_last {
                            return Ok(Some(IncomingMessage {
                                command,
                                presentation_context_id,
                                dataset: Some(dataset_bytes),
                            }));
                        }
                    }
                }
            }
            other => return UnexpectedPduSnafu { pdu: other }.fail(),
        }
    }
}

