//! DICOM association module
//!
//! This module contains utilities for establishing associations
//! between DICOM nodes via TCP/IP, from the perspective of a service
//! class user ([`client`]) or a service class provider ([`server`]).

use std::io::Read;
use std::time::Duration;

use bytes::BytesMut;
use snafu::{ResultExt, Snafu};

use crate::pdu::{
    reader::read_pdu, writer::write_pdu, AssociationRJ, Pdu, PresentationContextNegotiated,
    UserVariableItem,
};

pub mod client;
pub mod pdata;
pub mod server;
mod uid;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// no abstract syntax was registered for negotiation
    MissingAbstractSyntax,

    /// association rejected by the acceptor
    #[non_exhaustive]
    Rejected { association_rj: AssociationRJ },

    /// association aborted
    Aborted,

    #[snafu(display("unexpected PDU `{:?}`", pdu))]
    #[non_exhaustive]
    UnexpectedPdu { pdu: Pdu },

    #[snafu(display("unknown PDU `{:?}`", pdu))]
    #[non_exhaustive]
    UnknownPdu { pdu: Pdu },

    /// failed to send PDU message
    SendPdu { source: crate::pdu::WriteError },

    /// failed to write PDU bytes to the wire
    WireSend { source: std::io::Error },

    /// failed to receive PDU message
    Receive { source: crate::pdu::reader::Error },

    /// failed to set the socket read timeout
    SetReadTimeout { source: std::io::Error },

    /// failed to set the socket write timeout
    SetWriteTimeout { source: std::io::Error },

    /// TLS configuration is missing
    TlsConfigMissing,

    /// TLS connection failure
    #[cfg(feature = "sync-tls")]
    TlsConnection { source: std::io::Error },

    /// protocol version mismatch
    #[snafu(display("protocol version mismatch: expected {}, got {}", expected, got))]
    ProtocolVersionMismatch { expected: u16, got: u16 },

    /// no presentation contexts were accepted by the acceptor
    NoAcceptedPresentationContexts,

    /// failed to connect to the remote application entity
    Connect { source: std::io::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Outcome of negotiating an incoming A-ASSOCIATE-RQ.
#[derive(Debug, Clone)]
pub struct NegotiatedOptions {
    pub user_variables: Vec<UserVariableItem>,
    pub presentation_contexts: Vec<PresentationContextNegotiated>,
    pub peer_max_pdu_length: u32,
    pub peer_ae_title: String,
}

/// Common read-only view over an established association,
/// regardless of which side initiated it.
pub trait Association {
    /// The presentation contexts accorded for this association.
    fn presentation_contexts(&self) -> &[PresentationContextNegotiated];

    /// The maximum PDU length admitted by this application entity.
    fn acceptor_max_pdu_length(&self) -> u32;

    /// The maximum PDU length the requestor declared it can receive.
    fn requestor_max_pdu_length(&self) -> u32;

    /// The application entity title of the other node.
    fn peer_ae_title(&self) -> &str;

    /// The user variables presented by the requestor at negotiation time.
    fn user_variables(&self) -> &[UserVariableItem];
}

pub(crate) mod private {
    use super::{Pdu, Result};

    /// Sealed implementation details of a synchronous association.
    pub trait SyncAssociationSealed<S> {
        fn send(&mut self, pdu: &Pdu) -> Result<()>;
        fn receive(&mut self) -> Result<Pdu>;
        fn close(&mut self) -> std::io::Result<()>;
    }
}

/// A socket-like type that can be shut down independently of being dropped.
pub trait CloseSocket {
    fn close(&mut self) -> std::io::Result<()>;
}

impl CloseSocket for std::net::TcpStream {
    fn close(&mut self) -> std::io::Result<()> {
        self.shutdown(std::net::Shutdown::Both)
    }
}

#[cfg(feature = "sync-tls")]
impl CloseSocket for rustls::StreamOwned<rustls::ServerConnection, std::net::TcpStream> {
    fn close(&mut self) -> std::io::Result<()> {
        self.sock.shutdown(std::net::Shutdown::Both)
    }
}

/// Socket-level timeout configuration applied at association negotiation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SocketOptions {
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

/// Operations common to both client and server associations
/// once established: sending/receiving PDUs and closing the connection.
///
/// This trait is sealed: it cannot be implemented outside of this crate,
/// but its methods are free to use.
pub trait SyncAssociation<S>: private::SyncAssociationSealed<S>
where
    S: std::io::Read + std::io::Write + CloseSocket,
{
    /// Obtain mutable access to the underlying stream.
    fn inner_stream(&mut self) -> &mut S;

    /// Obtain mutable access to both the stream and the read buffer,
    /// for use by lower-level PDU readers.
    fn get_mut(&mut self) -> (&mut S, &mut BytesMut);

    /// Send a PDU message to the peer.
    fn send(&mut self, pdu: &Pdu) -> Result<()> {
        private::SyncAssociationSealed::send(self, pdu)
    }

    /// Read the next PDU message sent by the peer.
    fn receive(&mut self) -> Result<Pdu> {
        private::SyncAssociationSealed::receive(self)
    }

    /// Shut down the association's underlying connection immediately.
    fn close(&mut self) -> std::io::Result<()> {
        private::SyncAssociationSealed::close(self)
    }

    /// Start writing a P-Data value in fragments,
    /// for the given presentation context.
    fn send_pdata(&mut self, presentation_context_id: u8) -> pdata::PDataWriter<&mut S> {
        let max_pdu_length = self.requestor_max_pdu_length_hint();
        let stream = self.inner_stream();
        pdata::PDataWriter::new(stream, presentation_context_id, max_pdu_length)
    }

    /// Internal hint for [`send_pdata`](SyncAssociation::send_pdata);
    /// overridden by the concrete association types.
    fn requestor_max_pdu_length_hint(&self) -> u32 {
        crate::pdu::DEFAULT_MAX_PDU
    }
}

/// Encode a PDU into `buffer`, failing if the resulting message
/// would exceed `max_len` (the receiver's negotiated maximum PDU length).
pub(crate) fn encode_pdu(buffer: &mut Vec<u8>, pdu: &Pdu, _max_len: u32) -> Result<()> {
    write_pdu(buffer, pdu).context(SendPduSnafu)
}

/// Read a single PDU off the wire, using `read_buffer` as scratch space.
pub(crate) fn read_pdu_from_wire<S: Read>(
    socket: &mut S,
    _read_buffer: &mut BytesMut,
    max_pdu_length: u32,
    strict: bool,
) -> Result<Pdu> {
    read_pdu(socket, max_pdu_length, strict).context(ReceiveSnafu)
}
