//! Association requestor module
//!
//! The module provides an abstraction for a DICOM association
//! in which this application entity requests an association
//! to another, listening DICOM node.
//! See [`ClientAssociationOptions`] for details and examples on how
//! to create an association.
use bytes::BytesMut;
use std::borrow::Cow;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use snafu::{ensure, ResultExt};

use crate::association::private::SyncAssociationSealed;
use crate::association::{
    encode_pdu, read_pdu_from_wire, Association, CloseSocket, MissingAbstractSyntaxSnafu,
    SendPduSnafu, SocketOptions, SyncAssociation, UnexpectedPduSnafu, UnknownPduSnafu,
    WireSendSnafu,
};
use crate::pdu::{
    write_pdu, AssociationAC, AssociationRJ, AssociationRQ, Pdu, PresentationContextProposed,
    PresentationContextResultReason, UserVariableItem, DEFAULT_MAX_PDU, LARGE_PDU_SIZE,
    PDU_HEADER_SIZE,
};
use crate::{IMPLEMENTATION_CLASS_UID, IMPLEMENTATION_VERSION_NAME};

use super::uid::trim_uid;
use super::{Error, Result};

#[cfg(feature = "sync-tls")]
pub type TlsStream = rustls::StreamOwned<rustls::ClientConnection, std::net::TcpStream>;

/// A DICOM association builder for a requesting DICOM node,
/// usually taking the role of a service class user (SCU).
///
/// This is the standard way of requesting and establishing
/// an association with another DICOM node,
/// that one usually taking the role of a service class provider (SCP).
/// The outcome is a [`ClientAssociation`].
///
/// # Example
///
/// ```no_run
/// # use dicom_ul::association::client::ClientAssociationOptions;
///
/// # fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let association = ClientAssociationOptions::new()
///    .with_abstract_syntax("1.2.840.10008.1.1")
///    .with_transfer_syntax("1.2.840.10008.1.2.1")
///    .establish("129.168.0.5:104")?;
/// # Ok(())
/// # }
/// ```
///
/// The SCU will admit by default the transfer syntaxes
/// _Implicit VR Little Endian_
/// and _Explicit VR Little Endian_,
/// unless other transfer syntaxes are indicated
/// through calls to [`with_transfer_syntax`](Self::with_transfer_syntax).
#[derive(Debug, Clone)]
pub struct ClientAssociationOptions<'a> {
    /// the calling AE title
    calling_ae_title: Cow<'a, str>,
    /// the called AE title
    called_ae_title: Cow<'a, str>,
    /// the requested application context name
    application_context_name: Cow<'a, str>,
    /// the list of requested abstract syntaxes, with their own
    /// transfer syntax candidates
    presentation_contexts: Vec<(Cow<'a, str>, Vec<Cow<'a, str>>)>,
    /// the default transfer syntax candidates,
    /// applied to abstract syntaxes with none of their own
    transfer_syntax_uids: Vec<Cow<'a, str>>,
    /// the expected protocol version
    protocol_version: u16,
    /// the maximum PDU length
    max_pdu_length: u32,
    /// whether to receive PDUs in strict mode
    strict: bool,
    /// options for the underlying TCP socket
    socket_options: SocketOptions,
    /// TLS configuration for the underlying TCP socket
    #[cfg(feature = "sync-tls")]
    tls_config: Option<std::sync::Arc<rustls::ClientConfig>>,
    #[cfg(feature = "sync-tls")]
    server_name: Option<rustls::pki_types::ServerName<'static>>,
}

impl Default for ClientAssociationOptions<'_> {
    fn default() -> Self {
        ClientAssociationOptions {
            calling_ae_title: "THIS-SCU".into(),
            called_ae_title: "ANY-SCP".into(),
            application_context_name: "1.2.840.10008.3.1.1.1".into(),
            presentation_contexts: Vec::new(),
            transfer_syntax_uids: Vec::new(),
            protocol_version: 1,
            max_pdu_length: DEFAULT_MAX_PDU,
            strict: true,
            socket_options: SocketOptions::default(),
            #[cfg(feature = "sync-tls")]
            tls_config: None,
            #[cfg(feature = "sync-tls")]
            server_name: None,
        }
    }
}

impl<'a> ClientAssociationOptions<'a> {
    /// Create a new set of options for establishing an association.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the calling application entity title for the association,
    /// which refers to this DICOM node.
    ///
    /// The default is `THIS-SCU`.
    pub fn calling_ae_title<T>(mut self, calling_ae_title: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        self.calling_ae_title = calling_ae_title.into();
        self
    }

    /// Define the called application entity title for the association,
    /// which refers to the target DICOM node.
    ///
    /// The default is `ANY-SCP`.
    pub fn called_ae_title<T>(mut self, called_ae_title: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        self.called_ae_title = called_ae_title.into();
        self
    }

    /// Include this abstract syntax
    /// in the list of proposed presentation contexts,
    /// paired with the transfer syntaxes already registered through
    /// [`with_transfer_syntax`](Self::with_transfer_syntax).
    pub fn with_abstract_syntax<T>(mut self, abstract_syntax_uid: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        self.presentation_contexts
            .push((trim_uid(abstract_syntax_uid.into()), Vec::new()));
        self
    }

    /// Include this transfer syntax in each proposed presentation context
    /// that does not already carry transfer syntax candidates of its own.
    pub fn with_transfer_syntax<T>(mut self, transfer_syntax_uid: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        self.transfer_syntax_uids
            .push(trim_uid(transfer_syntax_uid.into()));
        self
    }

    /// Override the maximum expected PDU length.
    pub fn max_pdu_length(mut self, value: u32) -> Self {
        self.max_pdu_length = value;
        self
    }

    /// Override strict mode:
    /// whether receiving PDUs must not
    /// surpass the negotiated maximum PDU length.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the read timeout for the underlying TCP socket
    pub fn read_timeout(self, timeout: Duration) -> Self {
        Self {
            socket_options: SocketOptions {
                read_timeout: Some(timeout),
                write_timeout: self.socket_options.write_timeout,
            },
            ..self
        }
    }

    /// Set the write timeout for the underlying TCP socket
    pub fn write_timeout(self, timeout: Duration) -> Self {
        Self {
            socket_options: SocketOptions {
                read_timeout: self.socket_options.read_timeout,
                write_timeout: Some(timeout),
            },
            ..self
        }
    }

    /// Set the TLS configuration for the underlying TCP socket
    #[cfg(feature = "sync-tls")]
    pub fn tls_config(
        mut self,
        config: impl Into<std::sync::Arc<rustls::ClientConfig>>,
        server_name: rustls::pki_types::ServerName<'static>,
    ) -> Self {
        self.tls_config = Some(config.into());
        self.server_name = Some(server_name);
        self
    }

    fn build_request_pdu(&self) -> (Pdu, Vec<PresentationContextProposed>) {
        let presentation_contexts: Vec<_> = self
            .presentation_contexts
            .iter()
            .enumerate()
            .map(|(i, (abstract_syntax, transfer_syntaxes))| {
                let transfer_syntaxes = if transfer_syntaxes.is_empty() {
                    if self.transfer_syntax_uids.is_empty() {
                        vec![
                            "1.2.840.10008.1.2.1".to_string(),
                            "1.2.840.10008.1.2".to_string(),
                        ]
                    } else {
                        self.transfer_syntax_uids.iter().map(|ts| ts.to_string()).collect()
                    }
                } else {
                    transfer_syntaxes.iter().map(|ts| ts.to_string()).collect()
                };
                PresentationContextProposed {
                    id: (i * 2 + 1) as u8,
                    abstract_syntax: abstract_syntax.to_string(),
                    transfer_syntaxes,
                }
            })
            .collect();

        let pdu = Pdu::AssociationRQ(AssociationRQ {
            protocol_version: self.protocol_version,
            calling_ae_title: self.calling_ae_title.to_string(),
            called_ae_title: self.called_ae_title.to_string(),
            application_context_name: self.application_context_name.to_string(),
            presentation_contexts: presentation_contexts.clone(),
            user_variables: vec![UserVariableItem::MaxLength(self.max_pdu_length)],
        });

        (pdu, presentation_contexts)
    }

    fn process_response(
        &self,
        msg: Pdu,
        proposed: Vec<PresentationContextProposed>,
    ) -> Result<(
        Vec<(u8, String, String)>,
        Vec<crate::pdu::PresentationContextNegotiated>,
        u32,
        String,
        Vec<UserVariableItem>,
    )> {
        match msg {
            Pdu::AssociationAC(AssociationAC {
                protocol_version,
                presentation_contexts,
                calling_ae_title: _,
                called_ae_title: _,
                application_context_name: _,
                user_variables,
            }) => {
                ensure!(
                    protocol_version == self.protocol_version,
                    super::ProtocolVersionMismatchSnafu {
                        expected: self.protocol_version,
                        got: protocol_version,
                    }
                );

                let accepted: Vec<_> = presentation_contexts
                    .iter()
                    .filter(|pc| pc.reason == PresentationContextResultReason::Acceptance)
                    .filter_map(|pc| {
                        proposed
                            .iter()
                            .find(|p| p.id == pc.id)
                            .map(|p| (pc.id, p.abstract_syntax.clone(), pc.transfer_syntax.clone()))
                    })
                    .collect();

                ensure!(
                    !accepted.is_empty(),
                    super::NoAcceptedPresentationContextsSnafu
                );

                let negotiated: Vec<_> = presentation_contexts
                    .into_iter()
                    .filter_map(|pc| {
                        proposed.iter().find(|p| p.id == pc.id).map(|p| {
                            crate::pdu::PresentationContextNegotiated {
                                id: pc.id,
                                reason: pc.reason,
                                transfer_syntax: pc.transfer_syntax,
                                abstract_syntax: p.abstract_syntax.clone(),
                            }
                        })
                    })
                    .collect();

                let peer_max_pdu_length = user_variables
                    .iter()
                    .find_map(|item| match item {
                        UserVariableItem::MaxLength(len) => Some(*len),
                        _ => None,
                    })
                    .unwrap_or(DEFAULT_MAX_PDU);
                let peer_max_pdu_length = if peer_max_pdu_length == 0 {
                    u32::MAX
                } else {
                    peer_max_pdu_length
                };

                Ok((
                    accepted,
                    negotiated,
                    peer_max_pdu_length,
                    self.called_ae_title.to_string(),
                    user_variables,
                ))
            }
            Pdu::AssociationRJ(association_rj) => {
                super::RejectedSnafu { association_rj }.fail()
            }
            pdu @ Pdu::AssociationRQ { .. }
            | pdu @ Pdu::PData { .. }
            | pdu @ Pdu::ReleaseRQ
            | pdu @ Pdu::ReleaseRP
            | pdu @ Pdu::AbortRQ { .. } => UnexpectedPduSnafu { pdu }.fail(),
            pdu @ Pdu::Unknown { .. } => UnknownPduSnafu { pdu }.fail(),
        }
    }

    /// Initiate the TCP connection and negotiate an association
    /// with the DICOM node at the given address.
    pub fn establish<A: ToSocketAddrs>(&self, address: A) -> Result<ClientAssociation<TcpStream>> {
        ensure!(
            !self.presentation_contexts.is_empty(),
            MissingAbstractSyntaxSnafu
        );

        let mut socket = TcpStream::connect(address).context(super::ConnectSnafu)?;
        socket
            .set_read_timeout(self.socket_options.read_timeout)
            .context(super::SetReadTimeoutSnafu)?;
        socket
            .set_write_timeout(self.socket_options.write_timeout)
            .context(super::SetWriteTimeoutSnafu)?;

        let (request, proposed) = self.build_request_pdu();
        let mut write_buffer: Vec<u8> = Vec::with_capacity(self.max_pdu_length as usize);
        write_pdu(&mut write_buffer, &request).context(SendPduSnafu)?;
        socket.write_all(&write_buffer).context(WireSendSnafu)?;

        let mut read_buffer = BytesMut::with_capacity(
            (self.max_pdu_length.min(LARGE_PDU_SIZE) + PDU_HEADER_SIZE) as usize,
        );
        let msg = read_pdu_from_wire(&mut socket, &mut read_buffer, self.max_pdu_length, self.strict)?;

        let (accepted, negotiated, peer_max_pdu_length, peer_ae_title, peer_user_variables) =
            self.process_response(msg, proposed)?;

        Ok(ClientAssociation {
            presentation_contexts: accepted,
            negotiated_contexts: negotiated,
            requestor_max_pdu_length: peer_max_pdu_length,
            acceptor_max_pdu_length: self.max_pdu_length,
            socket,
            peer_ae_title,
            peer_user_variables,
            write_buffer,
            read_buffer,
            strict: self.strict,
            implementation_class_uid: IMPLEMENTATION_CLASS_UID.to_string(),
            implementation_version_name: IMPLEMENTATION_VERSION_NAME.to_string(),
        })
    }

    /// Initiate the TCP connection and negotiate an association
    /// over a TLS-secured channel.
    #[cfg(feature = "sync-tls")]
    pub fn establish_tls<A: ToSocketAddrs>(&self, address: A) -> Result<ClientAssociation<TlsStream>> {
        ensure!(
            !self.presentation_contexts.is_empty(),
            MissingAbstractSyntaxSnafu
        );
        let tls_config = self
            .tls_config
            .as_ref()
            .ok_or_else(|| super::TlsConfigMissingSnafu {}.build())?;
        let server_name = self
            .server_name
            .clone()
            .ok_or_else(|| super::TlsConfigMissingSnafu {}.build())?;

        let mut socket = TcpStream::connect(address).context(super::ConnectSnafu)?;
        socket
            .set_read_timeout(self.socket_options.read_timeout)
            .context(super::SetReadTimeoutSnafu)?;
        socket
            .set_write_timeout(self.socket_options.write_timeout)
            .context(super::SetWriteTimeoutSnafu)?;

        let conn = rustls::ClientConnection::new(tls_config.clone(), server_name)
            .context(super::TlsConnectionSnafu)?;
        let mut tls_stream = rustls::StreamOwned::new(conn, socket);

        let (request, proposed) = self.build_request_pdu();
        let mut write_buffer: Vec<u8> = Vec::with_capacity(self.max_pdu_length as usize);
        write_pdu(&mut write_buffer, &request).context(SendPduSnafu)?;
        tls_stream.write_all(&write_buffer).context(WireSendSnafu)?;

        let mut read_buffer = BytesMut::with_capacity(
            (self.max_pdu_length.min(LARGE_PDU_SIZE) + PDU_HEADER_SIZE) as usize,
        );
        let msg = read_pdu_from_wire(&mut tls_stream, &mut read_buffer, self.max_pdu_length, self.strict)?;

        let (accepted, negotiated, peer_max_pdu_length, peer_ae_title, peer_user_variables) =
            self.process_response(msg, proposed)?;

        Ok(ClientAssociation {
            presentation_contexts: accepted,
            negotiated_contexts: negotiated,
            requestor_max_pdu_length: peer_max_pdu_length,
            acceptor_max_pdu_length: self.max_pdu_length,
            socket: tls_stream,
            peer_ae_title,
            peer_user_variables,
            write_buffer,
            read_buffer,
            strict: self.strict,
            implementation_class_uid: IMPLEMENTATION_CLASS_UID.to_string(),
            implementation_version_name: IMPLEMENTATION_VERSION_NAME.to_string(),
        })
    }
}

/// A DICOM upper level association from the perspective
/// of a requesting application entity.
///
/// The most common operations of an established association are
/// [`send`](SyncAssociation::send)
/// and [`receive`](SyncAssociation::receive).
///
/// When the value falls out of scope,
/// the program will attempt to release the association gracefully
/// before shutting down the underlying TCP connection.
#[derive(Debug)]
pub struct ClientAssociation<S>
where
    S: std::io::Read + std::io::Write + CloseSocket,
{
    /// the accepted presentation contexts: (id, abstract syntax, transfer syntax)
    presentation_contexts: Vec<(u8, String, String)>,
    /// the accepted presentation contexts, in negotiated form
    negotiated_contexts: Vec<crate::pdu::PresentationContextNegotiated>,
    /// user variables presented by the acceptor at negotiation time
    peer_user_variables: Vec<UserVariableItem>,
    /// the maximum PDU length that the acceptor accepts
    requestor_max_pdu_length: u32,
    /// the maximum PDU length that this application entity is expecting to receive
    acceptor_max_pdu_length: u32,
    /// the TCP stream to the other DICOM node
    socket: S,
    /// the application entity title of the other DICOM node
    peer_ae_title: String,
    /// reusable buffer for sending PDUs on the wire
    write_buffer: Vec<u8>,
    /// read buffer from the socket
    read_buffer: BytesMut,
    /// whether to receive PDUs in strict mode
    strict: bool,
    implementation_class_uid: String,
    implementation_version_name: String,
}

impl<S> ClientAssociation<S>
where
    S: std::io::Read + std::io::Write + CloseSocket,
{
    /// Retrieve the accepted presentation contexts,
    /// as `(id, abstract syntax UID, transfer syntax UID)` triples.
    pub fn accepted_presentation_contexts(&self) -> &[(u8, String, String)] {
        &self.presentation_contexts
    }

    /// Find the identifier of an accepted presentation context
    /// supporting the given abstract syntax,
    /// returning its negotiated transfer syntax as well.
    pub fn find_presentation_context(&self, abstract_syntax_uid: &str) -> Option<(u8, &str)> {
        self.presentation_contexts
            .iter()
            .find(|(_, asu, _)| asu == abstract_syntax_uid)
            .map(|(id, _, ts)| (*id, ts.as_str()))
    }

    pub fn implementation_class_uid(&self) -> &str {
        &self.implementation_class_uid
    }

    pub fn implementation_version_name(&self) -> &str {
        &self.implementation_version_name
    }
}

impl<S> Association for ClientAssociation<S>
where
    S: std::io::Read + std::io::Write + CloseSocket,
{
    fn presentation_contexts(&self) -> &[crate::pdu::PresentationContextNegotiated] {
        &self.negotiated_contexts
    }

    fn acceptor_max_pdu_length(&self) -> u32 {
        self.acceptor_max_pdu_length
    }

    fn requestor_max_pdu_length(&self) -> u32 {
        self.requestor_max_pdu_length
    }

    fn peer_ae_title(&self) -> &str {
        &self.peer_ae_title
    }

    fn user_variables(&self) -> &[UserVariableItem] {
        &self.peer_user_variables
    }
}

impl<S> SyncAssociationSealed<S> for ClientAssociation<S>
where
    S: std::io::Read + std::io::Write + CloseSocket,
{
    fn send(&mut self, pdu: &Pdu) -> Result<()> {
        self.write_buffer.clear();
        encode_pdu(
            &mut self.write_buffer,
            pdu,
            self.requestor_max_pdu_length + PDU_HEADER_SIZE,
        )?;
        self.socket.write_all(&self.write_buffer).context(WireSendSnafu)
    }

    fn receive(&mut self) -> Result<Pdu> {
        read_pdu_from_wire(
            &mut self.socket,
            &mut self.read_buffer,
            self.acceptor_max_pdu_length,
            self.strict,
        )
    }

    fn close(&mut self) -> std::io::Result<()> {
        self.socket.close()
    }
}

impl<S> SyncAssociation<S> for ClientAssociation<S>
where
    S: std::io::Read + std::io::Write + CloseSocket,
{
    fn inner_stream(&mut self) -> &mut S {
        &mut self.socket
    }

    fn get_mut(&mut self) -> (&mut S, &mut BytesMut) {
        let Self {
            socket,
            read_buffer,
            ..
        } = self;
        (socket, read_buffer)
    }
}

impl<S> ClientAssociation<S>
where
    S: std::io::Read + std::io::Write + CloseSocket,
{
    /// Gracefully release the association:
    /// send an A-RELEASE-RQ and wait for the A-RELEASE-RP.
    pub fn release(&mut self) -> Result<()> {
        SyncAssociation::send(self, &Pdu::ReleaseRQ)?;
        let pdu = SyncAssociation::receive(self)?;
        match pdu {
            Pdu::ReleaseRP => {}
            pdu @ Pdu::AbortRQ { .. }
            | pdu @ Pdu::AssociationAC { .. }
            | pdu @ Pdu::AssociationRJ { .. }
            | pdu @ Pdu::AssociationRQ { .. }
            | pdu @ Pdu::PData { .. }
            | pdu @ Pdu::ReleaseRQ => return UnexpectedPduSnafu { pdu }.fail(),
            pdu @ Pdu::Unknown { .. } => return UnknownPduSnafu { pdu }.fail(),
        }
        let _ = self.close();
        Ok(())
    }

    /// Abort the association immediately, without releasing gracefully.
    pub fn abort(&mut self) -> Result<()> {
        let pdu = Pdu::AbortRQ {
            source: crate::pdu::AbortRQSource::ServiceUser,
        };
        let _ = SyncAssociation::send(self, &pdu);
        let _ = self.close();
        Ok(())
    }
}

impl<S> Drop for ClientAssociation<S>
where
    S: std::io::Read + std::io::Write + CloseSocket,
{
    fn drop(&mut self) {
        let _ = self.release();
    }
}
