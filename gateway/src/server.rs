//! Server Supervisor (C8).
//!
//! Grounded on `Core/DicomNetworking/DicomServer.{h,cpp}` for the
//! listen/accept lifecycle and configuration surface, and on
//! `Core/MultiThreading/ThreadedCommandProcessor.{h,cpp}` for the worker
//! pool: a fixed-size `std::thread` pool fed by a bounded queue, rather
//! than a pulled-in async runtime. Each worker negotiates one incoming
//! association and then runs [`crate::dispatcher::run`] over it until the
//! peer releases, aborts, or goes idle past the association timeout.

use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use dicom_ul::association::server::{AccessControl, ServerAssociationOptions};
use dicom_ul::association::Association;
use dicom_ul::pdu::{AssociationRJServiceUserReason, UserIdentity};
use snafu::{ResultExt, Snafu};

use crate::dispatcher::{self, DispatchOptions};
use crate::handlers::HandlerTable;
use crate::model::RemoteModalities;
use crate::policy::Policy;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("failed to bind listener on port {}: {}", port, source))]
    Bind { port: u16, source: std::io::Error },

    #[snafu(display("failed to negotiate an incoming association: {}", source))]
    Establish { source: dicom_ul::association::Error },

    #[snafu(display("dispatch loop failed: {}", source))]
    Dispatch { source: dispatcher::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Configuration for a [`ServerSupervisor`], matching `DicomServer`'s own
/// setters: a listening port, an application entity title, a called-AET
/// check flag, an idle association timeout, and a worker pool width.
#[derive(Clone)]
pub struct ServerConfig {
    pub ae_title: String,
    pub port: u16,
    /// Reject associations whose called AE title does not match
    /// [`ServerConfig::ae_title`].
    pub check_called_aet: bool,
    /// `None` disables the timeout (`DicomScpTimeout = 0` in the original
    /// configuration table).
    pub association_timeout: Option<Duration>,
    pub worker_pool_size: usize,
    pub max_pdu_length: u32,
    pub policy: Policy,
    /// Consulted, when present, to additionally reject associations whose
    /// calling AE title names no known remote modality.
    pub remote_modalities: Option<Arc<dyn RemoteModalities>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            ae_title: "RUST-SCP".to_string(),
            port: 104,
            check_called_aet: true,
            association_timeout: Some(Duration::from_secs(30)),
            worker_pool_size: 4,
            max_pdu_length: dicom_ul::pdu::DEFAULT_MAX_PDU,
            policy: Policy::default(),
            remote_modalities: None,
        }
    }
}

/// An access control rule translating [`ServerConfig::check_called_aet`]
/// and [`ServerConfig::remote_modalities`] into the single
/// [`AccessControl`] hook `dicom_ul`'s acceptor offers. Unlike
/// [`Policy::allowed_transfer_syntaxes_for`], which varies per proposed
/// abstract syntax, this decision is made once per incoming association,
/// before any presentation context is inspected.
#[derive(Clone)]
struct ConfiguredAccessControl {
    check_called_aet: bool,
    remote_modalities: Option<Arc<dyn RemoteModalities>>,
}

impl AccessControl for ConfiguredAccessControl {
    fn check_access(
        &self,
        this_ae_title: &str,
        calling_ae_title: &str,
        called_ae_title: &str,
        _user_identity: Option<&UserIdentity>,
    ) -> std::result::Result<(), AssociationRJServiceUserReason> {
        if self.check_called_aet && this_ae_title != called_ae_title {
            return Err(AssociationRJServiceUserReason::CalledAETitleNotRecognized);
        }
        if let Some(modalities) = &self.remote_modalities {
            if modalities.lookup_aet(calling_ae_title).is_none() {
                return Err(AssociationRJServiceUserReason::CallingAETitleNotRecognized);
            }
        }
        Ok(())
    }
}

/// Translate `config`'s policy into the flatter builder surface
/// `ServerAssociationOptions` offers.
///
/// [`Policy`] can vary the allowed transfer syntaxes per proposed
/// abstract syntax and consult a promiscuous filter keyed on the
/// requesting peer; the acceptor builder only proposes one flat list of
/// transfer syntaxes for every abstract syntax and one global
/// promiscuous flag. The proposed list is therefore the union of the
/// generic (non-dataset-bearing) transfer syntaxes with
/// `storage_transfer_syntaxes`, and promiscuous mode is turned on
/// whenever a promiscuous filter is configured at all, regardless of
/// what it would decide for a given peer.
fn build_association_options(
    config: &ServerConfig,
) -> ServerAssociationOptions<'static, ConfiguredAccessControl> {
    let policy = &config.policy;

    let mut options = ServerAssociationOptions::new()
        .ae_access_control(ConfiguredAccessControl {
            check_called_aet: config.check_called_aet,
            remote_modalities: config.remote_modalities.clone(),
        })
        .ae_title(config.ae_title.clone())
        .max_pdu_length(config.max_pdu_length)
        .promiscuous(policy.promiscuous_filter.is_some())
        .read_timeout(DISPATCH_POLL_INTERVAL)
        .write_timeout(DISPATCH_POLL_INTERVAL);

    for abstract_syntax in &policy.known_abstract_syntaxes {
        options = options.with_abstract_syntax(abstract_syntax.clone());
    }
    for sop_class in &policy.storage_sop_classes {
        options = options.with_abstract_syntax(sop_class.clone());
    }
    if policy.storage_commitment_dual_role {
        options = options
            .with_abstract_syntax(dicom_dictionary_std::uids::STORAGE_COMMITMENT_PUSH_MODEL);
    }

    options = options
        .with_transfer_syntax("1.2.840.10008.1.2.1") // Explicit VR Little Endian
        .with_transfer_syntax("1.2.840.10008.1.2"); // Implicit VR Little Endian
    for ts in &policy.storage_transfer_syntaxes {
        options = options.with_transfer_syntax(ts.clone());
    }

    options
}

/// How long a worker blocks on a single association read before checking
/// for peer idleness and supervisor shutdown. `dispatcher::run`'s idle
/// accounting depends on this being short relative to
/// [`ServerConfig::association_timeout`].
const DISPATCH_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long the accept loop blocks between polling the shutdown flag
/// while no connection is pending.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

struct ServerInner {
    config: ServerConfig,
    handlers: HandlerTable,
    shutdown: AtomicBool,
    /// The port actually bound by `start()`, once known. Differs from
    /// `config.port` whenever the caller asked for an OS-assigned
    /// ephemeral port (`port: 0`), which `TcpListener::local_addr` only
    /// resolves after `bind` succeeds.
    bound_port: Mutex<Option<u16>>,
}

/// The listening endpoint (C8): accepts incoming TCP connections, hands
/// each one through association negotiation, and dispatches accepted
/// associations across a small fixed-size worker pool.
///
/// Mirrors `DicomServer`'s `Start()`/`Stop()` lifecycle: [`start`] spawns
/// an acceptor thread plus the worker pool and returns immediately;
/// [`stop`] signals every thread to wind down and joins them.
///
/// [`start`]: ServerSupervisor::start
/// [`stop`]: ServerSupervisor::stop
pub struct ServerSupervisor {
    inner: Arc<ServerInner>,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl ServerSupervisor {
    pub fn new(config: ServerConfig, handlers: HandlerTable) -> Self {
        ServerSupervisor {
            inner: Arc::new(ServerInner {
                config,
                handlers,
                shutdown: AtomicBool::new(false),
                bound_port: Mutex::new(None),
            }),
            threads: Mutex::new(Vec::new()),
        }
    }

    /// Bind the listening socket and spawn the acceptor and worker
    /// threads. Returns once the listener is bound; the accept loop and
    /// worker pool run in the background until [`stop`](Self::stop) is
    /// called or the process exits.
    pub fn start(&self) -> Result<()> {
        let listener = TcpListener::bind(("0.0.0.0", self.inner.config.port)).context(
            BindSnafu {
                port: self.inner.config.port,
            },
        )?;
        listener
            .set_nonblocking(true)
            .context(BindSnafu {
                port: self.inner.config.port,
            })?;

        let bound_port = listener
            .local_addr()
            .context(BindSnafu {
                port: self.inner.config.port,
            })?
            .port();
        *self.inner.bound_port.lock().expect("bound port poisoned") = Some(bound_port);

        let (tx, rx) = mpsc::sync_channel::<TcpStream>(self.inner.config.worker_pool_size);
        let rx = Arc::new(Mutex::new(rx));

        let mut threads = self.threads.lock().expect("thread list poisoned");

        let acceptor_inner = Arc::clone(&self.inner);
        threads.push(std::thread::spawn(move || {
            accept_loop(listener, tx, &acceptor_inner);
        }));

        for _ in 0..self.inner.config.worker_pool_size.max(1) {
            let worker_inner = Arc::clone(&self.inner);
            let worker_rx = Arc::clone(&rx);
            threads.push(std::thread::spawn(move || {
                worker_loop(worker_rx, &worker_inner);
            }));
        }

        Ok(())
    }

    /// Signal every thread to wind down and wait for them to exit.
    pub fn stop(&self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        let mut threads = self.threads.lock().expect("thread list poisoned");
        for handle in threads.drain(..) {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        !self.inner.shutdown.load(Ordering::SeqCst)
    }

    /// The port actually bound by [`start`](Self::start), once it has run.
    /// Resolves `config.port == 0` (OS-assigned ephemeral port) to the
    /// port the OS actually chose; returns `None` before `start` is called.
    pub fn bound_port(&self) -> Option<u16> {
        *self.inner.bound_port.lock().expect("bound port poisoned")
    }
}

impl Drop for ServerSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Accept connections until told to shut down, handing each accepted
/// socket to the bounded queue. Blocks (applying backpressure to new
/// connections) once every worker is busy and the queue is full,
/// matching `ThreadedCommandProcessor`'s bounded job queue.
fn accept_loop(listener: TcpListener, tx: SyncSender<TcpStream>, inner: &ServerInner) {
    while !inner.shutdown.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _addr)) => {
                if stream.set_nonblocking(false).is_err() {
                    continue;
                }
                if tx.send(stream).is_err() {
                    // every worker has gone away; nothing left to hand work to
                    return;
                }
            }
            Err(source) if source.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(source) => {
                tracing::warn!("failed to accept an incoming connection: {}", source);
                std::thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }
    }
}

/// Pull accepted sockets off the queue and dispatch each association in
/// turn, one at a time per worker thread. Exits once the queue is
/// drained and the acceptor has hung up its sending half.
fn worker_loop(rx: Arc<Mutex<Receiver<TcpStream>>>, inner: &ServerInner) {
    loop {
        if inner.shutdown.load(Ordering::SeqCst) {
            return;
        }
        let stream = {
            let rx = rx.lock().expect("work queue poisoned");
            match rx.recv_timeout(ACCEPT_POLL_INTERVAL) {
                Ok(stream) => stream,
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => return,
            }
        };

        if let Err(error) = handle_connection(stream, inner) {
            tracing::warn!("association ended with an error: {}", error);
        }
    }
}

fn handle_connection(stream: TcpStream, inner: &ServerInner) -> Result<()> {
    let options = build_association_options(&inner.config);
    let mut association = options.establish(stream).context(EstablishSnafu)?;

    if association.presentation_contexts().is_empty() {
        // the source silently treats "no accepted presentation contexts
        // after A-ASSOCIATE-AC" as non-fatal; the dispatcher is handed
        // the association regardless and will simply have nothing to
        // negotiate with on the first request.
        tracing::warn!(
            peer_ae_title = association.peer_ae_title(),
            "no presentation contexts were accepted for this association"
        );
    }

    dispatcher::run(
        &mut association,
        &inner.handlers,
        DispatchOptions {
            idle_timeout: inner.config.association_timeout,
        },
    )
    .context(DispatchSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 104);
        assert!(config.check_called_aet);
        assert_eq!(config.association_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.worker_pool_size, 4);
    }

    #[test]
    fn access_control_rejects_mismatched_called_aet_when_checking() {
        let control = ConfiguredAccessControl {
            check_called_aet: true,
            remote_modalities: None,
        };
        let result = control.check_access("US", "THEM", "NOT-US", None);
        assert_eq!(
            result.unwrap_err(),
            AssociationRJServiceUserReason::CalledAETitleNotRecognized
        );
    }

    #[test]
    fn access_control_accepts_any_called_aet_when_not_checking() {
        let control = ConfiguredAccessControl {
            check_called_aet: false,
            remote_modalities: None,
        };
        assert!(control.check_access("US", "THEM", "NOT-US", None).is_ok());
    }

    #[test]
    fn access_control_rejects_unknown_calling_aet_with_oracle() {
        use crate::model::{RemoteModality, StaticRemoteModalities};

        let modalities = StaticRemoteModalities::new()
            .with(RemoteModality::new("KNOWN", "127.0.0.1", 11112).unwrap());
        let control = ConfiguredAccessControl {
            check_called_aet: false,
            remote_modalities: Some(Arc::new(modalities)),
        };
        assert!(control.check_access("US", "KNOWN", "US", None).is_ok());
        assert_eq!(
            control
                .check_access("US", "STRANGER", "US", None)
                .unwrap_err(),
            AssociationRJServiceUserReason::CallingAETitleNotRecognized
        );
    }

    #[test]
    fn builds_association_options_from_default_policy() {
        let config = ServerConfig::default();
        let options = build_association_options(&config);
        // only confirms the builder call chain does not panic; the
        // negotiated outcome is exercised end to end by `policy`'s own
        // tests against `negotiate`.
        drop(options);
    }

    #[test]
    fn supervisor_binds_an_ephemeral_port_and_stops_cleanly() {
        let mut config = ServerConfig::default();
        config.port = 0; // ask the OS for an ephemeral port
        config.worker_pool_size = 1;
        let supervisor = ServerSupervisor::new(config, HandlerTable::new());
        assert!(supervisor.is_running());
        assert_eq!(supervisor.bound_port(), None);
        supervisor.start().expect("listener should bind");
        let port = supervisor.bound_port().expect("port should be known after start");
        assert_ne!(port, 0);
        supervisor.stop();
        assert!(!supervisor.is_running());
    }
}
