//! Shared scaffolding for the integration tests under `gateway/tests/`.
//!
//! Each test starts its own `ServerSupervisor` on an OS-assigned port
//! (`ServerConfig::port = 0`), the same ephemeral-port convention
//! `dicom_ul`'s own `tests/association.rs` uses, so tests never contend
//! over a fixed port and can run in parallel.

use dicom_gateway::handlers::HandlerTable;
use dicom_gateway::model::RemoteModality;
use dicom_gateway::{Policy, ServerConfig, ServerSupervisor};

pub const SERVER_AE_TITLE: &str = "TEST-SCP";
pub const CLIENT_AE_TITLE: &str = "TEST-SCU";

/// Start a server under `policy`/`handlers` on an ephemeral port, blocking
/// until the listener is bound. The caller is responsible for calling
/// `stop()` once done (also run on `Drop`, but an explicit stop keeps test
/// failures from leaking a listening thread until process exit).
pub fn start_server(policy: Policy, handlers: HandlerTable) -> (ServerSupervisor, u16) {
    let config = ServerConfig {
        ae_title: SERVER_AE_TITLE.to_string(),
        port: 0,
        worker_pool_size: 2,
        policy,
        ..ServerConfig::default()
    };
    let supervisor = ServerSupervisor::new(config, handlers);
    supervisor.start().expect("server should bind an ephemeral port");
    let port = supervisor
        .bound_port()
        .expect("bound port should be known once start() returns");
    (supervisor, port)
}

/// A [`RemoteModality`] pointing at the server started by [`start_server`].
pub fn server_remote(port: u16) -> RemoteModality {
    RemoteModality::new(SERVER_AE_TITLE, "127.0.0.1", port)
        .expect("SERVER_AE_TITLE is a valid AE title")
}
