//! A DICOM store and gateway service layer.
//!
//! This crate builds a DIMSE service class provider and a stateful
//! service class user on top of [`dicom_ul`]'s association primitives:
//! presentation-context negotiation policy, the per-association command
//! dispatch loop, a small set of default service handlers, a find-answer
//! container for C-FIND/C-MOVE responders, storage commitment bookkeeping,
//! and a bounded-worker-pool server supervisor.
//!
//! None of the modules here replace `dicom-ul`'s wire-level PDU framing or
//! association state machine; they sit above it.

pub mod client;
pub mod commitment;
pub mod dispatcher;
pub mod error;
pub mod find_answers;
pub mod handlers;
pub mod model;
pub mod policy;
pub mod registry;
pub mod server;
mod wire;

pub use error::{Error, Result};
pub use model::{ManufacturerQuirk, RemoteModality};
pub use policy::Policy;
pub use server::{ServerConfig, ServerSupervisor};
