//! CLI wiring for the DICOM store/gateway service (C8's `main`).
//!
//! Parses a small set of flags with `clap` and assembles a `ServerConfig`
//! and `HandlerTable`, mirroring the `echoscu`/`storescp`-style binaries
//! already in this workspace: a `clap::Parser` struct, a `tracing_subscriber`
//! global subscriber installed once at startup, and the DIMSE service logic
//! itself left entirely to the library crate.
//!
//! The C-STORE handler this binary installs writes each received instance
//! to `--storage-dir` keyed by SOPInstanceUID, the same minimal persistence
//! `storescp` used; the content-addressed patient/study/series/instance
//! hierarchy and SQL-backed index are a separate, out-of-scope concern.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use dicom_dictionary_std::uids;
use dicom_gateway::handlers::{self, EchoProvider, FindProvider, HandlerTable, StoreProvider};
use dicom_gateway::model::{RemoteModality, StaticRemoteModalities};
use dicom_gateway::{Policy, ServerConfig, ServerSupervisor};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use snafu::{prelude::*, Whatever};
use tracing::Level;

/// Storage SOP classes accepted out of the box, a commonly exchanged
/// subset mirroring `ScuClient`'s own default registration list.
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

/// DICOM store and gateway service
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// this application's AE title
    #[arg(long = "ae-title", default_value = "RUST-SCP")]
    ae_title: String,
    /// port to listen on
    #[arg(short, long, default_value = "104")]
    port: u16,
    /// number of worker threads handling incoming associations
    #[arg(long = "workers", default_value = "4")]
    worker_pool_size: usize,
    /// accept associations regardless of their called AE title (by
    /// default, associations called for anything but --ae-title are
    /// rejected)
    #[arg(long = "allow-any-called-aet")]
    allow_any_called_aet: bool,
    /// directory received instances are written to, keyed by SOPInstanceUID
    #[arg(long = "storage-dir", default_value = "./received")]
    storage_dir: PathBuf,
    /// a known remote modality, repeatable ("AET@host:port")
    #[arg(long = "remote")]
    remote: Vec<String>,
    /// verbose mode
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Writes every stored instance under a configured directory, named after
/// its SOPInstanceUID, matching `storescp`'s own by-UID filename
/// convention.
struct FileStoreProvider {
    storage_dir: PathBuf,
}

impl StoreProvider for FileStoreProvider {
    fn on_store(
        &self,
        _calling_ae_title: &str,
        sop_class_uid: &str,
        sop_instance_uid: &str,
        transfer_syntax_uid: &str,
        dataset: &InMemDicomObject,
    ) -> handlers::Result<u16> {
        let write_result = (|| -> Result<(), Box<dyn std::error::Error>> {
            let file_meta = FileMetaTableBuilder::new()
                .media_storage_sop_class_uid(sop_class_uid)
                .media_storage_sop_instance_uid(sop_instance_uid)
                .transfer_syntax(transfer_syntax_uid)
                .build()?;
            let file_object = dataset.clone().with_exact_meta(file_meta);
            let path = self.storage_dir.join(format!("{sop_instance_uid}.dcm"));
            file_object.write_to_file(path)?;
            Ok(())
        })();

        match write_result {
            Ok(()) => Ok(handlers::status::SUCCESS),
            Err(source) => {
                tracing::warn!("failed to persist instance {}: {}", sop_instance_uid, source);
                Ok(handlers::status::UNABLE_TO_PROCESS)
            }
        }
    }
}

/// Answers every C-ECHO-RQ with Success.
struct AlwaysSucceedEcho;

impl EchoProvider for AlwaysSucceedEcho {
    fn on_echo(&self, _calling_ae_title: &str) -> u16 {
        handlers::status::SUCCESS
    }
}

/// A C-FIND handler with no backing index always reports no matches; a
/// real deployment substitutes its own [`handlers::FindProvider`] wired to
/// whatever metadata store it keeps (out of scope here, see `SPEC_FULL.md`
/// §1's persistent-index bullet).
struct EmptyFind;

impl FindProvider for EmptyFind {
    fn on_find(
        &self,
        _calling_ae_title: &str,
        _sop_class_uid: &str,
        _query: &InMemDicomObject,
    ) -> handlers::Result<dicom_gateway::find_answers::FindAnswers> {
        let mut answers = dicom_gateway::find_answers::FindAnswers::new(false);
        answers.set_complete(true);
        Ok(answers)
    }
}

fn parse_remote(spec: &str) -> Result<RemoteModality, Whatever> {
    let (aet, address) = spec
        .split_once('@')
        .whatever_context(format!("`{spec}` is not in AET@host:port form"))?;
    let (host, port) = address
        .rsplit_once(':')
        .whatever_context(format!("`{spec}` is not in AET@host:port form"))?;
    let port: u16 = port
        .parse()
        .whatever_context(format!("`{spec}` has an invalid port"))?;
    RemoteModality::new(aet, host, port)
        .whatever_context(format!("`{spec}` names an invalid AE title"))
}

fn main() {
    run().unwrap_or_else(|e| {
        tracing::error!("{}", snafu::Report::from_error(e));
        std::process::exit(-2);
    })
}

fn run() -> Result<(), Whatever> {
    let App {
        ae_title,
        port,
        worker_pool_size,
        allow_any_called_aet,
        storage_dir,
        remote,
        verbose,
    } = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
            .finish(),
    )
    .whatever_context("could not set up global logging subscriber")?;

    fs::create_dir_all(&storage_dir)
        .whatever_context("could not create the storage directory")?;

    let has_known_remotes = !remote.is_empty();
    let mut directory = StaticRemoteModalities::new();
    for spec in &remote {
        directory = directory.with(parse_remote(spec)?);
    }

    let mut policy = Policy::new();
    policy.allow_find();
    policy.allow_move();
    policy.allow_worklist();
    for sop_class_uid in DEFAULT_STORAGE_SOP_CLASSES {
        policy.allow_storage(*sop_class_uid);
    }

    let directory: Arc<dyn dicom_gateway::model::RemoteModalities> = Arc::new(directory);

    let handlers = HandlerTable::new()
        .with_ae_title(ae_title.clone())
        .with_remote_modalities(Arc::clone(&directory))
        .with_echo(Arc::new(AlwaysSucceedEcho))
        .with_find(Arc::new(EmptyFind))
        .with_store(Arc::new(FileStoreProvider { storage_dir }));

    let config = ServerConfig {
        ae_title,
        port,
        check_called_aet: !allow_any_called_aet,
        worker_pool_size,
        policy,
        remote_modalities: has_known_remotes.then(|| Arc::clone(&directory)),
        ..ServerConfig::default()
    };

    let supervisor = ServerSupervisor::new(config, handlers);
    supervisor
        .start()
        .whatever_context("could not start the server")?;

    tracing::info!(port, "listening for DICOM associations");
    loop {
        std::thread::sleep(std::time::Duration::from_secs(3600));
    }
}
