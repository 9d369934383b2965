//! Remote modality records and application entity title validation.
//!
//! Grounded on Orthanc's `RemoteModalityParameters`
//! (`Core/DicomNetworking/RemoteModalityParameters.{h,cpp}`): an AET, host
//! and port, a manufacturer discriminator that only shapes outgoing C-FIND
//! identifiers (see [`crate::client`]), and a set of per-verb allow bits.

use std::collections::HashMap;

use crate::error::{BadApplicationEntityTitleSnafu, Result};
use snafu::ensure;

/// Vendor-specific quirks applied to outgoing C-FIND identifiers.
///
/// The default, [`ManufacturerQuirk::Generic`], applies no rewrite at all.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum ManufacturerQuirk {
    #[default]
    Generic,
    GenericNoUniversalWildcard,
    GenericNoWildcardInDates,
    GE,
}

/// A single verb a remote modality may be allowed to exercise.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Verb {
    Echo,
    Store,
    Find,
    Get,
    Move,
    NAction,
    NEventReport,
}

/// Per-verb allow bits for a [`RemoteModality`].
///
/// The default grants every verb, matching the compact serialization where
/// an entry lists only `[aet, host, port]` or `[aet, host, port,
/// manufacturer]` and every verb is implicitly allowed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct AllowedVerbs {
    pub echo: bool,
    pub store: bool,
    pub find: bool,
    pub get: bool,
    pub move_: bool,
    pub n_action: bool,
    pub n_event_report: bool,
}

impl Default for AllowedVerbs {
    fn default() -> Self {
        AllowedVerbs {
            echo: true,
            store: true,
            find: true,
            get: true,
            move_: true,
            n_action: true,
            n_event_report: true,
        }
    }
}

impl AllowedVerbs {
    /// Whether every verb is allowed, i.e. the record can be serialized
    /// as the compact 3-or-4-tuple form.
    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }

    pub fn allows(&self, verb: Verb) -> bool {
        match verb {
            Verb::Echo => self.echo,
            Verb::Store => self.store,
            Verb::Find => self.find,
            Verb::Get => self.get,
            Verb::Move => self.move_,
            Verb::NAction => self.n_action,
            Verb::NEventReport => self.n_event_report,
        }
    }
}

/// A remote DICOM node known to this gateway: AET, address, manufacturer
/// quirk, and the verbs it is permitted to exercise against us (or we
/// against it, depending on direction of initiation).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RemoteModality {
    pub aet: String,
    pub host: String,
    pub port: u16,
    pub manufacturer: ManufacturerQuirk,
    pub allowed: AllowedVerbs,
    /// An AET override distinct from the server's own, for multi-homed
    /// setups. Threaded through but not otherwise interpreted here:
    /// routing-by-local-AET is a concern of whatever embeds this crate.
    pub local_aet: Option<String>,
}

impl RemoteModality {
    /// Construct a remote modality allowed to exercise every verb,
    /// the compact-tuple shape.
    pub fn new(aet: impl Into<String>, host: impl Into<String>, port: u16) -> Result<Self> {
        let aet = aet.into();
        validate_aet(&aet)?;
        Ok(RemoteModality {
            aet,
            host: host.into(),
            port,
            manufacturer: ManufacturerQuirk::Generic,
            allowed: AllowedVerbs::default(),
            local_aet: None,
        })
    }

    pub fn with_manufacturer(mut self, manufacturer: ManufacturerQuirk) -> Self {
        self.manufacturer = manufacturer;
        self
    }

    pub fn with_allowed(mut self, allowed: AllowedVerbs) -> Self {
        self.allowed = allowed;
        self
    }

    pub fn with_local_aet(mut self, local_aet: impl Into<String>) -> Self {
        self.local_aet = Some(local_aet.into());
        self
    }
}

/// Validate an application entity title: 1-16 characters. Out-of-range
/// characters (outside `[A-Z0-9_-]`) are allowed but discouraged, so only
/// length is enforced here.
pub fn validate_aet(aet: &str) -> Result<()> {
    ensure!(
        !aet.is_empty() && aet.len() <= 16,
        BadApplicationEntityTitleSnafu { aet: aet.to_string() }
    );
    Ok(())
}

/// An equivalence relation over application entity titles, allowing
/// callers to choose exact or case-insensitive comparison.
pub trait AetEquivalence: Send + Sync {
    fn same(&self, a: &str, b: &str) -> bool;
}

/// Exact string comparison, matching `RemoteModalityParameters`'s own
/// `GetApplicationEntityTitle` equality checks in the original source.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactAetEquivalence;

impl AetEquivalence for ExactAetEquivalence {
    fn same(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

/// Case-insensitive comparison, for deployments with looser vendor
/// conventions.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseInsensitiveAetEquivalence;

impl AetEquivalence for CaseInsensitiveAetEquivalence {
    fn same(&self, a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }
}

/// A caller-supplied oracle of known remote modalities, consulted by the
/// server supervisor and by handler factories. Must be safe to call from
/// worker threads.
pub trait RemoteModalities: Send + Sync {
    /// Whether the two AETs name the same remote modality under this
    /// oracle's equivalence policy.
    fn is_same_aet(&self, a: &str, b: &str) -> bool;

    /// Look up a remote modality by its AET.
    fn lookup_aet(&self, aet: &str) -> Option<RemoteModality>;
}

/// A `HashMap`-backed reference implementation of [`RemoteModalities`].
///
/// Additive with respect to the oracle contract: a REST layer or a test can
/// use this directly instead of writing its own oracle.
pub struct StaticRemoteModalities<E = ExactAetEquivalence> {
    entries: HashMap<String, RemoteModality>,
    equivalence: E,
}

impl StaticRemoteModalities<ExactAetEquivalence> {
    /// An empty directory using exact AET comparison.
    pub fn new() -> Self {
        StaticRemoteModalities {
            entries: HashMap::new(),
            equivalence: ExactAetEquivalence,
        }
    }
}

impl Default for StaticRemoteModalities<ExactAetEquivalence> {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticRemoteModalities<CaseInsensitiveAetEquivalence> {
    /// An empty directory using case-insensitive AET comparison.
    pub fn case_insensitive() -> Self {
        StaticRemoteModalities {
            entries: HashMap::new(),
            equivalence: CaseInsensitiveAetEquivalence,
        }
    }
}

impl<E> StaticRemoteModalities<E> {
    pub fn insert(&mut self, modality: RemoteModality) -> &mut Self {
        self.entries.insert(modality.aet.clone(), modality);
        self
    }

    pub fn with(mut self, modality: RemoteModality) -> Self {
        self.insert(modality);
        self
    }
}

impl<E> RemoteModalities for StaticRemoteModalities<E>
where
    E: AetEquivalence,
{
    fn is_same_aet(&self, a: &str, b: &str) -> bool {
        self.equivalence.same(a, b)
    }

    fn lookup_aet(&self, aet: &str) -> Option<RemoteModality> {
        self.entries
            .iter()
            .find(|(key, _)| self.equivalence.same(key, aet))
            .map(|(_, v)| v.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_overlong_aet() {
        assert!(validate_aet("").is_err());
        assert!(validate_aet(&"A".repeat(17)).is_err());
        assert!(validate_aet("VALID-AET").is_ok());
    }

    #[test]
    fn static_directory_lookup() {
        let dir = StaticRemoteModalities::new()
            .with(RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap());
        assert!(dir.lookup_aet("REMOTE").is_some());
        assert!(dir.lookup_aet("remote").is_none());
        assert!(dir.is_same_aet("REMOTE", "REMOTE"));
        assert!(!dir.is_same_aet("REMOTE", "remote"));
    }

    #[test]
    fn case_insensitive_directory() {
        let dir = StaticRemoteModalities::case_insensitive()
            .with(RemoteModality::new("REMOTE", "127.0.0.1", 11112).unwrap());
        assert!(dir.lookup_aet("remote").is_some());
        assert!(dir.is_same_aet("REMOTE", "remote"));
    }
}
