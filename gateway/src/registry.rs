//! Transfer-Syntax Registry (C1).
//!
//! A thin, stateless wrapper over [`dicom_transfer_syntax_registry`]'s own
//! registry: this crate does not reimplement the syntax table, it exposes
//! the four operations the rest of the gateway needs behind a narrower
//! surface, keyed off [`TransferSyntax::is_codec_free`] for genericity.

use dicom_encoding::transfer_syntax::TransferSyntaxIndex;
use dicom_encoding::TransferSyntax;
use dicom_transfer_syntax_registry::TransferSyntaxRegistry;

/// UID of implicit VR little endian, the transfer syntax command sets are
/// always encoded with and the default assumed before negotiation.
pub const IMPLICIT_VR_LITTLE_ENDIAN_UID: &str = "1.2.840.10008.1.2";

/// Look up a transfer syntax by UID, trimming trailing whitespace/null as
/// the underlying registry does.
pub fn lookup_by_uid(uid: &str) -> Option<&'static TransferSyntax> {
    TransferSyntaxRegistry.get(uid)
}

/// The UID of a transfer syntax, as it would be proposed or accepted on
/// the wire.
pub fn uid_of(ts: &TransferSyntax) -> &str {
    ts.uid()
}

/// Whether a transfer syntax is one of the three *generic* syntaxes
/// (implicit VR little endian, explicit VR little endian, explicit VR big
/// endian) rather than one requiring encapsulated pixel data.
pub fn is_generic(ts: &TransferSyntax) -> bool {
    ts.is_codec_free()
}

/// Enumerate every transfer syntax known to the build. All entries
/// returned here are present in every well-formed build of this crate.
pub fn enumerate_all() -> impl Iterator<Item = &'static TransferSyntax> {
    TransferSyntaxRegistry.iter()
}

/// The default transfer syntax assumed when none is negotiated yet:
/// implicit VR little endian. This is also always the transfer syntax
/// used to encode and decode DIMSE command sets, regardless of what is
/// negotiated for the accompanying dataset.
pub fn default_transfer_syntax() -> &'static TransferSyntax {
    lookup_by_uid(IMPLICIT_VR_LITTLE_ENDIAN_UID).expect("implicit VR little endian is always registered")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_implicit_vr_little_endian() {
        let ts = lookup_by_uid("1.2.840.10008.1.2").expect("built-in transfer syntax");
        assert_eq!(uid_of(ts), "1.2.840.10008.1.2");
        assert!(is_generic(ts));
    }

    #[test]
    fn encapsulated_syntax_is_not_generic() {
        // JPEG Baseline (Process 1)
        let ts = lookup_by_uid("1.2.840.10008.1.2.4.50").expect("built-in transfer syntax");
        assert!(!is_generic(ts));
    }

    #[test]
    fn enumerate_all_includes_the_generic_three() {
        let uids: Vec<_> = enumerate_all().map(|ts| ts.uid().to_string()).collect();
        assert!(uids.iter().any(|u| u == "1.2.840.10008.1.2"));
        assert!(uids.iter().any(|u| u == "1.2.840.10008.1.2.1"));
        assert!(uids.iter().any(|u| u == "1.2.840.10008.1.2.2"));
    }
}
