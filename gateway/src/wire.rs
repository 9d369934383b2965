//! Command-set wire helpers shared by the dispatcher and the client.
//!
//! DIMSE command sets are always encoded in Implicit VR Little Endian
//! regardless of the negotiated presentation-context transfer syntax
//! (only the accompanying dataset, if any, uses the negotiated syntax);
//! see [`dicom_ul::pdu::commands::Command::encode`]. `dicom-ul`'s
//! generated command structs (`dicom_ul::pdu::generated`) cover encoding
//! outgoing commands but not decoding incoming ones, so this module
//! supplies the read side: parse the raw command-set bytes into a
//! generic [`InMemDicomObject`], then pull out just the fields each
//! dispatcher/client call site needs.

use std::io::Cursor;

use dicom_core::header::Header;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::Tag;
use dicom_dictionary_std::{tags, StandardDataDictionary};
use dicom_encoding::text::SpecificCharacterSet;
use dicom_object::InMemDicomObject;
use dicom_transfer_syntax_registry::entries;
use dicom_ul::pdu::commands::CommandField;

pub type CommandSet = InMemDicomObject<StandardDataDictionary>;

/// Parse a command-set fragment (already reassembled from its P-Data
/// fragments) into a generic DICOM object.
///
/// Command sets carry no `SpecificCharacterSet` element of their own (all
/// of their string-valued fields are restricted to the default repertoire),
/// so this always decodes with [`SpecificCharacterSet::ISO_IR_6`] rather
/// than the plain `_with_ts` reader, which resolves the default repertoire
/// through a code path this crate avoids relying on.
pub fn read_command_set(data: &[u8]) -> Result<CommandSet, dicom_object::ReadError> {
    CommandSet::read_dataset_with_ts_cs(
        Cursor::new(data),
        &entries::IMPLICIT_VR_LITTLE_ENDIAN.erased(),
        SpecificCharacterSet::ISO_IR_6,
    )
}

pub fn command_field(cmd: &CommandSet) -> Option<u16> {
    get_u16(cmd, tags::COMMAND_FIELD)
}

/// Read a single `US`/`UL`-typed element as a `u16`, matching the command
/// dictionary's own encoding of these fields (always a short) rather than
/// going through a generic numeric conversion.
pub fn get_u16(cmd: &CommandSet, tag: Tag) -> Option<u16> {
    match cmd.get(tag)?.value() {
        Value::Primitive(PrimitiveValue::U16(v)) => v.first().copied(),
        Value::Primitive(PrimitiveValue::U32(v)) => v.first().map(|&x| x as u16),
        Value::Primitive(PrimitiveValue::I32(v)) => v.first().map(|&x| x as u16),
        _ => None,
    }
}

pub fn get_str(cmd: &CommandSet, tag: dicom_core::Tag) -> Option<String> {
    cmd.get(tag)
        .and_then(|e| e.value().to_str().ok())
        .map(|s| s.trim_end_matches('\0').trim().to_string())
}

pub fn has_dataset(cmd: &CommandSet) -> bool {
    // CommandDataSetType 0x0101 means "no dataset"; anything else (0x0001
    // in practice) means a dataset follows.
    get_u16(cmd, tags::COMMAND_DATA_SET_TYPE)
        .map(|v| v != 0x0101)
        .unwrap_or(false)
}

/// Whether the numeric command field names a request the given code was
/// read as.
pub fn is_field(code: u16, field: CommandField) -> bool {
    code == field as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{dicom_value, DataElement, VR};

    #[test]
    fn round_trips_a_minimal_c_echo_rq() {
        let mut obj = CommandSet::new_empty();
        obj.put(DataElement::new(
            tags::COMMAND_FIELD,
            VR::US,
            dicom_value!(CommandField::C_ECHO_RQ as u16),
        ));
        obj.put(DataElement::new(
            tags::MESSAGE_ID,
            VR::US,
            dicom_value!(1u16),
        ));
        obj.put(DataElement::new(
            tags::AFFECTED_SOP_CLASS_UID,
            VR::UI,
            dicom_value!("1.2.840.10008.1.1"),
        ));
        obj.put(DataElement::new(
            tags::COMMAND_DATA_SET_TYPE,
            VR::US,
            dicom_value!(0x0101u16),
        ));

        let mut buffer = Vec::new();
        obj.write_dataset_with_ts_cs(
            &mut buffer,
            &entries::IMPLICIT_VR_LITTLE_ENDIAN.erased(),
            SpecificCharacterSet::ISO_IR_6,
        )
        .unwrap();

        let decoded = read_command_set(&buffer).unwrap();
        assert!(is_field(command_field(&decoded).unwrap(), CommandField::C_ECHO_RQ));
        assert_eq!(get_u16(&decoded, tags::MESSAGE_ID), Some(1));
        assert_eq!(
            get_str(&decoded, tags::AFFECTED_SOP_CLASS_UID).as_deref(),
            Some("1.2.840.10008.1.1")
        );
        assert!(!has_dataset(&decoded));
    }
}
