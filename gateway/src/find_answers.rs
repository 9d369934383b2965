//! Find-Answer Container (C7).
//!
//! Grounded directly on Orthanc's `DicomFindAnswers`
//! (`Core/DicomNetworking/DicomFindAnswers.{h,cpp}`): `AddAnswerInternal`'s
//! tag-stripping in worklist mode, `SetWorklist`'s
//! `OrthancException(ErrorCode_BadSequenceOfCalls)` guard, and the three
//! `Add` overloads (from a tag/value map, from an already-parsed dataset,
//! from raw encoded bytes) map 1:1 onto [`FindAnswers::add_from_map`],
//! [`FindAnswers::add_from_parsed`] and [`FindAnswers::add_from_bytes`].

use std::io::Cursor;

use dicom_core::header::Header;
use dicom_core::{dicom_value, DataElement, Tag, VR};
use dicom_dictionary_std::{tags, StandardDataDictionary};
use dicom_encoding::text::SpecificCharacterSet;
use dicom_encoding::TransferSyntax;
use dicom_object::InMemDicomObject;
use snafu::{ensure, ResultExt, Snafu};

pub type Dataset = InMemDicomObject<StandardDataDictionary>;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// `set_worklist` was called after answers had already been added
    #[snafu(display("bad sequence of calls: set_worklist after answers were added"))]
    BadSequenceOfCalls,

    /// failed to parse a raw-byte answer dataset
    #[snafu(display("failed to parse answer dataset: {}", source))]
    Parse { source: dicom_object::ReadError },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An ordered collection of query answers sharing a single encoding and a
/// worklist/non-worklist mode, as produced by a C-FIND or C-GET/C-MOVE
/// query handler.
///
/// Single-producer per request: a container is created for the duration of
/// one `on_find` (or worklist) call and destroyed once the last response
/// PDU has been sent.
pub struct FindAnswers {
    answers: Vec<Dataset>,
    encoding: SpecificCharacterSet,
    worklist: bool,
    complete: bool,
}

impl FindAnswers {
    /// Create an empty container. `worklist` is frozen once the first
    /// answer is added.
    pub fn new(worklist: bool) -> Self {
        FindAnswers {
            answers: Vec::new(),
            encoding: SpecificCharacterSet::ISO_IR_6,
            worklist,
            complete: false,
        }
    }

    /// Rewrite every contained dataset's `SpecificCharacterSet` to `e` and
    /// record it as the container's current encoding.
    pub fn set_encoding(&mut self, e: SpecificCharacterSet) {
        self.encoding = e;
        for answer in &mut self.answers {
            answer.put(DataElement::new(
                tags::SPECIFIC_CHARACTER_SET,
                VR::CS,
                dicom_value!(e.name().to_string()),
            ));
        }
    }

    pub fn encoding(&self) -> SpecificCharacterSet {
        self.encoding
    }

    /// Switch worklist mode. Only permitted while the container is empty;
    /// otherwise fails with [`Error::BadSequenceOfCalls`].
    pub fn set_worklist(&mut self, worklist: bool) -> Result<()> {
        ensure!(self.answers.is_empty(), BadSequenceOfCallsSnafu);
        self.worklist = worklist;
        Ok(())
    }

    pub fn is_worklist(&self) -> bool {
        self.worklist
    }

    fn insert(&mut self, mut dataset: Dataset, query_level: Option<&str>) {
        if self.worklist {
            dataset.remove_element(tags::MEDIA_STORAGE_SOP_INSTANCE_UID);
            dataset.remove_element(tags::SOP_INSTANCE_UID);
        } else if dataset.get(tags::QUERY_RETRIEVE_LEVEL).is_none() {
            if let Some(level) = query_level {
                dataset.put(DataElement::new(
                    tags::QUERY_RETRIEVE_LEVEL,
                    VR::CS,
                    dicom_value!(level.to_string()),
                ));
            }
        }
        self.answers.push(dataset);
    }

    /// Add an answer built from an already-parsed dataset. `query_level`
    /// is consulted only in non-worklist mode, to backfill a missing
    /// `QueryRetrieveLevel` from the enclosing query.
    pub fn add_from_parsed(&mut self, dataset: Dataset, query_level: Option<&str>) {
        self.insert(dataset, query_level);
    }

    /// Add an answer built from a tag/value map.
    pub fn add_from_map(
        &mut self,
        values: impl IntoIterator<Item = (Tag, VR, String)>,
        query_level: Option<&str>,
    ) {
        let mut dataset = Dataset::new_empty();
        for (tag, vr, value) in values {
            dataset.put(DataElement::new(tag, vr, dicom_value!(value)));
        }
        self.insert(dataset, query_level);
    }

    /// Add an answer parsed from raw bytes encoded per `ts`.
    pub fn add_from_bytes(
        &mut self,
        bytes: &[u8],
        ts: &TransferSyntax,
        query_level: Option<&str>,
    ) -> Result<()> {
        let dataset = Dataset::read_dataset_with_ts_cs(Cursor::new(bytes), ts, self.encoding)
            .context(ParseSnafu)?;
        self.insert(dataset, query_level);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Dataset> {
        self.answers.get(index)
    }

    pub fn size(&self) -> usize {
        self.answers.len()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The wire shape the SCP sends for answer `index`: a copy stripped of
    /// all elements in groups below `0x0008` and of group-length elements
    /// (element number `0x0000`).
    pub fn extract_dataset_for_emission(&self, index: usize) -> Option<Dataset> {
        let source = self.answers.get(index)?;
        let mut out = Dataset::new_empty();
        for element in source.iter() {
            let tag = element.tag();
            if tag.group() < 0x0008 || tag.element() == 0x0000 {
                continue;
            }
            out.put(element.clone());
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(sop_instance_uid: &str) -> Dataset {
        let mut dataset = Dataset::new_empty();
        dataset.put(DataElement::new(
            tags::SOP_INSTANCE_UID,
            VR::UI,
            dicom_value!(sop_instance_uid.to_string()),
        ));
        dataset.put(DataElement::new(
            tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
            VR::UI,
            dicom_value!(sop_instance_uid.to_string()),
        ));
        dataset
    }

    #[test]
    fn worklist_mode_strips_instance_uids() {
        let mut answers = FindAnswers::new(true);
        answers.add_from_parsed(sample("1.2.3"), None);
        assert_eq!(answers.size(), 1);
        let answer = answers.get(0).unwrap();
        assert!(answer.get(tags::SOP_INSTANCE_UID).is_none());
        assert!(answer.get(tags::MEDIA_STORAGE_SOP_INSTANCE_UID).is_none());
    }

    #[test]
    fn set_worklist_fails_once_populated() {
        let mut answers = FindAnswers::new(false);
        answers.add_from_parsed(sample("1.2.3"), Some("STUDY"));
        assert!(matches!(
            answers.set_worklist(true),
            Err(Error::BadSequenceOfCalls)
        ));
    }

    #[test]
    fn non_worklist_mode_backfills_query_retrieve_level() {
        let mut answers = FindAnswers::new(false);
        answers.add_from_parsed(Dataset::new_empty(), Some("STUDY"));
        let answer = answers.get(0).unwrap();
        assert_eq!(
            answer
                .get(tags::QUERY_RETRIEVE_LEVEL)
                .unwrap()
                .value()
                .to_str()
                .unwrap(),
            "STUDY"
        );
    }

    #[test]
    fn extract_dataset_for_emission_strips_low_groups_and_group_lengths() {
        let mut answers = FindAnswers::new(false);
        let mut dataset = sample("1.2.3");
        dataset.put(DataElement::new(
            Tag(0x0008, 0x0000),
            VR::UL,
            dicom_value!("4".to_string()),
        ));
        dataset.put(DataElement::new(
            tags::STUDY_INSTANCE_UID,
            VR::UI,
            dicom_value!("1.2.3.4".to_string()),
        ));
        answers.add_from_parsed(dataset, None);
        let emitted = answers.extract_dataset_for_emission(0).unwrap();
        assert!(emitted.get(tags::MEDIA_STORAGE_SOP_INSTANCE_UID).is_none());
        assert!(emitted.get(Tag(0x0008, 0x0000)).is_none());
        assert!(emitted.get(tags::STUDY_INSTANCE_UID).is_some());
    }
}
