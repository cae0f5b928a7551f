//! Lenient DICOM reading and writing
//!
//! Records are accepted in three shapes: a standard Part 10 file (128-byte
//! preamble then `DICM`), a Part 10 stream without the preamble, and a bare
//! dataset with no file meta at all. The last one is read as implicit VR
//! little endian and gets a synthesized meta group, so that malformed
//! headers do not stop processing before the recipe runs.

use crate::domain::errors::{error_chain, DeidError};
use crate::domain::result::Result;
use dicom_core::header::Header;
use dicom_core::{Tag, VR};
use dicom_dictionary_std::tags;
use dicom_encoding::transfer_syntax::TransferSyntaxIndex;
use dicom_object::{DefaultDicomObject, FileMetaTableBuilder, InMemDicomObject};
use dicom_transfer_syntax_registry::TransferSyntaxRegistry;
use sha2::{Digest, Sha256};
use std::path::Path;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// Implicit VR Little Endian
pub const IMPLICIT_VR_LE: &str = "1.2.840.10008.1.2";
/// Secondary Capture Image Storage, used when a bare dataset names no SOP class
pub const SECONDARY_CAPTURE: &str = "1.2.840.10008.5.1.4.1.1.7";

/// Reads a DICOM record from memory, falling back to a bare dataset read
pub fn read_lenient(bytes: &[u8]) -> Result<DefaultDicomObject> {
    let obj = if bytes.len() >= PREAMBLE_LEN + MAGIC.len()
        && &bytes[PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()] == MAGIC
    {
        dicom_object::from_reader(&bytes[PREAMBLE_LEN..])
            .map_err(|e| DeidError::Parse(error_chain(&e)))?
    } else if bytes.starts_with(MAGIC) {
        dicom_object::from_reader(bytes).map_err(|e| DeidError::Parse(error_chain(&e)))?
    } else {
        tracing::debug!(len = bytes.len(), "No DICM magic, reading bare dataset");
        read_bare_dataset(bytes)?
    };

    if obj.iter().next().is_none() {
        return Err(DeidError::Parse(
            "record contains no data elements".to_string(),
        ));
    }
    Ok(obj)
}

/// Reads a record from disk
pub fn read_file(path: impl AsRef<Path>) -> Result<DefaultDicomObject> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| DeidError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    read_lenient(&bytes)
}

/// Serializes a record with preamble, meta group and dataset
pub fn write_to_vec(obj: &DefaultDicomObject) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    obj.write_all(&mut buffer)
        .map_err(|e| DeidError::Write(error_chain(&e)))?;
    Ok(buffer)
}

/// Rejects input whose first element header cannot belong to an implicit
/// VR dataset of this size, before the parser tries to allocate for it.
fn check_first_element(bytes: &[u8]) -> Result<()> {
    if bytes.len() < 8 {
        return Err(DeidError::Parse(format!(
            "input of {} bytes is too short for a data element",
            bytes.len()
        )));
    }
    let length = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if length != u32::MAX && length as usize > bytes.len() - 8 {
        return Err(DeidError::Parse(format!(
            "first element declares {} bytes but only {} remain",
            length,
            bytes.len() - 8
        )));
    }
    Ok(())
}

fn read_bare_dataset(bytes: &[u8]) -> Result<DefaultDicomObject> {
    check_first_element(bytes)?;

    let ts = TransferSyntaxRegistry.get(IMPLICIT_VR_LE).ok_or_else(|| {
        DeidError::Parse(format!("transfer syntax {IMPLICIT_VR_LE} is not registered"))
    })?;

    let dataset = InMemDicomObject::read_dataset_with_ts(bytes, ts)
        .map_err(|e| DeidError::Parse(error_chain(&e)))?;

    let sop_class =
        text_value(&dataset, tags::SOP_CLASS_UID).unwrap_or_else(|| SECONDARY_CAPTURE.to_string());
    let sop_instance =
        text_value(&dataset, tags::SOP_INSTANCE_UID).unwrap_or_else(|| derived_uid(bytes));

    dataset
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(IMPLICIT_VR_LE)
                .media_storage_sop_class_uid(sop_class)
                .media_storage_sop_instance_uid(sop_instance),
        )
        .map_err(|e| DeidError::Parse(error_chain(&e)))
}

/// `2.25` UID derived from the content, stable for identical input
fn derived_uid(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut high = [0u8; 16];
    high.copy_from_slice(&digest[..16]);
    format!("2.25.{}", u128::from_be_bytes(high))
}

/// Whether values of this VR are meaningful as text
pub fn is_textual(vr: VR) -> bool {
    !matches!(
        vr,
        VR::OB | VR::OD | VR::OF | VR::OL | VR::OV | VR::OW | VR::SQ | VR::UN
    )
}

/// Trimmed text value of a top-level element, if it has one
pub fn text_value(obj: &InMemDicomObject, tag: Tag) -> Option<String> {
    let elem = obj.element(tag).ok()?;
    if !is_textual(elem.vr()) {
        return None;
    }
    let text = elem.to_str().ok()?;
    let text = text.trim_end_matches(['\0', ' ']).to_string();
    Some(text)
}

/// Dictionary keyword for a tag, or its `(GGGG,EEEE)` form
pub fn keyword_of(tag: Tag) -> String {
    use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
    use dicom_dictionary_std::StandardDataDictionary;

    StandardDataDictionary
        .by_tag(tag)
        .map(|entry| entry.alias().to_string())
        .unwrap_or_else(|| tag.to_string())
}

/// One line per top-level element, for printing a cleaned header
pub fn dump_header(obj: &InMemDicomObject) -> String {
    let mut out = String::new();
    for elem in obj.iter() {
        let tag = elem.tag();
        let vr = elem.vr();
        let value = if tag == tags::PIXEL_DATA {
            "<pixel data>".to_string()
        } else if !is_textual(vr) {
            format!("<{vr:?}>")
        } else {
            let text = text_value(obj, tag).unwrap_or_default();
            if text.chars().count() > 64 {
                format!("{}...", text.chars().take(61).collect::<String>())
            } else {
                text
            }
        };
        out.push_str(&format!("{} {:<32} {:?}: {}\n", tag, keyword_of(tag), vr, value));
    }
    out
}
