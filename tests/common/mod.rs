//! Shared fixtures for integration tests

#![allow(dead_code)]

use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::tags;
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use std::path::{Path, PathBuf};

pub const SECONDARY_CAPTURE: &str = "1.2.840.10008.5.1.4.1.1.7";
pub const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";

/// A small secondary capture record with patient identifiers and 2x2 pixels
pub fn sample_dataset(patient_name: &str) -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    obj.put(DataElement::new(
        tags::SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(SECONDARY_CAPTURE),
    ));
    obj.put(DataElement::new(
        tags::SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from("2.25.424242"),
    ));
    obj.put(DataElement::new(
        tags::STUDY_DATE,
        VR::DA,
        PrimitiveValue::from("20240115"),
    ));
    obj.put(DataElement::new(
        tags::MODALITY,
        VR::CS,
        PrimitiveValue::from("OT"),
    ));
    obj.put(DataElement::new(
        tags::PATIENT_NAME,
        VR::PN,
        PrimitiveValue::from(patient_name),
    ));
    obj.put(DataElement::new(
        tags::PATIENT_ID,
        VR::LO,
        PrimitiveValue::from("MRN-0042"),
    ));
    obj.put(DataElement::new(
        tags::PATIENT_BIRTH_DATE,
        VR::DA,
        PrimitiveValue::from("19700101"),
    ));
    obj.put(DataElement::new(
        tags::REFERRING_PHYSICIAN_NAME,
        VR::PN,
        PrimitiveValue::from("House^Gregory"),
    ));
    obj.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(2_u16)));
    obj.put(DataElement::new(
        tags::COLUMNS,
        VR::US,
        PrimitiveValue::from(2_u16),
    ));
    obj.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(vec![1_u8, 2, 3, 4]),
    ));
    obj
}

/// Part 10 bytes (preamble, meta group, dataset) of [`sample_dataset`]
pub fn sample_bytes(patient_name: &str) -> Vec<u8> {
    let file = sample_dataset(patient_name)
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(EXPLICIT_VR_LE)
                .media_storage_sop_class_uid(SECONDARY_CAPTURE)
                .media_storage_sop_instance_uid("2.25.424242"),
        )
        .expect("valid file meta");
    let mut bytes = Vec::new();
    file.write_all(&mut bytes).expect("serializable record");
    bytes
}

/// Write a sample record to `dir/name`
pub fn write_sample(dir: &Path, name: &str, patient_name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sample_bytes(patient_name)).expect("writable temp dir");
    path
}
