//! Identifier extraction
//!
//! Identifiers are the textual header values of a record keyed by keyword.
//! They feed `var:` lookups when actions are applied.

use crate::deid::dataset::{self, is_textual, keyword_of, text_value};
use dicom_core::header::Header;
use dicom_dictionary_std::tags;
use dicom_object::InMemDicomObject;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Keyword to text value for one record
pub type Identifiers = BTreeMap<String, String>;

/// Identifiers of every top-level textual element
pub fn identifiers_from_object(obj: &InMemDicomObject) -> Identifiers {
    obj.iter()
        .filter(|elem| elem.tag() != tags::PIXEL_DATA && is_textual(elem.vr()))
        .filter_map(|elem| {
            let tag = elem.tag();
            text_value(obj, tag).map(|value| (keyword_of(tag), value))
        })
        .collect()
}

/// Identifiers for each readable file
///
/// Files that cannot be read are left out of the mapping with a warning; the
/// caller decides what a missing entry means.
pub fn get_identifiers<P: AsRef<Path>>(paths: &[P]) -> BTreeMap<PathBuf, Identifiers> {
    let mut ids = BTreeMap::new();
    for path in paths {
        let path = path.as_ref();
        match dataset::read_file(path) {
            Ok(obj) => {
                let found = identifiers_from_object(&obj);
                tracing::debug!(path = %path.display(), count = found.len(), "Extracted identifiers");
                ids.insert(path.to_path_buf(), found);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable file");
            }
        }
    }
    ids
}
