//! Applying recipe header actions to a record
//!
//! Actions run in recipe order over top-level elements. KEEP protects its
//! fields from REMOVE and BLANK wherever it appears in the recipe. Pattern
//! fields (`ALL`, `contains:`, `startswith:`, `endswith:`) never select
//! pixel data.

use crate::deid::dataset::{is_textual, keyword_of, text_value};
use crate::deid::identifiers::Identifiers;
use crate::deid::recipe::{ActionKind, ActionValue, DeidRecipe, FieldSpec, HeaderAction};
use crate::domain::errors::DeidError;
use crate::domain::result::Result;
use chrono::{NaiveDate, TimeDelta};
use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_core::header::Header;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_dictionary_std::{tags, StandardDataDictionary};
use dicom_object::InMemDicomObject;
use serde::Serialize;
use std::collections::HashSet;

/// One element changed by an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    #[serde(serialize_with = "serialize_tag")]
    pub tag: Tag,
    pub keyword: String,
    pub action: &'static str,
    /// Text value before the change, when there was one
    #[serde(skip)]
    pub original: Option<String>,
}

fn serialize_tag<S: serde::Serializer>(tag: &Tag, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&tag.to_string())
}

/// Applies every header action of `recipe` to `obj`
///
/// `ids` backs `var:` values; a variable that is not present leaves the
/// element untouched.
///
/// # Errors
///
/// Fails when a value cannot be represented in the element's VR, or when
/// ADD targets an element whose VR is unknown.
pub fn apply_actions(
    obj: &mut InMemDicomObject,
    recipe: &DeidRecipe,
    ids: &Identifiers,
) -> Result<Vec<ActionRecord>> {
    let actions = recipe.header_actions();

    let mut kept = HashSet::new();
    for action in actions.iter().filter(|a| a.kind == ActionKind::Keep) {
        kept.extend(select(obj, &action.field));
    }

    let mut records = Vec::new();
    for action in actions {
        match action.kind {
            ActionKind::Keep => {}
            ActionKind::Remove => {
                for tag in select(obj, &action.field) {
                    if kept.contains(&tag) {
                        continue;
                    }
                    let original = text_value(obj, tag);
                    if obj.remove_element(tag) {
                        records.push(record(tag, action.kind, original));
                    }
                }
            }
            ActionKind::Blank => {
                for tag in select(obj, &action.field) {
                    if kept.contains(&tag) {
                        continue;
                    }
                    let vr = element_vr(obj, tag);
                    let original = text_value(obj, tag);
                    if let Some(vr) = vr {
                        obj.put(DataElement::empty(tag, vr));
                        records.push(record(tag, action.kind, original));
                    }
                }
            }
            ActionKind::Replace | ActionKind::Add => {
                let Some(value) = resolve_value(action, ids) else {
                    continue;
                };
                let targets = match (&action.field, action.kind) {
                    (FieldSpec::Tag(tag), ActionKind::Add) => vec![*tag],
                    (field, _) => select(obj, field),
                };
                for tag in targets {
                    let vr = element_vr(obj, tag)
                        .or_else(|| dictionary_vr(tag))
                        .ok_or_else(|| {
                            DeidError::Action(format!(
                                "line {}: cannot determine VR for {}",
                                action.line, tag
                            ))
                        })?;
                    let original = text_value(obj, tag);
                    let primitive = primitive_for(vr, &value).map_err(|e| {
                        DeidError::Action(format!("line {}: {} {}", action.line, keyword_of(tag), e))
                    })?;
                    obj.put(DataElement::new(tag, vr, primitive));
                    records.push(record(tag, action.kind, original));
                }
            }
            ActionKind::Jitter => {
                let days = match &action.value {
                    Some(ActionValue::Days(days)) => *days,
                    _ => match resolve_value(action, ids).map(|v| v.trim().parse::<i64>()) {
                        Some(Ok(days)) => days,
                        Some(Err(_)) => {
                            return Err(DeidError::Action(format!(
                                "line {}: jitter variable is not a number of days",
                                action.line
                            )))
                        }
                        None => continue,
                    },
                };
                for tag in select(obj, &action.field) {
                    let Some(vr) = element_vr(obj, tag) else {
                        continue;
                    };
                    let Some(original) = text_value(obj, tag) else {
                        continue;
                    };
                    let Some(shifted) = jitter(vr, &original, days) else {
                        tracing::debug!(tag = %tag, vr = ?vr, "Value cannot be jittered, skipping");
                        continue;
                    };
                    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(shifted)));
                    records.push(record(tag, action.kind, Some(original)));
                }
            }
        }
    }

    tracing::debug!(changes = records.len(), "Applied recipe actions");
    Ok(records)
}

fn record(tag: Tag, kind: ActionKind, original: Option<String>) -> ActionRecord {
    ActionRecord {
        tag,
        keyword: keyword_of(tag),
        action: kind.as_str(),
        original,
    }
}

/// Tags of present elements selected by a field spec
fn select(obj: &InMemDicomObject, field: &FieldSpec) -> Vec<Tag> {
    match field {
        FieldSpec::Tag(tag) => obj
            .element(*tag)
            .map(|_| vec![*tag])
            .unwrap_or_default(),
        pattern => obj
            .iter()
            .map(|elem| elem.tag())
            .filter(|tag| *tag != tags::PIXEL_DATA)
            .filter(|tag| pattern.matches_keyword(&keyword_of(*tag)))
            .collect(),
    }
}

fn element_vr(obj: &InMemDicomObject, tag: Tag) -> Option<VR> {
    obj.element(tag).ok().map(|elem| elem.vr())
}

fn dictionary_vr(tag: Tag) -> Option<VR> {
    StandardDataDictionary
        .by_tag(tag)
        .map(|entry| entry.vr().relaxed())
}

fn resolve_value(action: &HeaderAction, ids: &Identifiers) -> Option<String> {
    match action.value.as_ref()? {
        ActionValue::Literal(text) => Some(text.clone()),
        ActionValue::Days(days) => Some(days.to_string()),
        ActionValue::Variable(name) => {
            let found = ids.get(name).cloned();
            if found.is_none() {
                tracing::debug!(line = action.line, variable = %name, "Variable not found, skipping");
            }
            found
        }
    }
}

/// Converts action text into a value of the given VR
fn primitive_for(vr: VR, text: &str) -> std::result::Result<PrimitiveValue, String> {
    fn number<T: std::str::FromStr>(vr: VR, text: &str) -> std::result::Result<T, String> {
        text.trim()
            .parse::<T>()
            .map_err(|_| format!("'{text}' is not a valid {vr:?} value"))
    }

    Ok(match vr {
        VR::US => PrimitiveValue::from(number::<u16>(vr, text)?),
        VR::SS => PrimitiveValue::from(number::<i16>(vr, text)?),
        VR::UL => PrimitiveValue::from(number::<u32>(vr, text)?),
        VR::SL => PrimitiveValue::from(number::<i32>(vr, text)?),
        VR::FL => PrimitiveValue::from(number::<f32>(vr, text)?),
        VR::FD => PrimitiveValue::from(number::<f64>(vr, text)?),
        VR::AT => return Err(format!("cannot assign text to {vr:?}")),
        vr if !is_textual(vr) => return Err(format!("cannot assign text to {vr:?}")),
        _ => PrimitiveValue::from(text.to_string()),
    })
}

/// Shifts a DA (`YYYYMMDD`) or DT (`YYYYMMDD...`) value by whole days
///
/// `None` when the value is not a date or the shift leaves the calendar range.
fn jitter(vr: VR, value: &str, days: i64) -> Option<String> {
    if !matches!(vr, VR::DA | VR::DT) || value.len() < 8 {
        return None;
    }
    let (date, rest) = value.split_at(8);
    let date = NaiveDate::parse_from_str(date, "%Y%m%d").ok()?;
    let shifted = date.checked_add_signed(TimeDelta::try_days(days)?)?;
    Some(format!("{}{}", shifted.format("%Y%m%d"), rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InMemDicomObject {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, PrimitiveValue::from("Doe^John")));
        obj.put(DataElement::new(tags::PATIENT_ID, VR::LO, PrimitiveValue::from("MRN-42")));
        obj.put(DataElement::new(tags::STUDY_DATE, VR::DA, PrimitiveValue::from("20240301")));
        obj.put(DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("CT")));
        obj.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(2u16)));
        obj.put(DataElement::new(tags::PIXEL_DATA, VR::OB, PrimitiveValue::from(vec![0u8; 4])));
        obj
    }

    fn apply(obj: &mut InMemDicomObject, text: &str) -> Vec<ActionRecord> {
        let recipe = DeidRecipe::from_text(text).unwrap();
        apply_actions(obj, &recipe, &Identifiers::new()).unwrap()
    }

    #[test]
    fn test_remove_and_blank() {
        let mut obj = sample();
        let records = apply(&mut obj, "%header\nREMOVE PatientName\nBLANK PatientID\n");

        assert!(obj.element(tags::PATIENT_NAME).is_err());
        assert_eq!(text_value(&obj, tags::PATIENT_ID), Some(String::new()));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].original.as_deref(), Some("Doe^John"));
    }

    #[test]
    fn test_keep_wins_over_remove_all() {
        let mut obj = sample();
        apply(&mut obj, "%header\nREMOVE ALL\nKEEP Modality\n");

        assert!(obj.element(tags::MODALITY).is_ok());
        assert!(obj.element(tags::PATIENT_NAME).is_err());
        assert!(obj.element(tags::PIXEL_DATA).is_ok());
    }

    #[test]
    fn test_replace_only_touches_present_elements() {
        let mut obj = sample();
        apply(&mut obj, "%header\nREPLACE PatientName ANON\nREPLACE AccessionNumber X\n");

        assert_eq!(text_value(&obj, tags::PATIENT_NAME), Some("ANON".to_string()));
        assert!(obj.element(tags::ACCESSION_NUMBER).is_err());
    }

    #[test]
    fn test_add_creates_with_dictionary_vr() {
        let mut obj = sample();
        apply(&mut obj, "%header\nADD PatientIdentityRemoved YES\n");

        let elem = obj.element(tags::PATIENT_IDENTITY_REMOVED).unwrap();
        assert_eq!(elem.vr(), VR::CS);
        assert_eq!(text_value(&obj, tags::PATIENT_IDENTITY_REMOVED), Some("YES".to_string()));
    }

    #[test]
    fn test_numeric_values_are_typed() {
        let mut obj = sample();
        apply(&mut obj, "%header\nREPLACE Rows 512\n");
        assert_eq!(obj.element(tags::ROWS).unwrap().to_int::<u16>().unwrap(), 512);

        let recipe = DeidRecipe::from_text("%header\nREPLACE Rows many\n").unwrap();
        assert!(apply_actions(&mut obj, &recipe, &Identifiers::new()).is_err());
    }

    #[test]
    fn test_jitter_shifts_dates() {
        let mut obj = sample();
        apply(&mut obj, "%header\nJITTER StudyDate -1\n");
        assert_eq!(text_value(&obj, tags::STUDY_DATE), Some("20240229".to_string()));
        assert_eq!(jitter(VR::DT, "20241231235959", 1), Some("20250101235959".to_string()));
        assert_eq!(jitter(VR::LO, "20241231", 1), None);
    }

    #[test]
    fn test_jitter_out_of_range_leaves_value() {
        assert_eq!(jitter(VR::DA, "20240301", 200_000_000_000_000), None);
        assert_eq!(jitter(VR::DA, "20240301", i64::MIN), None);
        assert_eq!(jitter(VR::DA, "20240301", 500_000_000), None);

        let mut obj = sample();
        let recipe = DeidRecipe::from_text("%header\nJITTER StudyDate var:shift\n").unwrap();
        let mut ids = Identifiers::new();
        ids.insert("shift".to_string(), "200000000000000".to_string());

        let records = apply_actions(&mut obj, &recipe, &ids).unwrap();
        assert!(records.is_empty());
        assert_eq!(text_value(&obj, tags::STUDY_DATE), Some("20240301".to_string()));
    }

    #[test]
    fn test_variable_lookup() {
        let mut obj = sample();
        let recipe =
            DeidRecipe::from_text("%header\nREPLACE PatientID var:study_code\nREPLACE PatientName var:missing\n")
                .unwrap();
        let mut ids = Identifiers::new();
        ids.insert("study_code".to_string(), "SUBJ-7".to_string());

        let records = apply_actions(&mut obj, &recipe, &ids).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(text_value(&obj, tags::PATIENT_ID), Some("SUBJ-7".to_string()));
        assert_eq!(text_value(&obj, tags::PATIENT_NAME), Some("Doe^John".to_string()));
    }

    #[test]
    fn test_pattern_remove() {
        let mut obj = sample();
        apply(&mut obj, "%header\nREMOVE startswith:Patient\n");
        assert!(obj.element(tags::PATIENT_NAME).is_err());
        assert!(obj.element(tags::PATIENT_ID).is_err());
        assert!(obj.element(tags::STUDY_DATE).is_ok());
    }
}
