//! Recipe parsing edge cases

use deidkit::deid::{ActionKind, DeidRecipe, FieldSpec};
use deidkit::domain::RecipeError;
use dicom_dictionary_std::tags;
use test_case::test_case;

#[test_case("ADD", ActionKind::Add ; "add")]
#[test_case("replace", ActionKind::Replace ; "lowercase replace")]
#[test_case("BLANK", ActionKind::Blank ; "blank")]
#[test_case("REMOVE", ActionKind::Remove ; "remove")]
#[test_case("Keep", ActionKind::Keep ; "mixed case keep")]
fn test_action_keywords(word: &str, expected: ActionKind) {
    let value = if matches!(expected, ActionKind::Add | ActionKind::Replace) {
        " X"
    } else {
        ""
    };
    let recipe = DeidRecipe::from_text(&format!("%header\n{word} PatientName{value}\n")).unwrap();
    assert_eq!(recipe.header_actions()[0].kind, expected);
}

#[test_case("PatientName" ; "keyword")]
#[test_case("(0010,0010)" ; "parenthesized tag")]
#[test_case("(0010, 0010)" ; "parenthesized tag with space")]
#[test_case("( 0010,0010 )" ; "padded parenthesized tag")]
#[test_case("0010,0010" ; "comma tag")]
#[test_case("00100010" ; "packed tag")]
fn test_field_spellings_resolve_to_tag(field: &str) {
    let recipe = DeidRecipe::from_text(&format!("%header\nREMOVE {field}\n")).unwrap();
    assert_eq!(
        recipe.header_actions()[0].field,
        FieldSpec::Tag(tags::PATIENT_NAME)
    );
}

#[test_case("%header\nSCRUB PatientName\n", 2 ; "unknown action")]
#[test_case("%header\n\n# note\nREMOVE NotAKeyword\n", 4 ; "unknown field after comments")]
#[test_case("%header\nREPLACE PatientName\n", 2 ; "replace without value")]
#[test_case("%header\nJITTER StudyDate soon\n", 2 ; "jitter without days")]
#[test_case("%header\nREMOVE PatientID\nJITTER StudyDate 200000000000000\n", 3 ; "jitter out of range")]
#[test_case("%header\nADD PatientName func:make_name\n", 2 ; "value function")]
fn test_errors_name_the_line(text: &str, line: usize) {
    let err = DeidRecipe::from_text(text).unwrap_err();
    assert!(
        err.to_string().starts_with(&format!("line {line}:")),
        "unexpected error: {err}"
    );
}

#[test]
fn test_non_dicom_format_rejected() {
    assert_eq!(
        DeidRecipe::from_text("FORMAT nifti\n%header\nREMOVE ALL\n").unwrap_err(),
        RecipeError::UnsupportedFormat("nifti".to_string())
    );
}

#[test]
fn test_sections_after_header_stop_action_parsing() {
    let text = "%header\nREMOVE PatientID\n%labels\nSCRUB everything here\n";
    let recipe = DeidRecipe::from_text(text).unwrap();

    assert_eq!(recipe.header_actions().len(), 1);
    assert_eq!(
        recipe.unapplied_sections()["labels"],
        vec!["SCRUB everything here".to_string()]
    );
}

#[test]
fn test_empty_recipe_is_valid() {
    let recipe = DeidRecipe::from_text("").unwrap();
    assert_eq!(recipe.format(), "dicom");
    assert!(recipe.header_actions().is_empty());
}
