//! Recipes shipped inside the binary

const DEID_DICOM: &str = include_str!("../../recipes/deid.dicom");
const DEID_DICOM_BASIC: &str = include_str!("../../recipes/deid.dicom.basic");

const BUNDLED: &[(&str, &str)] = &[
    ("deid.dicom", DEID_DICOM),
    ("deid.dicom.basic", DEID_DICOM_BASIC),
];

/// Names of the bundled recipes, sorted
pub fn bundled_recipe_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUNDLED.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

/// Text of a bundled recipe
pub fn bundled_recipe(name: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, text)| *text)
}
