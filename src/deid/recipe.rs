//! Recipe parsing
//!
//! A recipe is line-based text. `FORMAT dicom` names the record format and
//! `%header` opens the block of header actions:
//!
//! ```text
//! FORMAT dicom
//!
//! %header
//! REMOVE ALL
//! KEEP Modality
//! REPLACE PatientID var:PatientID
//! JITTER StudyDate -14
//! ```
//!
//! Other `%sections` (pixel filters, labels) are kept verbatim but never applied.

use crate::deid::bundled;
use crate::domain::errors::RecipeError;
use chrono::TimeDelta;
use dicom_core::dictionary::DataDictionary;
use dicom_core::Tag;
use dicom_dictionary_std::StandardDataDictionary;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Header action keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Add,
    Replace,
    Blank,
    Remove,
    Keep,
    Jitter,
}

impl ActionKind {
    fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "ADD" => Some(Self::Add),
            "REPLACE" => Some(Self::Replace),
            "BLANK" => Some(Self::Blank),
            "REMOVE" => Some(Self::Remove),
            "KEEP" => Some(Self::Keep),
            "JITTER" => Some(Self::Jitter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Replace => "REPLACE",
            Self::Blank => "BLANK",
            Self::Remove => "REMOVE",
            Self::Keep => "KEEP",
            Self::Jitter => "JITTER",
        }
    }

    fn takes_value(&self) -> bool {
        matches!(self, Self::Add | Self::Replace | Self::Jitter)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which header elements an action targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// A single element, given as keyword or tag
    Tag(Tag),
    /// Every element except pixel data
    All,
    /// Keyword contains the text (case-insensitive)
    Contains(String),
    /// Keyword starts with the text (case-insensitive)
    StartsWith(String),
    /// Keyword ends with the text (case-insensitive)
    EndsWith(String),
}

impl FieldSpec {
    fn parse(field: &str, line: usize) -> Result<Self, RecipeError> {
        if field.eq_ignore_ascii_case("ALL") {
            return Ok(Self::All);
        }
        if let Some((prefix, text)) = field.split_once(':') {
            let text = text.to_ascii_lowercase();
            match prefix.to_ascii_lowercase().as_str() {
                "contains" => return Ok(Self::Contains(text)),
                "startswith" => return Ok(Self::StartsWith(text)),
                "endswith" => return Ok(Self::EndsWith(text)),
                _ => {}
            }
        }
        StandardDataDictionary
            .parse_tag(field)
            .map(Self::Tag)
            .ok_or_else(|| RecipeError::UnknownField {
                line,
                field: field.to_string(),
            })
    }

    /// Whether a keyword matches a pattern spec
    ///
    /// Always false for [`FieldSpec::Tag`]; single tags are matched by value.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_ascii_lowercase();
        match self {
            Self::Tag(_) => false,
            Self::All => true,
            Self::Contains(text) => keyword.contains(text.as_str()),
            Self::StartsWith(text) => keyword.starts_with(text.as_str()),
            Self::EndsWith(text) => keyword.ends_with(text.as_str()),
        }
    }
}

/// Value argument of ADD, REPLACE and JITTER
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionValue {
    /// Literal text
    Literal(String),
    /// `var:<name>`, looked up in the record's identifiers when applied
    Variable(String),
    /// Day offset for JITTER
    Days(i64),
}

/// One parsed header action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAction {
    pub kind: ActionKind,
    pub field: FieldSpec,
    pub value: Option<ActionValue>,
    /// 1-based line in the recipe text
    pub line: usize,
}

/// Parsed de-identification recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeidRecipe {
    format: String,
    header: Vec<HeaderAction>,
    sections: BTreeMap<String, Vec<String>>,
}

enum Section {
    Header,
    Other(String),
}

impl DeidRecipe {
    /// Parses recipe text
    ///
    /// # Errors
    ///
    /// Returns a [`RecipeError`] naming the offending line for unknown
    /// actions, unknown fields, missing arguments or value functions.
    pub fn from_text(text: &str) -> Result<Self, RecipeError> {
        let mut format = "dicom".to_string();
        let mut header = Vec::new();
        let mut sections: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut current = Section::Header;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('%') {
                let name = name.trim();
                current = if name.eq_ignore_ascii_case("header") {
                    Section::Header
                } else {
                    sections.entry(name.to_string()).or_default();
                    Section::Other(name.to_string())
                };
                continue;
            }

            let (word, rest) = split_word(line);
            if word.eq_ignore_ascii_case("FORMAT") {
                if !rest.eq_ignore_ascii_case("dicom") {
                    return Err(RecipeError::UnsupportedFormat(rest.to_string()));
                }
                format = rest.to_ascii_lowercase();
                continue;
            }

            match current {
                Section::Header => header.push(parse_action(word, rest, line_no)?),
                Section::Other(ref name) => {
                    sections.entry(name.clone()).or_default().push(line.to_string());
                }
            }
        }

        tracing::debug!(
            actions = header.len(),
            sections = sections.len(),
            "Parsed recipe"
        );

        Ok(Self {
            format,
            header,
            sections,
        })
    }

    /// Reads and parses a recipe file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RecipeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RecipeError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_text(&text)
    }

    /// Loads a recipe by reference: an existing file path, or else the name
    /// of a bundled recipe.
    pub fn load(reference: &str) -> Result<Self, RecipeError> {
        let path = Path::new(reference);
        if !path.exists() {
            if let Some(text) = bundled::bundled_recipe(reference) {
                tracing::debug!(recipe = reference, "Using bundled recipe");
                return Self::from_text(text);
            }
        }
        Self::from_file(path)
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Header actions in recipe order
    pub fn header_actions(&self) -> &[HeaderAction] {
        &self.header
    }

    /// Raw lines of sections that are parsed but not applied
    pub fn unapplied_sections(&self) -> &BTreeMap<String, Vec<String>> {
        &self.sections
    }
}

fn split_word(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

/// Splits the field off an action's arguments
///
/// A parenthesized tag may be written with spaces, as in `(0010, 0010)`.
fn split_field(rest: &str) -> (String, &str) {
    if rest.starts_with('(') {
        if let Some(end) = rest.find(')') {
            let field: String = rest[..=end].split_whitespace().collect();
            return (field, rest[end + 1..].trim());
        }
    }
    let (field, value) = split_word(rest);
    (field.to_string(), value)
}

fn parse_action(word: &str, rest: &str, line: usize) -> Result<HeaderAction, RecipeError> {
    let kind = ActionKind::parse(word).ok_or_else(|| RecipeError::UnknownAction {
        line,
        action: word.to_string(),
    })?;

    let (field, value) = split_field(rest);
    if field.is_empty() {
        return Err(RecipeError::MissingArgument {
            line,
            action: kind.to_string(),
            expected: "a field",
        });
    }
    let field = FieldSpec::parse(&field, line)?;

    let value = if kind.takes_value() {
        if value.is_empty() {
            return Err(RecipeError::MissingArgument {
                line,
                action: kind.to_string(),
                expected: "a value",
            });
        }
        Some(parse_value(kind, value, line)?)
    } else {
        None
    };

    Ok(HeaderAction {
        kind,
        field,
        value,
        line,
    })
}

fn parse_value(kind: ActionKind, value: &str, line: usize) -> Result<ActionValue, RecipeError> {
    if let Some(name) = value.strip_prefix("var:") {
        return Ok(ActionValue::Variable(name.trim().to_string()));
    }
    if value.starts_with("func:") {
        return Err(RecipeError::UnsupportedValue {
            line,
            value: value.to_string(),
        });
    }
    if kind == ActionKind::Jitter {
        return value
            .parse::<i64>()
            .ok()
            .filter(|days| TimeDelta::try_days(*days).is_some())
            .map(ActionValue::Days)
            .ok_or_else(|| RecipeError::InvalidJitter {
                line,
                value: value.to_string(),
            });
    }
    Ok(ActionValue::Literal(value.to_string()))
}
