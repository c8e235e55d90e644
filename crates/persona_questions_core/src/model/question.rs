//! Question record domain model.
//!
//! # Responsibility
//! - Define the question record stored inside a stage.
//! - Provide permissive construction from partial input and strict validation.
//!
//! # Invariants
//! - `category` is always one of the fixed `Category` variants.
//! - A record accepted by `validate()` has non-blank text and a priority in
//!   `[MIN_PRIORITY, MAX_PRIORITY]`.

use crate::model::text::truncate_chars;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Most important priority value.
pub const MIN_PRIORITY: u8 = 1;
/// Least important priority value.
pub const MAX_PRIORITY: u8 = 100;

const LABEL_PREVIEW_CHARS: usize = 40;

/// Fixed subject area tag for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Birth,
    Family,
    Illness,
    Special,
    /// Fallback for absent or unrecognized categories.
    #[default]
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Birth,
        Category::Family,
        Category::Illness,
        Category::Special,
        Category::Other,
    ];

    /// Serialized name of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Family => "family",
            Self::Illness => "illness",
            Self::Special => "special",
            Self::Other => "other",
        }
    }

    /// Strict parse: only the exact serialized names match.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "birth" => Some(Self::Birth),
            "family" => Some(Self::Family),
            "illness" => Some(Self::Illness),
            "special" => Some(Self::Special),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Permissive parse: ignores padding and ASCII case, anything still
    /// unrecognized becomes `Other`.
    pub fn parse_lenient(value: &str) -> Self {
        Self::parse(&value.trim().to_ascii_lowercase()).unwrap_or_default()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for question input and records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionValidationError {
    /// Text is empty or whitespace-only.
    EmptyText,
    /// Category is not one of `birth|family|illness|special|other`.
    InvalidCategory(String),
    /// Priority is outside `[1, 100]`.
    InvalidPriority(i64),
}

impl Display for QuestionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "question text must not be blank"),
            Self::InvalidCategory(value) => write!(
                f,
                "invalid category `{value}`; expected birth|family|illness|special|other"
            ),
            Self::InvalidPriority(value) => write!(
                f,
                "priority {value} is outside [{MIN_PRIORITY}, {MAX_PRIORITY}]"
            ),
        }
    }
}

impl Error for QuestionValidationError {}

/// Partial question input.
///
/// `None` means "not provided". Used both for building new records with
/// defaults and for merging edits into an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFields {
    pub text: Option<String>,
    /// Raw category name, checked by `validate()` or coerced on build.
    pub category: Option<String>,
    /// Raw priority, checked by `validate()` or clamped on build.
    pub priority: Option<i64>,
    pub required: Option<bool>,
    pub attention: Option<bool>,
    pub notes: Option<String>,
}

impl QuestionFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_attention(mut self, attention: bool) -> Self {
        self.attention = Some(attention);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Returns whether no field is provided.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Strictly validates the provided fields. Omitted fields always pass.
    pub fn validate(&self) -> Result<(), QuestionValidationError> {
        if let Some(category) = &self.category {
            if Category::parse(category).is_none() {
                return Err(QuestionValidationError::InvalidCategory(category.clone()));
            }
        }
        if let Some(priority) = self.priority {
            check_priority(priority)?;
        }
        if let Some(text) = &self.text {
            check_text(text)?;
        }
        Ok(())
    }
}

/// One question prompt plus its metadata.
///
/// Serializes with every field present, in persisted-format order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    pub text: String,
    pub category: Category,
    /// Lower is more important. Not unique within a stage.
    pub priority: u8,
    pub required: bool,
    /// Flags the question for special downstream handling.
    pub attention: bool,
    pub notes: String,
}

impl QuestionRecord {
    /// Creates a record with default category and flags.
    pub fn new(text: impl Into<String>, priority: u8) -> Self {
        Self {
            text: text.into(),
            category: Category::Other,
            priority,
            required: false,
            attention: false,
            notes: String::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_attention(mut self, attention: bool) -> Self {
        self.attention = attention;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Builds a record from partial input, applying defaults.
    ///
    /// Never fails: unknown categories become `Other`, priorities are clamped
    /// into range, and a missing priority uses `default_priority`.
    pub fn from_fields(fields: QuestionFields, default_priority: u8) -> Self {
        let mut record = Self::new(String::new(), clamp_priority(i64::from(default_priority)));
        record.merge(fields);
        record
    }

    /// Overwrites provided fields and keeps existing values for omitted ones.
    ///
    /// Coerces the same way as `from_fields`.
    pub fn merge(&mut self, fields: QuestionFields) {
        if let Some(text) = fields.text {
            self.text = text;
        }
        if let Some(category) = fields.category {
            self.category = Category::parse_lenient(&category);
        }
        if let Some(priority) = fields.priority {
            self.priority = clamp_priority(priority);
        }
        if let Some(required) = fields.required {
            self.required = required;
        }
        if let Some(attention) = fields.attention {
            self.attention = attention;
        }
        if let Some(notes) = fields.notes {
            self.notes = notes;
        }
    }

    /// Strictly validates this record.
    pub fn validate(&self) -> Result<(), QuestionValidationError> {
        check_priority(i64::from(self.priority))?;
        check_text(&self.text)
    }

    /// Single-line text preview capped at `max_chars`.
    pub fn preview(&self, max_chars: usize) -> String {
        truncate_chars(&self.text, max_chars)
    }

    /// Plain-text list label: `"<preview> [<category>, priority <n>]"`.
    pub fn label(&self) -> String {
        format!(
            "{} [{}, priority {}]",
            self.preview(LABEL_PREVIEW_CHARS),
            self.category,
            self.priority
        )
    }
}

/// Conventional priority for a record at `index`: `index + 1`, capped.
pub fn priority_for_position(index: usize) -> u8 {
    clamp_priority(i64::try_from(index).unwrap_or(i64::MAX).saturating_add(1))
}

/// Clamps any integer into `[MIN_PRIORITY, MAX_PRIORITY]`.
pub fn clamp_priority(value: i64) -> u8 {
    // Fits in u8 after the clamp.
    value.clamp(i64::from(MIN_PRIORITY), i64::from(MAX_PRIORITY)) as u8
}

fn check_priority(value: i64) -> Result<(), QuestionValidationError> {
    if (i64::from(MIN_PRIORITY)..=i64::from(MAX_PRIORITY)).contains(&value) {
        Ok(())
    } else {
        Err(QuestionValidationError::InvalidPriority(value))
    }
}

fn check_text(value: &str) -> Result<(), QuestionValidationError> {
    if value.trim().is_empty() {
        Err(QuestionValidationError::EmptyText)
    } else {
        Ok(())
    }
}
