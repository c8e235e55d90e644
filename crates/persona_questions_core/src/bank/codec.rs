//! JSON shape of the persisted question bank.
//!
//! # Responsibility
//! - Serialize every stage and every record field, in order.
//! - Decode externally authored documents permissively at the field level.
//!
//! # Invariants
//! - Structure is strict: the root and each stage must be objects, and
//!   `questions` must be an array of objects.
//! - Fields are lenient: wrong-typed or missing question fields fall back to
//!   defaults instead of failing the load.

use super::{BankError, BankResult, QuestionBank};
use crate::model::question::{priority_for_position, QuestionFields, QuestionRecord};
use crate::model::stage::{Stage, DEFAULT_STAGE_STATUS};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt::Formatter;

/// Pretty-printed UTF-8 JSON with two-space indentation.
pub(super) fn to_pretty_json(bank: &QuestionBank) -> BankResult<Vec<u8>> {
    serde_json::to_vec_pretty(bank).map_err(BankError::Serialize)
}

#[derive(Serialize)]
struct StageBody<'a> {
    questions: &'a [QuestionRecord],
    status: &'a str,
}

impl Serialize for QuestionBank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for stage in self.stages() {
            map.serialize_entry(
                stage.name(),
                &StageBody {
                    questions: stage.questions(),
                    status: stage.status(),
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QuestionBank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BankVisitor)
    }
}

struct BankVisitor;

impl<'de> Visitor<'de> for BankVisitor {
    type Value = QuestionBank;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("an object mapping stage names to stages")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut bank = QuestionBank::new();
        while let Some((name, raw)) = access.next_entry::<String, RawStage>()? {
            bank.insert_decoded(raw.into_stage(name));
        }
        Ok(bank)
    }
}

#[derive(Deserialize)]
struct RawStage {
    #[serde(default)]
    questions: Option<Vec<RawQuestion>>,
    #[serde(default)]
    status: Option<Value>,
}

impl RawStage {
    fn into_stage(self, name: String) -> Stage {
        let questions = self
            .questions
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                QuestionRecord::from_fields(raw.into_fields(), priority_for_position(index))
            })
            .collect();
        let status = match self.status {
            Some(Value::String(status)) => status,
            _ => DEFAULT_STAGE_STATUS.to_string(),
        };
        Stage::with_parts(name, questions, status)
    }
}

#[derive(Deserialize)]
struct RawQuestion {
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    priority: Option<Value>,
    #[serde(default)]
    required: Option<Value>,
    #[serde(default)]
    attention: Option<Value>,
    #[serde(default)]
    notes: Option<Value>,
}

impl RawQuestion {
    fn into_fields(self) -> QuestionFields {
        QuestionFields {
            text: self.text.map(lenient_string),
            category: self.category.map(lenient_string),
            priority: self.priority.and_then(lenient_priority),
            required: self.required.map(truthy),
            attention: self.attention.map(truthy),
            notes: self.notes.map(lenient_string),
        }
    }
}

/// Strings pass through, scalars are stringified, containers become empty.
fn lenient_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Integers, floats (truncated), numeric strings and booleans are accepted.
fn lenient_priority(value: Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|float| float.is_finite())
                    .map(|float| float as i64)
            })
        }
        Value::Bool(flag) => Some(i64::from(flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Zero, empty and null values are false; everything else is true.
fn truthy(value: Value) -> bool {
    match value {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
        Value::Null => false,
    }
}
