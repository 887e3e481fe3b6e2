//! Declarative per-step validation.
//!
//! A [`StepSchema`] lists field specs and cross-field rules. Field rules run
//! first, in declaration order, stopping at the first failure per field.
//! Cross-field rules only run once every field passed, matching how a schema
//! refinement only sees a fully parsed object. The result is either a typed
//! partial draft or a map of translated errors; there is no partial success.
mod rules;

pub use rules::{CrossRule, FieldKind, FieldSpec, Rule};

use crate::draft::{Draft, DraftValue};
use crate::i18n::Translator;
use std::collections::BTreeMap;

/// Raw string input of a form, keyed by field.
pub type FormInput = BTreeMap<String, String>;

/// Message key used when a numeric field cannot be coerced.
pub const NUMBER_MESSAGE_KEY: &str = "validation.number";
/// Message key used when a date field is not `YYYY-MM-DD`.
pub const DATE_MESSAGE_KEY: &str = "validation.date";

/// Fields and cross-field rules of one page.
#[derive(Debug, Clone, Copy)]
pub struct StepSchema {
    /// Translation namespace that relative message keys resolve under.
    pub namespace: &'static str,
    pub fields: &'static [FieldSpec],
    pub cross: &'static [CrossRule],
}

impl StepSchema {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key)
    }

    fn message(&self, translator: &dyn Translator, relative: &str) -> String {
        translator.t(&format!("{}.{relative}", self.namespace))
    }
}

/// Field name to translated message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn insert_first(&mut self, field: &str, message: String) {
        self.errors.entry(field.to_string()).or_insert(message);
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

/// Validate `input` against `schema`.
///
/// On success the returned draft holds exactly the schema's keys with typed
/// values; numbers are coerced, everything else stays a string.
pub fn validate_step(
    schema: &StepSchema,
    input: &FormInput,
    translator: &dyn Translator,
) -> Result<Draft, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut validated = Draft::new();

    for field in schema.fields {
        let raw = input.get(field.key).map(String::as_str).unwrap_or("");
        match check_field(field, raw) {
            Ok(value) => validated.insert(field.key, value),
            Err(failure) => {
                let message = match failure {
                    Failure::Rule(relative) => schema.message(translator, relative),
                    Failure::Absolute(key) => translator.t(key),
                };
                errors.insert_first(field.key, message);
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    for rule in schema.cross {
        if let Some((field, relative)) = rule.violation(&validated) {
            errors.insert_first(field, schema.message(translator, relative));
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(validated)
}

enum Failure {
    Rule(&'static str),
    Absolute(&'static str),
}

fn check_field(field: &FieldSpec, raw: &str) -> Result<DraftValue, Failure> {
    let blank = raw.trim().is_empty();
    if field.optional && blank {
        return Ok(match field.kind {
            FieldKind::Number => DraftValue::Null,
            _ => DraftValue::String(raw.to_string()),
        });
    }

    let number = match field.kind {
        FieldKind::Number => Some(coerce_number(raw).ok_or(Failure::Absolute(NUMBER_MESSAGE_KEY))?),
        _ => None,
    };

    for rule in field.rules {
        rule.check(raw, number).map_err(Failure::Rule)?;
    }

    if field.kind == FieldKind::Date && !blank && rules::parse_date(raw).is_none() {
        return Err(Failure::Absolute(DATE_MESSAGE_KEY));
    }

    Ok(match number {
        Some(value) => DraftValue::Number(value),
        None => DraftValue::String(raw.to_string()),
    })
}

/// Blank input coerces to zero, like a browser number field left empty.
fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
