use crate::draft::{Draft, DraftValue};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const PHONE_PATTERN: &str = r"^[0-9+\-]+$";
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// ISO `YYYY-MM-DD`.
    Date,
}

/// Single field of a step.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    /// Blank optional fields skip every rule.
    pub optional: bool,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn required(key: &'static str, kind: FieldKind, rules: &'static [Rule]) -> Self {
        Self {
            key,
            kind,
            optional: false,
            rules,
        }
    }

    pub const fn optional(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            optional: true,
            rules: &[],
        }
    }

    /// Value a freshly mounted page shows when the draft lacks this key.
    pub fn empty_value(&self) -> &'static str {
        match self.kind {
            FieldKind::Number if !self.optional => "0",
            _ => "",
        }
    }
}

/// Per-field rule. Each variant carries the relative message key reported
/// when it fails.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required(&'static str),
    Phone(&'static str),
    Email(&'static str),
    MinNumber { min: f64, message: &'static str },
    MinChars { min: usize, message: &'static str },
    OneOf {
        choices: &'static [&'static str],
        message: &'static str,
    },
}

impl Rule {
    pub(super) fn check(&self, raw: &str, number: Option<f64>) -> Result<(), &'static str> {
        let ok = match self {
            Rule::Required(_) => !raw.trim().is_empty(),
            Rule::Phone(_) => phone_regex().is_match(raw.trim()),
            Rule::Email(_) => email_regex().is_match(raw.trim()),
            Rule::MinNumber { min, .. } => number.is_some_and(|value| value >= *min),
            Rule::MinChars { min, .. } => raw.chars().count() >= *min,
            Rule::OneOf { choices, .. } => choices.iter().any(|choice| *choice == raw),
        };
        if ok {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required(message)
            | Rule::Phone(message)
            | Rule::Email(message)
            | Rule::MinNumber { message, .. }
            | Rule::MinChars { message, .. }
            | Rule::OneOf { message, .. } => *message,
        }
    }

    /// Choices offered by a `OneOf` rule, used when prompting.
    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self {
            Rule::OneOf { choices, .. } => Some(*choices),
            _ => None,
        }
    }
}

/// Rule spanning several fields, evaluated after every field rule passed.
#[derive(Debug, Clone, Copy)]
pub enum CrossRule {
    /// `later` must be strictly after `earlier`; reported on `later`.
    DateAfter {
        later: &'static str,
        earlier: &'static str,
        message: &'static str,
    },
    /// `field` becomes required when `toggle` equals `equals`.
    RequiredWhen {
        toggle: &'static str,
        equals: &'static str,
        field: &'static str,
        message: &'static str,
    },
}

impl CrossRule {
    /// Return the field and relative message key when the rule is violated.
    pub(super) fn violation(&self, values: &Draft) -> Option<(&'static str, &'static str)> {
        match self {
            CrossRule::DateAfter {
                later,
                earlier,
                message,
            } => {
                let after = match (date_of(values, later), date_of(values, earlier)) {
                    (Some(later), Some(earlier)) => later > earlier,
                    _ => false,
                };
                (!after).then_some((*later, *message))
            }
            CrossRule::RequiredWhen {
                toggle,
                equals,
                field,
                message,
            } => {
                let active = values.get(toggle).and_then(DraftValue::as_str) == Some(*equals);
                (active && !is_truthy(values.get(field))).then_some((*field, *message))
            }
        }
    }

    /// Field the rule may make required, if any.
    pub fn dependent_field(&self) -> Option<(&'static str, &'static str, &'static str)> {
        match self {
            CrossRule::RequiredWhen {
                toggle,
                equals,
                field,
                ..
            } => Some((*toggle, *equals, *field)),
            CrossRule::DateAfter { .. } => None,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn date_of(values: &Draft, key: &str) -> Option<NaiveDate> {
    values.get(key).and_then(DraftValue::as_str).and_then(parse_date)
}

/// Blank strings, zero, false, and null all count as "not filled in".
fn is_truthy(value: Option<&DraftValue>) -> bool {
    match value {
        Some(DraftValue::String(text)) => !text.trim().is_empty(),
        Some(DraftValue::Number(number)) => *number != 0.0 && !number.is_nan(),
        Some(DraftValue::Bool(flag)) => *flag,
        Some(DraftValue::Null) | None => false,
    }
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("valid phone pattern"))
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("valid email pattern"))
}
