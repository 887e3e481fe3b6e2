//! Translation lookup keyed by namespaced string ids.
//!
//! Catalogs are embedded JSON documents, one per locale, flattened into dotted
//! keys (`newApplication.step1.errors.nameRomajiRequired`). Lookups fall back
//! to English and finally to the key itself.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const JA_JSON: &str = include_str!("locales/ja.json");
const EN_JSON: &str = include_str!("locales/en.json");
const ZH_JSON: &str = include_str!("locales/zh.json");
const VI_JSON: &str = include_str!("locales/vi.json");

/// Locales with an embedded catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Ja,
    En,
    Zh,
    Vi,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::Ja, Locale::En, Locale::Zh, Locale::Vi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
            Locale::Zh => "zh",
            Locale::Vi => "vi",
        }
    }

    fn catalog_source(&self) -> &'static str {
        match self {
            Locale::Ja => JA_JSON,
            Locale::En => EN_JSON,
            Locale::Zh => ZH_JSON,
            Locale::Vi => VI_JSON,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.as_str() == value)
            .ok_or_else(|| anyhow!("unsupported locale {value:?} (expected ja, en, zh or vi)"))
    }
}

/// Resolves a namespaced key plus `{name}` parameters to display text.
pub trait Translator {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;

    fn t(&self, key: &str) -> String {
        self.translate(key, &[])
    }

    /// Separator used when joining several messages into one line.
    fn list_separator(&self) -> String {
        self.t("common.listSeparator")
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    messages: BTreeMap<String, String>,
    fallback: BTreeMap<String, String>,
}

impl Catalog {
    /// Load the embedded catalog for `locale` with English as fallback.
    pub fn load(locale: Locale) -> Result<Self> {
        let messages = parse_catalog(locale)?;
        let fallback = if locale == Locale::En {
            BTreeMap::new()
        } else {
            parse_catalog(Locale::En)?
        };
        Ok(Self {
            locale,
            messages,
            fallback,
        })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = match self.messages.get(key).or_else(|| self.fallback.get(key)) {
            Some(template) => template.as_str(),
            None => {
                tracing::debug!(key, locale = %self.locale, "missing translation");
                key
            }
        };
        interpolate(template, params)
    }
}

fn parse_catalog(locale: Locale) -> Result<BTreeMap<String, String>> {
    let root: Value = serde_json::from_str(locale.catalog_source())
        .with_context(|| format!("parse {locale} catalog"))?;
    let mut messages = BTreeMap::new();
    flatten_into(&mut messages, "", &root);
    Ok(messages)
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let next = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(out, &next, child);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}
