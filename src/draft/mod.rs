//! In-progress application record and its durable slot.
//!
//! The draft is a flat key/value map that every step reads a slice of and
//! merges its validated partial back into. Persistence goes through a
//! [`DraftSlot`] so pages never touch storage directly.
mod slot;
mod value;

pub use slot::{DraftSlot, FileSlot, MemorySlot};
pub use value::DraftValue;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Slot key holding the serialized draft.
pub const DRAFT_SLOT_KEY: &str = "visa-form-data";

/// Flat application record keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft {
    fields: BTreeMap<String, DraftValue>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&DraftValue> {
        self.fields.get(key)
    }

    /// Return the string value for `key` when it is present and non-empty.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(DraftValue::String(value)) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    /// True when `key` holds a non-empty string, the only "present" test the
    /// confirmation pages use for file names.
    pub fn has_text(&self, key: &str) -> bool {
        self.text(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DraftValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Shallow merge: keys in `partial` overwrite, everything else is kept.
    pub fn merge(&mut self, partial: &Draft) {
        for (key, value) in &partial.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode a persisted payload. Anything that is not a JSON object is an
    /// error; nested values inside the object are dropped with a warning.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: serde_json::Map<String, Value> =
            serde_json::from_str(text).context("parse draft JSON")?;
        let mut draft = Draft::new();
        for (key, value) in raw {
            match DraftValue::from_json(value) {
                Some(value) => draft.insert(key, value),
                None => tracing::warn!(field = %key, "dropping non-scalar draft value"),
            }
        }
        Ok(draft)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize draft")
    }
}

impl<K: Into<String>, V: Into<DraftValue>> FromIterator<(K, V)> for Draft {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut draft = Draft::new();
        for (key, value) in iter {
            draft.insert(key, value);
        }
        draft
    }
}

/// Draft plus the slot it is persisted to.
///
/// Every [`DraftStore::merge`] writes through immediately; there is no
/// batching and write failures reach the caller.
#[derive(Debug)]
pub struct DraftStore<S: DraftSlot> {
    slot: S,
    draft: Draft,
}

impl<S: DraftSlot> DraftStore<S> {
    /// Open a store and hydrate it from the slot.
    pub fn open(slot: S) -> Self {
        let mut store = Self {
            slot,
            draft: Draft::new(),
        };
        store.load();
        store
    }

    /// Re-read the persisted draft, falling back to an empty one when the
    /// slot is missing, unreadable, or holds malformed JSON.
    pub fn load(&mut self) -> &Draft {
        self.draft = match self.slot.read(DRAFT_SLOT_KEY) {
            Ok(Some(text)) => match Draft::from_json(&text) {
                Ok(draft) => draft,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to parse persisted draft; starting empty");
                    Draft::new()
                }
            },
            Ok(None) => Draft::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted draft; starting empty");
                Draft::new()
            }
        };
        &self.draft
    }

    pub fn snapshot(&self) -> &Draft {
        &self.draft
    }

    /// Merge `partial` into the draft and persist the result.
    pub fn merge(&mut self, partial: &Draft) -> Result<()> {
        let mut next = self.draft.clone();
        next.merge(partial);
        let text = next.to_json()?;
        self.slot
            .write(DRAFT_SLOT_KEY, &text)
            .context("persist draft")?;
        tracing::debug!(fields = partial.len(), total = next.len(), "draft merged");
        self.draft = next;
        Ok(())
    }

    /// Drop the persisted draft and start over.
    pub fn clear(&mut self) -> Result<()> {
        self.slot.remove(DRAFT_SLOT_KEY).context("clear draft")?;
        self.draft = Draft::new();
        tracing::info!("draft cleared");
        Ok(())
    }
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;
