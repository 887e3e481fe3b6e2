//! Navigation collaborator: push, back and locale-aware replace.
//!
//! [`HistoryNavigator`] keeps a browser-like route stack in a durable slot so
//! `back` keeps working across separate CLI invocations.
use crate::draft::DraftSlot;
use crate::i18n::Locale;
use crate::route::Route;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Slot key holding the serialized route stack.
pub const NAV_SLOT_KEY: &str = "visa-nav-history";

pub trait Navigator {
    fn current(&self) -> &Route;
    fn locale(&self) -> Locale;
    fn push(&mut self, route: Route) -> Result<()>;
    /// Go to the previous route. Returns false when already at the start.
    fn back(&mut self) -> Result<bool>;
    /// Replace the current entry and switch locale.
    fn replace(&mut self, route: Route, locale: Locale) -> Result<()>;

    /// Locale-prefixed path for `route`.
    fn href(&self, route: &Route) -> String {
        route.localized_path(self.locale())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryState {
    locale: Locale,
    stack: Vec<String>,
}

#[derive(Debug)]
pub struct HistoryNavigator<S: DraftSlot> {
    slot: S,
    locale: Locale,
    /// Routes visited before `current`, oldest first.
    previous: Vec<Route>,
    current: Route,
}

impl<S: DraftSlot> HistoryNavigator<S> {
    /// Restore the stack from `slot`, starting at `/` when nothing usable is
    /// stored.
    pub fn open(slot: S, default_locale: Locale) -> Self {
        let restored = match slot.read(NAV_SLOT_KEY) {
            Ok(Some(text)) => match decode_state(&text) {
                Ok(state) => Some(state),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring unreadable navigation history");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read navigation history");
                None
            }
        };
        let (locale, mut previous) =
            restored.unwrap_or_else(|| (default_locale, vec![Route::Home]));
        let current = previous.pop().unwrap_or(Route::Home);
        Self {
            slot,
            locale,
            previous,
            current,
        }
    }

    /// Number of entries including the current route.
    pub fn depth(&self) -> usize {
        self.previous.len() + 1
    }

    /// Drop all history and start again at `route`.
    pub fn reset_to(&mut self, route: Route) -> Result<()> {
        self.previous.clear();
        self.current = route;
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        let state = HistoryState {
            locale: self.locale,
            stack: self
                .previous
                .iter()
                .chain(std::iter::once(&self.current))
                .map(Route::path)
                .collect(),
        };
        let text = serde_json::to_string(&state).context("serialize navigation history")?;
        self.slot
            .write(NAV_SLOT_KEY, &text)
            .context("persist navigation history")
    }
}

impl<S: DraftSlot> Navigator for HistoryNavigator<S> {
    fn current(&self) -> &Route {
        &self.current
    }

    fn locale(&self) -> Locale {
        self.locale
    }

    fn push(&mut self, route: Route) -> Result<()> {
        tracing::debug!(from = %self.current, to = %route, "navigate");
        let left = std::mem::replace(&mut self.current, route);
        self.previous.push(left);
        self.persist()
    }

    fn back(&mut self) -> Result<bool> {
        let Some(target) = self.previous.pop() else {
            return Ok(false);
        };
        tracing::debug!(from = %self.current, to = %target, "navigate back");
        self.current = target;
        self.persist()?;
        Ok(true)
    }

    fn replace(&mut self, route: Route, locale: Locale) -> Result<()> {
        self.locale = locale;
        self.current = route;
        self.persist()
    }
}

fn decode_state(text: &str) -> Result<(Locale, Vec<Route>)> {
    let state: HistoryState = serde_json::from_str(text).context("parse navigation history")?;
    let stack = state
        .stack
        .iter()
        .map(|path| Route::parse(path))
        .collect::<Result<Vec<_>>>()?;
    if stack.is_empty() {
        return Ok((state.locale, vec![Route::Home]));
    }
    Ok((state.locale, stack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::MemorySlot;
    use crate::route::FlowKind;

    #[test]
    fn push_and_back_walk_the_stack() {
        let mut nav = HistoryNavigator::open(MemorySlot::new(), Locale::En);
        assert_eq!(nav.current(), &Route::Home);
        nav.push(Route::Login).unwrap();
        nav.push(Route::SelectType).unwrap();
        assert!(nav.back().unwrap());
        assert_eq!(nav.current(), &Route::Login);
        assert!(nav.back().unwrap());
        assert!(!nav.back().unwrap());
        assert_eq!(nav.current(), &Route::Home);
    }

    #[test]
    fn history_survives_reopen() {
        let mut nav = HistoryNavigator::open(MemorySlot::new(), Locale::Ja);
        nav.push(Route::page(FlowKind::Renewal, "step1")).unwrap();
        nav.push(Route::page(FlowKind::Renewal, "step1b")).unwrap();
        nav.replace(Route::page(FlowKind::Renewal, "step2"), Locale::Vi)
            .unwrap();
        let slot = nav.slot.clone();

        let reopened = HistoryNavigator::open(slot, Locale::Ja);
        assert_eq!(reopened.locale(), Locale::Vi);
        assert_eq!(reopened.depth(), 3);
        assert_eq!(
            reopened.href(reopened.current()),
            "/vi/renewal/step2".to_string()
        );
    }

    #[test]
    fn malformed_history_starts_fresh() {
        let slot = MemorySlot::with_entry(NAV_SLOT_KEY, r#"{"locale":"en","stack":["/bogus/x/y"]}"#);
        let nav = HistoryNavigator::open(slot, Locale::Zh);
        assert_eq!(nav.current(), &Route::Home);
        assert_eq!(nav.locale(), Locale::Zh);
    }
}
