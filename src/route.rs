//! Typed route surface of the wizard.
//!
//! Paths look like `/login`, `/select-type`, `/{flow}/{page}` and `/complete`,
//! optionally prefixed with a locale segment (`/ja/new/step1`).
use crate::i18n::Locale;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application type chosen on the select-type page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    New,
    Renewal,
}

impl FlowKind {
    /// Return the stable identifier used in paths and the draft.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::New => "new",
            FlowKind::Renewal => "renewal",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "new" => Ok(FlowKind::New),
            "renewal" => Ok(FlowKind::Renewal),
            other => Err(anyhow!("unknown application type {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    SelectType,
    /// A page inside a flow, e.g. `step1b` or `confirm`.
    Page { flow: FlowKind, page: String },
    Complete,
}

impl Route {
    pub fn page(flow: FlowKind, page: &str) -> Self {
        Route::Page {
            flow,
            page: page.to_string(),
        }
    }

    /// Parse a path, ignoring a leading locale segment.
    pub fn parse(path: &str) -> Result<Self> {
        if path.contains('?') {
            return Err(anyhow!("routes take no query parameters (got {path:?})"));
        }
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments
            .first()
            .is_some_and(|first| Locale::from_str(first).is_ok())
        {
            segments.remove(0);
        }
        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["login"] => Ok(Route::Login),
            ["select-type"] => Ok(Route::SelectType),
            ["complete"] => Ok(Route::Complete),
            [flow, page] => {
                let flow = FlowKind::from_str(flow)?;
                if !is_page_segment(page) {
                    return Err(anyhow!("unknown page {page:?} in {path:?}"));
                }
                Ok(Route::page(flow, page))
            }
            _ => Err(anyhow!("unknown route {path:?}")),
        }
    }

    /// Path without a locale prefix.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::SelectType => "/select-type".to_string(),
            Route::Page { flow, page } => format!("/{flow}/{page}"),
            Route::Complete => "/complete".to_string(),
        }
    }

    pub fn localized_path(&self, locale: Locale) -> String {
        match self {
            Route::Home => format!("/{locale}"),
            other => format!("/{locale}{}", other.path()),
        }
    }

    pub fn flow(&self) -> Option<FlowKind> {
        match self {
            Route::Page { flow, .. } => Some(*flow),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn is_page_segment(segment: &str) -> bool {
    if segment == "confirm" {
        return true;
    }
    let Some(rest) = segment.strip_prefix("step") else {
        return false;
    };
    let digits = rest.trim_end_matches(|c: char| c.is_ascii_lowercase());
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format_round_trip_paths() {
        for path in [
            "/",
            "/login",
            "/select-type",
            "/new/step10",
            "/renewal/step1b",
            "/new/confirm",
            "/complete",
        ] {
            let route = Route::parse(path).unwrap();
            assert_eq!(route.path(), path);
        }
    }

    #[test]
    fn parse_strips_locale_prefix() {
        let route = Route::parse("/vi/renewal/step3").unwrap();
        assert_eq!(route, Route::page(FlowKind::Renewal, "step3"));
        assert_eq!(route.localized_path(Locale::Ja), "/ja/renewal/step3");
        assert_eq!(Route::Home.localized_path(Locale::En), "/en");
    }

    #[test]
    fn parse_rejects_unknown_routes_and_queries() {
        assert!(Route::parse("/new/step2?x=1").is_err());
        assert!(Route::parse("/other/step1").is_err());
        assert!(Route::parse("/new/summary").is_err());
        assert!(Route::parse("/new/step1/extra").is_err());
    }
}
