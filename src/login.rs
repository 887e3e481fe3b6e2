//! Simulated sign-in page.
//!
//! Only the shape of the credentials is checked. Nothing is stored and no
//! account is looked up; a successful form waits out a fixed delay and moves
//! on to the select-type page.
use crate::i18n::Translator;
use crate::nav::Navigator;
use crate::route::Route;
use crate::validate::{self, FieldErrors, FieldKind, FieldSpec, FormInput, Rule, StepSchema};
use anyhow::Result;
use std::thread;
use std::time::Duration;

const LOGIN_SCHEMA: StepSchema = StepSchema {
    namespace: "login",
    fields: &[
        FieldSpec::required(
            "email",
            FieldKind::Text,
            &[
                Rule::Required("errors.required"),
                Rule::Email("errors.invalidEmail"),
            ],
        ),
        FieldSpec::required("password", FieldKind::Text, &[Rule::Required("errors.required")]),
    ],
    cross: &[],
};

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    SignedIn(Route),
    Rejected(FieldErrors),
}

pub fn login<N: Navigator>(
    email: &str,
    password: &str,
    nav: &mut N,
    translator: &dyn Translator,
    delay: Duration,
) -> Result<LoginOutcome> {
    let input: FormInput = [("email", email), ("password", password)]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    if let Err(errors) = validate::validate_step(&LOGIN_SCHEMA, &input, translator) {
        return Ok(LoginOutcome::Rejected(errors));
    }

    tracing::debug!(delay_ms = delay.as_millis() as u64, "simulating sign-in");
    thread::sleep(delay);
    nav.push(Route::SelectType)?;
    tracing::info!("signed in");
    Ok(LoginOutcome::SignedIn(Route::SelectType))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::MemorySlot;
    use crate::i18n::{Catalog, Locale};
    use crate::nav::HistoryNavigator;

    #[test]
    fn valid_credentials_move_to_select_type() {
        let catalog = Catalog::load(Locale::En).unwrap();
        let mut nav = HistoryNavigator::open(MemorySlot::new(), Locale::En);
        nav.push(Route::Login).unwrap();

        let outcome = login("ana@example.com", "secret", &mut nav, &catalog, Duration::ZERO).unwrap();
        assert_eq!(outcome, LoginOutcome::SignedIn(Route::SelectType));
        assert_eq!(nav.current(), &Route::SelectType);
    }

    #[test]
    fn malformed_credentials_stay_on_login() {
        let catalog = Catalog::load(Locale::En).unwrap();
        let mut nav = HistoryNavigator::open(MemorySlot::new(), Locale::En);
        nav.push(Route::Login).unwrap();

        let LoginOutcome::Rejected(errors) =
            login("ana", "", &mut nav, &catalog, Duration::ZERO).unwrap()
        else {
            panic!("expected rejection");
        };
        assert_eq!(errors.get("email"), Some(catalog.t("login.errors.invalidEmail").as_str()));
        assert_eq!(errors.get("password"), Some(catalog.t("login.errors.required").as_str()));
        assert_eq!(nav.current(), &Route::Login);
    }
}
