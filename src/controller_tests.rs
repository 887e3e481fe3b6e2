use super::{submit_confirmation, StepController, StepState, SubmitOptions, SubmitOutcome};
use crate::draft::{Draft, DraftSlot, DraftStore, DraftValue, MemorySlot};
use crate::files::FileRef;
use crate::flow::{self, find_page, PageDef, PageKind};
use crate::i18n::{Catalog, Locale, Translator};
use crate::nav::{HistoryNavigator, Navigator};
use crate::route::{FlowKind, Route};
use anyhow::{anyhow, Result};
use std::time::Duration;

struct FullSlot;

impl DraftSlot for FullSlot {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&mut self, _key: &str, _text: &str) -> Result<()> {
        Err(anyhow!("disk full"))
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }
}

fn page(flow: FlowKind, name: &str) -> &'static PageDef {
    find_page(&Route::page(flow, name)).unwrap()
}

fn at(route: Route) -> HistoryNavigator<MemorySlot> {
    let mut nav = HistoryNavigator::open(MemorySlot::new(), Locale::En);
    nav.push(route).unwrap();
    nav
}

fn english() -> Catalog {
    Catalog::load(Locale::En).unwrap()
}

fn fill_step2(controller: &mut StepController) {
    controller.set("passportNumber", "C1234567").unwrap();
    controller.set("passportIssueDate", "2024-01-01").unwrap();
    controller.set("passportExpiryDate", "2030-01-01").unwrap();
}

#[test]
fn hydration_defaults_missing_values() {
    let def = page(FlowKind::Renewal, "step2");
    let draft: Draft = [("livingAddress", "Nagoya"), ("unrelated", "x")].into_iter().collect();
    let controller = StepController::hydrate(def, &draft);

    assert_eq!(controller.value("livingAddress"), "Nagoya");
    assert_eq!(controller.value("rent"), "0");
    assert_eq!(controller.value("supporter"), "");
    assert_eq!(controller.values().len(), 3);
    assert_eq!(controller.state(), StepState::Pristine);
}

#[test]
fn hydration_restores_file_names_and_numbers() {
    let def = page(FlowKind::Renewal, "step3");
    let mut draft: Draft = [("hasPartTimeJob", "yes"), ("payslipFileName", "may.pdf")]
        .into_iter()
        .collect();
    draft.insert("weeklyHours", 28.0);
    let controller = StepController::hydrate(def, &draft);

    assert_eq!(controller.value("weeklyHours"), "28");
    assert_eq!(controller.value("monthlyIncome"), "");
    assert_eq!(controller.file("payslip").unwrap().name, "may.pdf");
}

#[test]
fn editing_state_tracks_divergence() {
    let def = page(FlowKind::New, "step6");
    let mut controller = StepController::hydrate(def, &Draft::new());

    controller.set("companyName", "Acme").unwrap();
    assert_eq!(controller.state(), StepState::Editing);
    controller.set("companyName", "").unwrap();
    assert_eq!(controller.state(), StepState::Pristine);

    assert!(controller.set("salary", "1").is_err());
    assert!(controller.attach("passport", None).is_err());
}

#[test]
fn missing_required_file_blocks_submission() {
    let def = page(FlowKind::New, "step2");
    let catalog = english();
    let mut store = DraftStore::open(MemorySlot::new());
    let mut nav = at(def.route());
    let mut controller = StepController::hydrate(def, store.snapshot());
    fill_step2(&mut controller);

    let outcome = controller.submit(&mut store, &mut nav, &catalog).unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            errors: Default::default(),
            file_error: Some(catalog.t("newApplication.step2.errors.passportFileRequired")),
        }
    );
    assert!(store.snapshot().is_empty());
    assert_eq!(nav.current(), &def.route());
    assert_eq!(controller.state(), StepState::Editing);
}

#[test]
fn field_errors_and_file_error_are_reported_together() {
    let def = page(FlowKind::New, "step2");
    let catalog = english();
    let mut store = DraftStore::open(MemorySlot::new());
    let mut nav = at(def.route());
    let mut controller = StepController::hydrate(def, store.snapshot());

    let SubmitOutcome::Rejected { errors, file_error } =
        controller.submit(&mut store, &mut nav, &catalog).unwrap()
    else {
        panic!("expected rejection");
    };
    assert_eq!(errors.len(), 3);
    assert!(file_error.is_some());
}

#[test]
fn valid_step_merges_exact_partial_and_advances() {
    let def = page(FlowKind::New, "step2");
    let catalog = english();
    let seeded: Draft = [("applicationType", "new"), ("nameRomaji", "LIN WEI")]
        .into_iter()
        .collect();
    let mut store = DraftStore::open(MemorySlot::new());
    store.merge(&seeded).unwrap();
    let mut nav = at(def.route());
    let mut controller = StepController::hydrate(def, store.snapshot());
    fill_step2(&mut controller);
    controller
        .attach("passport", Some(FileRef::named("passport.pdf")))
        .unwrap();

    let outcome = controller.submit(&mut store, &mut nav, &catalog).unwrap();
    let step3 = Route::page(FlowKind::New, "step3");
    assert_eq!(outcome, SubmitOutcome::Advanced(step3.clone()));
    assert_eq!(nav.current(), &step3);
    assert_eq!(controller.state(), StepState::Advanced);

    let draft = store.snapshot();
    assert_eq!(draft.len(), 6);
    assert_eq!(draft.text("nameRomaji"), Some("LIN WEI"));
    assert_eq!(draft.text("passportFileName"), Some("passport.pdf"));
    assert_eq!(draft.text("passportExpiryDate"), Some("2030-01-01"));
}

#[test]
fn every_form_rejects_an_empty_submission_untouched() {
    let catalog = english();
    for flow_kind in [FlowKind::New, FlowKind::Renewal] {
        for def in flow::pages(flow_kind) {
            if def.kind != PageKind::Form {
                continue;
            }
            let mut store = DraftStore::open(MemorySlot::new());
            let mut nav = at(def.route());
            let mut controller = StepController::hydrate(def, store.snapshot());
            let outcome = controller.submit(&mut store, &mut nav, &catalog).unwrap();

            if flow_kind == FlowKind::New && def.page == "step6" {
                let step7 = Route::page(FlowKind::New, "step7");
                assert_eq!(outcome, SubmitOutcome::Advanced(step7.clone()));
                assert_eq!(nav.current(), &step7);
                continue;
            }
            assert!(
                matches!(outcome, SubmitOutcome::Rejected { .. }),
                "{} accepted an empty submission",
                def.route()
            );
            assert!(store.snapshot().is_empty(), "{} wrote the draft", def.route());
            assert_eq!(nav.current(), &def.route());
        }
    }
}

#[test]
fn renewal_living_address_keeps_the_home_address() {
    let def = page(FlowKind::Renewal, "step2");
    let catalog = english();
    let seeded: Draft = [("address", "Osaka")].into_iter().collect();
    let mut store = DraftStore::open(MemorySlot::new());
    store.merge(&seeded).unwrap();
    let mut nav = at(def.route());

    let mut controller = StepController::hydrate(def, store.snapshot());
    assert_eq!(controller.value("livingAddress"), "");
    controller.set("livingAddress", "Sapporo").unwrap();
    controller.set("rent", "48000").unwrap();
    controller.set("supporter", "self").unwrap();
    controller.submit(&mut store, &mut nav, &catalog).unwrap();

    assert_eq!(store.snapshot().text("address"), Some("Osaka"));
    assert_eq!(store.snapshot().text("livingAddress"), Some("Sapporo"));
}

#[test]
fn resubmitting_a_valid_step_is_idempotent() {
    let def = page(FlowKind::Renewal, "step2");
    let catalog = english();
    let mut store = DraftStore::open(MemorySlot::new());
    let mut nav = at(def.route());

    let mut controller = StepController::hydrate(def, store.snapshot());
    controller.set("livingAddress", "Sapporo").unwrap();
    controller.set("rent", "48000").unwrap();
    controller.set("supporter", "self").unwrap();
    controller.submit(&mut store, &mut nav, &catalog).unwrap();
    let first = store.snapshot().clone();

    nav.back().unwrap();
    let mut again = StepController::hydrate(def, store.snapshot());
    let outcome = again.submit(&mut store, &mut nav, &catalog).unwrap();
    assert!(matches!(outcome, SubmitOutcome::Advanced(_)));
    assert_eq!(store.snapshot(), &first);
    assert_eq!(first.get("rent"), Some(&DraftValue::Number(48000.0)));
}

#[test]
fn payslip_is_required_only_with_a_part_time_job() {
    let def = page(FlowKind::Renewal, "step3");
    let catalog = english();
    let mut store = DraftStore::open(MemorySlot::new());
    let mut nav = at(def.route());

    let mut controller = StepController::hydrate(def, store.snapshot());
    controller.set("hasPartTimeJob", "yes").unwrap();
    controller.set("employerName", "FamilyMart").unwrap();
    controller.set("employerAddress", "Kyoto").unwrap();
    controller.set("weeklyHours", "20").unwrap();
    controller.set("monthlyIncome", "90000").unwrap();
    let outcome = controller.submit(&mut store, &mut nav, &catalog).unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            errors: Default::default(),
            file_error: Some(catalog.t("renewal.step3.errors.payslipFileRequired")),
        }
    );

    controller.set("hasPartTimeJob", "no").unwrap();
    let outcome = controller.submit(&mut store, &mut nav, &catalog).unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Advanced(Route::page(FlowKind::Renewal, "step4"))
    );
    assert_eq!(store.snapshot().get("payslipFileName"), Some(&DraftValue::Null));
}

#[test]
fn several_missing_documents_are_listed_in_one_message() {
    let def = page(FlowKind::New, "step9");
    let catalog = english();
    let mut controller = StepController::hydrate(def, &Draft::new());
    controller
        .attach("statement", Some(FileRef::named("bank.pdf")))
        .unwrap();

    let message = controller.file_error(&catalog).unwrap();
    assert!(message.contains(&catalog.t("newApplication.step9.files.balance")));
    assert!(message.contains(&catalog.t("newApplication.step9.files.letter")));
    assert!(!message.contains(&catalog.t("newApplication.step9.files.statement")));
}

#[test]
fn checklist_writes_each_document_immediately() {
    let def = page(FlowKind::Renewal, "step5");
    let catalog = english();
    let seeded: Draft = [("hasPartTimeJob", "no"), ("supporter", "family")]
        .into_iter()
        .collect();
    let mut store = DraftStore::open(MemorySlot::new());
    store.merge(&seeded).unwrap();
    let mut nav = at(def.route());
    let mut controller = StepController::hydrate(def, store.snapshot());

    for (slot, name) in [("residenceCard", "card.png"), ("passport", "pp.pdf")] {
        controller
            .attach_now(&mut store, slot, Some(FileRef::named(name)))
            .unwrap();
    }
    assert_eq!(store.snapshot().text("residenceCardFileName"), Some("card.png"));
    assert!(!controller.can_advance());
    let missing: Vec<&str> = controller.missing_files().iter().map(|spec| spec.slot).collect();
    assert_eq!(missing, vec!["remittance"]);

    controller
        .attach_now(&mut store, "remittance", Some(FileRef::named("wire.pdf")))
        .unwrap();
    assert!(controller.can_advance());
    controller.attach_now(&mut store, "passport", None).unwrap();
    assert_eq!(store.snapshot().get("passportFileName"), Some(&DraftValue::Null));
    assert!(!controller.can_advance());

    let outcome = controller.submit(&mut store, &mut nav, &catalog).unwrap();
    assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));
    assert_eq!(nav.current(), &def.route());
}

#[test]
fn back_discards_unsaved_edits() {
    let def = page(FlowKind::New, "step1");
    let mut store = DraftStore::open(MemorySlot::new());
    let mut nav = HistoryNavigator::open(MemorySlot::new(), Locale::En);
    nav.push(Route::SelectType).unwrap();
    nav.push(def.route()).unwrap();

    let mut controller = StepController::hydrate(def, store.snapshot());
    controller.set("nameRomaji", "ANA").unwrap();
    assert!(controller.back(&mut nav).unwrap());
    assert_eq!(nav.current(), &Route::SelectType);
    assert_eq!(controller.value("nameRomaji"), "");
    assert_eq!(controller.state(), StepState::Pristine);
    assert!(store.load().is_empty());
}

#[test]
fn write_failure_propagates_without_navigation() {
    let def = page(FlowKind::Renewal, "step2");
    let catalog = english();
    let mut store = DraftStore::open(FullSlot);
    let mut nav = at(def.route());
    let mut controller = StepController::hydrate(def, store.snapshot());
    controller.set("livingAddress", "Sendai").unwrap();
    controller.set("supporter", "other").unwrap();

    assert!(controller.submit(&mut store, &mut nav, &catalog).is_err());
    assert_eq!(nav.current(), &def.route());
    assert_eq!(controller.state(), StepState::Editing);
    assert!(store.snapshot().is_empty());
}

#[test]
fn confirmation_is_gated_on_required_documents() {
    let def = page(FlowKind::New, "confirm");
    let catalog = english();
    let options = SubmitOptions {
        delay: Duration::ZERO,
        clear_on_complete: true,
    };
    let mut store = DraftStore::open(MemorySlot::new());
    let mut nav = at(def.route());
    let required = [
        "passport",
        "proof",
        "diploma",
        "transcript",
        "balance",
        "statement",
    ];
    let partial: Draft = required
        .iter()
        .map(|slot| (format!("{slot}FileName"), format!("{slot}.pdf")))
        .collect();
    store.merge(&partial).unwrap();

    let outcome = submit_confirmation(def, &mut store, &mut nav, &catalog, options).unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            errors: Default::default(),
            file_error: Some(catalog.t("newApplication.confirm.incompleteFiles")),
        }
    );
    assert_eq!(nav.current(), &def.route());

    let letter: Draft = [("letterFileName", "letter.pdf")].into_iter().collect();
    store.merge(&letter).unwrap();
    let outcome = submit_confirmation(def, &mut store, &mut nav, &catalog, options).unwrap();
    assert_eq!(outcome, SubmitOutcome::Advanced(Route::Complete));
    assert_eq!(nav.current(), &Route::Complete);
    assert!(store.snapshot().is_empty());
}

#[test]
fn confirmation_can_keep_the_draft() {
    let def = page(FlowKind::Renewal, "step6");
    let catalog = english();
    let options = SubmitOptions {
        delay: Duration::ZERO,
        clear_on_complete: false,
    };
    let partial: Draft = [
        ("hasPartTimeJob", "no"),
        ("residenceCardFileName", "card.png"),
        ("passportFileName", "pp.pdf"),
    ]
    .into_iter()
    .collect();
    let mut store = DraftStore::open(MemorySlot::new());
    store.merge(&partial).unwrap();
    let mut nav = at(def.route());

    let outcome = submit_confirmation(def, &mut store, &mut nav, &catalog, options).unwrap();
    assert_eq!(outcome, SubmitOutcome::Advanced(Route::Complete));
    assert_eq!(store.snapshot().len(), 3);
}
