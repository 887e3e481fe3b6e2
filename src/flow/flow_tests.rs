use super::{
    entry, find_page, pages, select_flow, FileRequirement, FlowKind, NextRoute, PageKind,
    Progress, Selection, APPLICATION_TYPE_KEY,
};
use crate::draft::{Draft, DraftStore, MemorySlot};
use crate::i18n::{Catalog, Locale, Translator};
use crate::nav::{HistoryNavigator, Navigator};
use crate::route::Route;

fn fixtures() -> (DraftStore<MemorySlot>, HistoryNavigator<MemorySlot>, Catalog) {
    (
        DraftStore::open(MemorySlot::new()),
        HistoryNavigator::open(MemorySlot::new(), Locale::En),
        Catalog::load(Locale::En).unwrap(),
    )
}

#[test]
fn selecting_new_enters_step_one() {
    let (mut store, mut nav, catalog) = fixtures();
    let selection = select_flow("new", &mut store, &mut nav, &catalog).unwrap();

    assert_eq!(
        selection,
        Selection::Entered(Route::page(FlowKind::New, "step1"))
    );
    assert_eq!(nav.current(), &Route::page(FlowKind::New, "step1"));
    assert_eq!(store.snapshot().text(APPLICATION_TYPE_KEY), Some("new"));
}

#[test]
fn unknown_choice_is_rejected_without_navigation() {
    let (mut store, mut nav, catalog) = fixtures();
    let selection = select_flow("", &mut store, &mut nav, &catalog).unwrap();

    let Selection::Rejected(errors) = selection else {
        panic!("expected rejection");
    };
    assert_eq!(
        errors.get(APPLICATION_TYPE_KEY),
        Some(catalog.t("selectType.errors.selectType").as_str())
    );
    assert_eq!(nav.current(), &Route::Home);
    assert!(store.snapshot().is_empty());
}

#[test]
fn switching_flows_discards_the_old_draft() {
    let (mut store, mut nav, catalog) = fixtures();
    select_flow("new", &mut store, &mut nav, &catalog).unwrap();
    let partial: Draft = [("address", "Hue"), ("phone", "090")].into_iter().collect();
    store.merge(&partial).unwrap();

    select_flow("renewal", &mut store, &mut nav, &catalog).unwrap();
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.snapshot().text(APPLICATION_TYPE_KEY), Some("renewal"));
    assert_eq!(nav.current(), &Route::page(FlowKind::Renewal, "step1"));
}

#[test]
fn reselecting_the_same_flow_keeps_the_draft() {
    let (mut store, mut nav, catalog) = fixtures();
    select_flow("renewal", &mut store, &mut nav, &catalog).unwrap();
    let partial: Draft = [("address", "Osaka")].into_iter().collect();
    store.merge(&partial).unwrap();

    select_flow("renewal", &mut store, &mut nav, &catalog).unwrap();
    assert_eq!(store.snapshot().text("address"), Some("Osaka"));
}

#[test]
fn flows_chain_to_completion() {
    for flow in [FlowKind::New, FlowKind::Renewal] {
        let table = pages(flow);
        for pair in table.windows(2) {
            assert_eq!(pair[0].next_route(), pair[1].route(), "{flow} chain broken");
        }
        let last = table.last().unwrap();
        assert_eq!(last.next, NextRoute::Complete);
        assert_eq!(last.kind, PageKind::Confirm);
        assert_eq!(entry(flow).page, "step1");
    }
    assert_eq!(pages(FlowKind::New).len(), 11);
    assert_eq!(pages(FlowKind::Renewal).len(), 7);
}

#[test]
fn find_page_resolves_routes() {
    let def = find_page(&Route::page(FlowKind::Renewal, "step1b")).unwrap();
    assert_eq!(def.namespace(), "renewal.step1b");
    assert_eq!(def.next_route(), Route::page(FlowKind::Renewal, "step2"));
    assert!(find_page(&Route::page(FlowKind::Renewal, "step9")).is_none());
    assert!(find_page(&Route::Login).is_none());
}

#[test]
fn draft_keys_include_file_names() {
    let def = find_page(&Route::page(FlowKind::New, "step4")).unwrap();
    let keys = def.draft_keys();
    assert!(keys.contains(&"totalHours".to_string()));
    assert!(keys.contains(&"proofFileName".to_string()));
    assert!(keys.contains(&"jlptFileName".to_string()));
}

#[test]
fn conditional_documents_follow_the_draft() {
    let def = find_page(&Route::page(FlowKind::Renewal, "step5")).unwrap();
    let mut draft: Draft = [
        ("hasPartTimeJob", "no"),
        ("supporter", "self"),
        ("residenceCardFileName", "card.pdf"),
        ("passportFileName", "passport.pdf"),
    ]
    .into_iter()
    .collect();
    assert!(def.missing_files(&draft).is_empty());

    draft.insert("hasPartTimeJob", "yes");
    draft.insert("supporter", "family");
    let missing: Vec<&str> = def.missing_files(&draft).iter().map(|spec| spec.slot).collect();
    assert_eq!(missing, vec!["payslip", "remittance"]);
}

#[test]
fn optional_documents_never_block() {
    let requirement = FileRequirement::Optional;
    assert!(!requirement.is_required(&Draft::new()));
    assert!(!requirement.can_require());

    let confirm = find_page(&Route::page(FlowKind::New, "confirm")).unwrap();
    let missing: Vec<&str> = confirm
        .missing_files(&Draft::new())
        .iter()
        .map(|spec| spec.slot)
        .collect();
    assert_eq!(missing.len(), 7);
    assert!(!missing.contains(&"jlpt"));
}

#[test]
fn progress_percent_counts_finished_steps() {
    assert_eq!(Progress { current: 1, total: 10 }.percent(), 0);
    assert_eq!(Progress { current: 4, total: 7 }.percent(), 43);
    assert_eq!(Progress { current: 11, total: 11 }.percent(), 91);
    assert_eq!(Progress { current: 3, total: 0 }.percent(), 0);
}
