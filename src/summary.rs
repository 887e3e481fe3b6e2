//! Read-only confirmation view built from the draft.
use crate::draft::{Draft, DraftValue};
use crate::flow::{pages, FlowKind, PageDef, PageKind};
use crate::i18n::Translator;
use crate::validate::{FieldSpec, StepSchema};
use serde::Serialize;

/// Section title ids for each form page, keyed by page segment.
const NEW_SECTIONS: &[(&str, &str)] = &[
    ("step1", "basicInfo"),
    ("step2", "passportInfo"),
    ("step3", "familyInfo"),
    ("step4", "japaneseStudy"),
    ("step5", "education"),
    ("step6", "workHistory"),
    ("step7", "travelHistory"),
    ("step8", "studyPurpose"),
    ("step9", "financialSponsor"),
    ("step10", "lifePlan"),
];

const RENEWAL_SECTIONS: &[(&str, &str)] = &[
    ("step1", "basicInfo"),
    ("step1b", "residenceInfo"),
    ("step2", "livingSituation"),
    ("step3", "partTimeJob"),
    ("step4", "sponsor"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub field: &'static str,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySection {
    pub title: String,
    pub lines: Vec<SummaryLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStatus {
    pub slot: &'static str,
    pub label: String,
    pub file_name: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub title: String,
    pub sections: Vec<SummarySection>,
    pub documents: Vec<DocumentStatus>,
    pub can_submit: bool,
    /// Shown while submission is disabled.
    pub notice: Option<String>,
}

/// Build the confirmation view for `def`, which must be a confirm page.
pub fn build_confirmation(
    def: &'static PageDef,
    draft: &Draft,
    translator: &dyn Translator,
) -> Confirmation {
    let namespace = def.namespace();
    let sections = pages(def.flow)
        .iter()
        .filter(|page| page.kind == PageKind::Form)
        .filter_map(|page| {
            let section = section_id(def.flow, page.page)?;
            Some(SummarySection {
                title: translator.t(&format!("{namespace}.sections.{section}")),
                lines: page
                    .schema
                    .fields
                    .iter()
                    .map(|field| SummaryLine {
                        field: field.key,
                        label: field_label(&page.schema, field.key, translator),
                        value: display_value(field, draft.get(field.key), translator),
                    })
                    .collect(),
            })
        })
        .collect();

    let documents = def
        .files
        .iter()
        .map(|spec| DocumentStatus {
            slot: spec.slot,
            label: translator.t(&format!("{namespace}.files.{}", spec.slot)),
            file_name: draft.text(&spec.draft_key()).map(str::to_string),
            required: spec.requirement.is_required(draft),
        })
        .collect();

    let can_submit = def.missing_files(draft).is_empty();
    Confirmation {
        title: translator.t(&format!("{namespace}.title")),
        sections,
        documents,
        can_submit,
        notice: (!can_submit).then(|| translator.t(&format!("{namespace}.incompleteFiles"))),
    }
}

fn section_id(flow: FlowKind, page: &str) -> Option<&'static str> {
    let table = match flow {
        FlowKind::New => NEW_SECTIONS,
        FlowKind::Renewal => RENEWAL_SECTIONS,
    };
    table
        .iter()
        .find(|(segment, _)| *segment == page)
        .map(|(_, section)| *section)
}

/// Translated label for a field.
///
/// Grouped keys such as `father.name` combine the group title with the leaf
/// label, both looked up under the page namespace.
pub fn field_label(schema: &StepSchema, key: &str, translator: &dyn Translator) -> String {
    let namespace = schema.namespace;
    match key.split_once('.') {
        Some((group, leaf)) => format!(
            "{} {}",
            translator.t(&format!("{namespace}.{group}")),
            translator.t(&format!("{namespace}.{leaf}"))
        ),
        None => translator.t(&format!("{namespace}.{key}")),
    }
}

/// Translated label for a choice value such as `yes` or `dormitory`.
pub fn choice_label(value: &str, translator: &dyn Translator) -> String {
    translator.t(&format!("options.{value}"))
}

/// Value as shown on the confirmation page; blanks render as `-`.
pub fn display_value(
    field: &FieldSpec,
    value: Option<&DraftValue>,
    translator: &dyn Translator,
) -> String {
    let text = value.map(DraftValue::to_string).unwrap_or_default();
    if text.trim().is_empty() {
        return "-".to_string();
    }
    let is_choice = field.rules.iter().any(|rule| rule.choices().is_some());
    if is_choice {
        choice_label(&text, translator)
    } else {
        text
    }
}
