//! Step table for extending an existing period of stay.
use super::{FileRequirement, FileSlotSpec, NextRoute, PageDef, PageKind, Progress};
use crate::route::FlowKind;
use crate::validate::{CrossRule, FieldKind, FieldSpec, Rule, StepSchema};

const YES_NO: &[&str] = &["yes", "no"];
const SUPPORTERS: &[&str] = &["self", "family", "scholarship", "other"];

const TOTAL: u32 = 7;

macro_rules! text {
    ($key:literal, $message:literal) => {
        FieldSpec::required($key, FieldKind::Text, &[Rule::Required($message)])
    };
}

const STEP1_FIELDS: &[FieldSpec] = &[
    text!("name", "errors.nameRequired"),
    FieldSpec::required(
        "birthDate",
        FieldKind::Date,
        &[Rule::Required("errors.birthDateRequired")],
    ),
    text!("nationality", "errors.nationalityRequired"),
    text!("address", "errors.addressRequired"),
    text!("phone", "errors.phoneRequired"),
    FieldSpec::required("email", FieldKind::Text, &[Rule::Email("errors.emailInvalid")]),
];

const STEP1B_FIELDS: &[FieldSpec] = &[
    text!("residenceCardNumber", "errors.residenceCardNumberRequired"),
    FieldSpec::required(
        "residenceExpiry",
        FieldKind::Date,
        &[Rule::Required("errors.residenceExpiryRequired")],
    ),
    text!("passportNumber", "errors.passportNumberRequired"),
    FieldSpec::required(
        "passportExpiry",
        FieldKind::Date,
        &[Rule::Required("errors.passportExpiryRequired")],
    ),
];

const STEP2_FIELDS: &[FieldSpec] = &[
    text!("livingAddress", "errors.addressRequired"),
    FieldSpec::required(
        "rent",
        FieldKind::Number,
        &[Rule::MinNumber {
            min: 0.0,
            message: "errors.rentRequired",
        }],
    ),
    FieldSpec::required(
        "supporter",
        FieldKind::Text,
        &[
            Rule::Required("errors.supporterRequired"),
            Rule::OneOf {
                choices: SUPPORTERS,
                message: "errors.supporterRequired",
            },
        ],
    ),
];

const STEP3_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "hasPartTimeJob",
        FieldKind::Text,
        &[Rule::OneOf {
            choices: YES_NO,
            message: "errors.selectRequired",
        }],
    ),
    FieldSpec::optional("employerName", FieldKind::Text),
    FieldSpec::optional("employerAddress", FieldKind::Text),
    FieldSpec::optional("weeklyHours", FieldKind::Number),
    FieldSpec::optional("monthlyIncome", FieldKind::Number),
];

const STEP3_CROSS: &[CrossRule] = &[
    CrossRule::RequiredWhen {
        toggle: "hasPartTimeJob",
        equals: "yes",
        field: "employerName",
        message: "errors.employerNameRequired",
    },
    CrossRule::RequiredWhen {
        toggle: "hasPartTimeJob",
        equals: "yes",
        field: "employerAddress",
        message: "errors.employerAddressRequired",
    },
    CrossRule::RequiredWhen {
        toggle: "hasPartTimeJob",
        equals: "yes",
        field: "weeklyHours",
        message: "errors.weeklyHoursRequired",
    },
    CrossRule::RequiredWhen {
        toggle: "hasPartTimeJob",
        equals: "yes",
        field: "monthlyIncome",
        message: "errors.monthlyIncomeRequired",
    },
];

const STEP4_FIELDS: &[FieldSpec] = &[
    text!("sponsorName", "errors.sponsorNameRequired"),
    text!("relation", "errors.relationRequired"),
    FieldSpec::required(
        "annualIncome",
        FieldKind::Number,
        &[Rule::MinNumber {
            min: 1.0,
            message: "errors.annualIncomeRequired",
        }],
    ),
    FieldSpec::optional("remittanceAmount", FieldKind::Number),
];

const PART_TIME_JOB: FileRequirement = FileRequirement::When {
    field: "hasPartTimeJob",
    equals: "yes",
};

/// Documents gathered on the checklist page.
pub const CHECKLIST: &[FileSlotSpec] = &[
    FileSlotSpec::new("residenceCard", FileRequirement::Always),
    FileSlotSpec::new("passport", FileRequirement::Always),
    FileSlotSpec::new("payslip", PART_TIME_JOB),
    FileSlotSpec::new(
        "remittance",
        FileRequirement::When {
            field: "supporter",
            equals: "family",
        },
    ),
];

/// Documents listed on the confirmation page.
pub const DOCUMENTS: &[FileSlotSpec] = &[
    FileSlotSpec::new("residenceCard", FileRequirement::Always),
    FileSlotSpec::new("passport", FileRequirement::Always),
    FileSlotSpec::new("payslip", PART_TIME_JOB),
    FileSlotSpec::new("remittance", FileRequirement::Optional),
];

const fn page(
    page: &'static str,
    kind: PageKind,
    current: u32,
    schema: StepSchema,
    files: &'static [FileSlotSpec],
    next: NextRoute,
) -> PageDef {
    PageDef {
        flow: FlowKind::Renewal,
        page,
        kind,
        schema,
        files,
        progress: Progress {
            current,
            total: TOTAL,
        },
        next,
    }
}

const fn schema(
    namespace: &'static str,
    fields: &'static [FieldSpec],
    cross: &'static [CrossRule],
) -> StepSchema {
    StepSchema {
        namespace,
        fields,
        cross,
    }
}

pub const PAGES: &[PageDef] = &[
    page(
        "step1",
        PageKind::Form,
        1,
        schema("renewal.step1", STEP1_FIELDS, &[]),
        &[],
        NextRoute::Page("step1b"),
    ),
    page(
        "step1b",
        PageKind::Form,
        2,
        schema("renewal.step1b", STEP1B_FIELDS, &[]),
        &[
            FileSlotSpec::new("residenceCard", FileRequirement::Optional),
            FileSlotSpec::new("passport", FileRequirement::Optional),
        ],
        NextRoute::Page("step2"),
    ),
    page(
        "step2",
        PageKind::Form,
        3,
        schema("renewal.step2", STEP2_FIELDS, &[]),
        &[],
        NextRoute::Page("step3"),
    ),
    page(
        "step3",
        PageKind::Form,
        4,
        schema("renewal.step3", STEP3_FIELDS, STEP3_CROSS),
        &[FileSlotSpec::new("payslip", PART_TIME_JOB)],
        NextRoute::Page("step4"),
    ),
    page(
        "step4",
        PageKind::Form,
        5,
        schema("renewal.step4", STEP4_FIELDS, &[]),
        &[FileSlotSpec::new("remittance", FileRequirement::Optional)],
        NextRoute::Page("step5"),
    ),
    page(
        "step5",
        PageKind::Checklist,
        6,
        schema("renewal.step5", &[], &[]),
        CHECKLIST,
        NextRoute::Page("step6"),
    ),
    page(
        "step6",
        PageKind::Confirm,
        7,
        schema("renewal.step6", &[], &[]),
        DOCUMENTS,
        NextRoute::Complete,
    ),
];
