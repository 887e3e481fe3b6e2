//! Step table for a first-time student visa application.
use super::{FileRequirement, FileSlotSpec, NextRoute, PageDef, PageKind, Progress};
use crate::route::FlowKind;
use crate::validate::{CrossRule, FieldKind, FieldSpec, Rule, StepSchema};

const YES_NO: &[&str] = &["yes", "no"];
const NATIONALITIES: &[&str] = &["China", "Vietnam", "Nepal", "Other"];
const FUTURE_PLANS: &[&str] = &["study", "work", "undecided"];
const SPONSOR_TYPES: &[&str] = &["father", "mother", "self", "other"];
const PLANNED_ADDRESSES: &[&str] = &["dormitory", "apartment", "relative", "undecided"];
const SUPPORTERS: &[&str] = &["self", "family", "scholarship", "other"];

const TOTAL: u32 = 10;

const fn progress(current: u32) -> Progress {
    Progress {
        current,
        total: TOTAL,
    }
}

macro_rules! text {
    ($key:literal, $message:literal) => {
        FieldSpec::required($key, FieldKind::Text, &[Rule::Required($message)])
    };
}

const STEP1_FIELDS: &[FieldSpec] = &[
    text!("nameRomaji", "errors.nameRomajiRequired"),
    text!("nameNative", "errors.nameNativeRequired"),
    FieldSpec::required(
        "birthDate",
        FieldKind::Date,
        &[Rule::Required("errors.birthDateRequired")],
    ),
    FieldSpec::required(
        "nationality",
        FieldKind::Text,
        &[
            Rule::Required("errors.nationalityRequired"),
            Rule::OneOf {
                choices: NATIONALITIES,
                message: "errors.nationalityRequired",
            },
        ],
    ),
    text!("homeAddress", "errors.homeAddressRequired"),
    FieldSpec::required(
        "homePhone",
        FieldKind::Text,
        &[
            Rule::Required("errors.homePhoneRequired"),
            Rule::Phone("errors.homePhoneInvalid"),
        ],
    ),
    FieldSpec::required(
        "email",
        FieldKind::Text,
        &[
            Rule::Required("errors.emailRequired"),
            Rule::Email("errors.emailInvalid"),
        ],
    ),
];

const STEP2_FIELDS: &[FieldSpec] = &[
    text!("passportNumber", "errors.passportNumberRequired"),
    FieldSpec::required(
        "passportIssueDate",
        FieldKind::Date,
        &[Rule::Required("errors.passportIssueDateRequired")],
    ),
    FieldSpec::required(
        "passportExpiryDate",
        FieldKind::Date,
        &[Rule::Required("errors.passportExpiryDateRequired")],
    ),
];

const STEP2_CROSS: &[CrossRule] = &[CrossRule::DateAfter {
    later: "passportExpiryDate",
    earlier: "passportIssueDate",
    message: "errors.passportExpiryInvalid",
}];

const STEP3_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("father.name", FieldKind::Text),
    FieldSpec::optional("father.birthDate", FieldKind::Date),
    FieldSpec::optional("father.occupation", FieldKind::Text),
    FieldSpec::optional("father.address", FieldKind::Text),
    FieldSpec::optional("mother.name", FieldKind::Text),
    FieldSpec::optional("mother.birthDate", FieldKind::Date),
    FieldSpec::optional("mother.occupation", FieldKind::Text),
    FieldSpec::optional("mother.address", FieldKind::Text),
    text!("emergencyContact.name", "errors.nameRequired"),
    text!("emergencyContact.relation", "errors.relationRequired"),
    text!("emergencyContact.phone", "errors.phoneRequired"),
];

const STEP4_FIELDS: &[FieldSpec] = &[
    text!("institutionName", "errors.institutionNameRequired"),
    FieldSpec::required(
        "periodStart",
        FieldKind::Date,
        &[Rule::Required("errors.periodStartRequired")],
    ),
    FieldSpec::required(
        "periodEnd",
        FieldKind::Date,
        &[Rule::Required("errors.periodEndRequired")],
    ),
    FieldSpec::required(
        "totalHours",
        FieldKind::Number,
        &[Rule::MinNumber {
            min: 1.0,
            message: "errors.totalHoursRequired",
        }],
    ),
    FieldSpec::optional("jlptScore", FieldKind::Text),
];

const STEP4_CROSS: &[CrossRule] = &[CrossRule::DateAfter {
    later: "periodEnd",
    earlier: "periodStart",
    message: "errors.periodEndInvalid",
}];

const STEP5_FIELDS: &[FieldSpec] = &[
    text!("schoolName", "errors.schoolNameRequired"),
    text!("graduationYear", "errors.graduationYearRequired"),
    text!("country", "errors.countryRequired"),
];

const STEP6_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("companyName", FieldKind::Text),
    FieldSpec::optional("period", FieldKind::Text),
    FieldSpec::optional("jobDescription", FieldKind::Text),
];

const STEP7_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "hasVisitedJapan",
        FieldKind::Text,
        &[Rule::OneOf {
            choices: YES_NO,
            message: "errors.selectRequired",
        }],
    ),
    FieldSpec::optional("visitDate", FieldKind::Date),
    FieldSpec::optional("visitPurpose", FieldKind::Text),
    FieldSpec::required(
        "hasAppliedVisa",
        FieldKind::Text,
        &[Rule::OneOf {
            choices: YES_NO,
            message: "errors.selectRequired",
        }],
    ),
    FieldSpec::optional("applicationDetails", FieldKind::Text),
];

const STEP7_CROSS: &[CrossRule] = &[
    CrossRule::RequiredWhen {
        toggle: "hasVisitedJapan",
        equals: "yes",
        field: "visitDate",
        message: "errors.visitDateRequired",
    },
    CrossRule::RequiredWhen {
        toggle: "hasVisitedJapan",
        equals: "yes",
        field: "visitPurpose",
        message: "errors.visitPurposeRequired",
    },
    CrossRule::RequiredWhen {
        toggle: "hasAppliedVisa",
        equals: "yes",
        field: "applicationDetails",
        message: "errors.applicationDetailsRequired",
    },
];

const STEP8_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "reasonForJapan",
        FieldKind::Text,
        &[Rule::MinChars {
            min: 50,
            message: "errors.minLength",
        }],
    ),
    FieldSpec::required(
        "reasonForSchool",
        FieldKind::Text,
        &[Rule::MinChars {
            min: 50,
            message: "errors.minLength",
        }],
    ),
    FieldSpec::required(
        "futurePlan",
        FieldKind::Text,
        &[Rule::OneOf {
            choices: FUTURE_PLANS,
            message: "errors.selectRequired",
        }],
    ),
];

const STEP9_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "sponsorType",
        FieldKind::Text,
        &[
            Rule::Required("errors.selectRequired"),
            Rule::OneOf {
                choices: SPONSOR_TYPES,
                message: "errors.selectRequired",
            },
        ],
    ),
    text!("name", "errors.nameRequired"),
    text!("phone", "errors.phoneRequired"),
    text!("address", "errors.addressRequired"),
    text!("occupation", "errors.occupationRequired"),
    text!("employer", "errors.employerRequired"),
    FieldSpec::required(
        "annualIncome",
        FieldKind::Number,
        &[Rule::MinNumber {
            min: 1.0,
            message: "errors.annualIncomeRequired",
        }],
    ),
];

const STEP10_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "plannedAddress",
        FieldKind::Text,
        &[
            Rule::Required("errors.inputRequired"),
            Rule::OneOf {
                choices: PLANNED_ADDRESSES,
                message: "errors.inputRequired",
            },
        ],
    ),
    FieldSpec::required(
        "supporter",
        FieldKind::Text,
        &[
            Rule::Required("errors.selectRequired"),
            Rule::OneOf {
                choices: SUPPORTERS,
                message: "errors.selectRequired",
            },
        ],
    ),
    FieldSpec::required(
        "partTimeJob",
        FieldKind::Text,
        &[Rule::OneOf {
            choices: YES_NO,
            message: "errors.selectRequired",
        }],
    ),
    FieldSpec::optional("partTimeJobReason", FieldKind::Text),
];

const STEP10_CROSS: &[CrossRule] = &[CrossRule::RequiredWhen {
    toggle: "partTimeJob",
    equals: "yes",
    field: "partTimeJobReason",
    message: "errors.reasonRequired",
}];

/// Documents listed on the confirmation page; the JLPT certificate is the
/// only one that does not gate submission.
pub const DOCUMENTS: &[FileSlotSpec] = &[
    FileSlotSpec::new("passport", FileRequirement::Always),
    FileSlotSpec::new("proof", FileRequirement::Always),
    FileSlotSpec::new("jlpt", FileRequirement::Optional),
    FileSlotSpec::new("diploma", FileRequirement::Always),
    FileSlotSpec::new("transcript", FileRequirement::Always),
    FileSlotSpec::new("balance", FileRequirement::Always),
    FileSlotSpec::new("statement", FileRequirement::Always),
    FileSlotSpec::new("letter", FileRequirement::Always),
];

const fn form(
    page: &'static str,
    current: u32,
    fields: &'static [FieldSpec],
    cross: &'static [CrossRule],
    files: &'static [FileSlotSpec],
    namespace: &'static str,
    next: NextRoute,
) -> PageDef {
    PageDef {
        flow: FlowKind::New,
        page,
        kind: PageKind::Form,
        schema: StepSchema {
            namespace,
            fields,
            cross,
        },
        files,
        progress: progress(current),
        next,
    }
}

pub const PAGES: &[PageDef] = &[
    form(
        "step1",
        1,
        STEP1_FIELDS,
        &[],
        &[],
        "newApplication.step1",
        NextRoute::Page("step2"),
    ),
    form(
        "step2",
        2,
        STEP2_FIELDS,
        STEP2_CROSS,
        &[FileSlotSpec::new("passport", FileRequirement::Always)],
        "newApplication.step2",
        NextRoute::Page("step3"),
    ),
    form(
        "step3",
        3,
        STEP3_FIELDS,
        &[],
        &[],
        "newApplication.step3",
        NextRoute::Page("step4"),
    ),
    form(
        "step4",
        4,
        STEP4_FIELDS,
        STEP4_CROSS,
        &[
            FileSlotSpec::new("proof", FileRequirement::Always),
            FileSlotSpec::new("jlpt", FileRequirement::Optional),
        ],
        "newApplication.step4",
        NextRoute::Page("step5"),
    ),
    form(
        "step5",
        5,
        STEP5_FIELDS,
        &[],
        &[
            FileSlotSpec::new("diploma", FileRequirement::Always),
            FileSlotSpec::new("transcript", FileRequirement::Always),
        ],
        "newApplication.step5",
        NextRoute::Page("step6"),
    ),
    form(
        "step6",
        6,
        STEP6_FIELDS,
        &[],
        &[],
        "newApplication.step6",
        NextRoute::Page("step7"),
    ),
    form(
        "step7",
        7,
        STEP7_FIELDS,
        STEP7_CROSS,
        &[],
        "newApplication.step7",
        NextRoute::Page("step8"),
    ),
    form(
        "step8",
        8,
        STEP8_FIELDS,
        &[],
        &[],
        "newApplication.step8",
        NextRoute::Page("step9"),
    ),
    form(
        "step9",
        9,
        STEP9_FIELDS,
        &[],
        &[
            FileSlotSpec::new("balance", FileRequirement::Always),
            FileSlotSpec::new("statement", FileRequirement::Always),
            FileSlotSpec::new("letter", FileRequirement::Always),
        ],
        "newApplication.step9",
        NextRoute::Page("step10"),
    ),
    form(
        "step10",
        10,
        STEP10_FIELDS,
        STEP10_CROSS,
        &[],
        "newApplication.step10",
        NextRoute::Page("confirm"),
    ),
    PageDef {
        flow: FlowKind::New,
        page: "confirm",
        kind: PageKind::Confirm,
        schema: StepSchema {
            namespace: "newApplication.confirm",
            fields: &[],
            cross: &[],
        },
        files: DOCUMENTS,
        progress: Progress {
            current: 11,
            total: 11,
        },
        next: NextRoute::Complete,
    },
];
