//! Recognised source columns.
//!
//! Different releases of the emigrant tables spell the same category in
//! different ways. Each category lists every spelling it answers to, and the
//! value of a category is the sum of all of them (absent columns count as 0).

use super::model::EmigrantRecord;

/// A display label plus the raw column names that feed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAliases {
    pub label: &'static str,
    pub columns: &'static [&'static str],
}

impl FieldAliases {
    pub const fn new(label: &'static str, columns: &'static [&'static str]) -> Self {
        Self { label, columns }
    }

    /// Sum of every alias present on the record.
    pub fn sum(&self, record: &EmigrantRecord) -> f64 {
        self.columns.iter().map(|col| record.value(col)).sum()
    }

    /// Whether any alias carries a nonzero value.
    pub fn has_signal(&self, record: &EmigrantRecord) -> bool {
        self.columns.iter().any(|col| record.value(col) > 0.0)
    }
}

// -- Totals --

pub const TOTAL: FieldAliases = FieldAliases::new("Total", &["total"]);
pub const MALE: FieldAliases = FieldAliases::new("Male", &["male", "men"]);
pub const FEMALE: FieldAliases = FieldAliases::new("Female", &["female", "women"]);

/// The record's explicit total, or `male + female` when it has none.
/// A total column that is present wins even when it is zero.
pub fn record_total(record: &EmigrantRecord) -> f64 {
    if TOTAL.columns.iter().any(|col| record.get(col).is_some()) {
        TOTAL.sum(record)
    } else {
        MALE.sum(record) + FEMALE.sum(record)
    }
}

// -- Education --

pub const PRIMARY: FieldAliases = FieldAliases::new(
    "Primary",
    &["elementary", "elementary_level", "elementary_graduate"],
);
pub const SECONDARY: FieldAliases = FieldAliases::new(
    "Secondary",
    &["high_school", "high_school_level", "high_school_graduate"],
);
pub const TERTIARY: FieldAliases = FieldAliases::new(
    "Tertiary",
    &["college", "college_level", "college_graduate"],
);
pub const VOCATIONAL: FieldAliases = FieldAliases::new(
    "Vocational",
    &["vocational", "vocational_level", "vocational_graduate"],
);
pub const POST_GRADUATE: FieldAliases = FieldAliases::new(
    "Post-Graduate",
    &["post_graduate", "post_graduate_level", "postgraduate"],
);
pub const NO_EDUCATION: FieldAliases = FieldAliases::new(
    "No Education",
    &["no_education", "not_of_schooling_age", "no_formal_education"],
);

// -- Civil status --

pub const SINGLE: FieldAliases = FieldAliases::new("Single", &["single", "never_married"]);
pub const MARRIED: FieldAliases = FieldAliases::new("Married", &["married"]);
pub const WIDOWED: FieldAliases = FieldAliases::new("Widowed", &["widowed", "widower"]);
pub const DIVORCED: FieldAliases = FieldAliases::new("Divorced", &["divorced", "separated"]);
pub const OTHER_STATUS: FieldAliases =
    FieldAliases::new("Other", &["other", "not_reported", "live_in"]);
