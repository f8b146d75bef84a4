//! Education attainment per year.
//!
//! When the filtered rows carry real per-level counts they are summed as-is
//! ([`Basis::Reported`]). When no row anywhere in the set has a nonzero
//! education column, each year's total is split by fixed percentages instead
//! ([`Basis::Estimated`]). The two paths never mix.

use std::collections::BTreeMap;

use crate::data::fields::{
    self, FieldAliases, NO_EDUCATION, POST_GRADUATE, PRIMARY, SECONDARY, TERTIARY, VOCATIONAL,
};
use crate::data::model::EmigrantRecord;

/// Display order of the education levels.
pub const LEVELS: [FieldAliases; 6] = [
    PRIMARY,
    SECONDARY,
    TERTIARY,
    VOCATIONAL,
    POST_GRADUATE,
    NO_EDUCATION,
];

/// Share of the yearly total assigned to each entry of [`LEVELS`], in percent.
pub const ESTIMATED_SPLIT_PERCENT: [u32; 6] = [8, 28, 45, 12, 5, 2];

/// Levels whose columns count as a direct signal. "No education" alone does
/// not make a dataset reported.
const SIGNAL_LEVELS: [FieldAliases; 5] = [PRIMARY, SECONDARY, TERTIARY, VOCATIONAL, POST_GRADUATE];

/// How the per-level values were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// Summed from per-level source columns.
    Reported,
    /// Fixed-percentage split of each year's total.
    Estimated,
}

/// Per-level totals for one year, in [`LEVELS`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct EducationYear {
    pub year: i32,
    pub values: [f64; 6],
}

impl EducationYear {
    fn zeroed(year: i32) -> Self {
        Self {
            year,
            values: [0.0; 6],
        }
    }

    /// Value for the level with the given display label.
    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<f64> {
        LEVELS
            .iter()
            .position(|level| level.label == label)
            .map(|i| self.values[i])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EducationBreakdown {
    pub basis: Basis,
    /// Ascending by year.
    pub years: Vec<EducationYear>,
}

/// Whether any record carries a nonzero education count.
pub fn has_direct_signal(records: &[&EmigrantRecord]) -> bool {
    records
        .iter()
        .any(|rec| SIGNAL_LEVELS.iter().any(|level| level.has_signal(rec)))
}

/// Aggregate filtered records into one row per distinct year.
/// Records without a year are skipped.
pub fn aggregate_education(records: &[&EmigrantRecord]) -> EducationBreakdown {
    let basis = if has_direct_signal(records) {
        Basis::Reported
    } else {
        Basis::Estimated
    };

    let mut by_year: BTreeMap<i32, EducationYear> = BTreeMap::new();

    match basis {
        Basis::Reported => {
            for rec in records {
                let Some(year) = rec.year else { continue };
                let row = by_year
                    .entry(year)
                    .or_insert_with(|| EducationYear::zeroed(year));
                for (slot, level) in row.values.iter_mut().zip(LEVELS.iter()) {
                    *slot += level.sum(rec);
                }
            }
        }
        Basis::Estimated => {
            let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
            for rec in records {
                let Some(year) = rec.year else { continue };
                *totals.entry(year).or_insert(0.0) += fields::record_total(rec);
            }
            for (year, total) in totals {
                let mut row = EducationYear::zeroed(year);
                for (slot, pct) in row.values.iter_mut().zip(ESTIMATED_SPLIT_PERCENT) {
                    *slot = (total * f64::from(pct) / 100.0).floor();
                }
                by_year.insert(year, row);
            }
        }
    }

    EducationBreakdown {
        basis,
        years: by_year.into_values().collect(),
    }
}
