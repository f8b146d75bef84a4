use std::collections::BTreeMap;

use crate::data::fields::{FEMALE, MALE};
use crate::data::model::EmigrantRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct SexYear {
    pub year: i32,
    pub male: f64,
    pub female: f64,
}

/// Male and female counts per year, ascending by year.
pub fn aggregate_sex(records: &[&EmigrantRecord]) -> Vec<SexYear> {
    let mut by_year: BTreeMap<i32, SexYear> = BTreeMap::new();
    for rec in records {
        let Some(year) = rec.year else { continue };
        let row = by_year.entry(year).or_insert(SexYear {
            year,
            male: 0.0,
            female: 0.0,
        });
        row.male += MALE.sum(rec);
        row.female += FEMALE.sum(rec);
    }
    by_year.into_values().collect()
}
