use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// EmigrantRecord – one row of the source data
// ---------------------------------------------------------------------------

/// A single row of emigration statistics.
///
/// Source files are sparse and name the same concept differently across
/// releases (`elementary`, `elementary_level`, ...), so every numeric column
/// is kept by its raw name and looked up through [`super::fields`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmigrantRecord {
    pub year: Option<i32>,
    /// Raw numeric columns: column_name → non-negative value.
    pub fields: BTreeMap<String, f64>,
}

impl EmigrantRecord {
    pub fn new(year: Option<i32>) -> Self {
        Self {
            year,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style setter for test fixtures.
    #[cfg(test)]
    pub fn with(mut self, field: &str, value: f64) -> Self {
        self.insert(field, value);
        self
    }

    /// Store a numeric column. Negative and non-finite values are ignored so
    /// the record only ever holds non-negative counts.
    pub fn insert(&mut self, field: &str, value: f64) {
        if value.is_finite() && value >= 0.0 {
            self.fields.insert(field.to_string(), value);
        } else {
            log::debug!("dropping invalid value {value} for column '{field}'");
        }
    }

    /// The raw value of a column, if present.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }

    /// The value of a column, absent columns reading as zero.
    pub fn value(&self, field: &str) -> f64 {
        self.get(field).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// YearlyAggregates – the pre-aggregated by-year mapping
// ---------------------------------------------------------------------------

/// Pre-aggregated counts keyed by year. Each value reuses [`EmigrantRecord`]
/// so the same alias lookups apply.
pub type YearlyAggregates = BTreeMap<i32, EmigrantRecord>;

// ---------------------------------------------------------------------------
// EmigrantDataset – everything one fetch produces
// ---------------------------------------------------------------------------

/// Raw records plus the yearly mapping, always replaced together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmigrantDataset {
    pub records: Vec<EmigrantRecord>,
    pub yearly: YearlyAggregates,
}

impl EmigrantDataset {
    pub fn new(records: Vec<EmigrantRecord>, yearly: YearlyAggregates) -> Self {
        Self { records, yearly }
    }

    /// Number of raw records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether neither source produced anything.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.yearly.is_empty()
    }

    /// Smallest and largest year across records and the yearly mapping.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let years = self
            .records
            .iter()
            .filter_map(|r| r.year)
            .chain(self.yearly.keys().copied());

        years.fold(None, |span, y| match span {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_read_as_zero() {
        let rec = EmigrantRecord::new(Some(1990)).with("male", 12.0);
        assert_eq!(rec.value("male"), 12.0);
        assert_eq!(rec.value("female"), 0.0);
        assert_eq!(rec.get("female"), None);
    }

    #[test]
    fn negative_and_nan_values_are_dropped() {
        let rec = EmigrantRecord::new(Some(1990))
            .with("male", -3.0)
            .with("female", f64::NAN);
        assert!(rec.fields.is_empty());
    }

    #[test]
    fn year_span_covers_both_sources() {
        let mut yearly = YearlyAggregates::new();
        yearly.insert(2020, EmigrantRecord::new(Some(2020)));
        let ds = EmigrantDataset::new(
            vec![
                EmigrantRecord::new(Some(1985)),
                EmigrantRecord::new(None),
                EmigrantRecord::new(Some(1999)),
            ],
            yearly,
        );
        assert_eq!(ds.year_span(), Some((1985, 2020)));
        assert_eq!(EmigrantDataset::default().year_span(), None);
    }
}
