use std::fmt;

use super::model::EmigrantRecord;
use crate::charts::ChartKind;

// ---------------------------------------------------------------------------
// YearRange – inclusive [min, max] bound
// ---------------------------------------------------------------------------

/// An inclusive year bound. Construction guarantees `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// Returns `None` when `min > max`.
    pub fn new(min: i32, max: i32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Intersect with `[lo, hi]`; `None` when they do not overlap.
    pub fn clamp_to(&self, lo: i32, hi: i32) -> Option<Self> {
        Self::new(self.min.max(lo), self.max.min(hi))
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

// ---------------------------------------------------------------------------
// FilterState – view configuration passed down to every chart
// ---------------------------------------------------------------------------

/// Shared view configuration. Owned by [`crate::state::AppState`]; charts only
/// ever receive it by shared reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    /// `None` means "all years".
    pub year_range: Option<YearRange>,
    pub chart: ChartKind,
}

/// Keep the records whose year falls inside `range`.
///
/// * No range → every record passes, including those without a year.
/// * With a range → records without a year are dropped.
pub fn filter_by_year<'a, I>(records: I, range: Option<YearRange>) -> Vec<&'a EmigrantRecord>
where
    I: IntoIterator<Item = &'a EmigrantRecord>,
{
    match range {
        None => records.into_iter().collect(),
        Some(range) => records
            .into_iter()
            .filter(|rec| rec.year.is_some_and(|y| range.contains(y)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<EmigrantRecord> {
        vec![
            EmigrantRecord::new(Some(1981)).with("total", 1.0),
            EmigrantRecord::new(Some(1990)).with("total", 2.0),
            EmigrantRecord::new(None).with("total", 3.0),
            EmigrantRecord::new(Some(1995)).with("total", 4.0),
            EmigrantRecord::new(Some(2020)).with("total", 5.0),
        ]
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(YearRange::new(1995, 1990).is_none());
        assert!(YearRange::new(1990, 1990).is_some());
    }

    #[test]
    fn no_range_is_identity() {
        let records = sample();
        let kept = filter_by_year(&records, None);
        assert_eq!(kept.len(), records.len());
        assert!(kept.iter().zip(&records).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn bounds_are_inclusive_and_drop_yearless_records() {
        let records = sample();
        let range = YearRange::new(1990, 1995);
        let years: Vec<_> = filter_by_year(&records, range)
            .iter()
            .map(|r| r.year)
            .collect();
        assert_eq!(years, vec![Some(1990), Some(1995)]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = sample();
        for (a, b) in [(1981, 2020), (1990, 1990), (1991, 1994), (1985, 1999)] {
            let range = YearRange::new(a, b);
            let once = filter_by_year(&records, range);
            let twice = filter_by_year(once.iter().copied(), range);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn clamp_to_dataset_span() {
        let range = YearRange::new(1970, 1990).unwrap();
        assert_eq!(range.clamp_to(1981, 2020), YearRange::new(1981, 1990));
        assert_eq!(range.clamp_to(2000, 2020), None);
    }

    #[test]
    fn display_collapses_single_year() {
        assert_eq!(YearRange::new(1990, 1990).unwrap().to_string(), "1990");
        assert_eq!(YearRange::new(1990, 1995).unwrap().to_string(), "1990-1995");
    }
}
