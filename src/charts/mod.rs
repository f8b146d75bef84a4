//! Chart layer: turn the filtered dataset into chart-ready series.
//!
//! ```text
//!   EmigrantDataset + FilterState
//!        │
//!        ▼
//!   ┌───────────────┐
//!   │ filter_by_year │  drop rows outside the year range
//!   └───────────────┘
//!        │  empty? ──► ChartBody::Empty (no aggregation)
//!        ▼
//!   ┌──────────────────────────────┐
//!   │ education / relationships /  │  reshape into per-year or
//!   │ sex / trend                  │  per-category records
//!   └──────────────────────────────┘
//!        │
//!        ▼
//!   PreparedChart { title, body }  → ui::plot
//! ```

pub mod education;
pub mod relationships;
pub mod sex;
pub mod title;
pub mod trend;

use std::fmt;

use crate::data::filter::{filter_by_year, FilterState};
use crate::data::model::{EmigrantDataset, EmigrantRecord};

use education::{Basis, EducationBreakdown};
use relationships::StatusSeries;
use sex::SexYear;
use trend::TrendPoint;

// ---------------------------------------------------------------------------
// ChartKind – what the navigator switches between
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Education,
    Relationships,
    Sex,
    Trend,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Education,
        ChartKind::Relationships,
        ChartKind::Sex,
        ChartKind::Trend,
    ];

    /// Base chart title.
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Education => "Emigrants by Educational Attainment",
            ChartKind::Relationships => "Emigrants by Civil Status",
            ChartKind::Sex => "Emigrants by Sex",
            ChartKind::Trend => "Total Emigrants per Year",
        }
    }

    /// Short navigator label.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Education => "Education",
            ChartKind::Relationships => "Relationships",
            ChartKind::Sex => "Sex",
            ChartKind::Trend => "Trend",
        }
    }

    /// Guidance shown when the filtered data is empty.
    pub fn empty_message(self) -> &'static str {
        match self {
            ChartKind::Education => {
                "No records in range. Load the emigrants-by-educational-attainment \
                 dataset (records with elementary, high_school, college, ... or total columns)."
            }
            ChartKind::Relationships => {
                "No civil-status records in range. Load the emigrants-by-civil-status \
                 dataset (records with single, married, widowed, divorced columns)."
            }
            ChartKind::Sex => {
                "No records in range. Load the emigrants-by-sex dataset \
                 (records with male and female columns)."
            }
            ChartKind::Trend => {
                "No yearly totals in range. Load the yearly aggregates file \
                 (yearly.json keyed by year)."
            }
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PreparedChart – renderer input
// ---------------------------------------------------------------------------

/// Placeholder shown instead of a chart with no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Empty(EmptyState),
    Education(EducationBreakdown),
    Relationships(Vec<StatusSeries>),
    Sex(Vec<SexYear>),
    Trend(Vec<TrendPoint>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedChart {
    pub kind: ChartKind,
    pub title: String,
    pub body: ChartBody,
}

impl PreparedChart {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self.body, ChartBody::Empty(_))
    }
}

/// Tabular view of a chart body: one header per column, cells pre-formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

fn count(value: f64) -> String {
    format!("{value:.0}")
}

impl ChartBody {
    /// The data behind the chart as table rows; `None` for the empty state.
    pub fn table(&self) -> Option<ChartTable> {
        let (headers, rows) = match self {
            ChartBody::Empty(_) => return None,
            ChartBody::Education(breakdown) => {
                let mut headers = vec!["Year"];
                headers.extend(education::LEVELS.iter().map(|level| level.label));
                let rows: Vec<Vec<String>> = breakdown
                    .years
                    .iter()
                    .map(|row| {
                        std::iter::once(row.year.to_string())
                            .chain(row.values.iter().map(|v| count(*v)))
                            .collect()
                    })
                    .collect();
                (headers, rows)
            }
            ChartBody::Relationships(series) => {
                let rows: Vec<Vec<String>> = series
                    .iter()
                    .flat_map(|s| &s.points)
                    .map(|p| vec![p.x.to_string(), p.status.to_string(), count(p.y)])
                    .collect();
                (vec!["Year", "Civil Status", "Count"], rows)
            }
            ChartBody::Sex(years) => {
                let rows: Vec<Vec<String>> = years
                    .iter()
                    .map(|row| vec![row.year.to_string(), count(row.male), count(row.female)])
                    .collect();
                (vec!["Year", "Male", "Female"], rows)
            }
            ChartBody::Trend(points) => {
                let rows: Vec<Vec<String>> = points
                    .iter()
                    .map(|p| vec![p.year.to_string(), count(p.total)])
                    .collect();
                (vec!["Year", "Total"], rows)
            }
        };
        Some(ChartTable { headers, rows })
    }
}

/// Filter, then reshape for the chart selected in `filters`.
///
/// The empty check runs before any aggregation. A non-empty selection that
/// still yields no series (e.g. no civil-status columns at all) is also
/// reported as empty.
pub fn prepare_chart(dataset: &EmigrantDataset, filters: &FilterState) -> PreparedChart {
    let kind = filters.chart;
    let range = filters.year_range;

    let rows = || filter_by_year(&dataset.records, range);

    let body = match kind {
        ChartKind::Education => reshape(rows(), |rows| {
            let breakdown = education::aggregate_education(rows);
            (!breakdown.years.is_empty()).then_some(ChartBody::Education(breakdown))
        }),
        ChartKind::Relationships => reshape(rows(), |rows| {
            let series = relationships::group_by_status(relationships::status_points(rows));
            (!series.is_empty()).then_some(ChartBody::Relationships(series))
        }),
        ChartKind::Sex => reshape(rows(), |rows| {
            let years = sex::aggregate_sex(rows);
            (!years.is_empty()).then_some(ChartBody::Sex(years))
        }),
        ChartKind::Trend => {
            let points = trend::yearly_trend(&dataset.yearly, range);
            (!points.is_empty()).then_some(ChartBody::Trend(points))
        }
    };

    match body {
        Some(body) => {
            let mut title = title::chart_title(kind.title(), range, true);
            if let ChartBody::Education(EducationBreakdown {
                basis: Basis::Estimated,
                ..
            }) = &body
            {
                title.push_str(" (estimated split)");
            }
            PreparedChart { kind, title, body }
        }
        None => PreparedChart {
            kind,
            title: title::chart_title(kind.title(), range, false),
            body: ChartBody::Empty(EmptyState {
                message: kind.empty_message(),
            }),
        },
    }
}

/// Run `f` only on a non-empty selection.
fn reshape<F>(rows: Vec<&EmigrantRecord>, f: F) -> Option<ChartBody>
where
    F: FnOnce(&[&EmigrantRecord]) -> Option<ChartBody>,
{
    if rows.is_empty() {
        return None;
    }
    f(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::YearRange;
    use crate::data::model::YearlyAggregates;

    fn dataset() -> EmigrantDataset {
        let mut yearly = YearlyAggregates::new();
        yearly.insert(1990, EmigrantRecord::new(Some(1990)).with("total", 900.0));
        EmigrantDataset::new(
            vec![
                EmigrantRecord::new(Some(1990))
                    .with("total", 1000.0)
                    .with("married", 400.0)
                    .with("male", 450.0)
                    .with("female", 550.0),
                EmigrantRecord::new(Some(1991)).with("total", 500.0),
            ],
            yearly,
        )
    }

    fn filters(chart: ChartKind, range: Option<YearRange>) -> FilterState {
        FilterState {
            year_range: range,
            chart,
        }
    }

    #[test]
    fn every_chart_is_empty_outside_the_data() {
        let ds = dataset();
        for kind in ChartKind::ALL {
            let chart = prepare_chart(&ds, &filters(kind, YearRange::new(2010, 2015)));
            assert!(chart.is_empty(), "{kind}");
            assert_eq!(chart.title, kind.title());
        }
    }

    #[test]
    fn every_chart_is_empty_without_data() {
        let ds = EmigrantDataset::default();
        for kind in ChartKind::ALL {
            assert!(prepare_chart(&ds, &filters(kind, None)).is_empty(), "{kind}");
        }
    }

    #[test]
    fn estimated_education_is_flagged_in_title() {
        let chart = prepare_chart(
            &dataset(),
            &filters(ChartKind::Education, YearRange::new(1990, 1990)),
        );
        assert_eq!(
            chart.title,
            "Emigrants by Educational Attainment (1990) (estimated split)"
        );
        match chart.body {
            ChartBody::Education(b) => {
                assert_eq!(b.basis, Basis::Estimated);
                assert_eq!(b.years.len(), 1);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn relationships_without_status_columns_is_empty() {
        let chart = prepare_chart(
            &dataset(),
            &filters(ChartKind::Relationships, YearRange::new(1991, 1991)),
        );
        assert!(chart.is_empty());
    }

    #[test]
    fn range_title_for_populated_chart() {
        let chart = prepare_chart(
            &dataset(),
            &filters(ChartKind::Sex, YearRange::new(1990, 1995)),
        );
        assert_eq!(chart.title, "Emigrants by Sex (1990-1995)");
        assert!(matches!(chart.body, ChartBody::Sex(ref rows) if rows.len() == 2));
    }

    #[test]
    fn table_mirrors_education_columns() {
        let chart = prepare_chart(&dataset(), &filters(ChartKind::Education, None));
        let table = chart.body.table().unwrap();
        assert_eq!(table.headers.len(), 7);
        assert_eq!(table.headers[0], "Year");
        assert_eq!(table.rows[0], vec!["1990", "80", "280", "450", "120", "50", "20"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn empty_chart_has_no_table() {
        let chart = prepare_chart(&EmigrantDataset::default(), &filters(ChartKind::Sex, None));
        assert!(chart.body.table().is_none());
    }

    #[test]
    fn trend_reads_the_yearly_mapping() {
        let chart = prepare_chart(&dataset(), &filters(ChartKind::Trend, None));
        assert_eq!(chart.title, "Total Emigrants per Year");
        assert_eq!(
            chart.body,
            ChartBody::Trend(vec![TrendPoint { year: 1990, total: 900.0 }])
        );
    }
}
