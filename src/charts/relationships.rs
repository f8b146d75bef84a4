use crate::data::fields::{FieldAliases, DIVORCED, MARRIED, OTHER_STATUS, SINGLE, WIDOWED};
use crate::data::model::EmigrantRecord;

/// Civil-status categories in legend order.
pub const STATUSES: [FieldAliases; 5] = [SINGLE, MARRIED, WIDOWED, DIVORCED, OTHER_STATUS];

/// Smallest bubble size, so low counts stay visible.
pub const MIN_BUBBLE_SIZE: f64 = 10.0;

/// One bubble: a civil-status count in a given year.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPoint {
    pub x: i32,
    pub y: f64,
    pub status: &'static str,
    pub size: f64,
}

/// All bubbles of one civil status.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSeries {
    pub status: &'static str,
    pub points: Vec<StatusPoint>,
}

pub fn bubble_size(count: f64) -> f64 {
    (count / 100.0).max(MIN_BUBBLE_SIZE)
}

/// Explode each record into one point per nonzero civil status.
pub fn status_points(records: &[&EmigrantRecord]) -> Vec<StatusPoint> {
    let mut points = Vec::new();
    for rec in records {
        let Some(year) = rec.year else { continue };
        for status in &STATUSES {
            let count = status.sum(rec);
            if count > 0.0 {
                points.push(StatusPoint {
                    x: year,
                    y: count,
                    status: status.label,
                    size: bubble_size(count),
                });
            }
        }
    }
    points
}

/// Group points by status, series ordered by first appearance.
pub fn group_by_status(points: Vec<StatusPoint>) -> Vec<StatusSeries> {
    let mut series: Vec<StatusSeries> = Vec::new();
    for point in points {
        match series.iter_mut().find(|s| s.status == point.status) {
            Some(existing) => existing.points.push(point),
            None => series.push(StatusSeries {
                status: point.status,
                points: vec![point],
            }),
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn married_only_record_gives_one_point() {
        let rec = EmigrantRecord::new(Some(1995)).with("married", 50.0);
        let points = status_points(&[&rec]);
        assert_eq!(
            points,
            vec![StatusPoint {
                x: 1995,
                y: 50.0,
                status: "Married",
                size: 10.0,
            }]
        );
    }

    #[test]
    fn large_counts_scale_the_bubble() {
        assert_eq!(bubble_size(2500.0), 25.0);
        assert_eq!(bubble_size(0.5), MIN_BUBBLE_SIZE);
    }

    #[test]
    fn aliases_feed_the_same_status() {
        let rec = EmigrantRecord::new(Some(2000))
            .with("never_married", 30.0)
            .with("single", 20.0)
            .with("separated", 5.0)
            .with("widowed", 0.0);
        let points = status_points(&[&rec]);
        let labels: Vec<_> = points.iter().map(|p| (p.status, p.y)).collect();
        assert_eq!(labels, vec![("Single", 50.0), ("Divorced", 5.0)]);
    }

    #[test]
    fn grouping_keeps_first_appearance_order() {
        let a = EmigrantRecord::new(Some(1990)).with("married", 5.0);
        let b = EmigrantRecord::new(Some(1991))
            .with("single", 3.0)
            .with("married", 7.0);
        let c = EmigrantRecord::new(None).with("single", 100.0);
        let series = group_by_status(status_points(&[&a, &b, &c]));
        let names: Vec<_> = series.iter().map(|s| s.status).collect();
        assert_eq!(names, vec!["Married", "Single"]);
        assert_eq!(series[0].points.len(), 2);
        assert!(series[0].points.iter().all(|p| p.status == "Married"));
        assert_eq!(series[1].points.len(), 1);
    }
}
