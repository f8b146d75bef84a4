use crate::data::fields;
use crate::data::filter::YearRange;
use crate::data::model::YearlyAggregates;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub total: f64,
}

/// Yearly totals from the pre-aggregated mapping, limited to `range`.
pub fn yearly_trend(yearly: &YearlyAggregates, range: Option<YearRange>) -> Vec<TrendPoint> {
    yearly
        .iter()
        .filter(|(year, _)| range.map_or(true, |r| r.contains(**year)))
        .map(|(&year, agg)| TrendPoint {
            year,
            total: fields::record_total(agg),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::EmigrantRecord;

    #[test]
    fn totals_inside_range_in_year_order() {
        let mut yearly = YearlyAggregates::new();
        yearly.insert(1983, EmigrantRecord::new(Some(1983)).with("total", 30.0));
        yearly.insert(
            1981,
            EmigrantRecord::new(Some(1981))
                .with("male", 5.0)
                .with("female", 6.0),
        );
        yearly.insert(2000, EmigrantRecord::new(Some(2000)).with("total", 1.0));

        let all = yearly_trend(&yearly, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], TrendPoint { year: 1981, total: 11.0 });

        let some = yearly_trend(&yearly, YearRange::new(1982, 1999));
        assert_eq!(some, vec![TrendPoint { year: 1983, total: 30.0 }]);
    }
}
