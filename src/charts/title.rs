use crate::data::filter::YearRange;

/// Chart title for the active year range.
///
/// Falls back to the bare `base` title when no range is active or the
/// filtered data is empty.
pub fn chart_title(base: &str, range: Option<YearRange>, has_data: bool) -> String {
    match range {
        Some(range) if has_data => format!("{base} ({range})"),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_year_and_range_titles() {
        let single = YearRange::new(1990, 1990);
        let span = YearRange::new(1990, 1995);
        assert_eq!(chart_title("Education", single, true), "Education (1990)");
        assert_eq!(chart_title("Education", span, true), "Education (1990-1995)");
    }

    #[test]
    fn generic_title_without_range_or_data() {
        assert_eq!(chart_title("Education", None, true), "Education");
        assert_eq!(
            chart_title("Education", YearRange::new(1990, 1995), false),
            "Education"
        );
    }
}
