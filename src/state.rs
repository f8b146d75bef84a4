use crate::charts::{prepare_chart, ChartKind, PreparedChart};
use crate::data::filter::{FilterState, YearRange};
use crate::data::loader::FetchError;
use crate::data::model::EmigrantDataset;

// ---------------------------------------------------------------------------
// Actions – the only way state changes
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Action {
    /// `None` shows every year.
    SetYearRange(Option<YearRange>),
    SelectChart(ChartKind),
    ShowTable(bool),
    FetchStarted,
    FetchFinished(Result<EmigrantDataset, FetchError>),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Last successfully fetched dataset (empty until the first fetch lands).
    pub dataset: EmigrantDataset,

    /// Year range and active chart, handed read-only to chart preparation.
    pub filters: FilterState,

    /// Chart for the current dataset and filters (cached).
    chart: Option<PreparedChart>,

    /// Whether the data table is shown under the chart.
    pub show_table: bool,

    /// Whether a fetch is in flight.
    pub loading: bool,
}

impl AppState {
    /// Apply one action and refresh the cached chart.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SetYearRange(range) => {
                self.filters.year_range = range;
            }
            Action::SelectChart(kind) => {
                self.filters.chart = kind;
            }
            Action::ShowTable(show) => {
                self.show_table = show;
                return;
            }
            Action::FetchStarted => {
                self.loading = true;
                return;
            }
            Action::FetchFinished(Ok(dataset)) => self.set_dataset(dataset),
            Action::FetchFinished(Err(e)) => {
                // Logged only; the dashboard keeps its previous data.
                log::error!("Failed to load data: {e}");
                self.loading = false;
                return;
            }
        }
        self.rebuild_chart();
    }

    /// The cached chart, building it on first use.
    pub fn chart(&mut self) -> &PreparedChart {
        let (dataset, filters) = (&self.dataset, &self.filters);
        self.chart.get_or_insert_with(|| prepare_chart(dataset, filters))
    }

    /// Replace the dataset as a whole and keep the year range inside it.
    fn set_dataset(&mut self, dataset: EmigrantDataset) {
        self.filters.year_range = match (self.filters.year_range, dataset.year_span()) {
            (Some(range), Some((lo, hi))) => range.clamp_to(lo, hi),
            _ => None,
        };
        self.dataset = dataset;
        self.loading = false;
    }

    fn rebuild_chart(&mut self) {
        self.chart = Some(prepare_chart(&self.dataset, &self.filters));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EmigrantRecord, YearlyAggregates};

    fn dataset(years: &[i32]) -> EmigrantDataset {
        EmigrantDataset::new(
            years
                .iter()
                .map(|&y| EmigrantRecord::new(Some(y)).with("total", 100.0))
                .collect(),
            YearlyAggregates::new(),
        )
    }

    #[test]
    fn fetch_lifecycle_toggles_loading() {
        let mut state = AppState::default();
        state.dispatch(Action::FetchStarted);
        assert!(state.loading);
        state.dispatch(Action::FetchFinished(Ok(dataset(&[1990, 1991]))));
        assert!(!state.loading);
        assert_eq!(state.dataset.len(), 2);
        assert!(!state.chart().is_empty());
    }

    #[test]
    fn failed_fetch_keeps_previous_dataset() {
        let mut state = AppState::default();
        state.dispatch(Action::FetchFinished(Ok(dataset(&[1990]))));
        state.dispatch(Action::FetchStarted);
        state.dispatch(Action::FetchFinished(Err(FetchError::Yearly(
            anyhow::anyhow!("connection reset"),
        ))));
        assert!(!state.loading);
        assert_eq!(state.dataset, dataset(&[1990]));
        assert!(!state.chart().is_empty());
    }

    #[test]
    fn refetch_replaces_and_clamps_range() {
        let mut state = AppState::default();
        state.dispatch(Action::FetchFinished(Ok(dataset(&[1981, 2020]))));
        state.dispatch(Action::SetYearRange(YearRange::new(1981, 1990)));

        state.dispatch(Action::FetchFinished(Ok(dataset(&[1985, 2000]))));
        assert_eq!(state.dataset.len(), 2);
        assert_eq!(state.filters.year_range, YearRange::new(1985, 1990));

        state.dispatch(Action::FetchFinished(Ok(dataset(&[2010]))));
        assert_eq!(state.filters.year_range, None);
    }

    #[test]
    fn chart_follows_filters() {
        let mut state = AppState::default();
        state.dispatch(Action::FetchFinished(Ok(dataset(&[1990, 1995]))));
        state.dispatch(Action::SelectChart(ChartKind::Sex));
        assert_eq!(state.chart().kind, ChartKind::Sex);

        state.dispatch(Action::SetYearRange(YearRange::new(1991, 1994)));
        assert!(state.chart().is_empty());
    }
}
