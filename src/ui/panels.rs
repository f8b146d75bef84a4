use std::path::PathBuf;

use eframe::egui::{self, ScrollArea, Ui};

use crate::charts::ChartKind;
use crate::data::filter::YearRange;
use crate::data::model::EmigrantDataset;
use crate::state::{Action, AppState};

/// Requests the panels hand back to the app (the app owns fetching).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiRequest {
    OpenFolder(PathBuf),
    Reload,
}

// ---------------------------------------------------------------------------
// Left side panel – chart navigator and year filter
// ---------------------------------------------------------------------------

/// Render the left panel. Every change goes through [`AppState::dispatch`].
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Charts");
            ui.separator();
            for kind in ChartKind::ALL {
                if ui
                    .selectable_label(state.filters.chart == kind, kind.label())
                    .clicked()
                {
                    state.dispatch(Action::SelectChart(kind));
                }
            }

            ui.add_space(8.0);
            ui.heading("Years");
            ui.separator();
            year_filter(ui, state);

            ui.add_space(8.0);
            ui.separator();
            let mut show_table = state.show_table;
            if ui.checkbox(&mut show_table, "Show data table").changed() {
                state.dispatch(Action::ShowTable(show_table));
            }
        });
}

fn year_filter(ui: &mut Ui, state: &mut AppState) {
    let Some((lo, hi)) = state.dataset.year_span() else {
        ui.label(year_span_hint(&state.dataset));
        return;
    };

    let current = state.filters.year_range;
    let mut all_years = current.is_none();
    if ui.checkbox(&mut all_years, "All years").changed() {
        let range = if all_years { None } else { YearRange::new(lo, hi) };
        state.dispatch(Action::SetYearRange(range));
        return;
    }

    let Some(range) = current else {
        ui.label(format!("{lo}–{hi}"));
        return;
    };

    let (mut from, mut to) = (range.min(), range.max());
    let from_changed = ui
        .add(egui::Slider::new(&mut from, lo..=hi).text("From"))
        .changed();
    let to_changed = ui
        .add(egui::Slider::new(&mut to, lo..=hi).text("To"))
        .changed();

    if from_changed || to_changed {
        // Dragging one bound past the other pulls the other along.
        if from > to {
            if from_changed {
                to = from;
            } else {
                from = to;
            }
        }
        state.dispatch(Action::SetYearRange(YearRange::new(from, to)));
    }
}

/// Why there is nothing to filter on.
fn year_span_hint(dataset: &EmigrantDataset) -> &'static str {
    if dataset.is_empty() {
        "No dataset loaded."
    } else {
        "The loaded data has no years to filter on."
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState) -> Option<UiRequest> {
    let mut request = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui
                .add_enabled(!state.loading, egui::Button::new("Open data folder…"))
                .clicked()
            {
                request = pick_data_folder().map(UiRequest::OpenFolder);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.loading, egui::Button::new("Reload"))
                .clicked()
            {
                request = Some(UiRequest::Reload);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading…");
        } else if !state.dataset.is_empty() {
            ui.label(format!(
                "{} records, {} yearly aggregates",
                state.dataset.len(),
                state.dataset.yearly.len()
            ));
        }
    });

    request
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

fn pick_data_folder() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open emigration data folder (records + yearly files)")
        .pick_folder()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EmigrantRecord, YearlyAggregates};

    #[test]
    fn yearless_records_are_not_reported_as_missing_data() {
        let yearless = EmigrantDataset::new(
            vec![EmigrantRecord::new(None).with("total", 10.0)],
            YearlyAggregates::new(),
        );
        assert_eq!(yearless.year_span(), None);
        assert_eq!(
            year_span_hint(&yearless),
            "The loaded data has no years to filter on."
        );
        assert_eq!(year_span_hint(&EmigrantDataset::default()), "No dataset loaded.");
    }
}
