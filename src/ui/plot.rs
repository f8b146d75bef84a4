use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotUi, Points};

use crate::charts::education::{Basis, EducationBreakdown, LEVELS};
use crate::charts::relationships::{StatusSeries, STATUSES};
use crate::charts::sex::SexYear;
use crate::charts::trend::TrendPoint;
use crate::charts::{ChartBody, ChartTable};
use crate::color::{faded, SeriesColors};
use crate::state::AppState;

/// Largest bubble radius in points.
const MAX_BUBBLE_RADIUS: f32 = 48.0;

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the active chart, or its empty state, in the central panel.
pub fn chart_view(ui: &mut Ui, state: &mut AppState) {
    if state.loading && state.dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.spinner();
        });
        return;
    }

    let show_table = state.show_table;
    let chart = state.chart();

    ui.heading(&chart.title);

    let body = match &chart.body {
        ChartBody::Empty(empty) => {
            ui.add_space(24.0);
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(empty.message).italics());
                ui.label("Open a data folder with File → Open data folder…");
            });
            return;
        }
        body => body,
    };

    if let ChartBody::Education(EducationBreakdown {
        basis: Basis::Estimated,
        ..
    }) = body
    {
        ui.label(
            RichText::new(
                "No per-level counts in this range: values are a fixed-percentage split \
                 of each year's total (8/28/45/12/5/2 %), not reported data.",
            )
            .color(Color32::from_rgb(200, 140, 40)),
        );
    }

    let mut plot = Plot::new("emigrant_chart")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Emigrants")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if show_table {
        plot = plot.height(ui.available_height() * 0.6);
    }

    plot.show(ui, |plot_ui| match body {
        ChartBody::Education(breakdown) => education_bars(plot_ui, breakdown),
        ChartBody::Relationships(series) => status_bubbles(plot_ui, series),
        ChartBody::Sex(years) => sex_bars(plot_ui, years),
        ChartBody::Trend(points) => trend_line(plot_ui, points),
        ChartBody::Empty(_) => {}
    });

    if show_table {
        if let Some(table) = body.table() {
            ui.separator();
            data_table(ui, &table);
        }
    }
}

/// One bar stack per year, one layer per education level.
fn education_bars(plot_ui: &mut PlotUi, breakdown: &EducationBreakdown) {
    let colors = SeriesColors::new(LEVELS.iter().map(|level| level.label));
    let estimated = breakdown.basis == Basis::Estimated;

    let mut layers: Vec<BarChart> = Vec::with_capacity(LEVELS.len());
    for (i, level) in LEVELS.iter().enumerate() {
        let mut color = colors.color_for(level.label);
        if estimated {
            color = faded(color);
        }
        let bars: Vec<Bar> = breakdown
            .years
            .iter()
            .map(|row| {
                Bar::new(row.year as f64, row.values[i])
                    .name(format!("{} {}", level.label, row.year))
                    .width(0.7)
            })
            .collect();

        let layer = {
            let below: Vec<&BarChart> = layers.iter().collect();
            BarChart::new(bars)
                .name(level.label)
                .color(color)
                .stack_on(&below)
        };
        layers.push(layer);
    }

    for layer in layers {
        plot_ui.bar_chart(layer);
    }
}

/// Bubble radius grows with the square root of the size so area tracks count.
fn bubble_radius(size: f64) -> f32 {
    (2.0 * size.sqrt() as f32).min(MAX_BUBBLE_RADIUS)
}

/// Each bubble is its own item since radius is per item; sharing the series
/// name keeps one legend entry per status.
fn status_bubbles(plot_ui: &mut PlotUi, series: &[StatusSeries]) {
    let colors = SeriesColors::new(STATUSES.iter().map(|s| s.label));
    for s in series {
        let color = colors.color_for(s.status);
        for point in &s.points {
            plot_ui.points(
                Points::new(vec![[point.x as f64, point.y]])
                    .name(s.status)
                    .color(color.gamma_multiply(0.7))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(bubble_radius(point.size)),
            );
        }
    }
}

/// Side-by-side male and female bars per year.
fn sex_bars(plot_ui: &mut PlotUi, years: &[SexYear]) {
    let colors = SeriesColors::new(["Male", "Female"]);
    let male: Vec<Bar> = years
        .iter()
        .map(|row| Bar::new(row.year as f64 - 0.2, row.male).width(0.4))
        .collect();
    let female: Vec<Bar> = years
        .iter()
        .map(|row| Bar::new(row.year as f64 + 0.2, row.female).width(0.4))
        .collect();

    plot_ui.bar_chart(BarChart::new(male).name("Male").color(colors.color_for("Male")));
    plot_ui.bar_chart(
        BarChart::new(female)
            .name("Female")
            .color(colors.color_for("Female")),
    );
}

fn trend_line(plot_ui: &mut PlotUi, points: &[TrendPoint]) {
    let series: Vec<[f64; 2]> = points.iter().map(|p| [p.year as f64, p.total]).collect();
    plot_ui.line(
        Line::new(series.clone())
            .name("Total")
            .color(Color32::LIGHT_BLUE)
            .width(2.0),
    );
    plot_ui.points(
        Points::new(series)
            .name("Total")
            .color(Color32::LIGHT_BLUE)
            .radius(3.0),
    );
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, table: &ChartTable) {
    let extra_columns = table.headers.len().saturating_sub(1);
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(48.0))
        .columns(Column::remainder().at_least(64.0), extra_columns)
        .header(20.0, |mut header| {
            for title in &table.headers {
                header.col(|ui| {
                    ui.strong(*title);
                });
            }
        })
        .body(|mut body| {
            for cells in &table.rows {
                body.row(18.0, |mut row| {
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}
