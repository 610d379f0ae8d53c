use egui::{Button, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Line, PlotPoints, Points};

use racepace::{FetchState, RacePaceView, mapper::format_lap_time_millis};

use super::{
    PALETTE_GREY, PALETTE_RED, PALETTE_YELLOW, RacePaceApp, error_box, form_view::show_form,
    loading_row, page_header, stat_card,
};

const CHART_HEIGHT: f32 = 280.;
const LAP_LIST_HEIGHT: f32 = 320.;

impl RacePaceApp {
    pub(crate) fn race_pace_view(&mut self, ui: &mut Ui) {
        page_header(
            ui,
            "Race Pace Simulation",
            "Lap by lap race pace analysis",
        );
        show_form(ui, &mut self.dashboard.race_pace.form, "race");
        ui.add_space(8.);

        if ui
            .add(Button::new(RichText::new("🏁 Simulate Race Pace").strong()).fill(PALETTE_RED))
            .clicked()
        {
            self.dashboard.submit_race_pace();
        }
        ui.add_space(8.);

        let panel = &self.dashboard.race_pace;
        if let Some(notice) = &panel.notice {
            error_box(ui, "Check your inputs", notice);
            ui.add_space(8.);
        }

        match panel.fetch.state() {
            FetchState::Idle => {
                ui.label(RichText::new("Ready for Analysis").color(Color32::WHITE));
                ui.label(
                    RichText::new("Configure race parameters and start simulation")
                        .color(PALETTE_GREY),
                );
            }
            FetchState::Loading => loading_row(ui, "Analyzing Race Data..."),
            FetchState::Success(race) => {
                ui.label(RichText::new("Performance Overview").color(Color32::WHITE).strong());
                ui.horizontal_wrapped(|ui| {
                    stat_card(ui, &race.fastest_lap, "Fastest Lap");
                    stat_card(ui, &race.average_lap_time, "Average Pace");
                    stat_card(ui, &race.total_race_time, "Total Race Time");
                    stat_card(ui, &race.lap_count().to_string(), "Total Laps");
                    stat_card(ui, &race.driver.to_uppercase(), "Driver");
                });
                ui.add_space(12.);
                race_pace_chart(ui, race);
                ui.add_space(12.);
                lap_list(ui, race);
            }
            FetchState::Failed(message) => error_box(ui, "Simulation Error", message),
        }
    }
}

/// Lap times on a pace chart sit within a few seconds of each other, so ticks keep milliseconds.
fn axis_label(seconds: f64) -> String {
    format_lap_time_millis(seconds)
}

fn race_pace_chart(ui: &mut Ui, race: &RacePaceView) {
    ui.label(RichText::new("Race Pace Visualization").color(Color32::WHITE).strong());
    if race.gap_count() > 0 {
        ui.label(
            RichText::new(format!(
                "{} lap times could not be read and are left out of the chart",
                race.gap_count()
            ))
            .color(PALETTE_YELLOW)
            .small(),
        );
    }

    let plot = egui_plot::Plot::new("race_pace_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_label("Lap")
        .y_axis_formatter(|mark, _range| axis_label(mark.value))
        .include_x(1.)
        .include_x(race.lap_count().max(1) as f64);

    plot.show_background(false).show(ui, |plot_ui| {
        // one line per contiguous run so unreadable laps show up as gaps
        for segment in race.chart_segments() {
            plot_ui.line(
                Line::new("Lap Times", PlotPoints::new(segment))
                    .color(PALETTE_RED)
                    .width(2.),
            );
        }
        plot_ui.points(
            Points::new("Lap Times", PlotPoints::new(race.chart_points()))
                .color(PALETTE_YELLOW)
                .radius(3.),
        );
    });
}

fn lap_list(ui: &mut Ui, race: &RacePaceView) {
    ui.label(RichText::new("📊 Detailed Lap Analysis").color(Color32::WHITE).strong());
    TableBuilder::new(ui)
        .id_salt("race_pace_laps")
        .striped(true)
        .max_scroll_height(LAP_LIST_HEIGHT)
        .column(Column::auto().at_least(60.))
        .column(Column::remainder())
        .header(20., |mut header| {
            header.col(|ui| {
                ui.strong("Lap");
            });
            header.col(|ui| {
                ui.strong("Time");
            });
        })
        .body(|mut body| {
            for (i, (raw, seconds)) in race.lap_times.iter().zip(&race.lap_seconds).enumerate() {
                body.row(18., |mut row| {
                    row.col(|ui| {
                        ui.label(format!("Lap {}", i + 1));
                    });
                    row.col(|ui| {
                        if seconds.is_some() {
                            ui.monospace(raw);
                        } else {
                            ui.label(RichText::new(raw).monospace().color(PALETTE_YELLOW))
                                .on_hover_text("Could not read this lap time");
                        }
                    });
                });
            }
        });
}
