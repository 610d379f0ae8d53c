use egui::{Button, Color32, Grid, RichText, Ui};
use itertools::Itertools;

use racepace::{
    FetchState,
    form::{CIRCUIT_CODES, DRIVER_CODES},
};

use super::{PALETTE_GREY, PALETTE_RED, PALETTE_YELLOW, RacePaceApp, page_header};

const REFERENCE_CODES: usize = 6;

impl RacePaceApp {
    pub(crate) fn connection_view(&mut self, ui: &mut Ui) {
        page_header(
            ui,
            "🔧 API Connection Test",
            "Test backend connectivity and API endpoints",
        );

        let loading = self.dashboard.connection.is_loading();
        let label = if loading {
            "Running Tests..."
        } else {
            "🚀 Run Connection Tests"
        };
        if ui
            .add_enabled(!loading, Button::new(RichText::new(label).strong()).fill(PALETTE_RED))
            .clicked()
        {
            self.dashboard.run_connection_tests();
        }
        ui.add_space(8.);

        let panel = &self.dashboard.connection;
        if panel.has_run() {
            ui.label(RichText::new("Test Results").color(Color32::WHITE).strong());
            Grid::new("connection_results")
                .num_columns(2)
                .spacing([24., 6.])
                .show(ui, |ui| {
                    for (name, outcome) in panel.results() {
                        ui.label(RichText::new(name).color(PALETTE_GREY));
                        match outcome {
                            Some(true) => ui.label(RichText::new("✅ PASS").color(Color32::GREEN)),
                            Some(false) => ui.label(RichText::new("❌ FAIL").color(PALETTE_RED)),
                            None => ui.spinner(),
                        };
                        ui.end_row();
                    }
                });

            if let FetchState::Success(probe) = panel.probe.state() {
                ui.add_space(4.);
                ui.label(RichText::new(&probe.body).monospace().small().color(PALETTE_GREY));
            }

            if let FetchState::Success(sample) = panel.sample_lap_time.state() {
                ui.add_space(8.);
                ui.label(RichText::new("Sample Lap Time Result:").color(Color32::GREEN));
                ui.horizontal(|ui| {
                    ui.label(format!("{} at {}:", sample.driver, sample.circuit));
                    ui.label(
                        RichText::new(&sample.predicted_lap_time_formatted)
                            .monospace()
                            .color(PALETTE_YELLOW),
                    );
                });
            }
        }

        ui.add_space(12.);
        ui.label(RichText::new("Quick Reference:").color(Color32::WHITE).strong());
        ui.label(format!(
            "Driver codes: {}, ...",
            DRIVER_CODES.iter().take(REFERENCE_CODES).join(", ")
        ));
        ui.label(format!(
            "Circuit codes: {}, ...",
            CIRCUIT_CODES.iter().take(REFERENCE_CODES).join(", ")
        ));
    }
}
