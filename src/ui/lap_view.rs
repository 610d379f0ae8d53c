use egui::{Button, Color32, RichText, Ui};

use racepace::FetchState;

use super::{
    PALETTE_GREY, PALETTE_RED, PALETTE_YELLOW, RacePaceApp, error_box, form_view::show_form,
    loading_row, page_header, stat_card,
};

impl RacePaceApp {
    pub(crate) fn lap_time_view(&mut self, ui: &mut Ui) {
        page_header(
            ui,
            "Lap Time Prediction",
            "Machine learning predictions for F1 lap times",
        );
        show_form(ui, &mut self.dashboard.lap_time.form, "lap");
        ui.add_space(8.);

        if ui
            .add(Button::new(RichText::new("🏎 Predict Lap Time").strong()).fill(PALETTE_RED))
            .clicked()
        {
            self.dashboard.submit_lap_time();
        }
        ui.add_space(8.);

        let panel = &self.dashboard.lap_time;
        if let Some(notice) = &panel.notice {
            error_box(ui, "Check your inputs", notice);
            ui.add_space(8.);
        }

        match panel.fetch.state() {
            FetchState::Idle => {
                ui.label(RichText::new("Ready for Prediction").color(Color32::WHITE));
                ui.label(
                    RichText::new("Fill in all parameters to get your prediction")
                        .color(PALETTE_GREY),
                );
            }
            FetchState::Loading => loading_row(ui, "Calculating..."),
            FetchState::Success(prediction) => {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(&prediction.predicted_lap_time_formatted)
                            .color(PALETTE_YELLOW)
                            .strong()
                            .size(36.),
                    );
                    ui.label(RichText::new("Predicted Lap Time").color(PALETTE_GREY));
                });
                ui.add_space(8.);

                let (season, compound) = match &panel.requested {
                    Some(params) => (params.year.to_string(), params.compound.to_string()),
                    None => ("-".to_string(), "-".to_string()),
                };
                ui.horizontal_wrapped(|ui| {
                    stat_card(ui, &prediction.driver.to_uppercase(), "Driver");
                    stat_card(ui, &prediction.circuit.to_uppercase(), "Circuit");
                    stat_card(ui, &season, "Season");
                    stat_card(ui, &compound.to_uppercase(), "Compound");
                });
            }
            FetchState::Failed(message) => error_box(ui, "Prediction Error", message),
        }
    }
}
