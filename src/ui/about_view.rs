use egui::{RichText, Ui};

use super::{PALETTE_GREY, RacePaceApp, page_header};

impl RacePaceApp {
    pub(crate) fn about_view(&mut self, ui: &mut Ui) {
        page_header(ui, "About", "What this dashboard does");
        ui.label(
            "Racepace sends your race parameters to the F1 prediction service and charts what \
             comes back. Lap Prediction asks for a single predicted lap time for a driver, \
             season, circuit and tire compound. Race Pace asks for a full race distance and \
             plots every predicted lap.",
        );
        ui.add_space(8.);
        ui.label(
            "All modelling happens on the prediction service. Nothing is computed or stored \
             locally, and results are gone when the window closes.",
        );
        ui.add_space(8.);
        ui.label(
            RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                .color(PALETTE_GREY)
                .small(),
        );
    }
}
