use egui::{ComboBox, Grid, RichText, TextEdit, Ui};
use egui_dropdown::DropDownBox;

use racepace::{
    Compound, FormField, PredictionForm,
    form::{CIRCUIT_CODES, DRIVER_CODES},
};

use super::{PALETTE_GREY, PALETTE_YELLOW};

const FIELD_WIDTH: f32 = 180.;

/// Draws the editable fields of a prediction form. Every edit goes through
/// [`PredictionForm::set_field`] so validity stays current.
pub(crate) fn show_form(ui: &mut Ui, form: &mut PredictionForm, id_prefix: &str) {
    Grid::new(format!("{id_prefix}_form"))
        .num_columns(2)
        .spacing([12., 8.])
        .show(ui, |ui| {
            ui.label("Driver Code *");
            let mut driver = form.driver().to_string();
            ui.add(
                DropDownBox::from_iter(
                    DRIVER_CODES.iter().copied(),
                    format!("{id_prefix}_driver"),
                    &mut driver,
                    |ui, text| ui.selectable_label(false, text),
                )
                .filter_by_input(true),
            );
            if driver != form.driver() {
                form.set_field(FormField::Driver, driver);
            }
            ui.end_row();

            ui.label("Season Year *");
            let mut year = form.year().to_string();
            ui.add(
                TextEdit::singleline(&mut year)
                    .hint_text("e.g. 2023")
                    .desired_width(FIELD_WIDTH),
            );
            if year != form.year() {
                form.set_field(FormField::Year, year);
            }
            ui.end_row();

            ui.label("Circuit *");
            let mut circuit = form.circuit().to_string();
            ui.add(
                DropDownBox::from_iter(
                    CIRCUIT_CODES.iter().copied(),
                    format!("{id_prefix}_circuit"),
                    &mut circuit,
                    |ui, text| ui.selectable_label(false, text),
                )
                .filter_by_input(true),
            );
            if circuit != form.circuit() {
                form.set_field(FormField::Circuit, circuit);
            }
            ui.end_row();

            ui.label("Tire Compound");
            let mut compound = form.compound().to_string();
            let selected = form
                .compound()
                .parse::<Compound>()
                .map(|c| c.label())
                .unwrap_or("Select compound");
            ComboBox::from_id_salt(format!("{id_prefix}_compound"))
                .selected_text(selected)
                .width(FIELD_WIDTH)
                .show_ui(ui, |ui| {
                    for option in Compound::ALL {
                        ui.selectable_value(&mut compound, option.to_string(), option.label());
                    }
                });
            if compound != form.compound() {
                form.set_field(FormField::Compound, compound);
            }
            ui.end_row();

            if let Some(laps) = form.laps() {
                ui.label("Race Distance");
                let mut laps = laps.to_string();
                ui.add(
                    TextEdit::singleline(&mut laps)
                        .hint_text("Number of laps (1-100)")
                        .desired_width(FIELD_WIDTH),
                );
                if Some(laps.as_str()) != form.laps() {
                    form.set_field(FormField::Laps, laps);
                }
                ui.end_row();
            }
        });

    match form.first_violation() {
        Some(violation) => {
            ui.label(
                RichText::new(format!("⚠ {}", violation))
                    .color(PALETTE_YELLOW)
                    .small(),
            );
        }
        None => {
            ui.label(
                RichText::new("Codes are lowercase, e.g. verstappen at monza")
                    .color(PALETTE_GREY)
                    .small(),
            );
        }
    }
}
