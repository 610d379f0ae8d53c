mod about_view;
mod connection_view;
mod form_view;
mod lap_view;
mod race_view;

use egui::{
    Color32, CornerRadius, Frame, Layout, Margin, RichText, ScrollArea, Ui, Visuals,
    style::Widgets,
};
use log::debug;

use racepace::{Dashboard, HttpPredictionClient, View};

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 16);
pub(crate) const PALETTE_PANEL: Color32 = Color32::from_rgb(24, 27, 36);
pub(crate) const PALETTE_RED: Color32 = Color32::from_rgb(225, 6, 0);
pub(crate) const PALETTE_YELLOW: Color32 = Color32::from_rgb(245, 158, 11);
pub(crate) const PALETTE_GREY: Color32 = Color32::from_rgb(100, 116, 139);

const DEFAULT_CARD_CORNER_RADIUS: u8 = 6;

/// `RacePaceApp` is the dashboard window. It only draws; every request and
/// piece of fetched state is owned by the wrapped [`Dashboard`].
pub struct RacePaceApp {
    dashboard: Dashboard<HttpPredictionClient>,
    service_url: String,
}

impl RacePaceApp {
    pub fn new(
        mut dashboard: Dashboard<HttpPredictionClient>,
        service_url: String,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_YELLOW,
            faint_bg_color: PALETTE_PANEL,
            extreme_bg_color: PALETTE_BLACK,
            panel_fill: PALETTE_BLACK,
            window_fill: PALETTE_PANEL,
            selection: egui::style::Selection {
                bg_fill: PALETTE_RED,
                ..Default::default()
            },
            widgets: Widgets::dark(),
            striped: true,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        // responses arrive on the runtime threads, wake the UI so they get drawn
        let ctx = cc.egui_ctx.clone();
        dashboard.on_completion(move || ctx.request_repaint());

        Self {
            dashboard,
            service_url,
        }
    }

    fn navigation(&mut self, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new("F1 Race Pace Simulator")
                    .color(PALETTE_RED)
                    .strong()
                    .size(18.),
            );
            ui.separator();
            for view in View::ALL {
                if ui
                    .selectable_label(self.dashboard.view() == view, view.label())
                    .clicked()
                {
                    self.dashboard.select_view(view);
                }
            }
        });
    }

    fn status_bar(&self, ui: &mut Ui) {
        ui.with_layout(Layout::left_to_right(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!("Prediction service: {}", self.service_url))
                    .color(PALETTE_GREY)
                    .small(),
            );
            if self.dashboard.is_busy() {
                ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.spinner();
                });
            }
        });
    }

    fn dashboard_view(&mut self, ui: &mut Ui) {
        page_header(
            ui,
            "F1 Race Pace Simulator",
            "Formula 1 lap time prediction and race pace analysis",
        );
        ui.columns(2, |columns| {
            card(&mut columns[0], |ui| self.lap_time_view(ui));
            card(&mut columns[1], |ui| self.race_pace_view(ui));
        });
    }
}

impl eframe::App for RacePaceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let committed = self.dashboard.poll_completions();
        if committed > 0 {
            debug!("Applied {} responses", committed);
        }

        egui::TopBottomPanel::top("navigation")
            .frame(
                Frame::new()
                    .fill(PALETTE_PANEL)
                    .inner_margin(Margin::same(8)),
            )
            .show(ctx, |ui| self.navigation(ui));

        egui::TopBottomPanel::bottom("status")
            .frame(
                Frame::new()
                    .fill(PALETTE_PANEL)
                    .inner_margin(Margin::same(4)),
            )
            .show(ctx, |ui| self.status_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.dashboard.view() {
                    View::Dashboard => self.dashboard_view(ui),
                    View::LapPrediction => card(ui, |ui| self.lap_time_view(ui)),
                    View::RacePace => card(ui, |ui| self.race_pace_view(ui)),
                    View::ConnectionTest => card(ui, |ui| self.connection_view(ui)),
                    View::About => card(ui, |ui| self.about_view(ui)),
                });
        });
    }
}

pub(crate) fn card(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) {
    Frame::group(ui.style())
        .fill(PALETTE_PANEL)
        .corner_radius(CornerRadius::same(DEFAULT_CARD_CORNER_RADIUS))
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

pub(crate) fn page_header(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.label(RichText::new(title).color(Color32::WHITE).strong().size(22.));
    ui.label(RichText::new(subtitle).color(PALETTE_GREY));
    ui.add_space(8.);
}

pub(crate) fn stat_card(ui: &mut Ui, value: &str, label: &str) {
    Frame::new()
        .fill(PALETTE_BLACK)
        .corner_radius(CornerRadius::same(DEFAULT_CARD_CORNER_RADIUS))
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(value).color(Color32::WHITE).strong().size(16.));
                ui.label(RichText::new(label).color(PALETTE_GREY).small());
            });
        });
}

/// Red box used for both blocked submissions and failed requests.
pub(crate) fn error_box(ui: &mut Ui, title: &str, message: &str) {
    Frame::new()
        .fill(Color32::from_rgb(60, 12, 12))
        .stroke(egui::Stroke::new(1., PALETTE_RED))
        .corner_radius(CornerRadius::same(DEFAULT_CARD_CORNER_RADIUS))
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.label(RichText::new(title).color(PALETTE_RED).strong());
            ui.label(RichText::new(message).color(Color32::WHITE));
        });
}

pub(crate) fn loading_row(ui: &mut Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(RichText::new(text).color(PALETTE_GREY));
    });
}
