//! Heading row and floating mode buttons for `TrailApp`.

use std::time::Instant;

use eframe::egui;

use super::TrailApp;

const TEXT_SCALE_STEP: f32 = 0.25;

impl TrailApp {
    /// Title plus the text scale control.
    pub fn draw_header(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            ui.heading("Interactive Code Renderer with Trail");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let scale = self.host.text_scale();
                if ui.button("A+").on_hover_text("Larger text").clicked() {
                    self.host.set_text_scale(scale + TEXT_SCALE_STEP, now);
                }
                ui.label(format!("{:.0}%", scale * 100.0));
                if ui.button("A\u{2212}").on_hover_text("Smaller text").clicked() {
                    self.host.set_text_scale(scale - TEXT_SCALE_STEP, now);
                }
            });
        });
    }

    /// Fullscreen and detection toggles, floating over the bottom-right
    /// corner of the window.
    pub fn draw_mode_buttons(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("mode_buttons"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let full_screen = self.host.is_full_screen();
                    let label = if full_screen { "Exit Full Screen" } else { "Full Screen" };
                    if ui
                        .add(egui::Button::new(label).min_size(egui::vec2(0.0, 28.0)))
                        .clicked()
                    {
                        self.pending_full_screen = Some(!full_screen);
                    }

                    let detecting = self.host.is_detection_mode();
                    let label = if detecting {
                        "Turn Off Element Detection"
                    } else {
                        "Turn On Element Detection"
                    };
                    if ui
                        .add(egui::Button::new(label).min_size(egui::vec2(0.0, 28.0)))
                        .clicked()
                    {
                        self.host.set_detection_mode(!detecting);
                    }
                });
            });
    }
}
