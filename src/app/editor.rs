//! Coordinate list side panel for `TrailApp`.

use eframe::egui;

use grid_trail::points::Axis;

use super::TrailApp;

enum EditAction {
    Update(String, Axis, String),
    Delete(String),
    Add,
}

impl TrailApp {
    pub fn draw_editor(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("coordinate_editor")
            .resizable(false)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Coordinates");
                ui.add_space(6.0);

                let mut actions = Vec::new();
                let can_delete = self.points.can_delete();
                let keys: Vec<String> = self.points.iter().map(|e| e.key.clone()).collect();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (i, (key, buffers)) in keys.iter().zip(self.edit_buffers.iter_mut()).enumerate() {
                        ui.label(egui::RichText::new(format!("Point {}", i + 1)).strong());
                        ui.horizontal(|ui| {
                            for (axis, buffer) in [Axis::X, Axis::Y].into_iter().zip(buffers.iter_mut()) {
                                ui.label(format!("{axis}:"));
                                let response = ui.add(
                                    egui::TextEdit::singleline(buffer)
                                        .desired_width(64.0)
                                        .font(egui::TextStyle::Monospace),
                                );
                                if response.changed() {
                                    actions.push(EditAction::Update(key.clone(), axis, buffer.clone()));
                                }
                            }
                            if can_delete && ui.button("Delete").clicked() {
                                actions.push(EditAction::Delete(key.clone()));
                            }
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.separator();
                if ui.button("Add Point").clicked() {
                    actions.push(EditAction::Add);
                }
                if let Some(ref err) = self.edit_error {
                    ui.colored_label(egui::Color32::from_rgb(200, 60, 60), err);
                }

                for action in actions {
                    self.apply_edit(action);
                }
            });
    }

    fn apply_edit(&mut self, action: EditAction) {
        let result = match action {
            EditAction::Update(key, axis, raw) => self.points.update_axis(&key, axis, &raw).map(|_| ()),
            EditAction::Delete(key) => self.points.delete_point(&key).map(|_| self.sync_buffers()),
            EditAction::Add => {
                self.points.add_point();
                self.sync_buffers();
                Ok(())
            }
        };
        match result {
            Ok(()) => self.edit_error = None,
            Err(e) => {
                log::debug!("edit rejected: {}", e);
                self.edit_error = Some(e.to_string());
            }
        }
    }
}
