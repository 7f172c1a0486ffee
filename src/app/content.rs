//! Fragment viewport rendering for `TrailApp`.
//!
//! The scroll area paints the laid-out fragment; the overlays are painted
//! afterwards on a painter clipped to the visible viewport, using the scroll
//! offset the area settled on this frame.

use std::time::Instant;

use eframe::egui::{self, Pos2, Sense, Stroke, Vec2};

use grid_trail::geometry::observer::ContainerSize;
use grid_trail::overlay::paint::{paint_debug_text, paint_grid, paint_highlight, paint_trail};
use grid_trail::render::paint::{paint_fragment, PAGE_BG};

use super::TrailApp;

impl TrailApp {
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, now: Instant) {
        let height = if self.host.is_full_screen() {
            ui.available_height()
        } else {
            self.host.config().viewport_height.min(ui.available_height())
        };

        let output = egui::ScrollArea::vertical()
            .id_salt("fragment_viewport")
            .max_height(height)
            .min_scrolled_height(height)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let size = ContainerSize::new(ui.available_width(), height);
                if self.host.fragment().is_none() {
                    // Mount measurement happens at the real size
                    self.host.resize(size, now);
                    self.host.inject(&self.markup);
                    if self.start_full_screen {
                        self.pending_full_screen = Some(true);
                    }
                    self.host.set_detection_mode(self.start_detection);
                } else {
                    self.host.resize(size, now);
                }
                self.host.tick(now);

                let content_height = self.host.container().content_height.max(height);
                let (rect, response) =
                    ui.allocate_exact_size(Vec2::new(size.width, content_height), Sense::click());
                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, egui::Rounding::ZERO, PAGE_BG);
                if let Some(fragment) = self.host.fragment() {
                    paint_fragment(&painter, ctx, fragment.layout(), rect.min);
                }
                response
            });

        let viewport = output.inner_rect;
        self.host.scroll_to(output.state.offset.y);

        let pointer = ctx
            .pointer_hover_pos()
            .filter(|p| viewport.contains(*p))
            .map(|p| (p.x - viewport.min.x, p.y - viewport.min.y));
        self.host.pointer_moved(pointer);
        if output.inner.clicked() {
            self.host.pointer_clicked();
        }
        if self.host.is_detection_mode() && self.host.hovered().is_some() {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let config = self.host.config().clone();
        let points = self.points.snapshot();
        let overlays = self.host.overlays(&points);
        let painter = ui.painter_at(viewport);

        if let Some(grid) = overlays.grid {
            paint_grid(&painter, grid, viewport.min, config.grid_color);
        }
        if let Some(ref surface) = overlays.trail.surface {
            paint_trail(
                &painter,
                surface,
                viewport.min,
                Stroke::new(config.trail_width, config.trail_color),
            );
        }
        if let Some(ref highlight) = overlays.highlight {
            paint_highlight(
                &painter,
                highlight,
                viewport.min,
                Stroke::new(config.highlight_width, config.highlight_color),
            );
        }

        let debug_layer = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("trail_debug"),
        ));
        let notice = overlays.trail.notice.map(|n| n.to_string());
        paint_debug_text(
            &debug_layer,
            ctx,
            &overlays.trail.debug_text,
            notice.as_deref(),
            Pos2::new(8.0, 8.0),
        );
    }
}
