//! `TrailApp`: the top-level egui application state.
//!
//! This module declares the `TrailApp` struct and its constructor.
//! All drawing methods are split across the sibling sub-modules:
//!
//! - `toolbar`: heading row, text scale control, floating mode buttons
//! - `content`: fragment viewport and its overlays
//! - `editor`: coordinate list side panel

pub mod content;
pub mod editor;
pub mod toolbar;

use std::time::Instant;

use eframe::egui;

use grid_trail::config::{ConfigError, OverlayConfig};
use grid_trail::geometry::observer::ContainerSize;
use grid_trail::host::RenderHost;
use grid_trail::points::NamedPointSet;

// ─── Application state ───────────────────────────────────────────────────────

pub struct TrailApp {
    pub host: RenderHost,
    pub markup: String,
    pub points: NamedPointSet,
    /// Editor text per point, `[x, y]`, in point order
    pub edit_buffers: Vec<[String; 2]>,
    pub edit_error: Option<String>,
    /// Fullscreen flip requested by a button, applied at the start of the
    /// next frame so the new layout is measured only once
    pub pending_full_screen: Option<bool>,
    pub start_full_screen: bool,
    pub start_detection: bool,
}

impl TrailApp {
    pub fn new(
        config: OverlayConfig,
        markup: String,
        full_screen: bool,
        detection: bool,
    ) -> Result<Self, ConfigError> {
        let initial = ContainerSize::new(800.0, config.viewport_height);
        let host = RenderHost::new(config, initial)?;
        let mut app = Self {
            host,
            markup,
            points: NamedPointSet::default(),
            edit_buffers: Vec::new(),
            edit_error: None,
            pending_full_screen: None,
            start_full_screen: full_screen,
            start_detection: detection,
        };
        app.sync_buffers();
        Ok(app)
    }

    /// Rewrite every editor field from the stored points.
    pub fn sync_buffers(&mut self) {
        self.edit_buffers = self
            .points
            .iter()
            .map(|e| [e.point.x.to_string(), e.point.y.to_string()])
            .collect();
    }
}

impl eframe::App for TrailApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        if let Some(full_screen) = self.pending_full_screen.take() {
            self.host.set_full_screen(full_screen);
        }

        if !self.host.is_full_screen() {
            self.draw_editor(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_header(ui, now);
            ui.add_space(8.0);
            self.draw_content(ui, ctx, now);
        });

        self.draw_mode_buttons(ctx);

        if self.pending_full_screen.is_some() {
            ctx.request_repaint();
        } else if let Some(delay) = self.host.pending_delay(Instant::now()) {
            ctx.request_repaint_after(delay);
        }
    }
}
