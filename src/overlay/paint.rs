//! egui Painter rendering of the overlay layers.
//!
//! Every layer is placed relative to `viewport_min`, the screen position of
//! the scroll container's visible top-left. Callers pass a painter already
//! clipped to the container viewport.

use egui::{Color32, FontId, Pos2, Rect, Rounding, Shape, Stroke, Vec2};

use super::grid::GridFrame;
use super::trail::TrailSurface;
use super::HighlightBox;

fn layer_rect(origin: [f32; 2], size: [f32; 2], viewport_min: Pos2) -> Rect {
    Rect::from_min_size(
        Pos2::new(viewport_min.x + origin[0], viewport_min.y + origin[1]),
        Vec2::new(size[0], size[1]),
    )
}

pub fn paint_grid(painter: &egui::Painter, frame: &GridFrame, viewport_min: Pos2, color: Color32) {
    let layer = layer_rect(frame.origin, frame.size, viewport_min);
    let painter = painter.with_clip_rect(layer.intersect(painter.clip_rect()));
    let stroke = Stroke::new(1.0, color);
    for &x in &frame.vertical {
        let x = layer.min.x + x;
        painter.line_segment([Pos2::new(x, layer.min.y), Pos2::new(x, layer.max.y)], stroke);
    }
    for &y in &frame.horizontal {
        let y = layer.min.y + y;
        painter.line_segment([Pos2::new(layer.min.x, y), Pos2::new(layer.max.x, y)], stroke);
    }
}

pub fn paint_trail(painter: &egui::Painter, surface: &TrailSurface, viewport_min: Pos2, stroke: Stroke) {
    if surface.points.len() < 2 || surface.clip.is_empty() {
        return;
    }
    let layer = layer_rect(surface.origin, surface.size, viewport_min);
    let band = Rect::from_min_max(
        Pos2::new(layer.min.x, layer.min.y + surface.clip.top),
        Pos2::new(layer.max.x, layer.min.y + surface.clip.bottom),
    );
    let painter = painter.with_clip_rect(band.intersect(painter.clip_rect()));
    let points: Vec<Pos2> = surface
        .points
        .iter()
        .map(|p| Pos2::new(layer.min.x + p.x, layer.min.y + p.y))
        .collect();
    painter.add(Shape::line(points, stroke));
}

/// Pointer-transparent outline: painted only, never allocated as a widget.
pub fn paint_highlight(painter: &egui::Painter, highlight: &HighlightBox, viewport_min: Pos2, stroke: Stroke) {
    let b = highlight.viewport;
    let rect = layer_rect([b.x, b.y], [b.width, b.height], viewport_min);
    painter.rect_stroke(rect, Rounding::ZERO, stroke);
}

/// Fixed, unclipped debug panel in the container's top-left corner.
pub fn paint_debug_text(painter: &egui::Painter, ctx: &egui::Context, text: &str, notice: Option<&str>, at: Pos2) {
    let font = FontId::monospace(12.0);
    let mut body = text.to_string();
    if let Some(notice) = notice {
        body.push('\n');
        body.push_str(notice);
    }
    let galley = ctx.fonts(|f: &egui::epaint::Fonts| f.layout_no_wrap(body, font, Color32::BLACK));
    let bg = Rect::from_min_size(at, galley.rect.size() + Vec2::splat(8.0));
    painter.rect_filled(bg, Rounding::same(2.0), Color32::from_rgba_unmultiplied(255, 255, 255, 204));
    painter.galley(at + Vec2::splat(4.0), galley, Color32::BLACK);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_rect_places_relative_to_viewport() {
        let rect = layer_rect([16.0, -20.0], [100.0, 50.0], Pos2::new(200.0, 80.0));
        assert_eq!(rect.min, Pos2::new(216.0, 60.0));
        assert_eq!(rect.max, Pos2::new(316.0, 110.0));
    }
}
