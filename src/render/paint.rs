//! egui Painter rendering of a laid-out fragment.
//!
//! Draws element backgrounds and wrapped text at their layout boxes, offset
//! by the on-screen origin of the fragment root. Text is painted at the
//! layout's font size, so heights estimated by the layout and the galley may
//! differ slightly.

use egui::{Color32, FontId, Pos2, Rect, Rounding, Vec2};

use crate::dom::NodeType;
use crate::render::layout::{LayoutBox, LayoutNode, LayoutTree};

/// Page colour behind the fragment.
pub const PAGE_BG: Color32 = Color32::from_rgb(250, 250, 252);

/// Screen rectangle of a layout box, given the fragment root's screen origin.
pub fn box_rect(bounds: &LayoutBox, origin: Pos2) -> Rect {
    Rect::from_min_size(
        Pos2::new(origin.x + bounds.x, origin.y + bounds.y),
        Vec2::new(bounds.width.max(0.0), bounds.height.max(0.0)),
    )
}

pub fn color4(c: [f32; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(
        (c[0] * 255.0) as u8,
        (c[1] * 255.0) as u8,
        (c[2] * 255.0) as u8,
        (c[3] * 255.0) as u8,
    )
}

/// Paint every node of `layout` that intersects the painter's clip rect.
pub fn paint_fragment(painter: &egui::Painter, ctx: &egui::Context, layout: &LayoutTree, origin: Pos2) {
    let clip = painter.clip_rect();
    for (_, node) in layout.iter() {
        let rect = box_rect(&node.bounds, origin);
        // Cull offscreen
        if rect.max.y < clip.min.y || rect.min.y > clip.max.y {
            continue;
        }
        match node.node_type {
            NodeType::Fragment => {}
            NodeType::Element => draw_element(painter, rect, node),
            NodeType::Text => draw_text(painter, ctx, rect, node),
        }
    }
}

fn draw_element(painter: &egui::Painter, rect: Rect, node: &LayoutNode) {
    if let Some(bg) = node.background {
        painter.rect_filled(rect, Rounding::same(node.border_radius), color4(bg));
    }
    if node.tag == "hr" {
        let y = rect.center().y;
        painter.line_segment(
            [Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)],
            egui::Stroke::new(1.0, Color32::from_rgb(204, 204, 209)),
        );
    }
}

fn draw_text(painter: &egui::Painter, ctx: &egui::Context, rect: Rect, node: &LayoutNode) {
    if node.text.is_empty() {
        return;
    }
    let color = color4(node.color);
    let job = egui::text::LayoutJob::simple(
        node.text.clone(),
        FontId::proportional(node.font_size),
        color,
        rect.width().max(1.0),
    );
    let galley = ctx.fonts(|f: &egui::epaint::Fonts| f.layout_job(job));
    painter.galley(rect.min, galley, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_rect_offsets_by_origin() {
        let bounds = LayoutBox {
            x: 16.0,
            y: 40.0,
            width: 100.0,
            height: 20.0,
        };
        let rect = box_rect(&bounds, Pos2::new(10.0, -30.0));
        assert_eq!(rect.min, Pos2::new(26.0, 10.0));
        assert_eq!(rect.size(), Vec2::new(100.0, 20.0));
    }

    #[test]
    fn color4_scales_channels() {
        assert_eq!(color4([1.0, 0.0, 0.0, 1.0]), Color32::from_rgb(255, 0, 0));
    }
}
