//! Polyline through the named points, mapped onto the target rectangle.

use std::fmt::Write as _;

use thiserror::Error;

use crate::geometry::mapper::CoordinateMapper;
use crate::geometry::{LayoutSnapshot, PixelPoint, ScrollWindow, TargetRect};
use crate::points::PointSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrailError {
    #[error("Not enough points to draw a path")]
    InsufficientPoints,
}

/// Vertical band of the surface that is inside the scroll viewport, in
/// surface-local pixels. Empty when `top >= bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBand {
    pub top: f32,
    pub bottom: f32,
}

impl ClipBand {
    /// Intersect the visible scroll band with a surface placed at `rect`.
    pub fn for_rect(rect: &TargetRect, scroll: &ScrollWindow) -> Self {
        Self {
            top: (scroll.scroll_top - rect.top).max(0.0),
            bottom: (scroll.visible_bottom() - rect.top).min(rect.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top >= self.bottom
    }
}

/// Drawing surface the size of the target rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailSurface {
    /// Top-left in the container viewport: `(left, top - scroll_top)`
    pub origin: [f32; 2],
    pub size: [f32; 2],
    pub clip: ClipBand,
    /// Mapped points, local to the surface
    pub points: Vec<PixelPoint>,
    /// `M..` / `L..` path data; empty below two points
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrailFrame {
    /// `None` when the target is missing or has zero area
    pub surface: Option<TrailSurface>,
    /// Always shown, whatever the target state
    pub debug_text: String,
    pub notice: Option<TrailError>,
}

/// Path data for an ordered polyline: `M{x},{y}` then ` L{x},{y}` per point.
pub fn path_data(points: &[PixelPoint]) -> Result<String, TrailError> {
    let (first, rest) = match points {
        [first, rest @ ..] if !rest.is_empty() => (first, rest),
        _ => return Err(TrailError::InsufficientPoints),
    };
    let mut path = format!("M{},{}", first.x, first.y);
    for p in rest {
        let _ = write!(path, " L{},{}", p.x, p.y);
    }
    Ok(path)
}

/// `Points: ` followed by every point's normalized coordinates.
pub fn debug_text(points: &PointSnapshot) -> String {
    let listing: Vec<String> = points
        .iter()
        .map(|e| format!("{}: ({:.2}, {:.2})", e.key, e.point.x, e.point.y))
        .collect();
    format!("Points: {}", listing.join(", "))
}

pub fn build_frame(points: &PointSnapshot, snapshot: &LayoutSnapshot) -> TrailFrame {
    let notice = (points.len() < 2).then_some(TrailError::InsufficientPoints);
    let surface = snapshot.drawable_target().ok().map(|rect| {
        let pixels = CoordinateMapper::map_all(points.iter().map(|e| &e.point), &rect);
        TrailSurface {
            origin: [rect.left, rect.viewport_top(&snapshot.scroll)],
            size: [rect.width, rect.height],
            clip: ClipBand::for_rect(&rect, &snapshot.scroll),
            path: path_data(&pixels).unwrap_or_default(),
            points: pixels,
        }
    });
    TrailFrame {
        surface,
        debug_text: debug_text(points),
        notice,
    }
}

/// Trail layer, rebuilt when either the layout or the point set changes.
#[derive(Default)]
pub struct TrailRenderer {
    cached: Option<((u64, u64), TrailFrame)>,
}

impl TrailRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, points: &PointSnapshot, snapshot: &LayoutSnapshot) -> &TrailFrame {
        let key = (snapshot.generation, points.revision());
        let fresh = matches!(self.cached, Some((k, _)) if k == key);
        if !fresh {
            log::trace!("trail: rebuilding for layout #{} points r{}", key.0, key.1);
            self.cached = None;
        }
        &self
            .cached
            .get_or_insert_with(|| (key, build_frame(points, snapshot)))
            .1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryError, NormalizedPoint};
    use crate::points::NamedPointSet;
    use pretty_assertions::assert_eq;

    fn layout(rect: Result<TargetRect, GeometryError>, scroll_top: f32) -> LayoutSnapshot {
        LayoutSnapshot {
            generation: 1,
            target: rect,
            scroll: ScrollWindow {
                scroll_top,
                viewport_height: 600.0,
            },
        }
    }

    fn square(side: f32) -> TargetRect {
        TargetRect {
            width: side,
            height: side,
            top: 0.0,
            left: 0.0,
        }
    }

    #[test]
    fn unit_diagonal_on_100px_square() {
        let mut set = NamedPointSet::from_points([
            ("point1", NormalizedPoint::new(0.0, 0.0)),
            ("point2", NormalizedPoint::new(1.0, 1.0)),
        ]);
        let frame = build_frame(&set.snapshot(), &layout(Ok(square(100.0)), 0.0));
        let surface = frame.surface.unwrap();
        assert_eq!(surface.path, "M0,0 L100,100");
        assert_eq!(frame.notice, None);
        assert_eq!(frame.debug_text, "Points: point1: (0.00, 0.00), point2: (1.00, 1.00)");
    }

    #[test]
    fn polyline_keeps_insertion_order_and_does_not_close() {
        let points = [
            PixelPoint { x: 10.0, y: 5.5 },
            PixelPoint { x: 0.0, y: 20.0 },
            PixelPoint { x: 30.0, y: 0.0 },
        ];
        assert_eq!(path_data(&points).unwrap(), "M10,5.5 L0,20 L30,0");
    }

    #[test]
    fn fewer_than_two_points_gives_empty_path_and_notice() {
        let mut set = NamedPointSet::from_points([("only", NormalizedPoint::new(0.25, 0.5))]);
        let frame = build_frame(&set.snapshot(), &layout(Ok(square(100.0)), 0.0));
        assert_eq!(frame.surface.unwrap().path, "");
        assert_eq!(frame.notice, Some(TrailError::InsufficientPoints));
        assert_eq!(frame.debug_text, "Points: only: (0.25, 0.50)");
        assert_eq!(
            TrailError::InsufficientPoints.to_string(),
            "Not enough points to draw a path"
        );

        let mut empty = NamedPointSet::new();
        let frame = build_frame(&empty.snapshot(), &layout(Ok(square(100.0)), 0.0));
        assert_eq!(frame.debug_text, "Points: ");
        assert_eq!(path_data(&[]), Err(TrailError::InsufficientPoints));
    }

    #[test]
    fn missing_target_still_shows_debug_text() {
        let mut set = NamedPointSet::default();
        let frame = build_frame(&set.snapshot(), &layout(Err(GeometryError::NotFound), 0.0));
        assert!(frame.surface.is_none());
        assert_eq!(frame.debug_text, "Points: point1: (0.10, 0.10), point2: (0.90, 0.90)");

        let frame = build_frame(&set.snapshot(), &layout(Ok(square(0.0)), 0.0));
        assert!(frame.surface.is_none());
    }

    #[test]
    fn surface_tracks_scroll_and_clips_to_visible_band() {
        let rect = TargetRect {
            width: 400.0,
            height: 1000.0,
            top: 100.0,
            left: 16.0,
        };
        let mut set = NamedPointSet::default();
        let frame = build_frame(&set.snapshot(), &layout(Ok(rect), 300.0));
        let surface = frame.surface.unwrap();
        assert_eq!(surface.origin, [16.0, -200.0]);
        assert_eq!(surface.size, [400.0, 1000.0]);
        assert_eq!(surface.clip, ClipBand { top: 200.0, bottom: 800.0 });
        // Points stay in surface pixels regardless of scroll
        assert_eq!(surface.points[0], PixelPoint { x: 40.0, y: 100.0 });

        let above = build_frame(&set.snapshot(), &layout(Ok(rect), 2000.0));
        assert!(above.surface.unwrap().clip.is_empty());
    }

    #[test]
    fn renderer_rebuilds_on_point_edits() {
        let mut set = NamedPointSet::default();
        let mut trail = TrailRenderer::new();
        let snapshot = layout(Ok(square(100.0)), 0.0);

        let before = trail.render(&set.snapshot(), &snapshot).clone();
        set.add_point();
        let after = trail.render(&set.snapshot(), &snapshot).clone();
        assert_ne!(before, after);
        assert_eq!(after.surface.unwrap().path, "M10,10 L90,90 L50,50");
    }
}
