//! Fixed-pitch line grid clipped to the target rectangle.

use crate::geometry::{GridSpec, LayoutSnapshot, ScrollWindow, TargetRect};

/// One rendered grid layer.
///
/// Line offsets are local to the layer; `origin` places the layer in the
/// container viewport (`left`, `top - scroll_top`). Lines past the layer's
/// size are clipped by the painter.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    pub origin: [f32; 2],
    pub size: [f32; 2],
    pub columns: usize,
    pub rows: usize,
    /// x of each vertical line
    pub vertical: Vec<f32>,
    /// y of each horizontal line
    pub horizontal: Vec<f32>,
}

impl GridFrame {
    pub fn line_count(&self) -> usize {
        self.vertical.len() + self.horizontal.len()
    }
}

/// Cells needed to cover `extent` at `pitch`.
pub fn cell_count(extent: f32, pitch: f32) -> usize {
    if extent <= 0.0 || pitch <= 0.0 {
        return 0;
    }
    (extent / pitch).ceil() as usize
}

/// Most lines emitted per axis for one frame.
pub const MAX_LINES: usize = 4096;

/// Offsets `i * pitch` of the lines `0..=count` that fall inside
/// `[from, to]`, at most [`MAX_LINES`] of them. The painter clips the
/// partial cells at either end.
pub fn visible_offsets(count: usize, pitch: f32, from: f32, to: f32) -> Vec<f32> {
    if !(pitch > 0.0) || !(to >= from) {
        return Vec::new();
    }
    // Float to int casts saturate, so huge extents stay in range
    let first = (from.max(0.0) / pitch).floor() as usize;
    let last = ((to / pitch).ceil() as usize).min(count);
    if first > last {
        return Vec::new();
    }
    (first..=last)
        .take(MAX_LINES)
        .map(|i| i as f32 * pitch)
        .collect()
}

/// Grid for `rect`. Vertical lines cover the full width; horizontal lines
/// only the part of the rect inside the scroll window.
pub fn build_frame(rect: &TargetRect, spec: &GridSpec, scroll: &ScrollWindow) -> Option<GridFrame> {
    if rect.is_degenerate() {
        return None;
    }
    let columns = cell_count(rect.width, spec.cell_width);
    let rows = cell_count(rect.height, spec.cell_height);
    let band_top = scroll.scroll_top - rect.top;
    let band_bottom = scroll.visible_bottom() - rect.top;
    Some(GridFrame {
        origin: [rect.left, rect.viewport_top(scroll)],
        size: [rect.width, rect.height],
        columns,
        rows,
        vertical: visible_offsets(columns, spec.cell_width, 0.0, rect.width),
        horizontal: visible_offsets(rows, spec.cell_height, band_top, band_bottom),
    })
}

/// Grid layer, rebuilt only when the layout snapshot moves on.
pub struct GridOverlay {
    spec: GridSpec,
    cached: Option<(u64, Option<GridFrame>)>,
}

impl GridOverlay {
    pub fn new(spec: GridSpec) -> Self {
        Self { spec, cached: None }
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    /// Frame for `snapshot`, or `None` when there is nothing to draw.
    pub fn render(&mut self, snapshot: &LayoutSnapshot) -> Option<&GridFrame> {
        let stale = self
            .cached
            .as_ref()
            .map_or(true, |(generation, _)| *generation != snapshot.generation);
        if stale {
            let frame = snapshot
                .drawable_target()
                .ok()
                .and_then(|rect| build_frame(&rect, &self.spec, &snapshot.scroll));
            self.cached = Some((snapshot.generation, frame));
        }
        self.cached.as_ref().and_then(|(_, frame)| frame.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryError;
    use pretty_assertions::assert_eq;

    fn rect(width: f32, height: f32) -> TargetRect {
        TargetRect {
            width,
            height,
            top: 120.0,
            left: 16.0,
        }
    }

    fn window(scroll_top: f32) -> ScrollWindow {
        ScrollWindow {
            scroll_top,
            viewport_height: 600.0,
        }
    }

    fn snapshot(generation: u64, target: Result<TargetRect, GeometryError>, scroll_top: f32) -> LayoutSnapshot {
        LayoutSnapshot {
            generation,
            target,
            scroll: window(scroll_top),
        }
    }

    #[test]
    fn partial_cells_round_up() {
        let frame = build_frame(&rect(95.0, 40.0), &GridSpec::default(), &window(0.0)).unwrap();
        assert_eq!(frame.columns, 10);
        assert_eq!(frame.vertical.len(), 11);
        assert_eq!(frame.vertical.last(), Some(&100.0));
        assert_eq!(frame.rows, 4);
        assert_eq!(frame.horizontal, vec![0.0, 10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn layer_follows_scroll() {
        let frame = build_frame(&rect(50.0, 50.0), &GridSpec::default(), &window(100.0)).unwrap();
        assert_eq!(frame.origin, [16.0, 20.0]);
        assert_eq!(frame.size, [50.0, 50.0]);
    }

    #[test]
    fn degenerate_or_missing_target_draws_nothing() {
        let mut grid = GridOverlay::new(GridSpec::default());
        assert!(grid.render(&snapshot(1, Ok(rect(0.0, 30.0)), 0.0)).is_none());
        assert!(grid.render(&snapshot(2, Err(GeometryError::NotFound), 0.0)).is_none());
        assert!(build_frame(&rect(30.0, 0.0), &GridSpec::default(), &window(0.0)).is_none());
    }

    #[test]
    fn rerenders_on_new_generation_only() {
        let mut grid = GridOverlay::new(GridSpec {
            cell_width: 25.0,
            cell_height: 25.0,
        });
        let first = grid.render(&snapshot(1, Ok(rect(100.0, 100.0)), 0.0)).cloned().unwrap();
        assert_eq!(first.columns, 4);

        // Same generation: the cached frame wins even if handed other data
        let same = grid.render(&snapshot(1, Ok(rect(200.0, 100.0)), 0.0)).cloned().unwrap();
        assert_eq!(same, first);

        let next = grid.render(&snapshot(2, Ok(rect(200.0, 100.0)), 0.0)).cloned().unwrap();
        assert_eq!(next.columns, 8);
    }

    #[test]
    fn cell_count_edges() {
        assert_eq!(cell_count(100.0, 10.0), 10);
        assert_eq!(cell_count(100.1, 10.0), 11);
        assert_eq!(cell_count(0.0, 10.0), 0);
        assert_eq!(cell_count(5.0, 0.0), 0);
    }

    #[test]
    fn unbounded_rects_draw_nothing() {
        for (width, height) in [(500.0, f32::INFINITY), (f32::INFINITY, 40.0), (f32::NAN, 40.0)] {
            assert!(build_frame(&rect(width, height), &GridSpec::default(), &window(0.0)).is_none());
        }
    }

    #[test]
    fn huge_rects_emit_only_paintable_lines() {
        let frame = build_frame(&rect(1e30, 1e30), &GridSpec::default(), &window(0.0)).unwrap();
        assert_eq!(frame.vertical.len(), MAX_LINES);
        // rect.top is 120, so the 600px window shows local rows 0..=48
        assert_eq!(frame.horizontal.len(), 49);
        assert_eq!(frame.horizontal.last(), Some(&480.0));
    }

    #[test]
    fn horizontal_lines_follow_the_scroll_window() {
        let frame = build_frame(&rect(100.0, 5000.0), &GridSpec::default(), &window(1120.0)).unwrap();
        assert_eq!(frame.rows, 500);
        assert_eq!(frame.horizontal.first(), Some(&1000.0));
        assert_eq!(frame.horizontal.last(), Some(&1600.0));
        assert_eq!(frame.vertical.len(), 11);

        // Scrolled past the rect: no horizontal lines left to paint
        let past = build_frame(&rect(100.0, 50.0), &GridSpec::default(), &window(2000.0)).unwrap();
        assert!(past.horizontal.is_empty());
    }
}
