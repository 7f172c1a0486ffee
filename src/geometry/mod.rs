//! Measured geometry shared by every overlay.
//!
//! All coordinates here are container content coordinates: the origin is the
//! top-left of the scroll container's content, so a [`TargetRect`] does not
//! move when the container scrolls. Only [`ScrollWindow`] does.

pub mod debounce;
pub mod mapper;
pub mod observer;

use thiserror::Error;

/// Position as a fraction of the target rectangle. Not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pixel position relative to the target rectangle's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

/// Geometry of the target element, in container content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetRect {
    pub width: f32,
    pub height: f32,
    pub top: f32,
    pub left: f32,
}

impl TargetRect {
    /// Zero-area or unbounded rectangles have nothing to draw into.
    pub fn is_degenerate(&self) -> bool {
        // NaN fails both comparisons
        !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite()
    }

    /// Top edge in viewport coordinates for a given scroll offset.
    pub fn viewport_top(&self, scroll: &ScrollWindow) -> f32 {
        self.top - scroll.scroll_top
    }
}

/// Visible vertical band of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollWindow {
    pub scroll_top: f32,
    pub viewport_height: f32,
}

impl ScrollWindow {
    pub fn visible_bottom(&self) -> f32 {
        self.scroll_top + self.viewport_height
    }
}

/// Pixel pitch of the grid overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cell_width: 10.0,
            cell_height: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// No element of the fragment matches the target selector
    #[error("target element not found in fragment")]
    NotFound,
    /// The target has zero, infinite or NaN width or height
    #[error("target rectangle has no drawable area")]
    DegenerateRect,
}

/// One measurement generation. Grid, trail and picker all read the same
/// snapshot, so they can never disagree about the layout they draw over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSnapshot {
    pub generation: u64,
    pub target: Result<TargetRect, GeometryError>,
    pub scroll: ScrollWindow,
}

impl LayoutSnapshot {
    /// State before the fragment has ever been measured.
    pub fn unmeasured() -> Self {
        Self {
            generation: 0,
            target: Err(GeometryError::NotFound),
            scroll: ScrollWindow::default(),
        }
    }

    /// The target rectangle, if there is something to draw into.
    pub fn drawable_target(&self) -> Result<TargetRect, GeometryError> {
        let rect = self.target?;
        if rect.is_degenerate() {
            return Err(GeometryError::DegenerateRect);
        }
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_rects_are_not_drawable() {
        let mut snapshot = LayoutSnapshot::unmeasured();
        assert_eq!(snapshot.drawable_target(), Err(GeometryError::NotFound));

        snapshot.target = Ok(TargetRect {
            width: 100.0,
            height: 0.0,
            top: 5.0,
            left: 5.0,
        });
        assert_eq!(snapshot.drawable_target(), Err(GeometryError::DegenerateRect));

        snapshot.target = Ok(TargetRect {
            width: 100.0,
            height: 20.0,
            top: 5.0,
            left: 5.0,
        });
        assert!(snapshot.drawable_target().is_ok());

        for (width, height) in [(f32::INFINITY, 20.0), (100.0, f32::NAN), (100.0, f32::INFINITY)] {
            snapshot.target = Ok(TargetRect {
                width,
                height,
                top: 0.0,
                left: 0.0,
            });
            assert_eq!(snapshot.drawable_target(), Err(GeometryError::DegenerateRect));
        }
    }

    #[test]
    fn viewport_top_subtracts_scroll() {
        let rect = TargetRect {
            width: 10.0,
            height: 10.0,
            top: 120.0,
            left: 0.0,
        };
        let scroll = ScrollWindow {
            scroll_top: 100.0,
            viewport_height: 600.0,
        };
        assert_eq!(rect.viewport_top(&scroll), 20.0);
        assert_eq!(scroll.visible_bottom(), 700.0);
    }
}
