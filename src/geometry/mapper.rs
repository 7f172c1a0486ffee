//! Normalized ↔ pixel conversion against a [`TargetRect`].

use super::{GeometryError, NormalizedPoint, PixelPoint, TargetRect};

/// Stateless conversion between normalized and pixel space.
pub struct CoordinateMapper;

impl CoordinateMapper {
    /// Pixel position relative to the rect's own top-left. Callers add
    /// `rect.left`/`rect.top` only when positioning an absolute layer.
    pub fn to_pixel(point: NormalizedPoint, rect: &TargetRect) -> PixelPoint {
        PixelPoint {
            x: point.x * rect.width,
            y: point.y * rect.height,
        }
    }

    /// Inverse of [`CoordinateMapper::to_pixel`].
    pub fn to_normalized(pixel: PixelPoint, rect: &TargetRect) -> Result<NormalizedPoint, GeometryError> {
        if rect.is_degenerate() {
            return Err(GeometryError::DegenerateRect);
        }
        Ok(NormalizedPoint {
            x: pixel.x / rect.width,
            y: pixel.y / rect.height,
        })
    }

    /// Map a sequence of points, preserving order.
    pub fn map_all<'a>(
        points: impl IntoIterator<Item = &'a NormalizedPoint>,
        rect: &TargetRect,
    ) -> Vec<PixelPoint> {
        points
            .into_iter()
            .map(|p| Self::to_pixel(*p, rect))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(width: f32, height: f32) -> TargetRect {
        TargetRect {
            width,
            height,
            top: 40.0,
            left: 7.0,
        }
    }

    #[test]
    fn to_pixel_scales_each_axis() {
        let r = rect(200.0, 50.0);
        let p = CoordinateMapper::to_pixel(NormalizedPoint::new(0.25, 0.5), &r);
        assert_eq!(p, PixelPoint { x: 50.0, y: 25.0 });
        // Offsets are not applied
        let origin = CoordinateMapper::to_pixel(NormalizedPoint::new(0.0, 0.0), &r);
        assert_eq!(origin, PixelPoint { x: 0.0, y: 0.0 });
    }

    #[test]
    fn to_pixel_is_linear_per_axis() {
        let r = rect(320.0, 180.0);
        let a = NormalizedPoint::new(0.2, 0.9);
        let b = NormalizedPoint::new(0.6, 0.3);
        let sum = CoordinateMapper::to_pixel(NormalizedPoint::new(a.x + b.x, a.y + b.y), &r);
        let pa = CoordinateMapper::to_pixel(a, &r);
        let pb = CoordinateMapper::to_pixel(b, &r);
        assert!((sum.x - (pa.x + pb.x)).abs() < 1e-3);
        assert!((sum.y - (pa.y + pb.y)).abs() < 1e-3);

        // Changing x never moves y
        let moved = CoordinateMapper::to_pixel(NormalizedPoint::new(0.95, 0.9), &r);
        assert_eq!(moved.y, pa.y);
    }

    #[test]
    fn out_of_range_points_are_not_clamped() {
        let p = CoordinateMapper::to_pixel(NormalizedPoint::new(-0.5, 1.5), &rect(100.0, 100.0));
        assert_eq!(p, PixelPoint { x: -50.0, y: 150.0 });
    }

    #[test]
    fn inverse_round_trip_and_degenerate_rect() {
        let r = rect(400.0, 100.0);
        let n = CoordinateMapper::to_normalized(PixelPoint { x: 100.0, y: 75.0 }, &r).unwrap();
        assert_eq!(n, NormalizedPoint::new(0.25, 0.75));

        assert_eq!(
            CoordinateMapper::to_normalized(PixelPoint { x: 1.0, y: 1.0 }, &rect(0.0, 100.0)),
            Err(GeometryError::DegenerateRect)
        );
    }
}
