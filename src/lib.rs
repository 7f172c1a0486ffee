pub mod config;
pub mod dom;
pub mod geometry;
pub mod host;
pub mod overlay;
pub mod points;
pub mod render;

/// Sample fragment shown when no markup file is given.
pub const SAMPLE_MARKUP: &str = include_str!("../assets/about_me.html");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::geometry::observer::ContainerSize;
    use crate::host::RenderHost;
    use crate::points::NamedPointSet;

    #[test]
    fn sample_markup_has_a_drawable_target() {
        let mut host = RenderHost::new(OverlayConfig::default(), ContainerSize::new(1024.0, 600.0)).unwrap();
        let snapshot = *host.inject(SAMPLE_MARKUP);
        let rect = snapshot.drawable_target().unwrap();
        assert_eq!(rect.width, 1024.0);
        assert!(rect.height >= 1000.0);

        let mut points = NamedPointSet::default();
        let overlays = host.overlays(&points.snapshot());
        let grid = overlays.grid.unwrap();
        assert_eq!(grid.columns, 103);
        assert!(overlays.trail.surface.as_ref().unwrap().path.starts_with("M102.4,"));
    }
}
