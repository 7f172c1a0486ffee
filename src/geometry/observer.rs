//! Tracks the target element's geometry relative to the scroll container.
//!
//! Resize and content-size triggers go through a [`Debouncer`]; scroll and
//! mode changes are applied without delay. The observer only decides *when*
//! to recompute. Reflowing the fragment is the host's job, after which it
//! hands the fresh layout back to [`GeometryObserver::recompute`].

use std::time::{Duration, Instant};

use super::debounce::{Debouncer, TaskHandle};
use super::{GeometryError, LayoutSnapshot, ScrollWindow, TargetRect};
use crate::render::fragment::{Fragment, TargetSelector};

/// Outer size of the scroll container's viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerSize {
    pub width: f32,
    pub height: f32,
}

impl ContainerSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The scrollable viewport the fragment lives in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollContainer {
    pub viewport: ContainerSize,
    pub scroll_top: f32,
    pub content_height: f32,
    /// Position of the fragment root inside the container's content box
    pub fragment_offset: [f32; 2],
}

impl ScrollContainer {
    pub fn new(viewport: ContainerSize) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height + self.fragment_offset[1] - self.viewport.height).max(0.0)
    }

    /// Set the scroll offset, clamped to the scrollable range. Returns whether
    /// it changed.
    pub fn set_scroll(&mut self, top: f32) -> bool {
        let clamped = top.clamp(0.0, self.max_scroll());
        let changed = clamped != self.scroll_top;
        self.scroll_top = clamped;
        changed
    }

    pub fn scroll_window(&self) -> ScrollWindow {
        ScrollWindow {
            scroll_top: self.scroll_top,
            viewport_height: self.viewport.height,
        }
    }
}

/// Why the host should recompute now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recompute {
    /// Fullscreen (or another layout mode) flipped
    ModeChange,
    /// A debounced resize/content burst settled at this size
    Settled(ContainerSize),
}

pub struct GeometryObserver {
    selector: TargetSelector,
    debounce: Debouncer<ContainerSize>,
    mode_changed: bool,
    snapshot: LayoutSnapshot,
    measurements: u64,
}

impl GeometryObserver {
    pub fn new(selector: TargetSelector, debounce: Duration) -> Self {
        Self {
            selector,
            debounce: Debouncer::new(debounce),
            mode_changed: false,
            snapshot: LayoutSnapshot::unmeasured(),
            measurements: 0,
        }
    }

    pub fn selector(&self) -> &TargetSelector {
        &self.selector
    }

    /// Point the observer at a different target. Takes effect on the next
    /// recomputation.
    pub fn set_selector(&mut self, selector: TargetSelector) {
        self.selector = selector;
    }

    /// Measure the target selected inside `fragment`, relative to the
    /// container's content origin. Reads only.
    pub fn measure(
        container: &ScrollContainer,
        fragment: &Fragment,
        selector: &TargetSelector,
    ) -> Result<TargetRect, GeometryError> {
        let target = fragment.select(selector).ok_or(GeometryError::NotFound)?;
        let bounds = fragment.bounds(target).ok_or(GeometryError::NotFound)?;
        Ok(TargetRect {
            width: bounds.width,
            height: bounds.height,
            top: bounds.y + container.fragment_offset[1],
            left: bounds.x + container.fragment_offset[0],
        })
    }

    /// Container was resized; recompute once the burst settles.
    pub fn observe_resize(&mut self, size: ContainerSize, now: Instant) -> TaskHandle {
        self.defer("resize", size, now)
    }

    /// Fragment content changed size without a container resize. Shares the
    /// resize debounce, so a mixed burst still recomputes once.
    pub fn observe_content_change(&mut self, size: ContainerSize, now: Instant) -> TaskHandle {
        self.defer("content change", size, now)
    }

    fn defer(&mut self, trigger: &str, size: ContainerSize, now: Instant) -> TaskHandle {
        let task = self.debounce.schedule(now, size);
        log::trace!("{} at {:.0}x{:.0} deferred as task {}", trigger, size.width, size.height, task);
        task
    }

    /// A layout mode flipped. Recompute on the next [`GeometryObserver::due`]
    /// without waiting; any pending debounced work is folded into it.
    pub fn observe_mode_change(&mut self) {
        self.mode_changed = true;
    }

    pub fn mode_change_pending(&self) -> bool {
        self.mode_changed
    }

    /// Scroll moved: replace the scroll window immediately, keep the rect.
    pub fn observe_scroll(&mut self, container: &ScrollContainer) -> &LayoutSnapshot {
        let scroll = container.scroll_window();
        if scroll != self.snapshot.scroll {
            self.snapshot = LayoutSnapshot {
                generation: self.snapshot.generation + 1,
                target: self.snapshot.target,
                scroll,
            };
        }
        &self.snapshot
    }

    /// Whether a recomputation is due at `now`.
    pub fn due(&mut self, now: Instant) -> Option<Recompute> {
        if self.mode_changed {
            self.mode_changed = false;
            if let Some(task) = self.debounce.cancel() {
                log::debug!("mode change absorbs task {}", task);
            }
            return Some(Recompute::ModeChange);
        }
        self.debounce.poll(now).map(Recompute::Settled)
    }

    /// Measure and publish a new snapshot. `None` means no fragment has been
    /// injected, which reads as `NotFound`.
    pub fn recompute(&mut self, container: &ScrollContainer, fragment: Option<&Fragment>) -> &LayoutSnapshot {
        let target = match fragment {
            Some(fragment) => Self::measure(container, fragment, &self.selector),
            None => Err(GeometryError::NotFound),
        };
        self.measurements += 1;
        match target {
            Ok(rect) => log::debug!(
                "measure #{}: {:.1}x{:.1} at ({:.1}, {:.1})",
                self.measurements,
                rect.width,
                rect.height,
                rect.left,
                rect.top
            ),
            Err(e) => log::debug!("measure #{}: {}", self.measurements, e),
        }
        self.snapshot = LayoutSnapshot {
            generation: self.snapshot.generation + 1,
            target,
            scroll: container.scroll_window(),
        };
        &self.snapshot
    }

    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    pub fn measurement_count(&self) -> u64 {
        self.measurements
    }

    /// How long until something is due, for scheduling a repaint.
    pub fn pending_delay(&self, now: Instant) -> Option<Duration> {
        if self.mode_changed {
            return Some(Duration::ZERO);
        }
        self.debounce.remaining(now)
    }

    /// Drop any deferred recomputation.
    pub fn cancel_pending(&mut self) {
        self.debounce.cancel();
        self.mode_changed = false;
    }
}
