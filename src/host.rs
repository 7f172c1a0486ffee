//! Composition root: owns the scroll container, the injected fragment, and
//! every overlay, and is the only place the fragment is mutated.
//!
//! The host is frame-driven. The embedding UI feeds it container sizes,
//! scroll offsets and pointer positions each frame, then calls
//! [`RenderHost::tick`] so deferred recomputations can fire, and finally
//! asks for [`RenderHost::overlays`] to draw.

use std::time::{Duration, Instant};

use crate::config::{ConfigError, OverlayConfig};
use crate::geometry::observer::{ContainerSize, GeometryObserver, Recompute, ScrollContainer};
use crate::geometry::LayoutSnapshot;
use crate::overlay::grid::{GridFrame, GridOverlay};
use crate::overlay::picker::{ElementPicker, PickEvent, PointerEvent, PointerHub};
use crate::overlay::trail::{TrailFrame, TrailRenderer};
use crate::overlay::HighlightBox;
use crate::points::PointSnapshot;
use crate::render::fragment::{Fragment, NodeRef, TargetSelector};
use crate::render::layout::LayoutBox;

/// Overlay layers for one frame, all derived from the same snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlays<'a> {
    pub generation: u64,
    pub grid: Option<&'a GridFrame>,
    pub trail: &'a TrailFrame,
    pub highlight: Option<HighlightBox>,
}

pub struct RenderHost {
    config: OverlayConfig,
    container: ScrollContainer,
    /// Latest size reported by the UI, applied on the next recompute
    requested: ContainerSize,
    fragment: Option<Fragment>,
    next_generation: u64,
    observer: GeometryObserver,
    grid: GridOverlay,
    trail: TrailRenderer,
    hub: PointerHub,
    picker: ElementPicker,
    /// Innermost element under the pointer, detection or not
    pointer_over: Option<NodeRef>,
    hovered: Option<NodeRef>,
    full_screen: bool,
    text_scale: f32,
}

impl RenderHost {
    pub fn new(config: OverlayConfig, viewport: ContainerSize) -> Result<Self, ConfigError> {
        config.validate()?;
        let observer = GeometryObserver::new(TargetSelector::class(config.target_class.clone()), config.debounce);
        let grid = GridOverlay::new(config.grid);
        Ok(Self {
            config,
            container: ScrollContainer::new(viewport),
            requested: viewport,
            fragment: None,
            next_generation: 1,
            observer,
            grid,
            trail: TrailRenderer::new(),
            hub: PointerHub::new(),
            picker: ElementPicker::new(),
            pointer_over: None,
            hovered: None,
            full_screen: false,
            text_scale: 1.0,
        })
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn container(&self) -> &ScrollContainer {
        &self.container
    }

    pub fn fragment(&self) -> Option<&Fragment> {
        self.fragment.as_ref()
    }

    /// Replace the fragment with `markup` and measure it right away.
    pub fn inject(&mut self, markup: &str) -> &LayoutSnapshot {
        let generation = self.next_generation;
        self.next_generation += 1;

        // Handles into the old fragment are dead now
        self.pointer_over = None;
        self.hovered = None;
        self.picker.drain();

        self.container.viewport = self.requested;
        let fragment = Fragment::inject(markup, generation, self.container.viewport.width, self.text_scale);
        self.container.content_height = fragment.content_height();
        self.container.set_scroll(self.container.scroll_top);

        // Resolve the marker once; reflows keep the generation, so the
        // handle stays valid until the next injection.
        let marker = TargetSelector::class(self.config.target_class.clone());
        let selector = match fragment.select(&marker) {
            Some(node) => TargetSelector::Handle(node),
            None => marker,
        };
        self.observer.set_selector(selector);
        self.fragment = Some(fragment);

        self.observer.cancel_pending();
        self.observer.recompute(&self.container, self.fragment.as_ref())
    }

    /// Report the container's current size. Changes are debounced unless a
    /// mode change is already waiting, which then absorbs them.
    pub fn resize(&mut self, size: ContainerSize, now: Instant) {
        if size == self.requested {
            return;
        }
        self.requested = size;
        if !self.observer.mode_change_pending() {
            self.observer.observe_resize(size, now);
        }
    }

    /// Scroll the container. Overlays follow at once, without re-measuring.
    pub fn scroll_to(&mut self, top: f32) -> &LayoutSnapshot {
        self.container.set_scroll(top);
        self.observer.observe_scroll(&self.container)
    }

    pub fn text_scale(&self) -> f32 {
        self.text_scale
    }

    /// Change the fragment's text scale. Its height changes with it, which
    /// counts as a (debounced) content-size change.
    pub fn set_text_scale(&mut self, scale: f32, now: Instant) {
        let scale = scale.clamp(0.5, 3.0);
        if scale == self.text_scale {
            return;
        }
        self.text_scale = scale;
        self.observer.observe_content_change(self.requested, now);
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    pub fn set_full_screen(&mut self, full_screen: bool) {
        if full_screen == self.full_screen {
            return;
        }
        self.full_screen = full_screen;
        log::info!("Full screen {}", if full_screen { "on" } else { "off" });
        self.observer.observe_mode_change();
    }

    pub fn is_detection_mode(&self) -> bool {
        self.picker.is_enabled()
    }

    pub fn set_detection_mode(&mut self, enabled: bool) {
        if enabled == self.picker.is_enabled() {
            return;
        }
        self.picker.set_enabled(&self.hub, enabled);
        if !enabled {
            self.hovered = None;
        }
        log::info!("Element detection {}", if enabled { "on" } else { "off" });
    }

    /// Run whatever recomputation is due. Returns whether one ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let size = match self.observer.due(now) {
            None => return false,
            Some(Recompute::ModeChange) => self.requested,
            Some(Recompute::Settled(size)) => size,
        };
        self.apply(size);
        true
    }

    fn apply(&mut self, size: ContainerSize) {
        self.container.viewport = size;
        if let Some(fragment) = self.fragment.as_mut() {
            fragment.reflow(size.width, self.text_scale);
            self.container.content_height = fragment.content_height();
        }
        self.container.set_scroll(self.container.scroll_top);
        self.observer.recompute(&self.container, self.fragment.as_ref());
    }

    /// Pointer position in container viewport coordinates, `None` when it is
    /// outside the container.
    pub fn pointer_moved(&mut self, pos: Option<(f32, f32)>) {
        let Some(fragment) = self.fragment.as_ref() else {
            return;
        };
        let hit = pos.and_then(|(x, y)| {
            let [dx, dy] = self.container.fragment_offset;
            fragment.hit_test(x - dx, y + self.container.scroll_top - dy)
        });
        if hit == self.pointer_over {
            return;
        }
        if let Some(target) = self.pointer_over {
            self.hub
                .dispatch(&PointerEvent::Out { target, related: hit }, fragment);
        }
        if let Some(target) = hit {
            self.hub.dispatch(&PointerEvent::Over { target }, fragment);
        }
        self.pointer_over = hit;
        self.pump();
    }

    /// A click at the current pointer position. Returns the picked element
    /// when detection is on and the pointer is over the fragment.
    pub fn pointer_clicked(&mut self) -> Option<NodeRef> {
        let fragment = self.fragment.as_ref()?;
        let target = self.pointer_over?;
        self.hub.dispatch(&PointerEvent::Click { target }, fragment);
        self.pump()
    }

    /// Apply picker reports. Returns the last clicked element, if any.
    fn pump(&mut self) -> Option<NodeRef> {
        let mut clicked = None;
        for event in self.picker.drain() {
            match event {
                PickEvent::Hover(node) => self.hovered = node,
                PickEvent::Click(node) => {
                    let tag = self
                        .fragment
                        .as_ref()
                        .and_then(|f| f.resolve(node))
                        .map_or("?", |n| n.tag.as_str());
                    log::info!("Clicked element: {}", tag);
                    clicked = Some(node);
                }
            }
        }
        clicked
    }

    /// Element currently reported as hovered.
    pub fn hovered(&self) -> Option<NodeRef> {
        self.hovered
    }

    /// Outline for the hovered element.
    pub fn highlight_box(&self) -> Option<HighlightBox> {
        let fragment = self.fragment.as_ref()?;
        let node = self.hovered?;
        let offset = fragment.offset_box(node)?;
        let bounds = fragment.bounds(node)?;
        let [dx, dy] = self.container.fragment_offset;
        Some(HighlightBox {
            offset,
            viewport: LayoutBox {
                x: bounds.x + dx,
                y: bounds.y + dy - self.container.scroll_top,
                width: bounds.width,
                height: bounds.height,
            },
        })
    }

    pub fn overlays(&mut self, points: &PointSnapshot) -> Overlays<'_> {
        let highlight = self.highlight_box();
        let snapshot = *self.observer.snapshot();
        Overlays {
            generation: snapshot.generation,
            grid: self.grid.render(&snapshot),
            trail: self.trail.render(points, &snapshot),
            highlight,
        }
    }

    pub fn snapshot(&self) -> &LayoutSnapshot {
        self.observer.snapshot()
    }

    /// Time until the next deferred recomputation, for scheduling a repaint.
    pub fn pending_delay(&self, now: Instant) -> Option<Duration> {
        self.observer.pending_delay(now)
    }

    pub fn measurement_count(&self) -> u64 {
        self.observer.measurement_count()
    }
}
