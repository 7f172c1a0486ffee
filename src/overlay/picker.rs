//! Pointer-driven element picking inside the fragment.
//!
//! The host owns a [`PointerHub`] and dispatches pointer events into it.
//! An [`ElementPicker`] registers with the hub only while detection is on;
//! its [`Subscription`] unregisters itself when dropped, so turning detection
//! off or tearing the picker down cannot leave a listener behind.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::render::fragment::{Fragment, NodeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Pointer entered `target`
    Over { target: NodeRef },
    /// Pointer left `target` for `related`, `None` when it left the content
    Out {
        target: NodeRef,
        related: Option<NodeRef>,
    },
    Click { target: NodeRef },
}

/// What the picker reports to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickEvent {
    Hover(Option<NodeRef>),
    Click(NodeRef),
}

type Listener = Box<dyn FnMut(&PointerEvent, &Fragment)>;

struct Slot {
    /// Cleared by the subscription's drop; the slot is swept afterwards
    alive: Rc<Cell<bool>>,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    slots: Vec<Slot>,
}

impl Registry {
    fn sweep(&mut self) {
        self.slots.retain(|s| s.alive.get());
    }
}

/// Fan-out point for pointer events over the fragment.
#[derive(Default)]
pub struct PointerHub {
    registry: Rc<RefCell<Registry>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&PointerEvent, &Fragment) + 'static) -> Subscription {
        let alive = Rc::new(Cell::new(true));
        self.registry.borrow_mut().slots.push(Slot {
            alive: Rc::clone(&alive),
            listener: Box::new(listener),
        });
        Subscription {
            alive,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().slots.iter().filter(|s| s.alive.get()).count()
    }

    /// Deliver `event` to every live listener, with the fragment current now.
    ///
    /// A listener may drop its own or another subscription while being
    /// called; the dropped listener is skipped from then on and removed
    /// once the dispatch ends. Subscribing from inside a listener panics.
    pub fn dispatch(&self, event: &PointerEvent, fragment: &Fragment) {
        let mut registry = self.registry.borrow_mut();
        for slot in registry.slots.iter_mut() {
            if slot.alive.get() {
                (slot.listener)(event, fragment);
            }
        }
        registry.sweep();
    }
}

/// Registration guard. Dropping it removes the listener.
pub struct Subscription {
    alive: Rc<Cell<bool>>,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.alive.set(false);
        // Mid-dispatch the registry is busy; dispatch sweeps the slot instead
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                registry.sweep();
            }
        }
    }
}

/// Reports hovered and clicked elements while enabled.
#[derive(Default)]
pub struct ElementPicker {
    subscription: Option<Subscription>,
    /// Filled by the hub listener, emptied by [`ElementPicker::drain`]
    queue: Rc<RefCell<Vec<PickEvent>>>,
}

impl ElementPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn set_enabled(&mut self, hub: &PointerHub, enabled: bool) {
        if enabled == self.is_enabled() {
            return;
        }
        if enabled {
            let queue = Rc::clone(&self.queue);
            self.subscription = Some(hub.subscribe(move |event, fragment| {
                if let Some(pick) = translate(event, fragment) {
                    queue.borrow_mut().push(pick);
                }
            }));
        } else {
            self.subscription = None;
            // Nothing queued before the switch-off should surface later
            self.queue.borrow_mut().clear();
        }
    }

    /// Reports delivered since the last drain, oldest first.
    pub fn drain(&self) -> Vec<PickEvent> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

fn translate(event: &PointerEvent, fragment: &Fragment) -> Option<PickEvent> {
    match *event {
        PointerEvent::Over { target } => fragment.contains(target).then_some(PickEvent::Hover(Some(target))),
        PointerEvent::Out { target, related } => {
            if !fragment.contains(target) {
                return None;
            }
            // Moving between elements is reported by the following Over
            match related {
                Some(next) if fragment.contains(next) => None,
                _ => Some(PickEvent::Hover(None)),
            }
        }
        PointerEvent::Click { target } => fragment.contains(target).then_some(PickEvent::Click(target)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MARKUP: &str = r#"<div class="p-4"><p>one</p><p>two</p></div>"#;

    fn fragment(generation: u64) -> Fragment {
        Fragment::inject(MARKUP, generation, 300.0, 1.0)
    }

    fn node(fragment: &Fragment, id: usize) -> NodeRef {
        NodeRef {
            generation: fragment.generation(),
            id,
        }
    }

    #[test]
    fn subscription_unregisters_on_drop() {
        let hub = PointerHub::new();
        let sub = hub.subscribe(|_, _| {});
        let _other = hub.subscribe(|_, _| {});
        assert_eq!(hub.listener_count(), 2);
        drop(sub);
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn reports_nothing_while_disabled() {
        let hub = PointerHub::new();
        let picker = ElementPicker::new();
        let frag = fragment(1);
        hub.dispatch(&PointerEvent::Over { target: node(&frag, 1) }, &frag);
        hub.dispatch(&PointerEvent::Click { target: node(&frag, 1) }, &frag);
        assert_eq!(picker.drain(), vec![]);
    }

    #[test]
    fn hover_moves_and_leaves_once() {
        let hub = PointerHub::new();
        let mut picker = ElementPicker::new();
        picker.set_enabled(&hub, true);
        let frag = fragment(1);
        let (a, b) = (node(&frag, 1), node(&frag, 2));

        hub.dispatch(&PointerEvent::Over { target: a }, &frag);
        hub.dispatch(&PointerEvent::Out { target: a, related: Some(b) }, &frag);
        hub.dispatch(&PointerEvent::Over { target: b }, &frag);
        hub.dispatch(&PointerEvent::Out { target: b, related: None }, &frag);
        assert_eq!(
            picker.drain(),
            vec![
                PickEvent::Hover(Some(a)),
                PickEvent::Hover(Some(b)),
                PickEvent::Hover(None),
            ]
        );
    }

    #[test]
    fn clicks_outside_current_fragment_are_ignored() {
        let hub = PointerHub::new();
        let mut picker = ElementPicker::new();
        picker.set_enabled(&hub, true);
        let old = fragment(1);
        let new = fragment(2);

        // A handle from a replaced fragment is not inside the current one
        hub.dispatch(&PointerEvent::Click { target: node(&old, 1) }, &new);
        hub.dispatch(&PointerEvent::Click { target: node(&new, 1) }, &new);
        assert_eq!(picker.drain(), vec![PickEvent::Click(node(&new, 1))]);
    }

    #[test]
    fn disabling_drops_subscription_and_queue() {
        let hub = PointerHub::new();
        let mut picker = ElementPicker::new();
        picker.set_enabled(&hub, true);
        picker.set_enabled(&hub, true);
        assert_eq!(hub.listener_count(), 1);

        let frag = fragment(1);
        hub.dispatch(&PointerEvent::Over { target: node(&frag, 1) }, &frag);
        picker.set_enabled(&hub, false);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(picker.drain(), vec![]);
    }

    #[test]
    fn listener_can_drop_its_own_subscription() {
        let hub = PointerHub::new();
        let own: Rc<RefCell<Option<Subscription>>> = Rc::default();
        let calls = Rc::new(Cell::new(0));
        let sub = hub.subscribe({
            let own = Rc::clone(&own);
            let calls = Rc::clone(&calls);
            move |_, _| {
                calls.set(calls.get() + 1);
                own.borrow_mut().take();
            }
        });
        *own.borrow_mut() = Some(sub);
        let _other = hub.subscribe(|_, _| {});

        let frag = fragment(1);
        hub.dispatch(&PointerEvent::Click { target: node(&frag, 1) }, &frag);
        assert_eq!(hub.listener_count(), 1);
        assert_eq!(hub.registry.borrow().slots.len(), 1);

        hub.dispatch(&PointerEvent::Click { target: node(&frag, 1) }, &frag);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn listener_dropped_mid_dispatch_is_not_called_again() {
        let hub = PointerHub::new();
        let later: Rc<RefCell<Option<Subscription>>> = Rc::default();
        let later_calls = Rc::new(Cell::new(0));
        let _first = hub.subscribe({
            let later = Rc::clone(&later);
            move |_, _| {
                later.borrow_mut().take();
            }
        });
        let sub = hub.subscribe({
            let later_calls = Rc::clone(&later_calls);
            move |_, _| later_calls.set(later_calls.get() + 1)
        });
        *later.borrow_mut() = Some(sub);

        let frag = fragment(1);
        hub.dispatch(&PointerEvent::Over { target: node(&frag, 1) }, &frag);
        assert_eq!(later_calls.get(), 0);
        assert_eq!(hub.listener_count(), 1);
    }
}
