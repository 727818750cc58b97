//! Pointer and touch event stream.
//!
//! The host pushes raw window events (page pixels) into a
//! [`PointerEventBus`]; listeners get the event together with the current
//! viewport. Everything runs on the frame-loop thread: listeners fire
//! immediately on dispatch, there is no queue and the last write wins.
//! A callback may add or remove listeners; the change applies from the next
//! dispatch. A callback that dispatches into the bus is not re-entered.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::warn;
use nalgebra::Vector2;

pub type NVec2 = Vector2<f64>;

/// Window size and scroll offset used to normalize page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Page pixels to normalized device coordinates, y up
    pub fn normalize(&self, page_x: f64, page_y: f64) -> NVec2 {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        NVec2::new(
            ((page_x - self.scroll_x) / w) * 2.0 - 1.0,
            -((page_y - self.scroll_y) / h) * 2.0 + 1.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    MouseMove { page_x: f64, page_y: f64 },
    TouchMove { touches: Vec<[f64; 2]> }, // page coordinates per active touch
}

impl PointerEvent {
    pub fn kind(&self) -> PointerEventKind {
        match self {
            PointerEvent::MouseMove { .. } => PointerEventKind::MouseMove,
            PointerEvent::TouchMove { .. } => PointerEventKind::TouchMove,
        }
    }

    /// Page position that drives the pointer: the mouse, or the first touch
    pub fn primary_position(&self) -> Option<[f64; 2]> {
        match self {
            PointerEvent::MouseMove { page_x, page_y } => Some([*page_x, *page_y]),
            PointerEvent::TouchMove { touches } => touches.first().copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    MouseMove,
    TouchMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Rc<RefCell<dyn FnMut(&PointerEvent, &Viewport)>>;

struct Listener {
    id: ListenerId,
    kind: PointerEventKind,
    callback: Callback,
}

pub struct PointerEventBus {
    viewport: Cell<Viewport>,
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

impl PointerEventBus {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Cell::new(viewport),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    pub fn add_listener<F>(&self, kind: PointerEventKind, callback: F) -> ListenerId
    where
        F: FnMut(&PointerEvent, &Viewport) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            kind,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    /// Returns false when `id` was not registered (already removed)
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn dispatch(&self, event: &PointerEvent) {
        if let PointerEvent::TouchMove { touches } = event {
            if touches.is_empty() {
                warn!("touch move without touch points ignored");
                return;
            }
        }
        let viewport = self.viewport.get();
        let kind = event.kind();

        // snapshot first so callbacks can (un)subscribe
        let callbacks: Vec<Callback> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.callback.clone())
            .collect();

        for callback in callbacks {
            match callback.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(event, &viewport),
                Err(_) => warn!("listener dispatched into the bus from its own callback; skipped"),
            };
        }
    }
}

impl std::fmt::Debug for PointerEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerEventBus")
            .field("viewport", &self.viewport.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn normalize_maps_corners_and_scroll() {
        let mut vp = Viewport::new(200.0, 100.0);
        assert_eq!(vp.normalize(0.0, 0.0), NVec2::new(-1.0, 1.0));
        assert_eq!(vp.normalize(200.0, 100.0), NVec2::new(1.0, -1.0));
        assert_eq!(vp.normalize(100.0, 50.0), NVec2::new(0.0, 0.0));

        vp.scroll_y = 100.0;
        assert_eq!(vp.normalize(100.0, 150.0), NVec2::new(0.0, 0.0));
    }

    #[test]
    fn listeners_only_see_their_kind() {
        let bus = PointerEventBus::new(Viewport::new(100.0, 100.0));
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        let id = bus.add_listener(PointerEventKind::TouchMove, move |_, _| seen.set(seen.get() + 1));

        bus.dispatch(&PointerEvent::MouseMove { page_x: 1.0, page_y: 1.0 });
        bus.dispatch(&PointerEvent::TouchMove { touches: vec![[1.0, 1.0]] });
        bus.dispatch(&PointerEvent::TouchMove { touches: vec![] });
        assert_eq!(hits.get(), 1);

        assert!(bus.remove_listener(id));
        assert!(!bus.remove_listener(id));
        bus.dispatch(&PointerEvent::TouchMove { touches: vec![[1.0, 1.0]] });
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn callbacks_may_change_subscriptions() {
        let bus = Rc::new(PointerEventBus::new(Viewport::new(100.0, 100.0)));
        let hits = Rc::new(Cell::new(0));

        // removes itself and subscribes a new listener on first call
        let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let (weak_bus, slot, seen) = (Rc::downgrade(&bus), own_id.clone(), hits.clone());
        let id = bus.add_listener(PointerEventKind::MouseMove, move |_, _| {
            seen.set(seen.get() + 1);
            if let (Some(bus), Some(id)) = (weak_bus.upgrade(), slot.get()) {
                bus.remove_listener(id);
                let later = seen.clone();
                bus.add_listener(PointerEventKind::MouseMove, move |_, _| later.set(later.get() + 10));
            }
        });
        own_id.set(Some(id));

        bus.dispatch(&PointerEvent::MouseMove { page_x: 1.0, page_y: 1.0 });
        assert_eq!(hits.get(), 1);
        assert_eq!(bus.listener_count(), 1);

        bus.dispatch(&PointerEvent::MouseMove { page_x: 2.0, page_y: 2.0 });
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn nested_dispatch_does_not_reenter() {
        let bus = Rc::new(PointerEventBus::new(Viewport::new(100.0, 100.0)));
        let hits = Rc::new(Cell::new(0));
        let (weak_bus, seen) = (Rc::downgrade(&bus), hits.clone());
        bus.add_listener(PointerEventKind::MouseMove, move |ev, _| {
            seen.set(seen.get() + 1);
            if let Some(bus) = weak_bus.upgrade() {
                bus.dispatch(ev);
            }
        });

        bus.dispatch(&PointerEvent::MouseMove { page_x: 1.0, page_y: 1.0 });
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn first_touch_drives_the_pointer() {
        let ev = PointerEvent::TouchMove {
            touches: vec![[10.0, 20.0], [30.0, 40.0]],
        };
        assert_eq!(ev.primary_position(), Some([10.0, 20.0]));
    }
}
