//! Window-wide pointer events and the listeners subscribed to them.
//!
//! Widgets that need to keep tracking the pointer after it leaves their
//! bounds subscribe here. A [`Subscription`] removes its listener when
//! dropped, so a listener can never outlive the widget that owns it.

use eframe::egui::{self, Pos2};
use slab::Slab;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Events are delivered in the order they arrived within a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { pos: Pos2 },
    Moved { x: f32 },
    Released,
    TouchStarted { pos: Pos2 },
    TouchMoved { x: f32 },
    TouchEnded,
}

type Listener = Box<dyn FnMut(&PointerEvent)>;

/// A slot is empty only while its listener is running.
type Registry = Slab<Option<Listener>>;

#[derive(Clone, Default)]
pub struct PointerHub {
    registry: Rc<RefCell<Registry>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&PointerEvent) + 'static) -> Subscription {
        let key = self.registry.borrow_mut().insert(Some(Box::new(listener)));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            key,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn dispatch(&self, event: &PointerEvent) {
        let keys: Vec<usize> = self.registry.borrow().iter().map(|(k, _)| k).collect();
        for key in keys {
            // The registry is not borrowed while a listener runs, so listeners
            // may subscribe or drop subscriptions.
            let listener = self
                .registry
                .borrow_mut()
                .get_mut(key)
                .and_then(Option::take);
            let Some(mut listener) = listener else {
                continue;
            };
            listener(event);
            // A dropped subscription leaves no slot (or a reused one) behind.
            let mut registry = self.registry.borrow_mut();
            if let Some(slot) = registry.get_mut(key) {
                if slot.is_none() {
                    *slot = Some(listener);
                }
            }
        }
    }

    /// Translate this frame's raw input into global events and dispatch them.
    pub fn dispatch_input(&self, ctx: &egui::Context) {
        let events = ctx.input(|i| events_from_input(&i.events));
        for event in &events {
            self.dispatch(event);
        }
    }
}

pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    key: usize,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if let Ok(mut registry) = registry.try_borrow_mut() {
            registry.try_remove(self.key);
        };
    }
}

pub fn events_from_input(events: &[egui::Event]) -> Vec<PointerEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerMoved(pos) => Some(PointerEvent::Moved { x: pos.x }),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            } => Some(PointerEvent::Pressed { pos: *pos }),
            egui::Event::PointerButton {
                button: egui::PointerButton::Primary,
                pressed: false,
                ..
            } => Some(PointerEvent::Released),
            egui::Event::Touch {
                phase: egui::TouchPhase::Start,
                pos,
                ..
            } => Some(PointerEvent::TouchStarted { pos: *pos }),
            egui::Event::Touch {
                phase: egui::TouchPhase::Move,
                pos,
                ..
            } => Some(PointerEvent::TouchMoved { x: pos.x }),
            egui::Event::Touch {
                phase: egui::TouchPhase::End | egui::TouchPhase::Cancel,
                ..
            } => Some(PointerEvent::TouchEnded),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dropping_subscription_removes_listener() {
        let hub = PointerHub::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let sub = hub.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(hub.listener_count(), 1);

        hub.dispatch(&PointerEvent::Released);
        assert_eq!(hits.get(), 1);

        drop(sub);
        assert_eq!(hub.listener_count(), 0);
        hub.dispatch(&PointerEvent::Released);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listener_may_drop_a_subscription_while_dispatching() {
        let hub = PointerHub::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = victim.clone();
        let _killer = hub.subscribe(move |_| {
            slot.borrow_mut().take();
        });
        *victim.borrow_mut() = Some(hub.subscribe(|_| {}));
        assert_eq!(hub.listener_count(), 2);

        hub.dispatch(&PointerEvent::TouchEnded);
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = PointerHub::new();
        let sub = hub.subscribe(|_| {});
        drop(hub);
        drop(sub);
    }

    #[test]
    fn translates_in_arrival_order() {
        let events = vec![
            egui::Event::PointerButton {
                pos: egui::pos2(5.0, 1.0),
                button: egui::PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::PointerMoved(egui::pos2(5.0, 1.0)),
            egui::Event::PointerButton {
                pos: egui::pos2(5.0, 1.0),
                button: egui::PointerButton::Primary,
                pressed: false,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::PointerButton {
                pos: egui::pos2(5.0, 1.0),
                button: egui::PointerButton::Secondary,
                pressed: false,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::Touch {
                device_id: egui::TouchDeviceId(0),
                id: egui::TouchId(1),
                phase: egui::TouchPhase::Start,
                pos: egui::pos2(8.0, 2.0),
                force: None,
            },
            egui::Event::Touch {
                device_id: egui::TouchDeviceId(0),
                id: egui::TouchId(1),
                phase: egui::TouchPhase::Move,
                pos: egui::pos2(9.0, 2.0),
                force: None,
            },
            egui::Event::Touch {
                device_id: egui::TouchDeviceId(0),
                id: egui::TouchId(1),
                phase: egui::TouchPhase::End,
                pos: egui::pos2(9.0, 2.0),
                force: None,
            },
        ];
        assert_eq!(
            events_from_input(&events),
            vec![
                PointerEvent::Pressed {
                    pos: egui::pos2(5.0, 1.0)
                },
                PointerEvent::Moved { x: 5.0 },
                PointerEvent::Released,
                PointerEvent::TouchStarted {
                    pos: egui::pos2(8.0, 2.0)
                },
                PointerEvent::TouchMoved { x: 9.0 },
                PointerEvent::TouchEnded,
            ]
        );
    }
}
