//! Events and listener registration
//!
//! Registering a listener hands back a [`Subscription`]; removal goes through
//! that handle, never through closure identity. Events do not bubble: a
//! listener fires only for the exact target it was registered on.

use std::any::Any;
use std::rc::Rc;

use crate::{NodeId, Page};

/// Event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Scroll,
    Resize,
    Load,
    Error,
    /// Application-defined event (`CustomEvent`)
    Custom(&'static str),
}

impl EventType {
    /// DOM event name
    pub fn name(&self) -> &'static str {
        match self {
            EventType::Click => "click",
            EventType::Scroll => "scroll",
            EventType::Resize => "resize",
            EventType::Load => "load",
            EventType::Error => "error",
            EventType::Custom(name) => name,
        }
    }
}

/// Where an event is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(NodeId),
}

/// A dispatched event
#[derive(Clone)]
pub struct Event {
    pub event_type: EventType,
    pub target: EventTarget,
    detail: Option<Rc<dyn Any>>,
}

impl Event {
    pub fn new(event_type: EventType, target: EventTarget) -> Self {
        Self { event_type, target, detail: None }
    }

    /// `CustomEvent` carrying a typed detail payload
    pub fn custom<T: Any>(name: &'static str, target: EventTarget, detail: T) -> Self {
        Self {
            event_type: EventType::Custom(name),
            target,
            detail: Some(Rc::new(detail)),
        }
    }

    /// Detail payload, if present and of type `T`
    pub fn detail<T: Any>(&self) -> Option<&T> {
        self.detail.as_ref()?.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("target", &self.target)
            .field("has_detail", &self.detail.is_some())
            .finish()
    }
}

/// Listener callback
pub type Handler = Rc<dyn Fn(&mut Page, &Event)>;

/// Listener identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Handle returned by registration; pass it back to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub id: ListenerId,
    pub target: EventTarget,
    pub event_type: EventType,
}

/// Listener options
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    /// Remove the listener after its first dispatch
    pub once: bool,
}

impl ListenerOptions {
    pub const ONCE: ListenerOptions = ListenerOptions { once: true };
}

struct RegisteredListener {
    subscription: Subscription,
    once: bool,
    handler: Handler,
}

/// Listener table for one page
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<RegisteredListener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add(&mut self, target: EventTarget, event_type: EventType, handler: Handler, options: ListenerOptions) -> Subscription {
        self.next_id += 1;
        let subscription = Subscription {
            id: ListenerId(self.next_id),
            target,
            event_type,
        };
        self.listeners.push(RegisteredListener {
            subscription,
            once: options.once,
            handler,
        });
        subscription
    }

    /// Remove a listener; false when it was already gone
    pub fn remove(&mut self, subscription: &Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.subscription.id != subscription.id);
        self.listeners.len() < before
    }

    /// Check whether a listener is still registered
    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.subscription.id == id)
    }

    /// Snapshot handlers for a dispatch, dropping `once` listeners
    ///
    /// Returns (id, once, handler) in registration order.
    pub fn take_matching(&mut self, target: EventTarget, event_type: EventType) -> Vec<(ListenerId, bool, Handler)> {
        let matching: Vec<_> = self.listeners
            .iter()
            .filter(|l| l.subscription.target == target && l.subscription.event_type == event_type)
            .map(|l| (l.subscription.id, l.once, Rc::clone(&l.handler)))
            .collect();

        self.listeners.retain(|l| {
            !(l.once && l.subscription.target == target && l.subscription.event_type == event_type)
        });

        matching
    }

    /// Listeners registered for a target/type pair
    pub fn count(&self, target: EventTarget, event_type: EventType) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.subscription.target == target && l.subscription.event_type == event_type)
            .count()
    }

    /// Total registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        Rc::new(|_: &mut Page, _: &Event| {})
    }

    #[test]
    fn test_remove_by_subscription() {
        let mut registry = ListenerRegistry::new();
        let a = registry.add(EventTarget::Window, EventType::Scroll, noop(), ListenerOptions::default());
        let b = registry.add(EventTarget::Window, EventType::Scroll, noop(), ListenerOptions::default());

        assert_ne!(a.id, b.id);
        assert!(registry.remove(&a));
        assert!(!registry.remove(&a));
        assert_eq!(registry.count(EventTarget::Window, EventType::Scroll), 1);
    }

    #[test]
    fn test_once_listeners_are_dropped_on_take() {
        let mut registry = ListenerRegistry::new();
        let target = EventTarget::Node(NodeId(4));
        registry.add(target, EventType::Load, noop(), ListenerOptions::ONCE);
        registry.add(target, EventType::Load, noop(), ListenerOptions::default());

        assert_eq!(registry.take_matching(target, EventType::Load).len(), 2);
        assert_eq!(registry.count(target, EventType::Load), 1);
    }

    #[test]
    fn test_custom_detail() {
        let event = Event::custom("section-toggled", EventTarget::Window, 7u32);
        assert_eq!(event.event_type.name(), "section-toggled");
        assert_eq!(event.detail::<u32>(), Some(&7));
        assert!(event.detail::<String>().is_none());
    }
}
