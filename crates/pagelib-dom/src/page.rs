//! Page - a document paired with its window
//!
//! The window carries everything the transforms need from a browser: viewport
//! and scroll position, a virtual clock with timers, listener registration,
//! layout boxes, and image download bookkeeping. Each `Page` is independent;
//! nothing here is process-global.

use std::rc::Rc;
use std::time::Duration;

use crate::{
    DOMRect, Document, DomTree, Event, EventTarget, EventType, LayoutMap, ListenerOptions,
    ListenerRegistry, NodeId, Subscription, TimerId, TimerQueue, Viewport,
};

/// Upper bound on timers run by one flush, guards against self-rescheduling loops
const MAX_FLUSHED_TIMERS: usize = 10_000;

/// Browser window state for one page
#[derive(Debug)]
pub struct Window {
    viewport: Viewport,
    scroll_y: f64,
    now: Duration,
    timers: TimerQueue,
    listeners: ListenerRegistry,
    layout: LayoutMap,
    image_requests: Vec<NodeId>,
}

impl Window {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll_y: 0.0,
            now: Duration::ZERO,
            timers: TimerQueue::new(),
            listeners: ListenerRegistry::new(),
            layout: LayoutMap::new(),
            image_requests: Vec::new(),
        }
    }

    /// window.innerHeight
    pub fn inner_height(&self) -> f64 {
        self.viewport.height
    }

    /// window.innerWidth
    pub fn inner_width(&self) -> f64 {
        self.viewport.width
    }

    /// window.scrollY
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Layout boxes (document coordinates)
    pub fn layout(&self) -> &LayoutMap {
        &self.layout
    }

    /// Layout boxes, for the host to update
    pub fn layout_mut(&mut self) -> &mut LayoutMap {
        &mut self.layout
    }

    /// Listener table
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Queued timers
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }
}

/// A document and its window
#[derive(Debug)]
pub struct Page {
    pub document: Document,
    pub window: Window,
}

impl Page {
    pub fn new(document: Document, viewport: Viewport) -> Self {
        Self {
            document,
            window: Window::new(viewport),
        }
    }

    /// DOM tree
    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    /// DOM tree (mutable)
    pub fn tree_mut(&mut self) -> &mut DomTree {
        self.document.tree_mut()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// addEventListener; keep the returned handle to unsubscribe
    pub fn add_event_listener<F>(&mut self, target: EventTarget, event_type: EventType, handler: F, options: ListenerOptions) -> Subscription
    where
        F: Fn(&mut Page, &Event) + 'static,
    {
        self.window.listeners.add(target, event_type, Rc::new(handler), options)
    }

    /// removeEventListener by handle
    pub fn remove_event_listener(&mut self, subscription: &Subscription) -> bool {
        self.window.listeners.remove(subscription)
    }

    /// Dispatch to listeners registered on the event's exact target
    ///
    /// Returns the number of handlers invoked. A listener removed by an
    /// earlier handler in the same dispatch is skipped.
    pub fn dispatch_event(&mut self, event: Event) -> usize {
        let handlers = self.window.listeners.take_matching(event.target, event.event_type);
        tracing::trace!(event = event.event_type.name(), listeners = handlers.len(), "dispatch");

        let mut invoked = 0;
        for (id, once, handler) in handlers {
            if !once && !self.window.listeners.contains(id) {
                continue;
            }
            handler(self, &event);
            invoked += 1;
        }
        invoked
    }

    /// Simulate a user click on an element
    pub fn click(&mut self, node: NodeId) -> usize {
        self.dispatch_event(Event::new(EventType::Click, EventTarget::Node(node)))
    }

    /// Scroll the window and fire `scroll`
    pub fn scroll_to(&mut self, y: f64) -> usize {
        self.window.scroll_y = y.max(0.0);
        self.dispatch_event(Event::new(EventType::Scroll, EventTarget::Window))
    }

    /// Resize the viewport and fire `resize`
    pub fn resize(&mut self, viewport: Viewport) -> usize {
        self.window.viewport = viewport;
        self.dispatch_event(Event::new(EventType::Resize, EventTarget::Window))
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.window.now
    }

    /// setTimeout
    pub fn set_timeout<F>(&mut self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce(&mut Page) + 'static,
    {
        let deadline = self.window.now + delay;
        self.window.timers.schedule(deadline, Box::new(callback))
    }

    /// clearTimeout
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.window.timers.cancel(id)
    }

    /// Move the clock forward, running every timer that comes due
    ///
    /// Returns the number of timers run.
    pub fn advance_clock(&mut self, by: Duration) -> usize {
        let target = self.window.now + by;
        let mut ran = 0;
        while let Some((_, deadline, callback)) = self.window.timers.pop_due(target) {
            self.window.now = self.window.now.max(deadline);
            callback(self);
            ran += 1;
        }
        self.window.now = target;
        ran
    }

    /// Run queued timers until none remain, jumping the clock to each deadline
    pub fn flush_timers(&mut self) -> usize {
        let mut ran = 0;
        while let Some(deadline) = self.window.timers.next_deadline() {
            if ran >= MAX_FLUSHED_TIMERS {
                tracing::warn!(ran, "timer flush stopped; timers keep rescheduling");
                break;
            }
            let now = self.window.now.max(deadline);
            if let Some((_, _, callback)) = self.window.timers.pop_due(now) {
                self.window.now = now;
                callback(self);
                ran += 1;
            }
        }
        ran
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    /// Record that an element started downloading its `src`
    pub fn request_image(&mut self, node: NodeId) {
        tracing::trace!(%node, src = ?self.tree().get_attribute(node, "src"), "image requested");
        self.window.image_requests.push(node);
    }

    /// Elements with a download in flight
    pub fn pending_image_requests(&self) -> &[NodeId] {
        &self.window.image_requests
    }

    /// Finish every in-flight download, firing `load` on each element
    pub fn complete_image_loads(&mut self) -> usize {
        let requests = std::mem::take(&mut self.window.image_requests);
        let count = requests.len();
        for node in requests {
            self.dispatch_event(Event::new(EventType::Load, EventTarget::Node(node)));
        }
        count
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Element is rendered: no inline `display: none` on it or an ancestor
    pub fn is_displayed(&self, node: NodeId) -> bool {
        let tree = self.tree();
        tree.get(node).is_some()
            && std::iter::once(node)
                .chain(tree.ancestors(node))
                .all(|n| !tree.is_display_none(n))
    }

    /// getBoundingClientRect: layout box relative to the viewport
    ///
    /// Undisplayed elements and elements without layout get an empty rect.
    pub fn bounding_client_rect(&self, node: NodeId) -> DOMRect {
        if !self.is_displayed(node) {
            return DOMRect::new();
        }
        self.window.layout
            .get(node)
            .map(|rect| rect.translate(0.0, -self.window.scroll_y))
            .unwrap_or_default()
    }

    /// Element has a non-empty box
    pub fn is_visible(&self, node: NodeId) -> bool {
        !self.bounding_client_rect(node).is_empty()
    }
}
