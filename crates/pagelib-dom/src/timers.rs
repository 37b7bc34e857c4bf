//! Timer queue (setTimeout / clearTimeout)
//!
//! Deadlines are offsets on the page's virtual clock. Timers with equal
//! deadlines run in scheduling order.

use std::time::Duration;

use crate::Page;

/// Timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// One-shot timer callback
pub type TimerCallback = Box<dyn FnOnce(&mut Page)>;

struct TimerEntry {
    id: TimerId,
    deadline: Duration,
    callback: TimerCallback,
}

/// Pending timers for one page
#[derive(Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a callback at an absolute deadline
    pub fn schedule(&mut self, deadline: Duration, callback: TimerCallback) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(TimerEntry { id, deadline, callback });
        id
    }

    /// Cancel a timer; false when it already ran or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() < before
    }

    /// Earliest deadline, if any timer is queued
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, Duration, TimerCallback)> {
        let index = self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(index, _)| index)?;
        let entry = self.entries.remove(index);
        Some((entry.id, entry.deadline, entry.callback))
    }

    /// Check whether a timer is still queued
    pub fn contains(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.entries.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> TimerCallback {
        Box::new(|_: &mut Page| {})
    }

    #[test]
    fn test_pop_due_orders_by_deadline_then_id() {
        let mut queue = TimerQueue::new();
        let late = queue.schedule(Duration::from_millis(50), noop());
        let first = queue.schedule(Duration::from_millis(10), noop());
        let second = queue.schedule(Duration::from_millis(10), noop());

        let now = Duration::from_millis(100);
        assert_eq!(queue.pop_due(now).map(|(id, _, _)| id), Some(first));
        assert_eq!(queue.pop_due(now).map(|(id, _, _)| id), Some(second));
        assert_eq!(queue.pop_due(now).map(|(id, _, _)| id), Some(late));
        assert!(queue.pop_due(now).is_none());
    }

    #[test]
    fn test_not_due_yet() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(100), noop());
        assert!(queue.pop_due(Duration::from_millis(99)).is_none());
        assert_eq!(queue.next_deadline(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(Duration::ZERO, noop());
        assert!(queue.contains(id));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(queue.is_empty());
    }
}
