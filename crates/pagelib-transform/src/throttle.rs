//! Throttle - rate-limit a callback on the page clock
//!
//! A queued call runs on a timer. The first call fires on the next timer turn;
//! a call within `period` of the last invocation waits out the rest of the
//! period. Calls made while one is already pending coalesce into it.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pagelib_dom::{Page, TimerId};

struct ThrottleState<R> {
    timer: Option<TimerId>,
    last_invocation: Option<Duration>,
    result: Option<R>,
}

/// Throttled callback
///
/// Cloning yields another handle to the same throttle.
pub struct Throttle<R> {
    period: Duration,
    function: Rc<dyn Fn(&mut Page) -> R>,
    state: Rc<RefCell<ThrottleState<R>>>,
}

impl<R> Clone for Throttle<R> {
    fn clone(&self) -> Self {
        Self {
            period: self.period,
            function: Rc::clone(&self.function),
            state: Rc::clone(&self.state),
        }
    }
}

impl<R: Clone + 'static> Throttle<R> {
    /// Wrap `function` so it runs at most once per `period`
    pub fn wrap<F>(period: Duration, function: F) -> Self
    where
        F: Fn(&mut Page) -> R + 'static,
    {
        Self {
            period,
            function: Rc::new(function),
            state: Rc::new(RefCell::new(ThrottleState {
                timer: None,
                last_invocation: None,
                result: None,
            })),
        }
    }

    /// Request an invocation; returns the result of the last completed one
    pub fn queue(&self, page: &mut Page) -> Option<R> {
        if !self.pending() {
            let delay = self.delay(page);
            let function = Rc::clone(&self.function);
            let state = Rc::clone(&self.state);

            let timer = page.set_timeout(delay, move |page| {
                {
                    let mut state = state.borrow_mut();
                    state.timer = None;
                    state.last_invocation = Some(page.now());
                }
                let result = function(page);
                state.borrow_mut().result = Some(result);
            });

            tracing::trace!(delay_ms = delay.as_millis() as u64, "throttle queued");
            self.state.borrow_mut().timer = Some(timer);
        }
        self.result()
    }

    /// Result of the last completed invocation
    pub fn result(&self) -> Option<R> {
        self.state.borrow().result.clone()
    }

    /// An invocation is scheduled and has not run yet
    pub fn pending(&self) -> bool {
        self.state.borrow().timer.is_some()
    }

    /// Time a call queued now would wait
    pub fn delay(&self, page: &Page) -> Duration {
        throttle_delay(self.period, page.now(), self.state.borrow().last_invocation)
    }

    /// Minimum time between invocations
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Drop a scheduled invocation
    pub fn cancel(&self, page: &mut Page) -> bool {
        let timer = self.state.borrow_mut().timer.take();
        timer.is_some_and(|timer| page.clear_timeout(timer))
    }

    /// Cancel and forget the last invocation and its result
    pub fn reset(&self, page: &mut Page) {
        self.cancel(page);
        let mut state = self.state.borrow_mut();
        state.last_invocation = None;
        state.result = None;
    }
}

impl<R> std::fmt::Debug for Throttle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Throttle")
            .field("period", &self.period)
            .field("pending", &state.timer.is_some())
            .field("last_invocation", &state.last_invocation)
            .finish()
    }
}

/// Wait before the next invocation: none before the first, otherwise the
/// unexpired part of `period`
pub fn throttle_delay(period: Duration, now: Duration, last_invocation: Option<Duration>) -> Duration {
    match last_invocation {
        None => Duration::ZERO,
        Some(last) => period.saturating_sub(now.saturating_sub(last)),
    }
}
