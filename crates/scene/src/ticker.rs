//! Frame ticker.
//!
//! The host drives [`Ticker::tick`] once per rendered frame with the elapsed
//! time; subscribers receive a [`TickEvent`].

use crate::signal::{Emitter, Subscription};
use std::rc::Rc;

/// Elapsed time since the previous frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    /// Milliseconds since the previous tick
    pub delta_ms: f64,
}

/// Per-frame tick source shared between subscribers
#[derive(Debug, Default)]
pub struct Ticker {
    emitter: Emitter<TickEvent>,
    elapsed_ms: std::cell::Cell<f64>,
}

impl Ticker {
    /// Create a shared ticker
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Subscribe to ticks. The listener is removed when the returned
    /// subscription is disposed or dropped.
    pub fn subscribe(self: &Rc<Self>, listener: impl Fn(&TickEvent) + 'static) -> Subscription {
        let id = self.emitter.add(listener);
        let weak = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(ticker) = weak.upgrade() {
                ticker.emitter.remove(id);
            }
        })
    }

    /// Advance by one frame. Negative or non-finite deltas are clamped to zero
    pub fn tick(&self, delta_ms: f64) {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.max(0.0)
        } else {
            0.0
        };
        self.elapsed_ms.set(self.elapsed_ms.get() + delta_ms);
        self.emitter.emit(&TickEvent { delta_ms });
    }

    /// Total time delivered so far
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms.get()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.emitter.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscribers_receive_deltas_until_disposed() {
        let ticker = Ticker::new();
        let total = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&total);
        let sub = ticker.subscribe(move |evt| sink.set(sink.get() + evt.delta_ms));

        ticker.tick(16.0);
        ticker.tick(17.0);
        assert_eq!(total.get(), 33.0);

        sub.dispose();
        ticker.tick(100.0);
        assert_eq!(total.get(), 33.0);
        assert_eq!(ticker.subscriber_count(), 0);
        assert_eq!(ticker.elapsed_ms(), 133.0);
    }

    #[test]
    fn bad_deltas_are_clamped() {
        let ticker = Ticker::new();
        ticker.tick(-5.0);
        ticker.tick(f64::NAN);
        assert_eq!(ticker.elapsed_ms(), 0.0);
    }
}
