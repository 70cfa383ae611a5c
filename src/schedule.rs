//! Cancellable deferred actions.
//!
//! Touch gestures need small delays: a press only becomes a selection after
//! it has been held for a moment, and the pointer lingers for a second after a
//! finger lifts. Instead of timers, the controller stores the pending action
//! together with the timestamp it becomes due, and polls it once per frame.

/// An action waiting for its due time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deferred<A> {
    pub action: A,
    pub due_at: f64,
}

impl<A> Deferred<A> {
    #[inline]
    pub fn is_due(&self, now_millis: f64) -> bool {
        now_millis >= self.due_at
    }
}

/// Holds at most one pending action.
///
/// Arming a new action replaces (cancels) whatever was pending.
#[derive(Debug, Clone)]
pub struct DeferredSlot<A> {
    pending: Option<Deferred<A>>,
}

impl<A> Default for DeferredSlot<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> DeferredSlot<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run `delay_millis` after `now_millis`.
    pub fn arm(&mut self, action: A, now_millis: f64, delay_millis: f64) {
        self.pending = Some(Deferred {
            action,
            due_at: now_millis + delay_millis,
        });
    }

    /// Drop the pending action, returning it if there was one.
    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|d| d.action)
    }

    /// Take the pending action if it is due at `now_millis`.
    pub fn take_due(&mut self, now_millis: f64) -> Option<A> {
        if self.pending.as_ref().is_some_and(|d| d.is_due(now_millis)) {
            self.cancel()
        } else {
            None
        }
    }

    #[inline]
    pub fn pending(&self) -> Option<&Deferred<A>> {
        self.pending.as_ref()
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut slot = DeferredSlot::new();
        slot.arm("select", 1000.0, 300.0);

        assert_eq!(slot.take_due(1299.0), None);
        assert!(slot.is_armed());
        assert_eq!(slot.take_due(1300.0), Some("select"));
        assert!(!slot.is_armed());
        assert_eq!(slot.take_due(5000.0), None);
    }

    #[test]
    fn test_rearm_replaces() {
        let mut slot = DeferredSlot::new();
        slot.arm(1, 0.0, 300.0);
        slot.arm(2, 100.0, 1000.0);

        assert_eq!(slot.take_due(400.0), None);
        assert_eq!(slot.pending().map(|d| d.due_at), Some(1100.0));
        assert_eq!(slot.take_due(1100.0), Some(2));
    }

    #[test]
    fn test_cancel() {
        let mut slot = DeferredSlot::new();
        slot.arm((), 0.0, 10.0);
        assert_eq!(slot.cancel(), Some(()));
        assert_eq!(slot.take_due(100.0), None);
    }
}
