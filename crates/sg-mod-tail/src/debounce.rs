//! Coalesce bursts of triggers into at most one pending action per key.
//!
//! The scheduler owns no thread and never sleeps. The event loop asks for
//! [`Debouncer::next_deadline`] to size its wait and calls
//! [`Debouncer::take_due`] on every tick. A due entry leaves the pending set
//! before it is handed back, so an action that requests the same key again
//! arms a fresh timer instead of being swallowed.
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Pending<A> {
    deadline: Instant,
    action: A,
}

pub struct Debouncer<K, A = ()> {
    pending: HashMap<K, Pending<A>>,
}

impl<K, A> Default for Debouncer<K, A> {
    fn default() -> Self {
        Self { pending: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone, A> Debouncer<K, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer for `key` unless one is already pending.
    ///
    /// A pending timer is never reset, extended or duplicated; the call is a
    /// no-op and `action` is dropped. Returns whether a timer was armed.
    pub fn request(&mut self, key: K, delay: Duration, action: A, now: Instant) -> bool {
        if self.pending.contains_key(&key) {
            return false;
        }
        self.pending.insert(key, Pending { deadline: now + delay, action });
        true
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Void the pending timer for `key`. Returns whether one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Earliest deadline among pending timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Remove and return every entry whose deadline has passed, oldest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, A)> {
        let due_keys: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, _)| k.clone())
            .collect();
        let mut due: Vec<(Instant, K, A)> = due_keys
            .into_iter()
            .filter_map(|k| self.pending.remove(&k).map(|p| (p.deadline, k, p.action)))
            .collect();
        due.sort_by_key(|(deadline, _, _)| *deadline);
        due.into_iter().map(|(_, k, a)| (k, a)).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn burst_collapses_into_one_timer() {
        let mut d: Debouncer<&str> = Debouncer::new();
        let t0 = Instant::now();
        assert!(d.request("a", DELAY, (), t0));
        for i in 1..50 {
            assert!(!d.request("a", DELAY, (), t0 + Duration::from_millis(i * 5)));
        }
        assert_eq!(d.len(), 1);
        assert!(d.take_due(t0 + Duration::from_millis(499)).is_empty());
        assert_eq!(d.take_due(t0 + DELAY).len(), 1);
        assert!(d.is_empty());
    }

    #[test]
    fn pending_timer_is_not_extended() {
        let mut d: Debouncer<u8> = Debouncer::new();
        let t0 = Instant::now();
        d.request(1, DELAY, (), t0);
        d.request(1, DELAY, (), t0 + Duration::from_millis(400));
        assert_eq!(d.next_deadline(), Some(t0 + DELAY));
    }

    #[test]
    fn keys_are_independent() {
        let mut d: Debouncer<u8> = Debouncer::new();
        let t0 = Instant::now();
        d.request(1, DELAY, (), t0);
        d.request(2, DELAY, (), t0 + Duration::from_millis(100));
        let due: Vec<u8> = d.take_due(t0 + DELAY).into_iter().map(|(k, _)| k).collect();
        assert_eq!(due, vec![1]);
        assert!(d.is_pending(&2));
    }

    #[test]
    fn first_action_wins_later_ones_are_dropped() {
        let mut d: Debouncer<u8, &str> = Debouncer::new();
        let t0 = Instant::now();
        d.request(1, DELAY, "first", t0);
        d.request(1, DELAY, "second", t0);
        assert_eq!(d.take_due(t0 + DELAY), vec![(1, "first")]);
    }

    #[test]
    fn action_reading_state_at_fire_time_sees_latest_value() {
        let state = Rc::new(Cell::new(0));
        let mut d: Debouncer<u8, Box<dyn FnOnce() -> i32>> = Debouncer::new();
        let t0 = Instant::now();
        let s = Rc::clone(&state);
        d.request(1, DELAY, Box::new(move || s.get()), t0);
        state.set(1);
        d.request(1, DELAY, Box::new(|| -1), t0);
        state.set(7);
        let fired: Vec<i32> = d.take_due(t0 + DELAY).into_iter().map(|(_, action)| action()).collect();
        assert_eq!(fired, vec![7]);
    }

    #[test]
    fn action_may_rearm_its_own_key() {
        let mut d: Debouncer<u8> = Debouncer::new();
        let t0 = Instant::now();
        d.request(1, DELAY, (), t0);
        let fire_at = t0 + DELAY;
        for (key, ()) in d.take_due(fire_at) {
            assert!(d.request(key, DELAY, (), fire_at));
        }
        assert_eq!(d.next_deadline(), Some(fire_at + DELAY));
    }

    #[test]
    fn cancel_voids_pending_timer() {
        let mut d: Debouncer<u8> = Debouncer::new();
        let t0 = Instant::now();
        d.request(1, DELAY, (), t0);
        assert!(d.cancel(&1));
        assert!(!d.cancel(&1));
        assert!(d.take_due(t0 + DELAY * 4).is_empty());
        assert_eq!(d.next_deadline(), None);
    }

    #[test]
    fn fire_rate_is_bounded_by_delay() {
        let mut d: Debouncer<u8> = Debouncer::new();
        let t0 = Instant::now();
        let mut fired = 0;
        // one trigger every 10ms for 2 seconds
        for step in 0..=200u64 {
            let now = t0 + Duration::from_millis(step * 10);
            fired += d.take_due(now).len();
            d.request(1, DELAY, (), now);
        }
        assert!(fired <= 4, "fired {} times in 2s", fired);
        assert!(fired >= 3);
    }
}
