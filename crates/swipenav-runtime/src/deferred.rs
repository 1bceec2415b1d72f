#![forbid(unsafe_code)]

//! Deadline queue for work that must run after an animation.
//!
//! The engines never own timers. They push tasks here with a deadline and
//! the [`GestureGeneration`] that scheduled them; the host calls the
//! engine's `tick(now)` from its frame or timer loop, and the engine drains
//! what is due.
//!
//! # Invariants
//!
//! 1. Tasks come out in deadline order; equal deadlines keep insertion order.
//! 2. A task is returned at most once.
//! 3. A task whose generation differs from the live one is dropped, never
//!    returned.

use swipenav_core::GestureGeneration;
use web_time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry<T> {
    due: Instant,
    seq: u64,
    generation: GestureGeneration,
    task: T,
}

/// Pending deferred tasks for one engine.
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T: std::fmt::Debug> DeferredQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once `delay` has elapsed after `now`.
    pub fn schedule(
        &mut self,
        now: Instant,
        delay: Duration,
        generation: GestureGeneration,
        task: T,
    ) {
        let due = now.checked_add(delay).unwrap_or(now);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.push(Entry {
            due,
            seq,
            generation,
            task,
        });
    }

    /// Remove and return every task due at `now` that belongs to `live`.
    ///
    /// Due tasks from other generations are discarded.
    pub fn drain_due(&mut self, now: Instant, live: GestureGeneration) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].due <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter()
            .filter_map(|entry| {
                if entry.generation == live {
                    Some(entry.task)
                } else {
                    tracing::trace!(
                        target: "swipenav.deferred",
                        task = ?entry.task,
                        scheduled_by = entry.generation.get(),
                        live = live.get(),
                        "dropping stale deferred task"
                    );
                    None
                }
            })
            .collect()
    }

    /// Drop every pending task not scheduled by `live`. Returns how many
    /// were dropped.
    pub fn retain_generation(&mut self, live: GestureGeneration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.generation == live);
        before - self.entries.len()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G1: GestureGeneration = GestureGeneration::new(1);
    const G2: GestureGeneration = GestureGeneration::new(2);

    #[test]
    fn drains_in_deadline_order() {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        q.schedule(t0, Duration::from_millis(300), G1, "late");
        q.schedule(t0, Duration::from_millis(100), G1, "early");
        q.schedule(t0, Duration::from_millis(100), G1, "early-2");
        assert_eq!(q.next_deadline(), Some(t0 + Duration::from_millis(100)));

        assert!(q.drain_due(t0 + Duration::from_millis(99), G1).is_empty());
        assert_eq!(
            q.drain_due(t0 + Duration::from_millis(300), G1),
            vec!["early", "early-2", "late"]
        );
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn stale_generation_is_dropped_when_due() {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        q.schedule(t0, Duration::from_millis(50), G1, 1);
        q.schedule(t0, Duration::from_millis(50), G2, 2);
        assert_eq!(q.drain_due(t0 + Duration::from_millis(60), G2), vec![2]);
        assert!(q.is_empty());
    }

    #[test]
    fn not_yet_due_tasks_survive_drain() {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        q.schedule(t0, Duration::from_millis(10), G1, 'a');
        q.schedule(t0, Duration::from_millis(500), G1, 'b');
        assert_eq!(q.drain_due(t0 + Duration::from_millis(20), G1), vec!['a']);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn retain_generation_purges_others() {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        q.schedule(t0, Duration::ZERO, G1, ());
        q.schedule(t0, Duration::ZERO, G1, ());
        q.schedule(t0, Duration::ZERO, G2, ());
        assert_eq!(q.retain_generation(G2), 2);
        assert_eq!(q.len(), 1);
        q.clear();
        assert!(q.is_empty());
    }
}
