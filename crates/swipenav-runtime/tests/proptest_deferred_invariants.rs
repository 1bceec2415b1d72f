//! Property-based invariant tests for the deferred task queue.
//!
//! 1. Drained tasks come out in deadline order, ties in insertion order
//! 2. Only tasks of the live generation are returned; each at most once
//! 3. Nothing due later than `now` is drained
//! 4. `retain_generation` leaves only live tasks behind

use proptest::prelude::*;
use swipenav_core::GestureGeneration;
use swipenav_runtime::DeferredQueue;
use web_time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Job {
    delay_ms: u64,
    generation: u32,
}

fn arb_jobs() -> impl Strategy<Value = Vec<Job>> {
    prop::collection::vec(
        (0u64..500, 0u32..3).prop_map(|(delay_ms, generation)| Job {
            delay_ms,
            generation,
        }),
        0..48,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn drain_is_ordered_and_generation_filtered(
        jobs in arb_jobs(),
        live in 0u32..3,
        now_ms in 0u64..600,
    ) {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        for (id, job) in jobs.iter().enumerate() {
            q.schedule(
                t0,
                Duration::from_millis(job.delay_ms),
                GestureGeneration::new(job.generation),
                id,
            );
        }

        let drained = q.drain_due(t0 + Duration::from_millis(now_ms), GestureGeneration::new(live));

        let mut expected: Vec<usize> = jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| j.delay_ms <= now_ms && j.generation == live)
            .map(|(id, _)| id)
            .collect();
        expected.sort_by_key(|&id| (jobs[id].delay_ms, id));
        prop_assert_eq!(&drained, &expected);

        let not_due = jobs.iter().filter(|j| j.delay_ms > now_ms).count();
        prop_assert_eq!(q.len(), not_due);
        if let Some(deadline) = q.next_deadline() {
            prop_assert!(deadline > t0 + Duration::from_millis(now_ms));
        }

        // A second drain at the same instant returns nothing.
        prop_assert!(q.drain_due(t0 + Duration::from_millis(now_ms), GestureGeneration::new(live)).is_empty());
    }

    #[test]
    fn retain_keeps_only_live_generation(jobs in arb_jobs(), live in 0u32..3) {
        let t0 = Instant::now();
        let mut q = DeferredQueue::new();
        for job in &jobs {
            q.schedule(t0, Duration::from_millis(job.delay_ms), GestureGeneration::new(job.generation), job.generation);
        }
        let live_count = jobs.iter().filter(|j| j.generation == live).count();
        let dropped = q.retain_generation(GestureGeneration::new(live));
        prop_assert_eq!(dropped, jobs.len() - live_count);
        prop_assert_eq!(q.len(), live_count);

        let all = q.drain_due(t0 + Duration::from_secs(1), GestureGeneration::new(live));
        prop_assert_eq!(all.len(), live_count);
        prop_assert!(all.iter().all(|&g| g == live));
    }
}
