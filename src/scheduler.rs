//! Virtual-time task queue driving every delayed visual effect.
//!
//! Nothing here blocks: callers `schedule` plain task values and the frame loop
//! drains whatever is due with `pop_due`. Ordering is by due time, then by
//! insertion, so one caller scheduling with increasing delays observes its
//! tasks in that order. Each entry is stamped with the generation it was
//! scheduled in; `reset` bumps the generation so stale entries can never fire.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// One queued task plus its ordering keys.
struct Entry<T> {
    due_ms: u64,
    seq: u64,
    generation: u32,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

/// Cooperative delayed-task queue with a monotonic virtual clock.
pub struct Scheduler<T> {
    clock_ms: u64,
    seq: u64,
    generation: u32,
    queue: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            clock_ms: 0,
            seq: 0,
            generation: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time. While a popped task is being handled this is the
    /// task's own due time, so follow-up delays chain without frame jitter.
    pub fn now(&self) -> u64 {
        self.clock_ms
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of queued entries belonging to the current generation.
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(e)| e.generation == self.generation)
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Move the clock forward (never backward).
    pub fn advance_to(&mut self, now_ms: u64) {
        if now_ms > self.clock_ms {
            self.clock_ms = now_ms;
        }
    }

    /// Queue `task` to fire `delay_ms` after the current clock.
    pub fn schedule(&mut self, delay_ms: u32, task: T) {
        let entry = Entry {
            due_ms: self.clock_ms.saturating_add(delay_ms as u64),
            seq: self.seq,
            generation: self.generation,
            task,
        };
        self.seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Pop the earliest task due at or before `now_ms`. Entries from an older
    /// generation are discarded on the way.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<T> {
        loop {
            let due = match self.queue.peek() {
                Some(Reverse(e)) if e.due_ms <= now_ms => e.due_ms,
                _ => {
                    self.advance_to(now_ms);
                    return None;
                }
            };
            let Reverse(entry) = self.queue.pop()?;
            if entry.generation != self.generation {
                log::trace!("scheduler: dropped stale task from generation {}", entry.generation);
                continue;
            }
            self.advance_to(due);
            return Some(entry.task);
        }
    }

    /// Start a new generation: queued entries are dropped and any entry that
    /// somehow survives is ignored by `pop_due`.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, now: u64) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some(t) = s.pop_due(now) {
            out.push(t);
        }
        out
    }

    #[test]
    fn fires_in_due_order_then_fifo() {
        let mut s = Scheduler::new();
        s.schedule(30, "c");
        s.schedule(10, "a");
        s.schedule(20, "b1");
        s.schedule(20, "b2");
        assert!(drain(&mut s, 5).is_empty());
        assert_eq!(drain(&mut s, 100), vec!["a", "b1", "b2", "c"]);
        assert!(s.is_idle());
    }

    #[test]
    fn stagger_preserves_list_order() {
        let mut s = Scheduler::new();
        let items = ["one", "two", "three", "four"];
        for (i, item) in items.iter().enumerate().rev() {
            s.schedule((i as u32 + 1) * 400, *item);
        }
        assert_eq!(drain(&mut s, 10_000), items.to_vec());
    }

    #[test]
    fn clock_follows_popped_task() {
        let mut s = Scheduler::new();
        s.schedule(100, "first");
        assert_eq!(s.pop_due(1_000), Some("first"));
        assert_eq!(s.now(), 100);
        // chained from the task's own due time, not the late frame
        s.schedule(50, "second");
        assert_eq!(s.pop_due(1_000), Some("second"));
        assert_eq!(s.now(), 150);
        assert_eq!(s.pop_due(1_000), None);
        assert_eq!(s.now(), 1_000);
    }

    #[test]
    fn reset_drops_pending_and_bumps_generation() {
        let mut s = Scheduler::new();
        s.schedule(10, "old");
        let g = s.generation();
        s.reset();
        assert_eq!(s.generation(), g + 1);
        assert_eq!(s.pending(), 0);
        s.schedule(10, "new");
        assert_eq!(drain(&mut s, 100), vec!["new"]);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut s: Scheduler<&str> = Scheduler::new();
        s.advance_to(500);
        s.advance_to(200);
        assert_eq!(s.now(), 500);
    }
}
