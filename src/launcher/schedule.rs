//! One-shot delayed callbacks keyed by fire time.
//!
//! Entries are kept sorted by fire time; entries sharing a fire time pop in
//! the order they were scheduled.
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEntry<E> {
    pub fire_at: Duration,
    pub event: E,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    entries: VecDeque<ScheduledEntry<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, fire_at: Duration, event: E) {
        let idx = self.entries.partition_point(|e| e.fire_at <= fire_at);
        self.entries.insert(idx, ScheduledEntry { fire_at, event });
    }

    pub fn schedule_after(&mut self, now: Duration, delay: Duration, event: E) {
        self.schedule_at(now.saturating_add(delay), event);
    }

    /// Removes and returns the earliest entry if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledEntry<E>> {
        if self.entries.front()?.fire_at <= now {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn next_fire_time(&self) -> Option<Duration> {
        self.entries.front().map(|e| e.fire_at)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ScheduledEntry<E>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
