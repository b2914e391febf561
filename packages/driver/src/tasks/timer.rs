use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::Notify;

/// A min-heap of `(deadline, action-id)` pairs, woken by a [`Notify`]
/// whenever a new entry might have become the earliest one. Actual action
/// dispatch (what happens when an id fires) is left to the caller, which
/// polls [`TimerTask::poll_due`] and matches the returned ids against
/// whatever it scheduled them for.
#[derive(Default)]
struct Heap {
    entries: BinaryHeap<Reverse<TimerEntryKey>>,
    cancelled: std::collections::HashSet<u64>,
}

#[derive(PartialEq, Eq)]
struct TimerEntryKey {
    deadline: Instant,
    id: u64,
}
impl PartialOrd for TimerEntryKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for TimerEntryKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.deadline.cmp(&other.deadline).then(self.id.cmp(&other.id))
    }
}

pub struct TimerTask {
    heap: Mutex<Heap>,
    notify: Arc<Notify>,
    next_id: std::sync::atomic::AtomicU64,
}

impl TimerTask {
    pub fn new() -> Self {
        Self {
            heap: Mutex::new(Heap::default()),
            notify: Arc::new(Notify::new()),
            next_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// Schedules an action `delay` from now, returning an id usable with
    /// [`Self::cancel`]. O(log n).
    pub fn schedule(&self, delay: Duration) -> u64 {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let deadline = Instant::now() + delay;
        self.heap
            .lock()
            .unwrap()
            .entries
            .push(Reverse(TimerEntryKey { deadline, id }));
        self.notify.notify_one();
        id
    }

    pub fn cancel(&self, id: u64) {
        self.heap.lock().unwrap().cancelled.insert(id);
    }

    /// Pops every entry whose deadline has passed, skipping cancelled ones.
    pub fn poll_due(&self) -> Vec<u64> {
        let mut heap = self.heap.lock().unwrap();
        let now = Instant::now();
        let mut due = Vec::new();
        while let Some(Reverse(top)) = heap.entries.peek() {
            if top.deadline > now {
                break;
            }
            let Reverse(entry) = heap.entries.pop().unwrap();
            if !heap.cancelled.remove(&entry.id) {
                due.push(entry.id);
            }
        }
        due
    }

    /// How long until the earliest still-pending deadline, if any.
    fn next_wait(&self) -> Option<Duration> {
        let heap = self.heap.lock().unwrap();
        heap.entries
            .peek()
            .map(|Reverse(entry)| entry.deadline.saturating_duration_since(Instant::now()))
    }

    pub fn wake_handle(&self) -> Arc<Notify> {
        self.notify.clone()
    }

    /// Sleeps until the earliest deadline or an external wake signal,
    /// returning the ids that fired.
    pub async fn wait_for_due(&self) -> Vec<u64> {
        loop {
            let due = self.poll_due();
            if !due.is_empty() {
                return due;
            }
            match self.next_wait() {
                Some(wait) => {
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {}
                        _ = self.notify.notified() => {}
                    }
                }
                None => self.notify.notified().await,
            }
        }
    }
}

impl Default for TimerTask {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let timer = TimerTask::new();
        let later = timer.schedule(Duration::from_millis(50));
        let sooner = timer.schedule(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        let due = timer.poll_due();
        assert_eq!(due, vec![sooner]);
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(timer.poll_due(), vec![later]);
    }

    #[test]
    fn cancelled_entries_never_fire() {
        let timer = TimerTask::new();
        let id = timer.schedule(Duration::from_millis(1));
        timer.cancel(id);
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.poll_due().is_empty());
    }

    #[tokio::test]
    async fn wait_for_due_returns_once_deadline_passes() {
        let timer = TimerTask::new();
        let id = timer.schedule(Duration::from_millis(5));
        let due = timer.wait_for_due().await;
        assert_eq!(due, vec![id]);
    }
}
