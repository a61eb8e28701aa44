use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use tracing::debug;

use crate::foundation::core::{Epoch, Millis};
use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// Handle to a scheduled entry, usable for explicit cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
enum Repeat {
    Once,
    /// Re-fires every `every_ms` until `deadline` passes, then stops
    /// unconditionally.
    Every {
        every_ms: u64,
        deadline: Millis,
    },
}

#[derive(Clone, Debug)]
struct Entry<T> {
    due: Millis,
    seq: u64,
    id: TimerId,
    epoch: Epoch,
    repeat: Repeat,
    task: T,
}

// Fire order is (due, seq): deterministic for entries sharing a due time.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

/// Host-agnostic cancellable timer queue.
///
/// Entries are tagged with the epoch current at scheduling time. When the
/// queue is advanced with a newer epoch, stale entries are dropped instead of
/// fired, which makes the "zombie callback mutates superseded state" defect
/// class structurally impossible (no reliance on timers being cleared in
/// time).
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    cancelled: HashSet<TimerId>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_seq: 0,
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot task.
    pub fn schedule(&mut self, due: Millis, epoch: Epoch, task: T) -> TimerId {
        self.push(due, epoch, Repeat::Once, task)
    }

    /// Schedule a bounded repeating task (a per-frame style loop).
    ///
    /// Fires at `first_due`, then every `every_ms`, while the fire time is
    /// `<= deadline`.
    pub fn schedule_repeating(
        &mut self,
        first_due: Millis,
        every_ms: u64,
        deadline: Millis,
        epoch: Epoch,
        task: T,
    ) -> KeepsakeResult<TimerId> {
        if every_ms == 0 {
            return Err(KeepsakeError::validation(
                "repeating timer interval must be > 0",
            ));
        }
        Ok(self.push(first_due, epoch, Repeat::Every { every_ms, deadline }, task))
    }

    fn push(&mut self, due: Millis, epoch: Epoch, repeat: Repeat, task: T) -> TimerId {
        self.next_seq += 1;
        let id = TimerId(self.next_seq);
        self.heap.push(Reverse(Entry {
            due,
            seq: self.next_seq,
            id,
            epoch,
            repeat,
            task,
        }));
        id
    }

    /// Cancel an entry; unknown or already-fired ids are a no-op.
    ///
    /// Repeating entries stop rescheduling as well. A tombstone is recorded
    /// only for ids still scheduled, so the cancelled set never outgrows the
    /// heap.
    pub fn cancel(&mut self, id: TimerId) {
        if self.heap.iter().any(|Reverse(e)| e.id == id) {
            self.cancelled.insert(id);
        }
    }

    /// Drop every entry scheduled under `epoch`.
    ///
    /// Stale entries are already guaranteed no-ops when popped; this frees
    /// them eagerly instead of waiting for their due times to pass.
    pub fn cancel_epoch(&mut self, epoch: Epoch) {
        self.heap.retain(|Reverse(e)| e.epoch != epoch);
        let live: HashSet<TimerId> = self.heap.iter().map(|Reverse(e)| e.id).collect();
        self.cancelled.retain(|id| live.contains(id));
    }

    /// Pop the earliest live entry due at or before `now`, returning its due
    /// time alongside the task.
    ///
    /// Callers must run the task at the returned due time, not at `now`:
    /// any follow-on work it schedules is anchored to when the entry was due,
    /// so a coarse advance replays the same timeline as a fine one. Entries
    /// whose epoch differs from `epoch` are dropped silently; this is the
    /// liveness check every scheduled continuation must pass before it may
    /// mutate state. Repeating entries reschedule themselves while their next
    /// fire time is within the deadline.
    pub fn pop_due(&mut self, now: Millis, epoch: Epoch) -> Option<(Millis, T)> {
        while let Some(Reverse(top)) = self.heap.peek() {
            if top.due > now {
                return None;
            }
            let Reverse(entry) = self.heap.pop()?;
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            if entry.epoch != epoch {
                debug!(
                    entry_epoch = entry.epoch.0,
                    current_epoch = epoch.0,
                    "dropping stale timer entry"
                );
                continue;
            }
            if let Repeat::Every { every_ms, deadline } = entry.repeat {
                let next_due = entry.due.plus(every_ms);
                if next_due <= deadline {
                    self.next_seq += 1;
                    self.heap.push(Reverse(Entry {
                        due: next_due,
                        seq: self.next_seq,
                        id: entry.id,
                        epoch: entry.epoch,
                        repeat: Repeat::Every { every_ms, deadline },
                        task: entry.task.clone(),
                    }));
                }
            }
            return Some((entry.due, entry.task));
        }
        None
    }

    /// Pop every task due at or before `now` as `(due, task)` pairs, in
    /// `(due, seq)` order.
    pub fn advance(&mut self, now: Millis, epoch: Epoch) -> Vec<(Millis, T)> {
        let mut fired = Vec::new();
        while let Some(pair) = self.pop_due(now, epoch) {
            fired.push(pair);
        }
        fired
    }

    /// The due time of the earliest live entry, if any.
    pub fn next_due(&self) -> Option<Millis> {
        self.heap
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.id))
            .map(|Reverse(e)| e.due)
            .min()
    }

    /// Number of scheduled (not yet fired, not cancelled) entries.
    pub fn len(&self) -> usize {
        self.heap
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.id))
            .count()
    }

    /// Return `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/queue.rs"]
mod tests;
