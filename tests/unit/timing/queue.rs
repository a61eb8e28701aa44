use super::*;

#[test]
fn fires_in_due_then_insertion_order() {
    let epoch = Epoch(1);
    let mut queue = TimerQueue::new();
    queue.schedule(Millis(30), epoch, "c");
    queue.schedule(Millis(10), epoch, "a");
    queue.schedule(Millis(10), epoch, "b");

    assert_eq!(queue.advance(Millis(5), epoch), Vec::<(Millis, &str)>::new());
    // a and b share a due time; insertion order breaks the tie.
    assert_eq!(
        queue.advance(Millis(10), epoch),
        vec![(Millis(10), "a"), (Millis(10), "b")]
    );
    assert_eq!(queue.advance(Millis(100), epoch), vec![(Millis(30), "c")]);
    assert!(queue.is_empty());
}

#[test]
fn pop_due_reports_the_entry_due_time_not_the_poll_time() {
    let epoch = Epoch(0);
    let mut queue = TimerQueue::new();
    queue.schedule(Millis(40), epoch, "late");

    // Polling far past the due time still anchors the task at 40.
    assert_eq!(queue.pop_due(Millis(9000), epoch), Some((Millis(40), "late")));
    assert_eq!(queue.pop_due(Millis(9000), epoch), None);
}

#[test]
fn stale_epoch_entries_are_dropped_not_fired() {
    let mut queue = TimerQueue::new();
    queue.schedule(Millis(10), Epoch(1), "old");
    queue.schedule(Millis(10), Epoch(2), "new");

    assert_eq!(
        queue.advance(Millis(20), Epoch(2)),
        vec![(Millis(10), "new")]
    );
    assert!(queue.is_empty());
}

#[test]
fn cancel_is_a_tombstone() {
    let epoch = Epoch(0);
    let mut queue = TimerQueue::new();
    let keep = queue.schedule(Millis(5), epoch, 1);
    let drop = queue.schedule(Millis(5), epoch, 2);
    queue.cancel(drop);

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.advance(Millis(5), epoch), vec![(Millis(5), 1)]);

    // Cancelling an already-fired id is a no-op.
    queue.cancel(keep);
    assert_eq!(queue.advance(Millis(10), epoch), Vec::<(Millis, i32)>::new());
}

#[test]
fn cancelling_unknown_ids_leaves_no_tombstone() {
    let epoch = Epoch(0);
    let mut queue = TimerQueue::new();
    let fired = queue.schedule(Millis(5), epoch, ());
    assert_eq!(queue.advance(Millis(5), epoch).len(), 1);

    // Fired and never-issued ids do not grow the tombstone set.
    queue.cancel(fired);
    queue.cancel(TimerId(999));
    assert!(queue.cancelled.is_empty());
}

#[test]
fn cancel_epoch_drops_only_that_generation() {
    let mut queue = TimerQueue::new();
    queue.schedule(Millis(10), Epoch(1), "old a");
    queue.schedule(Millis(20), Epoch(1), "old b");
    queue.schedule(Millis(15), Epoch(2), "kept");

    queue.cancel_epoch(Epoch(1));
    assert_eq!(queue.len(), 1);
    assert_eq!(
        queue.advance(Millis(100), Epoch(2)),
        vec![(Millis(15), "kept")]
    );
}

#[test]
fn cancel_epoch_prunes_dangling_tombstones() {
    let mut queue = TimerQueue::new();
    let old = queue.schedule(Millis(10), Epoch(1), ());
    queue.cancel(old);

    queue.cancel_epoch(Epoch(1));
    assert!(queue.is_empty());
    assert!(queue.cancelled.is_empty());
}

#[test]
fn repeating_refires_until_deadline() {
    let epoch = Epoch(0);
    let mut queue = TimerQueue::new();
    queue
        .schedule_repeating(Millis(10), 10, Millis(45), epoch, "tick")
        .unwrap();

    // Fires at 10, 20, 30, 40; 50 is past the deadline.
    let first: Vec<Millis> = queue
        .advance(Millis(25), epoch)
        .into_iter()
        .map(|(due, _)| due)
        .collect();
    assert_eq!(first, vec![Millis(10), Millis(20)]);
    assert_eq!(queue.advance(Millis(100), epoch).len(), 2);
    assert!(queue.is_empty());
}

#[test]
fn repeating_rejects_zero_interval() {
    let mut queue: TimerQueue<()> = TimerQueue::new();
    assert!(
        queue
            .schedule_repeating(Millis(0), 0, Millis(100), Epoch(0), ())
            .is_err()
    );
}

#[test]
fn cancel_stops_repeating_entries() {
    let epoch = Epoch(0);
    let mut queue = TimerQueue::new();
    let id = queue
        .schedule_repeating(Millis(10), 10, Millis(1000), epoch, "tick")
        .unwrap();

    assert_eq!(queue.advance(Millis(10), epoch).len(), 1);
    queue.cancel(id);
    assert_eq!(queue.advance(Millis(1000), epoch).len(), 0);
}

#[test]
fn next_due_skips_cancelled() {
    let epoch = Epoch(0);
    let mut queue = TimerQueue::new();
    let early = queue.schedule(Millis(5), epoch, ());
    queue.schedule(Millis(9), epoch, ());

    assert_eq!(queue.next_due(), Some(Millis(5)));
    queue.cancel(early);
    assert_eq!(queue.next_due(), Some(Millis(9)));
}
