use super::*;

#[test]
fn test_poll_waits_for_window() {
    let t0 = Instant::now();
    let mut queue = Debounced::new(Duration::from_millis(100));

    queue.schedule(1, t0);
    assert!(queue.is_pending());
    assert_eq!(queue.poll(t0 + Duration::from_millis(99)), None);
    assert_eq!(queue.poll(t0 + Duration::from_millis(100)), Some(1));
    assert!(!queue.is_pending());
    assert_eq!(queue.poll(t0 + Duration::from_secs(5)), None);
}

#[test]
fn test_schedule_replaces_and_restarts_window() {
    let t0 = Instant::now();
    let mut queue = Debounced::new(Duration::from_millis(100));

    queue.schedule("a", t0);
    queue.schedule("b", t0 + Duration::from_millis(80));

    assert_eq!(queue.deadline(), Some(t0 + Duration::from_millis(180)));
    assert_eq!(queue.poll(t0 + Duration::from_millis(150)), None);
    assert_eq!(queue.poll(t0 + Duration::from_millis(180)), Some("b"));
}

#[test]
fn test_cancel_drops_pending_value() {
    let t0 = Instant::now();
    let mut queue = Debounced::new(Duration::from_millis(10));

    assert!(!queue.cancel());
    queue.schedule(7u32, t0);
    assert!(queue.cancel());
    assert_eq!(queue.deadline(), None);
    assert_eq!(queue.poll(t0 + Duration::from_secs(1)), None);
}

#[test]
fn test_zero_window_delivers_on_same_instant() {
    let t0 = Instant::now();
    let mut queue = Debounced::new(Duration::ZERO);

    queue.schedule(3, t0);
    assert_eq!(queue.window(), Duration::ZERO);
    assert_eq!(queue.poll(t0), Some(3));
}
