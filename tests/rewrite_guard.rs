use std::time::{Duration, Instant};

use surveil::engine::accept_event;

const THRESHOLD: Duration = Duration::from_millis(100);

#[test]
fn insensitive_target_is_always_accepted() {
    let start = Instant::now();
    assert!(accept_event(false, start, start, THRESHOLD));
    assert!(accept_event(
        false,
        start,
        start + Duration::from_millis(1),
        THRESHOLD
    ));
}

#[test]
fn sensitive_target_rejects_inside_window() {
    let start = Instant::now();

    assert!(!accept_event(true, start, start, THRESHOLD));
    assert!(!accept_event(
        true,
        start,
        start + Duration::from_millis(99),
        THRESHOLD
    ));
}

#[test]
fn sensitive_target_accepts_at_and_after_boundary() {
    let start = Instant::now();

    // The window is strict: exactly on the boundary counts as outside.
    assert!(accept_event(true, start, start + THRESHOLD, THRESHOLD));
    assert!(accept_event(
        true,
        start,
        start + Duration::from_millis(250),
        THRESHOLD
    ));
}

#[test]
fn window_restarts_with_the_cycle_clock() {
    let start = Instant::now();
    let after_dispatch = start + Duration::from_secs(10);

    // Long after the first cycle start the event would be accepted, but a
    // dispatch resets the clock and re-opens the discard window.
    assert!(accept_event(true, start, after_dispatch, THRESHOLD));
    assert!(!accept_event(
        true,
        after_dispatch,
        after_dispatch + Duration::from_millis(10),
        THRESHOLD
    ));
}
