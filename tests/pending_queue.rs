use std::path::PathBuf;

use surveil::engine::PendingQueue;

#[test]
fn enqueue_preserves_arrival_order_and_duplicates() {
    let mut queue = PendingQueue::new();
    assert!(queue.is_empty());

    queue.enqueue("js", PathBuf::from("/p/a.js"));
    queue.enqueue("js", PathBuf::from("/p/b.js"));
    queue.enqueue("js", PathBuf::from("/p/a.js"));

    let snapshot = queue.drain_all();
    assert_eq!(
        snapshot.get("js").unwrap(),
        &vec![
            PathBuf::from("/p/a.js"),
            PathBuf::from("/p/b.js"),
            PathBuf::from("/p/a.js"),
        ]
    );
}

#[test]
fn drain_resets_the_queue() {
    let mut queue = PendingQueue::new();
    queue.enqueue("css", PathBuf::from("/p/a.css"));

    let snapshot = queue.drain_all();
    assert_eq!(snapshot.len(), 1);

    assert!(queue.is_empty());
    assert!(queue.drain_all().is_empty());

    // A path arriving after the drain lands in a fresh cycle's queue.
    queue.enqueue("css", PathBuf::from("/p/b.css"));
    let snapshot = queue.drain_all();
    assert_eq!(snapshot.get("css").unwrap(), &vec![PathBuf::from("/p/b.css")]);
}

#[test]
fn targets_are_kept_separate() {
    let mut queue = PendingQueue::new();
    queue.enqueue("js", PathBuf::from("/p/a.js"));
    queue.enqueue("css", PathBuf::from("/p/a.css"));

    let snapshot = queue.drain_all();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get("js").unwrap().len(), 1);
    assert_eq!(snapshot.get("css").unwrap().len(), 1);
}
