use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use tessel_task::{Task, TaskError, TaskPool};

fn pool() -> TaskPool {
    TaskPool::new("test", 2).unwrap()
}

#[test]
fn spawn_and_finish() {
    let t = pool().spawn(|| 6 * 7);
    assert_eq!(t.finish().unwrap(), 42);
}

#[test]
fn ready_is_finished_immediately() {
    let mut t = Task::ready("x");
    assert!(t.is_finished());
    assert_eq!(t.finish().unwrap(), "x");
}

#[test]
fn poll_reports_completion_without_blocking() {
    let (go_tx, go_rx) = bounded::<()>(1);
    let mut t = pool().spawn(move || {
        let _ = go_rx.recv();
        5
    });
    assert!(!t.is_finished());
    go_tx.send(()).unwrap();
    let start = Instant::now();
    while !t.is_finished() {
        assert!(start.elapsed() < Duration::from_secs(5));
        std::thread::yield_now();
    }
    assert_eq!(t.finish().unwrap(), 5);
}

#[test]
fn panicking_task_reports_panicked() {
    let pool = pool();
    let t = pool.spawn(|| -> u32 { panic!("boom") });
    assert!(matches!(t.finish(), Err(TaskError::Panicked)));
    // pool survives
    assert_eq!(pool.spawn(|| 1).finish().unwrap(), 1);
}

#[test]
fn threads_are_named() {
    let name = pool()
        .spawn(|| std::thread::current().name().map(str::to_owned))
        .finish()
        .unwrap();
    assert!(name.is_some_and(|n| n.starts_with("test-")));
}
