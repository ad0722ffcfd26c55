use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[test]
fn frame_request_is_taken_once() {
    let runtime = StdRuntime::new();
    assert!(!runtime.take_frame_request());

    runtime.scheduler().schedule_frame();

    assert!(runtime.take_frame_request());
    assert!(!runtime.take_frame_request());
}

#[test]
fn frame_waker_runs_until_cleared() {
    let runtime = StdRuntime::new();
    let wakes = Arc::new(AtomicUsize::new(0));
    runtime.set_frame_waker({
        let wakes = Arc::clone(&wakes);
        move || {
            wakes.fetch_add(1, Ordering::SeqCst);
        }
    });

    runtime.scheduler().schedule_frame();
    runtime.scheduler().schedule_frame();
    assert_eq!(wakes.load(Ordering::SeqCst), 2);

    runtime.clear_frame_waker();
    runtime.scheduler().schedule_frame();
    assert_eq!(wakes.load(Ordering::SeqCst), 2);
    assert!(runtime.take_frame_request());
}

#[test]
fn clock_measures_elapsed_time() {
    let clock = StdRuntime::new().clock();
    let start = clock.now();
    thread::sleep(Duration::from_millis(5));
    assert!(clock.elapsed_millis(start) >= 5);
    assert!(clock.elapsed(start) >= Duration::from_millis(5));
}

#[test]
fn requests_raised_before_pickup_collapse() {
    let scheduler = StdScheduler::new();
    scheduler.schedule_frame();
    scheduler.schedule_frame();
    assert!(scheduler.take_frame_request());
    assert!(!scheduler.take_frame_request());
}

#[test]
fn wait_for_frame_returns_once_another_thread_raises_one() {
    let runtime = StdRuntime::new();
    let scheduler = runtime.scheduler();
    let raiser = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        scheduler.schedule_frame();
    });

    assert!(runtime.wait_for_frame(Duration::from_secs(5)));
    assert!(!runtime.take_frame_request());
    raiser.join().unwrap();
}

#[test]
fn wait_for_frame_times_out_without_a_request() {
    let runtime = StdRuntime::new();
    assert!(!runtime.wait_for_frame(Duration::from_millis(5)));

    runtime.scheduler().schedule_frame();
    assert!(runtime.wait_for_frame(Duration::ZERO));
}

#[test]
fn debug_shows_pending_request() {
    let scheduler = StdScheduler::new();
    scheduler.schedule_frame();
    assert_eq!(
        format!("{scheduler:?}"),
        "StdScheduler { pending: true, has_waker: false }"
    );
}
