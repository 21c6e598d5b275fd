//! Producers on other threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use vigil_core::args;
use vigil_events::Provenance;
use vigil_test::{RecordingHandler, test_manager, test_registry};

#[test]
fn test_thousand_enqueues_from_threads() {
    let registry = test_registry();
    let mgr = test_manager();
    let hit = registry.register("hit");
    let recorder = RecordingHandler::new("hit");
    recorder.bind(&hit);

    let producers: Vec<_> = (0..4_u64)
        .map(|t| {
            let mgr = Arc::clone(&mgr);
            let hit = Arc::clone(&hit);
            thread::spawn(move || {
                for i in 0..250_u64 {
                    mgr.enqueue(&hit, args![t, i], Provenance::local());
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    assert_eq!(mgr.num_queued(), 1000);
    mgr.drain();

    assert_eq!(recorder.call_count(), 1000);
    assert_eq!(mgr.num_dispatched(), 1000);
    assert!(!mgr.has_events());

    // Per producer, records keep their enqueue order.
    let calls = recorder.calls();
    for t in 0..4_u64 {
        let seq: Vec<u64> = calls
            .iter()
            .filter(|c| c.args[0].as_count() == Some(t))
            .map(|c| c.args[1].as_count().unwrap())
            .collect();
        assert_eq!(seq, (0..250).collect::<Vec<_>>());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_enqueue_from_thread_wakes_waiter() {
    let registry = test_registry();
    let mgr = test_manager();
    let hit = registry.register("hit");
    RecordingHandler::new("hit").bind(&hit);

    let waiter = {
        let mgr = Arc::clone(&mgr);
        tokio::spawn(async move { mgr.flare().fired().await })
    };

    let producer = {
        let mgr = Arc::clone(&mgr);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            mgr.enqueue(&hit, args![], Provenance::local());
        })
    };

    tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("flare never fired")
        .unwrap();
    producer.join().unwrap();

    mgr.drain();
    assert_eq!(mgr.num_dispatched(), 1);
}

#[test]
fn test_enqueue_racing_drain_keeps_flare_armed() {
    const TOTAL: u64 = 20_000;

    let registry = test_registry();
    let mgr = test_manager();
    let tick = registry.register("tick");
    let seen = Arc::new(AtomicU64::new(0));
    let seen_in_body = Arc::clone(&seen);
    tick.add_body(move |_, _| {
        seen_in_body.fetch_add(1, Ordering::Relaxed);
        Ok(())
    });

    let done = Arc::new(AtomicBool::new(false));
    let producer = {
        let mgr = Arc::clone(&mgr);
        let tick = Arc::clone(&tick);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..TOTAL {
                mgr.enqueue(&tick, args![i], Provenance::local());
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut stranded = 0_u32;
    loop {
        let finished = done.load(Ordering::Acquire);
        mgr.drain();
        // Only this thread drains, so a pending record must have left the
        // flare armed for the next pass.
        if mgr.has_events() && !mgr.flare().is_armed() {
            stranded = stranded.saturating_add(1);
        }
        if finished && !mgr.has_events() {
            break;
        }
    }
    producer.join().unwrap();

    assert_eq!(stranded, 0);
    assert_eq!(mgr.num_queued(), TOTAL);
    assert_eq!(mgr.num_dispatched(), TOTAL);
    assert_eq!(seen.load(Ordering::Relaxed), TOTAL);
    assert!(!mgr.flare().is_armed());
}
