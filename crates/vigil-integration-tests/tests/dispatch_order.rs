//! Ordering and accounting guarantees of a drain pass.

use std::sync::Arc;

use vigil_core::{Val, args};
use vigil_events::{EventMgr, Provenance};
use vigil_test::{
    CallLog, CountingHook, FailingHandler, RecordingHandler, five, init_test_tracing, test_manager,
    test_registry,
};

fn counters_match_queue(mgr: &EventMgr) {
    assert_eq!(
        mgr.num_queued().wrapping_sub(mgr.num_dispatched()),
        mgr.size(),
        "queued - dispatched must equal the live queue length"
    );
}

#[test]
fn test_cascade_runs_after_already_queued_records() {
    init_test_tracing();
    let registry = test_registry();
    let mgr = test_manager();
    let log = CallLog::new();

    let h1 = registry.register("h1");
    let h2 = registry.register("h2");
    let h3 = registry.register("h3");
    RecordingHandler::new("h2").with_log(&log).bind(&h2);
    RecordingHandler::new("h3").with_log(&log).bind(&h3);

    let log_h1 = log.clone();
    let h3_for_body = Arc::clone(&h3);
    h1.add_body(move |mgr, _| {
        log_h1.push("h1");
        mgr.enqueue(&h3_for_body, args![], Provenance::local());
        Ok(())
    });

    mgr.enqueue(&h1, args![], Provenance::local());
    mgr.enqueue(&h2, args![], Provenance::local());
    counters_match_queue(&mgr);

    mgr.drain();

    assert_eq!(log.entries(), vec!["h1", "h2", "h3"]);
    assert_eq!(mgr.num_queued(), 3);
    assert_eq!(mgr.num_dispatched(), 3);
    counters_match_queue(&mgr);
}

#[test]
fn test_long_sequence_is_fifo() {
    let registry = test_registry();
    let mgr = test_manager();
    let seq = registry.register("seq");
    let recorder = RecordingHandler::new("seq");
    recorder.bind(&seq);

    for i in 0..100_u64 {
        mgr.enqueue(&seq, args![i], Provenance::local());
        counters_match_queue(&mgr);
    }
    mgr.drain();

    let seen: Vec<u64> = recorder
        .calls()
        .iter()
        .map(|c| c.args[0].as_count().unwrap())
        .collect();
    assert_eq!(seen, (0..100).collect::<Vec<_>>());
    counters_match_queue(&mgr);
}

#[test]
fn test_unbound_handler_with_five() {
    let registry = test_registry();
    let mgr = test_manager();
    let unbound = registry.register("unbound");
    let value = five();

    mgr.enqueue(&unbound, vec![Arc::clone(&value)], Provenance::local());

    assert_eq!(Arc::strong_count(&value), 1);
    assert_eq!(*value, Val::Count(5));
    assert_eq!(mgr.num_queued(), 0);
    assert_eq!(mgr.num_dispatched(), 0);
    assert!(!mgr.has_events());

    mgr.drain();
    assert_eq!(mgr.num_dispatched(), 0);
}

#[test]
fn test_drain_inside_handler_is_noop() {
    let registry = test_registry();
    let mgr = test_manager();
    let log = CallLog::new();

    let reentrant = registry.register("reentrant");
    let second = registry.register("second");
    RecordingHandler::new("second").with_log(&log).bind(&second);

    let log_reentrant = log.clone();
    reentrant.add_body(move |mgr, _| {
        mgr.drain();
        mgr.drain();
        log_reentrant.push("reentrant");
        Ok(())
    });

    mgr.enqueue(&reentrant, args![], Provenance::local());
    mgr.enqueue(&second, args![], Provenance::local());
    mgr.drain();

    assert_eq!(log.entries(), vec!["reentrant", "second"]);
    assert_eq!(mgr.num_dispatched(), 2);
}

#[test]
fn test_drain_leaves_manager_idle() {
    let registry = test_registry();
    let mgr = test_manager();
    let ping = registry.register("ping");
    RecordingHandler::new("ping").bind(&ping);

    mgr.enqueue(&ping, args![], Provenance::local());
    assert!(mgr.flare().is_armed());

    mgr.drain();
    assert!(!mgr.has_events());
    assert!(!mgr.flare().is_armed());
    assert!(!mgr.is_draining());
}

#[test]
fn test_failing_bodies_are_contained() {
    let registry = test_registry();
    let mgr = test_manager();

    let broken = registry.register("broken");
    let failing = FailingHandler::new("bad input");
    let panicking = FailingHandler::panicking("boom");
    let recorder = RecordingHandler::new("broken");
    failing.bind(&broken);
    panicking.bind(&broken);
    recorder.bind(&broken);

    let value = five();
    mgr.enqueue(&broken, vec![Arc::clone(&value)], Provenance::local());
    mgr.enqueue(&broken, vec![Arc::clone(&value)], Provenance::local());
    mgr.drain();

    assert_eq!(failing.call_count(), 2);
    assert_eq!(panicking.call_count(), 2);
    assert_eq!(recorder.call_count(), 2);
    assert_eq!(mgr.num_dispatched(), 2);
    assert_eq!(Arc::strong_count(&value), 1);
}

#[test]
fn test_hooks_see_queue_and_drain() {
    init_test_tracing();
    let registry = test_registry();
    let mgr = test_manager();
    let hook = Arc::new(CountingHook::swallowing("muted"));
    mgr.add_hook(hook.clone());

    let muted = registry.register("muted");
    let loud = registry.register("loud");
    let muted_recorder = RecordingHandler::new("muted");
    let loud_recorder = RecordingHandler::new("loud");
    muted_recorder.bind(&muted);
    loud_recorder.bind(&loud);

    let value = five();
    mgr.enqueue(&muted, vec![Arc::clone(&value)], Provenance::local());
    mgr.enqueue(&loud, args![], Provenance::local());
    counters_match_queue(&mgr);
    assert_eq!(Arc::strong_count(&value), 1);

    mgr.drain();
    mgr.drain();

    assert_eq!(hook.queued(), 2);
    assert_eq!(hook.drains(), 2);
    assert_eq!(muted_recorder.call_count(), 0);
    assert_eq!(loud_recorder.call_count(), 1);
    assert_eq!(mgr.num_queued(), 1);
}

#[test]
fn test_error_handler_scope_visible_to_bodies() {
    let registry = test_registry();
    let mgr = test_manager();
    registry.register("reporter_error");
    registry.set_error_handler("reporter_error").unwrap();

    let reporter = registry.lookup("reporter_error").unwrap();
    let plain = registry.register("plain");
    let reporter_recorder = RecordingHandler::new("reporter_error");
    let plain_recorder = RecordingHandler::new("plain");
    reporter_recorder.bind(&reporter);
    plain_recorder.bind(&plain);

    mgr.enqueue(&reporter, args!["disk full"], Provenance::local());
    mgr.enqueue(&plain, args![], Provenance::local());
    mgr.drain();

    assert!(reporter_recorder.calls()[0].in_error_handler);
    assert!(!plain_recorder.calls()[0].in_error_handler);
    assert!(!mgr.in_error_handler());
}
