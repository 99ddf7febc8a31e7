//! Integration tests for coalescing, delays, and drain behavior.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use shortlist_queue::OpClass;
use shortlist_queue::QueueConfig;
use shortlist_queue::WriteQueue;
use tokio::sync::Mutex;

fn counting_work(counter: Arc<AtomicUsize>) -> shortlist_queue::WorkFuture {
    Box::pin(async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

fn test_config() -> QueueConfig {
    QueueConfig {
        read_delay_ms: 40,
        update_delay_ms: 40,
        create_delay_ms: 80,
        poll_interval_ms: 5,
    }
}

#[tokio::test]
async fn duplicate_submissions_execute_first_work_exactly_once() {
    let queue = WriteQueue::new(test_config());
    queue.clone().start();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    queue.submit(OpClass::Update, "select-42", counting_work(first.clone()));
    tokio::time::sleep(Duration::from_millis(5)).await;
    queue.submit(OpClass::Update, "select-42", counting_work(second.clone()));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(first.load(Ordering::SeqCst), 1, "first work runs exactly once");
    assert_eq!(second.load(Ordering::SeqCst), 0, "second work never runs");
    assert_eq!(queue.pending_len(), 0);
    queue.shutdown().await;
}

#[tokio::test]
async fn no_execution_before_the_class_delay() {
    let queue = WriteQueue::new(QueueConfig {
        update_delay_ms: 150,
        ..test_config()
    });
    queue.clone().start();

    let counter = Arc::new(AtomicUsize::new(0));
    queue.submit(OpClass::Update, "select-1", counting_work(counter.clone()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0, "delay window not yet elapsed");

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1, "executes once eligible");
    queue.shutdown().await;
}

#[tokio::test]
async fn distinct_dedup_keys_each_execute_exactly_once() {
    let queue = WriteQueue::new(test_config());
    queue.clone().start();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    queue.submit(OpClass::Create, "add-1", counting_work(first.clone()));
    queue.submit(OpClass::Create, "add-2", counting_work(second.clone()));

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    queue.shutdown().await;
}

#[tokio::test]
async fn a_failing_work_does_not_block_the_rest_of_the_cycle() {
    let queue = WriteQueue::new(test_config());
    queue.clone().start();

    let survivor = Arc::new(AtomicUsize::new(0));
    queue.submit(
        OpClass::Update,
        "doomed",
        Box::pin(async { anyhow::bail!("simulated store failure") }),
    );
    queue.submit(OpClass::Update, "fine", counting_work(survivor.clone()));
    queue.submit(OpClass::Read, "also-fine", counting_work(survivor.clone()));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(survivor.load(Ordering::SeqCst), 2, "other operations still run");
    assert_eq!(queue.pending_len(), 0, "failed entry is dropped, not retried");
    queue.shutdown().await;
}

#[tokio::test]
async fn resubmission_after_execution_registers_a_fresh_operation() {
    let queue = WriteQueue::new(test_config());
    queue.clone().start();

    let counter = Arc::new(AtomicUsize::new(0));
    queue.submit(OpClass::Update, "select-7", counting_work(counter.clone()));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    // the earlier entry is gone; a new submission starts a fresh window
    queue.submit(OpClass::Update, "select-7", counting_work(counter.clone()));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    queue.shutdown().await;
}

#[tokio::test]
async fn resubmission_during_execution_registers_a_fresh_entry() {
    let queue = WriteQueue::new(test_config());
    queue.clone().start();

    // slow work holds the drain worker well past its own take
    let counter = Arc::new(AtomicUsize::new(0));
    let slow = counter.clone();
    queue.submit(
        OpClass::Update,
        "select-3",
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            slow.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(queue.pending_len(), 0, "entry leaves the map when taken for execution");

    // same key while the first work is still executing
    let fast = counter.clone();
    queue.submit(
        OpClass::Update,
        "select-3",
        Box::pin(async move {
            fast.fetch_add(10, Ordering::SeqCst);
            Ok(())
        }),
    );
    assert_eq!(queue.pending_len(), 1, "mid-execution resubmit starts a fresh entry");

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 11, "both works run exactly once");
    queue.shutdown().await;
}

#[tokio::test]
async fn classes_drain_in_read_update_create_order() {
    // equal delays so one cycle sees all three classes at once
    let queue = WriteQueue::new(QueueConfig {
        read_delay_ms: 100,
        update_delay_ms: 100,
        create_delay_ms: 100,
        poll_interval_ms: 5,
    });
    queue.clone().start();

    let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    for (class, name) in [
        (OpClass::Create, "create"),
        (OpClass::Read, "read"),
        (OpClass::Update, "update"),
    ] {
        let log = log.clone();
        queue.submit(
            class,
            name,
            Box::pin(async move {
                log.lock().await.push(name);
                Ok(())
            }),
        );
    }

    tokio::time::sleep(Duration::from_millis(400)).await;
    let order = log.lock().await.clone();
    assert_eq!(order, vec!["read", "update", "create"]);
    queue.shutdown().await;
}

#[tokio::test]
async fn concurrent_submissions_coalesce_to_one_execution() {
    let queue = WriteQueue::new(test_config());
    queue.clone().start();

    let counter = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();
    for _ in 0..16 {
        let queue = queue.clone();
        let counter = counter.clone();
        handles.push(tokio::spawn(async move {
            queue.submit(OpClass::Update, "select-9", counting_work(counter));
        }));
    }
    for handle in handles {
        handle.await.expect("submitter task");
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1, "burst collapses to one execution");
    queue.shutdown().await;
}

#[tokio::test]
async fn queue_goes_idle_and_wakes_on_new_submissions() {
    let queue = WriteQueue::new(test_config());
    queue.clone().start();

    let counter = Arc::new(AtomicUsize::new(0));
    queue.submit(OpClass::Read, "page-0", counting_work(counter.clone()));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(queue.pending_len(), 0);

    // idle period, then a fresh submission must still be picked up
    tokio::time::sleep(Duration::from_millis(100)).await;
    queue.submit(OpClass::Read, "page-1", counting_work(counter.clone()));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    queue.shutdown().await;
}
