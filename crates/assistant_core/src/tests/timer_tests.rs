use super::*;
use tokio::sync::mpsc;

fn tick(generation: u64) -> InboundEvent {
    InboundEvent::AutoplayTick { generation }
}

fn scroll(generation: u64) -> InboundEvent {
    InboundEvent::ScrollDue { generation }
}

#[tokio::test(start_paused = true)]
async fn one_shot_fires_after_delay() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut slot = TimerSlot::new("test");
    let generation = slot.schedule_once(Duration::from_millis(1500), tx, scroll);

    time::sleep(Duration::from_millis(1499)).await;
    assert!(rx.try_recv().is_err());

    time::sleep(Duration::from_millis(2)).await;
    assert_eq!(rx.recv().await, Some(scroll(generation)));
    assert!(slot.complete(generation));
    assert!(!slot.is_active());
}

#[tokio::test(start_paused = true)]
async fn rescheduling_coalesces_into_latest() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut slot = TimerSlot::new("scroll");
    slot.schedule_once(Duration::from_millis(100), tx.clone(), scroll);
    time::sleep(Duration::from_millis(50)).await;
    slot.schedule_once(Duration::from_millis(100), tx.clone(), scroll);
    time::sleep(Duration::from_millis(50)).await;
    let last = slot.schedule_once(Duration::from_millis(100), tx, scroll);

    time::sleep(Duration::from_millis(500)).await;
    assert_eq!(rx.recv().await, Some(scroll(last)));
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn periodic_ticks_until_cancelled() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut slot = TimerSlot::new("autoplay");
    let generation = slot.schedule_every(Duration::from_secs(4), tx, tick);

    time::sleep(Duration::from_millis(8100)).await;
    assert_eq!(rx.recv().await, Some(tick(generation)));
    assert_eq!(rx.recv().await, Some(tick(generation)));
    assert!(rx.try_recv().is_err());

    assert!(slot.cancel());
    assert!(!slot.accepts(generation));
    time::sleep(Duration::from_secs(20)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn dropping_slot_cancels_pending_task() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    {
        let mut slot = TimerSlot::new("scoped");
        slot.schedule_once(Duration::from_millis(100), tx, scroll);
    }
    time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn stale_generation_is_rejected() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut slot = TimerSlot::new("demo");
    let first = slot.schedule_once(Duration::from_secs(1), tx.clone(), scroll);
    let second = slot.schedule_once(Duration::from_secs(1), tx, scroll);

    assert!(!slot.accepts(first));
    assert!(slot.accepts(second));
    assert!(!slot.complete(first));
    assert!(slot.complete(second));
}

#[test]
fn cancel_on_idle_slot_reports_nothing() {
    let mut slot = TimerSlot::new("idle");
    assert!(!slot.cancel());
    assert!(!slot.is_active());
}
