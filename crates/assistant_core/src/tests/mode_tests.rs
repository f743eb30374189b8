use super::*;
use shared::domain::Role;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    time,
};

const DEMO_DELAY: Duration = Duration::from_millis(1500);
const AUTOPLAY: Duration = Duration::from_secs(4);

fn demo_script(len: usize) -> Arc<[DemoScenario]> {
    (0..len)
        .map(|i| DemoScenario::new(format!("question {i}"), format!("answer {i}")))
        .collect::<Vec<_>>()
        .into()
}

fn conversation_script(len: usize) -> Arc<[ConversationStep]> {
    (0..len)
        .map(|i| ConversationStep::new(format!("user {i}"), format!("kognii {i}")))
        .collect::<Vec<_>>()
        .into()
}

fn controller(demo: usize, steps: usize) -> (ModeController, UnboundedReceiver<InboundEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let controller = ModeController::new(
        demo_script(demo),
        conversation_script(steps),
        ModeTimings {
            demo_reply_delay: DEMO_DELAY,
            autoplay_interval: AUTOPLAY,
        },
        tx,
    );
    (controller, rx)
}

fn welcome() -> Vec<MessageDraft> {
    vec![MessageDraft::assistant("welcome")]
}

fn live(demo: usize, steps: usize) -> (ModeController, UnboundedReceiver<InboundEvent>, Transcript) {
    let (mut modes, rx) = controller(demo, steps);
    let mut transcript = Transcript::new();
    assert!(modes.activate(&mut transcript, welcome()));
    (modes, rx, transcript)
}

/// Waits for the next timer event and applies it.
async fn pump(modes: &mut ModeController, rx: &mut UnboundedReceiver<InboundEvent>, transcript: &mut Transcript) -> bool {
    match rx.recv().await {
        Some(InboundEvent::DemoReplyDue { generation }) => modes.on_demo_reply_due(generation, transcript),
        Some(InboundEvent::AutoplayTick { generation }) => modes.on_autoplay_tick(generation, transcript),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn activate_only_from_idle() {
    let (mut modes, _rx, mut transcript) = live(3, 3);
    assert_eq!(modes.mode(), Mode::LiveChat);
    assert_eq!(transcript.len(), 1);
    assert!(!modes.activate(&mut transcript, welcome()));
}

#[tokio::test(start_paused = true)]
async fn entering_demo_clears_transcript() {
    let (mut modes, _rx, mut transcript) = live(3, 3);
    transcript.append(MessageDraft::user("left over"));

    assert!(modes.enter_demo(&mut transcript));
    assert_eq!(modes.mode(), Mode::DemoPlayback);
    assert!(transcript.is_empty());
    assert_eq!(modes.demo_cursor(), 0);
}

#[tokio::test(start_paused = true)]
async fn demo_reply_arrives_after_delay() {
    let (mut modes, mut rx, mut transcript) = live(3, 3);
    modes.enter_demo(&mut transcript);

    assert!(modes.demo_input(&mut transcript));
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.messages()[0].role, Role::User);
    assert!(modes.demo_reply_pending());
    assert_eq!(modes.demo_cursor(), 0);

    time::sleep(DEMO_DELAY - Duration::from_millis(1)).await;
    assert!(rx.try_recv().is_err());

    assert!(pump(&mut modes, &mut rx, &mut transcript).await);
    assert_eq!(modes.demo_cursor(), 1);
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript.actionable_suggestions(), [CONTINUE_DEMO.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn demo_cursor_stops_at_script_length() {
    let (mut modes, mut rx, mut transcript) = live(3, 3);
    modes.enter_demo(&mut transcript);

    for expected in 1..=3 {
        assert!(modes.demo_input(&mut transcript));
        assert!(pump(&mut modes, &mut rx, &mut transcript).await);
        assert_eq!(modes.demo_cursor(), expected);
    }
    assert_eq!(transcript.len(), 6);
    assert!(!modes.demo_has_remaining());

    assert!(!modes.demo_input(&mut transcript));
    assert_eq!(modes.demo_cursor(), 3);
    assert_eq!(transcript.len(), 6);
    assert!(transcript
        .actionable_suggestions()
        .contains(&START_NEW_CONVERSATION.to_string()));
}

#[tokio::test(start_paused = true)]
async fn demo_input_while_reply_pending_is_ignored() {
    let (mut modes, _rx, mut transcript) = live(3, 3);
    modes.enter_demo(&mut transcript);

    assert!(modes.demo_input(&mut transcript));
    assert!(!modes.demo_input(&mut transcript));
    assert_eq!(transcript.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn pending_reply_still_counts_as_remaining_steps() {
    let (mut modes, _rx, mut transcript) = live(1, 3);
    modes.enter_demo(&mut transcript);
    assert!(modes.demo_has_remaining());

    modes.demo_input(&mut transcript);
    assert!(modes.demo_reply_pending());
    assert!(modes.demo_has_remaining());
}

#[tokio::test(start_paused = true)]
async fn leaving_demo_cancels_pending_reply() {
    let (mut modes, mut rx, mut transcript) = live(3, 3);
    modes.enter_demo(&mut transcript);
    modes.demo_input(&mut transcript);

    assert!(modes.start_new_conversation(&mut transcript, welcome()));
    assert_eq!(modes.mode(), Mode::LiveChat);
    assert_eq!(modes.demo_cursor(), 0);
    assert_eq!(transcript.len(), 1);

    time::sleep(DEMO_DELAY * 2).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn entering_guided_clears_and_shows_first_step() {
    let (mut modes, _rx, mut transcript) = live(3, 4);
    assert!(modes.enter_guided(&mut transcript));
    assert_eq!(modes.mode(), Mode::GuidedConversation);
    assert_eq!(modes.guided_cursor(), 0);
    assert!(!modes.autoplay_active());

    let contents: Vec<_> = transcript.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["user 0", "kognii 0"]);
}

#[tokio::test(start_paused = true)]
async fn demo_can_switch_to_guided() {
    let (mut modes, _rx, mut transcript) = live(3, 4);
    modes.enter_demo(&mut transcript);
    modes.demo_input(&mut transcript);

    assert!(modes.enter_guided(&mut transcript));
    assert!(!modes.demo_reply_pending());
    assert_eq!(transcript.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn autoplay_advances_and_stops_at_last_step() {
    let (mut modes, mut rx, mut transcript) = live(3, 3);
    modes.enter_guided(&mut transcript);

    assert!(modes.start_autoplay());
    assert!(pump(&mut modes, &mut rx, &mut transcript).await);
    assert_eq!(modes.guided_cursor(), 1);
    assert!(modes.autoplay_active());

    assert!(pump(&mut modes, &mut rx, &mut transcript).await);
    assert_eq!(modes.guided_cursor(), 2);
    assert!(!modes.autoplay_active());

    time::sleep(AUTOPLAY * 3).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(modes.guided_cursor(), 2);
    assert_eq!(modes.mode(), Mode::GuidedConversation);
}

#[tokio::test(start_paused = true)]
async fn starting_autoplay_twice_keeps_one_timer() {
    let (mut modes, mut rx, mut transcript) = live(3, 10);
    modes.enter_guided(&mut transcript);

    assert!(modes.start_autoplay());
    assert!(!modes.start_autoplay());

    time::sleep(AUTOPLAY + Duration::from_millis(10)).await;
    assert!(matches!(rx.try_recv(), Ok(InboundEvent::AutoplayTick { .. })));
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn manual_next_at_last_step_exits_to_live_chat() {
    let (mut modes, _rx, mut transcript) = live(3, 2);
    modes.enter_guided(&mut transcript);

    assert!(modes.guided_next(&mut transcript, welcome()));
    assert_eq!(modes.guided_cursor(), 1);
    assert_eq!(transcript.len(), 4);

    assert!(modes.guided_next(&mut transcript, welcome()));
    assert_eq!(modes.mode(), Mode::LiveChat);
    assert_eq!(modes.guided_cursor(), 0);
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.messages()[0].content, "welcome");
}

#[tokio::test(start_paused = true)]
async fn reset_rewinds_and_stops_autoplay() {
    let (mut modes, mut rx, mut transcript) = live(3, 5);
    modes.enter_guided(&mut transcript);
    modes.start_autoplay();
    pump(&mut modes, &mut rx, &mut transcript).await;
    assert_eq!(modes.guided_cursor(), 1);

    assert!(modes.guided_reset(&mut transcript));
    assert_eq!(modes.guided_cursor(), 0);
    assert!(!modes.autoplay_active());
    assert_eq!(transcript.len(), 2);

    time::sleep(AUTOPLAY * 2).await;
    while let Ok(event) = rx.try_recv() {
        if let InboundEvent::AutoplayTick { generation } = event {
            assert!(!modes.on_autoplay_tick(generation, &mut transcript));
        }
    }
    assert_eq!(modes.guided_cursor(), 0);
}

#[tokio::test(start_paused = true)]
async fn exit_guided_reseeds_live_chat() {
    let (mut modes, _rx, mut transcript) = live(3, 5);
    modes.enter_guided(&mut transcript);
    modes.start_autoplay();

    assert!(modes.exit_guided(&mut transcript, welcome()));
    assert_eq!(modes.mode(), Mode::LiveChat);
    assert!(!modes.autoplay_active());
    assert_eq!(transcript.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_tick_after_stop_is_discarded() {
    let (mut modes, mut rx, mut transcript) = live(3, 5);
    modes.enter_guided(&mut transcript);
    modes.start_autoplay();

    time::sleep(AUTOPLAY + Duration::from_millis(1)).await;
    let Ok(InboundEvent::AutoplayTick { generation }) = rx.try_recv() else {
        panic!("expected a queued tick");
    };
    modes.stop_autoplay();

    assert!(!modes.on_autoplay_tick(generation, &mut transcript));
    assert_eq!(modes.guided_cursor(), 0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_all_timers() {
    let (mut modes, mut rx, mut transcript) = live(3, 5);
    modes.enter_guided(&mut transcript);
    modes.start_autoplay();

    modes.shutdown();
    assert_eq!(modes.mode(), Mode::Idle);
    assert!(!modes.autoplay_active());

    time::sleep(AUTOPLAY * 3).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn enter_demo_is_refused_from_guided_and_idle() {
    let (mut modes, _rx) = controller(3, 3);
    let mut transcript = Transcript::new();
    assert!(!modes.enter_demo(&mut transcript));

    modes.activate(&mut transcript, welcome());
    modes.enter_guided(&mut transcript);
    assert!(!modes.enter_demo(&mut transcript));
    assert_eq!(modes.mode(), Mode::GuidedConversation);
}

#[tokio::test(start_paused = true)]
async fn empty_guided_script_cannot_be_entered() {
    let (mut modes, _rx, mut transcript) = live(3, 0);
    assert!(!modes.enter_guided(&mut transcript));
    assert_eq!(modes.mode(), Mode::LiveChat);
    assert_eq!(transcript.len(), 1);
}
