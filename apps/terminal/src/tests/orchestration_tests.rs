use super::*;
use async_trait::async_trait;
use page_core::{
    view::FormTransport, IntroConfig, IntroView, SubmissionConfig, SubmissionView,
    TypewriterConfig,
};
use shared::{domain::IntroState, error::DeliveryError};

use crate::ui::terminal::TerminalPage;

struct FixedTransport {
    latency: Duration,
    outcome: Result<(), DeliveryError>,
}

#[async_trait]
impl FormTransport for FixedTransport {
    async fn deliver(&self, _form: &FormSnapshot) -> Result<(), DeliveryError> {
        tokio::time::sleep(self.latency).await;
        self.outcome.clone()
    }
}

fn submission(page: &Arc<TerminalPage>, ok: bool) -> Arc<SubmissionSequencer> {
    let outcome = if ok {
        Ok(())
    } else {
        Err(DeliveryError::Rejected { status: 500 })
    };
    let view = SubmissionView {
        form: page.clone(),
        button: page.clone(),
        card: page.clone(),
        notifier: page.clone(),
    };
    let transport = Arc::new(FixedTransport {
        latency: Duration::from_millis(300),
        outcome,
    });
    SubmissionSequencer::new(view, transport, SubmissionConfig::default())
}

fn form() -> FormSnapshot {
    FormSnapshot::new("https://forms.example/f/contact").with_field("message", "hi")
}

fn intro(page: &Arc<TerminalPage>) -> Arc<IntroSequencer> {
    IntroSequencer::new(
        IntroView::new(page.clone(), page.clone()),
        IntroConfig::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn animated_submission_settles_once_the_card_is_hidden() {
    let page = Arc::new(TerminalPage::new());
    let mut events = page.subscribe();
    let sequencer = submission(&page, true);

    let state = run_submission(&sequencer, form(), false, &mut events)
        .await
        .expect("submitted");

    assert_eq!(state, SubmissionState::Idle);
    assert_eq!(sequencer.card().await, shared::domain::CardState::Hidden);
}

#[tokio::test(start_paused = true)]
async fn failed_submission_reports_failure() {
    let page = Arc::new(TerminalPage::new());
    let mut events = page.subscribe();
    let sequencer = submission(&page, false);

    let state = run_submission(&sequencer, form(), false, &mut events)
        .await
        .expect("submitted");

    assert_eq!(state, SubmissionState::Failure);
}

#[tokio::test(start_paused = true)]
async fn reduced_motion_submission_settles_on_the_success_notice() {
    let page = Arc::new(TerminalPage::new());
    let mut events = page.subscribe();
    let sequencer = submission(&page, true);

    let state = run_submission(&sequencer, form(), true, &mut events)
        .await
        .expect("submitted");

    assert_eq!(state, SubmissionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn reduced_motion_intro_returns_without_waiting() {
    let page = Arc::new(TerminalPage::new());
    let mut events = page.subscribe();
    let intro = intro(&page);

    let started = run_intro(&intro, page_core::boot_script(), true, &mut events).await;

    assert_eq!(started, IntroStart::Bypassed);
    assert_eq!(intro.state().await, Some(IntroState::Finished));
}

#[tokio::test(start_paused = true)]
async fn intro_runs_until_the_overlay_detaches() {
    let page = Arc::new(TerminalPage::new());
    let mut events = page.subscribe();
    let intro = intro(&page);
    let script = vec![ScriptLine::new("one", 100), ScriptLine::new("two", 200)];

    let started = run_intro(&intro, script, false, &mut events).await;

    assert!(matches!(started, IntroStart::Running { lines: 2, .. }));
    assert_eq!(intro.rendered_lines().await, 2);
    assert_eq!(intro.state().await, Some(IntroState::Finished));
}

#[tokio::test(start_paused = true)]
async fn typed_skip_word_finishes_the_intro() {
    let page = Arc::new(TerminalPage::new());
    let intro = intro(&page);
    intro.start(page_core::boot_script(), false).await;

    let lines = futures::stream::iter(vec!["hello".to_string(), "esc".to_string()]);
    forward_keys(Arc::clone(&intro), lines).await;

    assert_eq!(
        intro.finished_by().await,
        Some(page_core::FinishTrigger::SkipKey)
    );
}

#[tokio::test(start_paused = true)]
async fn hero_returns_once_everything_is_typed() {
    let page = Arc::new(TerminalPage::new());
    let typewriter = Typewriter::new(
        page.clone(),
        TypewriterConfig {
            start_delay_ms: 100,
            char_interval_ms: 10,
        },
    );

    run_hero(&typewriter, "  hello   there ", false).await;

    assert_eq!(typewriter.typed().await, "hello there");
    assert!(typewriter.is_complete().await);
}
