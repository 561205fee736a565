use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use page_core::{
    boot_script,
    view::{
        ConsoleView, ContactForm, FormTransport, Notifier, Overlay, ProgressBar, ResultCard,
        SendButton,
    },
    FinishTrigger, IntroConfig, IntroSequencer, IntroView, SubmissionConfig, SubmissionSequencer,
    SubmissionView,
};
use shared::{
    domain::{ButtonPhase, CardState, IntroState, ScriptLine, SubmissionState},
    error::DeliveryError,
    protocol::{FormSnapshot, Notice},
};
use tokio::time::{sleep, Instant};

/// Records every presentation call with the virtual time it happened at.
#[derive(Default)]
struct Page {
    log: Mutex<Vec<(u64, String)>>,
    origin: Mutex<Option<Instant>>,
}

impl Page {
    fn new() -> Arc<Self> {
        let page = Arc::new(Self::default());
        *page.origin.lock().expect("origin") = Some(Instant::now());
        page
    }

    fn record(&self, what: impl Into<String>) {
        let origin = self.origin.lock().expect("origin").unwrap_or_else(Instant::now);
        let at = origin.elapsed().as_millis() as u64;
        self.log.lock().expect("log").push((at, what.into()));
    }

    fn entries(&self, prefix: &str) -> Vec<(u64, String)> {
        self.log
            .lock()
            .expect("log")
            .iter()
            .filter(|(_, what)| what.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl Overlay for Page {
    fn hide_now(&self) {
        self.record("overlay:hide_now");
    }

    fn begin_hide(&self) {
        self.record("overlay:begin_hide");
    }

    fn detach(&self) {
        self.record("overlay:detach");
    }
}

impl ConsoleView for Page {
    fn append_line(&self, index: usize, _markup: &str) {
        self.record(format!("line:{index}"));
    }

    fn move_cursor(&self, _from: Option<usize>, _to: usize) {}
}

impl ProgressBar for Page {
    fn set_percent(&self, percent: f32) {
        self.record(format!("progress:{percent:.0}"));
    }
}

impl ContactForm for Page {
    fn reset(&self) {
        self.record("form:reset");
    }
}

impl SendButton for Page {
    fn set_scale(&self, _scale: f32) {}

    fn set_phase(&self, phase: ButtonPhase) {
        self.record(format!("phase:{phase:?}"));
    }

    fn set_label(&self, label: &str) {
        self.record(format!("label:{label}"));
    }

    fn set_icon(&self, _icon: Option<&str>) {}
}

impl ResultCard for Page {
    fn fade_in(&self) {
        self.record("card:in");
    }

    fn fade_out(&self) {
        self.record("card:out");
    }

    fn hide(&self) {
        self.record("card:hidden");
    }
}

impl Notifier for Page {
    fn notify(&self, notice: Notice) {
        self.record(format!("notice:{}", notice.message()));
    }
}

struct LatentTransport {
    latency: Duration,
    outcome: Result<(), DeliveryError>,
}

#[async_trait]
impl FormTransport for LatentTransport {
    async fn deliver(&self, _form: &FormSnapshot) -> Result<(), DeliveryError> {
        sleep(self.latency).await;
        self.outcome.clone()
    }
}

fn submission(page: &Arc<Page>, latency_ms: u64, ok: bool) -> Arc<SubmissionSequencer> {
    let outcome = if ok {
        Ok(())
    } else {
        Err(DeliveryError::transport("connection reset"))
    };
    let view = SubmissionView {
        form: page.clone(),
        button: page.clone(),
        card: page.clone(),
        notifier: page.clone(),
    };
    let transport = Arc::new(LatentTransport {
        latency: Duration::from_millis(latency_ms),
        outcome,
    });
    SubmissionSequencer::new(view, transport, SubmissionConfig::default())
}

fn contact_form() -> FormSnapshot {
    FormSnapshot::new("https://forms.example/f/contact")
        .with_field("email", "visitor@example.com")
        .with_field("message", "Let's build something.")
}

#[tokio::test(start_paused = true)]
async fn early_success_shows_one_label_then_reverts_and_hides_card() {
    let page = Page::new();
    let sequencer = submission(&page, 500, true);

    sequencer
        .submit(contact_form(), false)
        .await
        .expect("submit");

    sleep(Duration::from_millis(510)).await;
    assert_eq!(sequencer.state().await, SubmissionState::Success);
    assert_eq!(sequencer.card().await, CardState::Visible);
    assert_eq!(sequencer.labels_shown().await, 1);
    assert_eq!(
        page.entries("label:"),
        vec![
            (0, "label:> uploading message...".to_string()),
            (500, "label:> transmission complete".to_string()),
        ]
    );
    assert_eq!(page.entries("form:reset"), vec![(500, "form:reset".to_string())]);

    sleep(Duration::from_millis(2_000)).await;
    assert_eq!(sequencer.state().await, SubmissionState::Idle);
    assert_eq!(sequencer.card().await, CardState::Visible);
    assert_eq!(
        page.entries("label:").last().cloned(),
        Some((2_500, "label:Send Message".to_string()))
    );

    sleep(Duration::from_millis(2_000)).await;
    assert_eq!(sequencer.card().await, CardState::FadingOut);
    assert_eq!(page.entries("card:out"), vec![(4_500, "card:out".to_string())]);

    sleep(Duration::from_millis(500)).await;
    assert_eq!(sequencer.card().await, CardState::Hidden);
    assert_eq!(
        sequencer.visited().await,
        vec![
            SubmissionState::Idle,
            SubmissionState::Transmitting,
            SubmissionState::Success,
            SubmissionState::Idle,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn late_failure_cycles_all_labels_and_never_reverts() {
    let page = Page::new();
    let sequencer = submission(&page, 2_000, false);

    sequencer
        .submit(contact_form(), false)
        .await
        .expect("submit");
    sleep(Duration::from_millis(10_000)).await;

    assert_eq!(
        sequencer.visited().await,
        vec![
            SubmissionState::Idle,
            SubmissionState::Transmitting,
            SubmissionState::Failure,
        ]
    );
    assert_eq!(
        page.entries("label:"),
        vec![
            (0, "label:> uploading message...".to_string()),
            (600, "label:> encrypting payload...".to_string()),
            (1_200, "label:> transmitting to server...".to_string()),
        ]
    );
    assert_eq!(
        page.entries("notice:"),
        vec![(
            2_000,
            "notice:Oops! There was a problem submitting your form".to_string()
        )]
    );
    assert!(page.entries("phase:Success").is_empty());
    assert!(page.entries("phase:Idle").is_empty());
    assert!(page.entries("card:").is_empty());
    assert!(page.entries("form:reset").is_empty());
}

#[tokio::test(start_paused = true)]
async fn skip_mid_intro_renders_only_elapsed_lines() {
    let page = Page::new();
    let view = IntroView::new(page.clone(), page.clone()).with_progress(page.clone());
    let intro = IntroSequencer::new(view, IntroConfig::default());
    intro.start(boot_script(), false).await;

    sleep(Duration::from_millis(1_000)).await;
    intro.skip().await;

    assert_eq!(
        page.entries("overlay:begin_hide"),
        vec![(1_000, "overlay:begin_hide".to_string())]
    );

    sleep(Duration::from_millis(6_000)).await;
    assert_eq!(
        page.entries("line:"),
        vec![(200, "line:0".to_string()), (800, "line:1".to_string())]
    );
    assert_eq!(
        page.entries("overlay:"),
        vec![
            (1_000, "overlay:begin_hide".to_string()),
            (1_500, "overlay:detach".to_string()),
        ]
    );
    assert_eq!(
        page.entries("progress:").last().cloned(),
        Some((1_000, "progress:100".to_string()))
    );
    assert_eq!(intro.finished_by().await, Some(FinishTrigger::SkipControl));
}

#[tokio::test(start_paused = true)]
async fn intro_and_submission_run_side_by_side() {
    let intro_page = Page::new();
    let form_page = Page::new();
    let view = IntroView::new(intro_page.clone(), intro_page.clone());
    let intro = IntroSequencer::new(view, IntroConfig::default());
    let sequencer = submission(&form_page, 1_000, true);

    let script = vec![
        ScriptLine::new("one", 100),
        ScriptLine::new("two", 700),
        ScriptLine::new("three", 1_300),
    ];
    intro.start(script, false).await;
    sleep(Duration::from_millis(300)).await;
    sequencer
        .submit(contact_form(), false)
        .await
        .expect("submit");

    // Finishing the intro does not touch the in-flight submission.
    sleep(Duration::from_millis(500)).await;
    assert!(intro.on_key("Escape").await);
    assert_eq!(sequencer.state().await, SubmissionState::Transmitting);

    sleep(Duration::from_millis(3_000)).await;
    assert_eq!(intro.state().await, Some(IntroState::Finished));
    assert_eq!(intro.rendered_lines().await, 2);
    assert_eq!(sequencer.state().await, SubmissionState::Idle);
    assert!(intro_page.entries("label:").is_empty());
    assert!(form_page.entries("line:").is_empty());
}
