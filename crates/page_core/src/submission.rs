//! Contact form send sequence: press, label cycling while the request is in
//! flight, then success (with timed revert and result card) or failure.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{AttemptId, ButtonPhase, CardState, SubmissionState},
    error::{DeliveryError, SubmitRejected},
    protocol::{FormSnapshot, Notice},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    timers::{self, TimerHandle, TimerSet},
    view::{ContactForm, FormTransport, Notifier, ResultCard, SendButton},
};

const VISITED_HISTORY: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub labels: Vec<String>,
    pub label_interval_ms: u64,
    pub press_scale: f32,
    pub press_release_ms: u64,
    pub idle_label: String,
    pub idle_icon: String,
    pub success_label: String,
    pub success_icon: String,
    /// Delay between entering success and revealing the result card.
    pub card_reveal_delay_ms: u64,
    /// Measured from the card reveal.
    pub button_revert_ms: u64,
    /// Measured from the card reveal.
    pub card_hide_ms: u64,
    /// Length of the card fade-out before it is hidden.
    pub card_fade_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            labels: vec![
                "> uploading message...".to_string(),
                "> encrypting payload...".to_string(),
                "> transmitting to server...".to_string(),
            ],
            label_interval_ms: 600,
            press_scale: 0.96,
            press_release_ms: 150,
            idle_label: "Send Message".to_string(),
            idle_icon: "send".to_string(),
            success_label: "> transmission complete".to_string(),
            success_icon: "check".to_string(),
            card_reveal_delay_ms: 0,
            button_revert_ms: 2_000,
            card_hide_ms: 4_000,
            card_fade_ms: 500,
        }
    }
}

#[derive(Clone)]
pub struct SubmissionView {
    pub form: Arc<dyn ContactForm>,
    pub button: Arc<dyn SendButton>,
    pub card: Arc<dyn ResultCard>,
    pub notifier: Arc<dyn Notifier>,
}

struct SubmissionInner {
    state: SubmissionState,
    attempt: Option<AttemptId>,
    animated: bool,
    labels_shown: usize,
    label_timer: Option<TimerHandle>,
    press_timer: Option<TimerHandle>,
    display_timers: TimerSet,
    card: CardState,
    button: ButtonPhase,
    visited: VecDeque<SubmissionState>,
}

impl SubmissionInner {
    fn enter(&mut self, state: SubmissionState) {
        self.state = state;
        if self.visited.len() == VISITED_HISTORY {
            self.visited.pop_front();
        }
        self.visited.push_back(state);
    }

    fn is_current(&self, attempt: AttemptId) -> bool {
        self.attempt == Some(attempt)
    }

    fn stop_labels(&mut self) {
        if let Some(timer) = self.label_timer.take() {
            timer.cancel();
        }
    }
}

pub struct SubmissionSequencer {
    config: SubmissionConfig,
    view: SubmissionView,
    transport: Arc<dyn FormTransport>,
    inner: Mutex<SubmissionInner>,
}

impl SubmissionSequencer {
    pub fn new(
        view: SubmissionView,
        transport: Arc<dyn FormTransport>,
        config: SubmissionConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            view,
            transport,
            inner: Mutex::new(SubmissionInner {
                state: SubmissionState::Idle,
                attempt: None,
                animated: true,
                labels_shown: 0,
                label_timer: None,
                press_timer: None,
                display_timers: TimerSet::new(),
                card: CardState::Hidden,
                button: ButtonPhase::Idle,
                visited: VecDeque::from([SubmissionState::Idle]),
            }),
        })
    }

    /// Starts delivering `form`. Rejected while a previous attempt is still
    /// transmitting or showing its success state.
    pub async fn submit(
        self: &Arc<Self>,
        form: FormSnapshot,
        reduced_motion: bool,
    ) -> Result<AttemptId, SubmitRejected> {
        let mut inner = self.inner.lock().await;
        if !inner.state.accepts_submit() {
            debug!(state = ?inner.state, "submit ignored while busy");
            return Err(SubmitRejected::Busy { state: inner.state });
        }

        let attempt = AttemptId::new();
        inner.attempt = Some(attempt);
        inner.animated = !reduced_motion;
        inner.labels_shown = 0;
        inner.enter(SubmissionState::Transmitting);
        info!(%attempt, fields = form.fields.len(), reduced_motion, "form submission started");

        if !reduced_motion {
            self.start_animation(&mut inner, attempt);
        }

        let this = Arc::clone(self);
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            let outcome = transport.deliver(&form).await;
            this.resolve(attempt, outcome).await;
        });

        Ok(attempt)
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.state
    }

    /// The most recent states entered, oldest first.
    pub async fn visited(&self) -> Vec<SubmissionState> {
        self.inner.lock().await.visited.iter().copied().collect()
    }

    pub async fn card(&self) -> CardState {
        self.inner.lock().await.card
    }

    pub async fn labels_shown(&self) -> usize {
        self.inner.lock().await.labels_shown
    }

    fn start_animation(self: &Arc<Self>, inner: &mut SubmissionInner, attempt: AttemptId) {
        let button = &self.view.button;
        button.set_scale(self.config.press_scale);
        let release = Arc::clone(button);
        inner.press_timer = Some(timers::after(
            Duration::from_millis(self.config.press_release_ms),
            async move { release.set_scale(1.0) },
        ));

        button.set_phase(ButtonPhase::Transmitting);
        button.set_icon(None);
        inner.button = ButtonPhase::Transmitting;

        let this = Arc::clone(self);
        let interval = Duration::from_millis(self.config.label_interval_ms.max(1));
        inner.stop_labels();
        inner.label_timer = Some(timers::every(interval, move || {
            let this = Arc::clone(&this);
            async move { this.advance_label(attempt).await }
        }));
    }

    /// Shows the next status label. Stops once the last label is on screen.
    async fn advance_label(&self, attempt: AttemptId) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.is_current(attempt) || inner.state != SubmissionState::Transmitting {
            return false;
        }
        let Some(label) = self.config.labels.get(inner.labels_shown) else {
            return false;
        };
        self.view.button.set_label(label);
        inner.labels_shown += 1;
        debug!(%attempt, label = inner.labels_shown, "status label shown");
        inner.labels_shown < self.config.labels.len()
    }

    async fn resolve(self: &Arc<Self>, attempt: AttemptId, outcome: Result<(), DeliveryError>) {
        let mut inner = self.inner.lock().await;
        if !inner.is_current(attempt) || inner.state != SubmissionState::Transmitting {
            debug!(%attempt, "stale delivery outcome ignored");
            return;
        }
        inner.stop_labels();

        match outcome {
            Ok(()) if inner.animated => self.enter_success(&mut inner, attempt),
            Ok(()) => {
                inner.enter(SubmissionState::Success);
                self.view.form.reset();
                self.view.notifier.notify(Notice::sent());
                if inner.button != ButtonPhase::Idle {
                    self.show_idle_button(&mut inner);
                }
                inner.enter(SubmissionState::Idle);
                info!(%attempt, "form delivered");
            }
            Err(err) => {
                inner.enter(SubmissionState::Failure);
                warn!(%attempt, %err, "form delivery failed");
                self.view.notifier.notify(Notice::delivery_failed());
            }
        }
    }

    fn enter_success(self: &Arc<Self>, inner: &mut SubmissionInner, attempt: AttemptId) {
        inner.enter(SubmissionState::Success);
        let button = &self.view.button;
        button.set_phase(ButtonPhase::Success);
        button.set_label(&self.config.success_label);
        button.set_icon(Some(&self.config.success_icon));
        inner.button = ButtonPhase::Success;
        info!(%attempt, "form delivered");

        // A card still fading from an earlier attempt is taken over by this one.
        let superseded = inner.display_timers.cancel_all();
        if superseded > 0 {
            debug!(superseded, "previous result card timers cancelled");
        }

        if self.config.card_reveal_delay_ms == 0 {
            self.reveal_card(inner, attempt);
        } else {
            let this = Arc::clone(self);
            inner.display_timers.push(timers::after(
                Duration::from_millis(self.config.card_reveal_delay_ms),
                async move {
                    let mut inner = this.inner.lock().await;
                    if inner.is_current(attempt) {
                        this.reveal_card(&mut inner, attempt);
                    }
                },
            ));
        }
    }

    fn reveal_card(self: &Arc<Self>, inner: &mut SubmissionInner, attempt: AttemptId) {
        self.view.card.fade_in();
        inner.card = CardState::Visible;
        self.view.form.reset();

        let this = Arc::clone(self);
        inner.display_timers.push(timers::after(
            Duration::from_millis(self.config.button_revert_ms),
            async move { this.revert_button(attempt).await },
        ));

        let this = Arc::clone(self);
        inner.display_timers.push(timers::after(
            Duration::from_millis(self.config.card_hide_ms),
            async move { this.fade_card().await },
        ));
    }

    async fn revert_button(&self, attempt: AttemptId) {
        let mut inner = self.inner.lock().await;
        if !inner.is_current(attempt) || inner.state != SubmissionState::Success {
            return;
        }
        self.show_idle_button(&mut inner);
        inner.enter(SubmissionState::Idle);
        debug!(%attempt, "send button reverted");
    }

    fn show_idle_button(&self, inner: &mut SubmissionInner) {
        let button = &self.view.button;
        button.set_phase(ButtonPhase::Idle);
        button.set_label(&self.config.idle_label);
        button.set_icon(Some(&self.config.idle_icon));
        inner.button = ButtonPhase::Idle;
    }

    async fn fade_card(self: &Arc<Self>) {
        let mut inner = self.inner.lock().await;
        if inner.card != CardState::Visible {
            return;
        }
        self.view.card.fade_out();
        inner.card = CardState::FadingOut;

        let this = Arc::clone(self);
        inner.display_timers.push(timers::after(
            Duration::from_millis(self.config.card_fade_ms),
            async move {
                let mut inner = this.inner.lock().await;
                if inner.card == CardState::FadingOut {
                    this.view.card.hide();
                    inner.card = CardState::Hidden;
                }
            },
        ));
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
