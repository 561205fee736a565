//! Boot console intro: timed script lines, progress, elapsed readout, and a
//! single terminal transition shared by natural completion and every skip path.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use shared::domain::{IntroState, ScriptLine};
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, info};

use crate::{
    clock::ElapsedClock,
    timers::{self, TimerHandle, TimerSet},
    view::{Chime, ClockReadout, ConsoleView, Overlay, ProgressBar},
};

pub fn boot_script() -> Vec<ScriptLine> {
    vec![
        ScriptLine::new("booting veer_rathod.dev...", 200),
        ScriptLine::new("loading profile: student - builder - SIH winner", 800),
        ScriptLine::new(
            "spinning up projects: InternYojna, Portfolio v2, AI tools",
            1500,
        ),
        ScriptLine::new("establishing secure connection...", 2200),
        ScriptLine::new(
            "status: <span class='text-green-400 font-bold'>ONLINE</span>",
            2800,
        ),
        ScriptLine::new("entering main interface...", 3400),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// Short rising blip played when the intro completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChimeTone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration_ms: u64,
    pub gain: f32,
    pub floor_gain: f32,
}

impl Default for ChimeTone {
    fn default() -> Self {
        Self {
            waveform: Waveform::Square,
            start_hz: 440.0,
            end_hz: 880.0,
            duration_ms: 100,
            gain: 0.05,
            floor_gain: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Pause after the last line before the intro completes on its own.
    pub trailing_pause_ms: u64,
    /// Cadence of the elapsed readout refresh.
    pub tick_interval_ms: u64,
    /// Length of the overlay hide transition before it is detached.
    pub detach_after_ms: u64,
    /// Prompt markup rendered before every line.
    pub prompt: String,
    pub chime: ChimeTone,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            trailing_pause_ms: 800,
            tick_interval_ms: 30,
            detach_after_ms: 500,
            prompt: "<span class=\"text-primary mr-2\">&gt;</span> ".to_string(),
            chime: ChimeTone::default(),
        }
    }
}

impl IntroConfig {
    fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Offset from start at which the intro finishes unless skipped.
    pub fn completion_offset(&self, script: &[ScriptLine]) -> Duration {
        let last = script.iter().map(|line| line.delay_ms).max().unwrap_or(0);
        Duration::from_millis(last + self.trailing_pause_ms)
    }
}

/// UI handles owned by one intro. Overlay and console are required.
#[derive(Clone, Default)]
pub struct IntroView {
    pub overlay: Option<Arc<dyn Overlay>>,
    pub console: Option<Arc<dyn ConsoleView>>,
    pub progress: Option<Arc<dyn ProgressBar>>,
    pub clock: Option<Arc<dyn ClockReadout>>,
    pub chime: Option<Arc<dyn Chime>>,
}

impl IntroView {
    pub fn new(overlay: Arc<dyn Overlay>, console: Arc<dyn ConsoleView>) -> Self {
        Self {
            overlay: Some(overlay),
            console: Some(console),
            ..Self::default()
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressBar>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockReadout>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_chime(mut self, chime: Arc<dyn Chime>) -> Self {
        self.chime = Some(chime);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroStart {
    /// A required handle was missing; nothing happened.
    Inert,
    /// Reduced motion: overlay hidden synchronously, no timers armed.
    Bypassed,
    Running { lines: usize, finish_after: Duration },
    AlreadyStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishTrigger {
    Completed,
    SkipControl,
    SkipKey,
}

struct IntroInner {
    state: Option<IntroState>,
    script: Vec<ScriptLine>,
    rendered: usize,
    active_line: Option<usize>,
    clock: Option<ElapsedClock>,
    line_timers: TimerSet,
    tick: Option<TimerHandle>,
    completion: Option<TimerHandle>,
    detach: Option<TimerHandle>,
    timers_armed: usize,
    finished_by: Option<FinishTrigger>,
}

pub struct IntroSequencer {
    config: IntroConfig,
    view: IntroView,
    inner: Mutex<IntroInner>,
}

impl IntroSequencer {
    pub fn new(view: IntroView, config: IntroConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            view,
            inner: Mutex::new(IntroInner {
                state: None,
                script: Vec::new(),
                rendered: 0,
                active_line: None,
                clock: None,
                line_timers: TimerSet::new(),
                tick: None,
                completion: None,
                detach: None,
                timers_armed: 0,
                finished_by: None,
            }),
        })
    }

    /// Starts the intro. `reduced_motion` is sampled once here and never re-read.
    pub async fn start(
        self: &Arc<Self>,
        script: Vec<ScriptLine>,
        reduced_motion: bool,
    ) -> IntroStart {
        let (Some(overlay), Some(_)) = (&self.view.overlay, &self.view.console) else {
            debug!("intro overlay or console missing; sequencer inert");
            return IntroStart::Inert;
        };

        let mut inner = self.inner.lock().await;
        if inner.state.is_some() {
            debug!("intro already started");
            return IntroStart::AlreadyStarted;
        }

        if reduced_motion {
            overlay.hide_now();
            inner.state = Some(IntroState::Finished);
            info!("reduced motion requested; intro bypassed");
            return IntroStart::Bypassed;
        }

        let clock = ElapsedClock::start();
        let started = clock.started_at();
        let finish_after = self.config.completion_offset(&script);
        let lines = script.len();
        let deadlines: Vec<Instant> = script
            .iter()
            .map(|line| started + Duration::from_millis(line.delay_ms))
            .collect();

        inner.state = Some(IntroState::Running);
        inner.clock = Some(clock);
        inner.script = script;

        for (index, deadline) in deadlines.into_iter().enumerate() {
            let this = Arc::clone(self);
            let timer = timers::at(deadline, async move { this.render_line(index).await });
            inner.line_timers.push(timer);
        }
        inner.timers_armed += lines;

        let this = Arc::clone(self);
        inner.tick = Some(timers::every(self.config.tick_interval(), move || {
            let this = Arc::clone(&this);
            async move { this.tick().await }
        }));

        let this = Arc::clone(self);
        inner.completion = Some(timers::at(started + finish_after, async move {
            this.finish(FinishTrigger::Completed).await;
        }));
        inner.timers_armed += 2;

        info!(lines, finish_after_ms = finish_after.as_millis() as u64, "intro started");
        IntroStart::Running {
            lines,
            finish_after,
        }
    }

    /// Skip control: runs the terminal transition if it has not run yet.
    pub async fn skip(self: &Arc<Self>) -> bool {
        self.finish(FinishTrigger::SkipControl).await
    }

    /// Escape and Enter skip the intro; other keys are ignored.
    pub async fn on_key(self: &Arc<Self>, key: &str) -> bool {
        if !matches!(key, "Escape" | "Enter") {
            return false;
        }
        self.finish(FinishTrigger::SkipKey).await
    }

    /// Refreshes the elapsed readout. Returns whether ticking should continue.
    pub async fn tick(&self) -> bool {
        let inner = self.inner.lock().await;
        if inner.state != Some(IntroState::Running) {
            return false;
        }
        if let (Some(readout), Some(clock)) = (&self.view.clock, &inner.clock) {
            readout.show(&clock.readout());
        }
        true
    }

    pub async fn state(&self) -> Option<IntroState> {
        self.inner.lock().await.state
    }

    pub async fn rendered_lines(&self) -> usize {
        self.inner.lock().await.rendered
    }

    pub async fn finished_by(&self) -> Option<FinishTrigger> {
        self.inner.lock().await.finished_by
    }

    /// Total timers armed since start, including ones already fired or cancelled.
    pub async fn timers_armed(&self) -> usize {
        self.inner.lock().await.timers_armed
    }

    /// Line, tick and completion timers still waiting to fire.
    pub async fn pending_timers(&self) -> usize {
        let inner = self.inner.lock().await;
        let tick = inner.tick.iter().filter(|t| !t.is_finished()).count();
        let completion = inner.completion.iter().filter(|t| !t.is_finished()).count();
        inner.line_timers.pending() + tick + completion
    }

    async fn render_line(&self, index: usize) {
        let mut inner = self.inner.lock().await;
        if inner.state != Some(IntroState::Running) {
            return;
        }
        let Some(console) = &self.view.console else {
            return;
        };

        // Render in script order, but never a line before its own deadline.
        let total = inner.script.len();
        let Some(due) = inner.script.get(index).map(|line| line.delay_ms) else {
            return;
        };
        while inner.rendered < total && inner.script[inner.rendered].delay_ms <= due {
            let next = inner.rendered;
            let markup = format!("{}{}", self.config.prompt, inner.script[next].text);
            console.append_line(next, &markup);
            console.move_cursor(inner.active_line, next);
            inner.active_line = Some(next);
            inner.rendered += 1;

            if let Some(progress) = &self.view.progress {
                progress.set_percent((next + 1) as f32 / total as f32 * 100.0);
            }
            debug!(line = next, "intro line rendered");
        }
    }

    async fn finish(self: &Arc<Self>, trigger: FinishTrigger) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.state != Some(IntroState::Running) {
            debug!(?trigger, state = ?inner.state, "intro finish ignored");
            return false;
        }
        inner.state = Some(IntroState::Finished);
        inner.finished_by = Some(trigger);

        if let Some(tick) = inner.tick.take() {
            tick.cancel();
        }
        let cancelled_lines = inner.line_timers.cancel_all();
        if let Some(completion) = inner.completion.take() {
            // The completion timer is the caller when the intro ends on its own.
            if trigger != FinishTrigger::Completed {
                completion.cancel();
            }
        }

        if let Some(progress) = &self.view.progress {
            progress.set_percent(100.0);
        }
        if let Some(chime) = &self.view.chime {
            if let Err(err) = chime.play(&self.config.chime) {
                debug!(%err, "completion chime skipped");
            }
        }

        if let Some(overlay) = &self.view.overlay {
            overlay.begin_hide();
            let overlay = Arc::clone(overlay);
            let detach_at = Instant::now() + Duration::from_millis(self.config.detach_after_ms);
            inner.detach = Some(timers::at(detach_at, async move { overlay.detach() }));
        }

        info!(
            ?trigger,
            rendered = inner.rendered,
            cancelled_lines,
            "intro finished"
        );
        true
    }
}

#[cfg(test)]
#[path = "tests/intro_tests.rs"]
mod tests;
