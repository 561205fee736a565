//! Character-by-character reveal of the hero description.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    timers::{self, TimerSet},
    view::TypingTarget,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub start_delay_ms: u64,
    pub char_interval_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 1_000,
            char_interval_ms: 20,
        }
    }
}

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn normalize_text(source: &str) -> String {
    source.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct TypewriterInner {
    chars: Vec<char>,
    typed: usize,
    running: bool,
    timers: TimerSet,
}

impl TypewriterInner {
    fn text(&self) -> String {
        self.chars[..self.typed].iter().collect()
    }
}

pub struct Typewriter {
    config: TypewriterConfig,
    target: Arc<dyn TypingTarget>,
    inner: Mutex<TypewriterInner>,
}

impl Typewriter {
    pub fn new(target: Arc<dyn TypingTarget>, config: TypewriterConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            target,
            inner: Mutex::new(TypewriterInner::default()),
        })
    }

    /// Clears the target and schedules typing. Returns the number of characters to type.
    pub async fn start(self: &Arc<Self>, source: &str, reduced_motion: bool) -> usize {
        let text = normalize_text(source);
        let mut inner = self.inner.lock().await;
        inner.timers.cancel_all();
        inner.chars = text.chars().collect();

        if reduced_motion || inner.chars.is_empty() {
            inner.typed = inner.chars.len();
            inner.running = false;
            self.target.set_text(&text);
            return inner.chars.len();
        }

        inner.typed = 0;
        inner.running = true;
        self.target.set_text("");
        self.target.set_cursor(true);

        let this = Arc::clone(self);
        inner.timers.push(timers::after(
            Duration::from_millis(self.config.start_delay_ms),
            async move { this.arm_ticker().await },
        ));
        inner.chars.len()
    }

    /// Shows the full text at once. No-op once typing has finished.
    pub async fn skip(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.running {
            return;
        }
        inner.timers.cancel_all();
        inner.running = false;
        inner.typed = inner.chars.len();
        self.target.set_text(&inner.text());
    }

    pub async fn typed(&self) -> String {
        self.inner.lock().await.text()
    }

    pub async fn is_complete(&self) -> bool {
        let inner = self.inner.lock().await;
        !inner.running && inner.typed == inner.chars.len()
    }

    async fn arm_ticker(self: &Arc<Self>) {
        let mut inner = self.inner.lock().await;
        if !inner.running {
            return;
        }
        let this = Arc::clone(self);
        inner.timers.push(timers::every(
            Duration::from_millis(self.config.char_interval_ms.max(1)),
            move || {
                let this = Arc::clone(&this);
                async move { this.type_next().await }
            },
        ));
    }

    async fn type_next(&self) -> bool {
        let mut inner = self.inner.lock().await;
        if !inner.running {
            return false;
        }
        inner.typed += 1;
        self.target.set_text(&inner.text());
        if inner.typed >= inner.chars.len() {
            inner.running = false;
            debug!(chars = inner.typed, "typewriter finished");
            return false;
        }
        true
    }
}

#[cfg(test)]
#[path = "tests/typewriter_tests.rs"]
mod tests;
