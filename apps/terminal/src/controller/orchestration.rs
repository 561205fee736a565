//! Drives the page's effects in order: intro, hero typewriter, then an optional submission.

use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
    time::Duration,
};

use anyhow::anyhow;
use futures::{Stream, StreamExt};
use page_core::{IntroSequencer, IntroStart, SubmissionSequencer, Typewriter};
use shared::{
    domain::{ScriptLine, SubmissionState},
    protocol::{FormSnapshot, Notice},
};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info};

use crate::controller::events::{key_for_input, PageEvent};

const HERO_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Reads stdin lines on a plain thread so a pending read never holds the runtime open.
pub fn spawn_key_reader(intro: Arc<IntroSequencer>) -> JoinHandle<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    tokio::spawn(forward_keys(intro, UnboundedReceiverStream::new(rx)))
}

pub async fn forward_keys<S>(intro: Arc<IntroSequencer>, mut lines: S)
where
    S: Stream<Item = String> + Unpin,
{
    while let Some(line) = lines.next().await {
        if let Some(key) = key_for_input(&line) {
            if intro.on_key(key).await {
                debug!(key, "intro skipped from keyboard");
            }
        }
    }
}

async fn wait_for<F>(
    events: &mut broadcast::Receiver<PageEvent>,
    mut wanted: F,
) -> Option<PageEvent>
where
    F: FnMut(&PageEvent) -> bool,
{
    loop {
        match events.recv().await {
            Ok(event) if wanted(&event) => return Some(event),
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

/// Plays the intro and returns once its overlay is gone.
pub async fn run_intro(
    intro: &Arc<IntroSequencer>,
    script: Vec<ScriptLine>,
    reduced_motion: bool,
    events: &mut broadcast::Receiver<PageEvent>,
) -> IntroStart {
    let started = intro.start(script, reduced_motion).await;
    if matches!(started, IntroStart::Running { .. } | IntroStart::Bypassed) {
        wait_for(events, |event| *event == PageEvent::OverlayDetached).await;
    }
    started
}

pub async fn run_hero(typewriter: &Arc<Typewriter>, text: &str, reduced_motion: bool) {
    typewriter.start(text, reduced_motion).await;
    let mut poll = tokio::time::interval(HERO_POLL_INTERVAL);
    while !typewriter.is_complete().await {
        poll.tick().await;
    }
}

/// Submits `form` and waits for the attempt to settle. Returns the final state.
pub async fn run_submission(
    sequencer: &Arc<SubmissionSequencer>,
    form: FormSnapshot,
    reduced_motion: bool,
    events: &mut broadcast::Receiver<PageEvent>,
) -> anyhow::Result<SubmissionState> {
    let attempt = sequencer
        .submit(form, reduced_motion)
        .await
        .map_err(|err| anyhow!(err))?;
    info!(%attempt, "waiting for contact form outcome");

    wait_for(events, |event| match event {
        PageEvent::Notice(Notice::Error(_)) => true,
        PageEvent::Notice(Notice::Success(_)) => reduced_motion,
        PageEvent::CardHidden => true,
        _ => false,
    })
    .await;

    Ok(sequencer.state().await)
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
