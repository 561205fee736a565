use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use form_transport::HttpFormTransport;
use page_core::{IntroSequencer, IntroView, SubmissionSequencer, SubmissionView, Typewriter};
use shared::{domain::SubmissionState, protocol::FormSnapshot};
use tracing_subscriber::EnvFilter;

mod controller;
mod settings;
mod ui;

use controller::{events::parse_field, orchestration};
use ui::terminal::TerminalPage;

/// Plays the portfolio page intro and hero line, then optionally sends the contact form.
#[derive(Parser, Debug)]
#[command(name = "page-terminal")]
struct Args {
    /// Settings file; defaults to `page.toml` in the working directory when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    reduced_motion: bool,
    /// Form endpoint used when submitting, overriding `form_endpoint`.
    #[arg(long)]
    endpoint: Option<String>,
    /// Contact form field as `name=value`. Repeat for each field; none skips submission.
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
    /// Print the effective settings as JSON and exit.
    #[arg(long)]
    print_settings: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = settings::load_settings(args.config.as_deref())?;
    settings.reduced_motion |= args.reduced_motion;
    if let Some(endpoint) = args.endpoint {
        settings.form_endpoint = Some(endpoint);
    }
    if args.print_settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let page = Arc::new(TerminalPage::new());
    let mut events = page.subscribe();

    let view = IntroView::new(page.clone(), page.clone())
        .with_progress(page.clone())
        .with_clock(page.clone())
        .with_chime(page.clone());
    let intro = IntroSequencer::new(view, settings.intro.clone());
    let keys = orchestration::spawn_key_reader(Arc::clone(&intro));
    orchestration::run_intro(
        &intro,
        settings.script.clone(),
        settings.reduced_motion,
        &mut events,
    )
    .await;
    keys.abort();

    let hero = Typewriter::new(page.clone(), settings.typewriter.clone());
    orchestration::run_hero(&hero, &settings.hero_text, settings.reduced_motion).await;
    println!();

    if args.fields.is_empty() {
        return Ok(());
    }

    let action = settings
        .form_endpoint
        .clone()
        .context("no form endpoint; pass --endpoint or set APP__FORM_ENDPOINT")?;
    let form = args
        .fields
        .iter()
        .fold(FormSnapshot::new(action), |form, (name, value)| {
            form.with_field(name, value)
        });
    let transport = Arc::new(HttpFormTransport::new()?);
    let view = SubmissionView {
        form: page.clone(),
        button: page.clone(),
        card: page.clone(),
        notifier: page.clone(),
    };
    let sequencer = SubmissionSequencer::new(view, transport, settings.submission.clone());

    let state =
        orchestration::run_submission(&sequencer, form, settings.reduced_motion, &mut events)
            .await?;
    if state == SubmissionState::Failure {
        bail!("contact form was not delivered");
    }
    Ok(())
}
