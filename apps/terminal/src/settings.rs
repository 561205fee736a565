use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use page_core::{boot_script, IntroConfig, SubmissionConfig, TypewriterConfig};
use serde::{Deserialize, Serialize};
use shared::domain::ScriptLine;

const ENV_PREFIX: &str = "APP";
const DEFAULT_SETTINGS_FILE: &str = "page";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reduced_motion: bool,
    pub form_endpoint: Option<String>,
    pub hero_text: String,
    pub script: Vec<ScriptLine>,
    pub intro: IntroConfig,
    pub submission: SubmissionConfig,
    pub typewriter: TypewriterConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            form_endpoint: None,
            hero_text: "Student, builder and hackathon winner. I design and ship \
                        full-stack products, from AI tools to internship platforms."
                .into(),
            script: boot_script(),
            intro: IntroConfig::default(),
            submission: SubmissionConfig::default(),
            typewriter: TypewriterConfig::default(),
        }
    }
}

/// Loads `page.toml` (or `file`) and then `APP__*` environment overrides.
pub fn load_settings(file: Option<&Path>) -> anyhow::Result<Settings> {
    build_settings(file, ENV_PREFIX)
}

fn build_settings(file: Option<&Path>, env_prefix: &str) -> anyhow::Result<Settings> {
    let mut builder = Config::builder();
    builder = match file {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::with_name(DEFAULT_SETTINGS_FILE).required(false)),
    };
    builder = builder.add_source(
        Environment::with_prefix(env_prefix)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let settings: Settings = builder
        .build()
        .context("failed to read page settings")?
        .try_deserialize()
        .context("invalid page settings")?;

    if let Some(endpoint) = &settings.form_endpoint {
        url::Url::parse(endpoint)
            .with_context(|| format!("form_endpoint '{endpoint}' is not a valid URL"))?;
    }
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
