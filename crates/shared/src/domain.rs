use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);
    };
}

id_newtype!(ElementId);
id_newtype!(LayerId);

/// Identifies one submission attempt in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub Uuid);

impl AttemptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One entry of a boot console script.
///
/// `delay_ms` is measured from the start of the sequence, not from the
/// previous line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub text: String,
    pub delay_ms: u64,
}

impl ScriptLine {
    pub fn new(text: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            text: text.into(),
            delay_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroState {
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Transmitting,
    Success,
    Failure,
}

impl SubmissionState {
    /// Whether a fresh submit may start from this state.
    pub fn accepts_submit(self) -> bool {
        matches!(self, Self::Idle | Self::Failure)
    }
}

/// Presentation class carried by the send button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPhase {
    Idle,
    Transmitting,
    Success,
}

impl ButtonPhase {
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Transmitting => Some("btn-transmitting"),
            Self::Success => Some("btn-success"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    #[default]
    Hidden,
    Visible,
    FadingOut,
}
