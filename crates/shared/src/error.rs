use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SubmissionState;

/// Outcome of a failed form delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryError {
    #[error("form endpoint rejected submission with status {status}")]
    Rejected { status: u16 },
    #[error("form transport failure: {message}")]
    Transport { message: String },
}

impl DeliveryError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Audio output could not be produced. Never surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("audio unavailable: {0}")]
pub struct ChimeError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a submission is already in progress ({state:?})")]
    Busy { state: SubmissionState },
}
