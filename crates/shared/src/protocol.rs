use serde::{Deserialize, Serialize};

/// The contact form's field set at the moment of submit, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl FormSnapshot {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_empty())
    }
}

/// User-visible notification raised outside the animated states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn sent() -> Self {
        Self::Success("Message sent successfully!".to_string())
    }

    pub fn delivery_failed() -> Self {
        Self::Error("Oops! There was a problem submitting your form".to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }
}
