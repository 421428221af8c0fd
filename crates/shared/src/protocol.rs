use serde::{Deserialize, Serialize};

/// Contact form fields; also the JSON body posted to the form relay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Message,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayErrorDetail {
    pub message: String,
}

/// Failure body returned by the relay: `{ "errors": [{ "message": ... }] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayErrorBody {
    #[serde(default)]
    pub errors: Vec<RelayErrorDetail>,
}

impl RelayErrorBody {
    pub fn first_message(&self) -> Option<&str> {
        self.errors
            .iter()
            .map(|detail| detail.message.trim())
            .find(|message| !message.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatusKind {
    #[default]
    Idle,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStatus {
    pub kind: FormStatusKind,
    pub message: String,
}

impl FormStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FormStatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FormStatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.kind == FormStatusKind::Idle
    }
}
