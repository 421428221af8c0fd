use thiserror::Error;

/// Why a cosmetic audio cue did not play. Never surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("playback blocked: {0}")]
    Blocked(String),
}

impl AudioError {
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::Blocked(reason.into())
    }
}
