use thiserror::Error;

use crm_validate::ConfigError;

use crate::session::StageKind;

/// Errors from driving an [`ImportSession`](crate::ImportSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The call is not valid in the session's current stage.
    #[error("expected the {expected} stage, but the session is at {actual}")]
    InvalidStage {
        expected: StageKind,
        actual: StageKind,
    },

    /// The confirmed mapping cannot be imported; the session was reset.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SessionError {
    /// True when the session was sent back to upload.
    pub fn is_reset(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
