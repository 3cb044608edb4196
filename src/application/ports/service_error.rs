use serde_json::Value;

/// Raw failure shape of a Studio API call. Coordinators classify it into their own taxonomy;
/// nothing above the application layer inspects status codes.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("request failed with status {status}")]
    Status { status: u16, body: Option<Value> },
    #[error("request could not be completed")]
    Transport(#[source] anyhow::Error),
}

pub const CONFLICT: u16 = 409;

impl ServiceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            ServiceError::Transport(_) => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ServiceError::Status { body, .. } => body.as_ref(),
            ServiceError::Transport(_) => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(CONFLICT)
    }
}
