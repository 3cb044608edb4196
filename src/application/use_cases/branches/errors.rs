use crate::application::ports::service_error::ServiceError;
use crate::domain::branches::repo_status::UncommittedChangesError;

#[derive(thiserror::Error, Debug)]
pub enum BranchOperationError {
    #[error("a branch named '{branch}' already exists")]
    AlreadyExists { branch: String },
    #[error("could not create branch '{branch}'")]
    CreateFailed {
        branch: String,
        #[source]
        source: ServiceError,
    },
    #[error(
        "uncommitted changes prevent switching from '{}' to '{}'",
        .0.current_branch,
        .0.target_branch
    )]
    UncommittedChanges(UncommittedChangesError),
    #[error("could not switch to branch '{branch}'")]
    CheckoutFailed {
        branch: String,
        #[source]
        source: ServiceError,
    },
    #[error("'{branch}' is already the current branch")]
    AlreadyOnBranch { branch: String },
    #[error("could not discard local changes")]
    DiscardFailed(#[source] ServiceError),
    #[error("could not read repository state")]
    StatusUnavailable(#[source] ServiceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchErrorKind {
    AlreadyExists,
    CreateFailed,
    UncommittedChanges,
    CheckoutFailed,
    AlreadyOnBranch,
    DiscardFailed,
    StatusUnavailable,
}

impl BranchOperationError {
    pub fn kind(&self) -> BranchErrorKind {
        match self {
            BranchOperationError::AlreadyExists { .. } => BranchErrorKind::AlreadyExists,
            BranchOperationError::CreateFailed { .. } => BranchErrorKind::CreateFailed,
            BranchOperationError::UncommittedChanges(_) => BranchErrorKind::UncommittedChanges,
            BranchOperationError::CheckoutFailed { .. } => BranchErrorKind::CheckoutFailed,
            BranchOperationError::AlreadyOnBranch { .. } => BranchErrorKind::AlreadyOnBranch,
            BranchOperationError::DiscardFailed(_) => BranchErrorKind::DiscardFailed,
            BranchOperationError::StatusUnavailable(_) => BranchErrorKind::StatusUnavailable,
        }
    }
}

/// What a view keeps around after an operation failed: the kind to branch on and the message
/// to show next to the control that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    pub kind: BranchErrorKind,
    pub message: String,
}

impl From<&BranchOperationError> for BranchFailure {
    fn from(err: &BranchOperationError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
