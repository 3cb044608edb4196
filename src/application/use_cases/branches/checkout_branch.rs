use crate::application::ports::branch_service::BranchService;
use crate::application::use_cases::branches::errors::BranchOperationError;
use crate::domain::branches::repo_status::{RepoStatus, UncommittedChangesError};

pub struct CheckoutBranch<'a, S>
where
    S: BranchService + ?Sized,
{
    pub service: &'a S,
}

impl<'a, S> CheckoutBranch<'a, S>
where
    S: BranchService + ?Sized,
{
    pub async fn execute(
        &self,
        org: &str,
        app: &str,
        branch_name: &str,
    ) -> Result<RepoStatus, BranchOperationError> {
        let err = match self.service.checkout_branch(org, app, branch_name).await {
            Ok(status) => return Ok(status),
            Err(e) => e,
        };
        // Only a 409 that carries the uncommitted-changes payload is recoverable by discarding.
        if err.is_conflict() {
            if let Some(payload) = err.body().and_then(UncommittedChangesError::from_conflict_body) {
                return Err(BranchOperationError::UncommittedChanges(payload));
            }
        }
        Err(BranchOperationError::CheckoutFailed {
            branch: branch_name.to_string(),
            source: err,
        })
    }
}
