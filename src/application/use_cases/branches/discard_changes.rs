use crate::application::ports::branch_service::BranchService;
use crate::application::use_cases::branches::errors::BranchOperationError;
use crate::domain::branches::repo_status::RepoStatus;

pub struct DiscardChanges<'a, S>
where
    S: BranchService + ?Sized,
{
    pub service: &'a S,
}

impl<'a, S> DiscardChanges<'a, S>
where
    S: BranchService + ?Sized,
{
    pub async fn execute(&self, org: &str, app: &str) -> Result<RepoStatus, BranchOperationError> {
        self.service
            .discard_changes(org, app)
            .await
            .map_err(BranchOperationError::DiscardFailed)
    }
}
