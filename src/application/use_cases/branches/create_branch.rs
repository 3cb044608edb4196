use crate::application::ports::branch_service::BranchService;
use crate::application::use_cases::branches::errors::BranchOperationError;
use crate::domain::branches::branch::Branch;

pub struct CreateBranch<'a, S>
where
    S: BranchService + ?Sized,
{
    pub service: &'a S,
}

impl<'a, S> CreateBranch<'a, S>
where
    S: BranchService + ?Sized,
{
    pub async fn execute(
        &self,
        org: &str,
        app: &str,
        branch_name: &str,
    ) -> Result<Branch, BranchOperationError> {
        match self.service.create_branch(org, app, branch_name).await {
            Ok(branch) => Ok(branch),
            Err(e) if e.is_conflict() => Err(BranchOperationError::AlreadyExists {
                branch: branch_name.to_string(),
            }),
            Err(source) => Err(BranchOperationError::CreateFailed {
                branch: branch_name.to_string(),
                source,
            }),
        }
    }
}
