use async_trait::async_trait;

use crate::application::ports::service_error::ServiceError;
use crate::domain::branches::branch::{Branch, CurrentBranchInfo};
use crate::domain::branches::repo_status::RepoStatus;

#[async_trait]
pub trait BranchService: Send + Sync {
    async fn create_branch(
        &self,
        org: &str,
        app: &str,
        branch_name: &str,
    ) -> Result<Branch, ServiceError>;

    // 409 with an uncommitted-changes body when the working tree is dirty.
    async fn checkout_branch(
        &self,
        org: &str,
        app: &str,
        branch_name: &str,
    ) -> Result<RepoStatus, ServiceError>;

    async fn discard_changes(&self, org: &str, app: &str) -> Result<RepoStatus, ServiceError>;

    async fn list_branches(&self, org: &str, app: &str) -> Result<Vec<Branch>, ServiceError>;

    async fn current_branch(
        &self,
        org: &str,
        app: &str,
    ) -> Result<CurrentBranchInfo, ServiceError>;

    async fn repo_status(&self, org: &str, app: &str) -> Result<RepoStatus, ServiceError>;
}
