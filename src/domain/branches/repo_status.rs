use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepositoryStatus {
    Ok,
    CheckoutConflict,
    MergeConflict,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryContent {
    pub file_path: String,
    pub file_status: String,
}

/// Snapshot of the working tree as reported by the backend. Superseded by the next query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatus {
    pub repository_status: RepositoryStatus,
    #[serde(default)]
    pub ahead_by: u32,
    #[serde(default)]
    pub behind_by: u32,
    #[serde(default)]
    pub content_status: Vec<RepositoryContent>,
    #[serde(default)]
    pub has_merge_conflict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_branch: Option<String>,
}

impl RepoStatus {
    pub fn has_local_changes(&self) -> bool {
        !self.content_status.is_empty()
    }

    pub fn is_in_sync(&self) -> bool {
        self.ahead_by == 0 && self.behind_by == 0 && !self.has_local_changes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncommittedFile {
    pub file_path: String,
    pub status: String,
}

/// Payload of a checkout rejected because the working tree has local modifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncommittedChangesError {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    pub uncommitted_files: Vec<UncommittedFile>,
    pub current_branch: String,
    pub target_branch: String,
}

impl UncommittedChangesError {
    /// Interprets a conflict body; `None` when it is not an uncommitted-changes payload.
    pub fn from_conflict_body(body: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(body.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_backend_status_payload() {
        let status: RepoStatus = serde_json::from_value(json!({
            "repositoryStatus": "Ok",
            "aheadBy": 1,
            "behindBy": 0,
            "contentStatus": [{ "filePath": "App/ui/form/layouts/Side1.json", "fileStatus": "ModifiedInWorkdir" }],
            "hasMergeConflict": false,
            "currentBranch": "feature/test"
        }))
        .unwrap();
        assert_eq!(status.repository_status, RepositoryStatus::Ok);
        assert!(status.has_local_changes());
        assert!(!status.is_in_sync());
        assert_eq!(status.current_branch.as_deref(), Some("feature/test"));
    }

    #[test]
    fn unknown_repository_status_maps_to_other() {
        let status: RepoStatus =
            serde_json::from_value(json!({ "repositoryStatus": "RemoteUnavailable" })).unwrap();
        assert_eq!(status.repository_status, RepositoryStatus::Other);
        assert!(status.is_in_sync());
    }

    #[test]
    fn conflict_body_requires_uncommitted_changes_shape() {
        let body = json!({
            "error": "Cannot switch branches",
            "message": "You have uncommitted changes",
            "uncommittedFiles": [{ "filePath": "a.json", "status": "Modified" }],
            "currentBranch": "main",
            "targetBranch": "feature/test"
        });
        let parsed = UncommittedChangesError::from_conflict_body(&body).unwrap();
        assert_eq!(parsed.target_branch, "feature/test");
        assert_eq!(parsed.uncommitted_files.len(), 1);

        assert!(UncommittedChangesError::from_conflict_body(&json!({})).is_none());
        assert!(UncommittedChangesError::from_conflict_body(&json!("conflict")).is_none());
    }
}
