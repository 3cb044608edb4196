use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub commit: Option<BranchCommit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchCommit {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBranchInfo {
    pub branch_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    #[serde(default)]
    pub is_tracking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_name: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BranchNameError {
    #[error("branch name cannot be empty")]
    Empty,
    #[error("branch name contains characters that are not allowed")]
    InvalidCharacters,
    #[error("branch name contains a sequence that is not allowed")]
    InvalidPattern,
}

// Space, ~ ^ : ? * [ \ and ASCII control characters are rejected by git in refnames.
static INVALID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x1f\x7f ~^:?*\[\\]").expect("static regex"));

/// A branch name that git would accept as a ref.
///
/// The coordinators take plain `&str` and leave validation to the caller; this type is what
/// callers (the CLI, a view layer) use to reject a name before asking the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    pub fn parse(raw: &str) -> Result<Self, BranchNameError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(BranchNameError::Empty);
        }
        if INVALID_CHARS.is_match(name) {
            return Err(BranchNameError::InvalidCharacters);
        }
        let bad_pattern = name == "@"
            || name.contains("..")
            || name.contains("@{")
            || name.contains("//")
            || name.contains("/.")
            || name.starts_with('/')
            || name.starts_with('-')
            || name.starts_with('.')
            || name.ends_with('/')
            || name.ends_with('.')
            || name.ends_with(".lock");
        if bad_pattern {
            return Err(BranchNameError::InvalidPattern);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
