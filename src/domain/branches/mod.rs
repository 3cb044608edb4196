pub mod branch;
pub mod repo_status;
