//! In-memory Studio backend used by the application-layer tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::application::dto::layouts::FormLayoutRequest;
use crate::application::ports::branch_service::BranchService;
use crate::application::ports::layout_service::LayoutService;
use crate::application::ports::reload_signal::{ReloadReason, ReloadSignal};
use crate::application::ports::service_error::ServiceError;
use crate::domain::branches::branch::{Branch, BranchCommit, CurrentBranchInfo};
use crate::domain::branches::repo_status::{RepoStatus, RepositoryStatus};
use crate::domain::layouts::layout::FormLayout;
use crate::domain::layouts::layout_settings::LayoutSettings;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBranch(String),
    CheckoutBranch(String),
    DiscardChanges,
    ListBranches,
    CurrentBranch,
    RepoStatus,
    SaveFormLayout {
        layout_name: String,
        layout_set_name: String,
        request: FormLayoutRequest,
    },
    FormLayouts(String),
    LayoutSettings(String),
}

#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, Option<Value>),
    Transport(&'static str),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, ServiceError> {
        match self {
            Reply::Ok(v) => Ok(v),
            Reply::Status(status, body) => Err(ServiceError::Status { status, body }),
            Reply::Transport(msg) => Err(ServiceError::Transport(anyhow::anyhow!(msg))),
        }
    }
}

pub fn ok_status(branch: &str) -> RepoStatus {
    RepoStatus {
        repository_status: RepositoryStatus::Ok,
        ahead_by: 0,
        behind_by: 0,
        content_status: Vec::new(),
        has_merge_conflict: false,
        current_branch: Some(branch.to_string()),
    }
}

pub fn uncommitted_changes_body(current: &str, target: &str, files: &[&str]) -> Value {
    let files: Vec<Value> = files
        .iter()
        .map(|f| json!({ "filePath": f, "status": "ModifiedInWorkdir" }))
        .collect();
    json!({
        "error": "Cannot switch branches",
        "message": "You have uncommitted changes",
        "uncommittedFiles": files,
        "currentBranch": current,
        "targetBranch": target,
    })
}

/// Replies are consumed in order; an empty queue answers with a plain success.
#[derive(Default)]
pub struct FakeStudio {
    calls: Mutex<Vec<Call>>,
    create: Mutex<VecDeque<Reply<Branch>>>,
    checkout: Mutex<VecDeque<Reply<RepoStatus>>>,
    discard: Mutex<VecDeque<Reply<RepoStatus>>>,
    save: Mutex<VecDeque<Reply<()>>>,
    layouts_reply: Mutex<Option<Reply<BTreeMap<String, FormLayout>>>>,
    layouts: Mutex<HashMap<String, BTreeMap<String, FormLayout>>>,
    current_branch: Mutex<Option<String>>,
    latency: Mutex<Option<Duration>>,
}

impl FakeStudio {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn saves(&self) -> Vec<FormLayoutRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::SaveFormLayout { request, .. } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn push_create(&self, reply: Reply<Branch>) {
        self.create.lock().unwrap().push_back(reply);
    }

    pub fn push_checkout(&self, reply: Reply<RepoStatus>) {
        self.checkout.lock().unwrap().push_back(reply);
    }

    pub fn push_discard(&self, reply: Reply<RepoStatus>) {
        self.discard.lock().unwrap().push_back(reply);
    }

    pub fn push_save(&self, reply: Reply<()>) {
        self.save.lock().unwrap().push_back(reply);
    }

    pub fn set_layouts_reply(&self, reply: Reply<BTreeMap<String, FormLayout>>) {
        *self.layouts_reply.lock().unwrap() = Some(reply);
    }

    pub fn set_layout(&self, layout_set_name: &str, layout_name: &str, layout: FormLayout) {
        self.layouts
            .lock()
            .unwrap()
            .entry(layout_set_name.to_string())
            .or_default()
            .insert(layout_name.to_string(), layout);
    }

    pub fn set_current_branch(&self, branch: &str) {
        *self.current_branch.lock().unwrap() = Some(branch.to_string());
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        let latency = *self.latency.lock().unwrap();
        if let Some(d) = latency {
            tokio::time::sleep(d).await;
        }
    }

    fn current(&self) -> String {
        self.current_branch
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "master".to_string())
    }
}

#[async_trait]
impl BranchService for FakeStudio {
    async fn create_branch(
        &self,
        _org: &str,
        _app: &str,
        branch_name: &str,
    ) -> Result<Branch, ServiceError> {
        self.record(Call::CreateBranch(branch_name.to_string()));
        self.pause().await;
        let reply = self.create.lock().unwrap().pop_front();
        reply
            .unwrap_or_else(|| {
                Reply::Ok(Branch {
                    name: branch_name.to_string(),
                    commit: Some(BranchCommit {
                        id: "abc123".into(),
                        message: "Initial commit".into(),
                    }),
                })
            })
            .into_result()
    }

    async fn checkout_branch(
        &self,
        _org: &str,
        _app: &str,
        branch_name: &str,
    ) -> Result<RepoStatus, ServiceError> {
        self.record(Call::CheckoutBranch(branch_name.to_string()));
        self.pause().await;
        let reply = self.checkout.lock().unwrap().pop_front();
        let result = reply
            .unwrap_or_else(|| Reply::Ok(ok_status(branch_name)))
            .into_result();
        if result.is_ok() {
            self.set_current_branch(branch_name);
        }
        result
    }

    async fn discard_changes(&self, _org: &str, _app: &str) -> Result<RepoStatus, ServiceError> {
        self.record(Call::DiscardChanges);
        self.pause().await;
        let current = self.current();
        let reply = self.discard.lock().unwrap().pop_front();
        reply
            .unwrap_or_else(|| Reply::Ok(ok_status(&current)))
            .into_result()
    }

    async fn list_branches(&self, _org: &str, _app: &str) -> Result<Vec<Branch>, ServiceError> {
        self.record(Call::ListBranches);
        Ok(vec![Branch {
            name: self.current(),
            commit: None,
        }])
    }

    async fn current_branch(
        &self,
        _org: &str,
        _app: &str,
    ) -> Result<CurrentBranchInfo, ServiceError> {
        self.record(Call::CurrentBranch);
        Ok(CurrentBranchInfo {
            branch_name: self.current(),
            commit_sha: None,
            is_tracking: true,
            remote_name: Some("origin".into()),
        })
    }

    async fn repo_status(&self, _org: &str, _app: &str) -> Result<RepoStatus, ServiceError> {
        self.record(Call::RepoStatus);
        Ok(ok_status(&self.current()))
    }
}

#[async_trait]
impl LayoutService for FakeStudio {
    async fn save_form_layout(
        &self,
        _org: &str,
        _app: &str,
        layout_name: &str,
        layout_set_name: &str,
        request: &FormLayoutRequest,
    ) -> Result<(), ServiceError> {
        self.record(Call::SaveFormLayout {
            layout_name: layout_name.to_string(),
            layout_set_name: layout_set_name.to_string(),
            request: request.clone(),
        });
        self.pause().await;
        let reply = self.save.lock().unwrap().pop_front();
        let result = reply.unwrap_or(Reply::Ok(())).into_result();
        if result.is_ok() {
            self.set_layout(layout_set_name, layout_name, request.layout.clone());
        }
        result
    }

    async fn form_layouts(
        &self,
        _org: &str,
        _app: &str,
        layout_set_name: &str,
    ) -> Result<BTreeMap<String, FormLayout>, ServiceError> {
        self.record(Call::FormLayouts(layout_set_name.to_string()));
        if let Some(reply) = self.layouts_reply.lock().unwrap().clone() {
            return reply.into_result();
        }
        Ok(self
            .layouts
            .lock()
            .unwrap()
            .get(layout_set_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn layout_settings(
        &self,
        _org: &str,
        _app: &str,
        layout_set_name: &str,
    ) -> Result<LayoutSettings, ServiceError> {
        self.record(Call::LayoutSettings(layout_set_name.to_string()));
        Ok(LayoutSettings::default())
    }
}

#[derive(Default)]
pub struct RecordingReload {
    reasons: Mutex<Vec<ReloadReason>>,
}

impl RecordingReload {
    pub fn count(&self) -> usize {
        self.reasons.lock().unwrap().len()
    }

    pub fn reasons(&self) -> Vec<ReloadReason> {
        self.reasons.lock().unwrap().clone()
    }
}

impl ReloadSignal for RecordingReload {
    fn request_reload(&self, reason: ReloadReason) {
        self.reasons.lock().unwrap().push(reason);
    }
}
