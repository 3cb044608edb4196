use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::application::dto::layouts::FormLayoutRequest;
use crate::application::ports::branch_service::BranchService;
use crate::application::ports::layout_service::LayoutService;
use crate::application::ports::service_error::ServiceError;
use crate::domain::branches::branch::{Branch, CurrentBranchInfo};
use crate::domain::branches::repo_status::RepoStatus;
use crate::domain::layouts::layout::FormLayout;
use crate::domain::layouts::layout_settings::LayoutSettings;
use crate::infrastructure::studio_api::paths;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchRequest<'a> {
    branch_name: &'a str,
}

/// Designer API over HTTP. One instance serves both the branch and the layout ports.
#[derive(Clone)]
pub struct StudioApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl StudioApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("studio_api_client_build")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(t) = &self.token {
            req = req.bearer_auth(t);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ServiceError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ServiceError::Transport(anyhow::Error::new(e)))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        // Conflict bodies carry the details callers need, so keep whatever JSON came back.
        let text = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).ok();
        tracing::debug!(status = status.as_u16(), has_body = body.is_some(), "studio_api_error_status");
        Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        decode(resp, path).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        decode(resp, path).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, path: &str) -> Result<T, ServiceError> {
    resp.json::<T>()
        .await
        .with_context(|| format!("decode response of {path}"))
        .map_err(ServiceError::Transport)
}

#[async_trait]
impl BranchService for StudioApiClient {
    async fn create_branch(
        &self,
        org: &str,
        app: &str,
        branch_name: &str,
    ) -> Result<Branch, ServiceError> {
        self.post_json(&paths::branches(org, app), &BranchRequest { branch_name })
            .await
    }

    async fn checkout_branch(
        &self,
        org: &str,
        app: &str,
        branch_name: &str,
    ) -> Result<RepoStatus, ServiceError> {
        self.post_json(&paths::checkout_branch(org, app), &BranchRequest { branch_name })
            .await
    }

    async fn discard_changes(&self, org: &str, app: &str) -> Result<RepoStatus, ServiceError> {
        self.post_json(&paths::discard_changes(org, app), &json!({}))
            .await
    }

    async fn list_branches(&self, org: &str, app: &str) -> Result<Vec<Branch>, ServiceError> {
        self.get_json(&paths::branches(org, app)).await
    }

    async fn current_branch(
        &self,
        org: &str,
        app: &str,
    ) -> Result<CurrentBranchInfo, ServiceError> {
        self.get_json(&paths::current_branch(org, app)).await
    }

    async fn repo_status(&self, org: &str, app: &str) -> Result<RepoStatus, ServiceError> {
        self.get_json(&paths::repo_status(org, app)).await
    }
}

#[async_trait]
impl LayoutService for StudioApiClient {
    async fn save_form_layout(
        &self,
        org: &str,
        app: &str,
        layout_name: &str,
        layout_set_name: &str,
        request: &FormLayoutRequest,
    ) -> Result<(), ServiceError> {
        let path = paths::form_layout(org, app, layout_name, layout_set_name);
        let body = request
            .to_body()
            .with_context(|| format!("encode layout '{layout_name}'"))
            .map_err(ServiceError::Transport)?;
        self.send(self.request(Method::POST, &path).json(&body))
            .await?;
        Ok(())
    }

    async fn form_layouts(
        &self,
        org: &str,
        app: &str,
        layout_set_name: &str,
    ) -> Result<BTreeMap<String, FormLayout>, ServiceError> {
        let docs: BTreeMap<String, Value> = self
            .get_json(&paths::form_layouts(org, app, layout_set_name))
            .await?;
        docs.into_iter()
            .map(|(name, doc)| {
                FormLayout::from_external(&doc)
                    .with_context(|| format!("layout '{name}' is malformed"))
                    .map(|layout| (name, layout))
                    .map_err(ServiceError::Transport)
            })
            .collect()
    }

    async fn layout_settings(
        &self,
        org: &str,
        app: &str,
        layout_set_name: &str,
    ) -> Result<LayoutSettings, ServiceError> {
        self.get_json(&paths::layout_settings(org, app, layout_set_name))
            .await
    }
}
