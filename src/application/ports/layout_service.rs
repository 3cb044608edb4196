use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::application::dto::layouts::FormLayoutRequest;
use crate::application::ports::service_error::ServiceError;
use crate::domain::layouts::layout::FormLayout;
use crate::domain::layouts::layout_settings::LayoutSettings;

#[async_trait]
pub trait LayoutService: Send + Sync {
    async fn save_form_layout(
        &self,
        org: &str,
        app: &str,
        layout_name: &str,
        layout_set_name: &str,
        request: &FormLayoutRequest,
    ) -> Result<(), ServiceError>;

    async fn form_layouts(
        &self,
        org: &str,
        app: &str,
        layout_set_name: &str,
    ) -> Result<BTreeMap<String, FormLayout>, ServiceError>;

    async fn layout_settings(
        &self,
        org: &str,
        app: &str,
        layout_set_name: &str,
    ) -> Result<LayoutSettings, ServiceError>;
}
