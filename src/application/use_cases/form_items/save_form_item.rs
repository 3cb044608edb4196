use crate::application::dto::layouts::{FormLayoutRequest, LayoutTarget};
use crate::application::ports::layout_service::LayoutService;
use crate::application::ports::service_error::ServiceError;
use crate::application::services::layout_cache::LayoutCache;
use crate::domain::layouts::form_item::FormItem;
use crate::domain::layouts::layout::LayoutError;

#[derive(thiserror::Error, Debug)]
pub enum FormItemSaveError {
    #[error("layout '{layout_name}' of layout set '{layout_set_name}' is not loaded")]
    LayoutNotLoaded {
        layout_set_name: String,
        layout_name: String,
    },
    #[error("edit cannot be applied to the layout")]
    InvalidUpdate(#[from] LayoutError),
    #[error("could not save layout '{layout_name}'")]
    Save {
        layout_name: String,
        #[source]
        source: ServiceError,
    },
    #[error("layout was saved but could not be reloaded")]
    Refetch(#[source] ServiceError),
    #[error("autosave task stopped before finishing")]
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFormItem {
    pub previous_id: String,
    pub id: String,
    pub id_changed: bool,
}

/// Writes one edited item into its layout page and persists the page.
pub struct SaveFormItem<'a, L>
where
    L: LayoutService + ?Sized,
{
    pub layouts: &'a L,
    pub cache: &'a LayoutCache,
}

impl<'a, L> SaveFormItem<'a, L>
where
    L: LayoutService + ?Sized,
{
    pub async fn execute(
        &self,
        target: &LayoutTarget,
        id: &str,
        item: &FormItem,
    ) -> Result<SavedFormItem, FormItemSaveError> {
        let layout = self
            .cache
            .layout(&target.layout_set_name, &target.layout_name)
            .await
            .ok_or_else(|| FormItemSaveError::LayoutNotLoaded {
                layout_set_name: target.layout_set_name.clone(),
                layout_name: target.layout_name.clone(),
            })?;
        let updated = layout.update_item(id, item)?;
        let request = FormLayoutRequest::new(updated).with_id_change(id, item.id());

        self.layouts
            .save_form_layout(
                &target.org,
                &target.app,
                &target.layout_name,
                &target.layout_set_name,
                &request,
            )
            .await
            .map_err(|source| FormItemSaveError::Save {
                layout_name: target.layout_name.clone(),
                source,
            })?;

        Ok(SavedFormItem {
            previous_id: id.to_string(),
            id: item.id().to_string(),
            id_changed: id != item.id(),
        })
    }
}
