use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::application::dto::layouts::LayoutTarget;
use crate::application::ports::layout_service::LayoutService;
use crate::application::services::layout_cache::LayoutCache;
use crate::application::use_cases::form_items::save_form_item::{
    FormItemSaveError, SaveFormItem, SavedFormItem,
};
use crate::domain::layouts::form_item::FormItem;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormItemState {
    pub form_item_id: Option<String>,
    pub form_item: Option<FormItem>,
}

struct EditorInner {
    target: LayoutTarget,
    layouts: Arc<dyn LayoutService>,
    cache: Arc<LayoutCache>,
    debounce: Duration,
    state: Mutex<FormItemState>,
    // Bumped by debounce_save, handle_edit and handle_discard; a woken timer only saves if it
    // still holds the latest value.
    generation: AtomicU64,
}

impl EditorInner {
    fn state(&self) -> MutexGuard<'_, FormItemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Pending debounced saves compare against this; bumping it makes them resolve `Ok(None)`.
    fn retire_pending(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// `generation` is set for debounced saves. If the editor moved on while the request was in
    /// flight, the tracked id is left alone.
    async fn save(
        &self,
        id: &str,
        item: &FormItem,
        generation: Option<u64>,
    ) -> Result<SavedFormItem, FormItemSaveError> {
        let uc = SaveFormItem {
            layouts: self.layouts.as_ref(),
            cache: self.cache.as_ref(),
        };
        let saved = uc.execute(&self.target, id, item).await?;
        {
            let mut state = self.state();
            if generation.is_none_or(|g| self.is_current(g)) {
                state.form_item_id = Some(saved.id.clone());
            }
        }
        tracing::debug!(
            layout = %self.target.layout_name,
            previous_id = %saved.previous_id,
            id = %saved.id,
            "form_item_saved"
        );
        self.cache
            .refetch(&self.target.layout_set_name, saved.id_changed)
            .await
            .map_err(FormItemSaveError::Refetch)?;
        Ok(saved)
    }
}

/// Result of a debounced save. Dropping it does not cancel the save.
pub struct PendingSave(JoinHandle<Result<Option<SavedFormItem>, FormItemSaveError>>);

impl PendingSave {
    /// `Ok(None)` when a later `debounce_save` superseded this one.
    pub async fn outcome(self) -> Result<Option<SavedFormItem>, FormItemSaveError> {
        match self.0.await {
            Ok(result) => result,
            Err(_) => Err(FormItemSaveError::Interrupted),
        }
    }
}

/// Holds the single component or container open for editing on one layout page and saves it,
/// either right away or after the autosave interval has passed without further edits.
///
/// A save never rolls back `form_item` on failure; the error is handed to the caller.
#[derive(Clone)]
pub struct FormItemEditor {
    inner: Arc<EditorInner>,
}

impl FormItemEditor {
    pub fn new(
        target: LayoutTarget,
        layouts: Arc<dyn LayoutService>,
        cache: Arc<LayoutCache>,
        debounce: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(EditorInner {
                target,
                layouts,
                cache,
                debounce,
                state: Mutex::new(FormItemState::default()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn target(&self) -> &LayoutTarget {
        &self.inner.target
    }

    pub fn form_item_id(&self) -> Option<String> {
        self.inner.state().form_item_id.clone()
    }

    pub fn form_item(&self) -> Option<FormItem> {
        self.inner.state().form_item.clone()
    }

    pub fn snapshot(&self) -> FormItemState {
        self.inner.state().clone()
    }

    pub fn handle_update(&self, item: FormItem) {
        self.inner.state().form_item = Some(item);
    }

    /// Opens `item`. Whatever was open before is dropped unsaved, including a pending
    /// debounced save.
    pub fn handle_edit(&self, item: FormItem) {
        let mut state = self.inner.state();
        self.inner.retire_pending();
        state.form_item_id = Some(item.id().to_string());
        state.form_item = Some(item);
    }

    /// Closes the editor. A pending debounced save is dropped.
    pub fn handle_discard(&self) {
        let mut state = self.inner.state();
        self.inner.retire_pending();
        *state = FormItemState::default();
    }

    /// Saves `item` in place of the layout entry currently addressed by `id`. `item.id()` may
    /// differ from `id`; afterwards the editor tracks the new id.
    pub async fn handle_save(
        &self,
        id: &str,
        item: FormItem,
    ) -> Result<SavedFormItem, FormItemSaveError> {
        self.inner.save(id, &item, None).await.inspect_err(|e| {
            tracing::error!(id = %id, error = ?e, "form_item_save_failed");
        })
    }

    /// Like `handle_save`, delayed by the autosave interval. Calls arriving within the interval
    /// restart it and only the last `(id, item)` is written. `handle_edit` and `handle_discard`
    /// cancel it.
    pub fn debounce_save(&self, id: &str, item: FormItem) -> PendingSave {
        let generation = self.inner.retire_pending();
        let deadline = Instant::now() + self.inner.debounce;
        let inner = self.inner.clone();
        let id = id.to_string();
        PendingSave(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if !inner.is_current(generation) {
                return Ok(None);
            }
            match inner.save(&id, &item, Some(generation)).await {
                Ok(saved) => Ok(Some(saved)),
                Err(e) => {
                    tracing::error!(id = %id, error = ?e, "debounced_save_failed");
                    Err(e)
                }
            }
        }))
    }
}
