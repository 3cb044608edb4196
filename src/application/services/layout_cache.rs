use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use crate::application::ports::layout_service::LayoutService;
use crate::application::ports::service_error::ServiceError;
use crate::domain::layouts::layout::FormLayout;
use crate::domain::layouts::layout_settings::LayoutSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutCacheEvent {
    // item_id_changed tells tree views that a selection held by id may now be stale.
    Refetched {
        layout_set_name: String,
        item_id_changed: bool,
    },
}

/// Layouts and layout settings of one app, keyed by layout set. Only `refetch` writes to it;
/// editors read a layout, save through the backend, then ask for a refetch.
pub struct LayoutCache {
    org: String,
    app: String,
    service: Arc<dyn LayoutService>,
    layouts: RwLock<HashMap<String, BTreeMap<String, FormLayout>>>,
    settings: RwLock<HashMap<String, LayoutSettings>>,
    events: broadcast::Sender<LayoutCacheEvent>,
}

impl LayoutCache {
    pub fn new(org: &str, app: &str, service: Arc<dyn LayoutService>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            org: org.to_string(),
            app: app.to_string(),
            service,
            layouts: RwLock::new(HashMap::new()),
            settings: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LayoutCacheEvent> {
        self.events.subscribe()
    }

    pub async fn layout(&self, layout_set_name: &str, layout_name: &str) -> Option<FormLayout> {
        self.layouts
            .read()
            .await
            .get(layout_set_name)
            .and_then(|set| set.get(layout_name))
            .cloned()
    }

    pub async fn layouts(&self, layout_set_name: &str) -> Option<BTreeMap<String, FormLayout>> {
        self.layouts.read().await.get(layout_set_name).cloned()
    }

    pub async fn settings(&self, layout_set_name: &str) -> Option<LayoutSettings> {
        self.settings.read().await.get(layout_set_name).cloned()
    }

    /// Reloads layouts and layout settings of a layout set from the backend.
    pub async fn refetch(
        &self,
        layout_set_name: &str,
        item_id_changed: bool,
    ) -> Result<(), ServiceError> {
        let (layouts, settings) = tokio::try_join!(
            self.service
                .form_layouts(&self.org, &self.app, layout_set_name),
            self.service
                .layout_settings(&self.org, &self.app, layout_set_name),
        )?;
        tracing::debug!(
            layout_set = %layout_set_name,
            layouts = layouts.len(),
            item_id_changed,
            "layout_cache_refetched"
        );

        self.layouts
            .write()
            .await
            .insert(layout_set_name.to_string(), layouts);
        self.settings
            .write()
            .await
            .insert(layout_set_name.to_string(), settings);

        // No subscribers is fine.
        let _ = self.events.send(LayoutCacheEvent::Refetched {
            layout_set_name: layout_set_name.to_string(),
            item_id_changed,
        });
        Ok(())
    }
}
