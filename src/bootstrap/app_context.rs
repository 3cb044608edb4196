use std::sync::Arc;

use crate::application::dto::layouts::LayoutTarget;
use crate::application::ports::branch_service::BranchService;
use crate::application::ports::layout_service::LayoutService;
use crate::application::ports::reload_signal::ReloadSignal;
use crate::application::services::layout_cache::LayoutCache;
use crate::application::use_cases::branches::branch_operations::BranchOperations;
use crate::application::use_cases::form_items::form_item_editor::FormItemEditor;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    branch_service: Arc<dyn BranchService>,
    layout_service: Arc<dyn LayoutService>,
    reload_signal: Arc<dyn ReloadSignal>,
}

impl AppServices {
    pub fn new(
        branch_service: Arc<dyn BranchService>,
        layout_service: Arc<dyn LayoutService>,
        reload_signal: Arc<dyn ReloadSignal>,
    ) -> Self {
        Self {
            branch_service,
            layout_service,
            reload_signal,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn branch_service(&self) -> Arc<dyn BranchService> {
        self.services.branch_service.clone()
    }

    pub fn layout_service(&self) -> Arc<dyn LayoutService> {
        self.services.layout_service.clone()
    }

    pub fn reload_signal(&self) -> Arc<dyn ReloadSignal> {
        self.services.reload_signal.clone()
    }

    pub fn branch_operations(&self) -> BranchOperations {
        BranchOperations::new(
            &self.cfg.org,
            &self.cfg.app,
            self.branch_service(),
            self.reload_signal(),
        )
    }

    pub fn layout_cache(&self) -> LayoutCache {
        LayoutCache::new(&self.cfg.org, &self.cfg.app, self.layout_service())
    }

    /// Editor for one page of the configured layout set, sharing `cache` with other editors.
    pub fn form_item_editor(&self, cache: Arc<LayoutCache>, layout_name: &str) -> FormItemEditor {
        let target = LayoutTarget {
            org: self.cfg.org.clone(),
            app: self.cfg.app.clone(),
            layout_set_name: self.cfg.layout_set.clone(),
            layout_name: layout_name.to_string(),
        };
        FormItemEditor::new(
            target,
            self.layout_service(),
            cache,
            self.cfg.autosave_debounce,
        )
    }
}
