use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::layouts::layout::{FormLayout, LayoutError};

/// Addresses one layout page of an app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTarget {
    pub org: String,
    pub app: String,
    pub layout_set_name: String,
    pub layout_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentIdChange {
    pub old_component_id: String,
    pub new_component_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormLayoutRequest {
    pub layout: FormLayout,
    pub component_ids_change: Vec<ComponentIdChange>,
}

impl FormLayoutRequest {
    pub fn new(layout: FormLayout) -> Self {
        Self {
            layout,
            component_ids_change: Vec::new(),
        }
    }

    pub fn with_id_change(mut self, old_id: &str, new_id: &str) -> Self {
        if old_id != new_id {
            self.component_ids_change.push(ComponentIdChange {
                old_component_id: old_id.to_string(),
                new_component_id: new_id.to_string(),
            });
        }
        self
    }

    /// Wire body: the layout in its stored document form.
    pub fn to_body(&self) -> Result<Value, LayoutError> {
        let mut body = json!({ "layout": self.layout.to_external()? });
        if !self.component_ids_change.is_empty() {
            body["componentIdsChange"] = json!(self.component_ids_change);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_change_only_recorded_on_rename() {
        let same = FormLayoutRequest::new(FormLayout::empty()).with_id_change("a", "a");
        assert!(same.component_ids_change.is_empty());
        assert!(same.to_body().unwrap().get("componentIdsChange").is_none());

        let renamed = FormLayoutRequest::new(FormLayout::empty()).with_id_change("a", "b");
        let body = renamed.to_body().unwrap();
        assert_eq!(
            body["componentIdsChange"],
            json!([{ "oldComponentId": "a", "newComponentId": "b" }])
        );
        assert!(body["layout"]["data"]["layout"].is_array());
    }
}
