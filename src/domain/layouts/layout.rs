use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::layouts::form_item::{FormComponent, FormContainer, FormItem};

pub const BASE_CONTAINER_ID: &str = "__base__";
pub const LAYOUT_SCHEMA_URL: &str =
    "https://altinncdn.no/toolkits/altinn-app-frontend/4/schemas/json/layout/layout.schema.v1.json";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no component or container with id '{0}' in layout")]
    ItemNotFound(String),
    #[error("id '{0}' is already used in layout")]
    DuplicateId(String),
    #[error("item '{0}' cannot change between component and container")]
    KindMismatch(String),
    #[error("the base container cannot be replaced")]
    BaseContainer,
    #[error("malformed layout document: {0}")]
    Malformed(String),
    #[error("item '{id}' could not be serialized: {reason}")]
    Unserializable { id: String, reason: String },
}

/// Editor-side representation of one layout page: flat maps of items plus the child order of
/// every container. `order[BASE_CONTAINER_ID]` lists the top-level items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormLayout {
    pub components: BTreeMap<String, FormComponent>,
    pub containers: BTreeMap<String, FormContainer>,
    pub order: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_root_properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_data_properties: Map<String, Value>,
}

impl Default for FormLayout {
    fn default() -> Self {
        Self::empty()
    }
}

impl FormLayout {
    pub fn empty() -> Self {
        let mut containers = BTreeMap::new();
        containers.insert(
            BASE_CONTAINER_ID.to_string(),
            FormContainer::new(BASE_CONTAINER_ID, None),
        );
        let mut order = BTreeMap::new();
        order.insert(BASE_CONTAINER_ID.to_string(), Vec::new());
        Self {
            components: BTreeMap::new(),
            containers,
            order,
            custom_root_properties: Map::new(),
            custom_data_properties: Map::new(),
        }
    }

    pub fn item(&self, id: &str) -> Option<FormItem> {
        if let Some(c) = self.components.get(id) {
            return Some(FormItem::Component(c.clone()));
        }
        self.containers
            .get(id)
            .map(|c| FormItem::Container(c.clone()))
    }

    pub fn parent_id(&self, id: &str) -> Option<&str> {
        self.order
            .iter()
            .find(|(_, children)| children.iter().any(|c| c == id))
            .map(|(parent, _)| parent.as_str())
    }

    /// Case-insensitive, matching how the backend resolves ids.
    pub fn contains_id(&self, id: &str) -> bool {
        let wanted = id.to_uppercase();
        self.components
            .keys()
            .chain(self.containers.keys())
            .any(|k| k.to_uppercase() == wanted)
    }

    pub fn all_item_ids(&self) -> Vec<String> {
        self.order.values().flatten().cloned().collect()
    }

    pub fn add_item(&mut self, item: FormItem, parent_id: &str) -> Result<(), LayoutError> {
        if self.contains_id(item.id()) {
            return Err(LayoutError::DuplicateId(item.id().to_string()));
        }
        if !self.order.contains_key(parent_id) {
            return Err(LayoutError::ItemNotFound(parent_id.to_string()));
        }
        let id = item.id().to_string();
        match item {
            FormItem::Component(c) => {
                self.components.insert(id.clone(), c);
            }
            FormItem::Container(c) => {
                self.containers.insert(id.clone(), c);
                self.order.insert(id.clone(), Vec::new());
            }
        }
        if let Some(children) = self.order.get_mut(parent_id) {
            children.push(id);
        }
        Ok(())
    }

    /// Returns a copy of the layout with the item currently addressed by `current_id` replaced by
    /// `item`. When `item` carries a different id the entry is moved and every order list that
    /// referenced the old id is rewritten.
    pub fn update_item(&self, current_id: &str, item: &FormItem) -> Result<Self, LayoutError> {
        if current_id == BASE_CONTAINER_ID {
            return Err(LayoutError::BaseContainer);
        }
        let new_id = item.id();
        let renamed = new_id != current_id;
        if renamed && (new_id == BASE_CONTAINER_ID || self.contains_id(new_id)) {
            // A case-only rename of the same item is allowed.
            if !new_id.eq_ignore_ascii_case(current_id) || self.item(new_id).is_some() {
                return Err(LayoutError::DuplicateId(new_id.to_string()));
            }
        }

        let mut next = self.clone();
        match item {
            FormItem::Component(component) => {
                if next.containers.contains_key(current_id) {
                    return Err(LayoutError::KindMismatch(current_id.to_string()));
                }
                if next.components.remove(current_id).is_none() {
                    return Err(LayoutError::ItemNotFound(current_id.to_string()));
                }
                next.components.insert(new_id.to_string(), component.clone());
            }
            FormItem::Container(container) => {
                if next.components.contains_key(current_id) {
                    return Err(LayoutError::KindMismatch(current_id.to_string()));
                }
                if next.containers.remove(current_id).is_none() {
                    return Err(LayoutError::ItemNotFound(current_id.to_string()));
                }
                next.containers.insert(new_id.to_string(), container.clone());
                if renamed {
                    let children = next.order.remove(current_id).unwrap_or_default();
                    next.order.insert(new_id.to_string(), children);
                }
            }
        }

        if renamed {
            for children in next.order.values_mut() {
                for child in children.iter_mut().filter(|c| c.as_str() == current_id) {
                    *child = new_id.to_string();
                }
            }
        }
        Ok(next)
    }

    /// Converts to the stored document: a flat `data.layout` array where containers reference
    /// their children by id. Items are emitted depth first in container order.
    pub fn to_external(&self) -> Result<Value, LayoutError> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        self.push_external_items(BASE_CONTAINER_ID, &mut items, &mut visited)?;

        let mut data = self.custom_data_properties.clone();
        data.insert("layout".into(), Value::Array(items));

        let mut root = Map::new();
        root.insert("$schema".into(), json!(LAYOUT_SCHEMA_URL));
        for (k, v) in &self.custom_root_properties {
            root.insert(k.clone(), v.clone());
        }
        root.insert("data".into(), Value::Object(data));
        Ok(Value::Object(root))
    }

    fn push_external_items(
        &self,
        parent: &str,
        out: &mut Vec<Value>,
        visited: &mut HashSet<String>,
    ) -> Result<(), LayoutError> {
        let Some(children) = self.order.get(parent) else {
            return Ok(());
        };
        for id in children {
            if !visited.insert(id.clone()) {
                continue;
            }
            if let Some(component) = self.components.get(id) {
                let mut value = item_value(id, component)?;
                if let Value::Object(map) = &mut value {
                    map.remove("pageIndex");
                }
                out.push(value);
            } else if let Some(container) = self.containers.get(id) {
                let mut value = item_value(id, container)?;
                if let Value::Object(map) = &mut value {
                    map.remove("pageIndex");
                    let child_ids = self.order.get(id).cloned().unwrap_or_default();
                    map.insert("children".into(), json!(child_ids));
                }
                out.push(value);
                self.push_external_items(id, out, visited)?;
            }
        }
        Ok(())
    }

    pub fn from_external(doc: &Value) -> Result<Self, LayoutError> {
        let root = doc
            .as_object()
            .ok_or_else(|| LayoutError::Malformed("document is not an object".into()))?;
        let data = root
            .get("data")
            .and_then(Value::as_object)
            .ok_or_else(|| LayoutError::Malformed("missing data object".into()))?;
        let items: &[Value] = match data.get("layout") {
            Some(Value::Array(items)) => items.as_slice(),
            None | Some(Value::Null) => &[],
            Some(_) => return Err(LayoutError::Malformed("data.layout is not an array".into())),
        };

        let mut layout = Self::empty();
        let mut child_ids = HashSet::new();
        let mut top_level = Vec::new();

        for raw in items {
            let mut obj = raw
                .as_object()
                .cloned()
                .ok_or_else(|| LayoutError::Malformed("layout item is not an object".into()))?;
            let id = obj
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| LayoutError::Malformed("layout item without id".into()))?;
            if layout.components.contains_key(&id) || layout.containers.contains_key(&id) {
                return Err(LayoutError::DuplicateId(id));
            }
            top_level.push(id.clone());

            match obj.remove("children") {
                Some(Value::Array(children)) => {
                    let children: Vec<String> = children
                        .iter()
                        .filter_map(Value::as_str)
                        .map(strip_page_prefix)
                        .collect();
                    child_ids.extend(children.iter().cloned());
                    let container: FormContainer = serde_json::from_value(Value::Object(obj))
                        .map_err(|e| LayoutError::Malformed(format!("container '{id}': {e}")))?;
                    layout.containers.insert(id.clone(), container);
                    layout.order.insert(id, children);
                }
                _ => {
                    let component: FormComponent = serde_json::from_value(Value::Object(obj))
                        .map_err(|e| LayoutError::Malformed(format!("component '{id}': {e}")))?;
                    layout.components.insert(id, component);
                }
            }
        }

        let base: Vec<String> = top_level
            .into_iter()
            .filter(|id| !child_ids.contains(id))
            .collect();
        layout.order.insert(BASE_CONTAINER_ID.to_string(), base);

        for (k, v) in data {
            if k != "layout" {
                layout.custom_data_properties.insert(k.clone(), v.clone());
            }
        }
        for (k, v) in root {
            if k != "data" && k != "$schema" {
                layout.custom_root_properties.insert(k.clone(), v.clone());
            }
        }
        Ok(layout)
    }
}

// Multi-page groups prefix children with "<page>:".
fn strip_page_prefix(child: &str) -> String {
    match child.split_once(':') {
        Some((page, id)) if page.chars().all(|c| c.is_ascii_digit()) => id.to_string(),
        _ => child.to_string(),
    }
}

fn item_value(id: &str, item: &impl serde::Serialize) -> Result<Value, LayoutError> {
    serde_json::to_value(item).map_err(|e| LayoutError::Unserializable {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_layout() -> FormLayout {
        let mut layout = FormLayout::empty();
        layout
            .add_item(FormComponent::new("name", "Input").into(), BASE_CONTAINER_ID)
            .unwrap();
        layout
            .add_item(FormContainer::new("group", Some("Group")).into(), BASE_CONTAINER_ID)
            .unwrap();
        layout
            .add_item(FormComponent::new("street", "Input").into(), "group")
            .unwrap();
        layout
    }

    #[test]
    fn update_without_rename_replaces_properties() {
        let layout = sample_layout();
        let mut component = FormComponent::new("name", "TextArea");
        component.required = Some(true);
        let updated = layout.update_item("name", &component.into()).unwrap();

        assert_eq!(updated.components["name"].component_type, "TextArea");
        assert_eq!(updated.components["name"].required, Some(true));
        assert_eq!(updated.order, layout.order);
    }

    #[test]
    fn renaming_component_rewrites_parent_order() {
        let layout = sample_layout();
        let renamed = FormItem::from(FormComponent::new("road", "Input"));
        let updated = layout.update_item("street", &renamed).unwrap();

        assert!(!updated.components.contains_key("street"));
        assert!(updated.components.contains_key("road"));
        assert_eq!(updated.order["group"], vec!["road".to_string()]);
        assert_eq!(updated.parent_id("road"), Some("group"));
    }

    #[test]
    fn renaming_container_moves_its_child_list() {
        let layout = sample_layout();
        let renamed = FormItem::from(FormContainer::new("address", Some("Group")));
        let updated = layout.update_item("group", &renamed).unwrap();

        assert!(!updated.order.contains_key("group"));
        assert_eq!(updated.order["address"], vec!["street".to_string()]);
        assert_eq!(
            updated.order[BASE_CONTAINER_ID],
            vec!["name".to_string(), "address".to_string()]
        );
    }

    #[test]
    fn update_rejects_collisions_and_unknown_ids() {
        let layout = sample_layout();
        assert_eq!(
            layout.update_item("name", &FormComponent::new("STREET", "Input").into()),
            Err(LayoutError::DuplicateId("STREET".into()))
        );
        assert_eq!(
            layout.update_item("missing", &FormComponent::new("missing", "Input").into()),
            Err(LayoutError::ItemNotFound("missing".into()))
        );
        assert_eq!(
            layout.update_item("group", &FormComponent::new("group", "Input").into()),
            Err(LayoutError::KindMismatch("group".into()))
        );
        assert_eq!(
            layout.update_item(BASE_CONTAINER_ID, &FormContainer::new("x", None).into()),
            Err(LayoutError::BaseContainer)
        );
    }

    #[test]
    fn case_only_rename_is_allowed() {
        let layout = sample_layout();
        let updated = layout
            .update_item("name", &FormComponent::new("Name", "Input").into())
            .unwrap();
        assert!(updated.components.contains_key("Name"));
        assert_eq!(updated.order[BASE_CONTAINER_ID][0], "Name");
    }

    #[test]
    fn external_document_keeps_structure() {
        let layout = sample_layout();
        let doc = layout.to_external().unwrap();
        let items = doc["data"]["layout"].as_array().unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["name", "group", "street"]);
        assert_eq!(items[1]["children"], json!(["street"]));

        let parsed = FormLayout::from_external(&doc).unwrap();
        assert_eq!(parsed.order, layout.order);
        assert_eq!(parsed.components, layout.components);
    }

    #[test]
    fn external_children_with_page_prefix_are_resolved() {
        let doc = json!({
            "data": {
                "layout": [
                    { "id": "rep", "type": "RepeatingGroup", "children": ["0:a", "1:b"] },
                    { "id": "a", "type": "Input" },
                    { "id": "b", "type": "Input" }
                ],
                "hidden": false
            },
            "extra": 1
        });
        let layout = FormLayout::from_external(&doc).unwrap();
        assert_eq!(layout.order["rep"], vec!["a".to_string(), "b".to_string()]);
        assert_eq!(layout.order[BASE_CONTAINER_ID], vec!["rep".to_string()]);
        assert_eq!(layout.custom_data_properties["hidden"], json!(false));
        assert_eq!(layout.custom_root_properties["extra"], json!(1));
    }

    #[test]
    fn external_document_without_data_is_rejected() {
        assert!(matches!(
            FormLayout::from_external(&json!({ "layout": [] })),
            Err(LayoutError::Malformed(_))
        ));
    }

    struct Unencodable;

    impl serde::Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("unsupported value"))
        }
    }

    #[test]
    fn serialization_failure_is_reported() {
        assert_eq!(
            item_value("c1", &Unencodable),
            Err(LayoutError::Unserializable {
                id: "c1".into(),
                reason: "unsupported value".into(),
            })
        );
    }
}
