use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data_model_bindings: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub text_resource_bindings: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl FormComponent {
    pub fn new(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            data_model_bindings: BTreeMap::new(),
            text_resource_bindings: BTreeMap::new(),
            required: None,
            page_index: None,
            properties: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormContainer {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl FormContainer {
    pub fn new(id: impl Into<String>, container_type: Option<&str>) -> Self {
        Self {
            id: id.into(),
            container_type: container_type.map(str::to_string),
            page_index: None,
            properties: Map::new(),
        }
    }
}

/// The component or container currently open for editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "itemType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormItem {
    Component(FormComponent),
    Container(FormContainer),
}

impl FormItem {
    pub fn id(&self) -> &str {
        match self {
            FormItem::Component(c) => &c.id,
            FormItem::Container(c) => &c.id,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, FormItem::Container(_))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        match &mut self {
            FormItem::Component(c) => c.id = id,
            FormItem::Container(c) => c.id = id,
        }
        self
    }

    /// Sets a free-form property. Typed fields such as `id` are not reachable this way.
    pub fn set_property(&mut self, key: &str, value: Value) {
        let properties = match self {
            FormItem::Component(c) => &mut c.properties,
            FormItem::Container(c) => &mut c.properties,
        };
        properties.insert(key.to_string(), value);
    }
}

impl From<FormComponent> for FormItem {
    fn from(c: FormComponent) -> Self {
        FormItem::Component(c)
    }
}

impl From<FormContainer> for FormItem {
    fn from(c: FormContainer) -> Self {
        FormItem::Container(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_type_tag_selects_variant() {
        let item: FormItem = serde_json::from_value(json!({
            "itemType": "COMPONENT",
            "id": "name-input",
            "type": "Input",
            "dataModelBindings": { "simpleBinding": "person.name" },
            "textResourceBindings": { "title": "name.title" },
            "readOnly": false
        }))
        .unwrap();
        let FormItem::Component(component) = &item else {
            panic!("expected component, got {item:?}");
        };
        assert_eq!(component.component_type, "Input");
        assert_eq!(component.text_resource_bindings["title"], "name.title");
        assert_eq!(component.properties["readOnly"], json!(false));

        let container: FormItem =
            serde_json::from_value(json!({ "itemType": "CONTAINER", "id": "group-1", "type": "Group" }))
                .unwrap();
        assert!(container.is_container());
        assert_eq!(container.id(), "group-1");
    }

    #[test]
    fn with_id_renames_either_kind() {
        let component = FormItem::from(FormComponent::new("a", "Input")).with_id("b");
        assert_eq!(component.id(), "b");
        let container = FormItem::from(FormContainer::new("g", Some("Group"))).with_id("h");
        assert_eq!(container.id(), "h");
    }
}
