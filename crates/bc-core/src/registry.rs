//! Component registry: what each palette entry is, as far as the editor
//! needs to know.
//!
//! Rendering belongs to the host. The editor only asks the registry which
//! axes a block may be resized on; the property panel additionally reads
//! the editable `props` and `model` descriptors.

use crate::id::ComponentKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Which axes of a block accept resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeHint {
    pub width: bool,
    pub height: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    Input,
    Color,
    Select,
    Table,
}

/// One editable property exposed by a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    pub name: String,
    pub label: String,
    pub kind: PropKind,
}

impl PropSpec {
    pub fn new(name: &str, label: &str, kind: PropKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub key: ComponentKey,
    pub label: String,
    #[serde(default)]
    pub resize: ResizeHint,
    #[serde(default)]
    pub props: Vec<PropSpec>,
    /// Model slot name → human label of the bound field.
    #[serde(default)]
    pub model: BTreeMap<String, String>,
}

impl ComponentSpec {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: ComponentKey::intern(key),
            label: label.to_string(),
            resize: ResizeHint::default(),
            props: Vec::new(),
            model: BTreeMap::new(),
        }
    }

    pub fn resizable(mut self, width: bool, height: bool) -> Self {
        self.resize = ResizeHint { width, height };
        self
    }

    pub fn prop(mut self, name: &str, label: &str, kind: PropKind) -> Self {
        self.props.push(PropSpec::new(name, label, kind));
        self
    }

    pub fn model_field(mut self, slot: &str, label: &str) -> Self {
        self.model.insert(slot.to_string(), label.to_string());
        self
    }
}

/// Ordered palette list plus a key → spec lookup.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    list: Vec<ComponentSpec>,
    index: HashMap<ComponentKey, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock palette: text, button, input, range, select.
    pub fn stock() -> Self {
        let mut registry = Self::new();
        registry.register(
            ComponentSpec::new("text", "Text")
                .prop("text", "Text content", PropKind::Input)
                .prop("color", "Text color", PropKind::Color)
                .prop("size", "Font size", PropKind::Select),
        );
        registry.register(
            ComponentSpec::new("button", "Button")
                .resizable(true, true)
                .prop("text", "Button label", PropKind::Input)
                .prop("type", "Button type", PropKind::Select)
                .prop("size", "Button size", PropKind::Select),
        );
        registry.register(
            ComponentSpec::new("input", "Input")
                .resizable(true, false)
                .model_field("default", "Bound field"),
        );
        registry.register(
            ComponentSpec::new("range", "Range")
                .model_field("start", "Range start field")
                .model_field("end", "Range end field"),
        );
        registry.register(
            ComponentSpec::new("select", "Select")
                .prop("options", "Options", PropKind::Table)
                .model_field("default", "Bound field"),
        );
        registry
    }

    /// Register a component. Re-registering a key replaces its spec but
    /// keeps its palette position.
    pub fn register(&mut self, spec: ComponentSpec) {
        if let Some(&i) = self.index.get(&spec.key) {
            self.list[i] = spec;
            return;
        }
        self.index.insert(spec.key, self.list.len());
        self.list.push(spec);
    }

    pub fn get(&self, key: ComponentKey) -> Option<&ComponentSpec> {
        self.index.get(&key).map(|&i| &self.list[i])
    }

    /// Resize hint for a key; unknown components are not resizable.
    pub fn resize_hint(&self, key: ComponentKey) -> ResizeHint {
        self.get(key).map(|c| c.resize).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentSpec> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
