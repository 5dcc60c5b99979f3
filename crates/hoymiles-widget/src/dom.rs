//! Owned element tree the widget renders.
//!
//! The host receives a fresh `Node` tree on every render. Style maps are
//! shared handles (`StyleHandle`), so the widget can keep a handle to each
//! frame it rendered and toggle visibility on the host's copy without a
//! re-render and without querying a shared document by class name.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Shared, mutable inline-style map of one element.
#[derive(Debug, Clone, Default)]
pub struct StyleHandle(Arc<Mutex<BTreeMap<String, String>>>);

impl StyleHandle {
    pub fn set(&self, property: impl Into<String>, value: impl Into<String>) {
        let mut styles = self.0.lock().unwrap();
        styles.insert(property.into(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<String> {
        let styles = self.0.lock().unwrap();
        styles.get(property).cloned()
    }

    /// Render as a `style` attribute value, properties in sorted order.
    pub fn to_css(&self) -> String {
        let styles = self.0.lock().unwrap();
        styles
            .iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

/// One element in the rendered tree.
///
/// Cloning a `Node` deep-clones its children but shares the style handles,
/// matching how a retained frame handle keeps working on the host's copy.
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: StyleHandle,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            style: StyleHandle::default(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_style(self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.set(property, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Shared handle to this element's inline styles.
    pub fn style(&self) -> StyleHandle {
        self.style.clone()
    }

    /// Current `display` style, if any was set.
    pub fn display(&self) -> Option<String> {
        self.style.get("display")
    }

    /// Serialize the tree to an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            out.push_str(&format!(" id=\"{}\"", escape_attr(id)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_attr(&self.classes.join(" "))));
        }
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
        }
        if !self.style.is_empty() {
            out.push_str(&format!(" style=\"{}\"", escape_attr(&self.style.to_css())));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str(&format!("</{}>", self.tag));
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
