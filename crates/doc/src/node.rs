//! Content node representation

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::arena::NodeHandle;

/// Kind of content node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Document root node
    Document,
    /// Element node
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element-specific data
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub tag_name: String,
    /// Element attributes
    pub attributes: FxHashMap<String, String>,
}

impl ElementData {
    /// Create a new element with the given tag name
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: FxHashMap::default(),
        }
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Get the element's ID attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }
}

/// A node in the content tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Node kind and associated data
    pub kind: NodeKind,
    /// Parent handle (None for the root)
    pub parent: Option<NodeHandle>,
    /// Child handles
    pub children: SmallVec<[NodeHandle; 8]>,
}

impl Node {
    /// Create a detached node
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Get element data if this is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get mutable element data if this is an element
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Check if this is an element with the given tag name
    pub fn is_element_named(&self, tag_name: &str) -> bool {
        self.as_element()
            .map(|e| e.tag_name == tag_name)
            .unwrap_or(false)
    }
}
