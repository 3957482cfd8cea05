//! Content document
//!
//! The in-memory representation of the currently displayed resource: the
//! content node tree plus the layout tree derived from it, the hover and
//! selection state, and the viewport rectangle pushed down by the view.

use url::Url;

use crate::arena::{NodeArena, NodeHandle};
use crate::engine::Bitmap;
use crate::error::{DocError, DocResult};
use crate::geometry::{Color, Rect};
use crate::layout::LayoutTree;
use crate::node::{ElementData, Node, NodeKind};

/// One endpoint of a selection: a content node plus an offset into it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPoint {
    pub node: NodeHandle,
    pub offset: usize,
}

/// Selection range. Endpoints reflect drag chronology: the press sets the
/// start, dragging moves the end. No document-order normalization.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    start: Option<SelectionPoint>,
    end: Option<SelectionPoint>,
}

impl Selection {
    /// Replace both endpoints
    pub fn set(&mut self, start: Option<SelectionPoint>, end: Option<SelectionPoint>) {
        self.start = start;
        self.end = end;
    }

    /// Move only the end endpoint
    pub fn set_end(&mut self, end: SelectionPoint) {
        self.end = Some(end);
    }

    /// Drop both endpoints
    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn start(&self) -> Option<SelectionPoint> {
        self.start
    }

    pub fn end(&self) -> Option<SelectionPoint> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }
}

/// The currently displayed resource
#[derive(Debug)]
pub struct Document {
    url: Url,
    mime_type: String,
    encoding: String,
    arena: NodeArena,
    root: NodeHandle,
    background_color: Option<Color>,
    background_image: Option<Bitmap>,
    hovered_node: Option<NodeHandle>,
    selection: Selection,
    layout: Option<LayoutTree>,
    visible_rect: Rect,
    needs_layout: bool,
}

impl Document {
    /// Create an empty document for a source URL
    pub fn new(url: Url) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new(NodeKind::Document));
        Self {
            url,
            mime_type: String::from("text/html"),
            encoding: String::from("utf-8"),
            arena,
            root,
            background_color: None,
            background_image: None,
            hovered_node: None,
            selection: Selection::default(),
            layout: None,
            visible_rect: Rect::default(),
            needs_layout: false,
        }
    }

    /// Source URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolved mime type
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Resolved character encoding
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Record the mime type and encoding this document was synthesized from
    pub fn set_content_type(&mut self, mime_type: impl Into<String>, encoding: impl Into<String>) {
        self.mime_type = mime_type.into();
        self.encoding = encoding.into();
    }

    /// Root (document) node handle
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    // --- tree construction ---

    /// Create a detached element node
    pub fn create_element(&mut self, tag_name: impl Into<String>) -> NodeHandle {
        self.arena
            .insert(Node::new(NodeKind::Element(ElementData::new(tag_name))))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeHandle {
        self.arena
            .insert(Node::new(NodeKind::Text(content.into())))
    }

    /// Append a child node to a parent
    pub fn append_child(&mut self, parent: NodeHandle, child: NodeHandle) -> DocResult<()> {
        if !self.arena.contains(parent) {
            return Err(DocError::StaleHandle(parent.index()));
        }
        let child_node = self
            .arena
            .get_mut(child)
            .ok_or(DocError::StaleHandle(child.index()))?;
        child_node.parent = Some(parent);
        let parent_node = self
            .arena
            .get_mut(parent)
            .ok_or(DocError::StaleHandle(parent.index()))?;
        parent_node.children.push(child);
        Ok(())
    }

    /// Set an attribute on an element node
    pub fn set_attribute(
        &mut self,
        element: NodeHandle,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> DocResult<()> {
        let node = self
            .arena
            .get_mut(element)
            .ok_or(DocError::StaleHandle(element.index()))?;
        let data = node.as_element_mut().ok_or(DocError::NotAnElement)?;
        data.set_attribute(name, value);
        Ok(())
    }

    // --- node access ---

    /// Resolve a handle, returning `None` if stale
    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.arena.get(handle)
    }

    /// Resolve a handle mutably, returning `None` if stale
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.arena.get_mut(handle)
    }

    /// Get an attribute of an element node
    pub fn attribute(&self, handle: NodeHandle, name: &str) -> Option<&str> {
        self.arena.get(handle)?.as_element()?.get_attribute(name)
    }

    // --- queries ---

    /// All descendants of a node, pre-order
    pub fn descendants(&self, from: NodeHandle) -> Vec<NodeHandle> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeHandle> = match self.arena.get(from) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return result,
        };
        while let Some(handle) = stack.pop() {
            result.push(handle);
            if let Some(node) = self.arena.get(handle) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        result
    }

    /// Find an element by its ID attribute
    pub fn element_by_id(&self, id: &str) -> Option<NodeHandle> {
        self.descendants(self.root).into_iter().find(|&handle| {
            self.arena
                .get(handle)
                .and_then(|n| n.as_element())
                .map(|e| e.id() == Some(id))
                .unwrap_or(false)
        })
    }

    /// Find elements whose `name` attribute equals `name`
    pub fn elements_by_name(&self, name: &str) -> Vec<NodeHandle> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&handle| {
                self.arena
                    .get(handle)
                    .and_then(|n| n.as_element())
                    .map(|e| e.get_attribute("name") == Some(name))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// First element with the given tag name
    pub fn first_element_named(&self, tag_name: &str) -> Option<NodeHandle> {
        self.descendants(self.root).into_iter().find(|&handle| {
            self.arena
                .get(handle)
                .map(|n| n.is_element_named(tag_name))
                .unwrap_or(false)
        })
    }

    /// Document title: concatenated text children of the first `<title>`
    pub fn title(&self) -> String {
        let mut title = String::new();
        if let Some(handle) = self.first_element_named("title") {
            if let Some(node) = self.arena.get(handle) {
                for &child in &node.children {
                    if let Some(text) = self.arena.get(child).and_then(|n| n.as_text()) {
                        title.push_str(text);
                    }
                }
            }
        }
        title
    }

    /// Resolve an href against this document's URL
    pub fn complete_url(&self, href: &str) -> Option<Url> {
        self.url.join(href).ok()
    }

    /// Walk up from a node to the nearest enclosing `<a href>` element
    pub fn enclosing_link(&self, start: NodeHandle) -> Option<NodeHandle> {
        let mut current = Some(start);
        while let Some(handle) = current {
            let node = self.arena.get(handle)?;
            if let Some(element) = node.as_element() {
                if element.tag_name == "a" && element.get_attribute("href").is_some() {
                    return Some(handle);
                }
            }
            current = node.parent;
        }
        None
    }

    // --- hover & selection ---

    /// Currently hovered content node
    pub fn hovered_node(&self) -> Option<NodeHandle> {
        self.hovered_node
    }

    /// Update the hovered content node
    pub fn set_hovered_node(&mut self, node: Option<NodeHandle>) {
        self.hovered_node = node;
    }

    /// Current selection range
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable selection range
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    // --- layout ---

    /// Layout tree from the last layout pass
    pub fn layout(&self) -> Option<&LayoutTree> {
        self.layout.as_ref()
    }

    /// Install the layout tree produced by a layout pass, replacing the
    /// previous one wholesale
    pub fn set_layout(&mut self, tree: LayoutTree) {
        self.layout = Some(tree);
    }

    /// Visible content rectangle last pushed down by the view
    pub fn visible_rect(&self) -> Rect {
        self.visible_rect
    }

    /// Record the visible content rectangle
    pub fn set_visible_rect(&mut self, rect: Rect) {
        self.visible_rect = rect;
    }

    /// Mark the document as needing a fresh layout pass, e.g. after a
    /// content mutation from scripting
    pub fn invalidate_layout(&mut self) {
        self.needs_layout = true;
    }

    /// Consume the pending layout invalidation, if any
    pub fn take_layout_invalidation(&mut self) -> bool {
        std::mem::take(&mut self.needs_layout)
    }

    // --- background ---

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background_color = color;
    }

    pub fn background_image(&self) -> Option<&Bitmap> {
        self.background_image.as_ref()
    }

    pub fn set_background_image(&mut self, bitmap: Option<Bitmap>) {
        self.background_image = bitmap;
    }
}
