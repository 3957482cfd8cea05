//! Layout box tree
//!
//! Geometric structure derived from a content document by the engine's layout
//! pass. The tree is rebuilt wholesale on every pass, never patched in place;
//! boxes refer back to content nodes by handle (`None` for anonymous boxes).

use crate::arena::NodeHandle;
use crate::geometry::{Point, Rect};

/// Identifier of a box within its [`LayoutTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxId(pub u32);

/// A single box in the layout tree
#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// Border box in absolute content coordinates
    pub rect: Rect,
    /// Content node this box was generated for
    pub node: Option<NodeHandle>,
    /// For text boxes: x offsets of character boundaries relative to the
    /// box origin, one entry per character
    pub char_edges: Vec<f32>,
    /// Child boxes, in paint order
    pub children: Vec<BoxId>,
}

impl LayoutBox {
    /// Create a box for a content node
    pub fn new(rect: Rect, node: Option<NodeHandle>) -> Self {
        Self {
            rect,
            node,
            char_edges: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attach character boundary offsets for a text box
    pub fn with_char_edges(mut self, edges: Vec<f32>) -> Self {
        self.char_edges = edges;
        self
    }
}

/// Result of mapping a content-space point to the deepest containing box
#[derive(Debug, Clone, Copy)]
pub struct HitResult {
    /// The deepest box containing the point
    pub layout_box: BoxId,
    /// Content node of that box, if any
    pub node: Option<NodeHandle>,
    /// Character index within the node's text, 0 for non-text boxes
    pub index_in_node: usize,
    /// Box-agnostic top-left position of the hit box
    pub box_origin: Point,
}

/// The layout tree of one content document
#[derive(Debug, Clone)]
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
    root: BoxId,
}

impl LayoutTree {
    /// Create a tree from its root box
    pub fn with_root(root_box: LayoutBox) -> Self {
        Self {
            boxes: vec![root_box],
            root: BoxId(0),
        }
    }

    /// Append a child box under `parent`, returning the new box's id
    pub fn add_child(&mut self, parent: BoxId, child: LayoutBox) -> BoxId {
        let id = BoxId(self.boxes.len() as u32);
        self.boxes.push(child);
        self.boxes[parent.0 as usize].children.push(id);
        id
    }

    /// Root box id
    pub fn root(&self) -> BoxId {
        self.root
    }

    /// Look up a box by id
    pub fn get(&self, id: BoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0 as usize)
    }

    /// Bounding rectangle of the root box
    pub fn root_rect(&self) -> Rect {
        self.boxes[self.root.0 as usize].rect
    }

    /// Box-agnostic top-left position of a box
    pub fn box_agnostic_position(&self, id: BoxId) -> Option<Point> {
        self.get(id).map(|b| b.rect.origin())
    }

    /// Find the first box generated for a content node
    pub fn box_for_node(&self, node: NodeHandle) -> Option<BoxId> {
        self.boxes
            .iter()
            .position(|b| b.node == Some(node))
            .map(|i| BoxId(i as u32))
    }

    /// Map a content-space point to the deepest containing box
    pub fn hit_test(&self, point: Point) -> Option<HitResult> {
        let id = self.hit_test_box(self.root, point)?;
        let hit = &self.boxes[id.0 as usize];
        let local_x = point.x - hit.rect.x;
        let index_in_node = hit.char_edges.iter().filter(|&&edge| edge < local_x).count();
        Some(HitResult {
            layout_box: id,
            node: hit.node,
            index_in_node,
            box_origin: hit.rect.origin(),
        })
    }

    fn hit_test_box(&self, id: BoxId, point: Point) -> Option<BoxId> {
        let layout_box = self.boxes.get(id.0 as usize)?;
        if !layout_box.rect.contains(point) {
            return None;
        }
        // Later children paint on top, so test them first
        for &child in layout_box.children.iter().rev() {
            if let Some(hit) = self.hit_test_box(child, point) {
                return Some(hit);
            }
        }
        Some(id)
    }
}
