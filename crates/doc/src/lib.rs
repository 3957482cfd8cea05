//! Lammasu Document Model
//!
//! Content documents, the layout box tree derived from them, and the
//! interface boundary of the external document engine.

mod arena;
mod document;
mod engine;
mod error;
mod geometry;
mod layout;
mod node;

pub use arena::{NodeArena, NodeHandle};
pub use document::{Document, Selection, SelectionPoint};
pub use engine::{
    Bitmap, DocumentEngine, EngineError, EngineResult, HtmlParserKind, NodeEvent, NodeEventKind,
    Painter,
};
pub use error::{DocError, DocResult};
pub use geometry::{Color, Point, Rect, Size};
pub use layout::{BoxId, HitResult, LayoutBox, LayoutTree};
pub use node::{ElementData, Node, NodeKind};
