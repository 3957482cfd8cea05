//! Interface boundary of the external document engine
//!
//! The view never parses, lays out, or paints content itself; it drives an
//! engine through this trait. Parser grammars and layout/paint algorithms
//! live on the other side of it.

use thiserror::Error;
use url::Url;

use crate::arena::NodeHandle;
use crate::document::Document;
use crate::geometry::{Color, Point, Rect, Size};
use crate::layout::LayoutTree;

/// Engine operation result type
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("script error: {0}")]
    Script(String),
}

/// Which HTML parser strategy to run. The two are interchangeable in output;
/// the choice is plumbed in as explicit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlParserKind {
    /// The current tree-building parser
    #[default]
    Standard,
    /// The earlier handwritten parser
    Legacy,
}

/// Kind of synthetic node event dispatched by the interaction layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEventKind {
    PointerMove,
    PointerDown,
    PointerUp,
}

/// A synthetic event targeted at one content node. The offset is relative to
/// the target's box-agnostic top-left position.
#[derive(Debug, Clone, Copy)]
pub struct NodeEvent {
    pub kind: NodeEventKind,
    pub offset: Point,
}

impl NodeEvent {
    pub fn new(kind: NodeEventKind, offset: Point) -> Self {
        Self { kind, offset }
    }
}

/// A decoded RGBA8 bitmap
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel
    pub data: Vec<u8>,
}

/// Host painting surface: clip, translate, fill, blit
pub trait Painter {
    /// Intersect the clip region with a rectangle (widget coordinates)
    fn add_clip_rect(&mut self, rect: Rect);

    /// Shift the origin of subsequent draws
    fn translate(&mut self, dx: f32, dy: f32);

    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Tile a bitmap over a rectangle
    fn draw_tiled_bitmap(&mut self, rect: Rect, bitmap: &Bitmap);
}

/// The document engine capability consumed by the view
pub trait DocumentEngine {
    /// Parse HTML bytes into a document, honoring the resolved encoding
    fn parse_html(
        &self,
        data: &[u8],
        url: &Url,
        encoding: &str,
        parser: HtmlParserKind,
    ) -> EngineResult<Document>;

    /// Render Markdown source to an HTML string, or `None` if it cannot be
    /// parsed
    fn render_markdown(&self, source: &str) -> Option<String>;

    /// Render Gemini source to an HTML string
    fn render_gemini(&self, source: &str, url: &Url) -> String;

    /// Run one layout pass for the given viewport, producing a fresh tree
    fn layout(&self, document: &Document, viewport: Size) -> LayoutTree;

    /// Execute script source against a document
    fn run_script(&self, document: &mut Document, source: &str) -> EngineResult<()> {
        let _ = (document, source);
        Ok(())
    }

    /// Deliver a synthetic event to a content node
    fn dispatch_event(
        &self,
        document: &mut Document,
        node: NodeHandle,
        event: NodeEvent,
    ) -> EngineResult<()> {
        let _ = (document, node, event);
        Ok(())
    }

    /// Paint the document's box tree onto a painter. The painter origin is
    /// already translated to content coordinates.
    fn paint(&self, document: &Document, painter: &mut dyn Painter, viewport: Rect) {
        let _ = (document, painter, viewport);
    }
}
