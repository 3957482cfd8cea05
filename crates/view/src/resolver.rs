//! Content resolution
//!
//! Pure dispatch from (bytes, URL, mime type, encoding) to a synthesized
//! content document. No side effects beyond document construction.

use image::GenericImageView;
use log::debug;
use thiserror::Error;
use url::Url;

use lammasu_doc::{DocError, Document, DocumentEngine, EngineError, HtmlParserKind, NodeHandle};

/// Content resolution errors. All of these funnel into the error page path.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("image decode failed: {0}")]
    ImageDecode(String),

    #[error("markdown rendering failed")]
    Markdown,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("document construction failed: {0}")]
    Doc(#[from] DocError),
}

/// Mime type from a `Content-Type` header value: the part before the first
/// `;`, lowercased. No quoted-parameter handling.
pub fn mime_type_from_content_type(content_type: &str) -> String {
    match content_type.find(';') {
        Some(index) => content_type[..index].to_lowercase(),
        None => content_type.to_string(),
    }
}

/// Character encoding from a `Content-Type` header value: whatever follows
/// `charset=`, lowercased, defaulting to utf-8.
pub fn encoding_from_content_type(content_type: &str) -> String {
    match content_type.find("charset=") {
        Some(index) => content_type[index + "charset=".len()..].to_lowercase(),
        None => String::from("utf-8"),
    }
}

/// Guess a mime type from the URL's file extension
pub fn guess_mime_type_based_on_filename(url: &Url) -> &'static str {
    let path = url.path();
    if path.ends_with(".png") {
        return "image/png";
    }
    if path.ends_with(".gif") {
        return "image/gif";
    }
    if path.ends_with(".md") {
        return "text/markdown";
    }
    if path.ends_with(".html") || path.ends_with(".htm") {
        return "text/html";
    }
    "text/plain"
}

/// Synthesize a content document for the given payload and mime type
pub fn create_document(
    engine: &dyn DocumentEngine,
    parser: HtmlParserKind,
    data: &[u8],
    url: &Url,
    mime_type: &str,
    encoding: &str,
) -> Result<Document, ResolveError> {
    if mime_type.starts_with("image/") {
        return create_image_document(data, url);
    }
    match mime_type {
        "text/plain" => Ok(create_text_document(data, url)?),
        "text/markdown" => {
            let source = String::from_utf8_lossy(data);
            let html = engine.render_markdown(&source).ok_or(ResolveError::Markdown)?;
            Ok(engine.parse_html(html.as_bytes(), url, "utf-8", parser)?)
        }
        "text/gemini" => {
            let source = String::from_utf8_lossy(data);
            let html = engine.render_gemini(&source, url);
            Ok(engine.parse_html(html.as_bytes(), url, "utf-8", parser)?)
        }
        "text/html" => Ok(engine.parse_html(data, url, encoding, parser)?),
        other => Err(ResolveError::UnsupportedContentType(other.to_string())),
    }
}

/// Last path segment of a URL, for titles
fn url_basename(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .unwrap_or(url.path())
        .to_string()
}

/// html/head/title/body skeleton shared by the synthesized documents.
/// Returns the body handle.
fn build_skeleton(doc: &mut Document, title: &str) -> Result<NodeHandle, DocError> {
    let html = doc.create_element("html");
    doc.append_child(doc.root(), html)?;

    let head = doc.create_element("head");
    doc.append_child(html, head)?;
    let title_element = doc.create_element("title");
    doc.append_child(head, title_element)?;
    let title_text = doc.create_text(title);
    doc.append_child(title_element, title_text)?;

    let body = doc.create_element("body");
    doc.append_child(html, body)?;
    Ok(body)
}

/// Wrap plain text in a preformatted block
fn create_text_document(data: &[u8], url: &Url) -> Result<Document, DocError> {
    let mut doc = Document::new(url.clone());
    let body = build_skeleton(&mut doc, &url_basename(url))?;

    let pre = doc.create_element("pre");
    doc.append_child(body, pre)?;
    let text = doc.create_text(String::from_utf8_lossy(data).into_owned());
    doc.append_child(pre, text)?;

    Ok(doc)
}

/// Decode the payload and build a one-image document referencing the
/// original URL
fn create_image_document(data: &[u8], url: &Url) -> Result<Document, ResolveError> {
    let img = image::load_from_memory(data).map_err(|e| ResolveError::ImageDecode(e.to_string()))?;
    let (width, height) = img.dimensions();
    debug!("Decoded image document: {}x{}", width, height);

    let mut doc = Document::new(url.clone());
    let title = format!("{} [{}x{}]", url_basename(url), width, height);
    let body = build_skeleton(&mut doc, &title)?;

    let image_element = doc.create_element("img");
    doc.set_attribute(image_element, "src", url.to_string())?;
    doc.append_child(body, image_element)?;

    Ok(doc)
}
