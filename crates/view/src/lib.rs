//! Lammasu Page View
//!
//! Interactive view-controller bridging a host GUI substrate with the
//! document engine: resource loading with redirect following, content
//! resolution, layout reconciliation against scrollbar feedback, anchor
//! navigation, and the pointer/keyboard interaction machine.

mod event;
mod loading;
mod resolver;
mod viewport;

pub use event::{DropPayload, Key, Modifiers, MouseButton};
pub use loading::LoadingState;
pub use resolver::{
    create_document, encoding_from_content_type, guess_mime_type_based_on_filename,
    mime_type_from_content_type, ResolveError,
};
pub use viewport::{ScrollbarState, Viewport, SCROLLBAR_THICKNESS};

use image::GenericImageView;
use url::Url;

use lammasu_doc::{
    Bitmap, Color, Document, DocumentEngine, HtmlParserKind, NodeEvent, NodeEventKind, NodeHandle,
    Painter, Point, Rect, SelectionPoint, Size,
};
use lammasu_net::{spawn_fetch, HttpClient, NetError, Response, ERROR_PAGE_URL};

use crate::loading::{render_error_page, PendingFetch, MAX_REDIRECTS};

/// Cursor shape the host should display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Arrow,
    Hand,
}

/// View configuration
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Widget width in pixels
    pub width: f32,
    /// Widget height in pixels
    pub height: f32,
    /// HTML parser strategy handed to the engine
    pub html_parser: HtmlParserKind,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            html_parser: HtmlParserKind::default(),
        }
    }
}

/// The page view controller
///
/// Owns exactly one content document at a time and drives the engine's
/// layout passes against it. All methods run on the host's event loop
/// thread; the only asynchronous work is the fetch tasks, whose outcomes
/// are drained by [`PageView::poll`].
pub struct PageView {
    config: ViewConfig,
    engine: Box<dyn DocumentEngine>,
    client: HttpClient,
    document: Option<Document>,
    viewport: Viewport,
    loading_state: LoadingState,
    pending: Option<PendingFetch>,
    favicon: Option<lammasu_net::FetchHandle>,
    in_mouse_selection: bool,
    cursor: CursorKind,
    tooltip: Option<String>,
    screen_origin: Point,
    needs_paint: bool,

    /// A navigation started
    pub on_load_start: Option<Box<dyn FnMut(&Url)>>,
    /// The active document's title changed
    pub on_title_change: Option<Box<dyn FnMut(&str)>>,
    /// A favicon was fetched and decoded
    pub on_favicon_change: Option<Box<dyn FnMut(&Bitmap)>>,
    /// The pointer entered (fully-qualified URL) or left (empty string) a link
    pub on_link_hover: Option<Box<dyn FnMut(&str)>>,
    /// A link was activated: (href, target, modifiers)
    pub on_link_click: Option<Box<dyn FnMut(&str, &str, Modifiers)>>,
    /// A link was middle-clicked
    pub on_link_middle_click: Option<Box<dyn FnMut(&str)>>,
    /// A link was right-clicked: (href, screen position)
    pub on_link_context_menu_request: Option<Box<dyn FnMut(&str, Point)>>,
    /// A URL was dropped onto the view
    pub on_url_drop: Option<Box<dyn FnMut(&Url)>>,
    /// A new document became the active one
    pub on_document_installed: Option<Box<dyn FnMut(&Document)>>,
}

impl PageView {
    /// Create a view with a default fetch client
    pub fn new(config: ViewConfig, engine: Box<dyn DocumentEngine>) -> Result<Self, NetError> {
        let client = HttpClient::new()?;
        Ok(Self::with_client(config, engine, client))
    }

    /// Create a view with a custom fetch client
    pub fn with_client(
        config: ViewConfig,
        engine: Box<dyn DocumentEngine>,
        client: HttpClient,
    ) -> Self {
        let viewport = Viewport::new(config.width, config.height);
        Self {
            config,
            engine,
            client,
            document: None,
            viewport,
            loading_state: LoadingState::Idle,
            pending: None,
            favicon: None,
            in_mouse_selection: false,
            cursor: CursorKind::Arrow,
            tooltip: None,
            screen_origin: Point::ZERO,
            needs_paint: false,
            on_load_start: None,
            on_title_change: None,
            on_favicon_change: None,
            on_link_hover: None,
            on_link_click: None,
            on_link_middle_click: None,
            on_link_context_menu_request: None,
            on_url_drop: None,
            on_document_installed: None,
        }
    }

    /// Active content document
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Active content document, mutable
    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    /// Viewport and scrollbar state
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Viewport and scrollbar state, mutable. Call [`PageView::did_scroll`]
    /// after changing offsets.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Current loading state
    pub fn loading_state(&self) -> &LoadingState {
        &self.loading_state
    }

    /// Cursor the host should display
    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    /// Tooltip text for the hovered element, if any
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Where the widget sits on screen, for context menu positions
    pub fn set_screen_origin(&mut self, origin: Point) {
        self.screen_origin = origin;
    }

    /// Consume the repaint flag
    pub fn take_needs_paint(&mut self) -> bool {
        std::mem::take(&mut self.needs_paint)
    }

    // --- loading ---

    /// Start navigating to a URL. An invalid URL never reaches the network;
    /// it goes straight to the error page path.
    pub fn load(&mut self, url: &str) {
        match Url::parse(url) {
            Ok(parsed) => self.start_load(parsed, 0),
            Err(err) => {
                log::warn!("Invalid URL {:?}: {}", url, err);
                self.load_error_page(url, "Invalid URL");
            }
        }
    }

    /// Reload the active document's URL
    pub fn reload(&mut self) {
        let url = match self.document.as_ref() {
            Some(doc) => doc.url().to_string(),
            None => return,
        };
        self.load(&url);
    }

    /// Cancel any in-flight navigation
    pub fn stop_loading(&mut self) {
        if self.pending.is_some() {
            log::info!("Cancelling navigation");
        }
        self.pending = None;
        self.loading_state = LoadingState::Idle;
    }

    fn start_load(&mut self, url: Url, redirects: u8) {
        log::info!("Loading {}", url);

        // A superseded navigation is cancelled outright; it can never win
        // the active document.
        self.pending = None;
        self.cursor = CursorKind::Arrow;

        if let Some(callback) = self.on_load_start.as_mut() {
            callback(&url);
        }
        self.loading_state = LoadingState::Loading { url: url.clone() };

        let handle = spawn_fetch(self.client.clone(), url.clone());
        self.pending = Some(PendingFetch::Navigation {
            url: url.clone(),
            redirects,
            handle,
        });

        self.request_favicon(&url);
        self.viewport.scroll_to_top();
    }

    fn request_favicon(&mut self, url: &Url) {
        if url.scheme() == "file" || url.scheme() == "about" || url.cannot_be_a_base() {
            return;
        }
        let mut favicon_url = url.clone();
        favicon_url.set_path("/favicon.ico");
        favicon_url.set_query(None);
        favicon_url.set_fragment(None);
        self.favicon = Some(spawn_fetch(self.client.clone(), favicon_url));
    }

    fn load_error_page(&mut self, failed_url: &str, message: &str) {
        log::warn!("Load failed for {:?}: {}", failed_url, message);
        self.pending = None;
        self.loading_state = LoadingState::Failed {
            url: failed_url.to_string(),
            message: message.to_string(),
        };

        let template_url = Url::parse(ERROR_PAGE_URL).unwrap();
        let handle = spawn_fetch(self.client.clone(), template_url);
        self.pending = Some(PendingFetch::ErrorPage {
            failed_url: failed_url.to_string(),
            message: message.to_string(),
            handle,
        });
    }

    /// Drain completed fetches and pending layout invalidations. Call once
    /// per event loop turn.
    pub fn poll(&mut self) {
        self.poll_navigation();
        self.poll_favicon();
        self.process_layout_invalidation();
    }

    fn poll_navigation(&mut self) {
        let result = match self.pending.as_mut() {
            Some(PendingFetch::Navigation { handle, .. })
            | Some(PendingFetch::ErrorPage { handle, .. }) => handle.try_recv(),
            None => None,
        };
        let Some(result) = result else { return };
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending {
            PendingFetch::Navigation { url, redirects, .. } => match result {
                Ok(response) => self.finish_navigation(url, redirects, response),
                Err(err) => self.load_error_page(url.as_str(), &err.to_string()),
            },
            PendingFetch::ErrorPage {
                failed_url,
                message,
                ..
            } => match result {
                Ok(response) => self.install_error_page(&failed_url, &message, &response),
                Err(err) => log::error!("Failed to load error page template: {}", err),
            },
        }
    }

    fn finish_navigation(&mut self, url: Url, redirects: u8, response: Response) {
        if let Some(location) = response.headers.get("Location") {
            if redirects >= MAX_REDIRECTS {
                self.load_error_page(url.as_str(), "Too many redirects");
                return;
            }
            let location = location.to_string();
            log::debug!("Redirect to {:?}", location);
            match url.join(&location) {
                Ok(target) => self.start_load(target, redirects + 1),
                Err(_) => self.load_error_page(&location, "Invalid URL"),
            }
            return;
        }

        if response.body.is_empty() {
            self.load_error_page(url.as_str(), "No data");
            return;
        }

        let (mime_type, encoding) = match response.headers.get("Content-Type") {
            Some(content_type) => {
                log::debug!("Content-Type header: {:?}", content_type);
                (
                    resolver::mime_type_from_content_type(content_type),
                    resolver::encoding_from_content_type(content_type),
                )
            }
            None => {
                log::debug!("No Content-Type header, guessing from filename");
                (
                    resolver::guess_mime_type_based_on_filename(&url).to_string(),
                    String::from("utf-8"),
                )
            }
        };
        log::debug!("Resolved mime type {:?}, encoding {:?}", mime_type, encoding);

        match resolver::create_document(
            self.engine.as_ref(),
            self.config.html_parser,
            &response.body,
            &url,
            &mime_type,
            &encoding,
        ) {
            Ok(mut document) => {
                document.set_content_type(mime_type, encoding);
                self.loading_state = LoadingState::Idle;
                self.set_document(document);
                if let Some(fragment) = url.fragment() {
                    if !fragment.is_empty() {
                        self.scroll_to_anchor(fragment);
                    }
                }
                self.notify_title_change();
            }
            Err(err) => self.load_error_page(url.as_str(), &err.to_string()),
        }
    }

    fn install_error_page(&mut self, failed_url: &str, message: &str, response: &Response) {
        let template = String::from_utf8_lossy(&response.body);
        let html = render_error_page(&template, failed_url, message);
        let url =
            Url::parse(failed_url).unwrap_or_else(|_| Url::parse(ERROR_PAGE_URL).unwrap());

        match self
            .engine
            .parse_html(html.as_bytes(), &url, "utf-8", self.config.html_parser)
        {
            Ok(document) => {
                self.set_document(document);
                self.notify_title_change();
            }
            Err(err) => log::error!("Failed to parse error page: {}", err),
        }
    }

    fn poll_favicon(&mut self) {
        let result = match self.favicon.as_mut() {
            Some(handle) => handle.try_recv(),
            None => None,
        };
        let Some(result) = result else { return };
        self.favicon = None;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                log::debug!("Favicon fetch failed: {}", err);
                return;
            }
        };

        log::debug!(
            "Favicon downloaded, {} bytes from {}",
            response.body.len(),
            response.url
        );
        match decode_bitmap(&response.body) {
            Some(bitmap) => {
                if let Some(callback) = self.on_favicon_change.as_mut() {
                    callback(&bitmap);
                }
            }
            None => log::warn!("Could not decode favicon {}", response.url),
        }
    }

    // --- document installation ---

    /// Install a document as the active one. The previous document, along
    /// with its hover, selection, and invalidation state, is discarded.
    pub fn set_document(&mut self, document: Document) {
        self.in_mouse_selection = false;
        self.tooltip = None;
        self.document = Some(document);

        self.reconcile();
        self.needs_paint = true;

        if let Some(callback) = self.on_document_installed.as_mut() {
            if let Some(doc) = self.document.as_ref() {
                callback(doc);
            }
        }
    }

    fn notify_title_change(&mut self) {
        let title = match self.document.as_ref() {
            Some(doc) => doc.title(),
            None => return,
        };
        if let Some(callback) = self.on_title_change.as_mut() {
            callback(&title);
        }
    }

    // --- layout reconciliation ---

    /// Run layout against the current viewport, reconciling scrollbar
    /// visibility, and push the visible rectangle down to the document.
    pub fn reconcile(&mut self) {
        if self.document.is_none() {
            return;
        }

        let had_horizontal = self.viewport.horizontal.visible;
        let had_vertical = self.viewport.vertical.visible;

        self.layout_pass();

        // Gaining or losing a scrollbar changes the available size, so lay
        // out once more against the adjusted viewport.
        if self.viewport.horizontal.visible != had_horizontal
            || self.viewport.vertical.visible != had_vertical
        {
            self.layout_pass();
        }

        let visible = self.viewport.visible_rect();
        if let Some(doc) = self.document.as_mut() {
            doc.set_visible_rect(visible);
        }
    }

    fn layout_pass(&mut self) {
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let available = self.viewport.available_size();
        let tree = self.engine.layout(doc, available);
        let content = tree.root_rect();
        doc.set_layout(tree);
        self.viewport.set_content_size(content.size());
    }

    fn process_layout_invalidation(&mut self) {
        let invalidated = self
            .document
            .as_mut()
            .map(|doc| doc.take_layout_invalidation())
            .unwrap_or(false);
        if invalidated {
            self.reconcile();
            self.needs_paint = true;
        }
    }

    /// The host resized the widget
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
        self.viewport.set_widget_size(Size::new(width, height));
        self.reconcile();
        self.needs_paint = true;
    }

    /// The host changed the scroll offsets
    pub fn did_scroll(&mut self) {
        let visible = self.viewport.visible_rect();
        if let Some(doc) = self.document.as_mut() {
            doc.set_visible_rect(visible);
        }
        self.needs_paint = true;
    }

    // --- anchor navigation ---

    /// Scroll the element a URL fragment names into view. Element IDs win
    /// over `name` attributes; unresolved anchors abort silently.
    pub fn scroll_to_anchor(&mut self, name: &str) {
        let target = {
            let Some(doc) = self.document.as_ref() else {
                return;
            };

            let mut element = doc.element_by_id(name);
            if element.is_none() {
                element = doc.elements_by_name(name).into_iter().find(|&candidate| {
                    doc.get(candidate)
                        .map(|node| node.is_element_named("a"))
                        .unwrap_or(false)
                });
            }
            let Some(element) = element else {
                log::debug!("Anchor not found: {:?}", name);
                return;
            };

            let position = doc.layout().and_then(|layout| {
                layout
                    .box_for_node(element)
                    .and_then(|id| layout.box_agnostic_position(id))
            });
            let Some(position) = position else {
                log::debug!("Anchor {:?} found but has no layout box", name);
                return;
            };

            Rect::from_origin_size(position, self.viewport.visible_rect().size())
        };

        self.viewport.scroll_into_view(target);
        self.cursor = CursorKind::Arrow;
        self.did_scroll();
    }

    // --- interaction ---

    /// The pointer moved over the view
    pub fn pointer_moved(&mut self, position: Point) {
        let content_position = self.viewport.to_content_position(position);
        let in_selection = self.in_mouse_selection;

        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let Some(layout) = doc.layout() else { return };
        let hit = layout.hit_test(content_position);

        let was_hovering_link = doc
            .hovered_node()
            .map(|node| doc.enclosing_link(node).is_some())
            .unwrap_or(false);

        let mut hovered_node_changed = false;
        let mut hovered_link = None;
        let mut needs_paint = false;

        if let Some(hit) = hit {
            hovered_node_changed = hit.node != doc.hovered_node();
            doc.set_hovered_node(hit.node);
            if let Some(node) = hit.node {
                hovered_link = doc.enclosing_link(node);
                let offset = Point::new(
                    content_position.x - hit.box_origin.x,
                    content_position.y - hit.box_origin.y,
                );
                if let Err(err) = self.engine.dispatch_event(
                    doc,
                    node,
                    NodeEvent::new(NodeEventKind::PointerMove, offset),
                ) {
                    log::warn!("Event dispatch failed: {}", err);
                }
                if in_selection {
                    doc.selection_mut().set_end(SelectionPoint {
                        node,
                        offset: hit.index_in_node,
                    });
                    log::trace!("Selection end moved to {}:{}", node, hit.index_in_node);
                    needs_paint = true;
                }
            }
        }

        let is_hovering_link = hovered_link.is_some();
        let link_url = hovered_link
            .and_then(|link| doc.attribute(link, "href"))
            .and_then(|href| doc.complete_url(href))
            .map(|url| url.to_string());
        let tooltip = if hovered_node_changed {
            doc.hovered_node()
                .and_then(|node| enclosing_title(doc, node))
        } else {
            None
        };

        self.cursor = if is_hovering_link {
            CursorKind::Hand
        } else {
            CursorKind::Arrow
        };

        if hovered_node_changed {
            self.tooltip = tooltip;
            needs_paint = true;
        }
        if needs_paint {
            self.needs_paint = true;
        }

        if is_hovering_link != was_hovering_link {
            let notify = link_url.unwrap_or_default();
            if let Some(callback) = self.on_link_hover.as_mut() {
                callback(&notify);
            }
        }
    }

    /// A pointer button went down over the view
    pub fn pointer_pressed(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) {
        enum ClickAction {
            None,
            RunScript(String),
            LinkClick { href: String, target: String },
            ContextMenu { href: String },
            MiddleClick { href: String },
        }

        let content_position = self.viewport.to_content_position(position);

        let (action, hovered_node_changed) = {
            let Some(doc) = self.document.as_mut() else {
                return;
            };
            let Some(layout) = doc.layout() else { return };
            let Some(hit) = layout.hit_test(content_position) else {
                return;
            };

            let hovered_node_changed = hit.node != doc.hovered_node();
            doc.set_hovered_node(hit.node);

            let mut action = ClickAction::None;
            if let Some(node) = hit.node {
                let offset = Point::new(
                    content_position.x - hit.box_origin.x,
                    content_position.y - hit.box_origin.y,
                );
                if let Err(err) = self.engine.dispatch_event(
                    doc,
                    node,
                    NodeEvent::new(NodeEventKind::PointerDown, offset),
                ) {
                    log::warn!("Event dispatch failed: {}", err);
                }

                if let Some(link) = doc.enclosing_link(node) {
                    let href = doc.attribute(link, "href").unwrap_or_default().to_string();
                    let target = doc
                        .attribute(link, "target")
                        .unwrap_or_default()
                        .to_string();
                    log::debug!("Click on a link to {:?}", href);
                    action = match button {
                        MouseButton::Left => match href.strip_prefix("javascript:") {
                            Some(source) => ClickAction::RunScript(source.to_string()),
                            None => ClickAction::LinkClick { href, target },
                        },
                        MouseButton::Right => ClickAction::ContextMenu { href },
                        MouseButton::Middle => ClickAction::MiddleClick { href },
                        MouseButton::Other(_) => ClickAction::None,
                    };
                } else if button == MouseButton::Left {
                    let point = SelectionPoint {
                        node,
                        offset: hit.index_in_node,
                    };
                    doc.selection_mut().set(Some(point), Some(point));
                    log::trace!("Selection started at {}:{}", node, hit.index_in_node);
                    self.in_mouse_selection = true;
                }
            }
            (action, hovered_node_changed)
        };

        match action {
            ClickAction::None => {}
            ClickAction::RunScript(source) => self.run_script(&source),
            ClickAction::LinkClick { href, target } => {
                if let Some(callback) = self.on_link_click.as_mut() {
                    callback(&href, &target, modifiers);
                }
            }
            ClickAction::ContextMenu { href } => {
                let screen_position =
                    position.translated(self.screen_origin.x, self.screen_origin.y);
                if let Some(callback) = self.on_link_context_menu_request.as_mut() {
                    callback(&href, screen_position);
                }
            }
            ClickAction::MiddleClick { href } => {
                if let Some(callback) = self.on_link_middle_click.as_mut() {
                    callback(&href);
                }
            }
        }

        if hovered_node_changed {
            self.needs_paint = true;
        }
    }

    /// A pointer button was released over the view
    pub fn pointer_released(&mut self, position: Point, button: MouseButton) {
        let content_position = self.viewport.to_content_position(position);

        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let Some(layout) = doc.layout() else { return };

        if let Some(hit) = layout.hit_test(content_position) {
            if let Some(node) = hit.node {
                let offset = Point::new(
                    content_position.x - hit.box_origin.x,
                    content_position.y - hit.box_origin.y,
                );
                if let Err(err) = self.engine.dispatch_event(
                    doc,
                    node,
                    NodeEvent::new(NodeEventKind::PointerUp, offset),
                ) {
                    log::warn!("Event dispatch failed: {}", err);
                }
            }
        }

        if button == MouseButton::Left {
            log::trace!("Selection drag released");
            self.in_mouse_selection = false;
        }
    }

    /// A key went down. Returns whether the view consumed it.
    pub fn key_pressed(&mut self, key: Key, modifiers: Modifiers) -> bool {
        if !modifiers.is_empty() {
            return false;
        }

        let page_height = self.viewport.visible_rect().height;
        let handled = match key {
            Key::Home => {
                self.viewport.vertical.set_value(0.0);
                true
            }
            Key::End => {
                let max = self.viewport.vertical.max;
                self.viewport.vertical.set_value(max);
                true
            }
            Key::Down => {
                let step = self.viewport.vertical.step;
                self.viewport.vertical.scroll_by(step);
                true
            }
            Key::Up => {
                let step = self.viewport.vertical.step;
                self.viewport.vertical.scroll_by(-step);
                true
            }
            Key::Left => {
                let step = self.viewport.horizontal.step;
                self.viewport.horizontal.scroll_by(step);
                true
            }
            Key::Right => {
                let step = self.viewport.horizontal.step;
                self.viewport.horizontal.scroll_by(-step);
                true
            }
            Key::PageDown => {
                self.viewport.vertical.scroll_by(page_height);
                true
            }
            Key::PageUp => {
                self.viewport.vertical.scroll_by(-page_height);
                true
            }
            Key::Other(_) => false,
        };

        if handled {
            self.did_scroll();
        }
        handled
    }

    /// Data was dropped onto the view. Returns whether the drop was
    /// consumed; otherwise the host applies its default handling.
    pub fn dropped(&mut self, payload: &DropPayload) -> bool {
        if let Some(url) = payload.urls.first() {
            if let Some(callback) = self.on_url_drop.as_mut() {
                callback(url);
                return true;
            }
        }
        false
    }

    fn run_script(&mut self, source: &str) {
        log::debug!("Running script from link");
        if let Some(doc) = self.document.as_mut() {
            if let Err(err) = self.engine.run_script(doc, source) {
                log::warn!("Script execution failed: {}", err);
            }
        }
        self.process_layout_invalidation();
    }

    // --- painting ---

    /// Paint the view: background, then the document's box tree translated
    /// by the scroll offsets.
    pub fn paint(&mut self, painter: &mut dyn Painter, rect: Rect) {
        painter.add_clip_rect(rect);

        let Some(doc) = self.document.as_ref() else {
            painter.fill_rect(rect, Color::WHITE);
            return;
        };
        if doc.layout().is_none() {
            painter.fill_rect(rect, Color::WHITE);
            return;
        }

        painter.fill_rect(rect, doc.background_color().unwrap_or(Color::WHITE));
        if let Some(bitmap) = doc.background_image() {
            painter.draw_tiled_bitmap(rect, bitmap);
        }

        painter.translate(-self.viewport.horizontal.value, -self.viewport.vertical.value);
        self.engine.paint(doc, painter, self.viewport.visible_rect());
        self.needs_paint = false;
    }
}

/// Walk up from a node to the nearest element with a non-empty `title`
/// attribute
fn enclosing_title(doc: &Document, start: NodeHandle) -> Option<String> {
    let mut current = Some(start);
    while let Some(handle) = current {
        let node = doc.get(handle)?;
        if let Some(element) = node.as_element() {
            if let Some(title) = element.get_attribute("title") {
                if !title.is_empty() {
                    return Some(title.to_string());
                }
            }
        }
        current = node.parent;
    }
    None
}

/// Decode image bytes into an RGBA bitmap
fn decode_bitmap(data: &[u8]) -> Option<Bitmap> {
    match image::load_from_memory(data) {
        Ok(img) => {
            let (width, height) = img.dimensions();
            Some(Bitmap {
                width,
                height,
                data: img.to_rgba8().into_raw(),
            })
        }
        Err(err) => {
            log::warn!("Image decode failed: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use lammasu_doc::{EngineResult, LayoutBox, LayoutTree};
    use lammasu_net::Headers;

    /// Engine that gives every node a 20px strip, in tree order. `meta`
    /// elements get no box; text boxes get 10px character cells.
    struct MockEngine {
        layout_calls: Rc<Cell<u32>>,
        content_size: Rc<Cell<Size>>,
        scripts: Rc<RefCell<Vec<String>>>,
    }

    impl DocumentEngine for MockEngine {
        fn parse_html(
            &self,
            data: &[u8],
            url: &Url,
            _encoding: &str,
            _parser: HtmlParserKind,
        ) -> EngineResult<Document> {
            let mut doc = Document::new(url.clone());
            let html = doc.create_element("html");
            doc.append_child(doc.root(), html).unwrap();
            let body = doc.create_element("body");
            doc.append_child(html, body).unwrap();
            let text = doc.create_text(String::from_utf8_lossy(data).into_owned());
            doc.append_child(body, text).unwrap();
            Ok(doc)
        }

        fn render_markdown(&self, source: &str) -> Option<String> {
            Some(format!("<md>{}</md>", source))
        }

        fn render_gemini(&self, source: &str, _url: &Url) -> String {
            format!("<gem>{}</gem>", source)
        }

        fn layout(&self, document: &Document, _viewport: Size) -> LayoutTree {
            self.layout_calls.set(self.layout_calls.get() + 1);
            let size = self.content_size.get();
            let mut tree = LayoutTree::with_root(LayoutBox::new(
                Rect::new(0.0, 0.0, size.width, size.height),
                Some(document.root()),
            ));
            let mut y = 0.0;
            for handle in document.descendants(document.root()) {
                let Some(node) = document.get(handle) else {
                    continue;
                };
                if node.is_element_named("meta") {
                    continue;
                }
                let mut layout_box = LayoutBox::new(Rect::new(0.0, y, 100.0, 20.0), Some(handle));
                if let Some(text) = node.as_text() {
                    layout_box = layout_box.with_char_edges(
                        (1..=text.chars().count()).map(|i| i as f32 * 10.0).collect(),
                    );
                }
                tree.add_child(tree.root(), layout_box);
                y += 20.0;
            }
            tree
        }

        fn run_script(&self, _document: &mut Document, source: &str) -> EngineResult<()> {
            self.scripts.borrow_mut().push(source.to_string());
            Ok(())
        }
    }

    fn make_view(
        content_width: f32,
        content_height: f32,
    ) -> (PageView, Rc<Cell<u32>>, Rc<RefCell<Vec<String>>>) {
        let layout_calls = Rc::new(Cell::new(0));
        let scripts = Rc::new(RefCell::new(Vec::new()));
        let engine = MockEngine {
            layout_calls: layout_calls.clone(),
            content_size: Rc::new(Cell::new(Size::new(content_width, content_height))),
            scripts: scripts.clone(),
        };
        let view = PageView::new(ViewConfig::default(), Box::new(engine)).unwrap();
        (view, layout_calls, scripts)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    /// html (y 0), body (y 20), a (y 40), "click" text (y 60)
    fn install_link_document(
        view: &mut PageView,
        href: &str,
    ) -> (NodeHandle, NodeHandle, NodeHandle) {
        let mut doc = Document::new(url("https://example.com/page"));
        let html = doc.create_element("html");
        doc.append_child(doc.root(), html).unwrap();
        let body = doc.create_element("body");
        doc.append_child(html, body).unwrap();
        let anchor = doc.create_element("a");
        doc.set_attribute(anchor, "href", href).unwrap();
        doc.append_child(body, anchor).unwrap();
        let text = doc.create_text("click");
        doc.append_child(anchor, text).unwrap();
        view.set_document(doc);
        (body, anchor, text)
    }

    fn body_text(doc: &Document) -> String {
        let body = doc.first_element_named("body").unwrap();
        doc.descendants(body)
            .into_iter()
            .filter_map(|h| doc.get(h).and_then(|n| n.as_text()).map(String::from))
            .collect()
    }

    fn response(u: &Url, headers: Headers, body: &[u8]) -> Response {
        Response::new(u.clone(), 200, headers, body.to_vec())
    }

    // --- layout reconciliation ---

    #[test]
    fn test_reconcile_runs_once_when_scrollbars_stable() {
        let (mut view, layout_calls, _) = make_view(100.0, 700.0);
        install_link_document(&mut view, "/target");
        assert_eq!(layout_calls.get(), 1);
        assert!(!view.viewport().vertical.visible);
    }

    #[test]
    fn test_reconcile_runs_twice_when_scrollbar_appears() {
        let (mut view, layout_calls, _) = make_view(100.0, 780.0);
        install_link_document(&mut view, "/target");
        assert_eq!(layout_calls.get(), 2);
        assert!(view.viewport().vertical.visible);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let (mut view, layout_calls, _) = make_view(100.0, 780.0);
        install_link_document(&mut view, "/target");
        let content = view.viewport().content_size();
        let visible = view.viewport().visible_rect();

        layout_calls.set(0);
        view.reconcile();
        assert_eq!(layout_calls.get(), 1);
        assert_eq!(view.viewport().content_size(), content);
        assert_eq!(view.viewport().visible_rect(), visible);
        assert_eq!(view.document().unwrap().visible_rect(), visible);
    }

    #[test]
    fn test_layout_invalidation_triggers_reconcile() {
        let (mut view, layout_calls, _) = make_view(100.0, 400.0);
        install_link_document(&mut view, "/target");
        layout_calls.set(0);
        view.document_mut().unwrap().invalidate_layout();
        view.poll();
        assert_eq!(layout_calls.get(), 1);
        assert!(view.take_needs_paint());
    }

    // --- hover & links ---

    #[test]
    fn test_link_hover_transitions() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        view.on_link_hover = Some(Box::new(move |url| sink.borrow_mut().push(url.to_string())));
        install_link_document(&mut view, "/target");

        view.pointer_moved(Point::new(5.0, 65.0));
        assert_eq!(view.cursor(), CursorKind::Hand);
        assert_eq!(events.borrow().as_slice(), ["https://example.com/target"]);

        // Moving within the same link fires nothing new
        view.pointer_moved(Point::new(15.0, 65.0));
        assert_eq!(events.borrow().len(), 1);

        view.pointer_moved(Point::new(5.0, 25.0));
        assert_eq!(view.cursor(), CursorKind::Arrow);
        assert_eq!(
            events.borrow().as_slice(),
            ["https://example.com/target", ""]
        );
    }

    #[test]
    fn test_tooltip_from_title_attribute() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let mut doc = Document::new(url("https://example.com/"));
        let html = doc.create_element("html");
        doc.append_child(doc.root(), html).unwrap();
        let body = doc.create_element("body");
        doc.append_child(html, body).unwrap();
        let div = doc.create_element("div");
        doc.set_attribute(div, "title", "hint").unwrap();
        doc.append_child(body, div).unwrap();
        let text = doc.create_text("abc");
        doc.append_child(div, text).unwrap();
        view.set_document(doc);

        view.pointer_moved(Point::new(5.0, 65.0));
        assert_eq!(view.tooltip(), Some("hint"));
        view.pointer_moved(Point::new(5.0, 25.0));
        assert_eq!(view.tooltip(), None);
    }

    #[test]
    fn test_link_click_notifies_observer() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let clicks: Rc<RefCell<Vec<(String, String, bool)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = clicks.clone();
        view.on_link_click = Some(Box::new(move |href, target, modifiers| {
            sink.borrow_mut()
                .push((href.to_string(), target.to_string(), modifiers.ctrl));
        }));
        let (_, anchor, _) = install_link_document(&mut view, "/target");
        view.document_mut()
            .unwrap()
            .set_attribute(anchor, "target", "_blank")
            .unwrap();

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        view.pointer_pressed(Point::new(5.0, 65.0), MouseButton::Left, ctrl);
        assert_eq!(
            clicks.borrow().as_slice(),
            [("/target".to_string(), "_blank".to_string(), true)]
        );
    }

    #[test]
    fn test_javascript_link_runs_script() {
        let (mut view, _, scripts) = make_view(100.0, 400.0);
        let clicks = Rc::new(Cell::new(0u32));
        let sink = clicks.clone();
        view.on_link_click = Some(Box::new(move |_, _, _| sink.set(sink.get() + 1)));
        install_link_document(&mut view, "javascript:console.log(1)");

        view.pointer_pressed(Point::new(5.0, 65.0), MouseButton::Left, Modifiers::default());
        assert_eq!(scripts.borrow().as_slice(), ["console.log(1)"]);
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_link_middle_click_and_context_menu() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let middles: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let menus: Rc<RefCell<Vec<(String, Point)>>> = Rc::new(RefCell::new(Vec::new()));
        let middle_sink = middles.clone();
        let menu_sink = menus.clone();
        view.on_link_middle_click =
            Some(Box::new(move |href| middle_sink.borrow_mut().push(href.to_string())));
        view.on_link_context_menu_request = Some(Box::new(move |href, position| {
            menu_sink.borrow_mut().push((href.to_string(), position));
        }));
        install_link_document(&mut view, "/target");
        view.set_screen_origin(Point::new(100.0, 200.0));

        view.pointer_pressed(Point::new(5.0, 65.0), MouseButton::Middle, Modifiers::default());
        view.pointer_pressed(Point::new(5.0, 65.0), MouseButton::Right, Modifiers::default());

        assert_eq!(middles.borrow().as_slice(), ["/target"]);
        assert_eq!(
            menus.borrow().as_slice(),
            [("/target".to_string(), Point::new(105.0, 265.0))]
        );
        // Neither affects the selection
        assert!(view.document().unwrap().selection().is_empty());
    }

    // --- selection ---

    #[test]
    fn test_selection_lifecycle() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let (body, _, text) = install_link_document(&mut view, "/target");

        // Press on non-link content: start == end at the press point
        view.pointer_pressed(Point::new(25.0, 25.0), MouseButton::Left, Modifiers::default());
        {
            let selection = view.document().unwrap().selection();
            let start = selection.start().unwrap();
            assert_eq!(start.node, body);
            assert_eq!(start.offset, 0);
            assert_eq!(selection.end(), selection.start());
        }

        // Dragging moves only the end
        view.pointer_moved(Point::new(25.0, 65.0));
        {
            let selection = view.document().unwrap().selection();
            assert_eq!(selection.start().unwrap().node, body);
            let end = selection.end().unwrap();
            assert_eq!(end.node, text);
            assert_eq!(end.offset, 2);
        }

        // Release clears the drag flag without touching the range
        view.pointer_released(Point::new(25.0, 65.0), MouseButton::Left);
        assert!(!view.in_mouse_selection);
        assert_eq!(
            view.document().unwrap().selection().end().unwrap().offset,
            2
        );

        // Further moves no longer extend the selection
        view.pointer_moved(Point::new(45.0, 65.0));
        assert_eq!(
            view.document().unwrap().selection().end().unwrap().offset,
            2
        );
    }

    #[test]
    fn test_document_replacement_discards_interaction_state() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        install_link_document(&mut view, "/target");
        view.pointer_moved(Point::new(5.0, 65.0));
        view.pointer_pressed(Point::new(25.0, 25.0), MouseButton::Left, Modifiers::default());
        assert!(view.in_mouse_selection);

        install_link_document(&mut view, "/other");
        assert!(view.document().unwrap().hovered_node().is_none());
        assert!(view.document().unwrap().selection().is_empty());
        assert!(!view.in_mouse_selection);
    }

    // --- keyboard ---

    #[test]
    fn test_keyboard_scroll_mapping() {
        let (mut view, _, _) = make_view(2000.0, 2000.0);
        install_link_document(&mut view, "/target");
        assert!(view.viewport().vertical.visible);
        assert!(view.viewport().horizontal.visible);

        assert!(view.key_pressed(Key::Down, Modifiers::default()));
        assert_eq!(view.viewport().vertical.value, 40.0);
        assert!(view.key_pressed(Key::Up, Modifiers::default()));
        assert_eq!(view.viewport().vertical.value, 0.0);

        // Horizontal directions are mapped exactly as defined
        assert!(view.key_pressed(Key::Left, Modifiers::default()));
        assert_eq!(view.viewport().horizontal.value, 40.0);
        assert!(view.key_pressed(Key::Right, Modifiers::default()));
        assert_eq!(view.viewport().horizontal.value, 0.0);

        let page = view.viewport().visible_rect().height;
        assert!(view.key_pressed(Key::PageDown, Modifiers::default()));
        assert_eq!(view.viewport().vertical.value, page);
        assert!(view.key_pressed(Key::PageUp, Modifiers::default()));
        assert_eq!(view.viewport().vertical.value, 0.0);

        assert!(view.key_pressed(Key::End, Modifiers::default()));
        assert_eq!(
            view.viewport().vertical.value,
            view.viewport().vertical.max
        );
        assert!(view.key_pressed(Key::Home, Modifiers::default()));
        assert_eq!(view.viewport().vertical.value, 0.0);

        // Modified keys are ignored by this layer
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        assert!(!view.key_pressed(Key::Down, ctrl));
        assert_eq!(view.viewport().vertical.value, 0.0);
    }

    // --- anchors ---

    fn anchor_document() -> Document {
        let mut doc = Document::new(url("https://example.com/page"));
        let html = doc.create_element("html");
        doc.append_child(doc.root(), html).unwrap();
        let body = doc.create_element("body");
        doc.append_child(html, body).unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div).unwrap();
        doc
    }

    #[test]
    fn test_anchor_resolves_element_id() {
        let (mut view, _, _) = make_view(100.0, 2000.0);
        let mut doc = anchor_document();
        let div = doc.first_element_named("div").unwrap();
        doc.set_attribute(div, "id", "dest").unwrap();
        view.set_document(doc);

        view.scroll_to_anchor("dest");
        // div is the third 20px strip
        assert_eq!(view.viewport().vertical.value, 40.0);
    }

    #[test]
    fn test_anchor_id_beats_name_attribute() {
        let (mut view, _, _) = make_view(100.0, 2000.0);
        let mut doc = anchor_document();
        let div = doc.first_element_named("div").unwrap();
        doc.set_attribute(div, "id", "frag").unwrap();
        let body = doc.first_element_named("body").unwrap();
        let named = doc.create_element("a");
        doc.set_attribute(named, "name", "frag").unwrap();
        doc.append_child(body, named).unwrap();
        view.set_document(doc);

        view.scroll_to_anchor("frag");
        assert_eq!(view.viewport().vertical.value, 40.0);
    }

    #[test]
    fn test_anchor_name_prefers_anchor_elements() {
        let (mut view, _, _) = make_view(100.0, 2000.0);
        let mut doc = anchor_document();
        let div = doc.first_element_named("div").unwrap();
        doc.set_attribute(div, "name", "frag").unwrap();
        let body = doc.first_element_named("body").unwrap();
        let named = doc.create_element("a");
        doc.set_attribute(named, "name", "frag").unwrap();
        doc.append_child(body, named).unwrap();
        view.set_document(doc);

        view.scroll_to_anchor("frag");
        // The anchor element at the fourth strip wins over the div
        assert_eq!(view.viewport().vertical.value, 60.0);
    }

    #[test]
    fn test_anchor_missing_aborts_silently() {
        let (mut view, _, _) = make_view(100.0, 2000.0);
        view.set_document(anchor_document());
        view.viewport_mut().vertical.set_value(100.0);

        view.scroll_to_anchor("nope");
        assert_eq!(view.viewport().vertical.value, 100.0);
    }

    #[test]
    fn test_anchor_without_layout_box_aborts() {
        let (mut view, _, _) = make_view(100.0, 2000.0);
        let mut doc = anchor_document();
        let body = doc.first_element_named("body").unwrap();
        let meta = doc.create_element("meta");
        doc.set_attribute(meta, "id", "ghost").unwrap();
        doc.append_child(body, meta).unwrap();
        view.set_document(doc);
        view.viewport_mut().vertical.set_value(100.0);

        view.scroll_to_anchor("ghost");
        assert_eq!(view.viewport().vertical.value, 100.0);
    }

    // --- drop ---

    #[test]
    fn test_drop_reports_first_url_only() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let dropped: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = dropped.clone();
        view.on_url_drop = Some(Box::new(move |u| sink.borrow_mut().push(u.to_string())));

        let payload = DropPayload {
            urls: vec![url("https://a.example/"), url("https://b.example/")],
            text: None,
        };
        assert!(view.dropped(&payload));
        assert_eq!(dropped.borrow().as_slice(), ["https://a.example/"]);
    }

    #[test]
    fn test_drop_without_observer_falls_through() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let payload = DropPayload {
            urls: vec![url("https://a.example/")],
            text: None,
        };
        assert!(!view.dropped(&payload));
        assert!(!view.dropped(&DropPayload::default()));
    }

    // --- navigation ---

    #[test]
    fn test_successful_navigation_installs_document() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let titles: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let installs = Rc::new(Cell::new(0u32));
        let title_sink = titles.clone();
        let install_sink = installs.clone();
        view.on_title_change =
            Some(Box::new(move |title| title_sink.borrow_mut().push(title.to_string())));
        view.on_document_installed =
            Some(Box::new(move |_| install_sink.set(install_sink.get() + 1)));

        let u = url("https://example.com/");
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/html; charset=UTF-8");
        view.finish_navigation(u.clone(), 0, response(&u, headers, b"<h1>hi</h1>"));

        {
            let doc = view.document().unwrap();
            assert_eq!(doc.mime_type(), "text/html");
            assert_eq!(doc.encoding(), "utf-8");
            assert_eq!(body_text(doc), "<h1>hi</h1>");
        }
        assert!(matches!(view.loading_state(), LoadingState::Idle));
        assert_eq!(installs.get(), 1);
        assert_eq!(titles.borrow().len(), 1);
        assert!(view.take_needs_paint());
    }

    #[test]
    fn test_mime_guess_from_filename_drives_markdown() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let u = url("https://example.com/readme.md");
        view.finish_navigation(u.clone(), 0, response(&u, Headers::new(), b"# hi"));

        let doc = view.document().unwrap();
        assert_eq!(doc.mime_type(), "text/markdown");
        assert_eq!(body_text(doc), "<md># hi</md>");
    }

    #[tokio::test]
    async fn test_empty_body_routes_to_error_page() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let u = url("https://example.com/empty");
        view.finish_navigation(u.clone(), 0, response(&u, Headers::new(), b""));
        assert!(matches!(
            view.loading_state(),
            LoadingState::Failed { message, .. } if message.as_str() == "No data"
        ));
    }

    #[tokio::test]
    async fn test_redirect_follows_location() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let starts: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = starts.clone();
        view.on_load_start = Some(Box::new(move |u| sink.borrow_mut().push(u.to_string())));

        let u = url("https://example.com/a");
        let mut headers = Headers::new();
        headers.insert("Location", "/b");
        view.finish_navigation(u.clone(), 0, Response::new(u.clone(), 301, headers, b"moved".to_vec()));

        assert_eq!(starts.borrow().as_slice(), ["https://example.com/b"]);
        assert!(matches!(
            view.loading_state(),
            LoadingState::Loading { url } if url.as_str() == "https://example.com/b"
        ));
    }

    #[tokio::test]
    async fn test_redirect_hop_limit() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let u = url("https://example.com/loop");
        let mut headers = Headers::new();
        headers.insert("Location", "/loop");
        view.finish_navigation(
            u.clone(),
            MAX_REDIRECTS,
            Response::new(u.clone(), 301, headers, Vec::new()),
        );
        assert!(matches!(
            view.loading_state(),
            LoadingState::Failed { message, .. } if message.as_str() == "Too many redirects"
        ));
    }

    #[tokio::test]
    async fn test_unsupported_content_type_routes_to_error_page() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let u = url("https://example.com/archive");
        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/zip");
        view.finish_navigation(u.clone(), 0, response(&u, headers, b"PK"));
        assert!(matches!(
            view.loading_state(),
            LoadingState::Failed { message, .. } if message.contains("unsupported content type")
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_installs_error_page() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        view.load("not a url");
        assert!(matches!(view.loading_state(), LoadingState::Failed { .. }));

        for _ in 0..100 {
            view.poll();
            if view.document().is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }

        let doc = view.document().expect("error document installed");
        let text = body_text(doc);
        assert!(text.contains("Failed to load not a url"));
        assert!(text.contains("Invalid URL"));
    }

    // --- favicon & painting ---

    #[test]
    fn test_decode_bitmap() {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(4, 2));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let bitmap = decode_bitmap(&bytes).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (4, 2));
        assert_eq!(bitmap.data.len(), 4 * 2 * 4);

        assert!(decode_bitmap(b"garbage").is_none());
    }

    #[derive(Default)]
    struct RecordingPainter {
        clips: Vec<Rect>,
        fills: Vec<(Rect, Color)>,
        translates: Vec<(f32, f32)>,
    }

    impl Painter for RecordingPainter {
        fn add_clip_rect(&mut self, rect: Rect) {
            self.clips.push(rect);
        }

        fn translate(&mut self, dx: f32, dy: f32) {
            self.translates.push((dx, dy));
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.fills.push((rect, color));
        }

        fn draw_tiled_bitmap(&mut self, _rect: Rect, _bitmap: &Bitmap) {}
    }

    #[test]
    fn test_paint_fills_background_and_translates_by_scroll() {
        let (mut view, _, _) = make_view(100.0, 2000.0);
        install_link_document(&mut view, "/target");
        view.document_mut()
            .unwrap()
            .set_background_color(Some(Color::rgb(250, 250, 250)));
        view.viewport_mut().vertical.set_value(120.0);
        view.did_scroll();

        let rect = Rect::new(0.0, 0.0, 1024.0, 768.0);
        let mut painter = RecordingPainter::default();
        view.paint(&mut painter, rect);

        assert_eq!(painter.clips.as_slice(), [rect]);
        assert_eq!(painter.fills.as_slice(), [(rect, Color::rgb(250, 250, 250))]);
        assert_eq!(painter.translates.as_slice(), [(0.0, -120.0)]);
        assert!(!view.take_needs_paint());
    }

    #[test]
    fn test_paint_without_document_fills_white() {
        let (mut view, _, _) = make_view(100.0, 400.0);
        let mut painter = RecordingPainter::default();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        view.paint(&mut painter, rect);
        assert_eq!(painter.fills.as_slice(), [(rect, Color::WHITE)]);
    }
}
