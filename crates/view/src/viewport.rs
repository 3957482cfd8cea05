//! Scroll viewport state
//!
//! Models the scrollable area the host widget exposes: outer widget size,
//! per-axis scrollbar state, and the content size produced by layout.
//! Scrollbars that are not needed are hidden and stop consuming space, which
//! is what makes layout reconciliation iterative.

use lammasu_doc::{Point, Rect, Size};

/// Space a visible scrollbar takes from the widget
pub const SCROLLBAR_THICKNESS: f32 = 16.0;

/// Arrow-key scroll amount
const SCROLL_STEP: f32 = 40.0;

/// State of one scrollbar axis
#[derive(Debug, Clone, Copy)]
pub struct ScrollbarState {
    /// Current scroll offset
    pub value: f32,
    /// Maximum scroll offset
    pub max: f32,
    /// Step for one arrow-key press
    pub step: f32,
    /// Whether the bar is shown (and consumes widget space)
    pub visible: bool,
}

impl ScrollbarState {
    fn new() -> Self {
        Self {
            value: 0.0,
            max: 0.0,
            step: SCROLL_STEP,
            visible: false,
        }
    }

    /// Set the offset, clamped to `[0, max]`
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(0.0, self.max);
    }

    /// Adjust the offset by a delta, clamped to `[0, max]`
    pub fn scroll_by(&mut self, delta: f32) {
        self.set_value(self.value + delta);
    }
}

impl Default for ScrollbarState {
    fn default() -> Self {
        Self::new()
    }
}

/// The view's scrollable viewport
#[derive(Debug, Clone)]
pub struct Viewport {
    widget_size: Size,
    content_size: Size,
    pub horizontal: ScrollbarState,
    pub vertical: ScrollbarState,
}

impl Viewport {
    /// Create a viewport for a widget size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            widget_size: Size::new(width, height),
            content_size: Size::ZERO,
            horizontal: ScrollbarState::new(),
            vertical: ScrollbarState::new(),
        }
    }

    /// Outer widget size
    pub fn widget_size(&self) -> Size {
        self.widget_size
    }

    /// Resize the outer widget area
    pub fn set_widget_size(&mut self, size: Size) {
        self.widget_size = size;
    }

    /// Content size from the last layout pass
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Widget space left over after visible scrollbars
    pub fn available_size(&self) -> Size {
        let mut size = self.widget_size;
        if self.vertical.visible {
            size.width -= SCROLLBAR_THICKNESS;
        }
        if self.horizontal.visible {
            size.height -= SCROLLBAR_THICKNESS;
        }
        size
    }

    /// Record a new content size, updating scrollbar visibility and ranges.
    /// One evaluation only; the reconciliation loop owns the fixpoint.
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;

        let h_thickness = if self.horizontal.visible {
            SCROLLBAR_THICKNESS
        } else {
            0.0
        };
        self.vertical.visible = size.height > self.widget_size.height - h_thickness;

        let v_thickness = if self.vertical.visible {
            SCROLLBAR_THICKNESS
        } else {
            0.0
        };
        self.horizontal.visible = size.width > self.widget_size.width - v_thickness;

        let available = self.available_size();
        self.vertical.max = (size.height - available.height).max(0.0);
        self.horizontal.max = (size.width - available.width).max(0.0);
        self.vertical.set_value(self.vertical.value);
        self.horizontal.set_value(self.horizontal.value);
    }

    /// Visible rectangle in content coordinates
    pub fn visible_rect(&self) -> Rect {
        let available = self.available_size();
        Rect::new(
            self.horizontal.value,
            self.vertical.value,
            available.width,
            available.height,
        )
    }

    /// Translate a widget position into content coordinates
    pub fn to_content_position(&self, position: Point) -> Point {
        position.translated(self.horizontal.value, self.vertical.value)
    }

    /// Translate a content position into widget coordinates
    pub fn to_widget_position(&self, position: Point) -> Point {
        position.translated(-self.horizontal.value, -self.vertical.value)
    }

    /// Scroll to the top of the content
    pub fn scroll_to_top(&mut self) {
        self.vertical.set_value(0.0);
    }

    /// Scroll the minimum amount that brings `target` fully into view
    pub fn scroll_into_view(&mut self, target: Rect) {
        let available = self.available_size();
        let visible = self.visible_rect();

        if target.x < visible.x {
            self.horizontal.set_value(target.x);
        } else if target.right() > visible.right() {
            self.horizontal.set_value(target.right() - available.width);
        }

        if target.y < visible.y {
            self.vertical.set_value(target.y);
        } else if target.bottom() > visible.bottom() {
            self.vertical.set_value(target.bottom() - available.height);
        }
    }
}
