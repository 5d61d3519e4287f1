//! Layout data types
//!
//! These are the fully resolved page plans handed from the planner to the
//! emitter. All coordinates are PDF user space in points: origin at the
//! bottom-left corner of the page, y growing upward.

use crate::render::Font;
use crate::types::PhotoRecord;

/// A position in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Largest rect with the given aspect ratio that fits inside this one,
    /// centered on both axes.
    pub fn fit_centered(&self, content_width: f32, content_height: f32) -> Rect {
        if content_width <= 0.0 || content_height <= 0.0 {
            return *self;
        }
        let scale = (self.width / content_width).min(self.height / content_height);
        let width = content_width * scale;
        let height = content_height * scale;
        Rect::new(
            self.center_x() - width / 2.0,
            self.center_y() - height / 2.0,
            width,
            height,
        )
    }
}

/// A straight line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

/// A single run of text at a fixed baseline origin
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub text: String,
    pub origin: Point,
    pub font: Font,
    pub size: f32,
}

/// An interactive single-line text entry field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlacement {
    /// Unique form field name
    pub name: String,
    pub rect: Rect,
    pub font: Font,
    pub size: f32,
}

/// Header drawn at the top of every page
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderPlan {
    /// Right-aligned title
    pub title: TextPlacement,
    /// Box the logo is fitted into, when a logo is configured
    pub logo_box: Rect,
}

/// One photo's placement on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlot {
    /// 0-based position in the whole rendering order
    pub index_in_sequence: usize,
    /// 1-based number shown in the caption
    pub number: usize,
    pub photo: PhotoRecord,
    /// Where the photo is drawn
    pub image_rect: Rect,
    /// White annotation box directly below the photo
    pub box_rect: Rect,
    /// "Photo N", left-aligned in the box
    pub caption: TextPlacement,
    /// Coordinates, right-aligned on the caption row
    pub coord_label: Option<TextPlacement>,
    /// Two stacked note fields, top first
    pub note_fields: [FieldPlacement; 2],
    /// Separator lines just below each note field, top first
    pub separators: [Line; 2],
}

impl PageSlot {
    pub fn image_origin(&self) -> Point {
        self.image_rect.origin()
    }

    pub fn box_origin(&self) -> Point {
        self.box_rect.origin()
    }

    pub fn caption_origin(&self) -> Point {
        self.caption.origin
    }

    pub fn coord_label_origin(&self) -> Option<Point> {
        self.coord_label.as_ref().map(|label| label.origin)
    }
}

/// Fully resolved layout of one output page
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// 0-based page index
    pub page_index: usize,
    pub header: HeaderPlan,
    /// One or two slots, in rendering order
    pub slots: Vec<PageSlot>,
}
