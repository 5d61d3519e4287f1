use super::Font;
use crate::layout::{FieldPlacement, Line, Point, Rect};
use crate::types::Result;

/// An RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const LIGHT_GRAY: Color = Color::rgb(0.85, 0.85, 0.85);
    pub const DARK_GRAY: Color = Color::rgb(0.4, 0.4, 0.4);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// A JPEG-encoded RGB image ready to embed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmbeddableImage {
    pub width: u32,
    pub height: u32,
    /// Baseline JPEG bytes
    pub data: Vec<u8>,
}

/// Drawing primitives a paginated document backend must provide.
///
/// Calls for one page are issued in order and that page is closed with
/// `end_page` before the next page starts; `save` is called once at the end.
pub trait RenderSurface {
    fn draw_text(
        &mut self,
        text: &str,
        font: Font,
        size: f32,
        origin: Point,
        color: Color,
    ) -> Result<()>;

    fn draw_image(&mut self, image: &EmbeddableImage, rect: Rect) -> Result<()>;

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Color>) -> Result<()>;

    fn draw_line(&mut self, line: Line, color: Color) -> Result<()>;

    /// Place an interactive text-entry field with no border or fill
    fn place_text_field(&mut self, field: &FieldPlacement) -> Result<()>;

    fn end_page(&mut self) -> Result<()>;

    fn save(&mut self) -> Result<()>;
}
