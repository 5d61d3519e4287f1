//! Rendering for photolog documents
//!
//! This module holds everything that touches the output format:
//! - The drawing-primitive surface the emitter talks to
//! - The lopdf-backed PDF implementation of that surface
//! - Image re-encoding for embedding
//! - Built-in font metrics for text alignment

mod compress;
mod metrics;
mod pdf;
mod surface;

pub use compress::{ImageCompressor, JpegCompressor};
pub use metrics::{Font, text_width};
pub use pdf::PdfSurface;
pub use surface::{Color, EmbeddableImage, RenderSurface};
