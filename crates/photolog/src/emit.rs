//! Document emission
//!
//! Walks the page plans in order and issues drawing calls to a rendering
//! surface. Emission is strictly sequential: the surface accumulates state
//! page by page.
//!
//! Progress is reported once after the first page header, once per photo
//! slot and once after the document is saved, so a run over N photos yields
//! exactly N + 2 reports ending at 100.
//!
//! A photo that cannot be compressed does not abort the run. Its image area
//! is drawn as a grey placeholder, the annotation box is still drawn, and the
//! path is listed in [`EmitReport::placeholders`].

use crate::constants::{COORD_FONT_SIZE, PLACEHOLDER_TEXT};
use crate::layout::{PagePlan, PageSlot, Point};
use crate::render::{Color, EmbeddableImage, Font, ImageCompressor, RenderSurface, text_width};
use crate::types::Result;
use std::path::PathBuf;

/// Receives progress percentages (0-100]
pub trait ProgressSink {
    fn report(&mut self, percent: f32);
}

impl<F: FnMut(f32)> ProgressSink for F {
    fn report(&mut self, percent: f32) {
        self(percent)
    }
}

/// Counts units of work against a fixed total
struct ProgressTracker<'a, P: ProgressSink + ?Sized> {
    sink: &'a mut P,
    done: usize,
    total: usize,
}

impl<'a, P: ProgressSink + ?Sized> ProgressTracker<'a, P> {
    fn new(sink: &'a mut P, photo_count: usize) -> Self {
        Self {
            sink,
            done: 0,
            total: photo_count + 2,
        }
    }

    fn advance(&mut self) {
        self.done += 1;
        self.sink
            .report(self.done as f32 / self.total as f32 * 100.0);
    }

    fn finish(&mut self) {
        self.done = self.total;
        self.sink.report(100.0);
    }
}

/// What an emission run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitReport {
    pub pages: usize,
    pub photos: usize,
    /// Photos drawn as placeholders because they could not be embedded
    pub placeholders: Vec<PathBuf>,
}

/// Draw every page plan onto `surface`, then save it.
pub fn emit<S, C, P>(
    plans: &[PagePlan],
    logo: Option<&EmbeddableImage>,
    compressor: &C,
    surface: &mut S,
    progress: &mut P,
) -> Result<EmitReport>
where
    S: RenderSurface + ?Sized,
    C: ImageCompressor + ?Sized,
    P: ProgressSink + ?Sized,
{
    let photo_count = plans.iter().map(|plan| plan.slots.len()).sum();
    let mut tracker = ProgressTracker::new(progress, photo_count);
    let mut report = EmitReport {
        pages: plans.len(),
        photos: photo_count,
        placeholders: Vec::new(),
    };

    for plan in plans {
        let title = &plan.header.title;
        surface.draw_text(&title.text, title.font, title.size, title.origin, Color::BLACK)?;

        if let Some(logo) = logo {
            let rect = plan
                .header
                .logo_box
                .fit_centered(logo.width as f32, logo.height as f32);
            surface.draw_image(logo, rect)?;
        }

        if plan.page_index == 0 {
            tracker.advance();
        }

        for slot in &plan.slots {
            if !emit_slot(slot, compressor, surface)? {
                report.placeholders.push(slot.photo.path.clone());
            }
            tracker.advance();
        }

        surface.end_page()?;
        log::debug!("Emitted page {} of {}", plan.page_index + 1, plans.len());
    }

    surface.save()?;
    tracker.finish();

    Ok(report)
}

/// Draw one slot. Returns `false` when the photo was replaced by a placeholder.
fn emit_slot<S, C>(slot: &PageSlot, compressor: &C, surface: &mut S) -> Result<bool>
where
    S: RenderSurface + ?Sized,
    C: ImageCompressor + ?Sized,
{
    let embedded = match compressor.compress(&slot.photo.path) {
        Ok(image) => {
            surface.draw_image(&image, slot.image_rect)?;
            true
        }
        Err(e) => {
            log::warn!("Using placeholder for photo {}: {}", slot.number, e);
            draw_placeholder(slot, surface)?;
            false
        }
    };

    surface.draw_rect(slot.box_rect, Some(Color::WHITE), Some(Color::BLACK))?;

    let caption = &slot.caption;
    surface.draw_text(&caption.text, caption.font, caption.size, caption.origin, Color::BLACK)?;

    if let Some(label) = &slot.coord_label {
        surface.draw_text(&label.text, label.font, label.size, label.origin, Color::BLACK)?;
    }

    for field in &slot.note_fields {
        surface.place_text_field(field)?;
    }
    for line in slot.separators {
        surface.draw_line(line, Color::BLACK)?;
    }

    Ok(embedded)
}

fn draw_placeholder<S: RenderSurface + ?Sized>(slot: &PageSlot, surface: &mut S) -> Result<()> {
    let rect = slot.image_rect;
    surface.draw_rect(rect, Some(Color::LIGHT_GRAY), Some(Color::DARK_GRAY))?;
    let width = text_width(PLACEHOLDER_TEXT, Font::Helvetica, COORD_FONT_SIZE);
    surface.draw_text(
        PLACEHOLDER_TEXT,
        Font::Helvetica,
        COORD_FONT_SIZE,
        Point::new(rect.center_x() - width / 2.0, rect.center_y()),
        Color::DARK_GRAY,
    )
}
