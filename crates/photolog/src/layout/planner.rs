//! Page planning
//!
//! Splits the ordered photo sequence into pages and resolves the absolute
//! position of every element. Pure: no I/O, no clock, no randomness.

use super::{FieldPlacement, HeaderPlan, Line, PagePlan, PageSlot, Point, Rect, TextPlacement};
use crate::constants::*;
use crate::options::PageGeometry;
use crate::render::{Font, text_width};
use crate::types::{PhotoRecord, PhotologError, Result};

/// Plan every page for the given photo order.
///
/// Photo `i` (1-based) is captioned "Photo i" no matter which page it lands
/// on. The geometry is assumed to have been validated.
pub fn plan(photos: &[PhotoRecord], geometry: &PageGeometry) -> Result<Vec<PagePlan>> {
    if photos.is_empty() {
        return Err(PhotologError::NoPages);
    }
    let slots_per_page = geometry.slots_per_page.max(1);

    let pages = photos
        .chunks(slots_per_page)
        .enumerate()
        .map(|(page_index, chunk)| PagePlan {
            page_index,
            header: plan_header(geometry),
            slots: chunk
                .iter()
                .enumerate()
                .map(|(position, photo)| {
                    plan_slot(
                        page_index * slots_per_page + position,
                        position,
                        photo,
                        geometry,
                    )
                })
                .collect(),
        })
        .collect();

    Ok(pages)
}

/// Number of pages `photo_count` photos occupy
pub fn page_count(photo_count: usize, geometry: &PageGeometry) -> usize {
    photo_count.div_ceil(geometry.slots_per_page.max(1))
}

/// Header title and logo box, identical on every page
pub fn plan_header(geometry: &PageGeometry) -> HeaderPlan {
    let top = geometry.page_height - geometry.margin;
    let title_width = text_width(&geometry.header_title, Font::HelveticaBold, HEADER_FONT_SIZE);

    HeaderPlan {
        title: TextPlacement {
            text: geometry.header_title.clone(),
            origin: Point::new(
                geometry.page_width - geometry.margin - title_width,
                top - HEADER_BASELINE_DROP,
            ),
            font: Font::HelveticaBold,
            size: HEADER_FONT_SIZE,
        },
        logo_box: Rect::new(
            geometry.margin,
            top - LOGO_BOTTOM_DROP,
            LOGO_WIDTH_PT,
            LOGO_HEIGHT_PT,
        ),
    }
}

/// Resolve one slot.
///
/// `index_in_sequence` is the photo's absolute 0-based position;
/// `position_on_page` selects how far down the page the slot sits.
pub fn plan_slot(
    index_in_sequence: usize,
    position_on_page: usize,
    photo: &PhotoRecord,
    geometry: &PageGeometry,
) -> PageSlot {
    let number = index_in_sequence + 1;
    let photo_x = geometry.page_width / 2.0 - geometry.photo_width / 2.0;
    let slot_top = geometry.content_top() - position_on_page as f32 * geometry.slot_height();

    let image_rect = Rect::new(
        photo_x,
        slot_top - geometry.photo_height,
        geometry.photo_width,
        geometry.photo_height,
    );
    let box_rect = Rect::new(
        photo_x,
        image_rect.y - geometry.annotation_height,
        geometry.photo_width,
        geometry.annotation_height,
    );

    let baseline = image_rect.y - CAPTION_BASELINE_DROP;
    let caption = TextPlacement {
        text: format!("Photo {}", number),
        origin: Point::new(photo_x + BOX_INSET, baseline),
        font: Font::HelveticaBold,
        size: CAPTION_FONT_SIZE,
    };

    let coord_label = photo.coordinates.map(|coords| {
        let text = format!("({})", coords.label());
        let width = text_width(&text, Font::Helvetica, COORD_FONT_SIZE);
        TextPlacement {
            text,
            origin: Point::new(box_rect.right() - BOX_INSET - width, baseline),
            font: Font::Helvetica,
            size: COORD_FONT_SIZE,
        }
    });

    let inner_left = photo_x + BOX_INSET;
    let inner_right = box_rect.right() - BOX_INSET;
    let note_fields = [1, 2].map(|line| FieldPlacement {
        name: format!("notes_photo_{}_{}", number, line),
        rect: Rect::new(
            inner_left,
            box_rect.y + NOTE_FIELD_OFFSETS[line - 1],
            inner_right - inner_left,
            NOTE_FIELD_HEIGHT,
        ),
        font: Font::Helvetica,
        size: NOTE_FIELD_FONT_SIZE,
    });
    let separators = SEPARATOR_OFFSETS.map(|offset| Line {
        from: Point::new(inner_left, box_rect.y + offset),
        to: Point::new(inner_right, box_rect.y + offset),
    });

    PageSlot {
        index_in_sequence,
        number,
        photo: photo.clone(),
        image_rect,
        box_rect,
        caption,
        coord_label,
        note_fields,
        separators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_title_is_right_aligned() {
        let geometry = PageGeometry::default();
        let header = plan_header(&geometry);
        let width = text_width(&header.title.text, Font::HelveticaBold, HEADER_FONT_SIZE);
        let right = header.title.origin.x + width;
        assert!((right - (geometry.page_width - geometry.margin)).abs() < 1e-3);
        assert!((header.title.origin.y - 738.0).abs() < 1e-3);
    }

    #[test]
    fn test_logo_box_sits_in_top_left_margin() {
        let header = plan_header(&PageGeometry::default());
        assert_eq!(header.logo_box.x, 36.0);
        assert!((header.logo_box.y - 727.2).abs() < 1e-3);
        assert_eq!(header.logo_box.width, 90.0);
        assert_eq!(header.logo_box.height, 45.0);
    }

    #[test]
    fn test_page_count() {
        let geometry = PageGeometry::default();
        assert_eq!(page_count(0, &geometry), 0);
        assert_eq!(page_count(1, &geometry), 1);
        assert_eq!(page_count(2, &geometry), 1);
        assert_eq!(page_count(5, &geometry), 3);
    }
}
