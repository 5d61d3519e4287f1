use chrono::NaiveDate;
use photolog::layout::{PagePlan, page_count, plan_slot};
use photolog::render::{Font, text_width};
use photolog::*;

fn create_test_photos(count: usize) -> Vec<PhotoRecord> {
    let base = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    (0..count)
        .map(|i| {
            PhotoRecord::new(
                format!("/site/IMG_{:04}.jpg", i + 1),
                base + chrono::Duration::minutes(i as i64),
            )
        })
        .collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn captions(plans: &[PagePlan]) -> Vec<Vec<String>> {
    plans
        .iter()
        .map(|page| page.slots.iter().map(|s| s.caption.text.clone()).collect())
        .collect()
}

#[test]
fn test_plan_no_photos() {
    let result = plan(&[], &PageGeometry::default());
    assert!(result.is_err());
    match result {
        Err(PhotologError::NoPages) => {}
        other => panic!("Expected NoPages error, got {:?}", other),
    }
}

#[test]
fn test_page_count_is_half_rounded_up() {
    let geometry = PageGeometry::default();
    for n in 1..=9 {
        let plans = plan(&create_test_photos(n), &geometry).unwrap();
        assert_eq!(plans.len(), n.div_ceil(2), "page count for {} photos", n);
        assert_eq!(plans.len(), page_count(n, &geometry));

        let last = plans.last().unwrap();
        let expected_last = if n % 2 == 1 { 1 } else { 2 };
        assert_eq!(last.slots.len(), expected_last, "last page for {} photos", n);
        for page in &plans[..plans.len() - 1] {
            assert_eq!(page.slots.len(), 2);
        }
    }
}

#[test]
fn test_captions_follow_absolute_order() {
    let photos = create_test_photos(5);
    let plans = plan(&photos, &PageGeometry::default()).unwrap();

    assert_eq!(
        captions(&plans),
        vec![
            vec!["Photo 1", "Photo 2"],
            vec!["Photo 3", "Photo 4"],
            vec!["Photo 5"],
        ]
    );

    // Photo 3 is the first slot of page 2 but keeps its absolute number
    let third = &plans[1].slots[0];
    assert_eq!(third.number, 3);
    assert_eq!(third.index_in_sequence, 2);
    assert_eq!(third.photo, photos[2]);
    assert_eq!(third.note_fields[0].name, "notes_photo_3_1");
    assert_eq!(third.note_fields[1].name, "notes_photo_3_2");
}

#[test]
fn test_page_indices_are_sequential() {
    let plans = plan(&create_test_photos(6), &PageGeometry::default()).unwrap();
    let indices: Vec<usize> = plans.iter().map(|p| p.page_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_first_slot_geometry() {
    let photos = create_test_photos(1);
    let plans = plan(&photos, &PageGeometry::default()).unwrap();
    let slot = &plans[0].slots[0];

    // Centered 4.5" x 3.3" photo starting 1" below the top of the page
    assert!(approx(slot.image_rect.x, 144.0));
    assert!(approx(slot.image_rect.top(), 720.0));
    assert!(approx(slot.image_rect.y, 482.4));
    assert!(approx(slot.image_rect.width, 324.0));
    assert!(approx(slot.image_rect.height, 237.6));

    // Annotation box directly below the photo
    assert!(approx(slot.box_rect.x, 144.0));
    assert!(approx(slot.box_rect.top(), slot.image_rect.y));
    assert!(approx(slot.box_rect.y, 401.4));
    assert!(approx(slot.box_rect.height, 81.0));

    assert!(approx(slot.caption_origin().x, 154.0));
    assert!(approx(slot.caption_origin().y, 462.4));
    assert_eq!(slot.caption.font, Font::HelveticaBold);

    let [top, bottom] = &slot.note_fields;
    assert!(approx(top.rect.x, 154.0));
    assert!(approx(top.rect.y, 431.4));
    assert!(approx(top.rect.width, 304.0));
    assert!(approx(top.rect.height, 15.0));
    assert!(approx(bottom.rect.y, 411.4));

    let [upper, lower] = slot.separators;
    assert!(approx(upper.from.y, 429.4));
    assert!(approx(upper.to.y, 429.4));
    assert!(approx(lower.from.y, 409.4));
    assert!(approx(upper.from.x, 154.0));
    assert!(approx(upper.to.x, 458.0));
}

#[test]
fn test_second_slot_advances_by_slot_height() {
    let geometry = PageGeometry::default();
    let plans = plan(&create_test_photos(2), &geometry).unwrap();
    let [first, second] = [&plans[0].slots[0], &plans[0].slots[1]];

    assert!(approx(
        first.image_rect.top() - second.image_rect.top(),
        geometry.slot_height()
    ));
    assert!(approx(second.image_rect.top(), 372.6));
    assert!(approx(second.box_rect.y, 54.0));

    // No overlap, and the lower box stays above the bottom margin
    assert!(second.image_rect.top() < first.box_rect.y);
    assert!(second.box_rect.y >= geometry.margin);
}

#[test]
fn test_slot_positions_repeat_on_every_page() {
    let plans = plan(&create_test_photos(4), &PageGeometry::default()).unwrap();
    assert_eq!(plans[0].slots[0].image_rect, plans[1].slots[0].image_rect);
    assert_eq!(plans[0].slots[1].box_rect, plans[1].slots[1].box_rect);
    assert_eq!(plans[0].header, plans[1].header);
}

#[test]
fn test_coordinate_label_only_with_coordinates() {
    let mut photos = create_test_photos(3);
    photos[1] = photos[1]
        .clone()
        .with_coordinates(Coordinates::new(40.5, -73.25));

    let plans = plan(&photos, &PageGeometry::default()).unwrap();
    assert!(plans[0].slots[0].coord_label.is_none());
    assert!(plans[1].slots[0].coord_label.is_none());

    let slot = &plans[0].slots[1];
    let label = slot.coord_label.as_ref().unwrap();
    assert_eq!(label.text, "(40.500000, -73.250000)");
    assert_eq!(label.font, Font::Helvetica);

    // Right-aligned 10pt inside the box, on the caption baseline
    let right = label.origin.x + text_width(&label.text, Font::Helvetica, label.size);
    assert!(approx(right, slot.box_rect.right() - 10.0));
    assert!(approx(label.origin.y, slot.caption.origin.y));
    assert_eq!(slot.coord_label_origin(), Some(label.origin));
}

#[test]
fn test_note_fields_inside_annotation_box() {
    let plans = plan(&create_test_photos(2), &PageGeometry::default()).unwrap();
    for slot in &plans[0].slots {
        for field in &slot.note_fields {
            assert!(field.rect.x >= slot.box_rect.x);
            assert!(field.rect.right() <= slot.box_rect.right());
            assert!(field.rect.y >= slot.box_rect.y);
            assert!(field.rect.top() <= slot.box_rect.top());
            assert!(field.rect.top() < slot.caption.origin.y);
        }
    }
}

#[test]
fn test_plan_is_deterministic() {
    let mut photos = create_test_photos(7);
    photos[4] = photos[4]
        .clone()
        .with_coordinates(Coordinates::new(-33.8688, 151.2093));
    let geometry = PageGeometry::default();

    let first = plan(&photos, &geometry).unwrap();
    let second = plan(&photos, &geometry).unwrap();
    assert_eq!(first, second);

    for (a, b) in first.iter().zip(&second) {
        for (sa, sb) in a.slots.iter().zip(&b.slots) {
            assert_eq!(sa.image_rect.y.to_bits(), sb.image_rect.y.to_bits());
            assert_eq!(sa.box_rect.y.to_bits(), sb.box_rect.y.to_bits());
        }
    }
}

#[test]
fn test_three_photo_scenario() {
    let mut photos = create_test_photos(3);
    photos[2] = photos[2]
        .clone()
        .with_coordinates(Coordinates::new(51.5, -0.1));

    let plans = plan(&photos, &PageGeometry::default()).unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(captions(&plans[..1]), vec![vec!["Photo 1", "Photo 2"]]);
    assert_eq!(plans[1].slots.len(), 1);
    assert_eq!(plans[1].slots[0].caption.text, "Photo 3");
    assert!(plans[1].slots[0].coord_label.is_some());
    assert!(plans[0].slots.iter().all(|s| s.coord_label.is_none()));
}

#[test]
fn test_plan_slot_direct() {
    let photos = create_test_photos(1);
    let geometry = PageGeometry::default();
    let slot = plan_slot(41, 1, &photos[0], &geometry);
    assert_eq!(slot.caption.text, "Photo 42");
    assert!(approx(slot.image_rect.top(), 720.0 - geometry.slot_height()));
}
