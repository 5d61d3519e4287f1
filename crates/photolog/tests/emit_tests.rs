use chrono::NaiveDate;
use photolog::layout::{FieldPlacement, Line, Point, Rect};
use photolog::render::{Color, EmbeddableImage, Font, ImageCompressor, RenderSurface};
use photolog::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Text { text: String, font: Font, origin: Point },
    Image { width: u32, rect: Rect },
    Rect { rect: Rect, fill: Option<Color>, stroke: Option<Color> },
    Line(Line),
    Field(String),
    EndPage,
    Save,
}

#[derive(Default)]
struct RecordingSurface {
    calls: Vec<Call>,
}

impl RecordingSurface {
    fn pages(&self) -> Vec<&[Call]> {
        self.calls
            .split(|call| *call == Call::EndPage)
            .filter(|page| !page.is_empty() && !matches!(page, [Call::Save]))
            .collect()
    }

    fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_text(
        &mut self,
        text: &str,
        font: Font,
        _size: f32,
        origin: Point,
        _color: Color,
    ) -> photolog::Result<()> {
        self.calls.push(Call::Text {
            text: text.to_string(),
            font,
            origin,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &EmbeddableImage, rect: Rect) -> photolog::Result<()> {
        self.calls.push(Call::Image {
            width: image.width,
            rect,
        });
        Ok(())
    }

    fn draw_rect(
        &mut self,
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<Color>,
    ) -> photolog::Result<()> {
        self.calls.push(Call::Rect { rect, fill, stroke });
        Ok(())
    }

    fn draw_line(&mut self, line: Line, _color: Color) -> photolog::Result<()> {
        self.calls.push(Call::Line(line));
        Ok(())
    }

    fn place_text_field(&mut self, field: &FieldPlacement) -> photolog::Result<()> {
        self.calls.push(Call::Field(field.name.clone()));
        Ok(())
    }

    fn end_page(&mut self) -> photolog::Result<()> {
        self.calls.push(Call::EndPage);
        Ok(())
    }

    fn save(&mut self) -> photolog::Result<()> {
        self.calls.push(Call::Save);
        Ok(())
    }
}

/// Compresses everything to a 40x30 image except paths containing "broken"
struct FakeCompressor;

impl ImageCompressor for FakeCompressor {
    fn compress(&self, path: &Path) -> photolog::Result<EmbeddableImage> {
        if path.to_string_lossy().contains("broken") {
            return Err(PhotologError::ImageCompression {
                path: path.to_owned(),
                message: "cannot decode".to_string(),
            });
        }
        Ok(EmbeddableImage {
            width: 40,
            height: 30,
            data: vec![0xFF, 0xD8, 0xFF, 0xD9],
        })
    }
}

fn create_test_photos(names: &[&str]) -> Vec<PhotoRecord> {
    let taken = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    names
        .iter()
        .map(|name| PhotoRecord::new(PathBuf::from("/site").join(name), taken))
        .collect()
}

fn logo() -> EmbeddableImage {
    EmbeddableImage {
        width: 200,
        height: 50,
        data: vec![1, 2, 3],
    }
}

fn run(
    photos: &[PhotoRecord],
    logo: Option<&EmbeddableImage>,
) -> (RecordingSurface, Vec<f32>, EmitReport) {
    let plans = plan(photos, &PageGeometry::default()).unwrap();
    let mut surface = RecordingSurface::default();
    let mut reported = Vec::new();
    let mut sink = |percent: f32| reported.push(percent);
    let report = emit(&plans, logo, &FakeCompressor, &mut surface, &mut sink).unwrap();
    (surface, reported, report)
}

#[test]
fn test_progress_reports_n_plus_two_events() {
    for n in 1..=5 {
        let names: Vec<String> = (1..=n).map(|i| format!("p{}.jpg", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_, reported, _) = run(&create_test_photos(&refs), None);

        assert_eq!(reported.len(), n + 2, "events for {} photos", n);
        assert!(reported[0] > 0.0);
        assert_eq!(*reported.last().unwrap(), 100.0);
        assert!(reported.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_progress_values_for_three_photos() {
    let (_, reported, _) = run(&create_test_photos(&["a.jpg", "b.jpg", "c.jpg"]), None);
    let expected = [20.0, 40.0, 60.0, 80.0, 100.0];
    assert_eq!(reported.len(), expected.len());
    for (got, want) in reported.iter().zip(expected) {
        assert!((got - want).abs() < 1e-3, "{} vs {}", got, want);
    }
}

#[test]
fn test_three_photos_make_two_pages() {
    let (surface, _, report) = run(&create_test_photos(&["a.jpg", "b.jpg", "c.jpg"]), None);

    let pages = surface.pages();
    assert_eq!(pages.len(), 2);
    assert_eq!(report.pages, 2);
    assert_eq!(report.photos, 3);
    assert!(report.placeholders.is_empty());

    let fields: Vec<&Call> = pages[1]
        .iter()
        .filter(|c| matches!(c, Call::Field(_)))
        .collect();
    assert_eq!(
        fields,
        vec![
            &Call::Field("notes_photo_3_1".to_string()),
            &Call::Field("notes_photo_3_2".to_string())
        ]
    );

    assert_eq!(surface.calls.last(), Some(&Call::Save));
    assert_eq!(
        surface.calls.iter().filter(|c| **c == Call::Save).count(),
        1
    );
}

#[test]
fn test_slot_draw_order() {
    let mut photos = create_test_photos(&["a.jpg"]);
    photos[0] = photos[0].clone().with_coordinates(Coordinates::new(1.0, 2.0));
    let (surface, _, _) = run(&photos, None);

    let kinds: Vec<&'static str> = surface
        .calls
        .iter()
        .map(|call| match call {
            Call::Text { .. } => "text",
            Call::Image { .. } => "image",
            Call::Rect { .. } => "rect",
            Call::Line(_) => "line",
            Call::Field(_) => "field",
            Call::EndPage => "end",
            Call::Save => "save",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "text", // header title
            "image", "rect", "text", // photo, box, caption
            "text", // coordinates
            "field", "field", "line", "line", "end", "save",
        ]
    );

    assert_eq!(
        surface.texts(),
        vec!["SITE PHOTOGRAPHS", "Photo 1", "(1.000000, 2.000000)"]
    );

    match &surface.calls[2] {
        Call::Rect { fill, stroke, .. } => {
            assert_eq!(*fill, Some(Color::WHITE));
            assert_eq!(*stroke, Some(Color::BLACK));
        }
        other => panic!("Expected annotation box, got {:?}", other),
    }
}

#[test]
fn test_logo_drawn_on_every_page_fitted_to_box() {
    let logo = logo();
    let (surface, _, _) = run(
        &create_test_photos(&["a.jpg", "b.jpg", "c.jpg"]),
        Some(&logo),
    );

    let logo_rects: Vec<Rect> = surface
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::Image { width: 200, rect } => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(logo_rects.len(), 2);

    // 4:1 logo in a 90x45 box: full width, quarter height, centered vertically
    let rect = logo_rects[0];
    assert!((rect.width - 90.0).abs() < 1e-3);
    assert!((rect.height - 22.5).abs() < 1e-3);
    assert!((rect.x - 36.0).abs() < 1e-3);
    assert!((rect.center_y() - (727.2 + 22.5)).abs() < 1e-3);
}

#[test]
fn test_broken_photo_becomes_placeholder() {
    let photos = create_test_photos(&["a.jpg", "broken.heic", "c.jpg"]);
    let (surface, reported, report) = run(&photos, None);

    assert_eq!(report.placeholders, vec![PathBuf::from("/site/broken.heic")]);
    assert_eq!(reported.len(), 5);
    assert_eq!(*reported.last().unwrap(), 100.0);

    // Two real images, one grey placeholder; every annotation box still drawn
    let images = surface
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Image { .. }))
        .count();
    assert_eq!(images, 2);
    let placeholders = surface
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Rect { fill: Some(f), .. } if *f == Color::LIGHT_GRAY))
        .count();
    assert_eq!(placeholders, 1);
    assert!(surface.texts().contains(&"Image unavailable"));
    assert!(surface.texts().contains(&"Photo 2"));
    assert_eq!(
        surface
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Field(_)))
            .count(),
        6
    );
}

#[test]
fn test_closure_and_boxed_sinks() {
    let plans = plan(&create_test_photos(&["a.jpg"]), &PageGeometry::default()).unwrap();
    let mut surface = RecordingSurface::default();
    let mut count = 0;
    let mut sink: Box<dyn FnMut(f32) + '_> = Box::new(|_| count += 1);
    emit(&plans, None, &FakeCompressor, &mut surface, &mut sink).unwrap();
    drop(sink);
    assert_eq!(count, 3);
}
