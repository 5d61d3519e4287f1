//! PDF backend for the rendering surface
//!
//! Builds the document object by object with lopdf:
//! - Page content streams assembled from text, path and image operators
//! - JPEG images embedded as DCTDecode image XObjects, shared when identical
//! - Note fields as AcroForm text widgets without border or background

use super::{Color, EmbeddableImage, Font, RenderSurface};
use crate::constants::STROKE_WIDTH;
use crate::layout::{FieldPlacement, Line, Point, Rect};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

const FONTS: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

/// Resource name of a font in page and form resources
fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Helvetica => "F1",
        Font::HelveticaBold => "F2",
    }
}

/// Content of the page currently being drawn
struct PageBuffer {
    id: ObjectId,
    ops: String,
    xobjects: Dictionary,
    annots: Vec<Object>,
}

impl PageBuffer {
    fn new(id: ObjectId) -> Self {
        Self {
            id,
            ops: String::new(),
            xobjects: Dictionary::new(),
            annots: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.annots.is_empty()
    }
}

/// Rendering surface producing a PDF file with fillable note fields
pub struct PdfSurface {
    doc: Document,
    output_path: PathBuf,
    page_width: f32,
    page_height: f32,
    pages_id: ObjectId,
    page_refs: Vec<Object>,
    font_ids: HashMap<Font, ObjectId>,
    image_cache: HashMap<u64, ObjectId>,
    form_fields: Vec<Object>,
    page: PageBuffer,
}

impl PdfSurface {
    /// Start an empty document whose pages are `page_width` × `page_height`
    /// points. Nothing is written until [`RenderSurface::save`].
    pub fn new(output_path: impl Into<PathBuf>, page_width: f32, page_height: f32) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut font_ids = HashMap::new();
        for font in FONTS {
            let font_id = doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Font".to_vec())),
                ("Subtype", Object::Name(b"Type1".to_vec())),
                ("BaseFont", Object::Name(font.base_name().as_bytes().to_vec())),
                ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
            ]));
            font_ids.insert(font, font_id);
        }

        let first_page = doc.new_object_id();
        Self {
            doc,
            output_path: output_path.into(),
            page_width,
            page_height,
            pages_id,
            page_refs: Vec::new(),
            font_ids,
            image_cache: HashMap::new(),
            form_fields: Vec::new(),
            page: PageBuffer::new(first_page),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Pages closed so far
    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    fn font_dictionary(&self) -> Dictionary {
        let mut fonts = Dictionary::new();
        for font in FONTS {
            if let Some(&id) = self.font_ids.get(&font) {
                fonts.set(font_resource(font), Object::Reference(id));
            }
        }
        fonts
    }

    fn image_xobject(&mut self, image: &EmbeddableImage) -> ObjectId {
        let mut hasher = DefaultHasher::new();
        image.hash(&mut hasher);
        let key = hasher.finish();

        if let Some(&id) = self.image_cache.get(&key) {
            return id;
        }

        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(i64::from(image.width))),
            ("Height", Object::Integer(i64::from(image.height))),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
            ("Filter", Object::Name(b"DCTDecode".to_vec())),
        ]);
        let stream = Stream::new(dict, image.data.clone()).with_compression(false);
        let id = self.doc.add_object(stream);
        self.image_cache.insert(key, id);
        id
    }

    fn finish_document(&mut self) -> Result<Vec<u8>> {
        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs.clone())),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let mut form_resources = Dictionary::new();
        form_resources.set("Font", Object::Dictionary(self.font_dictionary()));
        let acro_form = Dictionary::from_iter(vec![
            ("Fields", Object::Array(self.form_fields.clone())),
            ("NeedAppearances", Object::Boolean(true)),
            ("DR", Object::Dictionary(form_resources)),
            ("DA", Object::string_literal("/F1 0 Tf 0 g")),
        ]);

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
            ("AcroForm", Object::Dictionary(acro_form)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        let info_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Title", Object::string_literal("Site Photographs")),
            ("Producer", Object::string_literal("photolog")),
        ]));
        self.doc.trailer.set("Info", info_id);

        let mut writer = Vec::new();
        self.doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

impl RenderSurface for PdfSurface {
    fn draw_text(
        &mut self,
        text: &str,
        font: Font,
        size: f32,
        origin: Point,
        color: Color,
    ) -> Result<()> {
        self.page.ops.push_str(&format!(
            "BT /{} {} Tf {} rg {} {} Td ({}) Tj ET\n",
            font_resource(font),
            size,
            color_operands(color),
            origin.x,
            origin.y,
            escape_text(text)
        ));
        Ok(())
    }

    fn draw_image(&mut self, image: &EmbeddableImage, rect: Rect) -> Result<()> {
        let image_id = self.image_xobject(image);
        let name = format!("Im{}", image_id.0);
        self.page
            .xobjects
            .set(name.as_bytes(), Object::Reference(image_id));
        self.page.ops.push_str(&format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            rect.width, rect.height, rect.x, rect.y, name
        ));
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Color>) -> Result<()> {
        let paint = match (fill, stroke) {
            (Some(_), Some(_)) => "B",
            (Some(_), None) => "f",
            (None, Some(_)) => "S",
            (None, None) => return Ok(()),
        };

        let mut ops = format!("q {} w ", STROKE_WIDTH);
        if let Some(fill) = fill {
            ops.push_str(&format!("{} rg ", color_operands(fill)));
        }
        if let Some(stroke) = stroke {
            ops.push_str(&format!("{} RG ", color_operands(stroke)));
        }
        ops.push_str(&format!(
            "{} {} {} {} re {} Q\n",
            rect.x, rect.y, rect.width, rect.height, paint
        ));
        self.page.ops.push_str(&ops);
        Ok(())
    }

    fn draw_line(&mut self, line: Line, color: Color) -> Result<()> {
        self.page.ops.push_str(&format!(
            "q {} w {} RG {} {} m {} {} l S Q\n",
            STROKE_WIDTH,
            color_operands(color),
            line.from.x,
            line.from.y,
            line.to.x,
            line.to.y
        ));
        Ok(())
    }

    fn place_text_field(&mut self, field: &FieldPlacement) -> Result<()> {
        let rect = field.rect;
        let widget = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Annot".to_vec())),
            ("Subtype", Object::Name(b"Widget".to_vec())),
            ("FT", Object::Name(b"Tx".to_vec())),
            ("T", Object::string_literal(field.name.as_str())),
            (
                "Rect",
                Object::Array(vec![
                    Object::Real(rect.x),
                    Object::Real(rect.y),
                    Object::Real(rect.right()),
                    Object::Real(rect.top()),
                ]),
            ),
            // Print flag
            ("F", Object::Integer(4)),
            ("P", Object::Reference(self.page.id)),
            (
                "DA",
                Object::string_literal(format!(
                    "/{} {} Tf 0 g",
                    font_resource(field.font),
                    field.size
                )),
            ),
            // No border color and no background: transparent field
            ("MK", Object::Dictionary(Dictionary::new())),
            (
                "BS",
                Object::Dictionary(Dictionary::from_iter(vec![("W", Object::Integer(0))])),
            ),
            (
                "Border",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(0),
                ]),
            ),
        ]);
        let widget_id = self.doc.add_object(widget);
        self.page.annots.push(Object::Reference(widget_id));
        self.form_fields.push(Object::Reference(widget_id));
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let next_id = self.doc.new_object_id();
        let page = std::mem::replace(&mut self.page, PageBuffer::new(next_id));

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(self.font_dictionary()));
        if !page.xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(page.xobjects));
        }

        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), page.ops.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_width),
                Object::Real(self.page_height),
            ]),
        );
        page_dict.set("Resources", Object::Dictionary(resources));
        page_dict.set("Contents", Object::Reference(content_id));
        if !page.annots.is_empty() {
            page_dict.set("Annots", Object::Array(page.annots));
        }

        self.doc
            .objects
            .insert(page.id, Object::Dictionary(page_dict));
        self.page_refs.push(Object::Reference(page.id));
        Ok(())
    }

    /// Write the document. The file only appears under its final name once
    /// it has been written completely.
    fn save(&mut self) -> Result<()> {
        if !self.page.is_empty() {
            self.end_page()?;
        }
        let bytes = self.finish_document()?;

        let partial = partial_path(&self.output_path);
        if let Err(e) = std::fs::write(&partial, &bytes) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        std::fs::rename(&partial, &self.output_path)?;
        log::info!(
            "Wrote {} pages to {}",
            self.page_refs.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

fn color_operands(color: Color) -> String {
    format!("{} {} {}", color.r, color.g, color.b)
}

/// Escape text for a PDF literal string in WinAnsi encoding.
///
/// Latin-1 characters are written as octal escapes; anything outside
/// Latin-1 becomes `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", ch as u32)),
            _ => out.push('?'),
        }
    }
    out
}
