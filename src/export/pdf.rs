//! # PDF Export
//!
//! Two stages:
//!
//! 1. [`PdfPlan::build`] resolves the page and converts every variable from
//!    canvas pixels to the page's physical unit.
//! 2. [`render`] writes the plan with `pdf-writer`, using the base-14 fonts
//!    so no font data is embedded.
//!
//! Positions in the plan are measured from the top-left corner in the page
//! unit, and `y` is the text baseline. Rendering flips them onto PDF's
//! bottom-left origin in points.
//!
//! ## Font Mapping
//!
//! | Family contains | Base font |
//! |-----------------|-----------|
//! | `courier`, `mono` | Courier |
//! | `sans`, `arial`, `helvetica` | Helvetica |
//! | `times`, `serif`, `georgia` | Times |
//! | anything else | Helvetica |
//!
//! Bold and italic combine (e.g. `Times-BoldItalic`).

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, GenericImageView};
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use super::{ExportArtifact, ExportContext, ExportError, ExportFormat, Exporter, ImageLoader};
use crate::media::ImageKind;
use crate::page::{PageSizeTable, Unit, to_physical};
use crate::template::Template;

const MM_TO_PT: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// One line of text at its physical position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub value: String,
    /// Base-14 font name, e.g. `Helvetica-Bold`
    pub font: &'static str,
    /// Font size in points
    pub size: f64,
    pub color: [u8; 3],
    /// Distance from the left edge, in the plan's unit
    pub x: f64,
    /// Baseline distance from the top edge, in the plan's unit
    pub y: f64,
}

/// Resolved page geometry and text placement for one template.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPlan {
    pub title: String,
    pub orientation: Orientation,
    pub unit: Unit,
    pub width: f64,
    pub height: f64,
    /// Background reference, only when it should appear in the output
    pub background: Option<String>,
    pub texts: Vec<PlacedText>,
}

impl PdfPlan {
    pub fn build(template: &Template, page_sizes: &PageSizeTable) -> Self {
        let page = page_sizes.resolve(&template.page_size);
        let canvas = page.canvas_size();

        let texts = template
            .variables
            .iter()
            .map(|var| {
                let pos = to_physical(var.x, var.y, canvas, page);
                let format = &var.format;
                PlacedText {
                    value: var.value.clone(),
                    font: base_font(&format.font_family, format.is_bold(), format.is_italic()),
                    size: format.font_size,
                    color: format.rgb().unwrap_or([0, 0, 0]),
                    x: pos.x,
                    y: pos.y,
                }
            })
            .collect();

        let background = template
            .background_image
            .as_ref()
            .filter(|_| template.show_background_in_output)
            .filter(|bg| !bg.is_empty())
            .cloned();

        Self {
            title: template.title.clone(),
            orientation: if page.is_landscape() {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            },
            unit: normalize_unit(&page.unit),
            width: page.width,
            height: page.height,
            background,
            texts,
        }
    }

    fn points_per_unit(&self) -> f64 {
        self.unit.points_per_unit().unwrap_or(MM_TO_PT)
    }

    /// Page size in PDF points.
    pub fn page_points(&self) -> (f64, f64) {
        let k = self.points_per_unit();
        (self.width * k, self.height * k)
    }

    /// Map a top-left physical position onto PDF user space.
    pub fn to_pdf_point(&self, x: f64, y: f64) -> (f32, f32) {
        let k = self.points_per_unit();
        let (_, page_h) = self.page_points();
        ((x * k) as f32, (page_h - y * k) as f32)
    }
}

/// Units the PDF backend understands pass through; anything else is read as mm.
fn normalize_unit(unit: &Unit) -> Unit {
    match unit {
        Unit::Other(_) => Unit::Mm,
        known => known.clone(),
    }
}

/// Pick the base-14 font for a CSS-like family name.
pub fn base_font(family: &str, bold: bool, italic: bool) -> &'static str {
    let family = family.to_ascii_lowercase();
    let courier = family.contains("courier") || family.contains("mono");
    let sans = family.contains("sans") || family.contains("arial") || family.contains("helvetica");
    let times = family.contains("times") || family.contains("serif") || family.contains("georgia");

    if courier {
        match (bold, italic) {
            (false, false) => "Courier",
            (true, false) => "Courier-Bold",
            (false, true) => "Courier-Oblique",
            (true, true) => "Courier-BoldOblique",
        }
    } else if times && !sans {
        match (bold, italic) {
            (false, false) => "Times-Roman",
            (true, false) => "Times-Bold",
            (false, true) => "Times-Italic",
            (true, true) => "Times-BoldItalic",
        }
    } else {
        match (bold, italic) {
            (false, false) => "Helvetica",
            (true, false) => "Helvetica-Bold",
            (false, true) => "Helvetica-Oblique",
            (true, true) => "Helvetica-BoldOblique",
        }
    }
}

/// Encode text for a WinAnsiEncoding simple font.
///
/// Latin-1 maps directly, a handful of typographic characters use their
/// Windows-1252 slots, and everything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

fn zlib(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

// ============================================================================
// RENDERING
// ============================================================================

/// Write `plan` as a single-page PDF.
pub fn render(plan: &PdfPlan, images: &dyn ImageLoader) -> Result<Vec<u8>, ExportError> {
    let mut next_id = 1;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let page_id = alloc();
    let content_id = alloc();
    let info_id = alloc();

    let mut pdf = Pdf::new();
    let (page_w, page_h) = plan.page_points();

    // Fonts, one resource per distinct base font in order of first use
    let mut fonts: Vec<(&'static str, String, Ref)> = Vec::new();
    for text in &plan.texts {
        if !fonts.iter().any(|(base, _, _)| *base == text.font) {
            let res_name = format!("F{}", fonts.len() + 1);
            fonts.push((text.font, res_name, alloc()));
        }
    }
    for (base, _, font_ref) in &fonts {
        pdf.type1_font(*font_ref)
            .base_font(Name(base.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let mut content = Content::new();

    let background = match &plan.background {
        Some(reference) => {
            let bytes = images.load(reference)?;
            let image_ref = alloc();
            embed_background(&mut pdf, image_ref, &bytes, &mut alloc)?;
            content
                .save_state()
                .transform([page_w as f32, 0.0, 0.0, page_h as f32, 0.0, 0.0])
                .x_object(Name(b"Im1"))
                .restore_state();
            Some(image_ref)
        }
        None => None,
    };

    for text in &plan.texts {
        let res_name = fonts
            .iter()
            .find(|(base, _, _)| *base == text.font)
            .map(|(_, name, _)| name.as_str())
            .unwrap_or("F1");
        let (x, y) = plan.to_pdf_point(text.x, text.y);
        let [r, g, b] = text.color;
        let encoded = win_ansi(&text.value);

        content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        content
            .begin_text()
            .set_font(Name(res_name.as_bytes()), text.size as f32)
            .next_line(x, y)
            .show(Str(&encoded))
            .end_text();
    }

    let raw = content.finish();
    let compressed = zlib(&raw)?;
    pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);
    pdf.document_info(info_id)
        .title(TextStr(&plan.title))
        .producer(TextStr("template-composer"));

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, page_w as f32, page_h as f32))
        .parent(pages_id)
        .contents(content_id);
    {
        let mut resources = page.resources();
        if !fonts.is_empty() {
            let mut font_dict = resources.fonts();
            for (_, name, font_ref) in &fonts {
                font_dict.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if let Some(image_ref) = background {
            resources.x_objects().pair(Name(b"Im1"), image_ref);
        }
    }
    drop(page);

    Ok(pdf.finish())
}

/// Embed the background as an image XObject.
///
/// RGB and grayscale JPEGs pass through as DCT data; everything else is
/// decoded to RGB8 and deflated, with a soft mask for transparency.
fn embed_background(
    pdf: &mut Pdf,
    image_ref: Ref,
    bytes: &[u8],
    alloc: &mut impl FnMut() -> Ref,
) -> Result<(), ExportError> {
    let decoded = image::load_from_memory(bytes)?;
    let (w, h) = decoded.dimensions();

    if ImageKind::sniff(bytes) == Some(ImageKind::Jpeg) {
        let gray = matches!(decoded, DynamicImage::ImageLuma8(_));
        if gray || matches!(decoded, DynamicImage::ImageRgb8(_)) {
            let mut xobj = pdf.image_xobject(image_ref, bytes);
            xobj.filter(Filter::DctDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            if gray {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
            return Ok(());
        }
    }

    let smask_ref = if decoded.color().has_alpha() {
        let rgba = decoded.to_rgba8();
        let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed = zlib(&alpha)?;
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let rgb = decoded.to_rgb8();
    let compressed = zlib(rgb.as_raw())?;
    let mut xobj = pdf.image_xobject(image_ref, &compressed);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    Ok(())
}

/// PDF exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn export(
        &self,
        template: &Template,
        ctx: &ExportContext<'_>,
    ) -> Result<ExportArtifact, ExportError> {
        let plan = PdfPlan::build(template, ctx.page_sizes);
        let bytes = render(&plan, ctx.images)?;
        Ok(ExportArtifact {
            file_name: ExportFormat::Pdf.file_name(template),
            content_type: ExportFormat::Pdf.content_type(),
            bytes,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
