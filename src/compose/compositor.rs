//! PDF compositor
//!
//! Writes one output page and draws each placement's image into its target
//! rectangle. Images keep their aspect ratio and are centred in the leftover
//! space. Raw pixel data is Flate-encoded on write, so the output carries
//! no recompression artifacts.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::layout::{Rect, Size};
use crate::render::PageImage;

use super::error::{ComposeError, ComposeResult};

const PRODUCER: &str = concat!("quadrant-press ", env!("CARGO_PKG_VERSION"));

/// An image and the rectangle it must fit into
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub image: &'a PageImage,
    pub target: Rect,
}

/// Output of a successful composition
#[derive(Debug, Clone)]
pub struct Composite {
    /// Single-page PDF
    pub bytes: Vec<u8>,
    /// Rectangle each image was drawn into, in placement order
    pub drawn: Vec<Rect>,
}

/// Scale an image of `width × height` points into `target`, preserving its
/// aspect ratio and centring it. Returns `None` for degenerate input.
pub fn fit_within(width: f64, height: f64, target: &Rect) -> Option<Rect> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return None;
    }
    if !target.is_valid() {
        return None;
    }

    let scale = (target.width / width).min(target.height / height);
    let drawn_w = width * scale;
    let drawn_h = height * scale;

    Some(Rect::new(
        target.x + (target.width - drawn_w) / 2.0,
        target.y + (target.height - drawn_h) / 2.0,
        drawn_w,
        drawn_h,
    ))
}

/// Image data ready to embed
struct PreparedImage {
    width_px: u32,
    height_px: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
    drawn: Rect,
}

fn prepare(index: usize, placement: &Placement<'_>) -> ComposeResult<PreparedImage> {
    let image = placement.image;
    let fail = |reason: String| ComposeError::Placement { index, reason };

    if image.width_px() == 0 || image.height_px() == 0 {
        return Err(fail(format!(
            "empty image ({}x{} px)",
            image.width_px(),
            image.height_px()
        )));
    }
    if image.dpi() == 0 {
        return Err(fail("image has no resolution".to_string()));
    }

    let drawn = fit_within(image.width_pt(), image.height_pt(), &placement.target)
        .ok_or_else(|| fail(format!("degenerate target rectangle {:?}", placement.target)))?;

    let rgb = image.rgb_samples();
    let expected = image.width_px() as usize * image.height_px() as usize * 3;
    if rgb.len() != expected {
        return Err(fail(format!(
            "pixel buffer holds {} bytes, expected {}",
            rgb.len(),
            expected
        )));
    }

    Ok(PreparedImage {
        width_px: image.width_px(),
        height_px: image.height_px(),
        rgb,
        alpha: image.alpha_samples(),
        drawn,
    })
}

/// Single-page PDF compositor
#[derive(Debug, Clone, Default)]
pub struct PdfCompositor;

impl PdfCompositor {
    pub fn new() -> Self {
        Self
    }

    /// Compose all placements onto one page of `canvas` size.
    ///
    /// Every placement is prepared before anything is written: one failure
    /// fails the whole composite.
    pub fn compose(&self, canvas: Size, placements: &[Placement<'_>]) -> ComposeResult<Composite> {
        if !canvas.is_valid() {
            return Err(ComposeError::InvalidCanvas(format!(
                "{}x{} pt",
                canvas.width, canvas.height
            )));
        }
        if placements.is_empty() {
            return Err(ComposeError::Empty);
        }

        let prepared = placements
            .iter()
            .enumerate()
            .map(|(index, placement)| prepare(index, placement))
            .collect::<ComposeResult<Vec<_>>>()?;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut xobjects = Dictionary::new();
        let mut content = String::new();
        let mut drawn = Vec::with_capacity(prepared.len());

        for (index, image) in prepared.into_iter().enumerate() {
            let name = format!("Im{}", index + 1);
            let rect = image.drawn;
            let image_id = embed_image(&mut doc, image);
            xobjects.set(name.as_str(), image_id);

            content.push_str(&format!(
                "q {:.4} 0 0 {:.4} {:.4} {:.4} cm /{} Do Q\n",
                rect.width, rect.height, rect.x, rect.y, name
            ));
            drawn.push(rect);
        }

        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(canvas.width as f32),
                Object::Real(canvas.height as f32),
            ],
            "Resources" => dictionary! { "XObject" => xobjects },
            "Contents" => content_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ComposeError::Write(e.to_string()))?;

        Ok(Composite { bytes, drawn })
    }
}

/// Add an image XObject (plus soft mask for RGBA) and return its id
fn embed_image(doc: &mut Document, image: PreparedImage) -> ObjectId {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width_px as i64,
        "Height" => image.height_px as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };

    if let Some(alpha) = image.alpha {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width_px as i64,
                "Height" => image.height_px as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            alpha,
        ));
        dict.set("SMask", smask_id);
    }

    doc.add_object(Stream::new(dict, image.rgb))
}
