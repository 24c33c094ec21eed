//! Shared fixtures: small real PDFs built with lopdf

#![allow(dead_code)]

use std::sync::Arc;

use lopdf::{dictionary, Document, Object, Stream};

use quadrant_press::compose::ComposePipeline;
use quadrant_press::layout::{validate, QuadrantLayout};
use quadrant_press::render::{MuPdfRasterizer, RenderPool};

/// Page colours used by [`pdf_with_pages`], cycled per page
pub const PAGE_COLORS: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [0, 0, 0]];

/// A PDF with `pages` A4 pages, each filled with a solid colour
pub fn pdf_with_pages(pages: usize) -> Vec<u8> {
    let colors: Vec<[u8; 3]> = (0..pages)
        .map(|index| PAGE_COLORS[index % PAGE_COLORS.len()])
        .collect();
    pdf_with_colors(&colors)
}

/// A PDF with one solid-colour A4 page per entry in `colors`
pub fn pdf_with_colors(colors: &[[u8; 3]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(colors.len());
    for &[r, g, b] in colors {
        let content = format!(
            "{} {} {} rg 0 0 595 842 re f",
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0
        );
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => colors.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Pipeline over the contract layout with real MuPDF rendering at 72 dpi
pub fn mupdf_pipeline() -> ComposePipeline {
    let layout = validate(&QuadrantLayout::a4()).unwrap();
    ComposePipeline::new(layout, Arc::new(MuPdfRasterizer), RenderPool::new(2), 72).unwrap()
}

/// Image XObject streams in a PDF
pub fn image_streams(doc: &Document) -> Vec<&Stream> {
    doc.objects
        .values()
        .filter_map(|o| match o {
            Object::Stream(s) => Some(s),
            _ => None,
        })
        .filter(|s| matches!(s.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Image"))
        .collect()
}
