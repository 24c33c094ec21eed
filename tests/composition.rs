//! End-to-end composition through MuPDF

mod common;

use lopdf::content::Content;
use lopdf::Document;

use quadrant_press::document::{DocumentError, DocumentSource, MuPdfSource};
use quadrant_press::layout::{validate, QuadrantId, QuadrantLayout, Rect};
use quadrant_press::render::{MuPdfRasterizer, PageRasterizer, PAGES_PER_DOCUMENT};

use common::{image_streams, mupdf_pipeline, pdf_with_colors, pdf_with_pages};

#[test]
fn test_source_counts_pages() {
    let doc = MuPdfSource.open(pdf_with_pages(3)).unwrap();
    assert_eq!(doc.page_count(), 3);
}

#[test]
fn test_source_rejects_garbage() {
    let result = MuPdfSource.open(b"definitely not a pdf".to_vec());
    assert!(matches!(result, Err(DocumentError::InvalidDocument(_))));
}

#[test]
fn test_rasterizer_renders_page_colours() {
    let doc = MuPdfSource.open(pdf_with_pages(2)).unwrap();
    let pages = MuPdfRasterizer.render(&doc, PAGES_PER_DOCUMENT, 72).unwrap();
    assert_eq!(pages.len(), 2);

    let first = pages[0].pixels().to_rgb8();
    let center = first.get_pixel(first.width() / 2, first.height() / 2);
    assert!(center[0] > 250 && center[1] < 5 && center[2] < 5);

    let second = pages[1].pixels().to_rgb8();
    let center = second.get_pixel(second.width() / 2, second.height() / 2);
    assert!(center[0] < 5 && center[1] > 250 && center[2] < 5);

    // 595 x 842 pt at 72 dpi
    assert!((pages[0].width_pt() - 595.0).abs() < 2.0);
    assert!((pages[0].height_pt() - 842.0).abs() < 2.0);
}

#[test]
fn test_rasterizer_scales_with_dpi() {
    let doc = MuPdfSource.open(pdf_with_pages(2)).unwrap();
    let low = MuPdfRasterizer.render(&doc, 1, 72).unwrap();
    let high = MuPdfRasterizer.render(&doc, 1, 144).unwrap();

    let ratio = f64::from(high[0].width_px()) / f64::from(low[0].width_px());
    assert!((ratio - 2.0).abs() < 0.01);
}

#[test]
fn test_rasterizer_rejects_short_document() {
    let doc = MuPdfSource.open(pdf_with_pages(1)).unwrap();
    let result = MuPdfRasterizer.render(&doc, PAGES_PER_DOCUMENT, 72);
    assert!(matches!(
        result,
        Err(DocumentError::InsufficientPages { required: 2, found: 1 })
    ));
}

#[tokio::test]
async fn test_two_documents_make_one_sheet() {
    let pipeline = mupdf_pipeline();
    let first = MuPdfSource.open(pdf_with_pages(2)).unwrap();
    let second = MuPdfSource.open(pdf_with_pages(4)).unwrap();

    let composite = pipeline.run(&first, &second).await.unwrap();

    let output = Document::load_mem(&composite.bytes).unwrap();
    assert_eq!(output.get_pages().len(), 1);
    assert_eq!(image_streams(&output).len(), 4);

    let layout = validate(&QuadrantLayout::a4()).unwrap();
    for ((id, target), drawn) in layout.rects().zip(composite.drawn.iter()) {
        assert!(target.contains(drawn), "quadrant {} overflows", id);
        // A4 pages in A4-proportioned quadrants fill one axis
        assert!(
            (drawn.width - target.width).abs() < 1e-6
                || (drawn.height - target.height).abs() < 1e-6
        );
    }

    // The composite opens in MuPDF too
    let reopened = MuPdfSource.open(composite.bytes.clone()).unwrap();
    assert_eq!(reopened.page_count(), 1);
}

#[tokio::test]
async fn test_short_second_document_fails() {
    let pipeline = mupdf_pipeline();
    let first = MuPdfSource.open(pdf_with_pages(2)).unwrap();
    let second = MuPdfSource.open(pdf_with_pages(1)).unwrap();

    assert!(pipeline.run(&first, &second).await.is_err());
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 0.01,
        "{}: {} != {}",
        what,
        actual,
        expected
    );
}

/// `cm` rectangle and XObject name of every `q .. cm /Name Do Q` block
fn drawn_images(doc: &Document) -> Vec<(Rect, String)> {
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    let mut drawn = Vec::new();
    let mut transform = None;
    for op in &content.operations {
        match op.operator.as_str() {
            "cm" => {
                let v: Vec<f64> = op
                    .operands
                    .iter()
                    .map(|o| f64::from(o.as_float().unwrap()))
                    .collect();
                transform = Some(Rect::new(v[4], v[5], v[0], v[3]));
            }
            "Do" => {
                let name = op.operands[0].as_name_str().unwrap().to_string();
                drawn.push((transform.take().unwrap(), name));
            }
            _ => {}
        }
    }
    drawn
}

#[tokio::test]
async fn test_pages_land_in_their_quadrants() {
    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLUE: [u8; 3] = [0, 0, 255];
    const YELLOW: [u8; 3] = [255, 255, 0];

    let pipeline = mupdf_pipeline();
    let first = MuPdfSource.open(pdf_with_colors(&[RED, GREEN, BLUE])).unwrap();
    let second = MuPdfSource.open(pdf_with_colors(&[BLUE, YELLOW])).unwrap();
    let composite = pipeline.run(&first, &second).await.unwrap();

    let expected = [
        (QuadrantId::A, RED),
        (QuadrantId::B, GREEN),
        (QuadrantId::C, BLUE),
        (QuadrantId::D, YELLOW),
    ];
    let layout = pipeline.layout();

    // Transforms in the emitted content stream
    let output = Document::load_mem(&composite.bytes).unwrap();
    let drawn = drawn_images(&output);
    assert_eq!(drawn.len(), 4);
    for (index, ((id, _), (rect, name))) in expected.iter().zip(drawn.iter()).enumerate() {
        let target = layout.rect(*id);
        assert_eq!(name, &format!("Im{}", index + 1));
        assert!(target.contains(rect), "quadrant {} overflows", id);
        assert_close(
            rect.x + rect.width / 2.0,
            target.x + target.width / 2.0,
            "centre x",
        );
        assert_close(
            rect.y + rect.height / 2.0,
            target.y + target.height / 2.0,
            "centre y",
        );
    }

    // Pixels of the rendered sheet
    let sheet = MuPdfSource.open(composite.bytes.clone()).unwrap();
    let rendered = MuPdfRasterizer.render(&sheet, 1, 72).unwrap();
    let pixels = rendered[0].pixels().to_rgb8();
    for (id, color) in expected {
        let target = layout.rect(id);
        let x = (target.x + target.width / 2.0) as u32;
        let y = (f64::from(pixels.height()) - (target.y + target.height / 2.0)) as u32;
        let actual = pixels.get_pixel(x, y).0;
        for channel in 0..3 {
            assert!(
                actual[channel].abs_diff(color[channel]) < 10,
                "quadrant {} is {:?}, expected {:?}",
                id,
                actual,
                color
            );
        }
    }
}
