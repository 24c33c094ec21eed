//! Composition Benchmarks
//!
//! Layout validation and single-sheet composition at common render
//! resolutions.
//!
//! Run with: `cargo bench --bench composition`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{DynamicImage, ImageBuffer, Rgb};
use std::time::Duration;

use quadrant_press::compose::{PdfCompositor, Placement};
use quadrant_press::layout::{mm_to_pt, validate, AnchorMode, QuadrantId, QuadrantLayout};
use quadrant_press::render::{pt_to_px, PageImage};

/// An A4 page rendered at `dpi`, with a gradient so Flate has real work
fn a4_page(dpi: u32) -> PageImage {
    let width = pt_to_px(mm_to_pt(210.0), dpi);
    let height = pt_to_px(mm_to_pt(297.0), dpi);
    let buffer = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    PageImage::new(DynamicImage::ImageRgb8(buffer), dpi)
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    group.bench_function("validate_a4", |b| {
        let layout = QuadrantLayout::a4();
        b.iter(|| validate(black_box(&layout)).unwrap())
    });

    group.bench_function("rect_for_centered_zoom", |b| {
        let layout = QuadrantLayout::a4();
        b.iter(|| {
            for id in QuadrantId::ALL {
                black_box(layout.rect_for(id, 0.9, AnchorMode::Center).unwrap());
            }
        })
    });

    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    let layout = validate(&QuadrantLayout::a4()).unwrap();
    let compositor = PdfCompositor::new();

    for dpi in [72u32, 150, 300] {
        let pages: Vec<PageImage> = (0..4).map(|_| a4_page(dpi)).collect();
        let bytes: u64 = pages
            .iter()
            .map(|p| p.width_px() as u64 * p.height_px() as u64 * 3)
            .sum();
        group.throughput(Throughput::Bytes(bytes));

        group.bench_with_input(BenchmarkId::new("four_quadrants", dpi), &pages, |b, pages| {
            b.iter(|| {
                let placements: Vec<Placement<'_>> = QuadrantId::ALL
                    .iter()
                    .zip(pages.iter())
                    .map(|(id, image)| Placement {
                        image,
                        target: layout.rect(*id),
                    })
                    .collect();
                black_box(compositor.compose(layout.canvas(), &placements).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout, bench_compose);
criterion_main!(benches);
