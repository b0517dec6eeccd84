//! Canvas preparation tests.
//!
//! Tests verify:
//! - Padded sides are divisible by 2^z for every level up to the maximum
//! - Padding sits to the right and bottom of the source
//! - Already-aligned squares pass through unchanged

use image::Rgba;

use image_tiler::{padded_side_length, prepare_canvas, BackgroundColor, RasterCodec};

use super::test_utils::{gradient_image, MockImage, RecordingCodec};

#[test]
fn test_side_divisible_for_many_sizes() {
    for long_side in 1..=600u32 {
        for max_zoom in 0..=6u8 {
            let side = padded_side_length(long_side, (long_side / 2).max(1), max_zoom).unwrap();
            for zoom in 0..=max_zoom {
                assert_eq!(side % (1u32 << zoom), 0);
            }
            assert!(side >= long_side && side < long_side + (1u32 << max_zoom));
        }
    }
}

#[test]
fn test_side_ignores_orientation() {
    assert_eq!(
        padded_side_length(300, 200, 3).unwrap(),
        padded_side_length(200, 300, 3).unwrap()
    );
}

#[test]
fn test_prepare_with_mock_codec() {
    let codec = RecordingCodec::new();
    let canvas = prepare_canvas(
        &codec,
        &MockImage::new(300, 200),
        4,
        BackgroundColor::default(),
    )
    .unwrap();

    // ceil(300 / 16) * 16
    assert_eq!(canvas, MockImage::new(304, 304));
}

#[test]
fn test_tall_image_padding_on_right() {
    let codec = RasterCodec::new();
    let source = gradient_image(5, 9);
    let bg = BackgroundColor::OPAQUE_WHITE;

    let canvas = prepare_canvas(&codec, &source, 1, bg).unwrap();

    assert_eq!(canvas.dimensions(), (10, 10));
    for y in 0..10 {
        for x in 0..10 {
            let expected = if x < 5 && y < 9 {
                *source.get_pixel(x, y)
            } else {
                Rgba([255, 255, 255, 255])
            };
            assert_eq!(*canvas.get_pixel(x, y), expected, "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn test_square_aligned_image_unchanged() {
    let codec = RasterCodec::new();
    let source = gradient_image(512, 512);

    let canvas = prepare_canvas(&codec, &source, 1, BackgroundColor::default()).unwrap();
    assert_eq!(canvas, source);
}
