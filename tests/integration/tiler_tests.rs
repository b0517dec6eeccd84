//! End-to-end tiling tests.
//!
//! Tests verify:
//! - Files are named `{prefix}_{zoom}_{col}_{row}.{ext}` for every coordinate
//! - Tiles decode to the configured size in the configured format
//! - Padding uses the background color
//! - Repeat runs produce identical output
//! - Failures surface as the right error variant

use std::fs;

use image::{Rgba, RgbaImage};

use image_tiler::{
    error::TileError, BackgroundColor, ResampleFilter, TileFormat, Tiler, TilerConfig, ZoomRange,
    TILE_SIZE,
};

use super::test_utils::{file_names, write_source_png, RecordingCodec};

fn config(dir: &std::path::Path, min: u8, max: u8) -> TilerConfig {
    TilerConfig::new(dir).with_zoom_levels(ZoomRange::new(min, max).unwrap())
}

#[test]
fn test_tiles_written_for_every_coord() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source_png(tmp.path(), "map.png", 300, 200);
    let out = tmp.path().join("tiles");

    let tiler = Tiler::new(config(&out, 0, 2)).unwrap();
    let report = tiler.make_tiles(&source).unwrap();

    assert_eq!(report.canvas_side, 300);
    assert_eq!(report.tiles_written, 21);

    let expected: std::collections::BTreeSet<String> = ZoomRange::new(0, 2)
        .unwrap()
        .coords()
        .map(|c| format!("tile_{}_{}_{}.png", c.zoom, c.col, c.row))
        .collect();
    assert_eq!(file_names(&out), expected);

    for name in &expected {
        let tile = image::open(out.join(name)).unwrap();
        assert_eq!((tile.width(), tile.height()), (TILE_SIZE, TILE_SIZE), "{}", name);
    }
}

#[test]
fn test_jpeg_output_with_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source_png(tmp.path(), "map.png", 64, 40);
    let out = tmp.path().join("jpg");

    let tiler = Tiler::new(
        config(&out, 1, 1)
            .with_format(TileFormat::Jpeg)
            .with_prefix("map")
            .with_jpeg_quality(70),
    )
    .unwrap();
    tiler.make_tiles(&source).unwrap();

    let names = file_names(&out);
    assert_eq!(names.len(), 4);
    assert!(names.contains("map_1_0_0.jpg"));
    assert!(names.contains("map_1_1_1.jpg"));

    let bytes = fs::read(out.join("map_1_1_0.jpg")).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_padding_uses_background() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source_png(tmp.path(), "map.png", 300, 200);
    let out = tmp.path().join("tiles");

    let tiler = Tiler::new(
        config(&out, 0, 1)
            .with_bg_color(BackgroundColor::new(255, 0, 0, 255))
            .with_filter(ResampleFilter::Nearest),
    )
    .unwrap();
    tiler.make_tiles(&source).unwrap();

    // Bottom-left tile spans canvas rows 150..300; the source ends at row 200
    let tile = image::open(out.join("tile_1_0_1.png")).unwrap().to_rgba8();
    assert_ne!(*tile.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*tile.get_pixel(0, 255), Rgba([255, 0, 0, 255]));

    // Bottom-right tile still overlaps source rows 150..200
    let tile = image::open(out.join("tile_1_1_1.png")).unwrap().to_rgba8();
    assert_eq!(*tile.get_pixel(255, 255), Rgba([255, 0, 0, 255]));
}

#[test]
fn test_default_background_is_transparent() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source_png(tmp.path(), "map.png", 20, 10);
    let out = tmp.path().join("tiles");

    let tiler = Tiler::new(config(&out, 0, 0).with_filter(ResampleFilter::Nearest)).unwrap();
    tiler.make_tiles(&source).unwrap();

    let tile = image::open(out.join("tile_0_0_0.png")).unwrap().to_rgba8();
    assert_eq!(*tile.get_pixel(0, 255), Rgba([255, 255, 255, 0]));
    assert_eq!(tile.get_pixel(0, 0)[3], 255);
}

#[test]
fn test_repeat_runs_identical() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source_png(tmp.path(), "map.png", 90, 70);
    let first = tmp.path().join("first");
    let second = tmp.path().join("second");

    Tiler::new(config(&first, 0, 2)).unwrap().make_tiles(&source).unwrap();
    Tiler::new(config(&second, 0, 2)).unwrap().make_tiles(&source).unwrap();

    let names = file_names(&first);
    assert_eq!(names, file_names(&second));
    for name in &names {
        assert_eq!(
            fs::read(first.join(name)).unwrap(),
            fs::read(second.join(name)).unwrap(),
            "{} differs between runs",
            name
        );
    }
}

#[test]
fn test_missing_dir_without_autocreate() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source_png(tmp.path(), "map.png", 16, 16);
    let out = tmp.path().join("absent");

    let tiler = Tiler::new(config(&out, 0, 1).with_autocreate_dirs(false)).unwrap();
    let result = tiler.make_tiles(&source);

    assert!(matches!(result, Err(TileError::OutputDirMissing(_))));
    assert!(!out.exists());
}

#[test]
fn test_corrupt_source() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("broken.jpg");
    fs::write(&source, [0xFF, 0xD8, 0x00, 0x01]).unwrap();

    let tiler = Tiler::new(config(&tmp.path().join("tiles"), 0, 1)).unwrap();
    assert!(matches!(
        tiler.make_tiles(&source),
        Err(TileError::Decode { .. })
    ));
}

#[test]
fn test_native_zoom_from_file() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source_png(tmp.path(), "map.png", 1024, 600);

    let tiler = Tiler::new(config(tmp.path(), 0, 4)).unwrap();
    let estimate = tiler.native_zoom(&source).unwrap();

    assert_eq!((estimate.width, estimate.height), (1024, 600));
    assert_eq!(estimate.canvas_side, 1024);
    assert!((estimate.zoom - 2.0).abs() < 1e-9);
    assert_eq!(estimate.zoom_ceil(), 2);
}

#[test]
fn test_custom_codec_run() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("synthetic.bin");
    fs::write(&source, RecordingCodec::header(1000, 700)).unwrap();
    let out = tmp.path().join("tiles");

    let tiler = Tiler::with_codec(config(&out, 0, 3), RecordingCodec::new()).unwrap();
    let report = tiler.make_tiles(&source).unwrap();

    assert_eq!(report.canvas_side, 1000);
    assert_eq!(report.tiles_written, 1 + 4 + 16 + 64);
    assert_eq!(tiler.codec().crops().len(), 85);
    assert_eq!(report.levels[3].tile_length, 125);

    // The mock encodes each tile as its size header
    let bytes = fs::read(out.join("tile_3_7_7.png")).unwrap();
    assert_eq!(bytes, RecordingCodec::header(TILE_SIZE, TILE_SIZE));
}

#[test]
fn test_oversized_canvas_rejected_before_allocation() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("tiles");
    let config = TilerConfig::new(&out).with_zoom_levels(ZoomRange::single(20).unwrap());
    let tiler = Tiler::new(config).unwrap();

    let result = tiler.make_tiles_from_image(&RgbaImage::new(1, 1));

    assert!(matches!(
        result,
        Err(TileError::CanvasTooLarge {
            long_side: 1,
            max_zoom: 20
        })
    ));
    assert!(!out.exists());
}

#[test]
fn test_native_zoom_allowed_beyond_canvas_budget() {
    let tiler = Tiler::new(TilerConfig::default().with_zoom_levels(ZoomRange::single(20).unwrap()))
        .unwrap();

    let estimate = tiler.native_zoom_of(&RgbaImage::new(1, 1)).unwrap();
    assert_eq!(estimate.canvas_side, 1 << 20);
    assert!((estimate.zoom - 12.0).abs() < 1e-9);
}
