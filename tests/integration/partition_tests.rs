//! Tile partitioning tests.
//!
//! Tests verify:
//! - Crop regions at each level cover the canvas exactly once
//! - Generation order is zoom, then column, then row
//! - Every tile is resampled to the tile size
//! - Misaligned canvases are rejected up front

use std::collections::HashSet;

use image::{Rgba, RgbaImage};

use image_tiler::{
    error::TileError, prepare_canvas, BackgroundColor, RasterCodec, ResampleFilter, TileCoord,
    TilePartitioner, ZoomRange, TILE_SIZE,
};

use super::test_utils::{assert_exact_partition, gradient_image, MockImage, RecordingCodec};

fn zooms(min: u8, max: u8) -> ZoomRange {
    ZoomRange::new(min, max).unwrap()
}

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn test_regions_partition_canvas_at_each_level() {
    let codec = RecordingCodec::new();
    let canvas = MockImage::new(304, 304);
    let partitioner = TilePartitioner::new(&codec, &canvas, zooms(0, 4), TILE_SIZE).unwrap();

    for zoom in 0..=4 {
        codec.reset();
        let range = ZoomRange::single(zoom).unwrap();
        let level = TilePartitioner::new(&codec, &canvas, range, TILE_SIZE).unwrap();
        let count = level.tiles().count();

        assert_eq!(count, 1usize << (2 * zoom));
        assert_exact_partition(&codec.crops(), 304);
    }

    // The full range crops every level in turn
    codec.reset();
    assert_eq!(partitioner.tiles().count(), 1 + 4 + 16 + 64 + 256);
    assert_eq!(codec.crops().len(), 341);
}

#[test]
fn test_scenario_300x200_max_zoom_2() {
    let codec = RecordingCodec::new();
    let canvas = prepare_canvas(
        &codec,
        &MockImage::new(300, 200),
        2,
        BackgroundColor::default(),
    )
    .unwrap();
    assert_eq!(canvas, MockImage::new(300, 300));

    let partitioner = TilePartitioner::new(&codec, &canvas, zooms(0, 2), TILE_SIZE).unwrap();
    let tiles: Vec<_> = partitioner.tiles().collect();
    assert_eq!(tiles.len(), 21);

    let crops = codec.crops();
    // zoom 0: whole canvas
    assert_eq!(crops[0].size, 300);
    // zoom 2: 16 regions of 75px
    assert!(crops[5..].iter().all(|c| c.size == 75));
    assert_eq!(crops[5..].len(), 16);

    // Every tile resampled to 256
    assert!(tiles
        .iter()
        .all(|t| t.image == MockImage::new(TILE_SIZE, TILE_SIZE)));
    assert!(codec
        .resamples()
        .iter()
        .all(|(_, w, h)| (*w, *h) == (TILE_SIZE, TILE_SIZE)));
}

#[test]
fn test_scenario_square_512_max_zoom_1() {
    let codec = RecordingCodec::new();
    let canvas = prepare_canvas(
        &codec,
        &MockImage::new(512, 512),
        1,
        BackgroundColor::default(),
    )
    .unwrap();
    assert_eq!(canvas, MockImage::new(512, 512));

    let partitioner =
        TilePartitioner::new(&codec, &canvas, ZoomRange::single(1).unwrap(), TILE_SIZE).unwrap();
    let coords: Vec<_> = partitioner.tiles().map(|t| t.coord).collect();

    assert_eq!(coords.len(), 4);
    assert!(codec.crops().iter().all(|c| c.size == TILE_SIZE));
    assert_exact_partition(&codec.crops(), 512);
}

#[test]
fn test_generation_order() {
    let codec = RecordingCodec::new();
    let canvas = MockImage::new(64, 64);
    let partitioner = TilePartitioner::new(&codec, &canvas, zooms(1, 3), TILE_SIZE).unwrap();

    let coords: Vec<TileCoord> = partitioner.tiles().map(|t| t.coord).collect();
    let mut sorted = coords.clone();
    sorted.sort_by_key(|c| (c.zoom, c.col, c.row));

    assert_eq!(coords, sorted);
    assert_eq!(coords[0], TileCoord::new(1, 0, 0));
    assert_eq!(coords[1], TileCoord::new(1, 0, 1));
    assert_eq!(*coords.last().unwrap(), TileCoord::new(3, 7, 7));

    let unique: HashSet<_> = coords.iter().collect();
    assert_eq!(unique.len(), coords.len());
}

#[test]
fn test_single_level_range() {
    let codec = RecordingCodec::new();
    let canvas = MockImage::new(40, 40);
    let partitioner =
        TilePartitioner::new(&codec, &canvas, ZoomRange::single(2).unwrap(), TILE_SIZE).unwrap();

    let coords: Vec<_> = partitioner.tiles().map(|t| t.coord).collect();
    assert_eq!(coords.len(), 16);
    assert!(coords.iter().all(|c| c.zoom == 2));
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
fn test_unpadded_canvas_rejected() {
    let codec = RecordingCodec::new();
    let canvas = MockImage::new(300, 300);

    let result = TilePartitioner::new(&codec, &canvas, zooms(0, 4), TILE_SIZE);
    assert!(matches!(
        result,
        Err(TileError::IndivisibleCanvas {
            side: 300,
            zoom: 4,
            factor: 16
        })
    ));
    assert!(codec.crops().is_empty());
}

#[test]
fn test_rectangular_canvas_rejected() {
    let codec = RecordingCodec::new();
    let canvas = MockImage::new(256, 128);

    let result = TilePartitioner::new(&codec, &canvas, zooms(0, 0), TILE_SIZE);
    assert!(matches!(result, Err(TileError::NonSquareCanvas { .. })));
}

// =============================================================================
// Pixels
// =============================================================================

#[test]
fn test_small_image_upscaled_at_zoom_zero() {
    let codec = RasterCodec::new();
    let source = gradient_image(10, 6);
    let canvas = prepare_canvas(&codec, &source, 0, BackgroundColor::default()).unwrap();

    let partitioner =
        TilePartitioner::new(&codec, &canvas, ZoomRange::single(0).unwrap(), TILE_SIZE).unwrap();
    let tiles: Vec<_> = partitioner.tiles().collect();

    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].image.dimensions(), (TILE_SIZE, TILE_SIZE));
}

#[test]
fn test_tiles_follow_quadrants() {
    let codec = RasterCodec::new().with_filter(ResampleFilter::Nearest);
    let quadrant = |x: u32, y: u32| Rgba([(x / 4) as u8 * 100, (y / 4) as u8 * 100, 50, 255]);
    let source = RgbaImage::from_fn(8, 8, quadrant);
    let partitioner =
        TilePartitioner::new(&codec, &source, ZoomRange::single(1).unwrap(), 16).unwrap();

    for tile in partitioner.tiles() {
        let expected = quadrant(tile.coord.col * 4, tile.coord.row * 4);
        assert_eq!(tile.image.dimensions(), (16, 16));
        assert!(
            tile.image.pixels().all(|p| *p == expected),
            "tile {} does not match its quadrant",
            tile.coord
        );
    }
}

#[test]
fn test_repeat_runs_identical() {
    let codec = RasterCodec::new();
    let source = gradient_image(120, 90);
    let canvas = prepare_canvas(&codec, &source, 2, BackgroundColor::default()).unwrap();
    let partitioner = TilePartitioner::new(&codec, &canvas, zooms(0, 2), 32).unwrap();

    let first: Vec<_> = partitioner.tiles().map(|t| (t.coord, t.image)).collect();
    let second: Vec<_> = partitioner.tiles().map(|t| (t.coord, t.image)).collect();
    assert_eq!(first, second);
}
