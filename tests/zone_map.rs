mod common;

use std::fs;

use geojson::GeoJson;
use serde_json::Value as JsonValue;

use common::{write_garbage, Fixture};
use tifzones::map::html::{json_block, LABELS_BLOCK_ID, POLYGONS_BLOCK_ID};
use tifzones::{
    build_zone_map, extract_all, extract_bounds, ExtractionError, LocalRasterSource,
    LocalScanOptions, MapAssembler, MapConfig, MapError, Palette, Color,
};

fn assembler(output: &std::path::Path) -> MapAssembler<Palette> {
    let colors = Palette::new(vec![Color::new(200, 30, 30), Color::new(30, 30, 200)]);
    MapAssembler::with_colors(MapConfig::default().with_output_path(output), colors)
}

fn count_blocks(page: &str) -> (usize, usize) {
    let polygons: GeoJson = json_block(page, POLYGONS_BLOCK_ID).unwrap().parse().unwrap();
    let GeoJson::FeatureCollection(fc) = polygons else {
        panic!("expected a feature collection");
    };
    let labels: Vec<JsonValue> =
        serde_json::from_str(json_block(page, LABELS_BLOCK_ID).unwrap()).unwrap();
    (fc.features.len(), labels.len())
}

#[test]
fn test_wgs84_fixture_is_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zone.tif");
    Fixture::wgs84(30.0, 50.0, 0.5).write(&path);

    let bounds = extract_bounds(&path).unwrap();
    assert!((bounds.minx - 30.0).abs() < 1e-9);
    assert!((bounds.miny - 50.0).abs() < 1e-9);
    assert!((bounds.maxx - 30.5).abs() < 1e-9);
    assert!((bounds.maxy - 50.5).abs() < 1e-9);
}

#[test]
fn test_utm_fixture_is_reprojected_and_ordered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("utm.tif");
    // 10 km square in UTM zone 36N
    Fixture::projected(32636, (290_000.0, 5_590_000.0), 1_000.0).write(&path);

    let bounds = extract_bounds(&path).unwrap();
    assert!(bounds.is_ordered(), "{:?}", bounds);
    assert!(bounds.minx > 29.5 && bounds.maxx < 30.5, "{:?}", bounds);
    assert!(bounds.miny > 50.0 && bounds.maxy < 51.0, "{:?}", bounds);
}

#[test]
fn test_missing_crs_and_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let no_crs = dir.path().join("no_crs.tif");
    Fixture::wgs84(0.0, 0.0, 1.0).without_crs().write(&no_crs);
    let broken = dir.path().join("broken.tif");
    write_garbage(&broken);

    let err = extract_bounds(&no_crs).unwrap_err();
    assert!(matches!(err, ExtractionError::MissingCrs));
    assert!(err.is_crs_error());

    let err = extract_bounds(&broken).unwrap_err();
    assert!(!err.is_crs_error(), "{err}");
}

#[test]
fn test_one_corrupt_file_among_valid_ones() {
    let dir = tempfile::tempdir().unwrap();
    Fixture::wgs84(30.0, 50.0, 0.5).write(&dir.path().join("a.tif"));
    write_garbage(&dir.path().join("b.tif"));
    Fixture::wgs84(30.5, 50.0, 0.5).write(&dir.path().join("c.tif"));
    Fixture::projected(32636, (290_000.0, 5_590_000.0), 1_000.0).write(&dir.path().join("d.tif"));

    let source = LocalRasterSource::scan(dir.path(), &LocalScanOptions::default()).unwrap();
    assert_eq!(source.len(), 4);

    let report = extract_all(source.into_files());
    assert_eq!(report.success_count(), 3);
    assert_eq!(report.failure_count(), 1);
    assert!(report.failures[0].path.ends_with("b.tif"));

    let labels: Vec<&str> = report.records.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["a.tif", "c.tif", "d.tif"]);
}

#[test]
fn test_full_run_writes_one_polygon_and_label_per_zone() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("tif_zones_map.html");

    Fixture::wgs84(30.0, 50.0, 0.5).write(&data.path().join("west.tif"));
    fs::create_dir(data.path().join("more")).unwrap();
    Fixture::wgs84(30.5, 50.0, 0.5).write(&data.path().join("more").join("east.tif"));
    write_garbage(&data.path().join("more").join("broken.tif"));

    let mut assembler = assembler(&output);
    let outcome = build_zone_map(data.path(), &LocalScanOptions::default(), &mut assembler).unwrap();

    assert_eq!(outcome.discovered, 3);
    assert_eq!(outcome.report.failure_count(), 1);
    assert_eq!(outcome.document.zones.len(), 2);

    let view = outcome.document.view;
    assert!((view.center_lat - 50.25).abs() < 1e-9);
    assert!((view.center_lon - 30.5).abs() < 1e-9);

    let west = outcome.document.zones.iter().find(|z| z.label == "west.tif").unwrap();
    let east = outcome.document.zones.iter().find(|z| z.label == "east.tif").unwrap();
    assert!(!west.bounds.overlaps(&east.bounds));

    let page = fs::read_to_string(&output).unwrap();
    assert_eq!(count_blocks(&page), (2, 2));
}

#[test]
fn test_duplicate_names_are_both_drawn() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("map.html");
    for (dir, minx) in [("a", 10.0), ("b", 20.0)] {
        fs::create_dir(data.path().join(dir)).unwrap();
        Fixture::wgs84(minx, 0.0, 1.0).write(&data.path().join(dir).join("tile.tif"));
    }

    let mut assembler = assembler(&output);
    let outcome = build_zone_map(data.path(), &LocalScanOptions::default(), &mut assembler).unwrap();
    let labels: Vec<&str> = outcome.document.zones.iter().map(|z| z.label.as_str()).collect();
    assert_eq!(labels, vec!["tile.tif", "tile.tif"]);
    assert_eq!(count_blocks(&fs::read_to_string(&output).unwrap()), (2, 2));
}

#[test]
fn test_no_valid_files_writes_nothing() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("tif_zones_map.html");
    write_garbage(&data.path().join("broken.tif"));

    let mut assembler = assembler(&output);
    let result = build_zone_map(data.path(), &LocalScanOptions::default(), &mut assembler);
    assert!(matches!(result, Err(MapError::EmptyInput)));
    assert!(!output.exists());
}

#[test]
fn test_no_files_discovered_writes_nothing() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("tif_zones_map.html");
    fs::write(data.path().join("readme.txt"), b"not a raster").unwrap();

    let mut assembler = assembler(&output);
    let result = build_zone_map(data.path(), &LocalScanOptions::default(), &mut assembler);
    assert!(matches!(result, Err(MapError::NoRastersFound)));
    assert!(result.unwrap_err().is_empty_result());
    assert!(!output.exists());
}
