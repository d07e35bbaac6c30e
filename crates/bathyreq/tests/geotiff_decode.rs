//! Decode a real GeoTIFF through `ElevationGrid` and sample it.
//!
//! The raster is written with the `tiff` encoder so the test covers the
//! whole load path without touching the network.

use approx::assert_relative_eq;
use bathyreq::{BathyError, BoundingBox, ElevationGrid, InterpMethod};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

/// Write a 2x2 Gray32Float raster. Rows are top-down as in any TIFF:
/// `data[0..2]` is the northern row.
fn write_raster(path: &std::path::Path, data: &[f32; 4], geo_tags: bool) {
    write_raster_with_nodata(path, data, geo_tags, None);
}

fn write_raster_with_nodata(
    path: &std::path::Path,
    data: &[f32; 4],
    geo_tags: bool,
    nodata: Option<&str>,
) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    let mut image = encoder
        .new_image::<colortype::Gray32Float>(2, 2)
        .unwrap();

    if geo_tags {
        // Top-left pixel sits at (lon 1, lat 4); one degree per pixel.
        image
            .encoder()
            .write_tag(Tag::Unknown(33922), &[0.0, 0.0, 0.0, 1.0, 4.0, 0.0][..])
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::Unknown(33550), &[1.0, 1.0, 0.0][..])
            .unwrap();
    }

    if let Some(sentinel) = nodata {
        image
            .encoder()
            .write_tag(Tag::Unknown(42113), sentinel)
            .unwrap();
    }

    image.write_data(data).unwrap();
}

#[test]
fn decodes_geotiff_with_embedded_georeferencing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patch.tiff");
    write_raster(&path, &[10.0, 20.0, 30.0, 40.0], true);

    let grid = ElevationGrid::from_geotiff(&path, None).unwrap();
    let bounds = grid.bounds();
    assert_relative_eq!(bounds.left, 1.0);
    assert_relative_eq!(bounds.bottom, 2.0);
    assert_relative_eq!(bounds.right, 3.0);
    assert_relative_eq!(bounds.top, 4.0);

    // Row 0 must be the southern row after the flip.
    assert_relative_eq!(grid.interpolate(1.0, 2.0, InterpMethod::Nearest).unwrap(), 30.0);
    assert_relative_eq!(grid.interpolate(3.0, 2.0, InterpMethod::Nearest).unwrap(), 40.0);
    assert_relative_eq!(grid.interpolate(1.0, 4.0, InterpMethod::Nearest).unwrap(), 10.0);
    assert_relative_eq!(grid.interpolate(3.0, 4.0, InterpMethod::Nearest).unwrap(), 20.0);

    // Bilinear center of the patch.
    assert_relative_eq!(grid.interpolate(2.0, 3.0, InterpMethod::Linear).unwrap(), 25.0);
}

#[test]
fn plain_tiff_falls_back_to_request_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patch.tiff");
    write_raster(&path, &[10.0, 20.0, 30.0, 40.0], false);

    let bbox = BoundingBox::new(-117.0, 32.0, -116.0, 33.0);
    let grid = ElevationGrid::from_geotiff(&path, Some(bbox)).unwrap();
    assert_eq!(grid.bounds(), bbox);
    assert_eq!(grid.shape(), (2, 2));

    let (lonvec, latvec) = grid.lonlat_vectors();
    assert_eq!(lonvec, vec![-117.0, -116.0]);
    assert_eq!(latvec, vec![32.0, 33.0]);
}

#[test]
fn plain_tiff_without_fallback_cannot_be_placed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patch.tiff");
    write_raster(&path, &[10.0, 20.0, 30.0, 40.0], false);

    let err = ElevationGrid::from_geotiff(&path, None).unwrap_err();
    assert!(matches!(err, BathyError::InvalidGeoTiff(_)));
}

#[test]
fn gdal_nodata_cells_are_rejected_at_query_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patch.tiff");
    // Northern row carries a masked cell at (lon 1, lat 4).
    write_raster_with_nodata(&path, &[-999999.0, 20.0, 30.0, 40.0], true, Some("-999999"));

    let grid = ElevationGrid::from_geotiff(&path, None).unwrap();
    assert_eq!(grid.nodata(), Some(-999999.0));

    let err = grid.interpolate(1.0, 4.0, InterpMethod::Nearest).unwrap_err();
    assert!(matches!(err, BathyError::NoData { lon, lat } if lon == 1.0 && lat == 4.0));

    // Bilinear center draws on the masked cell and must not blend it in.
    let err = grid.interpolate(2.0, 3.0, InterpMethod::Linear).unwrap_err();
    assert!(matches!(err, BathyError::NoData { .. }));

    // Valid cells remain queryable.
    assert_relative_eq!(grid.interpolate(1.0, 2.0, InterpMethod::Nearest).unwrap(), 30.0);
}

#[test]
fn missing_nodata_tag_leaves_grid_unmasked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patch.tiff");
    write_raster(&path, &[10.0, 20.0, 30.0, 40.0], true);

    let grid = ElevationGrid::from_geotiff(&path, None).unwrap();
    assert_eq!(grid.nodata(), None);
}

#[test]
fn corrupt_payload_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not_a_raster.tiff");
    std::fs::write(&path, b"<html>service error page</html>").unwrap();

    let err = ElevationGrid::from_geotiff(&path, None).unwrap_err();
    assert!(matches!(err, BathyError::TiffDecode(_)));
}
