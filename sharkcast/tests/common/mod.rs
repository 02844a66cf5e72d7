//! Shared fixtures: synthetic GeoTIFFs and model artifacts.
#![allow(dead_code)]

use std::fs::File;
use std::path::Path;

use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

/// GeoTIFF tag holding the GeoKey directory.
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
/// GDAL's ASCII nodata sentinel tag.
const TAG_GDAL_NODATA: u16 = 42113;
/// GeographicTypeGeoKey.
const GEO_KEY_GEOGRAPHIC_TYPE: u16 = 2048;

/// Write a single-band Gray32Float GeoTIFF.
///
/// `origin` is the (longitude, latitude) of the top-left corner and
/// `spacing` is degrees per pixel on both axes, so the raster spans
/// `origin.0 .. origin.0 + width * spacing` in longitude and
/// `origin.1 - height * spacing .. origin.1` in latitude. `epsg` emits
/// a GeoKey directory declaring the CRS; `nodata` emits GDAL's ASCII
/// sentinel.
pub fn write_geotiff(
    path: &Path,
    width: u32,
    height: u32,
    data: &[f32],
    origin: (f64, f64),
    spacing: f64,
    epsg: Option<u16>,
    nodata: Option<&str>,
) {
    assert_eq!(data.len(), (width * height) as usize);

    let file = File::create(path).unwrap();
    let mut tiff = TiffEncoder::new(file).unwrap();
    let mut image = tiff
        .new_image::<colortype::Gray32Float>(width, height)
        .unwrap();

    let scale: [f64; 3] = [spacing, spacing, 0.0];
    let tiepoint: [f64; 6] = [0.0, 0.0, 0.0, origin.0, origin.1, 0.0];
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &scale[..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, &tiepoint[..])
        .unwrap();

    if let Some(code) = epsg {
        // Version 1.1.0 directory carrying one geographic CRS key.
        let directory: [u16; 8] = [1, 1, 0, 1, GEO_KEY_GEOGRAPHIC_TYPE, 0, 1, code];
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY), &directory[..])
            .unwrap();
    }

    if let Some(sentinel) = nodata {
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(TAG_GDAL_NODATA), sentinel)
            .unwrap();
    }

    image.write_data(data).unwrap();
}

/// Write a model artifact from a JSON value.
pub fn write_model(path: &Path, artifact: serde_json::Value) {
    std::fs::write(path, artifact.to_string()).unwrap();
}

/// Write a two-feature linear artifact with the identity link.
pub fn write_linear_model(path: &Path, weights: [f64; 2], bias: f64) {
    write_model(
        path,
        serde_json::json!({
            "kind": "linear",
            "weights": weights,
            "bias": bias,
            "n_features": 2,
            "link": "identity",
        }),
    );
}
