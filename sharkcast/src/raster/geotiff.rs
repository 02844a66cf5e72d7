//! Single-band GeoTIFF reader with inverse geo-transform sampling.

use std::fs::File;
use std::path::{Path, PathBuf};

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::{debug, warn};

use super::RasterError;
use crate::grid::GridPoint;

/// GeoTIFF tag holding the GeoKey directory (CRS metadata).
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
/// GDAL's nodata sentinel tag (ASCII-encoded value).
const TAG_GDAL_NODATA: u16 = 42113;

/// GeographicTypeGeoKey: EPSG code of a geographic CRS.
const GEO_KEY_GEOGRAPHIC_TYPE: u16 = 2048;
/// ProjectedCSTypeGeoKey: EPSG code of a projected CRS.
const GEO_KEY_PROJECTED_CRS: u16 = 3072;

/// CRS the prediction grid is expressed in.
const EPSG_WGS84: u16 = 4326;

/// A single-band covariate raster decoded into memory.
///
/// The file handle is consumed during [`open`](GeoTiffRaster::open) and
/// released before it returns; sampling never touches the filesystem.
/// Georeferencing follows the `ModelPixelScale` and `ModelTiepoint` tags,
/// with the Y axis inverted as in north-up GeoTIFF exports.
pub struct GeoTiffRaster {
    path: PathBuf,
    width: usize,
    height: usize,
    band: Vec<f32>,
    pixel_scale: [f64; 3],
    tiepoint: [f64; 6],
    nodata: Option<f32>,
}

impl GeoTiffRaster {
    /// Decode the raster at `path`.
    ///
    /// The detected CRS is compared against EPSG:4326; a mismatch is
    /// logged as a warning and the raster is used anyway, since the
    /// declared transform still yields usable (if approximate) samples.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::NotFound`] for a missing file,
    /// [`RasterError::Decode`] when the TIFF cannot be parsed, and
    /// [`RasterError::Unsupported`] for multi-band or ungeoreferenced
    /// layouts.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(RasterError::NotFound { path });
        }

        let file = File::open(&path).map_err(|e| RasterError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut decoder = Decoder::new(file)
            .map_err(|e| RasterError::Decode {
                path: path.clone(),
                source: e,
            })?
            .with_limits(Limits::unlimited());

        let (width_u32, height_u32) = decoder.dimensions().map_err(|e| RasterError::Decode {
            path: path.clone(),
            source: e,
        })?;
        let width = width_u32 as usize;
        let height = height_u32 as usize;

        let color_type = decoder.colortype().map_err(|e| RasterError::Decode {
            path: path.clone(),
            source: e,
        })?;
        if !matches!(color_type, tiff::ColorType::Gray(_)) {
            return Err(RasterError::Unsupported {
                path,
                reason: format!("expected a single-band raster, got {:?}", color_type),
            });
        }

        let pixel_scale = match read_f64_triplet(&mut decoder, Tag::ModelPixelScaleTag) {
            Some(scale) => scale,
            None => {
                return Err(RasterError::Unsupported {
                    path,
                    reason: "missing ModelPixelScale tag".to_string(),
                })
            }
        };
        let tiepoint = match read_f64_sextet(&mut decoder, Tag::ModelTiepointTag) {
            Some(tie) => tie,
            None => {
                return Err(RasterError::Unsupported {
                    path,
                    reason: "missing ModelTiepoint tag".to_string(),
                })
            }
        };

        let nodata = read_gdal_nodata(&mut decoder);
        let crs = read_crs_code(&mut decoder);

        match crs {
            Some(code) if code != EPSG_WGS84 => warn!(
                path = %path.display(),
                detected = code,
                expected = EPSG_WGS84,
                "raster CRS differs from the prediction grid; proceeding, results may be inaccurate"
            ),
            Some(_) => debug!(path = %path.display(), "raster CRS is EPSG:4326"),
            None => debug!(
                path = %path.display(),
                "raster carries no CRS metadata; assuming grid coordinates apply"
            ),
        }

        let band = match decoder.read_image() {
            Ok(result) => band_to_f32(result),
            Err(e) => {
                return Err(RasterError::Decode { path, source: e });
            }
        };

        if band.len() != width * height {
            return Err(RasterError::Unsupported {
                path,
                reason: format!(
                    "band holds {} samples for a {}x{} image",
                    band.len(),
                    width,
                    height
                ),
            });
        }

        debug!(
            path = %path.display(),
            width,
            height,
            nodata = ?nodata,
            "opened covariate raster"
        );

        Ok(Self {
            path,
            width,
            height,
            band,
            pixel_scale,
            tiepoint,
            nodata,
        })
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Path this raster was decoded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sample the cell containing one grid point.
    ///
    /// Returns `None` for points outside the raster extent and for cells
    /// holding NaN or the nodata sentinel. NaN never escapes as a value.
    pub fn sample(&self, point: &GridPoint) -> Option<f64> {
        let (px, py) = self.world_to_pixel(point.longitude, point.latitude)?;
        if px < 0.0 || py < 0.0 {
            return None;
        }

        let col = px.floor() as usize;
        let row = py.floor() as usize;
        if col >= self.width || row >= self.height {
            return None;
        }

        let raw = self.band[row * self.width + col];
        if !raw.is_finite() {
            return None;
        }
        if self.nodata.is_some_and(|sentinel| raw == sentinel) {
            return None;
        }

        Some(f64::from(raw))
    }

    /// Sample a batch of points, index-aligned with the input slice.
    pub fn sample_points(&self, points: &[GridPoint]) -> Vec<Option<f64>> {
        points.iter().map(|point| self.sample(point)).collect()
    }

    /// Convert world coordinates to fractional pixel coordinates.
    fn world_to_pixel(&self, wx: f64, wy: f64) -> Option<(f64, f64)> {
        let scale = self.pixel_scale;
        let tie = self.tiepoint;

        if scale[0] == 0.0 || scale[1] == 0.0 {
            return None;
        }

        let px = tie[0] + (wx - tie[3]) / scale[0];
        let py = tie[1] + (tie[4] - wy) / scale[1]; // Y is inverted in north-up rasters

        Some((px, py))
    }
}

fn read_f64_triplet(decoder: &mut Decoder<File>, tag: Tag) -> Option<[f64; 3]> {
    let values = decoder.get_tag_f64_vec(tag).ok()?;
    if values.len() >= 3 {
        Some([values[0], values[1], values[2]])
    } else {
        None
    }
}

fn read_f64_sextet(decoder: &mut Decoder<File>, tag: Tag) -> Option<[f64; 6]> {
    let values = decoder.get_tag_f64_vec(tag).ok()?;
    if values.len() >= 6 {
        Some([
            values[0], values[1], values[2], values[3], values[4], values[5],
        ])
    } else {
        None
    }
}

/// Read GDAL's nodata sentinel, an ASCII-encoded number.
fn read_gdal_nodata(decoder: &mut Decoder<File>) -> Option<f32> {
    let raw = decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(TAG_GDAL_NODATA))
        .ok()?;
    raw.trim_end_matches('\0').trim().parse::<f32>().ok()
}

/// Read the EPSG code from the GeoKey directory, if one is declared.
fn read_crs_code(decoder: &mut Decoder<File>) -> Option<u16> {
    let directory = decoder
        .get_tag_u16_vec(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY))
        .ok()?;
    parse_geokey_crs(&directory)
}

/// Walk a GeoKey directory looking for a geographic or projected CRS key.
///
/// Layout: a four-short header (version, revision, minor revision, key
/// count) followed by four shorts per key (id, tag location, count,
/// value). Only inline values (tag location 0) are considered.
fn parse_geokey_crs(directory: &[u16]) -> Option<u16> {
    if directory.len() < 4 {
        return None;
    }

    let num_keys = directory[3] as usize;
    for index in 0..num_keys {
        let base = 4 + index * 4;
        if base + 4 > directory.len() {
            break;
        }

        let key_id = directory[base];
        let location = directory[base + 1];
        let value = directory[base + 3];

        if location != 0 {
            continue;
        }
        if (key_id == GEO_KEY_GEOGRAPHIC_TYPE || key_id == GEO_KEY_PROJECTED_CRS) && value > 0 {
            return Some(value);
        }
    }

    None
}

/// Flatten a decoded band to f32 samples.
fn band_to_f32(result: DecodingResult) -> Vec<f32> {
    match result {
        DecodingResult::U8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
    }
}
