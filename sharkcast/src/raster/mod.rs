//! Covariate rasters and point sampling.
//!
//! Each environmental covariate (chlorophyll-a, sea surface temperature)
//! arrives as a single-band GeoTIFF export. [`GeoTiffRaster`] decodes one
//! band into memory and answers point queries against it; cells that are
//! NaN, match the file's nodata sentinel, or fall outside the raster
//! extent are reported as absent rather than as values.

mod geotiff;

pub use geotiff::GeoTiffRaster;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening a covariate raster.
///
/// Sampling itself cannot fail: absence is data, not an error.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The raster file does not exist.
    #[error("raster not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but is not a decodable TIFF.
    #[error("failed to decode raster {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },

    /// The file decodes but is not a layout this pipeline can sample.
    #[error("unsupported raster layout in {}: {reason}", path.display())]
    Unsupported { path: PathBuf, reason: String },

    /// An underlying read failed.
    #[error("failed to read raster {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
