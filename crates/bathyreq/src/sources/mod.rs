//! Bathymetric data sources and the factory that builds their request URLs.
//!
//! Each source is a pure transformer: typed parameters plus a bounding box
//! in, a fully formed request URL out. The set of supported services is a
//! closed enum so that adding a provider is an explicit variant addition,
//! not runtime registration.

pub mod gebco;
pub mod ncei;

use std::fmt;
use std::str::FromStr;

pub use gebco::GebcoParams;
pub use ncei::NceiParams;

use crate::{BathyError, BoundingBox, Result};

/// Supported bathymetric data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// NOAA NCEI global DEM mosaic (ArcGIS ImageServer export).
    Ncei,
    /// GEBCO global grid (WMS getmap).
    Gebco,
    /// NOAA BlueTopo. Recognized but not implemented yet.
    BlueTopo,
}

impl FromStr for DataSource {
    type Err = BathyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ncei" => Ok(DataSource::Ncei),
            "gebco" => Ok(DataSource::Gebco),
            "blue_topo" => Ok(DataSource::BlueTopo),
            other => Err(BathyError::InvalidSource(other.to_string())),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSource::Ncei => "ncei",
            DataSource::Gebco => "gebco",
            DataSource::BlueTopo => "blue_topo",
        };
        f.write_str(name)
    }
}

/// A built request against a data source: the download URL plus the image
/// format the service was asked to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    /// Fully formed request URL (base URL + encoded query string).
    pub url: String,
    /// Declared image format, possibly MIME-style (`"image/tiff"`).
    pub format: String,
}

impl SourceRequest {
    /// File extension for the declared format, with any MIME prefix
    /// stripped: `"image/jpeg"` becomes `"jpeg"`, `"tiff"` stays `"tiff"`.
    pub fn file_extension(&self) -> &str {
        match self.format.rsplit_once('/') {
            Some((_, ext)) => ext,
            None => &self.format,
        }
    }
}

/// Per-source request parameters, one variant per implemented provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceParams {
    /// Parameters for the NCEI ImageServer export.
    Ncei(NceiParams),
    /// Parameters for the GEBCO WMS getmap.
    Gebco(GebcoParams),
}

impl SourceParams {
    /// Default parameters for the given source.
    ///
    /// Fails with [`BathyError::SourceNotImplemented`] for sources that are
    /// recognized but have no builder yet.
    pub fn defaults_for(source: DataSource) -> Result<Self> {
        match source {
            DataSource::Ncei => Ok(SourceParams::Ncei(NceiParams::default())),
            DataSource::Gebco => Ok(SourceParams::Gebco(GebcoParams::default())),
            DataSource::BlueTopo => {
                Err(BathyError::SourceNotImplemented(source.to_string()))
            }
        }
    }

    /// Override the requested raster dimensions in pixels.
    pub fn set_size(&mut self, width: u32, height: u32) {
        match self {
            SourceParams::Ncei(p) => p.size = [width, height],
            SourceParams::Gebco(p) => {
                p.width = width;
                p.height = height;
            }
        }
    }
}

/// Build the request URL for `source` over `bbox`.
///
/// Parameter overrides are taken from `params` when its variant matches the
/// source; a mismatched variant falls back to the source's own defaults, so
/// callers can carry one `SourceParams` value across sources.
pub fn build(
    bbox: &BoundingBox,
    source: DataSource,
    params: &SourceParams,
) -> Result<SourceRequest> {
    match source {
        DataSource::Ncei => {
            let defaults;
            let p = match params {
                SourceParams::Ncei(p) => p,
                _ => {
                    defaults = NceiParams::default();
                    &defaults
                }
            };
            Ok(ncei::build_url(bbox, p))
        }
        DataSource::Gebco => {
            let defaults;
            let p = match params {
                SourceParams::Gebco(p) => p,
                _ => {
                    defaults = GebcoParams::default();
                    &defaults
                }
            };
            Ok(gebco::build_url(bbox, p))
        }
        DataSource::BlueTopo => Err(BathyError::SourceNotImplemented(source.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bbox() -> BoundingBox {
        BoundingBox::new(-117.0, 32.0, -116.0, 33.0)
    }

    #[test]
    fn unknown_source_name_is_invalid() {
        let err = "bogus".parse::<DataSource>().unwrap_err();
        assert!(matches!(err, BathyError::InvalidSource(name) if name == "bogus"));
    }

    #[test]
    fn blue_topo_is_recognized_but_not_implemented() {
        let source = "blue_topo".parse::<DataSource>().unwrap();
        let params = SourceParams::Ncei(NceiParams::default());
        let err = build(&test_bbox(), source, &params).unwrap_err();
        assert!(matches!(err, BathyError::SourceNotImplemented(name) if name == "blue_topo"));
    }

    #[test]
    fn implemented_sources_build() {
        for source in [DataSource::Ncei, DataSource::Gebco] {
            let params = SourceParams::defaults_for(source).unwrap();
            let request = build(&test_bbox(), source, &params).unwrap();
            assert!(request.url.starts_with("https://"));
            assert!(!request.format.is_empty());
        }
    }

    #[test]
    fn mismatched_params_fall_back_to_defaults() {
        let params = SourceParams::Gebco(GebcoParams::default());
        let request = build(&test_bbox(), DataSource::Ncei, &params).unwrap();
        assert_eq!(request.format, "tiff");
    }

    #[test]
    fn file_extension_strips_mime_prefix() {
        let jpeg = SourceRequest {
            url: String::new(),
            format: "image/jpeg".to_string(),
        };
        assert_eq!(jpeg.file_extension(), "jpeg");

        let tiff = SourceRequest {
            url: String::new(),
            format: "tiff".to_string(),
        };
        assert_eq!(tiff.file_extension(), "tiff");
    }

    #[test]
    fn set_size_applies_to_either_variant() {
        let mut ncei = SourceParams::defaults_for(DataSource::Ncei).unwrap();
        ncei.set_size(2, 2);
        assert!(matches!(ncei, SourceParams::Ncei(p) if p.size == [2, 2]));

        let mut gebco = SourceParams::defaults_for(DataSource::Gebco).unwrap();
        gebco.set_size(2, 2);
        assert!(matches!(gebco, SourceParams::Gebco(p) if p.width == 2 && p.height == 2));
    }
}
