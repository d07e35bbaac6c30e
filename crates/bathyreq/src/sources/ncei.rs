//! NOAA NCEI DEM global mosaic source.
//!
//! Builds export requests against the NCEI ArcGIS ImageServer; see
//! <https://gis.ngdc.noaa.gov/arcgis/sdk/rest/> for the service reference.

use url::Url;

use super::SourceRequest;
use crate::BoundingBox;

/// Fixed path components of the export endpoint, joined by `/`.
const BASE_COMPONENTS: [&str; 7] = [
    "https://gis.ngdc.noaa.gov",
    "arcgis",
    "rest/services",
    "DEM_mosaics",
    "DEM_global_mosaic",
    "ImageServer",
    "exportImage",
];

/// Parameters for an NCEI ImageServer export request.
#[derive(Debug, Clone, PartialEq)]
pub struct NceiParams {
    /// Output raster size in pixels, `[width, height]`.
    pub size: [u32; 2],
    /// Output image format.
    pub format: String,
    /// Pixel sample type.
    pub pixel_type: String,
    /// Spatial reference of the bounding box (well-known ID), if any.
    pub bbox_sr: Option<u32>,
    /// Spatial reference of the output image (well-known ID), if any.
    pub image_sr: Option<u32>,
    /// Value substituted for missing data.
    pub nodata: f64,
    /// Resampling method applied by the service.
    pub interpolation: String,
    /// Compression applied to the output image.
    pub compression: String,
    /// Server-side rendering rule, if any.
    pub rendering_rule: Option<String>,
    /// Response type (`"image"` streams the raster directly).
    pub response_format: String,
}

impl Default for NceiParams {
    fn default() -> Self {
        NceiParams {
            size: [400, 400],
            format: "tiff".to_string(),
            pixel_type: "F32".to_string(),
            bbox_sr: None,
            image_sr: None,
            nodata: 0.0,
            interpolation: "RSP_NearestNeighbor".to_string(),
            compression: "LZ77".to_string(),
            rendering_rule: None,
            response_format: "image".to_string(),
        }
    }
}

/// Build the export URL for `bbox` with the given parameters.
pub fn build_url(bbox: &BoundingBox, params: &NceiParams) -> SourceRequest {
    let base = BASE_COMPONENTS.join("/");
    let mut url = Url::parse(&base).expect("base URL components are valid");

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("bbox", &bbox.to_query_string());
        query.append_pair("size", &format!("{},{}", params.size[0], params.size[1]));
        query.append_pair("format", &params.format);
        query.append_pair("pixelType", &params.pixel_type);
        if let Some(sr) = params.bbox_sr {
            query.append_pair("bboxSR", &sr.to_string());
        }
        if let Some(sr) = params.image_sr {
            query.append_pair("imageSR", &sr.to_string());
        }
        query.append_pair("nodata", &params.nodata.to_string());
        query.append_pair("interpolation", &params.interpolation);
        query.append_pair("compression", &params.compression);
        if let Some(rule) = &params.rendering_rule {
            query.append_pair("renderingRule", rule);
        }
        query.append_pair("f", &params.response_format);
    }

    SourceRequest {
        url: url.into(),
        format: params.format.clone(),
    }
}
