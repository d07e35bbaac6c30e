//! GEBCO global grid source.
//!
//! Builds `getmap` requests against the GEBCO WMS endpoint.

use url::Url;

use super::SourceRequest;
use crate::BoundingBox;

const BASE_URL: &str =
    "https://www.gebco.net/data_and_products/gebco_web_services/web_map_service/mapserv";

/// Parameters for a GEBCO WMS `getmap` request.
#[derive(Debug, Clone, PartialEq)]
pub struct GebcoParams {
    /// Coordinate reference system of the bounding box.
    pub crs: String,
    /// Output image MIME type.
    ///
    /// Defaults to `"image/tiff"`; the decode path is GeoTIFF-based, so a
    /// JPEG response could be downloaded but not loaded into a grid.
    pub format: String,
    /// WMS layer to render.
    pub layers: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// WMS protocol version.
    pub version: String,
}

impl Default for GebcoParams {
    fn default() -> Self {
        GebcoParams {
            crs: "EPSG:4326".to_string(),
            format: "image/tiff".to_string(),
            layers: "gebco_latest_sub_ice_topo".to_string(),
            width: 1200,
            height: 600,
            version: "1.3.0".to_string(),
        }
    }
}

/// Build the `getmap` URL for `bbox` with the given parameters.
pub fn build_url(bbox: &BoundingBox, params: &GebcoParams) -> SourceRequest {
    let mut url = Url::parse(BASE_URL).expect("base URL is valid");

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("bbox", &bbox.to_query_string());
        query.append_pair("request", "getmap");
        query.append_pair("service", "wms");
        query.append_pair("crs", &params.crs);
        query.append_pair("format", &params.format);
        query.append_pair("layers", &params.layers);
        query.append_pair("width", &params.width.to_string());
        query.append_pair("height", &params.height.to_string());
        query.append_pair("version", &params.version);
    }

    SourceRequest {
        url: url.into(),
        format: params.format.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn query_round_trips_supplied_parameters() {
        let params = GebcoParams {
            format: "image/jpeg".to_string(),
            ..GebcoParams::default()
        };
        let request = build_url(&BoundingBox::new(-117.43, 32.55, -117.43, 32.55), &params);
        assert!(request.url.starts_with(BASE_URL));

        let url = Url::parse(&request.url).unwrap();
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs["bbox"],
            "-117.43000,32.55000,-117.43000,32.55000"
        );
        assert_eq!(pairs["request"], "getmap");
        assert_eq!(pairs["service"], "wms");
        assert_eq!(pairs["crs"], "EPSG:4326");
        assert_eq!(pairs["format"], "image/jpeg");
        assert_eq!(pairs["layers"], "gebco_latest_sub_ice_topo");
        assert_eq!(pairs["width"], "1200");
        assert_eq!(pairs["height"], "600");
        assert_eq!(pairs["version"], "1.3.0");
    }

    #[test]
    fn default_format_is_decodable() {
        let request = build_url(
            &BoundingBox::new(-117.0, 32.0, -116.0, 33.0),
            &GebcoParams::default(),
        );
        assert_eq!(request.file_extension(), "tiff");
    }
}
