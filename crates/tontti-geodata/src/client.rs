//! HTTP client for the four upstream geodata services.
//!
//! Wraps `reqwest` with per-service request construction and the per-field
//! failure policies: elevation and cadastre keep the underlying error text,
//! soil and flood collapse every error to `Unavailable`. The policies are
//! deliberately asymmetric and live only in the `lookup_*` wrappers.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Url};
use tontti_core::{AppConfig, BoundingBox, Coordinate, FloodRisk, LookupOutcome};

use crate::error::GeodataError;
use crate::types::{flatten_properties, FeatureCollection};

const ELEVATION_LAYER: &str = "korkeusmalli_10m";
const PARCEL_TYPE_NAME: &str = "kiinteisto:Kiinteistotunnus";
const SOIL_QUERY_LAYER: &str = "1";
const FLOOD_QUERY_LAYER: &str = "0";

/// GTK soil-map attribute carrying the classification label.
const SOIL_CLASS_ATTRIBUTE: &str = "MAALAJI";
/// Substituted when the soil feature lacks the classification attribute.
const SOIL_CLASS_PLACEHOLDER: &str = "ei saatavilla";

/// Fixed pixel grid for `GetFeatureInfo`; sampling pixel (50,50) makes the
/// service interpret the center of the bounding box as the query point.
const PIXEL_GRID: u32 = 101;
const SAMPLE_PIXEL: u32 = 50;
const CRS: &str = "EPSG:4326";

/// Base URLs of the four upstream services.
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub elevation_wms: Url,
    pub cadastre_wfs: Url,
    pub soil_wms: Url,
    pub flood_wms: Url,
}

impl ServiceEndpoints {
    /// Parses four base URLs, e.g. from config or a mock server in tests.
    ///
    /// # Errors
    ///
    /// Returns [`GeodataError::InvalidUrl`] for the first URL that fails to
    /// parse.
    pub fn new(
        elevation_wms: &str,
        cadastre_wfs: &str,
        soil_wms: &str,
        flood_wms: &str,
    ) -> Result<Self, GeodataError> {
        let parse = |raw: &str| -> Result<Url, GeodataError> {
            Url::parse(raw).map_err(|e| GeodataError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })
        };
        Ok(Self {
            elevation_wms: parse(elevation_wms)?,
            cadastre_wfs: parse(cadastre_wfs)?,
            soil_wms: parse(soil_wms)?,
            flood_wms: parse(flood_wms)?,
        })
    }

    /// # Errors
    ///
    /// Returns [`GeodataError::InvalidUrl`] if a configured URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeodataError> {
        Self::new(
            &config.elevation_wms_url,
            &config.cadastre_wfs_url,
            &config.soil_wms_url,
            &config.flood_wms_url,
        )
    }
}

/// Client for the elevation, cadastre, soil, and flood-risk services.
///
/// Use [`GeodataClient::new`] for production or
/// [`GeodataClient::with_endpoints`] to point at mock servers in tests.
pub struct GeodataClient {
    client: Client,
    endpoints: ServiceEndpoints,
}

impl GeodataClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeodataError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeodataError::InvalidUrl`] for a bad
    /// configured base URL.
    pub fn new(config: &AppConfig) -> Result<Self, GeodataError> {
        Self::with_endpoints(
            ServiceEndpoints::from_config(config)?,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Creates a client with explicit endpoints and timeout (for wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeodataError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_endpoints(
        endpoints: ServiceEndpoints,
        timeout: Duration,
    ) -> Result<Self, GeodataError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent("tontti/0.1 (site-analysis)")
            .build()?;
        Ok(Self { client, endpoints })
    }

    /// Elevation at the coordinate, as verbatim trimmed text.
    ///
    /// Any transport error, timeout, or non-2xx status yields
    /// `Failed(message)` with the underlying error description.
    pub async fn lookup_elevation(&self, coord: Coordinate) -> LookupOutcome<String> {
        match self.fetch_elevation(coord).await {
            Ok(text) => LookupOutcome::Success(text),
            Err(e) => LookupOutcome::Failed(e.to_string()),
        }
    }

    /// Cadastral parcel properties at the coordinate.
    ///
    /// An empty feature collection yields `Unavailable`; any error yields
    /// `Failed(message)`. Ties among overlapping parcels break by
    /// source-returned order: the first feature wins.
    pub async fn lookup_parcel(&self, coord: Coordinate) -> LookupOutcome<BTreeMap<String, String>> {
        match self.fetch_parcel(coord).await {
            Ok(Some(properties)) => LookupOutcome::Success(properties),
            Ok(None) => LookupOutcome::Unavailable,
            Err(e) => LookupOutcome::Failed(e.to_string()),
        }
    }

    /// Soil classification label at the coordinate.
    ///
    /// Every error collapses to `Unavailable` and the message is discarded
    /// from the outcome; it is logged here for operators but never surfaces
    /// as error text in the report.
    pub async fn lookup_soil_class(&self, coord: Coordinate) -> LookupOutcome<String> {
        match self.fetch_soil_class(coord).await {
            Ok(label) => LookupOutcome::Success(label),
            Err(e) => {
                tracing::warn!(source = "soil", error = %e, "lookup failed");
                LookupOutcome::Unavailable
            }
        }
    }

    /// Flood risk at the coordinate: `Yes` when any flood-map feature covers
    /// the point, `No` when the collection is present but empty.
    ///
    /// Same collapsing policy as [`GeodataClient::lookup_soil_class`].
    pub async fn lookup_flood_risk(&self, coord: Coordinate) -> LookupOutcome<FloodRisk> {
        match self.fetch_flood_risk(coord).await {
            Ok(risk) => LookupOutcome::Success(risk),
            Err(e) => {
                tracing::warn!(source = "flood", error = %e, "lookup failed");
                LookupOutcome::Unavailable
            }
        }
    }

    async fn fetch_elevation(&self, coord: Coordinate) -> Result<String, GeodataError> {
        let url = Self::feature_info_url(
            &self.endpoints.elevation_wms,
            ELEVATION_LAYER,
            "text/plain",
            &BoundingBox::raster(coord),
        );
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GeodataError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        Ok(body.trim().to_string())
    }

    async fn fetch_parcel(
        &self,
        coord: Coordinate,
    ) -> Result<Option<BTreeMap<String, String>>, GeodataError> {
        let url = self.parcel_url(coord);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GeodataError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        let collection: FeatureCollection =
            serde_json::from_str(&body).map_err(|e| GeodataError::Deserialize {
                context: format!("GetFeature({PARCEL_TYPE_NAME})"),
                source: e,
            })?;
        Ok(collection
            .features
            .into_iter()
            .next()
            .map(|feature| flatten_properties(feature.properties)))
    }

    async fn fetch_soil_class(&self, coord: Coordinate) -> Result<String, GeodataError> {
        let collection = self
            .fetch_feature_info_json(&self.endpoints.soil_wms, SOIL_QUERY_LAYER, coord)
            .await?;
        let label = collection
            .features
            .into_iter()
            .next()
            .and_then(|feature| match feature.properties.get(SOIL_CLASS_ATTRIBUTE) {
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
                None => None,
            })
            .unwrap_or_else(|| SOIL_CLASS_PLACEHOLDER.to_string());
        Ok(label)
    }

    async fn fetch_flood_risk(&self, coord: Coordinate) -> Result<FloodRisk, GeodataError> {
        let collection = self
            .fetch_feature_info_json(&self.endpoints.flood_wms, FLOOD_QUERY_LAYER, coord)
            .await?;
        if collection.features.is_empty() {
            Ok(FloodRisk::No)
        } else {
            Ok(FloodRisk::Yes)
        }
    }

    async fn fetch_feature_info_json(
        &self,
        base: &Url,
        query_layer: &str,
        coord: Coordinate,
    ) -> Result<FeatureCollection, GeodataError> {
        let url = Self::feature_info_url(
            base,
            query_layer,
            "application/json",
            &BoundingBox::raster(coord),
        );
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(GeodataError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeodataError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Builds a WMS 1.1.1 `GetFeatureInfo` URL sampling the center pixel of
    /// the bounding box.
    fn feature_info_url(base: &Url, layer: &str, info_format: &str, bbox: &BoundingBox) -> Url {
        let mut url = base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("SERVICE", "WMS");
            pairs.append_pair("VERSION", "1.1.1");
            pairs.append_pair("REQUEST", "GetFeatureInfo");
            pairs.append_pair("LAYERS", layer);
            pairs.append_pair("QUERY_LAYERS", layer);
            pairs.append_pair("SRS", CRS);
            pairs.append_pair("INFO_FORMAT", info_format);
            pairs.append_pair("X", &SAMPLE_PIXEL.to_string());
            pairs.append_pair("Y", &SAMPLE_PIXEL.to_string());
            pairs.append_pair("WIDTH", &PIXEL_GRID.to_string());
            pairs.append_pair("HEIGHT", &PIXEL_GRID.to_string());
            pairs.append_pair("BBOX", &bbox.to_param());
        }
        url
    }

    /// Builds the WFS 2.0.0 `GetFeature` URL for the cadastre service.
    ///
    /// Uses the lat-first bounding box ordering; the cadastre expects axes
    /// swapped relative to the WMS services.
    fn parcel_url(&self, coord: Coordinate) -> Url {
        let bbox = BoundingBox::cadastral(coord);
        let mut url = self.endpoints.cadastre_wfs.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("service", "WFS");
            pairs.append_pair("version", "2.0.0");
            pairs.append_pair("request", "GetFeature");
            pairs.append_pair("typeNames", PARCEL_TYPE_NAME);
            pairs.append_pair("outputFormat", "application/json");
            pairs.append_pair("bbox", &format!("{},{}", bbox.to_param(), CRS));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tontti_core::BBOX_DELTA;

    const HELSINKI: Coordinate = Coordinate {
        lat: 60.1699,
        lon: 24.9384,
    };

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn feature_info_url_samples_center_pixel() {
        let base = Url::parse("https://example.com/wms").expect("base url");
        let url = GeodataClient::feature_info_url(
            &base,
            ELEVATION_LAYER,
            "text/plain",
            &BoundingBox::raster(HELSINKI),
        );
        assert_eq!(query_value(&url, "REQUEST").as_deref(), Some("GetFeatureInfo"));
        assert_eq!(query_value(&url, "LAYERS").as_deref(), Some("korkeusmalli_10m"));
        assert_eq!(
            query_value(&url, "QUERY_LAYERS").as_deref(),
            Some("korkeusmalli_10m")
        );
        assert_eq!(query_value(&url, "SRS").as_deref(), Some("EPSG:4326"));
        assert_eq!(query_value(&url, "X").as_deref(), Some("50"));
        assert_eq!(query_value(&url, "Y").as_deref(), Some("50"));
        assert_eq!(query_value(&url, "WIDTH").as_deref(), Some("101"));
        assert_eq!(query_value(&url, "HEIGHT").as_deref(), Some("101"));
    }

    #[test]
    fn feature_info_bbox_is_lon_first() {
        let base = Url::parse("https://example.com/wms").expect("base url");
        let url = GeodataClient::feature_info_url(
            &base,
            ELEVATION_LAYER,
            "text/plain",
            &BoundingBox::raster(HELSINKI),
        );
        let expected = format!(
            "{},{},{},{}",
            HELSINKI.lon,
            HELSINKI.lat,
            HELSINKI.lon + BBOX_DELTA,
            HELSINKI.lat + BBOX_DELTA
        );
        assert_eq!(query_value(&url, "BBOX").as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn parcel_url_uses_lat_first_bbox_with_crs_suffix() {
        let endpoints = ServiceEndpoints::new(
            "https://example.com/wms",
            "https://example.com/wfs",
            "https://example.com/soil",
            "https://example.com/flood",
        )
        .expect("endpoints");
        let client = GeodataClient::with_endpoints(endpoints, Duration::from_secs(10))
            .expect("client construction should not fail");
        let url = client.parcel_url(HELSINKI);
        let expected = format!(
            "{},{},{},{},EPSG:4326",
            HELSINKI.lat,
            HELSINKI.lon,
            HELSINKI.lat + BBOX_DELTA,
            HELSINKI.lon + BBOX_DELTA
        );
        assert_eq!(query_value(&url, "bbox").as_deref(), Some(expected.as_str()));
        assert_eq!(
            query_value(&url, "typeNames").as_deref(),
            Some("kiinteisto:Kiinteistotunnus")
        );
        assert_eq!(
            query_value(&url, "outputFormat").as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn raster_and_cadastral_request_boxes_are_never_confused() {
        let base = Url::parse("https://example.com/wms").expect("base url");
        let wms_url = GeodataClient::feature_info_url(
            &base,
            ELEVATION_LAYER,
            "text/plain",
            &BoundingBox::raster(HELSINKI),
        );
        let endpoints = ServiceEndpoints::new(
            "https://example.com/wms",
            "https://example.com/wfs",
            "https://example.com/soil",
            "https://example.com/flood",
        )
        .expect("endpoints");
        let client = GeodataClient::with_endpoints(endpoints, Duration::from_secs(10))
            .expect("client construction should not fail");
        let wfs_url = client.parcel_url(HELSINKI);

        let wms_bbox = query_value(&wms_url, "BBOX").expect("WMS BBOX");
        let wfs_bbox = query_value(&wfs_url, "bbox").expect("WFS bbox");
        assert!(wms_bbox.starts_with(&HELSINKI.lon.to_string()));
        assert!(wfs_bbox.starts_with(&HELSINKI.lat.to_string()));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ServiceEndpoints::new(
            "not a url",
            "https://example.com/wfs",
            "https://example.com/soil",
            "https://example.com/flood",
        );
        assert!(matches!(result, Err(GeodataError::InvalidUrl { .. })));
    }
}
