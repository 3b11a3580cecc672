//! Elasticsearch document shape for normalized regions.

use chrono::{DateTime, Utc};
use geo::Centroid;
use serde::Serialize;

use ginkgo::elasticsearch::EsDocument;
use ginkgo::models::{GeoPoint, NormalizedRegion};

/// Region document indexed into Elasticsearch.
///
/// Carries the boundary as GeoJSON for the `geo_shape` field plus a
/// centroid `geo_point` for distance sorting.
#[derive(Debug, Clone, Serialize)]
pub struct EsRegionDoc {
    pub adm_code: String,
    #[serde(rename = "Sido")]
    pub sido: String,
    #[serde(rename = "Sigun")]
    pub sigun: String,
    #[serde(rename = "Gu")]
    pub gu: String,
    #[serde(rename = "Dong")]
    pub dong: String,
    #[serde(rename = "Address")]
    pub address: String,
    pub geometry: geojson::Geometry,
    pub center_point: GeoPoint,
    pub source_file: String,
    pub import_timestamp: DateTime<Utc>,
}

impl EsDocument for EsRegionDoc {
    fn id(&self) -> &str {
        &self.adm_code
    }
}

impl EsRegionDoc {
    /// Build the document for a normalized region.
    ///
    /// Returns `None` for degenerate geometry with no centroid.
    pub fn from_region(region: &NormalizedRegion) -> Option<Self> {
        let centroid = region.geometry.centroid()?;

        Some(Self {
            adm_code: region.adm_code.clone(),
            sido: region.sido.clone(),
            sigun: region.sigun.clone(),
            gu: region.gu.clone(),
            dong: region.dong.clone(),
            address: region.address.clone(),
            geometry: geojson::Geometry::new(geojson::Value::from(&region.geometry)),
            center_point: GeoPoint::new(centroid.y(), centroid.x()),
            source_file: region.source_file.clone(),
            import_timestamp: region.import_timestamp,
        })
    }
}
