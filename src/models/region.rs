//! Administrative region records and their raw dataset counterpart.

use chrono::{DateTime, Utc};
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One administrative-boundary feature as it appears in the raw
/// HangJeongDong dataset, before name normalization.
#[derive(Debug, Clone)]
pub struct RawFeature {
    /// Top-level province / metropolitan-city name (`sidonm`)
    pub sido_name: String,

    /// City/county/district name (`sggnm`). Historically inconsistent:
    /// may embed a city name followed by a district name with no separator.
    pub sgg_name: String,

    /// Full administrative name (`adm_nm`); the last whitespace token is
    /// the neighborhood name.
    pub adm_name: String,

    /// Administrative district code (`adm_cd2`), used as the stable
    /// document id when loading into a store.
    pub adm_code: String,

    /// Boundary geometry in (lon, lat) order
    pub geometry: MultiPolygon<f64>,
}

/// Normalized administrative region: the unit of truth used everywhere
/// downstream. Produced once at load time, immutable thereafter.
#[derive(Debug, Clone)]
pub struct NormalizedRegion {
    /// Province / metropolitan-city name
    pub sido: String,

    /// City/county name. For metropolitan cities this equals `sido`.
    pub sigun: String,

    /// District name, empty when the city has no district subdivision
    pub gu: String,

    /// Neighborhood name
    pub dong: String,

    /// Composed human-readable address, derived from the four name fields
    pub address: String,

    /// Stable district code carried from the raw feature
    pub adm_code: String,

    /// Boundary geometry, unchanged from the raw feature
    pub geometry: MultiPolygon<f64>,

    /// Source file name for refresh tracking
    pub source_file: String,

    /// Import timestamp for refresh tracking
    pub import_timestamp: DateTime<Utc>,
}

impl NormalizedRegion {
    /// Project down to the query-time record shape (drops geometry).
    pub fn record(&self) -> RegionRecord {
        RegionRecord {
            sido: self.sido.clone(),
            sigun: self.sigun.clone(),
            gu: self.gu.clone(),
            dong: self.dong.clone(),
            address: self.address.clone(),
        }
    }
}

/// Projection of a region returned by resolution queries.
///
/// Geometry is not re-returned; callers only need the name hierarchy and
/// the composed address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
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
}
