//! Elasticsearch-backed spatial store.
//!
//! Containment is a `geo_shape` intersects filter over the boundary
//! geometry; the nearest fallback sorts all regions by `_geo_distance`
//! from the region centroid and takes the first. Both return only the
//! name-field projection of the matched region.

use serde_json::json;
use tracing::debug;

use super::EsClient;
use crate::models::{GeoPoint, RegionRecord};
use crate::store::{SpatialStore, StoreError};

/// Fields projected out of matched region documents
const RECORD_SOURCE: [&str; 5] = ["Sido", "Sigun", "Gu", "Dong", "Address"];

/// `SpatialStore` implementation over an Elasticsearch regions index
#[derive(Clone)]
pub struct EsStore {
    client: EsClient,
}

impl EsStore {
    pub fn new(client: EsClient) -> Self {
        Self { client }
    }

    /// Run a single-hit search and parse the projected region record.
    async fn search_one(
        &self,
        body: serde_json::Value,
    ) -> Result<Option<RegionRecord>, StoreError> {
        let response = self
            .client
            .client()
            .search(elasticsearch::SearchParts::Index(&[
                &self.client.index_name
            ]))
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !response.status_code().is_success() {
            let status = response.status_code();
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::Query(format!("HTTP {}: {}", status, detail)));
        }

        let response_body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        let hit = match response_body["hits"]["hits"]
            .as_array()
            .and_then(|hits| hits.first())
        {
            Some(hit) => hit,
            None => return Ok(None),
        };

        serde_json::from_value(hit["_source"].clone())
            .map(Some)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }
}

impl SpatialStore for EsStore {
    async fn find_containing(&self, point: GeoPoint) -> Result<Option<RegionRecord>, StoreError> {
        debug!(lat = point.lat, lon = point.lon, "geo_shape containment query");

        let body = json!({
            "query": {
                "bool": {
                    "filter": [{
                        "geo_shape": {
                            "geometry": {
                                "shape": {
                                    "type": "point",
                                    "coordinates": [point.lon, point.lat]
                                },
                                "relation": "intersects"
                            }
                        }
                    }]
                }
            },
            "size": 1,
            "_source": RECORD_SOURCE
        });

        self.search_one(body).await
    }

    async fn find_nearest(&self, point: GeoPoint) -> Result<Option<RegionRecord>, StoreError> {
        debug!(lat = point.lat, lon = point.lon, "geo_distance nearest query");

        let body = json!({
            "query": { "match_all": {} },
            "sort": [{
                "_geo_distance": {
                    "center_point": { "lat": point.lat, "lon": point.lon },
                    "order": "asc",
                    "unit": "m"
                }
            }],
            "size": 1,
            "_source": RECORD_SOURCE
        });

        self.search_one(body).await
    }
}
