//! Point-to-region resolution.
//!
//! Two-stage policy: ask the store for a polygon containing the point
//! first; only when that legitimately yields nothing, fall back to the
//! nearest record by the store's distance function. Points slightly
//! offshore or on boundary artifacts land in the fallback; points far
//! outside coverage (or an empty store) resolve to `Ok(None)`.

use tracing::debug;

use crate::models::{GeoPoint, RegionRecord};
use crate::store::{SpatialStore, StoreError};

/// Resolve a coordinate to its administrative region.
///
/// Returns `Ok(None)` when the store holds no record for the point at
/// all — a normal outcome for out-of-coverage points, distinct from a
/// store failure. Store errors propagate unmodified, with no retry; a
/// containment-query failure never triggers the nearest fallback.
pub async fn resolve<S: SpatialStore>(
    store: &S,
    point: GeoPoint,
) -> Result<Option<RegionRecord>, StoreError> {
    if let Some(record) = store.find_containing(point).await? {
        debug!(lat = point.lat, lon = point.lon, "containment hit");
        return Ok(Some(record));
    }

    debug!(
        lat = point.lat,
        lon = point.lon,
        "no containing polygon, falling back to nearest"
    );
    store.find_nearest(point).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(dong: &str) -> RegionRecord {
        RegionRecord {
            sido: "서울특별시".to_string(),
            sigun: "서울특별시".to_string(),
            gu: "중구".to_string(),
            dong: dong.to_string(),
            address: format!("서울특별시 중구 {}", dong),
        }
    }

    /// Store double with scripted answers and call counters.
    struct StubStore {
        containing: Result<Option<RegionRecord>, ()>,
        nearest: Result<Option<RegionRecord>, ()>,
        nearest_calls: AtomicUsize,
    }

    impl StubStore {
        fn new(
            containing: Result<Option<RegionRecord>, ()>,
            nearest: Result<Option<RegionRecord>, ()>,
        ) -> Self {
            Self {
                containing,
                nearest,
                nearest_calls: AtomicUsize::new(0),
            }
        }
    }

    impl SpatialStore for StubStore {
        async fn find_containing(
            &self,
            _point: GeoPoint,
        ) -> Result<Option<RegionRecord>, StoreError> {
            self.containing
                .clone()
                .map_err(|_| StoreError::Query("scripted containment failure".to_string()))
        }

        async fn find_nearest(
            &self,
            _point: GeoPoint,
        ) -> Result<Option<RegionRecord>, StoreError> {
            self.nearest_calls.fetch_add(1, Ordering::SeqCst);
            self.nearest
                .clone()
                .map_err(|_| StoreError::Query("scripted nearest failure".to_string()))
        }
    }

    #[tokio::test]
    async fn containment_hit_never_falls_back() {
        let store = StubStore::new(Ok(Some(record("광희동"))), Ok(Some(record("을지로동"))));

        let result = resolve(&store, GeoPoint::new(37.5642135, 127.0016985))
            .await
            .unwrap();

        assert_eq!(result.unwrap().dong, "광희동");
        assert_eq!(store.nearest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn containment_miss_falls_back_to_nearest() {
        let store = StubStore::new(Ok(None), Ok(Some(record("을지로동"))));

        let result = resolve(&store, GeoPoint::new(37.0, 126.0)).await.unwrap();

        assert_eq!(result.unwrap().dong, "을지로동");
        assert_eq!(store.nearest_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_store_resolves_to_none_not_error() {
        let store = StubStore::new(Ok(None), Ok(None));

        let result = resolve(&store, GeoPoint::new(0.0, 0.0)).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn containment_failure_propagates_without_fallback() {
        let store = StubStore::new(Err(()), Ok(Some(record("을지로동"))));

        let err = resolve(&store, GeoPoint::new(37.0, 126.0)).await.unwrap_err();

        assert!(matches!(err, StoreError::Query(_)));
        assert_eq!(store.nearest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn nearest_failure_propagates() {
        let store = StubStore::new(Ok(None), Err(()));

        let err = resolve(&store, GeoPoint::new(37.0, 126.0)).await.unwrap_err();

        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn resolves_seoul_point_end_to_end() {
        use crate::models::RawFeature;
        use crate::normalize::normalize;
        use crate::store::RegionIndex;
        use geo::{polygon, MultiPolygon};

        // Bounding square around Gwanghui-dong, Jung-gu, Seoul
        let ring = polygon![
            (x: 126.99, y: 37.55),
            (x: 127.01, y: 37.55),
            (x: 127.01, y: 37.57),
            (x: 126.99, y: 37.57),
            (x: 126.99, y: 37.55),
        ];
        let raw = RawFeature {
            sido_name: "서울특별시".to_string(),
            sgg_name: "중구".to_string(),
            adm_name: "서울특별시 중구 광희동".to_string(),
            adm_code: "1102059".to_string(),
            geometry: MultiPolygon(vec![ring]),
        };

        let index = RegionIndex::build(vec![normalize(&raw, "test")]);

        let result = resolve(&index, GeoPoint::new(37.5642135, 127.0016985))
            .await
            .unwrap()
            .expect("point lies inside the boundary");

        assert_eq!(result.sido, "서울특별시");
        assert_eq!(result.sigun, "서울특별시");
        assert_eq!(result.gu, "중구");
        assert_eq!(result.dong, "광희동");
        assert_eq!(result.address, "서울특별시 중구 광희동");
    }
}
