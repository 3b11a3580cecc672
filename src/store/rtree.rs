//! In-memory R-tree store over normalized regions.
//!
//! Candidate lookup goes through envelope intersection in the R-tree,
//! then exact point-in-polygon filtering. Nearest-neighbor queries use
//! true euclidean distance to the boundary polygon, not the envelope.

use std::sync::Arc;

use geo::{BoundingRect, Contains, Distance, Euclidean, Point};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::info;

use crate::models::{GeoPoint, NormalizedRegion, RegionRecord};
use crate::store::{SpatialStore, StoreError};

/// Wrapper for R-tree indexing of region boundaries
#[derive(Clone)]
struct IndexedRegion {
    region: Arc<NormalizedRegion>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for IndexedRegion {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let p = Point::new(point[0], point[1]);
        let d = Euclidean.distance(&p, &self.region.geometry);
        d * d
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.region
            .geometry
            .contains(&Point::new(point[0], point[1]))
    }
}

impl IndexedRegion {
    fn new(region: NormalizedRegion) -> Option<Self> {
        let rect = region.geometry.bounding_rect()?;
        Some(Self {
            region: Arc::new(region),
            envelope: AABB::from_corners(
                [rect.min().x, rect.min().y],
                [rect.max().x, rect.max().y],
            ),
        })
    }
}

/// In-memory spatial index over normalized regions using an R-tree.
pub struct RegionIndex {
    tree: RTree<IndexedRegion>,
}

impl RegionIndex {
    /// Build the index from a batch of normalized regions.
    ///
    /// Regions with degenerate (empty) geometry are dropped.
    pub fn build(regions: Vec<NormalizedRegion>) -> Self {
        let indexed: Vec<IndexedRegion> = regions
            .into_iter()
            .filter_map(IndexedRegion::new)
            .collect();

        let tree = RTree::bulk_load(indexed);
        info!("Spatial index built with {} regions", tree.size());

        Self { tree }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    fn containing(&self, lon: f64, lat: f64) -> Option<RegionRecord> {
        let point = Point::new(lon, lat);
        let query_envelope = AABB::from_point([lon, lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .find(|ir| ir.region.geometry.contains(&point))
            .map(|ir| ir.region.record())
    }

    fn nearest(&self, lon: f64, lat: f64) -> Option<RegionRecord> {
        self.tree
            .nearest_neighbor(&[lon, lat])
            .map(|ir| ir.region.record())
    }
}

impl SpatialStore for RegionIndex {
    async fn find_containing(&self, point: GeoPoint) -> Result<Option<RegionRecord>, StoreError> {
        Ok(self.containing(point.lon, point.lat))
    }

    async fn find_nearest(&self, point: GeoPoint) -> Result<Option<RegionRecord>, StoreError> {
        Ok(self.nearest(point.lon, point.lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geo::{polygon, MultiPolygon};

    fn square_region(name: &str, min: f64, max: f64) -> NormalizedRegion {
        let ring = polygon![
            (x: min, y: min),
            (x: max, y: min),
            (x: max, y: max),
            (x: min, y: max),
            (x: min, y: min),
        ];
        NormalizedRegion {
            sido: "서울특별시".to_string(),
            sigun: "서울특별시".to_string(),
            gu: name.to_string(),
            dong: format!("{}동", name),
            address: format!("서울특별시 {} {}동", name, name),
            adm_code: "1100000000".to_string(),
            geometry: MultiPolygon(vec![ring]),
            source_file: "test".to_string(),
            import_timestamp: Utc::now(),
        }
    }

    #[test]
    fn containment_finds_the_enclosing_region() {
        let index = RegionIndex::build(vec![
            square_region("a", 0.0, 1.0),
            square_region("b", 2.0, 3.0),
        ]);

        let hit = index.containing(2.5, 2.5).expect("point is inside b");
        assert_eq!(hit.gu, "b");
    }

    #[test]
    fn containment_misses_outside_all_polygons() {
        let index = RegionIndex::build(vec![square_region("a", 0.0, 1.0)]);
        assert!(index.containing(5.0, 5.0).is_none());
    }

    #[test]
    fn nearest_uses_polygon_distance_not_envelope() {
        let index = RegionIndex::build(vec![
            square_region("a", 0.0, 1.0),
            square_region("b", 2.0, 3.0),
        ]);

        // Closer to b's left edge than to a's top-right corner
        let hit = index.nearest(1.8, 2.5).expect("index is non-empty");
        assert_eq!(hit.gu, "b");
    }

    #[test]
    fn empty_index_yields_no_records() {
        let index = RegionIndex::build(vec![]);
        assert!(index.is_empty());
        assert!(index.containing(0.0, 0.0).is_none());
        assert!(index.nearest(0.0, 0.0).is_none());
    }
}
