//! Spatial store abstraction.
//!
//! The resolver is written against this trait rather than a concrete
//! datastore, so resolution logic can be exercised with test doubles and
//! the backing store can be swapped (in-memory R-tree, Elasticsearch).

mod rtree;

pub use rtree::RegionIndex;

use crate::models::{GeoPoint, RegionRecord};

/// Errors from the underlying spatial store.
///
/// These are disjoint from the "no record" outcome: an out-of-coverage
/// point yields `Ok(None)` from the queries, never an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached at all
    #[error("spatial store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the query
    #[error("spatial query failed: {0}")]
    Query(String),

    /// The store answered with a response we could not interpret
    #[error("malformed store response: {0}")]
    MalformedResponse(String),
}

/// Read-only spatial queries over normalized region records.
///
/// Both operations treat the point as a (longitude, latitude) pair,
/// consistent with the geometry encoding used at load time. Implementations
/// must be safe for concurrent reads; neither operation writes.
pub trait SpatialStore {
    /// Find one record whose boundary polygon contains the point.
    ///
    /// When several polygons contain the point (shared boundary edges),
    /// the store's native result ordering decides which one is returned.
    fn find_containing(
        &self,
        point: GeoPoint,
    ) -> impl std::future::Future<Output = Result<Option<RegionRecord>, StoreError>> + Send;

    /// Find the single record nearest to the point by the store's native
    /// distance function.
    fn find_nearest(
        &self,
        point: GeoPoint,
    ) -> impl std::future::Future<Output = Result<Option<RegionRecord>, StoreError>> + Send;
}
