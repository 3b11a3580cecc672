//! Ginkgo - reverse geocoding for Korean administrative districts
//!
//! This library provides shared types and modules for the ingest and query binaries.

pub mod elasticsearch;
pub mod models;
pub mod normalize;
pub mod resolve;
pub mod store;

pub use models::{GeoPoint, NormalizedRegion, RawFeature, RegionRecord};
pub use store::{SpatialStore, StoreError};
