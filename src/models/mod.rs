//! Core data models for the reverse geocoder.

pub mod region;

pub use region::{GeoPoint, NormalizedRegion, RawFeature, RegionRecord};
