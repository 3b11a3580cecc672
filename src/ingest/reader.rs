//! HangJeongDong GeoJSON dataset parsing.
//!
//! The dataset is a FeatureCollection with one feature per administrative
//! neighborhood, carrying `sidonm`/`sggnm`/`adm_nm` name properties and
//! Polygon or MultiPolygon boundary geometry in (lon, lat) order.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geo::MultiPolygon;
use geojson::{FeatureCollection, GeoJson};
use tracing::{info, warn};

use ginkgo::models::RawFeature;

/// Read all boundary features from a GeoJSON file.
///
/// Features missing a name property or carrying non-areal geometry are
/// skipped with a warning rather than failing the whole load.
pub fn read_features(path: &Path) -> Result<Vec<RawFeature>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

    let geojson: GeoJson = content
        .parse()
        .context("Failed to parse GeoJSON dataset")?;

    let collection = FeatureCollection::try_from(geojson)
        .context("Dataset is not a GeoJSON FeatureCollection")?;

    let total = collection.features.len();
    let mut features = Vec::with_capacity(total);

    for feature in collection.features {
        match parse_feature(feature) {
            Some(raw) => features.push(raw),
            None => warn!("Skipping malformed boundary feature"),
        }
    }

    info!("Parsed {} of {} boundary features", features.len(), total);

    Ok(features)
}

fn parse_feature(feature: geojson::Feature) -> Option<RawFeature> {
    let props = feature.properties.as_ref()?;

    let sido_name = props.get("sidonm")?.as_str()?.to_string();
    let sgg_name = props.get("sggnm")?.as_str()?.to_string();
    let adm_name = props.get("adm_nm")?.as_str()?.to_string();

    // adm_cd2 is the current ten-digit code; older dataset versions only
    // carry adm_cd
    let adm_code = props
        .get("adm_cd2")
        .or_else(|| props.get("adm_cd"))?
        .as_str()?
        .to_string();

    let geometry = feature.geometry?;
    let geometry = match geo_types::Geometry::<f64>::try_from(geometry).ok()? {
        geo_types::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        geo_types::Geometry::MultiPolygon(mp) => mp,
        _ => return None,
    };

    Some(RawFeature {
        sido_name,
        sgg_name,
        adm_name,
        adm_code,
        geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {
                "adm_nm": "서울특별시 중구 광희동",
                "adm_cd2": "1102059000",
                "sgg": "11020",
                "sido": "11",
                "sidonm": "서울특별시",
                "sggnm": "중구"
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [126.99, 37.55], [127.01, 37.55],
                    [127.01, 37.57], [126.99, 37.57],
                    [126.99, 37.55]
                ]]
            }
        }]
    }"#;

    #[test]
    fn parses_polygon_feature() {
        let geojson: GeoJson = SAMPLE.parse().unwrap();
        let collection = FeatureCollection::try_from(geojson).unwrap();
        let raw = parse_feature(collection.features.into_iter().next().unwrap())
            .expect("sample feature is well-formed");

        assert_eq!(raw.sido_name, "서울특별시");
        assert_eq!(raw.sgg_name, "중구");
        assert_eq!(raw.adm_name, "서울특별시 중구 광희동");
        assert_eq!(raw.adm_code, "1102059000");
        assert_eq!(raw.geometry.0.len(), 1);
    }

    #[test]
    fn rejects_feature_without_names() {
        let geojson: GeoJson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [127.0, 37.5] }
            }]
        }"#
        .parse()
        .unwrap();
        let collection = FeatureCollection::try_from(geojson).unwrap();

        assert!(parse_feature(collection.features.into_iter().next().unwrap()).is_none());
    }
}
