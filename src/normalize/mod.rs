//! Administrative-name normalization.
//!
//! Korean administrative naming in the HangJeongDong dataset is
//! historically irregular: the city/county field (`sggnm`) may embed a
//! city name and a district name with no separator ("수원시장안구"),
//! metropolitan cities carry no separate city name at all, and merged
//! neighborhoods are joined with a middle dot. The functions here encode
//! those specific naming conventions as explicit branches; they are not
//! generic heuristics.

use chrono::Utc;

use crate::models::{NormalizedRegion, RawFeature};

/// City suffix character ("si")
const CITY_SUFFIX: char = '시';

/// District suffix character ("gu")
const DISTRICT_SUFFIX: char = '구';

/// Siheung-si contains the city suffix mid-name ("시흥시"), which the
/// generic split rules would misparse as a compound city+district name.
/// It has no district subdivision and must be passed through verbatim.
const SIHEUNG: &str = "시흥시";

/// Normalize one raw boundary feature into a [`NormalizedRegion`].
///
/// Pure and total: no I/O, no failure path for well-formed dataset input.
/// Safe to call in parallel across features.
pub fn normalize(raw: &RawFeature, source_file: &str) -> NormalizedRegion {
    let sido = raw.sido_name.clone();
    let sigun = derive_sigun(&raw.sido_name, &raw.sgg_name);
    let gu = derive_gu(&raw.sgg_name);
    let dong = derive_dong(&raw.adm_name);
    let address = compose_address(&sido, &sigun, &gu, &dong);

    NormalizedRegion {
        sido,
        sigun,
        gu,
        dong,
        address,
        adm_code: raw.adm_code.clone(),
        geometry: raw.geometry.clone(),
        source_file: source_file.to_string(),
        import_timestamp: Utc::now(),
    }
}

/// Derive the city/county (`Sigun`) name.
fn derive_sigun(sido_name: &str, sgg_name: &str) -> String {
    // Literal exception, checked before any suffix splitting
    if sgg_name == SIHEUNG {
        return sgg_name.to_string();
    }

    if sido_name.ends_with(CITY_SUFFIX) {
        // Metropolitan / special cities ("서울특별시", "세종특별자치시"):
        // the province name doubles as the city name
        sido_name.to_string()
    } else if let Some(idx) = sgg_name.find(CITY_SUFFIX) {
        // Compound city+district name ("수원시장안구"): keep the city part
        // up to and including the first suffix occurrence
        sgg_name[..idx + CITY_SUFFIX.len_utf8()].to_string()
    } else {
        // Plain county ("양평군") or district-only name
        sgg_name.to_string()
    }
}

/// Derive the district (`Gu`) name, empty when the city has no district
/// subdivision.
fn derive_gu(sgg_name: &str) -> String {
    if sgg_name == SIHEUNG {
        return String::new();
    }

    if let Some(idx) = sgg_name.find(CITY_SUFFIX) {
        // Remainder after the embedded city name ("수원시장안구" -> "장안구")
        sgg_name[idx + CITY_SUFFIX.len_utf8()..].to_string()
    } else if sgg_name.ends_with(DISTRICT_SUFFIX) {
        // Metropolitan-city district ("중구", "강남구")
        sgg_name.to_string()
    } else {
        String::new()
    }
}

/// Derive the neighborhood (`Dong`) name from the full administrative name.
///
/// The middle-dot separator used for merged neighborhoods is normalized to
/// a comma before tokenizing. Only the last token is extracted here, but
/// the separator rewrite is kept so consumers of the full normalized name
/// string see a uniform separator.
fn derive_dong(adm_name: &str) -> String {
    let normalized = adm_name.replace('·', ",");
    normalized
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_string()
}

/// Compose the human-readable address from the four name fields.
///
/// When the province is itself a city (`sido == sigun`), repeating it
/// would be redundant, so the province component is dropped.
pub fn compose_address(sido: &str, sigun: &str, gu: &str, dong: &str) -> String {
    match (sido != sigun, !gu.is_empty()) {
        (true, true) => format!("{} {} {} {}", sido, sigun, gu, dong),
        (false, true) => format!("{} {} {}", sigun, gu, dong),
        (true, false) => format!("{} {} {}", sido, sigun, dong),
        (false, false) => format!("{} {}", sigun, dong),
    }
}
