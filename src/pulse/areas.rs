//! Known neighborhoods with map coordinates
//!
//! Seed list of well-known areas exposed to clients for map pins and search
//! shortcuts. Searches are not validated against this list; any free-text
//! area is accepted.

use serde::Serialize;

use crate::pulse::types::title_case;

/// A known neighborhood with its map coordinates
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownArea {
    /// Lower-cased area name as used in queries
    pub area: &'static str,
    /// Title-cased name for display
    pub display: String,
    pub lat: f64,
    pub lon: f64,
}

const KNOWN_AREAS: &[(&str, f64, f64)] = &[
    ("koramangala", 12.9357, 77.6245),
    ("indiranagar", 12.9784, 77.6408),
    ("jayanagar", 12.9309, 77.5838),
    ("hsr layout", 12.9121, 77.6446),
    ("whitefield", 12.9698, 77.7499),
];

/// List the known neighborhoods
pub fn known_areas() -> Vec<KnownArea> {
    KNOWN_AREAS
        .iter()
        .map(|(area, lat, lon)| KnownArea {
            area,
            display: title_case(area),
            lat: *lat,
            lon: *lon,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_areas_are_normalized() {
        for area in known_areas() {
            assert_eq!(area.area, area.area.to_lowercase());
            assert!(!area.display.is_empty());
        }
    }
}
