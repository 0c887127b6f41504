use serde::{Deserialize, Serialize};

use crate::models::{BoundingBox, ConfidenceLevel, ScoredPlace};

/// Seoul City Hall, used when there is nothing to centre on
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    latitude: 37.5665,
    longitude: 126.9780,
};

pub const DEFAULT_ZOOM: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One pin on the result map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapMarker {
    pub rank: usize,
    pub name: String,
    pub position: Coordinates,
    pub color: String,
    pub icon: String,
    pub address: String,
    pub phone: Option<String>,
    pub confidence: f64,
    #[serde(rename = "statusLabel")]
    pub status_label: String,
}

/// Everything a front-end needs to draw the result map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub bounds: Option<BoundingBox>,
    pub markers: Vec<MapMarker>,
}

/// Marker colour and icon for a confidence level
pub fn marker_style(level: ConfidenceLevel) -> (&'static str, &'static str) {
    match level {
        ConfidenceLevel::High => ("green", "star"),
        ConfidenceLevel::Moderate => ("orange", "info-sign"),
        ConfidenceLevel::Insufficient | ConfidenceLevel::NoInformation => ("red", "question-sign"),
    }
}

#[inline]
fn has_valid_position(place: &ScoredPlace) -> bool {
    let (lat, lon) = (place.place.latitude, place.place.longitude);
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Build the map for a ranked result list
///
/// Places without a usable position are left off the map; the table views
/// still list them.
pub fn build_map(places: &[ScoredPlace]) -> MapView {
    let markers: Vec<MapMarker> = places
        .iter()
        .enumerate()
        .filter(|(_, place)| has_valid_position(place))
        .map(|(idx, scored)| {
            let (color, icon) = marker_style(scored.level);
            MapMarker {
                rank: idx + 1,
                name: scored.place.name.clone(),
                position: Coordinates {
                    latitude: scored.place.latitude,
                    longitude: scored.place.longitude,
                },
                color: color.to_string(),
                icon: icon.to_string(),
                address: scored.place.address.clone(),
                phone: scored.place.phone.clone(),
                confidence: scored.confidence,
                status_label: scored.status_label.clone(),
            }
        })
        .collect();

    let center = markers.first().map(|m| m.position).unwrap_or(DEFAULT_CENTER);

    MapView {
        center,
        zoom: DEFAULT_ZOOM,
        bounds: calculate_bounds(&markers),
        markers,
    }
}

/// Smallest box containing every marker
pub fn calculate_bounds(markers: &[MapMarker]) -> Option<BoundingBox> {
    let first = markers.first()?.position;

    let bbox = markers.iter().skip(1).fold(
        BoundingBox {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        },
        |bbox, marker| BoundingBox {
            min_lat: bbox.min_lat.min(marker.position.latitude),
            max_lat: bbox.max_lat.max(marker.position.latitude),
            min_lon: bbox.min_lon.min(marker.position.longitude),
            max_lon: bbox.max_lon.max(marker.position.longitude),
        },
    );

    Some(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Place;

    fn scored(name: &str, lat: f64, lon: f64, confidence: f64) -> ScoredPlace {
        let level = ConfidenceLevel::from_confidence(confidence);
        ScoredPlace {
            place: Place {
                name: name.to_string(),
                address: "Seoul".to_string(),
                road_address: None,
                phone: Some("02-000-0000".to_string()),
                latitude: lat,
                longitude: lon,
                category: None,
                distance: None,
                url: None,
            },
            confidence,
            level,
            status_label: level.label("rice cake"),
            mention_count: 2,
        }
    }

    #[test]
    fn test_empty_map_uses_default_center() {
        let map = build_map(&[]);
        assert_eq!(map.center, DEFAULT_CENTER);
        assert!(map.bounds.is_none());
        assert!(map.markers.is_empty());
    }

    #[test]
    fn test_center_on_top_result() {
        let places = vec![scored("a", 37.50, 127.03, 0.9), scored("b", 37.55, 126.92, 0.3)];
        let map = build_map(&places);

        assert_eq!(map.center.latitude, 37.50);
        assert_eq!(map.markers[0].color, "green");
        assert_eq!(map.markers[1].icon, "question-sign");
    }

    #[test]
    fn test_invalid_positions_skipped() {
        let places = vec![
            scored("bad", f64::NAN, 127.0, 0.9),
            scored("good", 37.5, 127.0, 0.5),
        ];
        let map = build_map(&places);

        assert_eq!(map.markers.len(), 1);
        assert_eq!(map.markers[0].name, "good");
        assert_eq!(map.markers[0].rank, 2);
        assert_eq!(map.center.latitude, 37.5);
    }

    #[test]
    fn test_bounds_contain_all_markers() {
        let places = vec![
            scored("a", 37.50, 127.03, 0.9),
            scored("b", 37.55, 126.92, 0.5),
            scored("c", 37.48, 127.10, 0.1),
        ];
        let map = build_map(&places);
        let bbox = map.bounds.unwrap();

        assert_eq!(bbox.min_lat, 37.48);
        assert_eq!(bbox.max_lat, 37.55);
        assert_eq!(bbox.min_lon, 126.92);
        assert_eq!(bbox.max_lon, 127.10);
    }
}
