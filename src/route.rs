//! Route lookup: the external routing collaborator behind a trait.
//!
//! The engine never talks to a live routing service itself. A
//! [`RouteProvider`] supplies geometry; the in-repo [`CityAtlas`] is an
//! offline provider built from a fixed city table, great-circle legs with
//! a road circuity factor, and a constant average speed. A live provider
//! plugs in behind the same trait without touching the engine.

use std::fs;
use std::path::Path;

use crate::model::{RouteGeometry, RouteInstruction, Waypoint};

/// Failure to obtain route geometry.
///
/// Retryable by the caller; the engine never returns a partial trip
/// result on top of one of these.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("route provider unavailable: {0}")]
    Unavailable(String),

    #[error("malformed route geometry: {0}")]
    Malformed(String),
}

/// Source of route geometry for a trip.
pub trait RouteProvider {
    /// Compute the route current → pickup → dropoff.
    fn route(
        &self,
        current: &str,
        pickup: &str,
        dropoff: &str,
    ) -> Result<RouteGeometry, RouteError>;
}

/// Offline route estimator over a fixed table of city coordinates.
pub struct CityAtlas {
    average_speed_mph: f64,
    road_factor: f64,
}

/// Cities the atlas knows by name. Anything else falls back to
/// [`FALLBACK`] after fuzzy matching.
const CITIES: &[(&str, f64, f64)] = &[
    ("Atlanta, GA", 33.7490, -84.3880),
    ("Charlotte, NC", 35.2271, -80.8431),
    ("Jacksonville, FL", 30.3322, -81.6557),
    ("Chicago, IL", 41.8781, -87.6298),
    ("Denver, CO", 39.7392, -104.9903),
    ("Los Angeles, CA", 34.0522, -118.2437),
    ("New York, NY", 40.7128, -74.0060),
    ("Seattle, WA", 47.6062, -122.3321),
    ("Miami, FL", 25.7617, -80.1918),
    ("Dallas, TX", 32.7767, -96.7970),
    ("Phoenix, AZ", 33.4484, -112.0740),
    ("Houston, TX", 29.7604, -95.3698),
    ("San Antonio, TX", 29.4241, -98.4936),
    ("Tampa, FL", 27.9506, -82.4572),
    ("Orlando, FL", 28.5383, -81.3792),
];

/// Geographic center of the contiguous US, used for unknown locations.
const FALLBACK: Waypoint = Waypoint {
    lat: 39.8283,
    lng: -98.5795,
};

const EARTH_RADIUS_MILES: f64 = 3958.8;

impl CityAtlas {
    pub fn new(average_speed_mph: f64, road_factor: f64) -> Self {
        Self {
            average_speed_mph,
            road_factor,
        }
    }

    fn leg_miles(&self, from: Waypoint, to: Waypoint) -> f64 {
        great_circle_miles(from, to) * self.road_factor
    }
}

impl RouteProvider for CityAtlas {
    fn route(
        &self,
        current: &str,
        pickup: &str,
        dropoff: &str,
    ) -> Result<RouteGeometry, RouteError> {
        let points = [locate(current), locate(pickup), locate(dropoff)];
        let total_distance_miles =
            self.leg_miles(points[0], points[1]) + self.leg_miles(points[1], points[2]);
        let estimated_driving_time = if self.average_speed_mph > 0.0 {
            total_distance_miles / self.average_speed_mph
        } else {
            return Err(RouteError::Malformed(
                "average speed must be positive".to_string(),
            ));
        };

        Ok(RouteGeometry {
            waypoints: points.to_vec(),
            instructions: vec![
                RouteInstruction {
                    text: format!("Start from {current}"),
                },
                RouteInstruction {
                    text: format!("Drive to {pickup}"),
                },
                RouteInstruction {
                    text: format!("Drive to {dropoff}"),
                },
            ],
            total_distance_miles,
            estimated_driving_time,
        })
    }
}

/// Resolve a location name to coordinates.
///
/// Exact match first, then case-insensitive substring either way,
/// then the continental-center fallback.
fn locate(name: &str) -> Waypoint {
    for (city, lat, lng) in CITIES {
        if *city == name {
            return Waypoint {
                lat: *lat,
                lng: *lng,
            };
        }
    }
    let needle = name.to_lowercase();
    for (city, lat, lng) in CITIES {
        let hay = city.to_lowercase();
        if hay.contains(&needle) || needle.contains(&hay) {
            return Waypoint {
                lat: *lat,
                lng: *lng,
            };
        }
    }
    FALLBACK
}

/// Great-circle distance in miles between two points (haversine).
fn great_circle_miles(a: Waypoint, b: Waypoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Load route geometry from a JSON file, as produced by an out-of-band
/// routing run.
pub fn load_route_file(path: &Path) -> Result<RouteGeometry, RouteError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| RouteError::Unavailable(format!("{}: {e}", path.display())))?;
    let geometry: RouteGeometry = serde_json::from_str(&contents)
        .map_err(|e| RouteError::Malformed(format!("{}: {e}", path.display())))?;
    if !geometry.total_distance_miles.is_finite() || geometry.total_distance_miles < 0.0 {
        return Err(RouteError::Malformed(
            "total_distance_miles must be a non-negative number".to_string(),
        ));
    }
    if !geometry.estimated_driving_time.is_finite() || geometry.estimated_driving_time < 0.0 {
        return Err(RouteError::Malformed(
            "estimated_driving_time must be a non-negative number".to_string(),
        ));
    }
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> CityAtlas {
        CityAtlas::new(50.0, 1.2)
    }

    #[test]
    fn known_cities_resolve_exactly() {
        let wp = locate("Atlanta, GA");
        assert!((wp.lat - 33.7490).abs() < 1e-6);
    }

    #[test]
    fn fuzzy_match_on_partial_name() {
        let wp = locate("atlanta");
        assert!((wp.lat - 33.7490).abs() < 1e-6);
        let wp = locate("Downtown Miami, FL, USA");
        assert!((wp.lat - 25.7617).abs() < 1e-6);
    }

    #[test]
    fn unknown_location_falls_back_to_center() {
        let wp = locate("Nowhereville, ZZ");
        assert!((wp.lat - FALLBACK.lat).abs() < 1e-6);
    }

    #[test]
    fn atlanta_charlotte_jacksonville_distance_is_plausible() {
        let geometry = atlas()
            .route("Atlanta, GA", "Charlotte, NC", "Jacksonville, FL")
            .unwrap();
        // Straight-line legs are ~245 and ~340 miles; the road factor
        // puts the total roughly in the 600-800 range.
        assert!(geometry.total_distance_miles > 500.0);
        assert!(geometry.total_distance_miles < 900.0);
        let expected_hours = geometry.total_distance_miles / 50.0;
        assert!((geometry.estimated_driving_time - expected_hours).abs() < 1e-9);
    }

    #[test]
    fn instructions_follow_the_stops() {
        let geometry = atlas()
            .route("Dallas, TX", "Houston, TX", "San Antonio, TX")
            .unwrap();
        assert_eq!(geometry.instructions[0].text, "Start from Dallas, TX");
        assert_eq!(geometry.instructions[1].text, "Drive to Houston, TX");
        assert_eq!(geometry.instructions[2].text, "Drive to San Antonio, TX");
        assert_eq!(geometry.waypoints.len(), 3);
    }

    #[test]
    fn same_city_trip_has_zero_distance() {
        let geometry = atlas()
            .route("Tampa, FL", "Tampa, FL", "Tampa, FL")
            .unwrap();
        assert!(geometry.total_distance_miles.abs() < 1e-9);
        assert!(geometry.estimated_driving_time.abs() < 1e-9);
    }

    #[test]
    fn route_file_errors_are_retryable() {
        let err = load_route_file(Path::new("/nonexistent/route.json")).unwrap_err();
        assert!(matches!(err, RouteError::Unavailable(_)));
    }

    #[test]
    fn route_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("route.json");
        let geometry = atlas()
            .route("Chicago, IL", "Denver, CO", "Los Angeles, CA")
            .unwrap();
        std::fs::write(&path, serde_json::to_string(&geometry).unwrap()).unwrap();

        let loaded = load_route_file(&path).unwrap();
        assert_eq!(loaded, geometry);
    }

    #[test]
    fn route_file_rejects_negative_distance() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("route.json");
        std::fs::write(
            &path,
            r#"{"waypoints":[],"instructions":[],"total_distance_miles":-5.0,"estimated_driving_time":1.0}"#,
        )
        .unwrap();
        let err = load_route_file(&path).unwrap_err();
        assert!(matches!(err, RouteError::Malformed(_)));
    }
}
