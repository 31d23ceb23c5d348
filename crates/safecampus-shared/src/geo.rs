//! GeoJSON points for location alerts.
//!
//! GeoJSON orders coordinates as `[longitude, latitude]`. Everything in this
//! module that takes the pair as separate arguments names them explicitly so
//! the order cannot be swapped silently.

use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_RADIUS_M, MAP_LINK_ZOOM};

/// A single device reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GeoType {
    #[default]
    Point,
}

/// `{"type": "Point", "coordinates": [lon, lat]}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub geo_type: GeoType,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            geo_type: GeoType::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// Google Maps link centred on this point.
    pub fn map_link(&self) -> String {
        format!(
            "https://www.google.com/maps/@{},{},{}z",
            self.latitude(),
            self.longitude(),
            MAP_LINK_ZOOM
        )
    }

    /// Great-circle distance in metres (haversine).
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.latitude().to_radians(), other.latitude().to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude() - self.longitude()).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

impl From<Coordinates> for GeoPoint {
    fn from(c: Coordinates) -> Self {
        GeoPoint::new(c.latitude, c.longitude)
    }
}
