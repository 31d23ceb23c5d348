//! Location alerts: one immutable row per emergency-button press.
//!
//! Points are stored as separate `latitude` / `longitude` REAL columns under
//! a composite index and handed out as GeoJSON `[lon, lat]` points. REAL
//! columns hold IEEE-754 doubles, so coordinates round-trip exactly.

use chrono::Utc;
use rusqlite::params;
use safecampus_shared::geo::GeoPoint;
use safecampus_shared::validation::{require, validate_coordinates};
use uuid::Uuid;

use crate::database::Database;
use crate::error::Result;
use crate::models::{LocationAlert, NearbyAlert};
use crate::rows::{collect, ts_col, ts_to_sql, uuid_col};

const SELECT: &str = "SELECT id, name, phone, longitude, latitude, created_at FROM location_alerts";

impl Database {
    /// Store one alert. There is no de-duplication: two presses make two rows.
    pub fn record_location(
        &self,
        name: &str,
        phone: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationAlert> {
        require("Name", name)?;
        require("Contact number", phone)?;
        validate_coordinates(latitude, longitude)?;

        let alert = LocationAlert {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
            location: GeoPoint::new(latitude, longitude),
            created_at: Utc::now(),
        };

        self.conn().execute(
            "INSERT INTO location_alerts (id, name, phone, longitude, latitude, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                alert.id.to_string(),
                alert.name,
                alert.phone,
                alert.location.longitude(),
                alert.location.latitude(),
                ts_to_sql(&alert.created_at),
            ],
        )?;

        tracing::info!(
            id = %alert.id,
            lat = latitude,
            lon = longitude,
            "location alert recorded"
        );
        Ok(alert)
    }

    /// Every alert, newest first.
    pub fn list_locations(&self) -> Result<Vec<LocationAlert>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{SELECT} ORDER BY created_at DESC, rowid DESC"))?;
        let rows = stmt.query_map([], row_to_alert)?;
        collect(rows)
    }

    /// Alerts ordered by great-circle distance from the given point, closest
    /// first, at most `limit` of them.
    pub fn nearest_locations(
        &self,
        latitude: f64,
        longitude: f64,
        limit: usize,
    ) -> Result<Vec<NearbyAlert>> {
        validate_coordinates(latitude, longitude)?;
        let origin = GeoPoint::new(latitude, longitude);

        let mut nearby: Vec<NearbyAlert> = self
            .list_locations()?
            .into_iter()
            .map(|alert| NearbyAlert {
                distance_m: origin.distance_m(&alert.location),
                alert,
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        nearby.truncate(limit);
        Ok(nearby)
    }
}

fn row_to_alert(row: &rusqlite::Row<'_>) -> rusqlite::Result<LocationAlert> {
    let longitude: f64 = row.get(3)?;
    let latitude: f64 = row.get(4)?;
    Ok(LocationAlert {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        location: GeoPoint::new(latitude, longitude),
        created_at: ts_col(row, 5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_records_round_trip_coordinates() {
        let db = Database::open_in_memory().unwrap();
        let points = [
            (12.971598_7, 77.594562_3),
            (-33.868820, 151.209296),
            (51.507351, -0.127758),
            (0.1 + 0.2, -179.999_999_999),
        ];

        for (lat, lon) in points {
            db.record_location("Alice", "9999999999", lat, lon).unwrap();
        }

        let alerts = db.list_locations().unwrap();
        assert_eq!(alerts.len(), points.len());
        for (lat, lon) in points {
            assert!(
                alerts.iter().any(|a| a.location.latitude() == lat
                    && a.location.longitude() == lon),
                "({lat}, {lon}) did not round-trip"
            );
        }
    }

    #[test]
    fn test_repeated_press_creates_two_records() {
        let db = Database::open_in_memory().unwrap();
        let a = db.record_location("Alice", "9999999999", 10.0, 20.0).unwrap();
        let b = db.record_location("Alice", "9999999999", 10.0, 20.0).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(db.list_locations().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.record_location("", "9999999999", 10.0, 20.0),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            db.record_location("Alice", "9999999999", 95.0, 20.0),
            Err(StoreError::Validation(_))
        ));
        assert!(db.list_locations().unwrap().is_empty());
    }

    #[test]
    fn test_nearest_orders_by_distance() {
        let db = Database::open_in_memory().unwrap();
        db.record_location("Far", "1111111111", 48.8566, 2.3522).unwrap(); // Paris
        db.record_location("Near", "2222222222", 51.5080, -0.1281).unwrap(); // London
        db.record_location("Mid", "3333333333", 52.4862, -1.8904).unwrap(); // Birmingham

        let nearby = db.nearest_locations(51.5074, -0.1278, 2).unwrap();
        assert_eq!(nearby.len(), 2);
        assert_eq!(nearby[0].alert.name, "Near");
        assert_eq!(nearby[1].alert.name, "Mid");
        assert!(nearby[0].distance_m < nearby[1].distance_m);
    }
}
