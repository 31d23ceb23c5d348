//! Device location access.

use safecampus_shared::geo::Coordinates;
use safecampus_shared::validation::validate_coordinates;

use crate::error::{ClientError, Result};

/// Returns one reading of the device position.
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> Result<Coordinates>;
}

/// Always reports the same position. Useful for emulators and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Coordinates {
            latitude,
            longitude,
        })
    }
}

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// Read the provider once and reject a reading that cannot be a real
/// position before it is sent anywhere.
pub fn read_location(provider: &dyn LocationProvider) -> Result<Coordinates> {
    let reading = provider.current_location()?;
    validate_coordinates(reading.latitude, reading.longitude)
        .map_err(|e| ClientError::Location(e.to_string()))?;
    Ok(reading)
}
