//! Emergency button and the admin view of the alerts it produces.

use safecampus_shared::models::{LocationAlert, NearbyAlert};
use safecampus_shared::protocol::LocationRequest;

use crate::error::Result;
use crate::location::read_location;
use crate::state::ClientState;

/// One row on the safety-details screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyDetail {
    pub alert: LocationAlert,
    pub map_link: String,
}

impl From<LocationAlert> for SafetyDetail {
    fn from(alert: LocationAlert) -> Self {
        Self {
            map_link: alert.map_link(),
            alert,
        }
    }
}

/// Read the device position once and post it with the signed-in account's
/// name and mobile number.
pub async fn send_safety_alert(state: &ClientState) -> Result<LocationAlert> {
    let principal = state.session().require_principal()?;
    let location = read_location(state.location())?;
    let account = state
        .api
        .get_account(state.session(), principal.kind, principal.id)
        .await?;

    let request = LocationRequest {
        name: account.name,
        phone: account.mobile,
        location,
    };
    let alert = state.api.record_location(state.session(), &request).await?;
    tracing::info!(id = %alert.id, "safety alert sent");
    Ok(alert)
}

pub async fn safety_details(state: &ClientState) -> Result<Vec<SafetyDetail>> {
    let alerts = state.api.list_locations(state.session()).await?;
    Ok(alerts.into_iter().map(SafetyDetail::from).collect())
}

/// Alerts closest to the admin's own position.
pub async fn alerts_near_me(state: &ClientState, limit: usize) -> Result<Vec<NearbyAlert>> {
    let here = read_location(state.location())?;
    state
        .api
        .nearest_locations(state.session(), here.latitude, here.longitude, limit)
        .await
}
