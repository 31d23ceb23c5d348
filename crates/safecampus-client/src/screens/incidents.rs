use safecampus_shared::models::Incident;
use uuid::Uuid;

use crate::error::Result;
use crate::forms::IncidentForm;
use crate::state::ClientState;

pub async fn report_incident(state: &ClientState, form: &IncidentForm) -> Result<Incident> {
    form.validate()?;
    let incident = state.api.create_incident(state.session(), form).await?;
    tracing::info!(id = %incident.id, "incident reported");
    Ok(incident)
}

pub async fn my_incidents(state: &ClientState) -> Result<Vec<Incident>> {
    let reporter = state.session().require_principal()?.owner_id();
    state.api.list_incidents_by_reporter(state.session(), &reporter).await
}

/// Admin review list.
pub async fn all_incidents(state: &ClientState) -> Result<Vec<Incident>> {
    state.api.list_incidents(state.session()).await
}

pub async fn remove_incident(state: &ClientState, id: Uuid) -> Result<String> {
    Ok(state.api.delete_incident(state.session(), id).await?.message)
}
