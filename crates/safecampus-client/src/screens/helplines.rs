use safecampus_shared::models::Contact;
use uuid::Uuid;

use crate::error::Result;
use crate::forms::HelplineForm;
use crate::state::ClientState;

pub async fn list_helplines(state: &ClientState) -> Result<Vec<Contact>> {
    state.api.list_helplines(state.session()).await
}

pub async fn add_helpline(state: &ClientState, form: &HelplineForm) -> Result<Contact> {
    form.validate()?;
    state.api.create_helpline(state.session(), &form.to_request()).await
}

pub async fn edit_helpline(state: &ClientState, id: Uuid, form: &HelplineForm) -> Result<Contact> {
    form.validate()?;
    state.api.update_helpline(state.session(), id, &form.to_update()).await
}

pub async fn remove_helpline(state: &ClientState, id: Uuid) -> Result<String> {
    Ok(state.api.delete_helpline(state.session(), id).await?.message)
}
