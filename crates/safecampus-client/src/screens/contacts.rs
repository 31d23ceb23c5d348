//! A student's own emergency contacts.

use safecampus_shared::models::Contact;
use uuid::Uuid;

use crate::error::Result;
use crate::forms::ContactForm;
use crate::state::ClientState;

pub async fn my_contacts(state: &ClientState) -> Result<Vec<Contact>> {
    let owner = state.session().require_principal()?.owner_id();
    state.api.list_contacts_by_owner(state.session(), &owner).await
}

pub async fn add_contact(state: &ClientState, form: &ContactForm) -> Result<Contact> {
    form.validate()?;
    state.api.create_contact(state.session(), &form.to_request()).await
}

pub async fn edit_contact(state: &ClientState, id: Uuid, form: &ContactForm) -> Result<Contact> {
    form.validate()?;
    state.api.update_contact(state.session(), id, &form.to_update()).await
}

/// Returns the confirmation shown to the user.
pub async fn remove_contact(state: &ClientState, id: Uuid) -> Result<String> {
    Ok(state.api.delete_contact(state.session(), id).await?.message)
}
