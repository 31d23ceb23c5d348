use safecampus_shared::models::Account;
use safecampus_shared::types::PrincipalKind;

use crate::error::Result;
use crate::forms::ProfileForm;
use crate::state::ClientState;

pub async fn load_profile(state: &ClientState) -> Result<Account> {
    let principal = state.session().require_principal()?;
    state
        .api
        .get_account(state.session(), principal.kind, principal.id)
        .await
}

pub async fn update_profile(state: &ClientState, form: &ProfileForm) -> Result<Account> {
    form.validate()?;
    let principal = state.session().require_principal()?;
    state
        .api
        .update_account(state.session(), principal.kind, principal.id, &form.to_request())
        .await
}

/// Admin view of every account of a kind.
pub async fn list_accounts(state: &ClientState, kind: PrincipalKind) -> Result<Vec<Account>> {
    state.api.list_accounts(state.session(), kind).await
}
