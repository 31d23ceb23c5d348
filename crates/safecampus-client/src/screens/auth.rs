use safecampus_shared::types::PrincipalKind;

use crate::error::{ClientError, Result};
use crate::forms::{LoginForm, SignupForm};
use crate::navigation::Screen;
use crate::session::Session;
use crate::state::ClientState;

/// Register and sign straight in.
pub async fn signup(state: &mut ClientState, kind: PrincipalKind, form: &SignupForm) -> Result<Screen> {
    form.validate()?;
    let response = state.api.signup(kind, &form.to_request()).await?;
    tracing::info!(id = %response.user_id, %kind, "signed up");
    state.set_session(Session::from_auth(&response))
}

pub async fn login(state: &mut ClientState, kind: PrincipalKind, form: &LoginForm) -> Result<Screen> {
    form.validate()?;
    let response = state.api.login(kind, &form.to_request()).await?;
    tracing::info!(id = %response.user_id, %kind, "signed in");
    state.set_session(Session::from_auth(&response))
}

/// The single login form: try the credentials as a student, then as an
/// admin. Only a credential rejection moves on to the admin attempt.
pub async fn login_any(state: &mut ClientState, form: &LoginForm) -> Result<Screen> {
    match login(state, PrincipalKind::Student, form).await {
        Err(ClientError::Api { status: 401, .. }) => login(state, PrincipalKind::Admin, form).await,
        other => other,
    }
}

pub fn logout(state: &mut ClientState) -> Result<Screen> {
    state.logout()
}
