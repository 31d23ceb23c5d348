//! Application state shared by every screen.
//!
//! Holds the API client, the resolved [`Session`] and the platform
//! collaborators. The session is read from secure storage once, when the
//! state is built, and written back whenever it changes.

use std::sync::Arc;

use chrono::Utc;

use crate::api::ApiClient;
use crate::error::Result;
use crate::location::LocationProvider;
use crate::navigation::{home_screen, Screen};
use crate::session::{SecureStorage, Session};

pub struct ClientState {
    pub api: ApiClient,
    session: Session,
    storage: Arc<dyn SecureStorage>,
    location: Arc<dyn LocationProvider>,
}

impl ClientState {
    /// Build the state and restore any stored session.
    pub fn new(
        api: ApiClient,
        storage: Arc<dyn SecureStorage>,
        location: Arc<dyn LocationProvider>,
    ) -> Result<Self> {
        let session = Session::restore(storage.as_ref(), Utc::now())?;
        tracing::info!(signed_in = session.is_signed_in(), "client state initialised");
        Ok(Self {
            api,
            session,
            storage,
            location,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn location(&self) -> &dyn LocationProvider {
        self.location.as_ref()
    }

    /// Replace the session, persist it and return the screen to land on.
    pub fn set_session(&mut self, session: Session) -> Result<Screen> {
        session.persist(self.storage.as_ref())?;
        self.session = session;
        Ok(home_screen(&self.session))
    }

    pub fn logout(&mut self) -> Result<Screen> {
        self.session = Session::logout(self.storage.as_ref())?;
        tracing::info!("signed out");
        Ok(home_screen(&self.session))
    }
}
