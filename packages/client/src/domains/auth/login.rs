//! Login screen session.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, trace};
use viewstate::{Session, StateContainer};

use crate::common::SessionError;
use crate::kernel::RemoteStore;

pub const CREDENTIALS_REQUIRED: &str = "Email and password are required";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginState {
    pub email: String,
    #[serde(skip)]
    pub password: String,
    /// Set once authentication succeeded; the UI navigates to the job board.
    pub signed_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEvent {
    UpdateEmail(String),
    UpdatePassword(String),
    Submit,
    ClearError,
}

pub struct LoginSession {
    container: StateContainer<LoginState>,
    store: Arc<dyn RemoteStore>,
}

impl LoginSession {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            container: StateContainer::named("login", LoginState::default()),
            store,
        }
    }

    pub fn can_submit(&self) -> bool {
        let state = self.container.snapshot();
        !state.loading && !state.data.email.trim().is_empty() && !state.data.password.trim().is_empty()
    }

    fn submit(&self) {
        let current = self.container.snapshot();
        if current.loading {
            return;
        }
        let email = current.data.email.trim().to_string();
        let password = current.data.password;
        if email.is_empty() || password.trim().is_empty() {
            self.container
                .update(|s| s.error = Some(CREDENTIALS_REQUIRED.to_string()));
            return;
        }

        self.container.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let store = Arc::clone(&self.store);
        self.container.run_supervised(move |state| async move {
            store.authenticate(&email, &password).await?;
            info!(%email, "signed in");
            state.update(|s| {
                s.data.signed_in = true;
                s.data.password.clear();
                s.loading = false;
            });
            Ok::<_, SessionError>(())
        });
    }
}

impl Session for LoginSession {
    type Event = LoginEvent;
    type State = LoginState;

    fn dispatch(&self, event: LoginEvent) {
        trace!(?event, "login event");
        match event {
            LoginEvent::UpdateEmail(email) => self.container.update(|s| s.data.email = email),
            LoginEvent::UpdatePassword(password) => {
                self.container.update(|s| s.data.password = password)
            }
            LoginEvent::Submit => self.submit(),
            LoginEvent::ClearError => self.container.update(|s| s.clear_error()),
        }
    }

    fn container(&self) -> &StateContainer<LoginState> {
        &self.container
    }
}
