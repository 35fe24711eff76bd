//! Registration screen session.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, trace};
use viewstate::{Session, StateContainer};

use crate::common::SessionError;
use crate::domains::profile::UserRole;
use crate::kernel::RemoteStore;

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterState {
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    pub role: UserRole,
    /// Set once the account exists and is signed in.
    pub registered: bool,
}

impl RegisterState {
    fn validate(&self) -> Result<(), SessionError> {
        let blank = [&self.name, &self.email, &self.password, &self.confirm_password]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            return Err(SessionError::validation(ALL_FIELDS_REQUIRED));
        }
        if self.password != self.confirm_password {
            return Err(SessionError::validation(PASSWORD_MISMATCH));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterEvent {
    UpdateName(String),
    UpdateEmail(String),
    UpdatePassword(String),
    UpdateConfirmPassword(String),
    SelectRole(UserRole),
    Submit,
    ClearError,
}

pub struct RegisterSession {
    container: StateContainer<RegisterState>,
    store: Arc<dyn RemoteStore>,
}

impl RegisterSession {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            container: StateContainer::named("register", RegisterState::default()),
            store,
        }
    }

    pub fn can_submit(&self) -> bool {
        let state = self.container.snapshot();
        !state.loading && state.data.validate().is_ok()
    }

    fn submit(&self) {
        let current = self.container.snapshot();
        if current.loading {
            return;
        }
        if let Err(e) = current.data.validate() {
            self.container.update(|s| s.error = Some(e.to_string()));
            return;
        }

        self.container.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let form = current.data;
        let store = Arc::clone(&self.store);
        self.container.run_supervised(move |state| async move {
            store
                .register(form.email.trim(), &form.password, form.name.trim(), form.role)
                .await?;
            info!(email = %form.email, role = %form.role, "account registered");
            state.update(|s| {
                s.data.registered = true;
                s.data.password.clear();
                s.data.confirm_password.clear();
                s.loading = false;
            });
            Ok::<_, SessionError>(())
        });
    }
}

impl Session for RegisterSession {
    type Event = RegisterEvent;
    type State = RegisterState;

    fn dispatch(&self, event: RegisterEvent) {
        trace!(?event, "register event");
        match event {
            RegisterEvent::UpdateName(name) => self.container.update(|s| s.data.name = name),
            RegisterEvent::UpdateEmail(email) => self.container.update(|s| s.data.email = email),
            RegisterEvent::UpdatePassword(password) => {
                self.container.update(|s| s.data.password = password)
            }
            RegisterEvent::UpdateConfirmPassword(password) => {
                self.container.update(|s| s.data.confirm_password = password)
            }
            RegisterEvent::SelectRole(role) => self.container.update(|s| s.data.role = role),
            RegisterEvent::Submit => self.submit(),
            RegisterEvent::ClearError => self.container.update(|s| s.clear_error()),
        }
    }

    fn container(&self) -> &StateContainer<RegisterState> {
        &self.container
    }
}
