use std::sync::Arc;

use tracing::{debug, info, trace};
use viewstate::{Session, StateContainer};

use super::events::{ProfileEvent, ProfileFact};
use super::reducer::ProfileReducer;
use super::state::ProfileState;
use crate::common::SessionError;
use crate::kernel::RemoteStore;

/// Message shown when saving with a blank name.
pub const NAME_REQUIRED: &str = "Name cannot be empty";

/// Profile screen: view, edit, and save the signed-in user's profile.
pub struct ProfileSession {
    container: StateContainer<ProfileState>,
    store: Arc<dyn RemoteStore>,
}

impl ProfileSession {
    /// Create the session and start loading the profile.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let session = Self {
            container: StateContainer::named("profile", ProfileState::default()),
            store,
        };
        session.dispatch(ProfileEvent::LoadProfile);
        session
    }

    /// Whether the save button should be enabled.
    pub fn can_save_profile(&self) -> bool {
        let state = self.container.snapshot();
        state.data.editing && !state.data.draft_name.trim().is_empty() && !state.loading
    }

    fn apply(&self, fact: ProfileFact) {
        self.container.apply(&ProfileReducer, &fact);
    }

    fn load_profile(&self) {
        self.apply(ProfileFact::LoadStarted);

        let Some(user_id) = self.store.current_user_id() else {
            debug!("no signed-in user, nothing to load");
            self.apply(ProfileFact::NoSession);
            return;
        };

        let store = Arc::clone(&self.store);
        self.container.run_supervised(move |state| async move {
            let profile = store.fetch_profile(user_id).await?;
            state.apply(&ProfileReducer, &ProfileFact::Loaded(profile));
            Ok::<_, SessionError>(())
        });
    }

    fn save_profile(&self) {
        let current = self.container.snapshot();
        if !current.data.editing {
            return;
        }
        let Some(profile) = current.data.profile else {
            return;
        };
        if current.data.draft_name.trim().is_empty() {
            self.apply(ProfileFact::Rejected(NAME_REQUIRED.to_string()));
            return;
        }

        let updated = profile.with_edits(&current.data.draft_name, &current.data.draft_email);
        self.apply(ProfileFact::SaveStarted);

        let store = Arc::clone(&self.store);
        self.container.run_supervised(move |state| async move {
            store.save_profile(&updated).await?;
            info!(user_id = %updated.id, "profile saved");
            state.apply(&ProfileReducer, &ProfileFact::Saved(updated));
            Ok::<_, SessionError>(())
        });
    }

    fn logout(&self) {
        let store = Arc::clone(&self.store);
        self.container.run_supervised(move |state| async move {
            store.sign_out().await;
            info!("signed out");
            state.apply(&ProfileReducer, &ProfileFact::LoggedOut);
            Ok::<_, SessionError>(())
        });
    }
}

impl Session for ProfileSession {
    type Event = ProfileEvent;
    type State = ProfileState;

    fn dispatch(&self, event: ProfileEvent) {
        trace!(?event, "profile event");
        match event {
            ProfileEvent::LoadProfile => self.load_profile(),
            ProfileEvent::ToggleEditMode(editing) => {
                self.apply(ProfileFact::EditingToggled(editing))
            }
            ProfileEvent::UpdateName(name) => self.apply(ProfileFact::NameChanged(name)),
            ProfileEvent::UpdateEmail(email) => self.apply(ProfileFact::EmailChanged(email)),
            ProfileEvent::SaveProfile => self.save_profile(),
            ProfileEvent::Logout => self.logout(),
            ProfileEvent::ClearError => self.apply(ProfileFact::ErrorCleared),
        }
    }

    fn container(&self) -> &StateContainer<ProfileState> {
        &self.container
    }
}
