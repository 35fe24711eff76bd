//! Profile reducer - folds profile facts into the profile screen state.

use viewstate::Reducer;

use super::events::ProfileFact;
use super::state::ProfileSessionState;

pub struct ProfileReducer;

impl Reducer<ProfileFact, ProfileSessionState> for ProfileReducer {
    fn reduce(&self, state: &ProfileSessionState, fact: &ProfileFact) -> ProfileSessionState {
        let mut next = state.clone();
        match fact {
            ProfileFact::LoadStarted | ProfileFact::SaveStarted => {
                next.loading = true;
                next.error = None;
            }
            ProfileFact::Loaded(profile) => {
                next.data.draft_name = profile.name.clone();
                next.data.draft_email = profile.email.clone();
                next.data.profile = Some(profile.clone());
                next.loading = false;
            }
            ProfileFact::NoSession => {
                next.loading = false;
            }
            ProfileFact::EditingToggled(true) => {
                // Entering edit mode always starts from the stored profile
                let Some(profile) = &state.data.profile else {
                    return state.clone();
                };
                next.data.editing = true;
                next.data.draft_name = profile.name.clone();
                next.data.draft_email = profile.email.clone();
            }
            ProfileFact::EditingToggled(false) => {
                next.data.editing = false;
            }
            ProfileFact::NameChanged(name) => {
                next.data.draft_name = name.clone();
            }
            ProfileFact::EmailChanged(email) => {
                next.data.draft_email = email.clone();
            }
            ProfileFact::Saved(profile) => {
                next.data.profile = Some(profile.clone());
                next.data.editing = false;
                next.loading = false;
            }
            ProfileFact::Rejected(message) => {
                next.error = Some(message.clone());
            }
            ProfileFact::LoggedOut => {
                next.data.logged_out = true;
            }
            ProfileFact::ErrorCleared => {
                next.clear_error();
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::UserId;
    use crate::domains::profile::models::{UserProfile, UserRole};
    use crate::domains::profile::state::ProfileState;
    use viewstate::testing::ReducerTest;
    use viewstate::Snapshot;

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(),
            email: "sam@jobjet.dev".to_string(),
            name: "Sam".to_string(),
            role: UserRole::JobSeeker,
        }
    }

    fn test() -> ReducerTest<ProfileReducer, ProfileFact, ProfileSessionState> {
        ReducerTest::new(ProfileReducer, Snapshot::new(ProfileState::default()))
    }

    #[test]
    fn test_load_seeds_drafts() {
        let profile = profile();

        test()
            .given(ProfileFact::LoadStarted)
            .assert_state(|s| s.loading)
            .then(ProfileFact::Loaded(profile.clone()))
            .assert_state(|s| {
                !s.loading && s.data.draft_name == "Sam" && s.data.draft_email == "sam@jobjet.dev"
            });
    }

    #[test]
    fn test_toggle_edit_reseeds_drafts() {
        let profile = profile();

        test()
            .given(ProfileFact::Loaded(profile.clone()))
            .then(ProfileFact::EditingToggled(true))
            .then(ProfileFact::NameChanged("Unsaved".to_string()))
            .then(ProfileFact::EmailChanged("unsaved@jobjet.dev".to_string()))
            .then(ProfileFact::EditingToggled(false))
            .assert_state(|s| !s.data.editing && s.data.draft_name == "Unsaved")
            .then(ProfileFact::EditingToggled(true))
            .assert_state(|s| {
                s.data.editing
                    && s.data.draft_name == profile.name
                    && s.data.draft_email == profile.email
            });
    }

    #[test]
    fn test_toggle_edit_without_profile_is_noop() {
        let initial = Snapshot::new(ProfileState::default());
        let next = ProfileReducer.reduce(&initial, &ProfileFact::EditingToggled(true));
        assert_eq!(next, initial);
    }

    #[test]
    fn test_saved_leaves_edit_mode() {
        let profile = profile();
        let renamed = profile.with_edits("Samantha", &profile.email);

        test()
            .given(ProfileFact::Loaded(profile))
            .then(ProfileFact::EditingToggled(true))
            .then(ProfileFact::SaveStarted)
            .then(ProfileFact::Saved(renamed.clone()))
            .assert_state(|s| {
                !s.data.editing && !s.loading && s.data.profile.as_ref() == Some(&renamed)
            });
    }

    #[test]
    fn test_rejection_keeps_loading_and_clear_error_is_idempotent() {
        let state = test()
            .given(ProfileFact::Rejected("Name cannot be empty".to_string()))
            .assert_state(|s| s.error.as_deref() == Some("Name cannot be empty") && !s.loading)
            .then(ProfileFact::ErrorCleared)
            .into_state();

        let again = ProfileReducer.reduce(&state, &ProfileFact::ErrorCleared);
        assert_eq!(again, state);
    }
}
