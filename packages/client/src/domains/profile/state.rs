use serde::Serialize;
use viewstate::Snapshot;

use super::models::UserProfile;

/// Data shown on the profile screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileState {
    pub profile: Option<UserProfile>,
    pub editing: bool,
    pub draft_name: String,
    pub draft_email: String,
    /// Terminal: set once sign-out completed, the UI navigates away.
    pub logged_out: bool,
}

pub type ProfileSessionState = Snapshot<ProfileState>;
