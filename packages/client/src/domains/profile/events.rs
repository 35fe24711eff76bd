use super::models::UserProfile;

/// UI events accepted by the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    /// Fetch the signed-in user's profile. Fired on construction.
    LoadProfile,
    ToggleEditMode(bool),
    UpdateName(String),
    UpdateEmail(String),
    SaveProfile,
    Logout,
    ClearError,
}

/// Facts folded into profile state by [`ProfileReducer`](super::ProfileReducer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFact {
    LoadStarted,
    Loaded(UserProfile),
    /// Nobody is signed in; there is nothing to load.
    NoSession,
    EditingToggled(bool),
    NameChanged(String),
    EmailChanged(String),
    SaveStarted,
    Saved(UserProfile),
    /// A save rejected before any IO.
    Rejected(String),
    LoggedOut,
    ErrorCleared,
}
