use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// Account role. New accounts are job seekers unless they register as employers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    JobSeeker,
    Employer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::JobSeeker => write!(f, "JOB_SEEKER"),
            UserRole::Employer => write!(f, "EMPLOYER"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "JOB_SEEKER" | "SEEKER" => Ok(UserRole::JobSeeker),
            "EMPLOYER" => Ok(UserRole::Employer),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// A user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl UserProfile {
    /// Copy of this profile with the edited name and email applied.
    pub fn with_edits(&self, name: &str, email: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_display() {
        for role in [UserRole::JobSeeker, UserRole::Employer] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert_eq!("employer".parse::<UserRole>().unwrap(), UserRole::Employer);
        assert_eq!("job-seeker".parse::<UserRole>().unwrap(), UserRole::JobSeeker);
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&UserRole::JobSeeker).unwrap();
        assert_eq!(json, "\"JOB_SEEKER\"");
    }

    #[test]
    fn test_with_edits_keeps_identity_and_role() {
        let profile = UserProfile {
            id: UserId::new(),
            email: "old@jobjet.dev".to_string(),
            name: "Old".to_string(),
            role: UserRole::Employer,
        };

        let edited = profile.with_edits(" New Name ", "new@jobjet.dev");

        assert_eq!(edited.id, profile.id);
        assert_eq!(edited.role, UserRole::Employer);
        assert_eq!(edited.name, "New Name");
        assert_eq!(edited.email, "new@jobjet.dev");
    }
}
