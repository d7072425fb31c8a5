//! Principals and the roles that allow scoring.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A capability granted to a user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Full control.
    Admin,
    /// May create, score, undo and abandon matches.
    Scorer,
    /// Read-only.
    Viewer,
}

/// The user on whose behalf the service acts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: String,
    roles: Vec<Role>,
}

impl Principal {
    /// Creates a principal holding `roles`.
    pub fn new(user_id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id: user_id.into(),
            roles,
        }
    }

    /// User ID recorded as `createdBy`/`updatedBy`.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the principal holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Scorers and admins may change matches.
    #[instrument(skip(self), fields(user = %self.user_id))]
    pub fn can_score(&self) -> bool {
        self.has_role(Role::Scorer) || self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_roles() {
        assert!(Principal::new("u", vec![Role::Scorer]).can_score());
        assert!(Principal::new("u", vec![Role::Admin]).can_score());
        assert!(!Principal::new("u", vec![Role::Viewer]).can_score());
        assert!(!Principal::new("u", vec![]).can_score());
    }

    #[test]
    fn test_role_parses_lowercase() {
        assert_eq!("scorer".parse::<Role>().unwrap(), Role::Scorer);
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
