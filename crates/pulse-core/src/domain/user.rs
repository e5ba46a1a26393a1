use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - a registered member of the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: String,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID, timestamps and an empty profile.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            bio: String::new(),
            profile_picture: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial profile edit. Omitted fields keep their value.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(picture) = update.profile_picture {
            self.profile_picture = picture;
        }
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}

/// The public slice of a user embedded in posts, comments and notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub profile_picture: String,
}

impl UserSummary {
    /// Placeholder for a reference whose user row no longer resolves.
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            username: "unknown".to_string(),
            profile_picture: String::new(),
        }
    }
}

/// Partial profile edit requested by the owner.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

/// A user together with both sides of the follow graph.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_omitted_fields() {
        let mut user = User::new("ada".into(), "ada@example.com".into(), "hash".into());
        user.bio = "engine".into();

        user.apply(ProfileUpdate {
            profile_picture: Some("https://img/ada.png".into()),
            ..Default::default()
        });

        assert_eq!(user.username, "ada");
        assert_eq!(user.bio, "engine");
        assert_eq!(user.profile_picture, "https://img/ada.png");
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User::new("ada".into(), "ada@example.com".into(), "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
