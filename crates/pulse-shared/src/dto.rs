//! Data Transfer Objects - request/response types for the API.
//!
//! Requests are checked with `validator` before they reach a service.
//! Bodies use camelCase keys except the OAuth-style token response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial post edit. Omitted or empty fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShareRequest {
    #[validate(length(min = 1, max = 50))]
    pub platform: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 30))]
    #[serde(default)]
    pub username: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// `?pageNumber=` on the feed. Kept as text so a malformed value falls back
/// to the first page instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    #[serde(default)]
    pub page_number: Option<String>,
}

impl FeedQuery {
    pub fn page(&self) -> Option<u64> {
        self.page_number.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

/// `?q=` on user search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields shown wherever another user is referenced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: Uuid,
    pub username: String,
    pub profile_picture: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub followers: Vec<UserSummaryResponse>,
    pub following: Vec<UserSummaryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub user: UserSummaryResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub user: UserSummaryResponse,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub author: UserSummaryResponse,
    pub content: String,
    pub image: String,
    pub likes: Vec<LikeResponse>,
    pub comments: Vec<CommentResponse>,
    pub shares_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of the news feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub posts: Vec<PostResponse>,
    pub page: u64,
    pub pages: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    /// One of `like`, `comment`, `follow`, `share`.
    pub kind: String,
    pub from_user: UserSummaryResponse,
    pub post_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_limits() {
        let ok = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            username: "al".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_post_content_bounds() {
        let empty = CreatePostRequest {
            content: String::new(),
            image: None,
        };
        assert!(empty.validate().is_err());

        let long = CreatePostRequest {
            content: "x".repeat(5001),
            image: None,
        };
        assert!(long.validate().is_err());

        let edit = UpdatePostRequest::default();
        assert!(edit.validate().is_ok());
    }

    #[test]
    fn test_feed_query_page() {
        let parse = |raw: Option<&str>| {
            FeedQuery {
                page_number: raw.map(str::to_string),
            }
            .page()
        };

        assert_eq!(parse(Some("3")), Some(3));
        assert_eq!(parse(Some("abc")), None);
        assert_eq!(parse(None), None);
    }

    #[test]
    fn test_update_profile_reads_camel_case() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"profilePicture": "https://img/x.png"}"#).unwrap();
        assert_eq!(req.profile_picture.as_deref(), Some("https://img/x.png"));
        assert!(req.username.is_none());
    }

    #[test]
    fn test_auth_response_keeps_oauth_keys() {
        let now = Utc::now();
        let body = serde_json::to_value(AuthResponse {
            access_token: "t".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            user: UserResponse {
                id: Uuid::nil(),
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                bio: String::new(),
                profile_picture: String::new(),
                created_at: now,
                updated_at: now,
            },
        })
        .unwrap();

        assert_eq!(body["access_token"], "t");
        assert_eq!(body["expires_in"], 3600);
        assert_eq!(body["user"]["profilePicture"], "");
    }
}
