use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;

/// Post aggregate - a post with its likes and comments loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    /// Image URL; empty when the post has none.
    pub image: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub shares_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with no interactions.
    pub fn new(author_id: Uuid, content: String, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            content,
            image: image.unwrap_or_default(),
            likes: Vec::new(),
            comments: Vec::new(),
            shares_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.iter().any(|like| like.user_id == user_id)
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Apply an author edit. Missing or empty fields fall back to the current value.
    pub fn apply(&mut self, edit: PostEdit) {
        if let Some(content) = edit.content.filter(|c| !c.is_empty()) {
            self.content = content;
        }
        if let Some(image) = edit.image.filter(|i| !i.is_empty()) {
            self.image = image;
        }
        self.updated_at = Utc::now();
    }

    /// Every user referenced by the post: author, likers, commenters.
    pub fn referenced_users(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.author_id)
            .chain(self.likes.iter().map(|l| l.user_id))
            .chain(self.comments.iter().map(|c| c.user_id))
    }
}

/// A single user's like on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// A comment on a post, owned by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    pub fn is_liked(self) -> bool {
        matches!(self, LikeToggle::Liked)
    }
}

/// A share of a post to an external platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

impl Share {
    pub fn new(post_id: Uuid, user_id: Uuid, platform: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            platform,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub image: Option<String>,
}

/// Partial edit of a post by its author.
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub content: Option<String>,
    pub image: Option<String>,
}

/// A post with every user reference replaced by a summary.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: Uuid,
    pub author: UserSummary,
    pub content: String,
    pub image: String,
    pub likes: Vec<LikeView>,
    pub comments: Vec<CommentView>,
    pub shares_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LikeView {
    pub user: UserSummary,
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub id: Uuid,
    pub user: UserSummary,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_has_no_interactions() {
        let post = Post::new(Uuid::new_v4(), "hello".into(), None);
        assert_eq!(post.content, "hello");
        assert_eq!(post.image, "");
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
        assert_eq!(post.shares_count, 0);
    }

    #[test]
    fn apply_ignores_empty_fields() {
        let mut post = Post::new(Uuid::new_v4(), "first".into(), Some("a.png".into()));
        post.apply(PostEdit {
            content: Some(String::new()),
            image: Some("b.png".into()),
        });
        assert_eq!(post.content, "first");
        assert_eq!(post.image, "b.png");
    }

    #[test]
    fn referenced_users_lists_author_first() {
        let author = Uuid::new_v4();
        let liker = Uuid::new_v4();
        let commenter = Uuid::new_v4();
        let mut post = Post::new(author, "x".into(), None);
        post.likes.push(Like::new(liker));
        post.comments.push(Comment::new(commenter, "hi".into()));

        let ids: Vec<Uuid> = post.referenced_users().collect();
        assert_eq!(ids, vec![author, liker, commenter]);
        assert!(post.is_liked_by(liker));
        assert!(!post.is_liked_by(author));
    }
}
