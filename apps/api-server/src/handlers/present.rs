//! Domain views to wire DTOs.

use pulse_core::domain::{
    CommentView, NotificationView, Page, PostView, Profile, User, UserSummary,
};
use pulse_shared::dto::{
    CommentResponse, FeedResponse, LikeResponse, NotificationResponse, PostResponse,
    ProfileResponse, UserResponse, UserSummaryResponse,
};

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        bio: user.bio,
        profile_picture: user.profile_picture,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn summary(summary: UserSummary) -> UserSummaryResponse {
    UserSummaryResponse {
        id: summary.id,
        username: summary.username,
        profile_picture: summary.profile_picture,
    }
}

pub fn profile(profile: Profile) -> ProfileResponse {
    ProfileResponse {
        user: user(profile.user),
        followers: profile.followers.into_iter().map(summary).collect(),
        following: profile.following.into_iter().map(summary).collect(),
    }
}

pub fn comment(comment: CommentView) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        user: summary(comment.user),
        text: comment.text,
        created_at: comment.created_at,
    }
}

pub fn post(post: PostView) -> PostResponse {
    PostResponse {
        id: post.id,
        author: summary(post.author),
        content: post.content,
        image: post.image,
        likes: post
            .likes
            .into_iter()
            .map(|like| LikeResponse {
                user: summary(like.user),
            })
            .collect(),
        comments: post.comments.into_iter().map(comment).collect(),
        shares_count: post.shares_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn posts(posts: Vec<PostView>) -> Vec<PostResponse> {
    posts.into_iter().map(post).collect()
}

pub fn feed(page: Page<PostView>) -> FeedResponse {
    let page = page.map(post);
    FeedResponse {
        posts: page.items,
        page: page.page,
        pages: page.pages,
        has_more: page.has_more,
    }
}

pub fn notification(notification: NotificationView) -> NotificationResponse {
    NotificationResponse {
        id: notification.id,
        kind: notification.kind.as_str().to_string(),
        from_user: summary(notification.from_user),
        post_id: notification.post_id,
        read: notification.read,
        created_at: notification.created_at,
    }
}
