use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Comment, CommentView, FEED_PAGE_SIZE, LikeToggle, LikeView, NewPost, NotificationKind, Page,
    Post, PostEdit, PostView, Share, page_number, page_offset,
};
use crate::error::DomainError;
use crate::ports::{PostRepository, PubSub, UserRepository};

use super::NotificationService;
use super::directory::Directory;
use super::realtime::{LikeEvent, post_likes_channel, publish_json};

/// Posts and everything users do to them: likes, comments, shares.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<NotificationService>,
    pubsub: Arc<dyn PubSub>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<NotificationService>,
        pubsub: Arc<dyn PubSub>,
    ) -> Self {
        Self {
            posts,
            users,
            notifications,
            pubsub,
        }
    }

    pub async fn create(&self, author_id: Uuid, input: NewPost) -> Result<PostView, DomainError> {
        let post = Post::new(author_id, input.content, input.image);
        let created = self.posts.create(post).await?;
        tracing::info!(post_id = %created.id, author_id = %author_id, "Post created");
        self.populate_one(created).await
    }

    /// One page of the news feed, newest first. Pages are 1-based.
    pub async fn feed(&self, requested_page: Option<u64>) -> Result<Page<PostView>, DomainError> {
        let page = page_number(requested_page);
        let total = self.posts.count().await?;
        let offset = page_offset(page, FEED_PAGE_SIZE);
        let posts = if offset < total {
            self.posts.list_page(offset, FEED_PAGE_SIZE).await?
        } else {
            Vec::new()
        };

        let views = self.populate(posts).await?;
        Ok(Page::new(views, page, total, FEED_PAGE_SIZE))
    }

    pub async fn get(&self, id: Uuid) -> Result<PostView, DomainError> {
        let post = self.load(id).await?;
        self.populate_one(post).await
    }

    pub async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        edit: PostEdit,
    ) -> Result<PostView, DomainError> {
        let mut post = self.load(id).await?;
        if !post.is_authored_by(caller) {
            return Err(DomainError::unauthorized("Not authorized to update this post"));
        }

        post.apply(edit);
        let updated = self.posts.update(post).await?;
        self.populate_one(updated).await
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), DomainError> {
        let post = self.load(id).await?;
        if !post.is_authored_by(caller) {
            return Err(DomainError::unauthorized("Not authorized to delete this post"));
        }

        self.posts.delete(id).await?;
        tracing::info!(post_id = %id, "Post removed");
        Ok(())
    }

    /// Like the post, or take the caller's like back if it is already there.
    pub async fn toggle_like(&self, caller: Uuid, id: Uuid) -> Result<PostView, DomainError> {
        self.load(id).await?;

        let outcome = self.posts.toggle_like(id, caller).await?;
        let post = self.load(id).await?;

        publish_json(
            self.pubsub.as_ref(),
            &post_likes_channel(id),
            &LikeEvent {
                post_id: id,
                user_id: caller,
                liked: outcome.is_liked(),
                likes_count: post.likes.len(),
            },
        )
        .await;

        if outcome == LikeToggle::Liked {
            self.notifications
                .notify(post.author_id, caller, NotificationKind::Like, Some(id))
                .await;
        }

        self.populate_one(post).await
    }

    pub async fn add_comment(
        &self,
        caller: Uuid,
        id: Uuid,
        text: String,
    ) -> Result<PostView, DomainError> {
        self.load(id).await?;

        self.posts.add_comment(id, Comment::new(caller, text)).await?;
        let post = self.load(id).await?;

        self.notifications
            .notify(post.author_id, caller, NotificationKind::Comment, Some(id))
            .await;

        self.populate_one(post).await
    }

    pub async fn delete_comment(
        &self,
        caller: Uuid,
        id: Uuid,
        comment_id: Uuid,
    ) -> Result<PostView, DomainError> {
        let post = self.load(id).await?;
        let comment = post
            .comment(comment_id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;

        if comment.user_id != caller {
            return Err(DomainError::unauthorized(
                "Not authorized to delete this comment",
            ));
        }

        if !self.posts.remove_comment(id, comment_id).await? {
            return Err(DomainError::not_found("Comment", comment_id));
        }

        let post = self.load(id).await?;
        self.populate_one(post).await
    }

    /// Every post by `author_id`, newest first.
    pub async fn by_author(&self, author_id: Uuid) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.find_by_author(author_id).await?;
        self.populate(posts).await
    }

    /// The post's comments, oldest first.
    pub async fn comments(&self, id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        let mut post = self.load(id).await?;
        post.comments.sort_by_key(|c| c.created_at);

        let directory =
            Directory::load(self.users.as_ref(), post.comments.iter().map(|c| c.user_id)).await?;

        Ok(post
            .comments
            .into_iter()
            .map(|c| comment_view(c, &directory))
            .collect())
    }

    pub async fn share(
        &self,
        caller: Uuid,
        id: Uuid,
        platform: String,
    ) -> Result<PostView, DomainError> {
        self.load(id).await?;

        self.posts.record_share(Share::new(id, caller, platform)).await?;
        let post = self.load(id).await?;

        self.notifications
            .notify(post.author_id, caller, NotificationKind::Share, Some(id))
            .await;

        self.populate_one(post).await
    }

    async fn load(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    async fn populate_one(&self, post: Post) -> Result<PostView, DomainError> {
        let mut views = self.populate(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Internal("populate dropped a post".to_string()))
    }

    async fn populate(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let directory = Directory::load(
            self.users.as_ref(),
            posts.iter().flat_map(|p| p.referenced_users()),
        )
        .await?;

        Ok(posts
            .into_iter()
            .map(|post| post_view(post, &directory))
            .collect())
    }
}

fn post_view(post: Post, directory: &Directory) -> PostView {
    PostView {
        id: post.id,
        author: directory.get(post.author_id),
        content: post.content,
        image: post.image,
        likes: post
            .likes
            .into_iter()
            .map(|like| LikeView {
                user: directory.get(like.user_id),
            })
            .collect(),
        comments: post
            .comments
            .into_iter()
            .map(|c| comment_view(c, directory))
            .collect(),
        shares_count: post.shares_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn comment_view(comment: Comment, directory: &Directory) -> CommentView {
    CommentView {
        id: comment.id,
        user: directory.get(comment.user_id),
        text: comment.text,
        created_at: comment.created_at,
    }
}
