//! PostgreSQL post repository.
//!
//! A post is stored as one `posts` row plus its `post_likes` and
//! `post_comments` rows. Reads load the aggregate with one query per table;
//! interaction writes touch only their own rows so concurrent requests never
//! overwrite each other.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DbConn, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use pulse_core::domain::{Comment, Like, LikeToggle, Post, Share};
use pulse_core::error::RepoError;
use pulse_core::ports::{BaseRepository, PostRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::{post_comment, post_like, post_share};
use super::postgres_base::db_err;

pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn remove_like<C>(db: &C, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>
    where
        C: ConnectionTrait,
    {
        let removed = post_like::Entity::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .exec(db)
            .await
            .map_err(db_err)?;

        Ok(removed.rows_affected > 0)
    }

    /// Attach likes and comments to the given rows, keeping their order.
    async fn hydrate<C>(db: &C, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError>
    where
        C: ConnectionTrait,
    {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

        let likes = post_like::Entity::find()
            .filter(post_like::Column::PostId.is_in(ids.clone()))
            .order_by_asc(post_like::Column::CreatedAt)
            .all(db)
            .await
            .map_err(db_err)?;

        let comments = post_comment::Entity::find()
            .filter(post_comment::Column::PostId.is_in(ids))
            .order_by_asc(post_comment::Column::CreatedAt)
            .all(db)
            .await
            .map_err(db_err)?;

        let mut likes_by_post: HashMap<Uuid, Vec<Like>> = HashMap::new();
        for like in likes {
            likes_by_post.entry(like.post_id).or_default().push(like.into());
        }

        let mut comments_by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in comments {
            comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(comment.into());
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let mut post = Post::from(model);
                post.likes = likes_by_post.remove(&post.id).unwrap_or_default();
                post.comments = comments_by_post.remove(&post.id).unwrap_or_default();
                post
            })
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        Ok(Self::hydrate(&self.db, vec![model]).await?.pop())
    }

    async fn create(&self, entity: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(entity)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        tracing::debug!(post_id = %model.id, "Post inserted");
        Ok(model.into())
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let changes = post::ActiveModel {
            id: Unchanged(entity.id),
            content: Set(entity.content),
            image: Set(entity.image),
            updated_at: Set(entity.updated_at.into()),
            ..Default::default()
        };

        let model = changes.update(&self.db).await.map_err(db_err)?;

        Self::hydrate(&self.db, vec![model])
            .await?
            .pop()
            .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Likes, comments and shares go with the row via ON DELETE CASCADE.
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_page(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Self::hydrate(&self.db, models).await
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(db_err)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Self::hydrate(&self.db, models).await
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeToggle, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Locking the post row queues every toggle on it behind this one.
        if PostEntity::find_by_id(post_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(RepoError::NotFound);
        }

        let outcome = if Self::remove_like(&txn, post_id, user_id).await? {
            LikeToggle::Unliked
        } else {
            let like = post_like::ActiveModel {
                post_id: Set(post_id),
                user_id: Set(user_id),
                created_at: Set(chrono::Utc::now().into()),
            };

            let inserted = post_like::Entity::insert(like)
                .on_conflict(
                    OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;

            if inserted > 0 {
                LikeToggle::Liked
            } else {
                // Another toggle committed the like between our delete and insert.
                Self::remove_like(&txn, post_id, user_id).await?;
                LikeToggle::Unliked
            }
        };

        txn.commit().await.map_err(db_err)?;

        tracing::debug!(
            post_id = %post_id,
            user_id = %user_id,
            liked = outcome.is_liked(),
            "Like toggled"
        );
        Ok(outcome)
    }

    async fn add_comment(&self, post_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        post_comment::Entity::insert(post_comment::ActiveModel::for_post(post_id, comment))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn remove_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<bool, RepoError> {
        let result = post_comment::Entity::delete_many()
            .filter(post_comment::Column::Id.eq(comment_id))
            .filter(post_comment::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn record_share(&self, share: Share) -> Result<(), RepoError> {
        let post_id = share.post_id;
        let txn = self.db.begin().await.map_err(db_err)?;

        post_share::Entity::insert(post_share::ActiveModel::from(share))
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;

        let bumped = PostEntity::update_many()
            .col_expr(
                post::Column::SharesCount,
                Expr::col(post::Column::SharesCount).add(1),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if bumped.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}
