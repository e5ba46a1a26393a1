//! SeaORM entities for the normalized social schema.

pub mod follow;
pub mod notification;
pub mod post;
pub mod post_comment;
pub mod post_like;
pub mod post_share;
pub mod user;
