//! Domain entities - the core business objects.

mod notification;
mod page;
mod post;
mod user;

pub use notification::{Notification, NotificationKind, NotificationView};
pub use page::{FEED_PAGE_SIZE, Page, page_number, page_offset, total_pages};
pub use post::{
    Comment, CommentView, Like, LikeToggle, LikeView, NewPost, Post, PostEdit, PostView, Share,
};
pub use user::{Profile, ProfileUpdate, User, UserSummary};
