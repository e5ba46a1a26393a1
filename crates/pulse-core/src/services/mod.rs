//! Application services - the use cases behind the REST surface.
//!
//! Services own the authorization rules (who may edit, delete, follow) and
//! turn repository aggregates into populated views. Side effects that must
//! not fail the request, such as notifications and realtime events, are
//! logged and swallowed here.

mod directory;
mod notification;
mod post;
pub mod realtime;
mod user;

pub use notification::NotificationService;
pub use post::PostService;
pub use user::{SEARCH_LIMIT, UserService};
