//! Comments and likes for Gazette.

mod repository;
mod types;

pub use repository::CommentRepository;
pub use types::{Comment, CommentFilter, NewComment, DEFAULT_COMMENT_LIMIT};
