//! Posts for Gazette.
//!
//! Authored and ingested articles share one table keyed by a unique slug.

mod repository;
mod types;

pub use repository::{PostRepository, PostStore};
pub use types::{
    slugify, NewPost, Post, PostFilter, PostUpdate, SortDirection, DEFAULT_CATEGORY,
    DEFAULT_POST_IMAGE, DEFAULT_POST_LIMIT,
};
