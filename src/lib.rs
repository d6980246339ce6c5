//! Gazette - blog and news CMS backend
//!
//! Members register and comment, administrators publish, and an hourly job
//! pulls a news RSS feed into the post store without duplicating stories.

pub mod auth;
pub mod comment;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod post;
pub mod web;

pub use config::Config;
pub use db::{Database, Role, User, UserRepository};
pub use error::{GazetteError, Result};
