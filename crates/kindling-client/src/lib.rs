//! Typed client for the kindling news-story service.
//!
//! The remote API owns all persistence; this crate wraps its endpoints in
//! three pieces of state — the story feed ([`StoryList`]), the
//! authenticated principal ([`User`]), and the [`Session`] holding both —
//! and keeps them consistent with the server after every mutation.

pub mod error;
pub mod http;
pub mod session;
pub mod stories;
pub mod users;

pub use error::ApiError;
pub use http::ApiClient;
pub use session::Session;
pub use stories::StoryList;
pub use users::User;

pub use kindling_types::api::StoryDraft;
pub use kindling_types::models::{MalformedUrl, Story};
