use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Story;

// -- Stories --

/// `{stories: [...]}` envelope returned by the feed endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoriesResponse {
    pub stories: Vec<Story>,
}

/// The client-supplied part of a story: everything except what the
/// server assigns (`storyId`, `username`, `createdAt`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoryDraft {
    pub title: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStoryRequest {
    pub token: String,
    pub story: StoryDraft,
}

/// `{story: {...}}` envelope returned on successful creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoryEnvelope {
    pub story: Story,
}

/// Body of every authenticated call that carries nothing but the token
/// (story delete, favorite add/remove).
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenBody {
    pub token: String,
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub user: SignupFields,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupFields {
    pub username: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub user: LoginFields,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginFields {
    pub username: String,
    pub password: String,
}

/// `{user: {...}, token}` envelope returned by signup and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserRecord,
    pub token: String,
}

/// `{user: {...}}` envelope returned by the profile fetch.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserRecord,
}

/// Wire shape of a user profile.
///
/// The server calls the user's own submissions `stories`; both story
/// arrays may be absent on fresh accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub favorites: Vec<Story>,
    #[serde(default, rename = "stories")]
    pub own_stories: Vec<Story>,
}
