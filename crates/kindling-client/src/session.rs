use kindling_types::api::StoryDraft;
use kindling_types::models::Story;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::stories::StoryList;
use crate::users::User;

/// One client session: the API client, the current feed snapshot, and
/// the current user, if any.
///
/// This is the explicit context that stands in for "current user" and
/// "current story list" globals. Mutating methods take `&mut self`, so at
/// most one action can be in flight at a time — a second click's worth of
/// work cannot start until the first resolves.
#[derive(Debug)]
pub struct Session {
    client: ApiClient,
    stories: StoryList,
    user: Option<User>,
}

impl Session {
    /// Anonymous session with an empty feed.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            stories: StoryList::default(),
            user: None,
        }
    }

    /// Anonymous session with the feed already fetched.
    pub async fn start(client: ApiClient) -> Result<Self, ApiError> {
        let stories = StoryList::fetch_all(&client).await?;
        Ok(Self {
            client,
            stories,
            user: None,
        })
    }

    /// Resume a previous session from stored credentials, then fetch the
    /// feed. A rejected token just means the session starts anonymous; a
    /// failed feed fetch still propagates, since the caller has nothing
    /// to show without one.
    pub async fn restore(client: ApiClient, token: &str, username: &str) -> Result<Self, ApiError> {
        let user = User::login_via_stored_credentials(&client, token, username).await;
        let stories = StoryList::fetch_all(&client).await?;
        Ok(Self {
            client,
            stories,
            user,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories.stories
    }

    pub fn story(&self, story_id: &str) -> Option<&Story> {
        self.stories.get(story_id)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    // -- Auth transitions --

    pub async fn signup(
        &mut self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<&User, ApiError> {
        let user = User::signup(&self.client, username, password, name).await?;
        info!("signed up as {}", user.username);
        Ok(self.user.insert(user))
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&User, ApiError> {
        let user = User::login(&self.client, username, password).await?;
        info!("logged in as {}", user.username);
        Ok(self.user.insert(user))
    }

    /// Back to anonymous. Wipes the local favorites cache on the way out;
    /// the remote favorite records survive for the next login.
    pub fn logout(&mut self) {
        if let Some(mut user) = self.user.take() {
            user.clear_favorites();
            info!("logged out {}", user.username);
        }
    }

    /// Re-fetch the feed snapshot, replacing the current one.
    pub async fn refresh_feed(&mut self) -> Result<(), ApiError> {
        self.stories = StoryList::fetch_all(&self.client).await?;
        Ok(())
    }

    // -- Story actions (authenticated) --

    /// Submit a new story. It lands at the front of the feed and of the
    /// user's own stories once the server confirms.
    pub async fn submit_story(&mut self, draft: StoryDraft) -> Result<Story, ApiError> {
        let Some(user) = self.user.as_mut() else {
            return Err(Self::not_logged_in());
        };
        let result = self.stories.add_story(&self.client, user, draft).await;
        self.expire_on_auth_failure(result)
    }

    /// Delete one of the current user's stories everywhere. Ownership is
    /// enforced by the server, not pre-checked here.
    pub async fn delete_story(&mut self, story_id: &str) -> Result<(), ApiError> {
        let Some(user) = self.user.as_mut() else {
            return Err(Self::not_logged_in());
        };
        let result = self
            .stories
            .remove_story(&self.client, user, story_id)
            .await;
        self.expire_on_auth_failure(result)
    }

    /// Flip the favorite state of `story_id`. Returns whether the story
    /// is a favorite afterwards.
    pub async fn toggle_favorite(&mut self, story_id: &str) -> Result<bool, ApiError> {
        let Some(user) = self.user.as_mut() else {
            return Err(Self::not_logged_in());
        };
        let result = if user.is_favorite(story_id) {
            user.remove_favorite(&self.client, story_id)
                .await
                .map(|_| false)
        } else {
            let Some(story) = self.stories.get(story_id) else {
                return Err(ApiError::NotFound {
                    message: format!("story {story_id} is not in the feed"),
                });
            };
            let story = story.clone();
            user.add_favorite(&self.client, &story).await.map(|_| true)
        };
        self.expire_on_auth_failure(result)
    }

    /// A rejected token means the session is stale. Force the transition
    /// back to anonymous before surfacing the error, so the caller never
    /// keeps acting on a session the server no longer honors. A 403
    /// (valid token, disallowed action) leaves the session alone.
    fn expire_on_auth_failure<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(err) = &result {
            if err.is_stale_token() {
                if let Some(user) = self.user.take() {
                    warn!("session token for {} rejected; dropping session", user.username);
                }
            }
        }
        result
    }

    fn not_logged_in() -> ApiError {
        ApiError::Auth {
            status: reqwest::StatusCode::UNAUTHORIZED,
            message: "not logged in".into(),
        }
    }
}
