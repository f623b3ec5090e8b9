use chrono::{DateTime, Utc};
use kindling_types::api::{
    AuthResponse, LoginFields, LoginRequest, SignupFields, SignupRequest, TokenBody, UserEnvelope,
    UserRecord,
};
use kindling_types::models::Story;
use tracing::warn;

use crate::error::ApiError;
use crate::http::ApiClient;

/// The authenticated principal: profile fields, the session token, and
/// the user's two story collections.
///
/// Stories held here are value copies of records that may also appear in
/// the feed; [`StoryList::remove_story`](crate::stories::StoryList::remove_story)
/// is what keeps the copies consistent on deletion. Lives for one
/// session; at most one per [`Session`](crate::session::Session).
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub favorites: Vec<Story>,
    pub own_stories: Vec<Story>,
    token: String,
}

impl User {
    fn from_record(record: UserRecord, token: String) -> Self {
        Self {
            username: record.username,
            name: record.name,
            created_at: record.created_at,
            favorites: record.favorites,
            own_stories: record.own_stories,
            token,
        }
    }

    /// Session token. Opaque to the client; required by every mutating
    /// call.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Register a new account and return the authenticated user.
    pub async fn signup(
        client: &ApiClient,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<Self, ApiError> {
        let request = SignupRequest {
            user: SignupFields {
                username: username.to_owned(),
                password: password.to_owned(),
                name: name.to_owned(),
            },
        };
        let response: AuthResponse = client.post_json("signup", &request).await?;
        Ok(Self::from_record(response.user, response.token))
    }

    /// Exchange credentials for a session token and profile.
    pub async fn login(
        client: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<Self, ApiError> {
        let request = LoginRequest {
            user: LoginFields {
                username: username.to_owned(),
                password: password.to_owned(),
            },
        };
        let response: AuthResponse = client.post_json("login", &request).await?;
        Ok(Self::from_record(response.user, response.token))
    }

    /// Silent re-authentication from previously stored credentials.
    ///
    /// The one operation that absorbs failures: an expired token, an
    /// unknown user, and a transport error all come back as `None`, so
    /// startup auto-login can never block the caller. Every other
    /// operation propagates its errors.
    pub async fn login_via_stored_credentials(
        client: &ApiClient,
        token: &str,
        username: &str,
    ) -> Option<Self> {
        let fetched: Result<UserEnvelope, ApiError> = client
            .get_json_with_token(&format!("users/{username}"), token)
            .await;
        match fetched {
            Ok(envelope) => Some(Self::from_record(envelope.user, token.to_owned())),
            Err(err) => {
                warn!("stored-credential login failed for {username}: {err}");
                None
            }
        }
    }

    // -- Favorites --

    /// Mark `story` as a favorite.
    ///
    /// The server is told first; the local collection changes only once
    /// it confirms. Favoriting an existing favorite is a no-op that sends
    /// nothing, which keeps the collection duplicate-free and avoids
    /// repeating a non-idempotent write.
    pub async fn add_favorite(&mut self, client: &ApiClient, story: &Story) -> Result<(), ApiError> {
        if self.is_favorite(&story.story_id) {
            return Ok(());
        }
        let body = TokenBody {
            token: self.token.clone(),
        };
        client
            .post_unit(
                &format!("users/{}/favorites/{}", self.username, story.story_id),
                &body,
            )
            .await?;
        self.favorites.push(story.clone());
        Ok(())
    }

    /// Remove `story_id` from favorites, server first. Unfavoriting a
    /// story that is not a favorite is a no-op that sends nothing.
    pub async fn remove_favorite(
        &mut self,
        client: &ApiClient,
        story_id: &str,
    ) -> Result<(), ApiError> {
        if !self.is_favorite(story_id) {
            return Ok(());
        }
        let body = TokenBody {
            token: self.token.clone(),
        };
        client
            .delete_unit(
                &format!("users/{}/favorites/{}", self.username, story_id),
                &body,
            )
            .await?;
        self.favorites.retain(|story| story.story_id != story_id);
        Ok(())
    }

    /// Wipe the local favorites cache.
    ///
    /// Deliberately local-only: the remote favorite records survive for
    /// the next login. Used on logout.
    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
    }

    // -- Own stories --

    /// Record a story this user just submitted, newest first.
    ///
    /// Local bookkeeping only: the server already recorded ownership when
    /// it accepted the story.
    pub fn record_own_story(&mut self, story: Story) {
        self.own_stories.insert(0, story);
    }

    /// Drop every trace of `story_id` from this user's collections.
    pub(crate) fn evict(&mut self, story_id: &str) {
        self.own_stories.retain(|story| story.story_id != story_id);
        self.favorites.retain(|story| story.story_id != story_id);
    }

    pub fn is_favorite(&self, story_id: &str) -> bool {
        self.favorites
            .iter()
            .any(|story| story.story_id == story_id)
    }

    /// Whether this user submitted `story_id`, and may therefore delete
    /// it.
    pub fn owns(&self, story_id: &str) -> bool {
        self.own_stories
            .iter()
            .any(|story| story.story_id == story_id)
    }
}
