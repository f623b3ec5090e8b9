use kindling_types::api::{
    CreateStoryRequest, StoriesResponse, StoryDraft, StoryEnvelope, TokenBody,
};
use kindling_types::models::Story;
use tracing::debug;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::users::User;

/// The story feed: an ordered snapshot of the remote feed, newest-first
/// after local inserts.
///
/// Membership mirrors the server as of the last fetch or mutation. The
/// feed itself performs no deduplication; the server owns identity.
#[derive(Debug, Default)]
pub struct StoryList {
    pub stories: Vec<Story>,
}

impl StoryList {
    /// Fetch the full remote feed, preserving server order.
    ///
    /// The read is idempotent, so one immediate retry is allowed after a
    /// transport failure. Writes are never retried.
    pub async fn fetch_all(client: &ApiClient) -> Result<Self, ApiError> {
        let response: StoriesResponse = match client.get_json("stories").await {
            Err(ApiError::Network(err)) => {
                debug!("retrying feed fetch after transport error: {err}");
                client.get_json("stories").await?
            }
            other => other?,
        };
        Ok(Self {
            stories: response.stories,
        })
    }

    /// Submit a new story as `user`.
    ///
    /// The server assigns the id and timestamp; only once it confirms is
    /// the story inserted at the front of the feed and of the user's own
    /// stories. On failure nothing local changes.
    pub async fn add_story(
        &mut self,
        client: &ApiClient,
        user: &mut User,
        draft: StoryDraft,
    ) -> Result<Story, ApiError> {
        let request = CreateStoryRequest {
            token: user.token().to_owned(),
            story: draft,
        };
        let envelope: StoryEnvelope = client.post_json("stories", &request).await?;
        let story = envelope.story;
        self.stories.insert(0, story.clone());
        user.record_own_story(story.clone());
        Ok(story)
    }

    /// Delete `story_id` on the server, then evict it everywhere locally.
    ///
    /// The story may be a favorite of the very user deleting it, so the
    /// feed and both user collections are swept. Locally idempotent: once
    /// the remote delete succeeds, an id absent from every collection is
    /// a no-op. On remote failure local state is left untouched.
    pub async fn remove_story(
        &mut self,
        client: &ApiClient,
        user: &mut User,
        story_id: &str,
    ) -> Result<(), ApiError> {
        let body = TokenBody {
            token: user.token().to_owned(),
        };
        client
            .delete_unit(&format!("stories/{story_id}"), &body)
            .await?;
        self.stories.retain(|story| story.story_id != story_id);
        user.evict(story_id);
        Ok(())
    }

    pub fn get(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|story| story.story_id == story_id)
    }

    pub fn contains(&self, story_id: &str) -> bool {
        self.get(story_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}
