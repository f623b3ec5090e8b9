use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A story URL that is not a parseable absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an absolute url: {url}")]
pub struct MalformedUrl {
    pub url: String,
}

/// One submitted news story.
///
/// The server assigns `story_id` and `created_at` on creation; the record
/// never changes afterwards. Removal means evicting the value from
/// whichever collection held it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub story_id: String,
    pub title: String,
    pub author: String,
    /// Submitter's username, not the byline author.
    pub username: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl Story {
    /// Host component of the story URL, for display next to the title.
    ///
    /// Computed on demand; construction does not validate the URL, so a
    /// malformed one surfaces here and propagates to the caller.
    pub fn host_name(&self) -> Result<String, MalformedUrl> {
        let parsed = url::Url::parse(&self.url).map_err(|_| MalformedUrl {
            url: self.url.clone(),
        })?;
        parsed
            .host_str()
            .map(str::to_owned)
            .ok_or_else(|| MalformedUrl {
                url: self.url.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story_with_url(url: &str) -> Story {
        Story {
            story_id: "s1".into(),
            title: "A headline".into(),
            author: "Ann Author".into(),
            username: "ann".into(),
            url: url.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn host_name_returns_host() {
        let story = story_with_url("https://news.example.com/2026/08/post?ref=feed");
        assert_eq!(story.host_name().unwrap(), "news.example.com");
    }

    #[test]
    fn host_name_rejects_relative_url() {
        let story = story_with_url("/2026/08/post");
        assert!(story.host_name().is_err());
    }

    #[test]
    fn host_name_rejects_url_without_host() {
        // Parses as a URL, but has no host component.
        let story = story_with_url("mailto:ann@example.com");
        let err = story.host_name().unwrap_err();
        assert_eq!(err.url, "mailto:ann@example.com");
    }

    #[test]
    fn story_parses_camel_case_wire_names() {
        let story: Story = serde_json::from_str(
            r#"{
                "storyId": "abc-123",
                "title": "A headline",
                "author": "Ann Author",
                "username": "ann",
                "url": "https://example.com/post",
                "createdAt": "2026-08-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(story.story_id, "abc-123");
        assert_eq!(story.username, "ann");
    }
}
