use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use validator::{Validate, ValidationError};

use super::comment::CommentThread;

/// Publication lifecycle of a post.
///
/// `scheduled -> published` is the only transition the publisher performs.
/// Drafts and published posts are never touched by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    /// Status a post starts in when it is created at `now`.
    ///
    /// Only a `scheduled_at` strictly in the future defers publication.
    pub fn initial(draft: bool, scheduled_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        if draft {
            return PostStatus::Draft;
        }
        match scheduled_at {
            Some(at) if at > now => PostStatus::Scheduled,
            _ => PostStatus::Published,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown post status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PostStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for PostStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Column list matching `Post`, for `query_as` selects.
pub const POST_COLUMNS: &str = "id, user_id, caption, description, image_url, scheduled_at, \
     status, allow_comments, hide_like_counts, is_private, is_scheduled, created_at, updated_at";

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub caption: String,
    pub description: String,
    pub image_url: String,

    /// When the post becomes visible. `None` for posts published on creation.
    pub scheduled_at: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: PostStatus,

    pub allow_comments: bool,
    pub hide_like_counts: bool,
    pub is_private: bool,
    pub is_scheduled: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// A post is due once it is scheduled and its time has come.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Scheduled && self.scheduled_at.is_some_and(|at| at <= now)
    }
}

/// A validated post ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub caption: String,
    pub description: String,
    pub image_url: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: PostStatus,
    pub allow_comments: bool,
    pub hide_like_counts: bool,
    pub is_private: bool,
}

/// DTO for creating a new post.
///
/// `scheduled_at` accepts any RFC 3339 offset and is normalized to UTC.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(
        min = 1,
        max = 2200,
        message = "Caption length must be between 1 and 2200 chars"
    ))]
    pub caption: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 chars"))]
    pub description: String,

    #[validate(custom(function = "validate_image_url"))]
    pub image_url: String,

    pub scheduled_at: Option<DateTime<Utc>>,

    /// Keep the post as a draft regardless of `scheduled_at`.
    #[serde(default)]
    pub draft: bool,

    #[serde(default = "default_true")]
    pub allow_comments: bool,
    #[serde(default)]
    pub hide_like_counts: bool,
    #[serde(default)]
    pub is_private: bool,
}

fn default_true() -> bool {
    true
}

impl CreatePostRequest {
    pub fn into_new_post(self, user_id: i64, now: DateTime<Utc>) -> NewPost {
        let status = PostStatus::initial(self.draft, self.scheduled_at, now);
        NewPost {
            user_id,
            caption: self.caption,
            description: self.description,
            image_url: self.image_url,
            scheduled_at: self.scheduled_at,
            status,
            allow_comments: self.allow_comments,
            hide_like_counts: self.hide_like_counts,
            is_private: self.is_private,
        }
    }
}

/// DTO for updating a post. Status and schedule are not editable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 2200))]
    pub caption: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_image_url"))]
    pub image_url: Option<String>,
    pub allow_comments: Option<bool>,
    pub hide_like_counts: Option<bool>,
    pub is_private: Option<bool>,
}

/// Query parameters for the feed (infinite scroll).
#[derive(Debug, Deserialize)]
pub struct PostListParams {
    /// ID of the last post already loaded.
    pub last_post_id: Option<i64>,

    /// Number of items to return (default: 10, max: 100).
    pub limit: Option<i64>,
}

/// Image references must be absolute http(s) URLs.
pub fn validate_image_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("image_url")
            .with_message("Invalid Image URL format".into())),
    }
}

/// A published post as it appears in the feed: the row plus its author and
/// counters. `like_count` is `None` when the author hides like counts.
#[derive(Debug, Serialize, FromRow)]
pub struct FeedPost {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub post: Post,
    pub username: String,
    pub like_count: Option<i64>,
    pub comment_count: i64,
}

/// Post page: the feed entry plus its comment threads.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: FeedPost,
    pub comments: Vec<CommentThread>,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn future_schedule_defers_publication() {
        let now = Utc::now();
        let status = PostStatus::initial(false, Some(now + Duration::hours(1)), now);
        assert_eq!(status, PostStatus::Scheduled);
    }

    #[test]
    fn past_or_missing_schedule_publishes_immediately() {
        let now = Utc::now();
        assert_eq!(
            PostStatus::initial(false, Some(now - Duration::hours(1)), now),
            PostStatus::Published
        );
        assert_eq!(PostStatus::initial(false, Some(now), now), PostStatus::Published);
        assert_eq!(PostStatus::initial(false, None, now), PostStatus::Published);
    }

    #[test]
    fn draft_wins_over_schedule() {
        let now = Utc::now();
        let status = PostStatus::initial(true, Some(now + Duration::hours(1)), now);
        assert_eq!(status, PostStatus::Draft);
    }

    #[test]
    fn status_parses_its_own_text() {
        for status in [PostStatus::Draft, PostStatus::Scheduled, PostStatus::Published] {
            assert_eq!(status.as_str().parse::<PostStatus>().unwrap(), status);
        }
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn scheduled_at_is_normalized_to_utc() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "caption": "sunset",
            "image_url": "https://img.example.com/1.jpg",
            "scheduled_at": "2030-01-01T12:00:00+02:00"
        }))
        .unwrap();

        assert_eq!(
            req.scheduled_at.unwrap().to_rfc3339(),
            "2030-01-01T10:00:00+00:00"
        );
    }

    #[test]
    fn image_url_must_be_absolute_http() {
        assert!(validate_image_url("https://img.example.com/a.png").is_ok());
        assert!(validate_image_url("not a url").is_err());
        assert!(validate_image_url("ftp://files.example.com/a.png").is_err());
    }

    #[test]
    fn empty_caption_fails_validation() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "caption": "",
            "image_url": "https://img.example.com/1.jpg"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn feed_post_serializes_flat() {
        let now = Utc::now();
        let feed = FeedPost {
            post: Post {
                id: 7,
                user_id: 1,
                caption: "lake".to_string(),
                description: String::new(),
                image_url: "https://img.example.com/lake.jpg".to_string(),
                scheduled_at: None,
                status: PostStatus::Published,
                allow_comments: true,
                hide_like_counts: true,
                is_private: false,
                is_scheduled: false,
                created_at: now,
                updated_at: now,
            },
            username: "ada".to_string(),
            like_count: None,
            comment_count: 2,
        };

        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["status"], "published");
        assert_eq!(json["username"], "ada");
        assert!(json["like_count"].is_null());
        assert_eq!(json["comment_count"], 2);
    }
}
