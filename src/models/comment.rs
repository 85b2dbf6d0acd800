use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::reply::ReplyResponse;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating or editing a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub content: String,
}

/// DTO for displaying a comment with author info.
#[derive(Debug, Serialize, FromRow)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A comment with its replies, as shown on the post page.
#[derive(Debug, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<ReplyResponse>,
}

impl CommentThread {
    /// Attaches each reply to its comment. Comment order is kept, and replies
    /// keep the order they arrive in. Replies whose comment is not in
    /// `comments` are dropped.
    pub fn nest(comments: Vec<CommentResponse>, replies: Vec<ReplyResponse>) -> Vec<Self> {
        let mut by_comment: HashMap<i64, Vec<ReplyResponse>> = HashMap::new();
        for reply in replies {
            by_comment.entry(reply.comment_id).or_default().push(reply);
        }

        comments
            .into_iter()
            .map(|comment| CommentThread {
                replies: by_comment.remove(&comment.id).unwrap_or_default(),
                comment,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn comment(id: i64) -> CommentResponse {
        CommentResponse {
            id,
            post_id: 1,
            user_id: 10,
            username: "ada".to_string(),
            content: format!("comment {id}"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn reply(id: i64, comment_id: i64) -> ReplyResponse {
        ReplyResponse {
            id,
            post_id: 1,
            comment_id,
            user_id: 11,
            username: "grace".to_string(),
            content: format!("reply {id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn replies_land_under_their_comment_in_order() {
        let threads = CommentThread::nest(
            vec![comment(1), comment(2), comment(3)],
            vec![reply(10, 2), reply(11, 1), reply(12, 2)],
        );

        let shape: Vec<(i64, Vec<i64>)> = threads
            .iter()
            .map(|t| (t.comment.id, t.replies.iter().map(|r| r.id).collect()))
            .collect();
        assert_eq!(shape, vec![(1, vec![11]), (2, vec![10, 12]), (3, vec![])]);
    }

    #[test]
    fn orphan_replies_are_dropped() {
        let threads = CommentThread::nest(vec![comment(1)], vec![reply(10, 99)]);

        assert_eq!(threads.len(), 1);
        assert!(threads[0].replies.is_empty());
    }

    #[test]
    fn thread_serializes_flat_with_nested_replies() {
        let threads = CommentThread::nest(vec![comment(1)], vec![reply(10, 1)]);
        let json = serde_json::to_value(&threads[0]).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "ada");
        assert_eq!(json["replies"][0]["username"], "grace");
    }
}
