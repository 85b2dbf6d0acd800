//! In-memory post store - used when no database is wired in (tests, local runs).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::store::{PostStore, StoreError};
use crate::models::post::{NewPost, Post, PostStatus};

/// Post records kept in a `BTreeMap` behind an async `RwLock`.
///
/// Data is lost on process restart.
pub struct MemoryPostStore {
    posts: RwLock<BTreeMap<i64, Post>>,
    next_id: AtomicI64,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Stores a new post created at `now` and returns it with its assigned id.
    pub async fn insert(&self, new_post: NewPost, now: DateTime<Utc>) -> Post {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let post = Post {
            id,
            user_id: new_post.user_id,
            caption: new_post.caption,
            description: new_post.description,
            image_url: new_post.image_url,
            scheduled_at: new_post.scheduled_at,
            is_scheduled: new_post.status == PostStatus::Scheduled,
            status: new_post.status,
            allow_comments: new_post.allow_comments,
            hide_like_counts: new_post.hide_like_counts,
            is_private: new_post.is_private,
            created_at: now,
            updated_at: now,
        };

        self.posts.write().await.insert(id, post.clone());
        post
    }

    pub async fn get(&self, id: i64) -> Option<Post> {
        self.posts.read().await.get(&id).cloned()
    }

    pub async fn all(&self) -> Vec<Post> {
        self.posts.read().await.values().cloned().collect()
    }
}

impl Default for MemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        let mut due: Vec<Post> = posts.values().filter(|p| p.is_due(now)).cloned().collect();
        due.sort_by_key(|p| (p.scheduled_at, p.id));
        Ok(due)
    }

    async fn publish(&self, post: &Post) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post.id) {
            Some(stored) if stored.status == PostStatus::Scheduled => {
                stored.status = PostStatus::Published;
                stored.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
