use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in 'follows': `follower_id` follows `following_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Follow {
    pub id: i64,
    pub follower_id: i64,
    pub following_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFollowRequest {
    pub following_id: i64,
}

/// One side of a follow relationship, joined with the username.
#[derive(Debug, Serialize, FromRow)]
pub struct FollowEntry {
    pub user_id: i64,
    pub username: String,
    pub followed_at: chrono::DateTime<chrono::Utc>,
}

/// Page-based pagination for follower lists.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// `(page, limit, offset)` with page >= 1 and limit in 1..=100 (default 20).
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        (page, limit, (page - 1).saturating_mul(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_default_and_clamp() {
        let params = PageParams { page: None, limit: None };
        assert_eq!(params.resolve(), (1, 20, 0));

        let params = PageParams { page: Some(3), limit: Some(500) };
        assert_eq!(params.resolve(), (3, 100, 200));

        let params = PageParams { page: Some(-2), limit: Some(0) };
        assert_eq!(params.resolve(), (1, 1, 0));
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let params = PageParams { page: Some(i64::MAX), limit: Some(100) };
        let (page, limit, offset) = params.resolve();

        assert_eq!((page, limit), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);
    }
}
