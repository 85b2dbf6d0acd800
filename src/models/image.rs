use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::post::validate_image_url;

/// Extra image attached to a post, in the 'images' table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub image_url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImageRequest {
    #[validate(custom(function = "validate_image_url"))]
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_request_requires_http_url() {
        let ok = ImageRequest {
            image_url: "https://img.example.com/extra.jpg".to_string(),
        };
        assert!(ok.validate().is_ok());

        for bad in ["", "not a url", "javascript:alert(1)"] {
            let req = ImageRequest {
                image_url: bad.to_string(),
            };
            assert!(req.validate().is_err(), "{bad:?} should be rejected");
        }
    }
}
