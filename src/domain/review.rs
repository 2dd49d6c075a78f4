use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Active,
    Hidden,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub movie_id: String,
    pub movie_title: String,
    pub user_id: String,
    pub user_name: String,
    /// Whole stars, 1 through 5.
    pub rating: u8,
    pub content: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
    #[serde(default)]
    pub replies_count: u32,
    #[serde(default)]
    pub verified_watched: bool,
    pub status: ReviewStatus,
    #[serde(with = "super::instant", default = "super::now")]
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(crate::CinemaAdminError::validation(
                "rating",
                format!("rating {} outside 1..=5", self.rating),
            ));
        }
        Ok(())
    }

    /// ACTIVE reviews hide, HIDDEN reviews reactivate; anything else is
    /// left alone.
    pub fn toggled_status(&self) -> ReviewStatus {
        match self.status {
            ReviewStatus::Active => ReviewStatus::Hidden,
            ReviewStatus::Hidden => ReviewStatus::Active,
            ReviewStatus::Deleted => ReviewStatus::Deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn review(rating: u8, status: ReviewStatus) -> Review {
        Review {
            id: "rev_001".to_string(),
            movie_id: "m_002".to_string(),
            movie_title: "Oppenheimer".to_string(),
            user_id: "u_002".to_string(),
            user_name: "Trần Thị B".to_string(),
            rating,
            content: "Phim rất hay!".to_string(),
            likes: 12,
            dislikes: 1,
            replies_count: 3,
            verified_watched: true,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rating_must_be_one_through_five() {
        assert!(review(0, ReviewStatus::Active).validate().is_err());
        assert!(review(6, ReviewStatus::Active).validate().is_err());
        assert!(review(5, ReviewStatus::Active).validate().is_ok());
    }

    #[test]
    fn toggle_flips_between_active_and_hidden() {
        assert_eq!(review(4, ReviewStatus::Active).toggled_status(), ReviewStatus::Hidden);
        assert_eq!(review(4, ReviewStatus::Hidden).toggled_status(), ReviewStatus::Active);
        assert_eq!(review(4, ReviewStatus::Deleted).toggled_status(), ReviewStatus::Deleted);
    }
}
