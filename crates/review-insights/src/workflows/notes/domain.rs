use serde::{Deserialize, Serialize};

pub const MIN_MANUAL_RATING: u8 = 1;
pub const MAX_MANUAL_RATING: u8 = 10;

/// Reviewer-entered rating (1-10) and optional comments for a single note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ManualReviewInput")]
pub struct ManualReview {
    rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<String>,
}

impl ManualReview {
    pub fn new(rating: u8, comments: Option<String>) -> Result<Self, ManualReviewError> {
        if !(MIN_MANUAL_RATING..=MAX_MANUAL_RATING).contains(&rating) {
            return Err(ManualReviewError::RatingOutOfRange(rating));
        }

        let comments = comments
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Self { rating, comments })
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct ManualReviewInput {
    rating: u8,
    #[serde(default)]
    comments: Option<String>,
}

impl TryFrom<ManualReviewInput> for ManualReview {
    type Error = ManualReviewError;

    fn try_from(value: ManualReviewInput) -> Result<Self, Self::Error> {
        Self::new(value.rating, value.comments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManualReviewError {
    #[error("manual rating must be between 1 and 10 (got {0})")]
    RatingOutOfRange(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ratings_outside_scale() {
        assert_eq!(
            ManualReview::new(0, None),
            Err(ManualReviewError::RatingOutOfRange(0))
        );
        assert_eq!(
            ManualReview::new(11, None),
            Err(ManualReviewError::RatingOutOfRange(11))
        );
        assert!(ManualReview::new(10, None).is_ok());
    }

    #[test]
    fn blank_comments_are_dropped() {
        let review = ManualReview::new(7, Some("   ".to_string())).expect("valid review");
        assert_eq!(review.comments(), None);
    }

    #[test]
    fn deserialization_validates_rating() {
        let err = serde_json::from_str::<ManualReview>(r#"{ "rating": 12 }"#)
            .expect_err("out of range rejected");
        assert!(err.to_string().contains("between 1 and 10"));
    }
}
