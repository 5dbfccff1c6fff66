use std::sync::Arc;

use tracing::debug;

use super::domain::{ManualReview, ManualReviewError};
use super::quality::{score_notes, ScoredNote};
use super::repository::{ManualReviewRepository, RepositoryError};
use crate::workflows::records::{MemberId, Note, NoteId};

/// Service composing the quality scorer with the manual review store.
pub struct NoteReviewService<R> {
    repository: Arc<R>,
}

impl<R> NoteReviewService<R>
where
    R: ManualReviewRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Score a member's notes and overlay any stored reviewer annotations.
    pub fn review(
        &self,
        member_id: MemberId,
        notes: Vec<Note>,
    ) -> Result<Vec<ScoredNote>, NoteReviewError> {
        let reviews = self.repository.for_member(member_id)?;
        let mut scored = score_notes(notes);

        for entry in &mut scored {
            if let Some(review) = reviews.get(&entry.note.id) {
                entry.quality = entry.quality.clone().with_manual_review(review);
            }
        }

        debug!(
            member = %member_id,
            notes = scored.len(),
            annotated = reviews.len(),
            "scored member notes"
        );
        Ok(scored)
    }

    /// Validate and persist a reviewer rating for one note.
    pub fn rate(
        &self,
        member_id: MemberId,
        note_id: NoteId,
        rating: u8,
        comments: Option<String>,
    ) -> Result<ManualReview, NoteReviewError> {
        let review = ManualReview::new(rating, comments)?;
        self.repository.save(member_id, note_id, review.clone())?;
        Ok(review)
    }
}

/// Error raised by the note review service.
#[derive(Debug, thiserror::Error)]
pub enum NoteReviewError {
    #[error(transparent)]
    InvalidReview(#[from] ManualReviewError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
