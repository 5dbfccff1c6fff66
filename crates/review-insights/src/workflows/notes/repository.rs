use std::collections::BTreeMap;

use super::domain::ManualReview;
use crate::workflows::records::{MemberId, NoteId};

/// Keyed store of reviewer annotations, partitioned per member.
pub trait ManualReviewRepository: Send + Sync {
    fn save(
        &self,
        member_id: MemberId,
        note_id: NoteId,
        review: ManualReview,
    ) -> Result<(), RepositoryError>;
    fn for_member(
        &self,
        member_id: MemberId,
    ) -> Result<BTreeMap<NoteId, ManualReview>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
