use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::notes::domain::ManualReview;
use crate::workflows::notes::repository::{ManualReviewRepository, RepositoryError};
use crate::workflows::notes::{notes_router, NoteReviewService};
use crate::workflows::records::{MemberId, MemberRef, Note, NoteId, TicketId};

pub(super) const DETAILED_NOTE: &str = "Summary of work on 2024-03-04:\n\
- Diagnosed the failing backup job on server 12 and verified the storage quota.\n\
- Configured retention, tested a restore and documented the steps for the team.\n\
Next steps: follow up with the client once the nightly run has completed.";

pub(super) fn member() -> MemberRef {
    MemberRef {
        id: MemberId(42),
        identifier: "jdoe".to_string(),
        name: "Jane Doe".to_string(),
    }
}

pub(super) fn note(id: u64, text: &str) -> Note {
    Note {
        id: NoteId(id),
        text: text.to_string(),
        date_created: Utc
            .with_ymd_and_hms(2024, 3, 4, 15, 30, 0)
            .single()
            .expect("valid timestamp"),
        ticket_id: Some(TicketId(900 + id)),
        project_id: None,
        member: member(),
        internal_flag: false,
    }
}

pub(super) fn sample_notes() -> Vec<Note> {
    vec![
        note(1, "called user"),
        note(2, DETAILED_NOTE),
        note(3, "Rebooted the router. Checked the link. All good."),
    ]
}

pub(super) fn build_service() -> (NoteReviewService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = NoteReviewService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) reviews: Arc<Mutex<HashMap<(MemberId, NoteId), ManualReview>>>,
}

impl ManualReviewRepository for MemoryRepository {
    fn save(
        &self,
        member_id: MemberId,
        note_id: NoteId,
        review: ManualReview,
    ) -> Result<(), RepositoryError> {
        self.reviews
            .lock()
            .expect("repository mutex poisoned")
            .insert((member_id, note_id), review);
        Ok(())
    }

    fn for_member(
        &self,
        member_id: MemberId,
    ) -> Result<BTreeMap<NoteId, ManualReview>, RepositoryError> {
        let guard = self.reviews.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|((member, _), _)| *member == member_id)
            .map(|((_, note), review)| (*note, review.clone()))
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl ManualReviewRepository for UnavailableRepository {
    fn save(
        &self,
        _member_id: MemberId,
        _note_id: NoteId,
        _review: ManualReview,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_member(
        &self,
        _member_id: MemberId,
    ) -> Result<BTreeMap<NoteId, ManualReview>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn notes_router_with_service(
    service: NoteReviewService<MemoryRepository>,
) -> axum::Router {
    notes_router(Arc::new(service))
}
