use super::common::*;
use crate::workflows::notes::domain::ManualReviewError;
use crate::workflows::notes::repository::ManualReviewRepository;
use crate::workflows::notes::{NoteReviewError, NoteReviewService};
use crate::workflows::records::{MemberId, NoteId};
use std::sync::Arc;

#[test]
fn review_overlays_stored_ratings_without_touching_scores() {
    let (service, _) = build_service();
    let baseline = service
        .review(MemberId(42), sample_notes())
        .expect("review succeeds");

    service
        .rate(
            MemberId(42),
            NoteId(2),
            9,
            Some("  Clear handoff  ".to_string()),
        )
        .expect("rating accepted");

    let reviewed = service
        .review(MemberId(42), sample_notes())
        .expect("review succeeds");

    let detailed = reviewed
        .iter()
        .find(|entry| entry.note.id == NoteId(2))
        .expect("detailed note present");
    assert_eq!(detailed.quality.manual_rating, Some(9));
    assert_eq!(
        detailed.quality.manual_comments.as_deref(),
        Some("Clear handoff")
    );

    for (before, after) in baseline.iter().zip(reviewed.iter()) {
        assert_eq!(before.quality.breakdown(), after.quality.breakdown());
    }
    assert!(reviewed
        .iter()
        .filter(|entry| entry.note.id != NoteId(2))
        .all(|entry| entry.quality.manual_rating.is_none()));
}

#[test]
fn ratings_are_partitioned_by_member() {
    let (service, repository) = build_service();
    service
        .rate(MemberId(7), NoteId(2), 4, None)
        .expect("rating accepted");

    let reviewed = service
        .review(MemberId(42), sample_notes())
        .expect("review succeeds");
    assert!(reviewed
        .iter()
        .all(|entry| entry.quality.manual_rating.is_none()));
    assert_eq!(
        repository
            .for_member(MemberId(7))
            .expect("lookup succeeds")
            .len(),
        1
    );
}

#[test]
fn rate_rejects_out_of_range_ratings_before_saving() {
    let (service, repository) = build_service();

    match service.rate(MemberId(42), NoteId(1), 0, None) {
        Err(NoteReviewError::InvalidReview(ManualReviewError::RatingOutOfRange(0))) => {}
        other => panic!("expected invalid review, got {other:?}"),
    }
    assert!(repository
        .reviews
        .lock()
        .expect("repository mutex poisoned")
        .is_empty());
}

#[test]
fn repository_failures_propagate() {
    let service = NoteReviewService::new(Arc::new(UnavailableRepository));

    assert!(matches!(
        service.review(MemberId(42), sample_notes()),
        Err(NoteReviewError::Repository(_))
    ));
    assert!(matches!(
        service.rate(MemberId(42), NoteId(1), 5, None),
        Err(NoteReviewError::Repository(_))
    ));
}
