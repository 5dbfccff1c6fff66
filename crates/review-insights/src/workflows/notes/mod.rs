//! Note quality review: heuristic scoring, reviewer ratings and browsing.
//!
//! Scores are recomputed from the note text on every request. Reviewer
//! annotations live beside the automated score and never change it.

pub mod domain;
pub mod filter;
pub mod quality;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ManualReview, ManualReviewError, MAX_MANUAL_RATING, MIN_MANUAL_RATING};
pub use filter::{NoteReviewQuery, NoteReviewSummary, QualityFilter};
pub use quality::{
    classify, compute_note_quality, score_notes, score_text, NoteQualityScore, QualityBand,
    QualityBreakdown, QualityClassification, QualityLabel, ScoredNote,
};
pub use repository::{ManualReviewRepository, RepositoryError};
pub use router::notes_router;
pub use service::{NoteReviewError, NoteReviewService};
