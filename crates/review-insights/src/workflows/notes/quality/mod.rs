//! Heuristic note-quality scoring.
//!
//! A note earns up to 100 points across four sub-scores: length (25),
//! detail (30), structure (25) and structural keywords (20). Sub-scores are
//! rounded individually and the overall score is their capped sum, so the
//! result is reproducible from the note text alone.

mod classifier;
mod rules;

pub use classifier::{classify, QualityBand, QualityClassification, QualityLabel};

use super::domain::ManualReview;
use crate::workflows::records::{Note, NoteId};
use serde::{Deserialize, Serialize};

/// Rounded sub-scores and overall score for a piece of note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub length_score: u8,
    pub detail_score: u8,
    pub structure_score: u8,
    pub keyword_score: u8,
    pub overall_score: u8,
}

impl QualityBreakdown {
    pub fn classification(&self) -> QualityClassification {
        classify(f64::from(self.overall_score))
    }
}

/// Automated quality score for a note plus optional reviewer annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteQualityScore {
    pub note_id: NoteId,
    pub length_score: u8,
    pub detail_score: u8,
    pub structure_score: u8,
    pub keyword_score: u8,
    pub overall_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_comments: Option<String>,
}

impl NoteQualityScore {
    pub fn breakdown(&self) -> QualityBreakdown {
        QualityBreakdown {
            length_score: self.length_score,
            detail_score: self.detail_score,
            structure_score: self.structure_score,
            keyword_score: self.keyword_score,
            overall_score: self.overall_score,
        }
    }

    pub fn classification(&self) -> QualityClassification {
        classify(f64::from(self.overall_score))
    }

    /// Attach a reviewer's rating and comments. Automated fields are untouched.
    pub fn with_manual_review(mut self, review: &ManualReview) -> Self {
        self.manual_rating = Some(review.rating());
        self.manual_comments = review.comments().map(str::to_string);
        self
    }
}

/// A note paired with its computed quality score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredNote {
    pub note: Note,
    pub quality: NoteQualityScore,
}

impl ScoredNote {
    pub fn overall_score(&self) -> u8 {
        self.quality.overall_score
    }
}

pub fn score_text(text: &str) -> QualityBreakdown {
    let raw = rules::score_text(text);

    let length_score = round_component(raw.length, rules::MAX_LENGTH_SCORE);
    let detail_score = round_component(raw.detail, rules::MAX_DETAIL_SCORE);
    let structure_score = round_component(raw.structure, rules::MAX_STRUCTURE_SCORE);
    let keyword_score = round_component(raw.keyword, rules::MAX_KEYWORD_SCORE);

    let total = u16::from(length_score)
        + u16::from(detail_score)
        + u16::from(structure_score)
        + u16::from(keyword_score);

    QualityBreakdown {
        length_score,
        detail_score,
        structure_score,
        keyword_score,
        overall_score: total.min(100) as u8,
    }
}

pub fn compute_note_quality(note: &Note) -> NoteQualityScore {
    let breakdown = score_text(&note.text);

    NoteQualityScore {
        note_id: note.id,
        length_score: breakdown.length_score,
        detail_score: breakdown.detail_score,
        structure_score: breakdown.structure_score,
        keyword_score: breakdown.keyword_score,
        overall_score: breakdown.overall_score,
        manual_rating: None,
        manual_comments: None,
    }
}

pub fn score_notes<I>(notes: I) -> Vec<ScoredNote>
where
    I: IntoIterator<Item = Note>,
{
    notes
        .into_iter()
        .map(|note| {
            let quality = compute_note_quality(&note);
            ScoredNote { note, quality }
        })
        .collect()
}

fn round_component(value: f64, ceiling: f64) -> u8 {
    value.clamp(0.0, ceiling).round() as u8
}
