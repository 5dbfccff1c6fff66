use serde::{Deserialize, Serialize};

use super::quality::ScoredNote;

/// Quality bucket used when browsing notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFilter {
    #[default]
    All,
    Excellent,
    Good,
    Average,
    Below,
}

impl QualityFilter {
    pub fn accepts(self, score: u8) -> bool {
        match self {
            QualityFilter::All => true,
            QualityFilter::Excellent => score >= 80,
            QualityFilter::Good => (65..80).contains(&score),
            QualityFilter::Average => (50..65).contains(&score),
            QualityFilter::Below => score < 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteReviewQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub quality: QualityFilter,
}

impl NoteReviewQuery {
    /// Matching notes, highest overall score first.
    pub fn apply<'a>(&self, notes: &'a [ScoredNote]) -> Vec<&'a ScoredNote> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<&ScoredNote> = notes
            .iter()
            .filter(|scored| match &needle {
                Some(needle) => {
                    scored.note.text.to_lowercase().contains(needle)
                        || scored.note.member.name.to_lowercase().contains(needle)
                }
                None => true,
            })
            .filter(|scored| self.quality.accepts(scored.overall_score()))
            .collect();

        matched.sort_by(|a, b| b.overall_score().cmp(&a.overall_score()));
        matched
    }
}

/// Headline counts shown above a note listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteReviewSummary {
    pub total: usize,
    pub average_quality: f64,
    pub excellent: usize,
    pub needs_attention: usize,
}

impl NoteReviewSummary {
    pub fn from_notes(notes: &[ScoredNote]) -> Self {
        let total = notes.len();
        let average_quality = if total == 0 {
            0.0
        } else {
            notes
                .iter()
                .map(|scored| f64::from(scored.overall_score()))
                .sum::<f64>()
                / total as f64
        };

        Self {
            total,
            average_quality,
            excellent: notes
                .iter()
                .filter(|scored| scored.overall_score() >= 80)
                .count(),
            needs_attention: notes
                .iter()
                .filter(|scored| scored.overall_score() < 50)
                .count(),
        }
    }
}
