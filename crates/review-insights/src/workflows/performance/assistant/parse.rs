use std::collections::BTreeMap;

use serde::Deserialize;

use crate::workflows::performance::narrative::HighlightNarrative;
use crate::workflows::performance::ratings::{Criterion, PerformanceRating, RatingLevel};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply contained no usable content")]
    Empty,
    #[error("unknown criterion `{0}`")]
    UnknownCriterion(String),
    #[error("criterion `{}` rated more than once", .0.label())]
    DuplicateCriterion(Criterion),
    #[error("criterion `{}` is missing", .0.label())]
    MissingCriterion(Criterion),
    #[error("score {score} for `{}` is outside 1-4", .criterion.label())]
    ScoreOutOfRange { criterion: Criterion, score: f64 },
    #[error("rating `{label}` does not match score for `{}`", .criterion.label())]
    LabelMismatch { criterion: Criterion, label: String },
    #[error("criterion `{}` has no evidence", .0.label())]
    MissingEvidence(Criterion),
}

/// Strip a surrounding Markdown code fence, with or without a language tag.
pub(crate) fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

pub(crate) fn string_list(reply: &str) -> Result<Vec<String>, ParseError> {
    let items: Vec<String> = serde_json::from_str(strip_code_fence(reply))?;
    let items: Vec<String> = items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(items)
}

pub(crate) fn plain_text(reply: &str) -> Result<String, ParseError> {
    let text = strip_code_fence(reply);
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(text.to_string())
}

pub(crate) fn highlights(reply: &str) -> Result<HighlightNarrative, ParseError> {
    let narrative: HighlightNarrative = serde_json::from_str(strip_code_fence(reply))?;
    if narrative.summary.trim().is_empty() && narrative.standout_achievements.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(narrative)
}

#[derive(Debug, Deserialize)]
struct RatingReply {
    criterion: String,
    score: f64,
    rating: String,
    #[serde(default)]
    evidence: Vec<String>,
}

/// Validate generated ratings: each criterion exactly once, scores 1-4 with matching labels.
pub(crate) fn ratings(reply: &str) -> Result<Vec<PerformanceRating>, ParseError> {
    let replies: Vec<RatingReply> = serde_json::from_str(strip_code_fence(reply))?;

    let mut rated: BTreeMap<Criterion, PerformanceRating> = BTreeMap::new();
    for reply in replies {
        let criterion = Criterion::from_label(&reply.criterion)
            .ok_or_else(|| ParseError::UnknownCriterion(reply.criterion.clone()))?;
        if rated.contains_key(&criterion) {
            return Err(ParseError::DuplicateCriterion(criterion));
        }

        let level = (reply.score.fract() == 0.0 && (1.0..=4.0).contains(&reply.score))
            .then(|| RatingLevel::from_score(reply.score as u8))
            .flatten()
            .ok_or(ParseError::ScoreOutOfRange {
                criterion,
                score: reply.score,
            })?;
        if RatingLevel::from_label(&reply.rating) != Some(level) {
            return Err(ParseError::LabelMismatch {
                criterion,
                label: reply.rating,
            });
        }

        let evidence: Vec<String> = reply
            .evidence
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        if evidence.is_empty() {
            return Err(ParseError::MissingEvidence(criterion));
        }

        rated.insert(criterion, PerformanceRating::new(criterion, level, evidence));
    }

    Criterion::ordered()
        .into_iter()
        .map(|criterion| {
            rated
                .remove(&criterion)
                .ok_or(ParseError::MissingCriterion(criterion))
        })
        .collect()
}
