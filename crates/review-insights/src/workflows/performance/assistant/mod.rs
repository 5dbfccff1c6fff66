//! Review drafting with an optional text-generation backend.
//!
//! `ReviewProvider::Deterministic` returns the rule-based content from
//! `ratings` and `narrative`. `ReviewProvider::Generated` asks a
//! [`TextGenerator`] first and falls back to the rule-based content whenever
//! the generator fails or its reply does not parse. Callers always get a
//! value; the fallback reason travels with it.

mod openai;
mod parse;
mod prompt;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::domain::EmployeeMetrics;
use super::narrative::{
    self, highlight_narrative, FeedbackKind, HighlightNarrative, Highlights,
};
use super::ratings::{derive_ratings, PerformanceRating};
use crate::config::{ReviewConfig, ReviewProviderKind};
use crate::workflows::records::MemberId;

pub use openai::OpenAiTextGenerator;
pub use parse::ParseError;
pub use prompt::Prompt;

/// Backend that turns a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("an API key is required for generated review content")]
    MissingApiKey,
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion response contained no choices")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Deterministic,
    Generated,
}

/// Why generated content was replaced with the rule-based version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    GeneratorFailed(String),
    EmptyReply,
    MalformedReply(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::GeneratorFailed(err) => write!(f, "generator failed: {}", err),
            FallbackReason::EmptyReply => write!(f, "generator returned an empty reply"),
            FallbackReason::MalformedReply(err) => write!(f, "malformed reply: {}", err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutput<T> {
    pub value: T,
    pub source: ContentSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
}

impl<T> ReviewOutput<T> {
    fn deterministic(value: T) -> Self {
        Self {
            value,
            source: ContentSource::Deterministic,
            fallback: None,
        }
    }

    fn generated(value: T) -> Self {
        Self {
            value,
            source: ContentSource::Generated,
            fallback: None,
        }
    }

    fn fallback(value: T, reason: FallbackReason) -> Self {
        Self {
            value,
            source: ContentSource::Deterministic,
            fallback: Some(reason),
        }
    }
}

#[derive(Clone)]
pub enum ReviewProvider {
    Deterministic,
    Generated(Arc<dyn TextGenerator>),
}

impl fmt::Debug for ReviewProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ReviewProvider {
    pub fn from_config(config: &ReviewConfig) -> Result<Self, GenerationError> {
        match config.provider {
            ReviewProviderKind::Deterministic => Ok(Self::Deterministic),
            ReviewProviderKind::Generated => {
                let generator = OpenAiTextGenerator::new(config.llm.clone())?;
                Ok(Self::Generated(Arc::new(generator)))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReviewProvider::Deterministic => "deterministic",
            ReviewProvider::Generated(_) => "generated",
        }
    }

    pub async fn ratings(&self, metrics: &EmployeeMetrics) -> ReviewOutput<Vec<PerformanceRating>> {
        self.generate_or(
            "ratings",
            || prompt::ratings(metrics),
            parse::ratings,
            derive_ratings(metrics),
        )
        .await
    }

    pub async fn accomplishments(&self, metrics: &EmployeeMetrics) -> ReviewOutput<Vec<String>> {
        self.generate_or(
            "accomplishments",
            || prompt::accomplishments(metrics),
            parse::string_list,
            narrative::accomplishments(metrics),
        )
        .await
    }

    pub async fn goals(&self, metrics: &EmployeeMetrics) -> ReviewOutput<Vec<String>> {
        self.generate_or(
            "goals",
            || prompt::goals(metrics),
            parse::string_list,
            narrative::goals(metrics),
        )
        .await
    }

    pub async fn feedback(
        &self,
        kind: FeedbackKind,
        metrics: &EmployeeMetrics,
    ) -> ReviewOutput<String> {
        self.generate_or(
            "feedback",
            || prompt::feedback(kind, metrics),
            parse::plain_text,
            narrative::feedback(kind, metrics),
        )
        .await
    }

    pub async fn highlights(
        &self,
        metrics: &EmployeeMetrics,
        highlights: &Highlights,
    ) -> ReviewOutput<HighlightNarrative> {
        self.generate_or(
            "highlights",
            || prompt::highlights(metrics),
            parse::highlights,
            highlight_narrative(highlights),
        )
        .await
    }

    async fn generate_or<T, B, P>(
        &self,
        topic: &'static str,
        build_prompt: B,
        parse: P,
        fallback: T,
    ) -> ReviewOutput<T>
    where
        B: FnOnce() -> Prompt,
        P: FnOnce(&str) -> Result<T, ParseError>,
    {
        let generator = match self {
            ReviewProvider::Deterministic => return ReviewOutput::deterministic(fallback),
            ReviewProvider::Generated(generator) => generator,
        };

        debug!(topic, "requesting generated review content");
        let reason = match generator.generate(&build_prompt()).await {
            Ok(reply) if reply.trim().is_empty() => FallbackReason::EmptyReply,
            Ok(reply) => match parse(&reply) {
                Ok(value) => return ReviewOutput::generated(value),
                Err(err) => FallbackReason::MalformedReply(err.to_string()),
            },
            Err(err) => FallbackReason::GeneratorFailed(err.to_string()),
        };

        warn!(topic, reason = %reason, "using deterministic review content");
        ReviewOutput::fallback(fallback, reason)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackAnswer {
    pub kind: FeedbackKind,
    pub question: &'static str,
    pub answer: ReviewOutput<String>,
}

/// Everything a reviewer needs to fill in a member's review form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPacket {
    pub member_id: MemberId,
    pub member_name: String,
    pub provider: &'static str,
    pub ratings: ReviewOutput<Vec<PerformanceRating>>,
    pub accomplishments: ReviewOutput<Vec<String>>,
    pub goals: ReviewOutput<Vec<String>>,
    pub feedback: Vec<FeedbackAnswer>,
    pub highlights: Highlights,
    pub highlight_summary: ReviewOutput<HighlightNarrative>,
}

pub async fn build_review(provider: &ReviewProvider, metrics: &EmployeeMetrics) -> ReviewPacket {
    let highlights = narrative::highlights(metrics);

    let (ratings, accomplishments, goals, company, leadership, team, highlight_summary) = tokio::join!(
        provider.ratings(metrics),
        provider.accomplishments(metrics),
        provider.goals(metrics),
        provider.feedback(FeedbackKind::Company, metrics),
        provider.feedback(FeedbackKind::Leadership, metrics),
        provider.feedback(FeedbackKind::Team, metrics),
        provider.highlights(metrics, &highlights),
    );

    let feedback = FeedbackKind::ordered()
        .into_iter()
        .zip([company, leadership, team])
        .map(|(kind, answer)| FeedbackAnswer {
            kind,
            question: kind.question(),
            answer,
        })
        .collect();

    ReviewPacket {
        member_id: metrics.member_id,
        member_name: metrics.member_name.clone(),
        provider: provider.name(),
        ratings,
        accomplishments,
        goals,
        feedback,
        highlights,
        highlight_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::performance::aggregate_employee;
    use crate::workflows::performance::ratings::{Criterion, RatingLevel};
    use crate::workflows::records::MemberRef;
    use std::sync::Mutex;

    struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String, GenerationError>>>,
        prompts: Mutex<Vec<Prompt>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
            self.prompts
                .lock()
                .expect("prompt mutex poisoned")
                .push(prompt.clone());
            let mut replies = self.replies.lock().expect("reply mutex poisoned");
            if replies.is_empty() {
                Ok(String::new())
            } else {
                replies.remove(0)
            }
        }
    }

    fn metrics() -> EmployeeMetrics {
        let member = MemberRef {
            id: MemberId(3),
            identifier: "kp".to_string(),
            name: "Kim Park".to_string(),
        };
        let mut metrics = aggregate_employee(&member, Vec::new(), Vec::new(), Vec::new());
        metrics.total_projects = 12;
        metrics.total_hours = 640.0;
        metrics.average_note_quality = 72.0;
        metrics
    }

    fn generated(replies: Vec<Result<String, GenerationError>>) -> ReviewProvider {
        ReviewProvider::Generated(Arc::new(ScriptedGenerator::new(replies)))
    }

    #[tokio::test]
    async fn deterministic_provider_returns_rule_based_content() {
        let output = ReviewProvider::Deterministic.ratings(&metrics()).await;
        assert_eq!(output.source, ContentSource::Deterministic);
        assert_eq!(output.fallback, None);
        assert_eq!(output.value, derive_ratings(&metrics()));
    }

    #[tokio::test]
    async fn generated_list_is_used_when_it_parses() {
        let provider = generated(vec![Ok(
            "```json\n[\"Closed the migration\", \"Mentored two hires\"]\n```".to_string(),
        )]);

        let output = provider.accomplishments(&metrics()).await;
        assert_eq!(output.source, ContentSource::Generated);
        assert_eq!(
            output.value,
            vec!["Closed the migration".to_string(), "Mentored two hires".to_string()]
        );
    }

    #[tokio::test]
    async fn generator_failure_falls_back_with_reason() {
        let provider = generated(vec![Err(GenerationError::EmptyResponse)]);

        let output = provider.goals(&metrics()).await;
        assert_eq!(output.source, ContentSource::Deterministic);
        assert_eq!(output.value, narrative::goals(&metrics()));
        assert!(matches!(
            output.fallback,
            Some(FallbackReason::GeneratorFailed(_))
        ));
    }

    #[tokio::test]
    async fn empty_and_malformed_replies_fall_back() {
        let provider = generated(vec![Ok("   ".to_string()), Ok("not json".to_string())]);

        let empty = provider
            .feedback(FeedbackKind::Team, &metrics())
            .await;
        assert_eq!(empty.fallback, Some(FallbackReason::EmptyReply));

        let malformed = provider.ratings(&metrics()).await;
        assert!(matches!(
            malformed.fallback,
            Some(FallbackReason::MalformedReply(_))
        ));
        assert_eq!(malformed.value.len(), 7);
    }

    #[tokio::test]
    async fn generated_ratings_are_returned_in_canonical_order() {
        let mut reply: Vec<serde_json::Value> = Criterion::ordered()
            .into_iter()
            .map(|criterion| {
                serde_json::json!({
                    "criterion": criterion.label(),
                    "score": 3,
                    "rating": "Good",
                    "evidence": ["Steady output"],
                })
            })
            .collect();
        reply.reverse();
        let provider = generated(vec![Ok(serde_json::to_string(&reply).expect("json"))]);

        let output = provider.ratings(&metrics()).await;
        assert_eq!(output.source, ContentSource::Generated);
        let order: Vec<Criterion> = output.value.iter().map(|r| r.criterion).collect();
        assert_eq!(order, Criterion::ordered().to_vec());
        assert!(output.value.iter().all(|r| r.rating == RatingLevel::Good));
    }

    #[tokio::test]
    async fn build_review_fills_every_section() {
        let packet = build_review(&ReviewProvider::Deterministic, &metrics()).await;

        assert_eq!(packet.provider, "deterministic");
        assert_eq!(packet.ratings.value.len(), 7);
        assert!(!packet.accomplishments.value.is_empty());
        assert!(!packet.goals.value.is_empty());
        assert_eq!(packet.feedback.len(), 3);
        assert_eq!(packet.feedback[1].kind, FeedbackKind::Leadership);
        assert!(!packet.highlight_summary.value.summary.is_empty());
    }

    #[tokio::test]
    async fn prompts_carry_member_figures() {
        let generator = Arc::new(ScriptedGenerator::new(Vec::new()));
        let provider = ReviewProvider::Generated(generator.clone());

        provider.ratings(&metrics()).await;

        let prompts = generator.prompts.lock().expect("prompt mutex poisoned");
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].user.contains("Kim Park"));
        assert!(prompts[0].user.contains("Total Hours: 640.0"));
        assert!(prompts[0].user.contains("Job Knowledge"));
    }
}
