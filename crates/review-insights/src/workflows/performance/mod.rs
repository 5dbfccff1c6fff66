//! Member performance metrics, ratings and review drafting.

mod aggregate;
pub mod assistant;
pub mod domain;
pub mod narrative;
pub mod ratings;
pub mod trends;

pub use aggregate::{aggregate_comparison, aggregate_employee, compare_employees, group_by_project};
pub use assistant::{
    build_review, ContentSource, FallbackReason, GenerationError, OpenAiTextGenerator,
    ReviewOutput, ReviewPacket, ReviewProvider, TextGenerator,
};
pub use domain::{
    ComparisonMetrics, ComparisonReport, EmployeeComparison, EmployeeMetrics, ProjectContribution,
};
pub use narrative::{FeedbackKind, HighlightNarrative, Highlights};
pub use ratings::{derive_ratings, Criterion, PerformanceRating, RatingLevel};
pub use trends::{
    activity_trend, filter_entries, filter_notes, monthly_activity, ActivityTrend, DateRange,
    MonthlyActivity, ReportingPeriod,
};
