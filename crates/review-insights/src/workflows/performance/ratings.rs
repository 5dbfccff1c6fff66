//! Rule-based performance ratings.
//!
//! Seven fixed criteria, each rated on a four-level scale from a member's
//! aggregate metrics. Every rating carries the figures it was derived from so
//! a reviewer can check the reasoning.

use serde::{Deserialize, Serialize};

use super::domain::EmployeeMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criterion {
    #[serde(rename = "Job Knowledge")]
    JobKnowledge,
    #[serde(rename = "Productivity")]
    Productivity,
    #[serde(rename = "Quality of Work")]
    QualityOfWork,
    #[serde(rename = "Team Skills")]
    TeamSkills,
    #[serde(rename = "Career Development")]
    CareerDevelopment,
    #[serde(rename = "Continuous Improvement")]
    ContinuousImprovement,
    #[serde(rename = "Attendance")]
    Attendance,
}

impl Criterion {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::JobKnowledge,
            Self::Productivity,
            Self::QualityOfWork,
            Self::TeamSkills,
            Self::CareerDevelopment,
            Self::ContinuousImprovement,
            Self::Attendance,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::JobKnowledge => "Job Knowledge",
            Self::Productivity => "Productivity",
            Self::QualityOfWork => "Quality of Work",
            Self::TeamSkills => "Team Skills",
            Self::CareerDevelopment => "Career Development",
            Self::ContinuousImprovement => "Continuous Improvement",
            Self::Attendance => "Attendance",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::JobKnowledge => "Possesses the knowledge to perform the job proficiently",
            Self::Productivity => "Amount of work consistently produced",
            Self::QualityOfWork => {
                "Accuracy, thoroughness, attention to detail and completeness"
            }
            Self::TeamSkills => {
                "Contributes to the team with a positive attitude, accepts responsibility, participates in team projects"
            }
            Self::CareerDevelopment => {
                "Effort to improve knowledge and skills in IT that add value to organization/individual"
            }
            Self::ContinuousImprovement => {
                "Finds new and better ways of doing things and advocates for them"
            }
            Self::Attendance => "Works scheduled days and hours",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ordered()
            .into_iter()
            .find(|criterion| criterion.label().eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingLevel {
    #[serde(rename = "Needs Work")]
    NeedsWork,
    #[serde(rename = "Meets Expectations")]
    MeetsExpectations,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Exceeds Expectations")]
    ExceedsExpectations,
}

impl RatingLevel {
    pub const fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Self::NeedsWork),
            2 => Some(Self::MeetsExpectations),
            3 => Some(Self::Good),
            4 => Some(Self::ExceedsExpectations),
            _ => None,
        }
    }

    pub const fn score(self) -> u8 {
        match self {
            Self::NeedsWork => 1,
            Self::MeetsExpectations => 2,
            Self::Good => 3,
            Self::ExceedsExpectations => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedsWork => "Needs Work",
            Self::MeetsExpectations => "Meets Expectations",
            Self::Good => "Good",
            Self::ExceedsExpectations => "Exceeds Expectations",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        [
            Self::NeedsWork,
            Self::MeetsExpectations,
            Self::Good,
            Self::ExceedsExpectations,
        ]
        .into_iter()
        .find(|level| level.label().eq_ignore_ascii_case(label))
    }

    fn clamped(raw: f64) -> Self {
        let score = if raw.is_nan() { 1.0 } else { raw.clamp(1.0, 4.0) };
        Self::from_score(score as u8).unwrap_or(Self::NeedsWork)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRating {
    pub criterion: Criterion,
    pub rating: RatingLevel,
    pub score: u8,
    pub evidence: Vec<String>,
}

impl PerformanceRating {
    pub fn new(criterion: Criterion, rating: RatingLevel, evidence: Vec<String>) -> Self {
        Self {
            criterion,
            rating,
            score: rating.score(),
            evidence,
        }
    }
}

/// Rate a member on all seven criteria, in `Criterion::ordered()` order.
pub fn derive_ratings(metrics: &EmployeeMetrics) -> Vec<PerformanceRating> {
    Criterion::ordered()
        .into_iter()
        .map(|criterion| rate(criterion, metrics))
        .collect()
}

fn rate(criterion: Criterion, metrics: &EmployeeMetrics) -> PerformanceRating {
    let projects = metrics.total_projects;
    let quality = metrics.average_note_quality;
    let entries = metrics.entry_count();

    let (level, evidence) = match criterion {
        Criterion::JobKnowledge => (
            RatingLevel::clamped((projects / 5) as f64 + 2.0),
            vec![
                format!("Contributed to {projects} different projects"),
                format!("Handled {} tickets across various areas", metrics.total_tickets),
                if projects > 10 {
                    "Demonstrates broad technical knowledge across multiple domains".to_string()
                } else {
                    "Shows solid understanding of core responsibilities".to_string()
                },
            ],
        ),
        Criterion::Productivity => (
            RatingLevel::clamped((metrics.total_hours / 250.0).floor() + 1.0),
            vec![
                format!("Logged {:.1} total hours", metrics.total_hours),
                format!("Completed {entries} time entries"),
                if entries > 100 {
                    "Consistent and reliable work output".to_string()
                } else {
                    "Steady contribution to team goals".to_string()
                },
            ],
        ),
        Criterion::QualityOfWork => (
            RatingLevel::clamped((quality / 25.0).floor()),
            vec![
                format!("Average note quality score: {quality:.1}/100"),
                if quality > 80.0 {
                    "Excellent attention to detail in documentation".to_string()
                } else if quality > 60.0 {
                    "Good documentation practices".to_string()
                } else {
                    "Documentation could be improved".to_string()
                },
            ],
        ),
        Criterion::TeamSkills => (
            RatingLevel::clamped((projects / 3) as f64 + 1.0),
            vec![
                format!("Participated in {projects} team projects"),
                "Collaborative approach to problem-solving".to_string(),
                if projects > 15 {
                    "Strong team player with excellent collaboration".to_string()
                } else {
                    "Works well within team structure".to_string()
                },
            ],
        ),
        Criterion::CareerDevelopment => (
            if projects > 10 {
                RatingLevel::Good
            } else {
                RatingLevel::MeetsExpectations
            },
            vec![
                "Shows interest in expanding skills and knowledge".to_string(),
                format!("Diverse project experience ({projects} projects)"),
                "Takes on varied responsibilities".to_string(),
            ],
        ),
        Criterion::ContinuousImprovement => (
            if quality > 70.0 {
                RatingLevel::Good
            } else {
                RatingLevel::MeetsExpectations
            },
            vec![
                format!("Average note quality score: {quality:.1}/100"),
                if quality > 70.0 {
                    "Demonstrates commitment to quality improvement".to_string()
                } else {
                    "Shows awareness of areas for improvement".to_string()
                },
            ],
        ),
        Criterion::Attendance => (
            if entries > 50 {
                RatingLevel::Good
            } else {
                RatingLevel::MeetsExpectations
            },
            vec![
                format!("Consistent time tracking with {entries} entries"),
                "Reliable work schedule".to_string(),
            ],
        ),
    };

    PerformanceRating::new(criterion, level, evidence)
}
