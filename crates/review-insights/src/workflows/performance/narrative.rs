use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::EmployeeMetrics;
use crate::workflows::records::TicketId;

/// Accomplishment statements backed by the member's figures.
pub fn accomplishments(metrics: &EmployeeMetrics) -> Vec<String> {
    let mut items = Vec::new();
    let projects = metrics.projects_by_hours();

    if let Some(top) = projects.first() {
        items.push(format!(
            "Successfully contributed to {} major projects, including \"{}\" with {:.1} hours of dedicated work.",
            projects.len().min(5),
            top.project_name,
            top.total_hours
        ));
    }

    if metrics.total_hours > 500.0 {
        items.push(format!(
            "Logged over {:.0} total hours, demonstrating consistent commitment and productivity.",
            metrics.total_hours
        ));
    }

    if metrics.total_projects > 10 {
        items.push(format!(
            "Demonstrated versatility by contributing to {} different projects, showcasing adaptability and broad technical knowledge.",
            metrics.total_projects
        ));
    }

    if metrics.total_tickets > 50 {
        items.push(format!(
            "Resolved {} tickets, providing timely and effective solutions to client issues.",
            metrics.total_tickets
        ));
    }

    if metrics.average_note_quality > 75.0 {
        items.push(format!(
            "Maintained excellent documentation standards with an average note quality score of {:.0}/100, ensuring clear communication and knowledge transfer.",
            metrics.average_note_quality
        ));
    }

    let high_impact: Vec<_> = projects
        .iter()
        .filter(|project| project.total_hours > 50.0)
        .collect();
    if let Some(largest) = high_impact.first() {
        items.push(format!(
            "Led or significantly contributed to {} high-impact projects, each requiring {:.0}+ hours of focused effort.",
            high_impact.len(),
            largest.total_hours
        ));
    }

    if metrics.entry_count() > 100 {
        items.push(format!(
            "Maintained consistent work output with {} time entries, demonstrating reliability and dedication.",
            metrics.entry_count()
        ));
    }

    if items.is_empty() {
        return vec![
            "Contributed effectively to team projects and client deliverables.".to_string(),
            "Maintained consistent work output and professional standards.".to_string(),
            "Demonstrated commitment to quality and continuous improvement.".to_string(),
        ];
    }

    items
}

/// SMART goals for the next review period.
pub fn goals(metrics: &EmployeeMetrics) -> Vec<String> {
    let mut items = Vec::new();

    if metrics.average_note_quality < 70.0 {
        items.push(
            "Improve documentation quality by aiming for an average note quality score of 75+ by focusing on detail, structure, and technical accuracy."
                .to_string(),
        );
    }

    if metrics.total_projects < 15 {
        items.push(
            "Expand project portfolio by contributing to at least 5 additional projects to broaden technical expertise and team collaboration."
                .to_string(),
        );
    }

    if metrics.average_hours_per_entry() < 1.0 {
        items.push(
            "Improve work efficiency by consolidating related tasks and reducing administrative overhead, aiming for more focused time entries."
                .to_string(),
        );
    }

    items.push(
        "Continue professional development by taking on projects that challenge current skill set and expand technical knowledge in emerging technologies."
            .to_string(),
    );

    if metrics.average_note_quality < 80.0 {
        items.push(
            "Enhance attention to detail in all work products, with a specific focus on improving documentation quality and completeness."
                .to_string(),
        );
    }

    items.push(
        "Strengthen collaboration skills by actively participating in team projects and knowledge sharing sessions."
            .to_string(),
    );
    items.push(format!(
        "Maintain consistent work output and continue building on the strong foundation of {:.0} hours of quality work.",
        metrics.total_hours
    ));

    items
}

/// Audience for the open-ended review questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Company,
    Leadership,
    Team,
}

impl FeedbackKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Company, Self::Leadership, Self::Team]
    }

    pub const fn question(self) -> &'static str {
        match self {
            Self::Company => "How do you feel the company is performing?",
            Self::Leadership => "List any feedback you have for leadership",
            Self::Team => "List any feedback you have for your team and their performance",
        }
    }
}

pub fn feedback(kind: FeedbackKind, metrics: &EmployeeMetrics) -> String {
    match kind {
        FeedbackKind::Company => format!(
            "Based on my work experience, the company is performing well with strong project management and clear communication channels. \
             The support structure allows for effective collaboration and knowledge sharing. \
             I've been able to contribute to {} projects and resolve {} tickets, which demonstrates the company's ability to provide meaningful work opportunities and maintain a productive environment.",
            metrics.total_projects, metrics.total_tickets
        ),
        FeedbackKind::Leadership => format!(
            "I appreciate the leadership's support in providing diverse project opportunities and maintaining clear communication. \
             The ability to work across {} different projects has been valuable for my professional growth. \
             Suggestions for improvement: continue providing opportunities for skill development and consider implementing more structured feedback mechanisms to help team members track their progress and identify areas for improvement.",
            metrics.total_projects
        ),
        FeedbackKind::Team => "The team demonstrates strong collaboration and technical expertise. \
             Working together on multiple projects has been a positive experience. \
             The team's commitment to quality work and knowledge sharing creates a supportive environment. \
             Areas for continued focus: maintaining consistent documentation standards and ensuring all team members have access to necessary resources and training opportunities."
            .to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTrend {
    Improving,
    Declining,
    Stable,
}

impl QualityTrend {
    fn from_average(average_note_quality: f64) -> Self {
        if average_note_quality > 60.0 {
            Self::Improving
        } else if average_note_quality < 40.0 {
            Self::Declining
        } else {
            Self::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    Positive,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub kind: AchievementKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHighlight {
    pub name: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketHighlight {
    pub ticket_id: TicketId,
    pub hours: f64,
    pub entries: usize,
}

/// What stood out over the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub total_hours: f64,
    pub total_projects: usize,
    pub total_entries: usize,
    pub average_hours_per_entry: f64,
    pub average_note_quality: f64,
    pub top_project: Option<ProjectHighlight>,
    pub top_ticket: Option<TicketHighlight>,
    pub quality_trend: QualityTrend,
    pub achievements: Vec<Achievement>,
}

pub fn highlights(metrics: &EmployeeMetrics) -> Highlights {
    let top_project = metrics
        .projects_by_hours()
        .first()
        .map(|project| ProjectHighlight {
            name: project.project_name.clone(),
            hours: project.total_hours,
        });

    let mut tickets: BTreeMap<TicketId, (f64, usize)> = BTreeMap::new();
    for entry in &metrics.time_entries {
        if let Some(ticket_id) = entry.ticket_id {
            let slot = tickets.entry(ticket_id).or_insert((0.0, 0));
            slot.0 += entry.hours();
            slot.1 += 1;
        }
    }
    let top_ticket = tickets
        .into_iter()
        .map(|(ticket_id, (hours, entries))| TicketHighlight {
            ticket_id,
            hours,
            entries,
        })
        .reduce(|best, next| if next.hours > best.hours { next } else { best });

    let average_hours_per_entry = metrics.average_hours_per_entry();

    Highlights {
        total_hours: metrics.total_hours,
        total_projects: metrics.total_projects,
        total_entries: metrics.entry_count(),
        average_hours_per_entry,
        average_note_quality: metrics.average_note_quality,
        top_project,
        top_ticket,
        quality_trend: QualityTrend::from_average(metrics.average_note_quality),
        achievements: achievements(metrics, average_hours_per_entry),
    }
}

fn achievements(metrics: &EmployeeMetrics, average_hours_per_entry: f64) -> Vec<Achievement> {
    let mut items = Vec::new();
    let mut push = |title: &str, description: String, kind: AchievementKind| {
        items.push(Achievement {
            title: title.to_string(),
            description,
            kind,
        })
    };

    if metrics.total_hours > 1000.0 {
        push(
            "1000+ Hours Milestone",
            "Outstanding commitment with over 1000 hours logged".to_string(),
            AchievementKind::Positive,
        );
    }
    if metrics.total_projects > 20 {
        push(
            "Multi-Project Contributor",
            format!("Contributed to {} different projects", metrics.total_projects),
            AchievementKind::Positive,
        );
    }
    if metrics.average_note_quality > 80.0 {
        push(
            "Excellent Documentation",
            "Maintains high-quality notes consistently".to_string(),
            AchievementKind::Positive,
        );
    }
    if average_hours_per_entry > 2.0 {
        push(
            "Deep Work Focus",
            "Spends significant time per entry, indicating thorough work".to_string(),
            AchievementKind::Positive,
        );
    }
    if metrics.average_note_quality < 40.0 {
        push(
            "Note Quality Needs Improvement",
            "Consider adding more detail and structure to notes".to_string(),
            AchievementKind::Warning,
        );
    }
    if average_hours_per_entry < 0.5 {
        push(
            "Low Time per Entry",
            "Entries may be too brief - consider consolidating or adding detail".to_string(),
            AchievementKind::Warning,
        );
    }

    items
}

/// Prose summary of the highlights for the review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightNarrative {
    pub standout_achievements: Vec<String>,
    pub areas_for_attention: Vec<String>,
    pub summary: String,
}

pub fn highlight_narrative(highlights: &Highlights) -> HighlightNarrative {
    let mut standout_achievements = Vec::new();
    if let Some(project) = &highlights.top_project {
        standout_achievements.push(format!(
            "Top project \"{}\" with {:.1} hours",
            project.name, project.hours
        ));
    }
    if let Some(ticket) = &highlights.top_ticket {
        standout_achievements.push(format!(
            "Most time on ticket #{}: {:.1} hours over {} entries",
            ticket.ticket_id, ticket.hours, ticket.entries
        ));
    }

    let mut areas_for_attention = Vec::new();
    for achievement in &highlights.achievements {
        let line = format!("{}: {}", achievement.title, achievement.description);
        match achievement.kind {
            AchievementKind::Positive => standout_achievements.push(line),
            AchievementKind::Warning => areas_for_attention.push(line),
        }
    }

    let quality = match highlights.quality_trend {
        QualityTrend::Improving => "Quality is improving",
        QualityTrend::Declining => "Quality needs attention",
        QualityTrend::Stable => "Quality is stable",
    };
    let summary = format!(
        "Logged {:.1} hours across {} projects in {} time entries ({:.2} hours per entry). \
         Average note quality is {:.0}/100. {quality}.",
        highlights.total_hours,
        highlights.total_projects,
        highlights.total_entries,
        highlights.average_hours_per_entry,
        highlights.average_note_quality,
    );

    HighlightNarrative {
        standout_achievements,
        areas_for_attention,
        summary,
    }
}
