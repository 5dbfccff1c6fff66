use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::workflows::performance::domain::EmployeeMetrics;
use crate::workflows::performance::narrative::FeedbackKind;
use crate::workflows::performance::ratings::Criterion;

const RECENT_ENTRY_LIMIT: usize = 50;
const ENTRY_NOTE_PREVIEW: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    fn new(system: &str, user: String) -> Self {
        Self {
            system: system.to_string(),
            user,
        }
    }
}

fn headline(metrics: &EmployeeMetrics) -> String {
    format!(
        "Employee: {}\nTotal Hours: {:.1}\nTotal Projects: {}\nTotal Tickets: {}\nAverage Note Quality: {:.0}/100\nTotal Time Entries: {}",
        metrics.member_name,
        metrics.total_hours,
        metrics.total_projects,
        metrics.total_tickets,
        metrics.average_note_quality,
        metrics.entry_count(),
    )
}

fn project_lines(metrics: &EmployeeMetrics) -> String {
    let projects = metrics.projects_by_hours();
    if projects.is_empty() {
        return "- None".to_string();
    }

    projects
        .iter()
        .map(|project| {
            format!(
                "- {}: {:.1} hours ({} entries)",
                project.project_name, project.total_hours, project.entry_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn recent_entry_lines(metrics: &EmployeeMetrics) -> String {
    let mut entries: Vec<_> = metrics.time_entries.iter().collect();
    entries.sort_by(|a, b| b.time_start.cmp(&a.time_start));

    let mut out = String::new();
    for entry in entries.into_iter().take(RECENT_ENTRY_LIMIT) {
        let ticket = entry
            .ticket_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let note: String = entry
            .notes
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(ENTRY_NOTE_PREVIEW)
            .collect();
        let _ = writeln!(
            out,
            "- {}: {:.2}h - Ticket: {} - {}",
            entry.time_start.date_naive(),
            entry.hours(),
            ticket,
            note
        );
    }
    out
}

pub(crate) fn ratings(metrics: &EmployeeMetrics) -> Prompt {
    let mut days: BTreeMap<_, f64> = BTreeMap::new();
    for entry in &metrics.time_entries {
        *days.entry(entry.time_start.date_naive()).or_default() += entry.hours();
    }
    let average_per_day = if days.is_empty() {
        0.0
    } else {
        metrics.total_hours / days.len() as f64
    };

    let criteria = Criterion::ordered()
        .into_iter()
        .enumerate()
        .map(|(index, criterion)| {
            format!("{}. {} ({})", index + 1, criterion.label(), criterion.description())
        })
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Based on these metrics, rate the employee on 7 criteria (1-4 scale, where 1=Needs Work, 2=Meets Expectations, 3=Good, 4=Exceeds Expectations):\n\n\
         {}\nDays Worked: {}\nAverage Hours per Day: {:.2}\n\n\
         Projects:\n{}\n\n\
         Rate these criteria:\n{}\n\n\
         For each criterion, provide:\n\
         - score: number (1-4)\n\
         - rating: string (\"Needs Work\" | \"Meets Expectations\" | \"Good\" | \"Exceeds Expectations\")\n\
         - evidence: array of 2-3 specific evidence points\n\n\
         Return as a JSON array with objects containing: criterion, score, rating, evidence.",
        headline(metrics),
        days.len(),
        average_per_day,
        project_lines(metrics),
        criteria,
    );

    Prompt::new(
        "You are a fair performance reviewer. Base ratings strictly on the provided metrics. Be objective and evidence-based.",
        user,
    )
}

pub(crate) fn accomplishments(metrics: &EmployeeMetrics) -> Prompt {
    let high_impact = metrics
        .projects_by_hours()
        .into_iter()
        .filter(|project| project.total_hours > 20.0)
        .map(|project| project.project_name.as_str())
        .collect::<Vec<_>>();
    let high_impact = if high_impact.is_empty() {
        "None".to_string()
    } else {
        high_impact.join(", ")
    };

    let user = format!(
        "Generate 7-10 professional accomplishment statements for this employee based on their work history:\n\n\
         {}\n\nProjects:\n{}\n\nHigh-Impact Projects (>20 hours): {}\n\n\
         Recent Time Entries:\n{}\n\
         Write accomplishment statements that are specific and quantifiable, highlight impact to the organization \
         and suit a performance review.\n\n\
         Return as a JSON array of strings.",
        headline(metrics),
        project_lines(metrics),
        high_impact,
        recent_entry_lines(metrics),
    );

    Prompt::new(
        "You are writing professional accomplishment statements for a performance review. Be specific, positive, and data-driven.",
        user,
    )
}

pub(crate) fn goals(metrics: &EmployeeMetrics) -> Prompt {
    let per_entry = metrics.average_hours_per_entry();
    let mut focus = String::new();
    if metrics.average_note_quality < 70.0 {
        let _ = writeln!(
            focus,
            "- Note quality ({:.0}/100) needs improvement to reach 75+",
            metrics.average_note_quality
        );
    }
    if metrics.total_projects < 15 {
        let _ = writeln!(
            focus,
            "- Project portfolio ({} projects) could be expanded",
            metrics.total_projects
        );
    }
    if per_entry < 1.0 {
        let _ = writeln!(focus, "- Efficiency ({per_entry:.2}h/entry) could be improved");
    }
    focus.push_str(
        "- Professional development and skill expansion\n\
         - Quality and attention to detail\n\
         - Collaboration and team contribution\n\
         - Consistency and reliability",
    );

    let user = format!(
        "Based on this employee's current performance, suggest 7-10 SMART goals for their next review period:\n\n\
         {}\nAverage Hours per Entry: {:.2}\n\nProjects:\n{}\n\n\
         Areas to consider:\n{}\n\n\
         Return as a JSON array of SMART goal statements (strings).",
        headline(metrics),
        per_entry,
        project_lines(metrics),
        focus,
    );

    Prompt::new(
        "You are a career development advisor. Suggest realistic, achievable goals that build on strengths and address growth areas.",
        user,
    )
}

pub(crate) fn feedback(kind: FeedbackKind, metrics: &EmployeeMetrics) -> Prompt {
    let projects = metrics
        .projects_by_hours()
        .into_iter()
        .map(|project| format!("{} ({:.1}h)", project.project_name, project.total_hours))
        .collect::<Vec<_>>()
        .join(", ");

    let user = match kind {
        FeedbackKind::Company => format!(
            "Based on {:.1} hours of work across {} projects and {} tickets, write 3-4 professional sentences about how the company is performing. \
             Cover project management, communication, support structure and work environment. Be constructive and honest.",
            metrics.total_hours, metrics.total_projects, metrics.total_tickets
        ),
        FeedbackKind::Leadership => format!(
            "Based on experience working on {} projects ({}), write 3-4 professional sentences of feedback to leadership. \
             Include appreciation for specific support received and constructive suggestions for improvement.",
            metrics.total_projects, projects
        ),
        FeedbackKind::Team => format!(
            "Based on collaboration across {} projects ({}), write 3-4 professional sentences about team performance. \
             Include strengths observed, collaboration effectiveness and areas for continued focus.",
            metrics.total_projects, projects
        ),
    };

    Prompt::new(
        "You are writing professional feedback for a performance review. Be diplomatic, constructive, and professional. Reply with plain text only.",
        user,
    )
}

pub(crate) fn highlights(metrics: &EmployeeMetrics) -> Prompt {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for entry in &metrics.time_entries {
        *months
            .entry(entry.time_start.format("%Y-%m").to_string())
            .or_default() += entry.hours();
    }
    let distribution = months
        .iter()
        .map(|(month, hours)| format!("{month}: {hours:.1}h"))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Analyze this employee's performance and identify what stands out:\n\n\
         {}\n\nProjects:\n{}\n\nMonthly Hours Distribution:\n{}\n\n\
         Provide 5-7 standout achievements, 3-5 areas that need attention and a 3-4 sentence summary.\n\n\
         Return as JSON with keys: standoutAchievements (array), areasForAttention (array), summary (string).",
        headline(metrics),
        project_lines(metrics),
        distribution,
    );

    Prompt::new(
        "You are an expert performance analyst. Identify key highlights and areas for improvement based on data.",
        user,
    )
}
