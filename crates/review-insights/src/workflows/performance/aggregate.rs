use std::collections::{BTreeMap, BTreeSet};

use super::domain::{
    ComparisonMetrics, ComparisonReport, EmployeeComparison, EmployeeMetrics, ProjectContribution,
};
use crate::workflows::notes::ScoredNote;
use crate::workflows::records::{MemberRef, ProjectId, ProjectRecord, TimeEntry};

/// Build a member's metrics from their time entries, contributions and scored notes.
pub fn aggregate_employee(
    member: &MemberRef,
    time_entries: Vec<TimeEntry>,
    projects: Vec<ProjectContribution>,
    notes: Vec<ScoredNote>,
) -> EmployeeMetrics {
    let total_hours = time_entries.iter().map(TimeEntry::hours).sum();
    let total_projects = time_entries
        .iter()
        .filter_map(|entry| entry.project_id)
        .collect::<BTreeSet<_>>()
        .len();
    let total_tickets = time_entries
        .iter()
        .filter_map(|entry| entry.ticket_id)
        .collect::<BTreeSet<_>>()
        .len();

    let average_note_quality = if notes.is_empty() {
        0.0
    } else {
        notes
            .iter()
            .map(|scored| f64::from(scored.overall_score()))
            .sum::<f64>()
            / notes.len() as f64
    };

    EmployeeMetrics {
        member_id: member.id,
        member_name: member.name.clone(),
        total_hours,
        total_projects,
        total_tickets,
        average_note_quality,
        time_entries,
        projects,
        notes,
    }
}

pub fn aggregate_comparison(employees: &[EmployeeMetrics]) -> ComparisonMetrics {
    if employees.is_empty() {
        return ComparisonMetrics::default();
    }

    let count = employees.len() as f64;
    let hours: f64 = employees.iter().map(|e| e.total_hours).sum();
    let projects: f64 = employees.iter().map(|e| e.total_projects as f64).sum();
    let quality: f64 = employees.iter().map(|e| e.average_note_quality).sum();

    ComparisonMetrics {
        average_hours: hours / count,
        average_projects: projects / count,
        average_note_quality: quality / count,
    }
}

/// Each member's standing relative to the group averages.
pub fn compare_employees(employees: &[EmployeeMetrics]) -> ComparisonReport {
    let averages = aggregate_comparison(employees);

    let employees = employees
        .iter()
        .map(|metrics| EmployeeComparison {
            member_id: metrics.member_id,
            member_name: metrics.member_name.clone(),
            total_hours: metrics.total_hours,
            total_projects: metrics.total_projects,
            average_note_quality: metrics.average_note_quality,
            hours_delta: metrics.total_hours - averages.average_hours,
            projects_delta: metrics.total_projects as f64 - averages.average_projects,
            quality_delta: metrics.average_note_quality - averages.average_note_quality,
        })
        .collect();

    ComparisonReport {
        averages,
        employees,
    }
}

/// Group entries by project, largest total first. Entries without a project are skipped.
pub fn group_by_project(
    entries: &[TimeEntry],
    records: &[ProjectRecord],
) -> Vec<ProjectContribution> {
    let mut grouped: BTreeMap<ProjectId, (f64, usize)> = BTreeMap::new();
    for entry in entries {
        if let Some(project_id) = entry.project_id {
            let slot = grouped.entry(project_id).or_insert((0.0, 0));
            slot.0 += entry.hours();
            slot.1 += 1;
        }
    }

    let mut contributions: Vec<ProjectContribution> = grouped
        .into_iter()
        .map(|(project_id, (total_hours, entry_count))| ProjectContribution {
            project_id,
            project_name: records
                .iter()
                .find(|record| record.id == project_id)
                .map(|record| record.name.clone())
                .unwrap_or_else(|| format!("Project {project_id}")),
            total_hours,
            entry_count,
        })
        .collect();

    // stable sort keeps ascending project id among equal totals
    contributions.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));
    contributions
}
