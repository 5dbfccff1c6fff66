use serde::{Deserialize, Serialize};

use crate::workflows::notes::ScoredNote;
use crate::workflows::records::{MemberId, ProjectId, TimeEntry};

/// Hours a member logged against one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContribution {
    pub project_id: ProjectId,
    pub project_name: String,
    pub total_hours: f64,
    pub entry_count: usize,
}

/// Aggregate view of one member's activity, rebuilt from its inputs on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeMetrics {
    pub member_id: MemberId,
    pub member_name: String,
    pub total_hours: f64,
    pub total_projects: usize,
    pub total_tickets: usize,
    pub average_note_quality: f64,
    pub time_entries: Vec<TimeEntry>,
    pub projects: Vec<ProjectContribution>,
    pub notes: Vec<ScoredNote>,
}

impl EmployeeMetrics {
    pub fn entry_count(&self) -> usize {
        self.time_entries.len()
    }

    pub fn average_hours_per_entry(&self) -> f64 {
        if self.time_entries.is_empty() {
            0.0
        } else {
            self.total_hours / self.time_entries.len() as f64
        }
    }

    /// Contributions ordered by hours, largest first.
    pub fn projects_by_hours(&self) -> Vec<&ProjectContribution> {
        let mut projects: Vec<&ProjectContribution> = self.projects.iter().collect();
        projects.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));
        projects
    }
}

/// Team averages used as the comparison baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub average_hours: f64,
    pub average_projects: f64,
    pub average_note_quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeComparison {
    pub member_id: MemberId,
    pub member_name: String,
    pub total_hours: f64,
    pub total_projects: usize,
    pub average_note_quality: f64,
    pub hours_delta: f64,
    pub projects_delta: f64,
    pub quality_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub averages: ComparisonMetrics,
    pub employees: Vec<EmployeeComparison>,
}
