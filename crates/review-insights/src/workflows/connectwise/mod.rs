//! Practice-management exports: member snapshots (JSON) and time-entry CSVs.

mod parser;

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::workflows::notes::score_notes;
use crate::workflows::performance::{
    aggregate_employee, filter_entries, filter_notes, group_by_project, DateRange, EmployeeMetrics,
};
use crate::workflows::records::{MemberRef, Note, ProjectRecord, TimeEntry};

#[derive(Debug)]
pub enum SnapshotImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    InvalidRow { id: u64, reason: String },
}

impl std::fmt::Display for SnapshotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotImportError::Io(err) => write!(f, "failed to read export: {}", err),
            SnapshotImportError::Csv(err) => write!(f, "invalid time entry CSV: {}", err),
            SnapshotImportError::Json(err) => write!(f, "invalid member snapshot: {}", err),
            SnapshotImportError::InvalidRow { id, reason } => {
                write!(f, "time entry {} could not be imported: {}", id, reason)
            }
        }
    }
}

impl std::error::Error for SnapshotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotImportError::Io(err) => Some(err),
            SnapshotImportError::Csv(err) => Some(err),
            SnapshotImportError::Json(err) => Some(err),
            SnapshotImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for SnapshotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for SnapshotImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Everything exported for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSnapshot {
    pub member: MemberRef,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

impl MemberSnapshot {
    /// Keep only entries and notes dated inside `range`.
    pub fn within(mut self, range: DateRange) -> Self {
        self.time_entries = filter_entries(&self.time_entries, range);
        self.notes = filter_notes(&self.notes, range);
        self
    }

    pub fn into_metrics(self) -> EmployeeMetrics {
        let projects = group_by_project(&self.time_entries, &self.projects);
        let notes = score_notes(self.notes);
        aggregate_employee(&self.member, self.time_entries, projects, notes)
    }
}

pub struct SnapshotImporter;

impl SnapshotImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<MemberSnapshot, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(file)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<MemberSnapshot, SnapshotImportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn time_entries_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<TimeEntry>, SnapshotImportError> {
        let file = std::fs::File::open(path)?;
        Self::time_entries_from_csv(file)
    }

    /// Parse a time-entry CSV with columns `Id, Member ID, Member, Ticket, Project, Start, Hours, Notes`.
    pub fn time_entries_from_csv<R: Read>(reader: R) -> Result<Vec<TimeEntry>, SnapshotImportError> {
        parser::parse_time_entries(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::records::{MemberId, TimeEntryId};

    const SNAPSHOT: &str = r#"{
        "member": { "id": 42, "identifier": "jdoe", "name": "Jane Doe" },
        "timeEntries": [
            { "id": 1, "ticketId": 900, "projectId": 7, "timeStart": "2024-03-01T09:00:00Z", "actualHours": 3.5 },
            { "id": 2, "ticketId": 901, "timeStart": "2024-03-02T09:00:00Z", "actualHours": null },
            { "id": 3, "projectId": 7, "timeStart": "2023-01-02T09:00:00Z", "actualHours": 2.0 }
        ],
        "notes": [
            {
                "id": 10,
                "text": "Resolved DNS issue.",
                "dateCreated": "2024-03-01T10:00:00Z",
                "member": { "id": 42, "identifier": "jdoe", "name": "Jane Doe" }
            }
        ],
        "projects": [ { "id": 7, "name": "Office move" } ]
    }"#;

    #[test]
    fn snapshot_converts_into_metrics() {
        let snapshot = SnapshotImporter::from_json_reader(SNAPSHOT.as_bytes()).expect("parses");
        let metrics = snapshot.into_metrics();

        assert_eq!(metrics.member_id, MemberId(42));
        assert_eq!(metrics.total_hours, 5.5);
        assert_eq!(metrics.total_projects, 1);
        assert_eq!(metrics.total_tickets, 2);
        assert_eq!(metrics.projects[0].project_name, "Office move");
        assert_eq!(metrics.notes.len(), 1);
        assert!(metrics.average_note_quality > 0.0);
    }

    #[test]
    fn within_drops_records_outside_the_range() {
        let snapshot = SnapshotImporter::from_json_reader(SNAPSHOT.as_bytes()).expect("parses");
        let range = DateRange {
            start: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid"),
            end: chrono::NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid"),
        };

        let filtered = snapshot.within(range);
        let ids: Vec<TimeEntryId> = filtered.time_entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![TimeEntryId(1), TimeEntryId(2)]);
        assert_eq!(filtered.notes.len(), 1);
    }

    #[test]
    fn malformed_snapshot_reports_json_error() {
        let err = SnapshotImporter::from_json_reader("{\"member\": 3}".as_bytes())
            .expect_err("invalid snapshot");
        assert!(matches!(err, SnapshotImportError::Json(_)));
        assert!(err.to_string().starts_with("invalid member snapshot"));
    }

    #[test]
    fn unparseable_start_is_rejected_with_row_id() {
        let csv = "Id,Member ID,Member,Ticket,Project,Start,Hours,Notes\n\
                   5,42,Jane Doe,900,,yesterday,1.0,Called user\n";
        let err = SnapshotImporter::time_entries_from_csv(csv.as_bytes()).expect_err("bad start");
        assert!(matches!(err, SnapshotImportError::InvalidRow { id: 5, .. }));
    }
}
