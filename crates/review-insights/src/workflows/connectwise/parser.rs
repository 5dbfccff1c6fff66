use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::SnapshotImportError;
use crate::workflows::records::{MemberId, MemberRef, ProjectId, TicketId, TimeEntry, TimeEntryId};

pub(crate) fn parse_time_entries<R: Read>(reader: R) -> Result<Vec<TimeEntry>, SnapshotImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<TimeEntryRow>() {
        let row = record?;
        let time_start = parse_datetime(&row.start).ok_or_else(|| SnapshotImportError::InvalidRow {
            id: row.id,
            reason: format!("unrecognised start time `{}`", row.start),
        })?;

        let member = row.member_id.map(|id| MemberRef {
            id: MemberId(id),
            identifier: String::new(),
            name: row.member.clone().unwrap_or_default(),
        });

        entries.push(TimeEntry {
            id: TimeEntryId(row.id),
            member,
            ticket_id: row.ticket.map(TicketId),
            project_id: row.project.map(ProjectId),
            time_start,
            actual_hours: row.hours,
            notes: row.notes,
        });
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct TimeEntryRow {
    #[serde(rename = "Id")]
    id: u64,
    #[serde(rename = "Member ID", default)]
    member_id: Option<u64>,
    #[serde(rename = "Member", default, deserialize_with = "empty_string_as_none")]
    member: Option<String>,
    #[serde(rename = "Ticket", default)]
    ticket: Option<u64>,
    #[serde(rename = "Project", default)]
    project: Option<u64>,
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "Hours", default)]
    hours: Option<f64>,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
