use review_insights::workflows::connectwise::{SnapshotImportError, SnapshotImporter};
use review_insights::workflows::performance::{activity_trend, monthly_activity, ReportingPeriod};
use review_insights::workflows::records::{ProjectId, TicketId};
use chrono::NaiveDate;

const TIME_ENTRIES: &str = "Id,Member ID,Member,Ticket,Project,Start,Hours,Notes\n\
1,42,Jane Doe,900,,2024-01-08T09:00:00Z,2.0,Printer offline\n\
2,42,Jane Doe,901,7,2024-02-12T09:00:00Z,3.0,\n\
3,42,Jane Doe,,7,2024-03-04 13:30:00,,Project kickoff\n\
4,42,Jane Doe,902,,2024-04-01,4.5,Password reset\n";

#[test]
fn csv_export_imports_every_row() {
    let entries =
        SnapshotImporter::time_entries_from_csv(TIME_ENTRIES.as_bytes()).expect("csv parses");

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].ticket_id, Some(TicketId(900)));
    assert_eq!(entries[1].project_id, Some(ProjectId(7)));
    assert_eq!(entries[1].notes, None);
    assert_eq!(entries[2].hours(), 0.0);
    assert_eq!(entries[3].notes.as_deref(), Some("Password reset"));
}

#[test]
fn csv_entries_feed_monthly_trends() {
    let entries =
        SnapshotImporter::time_entries_from_csv(TIME_ENTRIES.as_bytes()).expect("csv parses");
    let range = ReportingPeriod::Quarter.range(NaiveDate::from_ymd_opt(2024, 4, 30).expect("valid"));
    let recent = review_insights::workflows::performance::filter_entries(&entries, range);
    assert_eq!(recent.len(), 3);

    let months = monthly_activity(&entries);
    assert_eq!(months.len(), 4);
    // recent = Feb..Apr (avg 2.5h), older = Jan (2.0h)
    let trend = activity_trend(&months);
    assert!((trend.hours_trend - 25.0).abs() < 1e-9);
    assert!(trend.entries_trend.abs() < 1e-9);
}

#[test]
fn missing_required_column_is_a_csv_error() {
    let csv = "Id,Member ID,Member\n1,42,Jane Doe\n";
    let err = SnapshotImporter::time_entries_from_csv(csv.as_bytes()).expect_err("missing Start");
    assert!(matches!(err, SnapshotImportError::Csv(_)));
}

#[test]
fn missing_snapshot_file_is_an_io_error() {
    let err = SnapshotImporter::from_path("/nonexistent/snapshot.json").expect_err("no file");
    assert!(matches!(err, SnapshotImportError::Io(_)));
}
