use crate::infra::metrics_for_period;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use review_insights::config::AppConfig;
use review_insights::error::AppError;
use review_insights::workflows::connectwise::{
    MemberSnapshot, SnapshotImportError, SnapshotImporter,
};
use review_insights::workflows::notes::{
    classify, score_notes, NoteReviewQuery, NoteReviewSummary, QualityFilter, ScoredNote,
};
use review_insights::workflows::performance::{
    activity_trend, build_review, compare_employees, monthly_activity, ContentSource,
    EmployeeMetrics, ReportingPeriod, ReviewOutput, ReviewPacket, ReviewProvider,
};
use review_insights::workflows::records::{
    MemberId, MemberRef, Note, NoteId, ProjectId, ProjectRecord, TicketId, TimeEntry, TimeEntryId,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct NotesScoreArgs {
    /// JSON file containing an array of notes
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Only list notes whose text or author contains this phrase
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ReviewArgs {
    /// Member snapshot exported as JSON (member, timeEntries, notes, projects)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Optional time-entry CSV export that replaces the snapshot's entries
    #[arg(long)]
    pub(crate) time_entries_csv: Option<PathBuf>,
    /// Reporting period: all, month, quarter or year
    #[arg(long, default_value = "all")]
    pub(crate) period: ReportingPeriod,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the review packet as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_notes_score(args: NotesScoreArgs) -> Result<(), AppError> {
    let NotesScoreArgs { file, search } = args;

    let reader = File::open(&file)?;
    let notes: Vec<Note> = serde_json::from_reader(reader).map_err(SnapshotImportError::from)?;
    let scored = score_notes(notes);

    let summary = NoteReviewSummary::from_notes(&scored);
    println!("Note quality for {}", file.display());
    render_note_summary(&summary);

    let query = NoteReviewQuery {
        search,
        quality: QualityFilter::All,
    };
    for entry in query.apply(&scored) {
        render_scored_note(entry);
    }

    Ok(())
}

pub(crate) async fn run_review(args: ReviewArgs) -> Result<(), AppError> {
    let ReviewArgs {
        snapshot,
        time_entries_csv,
        period,
        today,
        json,
    } = args;

    let config = AppConfig::load()?;
    let provider = ReviewProvider::from_config(&config.review)?;

    let mut snapshot = SnapshotImporter::from_path(snapshot)?;
    if let Some(path) = time_entries_csv {
        snapshot.time_entries = SnapshotImporter::time_entries_from_path(path)?;
    }

    let (metrics, range) = metrics_for_period(snapshot, period, today);
    let packet = build_review(&provider, &metrics).await;

    if json {
        match serde_json::to_string_pretty(&packet) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Review packet unavailable: {}", err),
        }
        return Ok(());
    }

    println!(
        "Performance review for {} ({} to {})",
        metrics.member_name, range.start, range.end
    );
    render_metrics(&metrics);
    render_review(&packet);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let anchor = today
        .and_hms_opt(12, 0, 0)
        .map(|noon| Utc.from_utc_datetime(&noon))
        .unwrap_or_else(Utc::now);

    println!("Review insights demo (reporting date {today})");

    let primary = sample_snapshot(anchor, &PRIMARY);
    let scored = score_notes(primary.notes.clone());
    println!("\nNote quality");
    render_note_summary(&NoteReviewSummary::from_notes(&scored));
    for entry in NoteReviewQuery::default().apply(&scored) {
        render_scored_note(entry);
    }

    let (metrics, _) = metrics_for_period(primary, ReportingPeriod::All, Some(today));
    println!("\nActivity");
    render_metrics(&metrics);

    let packet = build_review(&ReviewProvider::Deterministic, &metrics).await;
    render_review(&packet);

    let (peer, _) = metrics_for_period(
        sample_snapshot(anchor, &PEER),
        ReportingPeriod::All,
        Some(today),
    );
    let report = compare_employees(&[metrics, peer]);
    println!("\nTeam comparison");
    println!(
        "- Averages: {:.1} hours | {:.1} projects | {:.1} note quality",
        report.averages.average_hours,
        report.averages.average_projects,
        report.averages.average_note_quality
    );
    for employee in &report.employees {
        println!(
            "  - {}: {:+.1} hours | {:+.1} projects | {:+.1} quality vs team",
            employee.member_name,
            employee.hours_delta,
            employee.projects_delta,
            employee.quality_delta
        );
    }

    Ok(())
}

fn render_note_summary(summary: &NoteReviewSummary) {
    println!(
        "- {} notes | average quality {:.1} | {} excellent | {} need attention",
        summary.total, summary.average_quality, summary.excellent, summary.needs_attention
    );
}

fn render_scored_note(entry: &ScoredNote) {
    let quality = &entry.quality;
    println!(
        "  - #{} {}/100 {} (length {}, detail {}, structure {}, keywords {})",
        entry.note.id,
        quality.overall_score,
        quality.classification().label_text,
        quality.length_score,
        quality.detail_score,
        quality.structure_score,
        quality.keyword_score
    );
    println!("    {}", preview(&entry.note.text, 80));
}

fn render_metrics(metrics: &EmployeeMetrics) {
    println!(
        "- {:.1} hours over {} entries ({:.2} h/entry) | {} projects | {} tickets",
        metrics.total_hours,
        metrics.entry_count(),
        metrics.average_hours_per_entry(),
        metrics.total_projects,
        metrics.total_tickets
    );
    println!(
        "- Average note quality {:.1} ({})",
        metrics.average_note_quality,
        classify(metrics.average_note_quality).label_text
    );

    let months = monthly_activity(&metrics.time_entries);
    for month in &months {
        println!(
            "  - {}: {:.1} hours across {} entries",
            month.label, month.hours, month.entries
        );
    }
    let trend = activity_trend(&months);
    println!(
        "- Trend: hours {:+.0}% | entries {:+.0}%",
        trend.hours_trend, trend.entries_trend
    );
}

fn render_review(packet: &ReviewPacket) {
    println!("\nRatings ({})", source_label(&packet.ratings));
    for rating in &packet.ratings.value {
        println!(
            "- {}: {} ({}/4)",
            rating.criterion.label(),
            rating.rating.label(),
            rating.score
        );
        for evidence in &rating.evidence {
            println!("    * {evidence}");
        }
    }

    println!("\nAccomplishments ({})", source_label(&packet.accomplishments));
    for item in &packet.accomplishments.value {
        println!("- {item}");
    }

    println!("\nGoals ({})", source_label(&packet.goals));
    for item in &packet.goals.value {
        println!("- {item}");
    }

    println!("\nFeedback");
    for answer in &packet.feedback {
        println!("- {}", answer.question);
        println!("  {}", answer.answer.value);
    }

    println!("\nHighlights ({})", source_label(&packet.highlight_summary));
    for achievement in &packet.highlights.achievements {
        println!("- {}: {}", achievement.title, achievement.description);
    }
    println!("  {}", packet.highlight_summary.value.summary);
}

fn source_label<T>(output: &ReviewOutput<T>) -> String {
    match (&output.source, &output.fallback) {
        (ContentSource::Generated, _) => "generated".to_string(),
        (ContentSource::Deterministic, Some(reason)) => format!("rule-based, {reason}"),
        (ContentSource::Deterministic, None) => "rule-based".to_string(),
    }
}

fn preview(text: &str, limit: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= limit {
        flat
    } else {
        let cut: String = flat.chars().take(limit).collect();
        format!("{cut}...")
    }
}

struct SampleMember {
    id: u64,
    identifier: &'static str,
    name: &'static str,
    /// (days ago, ticket, project, hours)
    entries: &'static [(i64, u64, Option<u64>, f64)],
    /// (days ago, ticket, text)
    notes: &'static [(i64, u64, &'static str)],
}

const SAMPLE_PROJECTS: [(u64, &str); 2] = [(7001, "Datacenter Refresh"), (7002, "Endpoint Rollout")];

const PRIMARY: SampleMember = SampleMember {
    id: 101,
    identifier: "arivera",
    name: "Alex Rivera",
    entries: &[
        (160, 5001, Some(7001), 3.0),
        (150, 5002, Some(7001), 2.5),
        (120, 5003, None, 0.75),
        (95, 5004, Some(7002), 4.0),
        (80, 5005, Some(7002), 1.5),
        (62, 5006, Some(7003), 2.0),
        (45, 5007, Some(7001), 3.5),
        (30, 5008, None, 0.5),
        (21, 5009, Some(7002), 2.25),
        (14, 5010, Some(7001), 5.0),
        (7, 5011, Some(7002), 1.0),
        (2, 5012, Some(7003), 2.75),
    ],
    notes: &[
        (
            45,
            5007,
            "Summary of work:\n\
             - Diagnosed the failing backup job on server 12 and verified the storage quota.\n\
             - Configured retention, tested a restore and documented the steps.\n\
             Next steps: follow up with the client after the nightly run completes.",
        ),
        (30, 5008, "called user, fixed"),
        (
            14,
            5010,
            "Replaced the core switch in rack 3 and migrated 24 ports. Verified VLAN 40 \
             routing and updated the network diagram. Issue resolved after the config push.",
        ),
        (7, 5011, "Imaged 6 laptops for the new hires. Checked BitLocker status."),
    ],
};

const PEER: SampleMember = SampleMember {
    id: 102,
    identifier: "spatel",
    name: "Sam Patel",
    entries: &[
        (70, 6001, Some(7002), 1.0),
        (40, 6002, Some(7002), 0.5),
        (10, 6003, None, 0.25),
    ],
    notes: &[(10, 6003, "password reset")],
};

fn sample_snapshot(anchor: DateTime<Utc>, sample: &SampleMember) -> MemberSnapshot {
    let member = MemberRef {
        id: MemberId(sample.id),
        identifier: sample.identifier.to_string(),
        name: sample.name.to_string(),
    };

    let time_entries = sample
        .entries
        .iter()
        .enumerate()
        .map(|(index, (days_ago, ticket, project, hours))| TimeEntry {
            id: TimeEntryId(sample.id * 1000 + index as u64),
            member: Some(member.clone()),
            ticket_id: Some(TicketId(*ticket)),
            project_id: project.map(ProjectId),
            time_start: anchor - Duration::days(*days_ago),
            actual_hours: Some(*hours),
            notes: None,
        })
        .collect();

    let notes = sample
        .notes
        .iter()
        .enumerate()
        .map(|(index, (days_ago, ticket, text))| Note {
            id: NoteId(sample.id * 1000 + index as u64),
            text: (*text).to_string(),
            date_created: anchor - Duration::days(*days_ago),
            ticket_id: Some(TicketId(*ticket)),
            project_id: None,
            member: member.clone(),
            internal_flag: false,
        })
        .collect();

    let projects = SAMPLE_PROJECTS
        .iter()
        .map(|(id, name)| ProjectRecord {
            id: ProjectId(*id),
            name: (*name).to_string(),
            description: None,
            status: None,
            company: None,
        })
        .collect();

    MemberSnapshot {
        member,
        time_entries,
        notes,
        projects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn sample_snapshot_resolves_known_projects() {
        let snapshot = sample_snapshot(anchor(), &PRIMARY);
        assert_eq!(snapshot.time_entries.len(), 12);
        assert_eq!(snapshot.notes.len(), 4);

        let metrics = snapshot.into_metrics();
        assert_eq!(metrics.total_projects, 3);
        assert_eq!(metrics.total_tickets, 12);
        let names: Vec<&str> = metrics
            .projects
            .iter()
            .map(|project| project.project_name.as_str())
            .collect();
        assert!(names.contains(&"Datacenter Refresh"));
        assert!(names.contains(&"Project 7003"));
    }

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("one\n two   three", 80), "one two three");
        assert_eq!(preview("abcdefghij", 4), "abcd...");
    }

    #[tokio::test]
    async fn deterministic_sections_are_labelled_rule_based() {
        let metrics = sample_snapshot(anchor(), &PEER).into_metrics();
        let packet = build_review(&ReviewProvider::Deterministic, &metrics).await;

        assert_eq!(source_label(&packet.ratings), "rule-based");
        assert_eq!(packet.member_name, "Sam Patel");
    }

    #[tokio::test]
    async fn demo_runs_end_to_end() {
        let args = DemoArgs {
            today: NaiveDate::from_ymd_opt(2024, 6, 30),
        };
        run_demo(args).await.expect("demo completes");
    }
}
