use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::workflows::records::{Note, TimeEntry};

/// Lookback window applied before aggregating activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    #[default]
    All,
    Month,
    Quarter,
    Year,
}

impl ReportingPeriod {
    /// Date range ending on `today`.
    pub fn range(self, today: NaiveDate) -> DateRange {
        let months_back = match self {
            ReportingPeriod::All => None,
            ReportingPeriod::Month => Some(1),
            ReportingPeriod::Quarter => Some(3),
            ReportingPeriod::Year => Some(12),
        };

        let start = months_back
            .and_then(|months| today.checked_sub_months(Months::new(months)))
            .unwrap_or_else(earliest_start);

        DateRange { start, end: today }
    }
}

fn earliest_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl FromStr for ReportingPeriod {
    type Err = UnknownPeriod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(UnknownPeriod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reporting period `{0}` (expected all, month, quarter or year)")]
pub struct UnknownPeriod(pub String);

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

pub fn filter_entries(entries: &[TimeEntry], range: DateRange) -> Vec<TimeEntry> {
    entries
        .iter()
        .filter(|entry| range.contains(entry.time_start.date_naive()))
        .cloned()
        .collect()
}

pub fn filter_notes(notes: &[Note], range: DateRange) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| range.contains(note.date_created.date_naive()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyActivity {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub hours: f64,
    pub entries: usize,
    pub average_hours_per_entry: f64,
}

/// Hours and entry counts per calendar month, oldest first.
pub fn monthly_activity(entries: &[TimeEntry]) -> Vec<MonthlyActivity> {
    let mut months: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for entry in entries {
        let key = (entry.time_start.year(), entry.time_start.month());
        let slot = months.entry(key).or_insert((0.0, 0));
        slot.0 += entry.hours();
        slot.1 += 1;
    }

    months
        .into_iter()
        .map(|((year, month), (hours, count))| MonthlyActivity {
            year,
            month,
            label: NaiveDate::from_ymd_opt(year, month, 1)
                .map(|first| first.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{year}-{month:02}")),
            hours,
            entries: count,
            average_hours_per_entry: hours / count.max(1) as f64,
        })
        .collect()
}

/// Percent change between the latest three months and the three before them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ActivityTrend {
    pub hours_trend: f64,
    pub entries_trend: f64,
}

pub fn activity_trend(months: &[MonthlyActivity]) -> ActivityTrend {
    if months.len() < 2 {
        return ActivityTrend::default();
    }

    let len = months.len();
    let recent = &months[len.saturating_sub(3)..];
    let older = &months[len.saturating_sub(6)..len.saturating_sub(3)];

    let recent_hours = mean(recent.iter().map(|m| m.hours));
    let recent_entries = mean(recent.iter().map(|m| m.entries as f64));
    let (older_hours, older_entries) = if older.is_empty() {
        (recent_hours, recent_entries)
    } else {
        (
            mean(older.iter().map(|m| m.hours)),
            mean(older.iter().map(|m| m.entries as f64)),
        )
    };

    ActivityTrend {
        hours_trend: percent_change(recent_hours, older_hours),
        entries_trend: percent_change(recent_entries, older_entries),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn percent_change(recent: f64, older: f64) -> f64 {
    let base = if older == 0.0 { 1.0 } else { older };
    (recent - older) / base * 100.0
}
