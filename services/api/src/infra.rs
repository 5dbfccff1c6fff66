use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use review_insights::workflows::connectwise::MemberSnapshot;
use review_insights::workflows::notes::{ManualReview, ManualReviewRepository, RepositoryError};
use review_insights::workflows::performance::{
    DateRange, EmployeeMetrics, ReportingPeriod, ReviewProvider,
};
use review_insights::workflows::records::{MemberId, NoteId};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) provider: ReviewProvider,
}

type ReviewKey = (MemberId, NoteId);

/// Process-local reviewer annotations; lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryManualReviewRepository {
    reviews: Arc<Mutex<HashMap<ReviewKey, ManualReview>>>,
}

impl InMemoryManualReviewRepository {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<ReviewKey, ManualReview>>, RepositoryError> {
        self.reviews
            .lock()
            .map_err(|_| RepositoryError::Unavailable("review store mutex poisoned".to_string()))
    }
}

impl ManualReviewRepository for InMemoryManualReviewRepository {
    fn save(
        &self,
        member_id: MemberId,
        note_id: NoteId,
        review: ManualReview,
    ) -> Result<(), RepositoryError> {
        self.guard()?.insert((member_id, note_id), review);
        Ok(())
    }

    fn for_member(
        &self,
        member_id: MemberId,
    ) -> Result<BTreeMap<NoteId, ManualReview>, RepositoryError> {
        Ok(self
            .guard()?
            .iter()
            .filter(|((member, _), _)| *member == member_id)
            .map(|((_, note), review)| (*note, review.clone()))
            .collect())
    }
}

/// Narrow a snapshot to the reporting window ending `today` and aggregate it.
pub(crate) fn metrics_for_period(
    snapshot: MemberSnapshot,
    period: ReportingPeriod,
    today: Option<NaiveDate>,
) -> (EmployeeMetrics, DateRange) {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let range = period.range(today);
    (snapshot.within(range).into_metrics(), range)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
