//! Completed-tour statistics

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{
        passenger_record::PassengerRecord,
        stats::{GuideStats, TourStats},
    },
    repository::Repository,
    services::tours::GuideDirectory,
};

/// Breakdown key for records nobody has checked in
const NO_GUIDE: &str = "None";

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Statistics for every tour type whose tours have already started
    pub async fn completed_tours(&self) -> AppResult<Vec<TourStats>> {
        let now = Utc::now();
        let records = self.repository.records.list_completed(now).await?;
        let tours = self.repository.tours.list().await?;
        let directory = GuideDirectory::from_tours(&tours);

        Ok(aggregate_tour_stats(&records, &directory, now))
    }
}

#[derive(Default)]
struct Tally {
    clients: i64,
    checked_in: i64,
}

impl Tally {
    fn add(&mut self, record: &PassengerRecord) {
        self.clients += i64::from(record.pax);
        if record.check_in.is_checked_in() {
            self.checked_in += 1;
        }
    }

    /// Party sizes minus checked-in records; not clamped
    fn not_arrived(&self) -> i64 {
        self.clients - self.checked_in
    }
}

struct Group {
    first_date: DateTime<Utc>,
    total: Tally,
    by_guide: BTreeMap<String, Tally>,
}

/// Group records by exact tour type, considering only tours before `now`.
///
/// Output is sorted by earliest tour date, then tour type. Each group's
/// guide breakdown is keyed by attributor and sorted by name.
pub fn aggregate_tour_stats(
    records: &[PassengerRecord],
    directory: &GuideDirectory,
    now: DateTime<Utc>,
) -> Vec<TourStats> {
    let mut groups: BTreeMap<&str, Group> = BTreeMap::new();

    for record in records.iter().filter(|r| r.tour_date < now) {
        let group = groups.entry(record.tour_type.as_str()).or_insert_with(|| Group {
            first_date: record.tour_date,
            total: Tally::default(),
            by_guide: BTreeMap::new(),
        });

        group.first_date = group.first_date.min(record.tour_date);
        group.total.add(record);

        let guide = record.check_in.attributor().unwrap_or(NO_GUIDE);
        group.by_guide.entry(guide.to_string()).or_default().add(record);
    }

    let mut stats: Vec<TourStats> = groups
        .into_iter()
        .map(|(tour_type, group)| TourStats {
            tour_date: group.first_date,
            tour_type: tour_type.to_string(),
            guide_name: directory.guide_for(tour_type).map(str::to_string),
            total_clients: group.total.clients,
            checked_in_count: group.total.checked_in,
            not_arrived_count: group.total.not_arrived(),
            guides: group
                .by_guide
                .into_iter()
                .map(|(guide_name, tally)| GuideStats {
                    guide_name,
                    clients: tally.clients,
                    checked_in_count: tally.checked_in,
                    not_arrived_count: tally.not_arrived(),
                })
                .collect(),
        })
        .collect();

    stats.sort_by(|a, b| {
        a.tour_date
            .cmp(&b.tour_date)
            .then_with(|| a.tour_type.cmp(&b.tour_type))
    });
    stats
}
