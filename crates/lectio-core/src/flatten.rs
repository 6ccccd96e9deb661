use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::datetime::{day_label, parse_schedule_date};
use crate::model::{Day, Schedule};
use crate::semester::is_current_semester;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct FlattenedDays {
    pub days: Vec<Day>,
    pub labels: HashMap<String, String>,
}

impl FlattenedDays {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn index_of(&self, date_key: &str) -> Option<usize> {
        self.days.iter().position(|day| day.info.date == date_key)
    }

    pub fn label_for(&self, date_key: &str) -> Option<&str> {
        self.labels.get(date_key).map(String::as_str)
    }
}

/// Collapses every (item, day) pair into one deduplicated, semester-filtered
/// sequence sorted by parsed instant. Days whose date string parses as
/// neither feed layout are dropped with a diagnostic, never an error.
#[tracing::instrument(skip(schedule, now))]
pub fn flatten(schedule: &Schedule, now: DateTime<Utc>) -> FlattenedDays {
    let mut instants: HashMap<String, DateTime<Utc>> = HashMap::new();
    let mut days: Vec<Day> = Vec::new();

    for item in &schedule.items {
        for day in &item.days {
            let raw = day.info.date.as_str();
            if instants.contains_key(raw) {
                continue;
            }

            let instant = match parse_schedule_date(raw) {
                Ok(instant) => instant,
                Err(err) => {
                    warn!(date = raw, error = %err, "skipping day with unparseable date");
                    continue;
                }
            };

            if !is_current_semester(instant, now) {
                continue;
            }

            instants.insert(raw.to_string(), instant);
            days.push(day.clone());
        }
    }

    // Lexical fallback keeps the order deterministic if an instant is
    // somehow missing at sort time.
    days.sort_by(
        |a, b| match (instants.get(&a.info.date), instants.get(&b.info.date)) {
            (Some(da), Some(db)) => da.cmp(db),
            _ => a.info.date.cmp(&b.info.date),
        },
    );

    let mut labels = HashMap::with_capacity(days.len());
    for day in &days {
        if let Some(instant) = instants.get(&day.info.date) {
            labels.insert(day.info.date.clone(), day_label(*instant));
        }
    }

    debug!(kept = days.len(), "flattened schedule days");
    FlattenedDays { days, labels }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::flatten;
    use crate::model::{Day, DayInfo, Schedule, ScheduleItem};

    fn day(date: &str) -> Day {
        Day {
            info: DayInfo {
                day_type: None,
                week_number: None,
                date: date.to_string(),
            },
            lessons: vec![],
        }
    }

    fn schedule_of(days_per_item: Vec<Vec<Day>>) -> Schedule {
        Schedule {
            is_cache: false,
            items: days_per_item
                .into_iter()
                .map(|days| ScheduleItem { number: None, days })
                .collect(),
        }
    }

    fn spring_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0)
            .single()
            .expect("valid now")
    }

    #[test]
    fn sorts_days_chronologically() {
        let schedule = schedule_of(vec![vec![
            day("2024-05-07T00:00:00.000+03:00"),
            day("2024-05-01T00:00:00.000+03:00"),
            day("2024-05-03T00:00:00.000Z"),
        ]]);

        let flat = flatten(&schedule, spring_now());
        let keys: Vec<&str> = flat.days.iter().map(|d| d.date_key()).collect();
        assert_eq!(
            keys,
            vec![
                "2024-05-01T00:00:00.000+03:00",
                "2024-05-03T00:00:00.000Z",
                "2024-05-07T00:00:00.000+03:00",
            ]
        );
    }

    #[test]
    fn filters_other_semester_and_bad_dates() {
        let schedule = schedule_of(vec![
            vec![
                day("2024-05-01T00:00:00.000+03:00"),
                day("2023-10-09T00:00:00.000+03:00"),
            ],
            vec![day("not a date")],
        ]);

        let flat = flatten(&schedule, spring_now());
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.days[0].date_key(), "2024-05-01T00:00:00.000+03:00");
    }

    #[test]
    fn dedupes_by_date_key_first_wins() {
        let mut first = day("2024-05-01T00:00:00.000+03:00");
        first.info.week_number = Some(18);
        let mut second = day("2024-05-01T00:00:00.000+03:00");
        second.info.week_number = Some(99);

        let schedule = schedule_of(vec![vec![first], vec![second]]);
        let flat = flatten(&schedule, spring_now());
        assert_eq!(flat.len(), 1);
        assert_eq!(flat.days[0].info.week_number, Some(18));
    }

    #[test]
    fn builds_label_map() {
        let schedule = schedule_of(vec![vec![day("2024-05-01T00:00:00.000+03:00")]]);
        let flat = flatten(&schedule, spring_now());
        assert_eq!(
            flat.label_for("2024-05-01T00:00:00.000+03:00"),
            Some("Wednesday, 1 May")
        );
        assert_eq!(flat.index_of("2024-05-01T00:00:00.000+03:00"), Some(0));
    }

    #[test]
    fn empty_schedule_flattens_empty() {
        let schedule = schedule_of(vec![]);
        let flat = flatten(&schedule, spring_now());
        assert!(flat.is_empty());
        assert!(flat.labels.is_empty());
    }
}
