use chrono::{DateTime, Utc};
use tracing::debug;

use crate::datetime::{parse_schedule_date, same_campus_day};
use crate::model::Schedule;

/// First day, in source iteration order, that falls on today's calendar
/// date in the campus timezone. Lesson count is irrelevant here.
pub fn today_day_key(schedule: &Schedule, now: DateTime<Utc>) -> Option<String> {
    for item in &schedule.items {
        for day in &item.days {
            if let Ok(instant) = parse_schedule_date(&day.info.date) {
                if same_campus_day(instant, now) {
                    return Some(day.info.date.clone());
                }
            }
        }
    }
    None
}

/// Earliest day at or after `now` that has at least one lesson. When two
/// days share the earliest instant the first one encountered wins.
pub fn next_available_day_key(schedule: &Schedule, now: DateTime<Utc>) -> Option<String> {
    let mut next: Option<(DateTime<Utc>, &str)> = None;

    for item in &schedule.items {
        for day in &item.days {
            let Ok(instant) = parse_schedule_date(&day.info.date) else {
                continue;
            };
            if instant < now || day.lessons.is_empty() {
                continue;
            }
            match next {
                Some((best, _)) if instant >= best => {}
                _ => next = Some((instant, day.info.date.as_str())),
            }
        }
    }

    next.map(|(_, key)| key.to_string())
}

/// The date-key the UI should foreground: today if the feed has it,
/// otherwise the nearest future day with classes.
#[tracing::instrument(skip(schedule, now))]
pub fn resolve_anchor(schedule: &Schedule, now: DateTime<Utc>) -> Option<String> {
    if let Some(key) = today_day_key(schedule, now) {
        debug!(anchor = %key, "anchored to today");
        return Some(key);
    }

    let next = next_available_day_key(schedule, now);
    match &next {
        Some(key) => debug!(anchor = %key, "anchored to next day with lessons"),
        None => debug!("no anchor: schedule has no relevant days"),
    }
    next
}

pub fn has_today(schedule: &Schedule, now: DateTime<Utc>) -> bool {
    today_day_key(schedule, now).is_some()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{has_today, next_available_day_key, resolve_anchor, today_day_key};
    use crate::model::{Day, DayInfo, Lesson, Schedule, ScheduleItem};

    fn lesson(name: &str) -> Lesson {
        serde_json::from_str(&format!(r#"{{"lessonName": "{name}"}}"#)).expect("decode lesson")
    }

    fn day(date: &str, lessons: Vec<Lesson>) -> Day {
        Day {
            info: DayInfo {
                day_type: None,
                week_number: None,
                date: date.to_string(),
            },
            lessons,
        }
    }

    fn schedule_of(days: Vec<Day>) -> Schedule {
        Schedule {
            is_cache: false,
            items: vec![ScheduleItem { number: None, days }],
        }
    }

    fn now() -> chrono::DateTime<Utc> {
        // 2024-05-02 12:00 campus time.
        Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0)
            .single()
            .expect("valid now")
    }

    #[test]
    fn today_wins_even_without_lessons() {
        let schedule = schedule_of(vec![
            day(
                "2024-05-03T00:00:00.000+03:00",
                vec![lesson("Databases")],
            ),
            day("2024-05-02T00:00:00.000+03:00", vec![]),
        ]);

        assert_eq!(
            resolve_anchor(&schedule, now()).as_deref(),
            Some("2024-05-02T00:00:00.000+03:00")
        );
        assert!(has_today(&schedule, now()));
    }

    #[test]
    fn falls_back_to_next_day_with_lessons() {
        let schedule = schedule_of(vec![
            day("2024-05-01T00:00:00.000+03:00", vec![]),
            day(
                "2024-05-03T00:00:00.000+03:00",
                vec![lesson("Databases")],
            ),
        ]);

        assert_eq!(today_day_key(&schedule, now()), None);
        assert_eq!(
            resolve_anchor(&schedule, now()).as_deref(),
            Some("2024-05-03T00:00:00.000+03:00")
        );
        assert!(!has_today(&schedule, now()));
    }

    #[test]
    fn next_day_must_have_lessons() {
        let schedule = schedule_of(vec![
            day("2024-05-03T00:00:00.000+03:00", vec![]),
            day(
                "2024-05-06T00:00:00.000+03:00",
                vec![lesson("Statistics")],
            ),
        ]);

        assert_eq!(
            next_available_day_key(&schedule, now()).as_deref(),
            Some("2024-05-06T00:00:00.000+03:00")
        );
    }

    #[test]
    fn past_days_never_anchor() {
        let schedule = schedule_of(vec![day(
            "2024-04-26T00:00:00.000+03:00",
            vec![lesson("History")],
        )]);

        assert_eq!(resolve_anchor(&schedule, now()), None);
    }

    #[test]
    fn equal_instants_keep_first_encountered() {
        let schedule = schedule_of(vec![
            day(
                "2024-05-04T00:00:00.000+03:00",
                vec![lesson("Optics")],
            ),
            day(
                "2024-05-04T01:00:00.000+04:00",
                vec![lesson("Algebra")],
            ),
        ]);

        // Both strings denote the same instant; the scan keeps the day it
        // saw first.
        assert_eq!(
            next_available_day_key(&schedule, now()).as_deref(),
            Some("2024-05-04T00:00:00.000+03:00")
        );
    }

    #[test]
    fn empty_schedule_has_no_anchor() {
        let schedule = schedule_of(vec![]);
        assert_eq!(resolve_anchor(&schedule, now()), None);
        assert!(!has_today(&schedule, now()));
    }
}
