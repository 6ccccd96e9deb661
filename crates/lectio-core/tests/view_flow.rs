use chrono::{TimeZone, Utc};
use lectio_core::source::load_schedule;
use lectio_core::view::ScheduleView;
use tempfile::tempdir;

const FIXTURE: &str = r#"{
    "isCache": false,
    "items": [
        {
            "number": 1,
            "days": [
                {
                    "info": { "type": 0, "weekNumber": 18, "date": "2024-05-01T00:00:00.000+03:00" },
                    "lessons": []
                },
                {
                    "info": { "weekNumber": 18, "date": "2024-05-03T00:00:00.000Z" },
                    "lessons": [
                        {
                            "number": 1,
                            "timeRange": "08:30-10:00",
                            "lessonName": ["Math", "Lab"],
                            "isDistant": true
                        },
                        {
                            "number": 2,
                            "timeRange": "10:10-11:40",
                            "lessonName": "Databases",
                            "teacherName": "Orlova N. P.",
                            "auditoryName": "G-501",
                            "isLecture": true
                        }
                    ]
                }
            ]
        },
        {
            "number": 2,
            "days": [
                {
                    "info": { "weekNumber": 42, "date": "2023-12-15T00:00:00.000+03:00" },
                    "lessons": [ { "lessonName": "Old autumn lecture" } ]
                }
            ]
        }
    ]
}"#;

#[test]
fn load_flatten_anchor_window_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("schedule.json");
    std::fs::write(&path, FIXTURE).expect("write fixture");

    let schedule = load_schedule(&path).expect("load schedule");
    assert_eq!(schedule.items.len(), 2);

    // Wednesday 2024-05-01 and Friday 2024-05-03 are in the spring bucket;
    // the December day is not. No day matches "today".
    let now = Utc
        .with_ymd_and_hms(2024, 5, 2, 9, 0, 0)
        .single()
        .expect("valid now");

    let mut view = ScheduleView::new();
    view.load(&schedule, now);

    let state = view.loaded().expect("loaded state");
    assert_eq!(state.days.len(), 2);
    assert_eq!(state.days.days[0].date_key(), "2024-05-01T00:00:00.000+03:00");
    assert_eq!(state.days.days[1].date_key(), "2024-05-03T00:00:00.000Z");

    // Anchor falls to the nearest future day with lessons, and the banner
    // goes immediately before it, not before the empty May 1st.
    assert_eq!(state.anchor.as_deref(), Some("2024-05-03T00:00:00.000Z"));
    assert!(!state.has_today);
    assert!(state.banner_before("2024-05-03T00:00:00.000Z"));
    assert!(!state.banner_before("2024-05-01T00:00:00.000+03:00"));
    assert!(state.is_highlighted("2024-05-03T00:00:00.000Z"));
    assert!(!state.is_highlighted("2024-05-01T00:00:00.000+03:00"));

    // Lesson-name normalization happened at the decode boundary.
    let friday = &state.days.days[1];
    assert_eq!(friday.lessons[0].lesson_name, "Math, Lab");
    assert_eq!(friday.lessons[0].display_auditory(), "Remote");
    assert_eq!(friday.lessons[1].display_auditory(), "G-501");

    assert_eq!(
        state.days.label_for("2024-05-03T00:00:00.000Z"),
        Some("Friday, 3 May")
    );

    // Two days, anchor at index 1: everything is already visible and the
    // expand commands are no-ops at the edges.
    assert_eq!(state.window.start, 0);
    assert_eq!(state.window.end, 2);
    view.expand_earlier();
    view.expand_later();
    let state = view.loaded().expect("loaded state");
    assert_eq!(state.window.start, 0);
    assert_eq!(state.window.end, 2);

    let exported = serde_json::to_string(view.visible()).expect("export visible days");
    assert!(exported.contains("\"Math, Lab\""));
    assert!(!exported.contains("Old autumn lecture"));
}

#[test]
fn today_outranks_next_available_day() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("schedule.json");
    std::fs::write(
        &path,
        r#"{
            "isCache": false,
            "items": [
                {
                    "days": [
                        {
                            "info": { "date": "2024-05-03T00:00:00.000+03:00" },
                            "lessons": [ { "lessonName": "Databases" } ]
                        },
                        {
                            "info": { "date": "2024-05-02T00:00:00.000+03:00" },
                            "lessons": []
                        }
                    ]
                }
            ]
        }"#,
    )
    .expect("write fixture");

    let now = Utc
        .with_ymd_and_hms(2024, 5, 2, 9, 0, 0)
        .single()
        .expect("valid now");

    let schedule = load_schedule(&path).expect("load schedule");
    let mut view = ScheduleView::new();
    view.load(&schedule, now);

    let state = view.loaded().expect("loaded state");
    assert_eq!(state.anchor.as_deref(), Some("2024-05-02T00:00:00.000+03:00"));
    assert!(state.has_today);
    assert!(state.is_highlighted("2024-05-02T00:00:00.000+03:00"));
    assert!(!state.banner_before("2024-05-02T00:00:00.000+03:00"));
}

#[test]
fn empty_payload_yields_empty_derived_state() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("schedule.json");
    std::fs::write(&path, r#"{ "isCache": true, "items": [] }"#).expect("write fixture");

    let now = Utc
        .with_ymd_and_hms(2024, 5, 2, 9, 0, 0)
        .single()
        .expect("valid now");

    let schedule = load_schedule(&path).expect("load schedule");
    let mut view = ScheduleView::new();
    view.load(&schedule, now);

    let state = view.loaded().expect("loaded state");
    assert!(state.from_cache);
    assert!(state.days.is_empty());
    assert_eq!(state.anchor, None);
    assert!(state.window.is_empty());
    assert!(view.visible().is_empty());
}
