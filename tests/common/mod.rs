//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use delaymap::{Activity, Relationship, RelationshipType, Schedule};
use std::collections::HashMap;

pub fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn activity(id: &str, duration: f64, start: NaiveDateTime, finish: NaiveDateTime) -> Activity {
    let mut activity = Activity::new(id, duration);
    activity.activity_name = format!("Activity {id}");
    activity.start_date = Some(start);
    activity.finish_date = Some(finish);
    activity
}

pub fn fs(pred: &str, succ: &str) -> Relationship {
    Relationship {
        predecessor_id: pred.to_string(),
        successor_id: succ.to_string(),
        rel_type: RelationshipType::FinishToStart,
        lag: 0.0,
    }
}

pub fn schedule(
    project_id: &str,
    data_date: NaiveDateTime,
    start: NaiveDateTime,
    finish: NaiveDateTime,
    activities: Vec<Activity>,
    relationships: Vec<Relationship>,
) -> Schedule {
    let mut map = HashMap::new();
    for activity in activities {
        map.insert(activity.activity_id.clone(), activity);
    }
    let mut schedule = Schedule {
        project_id: project_id.to_string(),
        project_name: format!("Project {project_id}"),
        data_date,
        start_date: start,
        finish_date: finish,
        activities: map,
        relationships,
        calendars: HashMap::new(),
    };
    schedule.wire_relationships();
    schedule.normalize_activities();
    schedule
}

/// Baseline: a four-activity FS chain ending in a milestone.
///
/// A (10d, Jan 1-11) -> B (20d, Jan 11-31) -> C (10d, Jan 31 - Feb 10)
/// -> MS (milestone, Feb 10). Project runs Jan 1 to Mar 1.
pub fn baseline_chain() -> Schedule {
    let a = activity("A", 10.0, dt(2024, 1, 1), dt(2024, 1, 11));
    let b = activity("B", 20.0, dt(2024, 1, 11), dt(2024, 1, 31));
    let c = activity("C", 10.0, dt(2024, 1, 31), dt(2024, 2, 10));
    let ms = activity("MS", 0.0, dt(2024, 2, 10), dt(2024, 2, 10));
    schedule(
        "BL-1",
        dt(2024, 1, 1),
        dt(2024, 1, 1),
        dt(2024, 3, 1),
        vec![a, b, c, ms],
        vec![fs("A", "B"), fs("B", "C"), fs("C", "MS")],
    )
}

/// Update of [`baseline_chain`] seven days behind plan: A finished five days
/// late, B is half done and forecast seven days late, C and the milestone
/// slipped with it. Data date Feb 1, project finish moved to Mar 8.
pub fn current_chain() -> Schedule {
    use delaymap::ActivityStatus;

    let mut a = activity("A", 10.0, dt(2024, 1, 1), dt(2024, 1, 16));
    a.status = ActivityStatus::Completed;
    a.actual_start = Some(dt(2024, 1, 1));
    a.actual_finish = Some(dt(2024, 1, 16));
    a.percent_complete = 100.0;

    let mut b = activity("B", 20.0, dt(2024, 1, 16), dt(2024, 2, 7));
    b.status = ActivityStatus::InProgress;
    b.actual_start = Some(dt(2024, 1, 16));
    b.percent_complete = 50.0;

    let c = activity("C", 10.0, dt(2024, 2, 7), dt(2024, 2, 17));
    let ms = activity("MS", 0.0, dt(2024, 2, 17), dt(2024, 2, 17));

    schedule(
        "CU-1",
        dt(2024, 2, 1),
        dt(2024, 1, 1),
        dt(2024, 3, 8),
        vec![a, b, c, ms],
        vec![fs("A", "B"), fs("B", "C"), fs("C", "MS")],
    )
}
