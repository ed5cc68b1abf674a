mod common;

use common::{activity, baseline_chain, dt, fs, schedule};
use delaymap::cpm::{compute, CpmOptions};
use delaymap::{GraphAnomaly, Relationship, RelationshipType};
use pretty_assertions::assert_eq;

#[test]
fn chain_schedule_is_fully_critical() {
    let mut schedule = baseline_chain();
    let report = compute(&mut schedule, &CpmOptions::default());

    assert_eq!(report.processed, 4);
    assert!(report.anomalies.is_empty());
    assert_eq!(report.critical_count, 4);

    let a = &schedule.activities["A"];
    assert_eq!(a.early_start, Some(dt(2024, 1, 1)));
    assert_eq!(a.early_finish, Some(dt(2024, 1, 11)));
    assert_eq!(a.late_start, Some(dt(2024, 1, 1)));
    assert_eq!(a.total_float, 0.0);

    let ms = &schedule.activities["MS"];
    assert_eq!(ms.early_start, Some(dt(2024, 2, 10)));
    assert_eq!(ms.early_finish, Some(dt(2024, 2, 10)));
}

#[test]
fn source_activities_keep_their_recorded_start() {
    let mut schedule = baseline_chain();
    compute(&mut schedule, &CpmOptions::default());
    for activity in schedule.activities.values() {
        if activity.predecessors.is_empty() {
            assert_eq!(activity.early_start, activity.start_date);
        }
    }
}

#[test]
fn total_float_is_late_minus_early_and_drives_criticality() {
    // A -> C and B -> C, where B's branch is 8 days shorter
    let a = activity("A", 10.0, dt(2024, 1, 1), dt(2024, 1, 11));
    let b = activity("B", 2.0, dt(2024, 1, 1), dt(2024, 1, 3));
    let c = activity("C", 5.0, dt(2024, 1, 11), dt(2024, 1, 16));
    let mut s = schedule(
        "P",
        dt(2024, 1, 1),
        dt(2024, 1, 1),
        dt(2024, 2, 1),
        vec![a, b, c],
        vec![fs("A", "C"), fs("B", "C")],
    );
    compute(&mut s, &CpmOptions::default());

    for activity in s.activities.values() {
        let (Some(es), Some(ls)) = (activity.early_start, activity.late_start) else {
            panic!("all activities should carry early/late dates");
        };
        let (Some(ef), Some(lf)) = (activity.early_finish, activity.late_finish) else {
            panic!("all activities should carry early/late dates");
        };
        let start_float = (ls - es).num_days() as f64;
        let finish_float = (lf - ef).num_days() as f64;
        assert_eq!(activity.total_float, start_float.min(finish_float));
        assert_eq!(activity.is_critical, activity.total_float <= 0.0);
    }
    assert_eq!(s.activities["B"].total_float, 8.0);
    assert!(!s.activities["B"].is_critical);
}

#[test]
fn lag_shifts_successor_start() {
    let a = activity("A", 5.0, dt(2024, 1, 1), dt(2024, 1, 6));
    let b = activity("B", 5.0, dt(2024, 1, 6), dt(2024, 1, 11));
    let mut s = schedule(
        "P",
        dt(2024, 1, 1),
        dt(2024, 1, 1),
        dt(2024, 2, 1),
        vec![a, b],
        vec![Relationship {
            predecessor_id: "A".to_string(),
            successor_id: "B".to_string(),
            rel_type: RelationshipType::StartToStart,
            lag: 3.0,
        }],
    );
    compute(&mut s, &CpmOptions::default());
    assert_eq!(s.activities["B"].early_start, Some(dt(2024, 1, 4)));
}

#[test]
fn negative_lag_is_honored() {
    let a = activity("A", 10.0, dt(2024, 1, 1), dt(2024, 1, 11));
    let b = activity("B", 5.0, dt(2024, 1, 11), dt(2024, 1, 16));
    let mut s = schedule(
        "P",
        dt(2024, 1, 1),
        dt(2024, 1, 1),
        dt(2024, 2, 1),
        vec![a, b],
        vec![Relationship {
            predecessor_id: "A".to_string(),
            successor_id: "B".to_string(),
            rel_type: RelationshipType::FinishToStart,
            lag: -2.0,
        }],
    );
    compute(&mut s, &CpmOptions::default());
    assert_eq!(s.activities["B"].early_start, Some(dt(2024, 1, 9)));
}

#[test]
fn criticality_threshold_is_configurable() {
    let a = activity("A", 10.0, dt(2024, 1, 1), dt(2024, 1, 11));
    let b = activity("B", 2.0, dt(2024, 1, 1), dt(2024, 1, 3));
    let c = activity("C", 5.0, dt(2024, 1, 11), dt(2024, 1, 16));
    let mut s = schedule(
        "P",
        dt(2024, 1, 1),
        dt(2024, 1, 1),
        dt(2024, 2, 1),
        vec![a, b, c],
        vec![fs("A", "C"), fs("B", "C")],
    );
    let options = CpmOptions {
        critical_threshold: 10.0,
        ..CpmOptions::default()
    };
    let report = compute(&mut s, &options);
    // B's 8 days of float sit inside the widened threshold
    assert_eq!(report.critical_count, 3);
}

#[test]
fn cycle_is_reported_and_other_activities_still_propagate() {
    let a = activity("A", 5.0, dt(2024, 1, 1), dt(2024, 1, 6));
    let b = activity("B", 5.0, dt(2024, 1, 6), dt(2024, 1, 11));
    let c = activity("C", 5.0, dt(2024, 1, 11), dt(2024, 1, 16));
    let d = activity("D", 5.0, dt(2024, 1, 16), dt(2024, 1, 21));
    let mut s = schedule(
        "P",
        dt(2024, 1, 1),
        dt(2024, 1, 1),
        dt(2024, 2, 1),
        vec![a, b, c, d],
        vec![fs("A", "B"), fs("C", "D"), fs("D", "C")],
    );
    let report = compute(&mut s, &CpmOptions::default());

    assert_eq!(report.processed, 2);
    assert!(report.anomalies.contains(&GraphAnomaly::Cycle {
        members: vec!["C".to_string(), "D".to_string()]
    }));
    // the healthy chain still got dates
    assert_eq!(s.activities["B"].early_start, Some(dt(2024, 1, 6)));
    // cycle members were left untouched
    assert_eq!(s.activities["C"].early_start, None);
}

#[test]
fn missing_relationship_endpoints_are_skipped() {
    let a = activity("A", 5.0, dt(2024, 1, 1), dt(2024, 1, 6));
    let mut s = schedule(
        "P",
        dt(2024, 1, 1),
        dt(2024, 1, 1),
        dt(2024, 2, 1),
        vec![a],
        vec![fs("A", "GHOST")],
    );
    let report = compute(&mut s, &CpmOptions::default());
    assert_eq!(report.processed, 1);
    assert_eq!(s.activities["A"].early_finish, Some(dt(2024, 1, 6)));
}
