//! Successor-based float formulas and critical-chain traversal.
//!
//! A lighter alternative to the full CPM pass for schedules where planned
//! dates are already trustworthy and only float against a known project
//! finish is needed. Works entirely from planned dates and the
//! predecessor/successor back-references.

use std::collections::{HashMap, HashSet};

use crate::core::dates;
use crate::core::{Activity, Schedule};

/// Total float of one activity against the project finish.
///
/// With successors: earliest successor planned start minus own planned
/// finish. Without successors: project finish minus own planned finish.
/// Zero when the activity has no finish date.
pub fn total_float_of(activity: &Activity, schedule: &Schedule) -> f64 {
    let Some(finish) = activity.finish_date else {
        return 0.0;
    };
    if activity.successors.is_empty() {
        return dates::diff_days(finish, schedule.finish_date) as f64;
    }
    let earliest = earliest_successor_start(activity, &schedule.activities)
        .unwrap_or(schedule.finish_date);
    dates::diff_days(finish, earliest) as f64
}

/// Free float: earliest successor planned start minus own planned finish,
/// independent of the project finish. Zero without successors or a finish
/// date.
pub fn free_float_of(activity: &Activity, activities: &HashMap<String, Activity>) -> f64 {
    let Some(finish) = activity.finish_date else {
        return 0.0;
    };
    if activity.successors.is_empty() {
        return 0.0;
    }
    match earliest_successor_start(activity, activities) {
        Some(earliest) => dates::diff_days(finish, earliest) as f64,
        None => 0.0,
    }
}

fn earliest_successor_start(
    activity: &Activity,
    activities: &HashMap<String, Activity>,
) -> Option<chrono::NaiveDateTime> {
    activity
        .successors
        .iter()
        .filter_map(|id| activities.get(id))
        .filter_map(|succ| succ.start_date)
        .min()
}

/// Annotate every activity's total and free float with the successor-based
/// formulas.
pub fn annotate_floats(schedule: &mut Schedule) {
    let computed: Vec<(String, f64, f64)> = schedule
        .activities
        .values()
        .map(|activity| {
            (
                activity.activity_id.clone(),
                total_float_of(activity, schedule),
                free_float_of(activity, &schedule.activities),
            )
        })
        .collect();
    for (id, total_float, free_float) in computed {
        if let Some(activity) = schedule.activities.get_mut(&id) {
            activity.total_float = total_float;
            activity.free_float = free_float;
        }
    }
}

/// Mark activities with total float at or below `threshold` critical and
/// return their ids.
pub fn find_critical_path(schedule: &mut Schedule, threshold: f64) -> Vec<String> {
    let mut critical = Vec::new();
    for activity in schedule.activities.values_mut() {
        if activity.total_float <= threshold {
            activity.is_critical = true;
            critical.push(activity.activity_id.clone());
        }
    }
    critical.sort();
    critical
}

/// Direction of a critical-chain walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainDirection {
    Forward,
    Backward,
}

/// Greedy chain of critical activities reachable from `start_id`.
///
/// At each step the first unvisited critical neighbor (successor going
/// forward, predecessor going backward) is taken. The result is one linear
/// chain, an approximation; it is not guaranteed to be the longest or most
/// load-bearing path.
pub fn critical_chain(schedule: &Schedule, start_id: &str, direction: ChainDirection) -> Vec<String> {
    let Some(start) = schedule.activities.get(start_id) else {
        return Vec::new();
    };
    let mut chain = vec![start.activity_id.clone()];
    let mut visited: HashSet<String> = HashSet::from([start.activity_id.clone()]);

    let mut current = start;
    loop {
        let neighbors = match direction {
            ChainDirection::Forward => &current.successors,
            ChainDirection::Backward => &current.predecessors,
        };
        let next = neighbors
            .iter()
            .filter(|id| !visited.contains(*id))
            .filter_map(|id| schedule.activities.get(id))
            .find(|neighbor| neighbor.is_critical);
        match next {
            Some(neighbor) => {
                visited.insert(neighbor.activity_id.clone());
                match direction {
                    ChainDirection::Forward => chain.push(neighbor.activity_id.clone()),
                    ChainDirection::Backward => chain.insert(0, neighbor.activity_id.clone()),
                }
                current = neighbor;
            }
            None => break,
        }
    }
    chain
}
