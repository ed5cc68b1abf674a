//! Critical Path Method forward/backward pass.
//!
//! Dates propagate in an explicit topological order built with Kahn's
//! algorithm over relationship in-degrees. Activities caught in a dependency
//! cycle never enter the order; they are reported as a [`GraphAnomaly`] and
//! excluded from propagation, so the pass terminates on any input.
//!
//! The backward pass seeds every sink from its own early finish rather than
//! from a single project-wide ceiling. With several sinks finishing at
//! different dates, late dates near a short sink can understate float; this
//! mirrors the schedule data the engine is calibrated against.
//!
//! Duration and lag arithmetic is flat day counts. Calendar non-working days
//! are not applied.

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::collections::{HashMap, VecDeque};

use crate::core::dates;
use crate::core::{GraphAnomaly, Relationship, RelationshipType, Schedule};

/// Tuning knobs for a CPM run.
#[derive(Debug, Clone, Default)]
pub struct CpmOptions {
    /// Total float at or below this value marks an activity critical
    pub critical_threshold: f64,
    /// Seed for source activities with no recorded start date. Defaults to
    /// the schedule data date.
    pub default_start: Option<NaiveDateTime>,
}

/// Outcome of a CPM run: best-effort counts plus accumulated anomalies.
#[derive(Debug, Clone)]
pub struct CpmReport {
    /// Activities that entered the topological order
    pub processed: usize,
    /// Activities flagged critical after the run
    pub critical_count: usize,
    pub anomalies: Vec<GraphAnomaly>,
}

#[derive(Debug, Clone, Copy, Default)]
struct DateCell {
    early_start: Option<NaiveDateTime>,
    early_finish: Option<NaiveDateTime>,
    late_start: Option<NaiveDateTime>,
    late_finish: Option<NaiveDateTime>,
}

/// Run the forward and backward passes over `schedule`, annotating early/late
/// dates, float and criticality in place.
///
/// Missing predecessor or successor records simply contribute no constraint;
/// missing dates degrade to pass-through values. Structural defects are
/// accumulated in the report, never raised.
pub fn compute(schedule: &mut Schedule, options: &CpmOptions) -> CpmReport {
    let mut ids: Vec<String> = schedule.activities.keys().cloned().collect();
    ids.sort();

    let usable: Vec<Relationship> = schedule
        .relationships
        .iter()
        .filter(|r| {
            schedule.activities.contains_key(&r.predecessor_id)
                && schedule.activities.contains_key(&r.successor_id)
        })
        .cloned()
        .collect();
    let skipped = schedule.relationships.len() - usable.len();
    if skipped > 0 {
        warn!("{skipped} relationships reference unknown activities; skipped");
    }

    let (order, cycle_members) = topological_order(&ids, &usable);
    let mut anomalies = Vec::new();
    if !cycle_members.is_empty() {
        warn!(
            "dependency cycle: {} activities excluded from propagation",
            cycle_members.len()
        );
        anomalies.push(GraphAnomaly::Cycle {
            members: cycle_members,
        });
    }
    anomalies.extend(fragment_anomalies(&ids, &usable));

    let mut incoming: HashMap<&str, Vec<&Relationship>> = HashMap::new();
    let mut outgoing: HashMap<&str, Vec<&Relationship>> = HashMap::new();
    for rel in &usable {
        incoming.entry(&rel.successor_id).or_default().push(rel);
        outgoing.entry(&rel.predecessor_id).or_default().push(rel);
    }

    let default_start = options.default_start.unwrap_or(schedule.data_date);
    let mut cells: HashMap<String, DateCell> = HashMap::new();

    // Forward pass
    for id in &order {
        let activity = &schedule.activities[id];
        let duration = dates::days(activity.original_duration);
        let rels = incoming.get(id.as_str());

        let mut start_bound: Option<NaiveDateTime> = None;
        let mut finish_bound: Option<NaiveDateTime> = None;
        for rel in rels.into_iter().flatten() {
            let pred = cells
                .get(&rel.predecessor_id)
                .copied()
                .unwrap_or_default();
            let lag = dates::days(rel.lag);
            match rel.rel_type {
                RelationshipType::FinishToStart => {
                    push_max(&mut start_bound, pred.early_finish.map(|d| d + lag));
                }
                RelationshipType::StartToStart => {
                    push_max(&mut start_bound, pred.early_start.map(|d| d + lag));
                }
                RelationshipType::FinishToFinish => {
                    push_max(&mut finish_bound, pred.early_finish.map(|d| d + lag));
                }
                RelationshipType::StartToFinish => {
                    push_max(&mut finish_bound, pred.early_start.map(|d| d + lag));
                }
            }
        }

        // FF/SF bound the finish; fold back to a start bound via the duration
        let mut derived = start_bound;
        push_max(&mut derived, finish_bound.map(|f| f - duration));

        let has_predecessors = rels.map(|r| !r.is_empty()).unwrap_or(false);
        let early_start = if has_predecessors {
            derived.or(activity.early_start)
        } else {
            activity
                .early_start
                .or(activity.start_date)
                .or(Some(default_start))
        };
        let early_finish = early_start.map(|es| es + duration);
        cells.insert(
            id.clone(),
            DateCell {
                early_start,
                early_finish,
                late_start: None,
                late_finish: None,
            },
        );
    }

    // Backward pass, reverse topological order
    for id in order.iter().rev() {
        let activity = &schedule.activities[id];
        let duration = dates::days(activity.original_duration);
        let rels = outgoing.get(id.as_str());

        let mut start_bound: Option<NaiveDateTime> = None;
        let mut finish_bound: Option<NaiveDateTime> = None;
        for rel in rels.into_iter().flatten() {
            let succ = cells
                .get(&rel.successor_id)
                .copied()
                .unwrap_or_default();
            let lag = dates::days(rel.lag);
            match rel.rel_type {
                RelationshipType::FinishToStart => {
                    push_min(&mut finish_bound, succ.late_start.map(|d| d - lag));
                }
                RelationshipType::StartToStart => {
                    push_min(&mut start_bound, succ.late_start.map(|d| d - lag));
                }
                RelationshipType::FinishToFinish => {
                    push_min(&mut finish_bound, succ.late_finish.map(|d| d - lag));
                }
                RelationshipType::StartToFinish => {
                    push_min(&mut start_bound, succ.late_finish.map(|d| d - lag));
                }
            }
        }

        let mut derived = finish_bound;
        push_min(&mut derived, start_bound.map(|s| s + duration));

        let has_successors = rels.map(|r| !r.is_empty()).unwrap_or(false);
        let cell = cells.entry(id.clone()).or_default();
        let late_finish = if has_successors {
            derived.or(activity.late_finish)
        } else {
            // sink: zero slack assumed at this terminal node
            activity.late_finish.or(cell.early_finish)
        };
        cell.late_finish = late_finish;
        cell.late_start = late_finish.map(|lf| lf - duration);
    }

    // Float, free float, criticality
    for id in &order {
        let cell = cells.get(id).copied().unwrap_or_default();
        let free_float = free_float_of(outgoing.get(id.as_str()), &cells, &cell);
        let activity = schedule
            .activities
            .get_mut(id)
            .expect("topological order only contains known ids");

        activity.early_start = cell.early_start;
        activity.early_finish = cell.early_finish;
        activity.late_start = cell.late_start;
        activity.late_finish = cell.late_finish;

        let mut total_float = activity.total_float;
        let mut dated = false;
        if let (Some(es), Some(ls)) = (cell.early_start, cell.late_start) {
            total_float = dates::diff_days_f64(es, ls);
            dated = true;
        }
        if let (Some(ef), Some(lf)) = (cell.early_finish, cell.late_finish) {
            let finish_float = dates::diff_days_f64(ef, lf);
            total_float = if dated {
                total_float.min(finish_float)
            } else {
                finish_float
            };
            dated = true;
        }
        activity.total_float = total_float;
        if dated {
            activity.is_critical = total_float <= options.critical_threshold;
        }
        activity.free_float = free_float;
    }

    let critical_count = schedule
        .activities
        .values()
        .filter(|a| a.is_critical)
        .count();
    info!(
        "CPM pass complete: {} of {} activities processed, {} critical",
        order.len(),
        ids.len(),
        critical_count
    );
    debug!("{} graph anomalies", anomalies.len());

    CpmReport {
        processed: order.len(),
        critical_count,
        anomalies,
    }
}

fn push_max(bound: &mut Option<NaiveDateTime>, candidate: Option<NaiveDateTime>) {
    if let Some(candidate) = candidate {
        *bound = Some(match *bound {
            Some(current) => current.max(candidate),
            None => candidate,
        });
    }
}

fn push_min(bound: &mut Option<NaiveDateTime>, candidate: Option<NaiveDateTime>) {
    if let Some(candidate) = candidate {
        *bound = Some(match *bound {
            Some(current) => current.min(candidate),
            None => candidate,
        });
    }
}

/// Slack before this activity delays its own successors: minimum over
/// outgoing relationships of successor early date minus the lagged own date.
/// Zero when there are no successors or nothing contributes.
fn free_float_of(
    rels: Option<&Vec<&Relationship>>,
    cells: &HashMap<String, DateCell>,
    own: &DateCell,
) -> f64 {
    let mut slack: Option<f64> = None;
    for rel in rels.into_iter().flatten() {
        let succ = cells
            .get(&rel.successor_id)
            .copied()
            .unwrap_or_default();
        let lag = dates::days(rel.lag);
        let candidate = match rel.rel_type {
            RelationshipType::FinishToStart => pair(own.early_finish, succ.early_start, lag),
            RelationshipType::StartToStart => pair(own.early_start, succ.early_start, lag),
            RelationshipType::FinishToFinish => pair(own.early_finish, succ.early_finish, lag),
            RelationshipType::StartToFinish => pair(own.early_start, succ.early_finish, lag),
        };
        if let Some(candidate) = candidate {
            slack = Some(match slack {
                Some(current) => current.min(candidate),
                None => candidate,
            });
        }
    }
    slack.unwrap_or(0.0)
}

fn pair(own: Option<NaiveDateTime>, succ: Option<NaiveDateTime>, lag: chrono::Duration) -> Option<f64> {
    match (own, succ) {
        (Some(own), Some(succ)) => Some(dates::diff_days_f64(own + lag, succ)),
        _ => None,
    }
}

/// Kahn's algorithm. Returns the topological order and, separately, the
/// activities left with positive in-degree when the queue drained: the
/// members of at least one dependency cycle.
fn topological_order(ids: &[String], relationships: &[Relationship]) -> (Vec<String>, Vec<String>) {
    let mut in_degree: HashMap<&str, usize> = ids.iter().map(|id| (id.as_str(), 0)).collect();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for rel in relationships {
        *in_degree.entry(&rel.successor_id).or_insert(0) += 1;
        adjacency
            .entry(&rel.predecessor_id)
            .or_default()
            .push(&rel.successor_id);
    }

    let mut queue: VecDeque<&str> = ids
        .iter()
        .map(|id| id.as_str())
        .filter(|id| in_degree[id] == 0)
        .collect();
    let mut order = Vec::with_capacity(ids.len());
    while let Some(id) = queue.pop_front() {
        order.push(id.to_string());
        for succ in adjacency.get(id).into_iter().flatten() {
            let degree = in_degree
                .get_mut(succ)
                .expect("adjacency only references known ids");
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(*succ);
            }
        }
    }

    let mut cycle: Vec<String> = in_degree
        .iter()
        .filter(|(_, degree)| **degree > 0)
        .map(|(id, _)| id.to_string())
        .collect();
    cycle.sort();
    (order, cycle)
}

/// Weakly-connected components other than the largest, ignoring singletons
/// (relationship-less activities are a validator finding, not a graph
/// anomaly).
fn fragment_anomalies(ids: &[String], relationships: &[Relationship]) -> Vec<GraphAnomaly> {
    let mut undirected: HashMap<&str, Vec<&str>> = HashMap::new();
    for rel in relationships {
        undirected
            .entry(&rel.predecessor_id)
            .or_default()
            .push(&rel.successor_id);
        undirected
            .entry(&rel.successor_id)
            .or_default()
            .push(&rel.predecessor_id);
    }

    let mut seen: HashMap<&str, bool> = ids.iter().map(|id| (id.as_str(), false)).collect();
    let mut components: Vec<Vec<String>> = Vec::new();
    for id in ids {
        if seen[id.as_str()] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![id.as_str()];
        seen.insert(id, true);
        while let Some(node) = stack.pop() {
            component.push(node.to_string());
            for next in undirected.get(node).into_iter().flatten() {
                if let Some(visited) = seen.get_mut(next) {
                    if !*visited {
                        *visited = true;
                        stack.push(*next);
                    }
                }
            }
        }
        component.sort();
        components.push(component);
    }

    components.retain(|c| c.len() > 1);
    if components.len() <= 1 {
        return Vec::new();
    }
    let largest = components
        .iter()
        .enumerate()
        .max_by_key(|(_, c)| c.len())
        .map(|(i, _)| i)
        .unwrap_or(0);
    components
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != largest)
        .map(|(_, members)| GraphAnomaly::DisconnectedFragment { members })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Activity, RelationshipType};
    use chrono::NaiveDate;
    use std::collections::HashMap as StdHashMap;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn rel(pred: &str, succ: &str, rel_type: RelationshipType, lag: f64) -> Relationship {
        Relationship {
            predecessor_id: pred.to_string(),
            successor_id: succ.to_string(),
            rel_type,
            lag,
        }
    }

    fn schedule_of(activities: Vec<Activity>, relationships: Vec<Relationship>) -> Schedule {
        let mut map = StdHashMap::new();
        for activity in activities {
            map.insert(activity.activity_id.clone(), activity);
        }
        let mut schedule = Schedule {
            project_id: "P".to_string(),
            project_name: String::new(),
            data_date: dt(2024, 1, 1),
            start_date: dt(2024, 1, 1),
            finish_date: dt(2024, 6, 1),
            activities: map,
            relationships,
            calendars: StdHashMap::new(),
        };
        schedule.wire_relationships();
        schedule
    }

    #[test]
    fn topological_order_reports_cycle_members() {
        let ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let rels = vec![
            rel("A", "B", RelationshipType::FinishToStart, 0.0),
            rel("B", "A", RelationshipType::FinishToStart, 0.0),
        ];
        let (order, cycle) = topological_order(&ids, &rels);
        assert_eq!(order, vec!["C".to_string()]);
        assert_eq!(cycle, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn chain_propagates_early_dates() {
        let mut a = Activity::new("A", 10.0);
        a.start_date = Some(dt(2024, 1, 1));
        let b = Activity::new("B", 5.0);
        let mut schedule = schedule_of(
            vec![a, b],
            vec![rel("A", "B", RelationshipType::FinishToStart, 2.0)],
        );
        let report = compute(&mut schedule, &CpmOptions::default());
        assert!(report.anomalies.is_empty());
        assert_eq!(report.processed, 2);
        let b = &schedule.activities["B"];
        assert_eq!(b.early_start, Some(dt(2024, 1, 13)));
        assert_eq!(b.early_finish, Some(dt(2024, 1, 18)));
    }

    #[test]
    fn finish_to_finish_anchors_successor_finish() {
        let mut a = Activity::new("A", 10.0);
        a.start_date = Some(dt(2024, 1, 1));
        let b = Activity::new("B", 4.0);
        let mut schedule = schedule_of(
            vec![a, b],
            vec![rel("A", "B", RelationshipType::FinishToFinish, 0.0)],
        );
        compute(&mut schedule, &CpmOptions::default());
        let b = &schedule.activities["B"];
        // A finishes Jan 11; B's finish is pinned there, start backed off
        assert_eq!(b.early_finish, Some(dt(2024, 1, 11)));
        assert_eq!(b.early_start, Some(dt(2024, 1, 7)));
    }

    #[test]
    fn chain_is_critical_with_zero_float() {
        let mut a = Activity::new("A", 10.0);
        a.start_date = Some(dt(2024, 1, 1));
        a.total_float = 99.0;
        a.is_critical = false;
        let b = Activity::new("B", 5.0);
        let mut schedule = schedule_of(
            vec![a, b],
            vec![rel("A", "B", RelationshipType::FinishToStart, 0.0)],
        );
        let report = compute(&mut schedule, &CpmOptions::default());
        assert_eq!(report.critical_count, 2);
        for activity in schedule.activities.values() {
            assert_eq!(activity.total_float, 0.0);
            assert!(activity.is_critical);
        }
    }

    #[test]
    fn parallel_branch_carries_float() {
        // A -> C (10d) and B -> C (2d); B has 8 days of slack
        let mut a = Activity::new("A", 10.0);
        a.start_date = Some(dt(2024, 1, 1));
        let mut b = Activity::new("B", 2.0);
        b.start_date = Some(dt(2024, 1, 1));
        let c = Activity::new("C", 5.0);
        let mut schedule = schedule_of(
            vec![a, b, c],
            vec![
                rel("A", "C", RelationshipType::FinishToStart, 0.0),
                rel("B", "C", RelationshipType::FinishToStart, 0.0),
            ],
        );
        compute(&mut schedule, &CpmOptions::default());
        let b = &schedule.activities["B"];
        assert_eq!(b.total_float, 8.0);
        assert!(!b.is_critical);
        assert_eq!(b.free_float, 8.0);
        assert!(schedule.activities["A"].is_critical);
        assert!(schedule.activities["C"].is_critical);
    }

    #[test]
    fn cycle_members_are_skipped_not_fatal() {
        let mut a = Activity::new("A", 3.0);
        a.start_date = Some(dt(2024, 1, 1));
        let b = Activity::new("B", 3.0);
        let c = Activity::new("C", 3.0);
        let mut schedule = schedule_of(
            vec![a, b, c],
            vec![
                rel("B", "C", RelationshipType::FinishToStart, 0.0),
                rel("C", "B", RelationshipType::FinishToStart, 0.0),
            ],
        );
        let report = compute(&mut schedule, &CpmOptions::default());
        assert_eq!(report.processed, 1);
        assert_eq!(
            report.anomalies,
            vec![GraphAnomaly::Cycle {
                members: vec!["B".to_string(), "C".to_string()]
            }]
        );
        assert!(schedule.activities["B"].early_start.is_none());
    }

    #[test]
    fn seed_falls_back_to_data_date() {
        let a = Activity::new("A", 5.0);
        let mut schedule = schedule_of(vec![a], vec![]);
        compute(&mut schedule, &CpmOptions::default());
        assert_eq!(schedule.activities["A"].early_start, Some(dt(2024, 1, 1)));
    }

    #[test]
    fn two_fragments_reported() {
        let mut a = Activity::new("A", 1.0);
        a.start_date = Some(dt(2024, 1, 1));
        let b = Activity::new("B", 1.0);
        let mut c = Activity::new("C", 1.0);
        c.start_date = Some(dt(2024, 2, 1));
        let d = Activity::new("D", 1.0);
        let mut schedule = schedule_of(
            vec![a, b, c, d],
            vec![
                rel("A", "B", RelationshipType::FinishToStart, 0.0),
                rel("C", "D", RelationshipType::FinishToStart, 0.0),
            ],
        );
        let report = compute(&mut schedule, &CpmOptions::default());
        let fragments: Vec<_> = report
            .anomalies
            .iter()
            .filter(|a| matches!(a, GraphAnomaly::DisconnectedFragment { .. }))
            .collect();
        assert_eq!(fragments.len(), 1);
    }
}
