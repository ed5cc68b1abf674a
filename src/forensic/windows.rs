//! Forensic window analysis.
//!
//! Partitions the analysis horizon into contiguous windows, then re-scopes
//! the schedule comparison to each window: which delays land in it, how the
//! critical path moved, and which critical delays overlap. Windows are
//! independent once the two schedules are frozen, so they are analyzed on a
//! rayon worker pool and collected back in window order.

use chrono::NaiveDateTime;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::comparison::{self, activity_delay_days};
use crate::config::AnalysisConfig;
use crate::core::dates;
use crate::core::{
    Activity, ActivityStatus, ComparisonResult, ConcurrentDelayGroup, CriticalChange,
    CriticalPathChanges, DelayEvent, DelayType, ForensicWindow, Result, Schedule,
};

/// One window per calendar month from `start` to `end`, the final window
/// clipped to `end`.
pub fn monthly_windows(start: NaiveDateTime, end: NaiveDateTime) -> Vec<ForensicWindow> {
    let windows: Vec<ForensicWindow> = dates::month_windows(start, end)
        .into_iter()
        .enumerate()
        .map(|(i, (window_start, window_end))| {
            ForensicWindow::new(
                format!("WINDOW_{:03}_{}", i + 1, window_start.format("%Y%m")),
                window_start,
                window_end,
            )
        })
        .collect();
    info!("created {} monthly windows", windows.len());
    windows
}

/// Fixed-length windows of `period_days` from `start` to `end`, the final
/// window clipped to `end`.
pub fn custom_windows(
    start: NaiveDateTime,
    end: NaiveDateTime,
    period_days: u32,
) -> Vec<ForensicWindow> {
    let mut windows = Vec::new();
    if period_days == 0 {
        return windows;
    }
    let mut current = start;
    let mut number = 1;
    while current < end {
        let window_end = (current + dates::days(period_days as f64)).min(end);
        windows.push(ForensicWindow::new(
            format!("WINDOW_{:03}_{}", number, current.format("%Y%m%d")),
            current,
            window_end,
        ));
        current = window_end;
        number += 1;
    }
    info!("created {} {period_days}-day windows", windows.len());
    windows
}

/// Run the comparison once, then analyze every window against it.
pub fn analyze_windows(
    baseline: &Schedule,
    current: &Schedule,
    windows: Vec<ForensicWindow>,
    config: &AnalysisConfig,
) -> Result<Vec<ForensicWindow>> {
    let comparison = comparison::compare(baseline, current, config)?;
    info!("analyzing {} windows", windows.len());
    Ok(windows
        .into_par_iter()
        .map(|window| analyze_window(window, baseline, current, &comparison))
        .collect())
}

/// Scope one window's delay membership, critical path movement and float
/// changes from an already-computed comparison.
pub fn analyze_window(
    mut window: ForensicWindow,
    baseline: &Schedule,
    current: &Schedule,
    comparison: &ComparisonResult,
) -> ForensicWindow {
    window.delays = window_delays(&window, baseline, comparison);
    window.critical_path_changes = critical_path_changes(&window, baseline, current, comparison);
    window.float_changes = comparison.float_changes.clone();
    window
}

fn window_delays(
    window: &ForensicWindow,
    baseline: &Schedule,
    comparison: &ComparisonResult,
) -> Vec<DelayEvent> {
    comparison
        .delayed_activities
        .iter()
        .filter_map(|activity| {
            let baseline_act = baseline.activity(&activity.activity_id)?;
            if !delay_in_window(baseline_act, activity, window) {
                return None;
            }
            let delay_days = activity_delay_days(baseline_act, activity);
            let impact = if activity.is_critical { delay_days } else { 0.0 };
            Some(DelayEvent {
                activity_id: activity.activity_id.clone(),
                activity_name: activity.activity_name.clone(),
                delay_days,
                delay_type: DelayType::Unknown,
                start_date: baseline_act.start_date.unwrap_or(window.start_date),
                end_date: activity.finish_date.or(Some(window.end_date)),
                cause: String::new(),
                responsible_party: String::new(),
                impact_on_project: impact,
                is_concurrent: false,
                window_id: Some(window.window_id.clone()),
            })
        })
        .collect()
}

/// Broad overlap-based membership: a delay counts toward a window when the
/// baseline planned finish lands in it, the actual finish lands in it, or
/// the baseline interval overlaps it at all. An activity may legitimately be
/// attributed to several windows.
fn delay_in_window(baseline_act: &Activity, current_act: &Activity, window: &ForensicWindow) -> bool {
    if let Some(finish) = baseline_act.finish_date {
        if window.start_date <= finish && finish <= window.end_date {
            return true;
        }
    }
    if let Some(actual_finish) = current_act.actual_finish {
        if window.start_date <= actual_finish && actual_finish <= window.end_date {
            return true;
        }
    }
    activity_in_window(baseline_act, window)
}

fn activity_in_window(activity: &Activity, window: &ForensicWindow) -> bool {
    matches!(
        activity.planned_interval(),
        Some((start, finish)) if start <= window.end_date && finish >= window.start_date
    )
}

fn critical_path_changes(
    window: &ForensicWindow,
    baseline: &Schedule,
    current: &Schedule,
    comparison: &ComparisonResult,
) -> CriticalPathChanges {
    let mut changes = CriticalPathChanges::default();

    for activity in &comparison.new_critical_activities {
        if activity_in_window(activity, window) {
            changes.new_critical.push(CriticalChange {
                activity_id: activity.activity_id.clone(),
                activity_name: activity.activity_name.clone(),
                baseline_float: baseline
                    .activity(&activity.activity_id)
                    .map(|a| a.total_float),
                current_float: Some(activity.total_float),
            });
        }
    }

    for activity in &comparison.removed_critical_activities {
        if activity_in_window(activity, window) {
            changes.removed_critical.push(CriticalChange {
                activity_id: activity.activity_id.clone(),
                activity_name: activity.activity_name.clone(),
                baseline_float: None,
                current_float: None,
            });
        }
    }

    let mut ids: Vec<&String> = current.activities.keys().collect();
    ids.sort();
    for id in ids {
        let activity = &current.activities[id];
        if !activity.is_critical || !activity_in_window(activity, window) {
            continue;
        }
        let stayed = baseline.activity(id).map(|a| a.is_critical).unwrap_or(false);
        if stayed {
            changes.remained_critical.push(CriticalChange {
                activity_id: activity.activity_id.clone(),
                activity_name: activity.activity_name.clone(),
                baseline_float: None,
                current_float: Some(activity.total_float),
            });
        }
    }

    changes.critical_delays = window
        .delays
        .iter()
        .filter(|delay| {
            current
                .activity(&delay.activity_id)
                .map(|a| a.is_critical)
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    changes
}

/// Group each window's critical delays into overlapping clusters, using the
/// same pairwise interval test as the comparator's concurrency pass.
pub fn concurrent_delay_groups(windows: &[ForensicWindow]) -> Vec<ConcurrentDelayGroup> {
    let mut groups = Vec::new();
    for window in windows {
        if window.delays.len() <= 1 {
            continue;
        }
        let critical = window.critical_delays();
        if critical.len() <= 1 {
            continue;
        }
        for (i, first) in critical.iter().enumerate() {
            let mut cluster: Vec<DelayEvent> = vec![(*first).clone()];
            for second in &critical[i + 1..] {
                if let Some(end) = first.end_date {
                    if end >= second.start_date {
                        cluster.push((*second).clone());
                    }
                }
            }
            if cluster.len() > 1 {
                let total_impact = cluster.iter().map(|d| d.impact_on_project).sum();
                groups.push(ConcurrentDelayGroup {
                    window_id: window.window_id.clone(),
                    delays: cluster,
                    total_impact,
                });
            }
        }
    }
    info!("found {} concurrent delay groups", groups.len());
    groups
}

/// Time Impact Analysis: the finish-date shift between a baseline and an
/// impacted schedule, attributed to one delay event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiaResult {
    pub activity_id: String,
    pub baseline_finish: NaiveDateTime,
    pub impacted_finish: NaiveDateTime,
    pub project_impact_days: f64,
    pub affected_critical_path: bool,
    pub baseline_critical_count: usize,
    pub impacted_critical_count: usize,
}

pub fn time_impact_analysis(
    baseline: &Schedule,
    impacted: &Schedule,
    delay_event: &DelayEvent,
) -> TiaResult {
    let project_impact_days =
        dates::diff_days(baseline.finish_date, impacted.finish_date) as f64;
    let baseline_critical = baseline.critical_path();
    let affected_critical_path = baseline_critical
        .iter()
        .any(|a| a.activity_id == delay_event.activity_id);
    TiaResult {
        activity_id: delay_event.activity_id.clone(),
        baseline_finish: baseline.finish_date,
        impacted_finish: impacted.finish_date,
        project_impact_days,
        affected_critical_path,
        baseline_critical_count: baseline_critical.len(),
        impacted_critical_count: impacted.critical_path().len(),
    }
}

/// Finish variance of one completed activity against its baseline plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishVariance {
    pub activity_id: String,
    pub variance_days: f64,
}

/// As-planned vs as-built: completed activities bucketed by finish variance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsBuiltResult {
    pub comparison: ComparisonResult,
    pub early: Vec<FinishVariance>,
    pub late: Vec<FinishVariance>,
    pub on_time: Vec<FinishVariance>,
    pub total_completed: usize,
    pub percent_early: f64,
    pub percent_late: f64,
    pub percent_on_time: f64,
    /// Mean variance across the late bucket
    pub average_delay: f64,
    pub total_project_delay: f64,
}

/// Compare the original plan against actual construction, bucketing each
/// completed activity as early, late or on time within the configured
/// tolerance.
pub fn as_planned_vs_as_built(
    baseline: &Schedule,
    as_built: &Schedule,
    config: &AnalysisConfig,
) -> Result<AsBuiltResult> {
    let comparison = comparison::compare(baseline, as_built, config)?;

    let mut early = Vec::new();
    let mut late = Vec::new();
    let mut on_time = Vec::new();

    let mut ids: Vec<&String> = as_built.activities.keys().collect();
    ids.sort();
    for id in ids {
        let activity = &as_built.activities[id];
        if activity.status != ActivityStatus::Completed {
            continue;
        }
        let Some(baseline_act) = baseline.activity(id) else {
            continue;
        };
        let (Some(actual_finish), Some(planned_finish)) =
            (activity.actual_finish, baseline_act.finish_date)
        else {
            continue;
        };
        let variance_days = dates::diff_days(planned_finish, actual_finish) as f64;
        let variance = FinishVariance {
            activity_id: id.clone(),
            variance_days,
        };
        if variance_days < -config.on_time_tolerance_days {
            early.push(variance);
        } else if variance_days > config.on_time_tolerance_days {
            late.push(variance);
        } else {
            on_time.push(variance);
        }
    }

    let total_completed = early.len() + late.len() + on_time.len();
    let percent = |count: usize| {
        if total_completed > 0 {
            count as f64 / total_completed as f64 * 100.0
        } else {
            0.0
        }
    };
    let average_delay = if late.is_empty() {
        0.0
    } else {
        late.iter().map(|v| v.variance_days).sum::<f64>() / late.len() as f64
    };

    Ok(AsBuiltResult {
        percent_early: percent(early.len()),
        percent_late: percent(late.len()),
        percent_on_time: percent(on_time.len()),
        total_completed,
        average_delay,
        total_project_delay: comparison.overall_delay,
        comparison,
        early,
        late,
        on_time,
    })
}

/// Flat per-window summary rows for the reporting collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSummaryRow {
    pub window_id: String,
    pub start_date: String,
    pub end_date: String,
    pub total_delays: usize,
    pub critical_delays: usize,
    pub total_delay_days: f64,
    pub new_critical: usize,
    pub removed_critical: usize,
}

pub fn window_summary(windows: &[ForensicWindow]) -> Vec<WindowSummaryRow> {
    windows
        .iter()
        .map(|window| WindowSummaryRow {
            window_id: window.window_id.clone(),
            start_date: window.start_date.format("%Y-%m-%d").to_string(),
            end_date: window.end_date.format("%Y-%m-%d").to_string(),
            total_delays: window.delays.len(),
            critical_delays: window.critical_delays().len(),
            total_delay_days: window.total_delay(),
            new_critical: window.critical_path_changes.new_critical.len(),
            removed_critical: window.critical_path_changes.removed_critical.len(),
        })
        .collect()
}
