//! Schedule snapshot comparison.
//!
//! A stateless diff of two frozen schedules. Both inputs are explicit
//! parameters and the result is a fresh [`ComparisonResult`] per call, so
//! repeated runs over the same pair are idempotent and safe to parallelize.

use log::info;
use std::collections::BTreeMap;

use crate::analysis::delay;
use crate::config::AnalysisConfig;
use crate::core::dates;
use crate::core::{Activity, ActivityStatus, ComparisonResult, Error, Result, Schedule};

/// Compare a baseline snapshot against a current snapshot.
///
/// Activities are paired by id; ids present on one side only are reported as
/// added or deleted, never compared for delay. Fails only when either
/// schedule carries no activities at all.
pub fn compare(
    baseline: &Schedule,
    current: &Schedule,
    config: &AnalysisConfig,
) -> Result<ComparisonResult> {
    if baseline.activities.is_empty() || current.activities.is_empty() {
        return Err(Error::precondition(
            "both baseline and current schedules must be loaded",
        ));
    }

    let mut common: Vec<&str> = baseline
        .activities
        .keys()
        .filter(|id| current.activities.contains_key(*id))
        .map(|id| id.as_str())
        .collect();
    common.sort();
    info!("comparing {} common activities", common.len());

    let mut delayed = Vec::new();
    let mut accelerated = Vec::new();
    let mut new_critical = Vec::new();
    let mut removed_critical = Vec::new();
    let mut float_changes = BTreeMap::new();
    let mut milestone_delays = BTreeMap::new();

    for id in &common {
        let baseline_act = &baseline.activities[*id];
        let current_act = &current.activities[*id];

        let delay_days = activity_delay_days(baseline_act, current_act);
        if delay_days > 0.0 {
            delayed.push(current_act.clone());
        } else if delay_days < 0.0 {
            accelerated.push(current_act.clone());
        }

        if !baseline_act.is_critical && current_act.is_critical {
            new_critical.push(current_act.clone());
        } else if baseline_act.is_critical && !current_act.is_critical {
            removed_critical.push(current_act.clone());
        }

        let float_change = current_act.total_float - baseline_act.total_float;
        if float_change.abs() > config.float_change_threshold {
            float_changes.insert((*id).to_string(), float_change);
        }

        if baseline_act.is_milestone {
            let milestone_delay = milestone_delay_days(baseline_act, current_act);
            if milestone_delay != 0.0 {
                milestone_delays.insert((*id).to_string(), milestone_delay);
            }
        }
    }

    let mut added: Vec<String> = current
        .activities
        .keys()
        .filter(|id| !baseline.activities.contains_key(*id))
        .cloned()
        .collect();
    added.sort();
    let mut deleted: Vec<String> = baseline
        .activities
        .keys()
        .filter(|id| !current.activities.contains_key(*id))
        .cloned()
        .collect();
    deleted.sort();

    let overall_delay = dates::diff_days(baseline.finish_date, current.finish_date) as f64;
    let spi = schedule_performance_index(baseline, current);
    let completion_variance = completion_variance_points(baseline, current);

    let mut delay_events =
        delay::extract_events(baseline, &delayed, config.significant_delay_threshold);
    delay::flag_concurrent(&mut delay_events);

    info!("schedule comparison complete, overall delay {overall_delay} days");

    Ok(ComparisonResult {
        baseline_project: baseline.project_id.clone(),
        current_project: current.project_id.clone(),
        baseline_finish: baseline.finish_date,
        current_finish: current.finish_date,
        delayed_activities: delayed,
        accelerated_activities: accelerated,
        new_critical_activities: new_critical,
        removed_critical_activities: removed_critical,
        added_activities: added,
        deleted_activities: deleted,
        float_changes,
        milestone_delays,
        overall_delay,
        spi,
        completion_variance,
        delay_events,
    })
}

/// Signed delay in days for one activity pair.
///
/// Completed work is measured against truth (actual finish vs baseline
/// plan); in-progress and not-started work against the current forecast
/// (current planned finish vs baseline plan). Missing dates contribute no
/// delay.
pub fn activity_delay_days(baseline: &Activity, current: &Activity) -> f64 {
    match current.status {
        ActivityStatus::Completed => match (current.actual_finish, baseline.finish_date) {
            (Some(actual), Some(planned)) => dates::diff_days(planned, actual) as f64,
            _ => 0.0,
        },
        ActivityStatus::InProgress | ActivityStatus::NotStarted => {
            match (current.finish_date, baseline.finish_date) {
                (Some(forecast), Some(planned)) => dates::diff_days(planned, forecast) as f64,
                _ => 0.0,
            }
        }
    }
}

/// Milestone slip in days: actual finish when achieved, else the current
/// forecast, against the baseline planned finish.
pub fn milestone_delay_days(baseline: &Activity, current: &Activity) -> f64 {
    let Some(planned) = baseline.finish_date else {
        return 0.0;
    };
    match current.actual_finish.or(current.finish_date) {
        Some(finish) => dates::diff_days(planned, finish) as f64,
        None => 0.0,
    }
}

/// SPI = earned duration over planned duration across activities present in
/// both schedules. 1.0 when nothing was planned.
fn schedule_performance_index(baseline: &Schedule, current: &Schedule) -> f64 {
    let mut total_planned = 0.0;
    let mut total_earned = 0.0;
    for (id, baseline_act) in &baseline.activities {
        if let Some(current_act) = current.activities.get(id) {
            total_planned += baseline_act.original_duration;
            total_earned += (current_act.percent_complete / 100.0) * baseline_act.original_duration;
        }
    }
    if total_planned > 0.0 {
        total_earned / total_planned
    } else {
        1.0
    }
}

/// Earned-duration completion minus the time-linear expected completion, in
/// percentage points. 0.0 when the baseline spans no time.
fn completion_variance_points(baseline: &Schedule, current: &Schedule) -> f64 {
    if baseline.finish_date <= baseline.start_date {
        return 0.0;
    }
    let total_days = dates::diff_days(baseline.start_date, baseline.finish_date) as f64;
    let elapsed_days = dates::diff_days(baseline.start_date, current.data_date) as f64;
    let expected = (elapsed_days / total_days) * 100.0;

    let total_baseline_duration: f64 = baseline
        .activities
        .values()
        .map(|a| a.original_duration)
        .sum();
    let total_earned: f64 = baseline
        .activities
        .iter()
        .filter_map(|(id, baseline_act)| {
            current
                .activities
                .get(id)
                .map(|current_act| (current_act.percent_complete / 100.0) * baseline_act.original_duration)
        })
        .sum();
    let actual = if total_baseline_duration > 0.0 {
        (total_earned / total_baseline_duration) * 100.0
    } else {
        0.0
    };
    actual - expected
}
