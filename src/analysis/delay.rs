//! Delay-event extraction and concurrent-delay detection.

use log::info;

use crate::analysis::comparison::activity_delay_days;
use crate::core::{Activity, DelayEvent, DelayType, Schedule};

/// Convert delayed activities into delay events where the magnitude meets
/// the significance threshold.
///
/// Impact on the project is the full delay for critical activities and zero
/// otherwise; non-critical delay is assumed absorbed by float. The event's
/// overlap bounds come from the baseline start and the current finish, with
/// the baseline data date standing in for a missing start.
pub fn extract_events(
    baseline: &Schedule,
    delayed: &[Activity],
    significance_threshold: f64,
) -> Vec<DelayEvent> {
    let mut events = Vec::new();
    for activity in delayed {
        let Some(baseline_act) = baseline.activity(&activity.activity_id) else {
            continue;
        };
        let delay_days = activity_delay_days(baseline_act, activity);
        if delay_days.abs() < significance_threshold {
            continue;
        }
        let impact = if activity.is_critical { delay_days } else { 0.0 };
        events.push(DelayEvent {
            activity_id: activity.activity_id.clone(),
            activity_name: activity.activity_name.clone(),
            delay_days,
            delay_type: DelayType::Unknown,
            start_date: baseline_act.start_date.unwrap_or(baseline.data_date),
            end_date: activity.finish_date,
            cause: String::new(),
            responsible_party: String::new(),
            impact_on_project: impact,
            is_concurrent: false,
            window_id: None,
        });
    }
    info!("identified {} significant delay events", events.len());
    events
}

/// Flag events whose intervals overlap as concurrent.
///
/// Events are ordered by start date, then every ordered pair (i, j) with i
/// before j is tested for `end_i >= start_j`. The test is pairwise on
/// purpose: a chain of pairwise overlaps is flagged even when the whole
/// chain shares no common instant. Returns the flagged events.
pub fn flag_concurrent(events: &mut [DelayEvent]) -> Vec<DelayEvent> {
    events.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.activity_id.cmp(&b.activity_id))
    });

    let mut concurrent = vec![false; events.len()];
    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            if let Some(end) = events[i].end_date {
                if end >= events[j].start_date {
                    concurrent[i] = true;
                    concurrent[j] = true;
                }
            }
        }
    }

    let mut flagged = Vec::new();
    for (event, is_concurrent) in events.iter_mut().zip(concurrent) {
        if is_concurrent {
            event.is_concurrent = true;
            flagged.push(event.clone());
        }
    }
    info!("found {} concurrent delays", flagged.len());
    flagged
}
