//! Common type definitions used across the codebase

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Activity status as reported by the scheduling tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActivityStatus {
    #[default]
    #[serde(rename = "TK_NotStart")]
    NotStarted,
    #[serde(rename = "TK_Active")]
    InProgress,
    #[serde(rename = "TK_Complete")]
    Completed,
}

impl ActivityStatus {
    /// Get the display name for this status
    pub fn display_name(&self) -> &str {
        match self {
            ActivityStatus::NotStarted => "Not Started",
            ActivityStatus::InProgress => "In Progress",
            ActivityStatus::Completed => "Completed",
        }
    }
}

/// The four precedence relationship types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    #[serde(rename = "PR_FS")]
    FinishToStart,
    #[serde(rename = "PR_SS")]
    StartToStart,
    #[serde(rename = "PR_FF")]
    FinishToFinish,
    #[serde(rename = "PR_SF")]
    StartToFinish,
}

impl RelationshipType {
    pub fn display_name(&self) -> &str {
        match self {
            RelationshipType::FinishToStart => "FS",
            RelationshipType::StartToStart => "SS",
            RelationshipType::FinishToFinish => "FF",
            RelationshipType::StartToFinish => "SF",
        }
    }
}

/// Delay classification. Attribution to a responsible party happens in an
/// external layer; the engine only distinguishes concurrent from unclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DelayType {
    Excusable,
    NonExcusable,
    Compensable,
    Concurrent,
    #[default]
    Unknown,
}

/// A single project activity.
///
/// Scheduling attributes (`early_*`, `late_*`, floats, criticality) are
/// mutated in place by the CPM engine; everything else is fixed once the
/// schedule is constructed. Durations and floats are plain day counts, not
/// calendar-adjusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: String,
    #[serde(default)]
    pub activity_code: String,
    #[serde(default)]
    pub activity_name: String,
    pub original_duration: f64,
    #[serde(default)]
    pub remaining_duration: f64,
    #[serde(default)]
    pub actual_duration: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub finish_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub actual_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub actual_finish: Option<NaiveDateTime>,
    #[serde(default)]
    pub early_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub early_finish: Option<NaiveDateTime>,
    #[serde(default)]
    pub late_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub late_finish: Option<NaiveDateTime>,
    #[serde(default)]
    pub total_float: f64,
    #[serde(default)]
    pub free_float: f64,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub percent_complete: f64,
    #[serde(default)]
    pub wbs: String,
    #[serde(default)]
    pub calendar: String,
    #[serde(default)]
    pub predecessors: Vec<String>,
    #[serde(default)]
    pub successors: Vec<String>,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub is_milestone: bool,
}

impl Activity {
    /// Create an activity with the given identity and planned duration.
    pub fn new(activity_id: impl Into<String>, original_duration: f64) -> Self {
        let activity_id = activity_id.into();
        let mut activity = Activity {
            activity_code: activity_id.clone(),
            activity_id,
            activity_name: String::new(),
            original_duration,
            remaining_duration: original_duration,
            actual_duration: 0.0,
            start_date: None,
            finish_date: None,
            actual_start: None,
            actual_finish: None,
            early_start: None,
            early_finish: None,
            late_start: None,
            late_finish: None,
            total_float: 0.0,
            free_float: 0.0,
            status: ActivityStatus::NotStarted,
            percent_complete: 0.0,
            wbs: String::new(),
            calendar: String::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
            is_critical: false,
            is_milestone: false,
        };
        activity.normalize();
        activity
    }

    /// Re-derive the milestone and criticality flags from duration and float.
    /// Only ever promotes the flags; an explicit marker from the source data
    /// is never cleared here.
    pub fn normalize(&mut self) {
        if self.original_duration == 0.0 {
            self.is_milestone = true;
        }
        if self.total_float <= 0.0 {
            self.is_critical = true;
        }
    }

    /// Planned start/finish interval, when both dates are present.
    pub fn planned_interval(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.start_date, self.finish_date) {
            (Some(start), Some(finish)) => Some((start, finish)),
            _ => None,
        }
    }
}

/// A directed, typed, lagged dependency edge.
///
/// Duplicates are permitted in source data and each one is an independent
/// constraint; they must not be collapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub predecessor_id: String,
    pub successor_id: String,
    #[serde(rename = "type")]
    pub rel_type: RelationshipType,
    /// Signed lag in days
    #[serde(default)]
    pub lag: f64,
}

/// Work-hours profile. Calendars are used only as a flat divisor to convert
/// hour counts to days; non-working days are not modeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub name: String,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
    #[serde(default = "default_hours_per_week")]
    pub hours_per_week: f64,
    #[serde(default = "default_hours_per_month")]
    pub hours_per_month: f64,
    #[serde(default = "default_hours_per_year")]
    pub hours_per_year: f64,
}

fn default_hours_per_day() -> f64 {
    8.0
}

fn default_hours_per_week() -> f64 {
    40.0
}

fn default_hours_per_month() -> f64 {
    160.0
}

fn default_hours_per_year() -> f64 {
    1920.0
}

impl Default for Calendar {
    fn default() -> Self {
        Calendar {
            name: "Standard".to_string(),
            hours_per_day: default_hours_per_day(),
            hours_per_week: default_hours_per_week(),
            hours_per_month: default_hours_per_month(),
            hours_per_year: default_hours_per_year(),
        }
    }
}

impl Calendar {
    /// Convert an hour count to days using the flat hours-per-day ratio.
    /// A zero ratio falls back to the standard 8-hour day.
    pub fn hours_to_days(&self, hours: f64) -> f64 {
        let per_day = if self.hours_per_day > 0.0 {
            self.hours_per_day
        } else {
            default_hours_per_day()
        };
        hours / per_day
    }
}

/// A schedule snapshot. Immutable once fully constructed, except for the
/// scheduling attributes the CPM engine annotates in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    pub data_date: NaiveDateTime,
    pub start_date: NaiveDateTime,
    pub finish_date: NaiveDateTime,
    #[serde(default)]
    pub activities: HashMap<String, Activity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub calendars: HashMap<String, Calendar>,
}

impl Schedule {
    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.get(id)
    }

    /// Activities currently flagged critical, ordered by id.
    pub fn critical_path(&self) -> Vec<&Activity> {
        let mut critical: Vec<&Activity> = self
            .activities
            .values()
            .filter(|a| a.is_critical)
            .collect();
        critical.sort_by(|a, b| a.activity_id.cmp(&b.activity_id));
        critical
    }

    /// Zero-duration or explicitly flagged milestones, ordered by id.
    pub fn milestones(&self) -> Vec<&Activity> {
        let mut milestones: Vec<&Activity> = self
            .activities
            .values()
            .filter(|a| a.is_milestone)
            .collect();
        milestones.sort_by(|a, b| a.activity_id.cmp(&b.activity_id));
        milestones
    }

    /// Rebuild predecessor/successor back-references from the relationship
    /// list. Back-references are deduplicated even though the underlying
    /// relationships are not.
    pub fn wire_relationships(&mut self) {
        for activity in self.activities.values_mut() {
            activity.predecessors.clear();
            activity.successors.clear();
        }
        let relationships = self.relationships.clone();
        for rel in &relationships {
            if let Some(pred) = self.activities.get_mut(&rel.predecessor_id) {
                if !pred.successors.contains(&rel.successor_id) {
                    pred.successors.push(rel.successor_id.clone());
                }
            }
            if let Some(succ) = self.activities.get_mut(&rel.successor_id) {
                if !succ.predecessors.contains(&rel.predecessor_id) {
                    succ.predecessors.push(rel.predecessor_id.clone());
                }
            }
        }
    }

    /// Apply `Activity::normalize` to every activity.
    pub fn normalize_activities(&mut self) {
        for activity in self.activities.values_mut() {
            activity.normalize();
        }
    }
}

/// A delay identified by comparing two schedule snapshots.
///
/// Created by the comparator or window engine; immutable afterwards except
/// for `is_concurrent`, which the concurrency-detection pass may set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayEvent {
    pub activity_id: String,
    pub activity_name: String,
    /// Signed delay in days: positive is late, negative is ahead
    pub delay_days: f64,
    pub delay_type: DelayType,
    /// Start bound used for overlap detection
    pub start_date: NaiveDateTime,
    /// End bound used for overlap detection
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub cause: String,
    /// Left empty here; filled by the external attribution layer
    #[serde(default)]
    pub responsible_party: String,
    /// Days of impact on project completion; nonzero only for critical
    /// activities, non-critical delay is assumed absorbed by float
    #[serde(default)]
    pub impact_on_project: f64,
    #[serde(default)]
    pub is_concurrent: bool,
    #[serde(default)]
    pub window_id: Option<String>,
}

/// Results from comparing a baseline snapshot against a current snapshot.
/// Owned by the run that produced it; never shared across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub baseline_project: String,
    pub current_project: String,
    pub baseline_finish: NaiveDateTime,
    pub current_finish: NaiveDateTime,
    pub delayed_activities: Vec<Activity>,
    pub accelerated_activities: Vec<Activity>,
    pub new_critical_activities: Vec<Activity>,
    pub removed_critical_activities: Vec<Activity>,
    /// Activity ids present only in the current schedule
    pub added_activities: Vec<String>,
    /// Activity ids present only in the baseline schedule
    pub deleted_activities: Vec<String>,
    /// current minus baseline total float, where the change is significant
    pub float_changes: BTreeMap<String, f64>,
    pub milestone_delays: BTreeMap<String, f64>,
    /// Project finish movement in days
    pub overall_delay: f64,
    pub spi: f64,
    pub completion_variance: f64,
    pub delay_events: Vec<DelayEvent>,
}

/// Per-window critical path movement.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CriticalPathChanges {
    pub new_critical: Vec<CriticalChange>,
    pub removed_critical: Vec<CriticalChange>,
    pub remained_critical: Vec<CriticalChange>,
    pub critical_delays: Vec<DelayEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalChange {
    pub activity_id: String,
    pub activity_name: String,
    #[serde(default)]
    pub baseline_float: Option<f64>,
    #[serde(default)]
    pub current_float: Option<f64>,
}

/// A bounded time slice over which delay attribution and critical path
/// movement are independently assessed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForensicWindow {
    pub window_id: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub delays: Vec<DelayEvent>,
    pub critical_path_changes: CriticalPathChanges,
    pub float_changes: BTreeMap<String, f64>,
}

impl ForensicWindow {
    pub fn new(window_id: String, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        ForensicWindow {
            window_id,
            start_date,
            end_date,
            delays: Vec::new(),
            critical_path_changes: CriticalPathChanges::default(),
            float_changes: BTreeMap::new(),
        }
    }

    /// Sum of delay days across the window.
    pub fn total_delay(&self) -> f64 {
        self.delays.iter().map(|d| d.delay_days).sum()
    }

    /// Delays with nonzero project impact, i.e. those on the critical path.
    pub fn critical_delays(&self) -> Vec<&DelayEvent> {
        self.delays
            .iter()
            .filter(|d| d.impact_on_project > 0.0)
            .collect()
    }
}

/// Delays within one window whose intervals overlap pairwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrentDelayGroup {
    pub window_id: String,
    pub delays: Vec<DelayEvent>,
    pub total_impact: f64,
}
