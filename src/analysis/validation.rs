//! Schedule data-quality validation.
//!
//! A stateless pass producing categorized findings. Findings never abort
//! anything; they are diagnostics for the reviewer, not delay conclusions.

use serde::{Deserialize, Serialize};

use crate::core::{ActivityStatus, Schedule};

/// Total float below this many days is a data-quality flag
const NEGATIVE_FLOAT_LIMIT: f64 = -30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    MissingDates,
    LogicErrors,
    OutOfSequence,
    NegativeFloat,
    MissingRelationships,
}

impl IssueCategory {
    pub fn display_name(&self) -> &str {
        match self {
            IssueCategory::MissingDates => "Missing Dates",
            IssueCategory::LogicErrors => "Logic Errors",
            IssueCategory::OutOfSequence => "Out of Sequence",
            IssueCategory::NegativeFloat => "Negative Float",
            IssueCategory::MissingRelationships => "Missing Relationships",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub activity_id: String,
    pub category: IssueCategory,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn by_category(&self, category: IssueCategory) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.category == category)
            .collect()
    }
}

/// Run all data-quality checks over a schedule.
pub fn validate(schedule: &Schedule) -> ValidationReport {
    let mut issues = Vec::new();
    let mut ids: Vec<&String> = schedule.activities.keys().collect();
    ids.sort();

    for id in ids {
        let activity = &schedule.activities[id];

        if activity.status != ActivityStatus::NotStarted && activity.actual_start.is_none() {
            issues.push(ValidationIssue {
                activity_id: id.clone(),
                category: IssueCategory::MissingDates,
                message: "started activity missing actual start".to_string(),
            });
        }
        if activity.status == ActivityStatus::Completed && activity.actual_finish.is_none() {
            issues.push(ValidationIssue {
                activity_id: id.clone(),
                category: IssueCategory::MissingDates,
                message: "completed activity missing actual finish".to_string(),
            });
        }

        if let (Some(start), Some(finish)) = (activity.start_date, activity.finish_date) {
            if start > finish {
                issues.push(ValidationIssue {
                    activity_id: id.clone(),
                    category: IssueCategory::LogicErrors,
                    message: "start date after finish date".to_string(),
                });
            }
        }

        if let (Some(actual_start), Some(planned_start)) = (activity.actual_start, activity.start_date)
        {
            if actual_start < planned_start && activity.status == ActivityStatus::InProgress {
                let has_incomplete_predecessor = activity
                    .predecessors
                    .iter()
                    .filter_map(|pred_id| schedule.activities.get(pred_id))
                    .any(|pred| pred.status != ActivityStatus::Completed);
                if has_incomplete_predecessor {
                    issues.push(ValidationIssue {
                        activity_id: id.clone(),
                        category: IssueCategory::OutOfSequence,
                        message: "started with incomplete predecessors".to_string(),
                    });
                }
            }
        }

        if activity.total_float < NEGATIVE_FLOAT_LIMIT {
            issues.push(ValidationIssue {
                activity_id: id.clone(),
                category: IssueCategory::NegativeFloat,
                message: format!(
                    "excessive negative float ({} days)",
                    activity.total_float
                ),
            });
        }

        if !activity.is_milestone && activity.predecessors.is_empty() && activity.successors.is_empty()
        {
            issues.push(ValidationIssue {
                activity_id: id.clone(),
                category: IssueCategory::MissingRelationships,
                message: "activity has no relationships".to_string(),
            });
        }
    }

    ValidationReport { issues }
}

/// Activities whose actual start precedes an unfinished predecessor, judged
/// purely from actual dates.
pub fn out_of_sequence_activities(schedule: &Schedule) -> Vec<String> {
    let mut found = Vec::new();
    let mut ids: Vec<&String> = schedule.activities.keys().collect();
    ids.sort();

    for id in ids {
        let activity = &schedule.activities[id];
        if !matches!(
            activity.status,
            ActivityStatus::InProgress | ActivityStatus::Completed
        ) {
            continue;
        }
        let Some(actual_start) = activity.actual_start else {
            continue;
        };
        let out_of_sequence = activity
            .predecessors
            .iter()
            .filter_map(|pred_id| schedule.activities.get(pred_id))
            .any(|pred| match pred.actual_finish {
                None => true,
                Some(pred_finish) => pred_finish > actual_start,
            });
        if out_of_sequence {
            found.push(id.clone());
        }
    }
    found
}
