//! delaymap analyzes construction project schedules: a CPM pass derives
//! early/late dates, float and criticality from the activity dependency
//! graph, and a forensic comparison engine diffs baseline against current
//! snapshots, classifies delay events, detects concurrent delays and
//! attributes delay to analysis windows.
//!
//! Parsing of proprietary project files and report rendering live outside
//! this crate; schedules arrive fully materialized and results leave as
//! plain aggregates.

// Export modules for library usage
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod cpm;
pub mod forensic;
pub mod io;

// Re-export commonly used types
pub use crate::core::{
    Activity, ActivityStatus, Calendar, ComparisonResult, ConcurrentDelayGroup, DelayEvent,
    DelayType, Error, ForensicWindow, GraphAnomaly, Relationship, RelationshipType, Schedule,
};

pub use crate::analysis::{
    compare, validate, IssueCategory, ValidationIssue, ValidationReport,
};

pub use crate::config::{load_config, AnalysisConfig, DelaymapConfig};

pub use crate::cpm::{compute, critical_chain, find_critical_path, ChainDirection, CpmOptions, CpmReport};

pub use crate::forensic::{
    analyze_windows, as_planned_vs_as_built, concurrent_delay_groups, custom_windows,
    monthly_windows, time_impact_analysis, window_summary, AsBuiltResult, TiaResult,
};

pub use crate::io::{create_writer, load_schedule, CpmSummary, OutputFormat, OutputWriter};
