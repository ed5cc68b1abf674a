//! Command handlers behind the CLI.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use log::warn;
use std::path::{Path, PathBuf};

use crate::analysis::{comparison, validation};
use crate::config::{load_config, AnalysisConfig};
use crate::core::Schedule;
use crate::cpm::{self, CpmOptions};
use crate::forensic::windows as forensic;
use crate::io::{create_writer, load_schedule, CpmSummary, OutputFormat};

pub struct CompareConfig {
    pub baseline: PathBuf,
    pub current: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_cpm: bool,
}

pub fn compare_schedules(args: CompareConfig) -> Result<()> {
    let config = load_config(args.config.as_deref())?.analysis;
    let (baseline, current) =
        load_pair(&args.baseline, &args.current, &config, args.no_cpm)?;
    let result = comparison::compare(&baseline, &current, &config)?;
    let mut writer = create_writer(args.format, args.output.as_deref())?;
    writer.write_comparison(&result)
}

pub struct WindowsConfig {
    pub baseline: PathBuf,
    pub current: PathBuf,
    pub monthly: bool,
    pub period_days: Option<u32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn analyze_windows(args: WindowsConfig) -> Result<()> {
    let config = load_config(args.config.as_deref())?.analysis;
    let (baseline, current) = load_pair(&args.baseline, &args.current, &config, false)?;

    let start = args
        .start
        .map(at_midnight)
        .unwrap_or(baseline.start_date);
    let end = args
        .end
        .map(at_midnight)
        .unwrap_or_else(|| baseline.finish_date.max(current.finish_date));

    let windows = if args.monthly {
        forensic::monthly_windows(start, end)
    } else {
        let period = args.period_days.unwrap_or(config.window_period_days);
        forensic::custom_windows(start, end, period)
    };
    let analyzed = forensic::analyze_windows(&baseline, &current, windows, &config)?;
    let groups = forensic::concurrent_delay_groups(&analyzed);

    let mut writer = create_writer(args.format, args.output.as_deref())?;
    writer.write_windows(&analyzed, &groups)
}

pub struct ValidateConfig {
    pub schedule: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

pub fn validate_schedule(args: ValidateConfig) -> Result<()> {
    let schedule = load_schedule(&args.schedule)?;
    let report = validation::validate(&schedule);
    let mut writer = create_writer(args.format, args.output.as_deref())?;
    writer.write_validation(&report)
}

pub struct CpmConfig {
    pub schedule: PathBuf,
    pub threshold: f64,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

pub fn run_cpm(args: CpmConfig) -> Result<()> {
    let mut schedule = load_schedule(&args.schedule)?;
    let report = cpm::compute(
        &mut schedule,
        &CpmOptions {
            critical_threshold: args.threshold,
            default_start: None,
        },
    );
    let summary = CpmSummary {
        project_id: schedule.project_id.clone(),
        processed: report.processed,
        critical_activities: schedule
            .critical_path()
            .iter()
            .map(|a| a.activity_id.clone())
            .collect(),
        anomalies: report.anomalies,
    };
    let mut writer = create_writer(args.format, args.output.as_deref())?;
    writer.write_cpm(&summary)
}

fn load_pair(
    baseline_path: &Path,
    current_path: &Path,
    config: &AnalysisConfig,
    no_cpm: bool,
) -> Result<(Schedule, Schedule)> {
    let mut baseline = load_schedule(baseline_path)?;
    let mut current = load_schedule(current_path)?;
    if !no_cpm {
        annotate(&mut baseline, config);
        annotate(&mut current, config);
    }
    Ok((baseline, current))
}

fn annotate(schedule: &mut Schedule, config: &AnalysisConfig) {
    let options = CpmOptions {
        critical_threshold: config.critical_path_threshold,
        default_start: None,
    };
    let report = cpm::compute(schedule, &options);
    for anomaly in &report.anomalies {
        warn!("{}: {anomaly}", schedule.project_id);
    }
}

fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MIN)
}
