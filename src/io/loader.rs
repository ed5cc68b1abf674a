//! Schedule loading.
//!
//! Schedules arrive as JSON files already materialized by the external
//! project-file parser: dates resolved, durations and lags in days. The
//! loader only wires back-references and re-derives milestone/criticality
//! flags; it never reads raw project-file bytes.

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::Schedule;

pub fn load_schedule(path: &Path) -> Result<Schedule> {
    let file = File::open(path)
        .with_context(|| format!("failed to open schedule file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut schedule: Schedule = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse schedule file: {}", path.display()))?;
    schedule.wire_relationships();
    schedule.normalize_activities();
    info!(
        "loaded schedule {} with {} activities and {} relationships",
        schedule.project_id,
        schedule.activities.len(),
        schedule.relationships.len()
    );
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_wires_a_minimal_schedule() {
        let raw = r#"{
            "project_id": "P-100",
            "project_name": "Test Project",
            "data_date": "2024-03-01T00:00:00",
            "start_date": "2024-01-01T00:00:00",
            "finish_date": "2024-06-01T00:00:00",
            "activities": {
                "A": {"activity_id": "A", "original_duration": 10.0,
                      "start_date": "2024-01-01T00:00:00"},
                "B": {"activity_id": "B", "original_duration": 0.0}
            },
            "relationships": [
                {"predecessor_id": "A", "successor_id": "B", "type": "PR_FS", "lag": 1.5}
            ]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();

        let schedule = load_schedule(file.path()).unwrap();
        assert_eq!(schedule.project_id, "P-100");
        assert_eq!(schedule.activities["A"].successors, vec!["B".to_string()]);
        assert_eq!(schedule.activities["B"].predecessors, vec!["A".to_string()]);
        // zero-duration activity is promoted to a milestone on load
        assert!(schedule.activities["B"].is_milestone);
        assert_eq!(schedule.relationships[0].lag, 1.5);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_schedule(Path::new("/nonexistent/schedule.json")).is_err());
    }
}
