pub mod comparison;
pub mod delay;
pub mod validation;

pub use comparison::{activity_delay_days, compare, milestone_delay_days};
pub use delay::{extract_events, flag_concurrent};
pub use validation::{validate, IssueCategory, ValidationIssue, ValidationReport};
