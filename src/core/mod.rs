pub mod dates;
pub mod errors;
pub mod types;

pub use errors::{Error, GraphAnomaly, Result};
pub use types::{
    Activity, ActivityStatus, Calendar, ComparisonResult, ConcurrentDelayGroup, CriticalChange,
    CriticalPathChanges, DelayEvent, DelayType, ForensicWindow, Relationship, RelationshipType,
    Schedule,
};
