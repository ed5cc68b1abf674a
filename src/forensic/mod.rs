pub mod windows;

pub use windows::{
    analyze_window, analyze_windows, as_planned_vs_as_built, concurrent_delay_groups,
    custom_windows, monthly_windows, time_impact_analysis, window_summary, AsBuiltResult,
    FinishVariance, TiaResult, WindowSummaryRow,
};
