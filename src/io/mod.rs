pub mod loader;
pub mod output;

pub use loader::load_schedule;
pub use output::{create_writer, CpmSummary, OutputFormat, OutputWriter};
