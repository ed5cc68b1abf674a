use anyhow::Result;
use clap::Parser;
use delaymap::cli::{Cli, Commands};
use delaymap::commands::{self, CompareConfig, CpmConfig, ValidateConfig, WindowsConfig};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            baseline,
            current,
            format,
            output,
            config,
            no_cpm,
        } => commands::compare_schedules(CompareConfig {
            baseline,
            current,
            format: format.into(),
            output,
            config,
            no_cpm,
        }),
        Commands::Windows {
            baseline,
            current,
            monthly,
            period_days,
            start,
            end,
            format,
            output,
            config,
        } => commands::analyze_windows(WindowsConfig {
            baseline,
            current,
            monthly,
            period_days,
            start,
            end,
            format: format.into(),
            output,
            config,
        }),
        Commands::Validate {
            schedule,
            format,
            output,
        } => commands::validate_schedule(ValidateConfig {
            schedule,
            format: format.into(),
            output,
        }),
        Commands::Cpm {
            schedule,
            threshold,
            format,
            output,
        } => commands::run_cpm(CpmConfig {
            schedule,
            threshold,
            format: format.into(),
            output,
        }),
    }
}
