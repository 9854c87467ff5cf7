use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prosumer::cli::{
    handle_estimate_command, handle_profile_command, handle_report_command, EstimateArgs,
    ProfileCommands, ReportArgs,
};
use prosumer::config::{paths::ProsumerPaths, settings::Settings};
use prosumer::engine::{MAX_HOURLY_CONSUMPTION_KWH, MAX_PV_POWER_KWP};

#[derive(Parser)]
#[command(
    name = "prosumer",
    version,
    about = "Energy balance reports for prosumer PV installations",
    long_about = "Prosumer Balance combines a weekly consumption profile with \
                  measured or forecast insolation to estimate hourly PV production \
                  and report how much energy is exported to and imported from the grid."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an energy balance report for a date range
    Report(ReportArgs),

    /// Weekly consumption profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Estimate production for a single hour
    Estimate(EstimateArgs),

    /// Show or change configuration
    Config {
        /// Set combined system losses in percent (stored as a fraction)
        #[arg(long)]
        system_losses: Option<f64>,

        /// Set the longest allowed report range in days
        #[arg(long)]
        max_report_days: Option<u32>,
    },
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "prosumer=debug" } else { "prosumer=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = ProsumerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Report(args)) => {
            handle_report_command(&settings, args)?;
        }
        Some(Commands::Profile(cmd)) => {
            handle_profile_command(cmd)?;
        }
        Some(Commands::Estimate(args)) => {
            handle_estimate_command(&settings, args)?;
        }
        Some(Commands::Config {
            system_losses,
            max_report_days,
        }) => {
            let changed = system_losses.is_some() || max_report_days.is_some();
            if let Some(pct) = system_losses {
                settings.set_system_losses_percentage(pct)?;
            }
            if let Some(days) = max_report_days {
                settings.set_max_report_days(days)?;
            }
            if changed {
                settings.save(&paths)?;
                println!("Configuration saved.");
                println!();
            }

            println!("Prosumer Balance Configuration");
            println!("==============================");
            println!("Config directory: {}", paths.base_dir().display());
            println!();
            println!("Settings:");
            println!(
                "  System losses:     {:.1}%",
                settings.system_losses_percentage()?
            );
            println!(
                "  System efficiency: {:.3}",
                settings.estimator()?.efficiency()
            );
            println!("  Max report days:   {}", settings.max_report_days);
            println!("  Date format:       {}", settings.date_format);
            println!();
            println!("Limits:");
            println!("  PV power:          up to {} kWp", MAX_PV_POWER_KWP);
            println!("  Hourly consumption: up to {} kWh", MAX_HOURLY_CONSUMPTION_KWH);
        }
        None => {
            println!("Prosumer Balance - energy balance reports for PV prosumers");
            println!();
            println!("Run 'prosumer --help' for usage information.");
            println!("Run 'prosumer profile template' to start a consumption profile.");
        }
    }

    Ok(())
}
