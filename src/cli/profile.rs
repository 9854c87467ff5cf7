//! Consumption profile CLI commands

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::display::{format_completion, format_profile_grid};
use crate::engine::{completion_stats, ConsumptionGrid, SLOTS_PER_WEEK};
use crate::error::{ProsumerError, ProsumerResult};
use crate::import::{load_consumption, CONSUMPTION_COLUMNS};
use crate::models::{LocationId, SlotKey};

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show how much of the weekly profile is filled in
    Stats {
        /// Consumption profile (CSV or day_hour-keyed JSON)
        file: PathBuf,
    },
    /// Render the weekly profile as a heat map
    Show {
        /// Consumption profile (CSV or day_hour-keyed JSON)
        file: PathBuf,
    },
    /// Write a 168-row CSV template to fill in
    Template {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a profile command
pub fn handle_profile_command(cmd: ProfileCommands) -> ProsumerResult<()> {
    // Profiles read here are not tied to a stored location.
    let location_id = LocationId::new();

    match cmd {
        ProfileCommands::Stats { file } => {
            let slots = load_consumption(&file, location_id)?;
            let stats = completion_stats(&slots);
            print!("{}", format_completion(&stats));
            if !stats.is_complete && stats.actual_count == SLOTS_PER_WEEK {
                println!("All 168 slots are zero; enter at least one value to use this profile.");
            }
        }

        ProfileCommands::Show { file } => {
            let slots = load_consumption(&file, location_id)?;
            let grid = ConsumptionGrid::from_slots(&slots)?;
            print!("{}", format_profile_grid(&grid));
            print!("{}", format_completion(&grid.completion_stats()));
        }

        ProfileCommands::Template { output } => match output {
            Some(path) => {
                let file = File::create(&path).map_err(|e| {
                    ProsumerError::Export(format!("Failed to create file {}: {}", path.display(), e))
                })?;
                let mut writer = BufWriter::new(file);
                write_template(&mut writer)?;
                writer
                    .flush()
                    .map_err(|e| ProsumerError::Export(e.to_string()))?;
                println!("Template written to: {}", path.display());
            }
            None => {
                let stdout = std::io::stdout();
                write_template(&mut stdout.lock())?;
            }
        },
    }

    Ok(())
}

/// Write an all-zero weekly profile in consumption CSV layout
pub fn write_template<W: Write>(writer: &mut W) -> ProsumerResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CONSUMPTION_COLUMNS)?;
    for key in SlotKey::all() {
        wtr.write_record(&[key.day().to_string(), key.hour().to_string(), "0.00".to_string()])?;
    }
    wtr.flush()
        .map_err(|e| ProsumerError::Export(e.to_string()))?;
    Ok(())
}
