//! CLI command for a single production estimate

use clap::Args;

use crate::config::settings::Settings;
use crate::engine::{balance, validate_consumption_kwh};
use crate::error::ProsumerResult;

/// Arguments for `estimate`
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Nameplate PV power in kWp
    #[arg(long)]
    pub pv: f64,

    /// Insolation in percent (0-100)
    #[arg(long)]
    pub insolation: f64,

    /// Consumption for the same hour, to show the resulting balance
    #[arg(long)]
    pub consumption: Option<f64>,
}

/// Handle the estimate command
pub fn handle_estimate_command(settings: &Settings, args: EstimateArgs) -> ProsumerResult<()> {
    let estimator = settings.estimator()?;
    let production = estimator.estimate_checked(args.pv, args.insolation)?;

    println!("Production: {:.3} kWh", production);
    println!(
        "  ({} kWp x {}% insolation x {:.2} efficiency)",
        args.pv,
        args.insolation,
        estimator.efficiency()
    );

    if let Some(consumption) = args.consumption {
        validate_consumption_kwh(consumption)?;
        let balance_kwh = balance(production, consumption);
        let direction = if balance_kwh > 0.0 {
            "export"
        } else if balance_kwh < 0.0 {
            "import"
        } else {
            "self-consumed"
        };
        println!("Balance:    {:+.3} kWh ({})", balance_kwh, direction);
    }

    Ok(())
}
