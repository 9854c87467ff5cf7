//! Reports module
//!
//! Energy balance reporting over a date range.

pub mod energy_balance;

pub use energy_balance::{
    build_report, BalanceSummary, DailyBalance, EnergyBalanceRow, LocationRef, ReportAggregator,
    ReportData,
};
