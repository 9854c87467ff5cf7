//! Energy Balance Report
//!
//! Walks a date range hour by hour, joins the weekly consumption profile
//! (by weekday and hour) with the city's insolation series (by date and
//! hour), and produces one balance row per hour plus range totals.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{debug, warn};

use crate::display::report::{format_bar, format_kwh, format_percentage, separator};
use crate::engine::{balance, ProductionEstimator, HOURS_PER_DAY};
use crate::error::{ProsumerError, ProsumerResult};
use crate::models::{ConsumptionSlot, InsolationSample, Location, LocationId};

/// One hour of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyBalanceRow {
    pub date: NaiveDate,
    pub hour: u8,
    pub production_kwh: f64,
    pub consumption_kwh: f64,
    /// Positive = export, negative = import
    pub balance_kwh: f64,
}

/// Range totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub total_production_kwh: f64,
    pub total_consumption_kwh: f64,
    /// Sum of positive balances
    pub total_export_kwh: f64,
    /// Sum of absolute negative balances
    pub total_import_kwh: f64,
    /// Always `total_export_kwh - total_import_kwh`
    pub net_balance_kwh: f64,
    /// Energy produced and used in the same hour
    pub self_consumed_kwh: f64,
    /// Share of consumption covered by own production
    pub self_sufficiency_percentage: f64,
    /// Share of production used on site
    pub self_consumption_percentage: f64,
}

impl BalanceSummary {
    /// Accumulate totals over a row set
    pub fn from_rows(rows: &[EnergyBalanceRow]) -> Self {
        let mut summary = Self::default();

        for row in rows {
            summary.total_production_kwh += row.production_kwh;
            summary.total_consumption_kwh += row.consumption_kwh;
            summary.self_consumed_kwh += row.production_kwh.min(row.consumption_kwh);

            if row.balance_kwh > 0.0 {
                summary.total_export_kwh += row.balance_kwh;
            } else if row.balance_kwh < 0.0 {
                summary.total_import_kwh += row.balance_kwh.abs();
            }
        }

        // Derived, not accumulated: export - import == net exactly.
        summary.net_balance_kwh = summary.total_export_kwh - summary.total_import_kwh;

        summary.self_sufficiency_percentage = ratio_percentage(
            summary.self_consumed_kwh,
            summary.total_consumption_kwh,
        );
        summary.self_consumption_percentage = ratio_percentage(
            summary.self_consumed_kwh,
            summary.total_production_kwh,
        );

        summary
    }
}

fn ratio_percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Per-day rollup of report rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub production_kwh: f64,
    pub consumption_kwh: f64,
    pub export_kwh: f64,
    pub import_kwh: f64,
    pub net_balance_kwh: f64,
}

/// Reference to the location a report was built for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRef {
    pub id: LocationId,
    pub name: String,
    pub city: String,
    pub pv_power_kwp: f64,
}

/// Energy balance report over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    pub location: LocationRef,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Every hour of the range, date ascending then hour 0..=23
    pub rows: Vec<EnergyBalanceRow>,
    pub summary: BalanceSummary,
}

/// Builds [`ReportData`] from caller-supplied records
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAggregator {
    estimator: ProductionEstimator,
}

impl ReportAggregator {
    pub fn new(estimator: ProductionEstimator) -> Self {
        Self { estimator }
    }

    /// Generate the report
    ///
    /// Missing consumption slots and missing insolation samples count as
    /// zero; the row sequence always covers every hour of the range.
    ///
    /// The range is not capped here. Callers exposing this to user input
    /// must bound it first (the CLI applies `Settings::max_report_days`),
    /// since every day in the range materialises 24 rows.
    pub fn build(
        &self,
        location: &Location,
        consumption_slots: &[ConsumptionSlot],
        insolation_samples: &[InsolationSample],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ProsumerResult<ReportData> {
        if start_date > end_date {
            return Err(ProsumerError::Validation(format!(
                "start date {} is after end date {}",
                start_date, end_date
            )));
        }

        location.validate()?;
        let city_key = location.city_key().ok_or_else(|| {
            ProsumerError::Validation(format!(
                "location '{}' has no city, which is required for insolation lookup",
                location.name
            ))
        })?;

        let consumption = consumption_lookup(location.id, consumption_slots)?;
        let insolation = insolation_lookup(&city_key, insolation_samples)?;

        let days = (end_date - start_date).num_days() + 1;
        debug!(
            location = %location.id,
            %start_date,
            %end_date,
            days,
            slots = consumption.len(),
            samples = insolation.len(),
            "building energy balance report"
        );

        let mut rows = Vec::with_capacity(row_capacity(days));
        for date in start_date.iter_days().take_while(|d| *d <= end_date) {
            let day_of_week = date.weekday().num_days_from_sunday() as u8;

            for hour in 0..HOURS_PER_DAY {
                let consumption_kwh = consumption
                    .get(&(day_of_week, hour))
                    .copied()
                    .unwrap_or(0.0);
                let insolation_percentage =
                    insolation.get(&(date, hour)).copied().unwrap_or(0.0);

                let production_kwh = self
                    .estimator
                    .estimate(location.pv_power_kwp, insolation_percentage);

                rows.push(EnergyBalanceRow {
                    date,
                    hour,
                    production_kwh,
                    consumption_kwh,
                    balance_kwh: balance(production_kwh, consumption_kwh),
                });
            }
        }

        let summary = BalanceSummary::from_rows(&rows);
        debug!(
            rows = rows.len(),
            production = summary.total_production_kwh,
            consumption = summary.total_consumption_kwh,
            net = summary.net_balance_kwh,
            "energy balance report built"
        );

        Ok(ReportData {
            location: LocationRef {
                id: location.id,
                name: location.name.clone(),
                city: location.city.clone().unwrap_or_default().trim().to_string(),
                pv_power_kwp: location.pv_power_kwp,
            },
            start_date,
            end_date,
            rows,
            summary,
        })
    }
}

/// Upper bound on rows reserved up front; longer ranges grow as they go
const MAX_PREALLOCATED_ROWS: usize = 366 * HOURS_PER_DAY as usize;

fn row_capacity(days: i64) -> usize {
    usize::try_from(days)
        .unwrap_or(0)
        .saturating_mul(HOURS_PER_DAY as usize)
        .min(MAX_PREALLOCATED_ROWS)
}

/// Build a report with the default production estimator
///
/// See [`ReportAggregator::build`]; the date range must already be bounded
/// by the caller.
pub fn build_report(
    location: &Location,
    consumption_slots: &[ConsumptionSlot],
    insolation_samples: &[InsolationSample],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> ProsumerResult<ReportData> {
    ReportAggregator::default().build(
        location,
        consumption_slots,
        insolation_samples,
        start_date,
        end_date,
    )
}

fn consumption_lookup(
    location_id: LocationId,
    slots: &[ConsumptionSlot],
) -> ProsumerResult<HashMap<(u8, u8), f64>> {
    let mut lookup = HashMap::with_capacity(slots.len());
    let mut foreign = 0usize;

    for slot in slots {
        slot.validate()?;
        if slot.location_id != location_id {
            foreign += 1;
            continue;
        }
        lookup.insert((slot.day_of_week, slot.hour), slot.consumption_kwh);
    }

    if foreign > 0 {
        warn!(foreign, "ignoring consumption slots that belong to another location");
    }
    Ok(lookup)
}

fn insolation_lookup(
    city_key: &str,
    samples: &[InsolationSample],
) -> ProsumerResult<HashMap<(NaiveDate, u8), f64>> {
    let mut lookup = HashMap::with_capacity(samples.len());
    let mut foreign = 0usize;

    for sample in samples {
        sample.validate()?;
        if sample.city_key() != city_key {
            foreign += 1;
            continue;
        }
        lookup.insert((sample.date, sample.hour), sample.insolation_percentage);
    }

    if foreign > 0 {
        warn!(foreign, city = city_key, "ignoring insolation samples for other cities");
    }
    Ok(lookup)
}

#[derive(Tabled)]
struct DailyTableRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Production")]
    production: String,
    #[tabled(rename = "Consumption")]
    consumption: String,
    #[tabled(rename = "Export")]
    export: String,
    #[tabled(rename = "Import")]
    import: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Sun")]
    bar: String,
}

impl ReportData {
    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Roll the hourly rows up into one entry per date
    pub fn daily(&self) -> Vec<DailyBalance> {
        let mut days: Vec<DailyBalance> = Vec::with_capacity(self.days().max(0) as usize);

        for row in &self.rows {
            let needs_new = days.last().map_or(true, |d| d.date != row.date);
            if needs_new {
                days.push(DailyBalance {
                    date: row.date,
                    production_kwh: 0.0,
                    consumption_kwh: 0.0,
                    export_kwh: 0.0,
                    import_kwh: 0.0,
                    net_balance_kwh: 0.0,
                });
            }

            if let Some(day) = days.last_mut() {
                day.production_kwh += row.production_kwh;
                day.consumption_kwh += row.consumption_kwh;
                if row.balance_kwh > 0.0 {
                    day.export_kwh += row.balance_kwh;
                } else if row.balance_kwh < 0.0 {
                    day.import_kwh += row.balance_kwh.abs();
                }
                day.net_balance_kwh = day.export_kwh - day.import_kwh;
            }
        }

        days
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        let s = &self.summary;

        output.push_str(&format!(
            "Energy Balance Report: {} to {}\n",
            self.start_date, self.end_date
        ));
        output.push_str(&separator(80));
        output.push('\n');
        output.push_str(&format!(
            "Location: {} ({}, {} kWp)\n\n",
            self.location.name, self.location.city, self.location.pv_power_kwp
        ));

        output.push_str(&format!("{:<24} {:>14}\n", "Production:", format_kwh(s.total_production_kwh)));
        output.push_str(&format!("{:<24} {:>14}\n", "Consumption:", format_kwh(s.total_consumption_kwh)));
        output.push_str(&format!("{:<24} {:>14}\n", "Exported to grid:", format_kwh(s.total_export_kwh)));
        output.push_str(&format!("{:<24} {:>14}\n", "Imported from grid:", format_kwh(s.total_import_kwh)));
        output.push_str(&format!("{:<24} {:>14}\n", "Net balance:", format_kwh(s.net_balance_kwh)));
        output.push_str(&format!(
            "{:<24} {:>14}\n",
            "Self-sufficiency:",
            format_percentage(s.self_sufficiency_percentage)
        ));
        output.push_str(&format!(
            "{:<24} {:>14}\n\n",
            "Self-consumption:",
            format_percentage(s.self_consumption_percentage)
        ));

        let daily = self.daily();
        let max_production = daily
            .iter()
            .map(|d| d.production_kwh)
            .fold(0.0_f64, f64::max);

        let table_rows: Vec<DailyTableRow> = daily
            .iter()
            .map(|d| DailyTableRow {
                date: d.date.to_string(),
                production: format!("{:.2}", d.production_kwh),
                consumption: format!("{:.2}", d.consumption_kwh),
                export: format!("{:.2}", d.export_kwh),
                import: format!("{:.2}", d.import_kwh),
                net: format!("{:+.2}", d.net_balance_kwh),
                bar: format_bar(d.production_kwh, max_production, 12),
            })
            .collect();

        output.push_str(&Table::new(table_rows).with(Style::rounded()).to_string());
        output.push('\n');

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SYSTEM_EFFICIENCY;
    use crate::models::SlotKey;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn location() -> Location {
        Location::new("House", "Brno", 5.0)
    }

    fn flat_profile(location_id: LocationId, kwh: f64) -> Vec<ConsumptionSlot> {
        SlotKey::all()
            .map(|k| ConsumptionSlot::new(location_id, k.day(), k.hour(), kwh).unwrap())
            .collect()
    }

    #[test]
    fn test_single_day_has_24_ordered_rows() {
        let loc = location();
        let day = date(2025, 6, 21);
        let report = build_report(&loc, &flat_profile(loc.id, 0.5), &[], day, day).unwrap();

        assert_eq!(report.rows.len(), 24);
        for (i, row) in report.rows.iter().enumerate() {
            assert_eq!(row.date, day);
            assert_eq!(row.hour as usize, i);
        }
    }

    #[test]
    fn test_row_count_is_days_times_24() {
        let loc = location();
        // Crosses a month boundary and a leap day.
        let report = build_report(&loc, &[], &[], date(2024, 2, 27), date(2024, 3, 2)).unwrap();
        assert_eq!(report.days(), 5);
        assert_eq!(report.rows.len(), 5 * 24);
        assert_eq!(report.rows[24].date, date(2024, 2, 28));
        assert_eq!(report.rows[48].date, date(2024, 2, 29));
        assert_eq!(report.rows.last().unwrap().date, date(2024, 3, 2));
        assert_eq!(report.rows.last().unwrap().hour, 23);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let loc = location();
        let err = build_report(&loc, &[], &[], date(2025, 1, 2), date(2025, 1, 1)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_location_without_city_is_rejected() {
        let mut loc = location();
        loc.set_city(None);
        let day = date(2025, 1, 1);
        assert!(build_report(&loc, &[], &[], day, day).unwrap_err().is_validation());

        loc.set_city(Some("  ".into()));
        assert!(build_report(&loc, &[], &[], day, day).is_err());
    }

    #[test]
    fn test_missing_insolation_means_zero_production() {
        let loc = location();
        let day = date(2025, 6, 21);
        let samples = vec![InsolationSample::new("Brno", day, 12, 50.0).unwrap()];

        let report = build_report(&loc, &flat_profile(loc.id, 0.5), &samples, day, day).unwrap();

        assert_eq!(report.rows.len(), 24);
        assert_eq!(report.rows[11].production_kwh, 0.0);
        assert!((report.rows[12].production_kwh - 2.125).abs() < 1e-12);
        assert_eq!(report.rows[13].production_kwh, 0.0);
        assert_eq!(report.rows[11].balance_kwh, -0.5);
    }

    #[test]
    fn test_consumption_joined_by_weekday() {
        let loc = location();
        // 2025-06-22 is a Sunday, 2025-06-23 a Monday.
        let sunday = date(2025, 6, 22);
        let monday = date(2025, 6, 23);
        assert_eq!(sunday.weekday().num_days_from_sunday(), 0);

        let slots = vec![
            ConsumptionSlot::new(loc.id, 0, 8, 1.5).unwrap(),
            ConsumptionSlot::new(loc.id, 1, 8, 0.25).unwrap(),
        ];
        let report = build_report(&loc, &slots, &[], sunday, monday).unwrap();

        assert_eq!(report.rows[8].consumption_kwh, 1.5);
        assert_eq!(report.rows[24 + 8].consumption_kwh, 0.25);
        // Missing slots default to zero.
        assert_eq!(report.rows[9].consumption_kwh, 0.0);
    }

    #[test]
    fn test_insolation_city_match_is_case_insensitive() {
        let loc = location();
        let day = date(2025, 6, 21);
        let samples = vec![
            InsolationSample::new("  BRNO", day, 10, 100.0).unwrap(),
            InsolationSample::new("Praha", day, 11, 100.0).unwrap(),
        ];

        let report = build_report(&loc, &[], &samples, day, day).unwrap();
        assert!((report.rows[10].production_kwh - 5.0 * SYSTEM_EFFICIENCY).abs() < 1e-12);
        assert_eq!(report.rows[11].production_kwh, 0.0);
    }

    #[test]
    fn test_foreign_slots_are_ignored() {
        let loc = location();
        let other = LocationId::new();
        let day = date(2025, 6, 21);
        let report = build_report(&loc, &flat_profile(other, 3.0), &[], day, day).unwrap();
        assert_eq!(report.summary.total_consumption_kwh, 0.0);
    }

    #[test]
    fn test_invalid_sample_is_rejected() {
        let loc = location();
        let day = date(2025, 6, 21);
        let mut sample = InsolationSample::new("Brno", day, 10, 50.0).unwrap();
        sample.insolation_percentage = 140.0;
        assert!(build_report(&loc, &[], &[sample], day, day).unwrap_err().is_validation());
    }

    #[test]
    fn test_summary_totals() {
        let loc = location();
        let day = date(2025, 6, 21);
        let samples: Vec<_> = (8..16)
            .map(|h| InsolationSample::new("Brno", day, h, 100.0).unwrap())
            .collect();

        let report = build_report(&loc, &flat_profile(loc.id, 1.0), &samples, day, day).unwrap();
        let s = &report.summary;

        let per_sunny_hour = 5.0 * SYSTEM_EFFICIENCY;
        assert!((s.total_production_kwh - 8.0 * per_sunny_hour).abs() < 1e-9);
        assert!((s.total_consumption_kwh - 24.0).abs() < 1e-9);
        assert!((s.total_export_kwh - 8.0 * (per_sunny_hour - 1.0)).abs() < 1e-9);
        assert!((s.total_import_kwh - 16.0).abs() < 1e-9);
        assert_eq!(s.total_export_kwh - s.total_import_kwh, s.net_balance_kwh);
        assert!((s.self_consumed_kwh - 8.0).abs() < 1e-9);
        assert!((s.self_sufficiency_percentage - 100.0 * 8.0 / 24.0).abs() < 1e-9);
    }

    fn random_rows(rng: &mut StdRng, n: usize, mode: u8) -> Vec<EnergyBalanceRow> {
        let start = date(2025, 1, 1);
        (0..n)
            .map(|i| {
                let production: f64 = rng.random_range(0.0..10.0);
                let consumption: f64 = match mode {
                    // all import
                    0 => production + rng.random_range(0.001..5.0),
                    // all export
                    1 => (production - rng.random_range(0.001..5.0)).max(0.0) * 0.5,
                    _ => rng.random_range(0.0..10.0),
                };
                EnergyBalanceRow {
                    date: start,
                    hour: (i % 24) as u8,
                    production_kwh: production,
                    consumption_kwh: consumption,
                    balance_kwh: balance(production, consumption),
                }
            })
            .collect()
    }

    #[test]
    fn test_net_balance_identity_randomized() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for mode in 0..3 {
            for n in [0, 1, 7, 24, 500] {
                let rows = random_rows(&mut rng, n, mode);
                let s = BalanceSummary::from_rows(&rows);
                assert_eq!(s.total_export_kwh - s.total_import_kwh, s.net_balance_kwh);
                if mode == 0 && n > 0 {
                    assert_eq!(s.total_export_kwh, 0.0);
                    assert!(s.net_balance_kwh < 0.0);
                }
            }
        }
    }

    #[test]
    fn test_net_balance_identity_on_generated_reports() {
        let mut rng = StdRng::seed_from_u64(42);
        let loc = location();
        let start = date(2025, 3, 1);
        let end = date(2025, 3, 14);

        let slots: Vec<_> = SlotKey::all()
            .map(|k| {
                ConsumptionSlot::new(loc.id, k.day(), k.hour(), rng.random_range(0.0..3.0)).unwrap()
            })
            .collect();
        let samples: Vec<_> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .flat_map(|d| (0..24).map(move |h| (d, h)))
            .map(|(d, h)| {
                InsolationSample::new("Brno", d, h, rng.random_range(0.0..=100.0)).unwrap()
            })
            .collect();

        let report = build_report(&loc, &slots, &samples, start, end).unwrap();
        let s = &report.summary;
        assert_eq!(report.rows.len(), 14 * 24);
        assert_eq!(s.total_export_kwh - s.total_import_kwh, s.net_balance_kwh);
    }

    #[test]
    fn test_daily_rollup() {
        let loc = location();
        let report = build_report(
            &loc,
            &flat_profile(loc.id, 0.5),
            &[],
            date(2025, 6, 1),
            date(2025, 6, 3),
        )
        .unwrap();

        let daily = report.daily();
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[0].date, date(2025, 6, 1));
        assert!((daily[1].consumption_kwh - 12.0).abs() < 1e-9);
        assert!((daily[2].import_kwh - 12.0).abs() < 1e-9);
        assert!((daily[2].net_balance_kwh + 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_estimator() {
        let loc = location();
        let day = date(2025, 6, 21);
        let samples = vec![InsolationSample::new("Brno", day, 12, 100.0).unwrap()];
        let aggregator = ReportAggregator::new(ProductionEstimator::from_losses_percentage(0.0).unwrap());

        let report = aggregator.build(&loc, &[], &samples, day, day).unwrap();
        assert_eq!(report.rows[12].production_kwh, 5.0);
    }

    #[test]
    fn test_format_terminal() {
        let loc = location();
        let day = date(2025, 6, 21);
        let report = build_report(&loc, &flat_profile(loc.id, 0.5), &[], day, day).unwrap();
        let output = report.format_terminal();

        assert!(output.contains("Energy Balance Report: 2025-06-21 to 2025-06-21"));
        assert!(output.contains("House (Brno, 5 kWp)"));
        assert!(output.contains("Imported from grid:"));
        assert!(output.contains("12.00"));
    }

    #[test]
    fn test_row_capacity_is_bounded() {
        assert_eq!(row_capacity(1), 24);
        assert_eq!(row_capacity(0), 0);
        assert_eq!(row_capacity(-5), 0);
        assert_eq!(row_capacity(366), MAX_PREALLOCATED_ROWS);

        let full_range = (NaiveDate::MAX - NaiveDate::MIN).num_days() + 1;
        assert_eq!(row_capacity(full_range), MAX_PREALLOCATED_ROWS);
        assert_eq!(row_capacity(i64::MAX), MAX_PREALLOCATED_ROWS);
    }
}
