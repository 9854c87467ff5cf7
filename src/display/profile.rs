//! Weekly consumption profile display

use crate::engine::{CompletionStats, ConsumptionGrid, DAYS_PER_WEEK, HOURS_PER_DAY, SLOTS_PER_WEEK};
use crate::models::SlotKey;

use super::report::{format_bar, format_kwh, format_percentage, separator};

const DAY_NAMES: [&str; DAYS_PER_WEEK as usize] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Intensity shades, lightest first; `·` marks a slot that was never entered
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];
const MISSING: char = '·';

/// Short English name for a day index (Sunday = 0)
pub fn day_name(day: u8) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("???")
}

/// Format completion statistics
pub fn format_completion(stats: &CompletionStats) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Slots entered:      {:>3} / {}\n",
        stats.actual_count, SLOTS_PER_WEEK
    ));
    output.push_str(&format!(
        "Slots with values:  {:>3} ({})\n",
        stats.values_present_count,
        format_percentage(stats.completion_percentage)
    ));
    output.push_str(&format!(
        "Complete:           {}\n",
        if stats.is_complete { "Yes" } else { "No" }
    ));
    output
}

/// Render the week as a day x hour heat map with daily totals
pub fn format_profile_grid(grid: &ConsumptionGrid) -> String {
    let mut output = String::new();
    let max_value = grid.iter().map(|(_, v)| v).fold(0.0_f64, f64::max);
    let daily = grid.daily_totals();
    let max_daily = daily.iter().copied().fold(0.0_f64, f64::max);

    output.push_str("     ");
    for hour in 0..HOURS_PER_DAY {
        output.push(if hour % 6 == 0 { '|' } else { ' ' });
    }
    output.push_str("  Daily total\n");
    output.push_str(&separator(60));
    output.push('\n');

    for day in 0..DAYS_PER_WEEK {
        output.push_str(&format!("{:<5}", day_name(day)));
        for hour in 0..HOURS_PER_DAY {
            let cell = SlotKey::new(day, hour)
                .ok()
                .and_then(|key| grid.get(key))
                .map_or(MISSING, |value| shade(value, max_value));
            output.push(cell);
        }
        output.push_str(&format!(
            "  {:>10} {}\n",
            format_kwh(daily[day as usize]),
            format_bar(daily[day as usize], max_daily, 10)
        ));
    }

    output.push_str(&separator(60));
    output.push('\n');
    output.push_str(&format!("Weekly total: {}\n", format_kwh(grid.weekly_total())));
    output
}

fn shade(value: f64, max_value: f64) -> char {
    if value <= 0.0 || max_value <= 0.0 {
        return SHADES[0];
    }
    let levels = SHADES.len() - 1;
    let index = ((value / max_value) * levels as f64).ceil() as usize;
    SHADES[index.clamp(1, levels)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_name() {
        assert_eq!(day_name(0), "Sun");
        assert_eq!(day_name(6), "Sat");
        assert_eq!(day_name(9), "???");
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade(0.0, 2.0), ' ');
        assert_eq!(shade(2.0, 2.0), '█');
        assert_eq!(shade(0.1, 2.0), '░');
    }

    #[test]
    fn test_format_profile_grid_marks_missing() {
        let mut grid = ConsumptionGrid::new();
        grid.set(SlotKey::new(1, 0).unwrap(), 1.0).unwrap();

        let output = format_profile_grid(&grid);
        let monday = output.lines().find(|l| l.starts_with("Mon")).unwrap();
        assert!(monday.contains('█'));
        assert!(monday.contains(MISSING));
        assert!(output.contains("Weekly total: 1.00 kWh"));
    }

    #[test]
    fn test_format_completion() {
        let stats = ConsumptionGrid::new().completion_stats();
        let output = format_completion(&stats);
        assert!(output.contains("0 / 168"));
        assert!(output.contains("Complete:           No"));
    }
}
