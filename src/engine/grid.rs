//! Weekly consumption grid
//!
//! A sparse `SlotKey -> kWh` map over the 7x24 week. The grid never invents
//! values for keys the caller did not set: whether a missing key means "zero"
//! or "not yet entered" is decided by whoever consumes it. Only report
//! aggregation treats a missing slot as zero.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::{validate_consumption_kwh, DAYS_PER_WEEK, SLOTS_PER_WEEK};
use crate::error::ProsumerResult;
use crate::models::{ConsumptionSlot, LocationId, SlotKey};

/// Encode a grid coordinate as `"{day}_{hour}"`
pub fn encode_key(day: u8, hour: u8) -> ProsumerResult<String> {
    Ok(SlotKey::new(day, hour)?.encode())
}

/// Decode a `"{day}_{hour}"` string; `None` for anything invalid
pub fn decode_key(key: &str) -> Option<SlotKey> {
    SlotKey::decode(key)
}

/// Sparse weekly consumption model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumptionGrid {
    cells: BTreeMap<SlotKey, f64>,
}

impl ConsumptionGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from slots; later duplicates overwrite earlier ones
    pub fn from_slots<'a>(slots: impl IntoIterator<Item = &'a ConsumptionSlot>) -> ProsumerResult<Self> {
        let mut grid = Self::new();
        for slot in slots {
            slot.validate()?;
            grid.cells.insert(slot.key()?, slot.consumption_kwh);
        }
        Ok(grid)
    }

    /// Build a grid from string-keyed values as held by an editing UI
    ///
    /// Keys that do not decode are skipped. Values under valid keys must
    /// still be valid consumption figures.
    pub fn from_keyed_values<K, I>(entries: I) -> ProsumerResult<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut grid = Self::new();
        for (key, value) in entries {
            let key: &str = key.as_ref();
            match decode_key(key) {
                Some(slot_key) => grid.set(slot_key, value)?,
                None => warn!(key, "skipping invalid consumption grid key"),
            }
        }
        Ok(grid)
    }

    /// Set the consumption for one slot
    pub fn set(&mut self, key: SlotKey, consumption_kwh: f64) -> ProsumerResult<()> {
        validate_consumption_kwh(consumption_kwh)?;
        self.cells.insert(key, consumption_kwh);
        Ok(())
    }

    /// Consumption for a slot, if it was set
    pub fn get(&self, key: SlotKey) -> Option<f64> {
        self.cells.get(&key).copied()
    }

    /// Remove one slot
    pub fn remove(&mut self, key: SlotKey) -> Option<f64> {
        self.cells.remove(&key)
    }

    /// Number of slots that are set
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate set slots in (day, hour) order
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, f64)> + '_ {
        self.cells.iter().map(|(k, v)| (*k, *v))
    }

    /// Replace the whole profile with a new batch
    ///
    /// The old contents are cleared first so no slot from a previous week
    /// survives unless the batch sets it again. On a validation error the
    /// grid is left untouched.
    pub fn replace_all<'a>(
        &mut self,
        slots: impl IntoIterator<Item = &'a ConsumptionSlot>,
    ) -> ProsumerResult<()> {
        let replacement = Self::from_slots(slots)?;
        self.cells = replacement.cells;
        Ok(())
    }

    /// Expand into the list of slots the caller actually set
    pub fn to_slot_list(&self, location_id: LocationId) -> Vec<ConsumptionSlot> {
        self.cells
            .iter()
            .map(|(key, value)| ConsumptionSlot {
                location_id,
                day_of_week: key.day(),
                hour: key.hour(),
                consumption_kwh: *value,
            })
            .collect()
    }

    /// Total consumption per day of week, Sunday first
    pub fn daily_totals(&self) -> [f64; DAYS_PER_WEEK as usize] {
        let mut totals = [0.0; DAYS_PER_WEEK as usize];
        for (key, value) in &self.cells {
            totals[key.day() as usize] += value;
        }
        totals
    }

    /// Total consumption over the week
    pub fn weekly_total(&self) -> f64 {
        self.cells.values().sum()
    }

    pub fn completion_stats(&self) -> CompletionStats {
        let actual_count = self.cells.len();
        let values_present_count = self.cells.values().filter(|v| **v > 0.0).count();
        CompletionStats::new(actual_count, values_present_count)
    }
}

/// How much of the weekly profile has been entered
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionStats {
    /// Distinct slots present
    pub actual_count: usize,
    /// Distinct slots with a value above zero
    pub values_present_count: usize,
    /// `values_present_count / 168 * 100`
    pub completion_percentage: f64,
    /// All 168 slots present and at least one non-zero
    pub is_complete: bool,
}

impl CompletionStats {
    fn new(actual_count: usize, values_present_count: usize) -> Self {
        Self {
            actual_count,
            values_present_count,
            completion_percentage: values_present_count as f64 / SLOTS_PER_WEEK as f64 * 100.0,
            // An all-zero week cannot be told apart from one never entered.
            is_complete: actual_count == SLOTS_PER_WEEK && values_present_count > 0,
        }
    }
}

/// Completion statistics for a list of slots
///
/// Slots sharing a `(day, hour)` collapse to one, the last one winning.
/// Slots with out-of-range coordinates are not counted.
pub fn completion_stats(slots: &[ConsumptionSlot]) -> CompletionStats {
    let mut cells: BTreeMap<SlotKey, f64> = BTreeMap::new();
    for slot in slots {
        if let Ok(key) = slot.key() {
            cells.insert(key, slot.consumption_kwh);
        }
    }
    let values_present_count = cells.values().filter(|v| **v > 0.0).count();
    CompletionStats::new(cells.len(), values_present_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_week(location_id: LocationId, value: f64) -> Vec<ConsumptionSlot> {
        SlotKey::all()
            .map(|k| ConsumptionSlot::new(location_id, k.day(), k.hour(), value).unwrap())
            .collect()
    }

    #[test]
    fn test_encode_decode_round_trip() {
        for day in 0..7 {
            for hour in 0..24 {
                let key = encode_key(day, hour).unwrap();
                let decoded = decode_key(&key).unwrap();
                assert_eq!((decoded.day(), decoded.hour()), (day, hour));
            }
        }
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(encode_key(7, 0).unwrap_err().is_validation());
        assert!(encode_key(0, 24).unwrap_err().is_validation());
    }

    #[test]
    fn test_decode_returns_none_for_bad_keys() {
        for key in ["7_0", "0_24", "abc_1", "1", "1_2_3"] {
            assert!(decode_key(key).is_none(), "{} should not decode", key);
        }
    }

    #[test]
    fn test_all_zero_week_is_not_complete() {
        let stats = completion_stats(&full_week(LocationId::new(), 0.0));
        assert_eq!(stats.actual_count, 168);
        assert_eq!(stats.values_present_count, 0);
        assert_eq!(stats.completion_percentage, 0.0);
        assert!(!stats.is_complete);
    }

    #[test]
    fn test_full_week_with_values_is_complete() {
        let id = LocationId::new();
        let mut slots = full_week(id, 0.0);
        for slot in slots.iter_mut().take(42) {
            slot.consumption_kwh = 0.5;
        }

        let stats = completion_stats(&slots);
        assert!(stats.is_complete);
        assert_eq!(stats.values_present_count, 42);
        assert!((stats.completion_percentage - 100.0 * 42.0 / 168.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_week_is_not_complete() {
        let id = LocationId::new();
        let slots: Vec<_> = full_week(id, 1.0).into_iter().take(100).collect();
        let stats = completion_stats(&slots);
        assert_eq!(stats.actual_count, 100);
        assert!(!stats.is_complete);
    }

    #[test]
    fn test_duplicate_slots_collapse() {
        let id = LocationId::new();
        let mut slots = full_week(id, 0.0);
        slots.push(ConsumptionSlot::new(id, 0, 0, 2.0).unwrap());

        let stats = completion_stats(&slots);
        assert_eq!(stats.actual_count, 168);
        assert_eq!(stats.values_present_count, 1);
        assert!(stats.is_complete);
    }

    #[test]
    fn test_to_slot_list_omits_unset() {
        let id = LocationId::new();
        let mut grid = ConsumptionGrid::new();
        grid.set(SlotKey::new(2, 7).unwrap(), 0.8).unwrap();
        grid.set(SlotKey::new(0, 19).unwrap(), 1.2).unwrap();

        let slots = grid.to_slot_list(id);
        assert_eq!(slots.len(), 2);
        assert_eq!((slots[0].day_of_week, slots[0].hour), (0, 19));
        assert_eq!((slots[1].day_of_week, slots[1].hour), (2, 7));
        assert!(slots.iter().all(|s| s.location_id == id));
    }

    #[test]
    fn test_replace_all_clears_old_slots() {
        let id = LocationId::new();
        let mut grid = ConsumptionGrid::from_slots(&full_week(id, 1.0)).unwrap();
        assert_eq!(grid.len(), 168);

        let batch = vec![ConsumptionSlot::new(id, 3, 12, 2.5).unwrap()];
        grid.replace_all(&batch).unwrap();

        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(SlotKey::new(3, 12).unwrap()), Some(2.5));
        assert_eq!(grid.get(SlotKey::new(0, 0).unwrap()), None);
    }

    #[test]
    fn test_replace_all_keeps_grid_on_error() {
        let id = LocationId::new();
        let mut grid = ConsumptionGrid::from_slots(&full_week(id, 1.0)).unwrap();

        let mut bad = ConsumptionSlot::new(id, 3, 12, 2.5).unwrap();
        bad.consumption_kwh = -3.0;
        assert!(grid.replace_all(&[bad]).is_err());
        assert_eq!(grid.len(), 168);
    }

    #[test]
    fn test_from_keyed_values_skips_invalid_keys() {
        let entries = vec![
            ("0_8".to_string(), 0.5),
            ("7_8".to_string(), 9.0),
            ("oops".to_string(), 1.0),
            ("6_23".to_string(), 0.25),
        ];
        let grid = ConsumptionGrid::from_keyed_values(entries).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.get(SlotKey::new(6, 23).unwrap()), Some(0.25));
    }

    #[test]
    fn test_from_keyed_values_rejects_bad_value() {
        let entries = vec![("0_8", -1.0)];
        assert!(ConsumptionGrid::from_keyed_values(entries).is_err());
    }

    #[test]
    fn test_totals() {
        let id = LocationId::new();
        let grid = ConsumptionGrid::from_slots(&full_week(id, 0.5)).unwrap();
        let daily = grid.daily_totals();
        assert!(daily.iter().all(|d| (*d - 12.0).abs() < 1e-9));
        assert!((grid.weekly_total() - 84.0).abs() < 1e-9);
        assert!(grid.completion_stats().is_complete);
    }
}
