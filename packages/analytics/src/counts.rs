//! Incident counts per (year, state).

use std::collections::BTreeMap;

use gas_incidents_analytics_models::{YearStateCount, YearStateOrder};
use gas_incidents_incident_models::IncidentRecord;

/// Counts incidents per (year, grouping state), earliest year first and
/// states alphabetical within a year.
#[must_use]
pub fn yearly_by_state(records: &[IncidentRecord]) -> Vec<YearStateCount> {
    let mut groups: BTreeMap<(i32, &str), u64> = BTreeMap::new();
    for record in records {
        *groups.entry((record.year, record.state.as_str())).or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((year, state), incidents)| YearStateCount {
            year,
            state: state.to_string(),
            incidents,
        })
        .collect()
}

/// Reorders rows for display. Both orderings are stable, so rows that tie
/// keep their key order.
pub fn sort_year_state(rows: &mut [YearStateCount], order: YearStateOrder) {
    match order {
        YearStateOrder::CountDescending => rows.sort_by(|a, b| b.incidents.cmp(&a.incidents)),
        YearStateOrder::YearAscending => rows.sort_by_key(|row| row.year),
    }
}

/// Splits rows into per-year frames, earliest year first.
#[must_use]
pub fn frames_by_year(rows: &[YearStateCount]) -> Vec<(i32, Vec<&YearStateCount>)> {
    let mut frames: BTreeMap<i32, Vec<&YearStateCount>> = BTreeMap::new();
    for row in rows {
        frames.entry(row.year).or_default().push(row);
    }
    frames.into_iter().collect()
}
