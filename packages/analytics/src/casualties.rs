//! Fatality and injury aggregates.

use std::collections::BTreeMap;

use gas_incidents_analytics_models::{
    CasualtyTotals, StateCasualties, StateCauseCasualties, ValueFrequency,
};
use gas_incidents_incident_models::IncidentRecord;
use gas_incidents_incident_models::text::capitalize_first;

fn frequencies(values: impl Iterator<Item = u32>) -> Vec<ValueFrequency> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(value, frequency)| ValueFrequency { value, frequency })
        .collect()
}

/// Table-wide deaths and injuries.
///
/// Each total is accumulated as `Σ value × frequency` over the distinct
/// values of the count column, which equals the plain column sum.
#[must_use]
pub fn casualty_totals(records: &[IncidentRecord]) -> CasualtyTotals {
    let fatality_frequencies = frequencies(records.iter().map(|r| r.fatalities));
    let injury_frequencies = frequencies(records.iter().map(|r| r.injuries));

    CasualtyTotals {
        deaths: fatality_frequencies.iter().map(|f| f.total()).sum(),
        injuries: injury_frequencies.iter().map(|f| f.total()).sum(),
        fatality_frequencies,
        injury_frequencies,
    }
}

/// Casualties per (state, cause, detail) among incidents flagged with a
/// fatality or an injury.
#[must_use]
pub fn casualties_by_state_cause(records: &[IncidentRecord]) -> Vec<StateCauseCasualties> {
    let mut groups: BTreeMap<(&str, &str, &str), (u64, u64)> = BTreeMap::new();
    for record in records.iter().filter(|r| r.has_casualty_flag()) {
        let entry = groups
            .entry((
                record.state.as_str(),
                record.cause.as_str(),
                record.cause_details.as_str(),
            ))
            .or_default();
        entry.0 += u64::from(record.fatalities);
        entry.1 += u64::from(record.injuries);
    }

    groups
        .into_iter()
        .map(
            |((state, cause, details), (fatalities, injuries))| StateCauseCasualties {
                state: state.to_string(),
                cause: capitalize_first(cause),
                details: capitalize_first(details),
                fatalities,
                injuries,
                casualties: fatalities + injuries,
            },
        )
        .collect()
}

/// Sums a state/cause breakdown across causes, one row per state.
#[must_use]
pub fn casualties_by_state(breakdown: &[StateCauseCasualties]) -> Vec<StateCasualties> {
    let mut states: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for row in breakdown {
        let entry = states.entry(row.state.as_str()).or_default();
        entry.0 += row.fatalities;
        entry.1 += row.injuries;
    }

    states
        .into_iter()
        .map(|(state, (fatalities, injuries))| StateCasualties {
            state: state.to_string(),
            fatalities,
            injuries,
            casualties: fatalities + injuries,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::record;

    fn sample() -> Vec<IncidentRecord> {
        vec![
            record(2015, "TX", "EXCAVATION DAMAGE", "THIRD PARTY", 0, 2, false, true),
            record(2015, "TX", "CORROSION FAILURE", "EXTERNAL", 3, 1, true, true),
            record(2016, "TX", "EXCAVATION DAMAGE", "THIRD PARTY", 1, 0, true, false),
            record(2016, "CA", "NATURAL FORCE DAMAGE", "EARTHQUAKE", 0, 0, false, false),
            record(2017, "CA", "INCORRECT OPERATION", "OTHER", 2, 2, true, true),
            record(2017, "OK", "EXCAVATION DAMAGE", "THIRD PARTY", 1, 0, true, false),
        ]
    }

    #[test]
    fn totals_from_frequencies_match_direct_sums() {
        let records = sample();
        let totals = casualty_totals(&records);

        let deaths: u64 = records.iter().map(|r| u64::from(r.fatalities)).sum();
        let injuries: u64 = records.iter().map(|r| u64::from(r.injuries)).sum();
        assert_eq!(totals.deaths, deaths);
        assert_eq!(totals.injuries, injuries);
    }

    #[test]
    fn frequency_table_counts_distinct_values() {
        let totals = casualty_totals(&sample());
        assert_eq!(
            totals.fatality_frequencies,
            [
                ValueFrequency {
                    value: 0,
                    frequency: 2,
                },
                ValueFrequency {
                    value: 1,
                    frequency: 2,
                },
                ValueFrequency {
                    value: 2,
                    frequency: 1,
                },
                ValueFrequency {
                    value: 3,
                    frequency: 1,
                },
            ]
        );
    }

    #[test]
    fn three_record_example() {
        let records = vec![
            record(2015, "TX", "A", "a", 0, 2, false, true),
            record(2015, "TX", "A", "a", 1, 0, true, false),
            record(2015, "TX", "A", "a", 0, 1, false, true),
        ];
        let totals = casualty_totals(&records);
        assert_eq!(totals.deaths, 1);
        assert_eq!(totals.injuries, 3);

        let rows = casualties_by_state_cause(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].casualties, 4);
    }

    #[test]
    fn unflagged_incidents_are_excluded() {
        let rows = casualties_by_state_cause(&sample());
        assert!(rows.iter().all(|r| r.details != "Earthquake"));
    }

    #[test]
    fn labels_are_capitalized_on_first_letter() {
        let rows = casualties_by_state_cause(&sample());
        let tx: Vec<(&str, &str)> = rows
            .iter()
            .filter(|r| r.state == "TX")
            .map(|r| (r.cause.as_str(), r.details.as_str()))
            .collect();
        assert_eq!(
            tx,
            [
                ("Corrosion failure", "External"),
                ("Excavation damage", "Third party"),
            ]
        );
    }

    #[test]
    fn state_regroup_equals_sum_across_causes() {
        let breakdown = casualties_by_state_cause(&sample());
        let states = casualties_by_state(&breakdown);

        for state in &states {
            let expected: u64 = breakdown
                .iter()
                .filter(|row| row.state == state.state)
                .map(|row| row.casualties)
                .sum();
            assert_eq!(state.casualties, expected, "{}", state.state);
        }
        let names: Vec<&str> = states.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(names, ["CA", "OK", "TX"]);
        assert_eq!(states[2].casualties, 7);
    }
}
