//! Incident counts per cause group and cause detail.

use std::collections::BTreeMap;

use gas_incidents_analytics_models::{CauseCount, CauseTotal};
use gas_incidents_incident_models::IncidentRecord;
use gas_incidents_incident_models::text::{capitalize_first, title_case};

/// Counts incidents per (cause, cause detail).
///
/// Cause labels are capitalized per word (`"Equipment Failure"`), detail
/// labels on the first letter only
/// (`"Malfunction of control/relief equipment"`).
#[must_use]
pub fn cause_breakdown(records: &[IncidentRecord]) -> Vec<CauseCount> {
    let mut groups: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for record in records {
        *groups
            .entry((record.cause.as_str(), record.cause_details.as_str()))
            .or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((cause, details), incidents)| CauseCount {
            cause: title_case(cause),
            details: capitalize_first(details),
            incidents,
        })
        .collect()
}

/// Re-groups a cause breakdown by cause label, in first-appearance order.
#[must_use]
pub fn cause_totals(breakdown: &[CauseCount]) -> Vec<CauseTotal> {
    let mut totals: Vec<CauseTotal> = Vec::new();
    for row in breakdown {
        if let Some(total) = totals.iter_mut().find(|t| t.cause == row.cause) {
            total.incidents += row.incidents;
        } else {
            totals.push(CauseTotal {
                cause: row.cause.clone(),
                incidents: row.incidents,
            });
        }
    }
    totals
}
