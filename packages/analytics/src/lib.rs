#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregations over a filtered incident table.
//!
//! Each function is a deterministic pure function of the records it is
//! given. Grouping happens on raw field values with groups ordered by key;
//! labels are normalized afterwards, so two raw spellings that normalize to
//! the same label stay separate rows. An empty table yields empty
//! aggregates.

pub mod casualties;
pub mod causes;
pub mod counts;

use gas_incidents_analytics_models::IncidentSummary;
use gas_incidents_incident_models::IncidentTable;

pub use casualties::{casualties_by_state, casualties_by_state_cause, casualty_totals};
pub use causes::{cause_breakdown, cause_totals};
pub use counts::{frames_by_year, sort_year_state, yearly_by_state};

/// Computes every aggregate view of `table`.
#[must_use]
pub fn summarize(table: &IncidentTable) -> IncidentSummary {
    let records = &table.records;

    let causes = cause_breakdown(records);
    let casualties_by_state_cause = casualties_by_state_cause(records);
    let summary = IncidentSummary {
        kind: table.kind,
        incidents: records.len() as u64,
        dropped: table.dropped,
        yearly_by_state: yearly_by_state(records),
        cause_totals: cause_totals(&causes),
        causes,
        casualty_totals: casualty_totals(records),
        casualties_by_state: casualties_by_state(&casualties_by_state_cause),
        casualties_by_state_cause,
    };

    log::info!(
        "[{}] Summarized {} incidents: {} year/state groups, {} cause groups, {} deaths, {} injuries",
        summary.kind,
        summary.incidents,
        summary.yearly_by_state.len(),
        summary.causes.len(),
        summary.casualty_totals.deaths,
        summary.casualty_totals.injuries,
    );

    summary
}
