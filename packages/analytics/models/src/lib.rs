#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate rows derived from a filtered incident table.
//!
//! Every type here is recomputed on each run and never persisted. Labels are
//! already normalized for presentation; grouping happens on the raw values.

use gas_incidents_incident_models::DatasetKind;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Incident count for one (year, state) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStateCount {
    /// Incident year.
    pub year: i32,
    /// Grouping state abbreviation.
    pub state: String,
    /// Number of incidents.
    pub incidents: u64,
}

/// Row ordering for [`YearStateCount`] tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum YearStateOrder {
    /// Largest groups first (bar charts)
    CountDescending,
    /// Earliest year first (charts keyed on an animation axis)
    YearAscending,
}

/// Incident count for one (cause, detail) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseCount {
    /// Cause group, capitalized per word.
    pub cause: String,
    /// Cause detail, capitalized on the first letter only.
    pub details: String,
    /// Number of incidents.
    pub incidents: u64,
}

/// Incident count for one cause group across all its details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseTotal {
    /// Cause group label.
    pub cause: String,
    /// Number of incidents.
    pub incidents: u64,
}

/// How many incidents reported a given casualty count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueFrequency {
    /// Casualty count reported by an incident.
    pub value: u32,
    /// Number of incidents reporting exactly that count.
    pub frequency: u64,
}

impl ValueFrequency {
    /// Casualties contributed by this group (`value × frequency`).
    #[must_use]
    pub fn total(self) -> u64 {
        u64::from(self.value) * self.frequency
    }
}

/// Fatality and injury totals over a whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasualtyTotals {
    /// Total fatalities.
    pub deaths: u64,
    /// Total injuries.
    pub injuries: u64,
    /// Frequency of each distinct fatality count.
    pub fatality_frequencies: Vec<ValueFrequency>,
    /// Frequency of each distinct injury count.
    pub injury_frequencies: Vec<ValueFrequency>,
}

/// Casualties for one (state, cause, detail) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCauseCasualties {
    /// Grouping state abbreviation.
    pub state: String,
    /// Cause group, capitalized on the first letter only.
    pub cause: String,
    /// Cause detail, capitalized on the first letter only.
    pub details: String,
    /// Summed fatalities.
    pub fatalities: u64,
    /// Summed injuries.
    pub injuries: u64,
    /// `fatalities + injuries`.
    pub casualties: u64,
}

/// Casualties for one state across all causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCasualties {
    /// Grouping state abbreviation.
    pub state: String,
    /// Summed fatalities.
    pub fatalities: u64,
    /// Summed injuries.
    pub injuries: u64,
    /// `fatalities + injuries`.
    pub casualties: u64,
}

/// Every aggregate view of one incident table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSummary {
    /// Which incident table was summarized.
    pub kind: DatasetKind,
    /// Records that survived filtering.
    pub incidents: u64,
    /// Records discarded by the geographic filter.
    pub dropped: u64,
    /// Incident counts per (year, state), earliest year first.
    pub yearly_by_state: Vec<YearStateCount>,
    /// Incident counts per (cause, detail).
    pub causes: Vec<CauseCount>,
    /// Incident counts per cause group.
    pub cause_totals: Vec<CauseTotal>,
    /// Table-wide fatality and injury totals.
    pub casualty_totals: CasualtyTotals,
    /// Casualties per (state, cause, detail) among flagged incidents.
    pub casualties_by_state_cause: Vec<StateCauseCasualties>,
    /// Casualties per state among flagged incidents.
    pub casualties_by_state: Vec<StateCasualties>,
}
