#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident dataset schemas, incident records, and pipeline segment types.
//!
//! PHMSA publishes gas transmission/gathering and gas distribution incidents
//! as two independently-schemaed tables that share most, but not all, column
//! names. [`DatasetKind`] captures which table a record came from and maps
//! every [`ColumnRole`] the report needs onto that table's column name.

pub mod text;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which PHMSA incident table a record was loaded from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    /// Gas transmission and gathering pipeline incidents
    Transmission,
    /// Gas distribution pipeline incidents
    Distribution,
}

impl DatasetKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Transmission, Self::Distribution]
    }

    /// Human-readable dataset name used in chart titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Transmission => "Gas Transmission",
            Self::Distribution => "Gas Distribution",
        }
    }

    /// Returns the source column that holds the given role in this table.
    #[must_use]
    pub const fn column(self, role: ColumnRole) -> &'static str {
        match role {
            ColumnRole::CountKey => match self {
                Self::Transmission => "REPORT_NUMBER",
                Self::Distribution => "NAME",
            },
            ColumnRole::State => match self {
                Self::Transmission => "OPERATOR_STATE_ABBREVIATION",
                Self::Distribution => "LOCATION_STATE_ABBREVIATION",
            },
            ColumnRole::Year => "IYEAR",
            ColumnRole::Latitude => "LOCATION_LATITUDE",
            ColumnRole::Longitude => "LOCATION_LONGITUDE",
            ColumnRole::Fatalities => "FATAL",
            ColumnRole::Injuries => "INJURE",
            ColumnRole::FatalityFlag => "FATALITY_IND",
            ColumnRole::InjuryFlag => "INJURY_IND",
            ColumnRole::Cause => "CAUSE",
            ColumnRole::CauseDetails => "CAUSE_DETAILS",
            ColumnRole::City => "LOCATION_CITY_NAME",
            ColumnRole::LocationState => "LOCATION_STATE_ABBREVIATION",
        }
    }

    /// Whether the column list must select the column for `role`.
    ///
    /// Optional roles fall back to empty/false values when the column is
    /// not selected.
    #[must_use]
    pub const fn requires(self, role: ColumnRole) -> bool {
        match role {
            ColumnRole::CountKey
            | ColumnRole::Year
            | ColumnRole::State
            | ColumnRole::Latitude
            | ColumnRole::Longitude
            | ColumnRole::Fatalities
            | ColumnRole::Injuries
            | ColumnRole::Cause
            | ColumnRole::CauseDetails => true,
            ColumnRole::FatalityFlag
            | ColumnRole::InjuryFlag
            | ColumnRole::City
            | ColumnRole::LocationState => matches!(self, Self::Distribution),
        }
    }

    /// Source columns that must be present in the column list.
    #[must_use]
    pub fn required_columns(self) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = Vec::new();
        for role in ColumnRole::all() {
            let column = self.column(*role);
            if self.requires(*role) && !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }
}

/// A field of an incident record the report reads, independent of the
/// source column name it is stored under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColumnRole {
    /// One-to-one incident key used as the incident count column
    CountKey,
    /// Year the incident occurred
    Year,
    /// State abbreviation the incident is grouped under
    State,
    /// Incident location latitude (WGS84)
    Latitude,
    /// Incident location longitude (WGS84)
    Longitude,
    /// Number of fatalities
    Fatalities,
    /// Number of injuries
    Injuries,
    /// `YES` when the incident involved a fatality
    FatalityFlag,
    /// `YES` when the incident involved an injury
    InjuryFlag,
    /// Top-level cause group
    Cause,
    /// Sub-cause within the cause group
    CauseDetails,
    /// City of the incident location
    City,
    /// State abbreviation of the incident location
    LocationState,
}

impl ColumnRole {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CountKey,
            Self::Year,
            Self::State,
            Self::Latitude,
            Self::Longitude,
            Self::Fatalities,
            Self::Injuries,
            Self::FatalityFlag,
            Self::InjuryFlag,
            Self::Cause,
            Self::CauseDetails,
            Self::City,
            Self::LocationState,
        ]
    }
}

/// Latitude/longitude window that incident locations must fall inside.
///
/// Longitude bounds are exclusive on both sides, latitude is bounded from
/// above only. Non-finite coordinates never pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Exclusive western longitude bound.
    pub min_longitude: f64,
    /// Exclusive eastern longitude bound.
    pub max_longitude: f64,
    /// Exclusive northern latitude bound.
    pub max_latitude: f64,
}

impl BoundingBox {
    /// The continental United States window applied to both incident tables.
    pub const CONTINENTAL_US: Self = Self {
        min_longitude: -140.0,
        max_longitude: -50.0,
        max_latitude: 50.0,
    };

    /// Returns `true` if the point lies strictly inside the window.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.min_longitude < longitude
            && longitude < self.max_longitude
            && latitude < self.max_latitude
    }
}

/// A single incident that survived loading and geographic filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Zero-based index of the source data row. Rows dropped while loading
    /// still take an index, so kept rows can have gaps between them.
    pub row: usize,
    /// Value of the dataset's count-key column.
    pub report_key: String,
    /// Year the incident occurred.
    pub year: i32,
    /// State abbreviation the incident is grouped under.
    pub state: String,
    /// Location state abbreviation, when selected.
    pub location_state: Option<String>,
    /// Location city name, when selected.
    pub city: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Number of fatalities.
    pub fatalities: u32,
    /// Number of injuries.
    pub injuries: u32,
    /// Whether the fatality indicator was set.
    pub fatality_ind: bool,
    /// Whether the injury indicator was set.
    pub injury_ind: bool,
    /// Raw cause group.
    pub cause: String,
    /// Raw cause detail.
    pub cause_details: String,
    /// Display string for map hover text (distribution incidents only).
    pub hover_text: Option<String>,
    /// Raw values of every selected column, in column-list order.
    pub values: Vec<String>,
}

impl IncidentRecord {
    /// Returns `true` if either casualty indicator is set.
    #[must_use]
    pub const fn has_casualty_flag(&self) -> bool {
        self.fatality_ind || self.injury_ind
    }
}

/// The filtered incident table for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentTable {
    /// Which incident table these records came from.
    pub kind: DatasetKind,
    /// Selected column names, in column-list order.
    pub columns: Vec<String>,
    /// Records inside the geographic window.
    pub records: Vec<IncidentRecord>,
    /// Number of rows discarded by the geographic filter.
    pub dropped: u64,
}

impl IncidentTable {
    /// Number of records in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest incident year in the table.
    #[must_use]
    pub fn max_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }
}

/// The three pre-converted pipeline geometry layers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PipelineNetwork {
    /// Inter/intrastate distribution lines
    Distribution,
    /// HGL transmission lines
    Transmission,
    /// Gulf of Mexico offshore lines
    GulfOfMexico,
}

impl PipelineNetwork {
    /// Returns all variants of this enum, in map drawing order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Distribution, Self::Transmission, Self::GulfOfMexico]
    }
}

/// One straight pipeline segment between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Start and end latitudes.
    pub lats: [f64; 2],
    /// Start and end longitudes.
    pub lons: [f64; 2],
    /// Pipeline operator.
    pub operator_name: String,
    /// Pipeline name, when the layer carries one.
    pub pipe_name: Option<String>,
    /// Pipeline category from the source shapefile.
    pub category: String,
}
