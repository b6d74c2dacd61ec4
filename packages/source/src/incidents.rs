//! PHMSA incident table loader.
//!
//! Reads one delimited incident table, keeps only the columns named by a
//! [`ColumnList`], and drops every row whose location falls outside
//! [`BoundingBox::CONTINENTAL_US`]. Dropped rows are counted, not reported
//! individually.

use std::io::Read;
use std::path::Path;

use gas_incidents_incident_models::text::{capitalize_first, title_case};
use gas_incidents_incident_models::{
    BoundingBox, ColumnRole, DatasetKind, IncidentRecord, IncidentTable,
};

use crate::SourceError;
use crate::columns::ColumnList;
use crate::parsing::{parse_coordinate, parse_count, parse_flag, parse_year};

/// Configuration for loading one incident table.
pub struct IncidentFileConfig<'a> {
    /// Which PHMSA table the file holds.
    pub kind: DatasetKind,
    /// Path of the delimited incident file.
    pub path: &'a Path,
    /// Columns to keep.
    pub columns: &'a ColumnList,
    /// Field delimiter byte.
    pub delimiter: u8,
}

/// Loads an incident table from disk.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if the file is missing,
/// [`SourceError::MissingColumn`] if the column list names a column the
/// file lacks, [`SourceError::ColumnNotSelected`] if a column the report
/// reads is not listed, and [`SourceError::Malformed`] if a surviving row
/// has an unparseable year or casualty count.
pub fn load_incidents(config: &IncidentFileConfig<'_>) -> Result<IncidentTable, SourceError> {
    let file = crate::open(config.path)?;
    read_incidents(file, config)
}

/// Column positions (within the full header) for each role the report reads.
struct RoleIndex {
    kind: DatasetKind,
    positions: Vec<(ColumnRole, usize)>,
}

impl RoleIndex {
    fn new(
        kind: DatasetKind,
        headers: &[String],
        columns: &ColumnList,
        path: &Path,
    ) -> Result<Self, SourceError> {
        for column in kind.required_columns() {
            if !columns.contains(column) {
                return Err(SourceError::ColumnNotSelected {
                    column: column.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }

        let positions = ColumnRole::all()
            .iter()
            .filter_map(|role| {
                let column = kind.column(*role);
                if !columns.contains(column) {
                    return None;
                }
                headers
                    .iter()
                    .position(|h| h == column)
                    .map(|idx| (*role, idx))
            })
            .collect();

        Ok(Self { kind, positions })
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, role: ColumnRole) -> Option<&'r str> {
        self.positions
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, idx)| record.get(*idx).unwrap_or("").trim())
    }

    fn text(&self, record: &csv::StringRecord, role: ColumnRole) -> String {
        self.get(record, role).unwrap_or_default().to_string()
    }
}

/// Reads an incident table from any reader. `config.path` is only used for
/// error messages.
///
/// # Errors
///
/// See [`load_incidents`].
pub fn read_incidents<R: Read>(
    reader: R,
    config: &IncidentFileConfig<'_>,
) -> Result<IncidentTable, SourceError> {
    let path = config.path;
    let bounds = BoundingBox::CONTINENTAL_US;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SourceError::from_csv(path, &e))?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    // Validate the selection before touching any rows.
    let selected: Vec<usize> = config
        .columns
        .names()
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SourceError::MissingColumn {
                    column: name.clone(),
                    path: path.to_path_buf(),
                })
        })
        .collect::<Result<_, _>>()?;

    let roles = RoleIndex::new(config.kind, &headers, config.columns, path)?;

    let mut records = Vec::new();
    let mut dropped: u64 = 0;

    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|e| SourceError::from_csv(path, &e))?;

        let latitude = roles
            .get(&row, ColumnRole::Latitude)
            .and_then(parse_coordinate);
        let longitude = roles
            .get(&row, ColumnRole::Longitude)
            .and_then(parse_coordinate);

        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            dropped += 1;
            continue;
        };
        if !bounds.contains(latitude, longitude) {
            dropped += 1;
            continue;
        }

        let line = row.position().map(csv::Position::line);
        records.push(
            parse_record(&roles, index, &row, &selected, latitude, longitude).map_err(
                |message| SourceError::Malformed {
                    path: path.to_path_buf(),
                    line,
                    message,
                },
            )?,
        );
    }

    log::info!(
        "[{}] Loaded {} incidents from {} ({dropped} outside the continental US dropped)",
        config.kind,
        records.len(),
        path.display()
    );

    Ok(IncidentTable {
        kind: config.kind,
        columns: config.columns.names().to_vec(),
        records,
        dropped,
    })
}

fn parse_record(
    roles: &RoleIndex,
    index: usize,
    row: &csv::StringRecord,
    selected: &[usize],
    latitude: f64,
    longitude: f64,
) -> Result<IncidentRecord, String> {
    let year_raw = roles.get(row, ColumnRole::Year).unwrap_or_default();
    let year = parse_year(year_raw).ok_or_else(|| format!("invalid incident year '{year_raw}'"))?;

    let count = |role: ColumnRole| -> Result<u32, String> {
        let raw = roles.get(row, role).unwrap_or_default();
        parse_count(raw).ok_or_else(|| format!("invalid {role} count '{raw}'"))
    };
    let fatalities = count(ColumnRole::Fatalities)?;
    let injuries = count(ColumnRole::Injuries)?;

    let city = roles.get(row, ColumnRole::City).map(str::to_owned);
    let location_state = roles.get(row, ColumnRole::LocationState).map(str::to_owned);
    let cause = roles.text(row, ColumnRole::Cause);

    let hover_text = matches!(roles.kind, DatasetKind::Distribution).then(|| {
        format!(
            "{}, {}, Cause: {}, {year}",
            title_case(city.as_deref().unwrap_or_default()),
            location_state.as_deref().unwrap_or_default(),
            capitalize_first(&cause),
        )
    });

    Ok(IncidentRecord {
        row: index,
        report_key: roles.text(row, ColumnRole::CountKey),
        year,
        state: roles.text(row, ColumnRole::State),
        location_state,
        city,
        latitude,
        longitude,
        fatalities,
        injuries,
        fatality_ind: roles.get(row, ColumnRole::FatalityFlag).is_some_and(parse_flag),
        injury_ind: roles.get(row, ColumnRole::InjuryFlag).is_some_and(parse_flag),
        cause,
        cause_details: roles.text(row, ColumnRole::CauseDetails),
        hover_text,
        values: selected
            .iter()
            .map(|idx| row.get(*idx).unwrap_or("").trim().to_owned())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const DIST_HEADER: &str = "NAME,IYEAR,LOCATION_CITY_NAME,LOCATION_STATE_ABBREVIATION,\
        LOCATION_LATITUDE,LOCATION_LONGITUDE,FATALITY_IND,FATAL,INJURY_IND,INJURE,CAUSE,\
        CAUSE_DETAILS,EXTRA";

    fn dist_columns() -> ColumnList {
        ColumnList::from_names([
            "NAME",
            "IYEAR",
            "LOCATION_CITY_NAME",
            "LOCATION_STATE_ABBREVIATION",
            "LOCATION_LATITUDE",
            "LOCATION_LONGITUDE",
            "FATALITY_IND",
            "FATAL",
            "INJURY_IND",
            "INJURE",
            "CAUSE",
            "CAUSE_DETAILS",
        ])
    }

    fn read(kind: DatasetKind, columns: &ColumnList, csv: &str) -> Result<IncidentTable, SourceError> {
        let path = PathBuf::from("incidents.csv");
        let config = IncidentFileConfig {
            kind,
            path: &path,
            columns,
            delimiter: b',',
        };
        read_incidents(csv.as_bytes(), &config)
    }

    #[test]
    fn drops_rows_outside_the_continental_us() {
        let csv = format!(
            "{DIST_HEADER}\n\
             ACME GAS,2015,HOUSTON,TX,29.76,-95.36,NO,0,YES,2,EXCAVATION DAMAGE,THIRD PARTY,x\n\
             ACME GAS,2016,NOWHERE,TX,29.76,-200,YES,3,NO,0,EXCAVATION DAMAGE,THIRD PARTY,x\n\
             ACME GAS,2016,ANCHORAGE,AK,61.2,-149.9,NO,0,NO,0,CORROSION FAILURE,EXTERNAL,x\n\
             ACME GAS,2017,BLANK,TX,,,NO,0,NO,0,CORROSION FAILURE,EXTERNAL,x\n"
        );
        let table = read(DatasetKind::Distribution, &dist_columns(), &csv).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.dropped, 3);
        assert_eq!(table.records[0].row, 0);
        for record in &table.records {
            assert!(-140.0 < record.longitude && record.longitude < -50.0);
            assert!(record.latitude < 50.0);
        }
    }

    #[test]
    fn kept_rows_remember_their_source_index() {
        let csv = format!(
            "{DIST_HEADER}\n\
             ACME GAS,2016,ANCHORAGE,AK,61.2,-149.9,NO,0,NO,0,CORROSION FAILURE,EXTERNAL,x\n\
             ACME GAS,2015,HOUSTON,TX,29.76,-95.36,NO,0,YES,2,EXCAVATION DAMAGE,THIRD PARTY,x\n\
             ACME GAS,2017,BLANK,TX,,,NO,0,NO,0,CORROSION FAILURE,EXTERNAL,x\n\
             ACME GAS,2018,DALLAS,TX,32.78,-96.8,NO,0,NO,0,CORROSION FAILURE,EXTERNAL,x\n"
        );
        let table = read(DatasetKind::Distribution, &dist_columns(), &csv).unwrap();

        let rows: Vec<usize> = table.records.iter().map(|r| r.row).collect();
        assert_eq!(rows, [1, 3]);
    }

    #[test]
    fn keeps_only_listed_columns() {
        let csv = format!(
            "{DIST_HEADER}\n\
             ACME GAS,2015,HOUSTON,TX,29.76,-95.36,NO,0,YES,2,EXCAVATION DAMAGE,THIRD PARTY,x\n"
        );
        let columns = dist_columns();
        let table = read(DatasetKind::Distribution, &columns, &csv).unwrap();

        assert_eq!(table.columns, columns.names());
        assert!(!table.columns.iter().any(|c| c == "EXTRA"));
        assert_eq!(table.records[0].values.len(), columns.len());
        assert_eq!(table.records[0].values[0], "ACME GAS");
    }

    #[test]
    fn builds_distribution_hover_text() {
        let csv = format!(
            "{DIST_HEADER}\n\
             ACME GAS,2015,SAN FRANCISCO,CA,37.77,-122.42,NO,0,YES,2,EXCAVATION DAMAGE,THIRD PARTY,x\n"
        );
        let table = read(DatasetKind::Distribution, &dist_columns(), &csv).unwrap();
        let record = &table.records[0];

        assert_eq!(
            record.hover_text.as_deref(),
            Some("San Francisco, CA, Cause: Excavation damage, 2015")
        );
        assert_eq!(record.report_key, "ACME GAS");
        assert_eq!(record.state, "CA");
        assert!(record.injury_ind);
        assert!(!record.fatality_ind);
        assert_eq!(record.injuries, 2);
    }

    #[test]
    fn listed_column_missing_from_file_is_an_error() {
        let csv = "NAME,IYEAR\nACME,2015\n";
        let err = read(DatasetKind::Distribution, &dist_columns(), csv).unwrap_err();
        assert!(
            matches!(&err, SourceError::MissingColumn { column, .. } if column == "LOCATION_CITY_NAME"),
            "{err:?}"
        );
    }

    #[test]
    fn unselected_required_column_is_an_error() {
        let csv = format!("{DIST_HEADER}\n");
        let columns = ColumnList::from_names(["NAME", "IYEAR"]);
        let err = read(DatasetKind::Distribution, &columns, &csv).unwrap_err();
        assert!(
            matches!(err, SourceError::ColumnNotSelected { .. }),
            "{err:?}"
        );
    }

    #[test]
    fn transmission_uses_operator_state_and_report_number() {
        let csv = "REPORT_NUMBER,IYEAR,OPERATOR_STATE_ABBREVIATION,LOCATION_LATITUDE,\
                   LOCATION_LONGITUDE,FATAL,INJURE,CAUSE,CAUSE_DETAILS\n\
                   20150001,2015.0,OK,35.4,-97.5,1,,EQUIPMENT FAILURE,PUMP\n";
        let columns = ColumnList::from_names([
            "REPORT_NUMBER",
            "IYEAR",
            "OPERATOR_STATE_ABBREVIATION",
            "LOCATION_LATITUDE",
            "LOCATION_LONGITUDE",
            "FATAL",
            "INJURE",
            "CAUSE",
            "CAUSE_DETAILS",
        ]);
        let table = read(DatasetKind::Transmission, &columns, csv).unwrap();
        let record = &table.records[0];

        assert_eq!(record.report_key, "20150001");
        assert_eq!(record.state, "OK");
        assert_eq!(record.year, 2015);
        assert_eq!(record.fatalities, 1);
        assert_eq!(record.injuries, 0);
        assert!(record.hover_text.is_none());
        assert!(record.city.is_none());
    }

    #[test]
    fn bad_year_in_surviving_row_is_malformed() {
        let csv = format!(
            "{DIST_HEADER}\n\
             ACME GAS,soon,HOUSTON,TX,29.76,-95.36,NO,0,YES,2,EXCAVATION DAMAGE,THIRD PARTY,x\n"
        );
        let err = read(DatasetKind::Distribution, &dist_columns(), &csv).unwrap_err();
        assert!(
            matches!(err, SourceError::Malformed { line: Some(2), .. }),
            "{err:?}"
        );
    }

    #[test]
    fn empty_table_loads_without_records() {
        let csv = format!("{DIST_HEADER}\n");
        let table = read(DatasetKind::Distribution, &dist_columns(), &csv).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.dropped, 0);
    }

    #[test]
    fn missing_incident_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.csv");
        let columns = dist_columns();
        let config = IncidentFileConfig {
            kind: DatasetKind::Distribution,
            path: &path,
            columns: &columns,
            delimiter: b',',
        };
        let err = load_incidents(&config).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }), "{err:?}");
    }
}
