#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The gas pipeline incident report pipeline.
//!
//! Runs once per invocation, strictly in order: load the geometry and
//! incident files, aggregate each incident table, build the ordered block
//! list, render it to HTML, and write the page. Any failure aborts the run
//! before the output file is touched.

pub mod builder;
pub mod config;
pub mod figure;
pub mod html;
pub mod narrative;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gas_incidents_analytics::summarize;
use gas_incidents_analytics_models::IncidentSummary;
use gas_incidents_incident_models::{DatasetKind, IncidentTable, PipelineNetwork, Segment};
use gas_incidents_source::SourceError;
use gas_incidents_source::columns::ColumnList;
use gas_incidents_source::geometry::load_segments;
use gas_incidents_source::incidents::{IncidentFileConfig, load_incidents};
use gas_incidents_source::progress::ProgressCallback;
use plotly::layout::ControlBuilderError;

pub use builder::build_report;
pub use config::ReportConfig;

/// Stages advanced by [`generate`]: three geometry tables, two incident
/// tables, aggregation, rendering, and writing.
pub const GENERATE_STEPS: u64 = 8;

/// Stages advanced by [`summaries`]: two incident tables and aggregation.
pub const SUMMARY_STEPS: u64 = 3;

/// Errors that can occur while producing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The configuration could not be parsed or holds an invalid value.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// An input file could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A chart's animation controls could not be built.
    #[error("Chart controls could not be built: {0}")]
    Chart(#[from] ControlBuilderError),

    /// The configuration file does not exist.
    #[error("Configuration file not found: {}", .path.display())]
    NotFound {
        /// Path that was opened.
        path: PathBuf,
    },

    /// The configuration or output file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Everything loaded from disk for one report.
#[derive(Debug, Clone)]
pub struct ReportInputs {
    /// Inter/intrastate distribution line segments.
    pub distribution_lines: Vec<Segment>,
    /// HGL transmission line segments.
    pub transmission_lines: Vec<Segment>,
    /// Gulf of Mexico line segments.
    pub gulf_of_mexico_lines: Vec<Segment>,
    /// Filtered gas transmission/gathering incidents.
    pub transmission: IncidentTable,
    /// Filtered gas distribution incidents.
    pub distribution: IncidentTable,
}

impl ReportInputs {
    /// Segments of one pipeline network.
    #[must_use]
    pub fn segments(&self, network: PipelineNetwork) -> &[Segment] {
        match network {
            PipelineNetwork::Distribution => &self.distribution_lines,
            PipelineNetwork::Transmission => &self.transmission_lines,
            PipelineNetwork::GulfOfMexico => &self.gulf_of_mexico_lines,
        }
    }
}

/// Loads the column list and incident table of one dataset.
///
/// # Errors
///
/// Returns [`ReportError::Source`] if either file is missing or malformed,
/// or if the column list does not match the table, and
/// [`ReportError::Config`] if the configured delimiter is invalid.
pub fn load_dataset(
    config: &ReportConfig,
    kind: DatasetKind,
) -> Result<IncidentTable, ReportError> {
    let files = config.dataset(kind);
    let columns = ColumnList::load(&files.columns)?;
    let table = load_incidents(&IncidentFileConfig {
        kind,
        path: &files.incidents,
        columns: &columns,
        delimiter: files.delimiter_byte()?,
    })?;
    Ok(table)
}

fn load_tables(
    config: &ReportConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(IncidentTable, IncidentTable), ReportError> {
    let load = |kind: DatasetKind| -> Result<IncidentTable, ReportError> {
        progress.set_message(format!("Loading {} incidents", kind.label()));
        let table = load_dataset(config, kind)?;
        progress.inc(1);
        Ok(table)
    };
    Ok((
        load(DatasetKind::Transmission)?,
        load(DatasetKind::Distribution)?,
    ))
}

/// Loads every input file named by `config`.
///
/// # Errors
///
/// See [`load_dataset`]; geometry tables fail the same way.
pub fn load_inputs(
    config: &ReportConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<ReportInputs, ReportError> {
    let load = |network: PipelineNetwork| -> Result<Vec<Segment>, ReportError> {
        progress.set_message(format!("Loading {network} pipeline geometry"));
        let segments = load_segments(config.geometry_path(network))?;
        progress.inc(1);
        Ok(segments)
    };
    let distribution_lines = load(PipelineNetwork::Distribution)?;
    let transmission_lines = load(PipelineNetwork::Transmission)?;
    let gulf_of_mexico_lines = load(PipelineNetwork::GulfOfMexico)?;

    let (transmission, distribution) = load_tables(config, progress)?;

    Ok(ReportInputs {
        distribution_lines,
        transmission_lines,
        gulf_of_mexico_lines,
        transmission,
        distribution,
    })
}

/// Loads both incident tables and summarizes them, transmission first.
///
/// # Errors
///
/// See [`load_dataset`].
pub fn summaries(
    config: &ReportConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<IncidentSummary>, ReportError> {
    progress.set_total(SUMMARY_STEPS);
    let (transmission, distribution) = load_tables(config, progress)?;

    progress.set_message("Aggregating".to_string());
    let summaries = vec![summarize(&transmission), summarize(&distribution)];
    progress.inc(1);

    progress.finish("Summarized incidents".to_string());
    Ok(summaries)
}

/// Writes `contents` to a staging file beside `path`, then renames it into
/// place.
fn write_atomically(path: &Path, contents: &str) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".partial");
    let staging = PathBuf::from(staging);

    std::fs::write(&staging, contents).map_err(io_err)?;
    std::fs::rename(&staging, path).map_err(|source| {
        let _ = std::fs::remove_file(&staging);
        io_err(source)
    })
}

/// Builds the report and writes it to `output`, or to the configured
/// output path.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns the first error from loading, serializing, or writing. Nothing
/// is written unless every earlier stage succeeds.
pub fn generate(
    config: &ReportConfig,
    output: Option<&Path>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PathBuf, ReportError> {
    progress.set_total(GENERATE_STEPS);

    let inputs = load_inputs(config, progress)?;

    progress.set_message("Aggregating".to_string());
    let transmission = summarize(&inputs.transmission);
    let distribution = summarize(&inputs.distribution);
    progress.inc(1);

    progress.set_message("Rendering".to_string());
    let report = build_report(
        &config.output.title,
        &inputs,
        &transmission,
        &distribution,
        chrono::Utc::now(),
    );
    let page = html::render(&report)?;
    progress.inc(1);

    let path = output.map_or_else(|| config.output.path.clone(), Path::to_path_buf);
    progress.set_message(format!("Writing {}", path.display()));
    write_atomically(&path, &page)?;
    progress.inc(1);

    log::info!(
        "Wrote report with {} blocks to {}",
        report.blocks.len(),
        path.display()
    );
    progress.finish(format!("Report written to {}", path.display()));

    Ok(path)
}

#[cfg(test)]
mod tests {
    use gas_incidents_source::progress::null_progress;

    use super::*;

    const GEOMETRY_HEADER: &str =
        "operator_name,pipe_name,category,start_lat,start_lon,end_lat,end_lon";

    const TRANSMISSION: &str = "\
REPORT_NUMBER,IYEAR,OPERATOR_STATE_ABBREVIATION,LOCATION_LATITUDE,LOCATION_LONGITUDE,FATAL,INJURE,CAUSE,CAUSE_DETAILS,NARRATIVE
20150001,2015,TX,29.7,-95.3,0,1,EQUIPMENT FAILURE,MALFUNCTION OF CONTROL/RELIEF EQUIPMENT,x
20160002,2016,OK,35.4,-97.5,1,0,CORROSION FAILURE,EXTERNAL CORROSION,y
20160003,2016,AK,61.2,-149.9,0,0,CORROSION FAILURE,INTERNAL CORROSION,z
";

    const DISTRIBUTION: &str = "\
NAME,IYEAR,LOCATION_CITY_NAME,LOCATION_STATE_ABBREVIATION,LOCATION_LATITUDE,LOCATION_LONGITUDE,FATAL,INJURE,FATALITY_IND,INJURY_IND,CAUSE,CAUSE_DETAILS
SOCALGAS,2015,LOS ANGELES,CA,34.05,-118.24,0,2,NO,YES,EXCAVATION DAMAGE,THIRD PARTY EXCAVATION DAMAGE
CON ED,2014,NEW YORK,NY,40.8,-73.9,8,48,YES,YES,NATURAL FORCE DAMAGE,EARTH MOVEMENT
PG&E,2016,SAN BRUNO,CA,37.6,-200.0,0,0,NO,NO,OTHER OUTSIDE FORCE DAMAGE,OTHER
";

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    /// Writes a complete input set in `dir` and returns its config.
    fn fixture(dir: &Path) -> ReportConfig {
        write(
            dir,
            "geo_df.csv",
            &format!("{GEOMETRY_HEADER}\nAtmos Energy,,Intrastate,32.7,-97.3,32.8,-97.2\n"),
        );
        write(
            dir,
            "geo_df_trans.csv",
            &format!("{GEOMETRY_HEADER}\nKinder Morgan,Tennessee Gas,Interstate,29.1,-95.2,29.3,-95.0\n"),
        );
        write(dir, "geo_df_mx.csv", &format!("{GEOMETRY_HEADER}\n"));
        write(dir, "trans.csv", TRANSMISSION);
        write(dir, "dist.csv", DISTRIBUTION);
        write(
            dir,
            "trans_columns.txt",
            "REPORT_NUMBER\nIYEAR\nOPERATOR_STATE_ABBREVIATION\nLOCATION_LATITUDE\nLOCATION_LONGITUDE\nFATAL\nINJURE\nCAUSE\nCAUSE_DETAILS\n",
        );
        write(
            dir,
            "dist_columns.txt",
            "NAME\nIYEAR\nLOCATION_CITY_NAME\nLOCATION_STATE_ABBREVIATION\nLOCATION_LATITUDE\nLOCATION_LONGITUDE\nFATAL\nINJURE\nFATALITY_IND\nINJURY_IND\nCAUSE\nCAUSE_DETAILS\n\n",
        );

        let toml = "\
[geometry]
distribution = \"geo_df.csv\"
transmission = \"geo_df_trans.csv\"
gulf_of_mexico = \"geo_df_mx.csv\"

[transmission]
incidents = \"trans.csv\"
columns = \"trans_columns.txt\"

[distribution]
incidents = \"dist.csv\"
columns = \"dist_columns.txt\"

[output]
path = \"out/report.html\"
";
        let path = dir.join("report.toml");
        std::fs::write(&path, toml).unwrap();
        ReportConfig::load(&path).unwrap()
    }

    #[test]
    fn summaries_exclude_rows_outside_window() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());

        let summaries = summaries(&config, &null_progress()).unwrap();
        let [transmission, distribution] = summaries.as_slice() else {
            panic!("expected two summaries");
        };

        assert_eq!(transmission.kind, DatasetKind::Transmission);
        assert_eq!(transmission.incidents, 2);
        assert_eq!(transmission.dropped, 1);
        assert!(transmission.yearly_by_state.iter().all(|r| r.state != "AK"));

        assert_eq!(distribution.incidents, 2);
        assert_eq!(distribution.dropped, 1);
        assert_eq!(distribution.casualty_totals.deaths, 8);
        assert_eq!(distribution.casualty_totals.injuries, 50);
        assert!(
            distribution
                .causes
                .iter()
                .all(|c| c.cause != "Other Outside Force Damage")
        );
    }

    #[test]
    fn generate_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());

        let path = generate(&config, None, &null_progress()).unwrap();

        assert_eq!(path, dir.path().join("out/report.html"));
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Exploring USA Gas Pipeline Accident Data"));
        assert!(html.contains("Plotly.newPlot(\"chart-9\""));
        assert!(!html.contains("chart-10"));
        assert!(html.contains("Los Angeles, CA, Cause: Excavation damage, 2015"));
        assert!(!dir.path().join("out/report.html.partial").exists());
    }

    #[test]
    fn output_override_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());
        let target = dir.path().join("custom.html");

        let path = generate(&config, Some(&target), &null_progress()).unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
        assert!(!config.output.path.exists());
    }

    #[test]
    fn missing_listed_column_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());
        write(
            dir.path(),
            "trans_columns.txt",
            "REPORT_NUMBER\nIYEAR\nSIGNIFICANT\n",
        );

        let err = generate(&config, None, &null_progress()).unwrap_err();
        assert!(
            matches!(
                err,
                ReportError::Source(SourceError::MissingColumn { ref column, .. }) if column == "SIGNIFICANT"
            ),
            "{err:?}"
        );
        assert!(!config.output.path.exists());
    }

    #[test]
    fn missing_geometry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());
        std::fs::remove_file(dir.path().join("geo_df_mx.csv")).unwrap();

        let err = load_inputs(&config, &null_progress()).unwrap_err();
        assert!(
            matches!(err, ReportError::Source(SourceError::NotFound { .. })),
            "{err:?}"
        );
    }
}
