//! Report configuration (`report.toml`).
//!
//! Names every input file, the per-dataset delimiter, and the output path.
//! Relative paths are resolved against the directory of the configuration
//! file, or against the working directory for the embedded default.

use std::path::{Path, PathBuf};

use gas_incidents_incident_models::{DatasetKind, PipelineNetwork};
use serde::Deserialize;

use crate::ReportError;

/// The configuration used when no file is given.
pub const DEFAULT_CONFIG: &str = include_str!("../report.toml");

const fn default_delimiter() -> char {
    ','
}

fn default_title() -> String {
    "Exploring USA Gas Pipeline Accident Data".to_string()
}

/// Locations of the three pipeline geometry tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometryPaths {
    /// Inter/intrastate distribution lines.
    pub distribution: PathBuf,
    /// HGL transmission lines.
    pub transmission: PathBuf,
    /// Gulf of Mexico offshore lines.
    pub gulf_of_mexico: PathBuf,
}

/// Input files for one incident dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetFiles {
    /// Delimited incident table.
    pub incidents: PathBuf,
    /// Column list naming the columns to keep.
    pub columns: PathBuf,
    /// Field delimiter of the incident table.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl DatasetFiles {
    /// The delimiter as the single byte the CSV reader expects.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the delimiter is not ASCII.
    pub fn delimiter_byte(&self) -> Result<u8, ReportError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| ReportError::Config {
                message: format!(
                    "delimiter {:?} for {} must be a single ASCII character",
                    self.delimiter,
                    self.incidents.display()
                ),
            })
    }
}

/// Where and how the report is written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// HTML file to write.
    pub path: PathBuf,
    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,
}

/// The full report configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Pipeline geometry tables.
    pub geometry: GeometryPaths,
    /// Gas transmission/gathering incidents.
    pub transmission: DatasetFiles,
    /// Gas distribution incidents.
    pub distribution: DatasetFiles,
    /// Output settings.
    pub output: OutputConfig,
}

impl ReportConfig {
    /// Parses a configuration and resolves its relative paths against
    /// `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the TOML is malformed or a
    /// required key is missing.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self, ReportError> {
        let mut config: Self = toml::de::from_str(text).map_err(|e| ReportError::Config {
            message: e.to_string(),
        })?;
        config.resolve(base_dir);
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NotFound`] if the file does not exist,
    /// [`ReportError::Io`] if it cannot be read and [`ReportError::Config`]
    /// if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ReportError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ReportError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        log::debug!("Loaded report configuration from {}", path.display());
        Self::parse(&text, base_dir)
    }

    /// The embedded default configuration, resolved against the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the embedded file is invalid.
    pub fn embedded() -> Result<Self, ReportError> {
        Self::parse(DEFAULT_CONFIG, Path::new(""))
    }

    /// Loads `path` when given, the embedded default otherwise.
    ///
    /// # Errors
    ///
    /// See [`ReportConfig::load`] and [`ReportConfig::embedded`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ReportError> {
        path.map_or_else(Self::embedded, Self::load)
    }

    /// Input files for a dataset.
    #[must_use]
    pub const fn dataset(&self, kind: DatasetKind) -> &DatasetFiles {
        match kind {
            DatasetKind::Transmission => &self.transmission,
            DatasetKind::Distribution => &self.distribution,
        }
    }

    /// Geometry table for a pipeline network.
    #[must_use]
    pub fn geometry_path(&self, network: PipelineNetwork) -> &Path {
        match network {
            PipelineNetwork::Distribution => &self.geometry.distribution,
            PipelineNetwork::Transmission => &self.geometry.transmission,
            PipelineNetwork::GulfOfMexico => &self.geometry.gulf_of_mexico,
        }
    }

    fn resolve(&mut self, base_dir: &Path) {
        let paths = [
            &mut self.geometry.distribution,
            &mut self.geometry.transmission,
            &mut self.geometry.gulf_of_mexico,
            &mut self.transmission.incidents,
            &mut self.transmission.columns,
            &mut self.distribution.incidents,
            &mut self.distribution.columns,
            &mut self.output.path,
        ];
        for path in paths {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = ReportConfig::embedded().unwrap();
        assert_eq!(config.transmission.delimiter, ',');
        assert_eq!(
            config.dataset(DatasetKind::Distribution).columns,
            PathBuf::from("data/Gas_Dist_required_columns.txt")
        );
        assert_eq!(
            config.geometry_path(PipelineNetwork::GulfOfMexico),
            Path::new("data/geo_df_mx.csv")
        );
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.toml");
        std::fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config = ReportConfig::load(&path).unwrap();
        assert_eq!(
            config.transmission.incidents,
            dir.path()
                .join("data/incident_gas_transmission_gathering_jan2010_present.csv")
        );
        assert_eq!(
            config.output.path,
            dir.path().join("gas_pipeline_incidents.html")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let text = DEFAULT_CONFIG.replace(
            "path = \"gas_pipeline_incidents.html\"",
            "path = \"/tmp/report.html\"",
        );
        let config = ReportConfig::parse(&text, Path::new("/srv/report")).unwrap();
        assert_eq!(config.output.path, PathBuf::from("/tmp/report.html"));
        assert_eq!(
            config.geometry.transmission,
            PathBuf::from("/srv/report/data/geo_df_trans.csv")
        );
    }

    #[test]
    fn tab_delimiter_is_accepted() {
        let text = DEFAULT_CONFIG.replacen("delimiter = \",\"", "delimiter = \"\\t\"", 1);
        let config = ReportConfig::parse(&text, Path::new("")).unwrap();
        assert_eq!(config.transmission.delimiter_byte().unwrap(), b'\t');
        assert_eq!(config.distribution.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let text = DEFAULT_CONFIG.replacen("delimiter = \",\"", "delimiter = \"é\"", 1);
        let config = ReportConfig::parse(&text, Path::new("")).unwrap();
        assert!(matches!(
            config.transmission.delimiter_byte(),
            Err(ReportError::Config { .. })
        ));
    }

    #[test]
    fn missing_config_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = ReportConfig::load(&path).unwrap_err();
        assert!(
            matches!(err, ReportError::NotFound { path: ref p } if *p == path),
            "{err:?}"
        );
        assert!(err.to_string().starts_with("Configuration file not found"));
    }

    #[test]
    fn unreadable_config_path_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReportConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }), "{err:?}");
    }

    #[test]
    fn missing_section_is_a_config_error() {
        let err = ReportConfig::parse("[output]\npath = \"x.html\"\n", Path::new("")).unwrap_err();
        assert!(matches!(err, ReportError::Config { .. }), "{err:?}");
    }
}
