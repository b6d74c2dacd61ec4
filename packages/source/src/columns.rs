//! Column lists: plain-text files naming the incident columns to keep.
//!
//! One column name per line. Surrounding whitespace (including the line
//! terminator) is stripped and blank lines are ignored, so the list can be
//! edited by hand without breaking the loader.

use std::io::Read as _;
use std::path::Path;

use crate::SourceError;

/// An ordered selection of incident table columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnList {
    names: Vec<String>,
}

impl ColumnList {
    /// Parses column names from the text of a column list file.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        Self { names }
    }

    /// Reads and parses a column list file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] if the file is missing,
    /// [`SourceError::Malformed`] if it is not valid UTF-8, and
    /// [`SourceError::Io`] on other read failures.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let mut file = crate::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| SourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let text = String::from_utf8(bytes).map_err(|e| SourceError::Malformed {
            path: path.to_path_buf(),
            line: None,
            message: format!("column list is not valid UTF-8: {e}"),
        })?;

        let list = Self::parse(&text);
        log::debug!("Loaded {} column names from {}", list.len(), path.display());
        Ok(list)
    }

    /// Builds a column list from names already in memory.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Column names, in file order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns `true` if the list selects `column`.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.names.iter().any(|name| name == column)
    }

    /// Number of selected columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no columns are selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn strips_whitespace_and_blank_lines() {
        let list = ColumnList::parse("REPORT_NUMBER  \r\nIYEAR\n\n   \nCAUSE\t\n");
        assert_eq!(list.names(), ["REPORT_NUMBER", "IYEAR", "CAUSE"]);
    }

    #[test]
    fn loading_twice_yields_identical_lists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "IYEAR\n\nFATAL\nINJURE\n\n").unwrap();

        let first = ColumnList::load(file.path()).unwrap();
        let second = ColumnList::load(file.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.names(), ["IYEAR", "FATAL", "INJURE"]);
        assert!(first.names().iter().all(|n| !n.is_empty()));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ColumnList::load(&dir.path().join("columns.txt")).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }), "{err:?}");
    }

    #[test]
    fn contains_matches_exact_names() {
        let list = ColumnList::from_names(["CAUSE", "CAUSE_DETAILS"]);
        assert!(list.contains("CAUSE"));
        assert!(!list.contains("cause"));
        assert_eq!(list.len(), 2);
    }
}
