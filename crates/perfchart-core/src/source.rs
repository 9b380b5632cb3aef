use crate::record::RawRow;
use crate::{Error, Result};
use std::path::PathBuf;

/// Produces the raw rows of a benchmark history.
///
/// A failed fetch is terminal for the render: there is no retry and no partial result.
pub trait RecordSource {
    /// Human readable location used in errors and logs.
    fn location(&self) -> String;

    fn fetch(&self) -> Result<Vec<RawRow>>;
}

#[derive(Debug, Clone)]
enum TsvInput {
    Text(String),
    Path(PathBuf),
}

/// Tab-separated history with a header row, e.g. `build\tavgr\tavgw\t...`.
#[derive(Debug, Clone)]
pub struct TsvSource {
    input: TsvInput,
}

impl TsvSource {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: TsvInput::Text(text.into()),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: TsvInput::Path(path.into()),
        }
    }

    fn parse(&self, text: &str) -> Result<Vec<RawRow>> {
        let tabular = |source: csv::Error| Error::Tabular {
            location: self.location(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes());

        let headers = reader.headers().map_err(tabular)?.clone();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(tabular)?;
            // Short rows leave trailing columns absent; extra cells have no header and are dropped.
            let row: RawRow = headers
                .iter()
                .zip(record.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}

impl RecordSource for TsvSource {
    fn location(&self) -> String {
        match &self.input {
            TsvInput::Text(_) => "<inline>".to_string(),
            TsvInput::Path(path) => path.display().to_string(),
        }
    }

    fn fetch(&self) -> Result<Vec<RawRow>> {
        let rows = match &self.input {
            TsvInput::Text(text) => self.parse(text)?,
            TsvInput::Path(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
                    location: self.location(),
                    source,
                })?;
                self.parse(&text)?
            }
        };
        tracing::debug!(location = %self.location(), rows = rows.len(), "fetched records");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsv_rows_are_keyed_by_trimmed_headers() {
        let src = TsvSource::from_text("build\t avgr \n01-01 10:00[main]\t5\n");
        let rows = src.fetch().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("build").map(String::as_str), Some("01-01 10:00[main]"));
        assert_eq!(rows[0].get("avgr").map(String::as_str), Some("5"));
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert!(TsvSource::from_text("").fetch().unwrap().is_empty());
        assert!(TsvSource::from_text("build\tavgr\n").fetch().unwrap().is_empty());
    }

    #[test]
    fn short_rows_leave_trailing_columns_absent() {
        let rows = TsvSource::from_text(
            "build\tavgr\tavgw\tpeakr\n01-01 10:00[main]\t5\t3\t9\n02-01 10:00[main]\t6\n",
        )
        .fetch()
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("avgr").map(String::as_str), Some("6"));
        assert!(!rows[1].contains_key("avgw"));
        assert!(!rows[1].contains_key("peakr"));
    }

    #[test]
    fn long_rows_drop_cells_without_a_header() {
        let rows = TsvSource::from_text("build\tavgr\n01-01 10:00[main]\t5\t6\n")
            .fetch()
            .unwrap();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("avgr").map(String::as_str), Some("5"));
    }

    #[test]
    fn missing_file_is_a_fetch_failure() {
        let err = TsvSource::from_path("/definitely/not/here.tsv")
            .fetch()
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
