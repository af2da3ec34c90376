use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::DetailRecord;

/// Byte-order mark ahead of the header so spreadsheet tools detect UTF-8 and
/// multilingual titles and names survive the round trip.
const UTF8_BOM: &str = "\u{feff}";

const HEADER: &str = "tmdb_id,title,release_date,budget,revenue,runtime,\
vote_average,vote_count,genres,production_companies,director,top_cast";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Destination for cumulative checkpoint snapshots.
pub trait RecordSink: Send + Sync {
    /// Persists the complete record set accumulated so far, replacing any
    /// prior checkpoint in place.
    fn persist(&self, records: &[DetailRecord]) -> Result<PathBuf, PersistError>;
}

/// Writes checkpoints as a single CSV file, atomically replaced on every
/// persist so a crash mid-write never corrupts the previous snapshot.
#[derive(Debug, Clone)]
pub struct CsvCheckpointSink {
    path: PathBuf,
}

impl CsvCheckpointSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvCheckpointSink {
    fn persist(&self, records: &[DetailRecord]) -> Result<PathBuf, PersistError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        ensure_output_dir(&dir)?;

        let mut content = String::with_capacity(HEADER.len() + records.len() * 128);
        content.push_str(UTF8_BOM);
        content.push_str(HEADER);
        content.push('\n');
        for record in records {
            content.push_str(&render_row(record));
            content.push('\n');
        }

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        tmp.persist(&self.path).map_err(|e| PersistError::Io(e.error))?;
        Ok(self.path.clone())
    }
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

fn render_row(record: &DetailRecord) -> String {
    [
        record.tmdb_id.to_string(),
        escape(record.title.as_deref().unwrap_or("")),
        escape(record.release_date.as_deref().unwrap_or("")),
        number(record.budget),
        number(record.revenue),
        number(record.runtime.map(u64::from)),
        record
            .vote_average
            .map(|v| v.to_string())
            .unwrap_or_default(),
        number(record.vote_count),
        escape(&record.genres),
        escape(&record.production_companies),
        escape(&record.director),
        escape(&record.top_cast),
    ]
    .join(",")
}

// Missing numerics become empty cells, never zero.
fn number(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// RFC 4180 quoting: fields containing a comma, quote, CR or LF are wrapped
/// in quotes with embedded quotes doubled.
fn escape(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{escape, render_row};
    use crate::DetailRecord;

    fn sparse_record(id: u64) -> DetailRecord {
        DetailRecord {
            tmdb_id: id,
            title: None,
            release_date: None,
            budget: None,
            revenue: None,
            runtime: None,
            vote_average: None,
            vote_count: None,
            genres: String::new(),
            production_companies: String::new(),
            director: "Unknown".to_string(),
            top_cast: String::new(),
        }
    }

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(escape("The Matrix"), "The Matrix");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn separators_and_quotes_are_quoted() {
        assert_eq!(escape("Lock, Stock"), "\"Lock, Stock\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn sparse_record_renders_empty_cells() {
        assert_eq!(render_row(&sparse_record(42)), "42,,,,,,,,,,Unknown,");
    }

    #[test]
    fn full_record_renders_in_header_order() {
        let record = DetailRecord {
            tmdb_id: 603,
            title: Some("The Matrix".to_string()),
            release_date: Some("1999-03-30".to_string()),
            budget: Some(63_000_000),
            revenue: Some(463_517_383),
            runtime: Some(136),
            vote_average: Some(8.2),
            vote_count: Some(24000),
            genres: "Action, Science Fiction".to_string(),
            production_companies: "Village Roadshow Pictures".to_string(),
            director: "Lilly Wachowski".to_string(),
            top_cast: "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss".to_string(),
        };
        assert_eq!(
            render_row(&record),
            "603,The Matrix,1999-03-30,63000000,463517383,136,8.2,24000,\
\"Action, Science Fiction\",Village Roadshow Pictures,Lilly Wachowski,\
\"Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss\""
        );
    }
}
