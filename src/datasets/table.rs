use std::path::Path;

use tracing::warn;

use super::{Extracted, Unavailable};

/// In-memory table parsed from one delimited file: a header row plus data
/// rows. Rows are positional; columns are located through the header via
/// [`super::resolve_column`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse delimited text into a table.
    ///
    /// Lines split on CR/LF with blank lines dropped; fields split on comma
    /// and trimmed. There is no quote or escape handling, so an embedded
    /// comma corrupts its row -- an accepted limitation of the pipeline's
    /// output format. Returns `Unavailable` when there are fewer than two
    /// non-blank lines (header + at least one data row).
    ///
    /// Invariant: every retained row has at least as many cells as the
    /// header. Shorter rows are dropped, never padded.
    pub fn parse(text: &str) -> Extracted<Table> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let headers: Vec<String> = match lines.next() {
            Some(line) => split_fields(line),
            None => return Err(Unavailable),
        };
        let rows: Vec<Vec<String>> = lines
            .map(split_fields)
            .filter(|row| row.len() >= headers.len())
            .collect();
        if rows.is_empty() {
            return Err(Unavailable);
        }
        Ok(Table { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Last `n` rows (all rows when the table is shorter).
    pub fn tail(&self, n: usize) -> &[Vec<String>] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    /// First `n` rows (all rows when the table is shorter).
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(n)]
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(|s| s.trim().to_string()).collect()
}

/// Read and parse one CSV file from the pipeline output directory.
///
/// The file name must be a bare name: anything containing a path separator
/// or a `..` component is rejected so a name can never escape the base
/// directory. A missing file is `Unavailable`; so is a file that exists but
/// cannot be read, after a warning.
pub async fn read_table(base_dir: &Path, file_name: &str) -> Extracted<Table> {
    if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
        warn!("Rejected unsafe dataset file name: {}", file_name);
        return Err(Unavailable);
    }
    let path = base_dir.join(file_name);
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Table::parse(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Unavailable),
        Err(e) => {
            warn!("Failed to read dataset {}: {}", path.display(), e);
            Err(Unavailable)
        }
    }
}
