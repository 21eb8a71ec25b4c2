//! Embedding store loaded from newline-delimited JSON.
//!
//! Each line is `{"header": "...", "embedding": [..]}`. The store keeps
//! entries in file order; that order is the scan order the bridge search
//! relies on for tie-breaking.
//!
//! ## Skipped lines
//!
//! A line that fails to parse, or that lacks either field, is skipped with a
//! warning and counted in [`EmbeddingStore::skipped_lines`]. Blank lines are
//! ignored silently. A repeated header replaces the earlier vector but keeps
//! the earlier position.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::InputError;

/// One JSONL record. Both fields are required.
#[derive(Debug, Deserialize)]
struct EmbeddingRecord {
    header: String,
    embedding: Vec<f64>,
}

/// Header → vector mapping with stable iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingStore {
    entries: Vec<(String, Vec<f64>)>,
    index: HashMap<String, usize>,
    skipped_lines: usize,
}

impl EmbeddingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSONL file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Unreadable`] if the file cannot be opened or a
    /// read fails part way through. Malformed lines are not errors.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_jsonl_path(path: &Path) -> Result<Self, InputError> {
        let unreadable = |source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        Self::from_jsonl_reader(BufReader::new(file)).map_err(unreadable)
    }

    /// Load a store from any buffered reader of JSONL.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if reading a line fails.
    pub fn from_jsonl_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut store = Self::new();
        let mut buf = Vec::new();
        let mut line_no = 0_usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            let trimmed = buf.trim_ascii();
            if trimmed.is_empty() {
                continue;
            }

            // Invalid UTF-8 surfaces here as a parse error, not an I/O error.
            match serde_json::from_slice::<EmbeddingRecord>(trimmed) {
                Ok(record) => {
                    if store.insert(record.header.clone(), record.embedding) {
                        warn!(
                            line = line_no,
                            header = %record.header,
                            "duplicate header in embeddings; later vector wins"
                        );
                    }
                }
                Err(err) => {
                    warn!(line = line_no, "skipping malformed embedding line: {err}");
                    store.skipped_lines += 1;
                }
            }
        }

        debug!(
            entries = store.len(),
            skipped = store.skipped_lines,
            "embedding store loaded"
        );
        Ok(store)
    }

    /// Insert or replace a vector. Returns `true` if the header already existed.
    pub fn insert(&mut self, header: String, embedding: Vec<f64>) -> bool {
        if let Some(&pos) = self.index.get(&header) {
            self.entries[pos].1 = embedding;
            return true;
        }
        self.index.insert(header.clone(), self.entries.len());
        self.entries.push((header, embedding));
        false
    }

    /// Look up the vector for a header.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&[f64]> {
        self.index
            .get(header)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    #[must_use]
    pub fn contains(&self, header: &str) -> bool {
        self.index.contains_key(header)
    }

    /// Iterate `(header, vector)` pairs in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries
            .iter()
            .map(|(header, vec)| (header.as_str(), vec.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-blank lines that were rejected during loading.
    #[must_use]
    pub const fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<f64>)> for EmbeddingStore {
    fn from_iter<I: IntoIterator<Item = (S, Vec<f64>)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (header, embedding) in iter {
            store.insert(header.into(), embedding);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn load(text: &str) -> EmbeddingStore {
        EmbeddingStore::from_jsonl_reader(Cursor::new(text)).expect("load")
    }

    #[test]
    fn invalid_utf8_line_is_skipped_not_fatal() {
        let mut bytes = b"{\"header\":\"A\",\"embedding\":[1.0,0.0]}\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe garbage\n");
        bytes.extend_from_slice(b"{\"header\":\"B\",\"embedding\":[0.0,1.0]}\n");

        let store = EmbeddingStore::from_jsonl_reader(Cursor::new(bytes)).expect("load");
        assert_eq!(store.len(), 2);
        assert_eq!(store.skipped_lines(), 1);
        assert_eq!(store.get("B"), Some([0.0, 1.0].as_slice()));
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let store = load("{\"header\":\"A\",\"embedding\":[1.0]}\n\n{\"header\":\"B\",\"embedding\":[2.0]}");
        assert_eq!(store.len(), 2);
        assert_eq!(store.skipped_lines(), 0);
    }

    #[test]
    fn loads_lines_in_file_order() {
        let store = load(
            "{\"header\":\"B\",\"embedding\":[0.0,1.0]}\n\
             {\"header\":\"A\",\"embedding\":[1.0,0.0]}\n",
        );
        let headers: Vec<&str> = store.iter().map(|(h, _)| h).collect();
        assert_eq!(headers, vec!["B", "A"]);
        assert_eq!(store.get("A"), Some(&[1.0, 0.0][..]));
        assert_eq!(store.skipped_lines(), 0);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let store = load(
            "{\"header\":\"A\",\"embedding\":[1.0]}\n\
             not json at all\n\
             {\"header\":\"B\"}\n\
             {\"header\":\"C\",\"embedding\":[\"x\"]}\n\
             {\"header\":\"D\",\"embedding\":[2.0]}\n",
        );
        assert_eq!(store.len(), 2);
        assert!(store.contains("A"));
        assert!(store.contains("D"));
        assert_eq!(store.skipped_lines(), 3);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let store = load("\n   \n{\"header\":\"A\",\"embedding\":[]}\n\n");
        assert_eq!(store.len(), 1);
        assert_eq!(store.skipped_lines(), 0);
        assert_eq!(store.get("A"), Some(&[][..]));
    }

    #[test]
    fn duplicate_header_replaces_in_place() {
        let store = load(
            "{\"header\":\"A\",\"embedding\":[1.0]}\n\
             {\"header\":\"B\",\"embedding\":[2.0]}\n\
             {\"header\":\"A\",\"embedding\":[3.0]}\n",
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("A"), Some(&[3.0][..]));
        let headers: Vec<&str> = store.iter().map(|(h, _)| h).collect();
        assert_eq!(headers, vec!["A", "B"]);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = EmbeddingStore::from_jsonl_path(&dir.path().join("missing.jsonl")).unwrap_err();
        assert!(matches!(err, InputError::Unreadable { .. }));
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "{{\"header\":\"Intro\",\"embedding\":[0.5,0.5]}}").expect("write");
        let store = EmbeddingStore::from_jsonl_path(file.path()).expect("load");
        assert_eq!(store.get("Intro"), Some(&[0.5, 0.5][..]));
    }

    #[test]
    fn collects_from_pairs() {
        let store: EmbeddingStore = [("A", vec![0.0]), ("B", vec![1.0])].into_iter().collect();
        assert_eq!(store.len(), 2);
        assert!(store.get("C").is_none());
    }
}
