//! JSONL (JSON Lines) files.
//!
//! One JSON document per line. Readers skip lines that fail to parse so a
//! single bad record never hides the rest of the file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::StorageError;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single record.
    pub fn append(&self, record: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serde_json::to_string(record)?)?;
        writer.flush()?;

        debug!("Appended record to {:?}", self.path);
        Ok(())
    }

    /// Append several records in one write. Returns how many were written.
    pub fn append_batch(&self, records: &[T]) -> Result<usize, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }

        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(writer, "{}", serde_json::to_string(record)?)?;
        }
        writer.flush()?;

        info!("Appended {} records to {:?}", records.len(), self.path);
        Ok(records.len())
    }

    /// Replace the file contents with `records`.
    ///
    /// Writes to a sibling temp file and renames it over the target, so
    /// readers see either the old or the new contents.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            for record in records {
                writeln!(writer, "{}", serde_json::to_string(record)?)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        debug!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(records.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every parseable record. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Count non-blank lines.
    pub fn count(&self) -> Result<usize, StorageError> {
        if !self.path.exists() {
            return Ok(0);
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut count = 0;
        for line in reader.lines() {
            if !line?.trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use tempfile::TempDir;

    fn roster() -> Vec<Team> {
        vec![
            Team::new("Rovers").with_crest("crests/rovers.png"),
            Team::new("United"),
        ]
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("teams.jsonl");

        let writer: JsonlWriter<Team> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&roster()).unwrap(), 2);

        let reader: JsonlReader<Team> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), roster());
    }

    #[test]
    fn test_jsonl_write_all_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("teams.jsonl");

        let writer: JsonlWriter<Team> = JsonlWriter::new(path.clone());
        writer.write_all(&roster()).unwrap();
        writer.write_all(&[Team::new("City")]).unwrap();

        let reader: JsonlReader<Team> = JsonlReader::new(path.clone());
        assert_eq!(reader.read_all().unwrap(), vec![Team::new("City")]);
        assert!(!path.with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn test_jsonl_append() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("append.jsonl");

        let writer: JsonlWriter<Team> = JsonlWriter::new(path.clone());
        for team in roster() {
            writer.append(&team).unwrap();
        }

        let reader: JsonlReader<Team> = JsonlReader::new(path);
        assert_eq!(reader.count().unwrap(), 2);
        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_jsonl_append_batch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("batch.jsonl");

        let writer: JsonlWriter<Team> = JsonlWriter::new(path.clone());
        assert_eq!(writer.append_batch(&[]).unwrap(), 0);
        assert!(!path.exists());

        writer.append(&Team::new("City")).unwrap();
        assert_eq!(writer.append_batch(&roster()).unwrap(), 2);

        let reader: JsonlReader<Team> = JsonlReader::new(path);
        let mut expected = vec![Team::new("City")];
        expected.extend(roster());
        assert_eq!(reader.read_all().unwrap(), expected);
    }

    #[test]
    fn test_jsonl_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<Team> = JsonlReader::new(temp_dir.path().join("none.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
        assert_eq!(reader.count().unwrap(), 0);
    }

    #[test]
    fn test_jsonl_skips_malformed_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.jsonl");
        std::fs::write(&path, "{\"name\":\"Rovers\"}\nnot json\n\n{\"name\":\"United\"}\n").unwrap();

        let reader: JsonlReader<Team> = JsonlReader::new(path);
        let teams = reader.read_all().unwrap();
        assert_eq!(teams, vec![Team::new("Rovers"), Team::new("United")]);
    }
}
