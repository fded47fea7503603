use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Append-only JSON Lines storage. The line index of a record is its id.
pub struct JsonlStorage<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonlStorage<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty file if missing.
    pub fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        if !self.path.exists() {
            File::create(&self.path)
                .with_context(|| format!("Failed to create {:?}", self.path))?;
            info!(path = ?self.path, "Created new JSONL store");
        }

        Ok(())
    }

    /// Append a record and return its id.
    pub fn append(&self, record: &T) -> Result<usize> {
        let line = serde_json::to_string(record)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("JSONL write lock poisoned"))?;

        self.append_line(&line)
    }

    /// Append `record` unless `conflicts` returns true for the stored records.
    ///
    /// The check and the write happen under the write lock. Returns `None`
    /// when the record was rejected.
    pub fn append_unless<F>(&self, record: &T, conflicts: F) -> Result<Option<usize>>
    where
        F: FnOnce(&[T]) -> bool,
    {
        let line = serde_json::to_string(record)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("JSONL write lock poisoned"))?;

        if conflicts(&self.read_all()?) {
            return Ok(None);
        }
        self.append_line(&line).map(Some)
    }

    fn append_line(&self, line: &str) -> Result<usize> {
        let id = self.count_lines()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {:?} for append", self.path))?;
        writeln!(file, "{}", line)?;

        debug!(id, path = ?self.path, "Appended record");
        Ok(id)
    }

    /// Read every record. Lines that fail to parse are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {:?}", self.path))?;
        let mut records = Vec::new();

        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(line_no, error = %e, path = ?self.path, "Skipping malformed record")
                }
            }
        }

        Ok(records)
    }

    /// Overwrite the store with `records`.
    pub fn replace_all(&self, records: &[T]) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("JSONL write lock poisoned"))?;

        let tmp = self.path.with_extension("jsonl.tmp");
        {
            let mut writer = BufWriter::new(
                File::create(&tmp).with_context(|| format!("Failed to create {:?}", tmp))?,
            );
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;

        info!(count = records.len(), path = ?self.path, "Replaced JSONL store");
        Ok(())
    }

    /// Number of non-empty lines.
    pub fn count_lines(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let file = File::open(&self.path)?;
        let mut count = 0;
        for line in BufReader::new(file).lines() {
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
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    fn note(text: &str) -> Note {
        Note {
            text: text.to_string(),
        }
    }

    #[test]
    fn initialize_creates_nested_file() {
        let dir = TempDir::new().unwrap();
        let store: JsonlStorage<Note> = JsonlStorage::new(dir.path().join("a/b/notes.jsonl"));

        store.initialize().unwrap();

        assert!(store.path().exists());
        assert_eq!(store.count_lines().unwrap(), 0);
    }

    #[test]
    fn append_returns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let store: JsonlStorage<Note> = JsonlStorage::new(dir.path().join("notes.jsonl"));
        store.initialize().unwrap();

        assert_eq!(store.append(&note("first")).unwrap(), 0);
        assert_eq!(store.append(&note("second")).unwrap(), 1);
        assert_eq!(store.read_all().unwrap(), vec![note("first"), note("second")]);
    }

    #[test]
    fn replace_all_overwrites() {
        let dir = TempDir::new().unwrap();
        let store: JsonlStorage<Note> = JsonlStorage::new(dir.path().join("notes.jsonl"));
        store.initialize().unwrap();
        store.append(&note("old")).unwrap();

        store.replace_all(&[note("x"), note("y")]).unwrap();

        assert_eq!(store.count_lines().unwrap(), 2);
        assert_eq!(store.read_all().unwrap()[0], note("x"));
    }

    #[test]
    fn append_unless_skips_conflicting_record() {
        let dir = TempDir::new().unwrap();
        let store: JsonlStorage<Note> = JsonlStorage::new(dir.path().join("notes.jsonl"));
        store.initialize().unwrap();
        store.append(&note("a")).unwrap();

        let taken = |notes: &[Note]| notes.iter().any(|n| n.text == "a");
        assert_eq!(store.append_unless(&note("a"), taken).unwrap(), None);
        assert_eq!(
            store
                .append_unless(&note("b"), |notes| notes.iter().any(|n| n.text == "b"))
                .unwrap(),
            Some(1)
        );
        assert_eq!(store.read_all().unwrap(), vec![note("a"), note("b")]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.jsonl");
        fs::write(&path, "{\"text\":\"ok\"}\nnot json\n\n").unwrap();
        let store: JsonlStorage<Note> = JsonlStorage::new(&path);

        assert_eq!(store.read_all().unwrap(), vec![note("ok")]);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store: JsonlStorage<Note> = JsonlStorage::new(dir.path().join("none.jsonl"));
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.count_lines().unwrap(), 0);
    }
}
