use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Crash-consistent record of completed keys (list URLs and detail URLs share
/// one namespace). The append-only `done.txt` is the sole recovery mechanism:
/// the in-memory set is rebuilt from it once at startup.
///
/// A key is marked only after every durable side effect for it has been
/// written, so a crash between entity writes and the mark reprocesses at most
/// the one in-flight key on the next run.
pub struct DoneLog {
    file: File,
    done: HashSet<String>,
}

impl DoneLog {
    pub fn open(path: &Path) -> Result<Self> {
        let mut done = HashSet::new();
        if path.exists() {
            let reader = BufReader::new(
                File::open(path).with_context(|| format!("open {}", path.display()))?,
            );
            for line in reader.lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    done.insert(line);
                }
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open {} for append", path.display()))?;

        Ok(Self { file, done })
    }

    pub fn is_done(&self, key: &str) -> bool {
        self.done.contains(key)
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    /// Append the completion mark and flush it to disk. Must be the last
    /// action taken for a key.
    pub fn mark_done(&mut self, key: &str) -> Result<()> {
        writeln!(self.file, "{}", key)?;
        self.file.flush()?;
        self.file.sync_data()?;
        self.done.insert(key.to_string());
        Ok(())
    }
}
