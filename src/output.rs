use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::failure::FailureKind;

/// Entity log names, in the fixed per-item write order.
pub const ENTITY_LOGS: [&str; 7] = [
    "contents",
    "content_bodies",
    "content_category_mappings",
    "content_photos",
    "content_types",
    "articles",
    "spot_informations",
];

/// Append-only output of one crawl run: one `.jsonl` per entity type at the
/// root, one `.jsonl` per failure category under `report/`, and `done.txt`
/// owned by the state manager.
pub struct RunOutput {
    root: PathBuf,
    report_dir: PathBuf,
}

impl RunOutput {
    pub fn create(root: &Path) -> Result<Self> {
        let report_dir = root.join("report");
        fs::create_dir_all(&report_dir)
            .with_context(|| format!("create run directory {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
            report_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn done_path(&self) -> PathBuf {
        self.root.join("done.txt")
    }

    pub fn append_one<T: Serialize>(&self, log: &str, row: &T) -> Result<()> {
        let line = serde_json::to_string(row)?;
        append_lines(&self.root.join(format!("{log}.jsonl")), &[line])
    }

    pub fn append_many<T: Serialize>(&self, log: &str, rows: &[T]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let lines = rows
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        append_lines(&self.root.join(format!("{log}.jsonl")), &lines)
    }

    /// Report entries are appended at the moment of classification so a
    /// mid-run crash keeps everything classified so far.
    pub fn append_report(&self, kind: FailureKind, url: &str) -> Result<()> {
        let line = serde_json::to_string(&serde_json::json!({ "url": url }))?;
        append_lines(&self.report_dir.join(format!("{}.jsonl", kind.as_str())), &[line])
    }

    /// Convert each non-empty entity log to a flat `.csv` next to it.
    pub fn export_csv(&self) -> Result<Vec<PathBuf>> {
        export_run(&self.root)
    }
}

fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {} for append", path.display()))?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;
    Ok(())
}

/// End-of-run tabular export: one CSV per entity log that exists and holds at
/// least one record. Absent or empty logs produce no file.
pub fn export_run(root: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for log in ENTITY_LOGS {
        let jsonl = root.join(format!("{log}.jsonl"));
        if !jsonl.exists() {
            continue;
        }
        let rows = read_jsonl(&jsonl)?;
        if rows.is_empty() {
            continue;
        }
        let csv_path = root.join(format!("{log}.csv"));
        fs::write(&csv_path, to_csv(&rows))?;
        written.push(csv_path);
    }
    Ok(written)
}

/// Per-category report counts for a run directory, in taxonomy order.
pub fn report_counts(root: &Path) -> Result<Vec<(FailureKind, usize)>> {
    let mut counts = Vec::new();
    for kind in FailureKind::ALL {
        let path = root.join("report").join(format!("{}.jsonl", kind.as_str()));
        let n = if path.exists() {
            fs::read_to_string(&path)?
                .lines()
                .filter(|l| !l.trim().is_empty())
                .count()
        } else {
            0
        };
        counts.push((kind, n));
    }
    Ok(counts)
}

fn read_jsonl(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str(line) {
            Ok(v) => rows.push(v),
            Err(e) => warn!("skipping malformed line in {}: {}", path.display(), e),
        }
    }
    Ok(rows)
}

/// Flatten JSON objects to CSV. The header comes from the first record's keys
/// (records within one log are homogeneous).
fn to_csv(rows: &[Value]) -> String {
    let headers: Vec<String> = match rows.first().and_then(|v| v.as_object()) {
        Some(obj) => obj.keys().cloned().collect(),
        None => return String::new(),
    };

    let mut buf = Vec::new();
    let _ = write_row(&mut buf, &headers);
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| value_to_cell(row.get(h)))
            .collect();
        let _ = write_row(&mut buf, &cells);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn value_to_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(mut w: W, row: &[String]) -> std::io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}
