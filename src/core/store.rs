//! Flat-file record store: one `key - password (strength) ` line per record.
//!
//! Every operation reads the whole file. Mutations hold the store lock for
//! the full read-check-write sequence; deletes rewrite the file through a
//! temp file and rename.

use crate::constants;
use crate::core::file_lock::StoreLock;
use crate::core::paths::StorePaths;
use crate::models::config::KeyMatch;
use crate::models::record::Record;
use crate::util::fs as store_fs;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    DuplicateKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { removed: usize },
    KeyNotFound,
    /// The key was found but no whole record matched; the file is untouched.
    NoRecordMatched,
    StoreMissing,
}

/// Parsed view of the store contents.
#[derive(Debug, Default)]
pub struct Scan {
    pub records: Vec<Record>,
    /// 1-based line numbers of non-blank lines that did not parse.
    pub malformed: Vec<(usize, String)>,
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    lock: PathBuf,
    key_match: KeyMatch,
}

impl RecordStore {
    pub fn new(paths: &StorePaths, key_match: KeyMatch) -> Self {
        Self {
            path: paths.store.clone(),
            lock: paths.lock.clone(),
            key_match,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole file contents, `None` when the store has not been created yet.
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read store {}", self.path.display())),
        }
    }

    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(self
            .read()?
            .is_some_and(|content| contains_key(&content, key, self.key_match)))
    }

    /// Append `record` unless its key is already stored.
    pub fn append(&self, record: &Record) -> Result<AppendOutcome> {
        store_fs::ensure_parent(&self.path)?;
        let _lock = StoreLock::acquire(&self.lock)?;
        if let Some(content) = self.read()? {
            if contains_key(&content, &record.key, self.key_match) {
                return Ok(AppendOutcome::DuplicateKey);
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open store {}", self.path.display()))?;
        file.write_all(record.to_line().as_bytes())
            .with_context(|| format!("append to store {}", self.path.display()))?;
        store_fs::set_permissions(&self.path, constants::STORE_FILE_MODE)?;
        Ok(AppendOutcome::Appended)
    }

    /// Remove the record(s) for `key`, leaving every other line untouched.
    pub fn delete(&self, key: &str) -> Result<DeleteOutcome> {
        if !self.path.exists() {
            return Ok(DeleteOutcome::StoreMissing);
        }
        let _lock = StoreLock::acquire(&self.lock)?;
        let content = match self.read()? {
            Some(content) => content,
            None => return Ok(DeleteOutcome::StoreMissing),
        };
        if !contains_key(&content, key, self.key_match) {
            return Ok(DeleteOutcome::KeyNotFound);
        }

        let (remaining, removed) = remove_key(&content, key, self.key_match)?;
        if removed == 0 {
            return Ok(DeleteOutcome::NoRecordMatched);
        }
        store_fs::write_atomic(&self.path, &remaining, constants::STORE_FILE_MODE)?;
        Ok(DeleteOutcome::Deleted { removed })
    }

    /// All records in file order.
    pub fn list(&self) -> Result<Vec<Record>> {
        let scan = self.scan()?;
        if !scan.malformed.is_empty() {
            eprintln!(
                "warning: {} malformed line(s) in {} skipped",
                scan.malformed.len(),
                self.path.display()
            );
        }
        Ok(scan.records)
    }

    pub fn scan(&self) -> Result<Scan> {
        Ok(self.read()?.map(|c| parse(&c)).unwrap_or_default())
    }
}

fn parse(content: &str) -> Scan {
    let mut scan = Scan::default();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match Record::parse_line(line) {
            Ok(record) => scan.records.push(record),
            Err(reason) => scan.malformed.push((idx + 1, reason)),
        }
    }
    scan
}

fn contains_key(content: &str, key: &str, key_match: KeyMatch) -> bool {
    match key_match {
        KeyMatch::Exact => content.lines().any(|line| Record::key_of(line) == Some(key)),
        KeyMatch::Substring => content.split(' ').any(|fragment| fragment.contains(key)),
    }
}

/// Returns the remaining contents and how many records were removed.
fn remove_key(content: &str, key: &str, key_match: KeyMatch) -> Result<(String, usize)> {
    match key_match {
        KeyMatch::Exact => {
            let mut removed = 0;
            let remaining: String = content
                .split_inclusive('\n')
                .filter(|line| {
                    let hit = Record::key_of(line) == Some(key);
                    if hit {
                        removed += 1;
                    }
                    !hit
                })
                .collect();
            Ok((remaining, removed))
        }
        KeyMatch::Substring => {
            let pattern = Regex::new(&format!(r"{} - .* \(.*\)", regex::escape(key)))
                .context("build delete pattern")?;
            let removed = pattern.find_iter(content).count();
            Ok((pattern.replace_all(content, "").into_owned(), removed))
        }
    }
}
