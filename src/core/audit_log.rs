//! Append-only JSON-lines trail of store mutations. Never records passwords.

use crate::constants;
use crate::core::paths::StorePaths;
use crate::util::fs as store_fs;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub actor: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
}

fn detect_actor() -> String {
    if let Ok(user) = std::env::var("SUDO_USER") {
        if !user.is_empty() {
            return format!("{}(sudo)", user);
        }
    }
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}

/// Record an action with the auto-detected actor.
pub fn log(
    paths: &StorePaths,
    action: &str,
    key: &str,
    outcome: &str,
    strength: Option<&str>,
) -> Result<()> {
    let entry = AuditEntry {
        timestamp: Utc::now(),
        action: action.to_string(),
        actor: detect_actor(),
        key: key.to_string(),
        outcome: Some(outcome.to_string()),
        strength: strength.map(str::to_string),
    };
    let line = serde_json::to_string(&entry).context("serialize audit entry")?;
    append_line(paths, &line)
}

fn append_line(paths: &StorePaths, line: &str) -> Result<()> {
    store_fs::ensure_parent(&paths.audit_log)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.audit_log)
        .with_context(|| format!("open audit log {}", paths.audit_log.display()))?;
    writeln!(file, "{}", line).context("write audit entry")?;
    store_fs::set_permissions(&paths.audit_log, constants::STORE_FILE_MODE)
}

/// Read audit entries, keeping the newest `limit` when given.
pub fn read_log(paths: &StorePaths, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
    if !paths.audit_log.exists() {
        return Ok(Vec::new());
    }

    let file = fs::File::open(&paths.audit_log)
        .with_context(|| format!("open audit log {}", paths.audit_log.display()))?;
    let mut entries = Vec::new();
    let mut malformed = 0usize;

    for line in BufReader::new(file).lines() {
        let line = line.context("read audit log line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<AuditEntry>(trimmed) {
            Ok(entry) => entries.push(entry),
            Err(_) => malformed += 1,
        }
    }

    if malformed > 0 {
        eprintln!("warning: {} malformed audit entries skipped", malformed);
    }

    if let Some(limit) = limit {
        if entries.len() > limit {
            entries = entries.split_off(entries.len() - limit);
        }
    }

    Ok(entries)
}
