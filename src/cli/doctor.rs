//! Diagnostics for the password file and configuration.

use crate::cli::CliContext;
use crate::constants;
use crate::core::file_lock::StoreLock;
use crate::models::record::validate_key;
use anyhow::Result;
use clap::Args;
use std::collections::BTreeMap;
use std::fs;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub ok: u32,
    pub warn: u32,
    pub fail: u32,
}

pub fn run(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let summary = check(ctx)?;

    println!();
    println!(
        "Doctor summary: {} pass, {} warn, {} fail",
        summary.ok, summary.warn, summary.fail
    );
    if summary.fail > 0 || (args.strict && summary.warn > 0) {
        std::process::exit(1);
    }
    Ok(())
}

pub fn check(ctx: &CliContext) -> Result<Summary> {
    let paths = &ctx.paths;
    let mut s = Summary::default();

    println!("Doctor: {}", paths);

    match &ctx.config_load_warning {
        Some(w) => {
            println!("  [WARN] {}", w);
            s.warn += 1;
        }
        None if ctx.config_path.is_file() => {
            println!("  [PASS] config loaded: {}", ctx.config_path.display());
            s.ok += 1;
        }
        None => {
            println!("  [INFO] no config at {} (using defaults)", ctx.config_path.display());
        }
    }
    println!("  [INFO] key matching: {:?}", ctx.config.store.key_match);

    if !paths.store.is_file() {
        println!(
            "  [WARN] password file missing: {} (no passwords generated yet)",
            paths.store.display()
        );
        s.warn += 1;
        return Ok(s);
    }
    println!("  [PASS] password file exists: {}", paths.store.display());
    s.ok += 1;

    if let Ok(meta) = fs::metadata(&paths.store) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = meta.permissions().mode() & 0o777;
            if mode == constants::STORE_FILE_MODE {
                println!("  [PASS] password file mode ok: {:04o}", mode);
                s.ok += 1;
            } else {
                println!(
                    "  [WARN] password file mode: {:04o} (expected {:04o})",
                    mode,
                    constants::STORE_FILE_MODE
                );
                s.warn += 1;
            }
        }
        #[cfg(not(unix))]
        let _ = meta;
    }

    match StoreLock::try_acquire(&paths.lock) {
        Ok(Some(_)) => {
            println!("  [PASS] password file not locked");
            s.ok += 1;
        }
        Ok(None) => {
            println!("  [WARN] password file is locked by another process");
            s.warn += 1;
        }
        Err(e) => {
            println!("  [WARN] cannot check lock {}: {:#}", paths.lock.display(), e);
            s.warn += 1;
        }
    }

    let scan = ctx.store().scan()?;
    for (line, reason) in &scan.malformed {
        println!("  [WARN] line {}: malformed record ({})", line, reason);
        s.warn += 1;
    }

    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &scan.records {
        if let Err(reason) = validate_key(&record.key) {
            println!("  [WARN] key '{}': {}", record.key, reason);
            s.warn += 1;
        }
        *seen.entry(record.key.as_str()).or_default() += 1;
    }
    let duplicates: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    if duplicates.is_empty() {
        println!("  [PASS] {} records, all keys unique", scan.records.len());
        s.ok += 1;
    } else {
        for (key, n) in duplicates {
            println!("  [FAIL] key '{}' stored {} times", key, n);
            s.fail += 1;
        }
    }

    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::StorePaths;
    use crate::models::config::ConfigFile;
    use tempfile::TempDir;

    fn test_ctx() -> (TempDir, CliContext) {
        let dir = TempDir::new().unwrap();
        let ctx = CliContext {
            paths: StorePaths::from_store(dir.path().join("passwords.txt")),
            config_path: dir.path().join("config.toml"),
            config: ConfigFile::default(),
            config_load_warning: None,
            non_interactive: true,
        };
        (dir, ctx)
    }

    #[test]
    fn test_missing_store_warns() {
        let (_dir, ctx) = test_ctx();
        let summary = check(&ctx).unwrap();
        assert_eq!(summary.fail, 0);
        assert_eq!(summary.warn, 1);
    }

    #[test]
    fn test_duplicate_keys_fail() {
        let (_dir, ctx) = test_ctx();
        fs::write(
            &ctx.paths.store,
            "ABCD - ab1 (weak) \nABCD - cd2 (weak) \n",
        )
        .unwrap();
        let summary = check(&ctx).unwrap();
        assert_eq!(summary.fail, 1);
    }

    #[test]
    fn test_malformed_line_warns() {
        let (_dir, ctx) = test_ctx();
        let record = crate::models::record::Record::new(
            "ABCD",
            "ab1",
            crate::models::record::Strength::Weak,
        );
        ctx.store().append(&record).unwrap();
        fs::write(
            &ctx.paths.store,
            format!("{}garbage\n", record.to_line()),
        )
        .unwrap();
        crate::util::fs::set_permissions(&ctx.paths.store, constants::STORE_FILE_MODE).unwrap();
        let summary = check(&ctx).unwrap();
        assert_eq!(summary.fail, 0);
        assert_eq!(summary.warn, 1);
    }
}
