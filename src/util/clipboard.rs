//! Clipboard copy through the platform's command-line tools.

use anyhow::{bail, Context, Result};
use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

/// Program and arguments that read clipboard contents from stdin.
#[derive(Debug, PartialEq, Eq)]
pub struct ClipCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

/// X selection from `PASSGEN_X_SELECTION`; anything unrecognised means `clipboard`.
fn x_selection(value: Option<&str>) -> &'static str {
    match value {
        Some("p") | Some("primary") => "primary",
        Some("sec") | Some("secondary") => "secondary",
        _ => "clipboard",
    }
}

/// Pick the copy tool: wl-copy under Wayland, xclip under X, pbcopy on macOS.
pub fn clip_command(wayland: bool, x11: bool, selection: Option<&str>) -> Option<ClipCommand> {
    if wayland {
        return Some(ClipCommand {
            program: "wl-copy",
            args: vec!["--trim-newline".into()],
        });
    }
    if x11 {
        return Some(ClipCommand {
            program: "xclip",
            args: vec![
                "-in".into(),
                "-selection".into(),
                x_selection(selection).into(),
            ],
        });
    }
    if cfg!(target_os = "macos") {
        return Some(ClipCommand {
            program: "pbcopy",
            args: Vec::new(),
        });
    }
    None
}

pub fn clip(contents: &[u8]) -> Result<()> {
    let selection = env::var("PASSGEN_X_SELECTION").ok();
    let cmd = clip_command(
        env::var_os("WAYLAND_DISPLAY").is_some(),
        env::var_os("DISPLAY").is_some(),
        selection.as_deref(),
    );
    let Some(cmd) = cmd else {
        bail!("no clipboard available (neither WAYLAND_DISPLAY nor DISPLAY is set)");
    };

    let mut child = Command::new(cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn {}", cmd.program))?;
    {
        let mut stdin = child.stdin.take().context("stdin wasn't captured")?;
        stdin
            .write_all(contents)
            .with_context(|| format!("write to {}", cmd.program))?;
    }
    let status = child
        .wait()
        .with_context(|| format!("wait for {}", cmd.program))?;
    if !status.success() {
        bail!("{} exited with {}", cmd.program, status);
    }
    Ok(())
}
