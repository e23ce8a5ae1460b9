use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use log::debug;

use crate::error::{ExtractError, Result};

/// Clipboard programs to try, in order, when none is configured
fn default_commands() -> Vec<Vec<&'static str>> {
    if cfg!(target_os = "macos") {
        vec![vec!["pbcopy"]]
    } else if cfg!(target_os = "windows") {
        vec![vec!["clip"]]
    } else {
        vec![
            vec!["wl-copy"],
            vec!["xclip", "-selection", "clipboard"],
            vec!["xsel", "--clipboard", "--input"],
        ]
    }
}

/// Pipe `text` into a clipboard program. `command` is a whitespace-separated
/// program and arguments; when absent the platform defaults are tried in turn.
pub fn copy(text: &str, command: Option<&str>) -> Result<()> {
    let candidates: Vec<Vec<&str>> = match command {
        Some(cmd) => vec![cmd.split_whitespace().collect()],
        None => default_commands(),
    };

    let mut failures = Vec::new();
    for argv in candidates {
        let Some((program, args)) = argv.split_first() else {
            failures.push("empty clipboard command".to_string());
            continue;
        };
        match pipe_to(program, args, text) {
            Ok(()) => {
                debug!("Copied {} bytes with {program}", text.len());
                return Ok(());
            }
            Err(e) => {
                debug!("Clipboard program {program} failed: {e}");
                failures.push(format!("{program}: {e}"));
            }
        }
    }

    Err(ExtractError::ClipboardWriteFailed {
        reason: failures.join("; "),
    })
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    feed(&mut child, text)?;

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("exited with {status}")))
    }
}

/// Write `text` to the child's stdin, killing and reaping it if the write fails
fn feed(child: &mut Child, text: &str) -> io::Result<()> {
    let Some(mut stdin) = child.stdin.take() else {
        return Ok(());
    };
    if let Err(e) = stdin.write_all(text.as_bytes()) {
        drop(stdin);
        let _ = child.kill();
        let _ = child.wait();
        return Err(e);
    }
    Ok(())
}
