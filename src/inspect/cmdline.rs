//! Process command line from `/proc/<pid>/cmdline`.
//!
//! The kernel exposes argv as NUL-separated bytes, usually with a
//! trailing NUL. Reads are bounded and best-effort: the process may have
//! exited since its PID was resolved.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::InspectError;

/// Maximum number of bytes read from the cmdline file.
pub const MAX_CMDLINE_BYTES: usize = 4096;

/// A display-ready command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub text: String,
    /// More than `MAX_CMDLINE_BYTES` were available; `text` holds a prefix.
    pub truncated: bool,
}

/// Path of the cmdline pseudo-file for `pid`.
pub fn proc_path(pid: u32) -> PathBuf {
    PathBuf::from(format!("/proc/{pid}/cmdline"))
}

/// Read the command line of `pid`.
pub fn read_cmdline(pid: u32) -> Result<CommandLine, InspectError> {
    read_cmdline_from(&proc_path(pid), MAX_CMDLINE_BYTES)
}

/// Read and sanitize a NUL-separated argument file, keeping at most
/// `limit` bytes.
pub fn read_cmdline_from(path: &Path, limit: usize) -> Result<CommandLine, InspectError> {
    let file = File::open(path).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "cmdline open failed");
        InspectError::CommandLineUnavailable
    })?;

    // Two extra bytes: room for argv's final NUL plus one more byte that
    // proves something was cut off.
    let mut buf = Vec::with_capacity(limit + 2);
    file.take(limit as u64 + 2)
        .read_to_end(&mut buf)
        .map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "cmdline read failed");
            InspectError::CommandLineUnavailable
        })?;

    // A full buffer followed only by argv's final NUL lost nothing.
    let truncated = match buf.len() {
        n if n <= limit => false,
        n if n == limit + 1 => buf[limit] != 0,
        _ => true,
    };
    buf.truncate(limit);

    let text = sanitize(&buf);
    if text.is_empty() {
        // Kernel threads and zombies expose an empty cmdline.
        return Err(InspectError::CommandLineUnavailable);
    }

    Ok(CommandLine { text, truncated })
}

/// Join NUL-separated arguments with single spaces.
pub fn sanitize(raw: &[u8]) -> String {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let joined: Vec<u8> = raw[..end]
        .iter()
        .map(|&b| if b == 0 { b' ' } else { b })
        .collect();
    String::from_utf8_lossy(&joined).into_owned()
}
