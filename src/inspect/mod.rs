//! Window/process inspector — who owns the clipboard.
//!
//! Given an owner window, collects its title, WM_CLASS, owning PID and
//! command line. Every lookup is independent: a missing title does not
//! stop the PID lookup, and a failed PID lookup only leaves the process
//! fields empty. Nothing here returns an error to the poller.

pub mod cmdline;
mod x11;

pub use cmdline::CommandLine;

use x11rb::protocol::xproto::Window;

/// Non-fatal inspection failures.
///
/// These never abort a report; they are recorded on `WindowInfo` and
/// rendered as placeholders. Extension and query failures also get a
/// line on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InspectError {
    /// The server does not advertise the X-Resource extension.
    #[error("XRes extension not available")]
    ExtensionUnavailable,

    /// `XResQueryClientIds` itself failed.
    #[error("cannot get process ID via XRes")]
    ClientQueryFailed,

    /// XRes answered, but no record carried a usable PID.
    #[error("no client-id record with a PID")]
    PidUnresolved,

    /// `/proc/<pid>/cmdline` missing, empty, or unreadable.
    #[error("command line unavailable")]
    CommandLineUnavailable,
}

/// `WM_CLASS` halves. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassHint {
    pub instance: Option<String>,
    pub class: Option<String>,
}

/// Snapshot of one clipboard owner, built per report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub window: Window,
    pub title: Option<String>,
    pub class_hint: ClassHint,
    pub pid: Option<u32>,
    pub command_line: Option<CommandLine>,
    /// Failures encountered while filling the fields above.
    pub issues: Vec<InspectError>,
}

/// Window-level queries the inspector needs from the display.
pub trait WindowProbe {
    /// Window title, `None` if unset or the query failed.
    fn title(&self, window: Window) -> Option<String>;

    /// `WM_CLASS`, `None` if the property is absent.
    fn class_hint(&self, window: Window) -> Option<ClassHint>;

    /// PID of the client that created `window`.
    fn client_pid(&self, window: Window) -> Result<u32, InspectError>;
}

/// Inspect `window` using `probe`, reading command lines from `/proc`.
pub fn inspect<P: WindowProbe + ?Sized>(probe: &P, window: Window) -> WindowInfo {
    inspect_with(probe, window, cmdline::read_cmdline)
}

/// Inspect `window`, resolving command lines through `read_cmdline`.
pub fn inspect_with<P, F>(probe: &P, window: Window, read_cmdline: F) -> WindowInfo
where
    P: WindowProbe + ?Sized,
    F: FnOnce(u32) -> Result<CommandLine, InspectError>,
{
    let mut issues = Vec::new();

    let title = probe.title(window);
    if title.is_none() {
        tracing::debug!(window = format_args!("0x{window:x}"), "window has no title");
    }

    let class_hint = probe.class_hint(window).unwrap_or_else(|| {
        tracing::debug!(
            window = format_args!("0x{window:x}"),
            "window has no WM_CLASS"
        );
        ClassHint::default()
    });

    let pid = match probe.client_pid(window) {
        Ok(pid) => Some(pid),
        Err(InspectError::PidUnresolved) => {
            tracing::debug!(
                window = format_args!("0x{window:x}"),
                "no PID in XRes reply"
            );
            issues.push(InspectError::PidUnresolved);
            None
        }
        Err(e) => {
            tracing::warn!(window = format_args!("0x{window:x}"), error = %e, "PID lookup failed");
            issues.push(e);
            None
        }
    };

    let command_line = pid.and_then(|pid| match read_cmdline(pid) {
        Ok(cmd) => Some(cmd),
        Err(e) => {
            tracing::debug!(pid, error = %e, "command line lookup failed");
            issues.push(e);
            None
        }
    });

    WindowInfo {
        window,
        title,
        class_hint,
        pid,
        command_line,
        issues,
    }
}

/// First record value that is a real PID.
///
/// XRes hands back one record per requested mask; PIDs are only
/// meaningful when positive.
pub(crate) fn first_valid_pid<I>(values: I) -> Option<u32>
where
    I: IntoIterator<Item = i64>,
{
    values
        .into_iter()
        .find(|&v| v > 0 && v <= i64::from(i32::MAX))
        .and_then(|v| u32::try_from(v).ok())
}
