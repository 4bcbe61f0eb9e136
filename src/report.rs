//! Human-readable output.
//!
//! Reports go to `out` (stdout in production), inspection problems to
//! `err` (stderr). Writers are passed in so the formatting can be checked
//! against byte buffers.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use x11rb::protocol::xproto::Window;

use crate::inspect::{InspectError, WindowInfo};
use crate::locale::Messages;

/// Separator drawn above and below every owner report.
const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Timestamp layout for change notifications.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders monitor output in one language.
pub struct Reporter {
    messages: &'static Messages,
}

impl Reporter {
    pub fn new(messages: &'static Messages) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    /// Title and one-line description, printed before connecting.
    pub fn banner<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.messages.title)?;
        writeln!(out, "{}", self.messages.description)?;
        writeln!(out)
    }

    /// Startup lines, including the owner found at startup (`0x0` if none).
    pub fn started<W: Write>(&self, out: &mut W, owner: Option<Window>) -> io::Result<()> {
        writeln!(out, "{}", self.messages.monitor_started)?;
        writeln!(
            out,
            "{}: 0x{:x}",
            self.messages.current_owner,
            owner.unwrap_or(x11rb::NONE)
        )?;
        writeln!(out)
    }

    pub fn monitoring<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.messages.monitoring)?;
        writeln!(out)
    }

    pub fn changed<W: Write>(&self, out: &mut W, at: &DateTime<Local>) -> io::Result<()> {
        writeln!(
            out,
            "{}: {}",
            self.messages.change_detected,
            at.format(TIME_FORMAT)
        )
    }

    pub fn cleared<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.messages.cleared)?;
        writeln!(out)
    }

    /// The owner block. Title and command line lines appear only when
    /// there is something to say; class lines always appear.
    pub fn window_info<W: Write>(&self, out: &mut W, info: &WindowInfo) -> io::Result<()> {
        let m = self.messages;

        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "{}", m.owner_info)?;
        writeln!(out, "{}: 0x{:x}", m.window_id, info.window)?;

        if let Some(title) = &info.title {
            writeln!(out, "{}: {title}", m.window_name)?;
        }

        let class = info.class_hint.class.as_deref().unwrap_or(m.unknown);
        let instance = info.class_hint.instance.as_deref().unwrap_or(m.unknown);
        writeln!(out, "{}: {class}", m.app_class)?;
        writeln!(out, "{}: {instance}", m.app_name)?;

        match info.pid {
            Some(pid) => {
                writeln!(out, "{}: {pid}", m.process_id)?;
                match &info.command_line {
                    Some(cmd) if cmd.truncated => {
                        writeln!(out, "{}: {} {}", m.command_line, cmd.text, m.truncated)?
                    }
                    Some(cmd) => writeln!(out, "{}: {}", m.command_line, cmd.text)?,
                    None => writeln!(out, "{}: {}", m.command_line, m.cannot_retrieve)?,
                }
            }
            None => writeln!(out, "{}: {}", m.process_id, m.cannot_retrieve)?,
        }

        writeln!(out, "{SEPARATOR}")?;
        writeln!(out)
    }

    /// Stderr lines for XRes failures. A reply without a PID and an
    /// unreadable command line only show up as placeholders.
    pub fn issues<W: Write>(&self, err: &mut W, info: &WindowInfo) -> io::Result<()> {
        for issue in &info.issues {
            match issue {
                InspectError::ExtensionUnavailable => {
                    writeln!(err, "{}", self.messages.xres_unavailable)?
                }
                InspectError::ClientQueryFailed => {
                    writeln!(err, "{}", self.messages.pid_unresolved)?
                }
                InspectError::PidUnresolved | InspectError::CommandLineUnavailable => {}
            }
        }
        Ok(())
    }
}
