//! Display session — connection to the X server and selection ownership.
//!
//! The poller only needs two things from the display: who owns the
//! clipboard right now, and a way to keep the event queue from growing.
//! Both are expressed through `SelectionSource` so the poller can run
//! against a scripted source in tests.

pub mod x11;

pub use x11::X11Session;

use x11rb::protocol::xproto::Window;

/// Errors returned by the display session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Opening the display failed. Fatal at startup.
    #[error("cannot open display: {0}")]
    Connect(String),

    /// A request on an established connection failed (e.g. the server
    /// went away).
    #[error("X11: {0}")]
    X11(String),
}

/// Samples the owner of the clipboard selection.
pub trait SelectionSource {
    /// Current owner of the `CLIPBOARD` selection, `None` when unowned.
    fn current_owner(&self) -> Result<Option<Window>, SessionError>;

    /// Discard all pending protocol events. Returns how many were read.
    fn drain_events(&self) -> Result<usize, SessionError>;
}
