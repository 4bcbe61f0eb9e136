//! X11 session — `RustConnection` plus the atoms the monitor needs.
//!
//! Selects `PropertyChange` on the root window; the resulting events are
//! drained every tick and otherwise ignored.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{self, Atom, ChangeWindowAttributesAux, EventMask, Window};
use x11rb::rust_connection::RustConnection;

use super::{SelectionSource, SessionError};

/// Pre-interned X11 atoms.
pub struct Atoms {
    pub clipboard: Atom,
    pub net_wm_name: Atom,
    pub utf8_string: Atom,
}

/// An open connection to the X display.
///
/// The connection is closed when the session is dropped, which covers
/// normal shutdown as well as early returns from `main`.
pub struct X11Session {
    conn: RustConnection,
    screen_num: usize,
    root: Window,
    atoms: Atoms,
}

impl X11Session {
    /// Connect to the display named by `$DISPLAY` and intern atoms.
    pub fn open() -> Result<Self, SessionError> {
        let (conn, screen_num) =
            RustConnection::connect(None).map_err(|e| SessionError::Connect(e.to_string()))?;

        let root = conn.setup().roots[screen_num].root;

        let clipboard = intern(&conn, b"CLIPBOARD")?;
        let net_wm_name = intern(&conn, b"_NET_WM_NAME")?;
        let utf8_string = intern(&conn, b"UTF8_STRING")?;

        xproto::change_window_attributes(
            &conn,
            root,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE),
        )
        .map_err(|e| SessionError::Connect(format!("select root input: {e}")))?
        .check()
        .map_err(|e| SessionError::Connect(format!("select root input reply: {e}")))?;

        tracing::debug!(
            screen = screen_num,
            root = format_args!("0x{root:x}"),
            clipboard,
            "display session opened"
        );

        Ok(Self {
            conn,
            screen_num,
            root,
            atoms: Atoms {
                clipboard,
                net_wm_name,
                utf8_string,
            },
        })
    }

    /// Shared reference to the underlying connection.
    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    pub fn atoms(&self) -> &Atoms {
        &self.atoms
    }

    pub fn screen_num(&self) -> usize {
        self.screen_num
    }
}

impl SelectionSource for X11Session {
    fn current_owner(&self) -> Result<Option<Window>, SessionError> {
        let owner = xproto::get_selection_owner(&self.conn, self.atoms.clipboard)
            .map_err(|e| SessionError::X11(format!("get_selection_owner: {e}")))?
            .reply()
            .map_err(|e| SessionError::X11(format!("get_selection_owner reply: {e}")))?
            .owner;

        Ok(if owner == x11rb::NONE { None } else { Some(owner) })
    }

    fn drain_events(&self) -> Result<usize, SessionError> {
        let mut drained = 0;
        while let Some(event) = self
            .conn
            .poll_for_event()
            .map_err(|e| SessionError::X11(format!("poll_for_event: {e}")))?
        {
            tracing::trace!(?event, "discarding X11 event");
            drained += 1;
        }
        Ok(drained)
    }
}

impl Drop for X11Session {
    fn drop(&mut self) {
        tracing::debug!(
            root = format_args!("0x{:x}", self.root),
            "closing display session"
        );
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom, SessionError> {
    Ok(xproto::intern_atom(conn, false, name)
        .map_err(|e| SessionError::Connect(format!("intern_atom: {e}")))?
        .reply()
        .map_err(|e| SessionError::Connect(format!("intern_atom reply: {e}")))?
        .atom)
}
