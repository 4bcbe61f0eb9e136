//! X11 window probe — `_NET_WM_NAME`/`WM_NAME`, `WM_CLASS`, and XRes.
//!
//! PID resolution uses `XResQueryClientIds` rather than `_NET_WM_PID`:
//! the selection owner is frequently an unmapped helper window that no
//! window manager ever sees, but the server always knows which client
//! created it.

use x11rb::connection::RequestConnection;
use x11rb::properties::WmClass;
use x11rb::protocol::res::{self, ClientIdMask, ClientIdSpec};
use x11rb::protocol::xproto::{self, AtomEnum, Window};

use super::{ClassHint, InspectError, WindowProbe, first_valid_pid};
use crate::session::X11Session;

/// Longest title we ask the server for, in 32-bit units.
const TITLE_LONG_LENGTH: u32 = 1024;

impl X11Session {
    /// Read a text property, returning `None` for unset or empty values.
    fn text_property(&self, window: Window, property: u32, type_: u32) -> Option<String> {
        let reply = match xproto::get_property(
            self.conn(),
            false,
            window,
            property,
            type_,
            0,
            TITLE_LONG_LENGTH,
        ) {
            Ok(cookie) => match cookie.reply() {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(
                        window = format_args!("0x{window:x}"),
                        property,
                        error = %e,
                        "get_property reply failed"
                    );
                    return None;
                }
            },
            Err(e) => {
                tracing::debug!(
                    window = format_args!("0x{window:x}"),
                    property,
                    error = %e,
                    "get_property failed"
                );
                return None;
            }
        };

        if reply.format != 8 || reply.value.is_empty() {
            return None;
        }

        Some(String::from_utf8_lossy(&reply.value).into_owned())
    }
}

impl WindowProbe for X11Session {
    fn title(&self, window: Window) -> Option<String> {
        let atoms = self.atoms();
        self.text_property(window, atoms.net_wm_name, atoms.utf8_string)
            .or_else(|| self.text_property(window, AtomEnum::WM_NAME.into(), AtomEnum::ANY.into()))
    }

    fn class_hint(&self, window: Window) -> Option<ClassHint> {
        let wm_class = match WmClass::get(self.conn(), window) {
            Ok(cookie) => match cookie.reply() {
                Ok(Some(wm_class)) => wm_class,
                Ok(None) => return None,
                Err(e) => {
                    tracing::debug!(
                        window = format_args!("0x{window:x}"),
                        error = %e,
                        "WM_CLASS reply failed"
                    );
                    return None;
                }
            },
            Err(e) => {
                tracing::debug!(
                    window = format_args!("0x{window:x}"),
                    error = %e,
                    "WM_CLASS request failed"
                );
                return None;
            }
        };

        Some(ClassHint {
            instance: non_empty(wm_class.instance()),
            class: non_empty(wm_class.class()),
        })
    }

    fn client_pid(&self, window: Window) -> Result<u32, InspectError> {
        let conn = self.conn();

        match conn.extension_information(res::X11_EXTENSION_NAME) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(InspectError::ExtensionUnavailable),
            Err(e) => {
                tracing::warn!(error = %e, "XRes extension query failed");
                return Err(InspectError::ExtensionUnavailable);
            }
        }

        // The server maps any resource id to the client that owns it, so
        // the window id itself identifies the owning client.
        let spec = ClientIdSpec {
            client: window,
            mask: ClientIdMask::LOCAL_CLIENT_PID.into(),
        };

        let reply = res::query_client_ids(conn, &[spec])
            .map_err(|e| {
                tracing::warn!(
                    window = format_args!("0x{window:x}"),
                    error = %e,
                    "XResQueryClientIds failed"
                );
                InspectError::ClientQueryFailed
            })?
            .reply()
            .map_err(|e| {
                tracing::warn!(
                    window = format_args!("0x{window:x}"),
                    error = %e,
                    "XResQueryClientIds reply failed"
                );
                InspectError::ClientQueryFailed
            })?;

        let pid_mask = u32::from(ClientIdMask::LOCAL_CLIENT_PID);
        let pid = first_valid_pid(
            reply
                .ids
                .iter()
                .filter(|id| u32::from(id.spec.mask) & pid_mask != 0)
                .filter_map(|id| id.value.first())
                .map(|&v| i64::from(v as i32)),
        );

        tracing::debug!(
            window = format_args!("0x{window:x}"),
            records = reply.ids.len(),
            ?pid,
            "XRes client ids"
        );

        pid.ok_or(InspectError::PidUnresolved)
    }
}

fn non_empty(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}
