//! Ownership poller — samples the clipboard owner and reports changes.
//!
//! Each tick:
//! 1. Sample the selection owner.
//! 2. Drain pending X events so the queue never grows.
//! 3. Feed the sample to the tracker; on a change, inspect the new
//!    owner and write the report.
//!
//! `run()` drives ticks from a fixed interval until SIGINT or SIGTERM.
//! The display session is owned by the monitor and released when it is
//! dropped.

pub mod tracker;

use std::io::{self, Write};
use std::time::Duration;

use tokio::signal::unix::{SignalKind, signal as tokio_signal};
use tokio::time::MissedTickBehavior;
use x11rb::protocol::xproto::Window;

use crate::inspect::{self, WindowProbe};
use crate::report::Reporter;
use crate::session::{SelectionSource, SessionError};
use tracker::{OwnerEvent, OwnershipTracker};

/// Time between owner samples.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Poller state: the display, the last seen owner, and the output format.
pub struct Monitor<D> {
    display: D,
    tracker: OwnershipTracker,
    reporter: Reporter,
}

impl<D> Monitor<D>
where
    D: SelectionSource + WindowProbe,
{
    pub fn new(display: D, reporter: Reporter) -> Self {
        Self {
            display,
            tracker: OwnershipTracker::new(),
            reporter,
        }
    }

    pub fn tracker(&self) -> &OwnershipTracker {
        &self.tracker
    }

    /// Take one sample and report whatever changed.
    ///
    /// The first call reports the startup owner.
    pub fn tick<W, E>(
        &mut self,
        out: &mut W,
        err: &mut E,
    ) -> Result<Option<OwnerEvent>, MonitorError>
    where
        W: Write,
        E: Write,
    {
        let owner = self.display.current_owner()?;

        let drained = self.display.drain_events()?;
        if drained > 0 {
            tracing::trace!(drained, "drained X11 events");
        }

        let Some(event) = self.tracker.observe(owner) else {
            return Ok(None);
        };

        self.handle(&event, out, err)?;
        out.flush()?;
        Ok(Some(event))
    }

    fn handle<W, E>(&self, event: &OwnerEvent, out: &mut W, err: &mut E) -> io::Result<()>
    where
        W: Write,
        E: Write,
    {
        match event {
            OwnerEvent::Startup(owner) => {
                tracing::info!(owner = ?owner, "monitor started");
                self.reporter.started(out, *owner)?;
                if let Some(window) = owner {
                    self.report_owner(*window, out, err)?;
                }
                self.reporter.monitoring(out)
            }
            OwnerEvent::Changed { owner, at } => {
                tracing::info!(
                    owner = format_args!("0x{owner:x}"),
                    "clipboard owner changed"
                );
                self.reporter.changed(out, at)?;
                self.report_owner(*owner, out, err)
            }
            OwnerEvent::Cleared => {
                tracing::info!("clipboard cleared");
                self.reporter.cleared(out)
            }
        }
    }

    fn report_owner<W, E>(&self, window: Window, out: &mut W, err: &mut E) -> io::Result<()>
    where
        W: Write,
        E: Write,
    {
        let info = inspect::inspect(&self.display, window);
        self.reporter.issues(err, &info)?;
        self.reporter.window_info(out, &info)
    }
}

/// Poll until SIGINT or SIGTERM.
///
/// Returns `Ok(())` on a signal, `Err` if the display connection fails
/// or stdout can no longer be written.
pub async fn run<D>(mut monitor: Monitor<D>, interval: Duration) -> Result<(), MonitorError>
where
    D: SelectionSource + WindowProbe,
{
    let mut sig_term = tokio_signal(SignalKind::terminate())?;
    let mut sig_int = tokio_signal(SignalKind::interrupt())?;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut out = io::stdout().lock();
                let mut err = io::stderr().lock();
                if let Err(e) = monitor.tick(&mut out, &mut err) {
                    tracing::error!(error = %e, "poll failed, stopping monitor");
                    return Err(e);
                }
            }

            _ = sig_term.recv() => {
                tracing::info!("received SIGTERM, shutting down");
                break;
            }

            _ = sig_int.recv() => {
                tracing::info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    tracing::info!(last = ?monitor.tracker().state(), "monitor stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use crate::inspect::tests::FakeProbe;
    use crate::inspect::{ClassHint, InspectError};
    use crate::locale::ENGLISH;

    /// Replays a fixed sequence of owners, repeating the last one.
    struct ScriptedDisplay {
        samples: RefCell<VecDeque<Option<Window>>>,
        last: Cell<Option<Window>>,
        pending_events: Cell<usize>,
        drained: Cell<usize>,
        fail_after: Option<usize>,
        sampled: Cell<usize>,
        probe: FakeProbe,
    }

    impl ScriptedDisplay {
        fn new(samples: &[Option<Window>], probe: FakeProbe) -> Self {
            Self {
                samples: RefCell::new(samples.iter().copied().collect()),
                last: Cell::new(None),
                pending_events: Cell::new(0),
                drained: Cell::new(0),
                fail_after: None,
                sampled: Cell::new(0),
                probe,
            }
        }
    }

    impl SelectionSource for ScriptedDisplay {
        fn current_owner(&self) -> Result<Option<Window>, SessionError> {
            let n = self.sampled.get();
            if self.fail_after.is_some_and(|limit| n >= limit) {
                return Err(SessionError::X11("connection reset".into()));
            }
            self.sampled.set(n + 1);
            if let Some(next) = self.samples.borrow_mut().pop_front() {
                self.last.set(next);
            }
            Ok(self.last.get())
        }

        fn drain_events(&self) -> Result<usize, SessionError> {
            let n = self.pending_events.replace(0);
            self.drained.set(self.drained.get() + n);
            Ok(n)
        }
    }

    impl WindowProbe for ScriptedDisplay {
        fn title(&self, window: Window) -> Option<String> {
            self.probe.title(window)
        }

        fn class_hint(&self, window: Window) -> Option<ClassHint> {
            self.probe.class_hint(window)
        }

        fn client_pid(&self, window: Window) -> Result<u32, InspectError> {
            self.probe.client_pid(window)
        }
    }

    fn monitor(samples: &[Option<Window>], probe: FakeProbe) -> Monitor<ScriptedDisplay> {
        Monitor::new(ScriptedDisplay::new(samples, probe), Reporter::new(&ENGLISH))
    }

    fn tick(monitor: &mut Monitor<ScriptedDisplay>) -> (Option<OwnerEvent>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let event = monitor.tick(&mut out, &mut err).unwrap();
        (
            event,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn owner_transfer_and_release() {
        let probe = FakeProbe {
            pid: Some(Err(InspectError::ExtensionUnavailable)),
            ..FakeProbe::default()
        };
        let mut monitor = monitor(&[None, Some(0x400001), Some(0x400001), None, None], probe);

        let (event, out, _) = tick(&mut monitor);
        assert_eq!(event, Some(OwnerEvent::Startup(None)));
        assert!(out.contains("Current clipboard owner: 0x0\n"));
        assert!(out.contains("Monitoring clipboard changes"));
        assert!(!out.contains("Window ID"));

        let (event, out, err) = tick(&mut monitor);
        assert!(matches!(
            event,
            Some(OwnerEvent::Changed { owner: 0x400001, .. })
        ));
        assert!(out.starts_with("Clipboard change detected! Time: "));
        assert!(out.contains("Window ID: 0x400001\n"));
        assert!(out.contains("Process ID: Cannot retrieve\n"));
        assert_eq!(err, "XRes extension not available\n");

        let (event, out, _) = tick(&mut monitor);
        assert_eq!(event, None);
        assert!(out.is_empty());

        let (event, out, err) = tick(&mut monitor);
        assert_eq!(event, Some(OwnerEvent::Cleared));
        assert_eq!(out, "Clipboard cleared\n\n");
        assert!(err.is_empty());

        let (event, out, _) = tick(&mut monitor);
        assert_eq!(event, None);
        assert!(out.is_empty());
    }

    #[test]
    fn startup_owner_is_reported() {
        let probe = FakeProbe {
            title: Some("xterm".into()),
            class_hint: Some(ClassHint {
                instance: Some("xterm".into()),
                class: Some("XTerm".into()),
            }),
            pid: Some(Err(InspectError::ClientQueryFailed)),
        };
        let mut monitor = monitor(&[Some(0x1c00007)], probe);

        let (event, out, err) = tick(&mut monitor);
        assert_eq!(event, Some(OwnerEvent::Startup(Some(0x1c00007))));
        assert!(out.contains("Current clipboard owner: 0x1c00007\n"));
        assert!(out.contains("Window Name: xterm\n"));
        assert!(out.contains("Application Class: XTerm\n"));
        assert_eq!(err, "Cannot get process ID via XRes\n");

        let owner_pos = out.find("Window ID").unwrap();
        let monitoring_pos = out.find("Monitoring").unwrap();
        assert!(owner_pos < monitoring_pos);
    }

    #[test]
    fn pending_events_are_drained_every_tick() {
        let mut monitor = monitor(&[None], FakeProbe::default());
        for _ in 0..3 {
            monitor.display.pending_events.set(4);
            tick(&mut monitor);
            assert_eq!(monitor.display.pending_events.get(), 0);
        }
        assert_eq!(monitor.display.drained.get(), 12);
    }

    #[test]
    fn session_error_surfaces_from_tick() {
        let mut display = ScriptedDisplay::new(&[None], FakeProbe::default());
        display.fail_after = Some(1);
        let mut monitor = Monitor::new(display, Reporter::new(&ENGLISH));

        tick(&mut monitor);
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = monitor.tick(&mut out, &mut err);
        assert!(matches!(result, Err(MonitorError::Session(_))));
        assert_eq!(
            monitor.tracker().state(),
            tracker::OwnershipState::Tracking(None)
        );
    }

    #[tokio::test]
    async fn run_stops_when_display_fails() {
        let mut display = ScriptedDisplay::new(&[Some(0x400001), None], FakeProbe::default());
        display.fail_after = Some(2);
        let monitor = Monitor::new(display, Reporter::new(&ENGLISH));

        let result = run(monitor, Duration::from_millis(1)).await;
        assert!(matches!(
            result,
            Err(MonitorError::Session(SessionError::X11(_)))
        ));
    }
}
