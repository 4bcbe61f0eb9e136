//! Ownership state machine.
//!
//! `Initial` until the first sample, then `Tracking(owner)` forever.
//! Only transitions produce events; repeated samples of the same owner
//! are silent.

use chrono::{DateTime, Local};
use x11rb::protocol::xproto::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipState {
    Initial,
    Tracking(Option<Window>),
}

/// Something worth reporting about the clipboard owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerEvent {
    /// First sample after startup.
    Startup(Option<Window>),
    /// A new window took the selection.
    Changed { owner: Window, at: DateTime<Local> },
    /// Nobody owns the selection any more.
    Cleared,
}

#[derive(Debug)]
pub struct OwnershipTracker {
    state: OwnershipState,
}

impl OwnershipTracker {
    pub fn new() -> Self {
        Self {
            state: OwnershipState::Initial,
        }
    }

    pub fn state(&self) -> OwnershipState {
        self.state
    }

    /// Feed one sample, stamping changes with the current local time.
    pub fn observe(&mut self, sample: Option<Window>) -> Option<OwnerEvent> {
        self.observe_at(sample, Local::now())
    }

    /// Feed one sample, stamping changes with `now`.
    pub fn observe_at(
        &mut self,
        sample: Option<Window>,
        now: DateTime<Local>,
    ) -> Option<OwnerEvent> {
        let previous = self.state;
        self.state = OwnershipState::Tracking(sample);

        match previous {
            OwnershipState::Initial => Some(OwnerEvent::Startup(sample)),
            OwnershipState::Tracking(current) if current == sample => None,
            OwnershipState::Tracking(_) => Some(match sample {
                Some(owner) => OwnerEvent::Changed { owner, at: now },
                None => OwnerEvent::Cleared,
            }),
        }
    }
}

impl Default for OwnershipTracker {
    fn default() -> Self {
        Self::new()
    }
}
