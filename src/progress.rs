//! Observer trait for session events.
//!
//! Inject an [`Arc<dyn SessionObserver>`] via
//! [`crate::session::FlyerSession::with_observer`] to follow what the
//! session is doing: which network-triggered control is in flight, which
//! status line changed, which picked file was skipped. The CLI renders these
//! events as a terminal spinner; a GUI would toggle buttons and labels.
//!
//! # Example
//!
//! ```rust
//! use flyer_client::{Control, ControlState, SessionObserver};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct CountingObserver {
//!     requests: AtomicUsize,
//! }
//!
//! impl SessionObserver for CountingObserver {
//!     fn on_control_change(&self, _control: Control, state: ControlState) {
//!         if state == ControlState::InFlight {
//!             self.requests.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//! ```

use crate::error::FileError;
use std::fmt;
use std::sync::Arc;

/// The two controls that trigger a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// "Extract panels" — `POST /api/pdf_extract`.
    ExtractPdf,
    /// "Generate flyer" — `POST /api/flyer`.
    GenerateFlyer,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::ExtractPdf => f.write_str("extract"),
            Control::GenerateFlyer => f.write_str("generate"),
        }
    }
}

/// Whether a control's call is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    InFlight,
}

/// The two status lines a session maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusArea {
    /// Messages about PDF extraction.
    Pdf,
    /// Messages about flyer generation and reset.
    Flyer,
}

/// Receives session events. All methods default to no-ops.
pub trait SessionObserver: Send + Sync {
    /// A control entered or left its in-flight state.
    fn on_control_change(&self, control: Control, state: ControlState) {
        let _ = (control, state);
    }

    /// A status line was replaced. An empty message clears it.
    fn on_status(&self, area: StatusArea, message: &str) {
        let _ = (area, message);
    }

    /// A picked file was skipped during `add_images`.
    fn on_file_skipped(&self, error: &FileError) {
        let _ = error;
    }
}

/// Observer that ignores every event. The session default.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Shared observer handle as stored in the session.
pub type ObserverHandle = Arc<dyn SessionObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SessionObserver for Recorder {
        fn on_control_change(&self, control: Control, state: ControlState) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{control}:{state:?}"));
        }

        fn on_status(&self, area: StatusArea, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{area:?}={message}"));
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_control_change(Control::ExtractPdf, ControlState::InFlight);
        o.on_status(StatusArea::Pdf, "hello");
        o.on_file_skipped(&FileError::ReadFailed {
            name: "a.png".into(),
            detail: "gone".into(),
        });
    }

    #[test]
    fn recorder_sees_events_in_order() {
        let r = Recorder::default();
        r.on_control_change(Control::GenerateFlyer, ControlState::InFlight);
        r.on_status(StatusArea::Flyer, "Flyer ready.");
        r.on_control_change(Control::GenerateFlyer, ControlState::Idle);
        assert_eq!(
            *r.events.lock().unwrap(),
            vec!["generate:InFlight", "Flyer=Flyer ready.", "generate:Idle"]
        );
    }

    #[test]
    fn arc_dyn_observer_works() {
        let o: ObserverHandle = Arc::new(NoopObserver);
        o.on_status(StatusArea::Flyer, "");
    }
}
