use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Decides whether the session may issue its next poll.
///
/// Consulted synchronously on the polling task after every completion. A
/// veto leaves the session armed but idle until [`Session::resume`] is
/// called.
///
/// [`Session::resume`]: crate::Session::resume
pub trait ReconnectGate: Send + Sync + 'static {
    /// Return false to hold off the next request.
    fn should_reconnect(&self) -> bool;
}

/// A gate that never vetoes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReconnect;

impl ReconnectGate for AlwaysReconnect {
    fn should_reconnect(&self) -> bool {
        true
    }
}

impl<F> ReconnectGate for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn should_reconnect(&self) -> bool {
        self()
    }
}

/// Host-controlled pause/resume switch.
///
/// Clones share one flag, so the host keeps a clone and flips it from
/// lifecycle callbacks while the session holds the other.
#[derive(Debug, Clone, Default)]
pub struct PauseSwitch {
    paused: Arc<AtomicBool>,
}

impl PauseSwitch {
    /// Create an unpaused switch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Veto further polls.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Allow polls again. Pair with [`Session::resume`](crate::Session::resume).
    pub fn unpause(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

impl ReconnectGate for PauseSwitch {
    fn should_reconnect(&self) -> bool {
        !self.is_paused()
    }
}
