//! Connection lifecycle edge detection

/// Change in transport connectivity since the previous poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Connected,
    Disconnected,
}

/// Remembers the connectivity seen on the previous poll
///
/// One-shot, no debounce: every false→true sample is a new connection.
#[derive(Debug, Default)]
pub struct ConnectionMonitor {
    connected: bool,
}

impl ConnectionMonitor {
    pub const fn new() -> Self {
        Self { connected: false }
    }

    /// Feed the current connectivity, get the edge if there is one
    pub fn update(&mut self, connected: bool) -> Option<Transition> {
        let was = core::mem::replace(&mut self.connected, connected);
        match (was, connected) {
            (false, true) => Some(Transition::Connected),
            (true, false) => Some(Transition::Disconnected),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
