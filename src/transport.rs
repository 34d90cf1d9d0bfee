//! Byte transport between the operator terminal and the console.
//!
//! The console never blocks on the transport: it asks whether a byte is
//! available, reads at most one per poll, and calls [`Transport::service`]
//! so a USB stack can flush and answer keepalives.

use heapless::{Deque, Vec};

/// Character-oriented connection (USB CDC, UART, ...)
pub trait Transport {
    /// True if at least one received byte is buffered
    fn byte_available(&mut self) -> bool;

    /// Take the next received byte. Only called after `byte_available`.
    fn read_byte(&mut self) -> u8;

    /// Queue one byte for sending
    fn write_byte(&mut self, byte: u8);

    /// True while a host holds the connection open
    fn is_connected(&self) -> bool;

    /// Run the transport's housekeeping (flush, keepalive)
    fn service(&mut self);

    /// Queue a run of bytes
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }
}

/// In-memory transport for host simulation and tests
///
/// Received bytes are queued with [`MemoryTransport::feed`]; sent bytes
/// accumulate until [`MemoryTransport::clear_output`]. Bytes sent past `TX`
/// capacity are counted in `dropped` instead of stored.
pub struct MemoryTransport<const RX: usize, const TX: usize> {
    rx: Deque<u8, RX>,
    tx: Vec<u8, TX>,
    connected: bool,
    services: u32,
    dropped: u32,
}

impl<const RX: usize, const TX: usize> MemoryTransport<RX, TX> {
    pub fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
            connected: false,
            services: 0,
            dropped: 0,
        }
    }

    /// Queue bytes as if typed by the operator
    ///
    /// Returns the number of bytes accepted.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &b in bytes {
            if self.rx.push_back(b).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Everything sent so far
    pub fn output(&self) -> &[u8] {
        &self.tx
    }

    /// Sent bytes as text (lossy on invalid UTF-8)
    pub fn output_str(&self) -> &str {
        core::str::from_utf8(&self.tx).unwrap_or("")
    }

    pub fn clear_output(&mut self) {
        self.tx.clear();
    }

    /// Number of received bytes not yet read
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Number of `service` calls so far
    pub fn services(&self) -> u32 {
        self.services
    }

    /// Bytes lost because the send buffer was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const RX: usize, const TX: usize> Default for MemoryTransport<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RX: usize, const TX: usize> Transport for MemoryTransport<RX, TX> {
    fn byte_available(&mut self) -> bool {
        !self.rx.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.rx.pop_front().unwrap_or(0)
    }

    fn write_byte(&mut self, byte: u8) {
        if self.tx.push(byte).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn service(&mut self) {
        self.services = self.services.wrapping_add(1);
    }
}
