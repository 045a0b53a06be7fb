//! Test doubles to simulate the serial link and timer during
//! integration tests.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Duration};

use trundle_rc::core::LineBytes;
use trundle_rc::protocol::transport::traits::{
    serial_link::SerialLink, tick_timer::TickTimer,
};

/// Error type surfaced by the mock link when send failures are injected.
#[derive(Debug)]
pub struct MockLinkError;

#[allow(dead_code)]
/// In-memory serial link reproducing the `SerialLink` trait behavior:
/// outbound command bytes land in a channel the test reads, inbound
/// telemetry lines are queued by the test and drained by `poll_line`.
pub struct MockSerialLink {
    tx: mpsc::UnboundedSender<u8>,
    inbound: Arc<Mutex<VecDeque<LineBytes>>>,
    fail_sends: Arc<AtomicBool>,
}

#[allow(dead_code)]
/// Test-side probe paired with a [`MockSerialLink`].
pub struct LinkProbe {
    outbound: mpsc::UnboundedReceiver<u8>,
    inbound: Arc<Mutex<VecDeque<LineBytes>>>,
    fail_sends: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockSerialLink {
    /// Construct a link plus the probe observing it (DUT ↔ test).
    pub fn create() -> (Self, LinkProbe) {
        let (tx, outbound) = mpsc::unbounded_channel();
        let inbound = Arc::new(Mutex::new(VecDeque::new()));
        let fail_sends = Arc::new(AtomicBool::new(false));

        let link = Self {
            tx,
            inbound: Arc::clone(&inbound),
            fail_sends: Arc::clone(&fail_sends),
        };
        let probe = LinkProbe {
            outbound,
            inbound,
            fail_sends,
        };
        (link, probe)
    }
}

impl SerialLink for MockSerialLink {
    type Error = MockLinkError;

    async fn send<'a>(&'a mut self, bytes: &'a [u8]) -> Result<(), Self::Error> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(MockLinkError);
        }
        for byte in bytes {
            self.tx.send(*byte).map_err(|_| MockLinkError)?;
        }
        Ok(())
    }

    fn poll_line(&mut self) -> Result<Option<LineBytes>, Self::Error> {
        Ok(self.inbound.lock().expect("inbound queue poisoned").pop_front())
    }
}

#[allow(dead_code)]
impl LinkProbe {
    /// Queue one telemetry line for the session to drain on its next tick.
    pub fn feed_line(&self, text: &str) {
        self.feed_raw(text.as_bytes());
    }

    /// Queue raw line bytes (for non-UTF-8 inputs).
    pub fn feed_raw(&self, bytes: &[u8]) {
        self.inbound
            .lock()
            .expect("inbound queue poisoned")
            .push_back(LineBytes::from_slice(bytes));
    }

    /// Make every subsequent send fail (or succeed again).
    pub fn fail_sends(&self, failing: bool) {
        self.fail_sends.store(failing, Ordering::SeqCst);
    }

    /// Wait for the next byte the session transmitted.
    pub async fn next_byte(&mut self) -> u8 {
        timeout(Duration::from_secs(2), self.outbound.recv())
            .await
            .expect("timed out waiting for a wire byte")
            .expect("wire closed")
    }

    /// Whether any transmitted byte is currently pending.
    pub fn has_pending_byte(&mut self) -> bool {
        match self.outbound.try_recv() {
            Ok(_) => true,
            Err(_) => false,
        }
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive the session timeline in
/// tests.
pub struct MockTimer;

impl TickTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}
