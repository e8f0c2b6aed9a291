use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use tracing::warn;
use wiremux_mux::{FrameSink, Multiplexer};

/// One direction of an in-memory pipe.
struct Direction {
    queue: Mutex<VecDeque<Bytes>>,
    closed: AtomicBool,
}

impl Direction {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Bytes>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LoopbackSink {
    dir: Arc<Direction>,
}

impl FrameSink for LoopbackSink {
    fn send_frame(&self, frame: Bytes) -> std::io::Result<()> {
        if self.dir.closed.load(Ordering::SeqCst) {
            return Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        }
        self.dir.lock().push_back(frame);
        Ok(())
    }
}

/// One endpoint of an in-memory frame pipe.
///
/// Frames queue until the owner drains them into a multiplexer, which keeps
/// tests deterministic: no threads, no timing.
pub struct LoopbackPipe {
    outbound: Arc<Direction>,
    inbound: Arc<Direction>,
    close_delivered: AtomicBool,
}

/// A connected pair of in-memory pipes.
pub fn loopback() -> (LoopbackPipe, LoopbackPipe) {
    let a_to_b = Direction::new();
    let b_to_a = Direction::new();
    (
        LoopbackPipe {
            outbound: Arc::clone(&a_to_b),
            inbound: Arc::clone(&b_to_a),
            close_delivered: AtomicBool::new(false),
        },
        LoopbackPipe {
            outbound: b_to_a,
            inbound: a_to_b,
            close_delivered: AtomicBool::new(false),
        },
    )
}

impl LoopbackPipe {
    /// The outbound seam to hand a multiplexer.
    pub fn sink(&self) -> Arc<dyn FrameSink> {
        Arc::new(LoopbackSink {
            dir: Arc::clone(&self.outbound),
        })
    }

    /// Hang up both directions. Queued frames still drain.
    pub fn close(&self) {
        self.outbound.closed.store(true, Ordering::SeqCst);
        self.inbound.closed.store(true, Ordering::SeqCst);
    }

    /// Deliver every queued inbound frame to `mux`; returns how many were
    /// dispatched. After a hang-up, the first empty drain cascades
    /// `handle_closed` exactly once.
    pub fn drain_into(&self, mux: &Multiplexer) -> usize {
        let mut dispatched = 0usize;
        loop {
            let frame = self.inbound.lock().pop_front();
            match frame {
                Some(frame) => {
                    if let Err(err) = mux.handle_frame(frame) {
                        warn!(%err, "dropping undispatchable loopback frame");
                    }
                    dispatched += 1;
                }
                None => break,
            }
        }

        if self.inbound.closed.load(Ordering::SeqCst)
            && self.inbound.lock().is_empty()
            && !self.close_delivered.swap(true, Ordering::SeqCst)
        {
            mux.handle_closed();
        }

        dispatched
    }

    /// Frames waiting to be drained.
    pub fn pending(&self) -> usize {
        self.inbound.lock().len()
    }
}
