use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use bytes::Bytes;
use tracing::debug;
use wiremux_buffer::{ReadBuffer, WriteBuffer};

use crate::error::{MuxError, Result};
use crate::event::Signal;
use crate::header::{opcode, Header};
use crate::mux::{FrameSink, MuxShared};

/// A named logical endpoint sharing the underlying pipe with its siblings.
///
/// Three observable signals: `messages` (a read buffer positioned just past
/// the mux header), `closed` (fired exactly once), `errors` (pipe failures
/// fanned out by the multiplexer). Cloning shares the endpoint.
#[derive(Clone)]
pub struct Channel {
    inner: Arc<ChannelInner>,
}

struct ChannelInner {
    id: String,
    sink: Arc<dyn FrameSink>,
    mux: Weak<MuxShared>,
    messages: Signal<ReadBuffer>,
    closed_signal: Signal<()>,
    errors: Signal<Arc<MuxError>>,
    closed: AtomicBool,
}

impl Channel {
    pub(crate) fn new(id: String, sink: Arc<dyn FrameSink>, mux: Weak<MuxShared>) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                id,
                sink,
                mux,
                messages: Signal::new(),
                closed_signal: Signal::new(),
                errors: Signal::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// The channel id on the wire.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Whether the closed signal has fired.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Message-arrived signal.
    pub fn messages(&self) -> &Signal<ReadBuffer> {
        &self.inner.messages
    }

    /// Closed signal. Fires exactly once per channel.
    pub fn closed(&self) -> &Signal<()> {
        &self.inner.closed_signal
    }

    /// Pipe-error signal.
    pub fn errors(&self) -> &Signal<Arc<MuxError>> {
        &self.inner.errors
    }

    /// Acquire a fresh write buffer pre-seeded with this channel's Data
    /// header. `commit` publishes one atomic pipe frame.
    pub fn write_buffer(&self) -> DataBuffer {
        let mut buf = WriteBuffer::new();
        Header::write(&mut buf, opcode::DATA, &self.inner.id);
        DataBuffer {
            buf,
            sink: Arc::clone(&self.inner.sink),
        }
    }

    /// Close this channel locally: send Close, fire `closed`, remove from
    /// the multiplexer table. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if let Some(mux) = self.inner.mux.upgrade() {
            mux.remove_channel(&self.inner.id);
        }

        let mut buf = WriteBuffer::new();
        Header::write(&mut buf, opcode::CLOSE, &self.inner.id);
        let sent = self
            .inner
            .sink
            .send_frame(buf.commit())
            .map_err(MuxError::Pipe);

        debug!(id = %self.inner.id, "channel closed locally");
        self.inner.closed_signal.emit(());
        sent
    }

    /// Hand an inbound Data payload to the message listeners.
    pub(crate) fn deliver(&self, payload: Bytes) {
        self.inner.messages.emit(ReadBuffer::new(payload));
    }

    /// Fire the closed signal if it has not fired yet.
    pub(crate) fn fire_closed(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.closed_signal.emit(());
    }

    /// Fan a pipe error out to this channel's error listeners.
    pub(crate) fn fire_error(&self, err: Arc<MuxError>) {
        self.inner.errors.emit(err);
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.inner.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A write buffer whose `commit` publishes a Data-framed packet.
///
/// Derefs to [`WriteBuffer`], so all primitive writes chain as usual.
pub struct DataBuffer {
    buf: WriteBuffer,
    sink: Arc<dyn FrameSink>,
}

impl DataBuffer {
    /// Publish the frame to the pipe. Consumes the buffer.
    pub fn commit(self) -> Result<()> {
        self.sink.send_frame(self.buf.commit()).map_err(MuxError::Pipe)
    }
}

impl Deref for DataBuffer {
    type Target = WriteBuffer;

    fn deref(&self) -> &WriteBuffer {
        &self.buf
    }
}

impl DerefMut for DataBuffer {
    fn deref_mut(&mut self) -> &mut WriteBuffer {
        &mut self.buf
    }
}
