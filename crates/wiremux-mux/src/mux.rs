use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, error, trace};
use wiremux_buffer::{ReadBuffer, WriteBuffer};

use crate::channel::Channel;
use crate::error::{MuxError, Result};
use crate::event::Signal;
use crate::header::{opcode, opcode_name, Header};

/// Outbound seam to the underlying pipe.
///
/// Each call must publish `frame` as one atomic, ordered transport frame.
pub trait FrameSink: Send + Sync {
    fn send_frame(&self, frame: Bytes) -> std::io::Result<()>;
}

/// Multiplexer behavior switches.
#[derive(Debug, Clone)]
pub struct MuxConfig {
    /// Answer every passive Open with an AckOpen so a one-sided `open()`
    /// resolves against a passive peer. Off reproduces the silent-accept
    /// protocol where only colliding opens resolve.
    pub ack_passive_open: bool,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            ack_passive_open: true,
        }
    }
}

type Resolver = mpsc::Sender<Channel>;

#[derive(Default)]
struct MuxState {
    pending_open: HashMap<String, Resolver>,
    open_channels: HashMap<String, Channel>,
}

pub(crate) struct MuxShared {
    sink: Arc<dyn FrameSink>,
    config: MuxConfig,
    state: Mutex<MuxState>,
    channel_opened: Signal<Channel>,
}

impl MuxShared {
    fn state(&self) -> MutexGuard<'_, MuxState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn remove_channel(&self, id: &str) -> Option<Channel> {
        self.state().open_channels.remove(id)
    }
}

/// Multiplexes named logical channels over a single underlying pipe.
///
/// All inbound dispatch happens on the caller of `handle_frame`; internal
/// state sits behind one mutex, which is never held while writing to the
/// sink or invoking listeners, so a loopback peer may respond re-entrantly.
#[derive(Clone)]
pub struct Multiplexer {
    shared: Arc<MuxShared>,
}

impl Multiplexer {
    /// A multiplexer with default configuration.
    pub fn new(sink: Arc<dyn FrameSink>) -> Self {
        Self::with_config(sink, MuxConfig::default())
    }

    /// A multiplexer with explicit configuration.
    pub fn with_config(sink: Arc<dyn FrameSink>, config: MuxConfig) -> Self {
        Self {
            shared: Arc::new(MuxShared {
                sink,
                config,
                state: Mutex::new(MuxState::default()),
                channel_opened: Signal::new(),
            }),
        }
    }

    /// Request a channel from the peer.
    ///
    /// Sends an Open frame and registers a one-shot resolver; the returned
    /// request completes when the peer's AckOpen arrives, or when a
    /// colliding remote Open for the same id is dispatched. Opening an id
    /// that is already pending or open is a protocol error.
    pub fn open(&self, id: &str) -> Result<OpenRequest> {
        let (tx, rx) = mpsc::channel();
        {
            let mut state = self.shared.state();
            if state.pending_open.contains_key(id) || state.open_channels.contains_key(id) {
                return Err(MuxError::DuplicateChannel(id.to_string()));
            }
            state.pending_open.insert(id.to_string(), tx);
        }

        let mut buf = WriteBuffer::new();
        Header::write(&mut buf, opcode::OPEN, id);
        if let Err(err) = self.shared.sink.send_frame(buf.commit()) {
            self.shared.state().pending_open.remove(id);
            return Err(MuxError::Pipe(err));
        }

        debug!(id, "channel open requested");
        Ok(OpenRequest {
            id: id.to_string(),
            rx,
        })
    }

    /// The open channel with this id, if any.
    pub fn channel(&self, id: &str) -> Option<Channel> {
        self.shared.state().open_channels.get(id).cloned()
    }

    /// Signal fired when the peer opens a channel we were not requesting.
    pub fn channel_opened(&self) -> &Signal<Channel> {
        &self.shared.channel_opened
    }

    /// Ids currently in the open-channel table, sorted.
    pub fn open_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.shared.state().open_channels.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids currently awaiting AckOpen, sorted.
    pub fn pending_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.shared.state().pending_open.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Dispatch one inbound pipe frame.
    ///
    /// Framing and protocol errors are logged with the raw frame and
    /// returned; they do not mutate the channel tables.
    pub fn handle_frame(&self, frame: Bytes) -> Result<()> {
        match self.dispatch(&frame) {
            Ok(()) => Ok(()),
            Err(err) => {
                error!(%err, frame = %hex_preview(&frame), "mux frame dispatch failed");
                Err(err)
            }
        }
    }

    fn dispatch(&self, frame: &Bytes) -> Result<()> {
        let mut buf = ReadBuffer::new(frame.clone());
        let header = Header::read(&mut buf)?;
        trace!(opcode = opcode_name(header.opcode), id = %header.id, "mux frame");
        match header.opcode {
            opcode::OPEN => self.on_open(header.id),
            opcode::ACK_OPEN => self.on_ack_open(&header.id),
            opcode::CLOSE => self.on_close(&header.id),
            opcode::DATA => self.on_data(&header.id, buf.read_rest()),
            other => Err(MuxError::UnknownOpcode(other)),
        }
    }

    /// Peer requests a channel. A locally pending open for the same id is
    /// the simultaneous-open collision and resolves here.
    fn on_open(&self, id: String) -> Result<()> {
        let (channel, resolver, created) = {
            let mut state = self.shared.state();
            let resolver = state.pending_open.remove(&id);
            match state.open_channels.get(&id) {
                Some(existing) => (existing.clone(), resolver, false),
                None => {
                    let channel = self.make_channel(&id);
                    state.open_channels.insert(id.clone(), channel.clone());
                    (channel, resolver, true)
                }
            }
        };

        if self.shared.config.ack_passive_open {
            let mut buf = WriteBuffer::new();
            Header::write(&mut buf, opcode::ACK_OPEN, &id);
            self.shared
                .sink
                .send_frame(buf.commit())
                .map_err(MuxError::Pipe)?;
        }

        match resolver {
            Some(tx) => {
                debug!(id = %id, "open collision resolved locally");
                let _ = tx.send(channel);
            }
            None if created => {
                debug!(id = %id, "channel opened by peer");
                self.shared.channel_opened.emit(channel);
            }
            None => trace!(id = %id, "open for already-open channel ignored"),
        }
        Ok(())
    }

    /// Peer confirms a channel we requested.
    fn on_ack_open(&self, id: &str) -> Result<()> {
        let resolved = {
            let mut state = self.shared.state();
            match state.pending_open.remove(id) {
                Some(tx) => {
                    let channel = self.make_channel(id);
                    state.open_channels.insert(id.to_string(), channel.clone());
                    Some((tx, channel))
                }
                // Under the ack-passive-open extension both colliding peers
                // ack; the late ack lands on an already-open channel.
                None if state.open_channels.contains_key(id) => None,
                None => return Err(MuxError::UnexpectedAck(id.to_string())),
            }
        };

        if let Some((tx, channel)) = resolved {
            debug!(id, "channel open acknowledged");
            let _ = tx.send(channel);
        }
        Ok(())
    }

    fn on_close(&self, id: &str) -> Result<()> {
        match self.shared.remove_channel(id) {
            Some(channel) => {
                debug!(id, "channel closed by peer");
                channel.fire_closed();
            }
            None => trace!(id, "close for unknown channel ignored"),
        }
        Ok(())
    }

    fn on_data(&self, id: &str, payload: Bytes) -> Result<()> {
        match self.channel(id) {
            Some(channel) => channel.deliver(payload),
            None => trace!(id, "data for unknown channel dropped"),
        }
        Ok(())
    }

    /// Fan a pipe error out to every open channel. State is unchanged; only
    /// an explicit Close or pipe closure removes channels.
    pub fn handle_error(&self, err: std::io::Error) {
        let channels: Vec<Channel> = self.shared.state().open_channels.values().cloned().collect();
        let shared_err = Arc::new(MuxError::Pipe(err));
        for channel in channels {
            channel.fire_error(Arc::clone(&shared_err));
        }
    }

    /// The underlying pipe closed: abort every pending open and close every
    /// channel exactly once.
    pub fn handle_closed(&self) {
        let channels: Vec<Channel> = {
            let mut state = self.shared.state();
            // Dropping the resolvers wakes the waiters with OpenAborted.
            state.pending_open.clear();
            state.open_channels.drain().map(|(_, ch)| ch).collect()
        };

        debug!(channels = channels.len(), "pipe closed, cascading");
        for channel in channels {
            channel.fire_closed();
        }
    }

    fn make_channel(&self, id: &str) -> Channel {
        Channel::new(
            id.to_string(),
            Arc::clone(&self.shared.sink),
            Arc::downgrade(&self.shared),
        )
    }
}

impl std::fmt::Debug for Multiplexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state();
        f.debug_struct("Multiplexer")
            .field("open", &state.open_channels.len())
            .field("pending", &state.pending_open.len())
            .finish()
    }
}

/// One-shot completion handle for an outstanding `open`.
#[derive(Debug)]
pub struct OpenRequest {
    id: String,
    rx: mpsc::Receiver<Channel>,
}

impl OpenRequest {
    /// The requested channel id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Block until the peer acknowledges (or collides with) the open.
    pub fn wait(self) -> Result<Channel> {
        self.rx.recv().map_err(|_| MuxError::OpenAborted(self.id))
    }

    /// Block with a deadline.
    pub fn wait_timeout(self, timeout: Duration) -> Result<Channel> {
        match self.rx.recv_timeout(timeout) {
            Ok(channel) => Ok(channel),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(MuxError::Timeout(timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(MuxError::OpenAborted(self.id)),
        }
    }

    /// Non-blocking poll.
    pub fn try_take(&self) -> Option<Channel> {
        self.rx.try_recv().ok()
    }
}

fn hex_preview(frame: &Bytes) -> String {
    const PREVIEW_LEN: usize = 64;
    let shown = &frame[..frame.len().min(PREVIEW_LEN)];
    let mut out = String::with_capacity(shown.len() * 2 + 16);
    for byte in shown {
        let _ = write!(out, "{byte:02x}");
    }
    if frame.len() > PREVIEW_LEN {
        let _ = write!(out, "… ({} bytes)", frame.len());
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::event::Subscription;

    /// Collects outbound frames for manual delivery to a peer.
    #[derive(Default)]
    struct QueueSink {
        frames: Mutex<VecDeque<Bytes>>,
    }

    impl QueueSink {
        fn pop(&self) -> Option<Bytes> {
            self.frames.lock().unwrap().pop_front()
        }
    }

    impl FrameSink for QueueSink {
        fn send_frame(&self, frame: Bytes) -> std::io::Result<()> {
            self.frames.lock().unwrap().push_back(frame);
            Ok(())
        }
    }

    struct BrokenSink;

    impl FrameSink for BrokenSink {
        fn send_frame(&self, _frame: Bytes) -> std::io::Result<()> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }
    }

    /// A connected pair of muxes with manually pumped queues.
    struct Pair {
        a: Multiplexer,
        b: Multiplexer,
        a_out: Arc<QueueSink>,
        b_out: Arc<QueueSink>,
    }

    impl Pair {
        fn new() -> Self {
            Self::with_config(MuxConfig::default())
        }

        fn with_config(config: MuxConfig) -> Self {
            let a_out = Arc::new(QueueSink::default());
            let b_out = Arc::new(QueueSink::default());
            Self {
                a: Multiplexer::with_config(a_out.clone(), config.clone()),
                b: Multiplexer::with_config(b_out.clone(), config),
                a_out,
                b_out,
            }
        }

        /// Deliver queued frames in both directions until quiescent.
        fn pump(&self) {
            loop {
                let mut moved = false;
                while let Some(frame) = self.a_out.pop() {
                    self.b.handle_frame(frame).unwrap();
                    moved = true;
                }
                while let Some(frame) = self.b_out.pop() {
                    self.a.handle_frame(frame).unwrap();
                    moved = true;
                }
                if !moved {
                    return;
                }
            }
        }
    }

    fn wait_quick(request: OpenRequest) -> Channel {
        request
            .wait_timeout(Duration::from_millis(100))
            .expect("open should already be resolved")
    }

    #[test]
    fn open_emits_open_frame() {
        let sink = Arc::new(QueueSink::default());
        let mux = Multiplexer::new(sink.clone());

        let _request = mux.open("rpc").unwrap();

        let frame = sink.pop().unwrap();
        assert_eq!(
            frame.as_ref(),
            &[0x01, 0x00, 0x00, 0x00, 0x03, 0x72, 0x70, 0x63]
        );
        assert_eq!(mux.pending_ids(), vec!["rpc".to_string()]);
        assert!(mux.open_ids().is_empty());
    }

    #[test]
    fn ack_resolves_open_on_both_sides() {
        let pair = Pair::new();

        let request = pair.a.open("rpc").unwrap();
        pair.pump();

        let channel = wait_quick(request);
        assert_eq!(channel.id(), "rpc");
        assert_eq!(pair.a.open_ids(), vec!["rpc".to_string()]);
        assert!(pair.a.pending_ids().is_empty());
        assert_eq!(pair.b.open_ids(), vec!["rpc".to_string()]);
    }

    #[test]
    fn passive_open_announces_channel() {
        let pair = Pair::new();
        let announced = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&announced);
        pair.b
            .channel_opened()
            .subscribe(move |ch: Channel| seen.lock().unwrap().push(ch.id().to_string()));

        let _request = pair.a.open("rpc").unwrap();
        pair.pump();

        assert_eq!(*announced.lock().unwrap(), vec!["rpc".to_string()]);
    }

    #[test]
    fn data_reaches_peer_listener_byte_for_byte() {
        let pair = Pair::new();
        let request = pair.a.open("rpc").unwrap();
        pair.pump();
        let channel = wait_quick(request);

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        pair.b
            .channel("rpc")
            .unwrap()
            .messages()
            .subscribe(move |mut buf: wiremux_buffer::ReadBuffer| {
                sink.lock().unwrap().push(buf.read_rest().to_vec());
            });

        let mut buf = channel.write_buffer();
        buf.write_u8(0xDE).write_u8(0xAD);
        buf.commit().unwrap();
        pair.pump();

        assert_eq!(*received.lock().unwrap(), vec![vec![0xDE, 0xAD]]);
    }

    #[test]
    fn per_channel_ordering_is_preserved() {
        let pair = Pair::new();
        let request = pair.a.open("rpc").unwrap();
        pair.pump();
        let channel = wait_quick(request);

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        pair.b
            .channel("rpc")
            .unwrap()
            .messages()
            .subscribe(move |mut buf: wiremux_buffer::ReadBuffer| {
                sink.lock().unwrap().push(buf.read_u8().unwrap());
            });

        for byte in [1u8, 2, 3] {
            let mut buf = channel.write_buffer();
            buf.write_u8(byte);
            buf.commit().unwrap();
        }
        pair.pump();

        assert_eq!(*received.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn simultaneous_open_collision_resolves_both() {
        let pair = Pair::new();

        let from_a = pair.a.open("shared").unwrap();
        let from_b = pair.b.open("shared").unwrap();
        pair.pump();

        let channel_a = wait_quick(from_a);
        let channel_b = wait_quick(from_b);
        assert_eq!(channel_a.id(), "shared");
        assert_eq!(channel_b.id(), "shared");
        assert!(pair.a.pending_ids().is_empty());
        assert!(pair.b.pending_ids().is_empty());
        assert_eq!(pair.a.open_ids(), vec!["shared".to_string()]);
        assert_eq!(pair.b.open_ids(), vec!["shared".to_string()]);
    }

    #[test]
    fn collision_works_without_passive_acks() {
        let pair = Pair::with_config(MuxConfig {
            ack_passive_open: false,
        });

        let from_a = pair.a.open("shared").unwrap();
        let from_b = pair.b.open("shared").unwrap();
        pair.pump();

        assert_eq!(wait_quick(from_a).id(), "shared");
        assert_eq!(wait_quick(from_b).id(), "shared");
    }

    #[test]
    fn one_sided_open_never_resolves_without_passive_acks() {
        let pair = Pair::with_config(MuxConfig {
            ack_passive_open: false,
        });

        let request = pair.a.open("rpc").unwrap();
        pair.pump();

        // Peer accepted silently; only a collision would resolve us.
        assert!(matches!(
            request.wait_timeout(Duration::from_millis(10)),
            Err(MuxError::Timeout(_))
        ));
        assert_eq!(pair.b.open_ids(), vec!["rpc".to_string()]);
    }

    #[test]
    fn duplicate_open_rejected() {
        let sink = Arc::new(QueueSink::default());
        let mux = Multiplexer::new(sink);

        let _pending = mux.open("rpc").unwrap();
        assert!(matches!(
            mux.open("rpc"),
            Err(MuxError::DuplicateChannel(id)) if id == "rpc"
        ));
    }

    #[test]
    fn pending_and_open_tables_stay_disjoint() {
        let pair = Pair::new();

        let _request = pair.a.open("one").unwrap();
        let _other = pair.a.open("two").unwrap();
        pair.pump();

        let open = pair.a.open_ids();
        let pending = pair.a.pending_ids();
        assert!(pending.iter().all(|id| !open.contains(id)));
        assert_eq!(open, vec!["one".to_string(), "two".to_string()]);
        assert!(pending.is_empty());
    }

    #[test]
    fn local_close_notifies_peer_and_fires_once() {
        let pair = Pair::new();
        let request = pair.a.open("rpc").unwrap();
        pair.pump();
        let channel = wait_quick(request);

        let local_fires = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&local_fires);
        channel.closed().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let peer_fires = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&peer_fires);
        pair.b.channel("rpc").unwrap().closed().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        channel.close().unwrap();
        channel.close().unwrap();
        pair.pump();

        assert_eq!(local_fires.load(Ordering::SeqCst), 1);
        assert_eq!(peer_fires.load(Ordering::SeqCst), 1);
        assert!(pair.a.open_ids().is_empty());
        assert!(pair.b.open_ids().is_empty());
        assert!(channel.is_closed());
    }

    #[test]
    fn close_for_unknown_channel_is_ignored() {
        let sink = Arc::new(QueueSink::default());
        let mux = Multiplexer::new(sink);

        let mut buf = WriteBuffer::new();
        Header::write(&mut buf, opcode::CLOSE, "ghost");
        mux.handle_frame(buf.commit()).unwrap();
    }

    #[test]
    fn data_for_unknown_channel_is_dropped() {
        let sink = Arc::new(QueueSink::default());
        let mux = Multiplexer::new(sink);

        let mut buf = WriteBuffer::new();
        Header::write(&mut buf, opcode::DATA, "ghost");
        buf.write_u8(0xFF);
        mux.handle_frame(buf.commit()).unwrap();
    }

    #[test]
    fn ack_without_pending_open_is_protocol_error() {
        let sink = Arc::new(QueueSink::default());
        let mux = Multiplexer::new(sink);

        let mut buf = WriteBuffer::new();
        Header::write(&mut buf, opcode::ACK_OPEN, "ghost");
        assert!(matches!(
            mux.handle_frame(buf.commit()),
            Err(MuxError::UnexpectedAck(id)) if id == "ghost"
        ));
    }

    #[test]
    fn unknown_opcode_is_framing_error() {
        let sink = Arc::new(QueueSink::default());
        let mux = Multiplexer::new(sink);

        let mut buf = WriteBuffer::new();
        Header::write(&mut buf, 9, "rpc");
        assert!(matches!(
            mux.handle_frame(buf.commit()),
            Err(MuxError::UnknownOpcode(9))
        ));
    }

    #[test]
    fn truncated_frame_is_framing_error() {
        let sink = Arc::new(QueueSink::default());
        let mux = Multiplexer::new(sink);

        let frame = Bytes::from_static(&[0x01, 0x00, 0x00]);
        assert!(matches!(
            mux.handle_frame(frame),
            Err(MuxError::Buffer(_))
        ));
    }

    #[test]
    fn framing_error_leaves_state_untouched() {
        let pair = Pair::new();
        let _request = pair.a.open("rpc").unwrap();
        pair.pump();

        let mut buf = WriteBuffer::new();
        Header::write(&mut buf, 9, "rpc");
        let _ = pair.a.handle_frame(buf.commit());

        assert_eq!(pair.a.open_ids(), vec!["rpc".to_string()]);
    }

    #[test]
    fn pipe_error_fans_out_without_closing() {
        let pair = Pair::new();
        let request = pair.a.open("rpc").unwrap();
        pair.pump();
        let channel = wait_quick(request);

        let errors = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&errors);
        channel.errors().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        pair.a
            .handle_error(std::io::Error::from(std::io::ErrorKind::ConnectionReset));

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(pair.a.open_ids(), vec!["rpc".to_string()]);
        assert!(!channel.is_closed());
    }

    #[test]
    fn pipe_close_cascades_exactly_once_and_clears_tables() {
        let pair = Pair::new();
        let request = pair.a.open("one").unwrap();
        pair.pump();
        let channel = wait_quick(request);
        let pending = pair.a.open("still-pending").unwrap();

        let fires = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fires);
        channel.closed().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        pair.a.handle_closed();
        pair.a.handle_closed();

        assert_eq!(fires.load(Ordering::SeqCst), 1);
        assert!(pair.a.open_ids().is_empty());
        assert!(pair.a.pending_ids().is_empty());
        assert!(matches!(
            pending.wait(),
            Err(MuxError::OpenAborted(id)) if id == "still-pending"
        ));
    }

    #[test]
    fn open_on_broken_pipe_fails_and_rolls_back() {
        let mux = Multiplexer::new(Arc::new(BrokenSink));

        assert!(matches!(mux.open("rpc"), Err(MuxError::Pipe(_))));
        assert!(mux.pending_ids().is_empty());
    }

    #[test]
    fn listener_can_unsubscribe_during_message_dispatch() {
        let pair = Pair::new();
        let request = pair.a.open("rpc").unwrap();
        pair.pump();
        let channel = wait_quick(request);
        let peer = pair.b.channel("rpc").unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let counter = Arc::clone(&count);
        let peer_clone = peer.clone();
        let slot_clone = Arc::clone(&slot);
        let sub = peer.messages().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = slot_clone.lock().unwrap().take() {
                peer_clone.messages().unsubscribe(sub);
            }
        });
        *slot.lock().unwrap() = Some(sub);

        for _ in 0..2 {
            let mut buf = channel.write_buffer();
            buf.write_u8(0);
            buf.commit().unwrap();
        }
        pair.pump();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
