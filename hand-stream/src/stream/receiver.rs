//! Stream receiver
//!
//! Binds a UDP or TCP socket and feeds every complete line into the shared
//! `HandStateStore` from a background thread. Socket reads use a bounded
//! wait so a cancelled `StopToken` is observed within one poll interval.

use super::framer::{split_datagram, Framed, LineFramer};
use super::stats::{RateMeter, ReceiverStats};
use crate::app::config::{Protocol, TransportConfig};
use crate::hand::HandStateStore;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Bound on waiting for the receiver thread at stop
pub const RECEIVER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Bound on waiting for each connection thread at stop
pub const CONNECTION_JOIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Sleep between non-blocking accept attempts
const ACCEPT_BACKOFF: Duration = Duration::from_millis(20);

const JOIN_POLL: Duration = Duration::from_millis(5);

/// Shared cooperative cancellation flag
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Framing, parsing and store updates for received bytes.
///
/// Cheap to clone; each receive thread holds its own copy.
#[derive(Debug, Clone)]
pub struct Ingestor {
    store: Arc<HandStateStore>,
    stats: Arc<ReceiverStats>,
}

impl Ingestor {
    pub fn new(store: Arc<HandStateStore>, stats: Arc<ReceiverStats>) -> Self {
        Self { store, stats }
    }

    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// Parse and apply one line. Returns true if a hand was updated.
    pub fn handle_line(&self, line: &str) -> bool {
        let applied = self.store.ingest_line(line);
        if !applied {
            trace!(line, "ignored line");
        }
        self.stats.record_line(applied);
        applied
    }

    /// Handle one datagram. Returns the number of lines it carried.
    pub fn handle_datagram(&self, datagram: &[u8]) -> usize {
        self.stats.record_chunk(datagram.len());
        match split_datagram(datagram) {
            Some(lines) => {
                for line in &lines {
                    self.handle_line(line);
                }
                lines.len()
            }
            None => {
                self.stats.chunks_undecodable.fetch_add(1, Ordering::Relaxed);
                debug!(bytes = datagram.len(), "dropped undecodable datagram");
                0
            }
        }
    }

    /// Handle one stream read.
    ///
    /// Returns the number of lines completed, or `None` at end of stream.
    pub fn handle_stream_chunk(&self, framer: &mut LineFramer, chunk: &[u8]) -> Option<usize> {
        match framer.push(chunk) {
            Framed::EndOfStream => None,
            Framed::Undecodable => {
                self.stats.record_chunk(chunk.len());
                self.stats.chunks_undecodable.fetch_add(1, Ordering::Relaxed);
                debug!(bytes = chunk.len(), "dropped undecodable chunk");
                Some(0)
            }
            Framed::Lines(lines) => {
                self.stats.record_chunk(chunk.len());
                for line in &lines {
                    self.handle_line(line);
                }
                Some(lines.len())
            }
        }
    }
}

/// Background socket receiver feeding a `HandStateStore`
pub struct StreamReceiver {
    config: TransportConfig,
    ingestor: Ingestor,
    stop: StopToken,
    thread_handle: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl StreamReceiver {
    pub fn new(config: TransportConfig, store: Arc<HandStateStore>, stop: StopToken) -> Self {
        Self {
            config,
            ingestor: Ingestor::new(store, Arc::new(ReceiverStats::default())),
            stop,
            thread_handle: None,
            local_addr: None,
        }
    }

    /// Bind the socket and start the receive thread.
    ///
    /// Binding happens before this returns, so a bind failure is reported
    /// here as `Error::Bind`. Returns the bound local address.
    pub fn start(&mut self) -> crate::Result<SocketAddr> {
        if self.thread_handle.is_some() {
            return Err(crate::Error::Receiver("receiver already started".into()));
        }

        let (local_addr, handle) = match self.config.protocol {
            Protocol::Udp => self.start_udp()?,
            Protocol::Tcp => self.start_tcp()?,
        };

        info!(
            protocol = %self.config.protocol,
            addr = %local_addr,
            "Stream receiver listening"
        );
        self.local_addr = Some(local_addr);
        self.thread_handle = Some(handle);
        Ok(local_addr)
    }

    fn bind_error(&self, source: io::Error) -> crate::Error {
        crate::Error::Bind {
            protocol: self.config.protocol,
            addr: self.config.bind_addr(),
            source,
        }
    }

    fn start_udp(&self) -> crate::Result<(SocketAddr, JoinHandle<()>)> {
        let socket = UdpSocket::bind((self.config.host.as_str(), self.config.port))
            .map_err(|e| self.bind_error(e))?;
        socket.set_read_timeout(Some(self.config.poll_interval()))?;
        let local_addr = socket.local_addr()?;

        let ingestor = self.ingestor.clone();
        let stop = self.stop.clone();
        let buffer_size = self.config.max_datagram_bytes;
        let handle = spawn_named("stream-receiver", move || {
            run_udp_loop(socket, ingestor, stop, buffer_size)
        })?;
        Ok((local_addr, handle))
    }

    fn start_tcp(&self) -> crate::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))
            .map_err(|e| self.bind_error(e))?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        let ingestor = self.ingestor.clone();
        let stop = self.stop.clone();
        let config = self.config.clone();
        let handle = spawn_named("stream-receiver", move || {
            run_tcp_accept_loop(listener, ingestor, stop, config)
        })?;
        Ok((local_addr, handle))
    }

    /// Request shutdown and wait a bounded time for the receive thread.
    ///
    /// Cancels the shared token, so every holder of it observes the stop.
    pub fn stop(&mut self) {
        self.stop.cancel();
        let Some(handle) = self.thread_handle.take() else {
            return;
        };
        join_with_timeout(handle, RECEIVER_JOIN_TIMEOUT, "stream-receiver");

        let stats = self.ingestor.stats().snapshot();
        info!(
            lines = stats.lines_received,
            applied = stats.records_applied,
            ignored = stats.lines_ignored,
            "Stream receiver stopped"
        );
    }

    /// True while the receive thread is alive
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Address the socket is bound to, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn stats(&self) -> &ReceiverStats {
        self.ingestor.stats()
    }

    pub fn stop_token(&self) -> &StopToken {
        &self.stop
    }
}

impl Drop for StreamReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_named<F>(name: &str, body: F) -> crate::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.into())
        .spawn(body)
        .map_err(|e| crate::Error::Receiver(format!("Failed to spawn {} thread: {}", name, e)))
}

/// Read timeouts surface as `WouldBlock` on Unix and `TimedOut` on Windows.
fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// Wait for `handle` until `timeout`, then give up and detach it.
/// Returns true if the thread finished in time.
fn join_with_timeout(handle: JoinHandle<()>, timeout: Duration, what: &str) -> bool {
    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            warn!(thread = what, ?timeout, "Thread did not stop in time, detaching");
            return false;
        }
        thread::sleep(JOIN_POLL);
    }
    if handle.join().is_err() {
        warn!(thread = what, "Thread panicked");
    }
    true
}

fn run_udp_loop(socket: UdpSocket, ingestor: Ingestor, stop: StopToken, buffer_size: usize) {
    let mut buffer = vec![0u8; buffer_size];
    let mut rate = RateMeter::per_second();

    while !stop.is_cancelled() {
        match socket.recv_from(&mut buffer) {
            Ok((len, peer)) => {
                trace!(%peer, bytes = len, "datagram");
                let lines = ingestor.handle_datagram(&buffer[..len]);
                rate.add(lines as u64);
            }
            Err(e) if is_transient(&e) => {}
            Err(e) => {
                warn!(error = %e, "UDP receive failed, stopping receiver");
                break;
            }
        }
        if let Some(count) = rate.poll(Instant::now()) {
            debug!(messages_per_sec = count, "udp receive rate");
        }
    }
}

fn run_tcp_accept_loop(
    listener: TcpListener,
    ingestor: Ingestor,
    stop: StopToken,
    config: TransportConfig,
) {
    let backoff = ACCEPT_BACKOFF.min(config.poll_interval());
    let mut connections: Vec<JoinHandle<()>> = Vec::new();

    while !stop.is_cancelled() {
        match listener.accept() {
            Ok((stream, peer)) => {
                ingestor
                    .stats()
                    .connections_accepted
                    .fetch_add(1, Ordering::Relaxed);
                info!(%peer, "Accepted connection");
                match spawn_connection(stream, peer, &ingestor, &stop, &config) {
                    Ok(handle) => connections.push(handle),
                    Err(e) => {
                        warn!(%peer, error = %e, "Dropping connection");
                        ingestor
                            .stats()
                            .connections_closed
                            .fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => thread::sleep(backoff),
            Err(e) if is_transient(&e) => {}
            Err(e) => {
                warn!(error = %e, "TCP accept failed, stopping receiver");
                break;
            }
        }
        connections.retain(|handle| !handle.is_finished());
    }

    for handle in connections {
        join_with_timeout(handle, CONNECTION_JOIN_TIMEOUT, "stream-connection");
    }
}

fn spawn_connection(
    stream: TcpStream,
    peer: SocketAddr,
    ingestor: &Ingestor,
    stop: &StopToken,
    config: &TransportConfig,
) -> crate::Result<JoinHandle<()>> {
    // Accepted sockets inherit non-blocking mode on some platforms
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(config.poll_interval()))?;

    let ingestor = ingestor.clone();
    let stop = stop.clone();
    let chunk_size = config.read_chunk_bytes;
    spawn_named("stream-connection", move || {
        serve_connection(stream, peer, ingestor, stop, chunk_size)
    })
}

fn serve_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    ingestor: Ingestor,
    stop: StopToken,
    chunk_size: usize,
) {
    let mut framer = LineFramer::new();
    let mut buffer = vec![0u8; chunk_size];
    let mut rate = RateMeter::per_second();

    while !stop.is_cancelled() {
        match stream.read(&mut buffer) {
            Ok(len) => match ingestor.handle_stream_chunk(&mut framer, &buffer[..len]) {
                Some(lines) => rate.add(lines as u64),
                None => {
                    info!(%peer, "Connection closed by peer");
                    break;
                }
            },
            Err(e) if is_transient(&e) => {}
            Err(e) => {
                warn!(%peer, error = %e, "Connection read failed");
                break;
            }
        }
        if let Some(count) = rate.poll(Instant::now()) {
            debug!(%peer, messages_per_sec = count, "tcp receive rate");
        }
    }

    if !framer.pending().is_empty() {
        debug!(%peer, bytes = framer.pending().len(), "discarding unterminated line");
    }
    ingestor
        .stats()
        .connections_closed
        .fetch_add(1, Ordering::Relaxed);
}
