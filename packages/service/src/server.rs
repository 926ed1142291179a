//! Socket transport for the control channel.
//!
//! One accept thread per bound socket, one thread per connection up to a
//! fixed limit. Each connection carries any number of fixed-size request
//! frames, answered in order with fixed-size response frames.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::Shutdown;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fsinfo_wire::{
    RequestFrame, ResponseFrame, Status, UserBuffer, RECORD_SIZE, REQUEST_FRAME_SIZE,
};

use crate::ControlChannel;

type Connections = Arc<Mutex<HashMap<u64, UnixStream>>>;

/// Connections served at once by a [`Server`] unless told otherwise.
pub const DEFAULT_MAX_CONNECTIONS: usize = 64;

/// How often an idle accept loop checks for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Pause after a failed `accept`, e.g. when out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A listening socket with its accept thread.
pub struct Server {
    path: PathBuf,
    shutdown: Arc<AtomicBool>,
    connections: Connections,
    thread: Option<JoinHandle<()>>,
}

impl Server {
    /// Bind `path` and start accepting. Any stale file at `path` is replaced.
    pub fn bind(path: &Path, channel: Arc<ControlChannel>) -> io::Result<Self> {
        Self::bind_with_limit(path, channel, DEFAULT_MAX_CONNECTIONS)
    }

    /// Like [`Server::bind`], serving at most `max_connections` peers at
    /// once. Peers beyond the limit are hung up on straight away.
    pub fn bind_with_limit(
        path: &Path,
        channel: Arc<ControlChannel>,
        max_connections: usize,
    ) -> io::Result<Self> {
        match std::fs::remove_file(path) {
            Ok(()) => log::debug!("removed stale socket {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        let listener = UnixListener::bind(path)?;
        // The accept loop polls so that shutdown never depends on the
        // socket file still being reachable.
        if let Err(e) = listener.set_nonblocking(true) {
            let _ = std::fs::remove_file(path);
            return Err(e);
        }

        let shutdown = Arc::new(AtomicBool::new(false));
        let connections: Connections = Arc::new(Mutex::new(HashMap::new()));

        let thread = {
            let acceptor = Acceptor {
                listener,
                channel,
                shutdown: shutdown.clone(),
                connections: connections.clone(),
                max_connections,
            };
            thread::Builder::new()
                .name("fsinfo-accept".to_string())
                .spawn(move || acceptor.run())
        };
        let thread = match thread {
            Ok(thread) => thread,
            Err(e) => {
                let _ = std::fs::remove_file(path);
                return Err(e);
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            shutdown,
            connections,
            thread: Some(thread),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop accepting, hang up on open connections and remove the socket.
    ///
    /// A socket file that has already disappeared is not an error.
    pub fn shutdown(mut self) -> io::Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> io::Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        self.shutdown.store(true, Ordering::SeqCst);
        if thread.join().is_err() {
            log::error!("accept thread panicked");
        }

        let open = std::mem::take(
            &mut *self
                .connections
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for stream in open.values() {
            let _ = stream.shutdown(Shutdown::Both);
        }

        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("socket {} was already removed", self.path.display());
                Ok(())
            }
            other => other,
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("failed to clean up {}: {}", self.path.display(), e);
        }
    }
}

struct Acceptor {
    listener: UnixListener,
    channel: Arc<ControlChannel>,
    shutdown: Arc<AtomicBool>,
    connections: Connections,
    max_connections: usize,
}

impl Acceptor {
    fn run(self) {
        let mut next_id = 0u64;
        while !self.shutdown.load(Ordering::SeqCst) {
            let stream = match self.listener.accept() {
                Ok((stream, _)) => stream,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(POLL_INTERVAL);
                    continue;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("accept failed: {}", e);
                    thread::sleep(ACCEPT_BACKOFF);
                    continue;
                }
            };

            let id = next_id;
            next_id += 1;
            self.spawn_connection(id, stream);
        }
        log::debug!("accept loop finished");
    }

    fn spawn_connection(&self, id: u64, stream: UnixStream) {
        if let Err(e) = stream.set_nonblocking(false) {
            log::warn!("dropping connection {}: {}", id, e);
            return;
        }

        {
            let mut open = self
                .connections
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if open.len() >= self.max_connections {
                log::warn!(
                    "refusing connection {}: {} already open",
                    id,
                    self.max_connections
                );
                return;
            }
            match stream.try_clone() {
                Ok(tracked) => {
                    open.insert(id, tracked);
                }
                Err(e) => {
                    log::warn!("dropping connection {}: {}", id, e);
                    return;
                }
            }
        }

        let channel = self.channel.clone();
        let connections = self.connections.clone();
        let spawned = thread::Builder::new()
            .name(format!("fsinfo-conn-{}", id))
            .spawn(move || {
                if let Err(e) = serve_connection(&channel, stream) {
                    log::debug!("connection {} closed: {}", id, e);
                }
                connections
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&id);
            });
        if let Err(e) = spawned {
            log::error!("failed to spawn connection thread: {}", e);
            self.connections
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
        }
    }
}

enum FrameRead {
    Complete,
    Eof,
    Short(usize),
}

fn read_frame(stream: &mut impl Read, buf: &mut [u8]) -> io::Result<FrameRead> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(FrameRead::Eof),
            Ok(0) => return Ok(FrameRead::Short(filled)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(FrameRead::Complete)
}

/// Answer request frames on `stream` until the peer hangs up.
///
/// A truncated request frame means the caller's buffer never fully arrived:
/// it is answered with a boundary fault and the connection is closed.
pub fn serve_connection<T: Read + Write>(
    channel: &ControlChannel,
    mut stream: T,
) -> io::Result<()> {
    let mut raw = [0u8; REQUEST_FRAME_SIZE];
    loop {
        match read_frame(&mut stream, &mut raw)? {
            FrameRead::Eof => return Ok(()),
            FrameRead::Short(got) => {
                log::debug!(
                    "short request frame: {} of {} bytes",
                    got,
                    REQUEST_FRAME_SIZE
                );
                let reply = ResponseFrame::new(Status::BoundaryFault, [0u8; RECORD_SIZE]);
                stream.write_all(&reply.encode())?;
                return stream.flush();
            }
            FrameRead::Complete => {}
        }

        let mut frame = RequestFrame::decode(&raw);
        let status = channel.call_status(
            frame.selector,
            &mut UserBuffer::Writable(&mut frame.record[..]),
        );
        // On failure the record is still exactly what the caller sent.
        let reply = ResponseFrame::new(status, frame.record);
        stream.write_all(&reply.encode())?;
        stream.flush()?;
    }
}
