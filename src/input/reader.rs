//! Background reader thread feeding the decoder.
//!
//! The thread performs blocking reads on its source and pushes decoded
//! events into the shared [`InputState`]. On a raw-mode tty reads return
//! every 100ms even without input, so the stop flag is seen promptly; a
//! read that never returns is tolerated and the join gives up after a
//! timeout.

use crate::error::{Error, Result};
use crate::input::parser::{EscapeDecoder, InputEvent};
use crate::input::state::InputState;
use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const READ_BUF_SIZE: usize = 1024;

/// How long [`InputReader::stop`] waits for the thread to exit.
pub const JOIN_TIMEOUT: Duration = Duration::from_millis(150);

/// Pause after an empty read before trying again.
const IDLE_SLEEP: Duration = Duration::from_millis(5);

/// Handle to the reader thread.
pub struct InputReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    reset: Arc<AtomicBool>,
    done_rx: Option<Receiver<()>>,
}

impl InputReader {
    /// Read from stdin.
    pub fn spawn_stdin(state: Arc<InputState>) -> Result<Self> {
        Self::spawn(io::stdin(), state)
    }

    /// Start reading from `source` on a thread named `input-reader`.
    pub fn spawn<R>(source: R, state: Arc<InputState>) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let reset = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = mpsc::channel();

        let stop_flag = Arc::clone(&stop);
        let reset_flag = Arc::clone(&reset);
        let handle = thread::Builder::new()
            .name("input-reader".to_string())
            .spawn(move || {
                reader_loop(source, &state, &stop_flag, &reset_flag);
                let _ = done_tx.send(());
            })
            .map_err(|err| Error::ThreadSpawn(err.to_string()))?;

        debug!("input reader started");
        Ok(Self {
            handle: Some(handle),
            stop,
            reset,
            done_rx: Some(done_rx),
        })
    }

    /// Ask the thread to drop any partial escape sequence before its next
    /// byte.
    pub fn request_reset(&self) {
        self.reset.store(true, Ordering::Release);
    }

    /// Whether the thread has exited on its own (EOF or read error).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signal the thread and wait up to [`JOIN_TIMEOUT`] for it.
    ///
    /// A thread stuck in a read is detached. Calling this twice is a no-op.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return;
        };
        let exited = self
            .done_rx
            .take()
            .is_some_and(|rx| rx.recv_timeout(JOIN_TIMEOUT).is_ok() || handle.is_finished());
        if exited {
            let _ = handle.join();
            debug!("input reader stopped");
        } else {
            warn!(timeout = ?JOIN_TIMEOUT, "input reader did not exit, detaching");
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn reader_loop<R: Read>(
    mut source: R,
    state: &InputState,
    stop: &AtomicBool,
    reset: &AtomicBool,
) {
    let mut decoder = EscapeDecoder::new();
    let mut buf = [0u8; READ_BUF_SIZE];

    while !stop.load(Ordering::Acquire) {
        let n = match source.read(&mut buf) {
            Ok(0) => {
                thread::sleep(IDLE_SLEEP);
                continue;
            }
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(IDLE_SLEEP);
                continue;
            }
            Err(err) => {
                warn!(%err, "input read failed, reader exiting");
                break;
            }
        };

        if reset.swap(false, Ordering::AcqRel) {
            decoder.reset();
        }
        decoder.feed(&buf[..n], &mut |event| dispatch(state, event));
    }
}

fn dispatch(state: &InputState, event: InputEvent) {
    match event {
        InputEvent::Key(key) => state.enqueue_key(key),
        InputEvent::Mouse(report) => state.apply_mouse(&report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent};
    use std::io::Cursor;
    use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
    use std::time::Instant;

    /// Hands out one chunk per read, reporting `Ok(0)` while nothing is sent.
    struct ChunkSource(Receiver<Vec<u8>>);

    impl Read for ChunkSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.recv_timeout(Duration::from_millis(5)) {
                Ok(bytes) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    Ok(n)
                }
                Err(RecvTimeoutError::Timeout) => Ok(0),
                Err(RecvTimeoutError::Disconnected) => Err(io::ErrorKind::UnexpectedEof.into()),
            }
        }
    }

    /// Rendezvous channel: the second send returns only once the reader has
    /// finished with the first chunk.
    fn chunk_source() -> (SyncSender<Vec<u8>>, ChunkSource) {
        let (tx, rx) = mpsc::sync_channel(0);
        (tx, ChunkSource(rx))
    }

    fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn test_reader_feeds_state() {
        let state = Arc::new(InputState::new());
        let source = Cursor::new(b"w\x1b[<0;5;6M\x1b[A".to_vec());
        let mut reader = InputReader::spawn(source, Arc::clone(&state)).unwrap();

        assert!(wait_for(|| state.pending_keys() == 2));
        assert_eq!(state.try_dequeue_key(), Some(KeyEvent::char('w')));
        assert_eq!(state.try_dequeue_key(), Some(KeyEvent::key(KeyCode::Up)));
        let snap = state.snapshot();
        assert!(snap.left_down);
        assert_eq!((snap.mouse_x, snap.mouse_y), (4, 5));

        reader.stop();
        assert!(reader.is_finished());
    }

    #[test]
    fn test_reset_drops_split_mouse_prefix() {
        let state = Arc::new(InputState::new());
        let (tx, source) = chunk_source();
        let mut reader = InputReader::spawn(source, Arc::clone(&state)).unwrap();

        tx.send(b"\x1b[<0;1".to_vec()).unwrap();
        tx.send(Vec::new()).unwrap();
        reader.request_reset();
        tx.send(b"0;5M".to_vec()).unwrap();

        assert!(wait_for(|| state.pending_keys() == 4));
        for ch in ['0', ';', '5', 'M'] {
            assert_eq!(state.try_dequeue_key(), Some(KeyEvent::char(ch)));
        }
        assert!(!state.snapshot().left_down);

        drop(tx);
        reader.stop();
    }

    #[test]
    fn test_split_mouse_report_without_reset() {
        let state = Arc::new(InputState::new());
        let (tx, source) = chunk_source();
        let mut reader = InputReader::spawn(source, Arc::clone(&state)).unwrap();

        tx.send(b"\x1b[<0;1".to_vec()).unwrap();
        tx.send(b"0;5M".to_vec()).unwrap();

        assert!(wait_for(|| state.snapshot().left_down));
        assert_eq!(state.pending_keys(), 0);

        drop(tx);
        reader.stop();
    }

    #[test]
    fn test_read_error_ends_thread() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("gone"))
            }
        }
        let state = Arc::new(InputState::new());
        let reader = InputReader::spawn(Failing, state).unwrap();
        assert!(wait_for(|| reader.is_finished()));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let state = Arc::new(InputState::new());
        let mut reader = InputReader::spawn(io::empty(), state).unwrap();
        reader.stop();
        reader.stop();
        assert!(reader.is_finished());
    }
}
