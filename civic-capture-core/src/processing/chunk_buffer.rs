use std::sync::Arc;

use parking_lot::Mutex;

use crate::traits::capture_provider::{AudioStream, StreamHandle};

/// Append-only buffer of encoded audio chunks.
///
/// A platform recorder delivers chunks from its own callback thread; the
/// session drains everything once recording stops. Chunks pushed after
/// [`close`](Self::close) are dropped.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
    closed: bool,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Returns `false` if the buffer is closed.
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        if self.closed {
            return false;
        }
        if chunk.is_empty() {
            return true;
        }
        self.total_bytes += chunk.len();
        self.chunks.push(chunk.to_vec());
        true
    }

    /// Remove and concatenate everything buffered so far.
    pub fn take(&mut self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks.drain(..) {
            out.extend_from_slice(&chunk);
        }
        self.total_bytes = 0;
        out
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of chunks currently buffered.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.total_bytes == 0
    }
}

/// Producer side of a [`BufferedAudioStream`], handed to the platform callback.
#[derive(Debug, Clone)]
pub struct ChunkSink {
    buffer: Arc<Mutex<ChunkBuffer>>,
}

impl ChunkSink {
    /// Deliver a chunk. Returns `false` once the stream has been stopped.
    pub fn push(&self, chunk: &[u8]) -> bool {
        self.buffer.lock().push(chunk)
    }
}

/// [`AudioStream`] backed by a shared [`ChunkBuffer`].
///
/// Backends wrap their platform recorder with this: the recorder writes
/// through the [`ChunkSink`], and `on_stop` releases the microphone.
pub struct BufferedAudioStream {
    buffer: Arc<Mutex<ChunkBuffer>>,
    on_stop: Option<Box<dyn FnOnce() + Send>>,
}

impl BufferedAudioStream {
    pub fn new(on_stop: impl FnOnce() + Send + 'static) -> (Self, ChunkSink) {
        let buffer = Arc::new(Mutex::new(ChunkBuffer::new()));
        let sink = ChunkSink {
            buffer: Arc::clone(&buffer),
        };
        let stream = Self {
            buffer,
            on_stop: Some(Box::new(on_stop)),
        };
        (stream, sink)
    }

    pub fn is_stopped(&self) -> bool {
        self.on_stop.is_none()
    }
}

impl StreamHandle for BufferedAudioStream {
    /// Runs `on_stop` before closing the buffer, so a recorder that flushes
    /// its last chunk while stopping still lands in the clip.
    fn stop(&mut self) {
        if let Some(on_stop) = self.on_stop.take() {
            on_stop();
        }
        self.buffer.lock().close();
    }
}

impl AudioStream for BufferedAudioStream {
    fn take_buffered(&mut self) -> Vec<u8> {
        self.buffer.lock().take()
    }
}

impl Drop for BufferedAudioStream {
    fn drop(&mut self) {
        self.stop();
    }
}
