use std::io;

use crate::transport::Transport;

/// Transport that forwards payload bytes unmodified, for media that take
/// binary bursts directly (a UART in raw mode, a file, a socket).
#[derive(Debug)]
pub struct RawTransport<W: io::Write> {
    out: W,
}

impl<W: io::Write> RawTransport<W> {
    /// Creates a raw transport over any writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the transport and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Transport for RawTransport<W> {
    fn name(&self) -> &'static str {
        "RAW"
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Err(error) = self.out.write_all(bytes) {
            tracing::warn!("raw transport write failed: {error}");
        }
    }

    fn marker(&mut self, text: &str) {
        if let Err(error) = self.out.write_all(text.as_bytes()) {
            tracing::warn!("raw transport marker failed: {error}");
        }
    }

    fn flush(&mut self) {
        if let Err(error) = self.out.flush() {
            tracing::warn!("raw transport flush failed: {error}");
        }
    }
}
