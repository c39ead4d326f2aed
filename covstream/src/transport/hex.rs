use std::io;

use crate::transport::Transport;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Console transport rendering each payload byte as two lowercase hex
/// digits with no separators, the way serial-console log capture expects.
/// Marker lines pass through verbatim.
#[derive(Debug)]
pub struct HexTransport<W: io::Write> {
    out: W,
}

impl<W: io::Write> HexTransport<W> {
    /// Creates a hex transport over any writer, e.g. stdout or a UART
    /// device file.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the transport and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Transport for HexTransport<W> {
    fn name(&self) -> &'static str {
        "HEX"
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut rendered = Vec::with_capacity(bytes.len() * 2);
        for byte in bytes {
            rendered.push(HEX_DIGITS[usize::from(byte >> 4)]);
            rendered.push(HEX_DIGITS[usize::from(byte & 0xf)]);
        }
        if let Err(error) = self.out.write_all(&rendered) {
            tracing::warn!("hex transport write failed: {error}");
        }
    }

    fn marker(&mut self, text: &str) {
        if let Err(error) = self.out.write_all(text.as_bytes()) {
            tracing::warn!("hex transport marker failed: {error}");
        }
    }

    fn flush(&mut self) {
        if let Err(error) = self.out.flush() {
            tracing::warn!("hex transport flush failed: {error}");
        }
    }
}
