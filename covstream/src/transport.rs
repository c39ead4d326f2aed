//! The byte-accepting endpoint of a coverage report.
//!
//! A [`Transport`] is the only thing the encoder knows about the outside
//! world. Payload bytes and human-readable markers take separate paths
//! because the receiving side frames the hex payload with the marker lines:
//! payload rendering (e.g. two hex digits per byte) is a transport concern,
//! marker text is a verbatim contract with the host tooling.
//!
//! Implementations are interchangeable and picked by the embedding code,
//! usually through [`TransportKind`].

mod hex;
mod log;
mod noop;
mod raw;

pub use hex::HexTransport;
pub use log::LogTransport;
pub use noop::NoopTransport;
pub use raw::RawTransport;

use std::io;
use std::str::FromStr;

/// A byte pipe that a coverage report is emitted through.
///
/// `write` must accept arbitrary non-empty slices and may block until the
/// medium drains; there is no failure signaling back to the encoder, which
/// assumes success. Implementations that sit on fallible I/O log failures
/// and carry on.
pub trait Transport {
    /// Short identifier announced when the runtime arms, e.g. `HEX`.
    fn name(&self) -> &'static str;

    /// Writes encoded payload bytes, rendered as the medium expects but in
    /// exactly the given order, with no padding or reordering.
    fn write(&mut self, bytes: &[u8]);

    /// Writes a marker line outside the encoded payload, verbatim.
    fn marker(&mut self, text: &str);

    /// Blocks until previously written bytes have been accepted by the
    /// medium. The default does nothing.
    fn flush(&mut self) {}
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn write(&mut self, bytes: &[u8]) {
        (**self).write(bytes)
    }

    fn marker(&mut self, text: &str) {
        (**self).marker(text)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

/// The transport implementations selectable by configuration.
#[derive(Clone, Copy, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Two lowercase hex digits per payload byte ([`HexTransport`]).
    Hex,
    /// Payload bytes exactly as given ([`RawTransport`]).
    Raw,
    /// Payload and markers through the logging subsystem ([`LogTransport`]).
    Log,
    /// Discards everything ([`NoopTransport`]).
    Noop,
}

impl TransportKind {
    /// Builds the transport over `writer`. The log and no-op variants have
    /// no underlying medium and drop the writer.
    pub fn create<W: io::Write + 'static>(self, writer: W) -> Box<dyn Transport> {
        match self {
            TransportKind::Hex => Box::new(HexTransport::new(writer)),
            TransportKind::Raw => Box::new(RawTransport::new(writer)),
            TransportKind::Log => Box::new(LogTransport::new()),
            TransportKind::Noop => Box::new(NoopTransport),
        }
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hex" => Ok(TransportKind::Hex),
            "raw" => Ok(TransportKind::Raw),
            "log" => Ok(TransportKind::Log),
            "noop" | "none" => Ok(TransportKind::Noop),
            _ => Err(format!("Transport '{s}' is unknown.")),
        }
    }
}

/// In-memory transport capturing payload and markers separately.
///
/// Used by the test suites of this crate and available to embedders that
/// want to stage a report before handing it to another medium.
#[derive(Debug, Default)]
pub struct BufferTransport {
    /// Captured payload bytes, in emission order.
    pub bytes: Vec<u8>,
    /// Captured marker lines, in emission order.
    pub markers: Vec<String>,
}

impl BufferTransport {
    /// Creates an empty capture buffer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for BufferTransport {
    fn name(&self) -> &'static str {
        "BUFFER"
    }

    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn marker(&mut self, text: &str) {
        self.markers.push(text.to_string());
    }
}
