//! # Streaming encoder for sparse coverage profiles
//!
//! `covstream` packages the runtime side of a code-coverage pipeline for
//! targets that have no filesystem and only a narrow byte channel (typically
//! a serial console) to get data out. Coverage counter arrays are large and
//! mostly uniform, so the encoder run-length compresses `0x00`/`0xFF` spans,
//! checksums everything it emits, and frames one report per boot:
//!
//! ```text
//! [build-id record][counter records...][CRC-32 trailer]
//! ```
//!
//! The byte-accepting endpoint is a [`Transport`]; hex-console, raw, logging
//! and no-op implementations are provided and selected by dependency
//! injection (see [`TransportKind`]). Decoding the stream is the host tool's
//! job and deliberately not part of this crate.
//!
//! ## Example
//!
//! ```
//! use covstream::{CounterRegion, ProfileVector, ProfileVersion, Reporter};
//! use covstream::transport::BufferTransport;
//!
//! // Counter memory is owned by the instrumentation runtime; the encoder
//! // only borrows it.
//! let mut memory = [0u8; 16];
//! let mut counters = CounterRegion::new(&mut memory)?;
//!
//! let mut reporter = Reporter::new(BufferTransport::new());
//! reporter.init(&mut counters, ProfileVersion::default());
//!
//! // ... the instrumented program runs and records hits ...
//!
//! let vectors = [ProfileVector::from_slice(counters.as_bytes())];
//! reporter.report(b"", &vectors)?;
//!
//! let captured = reporter.into_transport();
//! assert!(!captured.bytes.is_empty());
//! # Ok::<(), covstream::Error>(())
//! ```

pub mod compress;
#[warn(missing_docs)]
mod counters;
mod error;
#[warn(missing_docs)]
pub mod framer;
#[warn(missing_docs)]
mod report;
pub mod transport;

pub use crate::counters::{CounterRegion, ProfileVersion};
pub use crate::error::Error;
pub use crate::framer::CrcFramer;
pub use crate::report::{ProfileVector, ReportState, Reporter, BUILD_ID_SIZE};
pub use crate::transport::{
    BufferTransport, HexTransport, LogTransport, NoopTransport, RawTransport, Transport,
    TransportKind,
};
