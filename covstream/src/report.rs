use crate::compress::{compress, compress_run};
use crate::counters::{CounterRegion, ProfileVersion};
use crate::error::Error;
use crate::framer::CrcFramer;
use crate::transport::Transport;

/// Size of the build identifier record. A shorter build-id region is
/// treated as absent and encoded as this many zero bytes.
pub const BUILD_ID_SIZE: usize = 20;

const MARKER_START: &str = "== COVERAGE PROFILE START ==\r\n";
const MARKER_END: &str = "== COVERAGE PROFILE END ==\r\n";
const MARKER_DUMPED: &str = "== COVERAGE PROFILE DUMPED ==\r\n";
const MARKER_SKIP: &str = "== COVERAGE PROFILE SKIP ==\r\n";

/// Lifecycle of the once-per-boot report.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReportState {
    /// Fresh; counters have not been initialized yet.
    NotArmed,
    /// Counters initialized, waiting for the report call.
    Armed,
    /// The report ran. Counter memory may since have been repurposed and
    /// must not be walked again.
    Dumped,
    /// Coverage collection disabled for this boot by policy; report calls
    /// only announce the skip.
    Invalidated,
}

/// One memory vector handed over by the instrumentation runtime's
/// write-buffer callback.
///
/// A vector with no data but `use_zero_padding` set stands for
/// `element_size * element_count` zero bytes that were never materialized;
/// one with neither data nor the flag contributes nothing.
#[derive(Clone, Copy, Debug)]
pub struct ProfileVector<'a> {
    /// Backing memory, if materialized.
    pub data: Option<&'a [u8]>,
    /// Size of one element in bytes.
    pub element_size: usize,
    /// Number of elements.
    pub element_count: usize,
    /// Whether a missing `data` stands for all-zero padding.
    pub use_zero_padding: bool,
}

impl<'a> ProfileVector<'a> {
    /// Describes a materialized byte vector.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self {
            data: Some(data),
            element_size: 1,
            element_count: data.len(),
            use_zero_padding: false,
        }
    }

    /// Describes `len` bytes of never-materialized zero padding.
    pub fn zero_padding(len: usize) -> Self {
        Self {
            data: None,
            element_size: 1,
            element_count: len,
            use_zero_padding: true,
        }
    }

    fn len(&self) -> usize {
        self.element_size * self.element_count
    }
}

/// Owns the report lifecycle and the injected transport.
///
/// `init` arms the reporter exactly once per boot; `report` walks counter
/// memory exactly once, guarded by [`ReportState`]. There is no abort path:
/// a report runs to completion, and the only defense against a second walk
/// is the state machine.
#[derive(Debug)]
pub struct Reporter<T: Transport> {
    transport: T,
    state: ReportState,
}

impl<T: Transport> Reporter<T> {
    /// Creates an unarmed reporter over the injected transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ReportState::NotArmed,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReportState {
        self.state
    }

    /// The transport, e.g. for tearing the reporter down.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Arms the reporter: applies counter polarity initialization and
    /// announces readiness over the transport.
    ///
    /// Arming happens once per boot. A second call is ignored so that live
    /// counters are not wiped.
    pub fn init(&mut self, counters: &mut CounterRegion<'_>, version: ProfileVersion) {
        if self.state != ReportState::NotArmed {
            tracing::warn!("coverage runtime armed twice; keeping counter contents");
            return;
        }
        counters.initialize(version);
        self.state = ReportState::Armed;
        tracing::debug!(
            transport = self.transport.name(),
            inverted = version.inverted_polarity(),
            "coverage runtime armed"
        );
        self.transport
            .marker(&format!("COVERAGE:{}\r\n", self.transport.name()));
        self.transport.flush();
    }

    /// Disables coverage collection for this boot. Subsequent reports emit
    /// only the skip marker and never touch counter memory.
    pub fn invalidate(&mut self) {
        tracing::debug!("coverage collection invalidated for this boot");
        self.state = ReportState::Invalidated;
    }

    /// Emits the report: start marker, build-id record, every profile
    /// vector, the CRC-32 trailer, end marker.
    ///
    /// After the first call the reporter is [`ReportState::Dumped`] and
    /// later calls only emit the dumped marker; counters may have been
    /// invalidated or overwritten since the dump and are not re-walked.
    pub fn report(
        &mut self,
        build_id_region: &[u8],
        vectors: &[ProfileVector<'_>],
    ) -> Result<(), Error> {
        match self.state {
            ReportState::NotArmed => Err(Error::NotArmed),
            ReportState::Dumped => {
                self.transport.marker(MARKER_DUMPED);
                self.transport.flush();
                Ok(())
            }
            ReportState::Invalidated => {
                self.transport.marker(MARKER_SKIP);
                self.transport.flush();
                Ok(())
            }
            ReportState::Armed => {
                self.state = ReportState::Dumped;
                self.transport.marker(MARKER_START);

                let crc = {
                    let mut framer = CrcFramer::new(&mut self.transport);
                    write_build_id(&mut framer, build_id_region);
                    write_vectors(&mut framer, vectors)?;
                    framer.finalize()
                };

                // The trailer itself is outside the checksum.
                self.transport.write(&crc.to_le_bytes());
                self.transport.marker(MARKER_END);
                self.transport.flush();
                Ok(())
            }
        }
    }
}

/// Compresses the build identifier record: the last [`BUILD_ID_SIZE`] bytes
/// of the region, or that many zeros if the region is too short.
fn write_build_id(framer: &mut CrcFramer<'_>, region: &[u8]) {
    if region.len() >= BUILD_ID_SIZE {
        compress(framer, &region[region.len() - BUILD_ID_SIZE..]);
    } else {
        tracing::debug!(
            len = region.len(),
            "build-id region too short, emitting zero record"
        );
        compress_run(framer, 0x00, BUILD_ID_SIZE as u32);
    }
}

/// The write-buffer callback surface: compresses each vector in order.
fn write_vectors(framer: &mut CrcFramer<'_>, vectors: &[ProfileVector<'_>]) -> Result<(), Error> {
    for vector in vectors {
        let len = vector.len();
        match vector.data {
            Some(data) => {
                if data.len() < len {
                    return Err(Error::VectorLength {
                        expected: len,
                        actual: data.len(),
                    });
                }
                compress(framer, &data[..len]);
            }
            None if vector.use_zero_padding => {
                compress_run(framer, 0x00, len as u32);
            }
            None => {
                tracing::debug!("skipping profile vector with no data and no padding");
            }
        }
    }
    Ok(())
}
