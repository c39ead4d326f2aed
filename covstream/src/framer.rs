//! Streaming CRC framer between the compressor and the transport.

use crc::{Crc, Digest, CRC_32_ISO_HDLC};

use crate::transport::Transport;

/// IEEE CRC-32 (init `0xFFFF_FFFF`, reflected, final xor), the checksum the
/// host tooling re-derives over the captured payload.
static CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Size of the staging buffer. Bounds a single transport burst and the
/// working set of a report regardless of payload size.
const STAGING_SIZE: usize = 0x100;

/// Sink-with-crc: forwards bytes to the transport while accumulating the
/// report checksum over exactly those bytes.
///
/// Input of any length is staged through a fixed buffer so that the source
/// memory (possibly live counters or access-width-sensitive ROM) is read
/// once, in order, and the transport only ever sees bounded chunks.
///
/// A framer is scoped to a single report: construct it when the dump
/// starts, [`finalize`](Self::finalize) it to obtain the trailer value.
pub struct CrcFramer<'a> {
    transport: &'a mut dyn Transport,
    digest: Digest<'static, u32>,
    staging: [u8; STAGING_SIZE],
}

impl<'a> CrcFramer<'a> {
    /// Starts a fresh frame over `transport` with a reset checksum.
    pub fn new(transport: &'a mut dyn Transport) -> Self {
        Self {
            transport,
            digest: CRC32.digest(),
            staging: [0; STAGING_SIZE],
        }
    }

    /// Writes `data` to the transport and folds it into the checksum.
    ///
    /// There is no length limit; the data is forwarded in staging-buffer
    /// sized chunks.
    pub fn write(&mut self, data: &[u8]) {
        for chunk in data.chunks(STAGING_SIZE) {
            self.staging[..chunk.len()].copy_from_slice(chunk);
            let staged = &self.staging[..chunk.len()];
            self.digest.update(staged);
            self.transport.write(staged);
        }
    }

    /// Ends the frame and returns the CRC-32 over every byte written
    /// through it, in emission order.
    pub fn finalize(self) -> u32 {
        self.digest.finalize()
    }
}
