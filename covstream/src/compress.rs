//! Run-length escape compression for counter memory.
//!
//! Counter arrays are dominated by long runs of `0x00` (or `0xFF` under
//! inverted polarity). The encoder replaces those runs with a tag byte and
//! a size field; everything else is copied verbatim. Because a literal span
//! by construction never contains `0x00` or `0xFF`, the stream needs no
//! terminators: the decoder tells records apart by the byte value alone.
//!
//! Wire layout of a run header, chosen so common short runs cost 2 bytes:
//!
//! ```text
//! size <= 0xFD:    [tag][size]
//! size <= 0xFFFF:  [tag][0xFE][size as u16 LE]
//! otherwise:       [tag][0xFF][size as u32 LE]
//! ```
//!
//! The `0xFE`/`0xFF` marker only selects the width of the size field that
//! follows a tag; it is never itself a tag.

use crate::framer::CrcFramer;

/// Largest run size that fits the single-byte tier. `0xFE` and `0xFF`
/// would collide with the width markers and must use the wider tiers.
const SHORT_RUN_MAX: u32 = 0xFD;

/// Emits `data` through the framer as literal spans and `0x00`/`0xFF` run
/// headers. Concatenating the decoded records reproduces `data` exactly.
pub fn compress(framer: &mut CrcFramer<'_>, data: &[u8]) {
    let mut i = 0;
    while i < data.len() {
        // Literal span: neither 0x00 nor 0xFF.
        let start = i;
        while i < data.len() && data[i] != 0x00 && data[i] != 0xff {
            i += 1;
        }
        if i > start {
            framer.write(&data[start..i]);
        }

        // Ones run.
        let start = i;
        while i < data.len() && data[i] == 0xff {
            i += 1;
        }
        if i > start {
            compress_run(framer, 0xff, (i - start) as u32);
        }

        // Zero run.
        let start = i;
        while i < data.len() && data[i] == 0x00 {
            i += 1;
        }
        if i > start {
            compress_run(framer, 0x00, (i - start) as u32);
        }
    }
}

/// Emits a header for `size` repetitions of `tag` (`0x00` or `0xFF`).
///
/// A zero-size run is never put on the wire; callers dumping degenerate
/// regions simply get no output.
pub fn compress_run(framer: &mut CrcFramer<'_>, tag: u8, size: u32) {
    debug_assert!(tag == 0x00 || tag == 0xff);
    if size == 0 {
        return;
    }

    let mut header = [0u8; 6];
    header[0] = tag;
    let header: &[u8] = if size <= SHORT_RUN_MAX {
        header[1] = size as u8;
        &header[..2]
    } else if size <= 0xffff {
        header[1] = 0xfe;
        header[2..4].copy_from_slice(&(size as u16).to_le_bytes());
        &header[..4]
    } else {
        header[1] = 0xff;
        header[2..6].copy_from_slice(&size.to_le_bytes());
        &header[..6]
    };
    framer.write(header);
}
