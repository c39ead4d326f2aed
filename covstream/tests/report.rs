//! Full-report scenarios: wire grammar round-trips, checksum coverage and
//! the once-only lifecycle, exercised through the public API only.

use crc::{Crc, CRC_32_ISO_HDLC};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use covstream::transport::BufferTransport;
use covstream::{
    CounterRegion, CrcFramer, HexTransport, ProfileVector, ProfileVersion, ReportState, Reporter,
    BUILD_ID_SIZE,
};

/// Reference decoder for the escape grammar. Host tooling owns the real
/// one; this exists only to check the encoder against the grammar.
fn decode(stream: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < stream.len() {
        let byte = stream[i];
        if byte == 0x00 || byte == 0xff {
            let (size, advance) = match stream[i + 1] {
                0xfe => (
                    usize::from(u16::from_le_bytes([stream[i + 2], stream[i + 3]])),
                    4,
                ),
                0xff => (
                    u32::from_le_bytes([stream[i + 2], stream[i + 3], stream[i + 4], stream[i + 5]])
                        as usize,
                    6,
                ),
                size => (usize::from(size), 2),
            };
            out.resize(out.len() + size, byte);
            i += advance;
        } else {
            out.push(byte);
            i += 1;
        }
    }
    out
}

fn compress_to_vec(data: &[u8]) -> Vec<u8> {
    let mut transport = BufferTransport::new();
    let mut framer = CrcFramer::new(&mut transport);
    covstream::compress::compress(&mut framer, data);
    framer.finalize();
    transport.bytes
}

fn reference_crc(data: &[u8]) -> u32 {
    Crc::<u32>::new(&CRC_32_ISO_HDLC).checksum(data)
}

#[test]
fn round_trip_fixed_buffers() {
    let cases: Vec<Vec<u8>> = vec![
        vec![],
        vec![0x00],
        vec![0xff],
        vec![0x42],
        vec![0x00; 0xfd],
        vec![0x00; 0xfe],
        vec![0xff; 0xffff],
        vec![0xff; 0x10000],
        vec![0x01, 0x02, 0x00, 0x00, 0x00, 0xff, 0xff, 0x03],
    ];
    for case in cases {
        assert_eq!(decode(&compress_to_vec(&case)), case);
    }
}

#[test]
fn round_trip_random_buffers() {
    let mut rng = StdRng::seed_from_u64(0x636f76);
    for _ in 0..50 {
        let mut buffer = Vec::new();
        for _ in 0..rng.gen_range(1..20) {
            let len = rng.gen_range(1..600);
            match rng.gen_range(0..4) {
                0 => buffer.extend(std::iter::repeat(0x00).take(len)),
                1 => buffer.extend(std::iter::repeat(0xff).take(len)),
                _ => buffer.extend((0..len).map(|_| rng.gen_range(0x01..0xff))),
            }
        }
        assert_eq!(decode(&compress_to_vec(&buffer)), buffer);
    }
}

#[test]
fn full_report_frames_build_id_counters_and_trailer() {
    let build_id: Vec<u8> = (0xd0..0xd0 + BUILD_ID_SIZE as u8).collect();

    let mut memory = [0u8; 32];
    let mut counters = CounterRegion::new(&mut memory).unwrap();
    let mut reporter = Reporter::new(BufferTransport::new());
    reporter.init(&mut counters, ProfileVersion::default());

    // Simulate a run: a few counters get hit values, the rest stay zero.
    counters.bytes_mut()[4] = 0x07;
    counters.bytes_mut()[5] = 0x01;

    let vectors = [ProfileVector::from_slice(counters.as_bytes())];
    reporter.report(&build_id, &vectors).unwrap();
    assert_eq!(reporter.state(), ReportState::Dumped);

    let transport = reporter.into_transport();
    assert_eq!(
        transport.markers,
        vec![
            "COVERAGE:BUFFER\r\n".to_string(),
            "== COVERAGE PROFILE START ==\r\n".to_string(),
            "== COVERAGE PROFILE END ==\r\n".to_string(),
        ]
    );

    let (payload, trailer) = transport.bytes.split_at(transport.bytes.len() - 4);

    // The trailer covers exactly the framed payload and nothing else.
    assert_eq!(trailer, reference_crc(payload).to_le_bytes());

    // Decoding the payload yields the build id followed by the counters.
    let decoded = decode(payload);
    assert_eq!(&decoded[..BUILD_ID_SIZE], &build_id[..]);
    assert_eq!(&decoded[BUILD_ID_SIZE..], &memory[..]);
}

#[test]
fn second_report_emits_only_the_dumped_marker() {
    let mut memory = [0u8; 8];
    let mut counters = CounterRegion::new(&mut memory).unwrap();
    let mut reporter = Reporter::new(BufferTransport::new());
    reporter.init(&mut counters, ProfileVersion::default());

    let vectors = [ProfileVector::from_slice(counters.as_bytes())];
    reporter.report(b"", &vectors).unwrap();

    let emitted = reporter.into_transport();
    let first_len = emitted.bytes.len();
    assert!(first_len > 4);

    // Rebuild a reporter around the captured transport to observe the
    // second call; state is what guards the counters.
    let mut reporter = Reporter::new(emitted);
    let mut counters = CounterRegion::new(&mut memory).unwrap();
    reporter.init(&mut counters, ProfileVersion::default());
    let vectors = [ProfileVector::from_slice(counters.as_bytes())];
    reporter.report(b"", &vectors).unwrap();
    reporter.report(b"", &vectors).unwrap();

    let transport = reporter.into_transport();
    assert_eq!(
        transport.markers.last().map(String::as_str),
        Some("== COVERAGE PROFILE DUMPED ==\r\n")
    );
    // One full payload from each armed report, nothing from the replay.
    assert_eq!(transport.bytes.len(), first_len * 2);
}

#[test]
fn manual_marks_show_up_in_the_encoded_stream() {
    let mut memory = [0u8; 64];
    let mut counters = CounterRegion::new(&mut memory).unwrap();
    let mut reporter = Reporter::new(BufferTransport::new());
    reporter.init(&mut counters, ProfileVersion::default().with_inverted_polarity());

    // Hand-written instrumentation points mark cells 0, 2 and 35 as hit.
    let before_low = counters.backup(0);
    let before_high = counters.backup(32);
    assert_eq!((before_low, before_high), (0, 0));
    counters.restore(before_low | 0b101, before_high | 0b1000);

    let vectors = [ProfileVector::from_slice(counters.as_bytes())];
    reporter.report(&[0x22; BUILD_ID_SIZE], &vectors).unwrap();

    let transport = reporter.into_transport();
    let payload = &transport.bytes[..transport.bytes.len() - 4];
    let decoded = decode(payload);
    let counters_out = &decoded[BUILD_ID_SIZE..];

    assert_eq!(counters_out[0], 0);
    assert_eq!(counters_out[1], 0xff);
    assert_eq!(counters_out[2], 0);
    assert_eq!(counters_out[35], 0);
    assert_eq!(counters_out[36], 0xff);
}

#[test]
fn hex_transport_report_is_line_capturable() {
    let mut memory = [0u8; 4];
    let mut counters = CounterRegion::new(&mut memory).unwrap();
    let mut reporter = Reporter::new(HexTransport::new(Vec::new()));
    reporter.init(&mut counters, ProfileVersion::default());

    reporter.report(b"", &[]).unwrap();

    // Payload: a 20-byte zero run, [0x00, 0x14].
    let crc = reference_crc(&[0x00, 0x14]);
    let mut expected = String::from("COVERAGE:HEX\r\n== COVERAGE PROFILE START ==\r\n0014");
    for byte in crc.to_le_bytes() {
        expected.push_str(&format!("{byte:02x}"));
    }
    expected.push_str("== COVERAGE PROFILE END ==\r\n");

    let text = String::from_utf8(reporter.into_transport().into_inner()).unwrap();
    assert_eq!(text, expected);
}
