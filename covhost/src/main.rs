use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use covstream::{CounterRegion, ProfileVector, ProfileVersion, Reporter, TransportKind};

/// Runs a raw counter image through the real coverage encoding pipeline
/// (arm, record, report) and writes the framed stream. Useful for producing
/// reference vectors for host-side decoders without flashing a device.
#[derive(Debug, clap::Parser)]
#[clap(name = "covhost")]
struct Opts {
    /// Counter image to encode. Reads stdin when omitted.
    input: Option<PathBuf>,

    #[clap(short, long, help = "Write the stream here instead of stdout.")]
    output: Option<PathBuf>,

    #[clap(
        short,
        long,
        default_value = "hex",
        help = "Transport rendering: hex, raw, log or noop."
    )]
    transport: TransportKind,

    #[clap(long, help = "Build identifier as a hex string (20 bytes).")]
    build_id: Option<String>,

    #[clap(long, help = "Arm counters with inverted (all-ones) polarity.")]
    inverted: bool,

    #[clap(long, help = "Invalidate collection and emit only the skip marker.")]
    skip: bool,
}

fn parse_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    if !s.is_ascii() {
        bail!("hex string contains non-hex characters");
    }
    if s.len() % 2 != 0 {
        bail!("hex string has an odd number of digits");
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).context("invalid hex digit"))
        .collect()
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let image = match &opts.input {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let build_id = match &opts.build_id {
        Some(hex) => parse_hex(hex)?,
        None => Vec::new(),
    };

    let out: Box<dyn Write> = match &opts.output {
        Some(path) => {
            Box::new(fs::File::create(path).with_context(|| format!("creating {}", path.display()))?)
        }
        None => Box::new(io::stdout()),
    };

    let version = if opts.inverted {
        ProfileVersion::default().with_inverted_polarity()
    } else {
        ProfileVersion::default()
    };

    // Counter regions are whole words; keep the image length as the vector
    // length and pad only the backing memory.
    let padding = image.len().next_multiple_of(4) - image.len();
    let mut scratch = vec![0u8; image.len() + padding];
    let mut counters = CounterRegion::new(&mut scratch)?;

    let mut reporter = Reporter::new(opts.transport.create(out));
    reporter.init(&mut counters, version);
    if opts.skip {
        reporter.invalidate();
    }

    // Play the instrumented program: the image is the post-run counter
    // state.
    counters.bytes_mut()[..image.len()].copy_from_slice(&image);

    let vectors = [ProfileVector::from_slice(&counters.as_bytes()[..image.len()])];
    reporter.report(&build_id, &vectors)?;

    Ok(())
}
