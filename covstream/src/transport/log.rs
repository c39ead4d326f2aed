use crate::transport::Transport;

/// Transport that hands the report to the logging subsystem instead of a
/// dedicated byte pipe. Payload bytes are rendered as hex so they survive
/// line-oriented log capture.
#[derive(Debug, Default)]
pub struct LogTransport {
    _private: (),
}

impl LogTransport {
    /// Creates a logging transport.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for LogTransport {
    fn name(&self) -> &'static str {
        "LOG"
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut rendered = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            rendered.push(char::from_digit(u32::from(byte >> 4), 16).unwrap_or('?'));
            rendered.push(char::from_digit(u32::from(byte & 0xf), 16).unwrap_or('?'));
        }
        tracing::info!(target: "covstream::payload", "{rendered}");
    }

    fn marker(&mut self, text: &str) {
        tracing::info!(target: "covstream::marker", "{}", text.trim_end());
    }
}
