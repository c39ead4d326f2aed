use thiserror::Error;

/// Error type for coverage encoding operations.
///
/// The on-device original has no recoverable errors at all; everything here
/// is a host-model misuse that raw pointers made inexpressible in firmware.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("coverage report requested before the runtime was armed")]
    NotArmed,
    #[error("counter region length {0} is not a multiple of the counter word size")]
    UnalignedCounters(usize),
    #[error("profile vector describes {expected} bytes but its slice holds only {actual}")]
    VectorLength { expected: usize, actual: usize },
}
