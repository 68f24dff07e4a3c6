use std::num::ParseIntError;
use thiserror::Error;

/// Errors reported by the demultiplexer.
///
/// Malformed media payloads never surface here: codec and PES parsing fail
/// softly and simply produce no output. Only transport level problems and
/// configuration mistakes are reported to the caller.
#[derive(Error, Debug)]
pub enum DemuxError {
    /// A read ran past the declared bit length of a bitstream.
    #[error("bitstream error: {0}")]
    Bitstream(String),

    /// A codec header could not be interpreted.
    #[error("codec error: {0}")]
    Codec(String),

    /// A transport packet was structurally invalid.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The transport error indicator was set on a packet.
    #[error("transport error indicator set (pid {pid})")]
    TransportError {
        /// PID of the offending packet
        pid: u16,
    },

    /// A configuration value was rejected.
    #[error("config error: {0}")]
    Config(String),

    /// A numeric configuration override could not be parsed.
    #[error("parse int error: {0}")]
    ParseInt(#[from] ParseIntError),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, DemuxError>;
