//! Error types for gpsd session and decoding operations
//!
//! Only conditions the consumer must act on become errors. Unrecognized
//! messages and fields that fail to parse are not errors: the former are
//! passed through untouched, the latter degrade to "unknown".

/// Main error type for gpsd decoding operations
#[derive(Debug)]
pub enum GpsdError {
    /// I/O error occurred while writing a request to the daemon
    ///
    /// Read failures are reported as end-of-stream instead, since the
    /// read loop cannot continue after either.
    IoError(std::io::Error),

    /// JSON serialization error
    ///
    /// Occurs when an outbound request cannot be encoded.
    SerdeError(serde_json::Error),

    /// Protocol-level error
    ///
    /// The peer sent a well-formed record that violates the protocol
    /// contract, such as a DEVICE record without a device path, or a request
    /// cannot be expressed in the active protocol generation.
    ProtocolError(&'static str),
}

impl core::fmt::Display for GpsdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpsdError::IoError(err) => write!(f, "IoError: {}", err),
            GpsdError::SerdeError(err) => write!(f, "SerdeError: {}", err),
            GpsdError::ProtocolError(msg) => write!(f, "ProtocolError: {}", msg),
        }
    }
}

impl core::error::Error for GpsdError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            GpsdError::IoError(err) => Some(err),
            GpsdError::SerdeError(err) => Some(err),
            GpsdError::ProtocolError(_) => None,
        }
    }
}
