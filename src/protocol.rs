//! Wire encodings spoken by gpsd and the seams between them
//!
//! gpsd has used two report encodings over its lifetime: the terse
//! comma-delimited legacy protocol (`GPSD,O=...`) and the JSON protocol
//! (`{"class":"TPV",...}`). Each has a [`Decoder`] implementation that folds
//! one message into a shared [`GpsState`]; the
//! [`Dispatcher`](crate::dispatch::Dispatcher) decides which one applies.

use crate::{Result, error::GpsdError, state::GpsState};

/// JSON (structured) report decoding
pub mod json;
/// Legacy comma-delimited report decoding
pub mod legacy;
/// Outbound streaming requests for both generations
pub mod request;

/// Wire encoding of a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// `GPSD,<letter>=<payload>,...`
    Legacy,
    /// `{"class":"<KIND>",...}`
    Json,
}

/// What a successfully decoded message was
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// A legacy `GPSD,...` response
    Legacy,
    /// A JSON record of the given class
    Json(json::RecordClass),
    /// Neither encoding recognized the message; state is untouched
    Unrecognized,
}

/// One wire encoding's decoding logic
///
/// Decoders are stateless; everything they learn goes into the
/// [`GpsState`] they are handed.
pub trait Decoder {
    /// The encoding this decoder understands
    fn encoding(&self) -> Encoding;

    /// Cheap structural check whether `msg` belongs to this encoding
    fn sniff(&self, msg: &str) -> bool;

    /// Folds `msg` into `state`
    ///
    /// Returns `Ok(None)` when the message passed the sniff but turned out
    /// malformed as a whole; in that case `state` is not modified.
    fn decode(&self, msg: &str, state: &mut GpsState) -> Result<Option<Report>>;
}

/// Something that can be sent to gpsd as a command
pub trait GpsdRequest {
    /// Renders the command text for the given protocol generation
    fn to_command(&self, encoding: Encoding) -> Result<String>;
}

/// Reads one newline-terminated message from a blocking reader
pub trait GpsdDecode: std::io::BufRead {
    /// Fills `buf` with the next message, terminator included
    ///
    /// Returns `false` at end of stream. Read failures end the stream too,
    /// the read loop cannot continue after either.
    fn read_message(&mut self, buf: &mut Vec<u8>) -> bool {
        buf.clear();
        match self.read_until(b'\n', buf) {
            Ok(0) => false, // EOF reached
            Ok(_) => true,
            Err(e) => {
                log::warn!("gpsd read failed, ending stream: {e}");
                false
            }
        }
    }
}

impl<R: std::io::BufRead + ?Sized> GpsdDecode for R {}

/// Async counterpart of [`GpsdDecode`]
pub trait GpsdDecodeAsync: futures_io::AsyncBufRead + Unpin {
    fn read_message(&mut self, buf: &mut Vec<u8>) -> impl std::future::Future<Output = bool> {
        use futures_util::AsyncBufReadExt;

        async move {
            buf.clear();
            match self.read_until(b'\n', buf).await {
                Ok(0) => false, // EOF reached
                Ok(_) => true,
                Err(e) => {
                    log::warn!("gpsd read failed, ending stream: {e}");
                    false
                }
            }
        }
    }
}

impl<R: futures_io::AsyncBufRead + Unpin + ?Sized> GpsdDecodeAsync for R {}

/// Writes commands to a blocking writer
pub trait GpsdEncode: std::io::Write {
    fn write_request(&mut self, request: &impl GpsdRequest, encoding: Encoding) -> Result<()> {
        let cmd = request.to_command(encoding)?;
        log::debug!("sending {}", cmd.trim_end());
        self.write_all(cmd.as_bytes())
            .and_then(|_| self.flush())
            .map_err(GpsdError::IoError)
    }
}

impl<W: std::io::Write + ?Sized> GpsdEncode for W {}

/// Async counterpart of [`GpsdEncode`]
pub trait GpsdEncodeAsync: futures_io::AsyncWrite + Unpin {
    fn write_request(
        &mut self,
        request: &impl GpsdRequest,
        encoding: Encoding,
    ) -> impl std::future::Future<Output = Result<()>> {
        use futures_util::AsyncWriteExt;

        let cmd = request.to_command(encoding);
        async move {
            let cmd = cmd?;
            log::debug!("sending {}", cmd.trim_end());
            self.write_all(cmd.as_bytes())
                .await
                .map_err(GpsdError::IoError)?;
            self.flush().await.map_err(GpsdError::IoError)
        }
    }
}

impl<W: futures_io::AsyncWrite + Unpin + ?Sized> GpsdEncodeAsync for W {}
