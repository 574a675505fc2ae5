//! Asynchronous gpsd session
//!
//! A session owns the connection and a [`Dispatcher`]; every call to
//! [`GpsdSession::read`] pulls one message off the wire and folds it into
//! the session's [`GpsState`].
//!
//! For synchronous/blocking operations, see the `blocking` submodule.
//!
//! # Example
//!
//! ```no_run
//! use gpsd_state::client::{GpsdSession, Update};
//! use gpsd_state::protocol::request::StreamOptions;
//! use gpsd_state::validity::ValidityFlags;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = GpsdSession::connect("127.0.0.1:2947").await?;
//! session.stream(StreamOptions::json()).await?;
//!
//! while let Some(update) = session.read().await? {
//!     if let Update::State { state, .. } = update {
//!         if state.valid.contains(ValidityFlags::LATLON) {
//!             println!("{:?} {:?}", state.fix.latitude, state.fix.longitude);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
    Result,
    dispatch::Dispatcher,
    protocol::{GpsdDecodeAsync, GpsdEncodeAsync, GpsdRequest, Report, request::StreamOptions},
    state::GpsState,
};

/// Blocking (synchronous) session implementation
pub mod blocking;

/// Outcome of reading one message
#[derive(Debug, Clone, PartialEq)]
pub enum Update<'a> {
    /// The message was decoded into the session state
    State {
        report: Report,
        state: &'a GpsState,
    },
    /// Neither encoding recognized the message; it is passed through as read
    Raw(&'a str),
}

impl<'a> Update<'a> {
    pub(crate) fn new(report: Report, state: &'a GpsState, line: &'a str) -> Self {
        match report {
            Report::Unrecognized => Update::Raw(line),
            report => Update::State { report, state },
        }
    }
}

/// Asynchronous connection to gpsd
///
/// # Type Parameters
/// * `Stream` - The underlying async I/O stream type (e.g., TcpStream)
#[derive(Debug)]
pub struct GpsdSession<Stream> {
    reader: futures_util::io::BufReader<Stream>,
    buf: Vec<u8>,
    line: String,
    dispatcher: Dispatcher,
    options: StreamOptions,
}

impl<Stream> GpsdSession<Stream>
where
    Stream: futures_io::AsyncRead + futures_io::AsyncWrite + Unpin,
{
    /// Starts a session over an already connected stream
    pub fn open(stream: Stream) -> Self {
        GpsdSession {
            reader: futures_util::io::BufReader::new(stream),
            buf: Vec::new(),
            line: String::new(),
            dispatcher: Dispatcher::new(),
            options: StreamOptions::new(),
        }
    }

    /// The state as of the last decoded message
    pub fn state(&self) -> &GpsState {
        self.dispatcher.state()
    }

    /// The dispatcher, for the session's protocol generation
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Asks gpsd to start streaming reports
    ///
    /// The command is rendered for the protocol generation the peer has
    /// demonstrated so far, unless `opts` names one explicitly.
    pub async fn stream(&mut self, opts: StreamOptions) -> Result<()> {
        let generation = self.dispatcher.generation();
        self.reader
            .get_mut()
            .write_request(&opts, generation)
            .await?;
        self.options = opts;
        Ok(())
    }

    /// Asks gpsd to stop streaming what the last [`stream`](Self::stream)
    /// call enabled
    pub async fn close(&mut self) -> Result<()> {
        let opts = self.options.clone().disable();
        let generation = self.dispatcher.generation();
        self.reader
            .get_mut()
            .write_request(&opts, generation)
            .await
    }

    /// Sends a one-shot request such as a [`Query`](crate::protocol::request::Query)
    ///
    /// The answer arrives through [`read`](Self::read) like any other report.
    pub async fn send(&mut self, request: &impl GpsdRequest) -> Result<()> {
        let generation = self.dispatcher.generation();
        self.reader
            .get_mut()
            .write_request(request, generation)
            .await
    }

    /// Reads and decodes the next message
    ///
    /// Returns `Ok(None)` at end of stream.
    pub async fn read(&mut self) -> Result<Option<Update<'_>>> {
        if !self.reader.read_message(&mut self.buf).await {
            return Ok(None);
        }

        self.line = String::from_utf8_lossy(&self.buf).into_owned();
        log::trace!("received {:?}", self.line.trim_end());
        let report = self.dispatcher.decode(&self.line)?;
        Ok(Some(Update::new(report, self.dispatcher.state(), &self.line)))
    }

    /// Ends the session, returning the underlying stream
    pub fn into_inner(self) -> Stream {
        self.reader.into_inner()
    }
}

#[cfg(feature = "tokio")]
impl GpsdSession<tokio_util::compat::Compat<tokio::net::TcpStream>> {
    /// Connects to a gpsd server over TCP asynchronously
    ///
    /// # Arguments
    /// * `addr` - Socket address of the gpsd server (e.g., "127.0.0.1:2947")
    pub async fn connect<A: tokio::net::ToSocketAddrs>(addr: A) -> Result<Self> {
        use tokio_util::compat::TokioAsyncReadCompatExt;

        let stream = tokio::net::TcpStream::connect(addr)
            .await
            .map_err(crate::error::GpsdError::IoError)?;
        Ok(GpsdSession::open(stream.compat()))
    }
}
