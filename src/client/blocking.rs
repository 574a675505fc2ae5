//! Blocking (synchronous) gpsd session
//!
//! Same behaviour as the async session, over `std::io`. Decoding never
//! blocks; the only blocking point is the read of the next message.

use std::net::{TcpStream, ToSocketAddrs};

use crate::client::Update;
use crate::dispatch::Dispatcher;
use crate::error::GpsdError;
use crate::protocol::{GpsdDecode, GpsdEncode, GpsdRequest, request::StreamOptions};
use crate::{Result, state::GpsState};

/// Blocking connection to gpsd
///
/// # Type Parameters
/// * `Stream` - The underlying I/O stream type (e.g., TcpStream)
#[derive(Debug)]
pub struct GpsdSession<Stream> {
    reader: std::io::BufReader<Stream>,
    buf: Vec<u8>,
    line: String,
    dispatcher: Dispatcher,
    options: StreamOptions,
}

impl<Stream> GpsdSession<Stream>
where
    Stream: std::io::Read + std::io::Write,
{
    /// Starts a session over an already connected stream
    pub fn open(stream: Stream) -> Self {
        GpsdSession {
            reader: std::io::BufReader::new(stream),
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
    /// # Example
    /// ```no_run
    /// # use gpsd_state::client::blocking::GpsdSession;
    /// # use gpsd_state::protocol::request::StreamOptions;
    /// let mut session = GpsdSession::connect("127.0.0.1:2947").unwrap();
    /// session.stream(StreamOptions::json()).unwrap();
    /// ```
    pub fn stream(&mut self, opts: StreamOptions) -> Result<()> {
        let generation = self.dispatcher.generation();
        self.reader.get_mut().write_request(&opts, generation)?;
        self.options = opts;
        Ok(())
    }

    /// Asks gpsd to stop streaming what the last [`stream`](Self::stream)
    /// call enabled
    pub fn close(&mut self) -> Result<()> {
        let opts = self.options.clone().disable();
        let generation = self.dispatcher.generation();
        self.reader.get_mut().write_request(&opts, generation)
    }

    /// Sends a one-shot request such as a [`Query`](crate::protocol::request::Query)
    ///
    /// The answer arrives through [`read`](Self::read) like any other report.
    pub fn send(&mut self, request: &impl GpsdRequest) -> Result<()> {
        let generation = self.dispatcher.generation();
        self.reader.get_mut().write_request(request, generation)
    }

    /// Reads and decodes the next message
    ///
    /// Returns `Ok(None)` at end of stream.
    pub fn read(&mut self) -> Result<Option<Update<'_>>> {
        if !self.reader.read_message(&mut self.buf) {
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

impl GpsdSession<TcpStream> {
    /// Connects to a gpsd server over TCP
    ///
    /// # Arguments
    /// * `addr` - Socket address of the gpsd server (e.g., "127.0.0.1:2947")
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(GpsdError::IoError)?;
        Ok(Self::open(stream))
    }
}

impl From<TcpStream> for GpsdSession<TcpStream> {
    fn from(stream: TcpStream) -> Self {
        Self::open(stream)
    }
}
