//! Outbound requests
//!
//! A client asks gpsd to start (or stop) streaming reports. The same
//! [`StreamOptions`] produce either a JSON `?WATCH` command or the legacy
//! single-letter commands, depending on which protocol generation is active.
//!
//! One-shot queries and device reconfiguration are [`Query`] values; they
//! exist only in the JSON protocol.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    Result,
    error::GpsdError,
    protocol::{Encoding, GpsdRequest},
};

bitflags::bitflags! {
    /// Streaming options, numbered like libgps' `WATCH_*` flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WatchFlags: u32 {
        /// Stop streaming instead of starting it
        const DISABLE = 0x000002;
        /// Structured (JSON) reports
        const JSON = 0x000010;
        /// Raw NMEA passthrough
        const NMEA = 0x000020;
        /// Verbatim binary passthrough
        const BINARY = 0x000040;
        /// Restrict to one device
        const DEVICE = 0x000800;
        /// Legacy comma-delimited reports
        const LEGACY = 0x020000;
    }
}

/// # Watch Policy
/// - [json_watch_read](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/shared_json.c#L95)
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Watch {
    pub enable: Option<bool>,
    pub json: Option<bool>,
    pub nmea: Option<bool>,
    pub raw: Option<i32>,
    pub scaled: Option<bool>,
    pub split24: Option<bool>,
    pub pps: Option<bool>,
    pub timing: Option<bool>,
    pub device: Option<String>,
    pub remote: Option<String>,
}

/// Configuration for a streaming request
///
/// # Example
/// ```
/// use gpsd_state::protocol::{Encoding, GpsdRequest, request::StreamOptions};
///
/// let opts = StreamOptions::json().device("/dev/ttyUSB0");
/// assert_eq!(
///     opts.to_command(Encoding::Json).unwrap(),
///     r#"?WATCH={"enable":true,"json":true,"device":"/dev/ttyUSB0"};"#,
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamOptions {
    flags: WatchFlags,
    device: Option<String>,
}

impl StreamOptions {
    /// Options with no explicit encoding; the session's active protocol
    /// generation decides
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests structured (JSON) reports
    pub fn json() -> Self {
        StreamOptions {
            flags: WatchFlags::JSON,
            device: None,
        }
    }

    /// Requests legacy comma-delimited reports
    pub fn legacy() -> Self {
        StreamOptions {
            flags: WatchFlags::LEGACY,
            device: None,
        }
    }

    /// Builds options from raw flags
    ///
    /// [`WatchFlags::DEVICE`] is ignored here; use [`StreamOptions::device`].
    pub fn from_flags(flags: WatchFlags) -> Self {
        StreamOptions {
            flags: flags - WatchFlags::DEVICE,
            device: None,
        }
    }

    /// Enables or disables raw NMEA passthrough
    pub fn nmea(mut self, enable: bool) -> Self {
        self.flags.set(WatchFlags::NMEA, enable);
        self
    }

    /// Enables or disables verbatim binary passthrough
    ///
    /// The legacy protocol has no such mode and ignores this option.
    pub fn binary(mut self, enable: bool) -> Self {
        self.flags.set(WatchFlags::BINARY, enable);
        self
    }

    /// Restricts streaming to one device
    ///
    /// # Arguments
    /// * `device` - Path to the GPS device (e.g., "/dev/ttyUSB0")
    pub fn device<S: AsRef<str>>(mut self, device: S) -> Self {
        self.flags.insert(WatchFlags::DEVICE);
        self.device = Some(device.as_ref().into());
        self
    }

    /// Turns these options into a request to stop streaming
    pub fn disable(mut self) -> Self {
        self.flags.insert(WatchFlags::DISABLE);
        self
    }

    pub fn flags(&self) -> WatchFlags {
        self.flags
    }

    /// The encoding these options ask for explicitly, if any
    pub fn encoding(&self) -> Option<Encoding> {
        if self.flags.contains(WatchFlags::LEGACY) {
            Some(Encoding::Legacy)
        } else if self.flags.contains(WatchFlags::JSON) {
            Some(Encoding::Json)
        } else {
            None
        }
    }

    fn json_command(&self) -> Result<String> {
        let mut flags = self.flags;
        if !flags.intersects(WatchFlags::JSON | WatchFlags::NMEA | WatchFlags::BINARY) {
            flags.insert(WatchFlags::JSON);
        }

        let enable = !flags.contains(WatchFlags::DISABLE);
        let watch = Watch {
            enable: Some(enable),
            json: flags.contains(WatchFlags::JSON).then_some(enable),
            nmea: flags.contains(WatchFlags::NMEA).then_some(enable),
            raw: flags
                .contains(WatchFlags::BINARY)
                .then_some(if enable { 2 } else { 0 }),
            device: self.device.clone().filter(|_| enable),
            ..Default::default()
        };

        let body = serde_json::to_string(&watch).map_err(GpsdError::SerdeError)?;
        Ok(format!("?WATCH={};", body))
    }

    fn legacy_command(&self) -> String {
        let mut cmd = String::new();
        let enable = !self.flags.contains(WatchFlags::DISABLE);
        if enable {
            if let Some(device) = &self.device {
                cmd.push_str(&format!("F={}\n", device));
            }
        }

        let sign = if enable { '+' } else { '-' };
        cmd.push('w');
        cmd.push(sign);
        if self.flags.contains(WatchFlags::NMEA) {
            cmd.push('r');
            cmd.push(sign);
        }
        cmd.push('\n');
        cmd
    }
}

impl GpsdRequest for StreamOptions {
    /// Renders the command for `encoding`, unless the options name one
    /// explicitly
    fn to_command(&self, encoding: Encoding) -> Result<String> {
        match self.encoding().unwrap_or(encoding) {
            Encoding::Json => self.json_command(),
            Encoding::Legacy => Ok(self.legacy_command()),
        }
    }
}

/// Device reconfiguration, sent as `?DEVICE={...};`
///
/// Only the members that were set are sent; the daemon leaves the rest of
/// the device's settings alone.
///
/// # Example
/// ```
/// use gpsd_state::protocol::request::DeviceConfig;
///
/// let config = DeviceConfig::new("/dev/ttyUSB0").speed(9600).framing('N', 1);
/// assert_eq!(config.parity, Some('N'));
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceConfig {
    pub path: String,
    /// 0 for NMEA, 1 for the receiver's native binary protocol
    pub native: Option<u8>,
    pub bps: Option<u32>,
    /// `N`, `O` or `E`
    pub parity: Option<char>,
    pub stopbits: Option<u32>,
    /// Reporting cycle, seconds
    pub cycle: Option<f64>,
}

impl DeviceConfig {
    /// Targets the device at `path`
    pub fn new<S: AsRef<str>>(path: S) -> Self {
        DeviceConfig {
            path: path.as_ref().into(),
            ..Default::default()
        }
    }

    /// Switches between the native binary protocol and NMEA
    pub fn native(mut self, native: bool) -> Self {
        self.native = Some(u8::from(native));
        self
    }

    /// Sets the serial speed in bits per second
    pub fn speed(mut self, bps: u32) -> Self {
        self.bps = Some(bps);
        self
    }

    /// Sets parity and stop bits; the word length is always 8
    pub fn framing(mut self, parity: char, stopbits: u32) -> Self {
        self.parity = Some(parity);
        self.stopbits = Some(stopbits);
        self
    }

    /// Sets the reporting cycle in seconds
    pub fn cycle(mut self, cycle: f64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    fn check(&self) -> Result<()> {
        if self.parity.is_some_and(|parity| !matches!(parity, 'N' | 'O' | 'E')) {
            return Err(GpsdError::ProtocolError("parity must be N, O or E"));
        }
        if self.stopbits.is_some_and(|bits| !matches!(bits, 1 | 2)) {
            return Err(GpsdError::ProtocolError("stop bits must be 1 or 2"));
        }
        Ok(())
    }
}

/// One-shot queries and device control
///
/// Answers arrive as ordinary records (`VERSION`, `DEVICES`, `DEVICE`,
/// `WATCH`, `POLL`) on the same stream and are folded into the state like
/// any other report.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `?VERSION;`
    Version,
    /// `?DEVICES;`, the list of devices the daemon knows about
    Devices,
    /// `?DEVICE;`, the current device
    Device,
    /// `?DEVICE={...};`
    Configure(DeviceConfig),
    /// `?WATCH;`, the current watch policy
    Watch,
    /// `?POLL;`, the latest fix from every device
    Poll,
}

impl GpsdRequest for Query {
    /// Renders the JSON command
    ///
    /// The legacy protocol has no equivalent, so asking for it is an error.
    fn to_command(&self, encoding: Encoding) -> Result<String> {
        if encoding == Encoding::Legacy {
            return Err(GpsdError::ProtocolError("query needs the JSON protocol"));
        }

        let cmd = match self {
            Query::Version => "?VERSION;".into(),
            Query::Devices => "?DEVICES;".into(),
            Query::Device => "?DEVICE;".into(),
            Query::Configure(config) => {
                config.check()?;
                let body = serde_json::to_string(config).map_err(GpsdError::SerdeError)?;
                format!("?DEVICE={};", body)
            }
            Query::Watch => "?WATCH;".into(),
            Query::Poll => "?POLL;".into(),
        };
        Ok(cmd)
    }
}
