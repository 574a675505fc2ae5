//! Canonical GPS state shared by both wire encodings
//!
//! Nothing in this module knows how a value arrived; the decoders in
//! [`crate::protocol`] write into these types and the consumer reads them.
//! Optional numeric values use `None` for "unknown".

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_repr::Serialize_repr;

use crate::protocol::request::Watch;
use crate::validity::ValidityFlags;

/// * [gps_fix_t.mode](https://gitlab.com/gpsd/gpsd/-/blob/release-3.25/include/gps.h?ref_type=tags#L181)
///
/// gpsd's `MODE_NOT_SEEN` (0) is not representable; decoders reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr)]
#[repr(i32)]
pub enum FixMode {
    #[default]
    NoFix = 1,
    Fix2D = 2,
    Fix3D = 3,
}

impl TryFrom<i64> for FixMode {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FixMode::NoFix),
            2 => Ok(FixMode::Fix2D),
            3 => Ok(FixMode::Fix3D),
            other => Err(other),
        }
    }
}

/// Fix quality as reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr)]
#[repr(i32)]
pub enum FixStatus {
    #[default]
    NoFix = 0,
    Fix = 1,
    /// with DGPS
    DgpsFix = 2,
}

impl TryFrom<i64> for FixStatus {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FixStatus::NoFix),
            1 => Ok(FixStatus::Fix),
            2 => Ok(FixStatus::DgpsFix),
            other => Err(other),
        }
    }
}

/// Most recent position/velocity/time solution
///
/// Error estimates follow gpsd naming: `ept` time, `epx`/`epy` horizontal,
/// `epv` vertical, `epd` track, `eps` speed, `epc` climb.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fix {
    pub mode: FixMode,
    /// Seconds since the Unix epoch
    pub time: Option<f64>,
    pub ept: Option<f64>,
    /// Degrees, positive north
    pub latitude: Option<f64>,
    /// Degrees, positive east
    pub longitude: Option<f64>,
    /// Meters
    pub altitude: Option<f64>,
    pub epx: Option<f64>,
    pub epy: Option<f64>,
    pub epv: Option<f64>,
    /// Degrees from true north
    pub track: Option<f64>,
    /// Speed over ground
    pub speed: Option<f64>,
    /// Meters per second
    pub climb: Option<f64>,
    pub epd: Option<f64>,
    pub eps: Option<f64>,
    pub epc: Option<f64>,
}

impl Default for Fix {
    fn default() -> Self {
        // Position starts at the origin rather than unknown.
        Fix {
            mode: FixMode::NoFix,
            time: None,
            ept: None,
            latitude: Some(0.0),
            longitude: Some(0.0),
            altitude: None,
            epx: None,
            epy: None,
            epv: None,
            track: None,
            speed: None,
            climb: None,
            epd: None,
            eps: None,
            epc: None,
        }
    }
}

/// One satellite in view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Satellite {
    pub prn: i32,
    /// Degrees above the horizon
    pub elevation: Option<f64>,
    /// Degrees from true north
    pub azimuth: Option<f64>,
    /// Signal strength
    pub ss: Option<f64>,
    /// `None` when the report does not say whether the satellite is used
    pub used: Option<bool>,
}

impl core::fmt::Display for Satellite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = match self.used {
            Some(true) => "y",
            Some(false) => "n",
            None => "?",
        };
        write!(
            f,
            "PRN: {:3}  E: {:>3}  Az: {:>3}  Ss: {:>3}  Used: {}",
            self.prn,
            Unknown(self.elevation),
            Unknown(self.azimuth),
            Unknown(self.ss),
            used
        )
    }
}

/// * [dop_t](https://gitlab.com/gpsd/gpsd/-/blob/release-3.25/include/gps.h?ref_type=tags#L2557)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dop {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub v: Option<f64>,
    pub h: Option<f64>,
    pub p: Option<f64>,
    pub g: Option<f64>,
    pub t: Option<f64>,
}

/// Daemon version record
///
/// The typed fields are pulled out of the record for convenience; the whole
/// mapping is kept in `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Version {
    pub release: Option<String>,
    pub rev: Option<String>,
    pub proto_major: Option<i64>,
    pub proto_minor: Option<i64>,
    pub remote: Option<String>,
    #[serde(skip)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// One entry of the daemon's device list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub path: Option<String>,
    pub activated: Option<DateTime<Utc>>,
    pub driver: Option<String>,
    pub subtype: Option<String>,
    pub native: Option<i64>,
    pub bps: Option<u32>,
    pub cycle: Option<f64>,
    pub mincycle: Option<f64>,
}

/// Everything the session knows about the receiver
///
/// One instance lives for the whole session. It is updated one field group
/// at a time, and `valid` records which groups the latest update supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpsState {
    pub online: bool,
    pub valid: ValidityFlags,
    pub fix: Fix,
    pub status: FixStatus,
    /// ISO-8601 rendering of the fix time, empty when unknown
    pub utc: String,
    satellites_used: usize,
    pub dop: Dop,
    /// Estimated position error, meters
    pub epe: Option<f64>,
    satellites: Vec<Satellite>,
    /// Receiver identification (driver and subtype)
    pub gps_id: Option<String>,
    pub driver_mode: i64,
    pub baudrate: u32,
    pub stopbits: u32,
    pub serialmode: String,
    /// Reporting cycle, seconds
    pub cycle: Option<f64>,
    pub mincycle: Option<f64>,
    pub activated: Option<DateTime<Utc>>,
    /// Path of the device currently reporting
    pub device: Option<String>,
    pub devices: Vec<DeviceInfo>,
    pub version: Option<Version>,
    pub policy: Option<Watch>,
    /// Text of the last ERROR record
    pub error: Option<String>,
}

impl Default for GpsState {
    fn default() -> Self {
        GpsState {
            online: false,
            valid: ValidityFlags::empty(),
            fix: Fix::default(),
            status: FixStatus::NoFix,
            utc: String::new(),
            satellites_used: 0,
            dop: Dop::default(),
            epe: None,
            satellites: Vec::new(),
            gps_id: None,
            driver_mode: 0,
            baudrate: 0,
            stopbits: 0,
            serialmode: "8N1".into(),
            cycle: None,
            mincycle: None,
            activated: None,
            device: None,
            devices: Vec::new(),
            version: None,
            policy: None,
            error: None,
        }
    }
}

impl GpsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Satellites in view, in report order
    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    /// Number of satellites whose used flag is true
    pub fn satellites_used(&self) -> usize {
        self.satellites_used
    }

    /// Replaces the satellite list wholesale and recounts used satellites
    pub(crate) fn replace_satellites(&mut self, satellites: Vec<Satellite>) {
        self.satellites_used = satellites
            .iter()
            .filter(|sat| sat.used == Some(true))
            .count();
        self.satellites = satellites;
    }
}

impl core::fmt::Display for GpsState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fix = &self.fix;
        writeln!(f, "Time:     {} ({})", self.utc, Unknown(fix.time))?;
        writeln!(
            f,
            "Lat/Lon:  {} {}",
            Unknown(fix.latitude),
            Unknown(fix.longitude)
        )?;
        writeln!(f, "Altitude: {}", Unknown(fix.altitude))?;
        writeln!(f, "Speed:    {}", Unknown(fix.speed))?;
        writeln!(f, "Track:    {}", Unknown(fix.track))?;
        let status = match self.status {
            FixStatus::NoFix => "NO_FIX",
            FixStatus::Fix => "FIX",
            FixStatus::DgpsFix => "DGPS_FIX",
        };
        writeln!(f, "Status:   STATUS_{}", status)?;
        let mode = match fix.mode {
            FixMode::NoFix => "NO_FIX",
            FixMode::Fix2D => "2D",
            FixMode::Fix3D => "3D",
        };
        writeln!(f, "Mode:     MODE_{}", mode)?;
        writeln!(
            f,
            "Quality:  {} p={} h={} v={} t={} g={}",
            self.satellites_used,
            Unknown(self.dop.p),
            Unknown(self.dop.h),
            Unknown(self.dop.v),
            Unknown(self.dop.t),
            Unknown(self.dop.g)
        )?;
        writeln!(f, "Y: {} satellites in view:", self.satellites.len())?;
        for sat in &self.satellites {
            writeln!(f, "    {}", sat)?;
        }
        Ok(())
    }
}

/// Renders an optional value, `?` when unknown
struct Unknown<T>(Option<T>);

impl<T: core::fmt::Display> core::fmt::Display for Unknown<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => "?".fmt(f),
        }
    }
}
