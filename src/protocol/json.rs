//! gpsd JSON reports
//!
//! Every JSON report is a single object whose `class` member names the
//! record kind. The message is first tokenized into a [`Record`] (the class
//! plus a generic key→value map) and then interpreted field by field, so a
//! member with an unexpected type degrades to "unknown" instead of failing
//! the whole record.
//!
//! Reference: [gpsd JSON protocol](https://gpsd.io/gpsd_json.html)

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    Result,
    error::GpsdError,
    protocol::{Decoder, Encoding, Report},
    state::{DeviceInfo, FixMode, FixStatus, GpsState, Satellite, Version},
    time,
    validity::ValidityFlags,
};

/// A tokenized JSON record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    /// Record kind, e.g. `TPV`
    pub class: String,
    /// Every other member of the object
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Tokenizes one JSON object
    pub fn parse(msg: &str) -> serde_json::Result<Self> {
        serde_json::from_str(msg)
    }
}

/// - [libgps_json_unpack](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/libgps_json.c#L792)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordClass {
    /// Daemon version information
    Version,
    /// One GPS device
    Device,
    /// All devices known to the daemon
    Devices,
    /// Time-Position-Velocity report
    Tpv,
    /// Satellite sky view report
    Sky,
    /// Pseudorange error statistics
    Gst,
    /// Current watch policy
    Watch,
    /// Error notification
    Error,
    Rtcm2,
    Rtcm3,
    Ais,
    /// Raw navigation subframe
    Subframe,
    /// Any class this client does not interpret
    Other(String),
}

impl From<&str> for RecordClass {
    fn from(class: &str) -> Self {
        match class {
            "VERSION" => RecordClass::Version,
            "DEVICE" => RecordClass::Device,
            "DEVICES" => RecordClass::Devices,
            "TPV" => RecordClass::Tpv,
            "SKY" => RecordClass::Sky,
            "GST" => RecordClass::Gst,
            "WATCH" => RecordClass::Watch,
            "ERROR" => RecordClass::Error,
            "RTCM2" => RecordClass::Rtcm2,
            "RTCM3" => RecordClass::Rtcm3,
            "AIS" => RecordClass::Ais,
            "SUBFRAME" => RecordClass::Subframe,
            other => RecordClass::Other(other.to_string()),
        }
    }
}

impl RecordClass {
    /// Validity bit of a record kind that is only meaningful for the record
    /// that carried it
    fn episodic(&self) -> ValidityFlags {
        match self {
            RecordClass::Version => ValidityFlags::VERSION,
            RecordClass::Devices => ValidityFlags::DEVICE_LIST,
            RecordClass::Gst => ValidityFlags::GST,
            RecordClass::Error => ValidityFlags::ERROR,
            RecordClass::Rtcm2 => ValidityFlags::RTCM2,
            RecordClass::Rtcm3 => ValidityFlags::RTCM3,
            RecordClass::Ais => ValidityFlags::AIS,
            RecordClass::Subframe => ValidityFlags::SUBFRAME,
            _ => ValidityFlags::empty(),
        }
    }
}

/// Typed, lenient access to record members
///
/// A member that is absent or of the wrong type reads as `None`.
trait Fields {
    fn number(&self, key: &str) -> Option<f64>;
    fn integer(&self, key: &str) -> Option<i64>;
    fn string(&self, key: &str) -> Option<&str>;
    /// Either a float of epoch seconds or an ISO-8601 string
    fn time(&self, key: &str) -> Option<DateTime<Utc>>;
    /// Like [`Fields::time`], as epoch seconds; a float is taken verbatim
    fn epoch(&self, key: &str) -> Option<f64>;
}

impl Fields for Map<String, Value> {
    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    fn integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn time(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key)? {
            Value::Number(secs) => secs.as_f64().and_then(time::from_epoch),
            Value::String(iso) => time::parse_iso_time(iso),
            _ => None,
        }
    }

    fn epoch(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(secs) => secs.as_f64().filter(|secs| secs.is_finite()),
            Value::String(iso) => time::parse_iso_time(iso).as_ref().map(time::to_epoch),
            _ => None,
        }
    }
}

/// Decoder for the JSON encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::Json
    }

    fn sniff(&self, msg: &str) -> bool {
        let msg = msg.trim_end_matches(['\r', '\n']).trim_start();
        msg.starts_with('{') && msg.ends_with('}')
    }

    fn decode(&self, msg: &str, state: &mut GpsState) -> Result<Option<Report>> {
        let record = match Record::parse(msg) {
            Ok(record) => record,
            Err(e) => {
                log::debug!("skipping malformed JSON record: {e}");
                return Ok(None);
            }
        };

        let class = self.apply(&record, state)?;
        Ok(Some(Report::Json(class)))
    }
}

impl JsonDecoder {
    /// Folds an already tokenized record into `state`
    ///
    /// Fails only when the record breaks the protocol contract; the state
    /// is untouched in that case.
    pub fn apply(&self, record: &Record, state: &mut GpsState) -> Result<RecordClass> {
        let class = RecordClass::from(record.class.as_str());
        let fields = &record.fields;

        if let RecordClass::Other(name) = &class {
            log::debug!("ignoring {name} record");
            return Ok(class);
        }
        if class == RecordClass::Device && fields.string("path").is_none() {
            return Err(GpsdError::ProtocolError("DEVICE record without path"));
        }

        state.valid.remove(ValidityFlags::UNION);
        state.valid.insert(class.episodic());

        match class {
            RecordClass::Version => version(fields, state),
            RecordClass::Device => device(fields, state),
            RecordClass::Devices => devices(fields, state),
            RecordClass::Tpv => tpv(fields, state),
            RecordClass::Sky => sky(fields, state),
            RecordClass::Watch => {
                state.valid.remove(ValidityFlags::POLICY);
                let policy = serde_json::from_value(Value::Object(fields.clone())).ok();
                state.policy = state.valid.mark(ValidityFlags::POLICY, policy);
            }
            RecordClass::Error => {
                // the bit covers the message, not the record's arrival
                state.valid.remove(ValidityFlags::ERROR);
                let message = fields.string("message").map(String::from);
                state.error = state.valid.mark(ValidityFlags::ERROR, message);
            }
            _ => {}
        }
        Ok(class)
    }
}

fn version(fields: &Map<String, Value>, state: &mut GpsState) {
    state.version = Some(Version {
        release: fields.string("release").map(String::from),
        rev: fields.string("rev").map(String::from),
        proto_major: fields.integer("proto_major"),
        proto_minor: fields.integer("proto_minor"),
        remote: fields.string("remote").map(String::from),
        fields: fields.clone(),
    });
}

/// # Device Information
/// - [json_device_read](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/shared_json.c#L28)
fn device(fields: &Map<String, Value>, state: &mut GpsState) {
    state.valid.remove(ValidityFlags::DEVICE_ID);
    state.valid.insert(ValidityFlags::ONLINE | ValidityFlags::DEVICE);
    state.online = true;

    state.device = fields.string("path").map(String::from);
    state.activated = fields.time("activated");

    let id = match (fields.string("driver"), fields.string("subtype")) {
        (Some(driver), Some(subtype)) => Some(format!("{driver} {subtype}")),
        (driver, subtype) => driver.or(subtype).map(String::from),
    };
    state.gps_id = state.valid.mark(ValidityFlags::DEVICE_ID, id);

    state.driver_mode = fields.integer("native").unwrap_or(0);
    state.baudrate = fields
        .integer("bps")
        .and_then(|bps| u32::try_from(bps).ok())
        .unwrap_or(0);
    state.stopbits = fields
        .integer("stopbits")
        .and_then(|bits| u32::try_from(bits).ok())
        .unwrap_or(0);
    state.serialmode = match (fields.string("serialmode"), fields.string("parity")) {
        (Some(mode), _) => mode.to_string(),
        (None, Some(parity)) if state.stopbits > 0 => format!("8{}{}", parity, state.stopbits),
        _ => "8N1".into(),
    };
    state.cycle = fields.number("cycle");
    state.mincycle = fields.number("mincycle");
}

fn devices(fields: &Map<String, Value>, state: &mut GpsState) {
    let Some(list) = fields.get("devices").and_then(Value::as_array) else {
        state.valid.remove(ValidityFlags::DEVICE_LIST);
        return;
    };

    state.devices = list
        .iter()
        .filter_map(Value::as_object)
        .map(|dev| DeviceInfo {
            path: dev.string("path").map(String::from),
            activated: dev.time("activated"),
            driver: dev.string("driver").map(String::from),
            subtype: dev.string("subtype").map(String::from),
            native: dev.integer("native"),
            bps: dev.integer("bps").and_then(|bps| u32::try_from(bps).ok()),
            cycle: dev.number("cycle"),
            mincycle: dev.number("mincycle"),
        })
        .collect();
}

/// Time-Position-Velocity report
///
/// Reference: [json_tpv_read](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/libgps_json.c?ref_type=heads#L34)
fn tpv(fields: &Map<String, Value>, state: &mut GpsState) {
    state.valid.remove(ValidityFlags::FIX | ValidityFlags::STATUS);
    state.valid.insert(ValidityFlags::ONLINE);
    state.online = true;

    let valid = &mut state.valid;
    let fix = &mut state.fix;

    fix.time = valid.mark(ValidityFlags::TIME, fields.epoch("time"));
    // empty when the epoch is past what a calendar date can render
    state.utc = fix.time.and_then(time::iso_time).unwrap_or_default();
    fix.ept = valid.mark(ValidityFlags::TIME_ERR, fields.number("ept"));

    fix.latitude = fields.number("lat");
    fix.longitude = fields.number("lon");
    if fix.latitude.is_some() && fix.longitude.is_some() {
        valid.insert(ValidityFlags::LATLON);
    }

    // `alt` is deprecated in newer daemons in favour of `altHAE`
    let altitude = fields.number("alt").or_else(|| fields.number("altHAE"));
    fix.altitude = valid.mark(ValidityFlags::ALTITUDE, altitude);
    fix.epx = valid.mark(ValidityFlags::HERR, fields.number("epx"));
    fix.epy = valid.mark(ValidityFlags::HERR, fields.number("epy"));
    fix.epv = valid.mark(ValidityFlags::VERR, fields.number("epv"));
    fix.track = valid.mark(ValidityFlags::TRACK, fields.number("track"));
    fix.speed = valid.mark(ValidityFlags::SPEED, fields.number("speed"));
    fix.climb = valid.mark(ValidityFlags::CLIMB, fields.number("climb"));
    fix.epd = fields.number("epd");
    fix.eps = valid.mark(ValidityFlags::SPEED_ERR, fields.number("eps"));
    fix.epc = valid.mark(ValidityFlags::CLIMB_ERR, fields.number("epc"));

    let mode = fields
        .integer("mode")
        .and_then(|code| FixMode::try_from(code).ok());
    if let Some(mode) = valid.mark(ValidityFlags::MODE, mode) {
        fix.mode = mode;
    }
    let status = fields
        .integer("status")
        .and_then(|code| FixStatus::try_from(code).ok());
    if let Some(status) = valid.mark(ValidityFlags::STATUS, status) {
        state.status = status;
    }

    state.epe = fields.number("sep");
}

/// Satellite sky view report
fn sky(fields: &Map<String, Value>, state: &mut GpsState) {
    state.valid.remove(ValidityFlags::DOP);
    state.valid.insert(ValidityFlags::ONLINE);
    state.online = true;

    let valid = &mut state.valid;
    let dop = &mut state.dop;
    dop.x = valid.mark(ValidityFlags::DOP, fields.number("xdop"));
    dop.y = valid.mark(ValidityFlags::DOP, fields.number("ydop"));
    dop.v = valid.mark(ValidityFlags::DOP, fields.number("vdop"));
    dop.h = valid.mark(ValidityFlags::DOP, fields.number("hdop"));
    dop.p = valid.mark(ValidityFlags::DOP, fields.number("pdop"));
    dop.g = valid.mark(ValidityFlags::DOP, fields.number("gdop"));
    dop.t = valid.mark(ValidityFlags::DOP, fields.number("tdop"));

    if let Some(list) = fields.get("satellites").and_then(Value::as_array) {
        let satellites = list
            .iter()
            .filter_map(Value::as_object)
            .filter_map(satellite)
            .collect();
        state.replace_satellites(satellites);
        state.valid.insert(ValidityFlags::SATELLITE);
    }
}

/// - [json_attrs_satellites](https://gitlab.com/gpsd/gpsd/-/blob/master/libgps/libgps_json.c?ref_type=heads#L295)
fn satellite(sat: &Map<String, Value>) -> Option<Satellite> {
    let prn = sat.integer("PRN").and_then(|prn| i32::try_from(prn).ok());
    let Some(prn) = prn else {
        log::debug!("dropping satellite without PRN");
        return None;
    };

    Some(Satellite {
        prn,
        elevation: sat.number("el"),
        azimuth: sat.number("az"),
        ss: sat.number("ss"),
        used: sat.get("used").and_then(Value::as_bool),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(msg: &str, state: &mut GpsState) -> Option<Report> {
        JsonDecoder.decode(msg, state).unwrap()
    }

    #[test]
    fn sniffs_braces() {
        assert!(JsonDecoder.sniff("{\"class\":\"TPV\"}\r\n"));
        assert!(JsonDecoder.sniff("  {\"class\":\"TPV\"}"));
        assert!(!JsonDecoder.sniff("GPSD,X=1\r\n"));
        assert!(!JsonDecoder.sniff("{\"class\":\"TPV\"\r\n"));
    }

    #[test]
    fn tpv_without_altitude() {
        let mut state = GpsState::new();
        let report = decode(r#"{"class":"TPV","lat":10.5,"lon":20.25}"#, &mut state);

        assert_eq!(report, Some(Report::Json(RecordClass::Tpv)));
        assert_eq!(state.fix.latitude, Some(10.5));
        assert_eq!(state.fix.longitude, Some(20.25));
        assert_eq!(state.fix.altitude, None);
        assert!(state.valid.contains(ValidityFlags::LATLON | ValidityFlags::ONLINE));
        assert!(!state.valid.contains(ValidityFlags::ALTITUDE));
        assert!(state.online);
    }

    #[test]
    fn tpv_full_report() {
        let mut state = GpsState::new();
        decode(
            r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":3,"status":2,
                "time":"2011-03-29T13:51:55.250Z","ept":0.005,
                "lat":37.3775,"lon":-122.042,"alt":12.5,"epx":4.0,"epy":5.0,
                "epv":8.0,"track":101.3,"speed":0.2,"climb":0.1,"epd":2.0,
                "eps":0.5,"epc":0.3,"sep":9.1}"#,
            &mut state,
        );

        let fix = &state.fix;
        assert_eq!(fix.time, Some(1_301_406_715.25));
        assert_eq!(state.utc, "2011-03-29T13:51:55.250Z");
        assert_eq!(fix.epx, Some(4.0));
        assert_eq!(fix.epy, Some(5.0));
        assert_eq!(fix.epd, Some(2.0));
        assert_eq!(fix.mode, FixMode::Fix3D);
        assert_eq!(state.status, FixStatus::DgpsFix);
        assert_eq!(state.epe, Some(9.1));
        assert_eq!(
            state.valid,
            ValidityFlags::FIX | ValidityFlags::STATUS | ValidityFlags::ONLINE
        );
    }

    #[test]
    fn tpv_numeric_time() {
        let mut state = GpsState::new();
        decode(r#"{"class":"TPV","time":1301406715.5,"mode":2}"#, &mut state);
        assert_eq!(state.fix.time, Some(1_301_406_715.5));
        assert_eq!(state.utc, "2011-03-29T13:51:55.500Z");
        assert_eq!(state.fix.mode, FixMode::Fix2D);
    }

    #[test]
    fn tpv_numeric_time_is_kept_verbatim() {
        let mut state = GpsState::new();
        decode(r#"{"class":"TPV","time":12345.678901234567}"#, &mut state);
        assert_eq!(state.fix.time, Some(12345.678901234567));
        assert!(state.valid.contains(ValidityFlags::TIME));

        decode(r#"{"class":"TPV","time":3e-10}"#, &mut state);
        assert_eq!(state.fix.time, Some(3e-10));
        assert_eq!(state.utc, "1970-01-01T00:00:00.000Z");

        // beyond any calendar date: still a valid epoch, but no UTC rendering
        decode(r#"{"class":"TPV","time":10000000000000.0}"#, &mut state);
        assert_eq!(state.fix.time, Some(10_000_000_000_000.0));
        assert!(state.valid.contains(ValidityFlags::TIME));
        assert_eq!(state.utc, "");
    }

    #[test]
    fn error_without_message() {
        let mut state = GpsState::new();
        decode(r#"{"class":"ERROR","message":"unrecognized request"}"#, &mut state);
        assert_eq!(state.error.as_deref(), Some("unrecognized request"));

        decode(r#"{"class":"ERROR"}"#, &mut state);
        assert_eq!(state.error, None);
        assert!(!state.valid.contains(ValidityFlags::ERROR));
    }

    #[test]
    fn tpv_wrong_types_degrade() {
        let mut state = GpsState::new();
        decode(
            r#"{"class":"TPV","time":"soon","lat":"north","lon":1.0,"speed":3.0,"mode":0}"#,
            &mut state,
        );
        assert_eq!(state.fix.time, None);
        assert_eq!(state.utc, "");
        assert_eq!(state.fix.latitude, None);
        assert_eq!(state.fix.speed, Some(3.0));
        assert_eq!(state.fix.mode, FixMode::NoFix);
        assert!(!state.valid.intersects(
            ValidityFlags::TIME | ValidityFlags::LATLON | ValidityFlags::MODE
        ));
        assert!(state.valid.contains(ValidityFlags::SPEED));
    }

    #[test]
    fn device_without_path_is_rejected() {
        let mut state = GpsState::new();
        let err = JsonDecoder
            .decode(r#"{"class":"DEVICE","driver":"SiRF"}"#, &mut state)
            .unwrap_err();
        assert!(matches!(err, GpsdError::ProtocolError(_)));
        assert_eq!(state, GpsState::new());
    }

    #[test]
    fn device_record() {
        let mut state = GpsState::new();
        decode(
            r#"{"class":"DEVICE","path":"/dev/ttyUSB0","activated":"2011-03-29T13:51:55.000Z",
                "driver":"SiRF","subtype":"GSW3.2.4","native":1,"bps":4800,
                "parity":"N","stopbits":1,"cycle":1.0}"#,
            &mut state,
        );

        assert_eq!(state.device.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(state.gps_id.as_deref(), Some("SiRF GSW3.2.4"));
        assert_eq!(state.driver_mode, 1);
        assert_eq!(state.baudrate, 4800);
        assert_eq!(state.stopbits, 1);
        assert_eq!(state.serialmode, "8N1");
        assert_eq!(state.cycle, Some(1.0));
        assert_eq!(state.mincycle, None);
        assert_eq!(
            state.activated.map(|dt| dt.timestamp()),
            Some(1_301_406_715)
        );
        assert_eq!(
            state.valid,
            ValidityFlags::ONLINE | ValidityFlags::DEVICE | ValidityFlags::DEVICE_ID
        );
    }

    #[test]
    fn device_without_driver_has_no_id() {
        let mut state = GpsState::new();
        decode(r#"{"class":"DEVICE","path":"/dev/gps0","parity":"E","stopbits":2}"#, &mut state);
        assert_eq!(state.gps_id, None);
        assert_eq!(state.baudrate, 0);
        assert_eq!(state.serialmode, "8E2");
        assert!(!state.valid.contains(ValidityFlags::DEVICE_ID));
    }

    #[test]
    fn sky_replaces_satellites() {
        let mut state = GpsState::new();
        decode(
            r#"{"class":"SKY","hdop":1.2,"pdop":2.1,"satellites":[
                {"PRN":1,"el":10,"az":80,"ss":40,"used":true},
                {"PRN":2,"el":20,"az":150,"ss":35,"used":false},
                {"el":5,"az":10}]}"#,
            &mut state,
        );

        assert_eq!(state.satellites().len(), 2);
        assert_eq!(state.satellites()[0].elevation, Some(10.0));
        assert_eq!(state.satellites_used(), 1);
        assert_eq!(state.dop.h, Some(1.2));
        assert_eq!(state.dop.x, None);
        assert!(state.valid.contains(
            ValidityFlags::DOP | ValidityFlags::SATELLITE | ValidityFlags::ONLINE
        ));
    }

    #[test]
    fn sky_without_list_keeps_satellites() {
        let mut state = GpsState::new();
        decode(
            r#"{"class":"SKY","hdop":1.2,"satellites":[{"PRN":7,"used":true}]}"#,
            &mut state,
        );
        decode(r#"{"class":"SKY"}"#, &mut state);

        assert_eq!(state.satellites().len(), 1);
        assert_eq!(state.satellites()[0].used, Some(true));
        assert_eq!(state.satellites()[0].ss, None);
        assert_eq!(state.dop.h, None);
        assert!(!state.valid.contains(ValidityFlags::DOP));
    }

    #[test]
    fn version_keeps_whole_record() {
        let mut state = GpsState::new();
        decode(
            r#"{"class":"VERSION","release":"3.25","rev":"3.25","proto_major":3,"proto_minor":15}"#,
            &mut state,
        );
        let version = state.version.as_ref().unwrap();
        assert_eq!(version.release.as_deref(), Some("3.25"));
        assert_eq!(version.proto_major, Some(3));
        assert_eq!(version.remote, None);
        assert_eq!(version.fields.len(), 4);
        assert!(state.valid.contains(ValidityFlags::VERSION));
    }

    #[test]
    fn episodic_bits_last_one_record() {
        let mut state = GpsState::new();
        decode(r#"{"class":"ERROR","message":"unrecognized request"}"#, &mut state);
        assert!(state.valid.contains(ValidityFlags::ERROR));
        assert_eq!(state.error.as_deref(), Some("unrecognized request"));

        decode(r#"{"class":"GST","rms":1.5}"#, &mut state);
        assert!(state.valid.contains(ValidityFlags::GST));
        assert!(!state.valid.contains(ValidityFlags::ERROR));

        decode(r#"{"class":"TPV","lat":1.0,"lon":2.0}"#, &mut state);
        assert!(!state.valid.intersects(ValidityFlags::UNION));
    }

    #[test]
    fn devices_and_watch() {
        let mut state = GpsState::new();
        decode(
            r#"{"class":"DEVICES","devices":[
                {"class":"DEVICE","path":"/dev/ttyUSB0","driver":"u-blox","bps":9600,
                 "activated":1301406715.0},
                {"class":"DEVICE","path":"/dev/ttyUSB1"}]}"#,
            &mut state,
        );
        assert_eq!(state.devices.len(), 2);
        assert_eq!(state.devices[0].bps, Some(9600));
        assert_eq!(
            state.devices[0].activated.map(|dt| dt.timestamp()),
            Some(1_301_406_715)
        );
        assert_eq!(state.devices[1].driver, None);
        assert!(state.valid.contains(ValidityFlags::DEVICE_LIST));

        decode(r#"{"class":"WATCH","enable":true,"json":true}"#, &mut state);
        let policy = state.policy.as_ref().unwrap();
        assert_eq!(policy.enable, Some(true));
        assert!(state.valid.contains(ValidityFlags::POLICY));
        assert!(!state.valid.contains(ValidityFlags::DEVICE_LIST));
    }

    #[test]
    fn unknown_class_is_accepted_untouched() {
        let mut state = GpsState::new();
        let report = decode(r#"{"class":"ATT","heading":12.0}"#, &mut state);
        assert_eq!(
            report,
            Some(Report::Json(RecordClass::Other("ATT".into())))
        );
        assert_eq!(state, GpsState::new());
    }

    #[test]
    fn malformed_record_is_skipped() {
        let mut state = GpsState::new();
        assert_eq!(decode(r#"{"class":"TPV","lat":}"#, &mut state), None);
        assert_eq!(decode(r#"{"lat":1.0}"#, &mut state), None);
        assert_eq!(state, GpsState::new());
    }
}
