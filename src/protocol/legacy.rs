//! Legacy (pre-JSON) gpsd responses
//!
//! A legacy response is one line: the `GPSD` sentinel followed by
//! comma-separated `<letter>=<payload>` fields, for example
//!
//! ```text
//! GPSD,O=RMC 1301406715.000 0.005 37.3775 -122.0420 12.5 4.0 8.0 101.3 0.2 0.0 ? 0.5 ? 3
//! ```
//!
//! Letters this client understands:
//!
//! | letter | payload |
//! |--------|---------|
//! | `F` | device path |
//! | `I` | receiver identification |
//! | `O` | fix report, space-separated sub-fields |
//! | `X` | online status |
//! | `Y` | satellite list, colon-separated blocks |
//!
//! Anything else is ignored.

use crate::{
    Result,
    protocol::{Decoder, Encoding, Report},
    state::{FixMode, GpsState, Satellite},
    time,
    validity::ValidityFlags,
};

/// First token of every legacy response
pub const SENTINEL: &str = "GPSD";

/// Decoder for the legacy comma-delimited encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDecoder;

impl Decoder for LegacyDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::Legacy
    }

    fn sniff(&self, msg: &str) -> bool {
        msg.trim_start().starts_with(SENTINEL)
    }

    fn decode(&self, msg: &str, state: &mut GpsState) -> Result<Option<Report>> {
        let mut segments = msg.trim().split(',');
        if segments.next().map(str::trim) != Some(SENTINEL) {
            log::debug!("not a legacy response: {msg:?}");
            return Ok(None);
        }

        for (cmd, payload) in fields(segments) {
            apply(cmd, &payload, state);
        }
        Ok(Some(Report::Legacy))
    }
}

/// Groups comma-separated segments into `(letter, payload)` fields
///
/// Segments without the `letter=` shape are dropped, except after a `Y`
/// field, whose satellite blocks may themselves contain commas.
fn fields<'a>(segments: impl Iterator<Item = &'a str>) -> Vec<(char, String)> {
    let mut fields: Vec<(char, String)> = Vec::new();
    for segment in segments {
        if let Some((cmd, payload)) = split_command(segment) {
            fields.push((cmd, payload.to_string()));
            continue;
        }
        match fields.last_mut() {
            Some(('Y', payload)) => {
                payload.push(',');
                payload.push_str(segment);
            }
            _ => log::trace!("skipping legacy field {segment:?}"),
        }
    }
    fields
}

fn split_command(segment: &str) -> Option<(char, &str)> {
    let mut chars = segment.chars();
    let cmd = chars.next().filter(char::is_ascii_alphabetic)?;
    let payload = chars.as_str().strip_prefix('=')?;
    Some((cmd.to_ascii_uppercase(), payload))
}

fn apply(cmd: char, payload: &str, state: &mut GpsState) {
    // `?` means the daemon withholds the value; the fix report handles it
    // per sub-field instead.
    if cmd != 'O' && payload.starts_with('?') {
        return;
    }

    match cmd {
        'F' => {
            state.valid.remove(ValidityFlags::DEVICE);
            state.device = state.valid.mark(ValidityFlags::DEVICE, Some(payload.to_string()));
        }
        'I' => {
            state.valid.remove(ValidityFlags::DEVICE_ID);
            state.gps_id = state.valid.mark(ValidityFlags::DEVICE_ID, Some(payload.to_string()));
        }
        'O' => decode_fix(payload, state),
        'X' => {
            state.valid.remove(ValidityFlags::ONLINE);
            if let Some(online) = state.valid.mark(ValidityFlags::ONLINE, number(payload.trim())) {
                state.online = online != 0.0;
            }
        }
        'Y' => {
            state.valid.remove(ValidityFlags::SATELLITE);
            match satellites(payload) {
                Some(sats) => {
                    state.replace_satellites(sats);
                    state.valid.insert(ValidityFlags::SATELLITE);
                }
                None => log::debug!("unparseable satellite list {payload:?}"),
            }
        }
        _ => {}
    }
}

/// Parses a numeric sub-field; `?` and anything non-finite are unknown
fn number(text: &str) -> Option<f64> {
    if text == "?" {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decodes an `O` fix report
///
/// Sub-fields: 0 tag, 1 time, 2 time error, 3 latitude, 4 longitude,
/// 5 altitude, 6 horizontal error, 7 vertical error, 8 track, 9 speed,
/// 10 climb, 11 track error, 12 speed error, 13 climb error, 14 mode.
fn decode_fix(payload: &str, state: &mut GpsState) {
    let sub: Vec<&str> = payload.split_whitespace().collect();
    state.valid.remove(ValidityFlags::FIX);

    if sub.first().is_none_or(|tag| *tag == "?") {
        // No fix at all: the FIX bits stay cleared and only MODE is asserted.
        state.fix.mode = FixMode::NoFix;
        state.valid.insert(ValidityFlags::MODE);
        return;
    }

    let field = |i: usize| sub.get(i).and_then(|text| number(text));
    let valid = &mut state.valid;
    let fix = &mut state.fix;

    fix.time = valid.mark(ValidityFlags::TIME, field(1));
    state.utc = fix.time.and_then(time::iso_time).unwrap_or_default();
    fix.ept = valid.mark(ValidityFlags::TIME_ERR, field(2));

    fix.latitude = field(3);
    fix.longitude = field(4);
    if fix.latitude.is_some() && fix.longitude.is_some() {
        valid.insert(ValidityFlags::LATLON);
    }

    fix.altitude = valid.mark(ValidityFlags::ALTITUDE, field(5));
    let herr = valid.mark(ValidityFlags::HERR, field(6));
    fix.epx = herr;
    fix.epy = herr;
    fix.epv = valid.mark(ValidityFlags::VERR, field(7));
    fix.track = valid.mark(ValidityFlags::TRACK, field(8));
    fix.speed = valid.mark(ValidityFlags::SPEED, field(9));
    fix.climb = valid.mark(ValidityFlags::CLIMB, field(10));
    fix.epd = field(11);
    fix.eps = valid.mark(ValidityFlags::SPEED_ERR, field(12));
    fix.epc = valid.mark(ValidityFlags::CLIMB_ERR, field(13));

    match sub.get(14) {
        Some(text) => {
            let mode = text
                .parse::<i64>()
                .ok()
                .and_then(|code| FixMode::try_from(code).ok());
            if let Some(mode) = valid.mark(ValidityFlags::MODE, mode) {
                fix.mode = mode;
            }
        }
        None => {
            // Peers that predate the explicit mode sub-field.
            fix.mode = if valid.contains(ValidityFlags::ALTITUDE) {
                FixMode::Fix2D
            } else {
                FixMode::Fix3D
            };
            valid.insert(ValidityFlags::MODE);
        }
    }
}

/// Decodes a `Y` satellite list
///
/// The text before the first colon is a header whose last token is the
/// satellite count; each following block describes one satellite. A header
/// whose last token contains commas carries the first block inline.
fn satellites(payload: &str) -> Option<Vec<Satellite>> {
    let mut blocks = payload.split(':');
    let mut header: Vec<&str> = blocks.next()?.split_whitespace().collect();
    let inline = if header.last().is_some_and(|token| token.contains(',')) {
        header.pop()
    } else {
        None
    };
    let count: usize = header.last()?.parse().ok()?;

    Some(
        inline
            .into_iter()
            .chain(blocks)
            .filter(|block| !block.trim().is_empty())
            .take(count)
            .filter_map(satellite)
            .collect(),
    )
}

/// Parses `PRN elevation azimuth [..] ss [used]`, separated by whitespace
/// or commas
fn satellite(block: &str) -> Option<Satellite> {
    let values = block
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse::<i64>)
        .collect::<core::result::Result<Vec<_>, _>>()
        .ok()?;

    let (prn, elevation, azimuth, ss, used) = match values.as_slice() {
        [prn, el, az, ss] => (*prn, *el, *az, *ss, None),
        [prn, el, az, .., ss, used] => (*prn, *el, *az, *ss, Some(*used != 0)),
        _ => {
            log::debug!("short satellite block {block:?}");
            return None;
        }
    };

    Some(Satellite {
        prn: i32::try_from(prn).ok()?,
        elevation: Some(elevation as f64),
        azimuth: Some(azimuth as f64),
        ss: Some(ss as f64),
        used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_FIX: &str = "GPSD,O=RMC 1301406715.000 0.005 37.3775 -122.0420 12.5 4.0 8.0 101.3 0.2 0.1 2.0 0.5 0.3 3\r\n";

    fn decode(msg: &str, state: &mut GpsState) -> Option<Report> {
        LegacyDecoder.decode(msg, state).unwrap()
    }

    #[test]
    fn sniffs_sentinel() {
        assert!(LegacyDecoder.sniff("GPSD,X=1\r\n"));
        assert!(!LegacyDecoder.sniff("{\"class\":\"TPV\"}\r\n"));
        assert!(!LegacyDecoder.sniff("$GPGGA,123519,4807.038,N\r\n"));
    }

    #[test]
    fn full_fix_report() {
        let mut state = GpsState::new();
        assert_eq!(decode(FULL_FIX, &mut state), Some(Report::Legacy));

        let fix = &state.fix;
        assert_eq!(fix.time, Some(1_301_406_715.0));
        assert_eq!(state.utc, "2011-03-29T13:51:55.000Z");
        assert_eq!(fix.ept, Some(0.005));
        assert_eq!(fix.latitude, Some(37.3775));
        assert_eq!(fix.longitude, Some(-122.042));
        assert_eq!(fix.altitude, Some(12.5));
        assert_eq!(fix.epx, Some(4.0));
        assert_eq!(fix.epy, Some(4.0));
        assert_eq!(fix.epv, Some(8.0));
        assert_eq!(fix.track, Some(101.3));
        assert_eq!(fix.speed, Some(0.2));
        assert_eq!(fix.climb, Some(0.1));
        assert_eq!(fix.epd, Some(2.0));
        assert_eq!(fix.eps, Some(0.5));
        assert_eq!(fix.epc, Some(0.3));
        assert_eq!(fix.mode, FixMode::Fix3D);
        assert_eq!(state.valid, ValidityFlags::FIX);
    }

    #[test]
    fn question_marks_are_unknown_without_bits() {
        let mut state = GpsState::new();
        decode(
            "GPSD,O=RMC ? ? 37.3775 ? ? ? ? ? ? ? ? ? ? 2",
            &mut state,
        );

        assert_eq!(state.fix.time, None);
        assert_eq!(state.utc, "");
        assert_eq!(state.fix.latitude, Some(37.3775));
        assert_eq!(state.fix.longitude, None);
        assert_eq!(state.fix.altitude, None);
        assert_eq!(state.fix.speed, None);
        assert!(!state.valid.intersects(
            ValidityFlags::TIME
                | ValidityFlags::TIME_ERR
                | ValidityFlags::LATLON
                | ValidityFlags::ALTITUDE
                | ValidityFlags::SPEED
        ));
        assert_eq!(state.fix.mode, FixMode::Fix2D);
        assert!(state.valid.contains(ValidityFlags::MODE));
    }

    #[test]
    fn unparseable_values_degrade_to_unknown() {
        let mut state = GpsState::new();
        decode(
            "GPSD,O=RMC 1301406715 nan 37.0 -122.0 high 4.0 8.0 inf 0.2 0.1 ? 0.5 0.3 3",
            &mut state,
        );

        assert_eq!(state.fix.ept, None);
        assert_eq!(state.fix.altitude, None);
        assert_eq!(state.fix.track, None);
        assert_eq!(state.fix.speed, Some(0.2));
        assert!(!state.valid.contains(ValidityFlags::TIME_ERR));
        assert!(!state.valid.contains(ValidityFlags::ALTITUDE));
        assert!(!state.valid.contains(ValidityFlags::TRACK));
        assert!(state.valid.contains(ValidityFlags::SPEED | ValidityFlags::LATLON));
    }

    #[test]
    fn omitted_field_clears_its_bit() {
        let mut state = GpsState::new();
        decode(FULL_FIX, &mut state);
        assert!(state.valid.contains(ValidityFlags::ALTITUDE | ValidityFlags::CLIMB));

        decode(
            "GPSD,O=RMC 1301406716.000 0.005 37.3775 -122.0420 ? 4.0 8.0 101.3 0.2 ? 2.0 0.5 0.3 2",
            &mut state,
        );
        assert_eq!(state.fix.altitude, None);
        assert_eq!(state.fix.climb, None);
        assert!(!state.valid.contains(ValidityFlags::ALTITUDE));
        assert!(!state.valid.contains(ValidityFlags::CLIMB));
        assert!(state.valid.contains(ValidityFlags::TIME | ValidityFlags::SPEED));
    }

    #[test]
    fn mode_fallback_for_short_reports() {
        let mut state = GpsState::new();
        decode("GPSD,O=RMC 1301406715 0.005 37.0 -122.0 12.5", &mut state);
        assert_eq!(state.fix.mode, FixMode::Fix2D);
        assert!(state.valid.contains(ValidityFlags::MODE));
        // sub-fields past the end are unknown
        assert_eq!(state.fix.track, None);
        assert!(!state.valid.contains(ValidityFlags::TRACK));

        decode("GPSD,O=RMC 1301406715 0.005 37.0 -122.0 ?", &mut state);
        assert_eq!(state.fix.mode, FixMode::Fix3D);
        assert!(state.valid.contains(ValidityFlags::MODE));
    }

    #[test]
    fn bad_explicit_mode_leaves_bit_clear() {
        let mut state = GpsState::new();
        decode(FULL_FIX, &mut state);
        decode(
            "GPSD,O=RMC 1301406715 ? 37.0 -122.0 ? ? ? ? ? ? ? ? ? 0",
            &mut state,
        );
        assert_eq!(state.fix.mode, FixMode::Fix3D);
        assert!(!state.valid.contains(ValidityFlags::MODE));
    }

    #[test]
    fn no_fix_report() {
        let mut state = GpsState::new();
        decode(FULL_FIX, &mut state);
        decode("GPSD,O=?", &mut state);
        assert_eq!(state.fix.mode, FixMode::NoFix);
        assert_eq!(state.valid, ValidityFlags::MODE);
    }

    #[test]
    fn device_id_and_online() {
        let mut state = GpsState::new();
        decode("GPSD,F=/dev/ttyUSB0,I=SiRF binary,X=1301406715.5", &mut state);
        assert_eq!(state.device.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(state.gps_id.as_deref(), Some("SiRF binary"));
        assert!(state.online);
        assert!(state.valid.contains(
            ValidityFlags::DEVICE | ValidityFlags::DEVICE_ID | ValidityFlags::ONLINE
        ));

        decode("GPSD,X=0", &mut state);
        assert!(!state.online);
        assert!(state.valid.contains(ValidityFlags::ONLINE));
    }

    #[test]
    fn withheld_values_are_skipped() {
        let mut state = GpsState::new();
        decode("GPSD,F=/dev/ttyUSB0", &mut state);
        decode("GPSD,F=?,I=?", &mut state);
        assert_eq!(state.device.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(state.gps_id, None);
    }

    #[test]
    fn malformed_fields_are_skipped() {
        let mut state = GpsState::new();
        assert_eq!(
            decode("GPSD,garbage,,Q=ignored,X=1", &mut state),
            Some(Report::Legacy)
        );
        assert!(state.online);
        assert_eq!(state.valid, ValidityFlags::ONLINE);
    }

    #[test]
    fn wrong_sentinel_is_not_decoded() {
        let mut state = GpsState::new();
        assert_eq!(decode("GPSDX,X=1", &mut state), None);
        assert_eq!(state, GpsState::new());
    }

    #[test]
    fn satellite_list_with_comma_blocks() {
        let mut state = GpsState::new();
        decode("GPSD,Y=2 1,10,80,200,40,1:2,20,150,90,35,0", &mut state);

        let sats = state.satellites();
        assert_eq!(sats.len(), 2);
        assert_eq!(sats[0].prn, 1);
        assert_eq!(sats[0].used, Some(true));
        assert_eq!(sats[1].prn, 2);
        assert_eq!(sats[1].used, Some(false));
        assert_eq!(state.satellites_used(), 1);
        assert!(state.valid.contains(ValidityFlags::SATELLITE));
    }

    #[test]
    fn satellite_list_with_header() {
        let mut state = GpsState::new();
        decode(
            "GPSD,Y=GSV 1301406715.000 3:5 45 120 40 1:12 30 200 35 0:29 10 300 22:",
            &mut state,
        );

        let sats = state.satellites();
        assert_eq!(sats.len(), 3);
        assert_eq!(sats[0].elevation, Some(45.0));
        assert_eq!(sats[0].azimuth, Some(120.0));
        assert_eq!(sats[0].ss, Some(40.0));
        assert_eq!(sats[2].prn, 29);
        assert_eq!(sats[2].used, None);
        assert_eq!(state.satellites_used(), 1);
    }

    #[test]
    fn satellite_count_limits_blocks() {
        let mut state = GpsState::new();
        decode("GPSD,Y=GSV 0 1:5 45 120 40 1:12 30 200 35 1:", &mut state);
        assert_eq!(state.satellites().len(), 1);
        assert_eq!(state.satellites()[0].prn, 5);
    }

    #[test]
    fn bad_satellite_header_clears_bit() {
        let mut state = GpsState::new();
        decode("GPSD,Y=GSV 0 1:5 45 120 40 1:", &mut state);
        decode("GPSD,Y=GSV 0 many:5 45 120 40 1:", &mut state);
        assert!(!state.valid.contains(ValidityFlags::SATELLITE));
        assert_eq!(state.satellites().len(), 1);
    }
}
