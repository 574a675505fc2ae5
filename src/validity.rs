//! Per-field validity bitmask
//!
//! Every decodable field group owns one bit. A bit is set only when the most
//! recent update that touched its group actually supplied a usable value, so
//! consumers can tell "not reported" apart from "reported as zero".

use serde::Serialize;

bitflags::bitflags! {
    /// Field groups populated by the most recent update
    ///
    /// Bit positions follow gpsd's `gps_mask_t` numbering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ValidityFlags: u32 {
        /// Online status of the receiver
        const ONLINE = 1 << 1;
        /// Fix time
        const TIME = 1 << 2;
        /// Fix time error estimate
        const TIME_ERR = 1 << 3;
        /// Latitude and longitude
        const LATLON = 1 << 4;
        const ALTITUDE = 1 << 5;
        const SPEED = 1 << 6;
        const TRACK = 1 << 7;
        const CLIMB = 1 << 8;
        /// Fix status (plain, differential)
        const STATUS = 1 << 9;
        /// Fix mode (no fix, 2D, 3D)
        const MODE = 1 << 10;
        /// Dilution of precision figures
        const DOP = 1 << 11;
        /// Horizontal error estimates
        const HERR = 1 << 12;
        /// Vertical error estimate
        const VERR = 1 << 13;
        const ATTITUDE = 1 << 14;
        /// Satellite list
        const SATELLITE = 1 << 15;
        const SPEED_ERR = 1 << 16;
        const TRACK_ERR = 1 << 17;
        const CLIMB_ERR = 1 << 18;
        /// Current device path
        const DEVICE = 1 << 19;
        /// List of devices known to the daemon
        const DEVICE_LIST = 1 << 20;
        /// Receiver identification string
        const DEVICE_ID = 1 << 21;
        const RTCM2 = 1 << 22;
        const RTCM3 = 1 << 23;
        const AIS = 1 << 24;
        /// A recognized message was decoded
        const PACKET = 1 << 25;
        /// Raw navigation subframe
        const SUBFRAME = 1 << 26;
        /// Pseudorange noise statistics
        const GST = 1 << 27;
        const VERSION = 1 << 28;
        /// Watch policy
        const POLICY = 1 << 29;
        const ERROR = 1 << 30;

        /// Episodic record kinds, valid only for the record that carried them
        const UNION = Self::RTCM2.bits()
            | Self::RTCM3.bits()
            | Self::SUBFRAME.bits()
            | Self::AIS.bits()
            | Self::VERSION.bits()
            | Self::DEVICE_LIST.bits()
            | Self::ERROR.bits()
            | Self::GST.bits();

        /// Groups re-derived by every fix report, in either encoding
        const FIX = Self::TIME.bits()
            | Self::TIME_ERR.bits()
            | Self::LATLON.bits()
            | Self::ALTITUDE.bits()
            | Self::HERR.bits()
            | Self::VERR.bits()
            | Self::TRACK.bits()
            | Self::SPEED.bits()
            | Self::CLIMB.bits()
            | Self::SPEED_ERR.bits()
            | Self::CLIMB_ERR.bits()
            | Self::MODE.bits();
    }
}

impl ValidityFlags {
    /// Sets `flag` when `value` is known, and passes the value through
    ///
    /// This is the single place where a decoded value turns into a validity
    /// bit; decoders never set a field's bit directly.
    pub(crate) fn mark<T>(&mut self, flag: ValidityFlags, value: Option<T>) -> Option<T> {
        if value.is_some() {
            self.insert(flag);
        }
        value
    }
}

impl Serialize for ValidityFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_the_episodic_kinds() {
        let union = ValidityFlags::UNION;
        assert!(union.contains(ValidityFlags::VERSION | ValidityFlags::ERROR));
        assert!(union.contains(ValidityFlags::RTCM2 | ValidityFlags::RTCM3));
        assert!(!union.intersects(ValidityFlags::FIX));
        assert!(!union.contains(ValidityFlags::POLICY));
        assert!(!union.contains(ValidityFlags::PACKET));
    }

    #[test]
    fn mark_sets_only_for_known_values() {
        let mut valid = ValidityFlags::empty();
        assert_eq!(valid.mark(ValidityFlags::SPEED, None::<f64>), None);
        assert!(valid.is_empty());

        assert_eq!(valid.mark(ValidityFlags::SPEED, Some(0.0)), Some(0.0));
        assert_eq!(valid, ValidityFlags::SPEED);
    }

    #[test]
    fn serializes_as_raw_bits() {
        let flags = ValidityFlags::ONLINE | ValidityFlags::TIME;
        let serialized = serde_json::to_string(&flags).unwrap();
        assert_eq!(serialized, "6");
    }
}
