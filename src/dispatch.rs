//! Per-session message dispatch
//!
//! The [`Dispatcher`] owns the session's [`GpsState`]. Each incoming message
//! is sniffed, handed to the matching [`Decoder`], and the outcome reported
//! back; consumers only ever get read-only access to the state.

use crate::{
    Result,
    protocol::{Decoder, Encoding, Report, json::JsonDecoder, legacy::LegacyDecoder},
    state::GpsState,
    validity::ValidityFlags,
};

/// Routes raw messages to the decoder for their encoding
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    state: GpsState,
    structured: bool,
    legacy_seen: bool,
}

impl Dispatcher {
    /// A dispatcher with a fresh state and no encoding seen yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The state as of the last decoded message
    pub fn state(&self) -> &GpsState {
        &self.state
    }

    /// Ends the session, handing over the final state
    pub fn into_state(self) -> GpsState {
        self.state
    }

    /// Whether the peer has sent at least one JSON record
    ///
    /// Once set this never resets; a later legacy message is still decoded.
    pub fn is_structured(&self) -> bool {
        self.structured
    }

    /// Protocol generation to use for outbound requests
    ///
    /// JSON unless the peer has only ever spoken the legacy protocol.
    pub fn generation(&self) -> Encoding {
        if !self.structured && self.legacy_seen {
            Encoding::Legacy
        } else {
            Encoding::Json
        }
    }

    /// Decodes one raw message into the session state
    ///
    /// Unrecognized and malformed messages leave the state untouched and
    /// come back as [`Report::Unrecognized`]. A record that violates the
    /// protocol contract is an error; the state is untouched then too.
    pub fn decode(&mut self, msg: &str) -> Result<Report> {
        // The encoding the peer has already demonstrated is tried first.
        let decoders: [&dyn Decoder; 2] = if self.structured {
            [&JsonDecoder as &dyn Decoder, &LegacyDecoder]
        } else {
            [&LegacyDecoder as &dyn Decoder, &JsonDecoder]
        };

        let Some(decoder) = decoders.into_iter().find(|decoder| decoder.sniff(msg)) else {
            log::debug!("unrecognized message: {:?}", msg.trim_end());
            return Ok(Report::Unrecognized);
        };

        let Some(report) = decoder.decode(msg, &mut self.state)? else {
            return Ok(Report::Unrecognized);
        };

        match decoder.encoding() {
            Encoding::Json => self.structured = true,
            Encoding::Legacy => self.legacy_seen = true,
        }
        self.state.valid.insert(ValidityFlags::PACKET);
        Ok(report)
    }
}
