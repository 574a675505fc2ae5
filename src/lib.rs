//! # gpsd-state
//!
//! A Rust library that folds gpsd reports into one typed GPS state.
//!
//! gpsd has spoken two wire protocols over its lifetime: the older
//! comma-delimited one (`GPSD,O=...`) and the JSON one (`{"class":"TPV",...}`).
//! This crate decodes both into a single [`state::GpsState`], tracking in a
//! [`validity::ValidityFlags`] bitmask which fields the latest reports
//! actually carried.
//!
//! ## Overview
//!
//! - [`dispatch::Dispatcher`] owns the state and routes each message to the
//!   decoder for its encoding. Once a JSON record has been seen the session
//!   is considered structured, but legacy messages are still decoded.
//! - [`protocol`] holds the two decoders and the streaming request builder.
//! - [`client`] wraps a dispatcher around a connection, async or blocking.
//!
//! ## Example
//!
//! ```
//! use gpsd_state::dispatch::Dispatcher;
//! use gpsd_state::validity::ValidityFlags;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.decode("{\"class\":\"TPV\",\"mode\":3,\"lat\":37.3775,\"lon\":-122.042}\r\n")?;
//!
//! let state = dispatcher.state();
//! assert!(state.valid.contains(ValidityFlags::LATLON));
//! assert_eq!(state.fix.latitude, Some(37.3775));
//! # Ok::<(), gpsd_state::error::GpsdError>(())
//! ```

use crate::error::GpsdError;

/// Session client over a gpsd connection
pub mod client;

/// Message routing and per-session state ownership
pub mod dispatch;

/// Error types used throughout the library
pub mod error;

/// Wire protocol decoders and requests
pub mod protocol;

/// The decoded GPS state
pub mod state;

/// Validity bitmask
pub mod validity;

mod time;

/// Convenience type alias for Results with GpsdError
pub type Result<T> = core::result::Result<T, GpsdError>;
