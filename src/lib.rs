#![cfg_attr(not(test), no_std)]
//! Blocking driver for SIMCom SIM900 class cellular modems.
//!
//! The driver talks AT commands over a line-framed serial [`Transport`] and
//! walks the modem through power on, PIN check, identity, network
//! registration, GPRS attach, carrier detection and TCP/IP bearer
//! activation. Every stage records its outcome in sticky [`state`] flags.
//!
//! ```ignore
//! let transport = BufferedTransport::<_, 64>::new(uart);
//! let mut modem: Modem<_, _, _, 64> = Modem::new(transport, delay, board);
//!
//! modem.power_on()?;
//! let address = modem.tcpip_on()?;
//! modem.tcp_connect("example.org", 80)?;
//! ```

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod client;
pub mod command;
pub mod config;
pub mod error;
mod escape;
pub mod gprs;
mod module_timing;
mod power;
pub mod protocol;
pub mod registration;
pub mod state;
pub mod tcp;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use client::Modem;
pub use config::{Apn, ModemConfig};
pub use error::Error;
pub use protocol::{Answer, MatchMode};
pub use state::{ConnectionState, ErrorFlags, ErrorKind, Provider, SessionState, Status};
pub use transport::{BufferedTransport, Transport};
