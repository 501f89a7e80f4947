//! AT Commands for SIMCom SIM900/SIM800 module family\
//! Following the SIM900 AT Commands Manual V1.11
//!
//! Commands are only ever serialized here; answers are matched as text lines
//! by the driver, so most commands declare [`NoResponse`].

pub mod control;
pub mod device_lock;
pub mod general;
pub mod ip_transport_layer;
pub mod network_service;
pub mod psn;
pub mod system_features;

use atat::atat_derive::{AtatCmd, AtatResp};

#[derive(Clone, AtatResp)]
pub struct NoResponse;

/// Bare `AT`, answered with `OK` by a responsive modem
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse)]
pub struct AT;
