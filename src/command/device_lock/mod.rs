//! ### 3.2.28 - SIM lock
use super::NoResponse;
use atat::atat_derive::AtatCmd;

/// 3.2.28 Enter PIN +CPIN
///
/// Read command, answers `+CPIN: READY` when no password is pending.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPIN?", NoResponse, timeout_ms = 5000)]
pub struct GetPinStatus;
