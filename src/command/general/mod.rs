//! ### 3 - AT commands according to GSM07.07
use super::NoResponse;
use atat::atat_derive::AtatCmd;

/// 3.2.12 Request product serial number identification +CGSN
///
/// Returns the International Mobile Equipment Identity (IMEI) on a line of its
/// own, followed by `OK`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGSN", NoResponse)]
pub struct GetIMEI;
