//! ### 8 - AT commands for TCPIP application toolkit
//!
//! The TCP/IP stack has to walk through `IP INITIAL` -> `IP START` (after
//! `+CSTT`) -> `IP GPRSACT` (after `+CIICR`) -> `IP STATUS` (after `+CIFSR`)
//! before a connection can be started.
pub mod types;

use super::NoResponse;
use atat::atat_derive::AtatCmd;
use types::TransparentMode;

/// 8.2.1 Start up TCP or UDP connection +CIPSTART
///
/// Answers `OK` then, asynchronously, `CONNECT OK` (or `CONNECT` in
/// transparent mode) once the link is up.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTART", NoResponse, timeout_ms = 75000)]
pub struct StartConnection<'a> {
    #[at_arg(position = 0, len = 3)]
    pub mode: &'a str,
    #[at_arg(position = 1, len = 64)]
    pub address: &'a str,
    #[at_arg(position = 2)]
    pub port: u16,
}

/// 8.2.4 Close TCP or UDP connection +CIPCLOSE
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPCLOSE", NoResponse)]
pub struct CloseConnection;

/// 8.2.5 Deactivate GPRS PDP context +CIPSHUT
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSHUT", NoResponse, timeout_ms = 65000)]
pub struct Shutdown;

/// 8.2.9 Start task and set APN, user name, password +CSTT
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSTT", NoResponse)]
pub struct StartTask<'a> {
    #[at_arg(position = 0, len = 50)]
    pub apn: &'a str,
    #[at_arg(position = 1, len = 50)]
    pub username: Option<&'a str>,
    #[at_arg(position = 2, len = 50)]
    pub password: Option<&'a str>,
}

/// 8.2.10 Bring up wireless connection with GPRS +CIICR
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIICR", NoResponse, timeout_ms = 85000)]
pub struct BringUpWireless;

/// 8.2.11 Get local IP address +CIFSR
///
/// Answers the bare address on a line of its own, without `OK`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIFSR", NoResponse)]
pub struct GetLocalIp;

/// 8.2.12 Query current connection status +CIPSTATUS
///
/// Answers `OK` followed by `STATE: <state>`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTATUS", NoResponse)]
pub struct GetConnectionStatus;

/// 8.2.20 Select TCPIP application mode +CIPMODE
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPMODE", NoResponse)]
pub struct SetTransparentMode {
    #[at_arg(position = 0)]
    pub mode: TransparentMode,
}

/// 8.2.21 Configure transparent transfer mode +CIPCCFG
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPCCFG?", NoResponse)]
pub struct GetTransparentConfig;
