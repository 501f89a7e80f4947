//! ### 3.2 - Network service
use super::NoResponse;
use atat::atat_derive::AtatCmd;

/// 3.2.30 Operator selection +COPS
///
/// Read command, answers `+COPS: <mode>[,<format>,<oper>]`, e.g.
/// `+COPS: 0,0,"I TIM"`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS?", NoResponse, timeout_ms = 5000)]
pub struct GetOperatorSelection;
