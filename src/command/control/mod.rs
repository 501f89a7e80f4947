//! ### 2 - AT commands according to V.25TER
pub mod types;

use super::NoResponse;
use atat::atat_derive::AtatCmd;
use types::{BaudRate, Echo};

/// 2.2.8 Set command echo mode E
///
/// Determines whether or not the TA echoes characters received from TE during
/// command state.
#[derive(Clone, AtatCmd)]
#[at_cmd("E", NoResponse, value_sep = false)]
pub struct SetEcho {
    #[at_arg(position = 0)]
    pub enabled: Echo,
}

/// 2.2.12 Switch from command mode to data mode O
///
/// Resumes the connection and switches back from command mode to data mode.
#[derive(Clone, AtatCmd)]
#[at_cmd("O", NoResponse, timeout_ms = 5000)]
pub struct ResumeDataMode;

/// 2.2.27 Set all current parameters to manufacturer defaults &F
///
/// Combined with `&C0` (DCD always on) and `&D0` (DTR ignored), as issued in
/// one line during bring-up.
#[derive(Clone, AtatCmd)]
#[at_cmd("&F&C0&D0", NoResponse)]
pub struct FactoryDefaults;

/// 2.2.39 Set TE-TA fixed local rate +IPR
///
/// Determines the data rate at which the TA accepts commands.
#[derive(Clone, AtatCmd)]
#[at_cmd("+IPR", NoResponse)]
pub struct SetDataRate {
    #[at_arg(position = 0)]
    pub rate: BaudRate,
}
