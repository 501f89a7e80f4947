//! ### 6 - AT commands for SIMCom proprietary features
pub mod types;

use super::NoResponse;
use atat::atat_derive::AtatCmd;
use types::{NetLightIndication, NetLightState, PowerDownMode, UrcPresentation};

/// 6.2.1 Power off +CPOWD
///
/// A normal power down is confirmed by the `NORMAL POWER DOWN` URC.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPOWD", NoResponse)]
pub struct PowerDown {
    #[at_arg(position = 0)]
    pub mode: PowerDownMode,
}

/// 6.2.27 Enable or disable initial URC presentation +CIURC
///
/// When enabled the modem reports `Call Ready` once it is able to serve calls.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIURC", NoResponse)]
pub struct SetUrcPresentation {
    #[at_arg(position = 0)]
    pub mode: UrcPresentation,
}

/// 6.2.56 Set the timer period of net light +SLEDS
#[derive(Clone, AtatCmd)]
#[at_cmd("+SLEDS", NoResponse)]
pub struct SetNetLightTiming {
    #[at_arg(position = 0)]
    pub state: NetLightState,
    /// Lit time in ms
    #[at_arg(position = 1)]
    pub on: u16,
    /// Dark time in ms
    #[at_arg(position = 2)]
    pub off: u16,
}

/// 6.2.62 Close the net light or open it to shining +CNETLIGHT
#[derive(Clone, AtatCmd)]
#[at_cmd("+CNETLIGHT", NoResponse)]
pub struct SetNetLightIndication {
    #[at_arg(position = 0)]
    pub mode: NetLightIndication,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::serialize;

    #[test]
    fn serialize_system_commands() {
        assert_eq!(
            serialize(&SetNetLightTiming {
                state: NetLightState::NotRegistered,
                on: 53,
                off: 790,
            }),
            "AT+SLEDS=1,53,790\r\n"
        );
        assert_eq!(
            serialize(&PowerDown {
                mode: PowerDownMode::Normal
            }),
            "AT+CPOWD=1\r\n"
        );
        assert_eq!(
            serialize(&SetUrcPresentation {
                mode: UrcPresentation::Enabled
            }),
            "AT+CIURC=1\r\n"
        );
    }
}
