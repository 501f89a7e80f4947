//! ### 7 - AT commands for GPRS support
//!
//! The packet domain must be attached before the TCP/IP application can start
//! a task and bring up the wireless connection.
pub mod responses;
pub mod types;

use super::NoResponse;
use atat::atat_derive::AtatCmd;
use types::GPRSAttachedState;

/// 7.2.1 Attach or detach from GPRS service +CGATT
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGATT", NoResponse, timeout_ms = 10000)]
pub struct SetGPRSAttached {
    #[at_arg(position = 0)]
    pub state: GPRSAttachedState,
}

/// 7.2.1 Attach or detach from GPRS service +CGATT
///
/// Read command, answers `+CGATT: <state>`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGATT?", NoResponse)]
pub struct GetGPRSAttached;

/// 7.2.10 Network registration status +CGREG
///
/// Read command, answers `+CGREG: <n>,<stat>`; `0,1` means registered on the
/// home network.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGREG?", NoResponse)]
pub struct GetGPRSNetworkRegistrationStatus;

#[cfg(test)]
mod tests {
    use super::responses::GPRSNetworkRegistrationStatus;
    use super::*;
    use crate::test_helpers::serialize;
    use atat::serde_at::de::from_str;

    #[test]
    fn serialize_gprs_commands() {
        assert_eq!(
            serialize(&SetGPRSAttached {
                state: GPRSAttachedState::Attached
            }),
            "AT+CGATT=1\r\n"
        );
        assert_eq!(serialize(&GetGPRSAttached), "AT+CGATT?\r\n");
        assert_eq!(serialize(&GetGPRSNetworkRegistrationStatus), "AT+CGREG?\r\n");
    }

    #[test]
    fn deserialize_registration_status() {
        assert_eq!(
            from_str("+CGREG: 0,5"),
            Ok(GPRSNetworkRegistrationStatus { n: 0, stat: 5 })
        );
    }
}
