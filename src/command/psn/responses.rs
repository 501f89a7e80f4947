//! Responses for Packet Switched Data Services Commands
use atat::atat_derive::AtatResp;

/// 7.2.10 Network registration status +CGREG
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct GPRSNetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: u8,
    #[at_arg(position = 1)]
    pub stat: u8,
}
