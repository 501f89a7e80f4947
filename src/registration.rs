use embedded_hal::delay::DelayNs;

use crate::client::Modem;
use crate::command::psn::{
    responses::GPRSNetworkRegistrationStatus, GetGPRSNetworkRegistrationStatus,
};
use crate::config::ModemConfig;
use crate::error::Error;
use crate::module_timing::registration_poll_interval;
use crate::protocol::{line, Answer};
use crate::state::ErrorKind;
use crate::transport::Transport;

const REGISTRATION_POLLS: u8 = 5;
const HOME_REGISTERED: &[u8] = b"+CGREG: 0,1";

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    #[default]
    None,
    NotRegistering,
    Home,
    Searching,
    Denied,
    Unknown,
    Roaming,
}

impl From<u8> for Status {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::NotRegistering,
            1 => Self::Home,
            2 => Self::Searching,
            3 => Self::Denied,
            4 => Self::Unknown,
            5 => Self::Roaming,
            _ => Self::None,
        }
    }
}

impl Status {
    pub fn registered(&self) -> bool {
        matches!(self, Self::Home | Self::Roaming)
    }
}

/// Decode a `+CGREG: <n>,<stat>` line.
pub fn parse_registration(text: &[u8]) -> Option<Status> {
    if !text.starts_with(b"+CGREG:") {
        return None;
    }
    atat::serde_at::from_slice::<GPRSNetworkRegistrationStatus>(text)
        .ok()
        .map(|r| Status::from(r.stat))
}

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    /// Poll the GPRS registration status until the modem reports it is
    /// registered on its home network.
    ///
    /// Only `+CGREG: 0,1` counts; roaming is logged but leaves the network
    /// registration error set.
    pub fn network_registration(&mut self) -> Result<(), Error> {
        let mut buf = [0u8; 20];
        self.state.errors.set(ErrorKind::NetRegistration);

        for _ in 0..REGISTRATION_POLLS {
            self.port.pause(registration_poll_interval());
            if self.send_cmd(&GetGPRSNetworkRegistrationStatus, Answer::MsgOk(&mut buf))?
                && line(&buf).starts_with(HOME_REGISTERED)
            {
                self.state.errors.clear(ErrorKind::NetRegistration);
                info!("registered on home network");
                return Ok(());
            }
        }

        match parse_registration(line(&buf)) {
            Some(status) => warn!("not registered: {:?}", status),
            None => warn!("no registration status"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{modem, MockTransport};

    #[test]
    fn decode_registration_line() {
        assert_eq!(parse_registration(b"+CGREG: 0,1"), Some(Status::Home));
        assert_eq!(parse_registration(b"+CGREG: 0,5"), Some(Status::Roaming));
        assert_eq!(parse_registration(b"+CGREG: 2,2"), Some(Status::Searching));
        assert_eq!(parse_registration(b"OK"), None);
        assert!(Status::Roaming.registered());
        assert!(!Status::Denied.registered());
    }

    #[test]
    fn registers_after_searching() {
        let mut transport = MockTransport::new();
        transport.reply("AT+CGREG?", &["+CGREG: 0,2", "OK"]);
        transport.reply("AT+CGREG?", &["+CGREG: 0,1", "OK"]);
        let mut m = modem(transport);

        m.network_registration().unwrap();
        assert!(!m.errors().contains(ErrorKind::NetRegistration));
        assert_eq!(m.port.transport.count("AT+CGREG?"), 2);
    }

    #[test]
    fn gives_up_after_five_polls() {
        let mut transport = MockTransport::new();
        transport.reply("AT+CGREG?", &["+CGREG: 0,5", "OK"]);
        let mut m = modem(transport);

        m.network_registration().unwrap();
        assert!(m.errors().contains(ErrorKind::NetRegistration));
        assert_eq!(m.port.transport.count("AT+CGREG?"), 5);
    }
}
