//! GPRS attach, carrier detection and TCP/IP bearer activation.

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::client::Modem;
use crate::command::{
    ip_transport_layer::{
        types::TransparentMode, BringUpWireless, GetLocalIp, GetTransparentConfig,
        SetTransparentMode, StartTask,
    },
    network_service::GetOperatorSelection,
    psn::{types::GPRSAttachedState, GetGPRSAttached, SetGPRSAttached},
};
use crate::config::ModemConfig;
use crate::error::Error;
use crate::protocol::{line, Answer, MatchMode};
use crate::state::{ErrorKind, Provider};
use crate::transport::Transport;

/// Capacity of the local address returned by [`Modem::tcpip_on`].
pub const IP_SIZE: usize = 30;

const ATTACH_POLLS: u8 = 5;
const OPERATOR_SEARCH: u8 = 5;

/// Map a `+COPS: <mode>,<format>,"<oper>"` line to a provider.
///
/// The operator name is only looked at fixed offsets, which assumes
/// single digit mode and format fields.
pub fn provider_from_operator(text: &[u8]) -> Provider {
    if text.get(12..17) == Some(&b"I TIM"[..]) {
        Provider::Tim
    } else if text.get(13..18) == Some(&b"odafo"[..]) {
        Provider::Vodafone
    } else {
        Provider::Internet
    }
}

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    /// Refresh the GPRS attach status. A failed query sets the GPRS error and
    /// leaves the status untouched.
    pub fn check_gprs_attached(&mut self) -> Result<bool, Error> {
        let mut buf = [0u8; 15];
        if self.send_cmd(&GetGPRSAttached, Answer::MsgOk(&mut buf))? {
            self.state.status.gprs = line(&buf).starts_with(b"+CGATT: 1");
        } else {
            self.state.errors.set(ErrorKind::Gprs);
        }
        Ok(self.state.status.gprs)
    }

    /// Attach to the packet domain. Returns whether the modem reported the
    /// attachment while polling.
    pub fn gprs_attach(&mut self) -> Result<bool, Error> {
        self.set_gprs_attached(true)?;
        self.gprs_result(true)
    }

    /// Detach from the packet domain. Returns whether the modem reported the
    /// detachment while polling.
    pub fn gprs_detach(&mut self) -> Result<bool, Error> {
        self.set_gprs_attached(false)?;
        self.gprs_result(false)
    }

    fn gprs_result(&self, attach: bool) -> Result<bool, Error> {
        if self.state.errors.contains(ErrorKind::Gprs) {
            return Err(Error::Modem(self.state.errors));
        }
        Ok(self.state.status.gprs == attach)
    }

    fn set_gprs_attached(&mut self, attach: bool) -> Result<(), Error> {
        self.state.errors.clear(ErrorKind::Gprs);

        let cmd = SetGPRSAttached {
            state: GPRSAttachedState::from(attach),
        };
        if !self.send_cmd(&cmd, Answer::Ok)? {
            self.state.errors.set(ErrorKind::Gprs);
            return Ok(());
        }

        for _ in 0..ATTACH_POLLS {
            if self.check_gprs_attached()? == attach {
                break;
            }
        }
        Ok(())
    }

    /// Detect the network operator and store the matching provider in the
    /// status. No operator answer sets the APN error.
    pub fn detect_provider(&mut self) -> Result<Provider, Error> {
        let mut buf = [0u8; 30];
        self.send_cmd(&GetOperatorSelection, Answer::None)?;

        let provider = if self.search_for("+COPS:", OPERATOR_SEARCH, Some(&mut buf), MatchMode::Relax)
        {
            let provider = provider_from_operator(line(&buf));
            self.search_for("OK", OPERATOR_SEARCH, None, MatchMode::Relax);
            provider
        } else {
            self.state.errors.set(ErrorKind::Apn);
            Provider::None
        };

        debug!("provider {:?}", provider);
        self.state.status.provider = provider;
        Ok(provider)
    }

    /// Start the TCP/IP task with the APN of the detected provider.
    pub fn start_task(&mut self) -> Result<(), Error> {
        let Some(apn) = C::apn(self.state.status.provider) else {
            self.state.errors.set(ErrorKind::Apn);
            return Ok(());
        };

        let cmd = StartTask {
            apn: apn.name,
            username: Some(apn.username).filter(|u| !u.is_empty()),
            password: Some(apn.password).filter(|p| !p.is_empty()),
        };
        self.send_cmd(&cmd, Answer::Ok)?;
        Ok(())
    }

    /// Activate the TCP/IP bearer and return the local address.
    ///
    /// Runs the whole sequence: application mode from
    /// [`Modem::set_transparent_mode`], GPRS attach, carrier detection when
    /// attached, task start, wireless bring up and address query. Stops at
    /// the first stage leaving an error behind.
    pub fn tcpip_on(&mut self) -> Result<String<IP_SIZE>, Error> {
        self.state.errors.clear(ErrorKind::TcpIp);

        self.send_cmd(&GetTransparentConfig, Answer::Ok)?;
        let mode = TransparentMode::from(self.state.status.transparent);
        self.send_cmd(&SetTransparentMode { mode }, Answer::Ok)?;

        self.set_gprs_attached(true)?;
        if self.state.status.gprs {
            self.detect_provider()?;
        }

        self.start_task()?;

        if self.state.errors.is_empty() && !self.send_cmd(&BringUpWireless, Answer::Ok)? {
            self.state.errors.set(ErrorKind::TcpIp);
        }

        if !self.state.errors.is_empty() {
            return Err(Error::Modem(self.state.errors));
        }

        let mut buf = [0u8; IP_SIZE];
        let mut address = String::new();
        let received = self.send_cmd(&GetLocalIp, Answer::Msg(&mut buf))?;
        let text = core::str::from_utf8(line(&buf)).unwrap_or_default();
        if !received || address.push_str(text).is_err() {
            self.state.errors.set(ErrorKind::TcpIp);
            return Err(Error::Modem(self.state.errors));
        }

        info!("local address {}", address.as_str());
        Ok(address)
    }
}
