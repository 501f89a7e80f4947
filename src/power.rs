//! Power sequencing and the bring-up state machine.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::client::{Modem, IMEI_SIZE, TX_BUFFER_SIZE};
use crate::command::{
    control::{types::Echo, FactoryDefaults, SetDataRate, SetEcho},
    device_lock::GetPinStatus,
    general::GetIMEI,
    system_features::{
        types::{NetLightIndication, NetLightState, PowerDownMode, UrcPresentation},
        PowerDown, SetNetLightIndication, SetNetLightTiming, SetUrcPresentation,
    },
    AT,
};
use crate::config::ModemConfig;
use crate::error::Error;
use crate::module_timing::{boot_time, pwr_pulse_time, registration_settle_time};
use crate::protocol::{line, Answer, MatchMode};
use crate::state::ErrorKind;
use crate::transport::Transport;

const CALL_READY_SEARCH: u8 = 60;
const IMEI_ATTEMPTS: u8 = 10;
const POWER_DOWN_SEARCH: u8 = 5;
const PIN_READY: &[u8] = b"+CPIN: READY";

/// `NETLIGHT` blink pattern per network state, as (lit ms, dark ms).
const NET_LIGHT_TIMINGS: [(NetLightState, u16, u16); 3] = [
    (NetLightState::NotRegistered, 53, 790),
    (NetLightState::Registered, 53, 2990),
    (NetLightState::PppCommunication, 53, 287),
];

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    /// Level of the modem `STATUS` line, `true` when no pin is configured.
    pub fn has_power(&mut self) -> Result<bool, Error> {
        if let Some(pin) = self.config.status_pin() {
            pin.is_high().map_err(|_| Error::IoPin)
        } else {
            info!("No status pin configured");
            Ok(true)
        }
    }

    /// Toggle `PWRKEY` with the on/off pulse. The same pulse turns a powered
    /// modem off.
    pub fn pulse_power_key(&mut self) -> Result<(), Error> {
        let Some(pin) = self.config.power_pin() else {
            warn!("No power pin configured");
            return Ok(());
        };

        pin.set_low().map_err(|_| Error::IoPin)?;
        self.port.pause(pwr_pulse_time());
        pin.set_high().map_err(|_| Error::IoPin)?;
        self.port.pause(pwr_pulse_time());
        pin.set_low().map_err(|_| Error::IoPin)?;
        Ok(())
    }

    /// Power the modem up and bring it to a registered, ready state.
    ///
    /// Clears the whole session state first. Baseline configuration commands
    /// are best effort; the factory reset flags the init error. PIN check,
    /// identity and network registration only run while no error is set, in
    /// that order.
    pub fn power_on(&mut self) -> Result<(), Error> {
        self.state.reset();
        self.imei.clear();
        self.port.transport.resume();

        self.pulse_power_key()?;
        self.port.pause(boot_time());
        if !self.has_power()? {
            warn!("STATUS still low after power pulse");
        }
        self.port.transport.clear();

        self.send_cmd(&AT, Answer::Ok)?;
        self.send_cmd(&SetDataRate { rate: C::BAUD_RATE }, Answer::Ok)?;
        self.send_cmd(
            &SetUrcPresentation {
                mode: UrcPresentation::Enabled,
            },
            Answer::Ok,
        )?;

        if !self.search_for("Call Ready", CALL_READY_SEARCH, None, MatchMode::Equal) {
            warn!("no Call Ready");
        }
        self.port.transport.clear();

        if !self.send_cmd(&FactoryDefaults, Answer::Ok)? {
            self.state.errors.set(ErrorKind::Init);
        }

        self.state.status.echo = C::ECHO;
        self.send_cmd(
            &SetEcho {
                enabled: Echo::from(C::ECHO),
            },
            Answer::Ok,
        )?;

        for (state, on, off) in NET_LIGHT_TIMINGS {
            self.send_cmd(&SetNetLightTiming { state, on, off }, Answer::Ok)?;
        }
        self.send_cmd(
            &SetNetLightIndication {
                mode: NetLightIndication::On,
            },
            Answer::Ok,
        )?;

        if self.state.errors.is_empty() {
            self.pin_check()?;
        }
        if self.state.errors.is_empty() {
            self.read_imei()?;
        }
        if self.state.errors.is_empty() {
            self.port.pause(registration_settle_time());
            self.network_registration()?;
        }

        self.state.status.ready = self.state.errors.is_empty();
        if self.state.status.ready {
            info!("modem ready, IMEI {}", self.imei.as_str());
        } else {
            error!("bring-up failed, error flags {}", self.state.errors.bits());
        }
        self.state.errors.into_result()
    }

    /// Check that the SIM needs no PIN. Sets or clears the PIN error.
    pub fn pin_check(&mut self) -> Result<(), Error> {
        let mut buf = [0u8; 20];
        let ready = self.send_cmd(&GetPinStatus, Answer::MsgOk(&mut buf))?
            && line(&buf).starts_with(PIN_READY);

        self.state.errors.assign(ErrorKind::Pin, !ready);
        if !ready {
            warn!("SIM not ready: {}", crate::fmt::printable(line(&buf)));
        }
        Ok(())
    }

    /// Read the module identity into [`Modem::imei`]. Sets or clears the
    /// identity error.
    pub fn read_imei(&mut self) -> Result<(), Error> {
        let mut buf = [0u8; IMEI_SIZE];
        self.imei.clear();
        self.state.errors.set(ErrorKind::Imei);
        self.port.transport.clear();

        for _ in 0..IMEI_ATTEMPTS {
            if !self.send_cmd(&GetIMEI, Answer::MsgOk(&mut buf))? {
                continue;
            }

            let text = line(&buf);
            if text.len() > 14 {
                if let Ok(imei) = core::str::from_utf8(text) {
                    if self.imei.push_str(imei).is_ok() {
                        self.state.errors.clear(ErrorKind::Imei);
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Ask the modem for a normal power down.
    ///
    /// The command is written raw since the modem stops answering; the
    /// `NORMAL POWER DOWN` report confirms it.
    pub fn power_off(&mut self) -> Result<(), Error> {
        let mut buf = [0u8; TX_BUFFER_SIZE];
        let cmd = crate::protocol::serialize(
            &PowerDown {
                mode: PowerDownMode::Normal,
            },
            &mut buf,
        )?;
        debug!("-> {}", cmd);
        self.port.transport.send(cmd.as_bytes())?;
        self.port.transport.send(b"\r")?;

        if self.search_for("NORMAL POWER DOWN", POWER_DOWN_SEARCH, None, MatchMode::Relax) {
            self.state.status.ready = false;
            info!("powered down");
        } else {
            self.state.errors.set(ErrorKind::PowerOff);
            error!("no power down report");
        }
        Ok(())
    }
}
