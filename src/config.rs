use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use crate::command::control::types::BaudRate;
use crate::state::Provider;

/// Placeholder for an unconnected line. Reads as high, so a missing
/// `STATUS` line is taken as "powered".
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Output behind an inverting transistor stage, as `PWRKEY` usually is.
pub struct ReverseOutputPin<P>(pub P);

impl<P: ErrorType> ErrorType for ReverseOutputPin<P> {
    type Error = P::Error;
}

impl<P: OutputPin> OutputPin for ReverseOutputPin<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.0.set_state(!state)
    }
}

pub struct ReverseInputPin<P>(pub P);

impl<P: ErrorType> ErrorType for ReverseInputPin<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for ReverseInputPin<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }
}

/// Board and carrier configuration of a modem.
pub trait ModemConfig {
    /// Output driving the modem `PWRKEY` line.
    type PowerPin: OutputPin;
    /// Input reading the modem `STATUS` line.
    type StatusPin: InputPin;

    /// Should the modem work with command echo enabled?
    const ECHO: bool = true;
    const BAUD_RATE: BaudRate = BaudRate::B9600;

    const APN_INTERNET: Apn<'static> = Apn::new("internet");
    const APN_VODAFONE: Apn<'static> = Apn::new("web.omnitel.it");
    const APN_TIM: Apn<'static> = Apn::new("ibox.tim.it");

    fn power_pin(&mut self) -> Option<&mut Self::PowerPin>;
    fn status_pin(&mut self) -> Option<&mut Self::StatusPin>;

    /// APN triple used to start the TCP/IP task for `provider`.
    fn apn(provider: Provider) -> Option<Apn<'static>> {
        match provider {
            Provider::None => None,
            Provider::Internet => Some(Self::APN_INTERNET),
            Provider::Vodafone => Some(Self::APN_VODAFONE),
            Provider::Tim => Some(Self::APN_TIM),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Apn<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> Apn<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self {
            name,
            username: "",
            password: "",
        }
    }

    pub const fn with_credentials(self, username: &'a str, password: &'a str) -> Self {
        Self {
            username,
            password,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockPin, TestConfig};

    #[test]
    fn reverse_pins_invert_levels() {
        let pin = MockPin::new(false);
        let mut out = ReverseOutputPin(pin.clone());
        out.set_low().unwrap();
        assert!(pin.is_set_high());
        out.set_state(PinState::High).unwrap();
        assert!(!pin.is_set_high());

        let mut input = ReverseInputPin(MockPin::new(true));
        assert!(input.is_low().unwrap());

        let mut missing = NoPin;
        assert!(missing.is_high().unwrap());
        missing.set_low().unwrap();
    }

    #[test]
    fn apn_table_follows_provider() {
        assert_eq!(<TestConfig>::apn(Provider::None), None);
        assert_eq!(
            <TestConfig>::apn(Provider::Tim).map(|apn| apn.name),
            Some("ibox.tim.it")
        );
        assert_eq!(
            Apn::new("TM").with_credentials("user", "pw"),
            Apn {
                name: "TM",
                username: "user",
                password: "pw"
            }
        );
    }
}
