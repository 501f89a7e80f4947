//! Leaving transparent data mode with the `+++` escape sequence.

use embedded_hal::delay::DelayNs;

use crate::client::Modem;
use crate::command::AT;
use crate::config::ModemConfig;
use crate::error::Error;
use crate::module_timing::{escape_guard_after, escape_guard_before, escape_guard_extended};
use crate::protocol::{Answer, MatchMode};
use crate::state::ErrorKind;
use crate::transport::Transport;

const ESCAPE_ATTEMPTS: u8 = 3;
const ESCAPE_ECHO_SEARCH: u8 = 30;

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    /// Return the modem to command mode.
    ///
    /// Each attempt sends `+++` between guard times when the link is marked
    /// connected, then sends a bare `AT`. An `OK` to it clears the link
    /// flag; otherwise the link is assumed to still be in data mode. The
    /// escape error reflects the final link flag.
    pub fn escape(&mut self) -> Result<(), Error> {
        for attempt in 0..ESCAPE_ATTEMPTS {
            if self.state.status.connected {
                debug!("escape attempt {}", attempt + 1);
                self.port.pause(escape_guard_before());
                self.send("+++")?;
                self.port.pause(escape_guard_after());

                if self.state.status.echo {
                    self.send("\r\n")?;
                    self.search_for("+++", ESCAPE_ECHO_SEARCH, None, MatchMode::Equal);
                } else {
                    self.port.pause(escape_guard_extended());
                }
            }

            if self.send_cmd(&AT, Answer::Ok)? {
                self.state.status.connected = false;
                break;
            }
            self.state.status.connected = true;
        }

        let connected = self.state.status.connected;
        self.state.errors.assign(ErrorKind::Escape, connected);
        if connected {
            error!("modem stuck in data mode");
            return Err(Error::Modem(self.state.errors));
        }
        Ok(())
    }
}
