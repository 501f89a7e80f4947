//! Single TCP connection over the activated bearer.

use embedded_hal::delay::DelayNs;

use crate::client::Modem;
use crate::command::control::ResumeDataMode;
use crate::command::ip_transport_layer::{
    CloseConnection, GetConnectionStatus, Shutdown, StartConnection,
};
use crate::config::ModemConfig;
use crate::error::Error;
use crate::protocol::{line, Answer, MatchMode};
use crate::state::{ConnectionState, ErrorKind};
use crate::transport::Transport;

/// Longest host name accepted by `AT+CIPSTART`.
pub const HOST_LEN: usize = 64;

const CONNECT_SEARCH: u8 = 75;
const RESUME_SEARCH: u8 = 5;
const CLOSE_SEARCH: u8 = 5;
const SHUT_SEARCH: u8 = 65;
const STATE_SEARCH: u8 = 5;

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    /// Open a TCP connection to `host:port`.
    ///
    /// In transparent mode the modem enters data mode right away; use
    /// [`Modem::escape`] to get back to commands.
    pub fn tcp_connect(&mut self, host: &str, port: u16) -> Result<(), Error> {
        if host.len() > HOST_LEN {
            return Err(Error::BufferTooSmall);
        }

        let cmd = StartConnection {
            mode: "TCP",
            address: host,
            port,
        };
        let mut buf = [0u8; 20];
        let connected = self.send_cmd(&cmd, Answer::Ok)?
            && self.search_for("CONNECT", CONNECT_SEARCH, Some(&mut buf), MatchMode::ErrorEqual)
            && !line(&buf).starts_with(b"CONNECT FAIL");

        self.finish_connect(connected)
    }

    /// Go back to data mode on a connection left with [`Modem::escape`].
    pub fn resume_data_mode(&mut self) -> Result<(), Error> {
        let connected = self.send_cmd(&ResumeDataMode, Answer::None)?
            && self.search_for("CONNECT", RESUME_SEARCH, None, MatchMode::ErrorEqual);

        self.finish_connect(connected)
    }

    fn finish_connect(&mut self, connected: bool) -> Result<(), Error> {
        self.state.status.connected = connected;
        self.state.errors.assign(ErrorKind::LinkConnect, !connected);

        if connected {
            self.state.status.tcp = ConnectionState::ConnectOk;
            Ok(())
        } else {
            warn!("connection failed");
            Err(Error::Modem(self.state.errors))
        }
    }

    /// Close the TCP connection, leaving data mode first if needed.
    pub fn tcp_close(&mut self) -> Result<(), Error> {
        if self.state.status.transparent && self.state.status.connected {
            self.escape()?;
        }

        let closed = self.send_cmd(&CloseConnection, Answer::None)?
            && self.search_for("CLOSE OK", CLOSE_SEARCH, None, MatchMode::ErrorRelax);

        self.finish_disconnect(closed, ConnectionState::TcpClosed)
    }

    /// Deactivate the PDP context, closing any connection.
    pub fn tcp_shutdown(&mut self) -> Result<(), Error> {
        let shut = self.send_cmd(&Shutdown, Answer::None)?
            && self.search_for("SHUT OK", SHUT_SEARCH, None, MatchMode::ErrorRelax);

        self.finish_disconnect(shut, ConnectionState::IpInitial)
    }

    fn finish_disconnect(&mut self, done: bool, state: ConnectionState) -> Result<(), Error> {
        self.state.errors.assign(ErrorKind::Disconnect, !done);

        if done {
            self.state.status.connected = false;
            self.state.status.tcp = state;
            Ok(())
        } else {
            Err(Error::Modem(self.state.errors))
        }
    }

    /// Query the connection state and store it in the status. `None` when
    /// the modem reported no recognisable state.
    pub fn tcp_status(&mut self) -> Result<Option<ConnectionState>, Error> {
        let mut buf = [0u8; 32];
        if !self.send_cmd(&GetConnectionStatus, Answer::Ok)?
            || !self.search_for("STATE:", STATE_SEARCH, Some(&mut buf), MatchMode::Relax)
        {
            return Ok(None);
        }

        let text = core::str::from_utf8(line(&buf)).unwrap_or_default();
        let state = text
            .split_once("STATE:")
            .and_then(|(_, state)| ConnectionState::from_state_text(state));

        match state {
            Some(state) => self.state.status.tcp = state,
            None => warn!("unknown connection state {}", text),
        }
        Ok(state)
    }

    /// Whether the modem reports the connection in state `expected`.
    pub fn check_connection(&mut self, expected: ConnectionState) -> Result<bool, Error> {
        Ok(self.tcp_status()? == Some(expected))
    }
}
