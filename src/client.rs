use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::config::ModemConfig;
use crate::error::Error;
use crate::module_timing::char_poll_interval;
use crate::protocol::Port;
use crate::state::{ErrorFlags, SessionState, Status};
use crate::transport::Transport;

/// Largest serialized command the driver sends.
pub const TX_BUFFER_SIZE: usize = 256;
/// Size of the buffer receiving the `AT+CGSN` answer: up to 17 characters
/// plus the `\r\n` line terminator.
pub const IMEI_SIZE: usize = 19;
pub const GPS_LAT_SIZE: usize = 12;
pub const GPS_LON_SIZE: usize = 12;

/// Handle of a single SIM900 session.
///
/// Owns the transport, the delay provider, the board configuration and the
/// session state. `N` is the size of the scratch buffer used for searches
/// without a caller buffer; it should match the transport receive capacity.
pub struct Modem<T, D, C, const N: usize = 64> {
    pub(crate) port: Port<T, D>,
    pub(crate) config: C,
    pub(crate) state: SessionState,
    pub(crate) scratch: [u8; N],
    pub(crate) imei: String<{ IMEI_SIZE - 2 }>,
    pub(crate) gps_lat: String<GPS_LAT_SIZE>,
    pub(crate) gps_lon: String<GPS_LON_SIZE>,
}

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    pub fn new(transport: T, delay: D, config: C) -> Self {
        if transport.receive_capacity() != N {
            warn!(
                "scratch buffer of {} bytes, transport receives {}",
                N,
                transport.receive_capacity()
            );
        }

        Self {
            port: Port { transport, delay },
            config,
            state: SessionState::new(),
            scratch: [0; N],
            imei: String::new(),
            gps_lat: String::new(),
            gps_lon: String::new(),
        }
    }

    /// Tear the session down, handing back its parts.
    pub fn release(mut self) -> (T, D, C) {
        self.port.transport.suspend();
        (self.port.transport, self.port.delay, self.config)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn errors(&self) -> ErrorFlags {
        self.state.errors
    }

    pub fn config(&mut self) -> &mut C {
        &mut self.config
    }

    /// Module identity read during power on, empty until then.
    pub fn imei(&self) -> &str {
        &self.imei
    }

    pub fn gps_lat(&self) -> &str {
        &self.gps_lat
    }

    pub fn gps_lon(&self) -> &str {
        &self.gps_lon
    }

    /// Store a position fix as reported by the modem. Values longer than
    /// the position buffers are rejected and flag a GPS fix error.
    pub fn set_gps_position(&mut self, lat: &str, lon: &str) -> Result<(), Error> {
        use crate::state::ErrorKind;

        self.gps_lat.clear();
        self.gps_lon.clear();
        let stored = self.gps_lat.push_str(lat).is_ok() && self.gps_lon.push_str(lon).is_ok();
        self.state.errors.assign(ErrorKind::GpsFix, !stored);
        if !stored {
            self.gps_lat.clear();
            self.gps_lon.clear();
            return Err(Error::BufferTooSmall);
        }
        Ok(())
    }

    /// Select transparent (`true`) or normal TCP/IP application mode for the
    /// next [`Modem::tcpip_on`].
    pub fn set_transparent_mode(&mut self, transparent: bool) {
        self.state.status.transparent = transparent;
    }

    /// Stop listening to the modem; received bytes are dropped until
    /// [`Modem::resume`].
    pub fn suspend(&mut self) {
        self.port.transport.suspend();
    }

    pub fn resume(&mut self) {
        self.port.transport.resume();
    }

    /// Drop everything received so far.
    pub fn clear_rx(&mut self) {
        self.port.transport.clear();
    }

    /// Write `text` as is, without terminator and without reading back.
    pub fn send(&mut self, text: &str) -> Result<(), Error> {
        trace!("-> {}", text);
        self.port.transport.send(text.as_bytes())
    }

    /// Wait up to `timeout` seconds for the raw character `c`, e.g. the `>`
    /// data prompt. Other characters are consumed.
    pub fn wait_for_char(&mut self, c: u8, timeout: u8) -> Result<bool, Error> {
        let mut byte = [0u8; 1];
        for _ in 0..timeout {
            while self.port.transport.receive_raw(&mut byte)? == 1 {
                if byte[0] == c {
                    return Ok(true);
                }
            }
            self.port.pause(char_poll_interval());
        }
        Ok(false)
    }
}
