use embedded_hal::delay::DelayNs;

use super::Port;
use crate::client::Modem;
use crate::config::ModemConfig;
use crate::module_timing::poll_interval;
use crate::transport::Transport;

/// Text of a message buffer: everything before the first NUL.
pub fn line(buf: &[u8]) -> &[u8] {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..end]
}

impl<T: Transport, D: DelayNs> Port<T, D> {
    /// Wait up to `timeout` seconds for a non-blank line and copy it into
    /// `buf`, with the trailing `\r\n` replaced by a NUL.
    ///
    /// Lines shorter than 3 bytes are blank and get skipped. Returns the raw
    /// line length including the terminator, 0 on timeout.
    pub(crate) fn read_message(&mut self, buf: &mut [u8], timeout: u8) -> usize {
        if buf.len() < 2 {
            return 0;
        }

        let polls_per_second = 1000 / poll_interval().as_millis().max(1);
        let mut polls = u64::from(timeout) * polls_per_second;
        let mut len = 0;

        loop {
            self.pause(poll_interval());

            if self.transport.line_ready() {
                len = self.transport.dequeue_line(buf).min(buf.len());
                if len < 3 {
                    len = 0;
                }
            }

            if len != 0 || polls == 0 {
                break;
            }
            polls -= 1;
        }

        if len > 0 {
            buf[len - 2] = 0;
            trace!("<- {}", crate::fmt::printable(line(buf)));
        }

        len
    }
}

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    /// Read the next non-blank line from the modem into `buf`, waiting up to
    /// `timeout` seconds.
    ///
    /// On success the line text is NUL terminated in place of its `\r\n`
    /// (see [`line`]) and the raw line length is returned. Returns 0 when
    /// nothing arrived in time or `buf` cannot hold a terminated line.
    pub fn read_message(&mut self, buf: &mut [u8], timeout: u8) -> usize {
        self.port.read_message(buf, timeout)
    }
}
