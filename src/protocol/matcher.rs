use embedded_hal::delay::DelayNs;

use super::{line, Port};
use crate::client::Modem;
use crate::config::ModemConfig;
use crate::fmt::printable;
use crate::transport::Transport;

/// How a received line is compared against a search pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatchMode {
    /// The line starts with the pattern.
    Equal,
    /// The pattern occurs anywhere in the line.
    Relax,
    /// As [`MatchMode::Equal`], but a line reading exactly `ERROR` ends the
    /// search as failed.
    ErrorEqual,
    /// As [`MatchMode::Relax`], but a line reading exactly `ERROR` ends the
    /// search as failed.
    ErrorRelax,
}

impl MatchMode {
    pub fn matches(self, message: &[u8], pattern: &[u8]) -> bool {
        match self {
            Self::Equal | Self::ErrorEqual => message.starts_with(pattern),
            Self::Relax | Self::ErrorRelax => {
                pattern.is_empty() || message.windows(pattern.len()).any(|w| w == pattern)
            }
        }
    }

    fn aborts_on_error(self) -> bool {
        matches!(self, Self::ErrorEqual | Self::ErrorRelax)
    }
}

impl<T: Transport, D: DelayNs> Port<T, D> {
    pub(crate) fn search(
        &mut self,
        pattern: &[u8],
        count: u8,
        buf: &mut [u8],
        mode: MatchMode,
    ) -> bool {
        self.search_with(pattern, count, buf, mode, |_| {})
    }

    /// As [`Port::search`], handing every message that does not match to
    /// `on_miss`.
    pub(crate) fn search_with(
        &mut self,
        pattern: &[u8],
        count: u8,
        buf: &mut [u8],
        mode: MatchMode,
        mut on_miss: impl FnMut(&[u8]),
    ) -> bool {
        if let Some(first) = buf.first_mut() {
            *first = 0;
        }

        for _ in 0..count.max(1) {
            if self.read_message(buf, 1) == 0 {
                continue;
            }

            let message = line(buf);
            if mode.matches(message, pattern) {
                debug!("found {:?}", printable(pattern));
                return true;
            }

            on_miss(message);

            if mode.aborts_on_error() && message == b"ERROR" {
                debug!("ERROR while looking for {:?}", printable(pattern));
                return false;
            }
        }

        debug!("{:?} not found", printable(pattern));
        false
    }
}

impl<T, D, C, const N: usize> Modem<T, D, C, N>
where
    T: Transport,
    D: DelayNs,
    C: ModemConfig,
{
    /// Read up to `count` messages (at least one), one second each, looking
    /// for one that matches `pattern` under `mode`.
    ///
    /// Messages land in `buf`, or in the session scratch buffer when `None`,
    /// so on success the buffer holds the matching line. The buffer is
    /// emptied before the first read.
    pub fn search_for(
        &mut self,
        pattern: &str,
        count: u8,
        buf: Option<&mut [u8]>,
        mode: MatchMode,
    ) -> bool {
        let buf = match buf {
            Some(buf) => buf,
            None => &mut self.scratch[..],
        };
        self.port.search(pattern.as_bytes(), count, buf, mode)
    }
}
