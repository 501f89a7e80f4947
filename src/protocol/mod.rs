//! Line-level AT protocol: message reading, pattern matching and command
//! sessions.

mod command;
mod matcher;
mod message;

pub use command::Answer;
pub(crate) use command::serialize;
pub use matcher::MatchMode;
pub use message::line;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

/// Transport and delay provider, kept apart from the scratch buffer so a
/// search can borrow both at once.
pub(crate) struct Port<T, D> {
    pub(crate) transport: T,
    pub(crate) delay: D,
}

impl<T, D: DelayNs> Port<T, D> {
    pub(crate) fn pause(&mut self, duration: Duration) {
        self.delay
            .delay_us(u32::try_from(duration.as_micros()).unwrap_or(u32::MAX));
    }
}
