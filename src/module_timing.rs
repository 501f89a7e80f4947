//! Fixed delays of the SIM900 serial protocol and power sequencing.

use embassy_time::Duration;

/// Interval between two polls of the transport's line-ready signal
pub const fn poll_interval() -> Duration {
    Duration::from_millis(10)
}

/// Time given to the modem to echo a command back
pub const fn echo_settle_time() -> Duration {
    Duration::from_millis(100)
}

/// Time given to the modem to process a command before looking for its answer
pub const fn processing_time() -> Duration {
    Duration::from_millis(100)
}

/// Idle time required before the `+++` escape sequence
pub const fn escape_guard_before() -> Duration {
    Duration::from_millis(1000)
}

/// Idle time required after the `+++` escape sequence
pub const fn escape_guard_after() -> Duration {
    Duration::from_millis(500)
}

/// Extra wait after `+++` when there is no echo to synchronise on
pub const fn escape_guard_extended() -> Duration {
    Duration::from_millis(1000)
}

/// Low and high time of `PWRKEY` for the on/off pulse
pub const fn pwr_pulse_time() -> Duration {
    Duration::from_millis(1000)
}

/// Time to wait for module to boot after the power pulse.
///
/// NOTE: A full power up may take 11 to 16 seconds, the remaining part is
/// covered by waiting for the `Call Ready` URC.
pub const fn boot_time() -> Duration {
    Duration::from_millis(4000)
}

/// Time to wait before polling for network registration
pub const fn registration_settle_time() -> Duration {
    Duration::from_millis(5000)
}

/// Spacing between two network registration polls
pub const fn registration_poll_interval() -> Duration {
    Duration::from_millis(2000)
}

/// Spacing between two raw character checks
pub const fn char_poll_interval() -> Duration {
    Duration::from_millis(1000)
}
