//! Sticky session status and error bitfields.
//!
//! Both fields are cleared when the session is created and on every power-on.
//! Each bring-up/bearer stage owns exactly one error domain and is the only
//! writer of it.

/// Provider selector resulting from operator detection (`AT+COPS?`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Provider {
    /// Detection not run yet, or no operator answer.
    #[default]
    None = 0,
    /// Any operator not matched by name, uses the generic APN.
    Internet = 1,
    /// Carrier A.
    Vodafone = 2,
    /// Carrier B.
    Tim = 3,
}

/// TCP/IP connection state as reported by `AT+CIPSTATUS` (single connection mode).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConnectionState {
    #[default]
    IpInitial = 0,
    IpStart = 1,
    IpConfig = 2,
    IpGprsAct = 3,
    IpStatus = 4,
    /// `TCP CONNECTING`, `UDP CONNECTING` or `SERVER LISTENING`
    Connecting = 5,
    ConnectOk = 6,
    TcpClosing = 7,
    TcpClosed = 8,
    PdpDeact = 9,
}

impl ConnectionState {
    /// Decode the text following `STATE: ` in a `AT+CIPSTATUS` answer.
    pub fn from_state_text(text: &str) -> Option<Self> {
        Some(match text.trim() {
            "IP INITIAL" => Self::IpInitial,
            "IP START" => Self::IpStart,
            "IP CONFIG" => Self::IpConfig,
            "IP GPRSACT" => Self::IpGprsAct,
            "IP STATUS" => Self::IpStatus,
            "TCP CONNECTING" | "UDP CONNECTING" | "SERVER LISTENING" => Self::Connecting,
            "CONNECT OK" => Self::ConnectOk,
            "TCP CLOSING" | "UDP CLOSING" => Self::TcpClosing,
            "TCP CLOSED" | "UDP CLOSED" => Self::TcpClosed,
            "PDP DEACT" => Self::PdpDeact,
            _ => return None,
        })
    }
}

/// Session status flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Pin ok and network registered.
    pub ready: bool,
    /// GPRS attached.
    pub gprs: bool,
    /// Context id enabled.
    pub cid: bool,
    /// Bearer profile enabled.
    pub sapbr: bool,
    /// HTTP stack enabled.
    pub http: bool,
    pub provider: Provider,
    /// TCP/IP transparent mode.
    pub transparent: bool,
    pub tcp: ConnectionState,
    /// Command echo.
    pub echo: bool,
    /// On line (data mode).
    pub connected: bool,
}

impl Status {
    /// Packed representation, lsb first: ready, gprs, cid, sapbr, http,
    /// provider (2 bits), transparent, tcp (4 bits), echo, connected.
    pub fn bits(&self) -> u16 {
        u16::from(self.ready)
            | u16::from(self.gprs) << 1
            | u16::from(self.cid) << 2
            | u16::from(self.sapbr) << 3
            | u16::from(self.http) << 4
            | (self.provider as u16 & 0b11) << 5
            | u16::from(self.transparent) << 7
            | (self.tcp as u16 & 0b1111) << 8
            | u16::from(self.echo) << 12
            | u16::from(self.connected) << 13
    }
}

/// One sticky error bit per failure domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorKind {
    Init = 0,
    PowerOff = 1,
    Pin = 2,
    Imei = 3,
    Apn = 4,
    TcpIp = 5,
    NetRegistration = 6,
    Disconnect = 7,
    Gprs = 8,
    /// `+++` escape sequence failed
    Escape = 9,
    /// `ATO` / connect failed
    LinkConnect = 10,
    GpsFix = 11,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 12] = [
        ErrorKind::Init,
        ErrorKind::PowerOff,
        ErrorKind::Pin,
        ErrorKind::Imei,
        ErrorKind::Apn,
        ErrorKind::TcpIp,
        ErrorKind::NetRegistration,
        ErrorKind::Disconnect,
        ErrorKind::Gprs,
        ErrorKind::Escape,
        ErrorKind::LinkConnect,
        ErrorKind::GpsFix,
    ];

    const fn mask(self) -> u16 {
        1 << self as u8
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorFlags(u16);

impl ErrorFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, kind: ErrorKind) -> bool {
        self.0 & kind.mask() != 0
    }

    pub fn set(&mut self, kind: ErrorKind) {
        self.0 |= kind.mask();
    }

    pub fn clear(&mut self, kind: ErrorKind) {
        self.0 &= !kind.mask();
    }

    /// Set or clear `kind` according to `failed`.
    pub fn assign(&mut self, kind: ErrorKind, failed: bool) {
        if failed {
            self.set(kind);
        } else {
            self.clear(kind);
        }
    }

    /// Iterate over the domains currently flagged.
    pub fn iter(&self) -> impl Iterator<Item = ErrorKind> + '_ {
        ErrorKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

/// Status and error record owned by the driver handle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionState {
    pub status: Status,
    pub errors: ErrorFlags,
}

impl SessionState {
    pub const fn new() -> Self {
        Self {
            status: Status {
                ready: false,
                gprs: false,
                cid: false,
                sapbr: false,
                http: false,
                provider: Provider::None,
                transparent: false,
                tcp: ConnectionState::IpInitial,
                echo: false,
                connected: false,
            },
            errors: ErrorFlags::empty(),
        }
    }

    /// Clear every status and error flag.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_flags_are_addressed_per_domain() {
        let mut errors = ErrorFlags::empty();
        assert!(errors.is_empty());

        errors.set(ErrorKind::Pin);
        errors.set(ErrorKind::Escape);
        assert!(errors.contains(ErrorKind::Pin));
        assert!(!errors.contains(ErrorKind::Imei));
        assert_eq!(errors.bits(), 0b10_0000_0100);

        errors.assign(ErrorKind::Pin, false);
        assert_eq!(errors.iter().collect::<Vec<_>>(), vec![ErrorKind::Escape]);
    }

    #[test]
    fn status_packs_like_the_wire_layout() {
        let status = Status {
            ready: true,
            provider: Provider::Tim,
            tcp: ConnectionState::PdpDeact,
            connected: true,
            ..Status::default()
        };

        assert_eq!(status.bits(), 1 | (3 << 5) | (9 << 8) | (1 << 13));
    }

    #[test]
    fn decode_connection_state() {
        assert_eq!(
            ConnectionState::from_state_text("IP GPRSACT"),
            Some(ConnectionState::IpGprsAct)
        );
        assert_eq!(
            ConnectionState::from_state_text("SERVER LISTENING"),
            Some(ConnectionState::Connecting)
        );
        assert_eq!(ConnectionState::from_state_text("BOGUS"), None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = SessionState::new();
        state.status.echo = true;
        state.errors.set(ErrorKind::Gprs);

        state.reset();
        assert_eq!(state, SessionState::default());
    }
}
