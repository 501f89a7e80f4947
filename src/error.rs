use crate::state::ErrorFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A stage completed with sticky error flags set; the flags describe
    /// every domain that failed so far.
    Modem(ErrorFlags),

    /// A command did not fit the transmit buffer.
    BufferTooSmall,

    /// The serial transport refused a write or read.
    Transport,

    IoPin,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::Modem(e) => defmt::write!(f, "Modem({=u16:#b})", e.bits()),
            Self::BufferTooSmall => defmt::write!(f, "BufferTooSmall"),
            Self::Transport => defmt::write!(f, "Transport"),
            Self::IoPin => defmt::write!(f, "IoPin"),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Modem(e) => write!(f, "modem error flags {:#06b}", e.bits()),
            Self::BufferTooSmall => f.write_str("command exceeds transmit buffer"),
            Self::Transport => f.write_str("serial transport failure"),
            Self::IoPin => f.write_str("gpio failure"),
        }
    }
}

impl ErrorFlags {
    /// `Ok(())` when no domain is flagged, `Err(Error::Modem(..))` otherwise.
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Modem(self))
        }
    }
}
