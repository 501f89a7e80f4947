use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GPRSAttachedState {
    Detached = 0,
    Attached = 1,
}

impl From<bool> for GPRSAttachedState {
    fn from(attached: bool) -> Self {
        if attached {
            Self::Attached
        } else {
            Self::Detached
        }
    }
}
