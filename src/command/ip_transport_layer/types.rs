use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransparentMode {
    /// Non-transparent (command) mode
    Normal = 0,
    Transparent = 1,
}

impl From<bool> for TransparentMode {
    fn from(transparent: bool) -> Self {
        if transparent {
            Self::Transparent
        } else {
            Self::Normal
        }
    }
}
