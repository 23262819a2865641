use std::fmt::{Display, Formatter};

/// Block height of the store.
pub type RawHeight = u64;

/// Store height to query
#[derive(Debug, Copy, Clone, Eq, Ord, PartialEq, PartialOrd)]
pub enum StoreHeight {
    /// Writes of the block being built
    Pending,
    Latest,
    Stable(RawHeight),
}

impl Display for StoreHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreHeight::Pending => write!(f, "pending"),
            StoreHeight::Latest => write!(f, "latest"),
            StoreHeight::Stable(height) => write!(f, "{height}"),
        }
    }
}

impl From<RawHeight> for StoreHeight {
    fn from(value: RawHeight) -> Self {
        match value {
            0 => StoreHeight::Latest,
            _ => StoreHeight::Stable(value),
        }
    }
}
