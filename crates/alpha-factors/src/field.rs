//! Bar fields addressable by name in factor configs.

use crate::{AlphaError, BaseSeries, Series};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A bar field; its display form is the factor-name prefix (`CLOSE59`, `VWAP0`).
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Field {
    /// Opening price
    #[display("OPEN")]
    Open,
    /// Highest price
    #[display("HIGH")]
    High,
    /// Lowest price
    #[display("LOW")]
    Low,
    /// Closing price
    #[display("CLOSE")]
    Close,
    /// Volume-weighted average price
    #[display("VWAP")]
    Vwap,
    /// Traded volume
    #[display("VOLUME")]
    Volume,
}

impl Field {
    /// Price fields, in the order Alpha-158 lists its price features.
    pub const PRICES: [Self; 5] = [Self::Open, Self::High, Self::Low, Self::Close, Self::Vwap];

    /// Whether this is a price (not volume) field.
    pub const fn is_price(self) -> bool {
        !matches!(self, Self::Volume)
    }

    /// The base series holding this field.
    pub const fn series(self, base: &BaseSeries) -> &Series {
        match self {
            Self::Open => &base.open,
            Self::High => &base.high,
            Self::Low => &base.low,
            Self::Close => &base.close,
            Self::Vwap => &base.vwap,
            Self::Volume => &base.volume,
        }
    }
}

impl std::str::FromStr for Field {
    type Err = AlphaError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "HIGH" => Ok(Self::High),
            "LOW" => Ok(Self::Low),
            "CLOSE" => Ok(Self::Close),
            "VWAP" => Ok(Self::Vwap),
            "VOLUME" => Ok(Self::Volume),
            other => Err(AlphaError::InvalidConfig(format!("unknown field: {other}"))),
        }
    }
}
