//! Alpha-360 raw-history layout.

use crate::{AlphaError, Field, Result};
use serde::{Deserialize, Serialize};

/// Default number of historical samples per field.
pub const DEFAULT_LOOKBACK: usize = 60;

/// Emission order of the Alpha-360 fields; volume always comes last.
pub const FIELD_ORDER: [Field; 6] = [
    Field::Close,
    Field::Open,
    Field::High,
    Field::Low,
    Field::Vwap,
    Field::Volume,
];

/// Alpha-360 configuration.
///
/// Price fields are always emitted in [`FIELD_ORDER`], whatever order they
/// were configured in; the default gives `6 × 60 = 360` factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Alpha360ConfigBuilder", into = "Alpha360ConfigBuilder")]
pub struct Alpha360Config {
    lookback: usize,
    price_fields: Vec<Field>,
    include_volume: bool,
}

impl Default for Alpha360Config {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            price_fields: FIELD_ORDER[..5].to_vec(),
            include_volume: true,
        }
    }
}

impl Alpha360Config {
    /// Start a builder seeded with the defaults.
    pub fn builder() -> Alpha360ConfigBuilder {
        Self::default().into()
    }

    /// All five price fields, no volume.
    pub fn prices_only() -> Self {
        Self {
            include_volume: false,
            ..Self::default()
        }
    }

    /// Samples per field.
    pub const fn lookback(&self) -> usize {
        self.lookback
    }

    /// Emitted fields, in emission order.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = self.price_fields.clone();
        if self.include_volume {
            fields.push(Field::Volume);
        }
        fields
    }

    /// Whether the volume block is emitted.
    pub const fn include_volume(&self) -> bool {
        self.include_volume
    }
}

/// Builder for [`Alpha360Config`]; also its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alpha360ConfigBuilder {
    /// Samples per field
    pub lookback: usize,
    /// Price fields to emit
    pub price_fields: Vec<Field>,
    /// Emit the volume block
    pub include_volume: bool,
}

impl Default for Alpha360ConfigBuilder {
    fn default() -> Self {
        Alpha360Config::default().into()
    }
}

impl Alpha360ConfigBuilder {
    /// Set samples per field.
    pub const fn lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    /// Set the emitted price fields.
    pub fn price_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.price_fields = fields.into_iter().collect();
        self
    }

    /// Toggle the volume block.
    pub const fn include_volume(mut self, enabled: bool) -> Self {
        self.include_volume = enabled;
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<Alpha360Config> {
        if self.lookback == 0 {
            return Err(AlphaError::InvalidConfig("alpha360 lookback must be positive".to_string()));
        }
        if let Some(field) = self.price_fields.iter().find(|f| !f.is_price()) {
            return Err(AlphaError::InvalidConfig(format!(
                "price_fields: {field} is not a price field, use include_volume"
            )));
        }

        let price_fields: Vec<Field> = FIELD_ORDER[..5]
            .iter()
            .copied()
            .filter(|f| self.price_fields.contains(f))
            .collect();
        if price_fields.is_empty() && !self.include_volume {
            return Err(AlphaError::InvalidConfig("alpha360 config emits no fields".to_string()));
        }

        Ok(Alpha360Config {
            lookback: self.lookback,
            price_fields,
            include_volume: self.include_volume,
        })
    }
}

impl TryFrom<Alpha360ConfigBuilder> for Alpha360Config {
    type Error = AlphaError;

    fn try_from(builder: Alpha360ConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<Alpha360Config> for Alpha360ConfigBuilder {
    fn from(config: Alpha360Config) -> Self {
        Self {
            lookback: config.lookback,
            price_fields: config.price_fields,
            include_volume: config.include_volume,
        }
    }
}
