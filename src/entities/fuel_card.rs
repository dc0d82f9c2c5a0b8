use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Fleet fuel card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelCard {
    /// Server-assigned id.
    pub id: u64,
    /// Primary account number printed on the card.
    pub pan: String,
    /// Plate of the vehicle the card is assigned to.
    pub matricula: String,
    /// Fuel provider network.
    pub provider: String,
    /// Whether the card can be used.
    pub active: bool,
}

/// Create/update body for [`FuelCard`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FuelCardInput {
    /// Primary account number.
    pub pan: String,
    /// Vehicle plate.
    pub matricula: String,
    /// Fuel provider network.
    pub provider: String,
    /// Whether the card can be used.
    pub active: bool,
}

impl FuelCardInput {
    /// Record as confirmed by the server under `id`.
    pub fn into_record(self, id: u64) -> FuelCard {
        FuelCard {
            id,
            pan: self.pan,
            matricula: self.matricula,
            provider: self.provider,
            active: self.active,
        }
    }
}

impl Record for FuelCard {
    type Id = u64;

    const FILTER_FIELDS: &'static [&'static str] = &["pan", "matricula", "provider", "status"];
    const LABEL: &'static str = "Fuel card";

    fn id(&self) -> u64 {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "pan" => Some(self.pan.clone()),
            "matricula" => Some(self.matricula.clone()),
            "provider" => Some(self.provider.clone()),
            "status" => Some(if self.active { "active" } else { "inactive" }.to_string()),
            _ => None,
        }
    }
}
