use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Electronic toll device mounted in a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TollDevice {
    /// Server-assigned id.
    pub id: u64,
    /// Device serial number.
    pub serial: String,
    /// Plate of the vehicle carrying the device.
    pub matricula: String,
    /// Toll operator.
    pub operator: String,
}

/// Create/update body for [`TollDevice`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TollDeviceInput {
    /// Device serial number.
    pub serial: String,
    /// Vehicle plate.
    pub matricula: String,
    /// Toll operator.
    pub operator: String,
}

impl TollDeviceInput {
    /// Record as confirmed by the server under `id`.
    pub fn into_record(self, id: u64) -> TollDevice {
        TollDevice {
            id,
            serial: self.serial,
            matricula: self.matricula,
            operator: self.operator,
        }
    }
}

impl Record for TollDevice {
    type Id = u64;

    const FILTER_FIELDS: &'static [&'static str] = &["serial", "matricula", "operator"];
    const LABEL: &'static str = "Toll device";

    fn id(&self) -> u64 {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "serial" => Some(self.serial.clone()),
            "matricula" => Some(self.matricula.clone()),
            "operator" => Some(self.operator.clone()),
            _ => None,
        }
    }
}
