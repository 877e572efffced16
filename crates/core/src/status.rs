//! Vehicle fleet status enum.

use serde::{Deserialize, Serialize};

/// Operational status of a vehicle.
///
/// Stored as lowercase text in the `vehicles.status` column; the Spanish
/// labels are the canonical wire and storage values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Disponible,
    EnViaje,
    EnMantenimiento,
    Inactivo,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Disponible => "disponible",
            VehicleStatus::EnViaje => "en_viaje",
            VehicleStatus::EnMantenimiento => "en_mantenimiento",
            VehicleStatus::Inactivo => "inactivo",
        }
    }

    /// Parse a storage/wire value. Returns `None` for unknown text.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "disponible" => Some(VehicleStatus::Disponible),
            "en_viaje" => Some(VehicleStatus::EnViaje),
            "en_mantenimiento" => Some(VehicleStatus::EnMantenimiento),
            "inactivo" => Some(VehicleStatus::Inactivo),
            _ => None,
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
