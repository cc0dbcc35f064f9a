//! Core entity types - locations, equipment and sensor components
//!
//! The API delivers assets as one flat record shape where sensor metadata is
//! optional. Ingestion splits that record into two statically distinct
//! variants so the rest of the crate never re-checks nullability.

use serde::{Deserialize, Serialize};

pub type LocationId = String;
pub type AssetId = String;

// =============================================================================
// LOCATIONS
// =============================================================================

/// A site or area. Locations nest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<LocationId>,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    /// Nest this location under another one
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

// =============================================================================
// SENSOR METADATA
// =============================================================================

/// Kind of measurement a component reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Energy,
    Vibration,
}

impl SensorType {
    pub const ALL: [SensorType; 2] = [SensorType::Energy, SensorType::Vibration];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorType::Energy => "energy",
            SensorType::Vibration => "vibration",
        }
    }

    /// Parse a sensor type (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "energy" => Some(SensorType::Energy),
            "vibration" => Some(SensorType::Vibration),
            _ => None,
        }
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating state reported by a component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    #[default]
    Operating,
    Alert,
}

impl SensorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorStatus::Operating => "operating",
            SensorStatus::Alert => "alert",
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, SensorStatus::Alert)
    }
}

impl std::fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ASSETS
// =============================================================================

/// Equipment without sensor metadata. May host other assets or components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonComponentAsset {
    pub id: AssetId,
    pub name: String,
    pub location_id: Option<LocationId>,
    pub parent_id: Option<AssetId>,
}

/// Sensor-bearing asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAsset {
    pub id: AssetId,
    pub name: String,
    pub location_id: Option<LocationId>,
    pub parent_id: Option<AssetId>,
    pub sensor_id: String,
    pub sensor_type: SensorType,
    pub status: SensorStatus,
    pub gateway_id: Option<String>,
}

/// An asset as used by the tree: equipment or sensor component.
///
/// On the wire both variants share the flat [`AssetRecord`] shape; a record
/// is a component exactly when it carries a `sensorType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AssetRecord", into = "AssetRecord")]
pub enum Asset {
    NonComponent(NonComponentAsset),
    Component(ComponentAsset),
}

impl Asset {
    /// Build an equipment asset with no relations
    pub fn equipment(id: impl Into<String>, name: impl Into<String>) -> Self {
        Asset::NonComponent(NonComponentAsset {
            id: id.into(),
            name: name.into(),
            location_id: None,
            parent_id: None,
        })
    }

    /// Build a component with an operating status and no relations
    pub fn component(
        id: impl Into<String>,
        name: impl Into<String>,
        sensor_type: SensorType,
        sensor_id: impl Into<String>,
    ) -> Self {
        Asset::Component(ComponentAsset {
            id: id.into(),
            name: name.into(),
            location_id: None,
            parent_id: None,
            sensor_id: sensor_id.into(),
            sensor_type,
            status: SensorStatus::Operating,
            gateway_id: None,
        })
    }

    pub fn with_location(mut self, location_id: impl Into<String>) -> Self {
        match &mut self {
            Asset::NonComponent(a) => a.location_id = Some(location_id.into()),
            Asset::Component(c) => c.location_id = Some(location_id.into()),
        }
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        match &mut self {
            Asset::NonComponent(a) => a.parent_id = Some(parent_id.into()),
            Asset::Component(c) => c.parent_id = Some(parent_id.into()),
        }
        self
    }

    /// Set the status of a component. No effect on equipment.
    pub fn with_status(mut self, status: SensorStatus) -> Self {
        if let Asset::Component(c) = &mut self {
            c.status = status;
        }
        self
    }

    /// Set the gateway of a component. No effect on equipment.
    pub fn with_gateway(mut self, gateway_id: impl Into<String>) -> Self {
        if let Asset::Component(c) = &mut self {
            c.gateway_id = Some(gateway_id.into());
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Asset::NonComponent(a) => &a.id,
            Asset::Component(c) => &c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Asset::NonComponent(a) => &a.name,
            Asset::Component(c) => &c.name,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Asset::NonComponent(a) => a.parent_id.as_deref(),
            Asset::Component(c) => c.parent_id.as_deref(),
        }
    }

    pub fn location_id(&self) -> Option<&str> {
        match self {
            Asset::NonComponent(a) => a.location_id.as_deref(),
            Asset::Component(c) => c.location_id.as_deref(),
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self, Asset::Component(_))
    }
}

// =============================================================================
// WIRE RECORD
// =============================================================================

/// Flat asset payload as delivered by the API.
///
/// Every sensor field is optional; empty relation ids are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: AssetId,
    pub name: String,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub parent_id: Option<AssetId>,
    #[serde(default)]
    pub sensor_type: Option<SensorType>,
    #[serde(default)]
    pub status: Option<SensorStatus>,
    #[serde(default)]
    pub sensor_id: Option<String>,
    #[serde(default)]
    pub gateway_id: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<AssetRecord> for Asset {
    fn from(record: AssetRecord) -> Self {
        let location_id = non_empty(record.location_id);
        let parent_id = non_empty(record.parent_id);

        match record.sensor_type {
            Some(sensor_type) => Asset::Component(ComponentAsset {
                id: record.id,
                name: record.name,
                location_id,
                parent_id,
                sensor_id: record.sensor_id.unwrap_or_default(),
                sensor_type,
                status: record.status.unwrap_or_default(),
                gateway_id: non_empty(record.gateway_id),
            }),
            None => Asset::NonComponent(NonComponentAsset {
                id: record.id,
                name: record.name,
                location_id,
                parent_id,
            }),
        }
    }
}

impl From<Asset> for AssetRecord {
    fn from(asset: Asset) -> Self {
        match asset {
            Asset::NonComponent(a) => AssetRecord {
                id: a.id,
                name: a.name,
                location_id: a.location_id,
                parent_id: a.parent_id,
                sensor_type: None,
                status: None,
                sensor_id: None,
                gateway_id: None,
            },
            Asset::Component(c) => AssetRecord {
                id: c.id,
                name: c.name,
                location_id: c.location_id,
                parent_id: c.parent_id,
                sensor_type: Some(c.sensor_type),
                status: Some(c.status),
                sensor_id: Some(c.sensor_id),
                gateway_id: c.gateway_id,
            },
        }
    }
}
