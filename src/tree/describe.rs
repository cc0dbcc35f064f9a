//! Node descriptions for renderers
//!
//! Turns a node into display-ready facts: a kind label, child-count tags,
//! metadata entries and, for components, the sensor status.

use serde::Serialize;

use super::node::{NodeData, NodeType, TreeNode};
use super::types::{SensorStatus, SensorType};

/// Visual tone of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Info,
    Warning,
    Positive,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub key: &'static str,
    pub tone: Tone,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataEntry {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescription {
    pub kind_label: &'static str,
    pub tags: Vec<Tag>,
    pub metadata: Vec<MetadataEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Tag>,
}

impl NodeDescription {
    /// True for components reporting an alert
    pub fn is_critical(&self) -> bool {
        self.status
            .as_ref()
            .map(|s| s.tone == Tone::Critical)
            .unwrap_or(false)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ChildCounts {
    locations: usize,
    assets: usize,
    components: usize,
}

fn count_children(node: &TreeNode) -> ChildCounts {
    node.children
        .iter()
        .fold(ChildCounts::default(), |mut acc, child| {
            match child.node_type() {
                NodeType::Location => acc.locations += 1,
                NodeType::Asset => acc.assets += 1,
                NodeType::Component => acc.components += 1,
            }
            acc
        })
}

fn count_tag(key: &'static str, tone: Tone, count: usize, noun: &str) -> Option<Tag> {
    (count > 0).then(|| Tag {
        key,
        tone,
        label: format!("{} {}", count, noun),
    })
}

fn entry(label: &'static str, value: Option<&str>) -> Option<MetadataEntry> {
    value.map(|v| MetadataEntry {
        label,
        value: v.to_string(),
    })
}

pub fn kind_label(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Location => "Location",
        NodeType::Asset => "Asset",
        NodeType::Component => "Component",
    }
}

/// Describe a node for display
pub fn describe_node(node: &TreeNode) -> NodeDescription {
    let kind_label = kind_label(node.node_type());

    match &node.data {
        NodeData::Location(_) => {
            let counts = count_children(node);
            let tags = [
                count_tag("tags-locations", Tone::Neutral, counts.locations, "sublocations"),
                count_tag("tags-assets", Tone::Info, counts.assets, "assets"),
                count_tag("tags-components", Tone::Warning, counts.components, "components"),
            ];

            NodeDescription {
                kind_label,
                tags: tags.into_iter().flatten().collect(),
                metadata: Vec::new(),
                status: None,
            }
        }

        NodeData::Asset(asset) => {
            let counts = count_children(node);
            let unlinked = (asset.location_id.is_none() && asset.parent_id.is_none()).then(|| Tag {
                key: "tags-unlinked",
                tone: Tone::Warning,
                label: "unlinked".to_string(),
            });
            let tags = [
                count_tag("tags-subassets", Tone::Neutral, counts.assets, "subassets"),
                count_tag("tags-components", Tone::Info, counts.components, "sensors"),
                unlinked,
            ];
            let metadata = [
                entry("ID", Some(asset.id.as_str())),
                entry("Location", asset.location_id.as_deref()),
                entry("Parent asset", asset.parent_id.as_deref()),
            ];

            NodeDescription {
                kind_label,
                tags: tags.into_iter().flatten().collect(),
                metadata: metadata.into_iter().flatten().collect(),
                status: None,
            }
        }

        NodeData::Component(component) => {
            let sensor_tag = match component.sensor_type {
                SensorType::Energy => Tag {
                    key: "tags-sensor-type",
                    tone: Tone::Info,
                    label: "Energy sensor".to_string(),
                },
                SensorType::Vibration => Tag {
                    key: "tags-sensor-type",
                    tone: Tone::Warning,
                    label: "Vibration sensor".to_string(),
                },
            };
            let metadata = [
                entry("Sensor", Some(component.sensor_id.as_str())),
                entry("Gateway", component.gateway_id.as_deref()),
                entry("Parent asset", component.parent_id.as_deref()),
                entry("Location", component.location_id.as_deref()),
            ];
            let status = match component.status {
                SensorStatus::Operating => Tag {
                    key: "status",
                    tone: Tone::Positive,
                    label: "Operating".to_string(),
                },
                SensorStatus::Alert => Tag {
                    key: "status",
                    tone: Tone::Critical,
                    label: "Alert".to_string(),
                },
            };

            NodeDescription {
                kind_label,
                tags: vec![sensor_tag],
                metadata: metadata.into_iter().flatten().collect(),
                status: Some(status),
            }
        }
    }
}
