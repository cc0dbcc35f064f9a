//! Asset Tree Model
//!
//! Hierarchical view over a company's plant:
//! ```text
//! Location ──► Location ──► Asset ──► Asset ──► Component
//!     │                       ▲
//!     └───────────────────────┘ (assets may also hang off locations)
//! ```
//!
//! This module provides:
//! - Entity types (`Location`, `Asset` with its equipment/component variants)
//! - `TreeBuilder` that wires flat entity lists into a forest of `TreeNode`
//! - `apply_tree_filters` that prunes a forest by search term, sensor type
//!   and criticality while keeping the path to every match
//! - `describe_node` for renderers
//!
//! Everything here is a pure function of its inputs.

pub mod builder;
pub mod describe;
pub mod filter;
pub mod node;
pub mod normalize;
pub mod types;

pub use builder::{build_tree, Attachment, BuildReport, NodeIndex, ParentResolver, TreeBuilder};
pub use describe::{describe_node, MetadataEntry, NodeDescription, Tag, Tone};
pub use filter::{apply_tree_filters, filter_node, node_matches, AssetFilterState, SearchTerm};
pub use node::{count_nodes, find_in, flatten, path_in, NodeData, NodeType, TreeNode};
pub use normalize::normalize_search_text;
pub use types::{
    Asset, AssetId, AssetRecord, ComponentAsset, Location, LocationId, NonComponentAsset,
    SensorStatus, SensorType,
};
