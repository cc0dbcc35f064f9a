//! Tree filtering - search, sensor type and criticality predicates
//!
//! Filtering prunes a forest down to the nodes that match every active
//! predicate plus the ancestors needed to reach them. The source forest is
//! only borrowed; kept nodes are fresh copies with freshly built child lists.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::node::{count_nodes, NodeData, TreeNode};
use super::normalize::normalize_search_text;
use super::types::SensorType;

// =============================================================================
// FILTER STATE
// =============================================================================

/// User-selected filters. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFilterState {
    #[serde(default)]
    pub search_term: String,
    /// Membership only; order and duplicates carry no meaning
    #[serde(default)]
    pub sensor_types: SmallVec<[SensorType; 2]>,
    #[serde(default)]
    pub critical_only: bool,
}

impl AssetFilterState {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Default::default()
        }
    }

    pub fn with_sensor_type(mut self, sensor_type: SensorType) -> Self {
        if !self.sensor_types.contains(&sensor_type) {
            self.sensor_types.push(sensor_type);
        }
        self
    }

    pub fn with_critical_only(mut self, critical_only: bool) -> Self {
        self.critical_only = critical_only;
        self
    }

    /// Add the sensor type if absent, remove it if present
    pub fn toggle_sensor_type(&mut self, sensor_type: SensorType) {
        match self.sensor_types.iter().position(|t| *t == sensor_type) {
            Some(pos) => {
                self.sensor_types.remove(pos);
            }
            None => self.sensor_types.push(sensor_type),
        }
    }

    /// Whether any predicate constrains the tree
    pub fn is_active(&self) -> bool {
        SearchTerm::parse(&self.search_term).is_some()
            || !self.sensor_types.is_empty()
            || self.critical_only
    }
}

/// A trimmed, normalized, non-empty search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// `None` when the term is blank after trimming and normalization
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = normalize_search_text(trimmed);
        if normalized.is_empty() {
            return None;
        }
        Some(SearchTerm(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Does `value`, once normalized, contain this term?
    pub fn found_in(&self, value: &str) -> bool {
        !value.is_empty() && normalize_search_text(value).contains(&self.0)
    }
}

// =============================================================================
// PREDICATE
// =============================================================================

/// Text fields a search term is matched against
fn searchable_values(node: &TreeNode) -> SmallVec<[&str; 6]> {
    let mut values: SmallVec<[&str; 6]> = SmallVec::new();
    values.push(&node.name);
    values.push(&node.id);

    match &node.data {
        NodeData::Location(_) => {}
        NodeData::Asset(asset) => {
            values.extend(asset.parent_id.as_deref());
            values.extend(asset.location_id.as_deref());
        }
        NodeData::Component(component) => {
            values.extend(component.parent_id.as_deref());
            values.extend(component.location_id.as_deref());
            values.push(&component.sensor_id);
            values.extend(component.gateway_id.as_deref());
        }
    }

    values
}

/// Whether a node itself satisfies every active filter (children ignored)
pub fn node_matches(
    node: &TreeNode,
    filters: &AssetFilterState,
    term: Option<&SearchTerm>,
) -> bool {
    if let Some(term) = term {
        if !searchable_values(node).iter().any(|v| term.found_in(v)) {
            return false;
        }
    }

    if !filters.sensor_types.is_empty() {
        match node.as_component() {
            Some(c) if filters.sensor_types.contains(&c.sensor_type) => {}
            _ => return false,
        }
    }

    if filters.critical_only {
        match node.as_component() {
            Some(c) if c.status.is_critical() => {}
            _ => return false,
        }
    }

    true
}

// =============================================================================
// PRUNING
// =============================================================================

/// Prune a subtree. Keeps the node if it matches or any descendant does.
pub fn filter_node(
    node: &TreeNode,
    filters: &AssetFilterState,
    term: Option<&SearchTerm>,
) -> Option<TreeNode> {
    let children: Vec<TreeNode> = node
        .children
        .iter()
        .filter_map(|child| filter_node(child, filters, term))
        .collect();

    if children.is_empty() && !node_matches(node, filters, term) {
        return None;
    }

    Some(node.with_same_data(children))
}

/// Apply filters to a forest.
///
/// With no active filter the input slice itself is returned borrowed, so
/// callers can skip downstream work by comparing pointers.
pub fn apply_tree_filters<'a>(
    nodes: &'a [TreeNode],
    filters: &AssetFilterState,
) -> Cow<'a, [TreeNode]> {
    let term = SearchTerm::parse(&filters.search_term);

    if term.is_none() && filters.sensor_types.is_empty() && !filters.critical_only {
        return Cow::Borrowed(nodes);
    }

    let filtered: Vec<TreeNode> = nodes
        .iter()
        .filter_map(|node| filter_node(node, filters, term.as_ref()))
        .collect();

    debug!(
        search = term.as_ref().map(SearchTerm::as_str).unwrap_or(""),
        sensor_types = filters.sensor_types.len(),
        critical_only = filters.critical_only,
        kept = count_nodes(&filtered),
        "filtered asset tree"
    );

    Cow::Owned(filtered)
}
