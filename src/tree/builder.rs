//! TreeBuilder - assembles the asset hierarchy from flat entity lists
//!
//! The builder takes locations and assets and produces a forest of
//! [`TreeNode`]. It handles:
//! - Linking locations to their parent locations (complete skeleton first)
//! - Attaching every asset through an ordered list of parent resolvers
//! - Absorbing unresolvable references into the root list
//! - Breaking parent cycles so every entity appears exactly once
//!
//! Nodes live in an index arena while relations are wired; the final forest
//! is produced by moving each node out of the arena exactly once.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::node::{NodeType, TreeNode};
use super::types::{Asset, Location};

// =============================================================================
// PARENT RESOLUTION
// =============================================================================

/// Where an asset node gets attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Child of the equipment node at this arena slot
    UnderAsset(usize),
    /// Child of the location node at this arena slot
    UnderLocation(usize),
    /// Top-level node
    Root,
}

/// One strategy for placing an asset, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentResolver {
    /// `parent_id` names an equipment node (components do not host)
    AssetParent,
    /// `location_id` names a known location
    Location,
    /// Always succeeds
    RootFallback,
}

impl ParentResolver {
    /// Priority order used by [`TreeBuilder::default`]
    pub const STANDARD_ORDER: [ParentResolver; 3] = [
        ParentResolver::AssetParent,
        ParentResolver::Location,
        ParentResolver::RootFallback,
    ];

    /// Try to place `asset`; `None` hands over to the next resolver
    pub fn resolve(&self, asset: &Asset, index: &NodeIndex) -> Option<Attachment> {
        match self {
            ParentResolver::AssetParent => {
                let parent_id = relation(asset.parent_id())?;
                match index.assets.get(parent_id) {
                    Some(&(slot, NodeType::Asset)) => Some(Attachment::UnderAsset(slot)),
                    _ => None,
                }
            }
            ParentResolver::Location => {
                let location_id = relation(asset.location_id())?;
                index
                    .locations
                    .get(location_id)
                    .map(|&slot| Attachment::UnderLocation(slot))
            }
            ParentResolver::RootFallback => Some(Attachment::Root),
        }
    }
}

/// Empty ids count as missing relations
fn relation(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty())
}

/// Id lookup maps built for a single build. Last write wins on duplicate ids.
#[derive(Debug, Default)]
pub struct NodeIndex {
    locations: HashMap<String, usize>,
    assets: HashMap<String, (usize, NodeType)>,
}

impl NodeIndex {
    /// Register a location slot. Returns true if the id was already taken.
    pub fn insert_location(&mut self, id: &str, slot: usize) -> bool {
        self.locations.insert(id.to_string(), slot).is_some()
    }

    /// Register an asset slot. Returns true if the id was already taken.
    pub fn insert_asset(&mut self, id: &str, slot: usize, node_type: NodeType) -> bool {
        self.assets
            .insert(id.to_string(), (slot, node_type))
            .is_some()
    }

    pub fn location_slot(&self, id: &str) -> Option<usize> {
        self.locations.get(id).copied()
    }
}

// =============================================================================
// BUILD REPORT
// =============================================================================

/// Diagnostics collected while building a forest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub location_count: usize,
    pub asset_count: usize,
    pub component_count: usize,
    /// Locations without a resolvable parent location
    pub location_roots: usize,
    /// Assets and components placed by the root fallback
    pub absorbed_roots: usize,
    /// Ids of nodes promoted to roots because their parent chain loops
    pub broken_cycles: Vec<String>,
    /// Ids seen more than once within the same collection
    pub duplicate_ids: Vec<String>,
}

impl BuildReport {
    pub fn total_nodes(&self) -> usize {
        self.location_count + self.asset_count + self.component_count
    }

    pub fn is_clean(&self) -> bool {
        self.broken_cycles.is_empty() && self.duplicate_ids.is_empty()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds asset trees from locations + assets
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    resolvers: Vec<ParentResolver>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            resolvers: ParentResolver::STANDARD_ORDER.to_vec(),
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom resolver order. Assets no resolver places become roots.
    pub fn with_resolvers(resolvers: Vec<ParentResolver>) -> Self {
        Self { resolvers }
    }

    /// Build the forest
    pub fn build(&self, locations: &[Location], assets: &[Asset]) -> Vec<TreeNode> {
        self.build_with_report(locations, assets).0
    }

    /// Build the forest and report what happened along the way
    pub fn build_with_report(
        &self,
        locations: &[Location],
        assets: &[Asset],
    ) -> (Vec<TreeNode>, BuildReport) {
        let total = locations.len() + assets.len();
        let mut slots: Vec<Option<TreeNode>> = Vec::with_capacity(total);
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); total];
        let mut parents: Vec<Option<usize>> = vec![None; total];
        let mut index = NodeIndex::default();
        let mut report = BuildReport {
            location_count: locations.len(),
            ..Default::default()
        };

        // 1. One node per location
        for (slot, location) in locations.iter().enumerate() {
            if index.insert_location(&location.id, slot) {
                report.duplicate_ids.push(location.id.clone());
            }
            slots.push(Some(TreeNode::location(location.clone())));
        }

        // 2. Location skeleton, completed before any asset is attached
        let mut location_roots = Vec::new();
        for (slot, location) in locations.iter().enumerate() {
            match relation(location.parent_id.as_deref()).and_then(|p| index.location_slot(p)) {
                Some(parent) => {
                    children[parent].push(slot);
                    parents[slot] = Some(parent);
                }
                None => location_roots.push(slot),
            }
        }

        // 3. Classify and index every asset
        let offset = locations.len();
        for (i, asset) in assets.iter().enumerate() {
            let node = match asset {
                Asset::NonComponent(a) => {
                    report.asset_count += 1;
                    TreeNode::asset(a.clone())
                }
                Asset::Component(c) => {
                    report.component_count += 1;
                    TreeNode::component(c.clone())
                }
            };
            if index.insert_asset(asset.id(), offset + i, node.node_type()) {
                report.duplicate_ids.push(asset.id().to_string());
            }
            slots.push(Some(node));
        }

        // 4. Attach assets through the resolver chain
        let mut asset_roots = Vec::new();
        for (i, asset) in assets.iter().enumerate() {
            let slot = offset + i;
            match self.attachment_for(asset, &index) {
                Attachment::UnderAsset(parent) | Attachment::UnderLocation(parent) => {
                    children[parent].push(slot);
                    parents[slot] = Some(parent);
                }
                Attachment::Root => asset_roots.push(slot),
            }
        }

        // 5. Location roots first, then absorbed assets
        report.location_roots = location_roots.len();
        report.absorbed_roots = asset_roots.len();

        let mut roots = Vec::with_capacity(location_roots.len() + asset_roots.len());
        for slot in location_roots.into_iter().chain(asset_roots) {
            if let Some(node) = assemble(slot, &mut slots, &children) {
                roots.push(node);
            }
        }

        // Whatever is left sits on a parent cycle or below one; promote one
        // member per cycle
        for slot in 0..slots.len() {
            if slots[slot].is_none() {
                continue;
            }
            let member = cycle_member(slot, &parents);
            if let Some(node) = assemble(member, &mut slots, &children) {
                warn!(
                    id = %node.id,
                    node_type = node.node_type().as_str(),
                    "parent chain loops back on itself; promoting node to root"
                );
                report.broken_cycles.push(node.id.clone());
                roots.push(node);
            }
        }

        for id in &report.duplicate_ids {
            warn!(id = %id, "duplicate id; references resolve to the last entity");
        }

        debug!(
            locations = report.location_count,
            assets = report.asset_count,
            components = report.component_count,
            roots = roots.len(),
            absorbed = report.absorbed_roots,
            "built asset tree"
        );

        (roots, report)
    }

    fn attachment_for(&self, asset: &Asset, index: &NodeIndex) -> Attachment {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(asset, index))
            .unwrap_or(Attachment::Root)
    }
}

/// Lowest arena slot on the cycle reached by following parents from `slot`.
///
/// Unplaced slots always lead into a cycle; a chain that ends without one
/// yields the last slot reached.
fn cycle_member(slot: usize, parents: &[Option<usize>]) -> usize {
    let mut seen = vec![false; parents.len()];
    let mut current = slot;
    while !seen[current] {
        seen[current] = true;
        match parents[current] {
            Some(parent) => current = parent,
            None => return current,
        }
    }

    let start = current;
    let mut lowest = start;
    let mut next = parents[start];
    while let Some(member) = next {
        if member == start {
            break;
        }
        lowest = lowest.min(member);
        next = parents[member];
    }
    lowest
}

/// Move a node and its subtree out of the arena.
///
/// A slot is taken before its children are visited, so a child pointing back
/// up the chain finds an empty slot and is skipped.
fn assemble(
    slot: usize,
    slots: &mut [Option<TreeNode>],
    children: &[Vec<usize>],
) -> Option<TreeNode> {
    let mut node = slots[slot].take()?;
    for &child in &children[slot] {
        if let Some(child_node) = assemble(child, slots, children) {
            node.add_child(child_node);
        }
    }
    Some(node)
}

/// Build the forest with the standard resolver order
pub fn build_tree(locations: &[Location], assets: &[Asset]) -> Vec<TreeNode> {
    TreeBuilder::default().build(locations, assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::{count_nodes, path_in};
    use crate::tree::types::{SensorStatus, SensorType};

    fn ids(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn sample_index() -> NodeIndex {
        let mut index = NodeIndex::default();
        index.insert_location("loc-a", 0);
        index.insert_asset("asset-a", 1, NodeType::Asset);
        index.insert_asset("comp-a", 2, NodeType::Component);
        index
    }

    #[test]
    fn test_asset_parent_resolver() {
        let index = sample_index();
        let resolver = ParentResolver::AssetParent;

        let under_asset = Asset::equipment("x", "X").with_parent("asset-a");
        assert_eq!(
            resolver.resolve(&under_asset, &index),
            Some(Attachment::UnderAsset(1))
        );

        let under_component = Asset::equipment("y", "Y").with_parent("comp-a");
        assert_eq!(resolver.resolve(&under_component, &index), None);

        let dangling = Asset::equipment("z", "Z").with_parent("missing");
        assert_eq!(resolver.resolve(&dangling, &index), None);
    }

    #[test]
    fn test_location_resolver() {
        let index = sample_index();
        let resolver = ParentResolver::Location;

        let placed = Asset::equipment("x", "X").with_location("loc-a");
        assert_eq!(
            resolver.resolve(&placed, &index),
            Some(Attachment::UnderLocation(0))
        );

        let unplaced = Asset::equipment("y", "Y").with_location("loc-missing");
        assert_eq!(resolver.resolve(&unplaced, &index), None);
        assert_eq!(resolver.resolve(&Asset::equipment("z", "Z"), &index), None);
    }

    #[test]
    fn test_root_fallback_always_resolves() {
        let index = NodeIndex::default();
        assert_eq!(
            ParentResolver::RootFallback.resolve(&Asset::equipment("x", "X"), &index),
            Some(Attachment::Root)
        );
    }

    #[test]
    fn test_basic_hierarchy() {
        let locations = vec![
            Location::new("loc-root", "Factory"),
            Location::new("loc-line", "Line A").with_parent("loc-root"),
        ];
        let assets = vec![
            Asset::equipment("asset-mixer", "Mixer").with_location("loc-line"),
            Asset::equipment("asset-motor", "Motor").with_parent("asset-mixer"),
            Asset::component("comp-torque", "Torque Sensor", SensorType::Vibration, "S-TQ-01")
                .with_parent("asset-motor")
                .with_status(SensorStatus::Alert),
            Asset::component("comp-ambient", "Ambient Sensor", SensorType::Energy, "S-EN-99")
                .with_location("loc-root"),
        ];

        let tree = build_tree(&locations, &assets);

        assert_eq!(ids(&tree), vec!["loc-root"]);
        let root = &tree[0];
        assert_eq!(ids(&root.children), vec!["loc-line", "comp-ambient"]);

        let mixer = &root.children[0].children[0];
        assert_eq!(mixer.id, "asset-mixer");
        let motor = &mixer.children[0];
        assert_eq!(motor.id, "asset-motor");
        let torque = &motor.children[0];
        assert_eq!(torque.id, "comp-torque");
        assert_eq!(torque.node_type(), NodeType::Component);
        assert!(torque.children.is_empty());
    }

    #[test]
    fn test_asset_parent_beats_location() {
        let locations = vec![Location::new("loc-1", "Hall")];
        let assets = vec![
            Asset::equipment("asset-1", "Press").with_location("loc-1"),
            Asset::equipment("asset-2", "Die")
                .with_location("loc-1")
                .with_parent("asset-1"),
        ];

        let tree = build_tree(&locations, &assets);

        assert_eq!(ids(&tree[0].children), vec!["asset-1"]);
        assert_eq!(ids(&tree[0].children[0].children), vec!["asset-2"]);
    }

    #[test]
    fn test_component_parent_falls_through_to_location() {
        let locations = vec![Location::new("loc-1", "Hall")];
        let assets = vec![
            Asset::component("comp-1", "Meter", SensorType::Energy, "E1"),
            Asset::equipment("asset-1", "Bracket")
                .with_parent("comp-1")
                .with_location("loc-1"),
        ];

        let tree = build_tree(&locations, &assets);

        assert_eq!(ids(&tree), vec!["loc-1", "comp-1"]);
        assert_eq!(ids(&tree[0].children), vec!["asset-1"]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_orphans_are_absorbed_into_roots() {
        let locations = vec![Location::new("loc-a", "Area A")];
        let assets = vec![
            Asset::equipment("asset-orphan", "Generator").with_parent("missing"),
            Asset::component("comp-loose", "Loose Sensor", SensorType::Energy, "EN-01")
                .with_parent("missing"),
        ];

        let (tree, report) = TreeBuilder::new().build_with_report(&locations, &assets);

        assert_eq!(ids(&tree), vec!["loc-a", "asset-orphan", "comp-loose"]);
        assert_eq!(tree[2].node_type(), NodeType::Component);
        assert_eq!(report.location_roots, 1);
        assert_eq!(report.absorbed_roots, 2);
    }

    #[test]
    fn test_unknown_parent_and_unknown_location_lands_in_roots() {
        let assets =
            vec![Asset::equipment("asset-1", "Valve")
                .with_parent("nope")
                .with_location("nowhere")];

        let tree = build_tree(&[], &assets);

        assert_eq!(ids(&tree), vec!["asset-1"]);
    }

    #[test]
    fn test_roots_keep_encounter_order() {
        let locations = vec![Location::new("loc-b", "B"), Location::new("loc-a", "A")];
        let assets = vec![
            Asset::equipment("asset-z", "Z"),
            Asset::equipment("asset-y", "Y"),
        ];

        let tree = build_tree(&locations, &assets);

        assert_eq!(ids(&tree), vec!["loc-b", "loc-a", "asset-z", "asset-y"]);
    }

    #[test]
    fn test_location_skeleton_is_complete_before_assets() {
        // The child location is listed before its parent
        let locations = vec![
            Location::new("loc-child", "Child").with_parent("loc-parent"),
            Location::new("loc-parent", "Parent"),
        ];
        let assets = vec![Asset::equipment("asset-1", "Lathe").with_location("loc-parent")];

        let tree = build_tree(&locations, &assets);

        assert_eq!(ids(&tree), vec!["loc-parent"]);
        assert_eq!(ids(&tree[0].children), vec!["loc-child", "asset-1"]);
    }

    #[test]
    fn test_empty_inputs() {
        let (tree, report) = TreeBuilder::new().build_with_report(&[], &[]);
        assert!(tree.is_empty());
        assert_eq!(report, BuildReport::default());
    }

    #[test]
    fn test_location_cycle_is_broken() {
        let locations = vec![
            Location::new("loc-a", "A").with_parent("loc-b"),
            Location::new("loc-b", "B").with_parent("loc-a"),
            Location::new("loc-c", "C"),
        ];
        let assets = vec![Asset::equipment("asset-1", "Crane").with_location("loc-b")];

        let (tree, report) = TreeBuilder::new().build_with_report(&locations, &assets);

        assert_eq!(ids(&tree), vec!["loc-c", "loc-a"]);
        assert_eq!(ids(&tree[1].children), vec!["loc-b"]);
        assert_eq!(ids(&tree[1].children[0].children), vec!["asset-1"]);
        assert_eq!(report.broken_cycles, vec!["loc-a".to_string()]);
        assert_eq!(count_nodes(&tree), 4);
    }

    #[test]
    fn test_location_below_cycle_keeps_its_parent() {
        let locations = vec![
            Location::new("loc-x", "X").with_parent("loc-a"),
            Location::new("loc-a", "A").with_parent("loc-b"),
            Location::new("loc-b", "B").with_parent("loc-a"),
        ];

        let (tree, report) = TreeBuilder::new().build_with_report(&locations, &[]);

        assert_eq!(ids(&tree), vec!["loc-a"]);
        assert_eq!(report.broken_cycles, vec!["loc-a".to_string()]);
        assert_eq!(path_in(&tree, "loc-x"), Some(vec!["loc-a", "loc-x"]));
        assert_eq!(path_in(&tree, "loc-b"), Some(vec!["loc-a", "loc-b"]));
        assert_eq!(count_nodes(&tree), 3);
    }

    #[test]
    fn test_component_below_asset_cycle_keeps_its_parent() {
        let assets = vec![
            Asset::component("c", "Probe", SensorType::Energy, "S-1").with_parent("a"),
            Asset::equipment("a", "Press").with_parent("b"),
            Asset::equipment("b", "Frame").with_parent("a"),
        ];

        let (tree, report) = TreeBuilder::new().build_with_report(&[], &assets);

        assert_eq!(ids(&tree), vec!["a"]);
        assert_eq!(report.broken_cycles, vec!["a".to_string()]);
        assert_eq!(path_in(&tree, "c"), Some(vec!["a", "c"]));
        assert_eq!(path_in(&tree, "b"), Some(vec!["a", "b"]));
        assert_eq!(count_nodes(&tree), 3);
    }

    #[test]
    fn test_self_parented_asset_is_promoted() {
        let assets = vec![Asset::equipment("asset-1", "Loop").with_parent("asset-1")];

        let (tree, report) = TreeBuilder::new().build_with_report(&[], &assets);

        assert_eq!(ids(&tree), vec!["asset-1"]);
        assert!(tree[0].children.is_empty());
        assert_eq!(report.broken_cycles, vec!["asset-1".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_are_reported() {
        let locations = vec![Location::new("loc-1", "First"), Location::new("loc-1", "Second")];
        let assets = vec![Asset::equipment("asset-1", "Pump").with_location("loc-1")];

        let (tree, report) = TreeBuilder::new().build_with_report(&locations, &assets);

        assert_eq!(report.duplicate_ids, vec!["loc-1".to_string()]);
        assert_eq!(tree.len(), 2);
        // The last location with the id receives the asset
        assert_eq!(tree[1].name, "Second");
        assert_eq!(ids(&tree[1].children), vec!["asset-1"]);
    }

    #[test]
    fn test_custom_resolver_order() {
        let locations = vec![Location::new("loc-1", "Hall")];
        let assets = vec![
            Asset::equipment("asset-1", "Press").with_location("loc-1"),
            Asset::equipment("asset-2", "Die")
                .with_location("loc-1")
                .with_parent("asset-1"),
        ];

        let builder = TreeBuilder::with_resolvers(vec![
            ParentResolver::Location,
            ParentResolver::AssetParent,
        ]);
        let tree = builder.build(&locations, &assets);

        assert_eq!(ids(&tree[0].children), vec!["asset-1", "asset-2"]);
    }
}
