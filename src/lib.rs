//! asset-tree: hierarchical asset explorer core
//!
//! Builds a forest of locations, assets and sensor components from two flat
//! entity lists and prunes it by search term, sensor type and criticality.
//!
//! Module layout:
//! - `tree`    - entity types, tree builder, filters, node descriptions
//! - `feed`    - payload decoding and per-feed load state
//! - `session` - explorer session reducer and active tree selector
//! - `config`  - API base URL and endpoint helpers
//! - `error`   - error types
//!
//! ```
//! use asset_tree::{apply_tree_filters, build_tree, AssetFilterState, Location};
//!
//! let forest = build_tree(&[Location::new("loc-1", "Plant")], &[]);
//! let visible = apply_tree_filters(&forest, &AssetFilterState::search("plant"));
//! assert_eq!(visible.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod session;
pub mod tree;

pub use config::AppConfig;
pub use error::{AssetTreeError, ConfigError, FeedError, Result};
pub use feed::{
    extract_error_message, load_assets, load_locations, load_snapshot, FeedState, FetchError,
};
pub use session::{select_active_tree, ActiveTree, SessionAction, TreeSession, TreeStatus};
pub use tree::{
    apply_tree_filters, build_tree, describe_node, Asset, AssetFilterState, BuildReport,
    Location, NodeType, SensorStatus, SensorType, TreeBuilder, TreeNode,
};
