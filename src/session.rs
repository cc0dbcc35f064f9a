//! Explorer session - selected company, filters and the active tree
//!
//! The session is plain state driven by [`SessionAction`]s. Joining the two
//! entity feeds into a buildable tree happens in [`select_active_tree`].

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::feed::{extract_error_message, FeedState};
use crate::tree::{
    apply_tree_filters, build_tree, Asset, AssetFilterState, Location, SensorType, TreeNode,
};

// =============================================================================
// SESSION STATE
// =============================================================================

/// User intents that change the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum SessionAction {
    /// Switch company; every filter is reset
    SelectCompany(String),
    SetSearchTerm(String),
    ToggleSensorType(SensorType),
    SetCriticalOnly(bool),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSession {
    pub selected_company_id: Option<String>,
    pub filters: AssetFilterState,
}

impl TreeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::SelectCompany(company_id) => {
                self.selected_company_id = Some(company_id);
                self.filters = AssetFilterState::default();
            }
            SessionAction::SetSearchTerm(term) => self.filters.search_term = term,
            SessionAction::ToggleSensorType(sensor_type) => {
                self.filters.toggle_sensor_type(sensor_type)
            }
            SessionAction::SetCriticalOnly(critical_only) => {
                self.filters.critical_only = critical_only
            }
        }
    }

    /// Consuming variant of [`TreeSession::apply`]
    pub fn reduce(mut self, action: SessionAction) -> Self {
        self.apply(action);
        self
    }

    pub fn selected_company(&self) -> Option<&str> {
        self.selected_company_id.as_deref()
    }

    /// The active tree pruned by the session filters
    pub fn visible_tree<'a>(&self, active: &'a ActiveTree) -> Cow<'a, [TreeNode]> {
        apply_tree_filters(&active.nodes, &self.filters)
    }
}

// =============================================================================
// ACTIVE TREE
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Tree of the selected company together with its load status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveTree {
    pub status: TreeStatus,
    pub nodes: Vec<TreeNode>,
    pub error: Option<String>,
}

impl ActiveTree {
    fn idle() -> Self {
        Self::default()
    }

    fn loading() -> Self {
        Self {
            status: TreeStatus::Loading,
            ..Default::default()
        }
    }

    fn failed(message: String) -> Self {
        Self {
            status: TreeStatus::Failed,
            nodes: Vec::new(),
            error: Some(message),
        }
    }
}

/// Join the two feeds of the selected company into an [`ActiveTree`].
///
/// Location errors win over asset errors, errors win over loading, and the
/// tree is only built when both feeds have data.
pub fn select_active_tree(
    company_id: Option<&str>,
    locations: &FeedState<Vec<Location>>,
    assets: &FeedState<Vec<Asset>>,
) -> ActiveTree {
    if company_id.is_none() {
        return ActiveTree::idle();
    }

    if let Some(error) = locations.error() {
        return ActiveTree::failed(extract_error_message(error));
    }
    if let Some(error) = assets.error() {
        return ActiveTree::failed(extract_error_message(error));
    }

    if locations.is_loading() || assets.is_loading() {
        return ActiveTree::loading();
    }

    match (locations.data(), assets.data()) {
        (Some(locations), Some(assets)) => ActiveTree {
            status: TreeStatus::Succeeded,
            nodes: build_tree(locations, assets),
            error: None,
        },
        _ => ActiveTree::idle(),
    }
}
