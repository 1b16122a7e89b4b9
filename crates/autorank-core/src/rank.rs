//! Request and response shapes exchanged with the ranking service.

use crate::catalog::RankableAction;
use crate::features::ContextFeature;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One rank call: the full catalog, the current context and the ids that
/// must stay where they are.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    #[serde(rename = "contextFeatures")]
    pub context: Vec<ContextFeature>,
    pub actions: Vec<RankableAction>,
    #[serde(rename = "excludedActions")]
    pub excluded_action_ids: Vec<String>,
    #[serde(rename = "eventId")]
    pub request_id: String,
    pub defer_activation: bool,
}

impl RankRequest {
    /// Builds a request with a fresh UUID v4 as its id.
    pub fn new(
        actions: Vec<RankableAction>,
        context: Vec<ContextFeature>,
        excluded_action_ids: Vec<String>,
    ) -> Self {
        Self {
            context,
            actions,
            excluded_action_ids,
            request_id: Uuid::new_v4().to_string(),
            defer_activation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAction {
    pub id: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    /// The action the service wants rewarded, i.e. its top choice.
    pub reward_action_id: String,
    #[serde(default)]
    pub ranking: Vec<RankedAction>,
    /// Echoes the request id; rewards are posted against it.
    pub event_id: String,
}

/// Reward body for one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardRequest {
    pub value: f32,
}

impl RewardRequest {
    pub const LIKED: RewardRequest = RewardRequest { value: 1.0 };
    pub const NOT_LIKED: RewardRequest = RewardRequest { value: 0.0 };
}
