//! Core types for autorank.
//!
//! Loads a car catalog from CSV, turns it into rankable actions and defines
//! the [`RankingService`] seam the interactive session talks to.

pub mod catalog;
pub mod features;
pub mod rank;
pub mod table;

pub use catalog::{build_actions, build_actions_with, ActionCatalog, ColumnSpan, RankableAction};
pub use features::{ContextFeature, FeatureSet};
pub use rank::{RankRequest, RankResponse, RankedAction, RewardRequest};
pub use table::{CsvRow, CsvTable};

/// The two calls made against the external ranking service.
///
/// Ranking, exploration and learning all happen behind this trait.
pub trait RankingService {
    type Error: std::error::Error + Send + Sync + 'static;

    fn rank(&mut self, request: &RankRequest) -> Result<RankResponse, Self::Error>;
    fn reward(&mut self, event_id: &str, reward: RewardRequest) -> Result<(), Self::Error>;
}
