use serde::{Deserialize, Serialize};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 20;
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;
pub const DEFAULT_SIMILAR_OVERFETCH: usize = 2;

/// Tunables for the matching engine. Signal weights and the inclusion threshold are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub recommendation_limit: usize,
    pub similar_limit: usize,
    /// How many pool entries per requested result the similarity scorer inspects.
    pub similar_overfetch: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            similar_limit: DEFAULT_SIMILAR_LIMIT,
            similar_overfetch: DEFAULT_SIMILAR_OVERFETCH,
        }
    }
}
